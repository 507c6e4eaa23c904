//! Read-side summaries over catalog and transaction data.

pub mod dashboard;
pub mod trend;

pub use dashboard::{DashboardSummary, LowStockAlert, RECENT_LIMIT, TOP_SELLING_LIMIT, TopSeller};
pub use trend::{TrendPoint, TrendRange, sales_trend};
