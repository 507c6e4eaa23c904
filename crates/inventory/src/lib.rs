//! Master data: the parts and consumables catalog.
//!
//! Items pre-fill transaction lines (price and default service fee) and feed
//! the low-stock alerts on the dashboard.

pub mod catalog;
pub mod item;
pub mod query;

pub use catalog::{Catalog, InMemoryCatalog};
pub use item::{Category, Item, ItemDraft, StockStatus};
pub use query::ItemQuery;
