//! Dashboard summary.
//!
//! Every figure is derived from the stored invoices and the catalog at build
//! time; nothing here is kept in sync incrementally.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use primapos_core::{ItemId, Money};
use primapos_inventory::{Catalog, StockStatus};
use primapos_transactions::{InvoiceDetail, LineKind, TransactionStore, TransactionSummary, TransactionType};

use crate::trend::{TrendPoint, TrendRange, daily_sales};

/// Rows shown in the "recent transactions" card.
pub const RECENT_LIMIT: usize = 5;
/// Rows shown in the "top selling items" card.
pub const TOP_SELLING_LIMIT: usize = 5;

/// Catalog item that needs restocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub item_id: ItemId,
    pub name: String,
    pub sku: String,
    pub stock: u32,
    pub status: StockStatus,
}

/// A part aggregated over all non-cancelled sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSeller {
    pub name: String,
    pub quantity: u64,
    /// Σ line subtotals (after discount, including service fees).
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Σ grand totals of non-cancelled sales.
    pub total_sales: Money,
    /// Σ grand totals of non-cancelled purchases.
    pub total_purchases: Money,
    pub item_count: usize,
    /// Distinct customers on non-cancelled sales.
    pub active_customers: usize,
    /// Critical and warning items, lowest stock first.
    pub low_stock: Vec<LowStockAlert>,
    pub top_selling: Vec<TopSeller>,
    /// Sales and purchases together, newest first.
    pub recent: Vec<TransactionSummary>,
    /// Daily sales over the default chart range.
    pub sales_trend: Vec<TrendPoint>,
}

impl DashboardSummary {
    /// Summary as of `today` (the last day of the sales trend).
    pub fn build(catalog: &impl Catalog, store: &impl TransactionStore, today: NaiveDate) -> Self {
        Self::build_with_limits(catalog, store, today, RECENT_LIMIT, TOP_SELLING_LIMIT)
    }

    pub fn build_with_limits(
        catalog: &impl Catalog,
        store: &impl TransactionStore,
        today: NaiveDate,
        recent_limit: usize,
        top_selling_limit: usize,
    ) -> Self {
        let sales = store.list_invoices(TransactionType::Sale);
        let purchases = store.list_invoices(TransactionType::Purchase);
        let items = catalog.list_items();

        let mut low_stock: Vec<LowStockAlert> = items
            .iter()
            .filter(|i| i.stock_status().needs_restock())
            .map(|i| LowStockAlert {
                item_id: i.id,
                name: i.name.clone(),
                sku: i.sku.clone(),
                stock: i.stock,
                status: i.stock_status(),
            })
            .collect();
        low_stock.sort_by(|a, b| a.stock.cmp(&b.stock).then(a.item_id.cmp(&b.item_id)));

        let active_customers = counted(&sales)
            .map(|inv| inv.counterparty.name.trim().to_lowercase())
            .collect::<BTreeSet<_>>()
            .len();

        let mut recent: Vec<&InvoiceDetail> = sales.iter().chain(purchases.iter()).collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let recent = recent
            .into_iter()
            .take(recent_limit)
            .map(InvoiceDetail::summary)
            .collect();

        let summary = Self {
            total_sales: counted(&sales).map(|inv| inv.totals.grand_total).sum(),
            total_purchases: counted(&purchases).map(|inv| inv.totals.grand_total).sum(),
            item_count: items.len(),
            active_customers,
            low_stock,
            top_selling: top_selling(&sales, top_selling_limit),
            recent,
            sales_trend: daily_sales(&sales, TrendRange::default(), today),
        };

        tracing::debug!(
            total_sales = %summary.total_sales,
            total_purchases = %summary.total_purchases,
            low_stock = summary.low_stock.len(),
            "dashboard summary built"
        );
        summary
    }

    pub fn critical_count(&self) -> usize {
        self.low_stock
            .iter()
            .filter(|a| a.status == StockStatus::Critical)
            .count()
    }
}

fn counted(invoices: &[InvoiceDetail]) -> impl Iterator<Item = &InvoiceDetail> {
    invoices.iter().filter(|inv| inv.status.counts_towards_totals())
}

/// Part lines of non-cancelled sales grouped by name; highest quantity first,
/// ties by name.
fn top_selling(sales: &[InvoiceDetail], limit: usize) -> Vec<TopSeller> {
    let mut by_name: BTreeMap<&str, (u64, Money)> = BTreeMap::new();
    for line in counted(sales)
        .flat_map(|inv| inv.lines.iter())
        .filter(|l| l.kind == LineKind::Part)
    {
        let entry = by_name.entry(line.name.as_str()).or_default();
        entry.0 += u64::from(line.quantity);
        entry.1 += line.subtotal();
    }

    let mut top: Vec<TopSeller> = by_name
        .into_iter()
        .map(|(name, (quantity, revenue))| TopSeller {
            name: name.to_string(),
            quantity,
            revenue,
        })
        .collect();
    // BTreeMap iteration is already name-ordered; a stable sort keeps it for ties.
    top.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    top.truncate(limit);
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use primapos_core::TransactionId;
    use primapos_inventory::InMemoryCatalog;
    use primapos_transactions::{InMemoryTransactionStore, TransactionStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 26).unwrap()
    }

    fn seeded() -> (InMemoryCatalog, InMemoryTransactionStore) {
        (
            InMemoryCatalog::seeded().unwrap(),
            InMemoryTransactionStore::seeded().unwrap(),
        )
    }

    #[test]
    fn totals_skip_cancelled_transactions() {
        let (catalog, store) = seeded();
        let summary = DashboardSummary::build(&catalog, &store, today());

        assert_eq!(summary.total_sales, Money::new(1_512_500));
        assert_eq!(summary.total_purchases, Money::new(24_130_000));
        assert_eq!(summary.item_count, 8);
        assert_eq!(summary.active_customers, 7);
    }

    #[test]
    fn cancelling_a_sale_lowers_the_total() {
        let (catalog, store) = seeded();
        store
            .set_status(TransactionType::Sale, TransactionId::new(1), TransactionStatus::Cancelled)
            .unwrap();

        let summary = DashboardSummary::build(&catalog, &store, today());
        assert_eq!(summary.total_sales, Money::new(1_027_500));
        assert_eq!(summary.active_customers, 6);
    }

    #[test]
    fn low_stock_is_sorted_by_stock() {
        let (catalog, store) = seeded();
        let summary = DashboardSummary::build(&catalog, &store, today());

        let skus: Vec<_> = summary.low_stock.iter().map(|a| a.sku.as_str()).collect();
        assert_eq!(skus, vec!["ACC-YAM-WND", "ENG-ASP-RSA", "OIL-MTL-5100"]);
        assert_eq!(summary.critical_count(), 1);
    }

    #[test]
    fn top_selling_counts_part_quantities() {
        let (catalog, store) = seeded();
        let summary = DashboardSummary::build(&catalog, &store, today());

        assert_eq!(summary.top_selling.len(), TOP_SELLING_LIMIT);
        assert_eq!(summary.top_selling[0].name, "Brake Pad Front");
        assert_eq!(summary.top_selling[0].quantity, 2);
        assert_eq!(summary.top_selling[0].revenue, Money::new(150_000));
        assert_eq!(summary.top_selling[1].name, "LED Headlight Bulb H4");
        assert!(summary.top_selling.iter().all(|t| t.name != "Full Service Package"));
    }

    #[test]
    fn recent_mixes_sales_and_purchases() {
        let (catalog, store) = seeded();
        let summary = DashboardSummary::build(&catalog, &store, today());

        let numbers: Vec<_> = summary.recent.iter().map(|r| r.invoice_number.as_str()).collect();
        assert_eq!(
            numbers,
            vec!["INV-2026-002", "INV-2026-001", "PO-2026-001", "INV-2026-004", "PO-2026-002"]
        );
    }

    #[test]
    fn empty_shop_has_empty_dashboard() {
        let summary = DashboardSummary::build(&InMemoryCatalog::new(), &InMemoryTransactionStore::new(), today());
        assert_eq!(summary.total_sales, Money::ZERO);
        assert_eq!(summary.item_count, 0);
        assert!(summary.low_stock.is_empty());
        assert!(summary.top_selling.is_empty());
        assert!(summary.recent.is_empty());
        assert!(summary.sales_trend.iter().all(|p| p.sales.is_zero()));
    }

    #[test]
    fn trend_covers_the_last_week_and_matches_total_sales() {
        let (catalog, store) = seeded();
        let summary = DashboardSummary::build(&catalog, &store, today());

        assert_eq!(summary.sales_trend.len(), 7);
        assert_eq!(summary.sales_trend[6].date, today());
        let trend_total: Money = summary.sales_trend.iter().map(|p| p.sales).sum();
        assert_eq!(trend_total, summary.total_sales);
    }
}
