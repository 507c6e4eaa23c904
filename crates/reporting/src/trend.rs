//! Daily sales series for the "Sales Trends" chart.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use primapos_core::Money;
use primapos_transactions::{InvoiceDetail, TransactionStore, TransactionType};

/// Window selectable on the chart, ending on (and including) a given day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendRange {
    #[default]
    Last7Days,
    LastMonth,
    LastYear,
}

impl TrendRange {
    pub const ALL: [TrendRange; 3] =
        [TrendRange::Last7Days, TrendRange::LastMonth, TrendRange::LastYear];

    pub fn days(&self) -> u32 {
        match self {
            TrendRange::Last7Days => 7,
            TrendRange::LastMonth => 30,
            TrendRange::LastYear => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendRange::Last7Days => "Last 7 Days",
            TrendRange::LastMonth => "Last Month",
            TrendRange::LastYear => "Last Year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Σ grand totals of non-cancelled sales created that day.
    pub sales: Money,
}

/// One point per day of `range` ending on `today`, oldest first. Days without
/// sales are present with a zero amount.
pub fn sales_trend(
    store: &impl TransactionStore,
    range: TrendRange,
    today: NaiveDate,
) -> Vec<TrendPoint> {
    daily_sales(&store.list_invoices(TransactionType::Sale), range, today)
}

pub(crate) fn daily_sales(
    sales: &[InvoiceDetail],
    range: TrendRange,
    today: NaiveDate,
) -> Vec<TrendPoint> {
    let span = range.days();
    let start = today
        .checked_sub_days(Days::new(u64::from(span - 1)))
        .unwrap_or(NaiveDate::MIN);

    let mut by_day: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for inv in sales.iter().filter(|inv| inv.status.counts_towards_totals()) {
        let day = inv.created_at.date();
        if (start..=today).contains(&day) {
            *by_day.entry(day).or_default() += inv.totals.grand_total;
        }
    }

    start
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|date| TrendPoint {
            date,
            sales: by_day.get(&date).copied().unwrap_or_default(),
        })
        .collect()
}
