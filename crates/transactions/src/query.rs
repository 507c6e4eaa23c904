//! Transaction list filtering.

use serde::{Deserialize, Serialize};

use crate::transaction::{TransactionStatus, TransactionSummary};

/// Filters applied by the sales/purchases tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// Case-insensitive substring of invoice number or counterparty name.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
}

impl TransactionQuery {
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = needle.into();
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, summary: &TransactionSummary) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || summary.invoice_number.to_lowercase().contains(&needle)
            || summary.counterparty.to_lowercase().contains(&needle);
        matches_search && self.status.is_none_or(|s| s == summary.status)
    }

    /// Matching rows, newest first (ties broken by id, highest first).
    pub fn apply(&self, rows: impl IntoIterator<Item = TransactionSummary>) -> Vec<TransactionSummary> {
        let mut out: Vec<TransactionSummary> = rows.into_iter().filter(|r| self.matches(r)).collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        out
    }
}
