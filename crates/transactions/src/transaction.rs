use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use primapos_core::{Money, TransactionId};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Parts and services sold to a customer.
    Sale,
    /// Stock bought from a supplier.
    Purchase,
}

impl TransactionType {
    /// Invoice number prefix (`INV-2026-001`, `PO-2026-001`).
    pub fn number_prefix(&self) -> &'static str {
        match self {
            TransactionType::Sale => "INV",
            TransactionType::Purchase => "PO",
        }
    }

    pub fn is_sale(&self) -> bool {
        matches!(self, TransactionType::Sale)
    }
}

impl core::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransactionType::Sale => write!(f, "sale"),
            TransactionType::Purchase => write!(f, "purchase"),
        }
    }
}

/// Transaction status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Completed,
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Cancelled,
}

impl TransactionStatus {
    /// Cancelled transactions stay listed but count towards no total.
    pub fn counts_towards_totals(&self) -> bool {
        !matches!(self, TransactionStatus::Cancelled)
    }
}

impl core::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "Completed"),
            TransactionStatus::Pending => write!(f, "Pending"),
            TransactionStatus::InProgress => write!(f, "In Progress"),
            TransactionStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// One row of the sales/purchases list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub id: TransactionId,
    pub transaction_type: TransactionType,
    pub invoice_number: String,
    pub date: NaiveDate,
    /// Customer (sales) or supplier (purchases).
    pub counterparty: String,
    pub counterparty_initials: String,
    pub mechanic: Option<String>,
    pub status: TransactionStatus,
    pub total_amount: Money,
}
