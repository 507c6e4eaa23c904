use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use primapos_core::{Entity, ItemId, Money, TransactionId};
use primapos_pricing::{Discount, InvoiceTotals, LineItem, TaxRate, compute_invoice_totals};
use primapos_staff::initials;

use crate::transaction::{TransactionStatus, TransactionSummary, TransactionType};

/// What a stored line bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineKind {
    Service,
    #[default]
    Part,
}

/// A recorded invoice line.
///
/// The discount is stored as an amount. Lines priced with a percentage are
/// converted once, exactly, when the transaction is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: LineKind,
    #[serde(default)]
    pub item_id: Option<ItemId>,
    pub quantity: u32,
    pub unit_price: Money,
    #[serde(default)]
    pub discount: Money,
    #[serde(default)]
    pub service_fee: Money,
}

impl InvoiceLine {
    pub fn to_line_item(&self) -> LineItem {
        LineItem::new(self.quantity, self.unit_price)
            .with_discount(Discount::amount(self.discount))
            .with_service_fee(self.service_fee)
    }

    pub fn subtotal(&self) -> Money {
        self.to_line_item().subtotal()
    }
}

/// Customer or supplier on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counterparty {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub plate: Option<String>,
}

/// A stored transaction with its lines and recorded totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub id: TransactionId,
    pub invoice_number: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub created_at: NaiveDateTime,
    pub counterparty: Counterparty,
    /// Assigned mechanic (sales only).
    #[serde(default)]
    pub mechanic: Option<String>,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    pub lines: Vec<InvoiceLine>,
    pub totals: InvoiceTotals,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl Entity for InvoiceDetail {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl InvoiceDetail {
    /// Totals re-derived from the lines at the recorded tax rate.
    pub fn recompute_totals(&self) -> InvoiceTotals {
        totals_for(&self.lines, self.totals.tax_rate)
    }

    /// Whether the recorded totals agree with the lines.
    pub fn is_consistent(&self) -> bool {
        self.recompute_totals() == self.totals
    }

    pub fn summary(&self) -> TransactionSummary {
        TransactionSummary {
            id: self.id,
            transaction_type: self.transaction_type,
            invoice_number: self.invoice_number.clone(),
            date: self.created_at.date(),
            counterparty: self.counterparty.name.clone(),
            counterparty_initials: initials(&self.counterparty.name),
            mechanic: self.mechanic.clone(),
            status: self.status,
            total_amount: self.totals.grand_total,
        }
    }
}

pub(crate) fn totals_for(lines: &[InvoiceLine], tax_rate: TaxRate) -> InvoiceTotals {
    let items: Vec<LineItem> = lines.iter().map(InvoiceLine::to_line_item).collect();
    compute_invoice_totals(&items, tax_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line(name: &str, kind: LineKind, price: i64, qty: u32, discount: i64) -> InvoiceLine {
        InvoiceLine {
            name: name.to_string(),
            description: String::new(),
            kind,
            item_id: None,
            quantity: qty,
            unit_price: Money::new(price),
            discount: Money::new(discount),
            service_fee: Money::ZERO,
        }
    }

    fn invoice(lines: Vec<InvoiceLine>) -> InvoiceDetail {
        let totals = totals_for(&lines, TaxRate::ZERO);
        InvoiceDetail {
            id: TransactionId::new(1),
            invoice_number: "INV-2026-001".to_string(),
            transaction_type: TransactionType::Sale,
            status: TransactionStatus::Completed,
            created_at: NaiveDate::from_ymd_opt(2026, 2, 26)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            counterparty: Counterparty {
                name: "Budi Santoso".to_string(),
                ..Counterparty::default()
            },
            mechanic: Some("Agus Setiawan".to_string()),
            station: None,
            payment_method: None,
            payment_reference: None,
            lines,
            totals,
            notes: String::new(),
            created_by: None,
        }
    }

    #[test]
    fn line_subtotal_uses_recorded_discount_amount() {
        let l = line("CVT Roller Set", LineKind::Part, 120_000, 1, 20_000);
        assert_eq!(l.subtotal(), Money::new(100_000));
    }

    #[test]
    fn recorded_totals_match_reference_invoice() {
        let inv = invoice(vec![
            line("Full Service Package", LineKind::Service, 150_000, 1, 0),
            line("Synthetic Engine Oil", LineKind::Part, 85_000, 1, 0),
            line("CVT Roller Set", LineKind::Part, 120_000, 1, 20_000),
            line("Brake Pad Front", LineKind::Part, 75_000, 2, 0),
        ]);

        assert_eq!(inv.totals.items_subtotal, Money::new(505_000));
        assert_eq!(inv.totals.total_discount, Money::new(20_000));
        assert_eq!(inv.totals.grand_total, Money::new(485_000));
        assert!(inv.is_consistent());
    }

    #[test]
    fn tampered_totals_are_detected() {
        let mut inv = invoice(vec![line("Oil Change Service", LineKind::Service, 35_000, 1, 0)]);
        inv.totals.grand_total = Money::new(30_000);
        assert!(!inv.is_consistent());
    }

    #[test]
    fn summary_carries_grand_total_and_initials() {
        let inv = invoice(vec![line("Oil Change Service", LineKind::Service, 35_000, 1, 0)]);
        let summary = inv.summary();
        assert_eq!(summary.total_amount, Money::new(35_000));
        assert_eq!(summary.counterparty_initials, "BS");
        assert_eq!(summary.date, NaiveDate::from_ymd_opt(2026, 2, 26).unwrap());
    }
}
