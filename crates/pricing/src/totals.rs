use serde::{Deserialize, Serialize};

use primapos_core::Money;

use crate::line::LineItem;
use crate::tax::TaxRate;

/// Aggregate totals of a transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Σ `unit_price * quantity` over all lines.
    pub items_subtotal: Money,
    /// Σ service fees.
    pub service_fees: Money,
    /// Σ line discounts.
    pub total_discount: Money,
    /// `items_subtotal + service_fees - total_discount`.
    pub before_tax: Money,
    pub tax_rate: TaxRate,
    /// `round(before_tax * tax_rate)`, the only rounded figure.
    pub tax: Money,
    /// `before_tax + tax`.
    pub grand_total: Money,
}

impl InvoiceTotals {
    /// Totals of a transaction with no lines.
    pub fn zero(tax_rate: TaxRate) -> Self {
        Self {
            items_subtotal: Money::ZERO,
            service_fees: Money::ZERO,
            total_discount: Money::ZERO,
            before_tax: Money::ZERO,
            tax_rate,
            tax: Money::ZERO,
            grand_total: Money::ZERO,
        }
    }
}

/// Subtotal of a single line: `unit_price * quantity * (1 - discount%) + service_fee`.
///
/// Inputs outside their valid range are clamped first (see [`LineItem::sanitized`]).
/// No rounding happens at line level.
pub fn compute_line_subtotal(line: &LineItem) -> Money {
    line.subtotal()
}

/// Totals over `lines` at `tax_rate`.
///
/// Tax is computed once on the aggregate pre-tax amount and rounded half away
/// from zero to whole currency units; it is never a sum of per-line taxes.
pub fn compute_invoice_totals<'a, I>(lines: I, tax_rate: TaxRate) -> InvoiceTotals
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let mut totals = InvoiceTotals::zero(tax_rate);

    for line in lines {
        let line = line.sanitized();
        let line_total = line.line_total();
        totals.items_subtotal += line_total;
        totals.service_fees += line.service_fee;
        totals.total_discount += line.discount.amount_for(line_total);
    }

    totals.before_tax = totals.items_subtotal + totals.service_fees - totals.total_discount;
    totals.tax = tax_rate.tax_on(totals.before_tax);
    totals.grand_total = totals.before_tax + totals.tax;

    totals
}
