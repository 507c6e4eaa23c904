use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use primapos_core::{Money, ValueObject};

/// Largest unit price or service fee the engine prices (10^15 Rupiah).
///
/// Larger inputs are clamped to it. At this bound a line's total stays below
/// 10^25, so thousands of maximal lines still sum exactly within `Decimal`.
pub const MAX_AMOUNT: Money =
    Money::from_decimal(Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0));

/// Discount applied to a line's goods portion (never to its service fee).
///
/// Lines edited in the transaction form carry a percentage; lines loaded from a
/// stored invoice carry the amount that was recorded. Neither is converted into
/// the other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    Percent(Decimal),
    Amount(Money),
}

impl ValueObject for Discount {}

impl Default for Discount {
    fn default() -> Self {
        Self::none()
    }
}

impl Discount {
    pub fn none() -> Self {
        Self::Percent(Decimal::ZERO)
    }

    pub fn percent(percent: Decimal) -> Self {
        Self::Percent(percent)
    }

    pub fn amount(amount: Money) -> Self {
        Self::Amount(amount)
    }

    /// Bound the discount for a line whose goods total is `line_total`:
    /// percentages to [0, 100], amounts to [0, line_total].
    pub fn clamped(self, line_total: Money) -> Self {
        match self {
            Discount::Percent(p) => Discount::Percent(p.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)),
            Discount::Amount(a) => Discount::Amount(a.non_negative().min(line_total)),
        }
    }

    /// Discount in currency for a line whose goods total is `line_total`.
    pub fn amount_for(&self, line_total: Money) -> Money {
        match self.clamped(line_total) {
            Discount::Percent(p) => line_total.percent(p),
            Discount::Amount(a) => a,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Discount::Percent(p) => p.is_zero(),
            Discount::Amount(a) => a.is_zero(),
        }
    }
}

/// One row of a transaction: a part or service sold or purchased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub quantity: u32,
    pub unit_price: Money,
    #[serde(default)]
    pub discount: Discount,
    /// Labour/installation charge, added after the discount.
    #[serde(default)]
    pub service_fee: Money,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            quantity: 1,
            unit_price: Money::ZERO,
            discount: Discount::none(),
            service_fee: Money::ZERO,
        }
    }
}

impl LineItem {
    pub fn new(quantity: u32, unit_price: Money) -> Self {
        Self {
            quantity,
            unit_price,
            ..Self::default()
        }
    }

    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_service_fee(mut self, service_fee: Money) -> Self {
        self.service_fee = service_fee;
        self
    }

    /// A copy with every field coerced into its valid range: quantity ≥ 1,
    /// price and fee in [0, [`MAX_AMOUNT`]], discount bounded by [`Discount::clamped`].
    pub fn sanitized(&self) -> Self {
        let quantity = self.quantity.max(1);
        let unit_price = self.unit_price.non_negative().min(MAX_AMOUNT);
        let line_total = unit_price.times(quantity);

        Self {
            quantity,
            unit_price,
            discount: self.discount.clamped(line_total),
            service_fee: self.service_fee.non_negative().min(MAX_AMOUNT),
        }
    }

    /// `unit_price * quantity`.
    pub fn line_total(&self) -> Money {
        let line = self.sanitized();
        line.unit_price.times(line.quantity)
    }

    pub fn discount_amount(&self) -> Money {
        self.discount.amount_for(self.line_total())
    }

    /// `line_total - discount_amount + service_fee`, unrounded.
    pub fn subtotal(&self) -> Money {
        let line = self.sanitized();
        line.line_total() - line.discount_amount() + line.service_fee
    }
}
