use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use primapos_core::{DomainError, DomainResult, Money, ValueObject};

/// Tax rate as a non-negative fraction (`0.11` is 11%).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TaxRate(Decimal);

impl ValueObject for TaxRate {}

impl TaxRate {
    pub const ZERO: TaxRate = TaxRate(Decimal::ZERO);

    /// PPN (Indonesian VAT), 11%.
    pub const PPN: TaxRate = TaxRate(Decimal::from_parts(11, 0, 0, false, 2));

    pub fn new(rate: Decimal) -> DomainResult<Self> {
        if rate < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "tax rate must be non-negative, got {rate}"
            )));
        }
        Ok(Self(rate))
    }

    /// Build from a percentage (`11` → `0.11`).
    pub fn from_percent(percent: Decimal) -> DomainResult<Self> {
        Self::new(percent / Decimal::ONE_HUNDRED)
    }

    pub fn rate(&self) -> Decimal {
        self.0
    }

    /// Whole-percent label shown next to the tax line.
    pub fn percent_label(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Tax on `base`, rounded once to whole currency units.
    pub fn tax_on(&self, base: Money) -> Money {
        base.scale(self.0).round_whole()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::PPN
    }
}

impl TryFrom<Decimal> for TaxRate {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaxRate> for Decimal {
    fn from(value: TaxRate) -> Self {
        value.0
    }
}

impl FromStr for TaxRate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::validation(format!("tax rate {s:?}: {e}")))?;
        Self::new(rate)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ppn_is_eleven_percent() {
        assert_eq!(TaxRate::PPN.rate(), dec!(0.11));
        assert_eq!(TaxRate::PPN.to_string(), "11%");
    }

    #[test]
    fn rejects_negative_rates() {
        assert!(matches!(TaxRate::new(dec!(-0.01)), Err(DomainError::Validation(_))));
        assert!(matches!("-1".parse::<TaxRate>(), Err(DomainError::Validation(_))));
        assert!(matches!("eleven".parse::<TaxRate>(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn from_percent_scales() {
        assert_eq!(TaxRate::from_percent(dec!(11)).unwrap(), TaxRate::PPN);
    }

    #[test]
    fn tax_rounds_half_up_once() {
        assert_eq!(TaxRate::PPN.tax_on(Money::new(100)), Money::new(11));
        // 50 * 0.11 = 5.5
        assert_eq!(TaxRate::PPN.tax_on(Money::new(50)), Money::new(6));
        // 45 * 0.11 = 4.95
        assert_eq!(TaxRate::PPN.tax_on(Money::new(45)), Money::new(5));
        assert_eq!(TaxRate::ZERO.tax_on(Money::new(335_000)), Money::ZERO);
    }

    #[test]
    fn serde_rejects_negative_rates() {
        assert!(serde_json::from_str::<TaxRate>("\"-0.5\"").is_err());
        let rate: TaxRate = serde_json::from_str("0.11").unwrap();
        assert_eq!(rate, TaxRate::PPN);
    }
}
