//! Pricing configuration.

use crate::tax::TaxRate;

/// Environment variable holding the tax rate as a fraction (e.g. `0.11`).
pub const TAX_RATE_ENV: &str = "PRIMAPOS_TAX_RATE";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PricingConfig {
    pub tax_rate: TaxRate,
}

impl PricingConfig {
    pub fn new(tax_rate: TaxRate) -> Self {
        Self { tax_rate }
    }

    /// Read configuration from the process environment.
    ///
    /// Missing or invalid values fall back to PPN (11%).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let Some(raw) = lookup(TAX_RATE_ENV) else {
            return Self::default();
        };

        match raw.parse::<TaxRate>() {
            Ok(tax_rate) => {
                tracing::info!(%tax_rate, "tax rate configured from {TAX_RATE_ENV}");
                Self { tax_rate }
            }
            Err(err) => {
                tracing::warn!(value = %raw, error = %err, "{TAX_RATE_ENV} invalid; using default tax rate");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_to_ppn() {
        assert_eq!(PricingConfig::from_lookup(|_| None).tax_rate, TaxRate::PPN);
    }

    #[test]
    fn reads_configured_rate() {
        let config = PricingConfig::from_lookup(|key| (key == TAX_RATE_ENV).then(|| "0.12".to_string()));
        assert_eq!(config.tax_rate.rate(), dec!(0.12));
    }

    #[test]
    fn invalid_rate_falls_back() {
        let config = PricingConfig::from_lookup(|_| Some("-0.2".to_string()));
        assert_eq!(config.tax_rate, TaxRate::PPN);

        let config = PricingConfig::from_lookup(|_| Some("sebelas".to_string()));
        assert_eq!(config.tax_rate, TaxRate::PPN);
    }
}
