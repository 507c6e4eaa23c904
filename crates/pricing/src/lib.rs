//! Transaction pricing.
//!
//! Pure, deterministic arithmetic for line items and invoice totals (no IO, no
//! storage). Every change to a transaction's lines re-derives all totals from
//! scratch through [`compute_invoice_totals`].

pub mod config;
pub mod line;
pub mod tax;
pub mod totals;

pub use config::{PricingConfig, TAX_RATE_ENV};
pub use line::{Discount, LineItem, MAX_AMOUNT};
pub use tax::TaxRate;
pub use totals::{InvoiceTotals, compute_invoice_totals, compute_line_subtotal};
