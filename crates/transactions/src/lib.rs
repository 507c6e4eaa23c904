//! Sales and purchase transactions.
//!
//! Stored invoices, the transaction list screens, and the transaction form
//! (the editing session that collects line items and prices them on every
//! change). Pricing itself lives in `primapos-pricing`.

pub mod form;
pub mod invoice;
pub mod query;
pub mod store;
pub mod transaction;

pub use form::{FormLine, LineKey, LinePatch, TransactionForm};
pub use invoice::{Counterparty, InvoiceDetail, InvoiceLine, LineKind};
pub use query::TransactionQuery;
pub use store::{InMemoryTransactionStore, TransactionDraft, TransactionStore};
pub use transaction::{TransactionStatus, TransactionSummary, TransactionType};
