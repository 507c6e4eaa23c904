use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use primapos_core::{DomainError, DomainResult, Page, PageRequest, TransactionId};
use primapos_pricing::TaxRate;

use crate::invoice::{Counterparty, InvoiceDetail, InvoiceLine, totals_for};
use crate::query::TransactionQuery;
use crate::transaction::{TransactionStatus, TransactionSummary, TransactionType};

const SEED_SALES: &str = include_str!("../data/sales.json");
const SEED_PURCHASES: &str = include_str!("../data/purchases.json");

/// Everything the form submits for a transaction. Totals are never part of
/// a draft; the store derives them from the lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub created_at: NaiveDateTime,
    pub counterparty: Counterparty,
    #[serde(default)]
    pub mechanic: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub lines: Vec<InvoiceLine>,
    pub tax_rate: TaxRate,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl TransactionDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.counterparty.name.trim().is_empty() {
            let who = if self.transaction_type.is_sale() {
                "customer"
            } else {
                "supplier"
            };
            return Err(DomainError::validation(format!("{who} name must not be empty")));
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation("a transaction needs at least one line"));
        }
        if let Some(pos) = self.lines.iter().position(|l| l.name.trim().is_empty()) {
            return Err(DomainError::validation(format!("line {} has no name", pos + 1)));
        }
        if !self.transaction_type.is_sale() && self.mechanic.is_some() {
            return Err(DomainError::validation("purchases have no mechanic"));
        }
        Ok(())
    }
}

/// Stored sales and purchases.
///
/// Sales and purchases are numbered independently; ids are only unique
/// within one transaction type. Invoice numbers restart every year, ids don't.
pub trait TransactionStore: Send + Sync {
    /// All invoices of one type in id order.
    fn list_invoices(&self, kind: TransactionType) -> Vec<InvoiceDetail>;

    fn find_invoice_by_id(&self, kind: TransactionType, id: TransactionId) -> Option<InvoiceDetail>;

    fn create(&self, draft: TransactionDraft) -> DomainResult<InvoiceDetail>;

    /// Replace the editable content of an invoice. Number, payment details
    /// and counterparty contact data are kept unless the draft supplies them.
    fn update(&self, id: TransactionId, draft: TransactionDraft) -> DomainResult<InvoiceDetail>;

    fn set_status(
        &self,
        kind: TransactionType,
        id: TransactionId,
        status: TransactionStatus,
    ) -> DomainResult<InvoiceDetail>;

    /// List rows, newest first.
    fn list_transactions(&self, kind: TransactionType) -> Vec<TransactionSummary> {
        TransactionQuery::default().apply(self.list_invoices(kind).iter().map(InvoiceDetail::summary))
    }

    fn search_transactions(
        &self,
        kind: TransactionType,
        query: &TransactionQuery,
        page: PageRequest,
    ) -> Page<TransactionSummary> {
        let rows = query.apply(self.list_invoices(kind).iter().map(InvoiceDetail::summary));
        Page::paginate(rows, page)
    }
}

impl<S> TransactionStore for Arc<S>
where
    S: TransactionStore + ?Sized,
{
    fn list_invoices(&self, kind: TransactionType) -> Vec<InvoiceDetail> {
        (**self).list_invoices(kind)
    }

    fn find_invoice_by_id(&self, kind: TransactionType, id: TransactionId) -> Option<InvoiceDetail> {
        (**self).find_invoice_by_id(kind, id)
    }

    fn create(&self, draft: TransactionDraft) -> DomainResult<InvoiceDetail> {
        (**self).create(draft)
    }

    fn update(&self, id: TransactionId, draft: TransactionDraft) -> DomainResult<InvoiceDetail> {
        (**self).update(id, draft)
    }

    fn set_status(
        &self,
        kind: TransactionType,
        id: TransactionId,
        status: TransactionStatus,
    ) -> DomainResult<InvoiceDetail> {
        (**self).set_status(kind, id, status)
    }
}

type InvoiceKey = (TransactionType, TransactionId);

/// In-memory transaction store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    inner: RwLock<BTreeMap<InvoiceKey, InvoiceDetail>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoices(invoices: impl IntoIterator<Item = InvoiceDetail>) -> Self {
        let map = invoices
            .into_iter()
            .map(|inv| ((inv.transaction_type, inv.id), inv))
            .collect();
        Self {
            inner: RwLock::new(map),
        }
    }

    /// Store pre-loaded with the shop's demo sales and purchases.
    ///
    /// Every seeded invoice must agree with its own lines.
    pub fn seeded() -> DomainResult<Self> {
        let mut invoices = parse_seed(SEED_SALES, "sales")?;
        invoices.extend(parse_seed(SEED_PURCHASES, "purchases")?);

        if let Some(bad) = invoices.iter().find(|inv| !inv.is_consistent()) {
            return Err(DomainError::invariant(format!(
                "seeded invoice {} does not match its lines",
                bad.invoice_number
            )));
        }

        tracing::debug!(count = invoices.len(), "seeded transaction store");
        Ok(Self::with_invoices(invoices))
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, BTreeMap<InvoiceKey, InvoiceDetail>>> {
        self.inner
            .write()
            .map_err(|_| DomainError::invariant("transaction store lock poisoned"))
    }
}

fn parse_seed(json: &str, what: &str) -> DomainResult<Vec<InvoiceDetail>> {
    serde_json::from_str(json).map_err(|e| DomainError::invariant(format!("seed {what} are malformed: {e}")))
}

fn next_id(map: &BTreeMap<InvoiceKey, InvoiceDetail>, kind: TransactionType) -> TransactionId {
    map.keys()
        .filter(|(k, _)| *k == kind)
        .map(|(_, id)| *id)
        .max()
        .map_or(TransactionId::new(1), |id| id.next())
}

/// Next number in the `{prefix}-{year}-NNN` sequence; each type restarts at
/// 001 every calendar year.
fn invoice_number(
    map: &BTreeMap<InvoiceKey, InvoiceDetail>,
    kind: TransactionType,
    created_at: NaiveDateTime,
) -> String {
    let prefix = format!("{}-{}-", kind.number_prefix(), created_at.year());
    let last = map
        .iter()
        .filter(|((k, _), _)| *k == kind)
        .filter_map(|(_, inv)| inv.invoice_number.strip_prefix(&prefix)?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{:03}", last + 1)
}

impl TransactionStore for InMemoryTransactionStore {
    fn list_invoices(&self, kind: TransactionType) -> Vec<InvoiceDetail> {
        match self.inner.read() {
            Ok(map) => map
                .iter()
                .filter(|((k, _), _)| *k == kind)
                .map(|(_, inv)| inv.clone())
                .collect(),
            Err(_) => vec![],
        }
    }

    fn find_invoice_by_id(&self, kind: TransactionType, id: TransactionId) -> Option<InvoiceDetail> {
        let map = self.inner.read().ok()?;
        map.get(&(kind, id)).cloned()
    }

    fn create(&self, draft: TransactionDraft) -> DomainResult<InvoiceDetail> {
        draft.validate()?;
        let mut map = self.write()?;

        let kind = draft.transaction_type;
        let id = next_id(&map, kind);
        let totals = totals_for(&draft.lines, draft.tax_rate);
        let invoice = InvoiceDetail {
            id,
            invoice_number: invoice_number(&map, kind, draft.created_at),
            transaction_type: kind,
            status: draft.status,
            created_at: draft.created_at,
            counterparty: Counterparty {
                name: draft.counterparty.name.trim().to_string(),
                ..draft.counterparty
            },
            mechanic: draft.mechanic,
            station: None,
            payment_method: None,
            payment_reference: None,
            lines: draft.lines,
            totals,
            notes: draft.notes,
            created_by: draft.created_by,
        };

        tracing::info!(
            transaction_type = %kind,
            invoice_number = %invoice.invoice_number,
            grand_total = %invoice.totals.grand_total,
            "transaction created"
        );
        map.insert((kind, id), invoice.clone());
        Ok(invoice)
    }

    fn update(&self, id: TransactionId, draft: TransactionDraft) -> DomainResult<InvoiceDetail> {
        draft.validate()?;
        let mut map = self.write()?;

        let kind = draft.transaction_type;
        let invoice = map
            .get_mut(&(kind, id))
            .ok_or_else(|| DomainError::not_found(format!("{kind} {id}")))?;

        let TransactionDraft {
            status,
            created_at,
            counterparty,
            mechanic,
            notes,
            lines,
            tax_rate,
            ..
        } = draft;

        invoice.status = status;
        invoice.created_at = created_at;
        invoice.counterparty.name = counterparty.name.trim().to_string();
        if counterparty.phone.is_some() {
            invoice.counterparty.phone = counterparty.phone;
        }
        if counterparty.vehicle.is_some() {
            invoice.counterparty.vehicle = counterparty.vehicle;
        }
        if counterparty.plate.is_some() {
            invoice.counterparty.plate = counterparty.plate;
        }
        invoice.mechanic = mechanic;
        invoice.notes = notes;
        invoice.totals = totals_for(&lines, tax_rate);
        invoice.lines = lines;

        tracing::info!(
            transaction_type = %kind,
            invoice_number = %invoice.invoice_number,
            grand_total = %invoice.totals.grand_total,
            "transaction updated"
        );
        Ok(invoice.clone())
    }

    fn set_status(
        &self,
        kind: TransactionType,
        id: TransactionId,
        status: TransactionStatus,
    ) -> DomainResult<InvoiceDetail> {
        let mut map = self.write()?;
        let invoice = map
            .get_mut(&(kind, id))
            .ok_or_else(|| DomainError::not_found(format!("{kind} {id}")))?;

        tracing::info!(
            invoice_number = %invoice.invoice_number,
            from = %invoice.status,
            to = %status,
            "transaction status changed"
        );
        invoice.status = status;
        Ok(invoice.clone())
    }
}
