//! The transaction form: an editing session over a list of line items.
//!
//! The form never caches money figures. Every subtotal and total it reports
//! is recomputed from the current lines through `primapos-pricing`, so an edit
//! to any line is reflected everywhere at once.

use core::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use primapos_core::{DomainError, DomainResult, ItemId, Money, TransactionId, UserId};
use primapos_inventory::Catalog;
use primapos_pricing::{Discount, InvoiceTotals, LineItem, TaxRate, compute_invoice_totals, compute_line_subtotal};
use primapos_staff::UserDirectory;

use crate::invoice::{Counterparty, InvoiceDetail, InvoiceLine, LineKind};
use crate::store::{TransactionDraft, TransactionStore};
use crate::transaction::{TransactionStatus, TransactionType};

/// Identity of a line within one form session.
///
/// Keys are handed out by the form's own counter and never reused, so a key
/// held by the caller can't silently start pointing at a different row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineKey(u64);

impl LineKey {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line #{}", self.0)
    }
}

/// One editable row of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLine {
    pub key: LineKey,
    pub item_id: Option<ItemId>,
    pub name: String,
    pub description: String,
    pub kind: LineKind,
    pub item: LineItem,
}

impl FormLine {
    fn empty(key: LineKey) -> Self {
        Self {
            key,
            item_id: None,
            name: String::new(),
            description: String::new(),
            kind: LineKind::Part,
            item: LineItem::default(),
        }
    }

    pub fn subtotal(&self) -> Money {
        compute_line_subtotal(&self.item)
    }

    /// Untouched row: nothing selected, no name, no price.
    pub fn is_blank(&self) -> bool {
        self.item_id.is_none()
            && self.name.trim().is_empty()
            && self.item.unit_price.is_zero()
            && self.item.service_fee.is_zero()
    }

    /// The row as it is recorded; the discount is stored as the exact amount
    /// it came to.
    pub fn to_invoice_line(&self) -> InvoiceLine {
        let item = self.item.sanitized();
        InvoiceLine {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            kind: self.kind,
            item_id: self.item_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount: item.discount_amount(),
            service_fee: item.service_fee,
        }
    }
}

/// Partial edit of a line, as typed into the form. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<LineKind>,
    /// Raw input; anything below 1 becomes 1.
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_price: Option<Money>,
    /// Percent in [0, 100]; out-of-range input is clamped.
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
    #[serde(default)]
    pub service_fee: Option<Money>,
}

impl LinePatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: LineKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn discount_percent(mut self, percent: Decimal) -> Self {
        self.discount_percent = Some(percent);
        self
    }

    pub fn service_fee(mut self, fee: Money) -> Self {
        self.service_fee = Some(fee);
        self
    }
}

/// Editing session for a new or existing sale/purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionForm {
    transaction_type: TransactionType,
    transaction_id: Option<TransactionId>,
    status: TransactionStatus,
    counterparty: String,
    mechanic: Option<UserId>,
    date: NaiveDateTime,
    notes: String,
    lines: Vec<FormLine>,
    next_key: u64,
    tax_rate: TaxRate,
}

impl TransactionForm {
    /// Blank form with a single empty line.
    pub fn new(transaction_type: TransactionType, date: NaiveDateTime, tax_rate: TaxRate) -> Self {
        let mut form = Self {
            transaction_type,
            transaction_id: None,
            status: TransactionStatus::Pending,
            counterparty: String::new(),
            mechanic: None,
            date,
            notes: String::new(),
            lines: Vec::new(),
            next_key: 0,
            tax_rate,
        };
        form.add_line();
        form
    }

    /// Open a stored invoice for editing.
    ///
    /// Lines keep their recorded discount amount and service fee, and the form
    /// keeps the tax rate the invoice was recorded with, so the totals shown on
    /// load equal the stored ones.
    pub fn from_invoice(invoice: &InvoiceDetail, directory: &impl UserDirectory) -> Self {
        let mut form = Self {
            transaction_type: invoice.transaction_type,
            transaction_id: Some(invoice.id),
            status: invoice.status,
            counterparty: invoice.counterparty.name.clone(),
            mechanic: None,
            date: invoice.created_at,
            notes: invoice.notes.clone(),
            lines: Vec::with_capacity(invoice.lines.len().max(1)),
            next_key: 0,
            tax_rate: invoice.totals.tax_rate,
        };

        if let Some(name) = invoice.mechanic.as_deref() {
            form.mechanic = directory.find_mechanic_by_name(name).map(|u| u.id);
            if form.mechanic.is_none() {
                tracing::warn!(
                    invoice_number = %invoice.invoice_number,
                    mechanic = name,
                    "recorded mechanic is not in the staff directory"
                );
            }
        }

        for stored in &invoice.lines {
            let key = form.next_key();
            form.lines.push(FormLine {
                key,
                item_id: stored.item_id,
                name: stored.name.clone(),
                description: stored.description.clone(),
                kind: stored.kind,
                item: stored.to_line_item(),
            });
        }
        if form.lines.is_empty() {
            form.add_line();
        }
        form
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn is_editing(&self) -> bool {
        self.transaction_id.is_some()
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn counterparty(&self) -> &str {
        &self.counterparty
    }

    pub fn mechanic(&self) -> Option<UserId> {
        self.mechanic
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Lines in display order; never empty.
    pub fn lines(&self) -> &[FormLine] {
        &self.lines
    }

    pub fn line(&self, key: LineKey) -> Option<&FormLine> {
        self.lines.iter().find(|l| l.key == key)
    }

    pub fn set_status(&mut self, status: TransactionStatus) {
        self.status = status;
    }

    pub fn set_counterparty(&mut self, name: impl Into<String>) {
        self.counterparty = name.into();
    }

    pub fn set_date(&mut self, date: NaiveDateTime) {
        self.date = date;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Assign (or clear) the mechanic. Only sales have one, and it must be a
    /// user with the mechanic role.
    pub fn set_mechanic(&mut self, mechanic: Option<UserId>, directory: &impl UserDirectory) -> DomainResult<()> {
        let Some(id) = mechanic else {
            self.mechanic = None;
            return Ok(());
        };
        if !self.transaction_type.is_sale() {
            return Err(DomainError::validation("purchases have no mechanic"));
        }
        match directory.find_user_by_id(id) {
            Some(user) if user.is_mechanic() => {
                self.mechanic = Some(id);
                Ok(())
            }
            Some(user) => Err(DomainError::validation(format!("{} is not a mechanic", user.name))),
            None => Err(DomainError::not_found(format!("user {id}"))),
        }
    }

    /// Append an empty line and return its key.
    pub fn add_line(&mut self) -> LineKey {
        let key = self.next_key();
        self.lines.push(FormLine::empty(key));
        key
    }

    /// Remove a line. Removing the only line leaves a fresh empty one in its place.
    pub fn remove_line(&mut self, key: LineKey) -> DomainResult<()> {
        let pos = self.position(key)?;
        self.lines.remove(pos);
        if self.lines.is_empty() {
            self.add_line();
        }
        Ok(())
    }

    pub fn update_line(&mut self, key: LineKey, patch: LinePatch) -> DomainResult<&FormLine> {
        let is_sale = self.transaction_type.is_sale();
        let pos = self.position(key)?;
        let line = &mut self.lines[pos];

        if let Some(name) = patch.name {
            line.name = name;
        }
        if let Some(kind) = patch.kind {
            line.kind = kind;
        }
        if let Some(quantity) = patch.quantity {
            line.item.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        }
        if let Some(price) = patch.unit_price {
            line.item.unit_price = price.non_negative();
        }
        if let Some(percent) = patch.discount_percent {
            line.item.discount = Discount::percent(percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED));
        }
        if let Some(fee) = patch.service_fee {
            if is_sale {
                line.item.service_fee = fee.non_negative();
            } else {
                tracing::debug!(line = %key, "service fee ignored on purchase line");
            }
        }

        Ok(&self.lines[pos])
    }

    /// Fill a line from a catalog item. Sales take the selling price and the
    /// item's default service fee; purchases take the purchase price and no fee.
    /// Quantity and discount are kept.
    pub fn select_item(&mut self, key: LineKey, item_id: ItemId, catalog: &impl Catalog) -> DomainResult<&FormLine> {
        let pos = self.position(key)?;
        let item = catalog
            .find_item_by_id(item_id)
            .ok_or_else(|| DomainError::not_found(format!("item {item_id}")))?;

        let (unit_price, service_fee) = if self.transaction_type.is_sale() {
            (item.selling_price, item.service_fee)
        } else {
            (item.purchase_price, Money::ZERO)
        };

        let line = &mut self.lines[pos];
        line.item_id = Some(item.id);
        line.name = item.name;
        line.description = item.description;
        line.kind = LineKind::Part;
        line.item.unit_price = unit_price;
        line.item.service_fee = service_fee;

        Ok(&self.lines[pos])
    }

    pub fn line_subtotal(&self, key: LineKey) -> DomainResult<Money> {
        let pos = self.position(key)?;
        Ok(self.lines[pos].subtotal())
    }

    /// Totals over every current line.
    pub fn totals(&self) -> InvoiceTotals {
        compute_invoice_totals(self.lines.iter().map(|l| &l.item), self.tax_rate)
    }

    /// Validate the form and turn it into a draft for the store.
    ///
    /// Blank rows are dropped. At least one remaining line must amount to
    /// something.
    pub fn to_draft(&self, directory: &impl UserDirectory) -> DomainResult<TransactionDraft> {
        if self.counterparty.trim().is_empty() {
            let who = if self.transaction_type.is_sale() {
                "customer"
            } else {
                "supplier"
            };
            return Err(DomainError::validation(format!("{who} name must not be empty")));
        }

        let lines: Vec<InvoiceLine> = self
            .lines
            .iter()
            .filter(|l| !l.is_blank())
            .map(FormLine::to_invoice_line)
            .collect();
        if !lines.iter().any(|l| !l.subtotal().is_zero()) {
            return Err(DomainError::validation("add at least one line with an amount"));
        }

        let mechanic = match self.mechanic {
            Some(id) => Some(
                directory
                    .find_user_by_id(id)
                    .ok_or_else(|| DomainError::not_found(format!("user {id}")))?
                    .name,
            ),
            None => None,
        };

        Ok(TransactionDraft {
            transaction_type: self.transaction_type,
            status: self.status,
            created_at: self.date,
            counterparty: Counterparty {
                name: self.counterparty.trim().to_string(),
                ..Counterparty::default()
            },
            mechanic,
            notes: self.notes.clone(),
            lines,
            tax_rate: self.tax_rate,
            created_by: None,
        })
    }

    /// Save the form: creates a new transaction, or updates the one being edited.
    /// After a create the form switches to editing the stored transaction.
    pub fn submit(
        &mut self,
        store: &impl TransactionStore,
        directory: &impl UserDirectory,
    ) -> DomainResult<InvoiceDetail> {
        let draft = self.to_draft(directory)?;
        let saved = match self.transaction_id {
            Some(id) => store.update(id, draft)?,
            None => store.create(draft)?,
        };
        self.transaction_id = Some(saved.id);
        Ok(saved)
    }

    fn next_key(&mut self) -> LineKey {
        self.next_key += 1;
        LineKey(self.next_key)
    }

    fn position(&self, key: LineKey) -> DomainResult<usize> {
        self.lines
            .iter()
            .position(|l| l.key == key)
            .ok_or_else(|| DomainError::not_found(key.to_string()))
    }
}
