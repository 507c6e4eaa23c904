use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use primapos_core::{DomainError, ItemId, Money, PageRequest, TransactionId, UserId};
use primapos_inventory::InMemoryCatalog;
use primapos_pricing::{PricingConfig, TaxRate};
use primapos_staff::InMemoryUserDirectory;
use primapos_transactions::{
    InMemoryTransactionStore, LinePatch, TransactionForm, TransactionQuery, TransactionStatus, TransactionStore,
    TransactionType,
};
use rust_decimal_macros::dec;

struct Shop {
    catalog: Arc<InMemoryCatalog>,
    staff: Arc<InMemoryUserDirectory>,
    store: Arc<InMemoryTransactionStore>,
}

impl Shop {
    fn seeded() -> Self {
        primapos_observability::init_with(primapos_observability::LogFormat::Pretty);
        Self {
            catalog: Arc::new(InMemoryCatalog::seeded().expect("catalog seed")),
            staff: Arc::new(InMemoryUserDirectory::seeded().expect("staff seed")),
            store: Arc::new(InMemoryTransactionStore::seeded().expect("transaction seed")),
        }
    }
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
}

#[test]
fn cashier_rings_up_a_service_sale() {
    let shop = Shop::seeded();
    let config = PricingConfig::from_lookup(|_| None);
    let mut form = TransactionForm::new(TransactionType::Sale, at(3, 9), config.tax_rate);

    form.set_counterparty("Dewi Lestari");
    form.set_mechanic(Some(UserId::new(6)), &shop.staff).unwrap();

    // Brake pads with installation, two spark plugs at 10% off.
    let pads = form.lines()[0].key;
    form.select_item(pads, ItemId::new(1), &shop.catalog).unwrap();

    let plugs = form.add_line();
    form.select_item(plugs, ItemId::new(6), &shop.catalog).unwrap();
    form.update_line(plugs, LinePatch::default().quantity(2).discount_percent(dec!(10)))
        .unwrap();

    // A stray row the cashier never filled in.
    form.add_line();

    assert_eq!(form.line_subtotal(pads).unwrap(), Money::new(40_000));
    assert_eq!(form.line_subtotal(plugs).unwrap(), Money::new(73_000));

    let totals = form.totals();
    assert_eq!(totals.items_subtotal, Money::new(95_000));
    assert_eq!(totals.service_fees, Money::new(25_000));
    assert_eq!(totals.total_discount, Money::new(7_000));
    assert_eq!(totals.before_tax, Money::new(113_000));
    assert_eq!(totals.tax, Money::new(12_430));
    assert_eq!(totals.grand_total, Money::new(125_430));

    let saved = form.submit(&shop.store, &shop.staff).unwrap();
    assert_eq!(saved.invoice_number, "INV-2026-009");
    assert_eq!(saved.lines.len(), 2);
    assert_eq!(saved.mechanic.as_deref(), Some("Agus Prasetyo"));
    assert_eq!(saved.totals, totals);
    assert!(saved.is_consistent());

    let newest = &shop.store.list_transactions(TransactionType::Sale)[0];
    assert_eq!(newest.invoice_number, "INV-2026-009");
    assert_eq!(newest.total_amount, Money::new(125_430));
    assert_eq!(newest.counterparty_initials, "DL");
}

#[test]
fn editing_a_stored_sale_keeps_its_numbers_until_changed() {
    let shop = Shop::seeded();
    let stored = shop
        .store
        .find_invoice_by_id(TransactionType::Sale, TransactionId::new(6))
        .expect("seeded sale");

    // Editing uses the invoice's own rate, not today's configured one.
    let mut form = TransactionForm::from_invoice(&stored, &shop.staff);
    assert_eq!(form.tax_rate(), TaxRate::ZERO);
    assert_eq!(form.totals(), stored.totals);

    form.set_status(TransactionStatus::Completed);
    let unchanged = form.submit(&shop.store, &shop.staff).unwrap();
    assert_eq!(unchanged.totals, stored.totals);
    assert_eq!(unchanged.lines, stored.lines);

    let key = form.lines()[0].key;
    form.update_line(key, LinePatch::default().discount_percent(dec!(0))).unwrap();
    let changed = form.submit(&shop.store, &shop.staff).unwrap();
    assert_eq!(changed.invoice_number, stored.invoice_number);
    assert_eq!(changed.totals.total_discount, Money::ZERO);
    assert_eq!(changed.totals.grand_total, Money::new(370_000));
}

#[test]
fn supplier_restock_is_priced_at_purchase_cost() {
    let shop = Shop::seeded();
    let mut form = TransactionForm::new(TransactionType::Purchase, at(4, 8), TaxRate::PPN);
    form.set_counterparty("PT Astra Honda Motor");

    let key = form.lines()[0].key;
    form.select_item(key, ItemId::new(1), &shop.catalog).unwrap();
    form.update_line(key, LinePatch::default().quantity(40).service_fee(Money::new(5_000)))
        .unwrap();

    assert!(matches!(
        form.set_mechanic(Some(UserId::new(2)), &shop.staff),
        Err(DomainError::Validation(_))
    ));

    let saved = form.submit(&shop.store, &shop.staff).unwrap();
    assert_eq!(saved.invoice_number, "PO-2026-008");
    assert_eq!(saved.totals.service_fees, Money::ZERO);
    assert_eq!(saved.totals.before_tax, Money::new(500_000));
    assert_eq!(saved.totals.grand_total, Money::new(555_000));

    let page = shop.store.search_transactions(
        TransactionType::Purchase,
        &TransactionQuery::default().search("astra"),
        PageRequest::first(),
    );
    assert_eq!(page.total_items, 2);
}

#[test]
fn submitting_an_empty_form_is_rejected() {
    let shop = Shop::seeded();
    let mut form = TransactionForm::new(TransactionType::Sale, at(5, 10), TaxRate::PPN);
    form.set_counterparty("Walk-in");

    let err = form.submit(&shop.store, &shop.staff).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(shop.store.list_invoices(TransactionType::Sale).len(), 8);
    assert!(!form.is_editing());
}

#[test]
fn stored_invoices_serialize_with_readable_fields() {
    let shop = Shop::seeded();
    let invoice = shop
        .store
        .find_invoice_by_id(TransactionType::Sale, TransactionId::new(4))
        .expect("seeded sale");

    let json = serde_json::to_value(&invoice).unwrap();
    assert_eq!(json["transaction_type"], "sale");
    assert_eq!(json["status"], "In Progress");
    assert_eq!(json["lines"][0]["kind"], "Service");
}
