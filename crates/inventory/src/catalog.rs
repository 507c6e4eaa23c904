use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;

use primapos_core::{DomainError, DomainResult, ItemId, Page, PageRequest};

use crate::item::{Item, ItemDraft};
use crate::query::ItemQuery;

const SEED_ITEMS: &str = include_str!("../data/items.json");

/// Read access to catalog items.
///
/// Transaction forms consume this to pre-fill lines; they never own the data.
pub trait Catalog: Send + Sync {
    fn find_item_by_id(&self, id: ItemId) -> Option<Item>;

    /// All items in id order.
    fn list_items(&self) -> Vec<Item>;

    fn search_items(&self, query: &ItemQuery, page: PageRequest) -> Page<Item> {
        Page::paginate(query.apply(self.list_items()), page)
    }
}

impl<S> Catalog for Arc<S>
where
    S: Catalog + ?Sized,
{
    fn find_item_by_id(&self, id: ItemId) -> Option<Item> {
        (**self).find_item_by_id(id)
    }

    fn list_items(&self) -> Vec<Item> {
        (**self).list_items()
    }

    fn search_items(&self, query: &ItemQuery, page: PageRequest) -> Page<Item> {
        (**self).search_items(query, page)
    }
}

/// In-memory catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<BTreeMap<ItemId, Item>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let map = items.into_iter().map(|i| (i.id, i)).collect();
        Self {
            inner: RwLock::new(map),
        }
    }

    /// Catalog pre-loaded with the shop's demo items.
    pub fn seeded() -> DomainResult<Self> {
        let items: Vec<Item> = serde_json::from_str(SEED_ITEMS)
            .map_err(|e| DomainError::invariant(format!("seed catalog is malformed: {e}")))?;
        tracing::debug!(count = items.len(), "seeded catalog");
        Ok(Self::with_items(items))
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a new item; ids are assigned as `max(id) + 1`.
    pub fn create_item(&self, draft: ItemDraft, created_at: NaiveDate) -> DomainResult<Item> {
        draft.validate()?;
        let mut map = self.write()?;
        ensure_unique_sku(&map, &draft.sku, None)?;

        let id = map.keys().next_back().map_or(ItemId::new(1), |id| id.next());
        let item = Item {
            id,
            name: draft.name.trim().to_string(),
            description: draft.description,
            sku: draft.sku.trim().to_string(),
            category: draft.category,
            purchase_price: draft.purchase_price,
            selling_price: draft.selling_price,
            service_fee: draft.service_fee,
            stock: draft.stock,
            created_at,
        };

        tracing::info!(item_id = %item.id, sku = %item.sku, "catalog item created");
        map.insert(id, item.clone());
        Ok(item)
    }

    pub fn update_item(&self, id: ItemId, draft: ItemDraft) -> DomainResult<Item> {
        draft.validate()?;
        let mut map = self.write()?;
        ensure_unique_sku(&map, &draft.sku, Some(id))?;

        let item = map
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("item {id}")))?;
        item.apply_draft(draft);

        tracing::info!(item_id = %id, "catalog item updated");
        Ok(item.clone())
    }

    pub fn delete_item(&self, id: ItemId) -> DomainResult<Item> {
        let mut map = self.write()?;
        let removed = map
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(format!("item {id}")))?;

        tracing::info!(item_id = %id, "catalog item deleted");
        Ok(removed)
    }

    /// Apply a stock delta; stock may not go negative.
    pub fn adjust_stock(&self, id: ItemId, delta: i64) -> DomainResult<Item> {
        let mut map = self.write()?;
        let item = map
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("item {id}")))?;

        let new_stock = i64::from(item.stock)
            .checked_add(delta)
            .ok_or_else(|| {
                DomainError::validation(format!("stock delta {delta} for item {id} is out of range"))
            })?;
        if new_stock < 0 {
            return Err(DomainError::invariant(format!(
                "stock of item {id} cannot go negative (have {}, delta {delta})",
                item.stock
            )));
        }
        item.stock = u32::try_from(new_stock)
            .map_err(|_| DomainError::validation(format!("stock of item {id} overflows")))?;

        tracing::debug!(item_id = %id, delta, stock = item.stock, "stock adjusted");
        Ok(item.clone())
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, BTreeMap<ItemId, Item>>> {
        self.inner
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))
    }
}

fn ensure_unique_sku(map: &BTreeMap<ItemId, Item>, sku: &str, except: Option<ItemId>) -> DomainResult<()> {
    let sku = sku.trim();
    let taken = map
        .values()
        .any(|i| Some(i.id) != except && i.sku.eq_ignore_ascii_case(sku));
    if taken {
        return Err(DomainError::conflict(format!("sku {sku} already exists")));
    }
    Ok(())
}

impl Catalog for InMemoryCatalog {
    fn find_item_by_id(&self, id: ItemId) -> Option<Item> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn list_items(&self) -> Vec<Item> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}
