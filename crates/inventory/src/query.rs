//! Master-data list filtering.

use serde::{Deserialize, Serialize};

use crate::item::{Category, Item, StockStatus};

/// Filters applied by the items table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    /// Case-insensitive substring of name or SKU; blank matches everything.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub stock: Option<StockStatus>,
}

impl ItemQuery {
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = needle.into();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn stock(mut self, status: StockStatus) -> Self {
        self.stock = Some(status);
        self
    }

    pub fn matches(&self, item: &Item) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || item.name.to_lowercase().contains(&needle)
            || item.sku.to_lowercase().contains(&needle);

        let matches_category = self.category.is_none_or(|c| c == item.category);
        let matches_stock = self.stock.is_none_or(|s| s == item.stock_status());

        matches_search && matches_category && matches_stock
    }

    /// Matching items, in id order.
    pub fn apply(&self, items: impl IntoIterator<Item = Item>) -> Vec<Item> {
        let mut out: Vec<Item> = items.into_iter().filter(|i| self.matches(i)).collect();
        out.sort_by_key(|i| i.id);
        out
    }
}
