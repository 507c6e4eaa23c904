use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use primapos_core::{DomainError, DomainResult, Entity, ItemId, Money};

/// Product category shown in the master-data filters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Brake System")]
    BrakeSystem,
    #[serde(rename = "Oil & Fluids")]
    OilAndFluids,
    #[serde(rename = "Accessories")]
    Accessories,
    #[serde(rename = "Tires & Wheels")]
    TiresAndWheels,
    #[serde(rename = "Maintenance")]
    Maintenance,
    #[serde(rename = "Engine Parts")]
    EngineParts,
    #[serde(rename = "Body Kits")]
    BodyKits,
    #[serde(rename = "Electrical")]
    Electrical,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::BrakeSystem,
        Category::OilAndFluids,
        Category::Accessories,
        Category::TiresAndWheels,
        Category::Maintenance,
        Category::EngineParts,
        Category::BodyKits,
        Category::Electrical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::BrakeSystem => "Brake System",
            Category::OilAndFluids => "Oil & Fluids",
            Category::Accessories => "Accessories",
            Category::TiresAndWheels => "Tires & Wheels",
            Category::Maintenance => "Maintenance",
            Category::EngineParts => "Engine Parts",
            Category::BodyKits => "Body Kits",
            Category::Electrical => "Electrical",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stock level classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// 5 units or fewer.
    Critical,
    /// 6 to 20 units.
    Warning,
    Safe,
}

impl StockStatus {
    pub const CRITICAL_MAX: u32 = 5;
    pub const WARNING_MAX: u32 = 20;

    pub fn of(stock: u32) -> Self {
        if stock <= Self::CRITICAL_MAX {
            StockStatus::Critical
        } else if stock <= Self::WARNING_MAX {
            StockStatus::Warning
        } else {
            StockStatus::Safe
        }
    }

    pub fn needs_restock(&self) -> bool {
        !matches!(self, StockStatus::Safe)
    }
}

/// Catalog item (a part or consumable the shop buys and sells).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sku: String,
    pub category: Category,
    /// Price paid to the supplier; pre-fills purchase lines.
    pub purchase_price: Money,
    /// Price charged to customers; pre-fills sale lines.
    pub selling_price: Money,
    /// Default installation fee added to sale lines.
    #[serde(default)]
    pub service_fee: Money,
    pub stock: u32,
    pub created_at: NaiveDate,
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Item {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::of(self.stock)
    }

    /// Overwrite the editable fields with `draft`; id and creation date are kept.
    pub fn apply_draft(&mut self, draft: ItemDraft) {
        self.name = draft.name.trim().to_string();
        self.description = draft.description;
        self.sku = draft.sku.trim().to_string();
        self.category = draft.category;
        self.purchase_price = draft.purchase_price;
        self.selling_price = draft.selling_price;
        self.service_fee = draft.service_fee;
        self.stock = draft.stock;
    }
}

/// Editable fields of an item, as submitted by the item form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sku: String,
    pub category: Category,
    pub purchase_price: Money,
    pub selling_price: Money,
    #[serde(default)]
    pub service_fee: Money,
    #[serde(default)]
    pub stock: u32,
}

impl ItemDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("item name must not be empty"));
        }
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("sku must not be empty"));
        }
        if self.purchase_price.is_negative() {
            return Err(DomainError::validation("purchase_price must be non-negative"));
        }
        if self.selling_price.is_negative() {
            return Err(DomainError::validation("selling_price must be non-negative"));
        }
        if self.service_fee.is_negative() {
            return Err(DomainError::validation("service_fee must be non-negative"));
        }
        if self.selling_price < self.purchase_price {
            tracing::warn!(
                sku = %self.sku,
                purchase_price = %self.purchase_price,
                selling_price = %self.selling_price,
                "item sells below purchase price"
            );
        }
        Ok(())
    }

    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            sku: item.sku.clone(),
            category: item.category,
            purchase_price: item.purchase_price,
            selling_price: item.selling_price,
            service_fee: item.service_fee,
            stock: item.stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn draft() -> ItemDraft {
        ItemDraft {
            name: "NGK Spark Plug CR8E".to_string(),
            description: String::new(),
            sku: "ENG-NGK-CR8E".to_string(),
            category: Category::EngineParts,
            purchase_price: Money::new(18_000),
            selling_price: Money::new(35_000),
            service_fee: Money::new(10_000),
            stock: 89,
        }
    }

    #[test]
    fn stock_status_thresholds() {
        assert_eq!(StockStatus::of(0), StockStatus::Critical);
        assert_eq!(StockStatus::of(5), StockStatus::Critical);
        assert_eq!(StockStatus::of(6), StockStatus::Warning);
        assert_eq!(StockStatus::of(20), StockStatus::Warning);
        assert_eq!(StockStatus::of(21), StockStatus::Safe);
        assert!(StockStatus::Warning.needs_restock());
        assert!(!StockStatus::Safe.needs_restock());
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn blank_name_or_sku_is_rejected() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));

        let mut d = draft();
        d.sku.clear();
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let mut d = draft();
        d.selling_price = Money::new(-1);
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));

        let mut d = draft();
        d.service_fee = Money::new(-1);
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn category_labels_round_trip_through_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: every stock level maps to exactly the band its thresholds describe.
        #[test]
        fn stock_status_is_monotonic(a in 0u32..500, b in 0u32..500) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let rank = |s: StockStatus| match s {
                StockStatus::Critical => 0,
                StockStatus::Warning => 1,
                StockStatus::Safe => 2,
            };
            prop_assert!(rank(StockStatus::of(lo)) <= rank(StockStatus::of(hi)));
        }
    }
}
