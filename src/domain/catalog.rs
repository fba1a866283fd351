use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::common::{Identifiable, OptionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogItemType {
    Merchandise,
    EventAccess,
}

impl OptionSet for CatalogItemType {
    const ALL: &'static [Self] = &[CatalogItemType::Merchandise, CatalogItemType::EventAccess];

    fn label(&self) -> &'static str {
        match self {
            CatalogItemType::Merchandise => "Merchandise",
            CatalogItemType::EventAccess => "Event access",
        }
    }
}

impl fmt::Display for CatalogItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived from inventory settings; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StockState {
    InStock,
    OutOfStock,
}

impl fmt::Display for StockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockState::InStock => f.write_str("In stock"),
            StockState::OutOfStock => f.write_str("Out of stock"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    pub item_type: CatalogItemType,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub track_inventory: bool,
    #[serde(default)]
    pub total_stock: i64,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, item_type: CatalogItemType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku: None,
            short_description: None,
            item_type,
            category: None,
            price: 0.0,
            track_inventory: false,
            total_stock: 0,
        }
    }

    pub fn stock_state(&self) -> StockState {
        if !self.track_inventory || self.total_stock > 0 {
            StockState::InStock
        } else {
            StockState::OutOfStock
        }
    }
}

impl Identifiable for CatalogItem {
    fn id(&self) -> &str {
        &self.id
    }
}
