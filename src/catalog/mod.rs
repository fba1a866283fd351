//! Catalog filter bar with per-dimension option narrowing.
//!
//! Each dimension offers only the values still reachable under every other
//! active filter (search included), ignoring its own current selection.

use std::collections::BTreeSet;

use crate::domain::catalog::{CatalogItem, CatalogItemType, StockState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    ItemType,
    Category,
    Stock,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub search: String,
    pub item_type: Option<CatalogItemType>,
    pub category: Option<String>,
    pub stock: Option<StockState>,
}

/// Options each dimension can still offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableOptions {
    pub item_types: Vec<CatalogItemType>,
    pub categories: Vec<String>,
    pub stock_states: Vec<StockState>,
}

impl CatalogFilter {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || self.item_type.is_some()
            || self.category.is_some()
            || self.stock.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.matches_except(item, None)
    }

    pub fn apply<'a>(&self, items: &'a [CatalogItem]) -> Vec<&'a CatalogItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    pub fn available_item_types(&self, items: &[CatalogItem]) -> Vec<CatalogItemType> {
        self.reachable(items, Dimension::ItemType)
            .map(|item| item.item_type)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn available_categories(&self, items: &[CatalogItem]) -> Vec<String> {
        self.reachable(items, Dimension::Category)
            .filter_map(|item| item.category.as_deref())
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn available_stock_states(&self, items: &[CatalogItem]) -> Vec<StockState> {
        self.reachable(items, Dimension::Stock)
            .map(CatalogItem::stock_state)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn available_options(&self, items: &[CatalogItem]) -> AvailableOptions {
        AvailableOptions {
            item_types: self.available_item_types(items),
            categories: self.available_categories(items),
            stock_states: self.available_stock_states(items),
        }
    }

    fn reachable<'a>(
        &'a self,
        items: &'a [CatalogItem],
        skip: Dimension,
    ) -> impl Iterator<Item = &'a CatalogItem> + 'a {
        items
            .iter()
            .filter(move |item| self.matches_except(item, Some(skip)))
    }

    fn matches_except(&self, item: &CatalogItem, skip: Option<Dimension>) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() && !matches_search(item, &needle) {
            return false;
        }
        if skip != Some(Dimension::ItemType) {
            if let Some(item_type) = self.item_type {
                if item.item_type != item_type {
                    return false;
                }
            }
        }
        if skip != Some(Dimension::Category) {
            if let Some(category) = &self.category {
                if item.category.as_deref().map(str::trim) != Some(category.trim()) {
                    return false;
                }
            }
        }
        if skip != Some(Dimension::Stock) {
            if let Some(stock) = self.stock {
                if item.stock_state() != stock {
                    return false;
                }
            }
        }
        true
    }
}

fn matches_search(item: &CatalogItem, needle: &str) -> bool {
    [
        Some(item.name.as_str()),
        item.sku.as_deref(),
        item.short_description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, category: &str, stock: Option<i64>) -> CatalogItem {
        let mut item = CatalogItem::new(id, name, CatalogItemType::Merchandise);
        item.category = Some(category.into());
        if let Some(count) = stock {
            item.track_inventory = true;
            item.total_stock = count;
        }
        item
    }

    #[test]
    fn own_selection_does_not_narrow_its_options() {
        let items = vec![
            product("1", "Gi", "Apparel", Some(0)),
            product("2", "Belt", "Apparel", Some(4)),
            product("3", "Mouthguard", "Gear", None),
        ];
        let filter = CatalogFilter {
            category: Some("Gear".into()),
            ..CatalogFilter::default()
        };
        assert_eq!(filter.available_categories(&items), vec!["Apparel", "Gear"]);
        assert_eq!(filter.available_stock_states(&items), vec![StockState::InStock]);
    }

    #[test]
    fn search_narrows_every_dimension() {
        let mut items = vec![
            product("1", "Gi", "Apparel", Some(0)),
            product("2", "Mouthguard", "Gear", None),
        ];
        items[1].sku = Some("MG-100".into());
        let filter = CatalogFilter {
            search: "mg-1".into(),
            ..CatalogFilter::default()
        };
        assert_eq!(filter.apply(&items).len(), 1);
        assert_eq!(filter.available_categories(&items), vec!["Gear"]);
    }
}
