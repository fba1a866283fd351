use dojo_admin::catalog::CatalogFilter;
use dojo_admin::domain::catalog::{CatalogItem, CatalogItemType, StockState};

fn item(
    id: &str,
    name: &str,
    item_type: CatalogItemType,
    category: Option<&str>,
    stock: Option<i64>,
) -> CatalogItem {
    let mut item = CatalogItem::new(id, name, item_type);
    item.category = category.map(str::to_string);
    if let Some(count) = stock {
        item.track_inventory = true;
        item.total_stock = count;
    }
    item
}

fn catalog() -> Vec<CatalogItem> {
    vec![
        item("p1", "Kimono A2", CatalogItemType::Merchandise, Some("Apparel"), Some(3)),
        item("p2", "Rash Guard", CatalogItemType::Merchandise, Some("Apparel"), Some(0)),
        item("p3", "Seminar Pass", CatalogItemType::EventAccess, Some("Events"), None),
        item("p4", "Mouthguard", CatalogItemType::Merchandise, Some(" Gear "), None),
        item("p5", "Open Mat Pass", CatalogItemType::EventAccess, None, None),
    ]
}

#[test]
fn options_narrow_to_what_other_filters_allow() {
    let items = catalog();
    let filter = CatalogFilter {
        item_type: Some(CatalogItemType::EventAccess),
        ..CatalogFilter::default()
    };
    let options = filter.available_options(&items);
    assert_eq!(options.categories, vec!["Events".to_string()]);
    assert_eq!(options.stock_states, vec![StockState::InStock]);
    assert_eq!(
        options.item_types,
        vec![CatalogItemType::Merchandise, CatalogItemType::EventAccess]
    );
}

#[test]
fn stock_filter_uses_derived_state() {
    let items = catalog();
    let filter = CatalogFilter {
        stock: Some(StockState::OutOfStock),
        ..CatalogFilter::default()
    };
    let names: Vec<&str> = filter.apply(&items).iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Rash Guard"]);
    assert_eq!(filter.available_item_types(&items), vec![CatalogItemType::Merchandise]);
    assert_eq!(filter.available_categories(&items), vec!["Apparel".to_string()]);
}

#[test]
fn categories_are_trimmed_and_blank_ones_skipped() {
    let items = catalog();
    let filter = CatalogFilter::default();
    assert_eq!(
        filter.available_categories(&items),
        vec!["Apparel".to_string(), "Events".to_string(), "Gear".to_string()]
    );

    let gear = CatalogFilter {
        category: Some("Gear".into()),
        ..CatalogFilter::default()
    };
    assert_eq!(gear.apply(&items).len(), 1);
}

#[test]
fn clearing_restores_every_item() {
    let items = catalog();
    let mut filter = CatalogFilter {
        search: "pass".into(),
        item_type: Some(CatalogItemType::EventAccess),
        ..CatalogFilter::default()
    };
    assert!(filter.is_active());
    assert_eq!(filter.apply(&items).len(), 2);

    filter.clear();
    assert!(!filter.is_active());
    assert_eq!(filter.apply(&items).len(), items.len());
}
