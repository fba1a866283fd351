use dojo_admin::domain::transaction::FinanceTransaction;
use dojo_admin::finances::{
    EmptyState, FinancesTable, PurposeFilter, SortDirection, SortField, SortState,
};

fn tx(id: &str, date: &str, amount: &str, purpose: &str, method: &str) -> FinanceTransaction {
    FinanceTransaction {
        id: id.into(),
        date: date.into(),
        amount: amount.into(),
        purpose: purpose.into(),
        method: method.into(),
        payment_id: format!("pi_{id}"),
        notes: None,
    }
}

fn ledger() -> Vec<FinanceTransaction> {
    vec![
        tx("1", "Mar 05, 2024", "$150.00", "Membership Dues", "Card"),
        tx("2", "2024-01-15", "$45.00", "Merchandise", "Cash"),
        tx("3", "02/20/2024", "$1,200.00", "Seminar", "Card"),
        tx("4", "someday", "$20.00", "Merchandise", "Card"),
        tx("5", "2024-03-01", "$35.00", "Drop-in", "Cash"),
    ]
}

fn ids(table: &FinancesTable) -> Vec<String> {
    table.filtered().iter().map(|row| row.id.clone()).collect()
}

#[test]
fn date_sort_handles_mixed_formats_and_flips() {
    let mut table = FinancesTable::new(ledger());
    assert_eq!(table.sort(), None);
    assert_eq!(ids(&table), ["1", "2", "3", "4", "5"]);

    table.toggle_sort(SortField::Date);
    assert_eq!(ids(&table), ["2", "3", "5", "1", "4"]);

    table.toggle_sort(SortField::Date);
    assert_eq!(
        table.sort(),
        Some(SortState {
            field: SortField::Date,
            direction: SortDirection::Descending,
        })
    );
    assert_eq!(ids(&table), ["4", "1", "5", "3", "2"]);

    table.toggle_sort(SortField::Method);
    assert_eq!(table.sort().map(|sort| sort.direction), Some(SortDirection::Ascending));
}

#[test]
fn purpose_and_search_combine() {
    let mut table = FinancesTable::new(ledger());
    table.set_purpose(PurposeFilter::parse("Merchandise"));
    assert_eq!(ids(&table), ["2", "4"]);

    table.set_search("card");
    assert_eq!(ids(&table), ["4"]);

    table.set_purpose(PurposeFilter::parse("ALL"));
    assert_eq!(ids(&table), ["1", "3", "4"]);
}

#[test]
fn empty_states_distinguish_no_data_from_no_matches() {
    let empty = FinancesTable::new(Vec::new());
    assert_eq!(empty.empty_state(), Some(EmptyState::NoTransactions));
    assert_eq!(empty.page_count(), 0);
    assert_eq!(empty.current_page().rows.len(), 0);

    let mut table = FinancesTable::new(ledger());
    assert_eq!(table.empty_state(), None);
    table.set_search("refund");
    assert_eq!(table.empty_state(), Some(EmptyState::NoMatches));
    assert_eq!(
        table.current_page().empty.map(|state| state.message()),
        Some("No transactions match the current filters.")
    );

    table.clear_filters();
    assert_eq!(table.empty_state(), None);
    assert_eq!(table.search(), "");
}

#[test]
fn pages_follow_the_configured_size() {
    let mut table = FinancesTable::with_page_size(ledger(), 2);
    assert_eq!(table.page_count(), 3);
    let first = table.current_page();
    assert_eq!(first.total_matches, 5);
    assert_eq!(first.rows.len(), 2);

    table.set_page(2);
    assert_eq!(table.current_page().rows.len(), 1);
    assert!(!table.next_page());
    assert!(table.previous_page());
    assert_eq!(table.page(), 1);
}

#[test]
fn refreshing_keeps_filters_but_returns_to_the_first_page() {
    let mut table = FinancesTable::with_page_size(ledger(), 1);
    table.set_search("cash");
    table.next_page();
    assert_eq!(table.page(), 1);

    let mut refreshed = ledger();
    refreshed.push(tx("6", "2024-04-02", "$60.00", "Private Lesson", "Cash"));
    table.replace_transactions(refreshed);
    assert_eq!(table.page(), 0);
    assert_eq!(table.search(), "cash");
    assert_eq!(ids(&table), ["2", "5", "6"]);
    assert!(table
        .available_purposes()
        .contains(&"Private Lesson".to_string()));
}
