//! Client-side search, filter, sort, and pagination over the finances ledger.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::transaction::FinanceTransaction;
use crate::errors::DojoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Date,
    Amount,
    Purpose,
    Method,
    PaymentId,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Date,
        SortField::Amount,
        SortField::Purpose,
        SortField::Method,
        SortField::PaymentId,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Amount => "amount",
            SortField::Purpose => "purpose",
            SortField::Method => "method",
            SortField::PaymentId => "payment-id",
        }
    }
}

impl FromStr for SortField {
    type Err = DojoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "date" => Ok(SortField::Date),
            "amount" => Ok(SortField::Amount),
            "purpose" => Ok(SortField::Purpose),
            "method" => Ok(SortField::Method),
            "payment-id" | "paymentid" | "payment" => Ok(SortField::PaymentId),
            other => Err(DojoError::InvalidInput(format!(
                "unknown sort field `{other}` (expected date, amount, purpose, method, or payment-id)"
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PurposeFilter {
    #[default]
    All,
    Exact(String),
}

impl PurposeFilter {
    /// `"all"` (any case) selects every purpose.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            PurposeFilter::All
        } else {
            PurposeFilter::Exact(trimmed.to_string())
        }
    }

    fn matches(&self, purpose: &str) -> bool {
        match self {
            PurposeFilter::All => true,
            PurposeFilter::Exact(expected) => purpose == expected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoTransactions,
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoTransactions => "No transactions yet.",
            EmptyState::NoMatches => "No transactions match the current filters.",
        }
    }
}

/// One rendered page of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancesPage<'a> {
    pub rows: Vec<&'a FinanceTransaction>,
    pub page: usize,
    pub page_count: usize,
    pub total_matches: usize,
    pub empty: Option<EmptyState>,
}

#[derive(Debug, Clone)]
pub struct FinancesTable {
    transactions: Vec<FinanceTransaction>,
    available_purposes: Vec<String>,
    search: String,
    purpose: PurposeFilter,
    sort: Option<SortState>,
    page: usize,
    page_size: usize,
}

impl FinancesTable {
    pub fn new(transactions: Vec<FinanceTransaction>) -> Self {
        Self::with_page_size(transactions, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(transactions: Vec<FinanceTransaction>, page_size: usize) -> Self {
        let available_purposes = collect_purposes(&transactions);
        Self {
            transactions,
            available_purposes,
            search: String::new(),
            purpose: PurposeFilter::All,
            sort: None,
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Swaps in a refreshed source list, keeping filters but returning to the
    /// first page.
    pub fn replace_transactions(&mut self, transactions: Vec<FinanceTransaction>) {
        self.available_purposes = collect_purposes(&transactions);
        self.transactions = transactions;
        self.page = 0;
    }

    pub fn transactions(&self) -> &[FinanceTransaction] {
        &self.transactions
    }

    /// Distinct, sorted, non-empty purposes of the unfiltered source.
    pub fn available_purposes(&self) -> &[String] {
        &self.available_purposes
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn purpose(&self) -> &PurposeFilter {
        &self.purpose
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 0;
    }

    pub fn set_purpose(&mut self, purpose: PurposeFilter) {
        self.purpose = purpose;
        self.page = 0;
    }

    /// Header click: the same field flips direction, a new field starts
    /// ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = Some(match self.sort {
            Some(current) if current.field == field => SortState {
                field,
                direction: current.direction.flipped(),
            },
            _ => SortState {
                field,
                direction: SortDirection::Ascending,
            },
        });
        self.page = 0;
        debug!(sort = ?self.sort, "finances sort changed");
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.purpose = PurposeFilter::All;
        self.sort = None;
        self.page = 0;
    }

    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size)
    }

    /// Jumps to `page`, clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count().saturating_sub(1));
    }

    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Matching rows in display order, before pagination.
    pub fn filtered(&self) -> Vec<&FinanceTransaction> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&FinanceTransaction> = self
            .transactions
            .iter()
            .filter(|tx| self.purpose.matches(&tx.purpose))
            .filter(|tx| needle.is_empty() || matches_search(tx, &needle))
            .collect();
        if let Some(sort) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = compare(a, b, sort.field);
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.transactions.is_empty() {
            Some(EmptyState::NoTransactions)
        } else if self.filtered().is_empty() {
            Some(EmptyState::NoMatches)
        } else {
            None
        }
    }

    pub fn current_page(&self) -> FinancesPage<'_> {
        let filtered = self.filtered();
        let total_matches = filtered.len();
        let page_count = total_matches.div_ceil(self.page_size);
        let rows = filtered
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect();
        FinancesPage {
            rows,
            page: self.page,
            page_count,
            total_matches,
            empty: self.empty_state(),
        }
    }
}

fn collect_purposes(transactions: &[FinanceTransaction]) -> Vec<String> {
    transactions
        .iter()
        .map(|tx| tx.purpose.trim())
        .filter(|purpose| !purpose.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn matches_search(tx: &FinanceTransaction, needle: &str) -> bool {
    [
        Some(tx.date.as_str()),
        Some(tx.amount.as_str()),
        Some(tx.purpose.as_str()),
        Some(tx.method.as_str()),
        Some(tx.payment_id.as_str()),
        tx.notes.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

fn compare(a: &FinanceTransaction, b: &FinanceTransaction, field: SortField) -> Ordering {
    match field {
        SortField::Date => compare_parsed(a.parsed_date(), b.parsed_date()),
        SortField::Amount => compare_parsed(a.parsed_amount(), b.parsed_amount()),
        SortField::Purpose => compare_text(&a.purpose, &b.purpose),
        SortField::Method => compare_text(&a.method, &b.method),
        SortField::PaymentId => compare_text(&a.payment_id, &b.payment_id),
    }
}

// Unparseable values sort after every parseable one.
fn compare_parsed<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
