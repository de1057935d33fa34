//! Paginated list of stored records.

use crate::{
    domain::BankRecord,
    errors::{BankFormError, Result},
    form::{NavigationContext, Route},
    storage::RecordStore,
};

/// 1-indexed page position over a collection of `total_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: usize,
    total_items: usize,
}

impl Paginator {
    pub fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// At least one page, even for an empty collection.
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Moves back one page; a no-op on the first page.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Moves forward one page; a no-op on the last page.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Jumps to `page`, clamped into `1..=total_pages`.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    /// Index range of the current page within the collection.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages())
    }
}

/// Summary columns shown for each record in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub position: usize,
    pub id: Option<u64>,
    pub bank_name: String,
    pub branch_name: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub email: String,
    pub address_count: usize,
}

impl RecordRow {
    pub const HEADERS: [&'static str; 8] = [
        "#", "ID", "Bank", "Branch", "Holder", "Account", "Email", "Addresses",
    ];

    fn from_record(position: usize, record: &BankRecord) -> Self {
        Self {
            position,
            id: record.id,
            bank_name: record.bank_name.clone(),
            branch_name: record.branch_name.clone(),
            account_holder_name: record.account_holder_name.clone(),
            account_number: record.account_number.clone(),
            email: record.email.clone(),
            address_count: record.addresses.len(),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.position.to_string(),
            self.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            self.bank_name.clone(),
            self.branch_name.clone(),
            self.account_holder_name.clone(),
            self.account_number.clone(),
            self.email.clone(),
            self.address_count.to_string(),
        ]
    }
}

/// Snapshot of the store sliced into pages.
#[derive(Debug, Clone)]
pub struct RecordListView {
    records: Vec<BankRecord>,
    paginator: Paginator,
}

impl RecordListView {
    pub fn new(records: Vec<BankRecord>, page_size: usize) -> Self {
        let paginator = Paginator::new(records.len(), page_size);
        Self { records, paginator }
    }

    /// Reads the full collection from the store.
    pub fn load(store: &dyn RecordStore, page_size: usize) -> Result<Self> {
        Ok(Self::new(store.read_all()?, page_size))
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn paginator_mut(&mut self) -> &mut Paginator {
        &mut self.paginator
    }

    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn page_records(&self) -> &[BankRecord] {
        &self.records[self.paginator.range()]
    }

    /// Rows for the current page; positions are 1-based over the whole list.
    pub fn rows(&self) -> Vec<RecordRow> {
        let range = self.paginator.range();
        let offset = range.start;
        self.records[range]
            .iter()
            .enumerate()
            .map(|(idx, record)| RecordRow::from_record(offset + idx + 1, record))
            .collect()
    }

    /// Route that opens the record at list `position` (1-based) for editing.
    pub fn edit_route(&self, position: usize) -> Result<Route> {
        let record = position
            .checked_sub(1)
            .and_then(|idx| self.records.get(idx))
            .ok_or_else(|| {
                BankFormError::InvalidInput(format!(
                    "no record at position {} (list has {})",
                    position,
                    self.records.len()
                ))
            })?;
        let id = record.id.ok_or_else(|| {
            BankFormError::InvalidInput(format!("record at position {} has no id", position))
        })?;
        Ok(Route::Form(NavigationContext::edit(id)))
    }
}
