pub mod json_backend;
pub mod memory;

use crate::{
    domain::BankRecord,
    errors::{BankFormError, Result},
};

/// Whole-collection persistence for submitted records.
///
/// There is no partial update primitive: every write replaces the stored
/// collection, and nothing isolates a `read_all` from a later `write_all`.
pub trait RecordStore {
    /// Returns every stored record in insertion order; empty when nothing is stored.
    fn read_all(&self) -> Result<Vec<BankRecord>>;

    /// Replaces the stored collection with `records`.
    fn write_all(&self, records: &[BankRecord]) -> Result<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn read_all(&self) -> Result<Vec<BankRecord>> {
        (**self).read_all()
    }

    fn write_all(&self, records: &[BankRecord]) -> Result<()> {
        (**self).write_all(records)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn read_all(&self) -> Result<Vec<BankRecord>> {
        (**self).read_all()
    }

    fn write_all(&self, records: &[BankRecord]) -> Result<()> {
        (**self).write_all(records)
    }
}

/// Looks up a stored record by id.
pub fn find_record(store: &dyn RecordStore, id: u64) -> Result<BankRecord> {
    store
        .read_all()?
        .into_iter()
        .find(|record| record.id == Some(id))
        .ok_or(BankFormError::RecordNotFound(id))
}

/// Next id for a created record: 0 for an empty collection, otherwise the
/// largest existing id (missing ids count as 0) plus one.
pub fn next_record_id(records: &[BankRecord]) -> u64 {
    if records.is_empty() {
        return 0;
    }
    records
        .iter()
        .map(|record| record.id.unwrap_or(0))
        .max()
        .unwrap_or(0)
        + 1
}

pub use json_backend::{BackupInfo, JsonRecordStore};
pub use memory::MemoryRecordStore;

#[cfg(test)]
mod tests {
    use super::*;

    fn with_id(id: Option<u64>) -> BankRecord {
        BankRecord {
            id,
            ..BankRecord::blank()
        }
    }

    #[test]
    fn next_id_starts_at_zero() {
        assert_eq!(next_record_id(&[]), 0);
    }

    #[test]
    fn next_id_follows_the_maximum() {
        let records = vec![with_id(Some(0)), with_id(Some(7)), with_id(Some(2))];
        assert_eq!(next_record_id(&records), 8);
    }

    #[test]
    fn missing_ids_count_as_zero() {
        assert_eq!(next_record_id(&[with_id(None)]), 1);
    }

    #[test]
    fn find_record_reports_missing_ids() {
        let store = MemoryRecordStore::with_records(vec![with_id(Some(3))]);
        assert_eq!(find_record(&store, 3).expect("found").id, Some(3));
        assert!(matches!(
            find_record(&store, 4),
            Err(BankFormError::RecordNotFound(4))
        ));
    }
}
