use std::sync::RwLock;

use crate::{
    domain::BankRecord,
    errors::{BankFormError, Result},
};

use super::RecordStore;

/// In-process store; also stands in when no durable storage is available.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<BankRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<BankRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn read_all(&self) -> Result<Vec<BankRecord>> {
        self.records
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| BankFormError::StorageFailure("record store lock poisoned".into()))
    }

    fn write_all(&self, records: &[BankRecord]) -> Result<()> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| BankFormError::StorageFailure("record store lock poisoned".into()))?;
        *guard = records.to_vec();
        Ok(())
    }
}
