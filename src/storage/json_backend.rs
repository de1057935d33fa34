use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::{tmp_path, write_atomic, DEFAULT_BACKUP_RETENTION, DEFAULT_STORAGE_KEY},
    domain::BankRecord,
    errors::{BankFormError, Result},
    utils::paths::{backup_dir_in, ensure_dir},
};

use super::RecordStore;

const STORE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

/// Describes a timestamped copy of the record collection.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
}

/// Record store persisted as one JSON array in `<data_dir>/<key>.json`.
///
/// Every overwrite first copies the previous file into `<data_dir>/backups`,
/// keeping the newest `retention` copies.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    key: String,
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonRecordStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        Self::with_options(data_dir, DEFAULT_STORAGE_KEY, DEFAULT_BACKUP_RETENTION)
    }

    pub fn with_options(data_dir: PathBuf, key: &str, retention: usize) -> Result<Self> {
        ensure_dir(&data_dir)?;
        let backups_dir = backup_dir_in(&data_dir);
        Ok(Self {
            key: canonical_key(key),
            data_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", self.key, STORE_EXTENSION))
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Lists backups newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", self.key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(STORE_EXTENSION) {
                continue;
            }
            let name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) if name.starts_with(&prefix) => name.to_string(),
                _ => continue,
            };
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                created_at: parse_backup_timestamp(&name),
                name,
                path,
                size_bytes,
            });
        }
        entries.sort_by_key(|info| Reverse((info.created_at, info.name.clone())));
        Ok(entries)
    }

    /// Replaces the active collection with the contents of a backup.
    ///
    /// The collection being replaced is itself backed up first.
    pub fn restore_backup(&self, backup_name: &str) -> Result<Vec<BankRecord>> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(BankFormError::StorageFailure(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let records = read_records(&path)?;
        self.write_all(&records)?;
        tracing::info!(backup = backup_name, count = records.len(), "restored record backup");
        Ok(records)
    }

    fn backup_existing_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        ensure_dir(&self.backups_dir)?;
        let backup_name = self.next_backup_name(Utc::now());
        fs::copy(path, self.backups_dir.join(&backup_name))?;
        tracing::debug!(backup = %backup_name, "backed up record store");
        self.prune_backups()
    }

    /// Names a backup after `now`, stepping forward a microsecond while the
    /// name is taken so earlier copies are never overwritten.
    fn next_backup_name(&self, now: DateTime<Utc>) -> String {
        let mut stamp = now;
        loop {
            let name = format!(
                "{}_{}.{}",
                self.key,
                stamp.format(BACKUP_TIMESTAMP_FORMAT),
                STORE_EXTENSION
            );
            if !self.backups_dir.join(&name).exists() {
                return name;
            }
            stamp += Duration::microseconds(1);
        }
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for entry in backups.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                tracing::warn!(backup = %entry.name, error = %err, "failed to prune record backup");
            }
        }
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    fn read_all(&self) -> Result<Vec<BankRecord>> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_records(&path)
    }

    fn write_all(&self, records: &[BankRecord]) -> Result<()> {
        let path = self.store_path();
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        self.backup_existing_file(&path)?;
        let json = serde_json::to_string_pretty(records)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(count = records.len(), path = %path.display(), "wrote record store");
        Ok(())
    }
}

fn read_records(path: &Path) -> Result<Vec<BankRecord>> {
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&data).map_err(|err| {
        BankFormError::StorageFailure(format!(
            "record store `{}` is corrupted: {}",
            path.display(),
            err
        ))
    })
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        DEFAULT_STORAGE_KEY.into()
    } else {
        sanitized
    }
}

/// Reads `<key>_YYYYmmdd_HHMMSS_ffffff.json`. Names without the microsecond
/// segment are accepted too.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", STORE_EXTENSION))?;
    let mut segments: Vec<&str> = stem.split('_').collect();
    let has_micros = segments.len() >= 4
        && segments[segments.len() - 2..]
            .iter()
            .all(|segment| is_digits(segment, 6));
    let micros = if has_micros { segments.pop() } else { None };
    if segments.len() < 3 {
        return None;
    }
    let time_part = segments[segments.len() - 1];
    let date_part = segments[segments.len() - 2];
    if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
        return None;
    }
    let raw = format!("{}{}{}", date_part, time_part, micros.unwrap_or("000000"));
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S%6f")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonRecordStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonRecordStore::with_options(temp.path().join("data"), "bankFormData", 2)
            .expect("json store");
        (store, temp)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (store, _guard) = store_with_temp_dir();
        assert!(store.read_all().expect("read").is_empty());
        assert!(store.list_backups().expect("list").is_empty());
    }

    #[test]
    fn write_then_read_returns_same_collection() {
        let (store, _guard) = store_with_temp_dir();
        let records = vec![BankRecord::blank().with_id(0), BankRecord::blank().with_id(1)];
        store.write_all(&records).expect("write");
        assert_eq!(store.read_all().expect("read"), records);
        assert!(store.store_path().ends_with("bankFormData.json"));
        assert!(!store.store_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupted_file_is_a_storage_failure() {
        let (store, _guard) = store_with_temp_dir();
        fs::write(store.store_path(), "{not json").expect("write garbage");
        assert!(matches!(
            store.read_all(),
            Err(BankFormError::StorageFailure(_))
        ));
    }

    #[test]
    fn overwrite_creates_backup_of_previous_collection() {
        let (store, _guard) = store_with_temp_dir();
        store
            .write_all(&[BankRecord::blank().with_id(0)])
            .expect("first write");
        store
            .write_all(&[BankRecord::blank().with_id(0), BankRecord::blank().with_id(1)])
            .expect("second write");

        let backups = store.list_backups().expect("list");
        assert_eq!(backups.len(), 1);
        assert!(backups[0].created_at.is_some());

        let restored = store.restore_backup(&backups[0].name).expect("restore");
        assert_eq!(restored.len(), 1);
        assert_eq!(store.read_all().expect("read").len(), 1);
    }

    #[test]
    fn parses_backup_timestamps() {
        let parsed = parse_backup_timestamp("bankFormData_20240102_030405.json").expect("timestamp");
        assert_eq!(parsed.to_rfc3339(), "2024-01-02T03:04:05+00:00");
        assert!(parse_backup_timestamp("bankFormData.json").is_none());

        let precise = parse_backup_timestamp("bankFormData_20240102_030405_000250.json")
            .expect("microsecond timestamp");
        assert_eq!(precise.to_rfc3339(), "2024-01-02T03:04:05.000250+00:00");
        assert!(precise > parsed);
    }

    #[test]
    fn writes_within_one_second_keep_distinct_backups() {
        let (store, _guard) = store_with_temp_dir();
        for count in 1..=3u64 {
            let records: Vec<_> = (0..count).map(|id| BankRecord::blank().with_id(id)).collect();
            store.write_all(&records).expect("write");
        }

        let backups = store.list_backups().expect("list");
        assert_eq!(backups.len(), 2);
        let sizes: Vec<usize> = backups
            .iter()
            .map(|backup| read_records(&backup.path).expect("backup").len())
            .collect();
        assert_eq!(sizes, vec![2, 1]);
    }

    #[test]
    fn taken_backup_names_step_forward() {
        let (store, _guard) = store_with_temp_dir();
        ensure_dir(store.backups_dir()).expect("backups dir");
        let now = Utc::now();
        let first = store.next_backup_name(now);
        fs::write(store.backups_dir().join(&first), "[]").expect("occupy name");
        let second = store.next_backup_name(now);
        assert_ne!(first, second);
        assert!(parse_backup_timestamp(&second) > parse_backup_timestamp(&first));
    }

    #[test]
    fn restoring_unknown_backup_fails() {
        let (store, _guard) = store_with_temp_dir();
        assert!(store.restore_backup("missing.json").is_err());
    }
}
