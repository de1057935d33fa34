mod common;

use std::fs;

use bank_details::{
    config::{Config, ConfigManager},
    domain::{Address, BankRecord},
    errors::BankFormError,
    storage::{JsonRecordStore, RecordStore},
};
use common::{setup_test_env, valid_record};
use serde_json::Value;
use tempfile::tempdir;

#[test]
fn stored_blob_uses_camel_case_field_names() {
    let (store, _config) = setup_test_env();
    let mut record = valid_record("Asha").with_id(0);
    record.addresses.push(
        Address::new("Flat 4", "Mulund", "Maharashtra", "India", "400080").with_line2("Near Park"),
    );
    store.write_all(&[record]).expect("write");

    let raw = fs::read_to_string(store.store_path()).expect("read blob");
    let json: Value = serde_json::from_str(&raw).expect("parse blob");
    let first = &json[0];
    assert_eq!(first["bankName"], "SBI");
    assert_eq!(first["accountHolderName"], "Asha");
    assert_eq!(first["id"], 0);
    assert_eq!(first["addresses"][0]["addressLine1"], "12 Station Road");
    assert_eq!(first["addresses"][0]["addressLine2"], "");
    assert_eq!(first["addresses"][1]["addressLine2"], "Near Park");
}

#[test]
fn records_without_ids_load_from_hand_written_blobs() {
    let (store, _config) = setup_test_env();
    let blob = r#"[{"bankName":"HDFC Bank","ifscCode":"HDFC0000001","branchName":"Ghatkopar",
        "accountHolderName":"Ravi","accountNumber":"42","email":"ravi@example.com",
        "addresses":[{"addressLine1":"1 Main St","city":"Ghatkopar","state":"Maharashtra",
        "country":"India","pincode":"400077"}]}]"#;
    fs::write(store.store_path(), blob).expect("seed blob");

    let records = store.read_all().expect("read");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, None);
    assert_eq!(records[0].addresses[0].address_line2, None);
}

#[test]
fn corrupted_blob_surfaces_as_storage_failure() {
    let (store, _config) = setup_test_env();
    fs::write(store.store_path(), "[{\"bankName\":").expect("seed garbage");
    match store.read_all() {
        Err(BankFormError::StorageFailure(message)) => assert!(message.contains("corrupted")),
        other => panic!("expected storage failure, got {other:?}"),
    }
}

#[test]
fn failed_write_preserves_previous_collection() {
    let (store, _config) = setup_test_env();
    store
        .write_all(&[valid_record("Kept").with_id(0)])
        .expect("initial write");
    let original = fs::read_to_string(store.store_path()).expect("read original");

    // A directory squatting on the temp file name makes the write fail.
    let tmp = store.store_path().with_extension("json.tmp");
    fs::create_dir_all(&tmp).expect("block temp path");

    let result = store.write_all(&[BankRecord::blank().with_id(7)]);
    assert!(result.is_err(), "expected write to fail when temp path is a directory");
    assert_eq!(
        fs::read_to_string(store.store_path()).expect("read after failure"),
        original
    );
}

#[test]
fn backups_are_pruned_to_retention() {
    let temp = tempdir().expect("temp dir");
    let store = JsonRecordStore::with_options(temp.path().join("data"), "bankFormData", 2)
        .expect("store");
    for count in 1..=4u64 {
        let records: Vec<_> = (0..count)
            .map(|id| valid_record("Holder").with_id(id))
            .collect();
        store.write_all(&records).expect("write");
    }

    let backups = store.list_backups().expect("list");
    assert_eq!(backups.len(), 2);
    assert!(backups.iter().all(|backup| backup.name.starts_with("bankFormData_")));

    // Newest first: the copies taken before the fourth and third writes.
    let restored = store.restore_backup(&backups[1].name).expect("restore oldest kept");
    assert_eq!(restored.len(), 2);
}

#[test]
fn storage_key_names_the_blob_file() {
    let temp = tempdir().expect("temp dir");
    let store = JsonRecordStore::with_options(temp.path().to_path_buf(), "branch ledger", 1)
        .expect("store");
    assert_eq!(store.key(), "branch_ledger");
    store.write_all(&[]).expect("write empty");
    assert!(temp.path().join("branch_ledger.json").exists());
    assert!(store.read_all().expect("read").is_empty());
}

#[test]
fn config_round_trips_through_manager() {
    let (_store, manager) = setup_test_env();
    assert_eq!(manager.load().expect("defaults"), Config::default());

    let mut config = Config::default();
    config.set_value("page_size", "25").expect("page size");
    config.set_value("ifsc_pattern", "^[A-Z]{4}0[A-Z0-9]{6}$").expect("ifsc");
    config
        .set_value("protected_address_index", "none")
        .expect("protected index");
    manager.save(&config).expect("save");

    let reloaded = ConfigManager::with_base_dir(manager.base_dir().to_path_buf())
        .expect("manager")
        .load()
        .expect("load");
    assert_eq!(reloaded.page_size, 25);
    assert_eq!(reloaded.ifsc_pattern.as_deref(), Some("^[A-Z]{4}0[A-Z0-9]{6}$"));
    assert_eq!(reloaded.address_policy().protected_index, None);
}

#[test]
fn config_rejects_unknown_keys_and_bad_values() {
    let mut config = Config::default();
    assert!(config.set_value("theme", "dark").is_err());
    assert!(config.set_value("page_size", "0").is_err());
    assert!(config.set_value("enforce_catalogs", "maybe").is_err());
    assert_eq!(config, Config::default());
}
