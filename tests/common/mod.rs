#![allow(dead_code)]

use std::sync::Mutex;

use bank_details::{
    config::ConfigManager,
    domain::{Address, BankRecord},
    form::FormController,
    storage::{JsonRecordStore, RecordStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated record store and config manager for each test.
pub fn setup_test_env() -> (JsonRecordStore, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let store = JsonRecordStore::with_options(base.join("data"), "bankFormData", 3)
        .expect("create json record store");
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");

    (store, config_manager)
}

pub fn valid_record(holder: &str) -> BankRecord {
    BankRecord {
        bank_name: "SBI".into(),
        ifsc_code: "SBIN0001234".into(),
        branch_name: "Thane West".into(),
        account_holder_name: holder.into(),
        account_number: "1234567890".into(),
        email: "holder@example.com".into(),
        addresses: vec![Address::new("12 Station Road", "Thane", "Maharashtra", "India", "400601")],
        id: None,
    }
}

/// Types a complete, valid record into the form field by field.
pub fn fill_valid<S: RecordStore>(form: &mut FormController<S>, holder: &str) {
    let fields = [
        ("bankName", "SBI"),
        ("ifscCode", "SBIN0001234"),
        ("branchName", "Thane West"),
        ("accountHolderName", holder),
        ("accountNumber", "1234567890"),
        ("email", "holder@example.com"),
        ("addresses.0.addressLine1", "12 Station Road"),
        ("addresses.0.city", "Thane"),
        ("addresses.0.state", "Maharashtra"),
        ("addresses.0.country", "India"),
        ("addresses.0.pincode", "400601"),
    ];
    for (path, value) in fields {
        form.set_field_str(path, value).expect("set field");
    }
}
