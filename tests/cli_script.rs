use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn script_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bank_details_cli").unwrap();
    cmd.env("BANK_DETAILS_CLI_SCRIPT", "1")
        .env("BANK_DETAILS_HOME", home.path())
        .env("RUST_LOG", "off");
    cmd
}

const VALID_RECORD: &str = "\
set bankName 6
set ifscCode X
set branchName B
set accountHolderName \"Asha Rao\"
set accountNumber 123
set email a@b.com
set addresses.0.addressLine1 L1
set addresses.0.city thane
set addresses.0.state Maharashtra
set addresses.0.country India
set addresses.0.pincode 400001
";

#[test]
fn script_mode_creates_a_record_and_lists_it() {
    let home = TempDir::new().unwrap();
    let input = format!("{VALID_RECORD}submit\nexit\n");

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Record 0 created"))
        .stdout(contains("Asha Rao"))
        .stdout(contains("Page 1 of 1"));

    let json = std::fs::read_to_string(home.path().join("data").join("bankFormData.json")).unwrap();
    assert!(json.contains("\"bankName\": \"SBI\""));
    assert!(json.contains("\"city\": \"Thane\""));
    assert!(json.contains("\"id\": 0"));
}

#[test]
fn blank_submission_is_rejected() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("submit\nexit\n")
        .assert()
        .success()
        .stdout(contains("Form has 11 invalid field(s); nothing was saved"))
        .stdout(contains("Bank name is required"));

    assert!(!home.path().join("data").join("bankFormData.json").exists());
}

#[test]
fn editing_updates_the_stored_record() {
    let home = TempDir::new().unwrap();
    let input = format!(
        "{VALID_RECORD}submit\nedit 0\nset branchName \"Mulund East\"\nsubmit\nexit\n"
    );

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Editing record 0"))
        .stdout(contains("Record 0 updated"));

    let json = std::fs::read_to_string(home.path().join("data").join("bankFormData.json")).unwrap();
    assert!(json.contains("Mulund East"));
    assert!(!json.contains("\"id\": 1"));
}

#[test]
fn eager_field_errors_are_reported() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("set email nope\nset addresses.0.city Atlantis\nexit\n")
        .assert()
        .success()
        .stdout(contains("email: Invalid email address"))
        .stdout(contains("addresses.0.city: City must be one of"));
}

#[test]
fn primary_address_cannot_be_removed() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("add-address\nremove-address 0\nremove-address 1\nexit\n")
        .assert()
        .success()
        .stdout(contains("Added address 1"))
        .stdout(contains("Removed address 1 (1 remaining)"))
        .stderr(contains("address 0 is the primary address"));
}

#[test]
fn unknown_commands_get_suggestions() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("lst\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `lst`"))
        .stdout(contains("Did you mean `list`?"));
}

#[test]
fn missing_record_falls_back_to_blank_form() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("edit 9\nshow\nexit\n")
        .assert()
        .success()
        .stdout(contains("Record 9 not found; showing a blank form"))
        .stdout(contains("addresses.0.pincode"));
}

#[test]
fn config_changes_persist_between_runs() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("config set page_size 3\nexit\n")
        .assert()
        .success()
        .stdout(contains("Set page_size = 3"));

    script_command(&home)
        .write_stdin("config show\nexit\n")
        .assert()
        .success()
        .stdout(contains("page_size").and(contains("3")));
}

#[test]
fn options_lists_catalog_labels() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("options country\nexit\n")
        .assert()
        .success()
        .stdout(contains("Options: country"))
        .stdout(contains("3. USA"));
}
