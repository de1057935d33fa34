use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::BankFormError,
    form::AddressPolicy,
    utils::paths::{app_data_dir, config_file_in, data_dir_in, ensure_dir},
    validation::SchemaOptions,
};

const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_STORAGE_KEY: &str = "bankFormData";
pub const DEFAULT_BACKUP_RETENTION: usize = 5;
pub const DEFAULT_PINCODE_PATTERN: &str = r"^[0-9]+$";
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";

/// User-adjustable settings for the form, store and list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_page_size")]
    pub page_size: usize,
    #[serde(default = "Config::default_storage_key")]
    pub storage_key: String,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default = "Config::default_pincode_pattern")]
    pub pincode_pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifsc_pattern: Option<String>,
    #[serde(default = "Config::default_email_pattern")]
    pub email_pattern: String,
    #[serde(default = "Config::default_true")]
    pub enforce_catalogs: bool,
    #[serde(default = "Config::default_min_addresses")]
    pub min_addresses: usize,
    #[serde(default = "Config::default_protected_index")]
    pub protected_address_index: Option<usize>,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    /// Overrides the record store directory. Defaults to `<base>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            storage_key: DEFAULT_STORAGE_KEY.into(),
            backup_retention: DEFAULT_BACKUP_RETENTION,
            pincode_pattern: DEFAULT_PINCODE_PATTERN.into(),
            ifsc_pattern: None,
            email_pattern: DEFAULT_EMAIL_PATTERN.into(),
            enforce_catalogs: true,
            min_addresses: 1,
            protected_address_index: Some(0),
            ui_color_enabled: true,
            data_dir: None,
        }
    }
}

impl Config {
    fn default_page_size() -> usize {
        DEFAULT_PAGE_SIZE
    }

    fn default_storage_key() -> String {
        DEFAULT_STORAGE_KEY.into()
    }

    fn default_backup_retention() -> usize {
        DEFAULT_BACKUP_RETENTION
    }

    fn default_pincode_pattern() -> String {
        DEFAULT_PINCODE_PATTERN.into()
    }

    fn default_email_pattern() -> String {
        DEFAULT_EMAIL_PATTERN.into()
    }

    fn default_true() -> bool {
        true
    }

    fn default_min_addresses() -> usize {
        1
    }

    fn default_protected_index() -> Option<usize> {
        Some(0)
    }

    pub fn schema_options(&self) -> SchemaOptions {
        SchemaOptions {
            email_pattern: self.email_pattern.clone(),
            pincode_pattern: Some(self.pincode_pattern.clone()).filter(|p| !p.is_empty()),
            ifsc_pattern: self.ifsc_pattern.clone().filter(|p| !p.is_empty()),
            enforce_catalogs: self.enforce_catalogs,
        }
    }

    pub fn address_policy(&self) -> AddressPolicy {
        AddressPolicy {
            min_addresses: self.min_addresses.max(1),
            protected_index: self.protected_address_index,
        }
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| data_dir_in(base))
    }

    /// Applies a `config set <key> <value>` style update.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), BankFormError> {
        let value = value.trim();
        match key {
            "page_size" => {
                let size = parse_usize(key, value)?;
                if size == 0 {
                    return Err(BankFormError::Config("page_size must be at least 1".into()));
                }
                self.page_size = size;
            }
            "storage_key" => {
                if value.is_empty() {
                    return Err(BankFormError::Config("storage_key cannot be empty".into()));
                }
                self.storage_key = value.to_string();
            }
            "backup_retention" => self.backup_retention = parse_usize(key, value)?.max(1),
            "pincode_pattern" => self.pincode_pattern = value.to_string(),
            "ifsc_pattern" => {
                self.ifsc_pattern = match value {
                    "" | "none" => None,
                    pattern => Some(pattern.to_string()),
                }
            }
            "email_pattern" => self.email_pattern = value.to_string(),
            "enforce_catalogs" => self.enforce_catalogs = parse_bool(key, value)?,
            "min_addresses" => self.min_addresses = parse_usize(key, value)?.max(1),
            "protected_address_index" => {
                self.protected_address_index = match value {
                    "none" | "" => None,
                    raw => Some(parse_usize(key, raw)?),
                }
            }
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(key, value)?,
            "data_dir" => {
                self.data_dir = match value {
                    "" | "none" => None,
                    raw => Some(PathBuf::from(raw)),
                }
            }
            other => {
                return Err(BankFormError::Config(format!(
                    "unknown configuration key `{}`",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Key/value pairs in display order for `config show`.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page_size", self.page_size.to_string()),
            ("storage_key", self.storage_key.clone()),
            ("backup_retention", self.backup_retention.to_string()),
            ("pincode_pattern", self.pincode_pattern.clone()),
            (
                "ifsc_pattern",
                self.ifsc_pattern.clone().unwrap_or_else(|| "none".into()),
            ),
            ("email_pattern", self.email_pattern.clone()),
            ("enforce_catalogs", self.enforce_catalogs.to_string()),
            ("min_addresses", self.min_addresses.to_string()),
            (
                "protected_address_index",
                self.protected_address_index
                    .map(|idx| idx.to_string())
                    .unwrap_or_else(|| "none".into()),
            ),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            (
                "data_dir",
                self.data_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "default".into()),
            ),
        ]
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, BankFormError> {
    value
        .parse::<usize>()
        .map_err(|_| BankFormError::Config(format!("{} expects a whole number", key)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, BankFormError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(BankFormError::Config(format!("{} expects true or false", key))),
    }
}

/// Loads and saves [`Config`] under the application base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BankFormError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BankFormError> {
        ensure_dir(&base)?;
        let path = config_file_in(&base);
        Ok(Self { base, path })
    }

    pub fn load(&self) -> Result<Config, BankFormError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| BankFormError::Config(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), BankFormError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<(), BankFormError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
