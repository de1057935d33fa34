//! Declarative validation rules for bank records and their nested addresses.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{DEFAULT_EMAIL_PATTERN, DEFAULT_PINCODE_PATTERN};
use crate::domain::{AddressField, BankRecord, Catalog, FieldPath, RecordField};
use crate::errors::BankFormError;

static DEFAULT_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_EMAIL_PATTERN).expect("default email pattern compiles"));
static DEFAULT_PINCODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_PINCODE_PATTERN).expect("default pincode pattern compiles"));

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: FieldPath,
    pub message: String,
}

impl FieldError {
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered collection of field errors (form order, then address order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn get(&self, path: &FieldPath) -> Option<&FieldError> {
        self.errors.iter().find(|error| &error.path == path)
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Built-in validation helpers.
#[derive(Clone, Debug)]
pub enum Validator {
    Required,
    Pattern { regex: Regex, message: String },
    OneOf(Catalog),
}

impl Validator {
    pub fn pattern(regex: Regex, message: impl Into<String>) -> Self {
        Validator::Pattern {
            regex,
            message: message.into(),
        }
    }

    /// Blank values are left to `Required`; other validators judge the value as stored.
    fn check(&self, label: &str, value: &str) -> Result<(), String> {
        let trimmed = value.trim();
        match self {
            Validator::Required => {
                if trimmed.is_empty() {
                    Err(format!("{} is required", label))
                } else {
                    Ok(())
                }
            }
            Validator::Pattern { regex, message } => {
                if trimmed.is_empty() || regex.is_match(value) {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
            Validator::OneOf(catalog) => {
                if trimmed.is_empty() || catalog.contains(value) {
                    Ok(())
                } else {
                    Err(format!(
                        "{} must be one of: {}",
                        label,
                        catalog.labels().join(", ")
                    ))
                }
            }
        }
    }
}

/// Tunable constraints the schema is compiled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    pub email_pattern: String,
    pub pincode_pattern: Option<String>,
    pub ifsc_pattern: Option<String>,
    pub enforce_catalogs: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            email_pattern: DEFAULT_EMAIL_PATTERN.into(),
            pincode_pattern: Some(DEFAULT_PINCODE_PATTERN.into()),
            ifsc_pattern: None,
            enforce_catalogs: true,
        }
    }
}

#[derive(Clone, Debug)]
struct Rule<F> {
    field: F,
    validators: Vec<Validator>,
}

/// Field rules for the top-level record plus the per-address rules applied to
/// every element of `addresses`.
#[derive(Clone, Debug)]
pub struct ValidationSchema {
    record_rules: Vec<Rule<RecordField>>,
    address_rules: Vec<Rule<AddressField>>,
}

impl Default for ValidationSchema {
    fn default() -> Self {
        let options = SchemaOptions::default();
        Self::build(
            &options,
            DEFAULT_EMAIL.clone(),
            Some(DEFAULT_PINCODE.clone()),
            None,
        )
    }
}

impl ValidationSchema {
    /// Compiles the schema; invalid patterns are reported as configuration errors.
    pub fn new(options: &SchemaOptions) -> Result<Self, BankFormError> {
        let email = Regex::new(&options.email_pattern)?;
        let pincode = options
            .pincode_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()?;
        let ifsc = options.ifsc_pattern.as_deref().map(Regex::new).transpose()?;
        Ok(Self::build(options, email, pincode, ifsc))
    }

    fn build(
        options: &SchemaOptions,
        email: Regex,
        pincode: Option<Regex>,
        ifsc: Option<Regex>,
    ) -> Self {
        let choice = |catalog: Catalog| -> Vec<Validator> {
            let mut validators = vec![Validator::Required];
            if options.enforce_catalogs {
                validators.push(Validator::OneOf(catalog));
            }
            validators
        };

        let mut ifsc_validators = vec![Validator::Required];
        if let Some(regex) = ifsc {
            ifsc_validators.push(Validator::pattern(regex, "Invalid IFSC code"));
        }

        let mut pincode_validators = vec![Validator::Required];
        if let Some(regex) = pincode {
            pincode_validators.push(Validator::pattern(regex, "Pincode must contain digits only"));
        }

        let record_rules = vec![
            Rule {
                field: RecordField::BankName,
                validators: choice(Catalog::Bank),
            },
            Rule {
                field: RecordField::IfscCode,
                validators: ifsc_validators,
            },
            Rule {
                field: RecordField::BranchName,
                validators: vec![Validator::Required],
            },
            Rule {
                field: RecordField::AccountHolderName,
                validators: vec![Validator::Required],
            },
            Rule {
                field: RecordField::AccountNumber,
                validators: vec![Validator::Required],
            },
            Rule {
                field: RecordField::Email,
                validators: vec![
                    Validator::Required,
                    Validator::pattern(email, "Invalid email address"),
                ],
            },
        ];

        let address_rules = vec![
            Rule {
                field: AddressField::AddressLine1,
                validators: vec![Validator::Required],
            },
            Rule {
                field: AddressField::City,
                validators: choice(Catalog::City),
            },
            Rule {
                field: AddressField::State,
                validators: choice(Catalog::State),
            },
            Rule {
                field: AddressField::Country,
                validators: choice(Catalog::Country),
            },
            Rule {
                field: AddressField::Pincode,
                validators: pincode_validators,
            },
        ];

        Self {
            record_rules,
            address_rules,
        }
    }

    /// Runs every rule and returns all failures.
    pub fn errors(&self, record: &BankRecord) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for rule in &self.record_rules {
            let path = FieldPath::Record(rule.field);
            if let Some(message) = first_failure(&rule.validators, rule.field.label(), rule.field.get(record)) {
                errors.push(FieldError::new(path, message));
            }
        }
        for (index, address) in record.addresses.iter().enumerate() {
            for rule in &self.address_rules {
                let value = rule.field.get(address);
                if let Some(message) = first_failure(&rule.validators, rule.field.label(), value) {
                    errors.push(FieldError::new(FieldPath::address(index, rule.field), message));
                }
            }
        }
        if record.addresses.is_empty() {
            errors.push(FieldError::new(
                FieldPath::address(0, AddressField::AddressLine1),
                "At least one address is required",
            ));
        }
        errors
    }

    pub fn validate(&self, record: &BankRecord) -> Result<(), ValidationErrors> {
        self.errors(record).into_result()
    }

    /// Evaluates the rules attached to a single path.
    pub fn validate_field(&self, record: &BankRecord, path: &FieldPath) -> Option<FieldError> {
        let value = path.get(record)?;
        let (label, validators) = match path {
            FieldPath::Record(field) => (
                field.label(),
                self.record_rules
                    .iter()
                    .find(|rule| rule.field == *field)
                    .map(|rule| rule.validators.as_slice()),
            ),
            FieldPath::Address { field, .. } => (
                field.label(),
                self.address_rules
                    .iter()
                    .find(|rule| rule.field == *field)
                    .map(|rule| rule.validators.as_slice()),
            ),
        };
        let validators = validators?;
        first_failure(validators, label, value).map(|message| FieldError::new(*path, message))
    }
}

fn first_failure(validators: &[Validator], label: &str, value: &str) -> Option<String> {
    validators
        .iter()
        .find_map(|validator| validator.check(label, value).err())
}
