//! Addressing of individual form fields, e.g. `bankName` or `addresses.1.city`.

use std::fmt;
use std::str::FromStr;

use crate::domain::{Address, BankRecord, Catalog};
use crate::errors::BankFormError;

/// Top-level scalar fields of a [`BankRecord`], in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    BankName,
    IfscCode,
    BranchName,
    AccountHolderName,
    AccountNumber,
    Email,
}

impl RecordField {
    pub const ALL: [RecordField; 6] = [
        RecordField::BankName,
        RecordField::IfscCode,
        RecordField::BranchName,
        RecordField::AccountHolderName,
        RecordField::AccountNumber,
        RecordField::Email,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RecordField::BankName => "bankName",
            RecordField::IfscCode => "ifscCode",
            RecordField::BranchName => "branchName",
            RecordField::AccountHolderName => "accountHolderName",
            RecordField::AccountNumber => "accountNumber",
            RecordField::Email => "email",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordField::BankName => "Bank name",
            RecordField::IfscCode => "IFSC code",
            RecordField::BranchName => "Branch name",
            RecordField::AccountHolderName => "Account holder name",
            RecordField::AccountNumber => "Account number",
            RecordField::Email => "Email",
        }
    }

    pub fn catalog(self) -> Option<Catalog> {
        match self {
            RecordField::BankName => Some(Catalog::Bank),
            _ => None,
        }
    }

    pub fn get(self, record: &BankRecord) -> &str {
        match self {
            RecordField::BankName => &record.bank_name,
            RecordField::IfscCode => &record.ifsc_code,
            RecordField::BranchName => &record.branch_name,
            RecordField::AccountHolderName => &record.account_holder_name,
            RecordField::AccountNumber => &record.account_number,
            RecordField::Email => &record.email,
        }
    }

    fn slot(self, record: &mut BankRecord) -> &mut String {
        match self {
            RecordField::BankName => &mut record.bank_name,
            RecordField::IfscCode => &mut record.ifsc_code,
            RecordField::BranchName => &mut record.branch_name,
            RecordField::AccountHolderName => &mut record.account_holder_name,
            RecordField::AccountNumber => &mut record.account_number,
            RecordField::Email => &mut record.email,
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Fields of a single [`Address`], in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    AddressLine1,
    AddressLine2,
    City,
    State,
    Country,
    Pincode,
}

impl AddressField {
    pub const ALL: [AddressField; 6] = [
        AddressField::AddressLine1,
        AddressField::AddressLine2,
        AddressField::City,
        AddressField::State,
        AddressField::Country,
        AddressField::Pincode,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AddressField::AddressLine1 => "addressLine1",
            AddressField::AddressLine2 => "addressLine2",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::Country => "country",
            AddressField::Pincode => "pincode",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AddressField::AddressLine1 => "Address line 1",
            AddressField::AddressLine2 => "Address line 2",
            AddressField::City => "City",
            AddressField::State => "State",
            AddressField::Country => "Country",
            AddressField::Pincode => "Pincode",
        }
    }

    pub fn catalog(self) -> Option<Catalog> {
        match self {
            AddressField::City => Some(Catalog::City),
            AddressField::State => Some(Catalog::State),
            AddressField::Country => Some(Catalog::Country),
            _ => None,
        }
    }

    pub fn get(self, address: &Address) -> &str {
        match self {
            AddressField::AddressLine1 => &address.address_line1,
            AddressField::AddressLine2 => address.address_line2.as_deref().unwrap_or(""),
            AddressField::City => &address.city,
            AddressField::State => &address.state,
            AddressField::Country => &address.country,
            AddressField::Pincode => &address.pincode,
        }
    }

    fn set(self, address: &mut Address, value: String) {
        match self {
            AddressField::AddressLine1 => address.address_line1 = value,
            AddressField::AddressLine2 => {
                address.address_line2 = Some(value).filter(|line| !line.is_empty())
            }
            AddressField::City => address.city = value,
            AddressField::State => address.state = value,
            AddressField::Country => address.country = value,
            AddressField::Pincode => address.pincode = value,
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Path to one editable value of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Record(RecordField),
    Address { index: usize, field: AddressField },
}

impl FieldPath {
    pub fn address(index: usize, field: AddressField) -> Self {
        FieldPath::Address { index, field }
    }

    pub fn label(&self) -> String {
        match self {
            FieldPath::Record(field) => field.label().to_string(),
            FieldPath::Address { index, field } => {
                format!("{} (address {})", field.label(), index + 1)
            }
        }
    }

    pub fn catalog(&self) -> Option<Catalog> {
        match self {
            FieldPath::Record(field) => field.catalog(),
            FieldPath::Address { field, .. } => field.catalog(),
        }
    }

    /// Reads the value at this path; `None` when the address index is out of range.
    pub fn get<'a>(&self, record: &'a BankRecord) -> Option<&'a str> {
        match self {
            FieldPath::Record(field) => Some(field.get(record)),
            FieldPath::Address { index, field } => {
                record.addresses.get(*index).map(|address| field.get(address))
            }
        }
    }

    /// Stores `value` with surrounding whitespace removed.
    pub fn set(&self, record: &mut BankRecord, value: impl Into<String>) -> Result<(), BankFormError> {
        let raw = value.into();
        let value = raw.trim().to_string();
        match self {
            FieldPath::Record(field) => {
                *field.slot(record) = value;
                Ok(())
            }
            FieldPath::Address { index, field } => {
                let len = record.addresses.len();
                let address = record.addresses.get_mut(*index).ok_or_else(|| {
                    BankFormError::InvalidInput(format!(
                        "address {} does not exist (form has {})",
                        index, len
                    ))
                })?;
                field.set(address, value);
                Ok(())
            }
        }
    }

    /// Every path of the record in form order.
    pub fn all_for(record: &BankRecord) -> Vec<FieldPath> {
        let mut paths: Vec<FieldPath> = RecordField::ALL.into_iter().map(FieldPath::Record).collect();
        for index in 0..record.addresses.len() {
            paths.extend(
                AddressField::ALL
                    .into_iter()
                    .map(|field| FieldPath::address(index, field)),
            );
        }
        paths
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Record(field) => f.write_str(field.key()),
            FieldPath::Address { index, field } => {
                write!(f, "addresses.{}.{}", index, field.key())
            }
        }
    }
}

impl FromStr for FieldPath {
    type Err = BankFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Some(field) = RecordField::from_key(raw) {
            return Ok(FieldPath::Record(field));
        }
        let mut segments = raw.split('.');
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some("addresses"), Some(index), Some(key), None) => {
                let index = index.parse::<usize>().map_err(|_| {
                    BankFormError::InvalidInput(format!("invalid address index in `{}`", raw))
                })?;
                let field = AddressField::from_key(key).ok_or_else(|| {
                    BankFormError::InvalidInput(format!("unknown address field `{}`", key))
                })?;
                Ok(FieldPath::address(index, field))
            }
            _ => Err(BankFormError::InvalidInput(format!(
                "unknown field `{}`",
                raw
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_paths() {
        let path: FieldPath = "addresses.2.pincode".parse().expect("parse");
        assert_eq!(path, FieldPath::address(2, AddressField::Pincode));
        assert_eq!(path.to_string(), "addresses.2.pincode");
        assert_eq!(
            "email".parse::<FieldPath>().expect("parse"),
            FieldPath::Record(RecordField::Email)
        );
        assert!("addresses.x.city".parse::<FieldPath>().is_err());
        assert!("addresses.0.zip".parse::<FieldPath>().is_err());
        assert!("nickname".parse::<FieldPath>().is_err());
    }

    #[test]
    fn set_rejects_missing_address() {
        let mut record = BankRecord::blank();
        let path = FieldPath::address(1, AddressField::City);
        assert!(path.set(&mut record, "Thane").is_err());
        assert_eq!(path.get(&record), None);
    }

    #[test]
    fn empty_line2_is_stored_as_none() {
        let mut record = BankRecord::blank();
        let path = FieldPath::address(0, AddressField::AddressLine2);
        path.set(&mut record, "Flat 4").expect("set");
        assert_eq!(record.addresses[0].address_line2.as_deref(), Some("Flat 4"));
        path.set(&mut record, "").expect("clear");
        assert_eq!(record.addresses[0].address_line2, None);
    }

    #[test]
    fn set_trims_surrounding_whitespace() {
        let mut record = BankRecord::blank();
        FieldPath::address(0, AddressField::Pincode)
            .set(&mut record, " 400001")
            .expect("pincode");
        FieldPath::Record(RecordField::Email)
            .set(&mut record, " a@b.com ")
            .expect("email");
        assert_eq!(record.addresses[0].pincode, "400001");
        assert_eq!(record.email, "a@b.com");
    }
}
