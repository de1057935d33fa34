//! Fixed option catalogs backing the choice fields of the form.

use std::fmt;
use std::str::FromStr;

use crate::errors::BankFormError;

/// A selectable value and the label presented for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionItem {
    pub value: &'static str,
    pub label: &'static str,
}

impl OptionItem {
    const fn same(value: &'static str) -> Self {
        Self {
            value,
            label: value,
        }
    }
}

pub const BANK_OPTIONS: &[OptionItem] = &[
    OptionItem::same("Bank of Baroda"),
    OptionItem::same("HDFC Bank"),
    OptionItem::same("ICICI Bank"),
    OptionItem::same("IDFC First Bank"),
    OptionItem::same("Kotak Bank"),
    OptionItem::same("SBI"),
    OptionItem::same("Bank of Maharashtra"),
];

pub const CITY_OPTIONS: &[OptionItem] = &[
    OptionItem::same("Thane"),
    OptionItem::same("Mulund"),
    OptionItem::same("Bhandup"),
    OptionItem::same("Ghatkopar"),
];

pub const STATE_OPTIONS: &[OptionItem] = &[
    OptionItem::same("Maharashtra"),
    OptionItem::same("Delhi"),
    OptionItem::same("Karnataka"),
    OptionItem::same("Kashmir"),
];

pub const COUNTRY_OPTIONS: &[OptionItem] = &[
    OptionItem::same("India"),
    OptionItem::same("Dubai"),
    OptionItem::same("USA"),
];

/// Names the catalogs so callers can look them up by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    Bank,
    City,
    State,
    Country,
}

impl Catalog {
    pub const ALL: [Catalog; 4] = [Catalog::Bank, Catalog::City, Catalog::State, Catalog::Country];

    pub fn options(self) -> &'static [OptionItem] {
        match self {
            Catalog::Bank => BANK_OPTIONS,
            Catalog::City => CITY_OPTIONS,
            Catalog::State => STATE_OPTIONS,
            Catalog::Country => COUNTRY_OPTIONS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Catalog::Bank => "bank",
            Catalog::City => "city",
            Catalog::State => "state",
            Catalog::Country => "country",
        }
    }

    pub fn contains(self, value: &str) -> bool {
        self.options().iter().any(|item| item.value == value)
    }

    /// Resolves user input (value, label, or 1-based index) to a catalog value.
    pub fn resolve(self, input: &str) -> Option<&'static str> {
        let needle = input.trim();
        if let Ok(index) = needle.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|idx| self.options().get(idx))
                .map(|item| item.value);
        }
        self.options()
            .iter()
            .find(|item| {
                item.value.eq_ignore_ascii_case(needle) || item.label.eq_ignore_ascii_case(needle)
            })
            .map(|item| item.value)
    }

    pub fn labels(self) -> Vec<&'static str> {
        self.options().iter().map(|item| item.label).collect()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Catalog {
    type Err = BankFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bank" | "bankname" => Ok(Catalog::Bank),
            "city" => Ok(Catalog::City),
            "state" => Ok(Catalog::State),
            "country" => Ok(Catalog::Country),
            other => Err(BankFormError::InvalidInput(format!(
                "unknown catalog `{}` (expected bank, city, state or country)",
                other
            ))),
        }
    }
}
