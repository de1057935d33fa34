pub mod catalog;
pub mod common;
pub mod fields;
pub mod record;

pub use catalog::{Catalog, OptionItem, BANK_OPTIONS, CITY_OPTIONS, COUNTRY_OPTIONS, STATE_OPTIONS};
pub use common::Displayable;
pub use fields::{AddressField, FieldPath, RecordField};
pub use record::{Address, BankRecord};
