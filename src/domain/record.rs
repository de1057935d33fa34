use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::common::Displayable;

/// Postal address embedded in a [`BankRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub address_line1: String,
    /// Written as `""` when absent; an empty string reads back as `None`.
    #[serde(
        default,
        serialize_with = "serialize_line2",
        deserialize_with = "deserialize_line2"
    )]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub pincode: String,
}

fn serialize_line2<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

fn deserialize_line2<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|line| !line.is_empty()))
}

impl Address {
    /// Blank address used when the form opens or an entry is appended.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn new(
        address_line1: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        pincode: impl Into<String>,
    ) -> Self {
        Self {
            address_line1: address_line1.into(),
            address_line2: None,
            city: city.into(),
            state: state.into(),
            country: country.into(),
            pincode: pincode.into(),
        }
    }

    pub fn with_line2(mut self, line2: impl Into<String>) -> Self {
        self.address_line2 = Some(line2.into());
        self
    }
}

impl Displayable for Address {
    fn display_label(&self) -> String {
        let mut parts = vec![self.address_line1.as_str()];
        if let Some(line2) = self.address_line2.as_deref().filter(|l| !l.is_empty()) {
            parts.push(line2);
        }
        parts.extend([
            self.city.as_str(),
            self.state.as_str(),
            self.country.as_str(),
            self.pincode.as_str(),
        ]);
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One submitted bank-details entry.
///
/// `id` stays `None` until the record is first committed to a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BankRecord {
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub ifsc_code: String,
    #[serde(default)]
    pub branch_name: String,
    #[serde(default)]
    pub account_holder_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_addresses")]
    pub addresses: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

fn default_addresses() -> Vec<Address> {
    vec![Address::blank()]
}

impl Default for BankRecord {
    fn default() -> Self {
        Self::blank()
    }
}

impl BankRecord {
    /// Blank template: every string empty and a single blank address.
    pub fn blank() -> Self {
        Self {
            bank_name: String::new(),
            ifsc_code: String::new(),
            branch_name: String::new(),
            account_holder_name: String::new(),
            account_number: String::new(),
            email: String::new(),
            addresses: default_addresses(),
            id: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses.first()
    }
}

impl Displayable for BankRecord {
    fn display_label(&self) -> String {
        let id = self
            .id
            .map(|id| format!("#{id}"))
            .unwrap_or_else(|| "(new)".into());
        format!(
            "{} {} - {} ({})",
            id, self.bank_name, self.account_holder_name, self.account_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_template_has_one_empty_address() {
        let record = BankRecord::blank();
        assert_eq!(record.addresses, vec![Address::blank()]);
        assert!(record.bank_name.is_empty());
        assert!(!record.is_persisted());
    }

    #[test]
    fn serializes_with_camel_case_keys_and_omits_missing_id() {
        let record = BankRecord::blank();
        let json = serde_json::to_value(&record).expect("serialize");
        assert!(json.get("bankName").is_some());
        assert!(json.get("accountHolderName").is_some());
        assert!(json.get("id").is_none());
        let address = &json["addresses"][0];
        assert!(address.get("addressLine1").is_some());
        assert_eq!(address["addressLine2"], "");
    }

    #[test]
    fn decodes_stored_records_without_optional_fields() {
        let raw = r#"{
            "bankName": "SBI",
            "ifscCode": "SBIN0001",
            "branchName": "Thane West",
            "accountHolderName": "Asha",
            "accountNumber": "123",
            "email": "a@b.com",
            "addresses": [{
                "addressLine1": "L1",
                "addressLine2": "",
                "city": "Thane",
                "state": "Maharashtra",
                "country": "India",
                "pincode": "400001"
            }],
            "id": 4
        }"#;
        let record: BankRecord = serde_json::from_str(raw).expect("decode");
        assert_eq!(record.id, Some(4));
        assert_eq!(record.addresses[0].address_line2, None);
        assert_eq!(record.addresses[0].city, "Thane");
    }

    #[test]
    fn line2_round_trips_and_tolerates_missing_or_null() {
        let address = Address::new("L1", "Thane", "Maharashtra", "India", "400001").with_line2("Wing B");
        let json = serde_json::to_value(&address).expect("serialize");
        assert_eq!(json["addressLine2"], "Wing B");
        let decoded: Address = serde_json::from_value(json).expect("decode");
        assert_eq!(decoded.address_line2.as_deref(), Some("Wing B"));

        let missing: Address = serde_json::from_str(r#"{"addressLine1":"L1"}"#).expect("missing");
        assert_eq!(missing.address_line2, None);
        let null: Address =
            serde_json::from_str(r#"{"addressLine1":"L1","addressLine2":null}"#).expect("null");
        assert_eq!(null.address_line2, None);
    }

    #[test]
    fn address_label_skips_empty_parts() {
        let address = Address::new("L1", "Thane", "Maharashtra", "India", "400001");
        assert_eq!(
            address.display_label(),
            "L1, Thane, Maharashtra, India, 400001"
        );
    }
}
