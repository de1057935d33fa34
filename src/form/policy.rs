/// Rules for removing entries from the address list.
///
/// Defaults keep at least one address and never remove the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPolicy {
    pub min_addresses: usize,
    pub protected_index: Option<usize>,
}

impl Default for AddressPolicy {
    fn default() -> Self {
        Self {
            min_addresses: 1,
            protected_index: Some(0),
        }
    }
}

impl AddressPolicy {
    pub fn check_removal(&self, len: usize, index: usize) -> Result<(), String> {
        if index >= len {
            return Err(format!(
                "address {} does not exist (form has {})",
                index, len
            ));
        }
        if len <= self.min_addresses.max(1) {
            return Err(format!(
                "at least {} address(es) must remain",
                self.min_addresses.max(1)
            ));
        }
        if self.protected_index == Some(index) {
            return Err(format!("address {} is the primary address", index));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_address_is_never_removable() {
        let policy = AddressPolicy {
            min_addresses: 1,
            protected_index: None,
        };
        assert!(policy.check_removal(1, 0).is_err());
        assert!(policy.check_removal(2, 0).is_ok());
    }

    #[test]
    fn protected_index_blocks_removal() {
        let policy = AddressPolicy::default();
        assert!(policy.check_removal(3, 0).is_err());
        assert!(policy.check_removal(3, 2).is_ok());
        assert!(policy.check_removal(3, 3).is_err());
    }

    #[test]
    fn minimum_can_be_raised() {
        let policy = AddressPolicy {
            min_addresses: 2,
            protected_index: Some(0),
        };
        assert!(policy.check_removal(2, 1).is_err());
        assert!(policy.check_removal(3, 1).is_ok());
    }
}
