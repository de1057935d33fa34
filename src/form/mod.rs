//! Form state controller: derives initial values from the navigation context,
//! applies edits with eager validation, manages the address list and commits
//! submissions to the record store.

mod policy;

use std::collections::HashSet;

use crate::{
    domain::{Address, BankRecord, FieldPath},
    errors::{BankFormError, Result},
    events::{RecordEvent, RecordEvents, SubmitMode},
    storage::{next_record_id, RecordStore},
    validation::{FieldError, ValidationErrors, ValidationSchema},
};

pub use policy::AddressPolicy;

/// Tells the form whether it edits an existing record or creates a new one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationContext {
    pub record_id: Option<u64>,
}

impl NavigationContext {
    pub fn create() -> Self {
        Self { record_id: None }
    }

    pub fn edit(id: u64) -> Self {
        Self { record_id: Some(id) }
    }
}

/// Screens the front end can be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Form(NavigationContext),
    List { page: usize },
}

impl Route {
    pub fn list() -> Self {
        Route::List { page: 1 }
    }
}

/// Result of a committed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub record: BankRecord,
    pub mode: SubmitMode,
    pub next: Route,
}

/// Derives the starting values for a navigation context.
///
/// An unknown id falls back to the blank template instead of failing. A stored
/// record without addresses gets one blank address to edit.
pub fn initial_values(store: &dyn RecordStore, context: &NavigationContext) -> Result<BankRecord> {
    let Some(id) = context.record_id else {
        return Ok(BankRecord::blank());
    };
    let records = store.read_all()?;
    match records.into_iter().find(|record| record.id == Some(id)) {
        Some(mut record) => {
            if record.addresses.is_empty() {
                tracing::debug!(id, "stored record has no addresses; adding a blank one");
                record.addresses.push(Address::blank());
            }
            tracing::debug!(id, "loaded record for editing");
            Ok(record)
        }
        None => {
            tracing::debug!(
                error = %BankFormError::RecordNotFound(id),
                "falling back to blank form"
            );
            Ok(BankRecord::blank())
        }
    }
}

pub struct FormController<S: RecordStore> {
    store: S,
    schema: ValidationSchema,
    policy: AddressPolicy,
    events: RecordEvents,
    context: NavigationContext,
    initial: BankRecord,
    values: BankRecord,
    touched: HashSet<FieldPath>,
    errors: ValidationErrors,
}

impl<S: RecordStore> FormController<S> {
    /// Creates a controller showing a blank form in create mode.
    pub fn new(store: S) -> Self {
        let schema = ValidationSchema::default();
        let values = BankRecord::blank();
        let errors = schema.errors(&values);
        Self {
            store,
            schema,
            policy: AddressPolicy::default(),
            events: RecordEvents::new(),
            context: NavigationContext::create(),
            initial: values.clone(),
            values,
            touched: HashSet::new(),
            errors,
        }
    }

    pub fn with_schema(mut self, schema: ValidationSchema) -> Self {
        self.schema = schema;
        self.errors = self.schema.errors(&self.values);
        self
    }

    pub fn with_policy(mut self, policy: AddressPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Opens the form for `context`, discarding any in-progress edits.
    pub fn open(&mut self, context: NavigationContext) -> Result<()> {
        let values = initial_values(&self.store, &context)?;
        self.context = context;
        self.initial = values.clone();
        self.values = values;
        self.touched.clear();
        self.errors = self.schema.errors(&self.values);
        Ok(())
    }

    /// Re-derives the form when the navigation context changed.
    ///
    /// Returns `true` when the form was reloaded; an unchanged context keeps
    /// the current edits.
    pub fn reinitialize(&mut self, context: NavigationContext) -> Result<bool> {
        if context == self.context {
            return Ok(false);
        }
        self.open(context)?;
        Ok(true)
    }

    pub fn context(&self) -> NavigationContext {
        self.context
    }

    pub fn values(&self) -> &BankRecord {
        &self.values
    }

    pub fn initial(&self) -> &BankRecord {
        &self.initial
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    pub fn mode(&self) -> SubmitMode {
        if self.values.is_persisted() {
            SubmitMode::Updated
        } else {
            SubmitMode::Created
        }
    }

    pub fn policy(&self) -> &AddressPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events_mut(&mut self) -> &mut RecordEvents {
        &mut self.events
    }

    /// Writes one field and re-runs validation; returns the field's error, if any.
    pub fn set_field(&mut self, path: &FieldPath, value: impl Into<String>) -> Result<Option<FieldError>> {
        path.set(&mut self.values, value)?;
        self.touched.insert(*path);
        self.errors = self.schema.errors(&self.values);
        Ok(self.schema.validate_field(&self.values, path))
    }

    /// Parses a textual path such as `addresses.0.city` and sets it.
    pub fn set_field_str(&mut self, path: &str, value: impl Into<String>) -> Result<Option<FieldError>> {
        let path: FieldPath = path.parse()?;
        self.set_field(&path, value)
    }

    /// All current failures, touched or not.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The error shown next to a field; untouched fields stay quiet.
    pub fn field_error(&self, path: &FieldPath) -> Option<&FieldError> {
        if !self.touched.contains(path) {
            return None;
        }
        self.errors.get(path)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Appends a blank address and returns its index.
    pub fn add_address(&mut self) -> usize {
        self.values.addresses.push(Address::blank());
        self.errors = self.schema.errors(&self.values);
        self.values.addresses.len() - 1
    }

    pub fn can_remove_address(&self, index: usize) -> bool {
        self.policy
            .check_removal(self.values.addresses.len(), index)
            .is_ok()
    }

    /// Removes the address at `index` when the policy allows it.
    pub fn remove_address(&mut self, index: usize) -> Result<Address> {
        self.policy
            .check_removal(self.values.addresses.len(), index)
            .map_err(BankFormError::AddressPolicyViolation)?;
        let removed = self.values.addresses.remove(index);
        self.touched = self
            .touched
            .drain()
            .filter_map(|path| shift_after_removal(path, index))
            .collect();
        self.errors = self.schema.errors(&self.values);
        Ok(removed)
    }

    /// Validates everything and marks every field touched.
    pub fn validate(&mut self) -> std::result::Result<(), ValidationErrors> {
        self.touched.extend(FieldPath::all_for(&self.values));
        self.errors = self.schema.errors(&self.values);
        self.schema.validate(&self.values)
    }

    /// Commits the current values.
    ///
    /// Reads the stored collection fresh, replaces the matching record (edit)
    /// or appends with the next id (create), overwrites the whole collection,
    /// notifies subscribers, then resets the form to a blank create form.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        self.validate()?;

        let mut records = self.store.read_all()?;
        let (record, mode) = match self.values.id {
            Some(id) => {
                let record = self.values.clone();
                match records.iter_mut().find(|existing| existing.id == Some(id)) {
                    Some(existing) => *existing = record.clone(),
                    None => tracing::warn!(id, "edited record no longer in store; nothing replaced"),
                }
                (record, SubmitMode::Updated)
            }
            None => {
                let id = next_record_id(&records);
                let record = self.values.clone().with_id(id);
                records.push(record.clone());
                (record, SubmitMode::Created)
            }
        };

        self.store.write_all(&records)?;
        tracing::info!(id = ?record.id, ?mode, total = records.len(), "record submitted");

        let delivered = self.events.publish(RecordEvent::Saved {
            record: record.clone(),
            mode,
        });
        tracing::debug!(delivered, "record event published");

        self.reset();
        Ok(SubmitOutcome {
            record,
            mode,
            next: Route::list(),
        })
    }

    /// Returns to a blank create form.
    pub fn reset(&mut self) {
        self.context = NavigationContext::create();
        self.initial = BankRecord::blank();
        self.values = BankRecord::blank();
        self.touched.clear();
        self.errors = self.schema.errors(&self.values);
    }

    /// Navigation to the list view is always available and leaves the form untouched.
    pub fn view_list(&self) -> Route {
        Route::list()
    }
}

fn shift_after_removal(path: FieldPath, removed: usize) -> Option<FieldPath> {
    match path {
        FieldPath::Address { index, .. } if index == removed => None,
        FieldPath::Address { index, field } if index > removed => {
            Some(FieldPath::address(index - 1, field))
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AddressField, RecordField};
    use crate::storage::MemoryRecordStore;

    fn filled(controller: &mut FormController<MemoryRecordStore>) {
        let values = [
            ("bankName", "SBI"),
            ("ifscCode", "X"),
            ("branchName", "B"),
            ("accountHolderName", "A"),
            ("accountNumber", "123"),
            ("email", "a@b.com"),
            ("addresses.0.addressLine1", "L1"),
            ("addresses.0.city", "Thane"),
            ("addresses.0.state", "Maharashtra"),
            ("addresses.0.country", "India"),
            ("addresses.0.pincode", "400001"),
        ];
        for (path, value) in values {
            controller.set_field_str(path, value).expect("set field");
        }
    }

    #[test]
    fn untouched_fields_hide_errors_until_validate() {
        let mut controller = FormController::new(MemoryRecordStore::new());
        let bank = FieldPath::Record(RecordField::BankName);
        assert!(!controller.is_valid());
        assert!(controller.field_error(&bank).is_none());
        assert!(controller.validate().is_err());
        assert!(controller.field_error(&bank).is_some());
    }

    #[test]
    fn set_field_reports_eager_error() {
        let mut controller = FormController::new(MemoryRecordStore::new());
        let error = controller
            .set_field_str("email", "nope")
            .expect("set")
            .expect("email error");
        assert_eq!(error.message, "Invalid email address");
        assert!(controller
            .set_field_str("email", "a@b.com")
            .expect("set")
            .is_none());
    }

    #[test]
    fn removing_an_address_shifts_touched_paths() {
        let mut controller = FormController::new(MemoryRecordStore::new());
        controller.add_address();
        controller.add_address();
        controller
            .set_field_str("addresses.2.city", "Atlantis")
            .expect("set");
        controller.remove_address(1).expect("remove");
        let shifted = FieldPath::address(1, AddressField::City);
        assert!(controller.field_error(&shifted).is_some());
        assert_eq!(controller.values().addresses.len(), 2);
    }

    #[test]
    fn invalid_submit_writes_nothing() {
        let mut controller = FormController::new(MemoryRecordStore::new());
        let err = controller.submit().expect_err("blank form is invalid");
        assert!(err.validation_errors().is_some());
        assert!(controller.store().read_all().expect("read").is_empty());
    }

    #[test]
    fn submit_resets_to_blank_create_form() {
        let mut controller = FormController::new(MemoryRecordStore::new());
        filled(&mut controller);
        assert!(controller.is_dirty());
        let outcome = controller.submit().expect("submit");
        assert_eq!(outcome.mode, SubmitMode::Created);
        assert_eq!(outcome.next, Route::List { page: 1 });
        assert_eq!(controller.values(), &BankRecord::blank());
        assert_eq!(controller.context(), NavigationContext::create());
        assert!(!controller.is_dirty());
    }
}
