//! Notification of committed records.
//!
//! The record store stays the single source of truth. After a successful
//! write the form controller publishes a [`RecordEvent`]; components that keep
//! an in-memory view (such as [`AppStateCache`]) subscribe instead of being
//! written to separately.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::domain::BankRecord;

/// Which submission path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEvent {
    Saved { record: BankRecord, mode: SubmitMode },
}

/// Synchronous fan-out of record events to subscribers.
#[derive(Debug, Default)]
pub struct RecordEvents {
    subscribers: Vec<Sender<RecordEvent>>,
}

impl RecordEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<RecordEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Delivers the event to every live subscriber and returns how many
    /// received it. Subscribers whose receiver was dropped are forgotten.
    pub fn publish(&mut self, event: RecordEvent) -> usize {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Application-wide view of submitted records fed by [`RecordEvents`].
#[derive(Debug)]
pub struct AppStateCache {
    receiver: Receiver<RecordEvent>,
    records: Vec<BankRecord>,
    last_submitted: Option<BankRecord>,
}

impl AppStateCache {
    /// Seeds the cache from a store snapshot and subscribes to later commits.
    pub fn attach(events: &mut RecordEvents, snapshot: Vec<BankRecord>) -> Self {
        Self {
            receiver: events.subscribe(),
            records: snapshot,
            last_submitted: None,
        }
    }

    /// Applies pending events; returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: RecordEvent) {
        match event {
            RecordEvent::Saved { record, .. } => {
                match self
                    .records
                    .iter_mut()
                    .find(|existing| existing.id.is_some() && existing.id == record.id)
                {
                    Some(existing) => *existing = record.clone(),
                    None => self.records.push(record.clone()),
                }
                self.last_submitted = Some(record);
            }
        }
    }

    pub fn records(&self) -> &[BankRecord] {
        &self.records
    }

    pub fn last_submitted(&self) -> Option<&BankRecord> {
        self.last_submitted.as_ref()
    }
}
