#![doc(test(attr(deny(warnings))))]

//! Bank Details offers the record model, validation schema, form controller,
//! record store and paginated list view behind the bank-details entry CLI.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod form;
pub mod list;
pub mod storage;
pub mod utils;
pub mod validation;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bank Details tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
