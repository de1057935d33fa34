pub mod commands;
pub mod context;
pub mod errors;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use context::{CliMode, ShellContext};
pub use errors::{CliError, CommandError, CommandResult, LoopControl};
pub use shell::run_cli;
