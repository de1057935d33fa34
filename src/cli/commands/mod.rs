pub mod backup;
pub mod config;
pub mod form;
pub mod list;
pub mod system;

use crate::cli::errors::CommandError;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(form::definitions());
    commands.extend(list::definitions());
    commands.extend(config::definitions());
    commands.extend(backup::definitions());
    commands
}

/// Parses a whole-number argument, naming it in the error.
pub(crate) fn parse_number(raw: &str, what: &str) -> Result<usize, CommandError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| CommandError::InvalidArguments(format!("{} must be a whole number, got `{}`", what, raw)))
}

pub(crate) fn require_arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_names_are_unique() {
        let entries = all_entries();
        let mut names: Vec<_> = entries.iter().map(|entry| entry.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), entries.len());
    }

    #[test]
    fn parse_number_rejects_text() {
        assert_eq!(parse_number("3", "page").expect("number"), 3);
        assert!(matches!(
            parse_number("three", "page"),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
