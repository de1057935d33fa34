use crate::cli::context::ShellContext;
use crate::cli::errors::CommandResult;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::form::Route;

use super::{list, require_arg};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backups",
            "List automatic backups of the record store",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Replace stored records with a backup",
            "restore <backup-name>",
            cmd_restore,
        ),
    ]
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.store.list_backups()?;
    if backups.is_empty() {
        io::print_info("No backups yet. One is taken before every save.");
        return Ok(());
    }
    output_section(format!("Backups ({})", backups.len()));
    let mut table = Table::new(vec![
        TableColumn::new("Name"),
        TableColumn::new("Created"),
        TableColumn::new("Bytes").right(),
    ]);
    for backup in backups {
        let created = backup
            .created_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".into());
        table.push_row(vec![backup.name, created, backup.size_bytes.to_string()]);
    }
    io::print_info(table.render());
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, "restore <backup-name>")?;
    if context.can_prompt()
        && !io::confirm_action(
            &context.theme,
            &format!("Replace stored records with `{}`?", name),
            false,
        )?
    {
        io::print_info("Restore cancelled.");
        return Ok(());
    }

    let records = context.store.restore_backup(name)?;
    io::print_success(format!(
        "Restored {} record(s) from {}",
        records.len(),
        name
    ));

    if matches!(context.route, Route::List { .. }) {
        context.refresh_list()?;
        list::render_list(context);
    }
    Ok(())
}
