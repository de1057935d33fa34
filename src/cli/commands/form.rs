use crate::cli::context::ShellContext;
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::domain::{Displayable, FieldPath};
use crate::errors::BankFormError;
use crate::events::SubmitMode;
use crate::form::{NavigationContext, Route};
use crate::storage::find_record;

use super::{list, parse_number, require_arg};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("new", "Open a blank form for a new record", "new", cmd_new),
        CommandEntry::new("edit", "Open a stored record in the form", "edit <id>", cmd_edit),
        CommandEntry::new("show", "Show the form values and field errors", "show", cmd_show),
        CommandEntry::new(
            "set",
            "Set a form field (e.g. `set addresses.0.city Thane`)",
            "set <field> <value>",
            cmd_set,
        ),
        CommandEntry::new(
            "pick",
            "Choose a catalog value for a field interactively",
            "pick <field>",
            cmd_pick,
        ),
        CommandEntry::new(
            "add-address",
            "Append a blank address to the form",
            "add-address",
            cmd_add_address,
        ),
        CommandEntry::new(
            "remove-address",
            "Remove the address at a 0-based index",
            "remove-address <index>",
            cmd_remove_address,
        ),
        CommandEntry::new("errors", "List every validation error", "errors", cmd_errors),
        CommandEntry::new("submit", "Validate and save the form", "submit", cmd_submit),
        CommandEntry::new("reset", "Discard edits and start a new record", "reset", cmd_reset),
    ]
}

fn cmd_new(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let target = NavigationContext::create();
    if context.form.context() == target && context.form.is_dirty() {
        context.route = Route::Form(target);
        io::print_info("Continuing the unsaved new record. Use `reset` to start over.");
        return Ok(());
    }
    context.navigate(Route::Form(target))?;
    io::print_success("Started a new record");
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "edit <id>")?;
    let id = parse_number(raw, "record id")? as u64;
    match find_record(&context.store, id) {
        Ok(record) => io::print_hint(record.display_label()),
        Err(BankFormError::RecordNotFound(_)) => {
            io::print_warning(format!("Record {} not found; showing a blank form", id));
        }
        Err(err) => return Err(err.into()),
    }
    context.navigate(Route::Form(NavigationContext::edit(id)))?;
    io::print_success(format!("Editing record {}", id));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render_form(context);
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: set <field> <value>".into(),
        ));
    }
    let path: FieldPath = args[0].parse()?;
    let raw = args[1..].join(" ");
    let value = path
        .catalog()
        .and_then(|catalog| catalog.resolve(&raw))
        .map(str::to_string)
        .unwrap_or(raw);
    apply_value(context, &path, value)
}

fn cmd_pick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path: FieldPath = require_arg(args, 0, "pick <field>")?.parse()?;
    let catalog = path.catalog().ok_or_else(|| {
        CommandError::InvalidArguments(format!("`{}` is a free-text field; use `set`", path))
    })?;
    if !context.can_prompt() {
        return Err(CommandError::InvalidArguments(
            "pick needs an interactive terminal; use `set` instead".into(),
        ));
    }

    let labels = catalog.labels();
    let current = path
        .get(context.form.values())
        .and_then(|value| catalog.options().iter().position(|item| item.value == value))
        .unwrap_or(0);
    let choice = io::select_option(
        &context.theme,
        &format!("Select {}", path.label()),
        &labels,
        current,
    )?;
    match choice.and_then(|idx| catalog.options().get(idx)) {
        Some(item) => apply_value(context, &path, item.value.to_string()),
        None => {
            io::print_info("Selection cancelled.");
            Ok(())
        }
    }
}

fn apply_value(context: &mut ShellContext, path: &FieldPath, value: String) -> CommandResult {
    match context.form.set_field(path, value)? {
        Some(error) => io::print_warning(format!("{}: {}", path, error.message)),
        None => io::print_success(format!("Updated {}", path)),
    }
    Ok(())
}

fn cmd_add_address(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let index = context.form.add_address();
    io::print_success(format!("Added address {}", index));
    Ok(())
}

fn cmd_remove_address(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "remove-address <index>")?;
    let index = parse_number(raw, "address index")?;
    context.form.remove_address(index)?;
    io::print_success(format!(
        "Removed address {} ({} remaining)",
        index,
        context.form.values().addresses.len()
    ));
    Ok(())
}

fn cmd_errors(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let errors = context.form.errors();
    if errors.is_empty() {
        io::print_success("No validation errors");
        return Ok(());
    }
    output_section(format!("{} validation error(s)", errors.len()));
    for error in errors.iter() {
        io::print_info(format!("  {:<28} {}", error.path.to_string(), error.message));
    }
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = match context.form.submit() {
        Ok(outcome) => outcome,
        Err(BankFormError::Validation(errors)) => {
            io::print_warning(format!(
                "Form has {} invalid field(s); nothing was saved",
                errors.len()
            ));
            for error in errors.iter() {
                io::print_info(format!("  {}", error));
            }
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let id = outcome
        .record
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".into());
    match outcome.mode {
        SubmitMode::Created => io::print_success(format!("Record {} created", id)),
        SubmitMode::Updated => io::print_success(format!("Record {} updated", id)),
    }

    let synced = context.cache.sync();
    tracing::debug!(synced, cached = context.cache.records().len(), "app state cache synced");

    context.navigate(outcome.next)?;
    list::render_list(context);
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.form.reset();
    context.route = Route::Form(NavigationContext::create());
    io::print_success("Form reset to a blank record");
    Ok(())
}

pub(crate) fn render_form(context: &ShellContext) {
    let form = &context.form;
    let title = match form.context().record_id {
        Some(id) => format!("Edit record #{}", id),
        None => "New record".to_string(),
    };
    let dirty = if form.is_dirty() { " (modified)" } else { "" };
    output_section(format!("{}{}", title, dirty));

    let mut table = Table::new(vec![
        TableColumn::new("Field"),
        TableColumn::new("Value").max(40),
        TableColumn::new("Error").max(48),
    ]);
    for path in FieldPath::all_for(form.values()) {
        let value = path.get(form.values()).unwrap_or_default().to_string();
        let error = form
            .field_error(&path)
            .map(|error| error.message.clone())
            .unwrap_or_default();
        table.push_row(vec![path.to_string(), value, error]);
    }
    io::print_info(table.render());

    let status = if form.is_valid() {
        "ready to submit".to_string()
    } else {
        format!("{} field(s) need attention", form.errors().len())
    };
    io::print_hint(status);
}
