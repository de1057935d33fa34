use crate::cli::context::ShellContext;
use crate::cli::errors::CommandResult;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::form::Route;
use crate::list::RecordRow;

use super::{parse_number, require_arg};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("list", "Show stored records page by page", "list [page]", cmd_list),
        CommandEntry::new("next", "Go to the next list page", "next", cmd_next),
        CommandEntry::new("prev", "Go to the previous list page", "prev", cmd_prev),
        CommandEntry::new(
            "open",
            "Edit the record at a list position",
            "open <position>",
            cmd_open,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let page = match args.first() {
        Some(raw) => parse_number(raw, "page")?,
        None => 1,
    };
    context.navigate(Route::List { page })?;
    render_list(context);
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    step(context, true)
}

fn cmd_prev(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    step(context, false)
}

fn step(context: &mut ShellContext, forward: bool) -> CommandResult {
    if !matches!(context.route, Route::List { .. }) || context.list.is_none() {
        context.navigate(Route::list())?;
    }
    let moved = match context.list.as_mut() {
        Some(view) if forward => view.paginator_mut().next(),
        Some(view) => view.paginator_mut().previous(),
        None => false,
    };
    if !moved {
        io::print_warning(if forward {
            "Already on the last page"
        } else {
            "Already on the first page"
        });
    }
    if let Some(view) = &context.list {
        context.route = Route::List {
            page: view.paginator().current_page(),
        };
    }
    render_list(context);
    Ok(())
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "open <position>")?;
    let position = parse_number(raw, "position")?;
    if context.list.is_none() {
        context.refresh_list()?;
    }
    let route = match &context.list {
        Some(view) => view.edit_route(position)?,
        None => return Ok(()),
    };
    context.navigate(route)?;
    if let Route::Form(target) = route {
        if let Some(id) = target.record_id {
            io::print_success(format!("Editing record {}", id));
        }
    }
    Ok(())
}

pub(crate) fn render_list(context: &ShellContext) {
    let Some(view) = &context.list else {
        return;
    };
    output_section(format!("Records ({})", view.total_records()));
    if view.is_empty() {
        io::print_info("No records saved yet. Use `new` to add one.");
    } else {
        let columns = RecordRow::HEADERS
            .iter()
            .enumerate()
            .map(|(idx, header)| match idx {
                0 | 1 | 7 => TableColumn::new(*header).right(),
                _ => TableColumn::new(*header).max(24),
            })
            .collect();
        let mut table = Table::new(columns);
        for row in view.rows() {
            table.push_row(row.cells());
        }
        io::print_info(table.render());
    }

    let pager = view.paginator();
    let mut nav = Vec::new();
    if pager.has_previous() {
        nav.push("`prev`");
    }
    if pager.has_next() {
        nav.push("`next`");
    }
    if nav.is_empty() {
        io::print_info(pager.label());
    } else {
        io::print_info(format!("{}  ({})", pager.label(), nav.join(", ")));
    }
}
