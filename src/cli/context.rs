use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    events::AppStateCache,
    form::{FormController, NavigationContext, Route},
    list::RecordListView,
    storage::{JsonRecordStore, RecordStore},
    validation::ValidationSchema,
};

use super::commands;
use super::errors::{CliError, CommandError, CommandResult, LoopControl};
use super::io as cli_io;
use super::output::{set_preferences, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
use super::shell::parse_command_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Runtime state shared by every shell command.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: JsonRecordStore,
    pub form: FormController<JsonRecordStore>,
    pub cache: AppStateCache,
    pub list: Option<RecordListView>,
    pub route: Route,
    pub last_command: Option<String>,
    pub running: bool,
}

struct Components {
    store: JsonRecordStore,
    form: FormController<JsonRecordStore>,
    cache: AppStateCache,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::from_manager(mode, ConfigManager::new()?)
    }

    /// Builds a context rooted at `base` instead of the default data directory.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        Self::from_manager(mode, ConfigManager::with_base_dir(base)?)
    }

    fn from_manager(mode: CliMode, config_manager: ConfigManager) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        apply_output_preferences(mode, &config);
        let components = build_components(&config_manager, &config)?;
        tracing::debug!(
            store = %components.store.store_path().display(),
            "shell context ready"
        );

        Ok(Self {
            mode,
            registry: CommandRegistry::with_entries(commands::all_entries()),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            store: components.store,
            form: components.form,
            cache: components.cache,
            list: None,
            route: Route::Form(NavigationContext::create()),
            last_command: None,
            running: true,
        })
    }

    /// Rebuilds store, schema and form after a configuration change.
    ///
    /// In-progress form edits are discarded.
    pub fn reload_components(&mut self) -> CommandResult {
        let components = build_components(&self.config_manager, &self.config)?;
        apply_output_preferences(self.mode, &self.config);
        self.store = components.store;
        self.form = components.form;
        self.cache = components.cache;
        self.list = None;
        self.route = Route::Form(NavigationContext::create());
        Ok(())
    }

    pub fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub fn prompt(&self) -> String {
        match self.route {
            Route::Form(context) => match context.record_id {
                Some(id) => format!("bank[edit #{}]> ", id),
                None => "bank[new]> ".to_string(),
            },
            Route::List { .. } => match &self.list {
                Some(view) => format!(
                    "bank[list {}/{}]> ",
                    view.paginator().current_page(),
                    view.paginator().total_pages()
                ),
                None => "bank[list]> ".to_string(),
            },
        }
    }

    pub fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Switches screens. Entering the form with a new context reloads it;
    /// entering the list re-reads the store.
    /// The stored list route carries the page actually shown after clamping.
    pub fn navigate(&mut self, route: Route) -> CommandResult {
        self.route = match route {
            Route::Form(context) => {
                if self.form.reinitialize(context)? {
                    tracing::debug!(?context, "form reinitialized");
                }
                route
            }
            Route::List { page } => {
                let mut view = RecordListView::load(&self.store, self.config.page_size)?;
                let page = view.paginator_mut().go_to(page);
                self.list = Some(view);
                Route::List { page }
            }
        };
        Ok(())
    }

    /// Re-reads the store into the current list view, keeping the page.
    pub fn refresh_list(&mut self) -> CommandResult {
        let page = self
            .list
            .as_ref()
            .map(|view| view.paginator().current_page())
            .unwrap_or(1);
        self.navigate(Route::List { page })
    }

    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(&err);
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() || tokens[0].starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let raw = &tokens[0];
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script || !self.form.is_dirty() {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(
            &self.theme,
            "Discard unsaved form changes and exit?",
            false,
        )?)
    }

    pub fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            other => cli_io::print_error(other),
        }
    }
}

fn apply_output_preferences(mode: CliMode, config: &Config) {
    set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        quiet_mode: false,
    });
}

fn build_components(manager: &ConfigManager, config: &Config) -> Result<Components, CommandError> {
    let data_dir = config.resolve_data_dir(manager.base_dir());
    let store =
        JsonRecordStore::with_options(data_dir, &config.storage_key, config.backup_retention)?;
    let schema = ValidationSchema::new(&config.schema_options())?;
    let mut form = FormController::new(store.clone())
        .with_schema(schema)
        .with_policy(config.address_policy());

    let snapshot = match store.read_all() {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(error = %err, "record store unreadable; starting with empty cache");
            Vec::new()
        }
    };
    let cache = AppStateCache::attach(form.events_mut(), snapshot);

    Ok(Components { store, form, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn script_context() -> (ShellContext, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let context = ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf())
            .expect("context");
        (context, temp)
    }

    #[test]
    fn submit_routes_to_list_and_updates_cache() {
        let (mut context, _guard) = script_context();
        let lines = [
            "set bankName SBI",
            "set ifscCode X",
            "set branchName B",
            "set accountHolderName A",
            "set accountNumber 123",
            "set email a@b.com",
            "set addresses.0.addressLine1 L1",
            "set addresses.0.city 1",
            "set addresses.0.state Maharashtra",
            "set addresses.0.country India",
            "set addresses.0.pincode 400001",
            "submit",
        ];
        for line in lines {
            assert_eq!(context.process_line(line).expect("line"), LoopControl::Continue);
        }
        assert_eq!(context.route, Route::List { page: 1 });
        assert_eq!(context.store.read_all().expect("read").len(), 1);
        assert_eq!(context.cache.records().len(), 1);
        assert_eq!(context.prompt(), "bank[list 1/1]> ");
    }

    #[test]
    fn comments_and_unknown_commands_keep_running() {
        let (mut context, _guard) = script_context();
        assert_eq!(context.process_line("# note").expect("comment"), LoopControl::Continue);
        assert_eq!(context.process_line("frobnicate").expect("unknown"), LoopControl::Continue);
        assert!(context.running);
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut context, _guard) = script_context();
        assert_eq!(context.process_line("exit").expect("exit"), LoopControl::Exit);
        assert!(!context.running);
        assert!(context.confirm_exit().expect("confirm"));
    }

    #[test]
    fn config_change_rebuilds_the_list_page_size() {
        let (mut context, _guard) = script_context();
        context
            .process_line("config set page_size 2")
            .expect("config set");
        assert_eq!(context.config.page_size, 2);
        context.process_line("list").expect("list");
        let view = context.list.as_ref().expect("list view");
        assert_eq!(view.paginator().page_size(), 2);
    }

    #[test]
    fn list_route_records_the_clamped_page() {
        let (mut context, _guard) = script_context();
        context.process_line("list 0").expect("list 0");
        assert_eq!(context.route, Route::List { page: 1 });
        context.process_line("list 9").expect("list 9");
        assert_eq!(context.route, Route::List { page: 1 });
        assert_eq!(context.prompt(), "bank[list 1/1]> ");
    }

    #[test]
    fn command_errors_surface_to_the_caller() {
        let (mut context, _guard) = script_context();
        let err = context
            .process_line("remove-address 0")
            .expect_err("single address cannot be removed");
        assert!(matches!(
            err,
            CommandError::Core(crate::errors::BankFormError::AddressPolicyViolation(_))
        ));
    }
}
