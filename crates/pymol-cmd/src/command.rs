//! Command trait, keyword registry and the state commands operate on

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::MutexGuard;
use pymol_settings::SettingStore;

use crate::args::{CallArgs, ParamSpec, ParseMode};
use crate::error::CmdResult;
use crate::executor::CommandExecutor;
use crate::feedback::{Feedback, FeedbackMask, FeedbackModule};
use crate::output::OutputMessage;

/// Shared state guarded by the API lock
///
/// Only one command at a time works on the core.
pub trait Core: Send {
    fn settings(&self) -> &SettingStore;

    /// Names of the loaded objects, in load order
    fn object_names(&self) -> Vec<String>;

    fn has_object(&self, name: &str) -> bool;

    fn add_object(&mut self, name: &str);

    /// Remove an object and every setting stored for it
    fn remove_object(&mut self, name: &str) -> bool;
}

/// Minimal core: a settings store and a list of object names
#[derive(Debug, Default, Clone)]
pub struct Session {
    settings: SettingStore,
    objects: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Core for Session {
    fn settings(&self) -> &SettingStore {
        &self.settings
    }

    fn object_names(&self) -> Vec<String> {
        self.objects.clone()
    }

    fn has_object(&self, name: &str) -> bool {
        self.objects.iter().any(|o| o == name)
    }

    fn add_object(&mut self, name: &str) {
        if !self.has_object(name) {
            self.objects.push(name.to_string());
        }
    }

    fn remove_object(&mut self, name: &str) -> bool {
        let before = self.objects.len();
        self.objects.retain(|o| o != name);
        self.settings.remove_object(name);
        self.objects.len() != before
    }
}

/// What a running command can reach
///
/// If the command was invoked under the API lock the guard is held here;
/// otherwise [`CommandContext::with_core`] takes the lock for the duration of
/// one call.
pub struct CommandContext<'a> {
    executor: &'a CommandExecutor,
    core: Option<MutexGuard<'a, Box<dyn Core>>>,
    output: Vec<OutputMessage>,
    /// Whether results should be kept from the console
    pub quiet: bool,
    result: Option<String>,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(
        executor: &'a CommandExecutor,
        core: Option<MutexGuard<'a, Box<dyn Core>>>,
        quiet: bool,
    ) -> Self {
        Self {
            executor,
            core,
            output: Vec::new(),
            quiet,
            result: None,
        }
    }

    /// The executor running this command
    pub fn executor(&self) -> &'a CommandExecutor {
        self.executor
    }

    /// Run `f` against the core
    pub fn with_core<R>(&mut self, f: impl FnOnce(&mut dyn Core) -> R) -> R {
        match self.core.as_mut() {
            Some(guard) => f(&mut ***guard),
            None => {
                let mut guard = self.executor.lock_core();
                f(&mut **guard)
            }
        }
    }

    /// Whether `module` shows messages of kind `mask`
    pub fn feedback(&self, module: FeedbackModule, mask: FeedbackMask) -> bool {
        self.executor.feedback().feedback(module, mask)
    }

    /// Record the value the command produced
    pub fn set_result(&mut self, value: impl Into<String>) {
        self.result = Some(value.into());
    }

    fn emit(&mut self, message: OutputMessage) {
        self.executor.console().emit(&message);
        self.output.push(message);
    }

    /// Print a result line, unless quiet
    pub fn print(&mut self, text: impl Into<String>) {
        if !self.quiet {
            self.emit(OutputMessage::normal(text));
        }
    }

    /// Print an informational line, unless quiet
    pub fn info(&mut self, text: impl Into<String>) {
        if !self.quiet {
            self.emit(OutputMessage::info(text));
        }
    }

    /// Print a warning, even when quiet
    pub fn warn(&mut self, text: impl Into<String>) {
        self.emit(OutputMessage::warning(text));
    }

    /// Print an error, even when quiet
    pub fn error(&mut self, text: impl Into<String>) {
        self.emit(OutputMessage::error(text));
    }

    pub(crate) fn finish(self) -> (Vec<OutputMessage>, Option<String>) {
        (self.output, self.result)
    }
}

/// A command keyword
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    /// Declared parameters
    fn params(&self) -> ParamSpec;

    /// How the argument text is tokenized and bound
    fn mode(&self) -> ParseMode {
        ParseMode::Strict
    }

    fn help(&self) -> &str {
        "No help available."
    }

    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Whether the executor should hold the API lock while the command runs
    ///
    /// Commands that execute other commands must return `false`.
    fn holds_api_lock(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult;
}

/// A registered keyword with its resolved parameter list
#[derive(Clone)]
pub struct CommandEntry {
    pub command: Arc<dyn Command>,
    pub spec: ParamSpec,
    pub mode: ParseMode,
}

/// Registry mapping command keywords to implementations
///
/// Built once, then shared read-only.
#[derive(Default)]
pub struct CommandRegistry {
    commands: AHashMap<String, CommandEntry>,
    /// alias -> command name
    aliases: AHashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in command
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::commands::register_all(&mut registry);
        registry
    }

    /// Register a command and its aliases
    pub fn register<C: Command + 'static>(&mut self, cmd: C) {
        self.register_arc(Arc::new(cmd));
    }

    pub fn register_arc(&mut self, cmd: Arc<dyn Command>) {
        let name = cmd.name().to_string();
        for alias in cmd.aliases() {
            self.aliases.insert(alias.to_string(), name.clone());
        }
        let entry = CommandEntry {
            spec: cmd.params(),
            mode: cmd.mode(),
            command: cmd,
        };
        self.commands.insert(name, entry);
    }

    pub fn add_alias(&mut self, alias: impl Into<String>, command: impl Into<String>) {
        self.aliases.insert(alias.into(), command.into());
    }

    /// Look up a keyword or alias
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|real| self.commands.get(real))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Command names, sorted, aliases excluded
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Every keyword a user can type, sorted
    pub fn keywords(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .commands
            .keys()
            .chain(self.aliases.keys())
            .map(|s| s.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Command for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn params(&self) -> ParamSpec {
            ParamSpec::new().optional("text", None).context()
        }

        fn mode(&self) -> ParseMode {
            ParseMode::Literal(0)
        }

        fn aliases(&self) -> &[&str] {
            &["say"]
        }

        fn execute(&self, ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult {
            ctx.print(args.str_or("text", ""));
            Ok(())
        }
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = CommandRegistry::new();
        registry.register(Echo);

        assert!(registry.contains("echo"));
        assert!(registry.contains("say"));
        assert!(!registry.contains("shout"));

        let entry = registry.get("say").unwrap();
        assert_eq!(entry.command.name(), "echo");
        assert_eq!(entry.mode, ParseMode::Literal(0));
        assert!(entry.spec.declares_context());

        assert_eq!(registry.names(), vec!["echo"]);
        assert_eq!(registry.keywords(), vec!["echo", "say"]);
    }

    #[test]
    fn test_session_objects() {
        let mut session = Session::new();
        session.add_object("prot");
        session.add_object("lig");
        session.add_object("prot");
        assert_eq!(session.object_names(), vec!["prot", "lig"]);
        assert!(session.remove_object("prot"));
        assert!(!session.remove_object("prot"));
        assert!(!session.has_object("prot"));
    }
}
