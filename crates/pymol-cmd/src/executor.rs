//! Command executor
//!
//! Turns one line of text into a bound call and runs it under the API lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::args::{CallArgs, InstanceId, Token};
use crate::binder::Binder;
use crate::command::{CommandContext, CommandRegistry, Core, Session};
use crate::error::{BindError, CmdError, CmdResult, ParseError};
use crate::feedback::{Feedback, FeedbackMask, FeedbackModule, FeedbackState};
use crate::output::{CommandOutput, Console, LogConsole, OutputMessage};
use crate::parser::{join_continued_lines, split_command, split_commands, tokenize};
use crate::script::Environments;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Command executor
///
/// Clones share the registry, the core and its lock, the feedback table,
/// the console and the script environments. They all address the same
/// instance.
#[derive(Clone)]
pub struct CommandExecutor {
    registry: Arc<CommandRegistry>,
    core: Arc<Mutex<Box<dyn Core>>>,
    feedback: Arc<FeedbackState>,
    console: Arc<dyn Console>,
    environments: Arc<Environments>,
    instance: InstanceId,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    /// Executor with the built-in commands, an empty [`Session`] and a
    /// console that writes through `log`
    pub fn new() -> Self {
        Self {
            registry: Arc::new(CommandRegistry::with_builtins()),
            core: Arc::new(Mutex::new(Box::new(Session::new()) as Box<dyn Core>)),
            feedback: Arc::new(FeedbackState::new()),
            console: Arc::new(LogConsole),
            environments: Arc::new(Environments::new()),
            instance: InstanceId(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)),
        }
    }

    /// Replace the command registry
    pub fn with_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Replace the core the commands operate on
    pub fn with_session(mut self, core: impl Core + 'static) -> Self {
        self.core = Arc::new(Mutex::new(Box::new(core) as Box<dyn Core>));
        self
    }

    /// Replace the console messages are written to
    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn feedback(&self) -> &FeedbackState {
        &self.feedback
    }

    pub fn console(&self) -> &dyn Console {
        self.console.as_ref()
    }

    pub fn environments(&self) -> &Environments {
        &self.environments
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Take the API lock
    ///
    /// Blocks while another thread runs a command.
    pub fn lock_core(&self) -> MutexGuard<'_, Box<dyn Core>> {
        self.core.lock()
    }

    /// Execute a single command line
    ///
    /// Blank lines and `#` comments do nothing. Syntax and argument errors
    /// are reported on the console and returned as [`CmdError::Quiet`].
    ///
    /// # Example
    /// ```
    /// use pymol_cmd::CommandExecutor;
    ///
    /// let executor = CommandExecutor::new();
    /// executor.do_("set sphere_scale, 0.5").unwrap();
    /// let out = executor.do_("get sphere_scale, quiet=0").unwrap();
    /// assert_eq!(out.result.as_deref(), Some("0.50000"));
    /// ```
    pub fn do_(&self, line: &str) -> CmdResult<CommandOutput> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(CommandOutput::new());
        }

        let (keyword, rest) = split_command(line).map_err(|e| self.report_parse(&e))?;
        let entry = self
            .registry
            .get(keyword)
            .ok_or_else(|| CmdError::UnknownCommand(keyword.to_string()))?;

        let tokens = tokenize(rest, entry.mode).map_err(|e| self.report_parse(&e))?;
        if self
            .feedback
            .feedback(FeedbackModule::Parser, FeedbackMask::DEBUGGING)
        {
            log::debug!(" parsing-DEBUG: tup: {}", format_tokens(&tokens));
        }

        let bound = Binder::new(
            entry.command.name(),
            &entry.spec,
            self.feedback.as_ref(),
            self.instance,
        )
        .with_mode(entry.mode)
        .bind(tokens)
        .map_err(|e| self.report_bind(&e))?;

        let args = CallArgs::new(&bound, &entry.spec);
        let quiet = entry.spec.contains("quiet") && args.quiet()?;
        let guard = entry
            .command
            .holds_api_lock()
            .then(|| self.core.lock());

        let mut ctx = CommandContext::new(self, guard, quiet);
        let result = entry.command.execute(&mut ctx, &args);
        let (messages, value) = ctx.finish();
        result?;

        Ok(CommandOutput {
            messages,
            result: value,
        })
    }

    /// Execute every command in `text`, stopping at the first error
    ///
    /// Commands are separated by `;` or newlines; lines ending in `\`
    /// continue on the next line.
    pub fn do_multi(&self, text: &str) -> CmdResult<CommandOutput> {
        let mut output = CommandOutput::new();
        for command in split_commands(&join_continued_lines(text)) {
            let out = self.do_(command)?;
            output.messages.extend(out.messages);
            if out.result.is_some() {
                output.result = out.result;
            }
        }
        Ok(output)
    }

    fn report(&self, lines: Vec<String>) {
        for line in lines {
            let message = if line.starts_with("Usage:") {
                OutputMessage::info(line)
            } else {
                OutputMessage::error(line)
            };
            self.console.emit(&message);
        }
    }

    fn report_parse(&self, err: &ParseError) -> CmdError {
        self.report(err.diagnostic());
        CmdError::Quiet
    }

    fn report_bind(&self, err: &BindError) -> CmdError {
        self.report(err.diagnostic());
        CmdError::Quiet
    }
}

/// Render tokens the way the parser trace shows them
fn format_tokens(tokens: &[Token]) -> String {
    let quote = |s: &Option<String>| match s {
        Some(s) => format!("'{}'", s),
        None => "None".to_string(),
    };
    let items: Vec<String> = tokens
        .iter()
        .map(|t| format!("({}, {})", quote(&t.name), quote(&t.value)))
        .collect();
    format!("[{}]", items.join(", "))
}
