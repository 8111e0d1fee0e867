//! Control commands: help, feedback

use crate::args::{CallArgs, ParamSpec};
use crate::command::{Command, CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};
use crate::feedback::{FeedbackMask, FeedbackModule};
use crate::usage::format_columns;

/// Register control commands
pub fn register(registry: &mut CommandRegistry) {
    registry.register(HelpCommand);
    registry.register(FeedbackCommand);
}

// ============================================================================
// help command
// ============================================================================

struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn params(&self) -> ParamSpec {
        ParamSpec::new().optional("command", None).context()
    }

    fn holds_api_lock(&self) -> bool {
        false
    }

    fn help(&self) -> &str {
        r#"
DESCRIPTION

    "help" prints the description of a command, or lists every command
    when called without arguments.

USAGE

    help [ command ]

EXAMPLES

    help
    help set
"#
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult {
        let registry = ctx.executor().registry();

        match args.get_str("command").map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => match registry.get(name) {
                Some(entry) => {
                    for line in entry.command.help().trim_matches('\n').lines() {
                        ctx.print(line);
                    }
                }
                None => ctx.print(format!(" Sorry, no help available on \"{}\".", name)),
            },
            None => {
                ctx.print(" Commands:");
                for row in format_columns(&registry.keywords(), 77, 2) {
                    ctx.print(row);
                }
                ctx.print(" Type 'help <command>' for information on a specific command.");
            }
        }
        Ok(())
    }
}

// ============================================================================
// feedback command
// ============================================================================

struct FeedbackCommand;

impl Command for FeedbackCommand {
    fn name(&self) -> &str {
        "feedback"
    }

    fn params(&self) -> ParamSpec {
        ParamSpec::new()
            .optional("action", Some("?"))
            .optional("module", Some("all"))
            .optional("mask", Some("everything"))
            .context()
    }

    fn holds_api_lock(&self) -> bool {
        false
    }

    fn help(&self) -> &str {
        r#"
DESCRIPTION

    "feedback" changes the amount of information shown on the console.
    Without arguments it lists the current masks.

USAGE

    feedback action, module, mask

ARGUMENTS

    action = enable, disable or set
    module = all, parser, cmd, setting or executive
    mask = results, errors, actions, warnings, details, blather,
           debugging or everything; combine with "+"

EXAMPLES

    feedback disable, all, everything
    feedback enable, parser, debugging
    feedback set, cmd, results+errors
"#
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult {
        let action = args.str_or("action", "?").trim().to_ascii_lowercase();
        let feedback = ctx.executor().feedback();

        if action == "?" {
            for module in FeedbackModule::MODULES {
                let names = feedback.mask(module).names();
                let shown = if names.is_empty() {
                    "none".to_string()
                } else {
                    names.join(" ")
                };
                ctx.print(format!(" {:<10} {}", module.name(), shown));
            }
            return Ok(());
        }

        let module_name = args.str_or("module", "all");
        let module = FeedbackModule::from_name(module_name).ok_or_else(|| {
            CmdError::invalid_arg("module", format!("unknown module '{}'", module_name))
        })?;
        let mask_name = args.str_or("mask", "everything");
        let mask = FeedbackMask::from_names(mask_name)
            .ok_or_else(|| CmdError::invalid_arg("mask", format!("unknown mask '{}'", mask_name)))?;

        match action.as_str() {
            "enable" => feedback.enable(module, mask),
            "disable" => feedback.disable(module, mask),
            "set" => feedback.set(module, mask),
            other => {
                return Err(CmdError::invalid_arg(
                    "action",
                    format!("unknown action '{}'", other),
                ))
            }
        }
        log::debug!("feedback {} {} {:?}", action, module, mask);
        Ok(())
    }
}
