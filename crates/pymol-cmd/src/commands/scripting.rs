//! Script commands: run, spawn

use crate::args::{CallArgs, ParamSpec};
use crate::command::{Command, CommandContext, CommandRegistry};
use crate::error::CmdResult;
use crate::feedback::{FeedbackMask, FeedbackModule};
use crate::script::{expand_path, run_script, spawn_script, Namespace};

/// Register script commands
pub fn register(registry: &mut CommandRegistry) {
    registry.register(RunCommand);
    registry.register(SpawnCommand);
}

fn script_params(default_namespace: &'static str) -> ParamSpec {
    ParamSpec::new()
        .required("file")
        .optional("namespace", Some(default_namespace))
        .context()
}

// ============================================================================
// run command
// ============================================================================

struct RunCommand;

impl Command for RunCommand {
    fn name(&self) -> &str {
        "run"
    }

    fn params(&self) -> ParamSpec {
        script_params("global")
    }

    fn aliases(&self) -> &[&str] {
        &["@"]
    }

    fn holds_api_lock(&self) -> bool {
        false
    }

    fn help(&self) -> &str {
        r#"
DESCRIPTION

    "run" executes a command script, either in the global environment,
    in the main environment, or in its own environment (as a module).

USAGE

    run file [, namespace ]

ARGUMENTS

    file = string: script file, "~" and $VARIABLES are expanded
    namespace = local, global, module, main, or private {default: global}

EXAMPLES

    run setup.pml
    @setup.pml
"#
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult {
        let path = expand_path(args.require_str("file")?);
        let namespace: Namespace = args.str_or("namespace", "global").parse()?;

        if ctx.feedback(FeedbackModule::Executive, FeedbackMask::DETAILS) {
            log::debug!("running {} in {} namespace", path.display(), namespace);
        }
        run_script(ctx.executor(), &path, namespace)
    }
}

// ============================================================================
// spawn command
// ============================================================================

struct SpawnCommand;

impl Command for SpawnCommand {
    fn name(&self) -> &str {
        "spawn"
    }

    fn params(&self) -> ParamSpec {
        script_params("module")
    }

    fn holds_api_lock(&self) -> bool {
        false
    }

    fn help(&self) -> &str {
        r#"
DESCRIPTION

    "spawn" launches a command script in a new thread which runs
    concurrently with the interpreter. It can run in its own environment
    (like a module, default), a local environment, or the global one.

USAGE

    spawn file [, namespace ]

NOTES

    The default namespace for spawn is "module".

SEE ALSO

    run
"#
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult {
        let path = expand_path(args.require_str("file")?);
        let namespace: Namespace = args.str_or("namespace", "module").parse()?;

        let handle = spawn_script(ctx.executor(), &path, namespace)?;
        if ctx.feedback(FeedbackModule::Executive, FeedbackMask::DETAILS) {
            log::debug!(
                "spawned {} on thread {:?}",
                path.display(),
                handle.thread().name()
            );
        }
        Ok(())
    }
}
