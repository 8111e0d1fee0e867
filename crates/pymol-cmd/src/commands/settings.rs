//! Settings commands: set, get, unset

use pymol_settings::{resolve_setting, SettingScope};

use crate::args::{CallArgs, ParamSpec};
use crate::command::{Command, CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};

/// Values longer than this are shortened by `get`
const MAX_SHOWN: usize = 200;
const TRUNCATE_AT: usize = 185;

/// Register settings commands
pub fn register(registry: &mut CommandRegistry) {
    registry.register(SetCommand);
    registry.register(GetCommand);
    registry.register(UnsetCommand);
}

/// Scope named by the `selection` and `state` arguments
///
/// A blank selection is the global scope. Otherwise the selection must name
/// a loaded object.
fn scope_from_args(ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult<SettingScope> {
    let state = args.int_or("state", 0)?;
    let object = args
        .get_str("selection")
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(name) = object {
        if !ctx.with_core(|core| core.has_object(name)) {
            return Err(CmdError::invalid_arg(
                "selection",
                format!("no object named '{}'", name),
            ));
        }
    }
    Ok(SettingScope::from_parts(object, state))
}

/// ` in object X` / ` in object X state N` suffix for messages
fn scope_suffix(scope: &SettingScope) -> String {
    match scope {
        SettingScope::Global => String::new(),
        other => format!(" in {}", other),
    }
}

fn truncate_value(text: String) -> String {
    if text.chars().count() > MAX_SHOWN {
        let head: String = text.chars().take(TRUNCATE_AT).collect();
        format!("{}... (truncated)", head)
    } else {
        text
    }
}

// ============================================================================
// set command
// ============================================================================

struct SetCommand;

impl Command for SetCommand {
    fn name(&self) -> &str {
        "set"
    }

    fn params(&self) -> ParamSpec {
        ParamSpec::new()
            .required("name")
            .optional("value", Some("1"))
            .optional("selection", None)
            .optional("state", Some("0"))
            .optional("quiet", Some("1"))
            .context()
    }

    fn help(&self) -> &str {
        r#"
DESCRIPTION

    "set" changes a setting value globally, for one object, or for one
    state of an object.

USAGE

    set name [, value [, selection [, state ]]]

ARGUMENTS

    name = string: setting name; any unique abbreviation will do
    value = string: new value (depends on setting type) {default: 1}
    selection = string: object to apply the setting to (default: global)
    state = integer: state for state-specific settings (default: 0)

EXAMPLES

    set sphere_scale, 0.5
    set orthoscopic
    set light, [0, -1, -1]
    set stick_radius, 0.3, prot, 2
"#
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult {
        let name = args.require_str("name")?;
        // absent takes the declared "1"; a blank value is rejected
        let value = args.require_str("value")?;
        let scope = scope_from_args(ctx, args)?;

        let text = ctx.with_core(|core| {
            let settings = core.settings();
            settings
                .set_text(name, value, &scope)
                .map(|setting| (setting.name, settings.get_text(setting.id, &scope)))
        })?;

        if let (canonical, Some(shown)) = text {
            ctx.print(format!(
                " Setting: {} set to {}{}.",
                canonical,
                shown,
                scope_suffix(&scope)
            ));
        }
        Ok(())
    }
}

// ============================================================================
// get command
// ============================================================================

struct GetCommand;

impl Command for GetCommand {
    fn name(&self) -> &str {
        "get"
    }

    fn params(&self) -> ParamSpec {
        ParamSpec::new()
            .required("name")
            .optional("selection", None)
            .optional("state", Some("0"))
            .optional("quiet", Some("1"))
            .context()
    }

    fn help(&self) -> &str {
        r#"
DESCRIPTION

    "get" prints out the current value of a setting.

USAGE

    get name [, selection [, state ]]

ARGUMENTS

    name = string: setting name
    selection = string: object name (default: global)
    state = integer: state number

EXAMPLES

    get line_width
    get sphere_scale, prot
"#
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult {
        let name = args.require_str("name")?;
        let setting = resolve_setting(name)?;
        let scope = scope_from_args(ctx, args)?;

        let value = ctx
            .with_core(|core| core.settings().get_text(setting.id, &scope))
            .ok_or_else(|| CmdError::execution(format!("unable to get setting '{}'", name)))?;

        ctx.print(format!(
            " get: {} = {}{}",
            setting.name,
            truncate_value(value.clone()),
            scope_suffix(&scope)
        ));
        ctx.set_result(value);
        Ok(())
    }
}

// ============================================================================
// unset command
// ============================================================================

struct UnsetCommand;

impl Command for UnsetCommand {
    fn name(&self) -> &str {
        "unset"
    }

    fn params(&self) -> ParamSpec {
        ParamSpec::new()
            .required("name")
            .optional("selection", None)
            .optional("state", Some("0"))
            .optional("quiet", Some("1"))
            .context()
    }

    fn help(&self) -> &str {
        r#"
DESCRIPTION

    "unset" removes a setting value. Globally this restores the default;
    for an object or state the value is inherited again.

USAGE

    unset name [, selection [, state ]]

EXAMPLES

    unset orthoscopic
    unset sphere_scale, prot
"#
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &CallArgs<'_>) -> CmdResult {
        let name = args.require_str("name")?;
        let setting = resolve_setting(name)?;
        let scope = scope_from_args(ctx, args)?;

        let removed = ctx.with_core(|core| core.settings().unset(setting.id, &scope))?;

        match (&scope, removed) {
            (SettingScope::Global, _) => {
                ctx.print(format!(" Setting: {} restored to default.", setting.name))
            }
            (_, true) => ctx.print(format!(
                " Setting: {} unset{}.",
                setting.name,
                scope_suffix(&scope)
            )),
            (_, false) => ctx.info(format!(
                " Setting: {} was not defined{}.",
                setting.name,
                scope_suffix(&scope)
            )),
        }
        Ok(())
    }
}
