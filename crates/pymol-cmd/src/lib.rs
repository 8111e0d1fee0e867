//! PyMOL Command System
//!
//! This crate turns lines of the PyMOL command language into calls of
//! registered commands.
//!
//! # Overview
//!
//! A line such as `set sphere_scale, 0.5, prot` goes through four steps:
//!
//! - **Splitting**: [`split_command`] separates the keyword from its argument text
//! - **Tokenizing**: [`tokenize`] cuts the argument text into [`Token`]s at
//!   top-level commas, keeping bracketed selections and quoted strings whole
//! - **Binding**: [`Binder`] matches tokens to the command's [`ParamSpec`]
//!   and injects `quiet` and the `_self` instance handle
//! - **Execution**: [`CommandExecutor`] takes the API lock and runs the
//!   [`Command`] with typed access to its arguments through [`CallArgs`]
//!
//! Syntax and argument errors are printed once, with a caret or usage line,
//! and then surface as [`CmdError::Quiet`]. Callers at the prompt or in a
//! script runner must not print that variant again.
//!
//! # Example
//!
//! ```rust
//! use pymol_cmd::{CmdError, CommandExecutor};
//!
//! let executor = CommandExecutor::new();
//! executor.do_("set orthoscopic, on").unwrap();
//!
//! let out = executor.do_("get ortho").unwrap();
//! assert_eq!(out.result.as_deref(), Some("on"));
//!
//! // too many arguments: diagnostic printed, quiet error returned
//! let err = executor.do_("get a, b, c, d, e, f").unwrap_err();
//! assert!(matches!(err, CmdError::Quiet));
//! ```

mod args;
mod binder;
mod command;
pub mod commands;
mod error;
mod executor;
mod feedback;
mod output;
mod parser;
mod script;
mod usage;

// Re-export main types
pub use args::{
    ArgDef, ArgValue, BoundArgs, CallArgs, InstanceId, ParamSpec, ParseMode, Token, CONTEXT_PARAM,
};
pub use binder::Binder;
pub use command::{Command, CommandContext, CommandEntry, CommandRegistry, Core, Session};
pub use error::{BindError, CmdError, CmdResult, ParseError};
pub use executor::CommandExecutor;
pub use feedback::{Feedback, FeedbackMask, FeedbackModule, FeedbackState};
pub use output::{CommandOutput, Console, LogConsole, OutputBuffer, OutputKind, OutputMessage};
pub use parser::{
    join_continued_lines, split_command, split_commands, split_commands_max, tokenize,
};
pub use script::{
    expand_path, module_name, run_script, spawn_script, Environment, Environments, Namespace,
};
pub use usage::{format_columns, format_usage};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::args::{CallArgs, ParamSpec, ParseMode};
    pub use crate::command::{Command, CommandContext, CommandRegistry, Core};
    pub use crate::error::{CmdError, CmdResult};
    pub use crate::executor::CommandExecutor;
    pub use crate::output::CommandOutput;
}
