//! Error types for the command system
//!
//! Tokenizer and binder failures know how to render the diagnostic lines a
//! user sees. Once the executor has shown them it reports
//! [`CmdError::Quiet`], which the command-loop boundary must not print again.

use pymol_settings::SettingError;
use thiserror::Error;

/// Result type for command operations
pub type CmdResult<T = ()> = Result<T, CmdError>;

/// Errors that can occur during command execution
#[derive(Debug, Error)]
pub enum CmdError {
    /// The failure has already been reported to the user
    #[error("error already reported")]
    Quiet,

    /// Command not found in registry
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// An argument value could not be used
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// Setting lookup, conversion or storage failed
    #[error(transparent)]
    Setting(#[from] SettingError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Script execution error
    #[error("script error at line {line}: {message}")]
    Script { line: usize, message: String },

    /// Generic execution error
    #[error("{0}")]
    Execution(String),
}

impl CmdError {
    /// Create an invalid argument error
    pub fn invalid_arg(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CmdError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        CmdError::Execution(msg.into())
    }

    /// Whether this error has already been shown to the user
    pub fn is_quiet(&self) -> bool {
        matches!(self, CmdError::Quiet)
    }
}

/// Errors raised while splitting a command line into argument tokens
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `(` or `[` group is still open at the end of the line
    #[error("unmatched bracket at column {column}")]
    UnmatchedBracket { text: String, column: usize },

    /// The text cannot be read as an argument, or an argument is followed by
    /// something other than a comma
    #[error("syntax error (type {code}) at column {column}")]
    MalformedToken {
        text: String,
        column: usize,
        code: u8,
    },

    /// The line does not start with a command keyword
    #[error("invalid command name: '{0}'")]
    InvalidCommandName(String),
}

impl ParseError {
    /// Syntax error number shown to the user
    pub fn code(&self) -> u8 {
        match self {
            ParseError::UnmatchedBracket { .. } => 1,
            ParseError::MalformedToken { code, .. } => *code,
            ParseError::InvalidCommandName(_) => 0,
        }
    }

    /// Lines reported to the user, with a caret under the offending column
    pub fn diagnostic(&self) -> Vec<String> {
        match self {
            ParseError::UnmatchedBracket { text, column }
            | ParseError::MalformedToken { text, column, .. } => vec![
                format!("Error: {}", text),
                format!(
                    "Error: {}^ syntax error (type {}).",
                    " ".repeat(*column),
                    self.code()
                ),
            ],
            ParseError::InvalidCommandName(_) => vec![format!("Error: {}", self)],
        }
    }
}

/// Errors raised while binding tokens to a command's parameters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The only argument was `?`; not a failure, the usage line is the output
    #[error("usage requested")]
    UsageRequested { usage: String },

    /// More tokens than declared parameters
    #[error("too many arguments for {command}")]
    TooManyArguments {
        command: String,
        required: usize,
        declared: usize,
        found: usize,
        usage: String,
    },

    /// A positional value has no parameter left to bind to
    #[error("ambiguous argument: '{}'", value.as_deref().unwrap_or("None"))]
    AmbiguousArgument { value: Option<String> },

    /// A required parameter received no value
    #[error("missing required argument in function {command} : {param}")]
    MissingRequired { command: String, param: String },

    /// A named token does not match any declared parameter
    #[error("invalid argument name in function {command} : {param}")]
    UnknownName { command: String, param: String },
}

impl BindError {
    /// Lines reported to the user
    pub fn diagnostic(&self) -> Vec<String> {
        match self {
            BindError::UsageRequested { usage } => vec![usage.clone()],
            BindError::TooManyArguments {
                command,
                required,
                declared,
                found,
                usage,
            } => {
                if *declared == 0 {
                    vec![format!(
                        "Error: too many arguments for {}; None expected.",
                        command
                    )]
                } else if declared == required {
                    vec![
                        format!(
                            "Error: too many arguments for {}; {} expected, {} found.",
                            command, required, found
                        ),
                        usage.clone(),
                    ]
                } else {
                    vec![
                        format!(
                            "Error: too many arguments for {}; {} to {} expected, {} found.",
                            command, required, declared, found
                        ),
                        usage.clone(),
                    ]
                }
            }
            BindError::AmbiguousArgument { .. }
            | BindError::MissingRequired { .. }
            | BindError::UnknownName { .. } => vec![format!("Parsing-Error: {}", self)],
        }
    }

    /// Whether this is the `?` usage request rather than a failure
    pub fn is_usage_request(&self) -> bool {
        matches!(self, BindError::UsageRequested { .. })
    }
}
