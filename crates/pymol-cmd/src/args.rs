//! Argument tokens, parameter declarations and bound values

use std::fmt;

use pymol_settings::parse_bool;

use crate::error::{CmdError, CmdResult};

/// Name of the trailing parameter that receives the running instance
pub const CONTEXT_PARAM: &str = "_self";

/// One argument as written on the command line
///
/// `name` is `None` for positional arguments; `value` is `None` only for an
/// explicitly blank argument (`a,,b`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl Token {
    /// Positional argument
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: Some(value.into()),
        }
    }

    /// Named argument
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }

    /// Blank positional argument
    pub fn blank() -> Self {
        Self {
            name: None,
            value: None,
        }
    }

    /// A lone `?` asks for the usage line
    pub fn is_usage_request(&self) -> bool {
        self.name.is_none() && self.value.as_deref() == Some("?")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{}=", name)?;
        }
        write!(f, "{}", self.value.as_deref().unwrap_or(""))
    }
}

/// How a command's line is tokenized and bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Every name is checked against the declared parameters
    #[default]
    Strict,
    /// No validation; positional and named values pass straight through
    NoCheck,
    /// `word=value` with an undeclared `word` means two positional values
    Legacy,
    /// After `k` regular arguments the rest of the line is one literal value
    Literal(usize),
}

impl ParseMode {
    /// Number of regular arguments read before the literal remainder
    pub fn literal_threshold(self) -> Option<usize> {
        match self {
            ParseMode::Literal(k) => Some(k),
            _ => None,
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDef {
    pub name: &'static str,
    /// Value used when the caller does not supply one
    pub default: Option<&'static str>,
}

/// Declared parameter list of a command
///
/// Parameters before `required_count()` must be supplied. The context
/// parameter, when declared, is last and never required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSpec {
    params: Vec<ArgDef>,
    required: usize,
    variadic: bool,
}

impl ParamSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required parameter; every parameter declared before it becomes
    /// required too
    pub fn required(mut self, name: &'static str) -> Self {
        self.params.push(ArgDef {
            name,
            default: None,
        });
        self.required = self.params.len();
        self
    }

    /// Add an optional parameter
    pub fn optional(mut self, name: &'static str, default: Option<&'static str>) -> Self {
        self.params.push(ArgDef { name, default });
        self
    }

    /// Declare the trailing context parameter
    pub fn context(self) -> Self {
        self.optional(CONTEXT_PARAM, None)
    }

    /// Accept arbitrary extra arguments; disables all validation
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn params(&self) -> &[ArgDef] {
        &self.params
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().map(|p| p.name)
    }

    /// Number of declared parameters, the context parameter included
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn required_count(&self) -> usize {
        self.required
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn get(&self, name: &str) -> Option<&ArgDef> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn declares_context(&self) -> bool {
        self.contains(CONTEXT_PARAM)
    }
}

/// Identifies the running instance a command is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.0)
    }
}

/// A value after binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Text as written (quotes removed)
    String(String),
    /// Explicitly blank argument
    None,
    /// The injected context handle
    Instance(InstanceId),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ArgValue::None)
    }
}

impl From<Option<String>> for ArgValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(ArgValue::None, ArgValue::String)
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::String(s.to_string())
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(s) => write!(f, "'{}'", s),
            ArgValue::None => write!(f, "None"),
            ArgValue::Instance(id) => write!(f, "{}", id),
        }
    }
}

/// Result of binding: positional values plus keywords in assignment order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs {
    pub positional: Vec<ArgValue>,
    keywords: Vec<(String, ArgValue)>,
}

impl BoundArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a keyword; a later assignment replaces an earlier one
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        let name = name.into();
        match self.keywords.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.keywords.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.keywords
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keywords(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.keywords.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn keyword_names(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|(n, _)| n.as_str())
    }
}

impl fmt::Display for BoundArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.keywords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", name, value)?;
        }
        write!(f, "}}")
    }
}

/// Typed access to a command's bound arguments
///
/// Absent keywords fall back to the declared default. A blank argument
/// (`a,,b`) has no value and skips the declared default; only the
/// fallback passed to an `*_or` accessor applies to it.
pub struct CallArgs<'a> {
    bound: &'a BoundArgs,
    spec: &'a ParamSpec,
}

impl<'a> CallArgs<'a> {
    pub fn new(bound: &'a BoundArgs, spec: &'a ParamSpec) -> Self {
        Self { bound, spec }
    }

    /// Text value of a parameter
    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        match self.bound.get(name) {
            Some(value) => value.as_str(),
            None => self.spec.get(name).and_then(|p| p.default),
        }
    }

    pub fn str_or(&self, name: &str, default: &'a str) -> &'a str {
        self.get_str(name).unwrap_or(default)
    }

    /// Text value that must be present
    pub fn require_str(&self, name: &str) -> CmdResult<&'a str> {
        self.get_str(name)
            .ok_or_else(|| CmdError::invalid_arg(name, "a value is required"))
    }

    pub fn get_int(&self, name: &str) -> CmdResult<Option<i32>> {
        self.get_str(name)
            .map(|s| {
                s.trim()
                    .parse::<i32>()
                    .map_err(|_| CmdError::invalid_arg(name, format!("'{}' is not an integer", s)))
            })
            .transpose()
    }

    pub fn int_or(&self, name: &str, default: i32) -> CmdResult<i32> {
        Ok(self.get_int(name)?.unwrap_or(default))
    }

    pub fn get_float(&self, name: &str) -> CmdResult<Option<f64>> {
        self.get_str(name)
            .map(|s| {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| CmdError::invalid_arg(name, format!("'{}' is not a number", s)))
            })
            .transpose()
    }

    /// Boolean value; accepts the boolean words settings accept
    pub fn get_bool(&self, name: &str) -> CmdResult<Option<bool>> {
        self.get_str(name)
            .map(|s| {
                parse_bool(s)
                    .or_else(|| s.trim().parse::<f64>().ok().map(|v| v != 0.0))
                    .ok_or_else(|| CmdError::invalid_arg(name, format!("'{}' is not a boolean", s)))
            })
            .transpose()
    }

    pub fn bool_or(&self, name: &str, default: bool) -> CmdResult<bool> {
        Ok(self.get_bool(name)?.unwrap_or(default))
    }

    /// Whether the command should keep its results to itself
    pub fn quiet(&self) -> CmdResult<bool> {
        self.bool_or("quiet", true)
    }

    /// Instance handle injected by the binder
    pub fn instance(&self) -> Option<InstanceId> {
        match self.bound.get(CONTEXT_PARAM) {
            Some(ArgValue::Instance(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn positional(&self) -> &'a [ArgValue] {
        &self.bound.positional
    }

    pub fn bound(&self) -> &'a BoundArgs {
        self.bound
    }
}
