//! Script launching for `run` and `spawn`
//!
//! A script is a file of commands. Each run is given a pair of binding
//! environments chosen by its [`Namespace`]; the environments record which
//! script they belong to and are visible to embedders through
//! [`CommandExecutor::environments`].

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::thread::JoinHandle;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::{CmdError, CmdResult};
use crate::executor::CommandExecutor;
use crate::parser::join_continued_lines;

/// Maximum nesting of scripts running scripts on one thread
const MAX_INCLUDE_DEPTH: usize = 100;

thread_local! {
    static SCRIPT_STACK: RefCell<Vec<PathBuf>> = const { RefCell::new(Vec::new()) };
}

/// Where a script's names live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Shared environment, for both globals and locals
    Global,
    /// Shared globals, fresh locals
    Local,
    /// Main environment, for both globals and locals
    Main,
    /// Main globals, fresh locals
    Private,
    /// A fresh environment registered under a name derived from the path
    Module,
}

impl Namespace {
    pub fn name(&self) -> &'static str {
        match self {
            Namespace::Global => "global",
            Namespace::Local => "local",
            Namespace::Main => "main",
            Namespace::Private => "private",
            Namespace::Module => "module",
        }
    }
}

impl FromStr for Namespace {
    type Err = CmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Namespace::Global),
            "local" => Ok(Namespace::Local),
            "main" => Ok(Namespace::Main),
            "private" => Ok(Namespace::Private),
            "module" => Ok(Namespace::Module),
            _ => Err(CmdError::execution(format!("invalid namespace \"{}\"", s))),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named table of variable bindings
///
/// Clones refer to the same table.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    name: Arc<str>,
    vars: Arc<RwLock<AHashMap<String, String>>>,
}

impl Environment {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            vars: Arc::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.write().insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.read().contains_key(key)
    }

    /// Whether both handles refer to the same table
    pub fn same_as(&self, other: &Environment) -> bool {
        Arc::ptr_eq(&self.vars, &other.vars)
    }
}

/// The shared environments of one session plus the registered modules
#[derive(Debug)]
pub struct Environments {
    pymol: Environment,
    main: Environment,
    modules: RwLock<AHashMap<String, Environment>>,
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}

impl Environments {
    pub fn new() -> Self {
        Self {
            pymol: Environment::new("pymol"),
            main: Environment::new("__main__"),
            modules: RwLock::default(),
        }
    }

    /// Environment shared by every `global` and `local` run
    pub fn pymol(&self) -> &Environment {
        &self.pymol
    }

    /// Environment shared by every `main` and `private` run
    pub fn main(&self) -> &Environment {
        &self.main
    }

    /// A registered module environment
    pub fn module(&self, name: &str) -> Option<Environment> {
        self.modules.read().get(name).cloned()
    }

    /// `(globals, locals)` for a script run
    ///
    /// A `module` run gets a fresh environment, registered under
    /// [`module_name`] until [`Environments::release`] drops it.
    pub fn resolve(&self, namespace: Namespace, path: &Path) -> (Environment, Environment) {
        match namespace {
            Namespace::Global => (self.pymol.clone(), self.pymol.clone()),
            Namespace::Local => (self.pymol.clone(), Environment::new("local")),
            Namespace::Main => (self.main.clone(), self.main.clone()),
            Namespace::Private => (self.main.clone(), Environment::new("private")),
            Namespace::Module => {
                let file = path.to_string_lossy();
                let name = module_name(&file);
                let module = Environment::new(&name);
                module.set("__file__", &*file);
                self.modules.write().insert(name, module.clone());
                (module.clone(), module)
            }
        }
    }

    /// Unregister a module environment
    pub fn release(&self, name: &str) -> Option<Environment> {
        self.modules.write().remove(name)
    }
}

/// Module name for a script path: every character other than an ASCII
/// letter or digit becomes `_`
pub fn module_name(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Expand a leading `~` and `$VAR` / `${VAR}` references
pub fn expand_path(path: &str) -> PathBuf {
    let mut expanded = String::with_capacity(path.len());
    let mut rest = path;

    if let Some(after) = rest.strip_prefix('~') {
        if after.is_empty() || after.starts_with('/') {
            if let Ok(home) = std::env::var("HOME") {
                expanded.push_str(&home);
                rest = after;
            }
        }
    }

    while let Some(start) = rest.find('$') {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let (var, tail) = match after.strip_prefix('{') {
            Some(inner) => match inner.find('}') {
                Some(end) => (&inner[..end], &inner[end + 1..]),
                None => ("", after),
            },
            None => {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], &after[end..])
            }
        };
        match std::env::var(var) {
            Ok(value) if !var.is_empty() => expanded.push_str(&value),
            _ => expanded.push_str(&rest[start..start + 1 + (after.len() - tail.len())]),
        }
        rest = tail;
    }
    expanded.push_str(rest);
    PathBuf::from(expanded)
}

/// Run a script to completion on the calling thread
///
/// A failing line ends the run with [`CmdError::Script`], or with
/// [`CmdError::Quiet`] when the failure was already reported.
pub fn run_script(executor: &CommandExecutor, path: &Path, namespace: Namespace) -> CmdResult {
    let (_globals, locals) = executor.environments().resolve(namespace, path);
    locals.set("__script__", path.to_string_lossy());

    let result = run_guarded(executor, path);

    if namespace == Namespace::Module {
        executor.environments().release(locals.name());
    }
    result
}

/// Run a script on a worker thread
///
/// The module environment of a spawned `module` run stays registered.
pub fn spawn_script(
    executor: &CommandExecutor,
    path: &Path,
    namespace: Namespace,
) -> CmdResult<JoinHandle<()>> {
    let (_globals, locals) = executor.environments().resolve(namespace, path);
    locals.set("__script__", path.to_string_lossy());

    let executor = executor.clone();
    let path = path.to_path_buf();
    let thread_name = format!("spawn:{}", path.display());
    std::thread::Builder::new()
        .name(thread_name)
        .spawn(move || match run_guarded(&executor, &path) {
            Ok(()) => log::debug!("spawned script {} finished", path.display()),
            Err(CmdError::Quiet) => {}
            Err(e) => log::error!("Error: {}", e),
        })
        .map_err(CmdError::from)
}

fn run_guarded(executor: &CommandExecutor, path: &Path) -> CmdResult {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    let depth = SCRIPT_STACK.with(|stack| stack.borrow().len());
    if depth >= MAX_INCLUDE_DEPTH {
        return Err(CmdError::Script {
            line: 0,
            message: format!("maximum include depth ({}) exceeded", MAX_INCLUDE_DEPTH),
        });
    }
    if SCRIPT_STACK.with(|stack| stack.borrow().contains(&canonical)) {
        return Err(CmdError::Script {
            line: 0,
            message: format!("circular include detected: {}", path.display()),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| CmdError::Script {
        line: 0,
        message: format!("failed to read {}: {}", path.display(), e),
    })?;

    SCRIPT_STACK.with(|stack| stack.borrow_mut().push(canonical));
    let result = run_lines(executor, &content);
    SCRIPT_STACK.with(|stack| stack.borrow_mut().pop());
    result
}

fn run_lines(executor: &CommandExecutor, content: &str) -> CmdResult {
    for (index, line) in join_continued_lines(content).lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match executor.do_(line) {
            Ok(_) => {}
            Err(CmdError::Quiet) => return Err(CmdError::Quiet),
            Err(e @ CmdError::Script { .. }) => return Err(e),
            Err(e) => {
                return Err(CmdError::Script {
                    line: index + 1,
                    message: format!("{}: {}", line, e),
                })
            }
        }
    }
    Ok(())
}
