//! Built-in command implementations

pub mod control;
pub mod scripting;
pub mod settings;

use crate::command::CommandRegistry;

/// Register all built-in commands with the registry
pub fn register_all(registry: &mut CommandRegistry) {
    // set, get, unset
    settings::register(registry);

    // help, feedback
    control::register(registry);

    // run, spawn
    scripting::register(registry);
}
