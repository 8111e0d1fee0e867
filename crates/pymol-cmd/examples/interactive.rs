//! Interactive PyMOL command prompt
//!
//! Reads commands at a `PyMOL> ` prompt and runs them against an empty
//! session.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example interactive
//!
//! # Run a script first
//! cargo run --example interactive -- setup.pml
//!
//! # Show parser traces
//! RUST_LOG=debug cargo run --example interactive
//! ```
//!
//! ## Commands
//!
//! - `set sphere_scale, 0.5` - Change a setting
//! - `get sphere_scale` - Print a setting
//! - `feedback enable, parser, debugging` - Trace tokenizing and binding
//! - `help` - List commands
//! - `quit` or `exit` - Leave the prompt
//!
//! ## Command History
//!
//! - Up arrow: Previous command
//! - Down arrow: Next command

use pymol_cmd::{CmdError, CommandExecutor};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run one line, printing failures the way the prompt shows them
fn execute(executor: &CommandExecutor, line: &str) {
    match executor.do_multi(line) {
        Ok(_) => {}
        // already reported
        Err(CmdError::Quiet) => {}
        Err(e) => log::error!("Error: {}", e),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let executor = CommandExecutor::new();

    for script in std::env::args().skip(1) {
        execute(&executor, &format!("run {}", script));
    }

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            log::error!("Failed to create line editor: {}", e);
            return;
        }
    };

    loop {
        match rl.readline("PyMOL> ") {
            Ok(line) => {
                let cmd = line.trim();
                if cmd.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(cmd);

                if cmd == "quit" || cmd == "exit" {
                    break;
                }
                execute(&executor, cmd);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                log::info!("EOF/interrupt received, exiting...");
                break;
            }
            Err(e) => {
                log::error!("Error reading input: {}", e);
                break;
            }
        }
    }
}
