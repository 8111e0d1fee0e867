//! User-visible command output
//!
//! Commands report through a [`Console`]. Every message is also collected
//! into the [`CommandOutput`] returned by the executor.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// Maximum number of lines an [`OutputBuffer`] retains
const MAX_OUTPUT_LINES: usize = 1000;

/// Kind of output message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Normal output
    Normal,
    /// Info/status message
    Info,
    /// Warning message
    Warning,
    /// Error message
    Error,
}

/// One line of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMessage {
    pub text: String,
    pub kind: OutputKind,
}

impl OutputMessage {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: OutputKind::Normal,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: OutputKind::Info,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: OutputKind::Warning,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: OutputKind::Error,
        }
    }
}

/// Messages produced by one executed command
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub messages: Vec<OutputMessage>,
    /// Value the command returned, e.g. the text of a queried setting
    pub result: Option<String>,
}

impl CommandOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Message texts in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.text.as_str())
    }
}

/// Destination for user-visible messages
pub trait Console: Send + Sync {
    fn emit(&self, message: &OutputMessage);
}

/// Console that forwards to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConsole;

impl Console for LogConsole {
    fn emit(&self, message: &OutputMessage) {
        match message.kind {
            OutputKind::Normal | OutputKind::Info => log::info!("{}", message.text),
            OutputKind::Warning => log::warn!("{}", message.text),
            OutputKind::Error => log::error!("{}", message.text),
        }
    }
}

/// Console that keeps the most recent messages in memory
///
/// Clones share the same buffer, so one clone can be handed to an executor
/// while another reads what was printed.
#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
    buffer: Arc<Mutex<VecDeque<OutputMessage>>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts of the retained messages
    pub fn lines(&self) -> Vec<String> {
        self.buffer.lock().iter().map(|m| m.text.clone()).collect()
    }

    /// Remove and return every retained message
    pub fn take(&self) -> Vec<OutputMessage> {
        self.buffer.lock().drain(..).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Console for OutputBuffer {
    fn emit(&self, message: &OutputMessage) {
        let mut buffer = self.buffer.lock();
        buffer.push_back(message.clone());
        while buffer.len() > MAX_OUTPUT_LINES {
            buffer.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_shared_between_clones() {
        let buffer = OutputBuffer::new();
        let console: Arc<dyn Console> = Arc::new(buffer.clone());
        console.emit(&OutputMessage::info("one"));
        console.emit(&OutputMessage::error("two"));

        assert_eq!(buffer.lines(), vec!["one", "two"]);
        let taken = buffer.take();
        assert_eq!(taken[1].kind, OutputKind::Error);
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn test_buffer_is_bounded() {
        let buffer = OutputBuffer::new();
        for i in 0..MAX_OUTPUT_LINES + 5 {
            buffer.emit(&OutputMessage::normal(i.to_string()));
        }
        let lines = buffer.lines();
        assert_eq!(lines.len(), MAX_OUTPUT_LINES);
        assert_eq!(lines[0], "5");
    }
}
