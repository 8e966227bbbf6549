use std::sync::Mutex;
use tracing::Level;

/// Sink for the messages the executor emits before launching a child.
///
/// Purely observational; a logger never affects whether or how a command runs.
pub trait CommandLogger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
}

/// Forwards to `tracing` under the `shellclient` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl CommandLogger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "shellclient", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "shellclient", "{}", message);
    }
}

/// Keeps every message in memory, in the order received
#[derive(Debug, Default)]
pub struct BufferLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl BufferLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, level: Level, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((level, message.to_string()));
    }
}

impl CommandLogger for BufferLogger {
    fn debug(&self, message: &str) {
        self.push(Level::DEBUG, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::INFO, message);
    }
}
