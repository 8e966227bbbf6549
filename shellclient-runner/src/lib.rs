//! Runs [`shellclient_core::Command`] descriptors as child processes.

pub mod capture;
pub mod client;
pub mod decode;
pub mod executor;
pub mod logger;
pub mod process;

pub use capture::{capture_commands, capture_commands_async, CapturingShell};
pub use client::{AsyncShellClient, ShellClient};
pub use decode::{decode_json, decode_string, WHITESPACE_AND_NEWLINES};
pub use executor::ProcessExecutor;
pub use logger::{BufferLogger, CommandLogger, TracingLogger};
pub use process::{locate_interpreter, ProcessConfig};
