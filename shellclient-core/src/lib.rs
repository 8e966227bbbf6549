//! Command descriptors for running external programs through a shell interpreter.

pub mod command;
pub mod error;
pub mod interpreter;
pub mod models;

pub use command::Command;
pub use error::{Result, ShellError};
pub use interpreter::Interpreter;
pub use models::{Argument, RunMode};
