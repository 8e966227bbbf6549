use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process exited with status {exit_code}")]
    Process { exit_code: i32 },

    #[error("Process terminated by signal {signal}")]
    Signaled { signal: i32 },

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Unknown interpreter: {0}")]
    UnknownInterpreter(String),

    #[error("No command was captured")]
    NothingCaptured,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Exit code of the child, when it ran and exited non-zero.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ShellError::Process { exit_code } => Some(*exit_code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
