// Translation between command descriptors and OS processes

use shellclient_core::{Command, Interpreter, Result, RunMode, ShellError};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

/// Everything needed to spawn one child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Overrides layered onto the inherited environment
    pub env: Vec<(String, String)>,
    pub working_directory: Option<PathBuf>,
    pub mode: RunMode,
}

impl ProcessConfig {
    pub fn from_command(command: &Command, mode: RunMode) -> Self {
        let env = command
            .environment()
            .map(|vars| {
                vars.iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            program: command.interpreter().executable_path().to_string(),
            args: command.argv(),
            env,
            working_directory: command.working_directory().map(|dir| dir.to_path_buf()),
            mode,
        }
    }

    /// Builds the std command; foreground inherits stdio, background pipes stdout/stderr.
    /// `env` is layered onto the inherited environment.
    pub fn to_std_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.env.iter().cloned());
        if let Some(dir) = &self.working_directory {
            cmd.current_dir(dir);
        }
        if self.mode.captures_output() {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }
        cmd
    }

    pub fn to_tokio_command(&self) -> tokio::process::Command {
        tokio::process::Command::from(self.to_std_command())
    }

    pub(crate) fn launch_error(&self, source: std::io::Error) -> ShellError {
        ShellError::Launch {
            program: self.program.clone(),
            source,
        }
    }
}

/// Maps a finished child's status onto the error taxonomy
pub fn check_exit_status(status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(exit_code) => Err(ShellError::Process { exit_code }),
        None => Err(terminated_without_code(status)),
    }
}

#[cfg(unix)]
fn terminated_without_code(status: ExitStatus) -> ShellError {
    use std::os::unix::process::ExitStatusExt;

    match status.signal() {
        Some(signal) => ShellError::Signaled { signal },
        None => ShellError::Process { exit_code: -1 },
    }
}

#[cfg(not(unix))]
fn terminated_without_code(_status: ExitStatus) -> ShellError {
    ShellError::Process { exit_code: -1 }
}

/// Resolves an interpreter by its textual form, falling back to a `PATH` lookup for
/// bare program names such as `fish` or `nu`.
pub fn locate_interpreter(spec: &str) -> Result<Interpreter> {
    match spec.parse::<Interpreter>() {
        Err(ShellError::UnknownInterpreter(_)) if !spec.contains(':') => {
            let path = which::which(spec.trim())
                .map_err(|_| ShellError::UnknownInterpreter(spec.to_string()))?;
            Ok(Interpreter::custom(path.to_string_lossy(), true))
        }
        other => other,
    }
}
