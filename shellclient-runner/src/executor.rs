use crate::client::{AsyncShellClient, ShellClient};
use crate::logger::{CommandLogger, TracingLogger};
use crate::process::{check_exit_status, ProcessConfig};
use async_trait::async_trait;
use shellclient_core::{Command, Result, RunMode};
use std::process::ExitStatus;
use std::sync::Arc;
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

/// Runs commands as real child processes
#[derive(Clone)]
pub struct ProcessExecutor {
    logger: Arc<dyn CommandLogger>,
    kill_on_drop: bool,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self {
            logger: Arc::new(TracingLogger),
            kill_on_drop: false,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn CommandLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// When set, dropping an in-flight `run_async` future kills the child.
    /// Otherwise the child keeps running and is reaped in the background.
    pub fn with_kill_on_drop(mut self, kill_on_drop: bool) -> Self {
        self.kill_on_drop = kill_on_drop;
        self
    }

    /// Run `command`, blocking the current thread until the child exits.
    ///
    /// Returns the captured stdout for [`RunMode::Background`] and an empty buffer for
    /// [`RunMode::Foreground`]. A non-zero exit discards anything captured.
    pub fn run(&self, command: &Command, mode: RunMode) -> Result<Vec<u8>> {
        let span = invocation_span(mode);
        let _entered = span.enter();

        let config = self.prepare(command, mode);
        let mut child = config
            .to_std_command()
            .spawn()
            .map_err(|e| config.launch_error(e))?;

        let (status, stdout) = match mode {
            RunMode::Foreground => (child.wait()?, Vec::new()),
            RunMode::Background => {
                // Drains stdout and stderr together before reaping, so a chatty child
                // never blocks on a full pipe.
                let output = child.wait_with_output()?;
                (output.status, output.stdout)
            }
        };

        finish(status, stdout)
    }

    /// Same contract as [`ProcessExecutor::run`] without blocking the worker thread.
    pub async fn run_async(&self, command: &Command, mode: RunMode) -> Result<Vec<u8>> {
        let span = invocation_span(mode);

        async move {
            let config = self.prepare(command, mode);
            let mut cmd = config.to_tokio_command();
            cmd.kill_on_drop(self.kill_on_drop);
            let mut child = cmd.spawn().map_err(|e| config.launch_error(e))?;

            let (status, stdout) = match mode {
                RunMode::Foreground => (child.wait().await?, Vec::new()),
                RunMode::Background => {
                    let output = child.wait_with_output().await?;
                    (output.status, output.stdout)
                }
            };

            finish(status, stdout)
        }
        .instrument(span)
        .await
    }

    fn prepare(&self, command: &Command, mode: RunMode) -> ProcessConfig {
        self.logger.debug(&format!("Running in {} shell.", mode));
        self.logger.info(&format!("$ {}", command.command_line()));
        ProcessConfig::from_command(command, mode)
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn invocation_span(mode: RunMode) -> tracing::Span {
    let invocation_id = Uuid::new_v4();
    tracing::debug_span!("shell_command", invocation_id = %invocation_id, mode = %mode)
}

fn finish(status: ExitStatus, stdout: Vec<u8>) -> Result<Vec<u8>> {
    match check_exit_status(status) {
        Ok(()) => {
            debug!(captured_bytes = stdout.len(), "Command completed");
            Ok(stdout)
        }
        Err(err) => {
            warn!(error = %err, "Command failed");
            Err(err)
        }
    }
}

impl ShellClient for ProcessExecutor {
    fn run_foreground(&self, command: &Command) -> Result<()> {
        self.run(command, RunMode::Foreground).map(|_| ())
    }

    fn run_background(&self, command: &Command) -> Result<Vec<u8>> {
        self.run(command, RunMode::Background)
    }
}

#[async_trait]
impl AsyncShellClient for ProcessExecutor {
    async fn run_foreground(&self, command: &Command) -> Result<()> {
        self.run_async(command, RunMode::Foreground).await.map(|_| ())
    }

    async fn run_background(&self, command: &Command) -> Result<Vec<u8>> {
        self.run_async(command, RunMode::Background).await
    }
}
