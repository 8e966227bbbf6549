use crate::decode::{decode_json, decode_string};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shellclient_core::{Command, Result};

/// Blocking entry point application code depends on.
///
/// Implemented by [`crate::ProcessExecutor`] for real work and by
/// [`crate::CapturingShell`] in tests.
pub trait ShellClient: Send + Sync {
    /// Run with stdout/stderr inherited from this process
    fn run_foreground(&self, command: &Command) -> Result<()>;

    /// Run with output captured; returns the child's stdout
    fn run_background(&self, command: &Command) -> Result<Vec<u8>>;

    /// Background run decoded as UTF-8, optionally trimming `trim` from both ends
    fn background_string(&self, command: &Command, trim: Option<&[char]>) -> Result<String> {
        let output = self.run_background(command)?;
        decode_string(&output, trim)
    }

    fn background_json<T: DeserializeOwned>(&self, command: &Command) -> Result<T>
    where
        Self: Sized,
    {
        let output = self.run_background(command)?;
        decode_json(&output)
    }

    /// Background run handed to a caller-supplied decoder
    fn background_decoded<T, F>(&self, command: &Command, decode: F) -> Result<T>
    where
        F: FnOnce(&[u8]) -> Result<T>,
        Self: Sized,
    {
        let output = self.run_background(command)?;
        decode(&output)
    }
}

/// Non-blocking counterpart of [`ShellClient`] with identical results
#[async_trait]
pub trait AsyncShellClient: Send + Sync {
    async fn run_foreground(&self, command: &Command) -> Result<()>;

    async fn run_background(&self, command: &Command) -> Result<Vec<u8>>;

    async fn background_string(&self, command: &Command, trim: Option<&[char]>) -> Result<String> {
        let output = self.run_background(command).await?;
        decode_string(&output, trim)
    }

    async fn background_json<T: DeserializeOwned + Send>(&self, command: &Command) -> Result<T>
    where
        Self: Sized,
    {
        let output = self.run_background(command).await?;
        decode_json(&output)
    }

    async fn background_decoded<T, F>(&self, command: &Command, decode: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&[u8]) -> Result<T> + Send,
        Self: Sized,
    {
        let output = self.run_background(command).await?;
        decode(&output)
    }
}
