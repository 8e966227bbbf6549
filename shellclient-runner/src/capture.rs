use crate::client::{AsyncShellClient, ShellClient};
use async_trait::async_trait;
use shellclient_core::{Command, Result, ShellError};
use std::future::Future;
use std::sync::{Arc, Mutex};

type ForegroundHook = Box<dyn Fn(&Command) -> Result<()> + Send + Sync>;
type BackgroundHook = Box<dyn Fn(&Command) -> Result<Vec<u8>> + Send + Sync>;

/// Test double that records commands instead of running them.
///
/// Background runs return the canned output (empty unless set with
/// [`CapturingShell::with_output`]); foreground runs succeed. Hooks replace either
/// behaviour, and commands are recorded before a hook runs.
#[derive(Default)]
pub struct CapturingShell {
    commands: Mutex<Vec<Command>>,
    output: Vec<u8>,
    foreground: Option<ForegroundHook>,
    background: Option<BackgroundHook>,
}

impl CapturingShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output<B: Into<Vec<u8>>>(mut self, output: B) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_foreground<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Command) -> Result<()> + Send + Sync + 'static,
    {
        self.foreground = Some(Box::new(hook));
        self
    }

    pub fn with_background<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Command) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.background = Some(Box::new(hook));
        self
    }

    /// Every command seen so far, oldest first
    pub fn commands(&self) -> Vec<Command> {
        self.lock().clone()
    }

    pub fn last_command(&self) -> Option<Command> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Command>> {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, command: &Command) {
        self.lock().push(command.clone());
    }

    fn foreground(&self, command: &Command) -> Result<()> {
        self.record(command);
        match &self.foreground {
            Some(hook) => hook(command),
            None => Ok(()),
        }
    }

    fn background(&self, command: &Command) -> Result<Vec<u8>> {
        self.record(command);
        match &self.background {
            Some(hook) => hook(command),
            None => Ok(self.output.clone()),
        }
    }

    fn into_captured(self) -> Result<Vec<Command>> {
        let commands = self
            .commands
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if commands.is_empty() {
            return Err(ShellError::NothingCaptured);
        }
        Ok(commands)
    }
}

impl ShellClient for CapturingShell {
    fn run_foreground(&self, command: &Command) -> Result<()> {
        self.foreground(command)
    }

    fn run_background(&self, command: &Command) -> Result<Vec<u8>> {
        self.background(command)
    }
}

#[async_trait]
impl AsyncShellClient for CapturingShell {
    async fn run_foreground(&self, command: &Command) -> Result<()> {
        self.foreground(command)
    }

    async fn run_background(&self, command: &Command) -> Result<Vec<u8>> {
        self.background(command)
    }
}

/// Run `operation` against a fresh [`CapturingShell`] and hand back what it ran.
///
/// Fails with [`ShellError::NothingCaptured`] if the operation never touched the shell.
pub fn capture_commands<F>(operation: F) -> Result<Vec<Command>>
where
    F: FnOnce(&CapturingShell) -> Result<()>,
{
    let shell = CapturingShell::new();
    operation(&shell)?;
    shell.into_captured()
}

pub async fn capture_commands_async<F, Fut>(operation: F) -> Result<Vec<Command>>
where
    F: FnOnce(Arc<CapturingShell>) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let shell = Arc::new(CapturingShell::new());
    operation(Arc::clone(&shell)).await?;
    match Arc::try_unwrap(shell) {
        Ok(shell) => shell.into_captured(),
        Err(shared) => {
            let commands = shared.commands();
            if commands.is_empty() {
                return Err(ShellError::NothingCaptured);
            }
            Ok(commands)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellclient_core::Interpreter;

    fn describe_tag<S: ShellClient>(shell: &S) -> Result<()> {
        shell.run_foreground(&Command::new(
            Interpreter::env(),
            ["git", "describe", "--exact-match", "--tags"],
        ))
    }

    #[test]
    fn test_records_commands_in_order() {
        let shell = CapturingShell::new();
        ShellClient::run_foreground(&shell, &Command::from_args(["echo", "one"])).unwrap();
        ShellClient::run_background(&shell, &Command::from_args(["echo", "two"])).unwrap();

        let commands = shell.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], Command::from_args(["echo", "one"]));
        assert_eq!(shell.last_command(), Some(Command::from_args(["echo", "two"])));
    }

    #[test]
    fn test_default_background_output_is_empty() {
        let shell = CapturingShell::new();
        let output = ShellClient::run_background(&shell, &Command::from_args(["ls"])).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_foreground_hook_can_fail() {
        let shell = CapturingShell::new()
            .with_foreground(|_| Err(ShellError::Process { exit_code: 128 }));
        let result = ShellClient::run_foreground(&shell, &Command::from_args(["git", "describe"]));

        assert!(matches!(result, Err(ShellError::Process { exit_code: 128 })));
        assert_eq!(shell.commands().len(), 1);
    }

    #[test]
    fn test_background_hook_sees_each_command() {
        let shell = CapturingShell::new().with_background(|command| {
            match command.flattened_arguments().first().map(String::as_str) {
                Some("whoami") => Ok(b"root\n".to_vec()),
                _ => Err(ShellError::Process { exit_code: 1 }),
            }
        });

        let output = ShellClient::run_background(&shell, &Command::from_args(["whoami"])).unwrap();
        assert_eq!(output, b"root\n");
        let result = ShellClient::run_background(&shell, &Command::from_args(["false"]));
        assert!(matches!(result, Err(ShellError::Process { exit_code: 1 })));
        assert_eq!(shell.commands().len(), 2);
    }

    #[test]
    fn test_capture_commands_returns_recorded() {
        let commands = capture_commands(|shell| describe_tag(shell)).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0].flattened_arguments(),
            vec!["git", "describe", "--exact-match", "--tags"]
        );
        assert_eq!(commands[0].interpreter(), &Interpreter::env());
    }

    #[test]
    fn test_capture_commands_requires_a_command() {
        let result = capture_commands(|_| Ok(()));
        assert!(matches!(result, Err(ShellError::NothingCaptured)));
    }

    #[tokio::test]
    async fn test_capture_commands_async() {
        let commands = capture_commands_async(|shell| async move {
            AsyncShellClient::run_foreground(shell.as_ref(), &Command::from_args(["echo", "Foo"]))
                .await
        })
        .await
        .unwrap();

        assert_eq!(commands, vec![Command::from_args(["echo", "Foo"])]);
    }

    #[tokio::test]
    async fn test_capture_commands_async_requires_a_command() {
        let result = capture_commands_async(|_shell| async { Ok(()) }).await;
        assert!(matches!(result, Err(ShellError::NothingCaptured)));
    }
}
