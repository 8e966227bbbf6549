use crate::interpreter::Interpreter;
use crate::models::Argument;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Describes a shell invocation without running it.
///
/// Environment entries are overlaid onto the inherited process environment when the
/// command runs; on a key collision the command's value wins.
#[derive(Debug, Clone, Default)]
pub struct Command {
    interpreter: Interpreter,
    arguments: Vec<Argument>,
    environment: Option<BTreeMap<String, String>>,
    working_directory: Option<PathBuf>,
}

impl Command {
    pub fn new<I, A>(interpreter: Interpreter, arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argument>,
    {
        Self {
            interpreter,
            arguments: arguments.into_iter().map(Into::into).collect(),
            environment: None,
            working_directory: None,
        }
    }

    /// Command run by the default interpreter
    pub fn from_args<I, A>(arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argument>,
    {
        Self::new(Interpreter::default(), arguments)
    }

    pub fn with_interpreter(mut self, interpreter: Interpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_arg<A: Into<Argument>>(mut self, argument: A) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn with_env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.environment
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let environment = self.environment.get_or_insert_with(BTreeMap::new);
        for (key, value) in vars {
            environment.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_working_directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn environment(&self) -> Option<&BTreeMap<String, String>> {
        self.environment.as_ref()
    }

    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }

    /// Nested arguments flattened depth-first, siblings kept in order
    pub fn flattened_arguments(&self) -> Vec<String> {
        let mut out = Vec::new();
        for argument in &self.arguments {
            argument.flatten_into(&mut out);
        }
        out
    }

    /// Argument vector handed to `interpreter`.
    ///
    /// A `-c` interpreter receives `["-c", "<args joined by spaces>"]`; an empty argument
    /// list yields no arguments at all rather than a bare `-c`.
    pub fn final_argv(&self, interpreter: &Interpreter) -> Vec<String> {
        let arguments = self.flattened_arguments();
        if interpreter.wraps_with_dash_c() && !arguments.is_empty() {
            vec!["-c".to_string(), arguments.join(" ")]
        } else {
            arguments
        }
    }

    /// `final_argv` for this command's own interpreter
    pub fn argv(&self) -> Vec<String> {
        self.final_argv(&self.interpreter)
    }

    /// Executable path followed by the argv, as it would be typed at a prompt
    pub fn command_line(&self) -> String {
        let argv = self.argv();
        if argv.is_empty() {
            self.interpreter.executable_path().to_string()
        } else {
            format!("{} {}", self.interpreter.executable_path(), argv.join(" "))
        }
    }

    /// Inherited environment with this command's overrides applied on top
    pub fn resolved_environment_from<I, K, V>(&self, inherited: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut resolved: BTreeMap<String, String> = inherited
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        if let Some(environment) = &self.environment {
            for (key, value) in environment {
                resolved.insert(key.clone(), value.clone());
            }
        }
        resolved
    }

    /// `resolved_environment_from` over a snapshot of the current process environment
    pub fn resolved_environment(&self) -> BTreeMap<String, String> {
        let inherited = std::env::vars_os().map(|(key, value)| {
            (
                key.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        });
        self.resolved_environment_from(inherited)
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.flattened_arguments() == other.flattened_arguments()
            && self.environment == other.environment
            && self.interpreter == other.interpreter
            && self.working_directory == other.working_directory
    }
}

impl Eq for Command {}

impl<A: Into<Argument>> FromIterator<A> for Command {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Command::from_args(iter)
    }
}

/// Build a [`Command`] from a variadic argument list.
///
/// ```
/// use shellclient_core::{command, Interpreter};
///
/// let cmd = command!["echo", "hello"];
/// assert_eq!(cmd.flattened_arguments(), vec!["echo", "hello"]);
///
/// let cmd = command![shell = Interpreter::bash(); "ls", vec!["-l", "-a"]];
/// assert_eq!(cmd.argv(), vec!["-c", "ls -l -a"]);
/// ```
#[macro_export]
macro_rules! command {
    (shell = $interpreter:expr; $($arg:expr),* $(,)?) => {
        $crate::Command::new(
            $interpreter,
            ::std::vec::Vec::<$crate::Argument>::from([$($crate::Argument::from($arg)),*]),
        )
    };
    ($($arg:expr),* $(,)?) => {
        $crate::Command::from_args(
            ::std::vec::Vec::<$crate::Argument>::from([$($crate::Argument::from($arg)),*]),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_arguments_depth_first() {
        let cmd = Command::from_args(vec![
            Argument::from("a"),
            Argument::from(vec![Argument::from("b"), Argument::from(vec!["c", "d"])]),
            Argument::from("e"),
        ]);
        assert_eq!(cmd.flattened_arguments(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_final_argv_wraps_with_dash_c() {
        let cmd = Command::new(Interpreter::bash(), ["echo", "hi"]);
        assert_eq!(cmd.argv(), vec!["-c", "echo hi"]);
    }

    #[test]
    fn test_final_argv_empty_arguments_has_no_bare_dash_c() {
        let cmd = Command::new(Interpreter::zsh(), Vec::<String>::new());
        assert!(cmd.argv().is_empty());
        assert_eq!(cmd.command_line(), "/bin/zsh");
    }

    #[test]
    fn test_final_argv_env_passes_arguments_through() {
        let cmd = Command::from_args(["git", "rev-parse", "HEAD"]);
        for interpreter in [
            Interpreter::env(),
            Interpreter::env_with(Interpreter::bash()),
            Interpreter::env_with(Interpreter::custom("/bin/fish", true)),
        ] {
            assert_eq!(cmd.final_argv(&interpreter), vec!["git", "rev-parse", "HEAD"]);
        }
    }

    #[test]
    fn test_final_argv_without_dash_c() {
        let cmd = Command::new(Interpreter::Sh { use_dash_c: false }, ["script.sh", "--fast"]);
        assert_eq!(cmd.argv(), vec!["script.sh", "--fast"]);
    }

    #[test]
    fn test_resolved_environment_override_wins() {
        let cmd = Command::from_args(["env"])
            .with_env("PATH", "/custom")
            .with_env("FOO", "bar");
        let resolved = cmd.resolved_environment_from([("PATH", "/usr/bin")]);

        let mut expected = BTreeMap::new();
        expected.insert("PATH".to_string(), "/custom".to_string());
        expected.insert("FOO".to_string(), "bar".to_string());
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_resolved_environment_without_overrides_is_inherited() {
        let cmd = Command::from_args(["env"]);
        let resolved = cmd.resolved_environment_from([("HOME", "/home/me"), ("PATH", "/usr/bin")]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["HOME"], "/home/me");
    }

    #[test]
    fn test_resolved_environment_reads_process_environment() {
        let cmd = Command::from_args(["env"]).with_env("SHELLCLIENT_TEST_ONLY", "1");
        let resolved = cmd.resolved_environment();
        assert_eq!(resolved.get("SHELLCLIENT_TEST_ONLY").map(String::as_str), Some("1"));
        if let Ok(path) = std::env::var("PATH") {
            assert_eq!(resolved.get("PATH"), Some(&path));
        }
    }

    #[test]
    fn test_equality_is_structural() {
        let nested = Command::from_args(vec![Argument::from("ls"), Argument::from(["-l", "-a"])]);
        let flat = Command::from_args(["ls", "-l", "-a"]);
        assert_eq!(nested, flat);

        assert_ne!(flat.clone(), flat.clone().with_working_directory("/tmp"));
        assert_ne!(flat.clone(), flat.clone().with_env("A", "1"));
        assert_ne!(flat.clone(), flat.with_interpreter(Interpreter::env()));
    }

    #[test]
    fn test_command_macro() {
        let cmd = command!["echo", String::from("hi"), 3u32];
        assert_eq!(cmd.interpreter(), &Interpreter::default());
        assert_eq!(cmd.flattened_arguments(), vec!["echo", "hi", "3"]);

        let cmd = command![shell = Interpreter::env(); "git", vec!["describe", "--tags"]];
        assert_eq!(cmd.argv(), vec!["git", "describe", "--tags"]);
    }

    #[test]
    fn test_from_iterator() {
        let cmd: Command = ["echo", "Foo"].into_iter().collect();
        assert_eq!(cmd, Command::from_args(["echo", "Foo"]));
    }

    #[test]
    fn test_command_line_for_logging() {
        let cmd = Command::new(Interpreter::bash(), ["echo", "hi"]);
        assert_eq!(cmd.command_line(), "/bin/bash -c echo hi");
    }
}
