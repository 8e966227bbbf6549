use anyhow::Context;
use serde::Deserialize;
use shellclient_core::{Command, Interpreter};
use shellclient_runner::locate_interpreter;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Defaults read from a TOML file, e.g.
///
/// ```toml
/// interpreter = "bash"
/// working_directory = "/srv/app"
///
/// [environment]
/// RUST_LOG = "debug"
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub interpreter: Option<Interpreter>,
    pub environment: BTreeMap<String, String>,
    pub working_directory: Option<PathBuf>,
}

/// Values given on the command line; these win over the config file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub shell: Option<String>,
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
}

impl ClientConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn resolve_interpreter(&self, overrides: &Overrides) -> anyhow::Result<Interpreter> {
        match &overrides.shell {
            Some(spec) => Ok(locate_interpreter(spec)?),
            None => Ok(self.interpreter.clone().unwrap_or_default()),
        }
    }

    /// Build the command to run from `args`, applying config then CLI settings
    pub fn build_command(
        &self,
        overrides: &Overrides,
        interpreter: Interpreter,
        args: Vec<String>,
    ) -> Command {
        let mut command = Command::new(interpreter, args);

        let mut environment = self.environment.clone();
        environment.extend(overrides.env.iter().cloned());
        if !environment.is_empty() {
            command = command.with_envs(environment);
        }

        if let Some(dir) = overrides.cwd.as_ref().or(self.working_directory.as_ref()) {
            command = command.with_working_directory(dir);
        }
        command
    }
}

/// Parse a `KEY=VALUE` pair for `--env`
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}
