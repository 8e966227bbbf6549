use crate::error::ShellError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const RAW_SUFFIX: &str = ":raw";
const CUSTOM_PREFIX: &str = "custom:";

/// The program used to run a command's arguments
#[derive(Debug, Clone)]
pub enum Interpreter {
    Bash { use_dash_c: bool },
    Csh { use_dash_c: bool },
    Sh { use_dash_c: bool },
    Tcsh { use_dash_c: bool },
    Zsh { use_dash_c: bool },
    /// `/usr/bin/env`, optionally naming the interpreter it is expected to locate.
    /// Never wraps arguments with `-c`.
    Env(Option<Box<Interpreter>>),
    Custom { path: String, use_dash_c: bool },
}

impl Interpreter {
    pub fn bash() -> Self {
        Interpreter::Bash { use_dash_c: true }
    }

    pub fn csh() -> Self {
        Interpreter::Csh { use_dash_c: true }
    }

    pub fn sh() -> Self {
        Interpreter::Sh { use_dash_c: true }
    }

    pub fn tcsh() -> Self {
        Interpreter::Tcsh { use_dash_c: true }
    }

    pub fn zsh() -> Self {
        Interpreter::Zsh { use_dash_c: true }
    }

    pub fn env() -> Self {
        Interpreter::Env(None)
    }

    pub fn env_with(inner: Interpreter) -> Self {
        Interpreter::Env(Some(Box::new(inner)))
    }

    pub fn custom<P: Into<String>>(path: P, use_dash_c: bool) -> Self {
        Interpreter::Custom {
            path: path.into(),
            use_dash_c,
        }
    }

    /// Absolute path of the program to launch
    pub fn executable_path(&self) -> &str {
        match self {
            Interpreter::Bash { .. } => "/bin/bash",
            Interpreter::Csh { .. } => "/bin/csh",
            Interpreter::Sh { .. } => "/bin/sh",
            Interpreter::Tcsh { .. } => "/bin/tcsh",
            Interpreter::Zsh { .. } => "/bin/zsh",
            Interpreter::Env(_) => "/usr/bin/env",
            Interpreter::Custom { path, .. } => path,
        }
    }

    /// Last path component of the executable
    pub fn name(&self) -> &str {
        let path = self.executable_path();
        path.rsplit('/')
            .find(|component| !component.is_empty())
            .unwrap_or(path)
    }

    pub fn wraps_with_dash_c(&self) -> bool {
        match self {
            Interpreter::Env(_) => false,
            Interpreter::Bash { use_dash_c }
            | Interpreter::Csh { use_dash_c }
            | Interpreter::Sh { use_dash_c }
            | Interpreter::Tcsh { use_dash_c }
            | Interpreter::Zsh { use_dash_c }
            | Interpreter::Custom { use_dash_c, .. } => *use_dash_c,
        }
    }

    /// Textual form accepted by `FromStr`, e.g. `bash`, `zsh:raw`, `env:bash`.
    ///
    /// Custom paths that would read back as something else (`bash`, `fish`, `env:x/y`)
    /// get a `custom:` prefix.
    pub fn as_spec(&self) -> String {
        match self {
            Interpreter::Env(None) => "env".to_string(),
            Interpreter::Env(Some(inner)) => format!("env:{}", inner.as_spec()),
            Interpreter::Custom { path, use_dash_c } => {
                let bare = with_raw_suffix(path, *use_dash_c);
                match bare.parse::<Interpreter>() {
                    Ok(Interpreter::Custom {
                        path: parsed,
                        use_dash_c: flag,
                    }) if parsed == *path && flag == *use_dash_c => bare,
                    _ => format!("{}{}", CUSTOM_PREFIX, bare),
                }
            }
            builtin => with_raw_suffix(builtin.name(), builtin.wraps_with_dash_c()),
        }
    }
}

fn with_raw_suffix(base: &str, use_dash_c: bool) -> String {
    if use_dash_c {
        base.to_string()
    } else {
        format!("{}{}", base, RAW_SUFFIX)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Interpreter::zsh()
        } else {
            Interpreter::sh()
        }
    }
}

// Variant identity is irrelevant: only the launched program and the -c behaviour count.
impl PartialEq for Interpreter {
    fn eq(&self, other: &Self) -> bool {
        self.executable_path() == other.executable_path()
            && self.wraps_with_dash_c() == other.wraps_with_dash_c()
    }
}

impl Eq for Interpreter {}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.executable_path())
    }
}

impl FromStr for Interpreter {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, rest) = match s.split_once(':') {
            Some((head, rest)) => (head, Some(rest)),
            None => (s, None),
        };
        if head.eq_ignore_ascii_case("env") {
            return match rest {
                None => Ok(Interpreter::env()),
                Some(inner) => Ok(Interpreter::env_with(inner.parse()?)),
            };
        }

        let (base, use_dash_c) = match s.strip_suffix(RAW_SUFFIX) {
            Some(base) => (base, false),
            None => (s, true),
        };

        if let Some(path) = base.strip_prefix(CUSTOM_PREFIX) {
            if path.is_empty() {
                return Err(ShellError::UnknownInterpreter(s.to_string()));
            }
            return Ok(Interpreter::custom(path, use_dash_c));
        }

        match base.to_ascii_lowercase().as_str() {
            "bash" => Ok(Interpreter::Bash { use_dash_c }),
            "csh" => Ok(Interpreter::Csh { use_dash_c }),
            "sh" => Ok(Interpreter::Sh { use_dash_c }),
            "tcsh" => Ok(Interpreter::Tcsh { use_dash_c }),
            "zsh" => Ok(Interpreter::Zsh { use_dash_c }),
            _ if base.contains('/') => Ok(Interpreter::custom(base, use_dash_c)),
            _ => Err(ShellError::UnknownInterpreter(s.to_string())),
        }
    }
}

impl Serialize for Interpreter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_spec())
    }
}

impl<'de> Deserialize<'de> for Interpreter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
