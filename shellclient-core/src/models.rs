use std::fmt;
use std::path::{Path, PathBuf};

/// How a command's output streams are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Inherit the parent's stdout/stderr; nothing is captured
    Foreground,
    /// Capture stdout/stderr in memory; stdout is returned to the caller
    Background,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Foreground => "foreground",
            RunMode::Background => "background",
        }
    }

    pub fn captures_output(&self) -> bool {
        matches!(self, RunMode::Background)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single command argument, or a nested list of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Value(String),
    List(Vec<Argument>),
}

impl Argument {
    /// Depth-first, left-to-right leaves of this argument
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    pub(crate) fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            Argument::Value(value) => out.push(value.clone()),
            Argument::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flatten().join(" "))
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Value(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Value(value)
    }
}

impl From<&String> for Argument {
    fn from(value: &String) -> Self {
        Argument::Value(value.clone())
    }
}

impl From<&Path> for Argument {
    fn from(value: &Path) -> Self {
        Argument::Value(value.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for Argument {
    fn from(value: PathBuf) -> Self {
        Argument::from(value.as_path())
    }
}

impl<T: Into<Argument>> From<Vec<T>> for Argument {
    fn from(values: Vec<T>) -> Self {
        Argument::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Argument>, const N: usize> From<[T; N]> for Argument {
    fn from(values: [T; N]) -> Self {
        Argument::List(values.into_iter().map(Into::into).collect())
    }
}

macro_rules! argument_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Argument::Value(value.to_string())
                }
            }
        )*
    };
}

argument_from_display!(char, i32, i64, u16, u32, u64, usize);
