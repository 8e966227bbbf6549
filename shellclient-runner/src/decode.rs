//! Interpretation of captured output. Pure post-processing; no process is involved.

use serde::de::DeserializeOwned;
use shellclient_core::{Result, ShellError};

/// Unicode space separators plus line and paragraph terminators
pub const WHITESPACE_AND_NEWLINES: &[char] = &[
    '\t', '\n', '\u{000B}', '\u{000C}', '\r', ' ', '\u{0085}', '\u{00A0}', '\u{1680}',
    '\u{2000}', '\u{2001}', '\u{2002}', '\u{2003}', '\u{2004}', '\u{2005}', '\u{2006}',
    '\u{2007}', '\u{2008}', '\u{2009}', '\u{200A}', '\u{2028}', '\u{2029}', '\u{202F}',
    '\u{205F}', '\u{3000}',
];

/// Decode `bytes` as UTF-8, trimming any of `trim` from both ends
pub fn decode_string(bytes: &[u8], trim: Option<&[char]>) -> Result<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ShellError::Decoding(format!("Output is not valid UTF-8: {}", e)))?;

    let text = match trim {
        Some(chars) => text.trim_matches(|c: char| chars.contains(&c)),
        None => text,
    };
    Ok(text.to_string())
}

pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| ShellError::Decoding(format!("Output is not valid JSON: {}", e)))
}
