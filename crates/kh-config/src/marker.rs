//! Substitution markers embedded in string values
//!
//! Two grammars are recognized:
//!
//! ```text
//! {{ file = 'path/to/values.yaml' }}      whole value replaced by the file's tree
//! prefix-{{ env = 'VAR_NAME' }}-suffix    VAR_NAME's value spliced into the string
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Include marker; must span the whole value.
pub static FILE_INCLUDE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\{\s?file\s?=\s?'(?P<file>[^']*)'\s?\}\}$").unwrap()
});

/// Environment marker with literal text on either side.
///
/// A single trailing newline, as left by YAML block scalars, is accepted
/// and dropped.
pub static ENV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>.*)\{\{\s*env\s*=\s*'(?P<env>[^']*)'\s*\}\}(?P<postfix>.*)\n?$").unwrap()
});

/// A marker recognized in a string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker<'a> {
    /// Replace the value with the parsed content of `file`
    FileInclude { file: &'a str },
    /// Splice environment variable `name` between `prefix` and `suffix`
    Env {
        prefix: &'a str,
        name: &'a str,
        suffix: &'a str,
    },
}

impl<'a> Marker<'a> {
    /// Parse a marker out of a raw value.
    ///
    /// The include grammar is tried first; `None` means the value is a
    /// plain literal.
    pub fn parse(value: &'a str) -> Option<Self> {
        if let Some(caps) = FILE_INCLUDE_PATTERN.captures(value) {
            let file = caps.name("file")?.as_str();
            return Some(Marker::FileInclude { file });
        }

        let caps = ENV_PATTERN.captures(value)?;
        Some(Marker::Env {
            prefix: caps.name("prefix")?.as_str(),
            name: caps.name("env")?.as_str(),
            suffix: caps.name("postfix")?.as_str(),
        })
    }
}
