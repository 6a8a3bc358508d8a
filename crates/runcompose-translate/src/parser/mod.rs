//! `docker run` command-line parser.
//!
//! Turns raw command text into a [`ParsedCommand`] through shell-style
//! lexing followed by a left-to-right scan of flags and positional words.

pub mod flags;
pub mod lexer;
pub mod specs;

use std::collections::BTreeMap;

use runcompose_common::constants::COMMAND_PREFIX;
use runcompose_common::error::{ConvertError, Result};

/// Value recorded for one canonical parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A switch, or a flag that appeared without a value.
    Flag(bool),
    /// The last value given to a non-repeatable parameter.
    Single(String),
    /// Every value given to a repeatable parameter, in encounter order.
    Multi(Vec<String>),
}

impl ParamValue {
    /// All string values carried by this parameter.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Flag(_) => &[],
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multi(values) => values,
        }
    }

    /// The single value, or the last of several.
    pub fn as_str(&self) -> Option<&str> {
        self.values().last().map(String::as_str)
    }

    /// Whether the parameter counts as switched on.
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::Flag(false))
    }
}

/// Structured form of one `docker run` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    image: Option<String>,
    command: Vec<String>,
    params: BTreeMap<String, ParamValue>,
}

impl ParsedCommand {
    /// Image reference, the first positional word.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Words following the image.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// All recorded parameters keyed by canonical name.
    pub const fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    /// Raw value of a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Whether the parameter appeared at all.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// String value of a parameter, if it carried one.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// All string values of a parameter; empty when absent.
    pub fn values(&self, name: &str) -> &[String] {
        self.get(name).map(ParamValue::values).unwrap_or_default()
    }

    /// Whether a switch is present and not explicitly turned off.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(ParamValue::is_set)
    }

    fn set_flag(&mut self, name: String, on: bool) {
        let _ = self.params.insert(name, ParamValue::Flag(on));
    }

    fn add_value(&mut self, name: String, value: String) {
        if flags::is_repeatable(&name) {
            match self.params.get_mut(&name) {
                Some(ParamValue::Multi(values)) => values.push(value),
                _ => {
                    let _ = self.params.insert(name, ParamValue::Multi(vec![value]));
                }
            }
        } else {
            let _ = self.params.insert(name, ParamValue::Single(value));
        }
    }

    /// A value-taking flag appeared with nothing to consume.
    fn add_valueless(&mut self, name: String) {
        if flags::is_repeatable(&name) {
            let _ = self.params.entry(name).or_insert(ParamValue::Flag(true));
        } else {
            self.set_flag(name, true);
        }
    }

    fn add_positional(&mut self, word: String) {
        if self.image.is_none() {
            self.image = Some(word);
        } else {
            self.command.push(word);
        }
    }
}

fn is_flag(word: &str) -> bool {
    word.len() > 1 && word.starts_with('-')
}

/// Splits `--name=value` into its spelling and inline value.
fn split_inline_value(word: &str) -> (&str, Option<&str>) {
    if word.starts_with("--") {
        if let Some((spelling, value)) = word.split_once('=') {
            return (spelling, Some(value));
        }
    }
    (word, None)
}

/// Parses one `docker run` command line.
///
/// Flags are only recognized before the image; every word after it belongs
/// to the container command.
///
/// # Errors
///
/// Returns [`ConvertError::Format`] if the line does not start with
/// `docker run` or contains an unterminated quote.
pub fn parse_command(line: &str) -> Result<ParsedCommand> {
    let text = lexer::collapse_continuations(line.trim_start());
    if !text.starts_with(COMMAND_PREFIX) {
        return Err(ConvertError::format(
            line,
            format!("command must start with '{COMMAND_PREFIX}'"),
        ));
    }

    let words = lexer::tokenize(&text)?;
    let prefix: Vec<&str> = COMMAND_PREFIX.split_whitespace().collect();
    if words.len() < prefix.len() || words.iter().zip(&prefix).any(|(w, p)| w != p) {
        return Err(ConvertError::format(
            line,
            format!("command must start with '{COMMAND_PREFIX}'"),
        ));
    }

    let parsed = scan(&words[prefix.len()..]);
    tracing::debug!(
        image = parsed.image().unwrap_or(""),
        params = parsed.params.len(),
        args = parsed.command.len(),
        "parsed docker run command"
    );
    Ok(parsed)
}

fn scan(words: &[String]) -> ParsedCommand {
    let mut parsed = ParsedCommand::default();
    let mut i = 0;

    while i < words.len() {
        let word = &words[i];
        i += 1;

        if parsed.image.is_some() || !is_flag(word) {
            parsed.add_positional(word.clone());
            continue;
        }

        if let Some(names) = flags::expand_short_cluster(word) {
            for name in names {
                parsed.set_flag(name.to_owned(), true);
            }
            continue;
        }

        let (spelling, inline) = split_inline_value(word);
        let name = flags::canonical_name(spelling);

        if flags::is_boolean(&name) {
            let on = inline.is_none_or(|v| !matches!(v, "false" | "0"));
            parsed.set_flag(name, on);
        } else if let Some(value) = inline {
            parsed.add_value(name, value.to_owned());
        } else {
            match words.get(i) {
                Some(next) if !next.starts_with('-') => {
                    parsed.add_value(name, next.clone());
                    i += 1;
                }
                _ => parsed.add_valueless(name),
            }
        }
    }

    parsed
}

/// Splits free text into individual `docker run` commands.
///
/// Each occurrence of the prefix starts a command that runs until the next
/// occurrence or the end of the text. Blank spans are dropped.
pub fn split_commands(text: &str) -> Vec<String> {
    let starts: Vec<usize> = text.match_indices(COMMAND_PREFIX).map(|(i, _)| i).collect();
    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(text.len());
            text[start..end].trim()
        })
        .filter(|span| !span.is_empty())
        .map(str::to_owned)
        .collect()
}
