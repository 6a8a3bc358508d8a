//! Shell-style word splitting of command lines using `nom`.
//!
//! Produces the list of words a POSIX shell would pass to `docker`.
//! Quotes group text into one word, backslashes escape the next character,
//! and adjacent quoted and unquoted pieces join into a single word.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::{anychar, char, multispace0},
    combinator::{cut, map, opt},
    multi::many1,
    sequence::{delimited, preceded},
};
use runcompose_common::error::{ConvertError, Result};

fn is_plain(c: char) -> bool {
    !c.is_whitespace() && c != '\'' && c != '"' && c != '\\'
}

/// Replaces backslash line continuations with a single space.
///
/// Spaces or tabs between the backslash and the line break are part of the
/// continuation. Any other backslash keeps the character it escapes.
pub fn collapse_continuations(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let padded = after.trim_start_matches([' ', '\t']);
        if let Some(next) = padded
            .strip_prefix("\r\n")
            .or_else(|| padded.strip_prefix('\n'))
        {
            out.push(' ');
            rest = next;
        } else {
            let mut chars = after.chars();
            out.push('\\');
            out.extend(chars.next());
            rest = chars.as_str();
        }
    }
    out.push_str(rest);
    out
}

/// Unquoted run of ordinary characters.
fn plain(input: &str) -> IResult<&str, String> {
    map(take_while1(is_plain), str::to_owned).parse(input)
}

/// `'...'`: everything up to the next single quote, taken literally.
fn single_quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_till(|c: char| c == '\''), cut(char('\''))),
        str::to_owned,
    )
    .parse(input)
}

/// `"..."`: backslash only escapes `\`, `"`, `$`, `` ` `` and newline.
fn double_quoted(input: &str) -> IResult<&str, String> {
    let (input, _) = char('"')(input)?;
    let mut result = String::new();
    let mut chars = input.char_indices();
    loop {
        match chars.next() {
            Some((idx, '"')) => return Ok((&input[idx + 1..], result)),
            Some((_, '\\')) => match chars.next() {
                Some((_, c @ ('\\' | '"' | '$' | '`'))) => result.push(c),
                Some((_, '\n')) => {}
                Some((_, c)) => {
                    result.push('\\');
                    result.push(c);
                }
                None => break,
            },
            Some((_, c)) => result.push(c),
            None => break,
        }
    }
    Err(nom::Err::Failure(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Unquoted `\x`: the escaped character itself. A trailing lone backslash
/// contributes nothing.
fn escaped(input: &str) -> IResult<&str, String> {
    map(preceded(char('\\'), opt(anychar)), |c| {
        c.map(String::from).unwrap_or_default()
    })
    .parse(input)
}

/// One shell word made of adjacent pieces.
fn word(input: &str) -> IResult<&str, String> {
    map(
        many1(alt((plain, single_quoted, double_quoted, escaped))),
        |pieces: Vec<String>| pieces.concat(),
    )
    .parse(input)
}

/// Splits `input` into shell words.
///
/// # Errors
///
/// Returns a format error if a quoted string is not terminated.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) =
            multispace0::<&str, nom::error::Error<&str>>(remaining).map_err(|e| {
                ConvertError::format(input, format!("lexer error skipping whitespace: {e}"))
            })?;
        remaining = rest;

        if remaining.is_empty() || remaining == "\\" {
            break;
        }

        let (rest, token) = word(remaining).map_err(|_| {
            ConvertError::format(
                input,
                format!(
                    "unterminated quote near: \"{}\"",
                    remaining.chars().take(20).collect::<String>()
                ),
            )
        })?;
        words.push(token);
        remaining = rest;
    }

    Ok(words)
}
