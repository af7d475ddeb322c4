//! Tokenizing a command line into directives.
//!
//! Follows `getopt_long` conventions for the options in
//! [`OPTIONS`](crate::target::OPTIONS):
//!
//! - `--opt value` and `--opt=value` for options taking a value
//! - a value-taking option consumes the next word whatever it looks like
//! - `--opt=value` on a flag option is an error

use std::fmt;

use crate::error::ParseError;
use crate::target::{Directive, TARGET_NAME};

/// A directive together with the value given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveToken {
    /// Resolved directive.
    pub directive: Directive,
    /// Option argument, present only for value-taking directives.
    pub value: Option<String>,
}

impl DirectiveToken {
    /// Create a token for a flag directive.
    #[must_use]
    pub const fn flag(directive: Directive) -> Self {
        Self {
            directive,
            value: None,
        }
    }

    /// Create a token carrying a value.
    #[must_use]
    pub fn with_value(directive: Directive, value: impl Into<String>) -> Self {
        Self {
            directive,
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for DirectiveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {}", self.directive, value),
            None => write!(f, "{}", self.directive),
        }
    }
}

/// Split command-line words into directive tokens.
///
/// # Errors
///
/// - `ParseError::Unrecognized` for words that are not one of our options
/// - `ParseError::MissingArgument` when a value-taking option ends the input
/// - `ParseError::UnexpectedArgument` for `--flag=value`
pub fn parse_tokens<S: AsRef<str>>(args: &[S]) -> Result<Vec<DirectiveToken>, ParseError> {
    let mut tokens = Vec::with_capacity(args.len());
    let mut words = args.iter().map(AsRef::as_ref);

    while let Some(word) = words.next() {
        let Some(body) = word.strip_prefix("--") else {
            return Err(ParseError::unrecognized(word));
        };
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let directive = Directive::from_option(name).map_err(|_| ParseError::unrecognized(word))?;

        let token = if directive.takes_value() {
            let value = match inline {
                Some(value) => value,
                None => words
                    .next()
                    .ok_or_else(|| ParseError::missing_argument(directive.to_string()))?,
            };
            DirectiveToken::with_value(directive, value)
        } else {
            if inline.is_some() {
                return Err(ParseError::UnexpectedArgument {
                    directive: directive.to_string(),
                });
            }
            DirectiveToken::flag(directive)
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Split one line of save output into words.
///
/// A leading `-j GWMETA` is dropped so both the bare extension tokens and a
/// full rule fragment can be fed back in.
#[must_use]
pub fn split_save_line(line: &str) -> Vec<String> {
    let mut words: Vec<&str> = line.split_whitespace().collect();
    if words.len() >= 2 && matches!(words[0], "-j" | "--jump") && words[1] == TARGET_NAME {
        words.drain(..2);
    }
    words.into_iter().map(str::to_string).collect()
}
