//! Error types for JSON parsing operations.

use data_mapper::DeserializationError;
use std::fmt;
use thiserror::Error;

/// Result type for JSON parsing operations.
pub type Result<T> = std::result::Result<T, JsonError>;

/// Error type for JSON parsing failures. Always fatal for the whole document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonError {
    /// The input is not valid UTF-8.
    #[error("Couldn't load JSON: {0}")]
    Load(#[from] std::str::Utf8Error),
    /// A grammar violation. `offset` counts characters, `line` and `column` are 1-based.
    #[error("Couldn't parse JSON. {message} at {line}:{column}")]
    Parse {
        offset: usize,
        line: usize,
        column: usize,
        /// `None` at the end of input.
        character: Option<char>,
        message: ParseMessage,
    },
}

impl JsonError {
    /// The structured message of a parse error.
    pub fn parse_message(&self) -> Option<&ParseMessage> {
        match self {
            JsonError::Parse { message, .. } => Some(message),
            JsonError::Load(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMessage {
    UnexpectedEof,
    OnlyWhitespaceAtEnd,
    InvalidUnicodeCharacter(u32),
    UnknownEscapedCharacter(char),
    UnexpectedCharacter { character: char, allowed: Vec<char> },
    UnescapedControlCharacter(char),
    InvalidNumber,
}

impl fmt::Display for ParseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMessage::UnexpectedEof => write!(f, "Unexpected end of input"),
            ParseMessage::OnlyWhitespaceAtEnd => {
                write!(f, "Only whitespace is allowed after the top-level value")
            }
            ParseMessage::InvalidUnicodeCharacter(code) => {
                write!(f, "Couldn't convert {:#06X} to a Unicode character", code)
            }
            ParseMessage::UnknownEscapedCharacter(c) => {
                write!(f, "Unknown escaped character '\\{}'", c)
            }
            ParseMessage::UnexpectedCharacter { character, allowed } => {
                let allowed: Vec<String> = allowed.iter().map(|c| c.to_string()).collect();
                write!(
                    f,
                    "Unexpected character '{}'. Expected one of: {}",
                    character.escape_default(),
                    allowed.join(", ")
                )
            }
            ParseMessage::UnescapedControlCharacter(c) => {
                write!(f, "Unescaped control character {:#06X} in string", *c as u32)
            }
            ParseMessage::InvalidNumber => write!(f, "Couldn't parse number"),
        }
    }
}

/// Either side of reading a typed value out of JSON text.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_display() {
        let err = JsonError::Parse {
            offset: 6,
            line: 1,
            column: 7,
            character: Some('}'),
            message: ParseMessage::InvalidNumber,
        };
        assert_eq!(err.to_string(), "Couldn't parse JSON. Couldn't parse number at 1:7");

        let message = ParseMessage::UnexpectedCharacter {
            character: 'x',
            allowed: vec![',', ']'],
        };
        assert_eq!(
            message.to_string(),
            "Unexpected character 'x'. Expected one of: ,, ]"
        );
    }

    #[test]
    fn test_message_formats() {
        assert_eq!(
            ParseMessage::InvalidUnicodeCharacter(0xD800).to_string(),
            "Couldn't convert 0xD800 to a Unicode character"
        );
        assert_eq!(
            ParseMessage::UnknownEscapedCharacter('q').to_string(),
            "Unknown escaped character '\\q'"
        );
        assert_eq!(
            ParseMessage::UnescapedControlCharacter('\n').to_string(),
            "Unescaped control character 0x000A in string"
        );
    }
}
