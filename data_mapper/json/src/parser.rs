//! JSON parsing implementation.

use crate::error::{JsonError, ParseMessage, Result};
use data_mapper::{GenericValue, SupportedNumber};
use std::collections::HashMap;

/// Powers of ten that are exact in an `f64`.
const POWERS_OF_TEN: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Largest mantissa below which every integer is exact in an `f64`.
const MAX_EXACT_MANTISSA: f64 = 9_007_199_254_740_992.0;

const HEX_DIGITS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'A', 'B', 'C',
    'D', 'E', 'F',
];

/// Parses JSON text into a [`GenericValue`].
///
/// The parser walks the input one character at a time:
/// - Objects and arrays are driven by explicit state machines
/// - Strings handle every JSON escape, including surrogate pairs
/// - Numbers are accumulated digit by digit. Small mantissas are scaled exactly, longer
///   literals fall back to `f64`'s correctly rounded parse. Integral results become an
///   ambiguous [`GenericValue::Number`], everything else a [`GenericValue::Double`]
///
/// Duplicate object keys keep the last value.
///
/// # Examples
///
/// ```
/// use json_serializer::JsonParser;
///
/// let value = JsonParser::new().parse(br#"{"key": "value", "number": 42}"#).unwrap();
/// assert_eq!(value.get_path("key").and_then(|v| v.as_string()), Some("value"));
/// assert_eq!(value.get_path("number").and_then(|v| v.as_int()), Some(42));
/// assert_eq!(value.get_path("number").and_then(|v| v.as_double()), Some(42.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser {
    numeric_booleans: bool,
}

impl JsonParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives the literals `0` and `1` a boolean projection as well.
    pub fn with_numeric_booleans(mut self, enabled: bool) -> Self {
        self.numeric_booleans = enabled;
        self
    }

    /// # Errors
    ///
    /// [`JsonError::Load`] for invalid UTF-8, [`JsonError::Parse`] for invalid JSON.
    pub fn parse(&self, data: &[u8]) -> Result<GenericValue> {
        let text = std::str::from_utf8(data)?;
        self.parse_str(text)
    }

    /// Empty input parses as null. A leading byte order mark is ignored.
    pub fn parse_str(&self, text: &str) -> Result<GenericValue> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        if text.is_empty() {
            return Ok(GenericValue::Null);
        }

        let mut cursor = Cursor {
            chars: text.chars().collect(),
            position: 0,
            numeric_booleans: self.numeric_booleans,
        };
        let value = cursor.parse_value()?;

        while let Some(c) = cursor.next() {
            if !is_whitespace(c) {
                return Err(cursor.error(ParseMessage::OnlyWhitespaceAtEnd));
            }
        }
        Ok(value)
    }
}

/// `mantissa * 10^power` with a single rounding, when both factors are exact.
fn scale(mantissa: f64, power: i32) -> Option<f64> {
    if mantissa > MAX_EXACT_MANTISSA {
        return None;
    }
    let factor = POWERS_OF_TEN.get(power.unsigned_abs() as usize)?;
    if power >= 0 {
        Some(mantissa * factor)
    } else {
        Some(mantissa / factor)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[derive(Debug, Clone, Copy)]
enum ObjectState {
    Start,
    Key,
    Colon,
    Value,
    Comma,
}

impl ObjectState {
    fn allowed(self) -> Vec<char> {
        match self {
            ObjectState::Start => vec!['"', '}'],
            ObjectState::Key => vec![':'],
            ObjectState::Colon => Vec::new(),
            ObjectState::Value => vec![',', '}'],
            ObjectState::Comma => vec!['"'],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ArrayState {
    Start,
    Value,
    Comma,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberState {
    Start,
    Sign,
    LeadingZero,
    Int,
    Dot,
    Fraction,
    E,
    ESign,
    Exponent,
}

struct Cursor {
    chars: Vec<char>,
    position: usize,
    numeric_booleans: bool,
}

impl Cursor {
    fn parse_value(&mut self) -> Result<GenericValue> {
        let c = self.next_non_whitespace()?;
        match c {
            '"' => Ok(GenericValue::String(self.parse_string()?)),
            '{' => self.parse_object(),
            '[' => self.parse_array(),
            't' => self.parse_literal("rue", GenericValue::Bool(true)),
            'f' => self.parse_literal("alse", GenericValue::Bool(false)),
            'n' => self.parse_literal("ull", GenericValue::Null),
            _ => {
                self.back();
                self.parse_number()
            }
        }
    }

    fn parse_object(&mut self) -> Result<GenericValue> {
        let mut map = HashMap::new();
        let mut key = String::new();
        let mut state = ObjectState::Start;

        loop {
            let c = self.next_non_whitespace()?;
            state = match (state, c) {
                (ObjectState::Start | ObjectState::Comma, '"') => {
                    key = self.parse_string()?;
                    ObjectState::Key
                }
                (ObjectState::Key, ':') => ObjectState::Colon,
                (ObjectState::Value, ',') => ObjectState::Comma,
                (ObjectState::Start | ObjectState::Value, '}') => {
                    return Ok(GenericValue::Map(map));
                }
                (ObjectState::Colon, _) => {
                    self.back();
                    let value = self.parse_value()?;
                    map.insert(std::mem::take(&mut key), value);
                    ObjectState::Value
                }
                (state, character) => {
                    return Err(self.error(ParseMessage::UnexpectedCharacter {
                        character,
                        allowed: state.allowed(),
                    }));
                }
            };
        }
    }

    fn parse_array(&mut self) -> Result<GenericValue> {
        let mut items = Vec::new();
        let mut state = ArrayState::Start;

        loop {
            let c = self.next_non_whitespace()?;
            state = match (state, c) {
                (ArrayState::Value, ',') => ArrayState::Comma,
                (ArrayState::Start | ArrayState::Value, ']') => {
                    return Ok(GenericValue::Array(items));
                }
                (ArrayState::Value, character) => {
                    return Err(self.error(ParseMessage::UnexpectedCharacter {
                        character,
                        allowed: vec![',', ']'],
                    }));
                }
                (ArrayState::Start | ArrayState::Comma, _) => {
                    self.back();
                    items.push(self.parse_value()?);
                    ArrayState::Value
                }
            };
        }
    }

    /// Reads the rest of a string whose opening quote was already consumed.
    fn parse_string(&mut self) -> Result<String> {
        let mut result = String::with_capacity(16);
        loop {
            let c = self.next_or_eof()?;
            match c {
                '"' => return Ok(result),
                '\\' => result.push(self.parse_escape()?),
                c if (c as u32) < 0x20 => {
                    return Err(self.error(ParseMessage::UnescapedControlCharacter(c)));
                }
                c => result.push(c),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char> {
        let c = self.next_or_eof()?;
        let escaped = match c {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => return self.parse_unicode_escape(),
            other => return Err(self.error(ParseMessage::UnknownEscapedCharacter(other))),
        };
        Ok(escaped)
    }

    /// `\uXXXX`, combining a high surrogate with the `\uXXXX` low surrogate that must follow.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let code = self.parse_hex4()?;
        if !(0xD800..0xDC00).contains(&code) {
            return char::from_u32(code)
                .ok_or_else(|| self.error(ParseMessage::InvalidUnicodeCharacter(code)));
        }

        if self.peek() != Some('\\') || self.chars.get(self.position + 1) != Some(&'u') {
            return Err(self.error(ParseMessage::InvalidUnicodeCharacter(code)));
        }
        self.position += 2;

        let low = self.parse_hex4()?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.error(ParseMessage::InvalidUnicodeCharacter(low)));
        }
        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(combined)
            .ok_or_else(|| self.error(ParseMessage::InvalidUnicodeCharacter(combined)))
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let c = self.next_or_eof()?;
            let digit = c.to_digit(16).ok_or_else(|| {
                self.error(ParseMessage::UnexpectedCharacter {
                    character: c,
                    allowed: HEX_DIGITS.to_vec(),
                })
            })?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Reads the rest of a literal whose first character was already consumed.
    fn parse_literal(&mut self, rest: &str, value: GenericValue) -> Result<GenericValue> {
        for expected in rest.chars() {
            let c = self.next_or_eof()?;
            if c != expected {
                return Err(self.error(ParseMessage::UnexpectedCharacter {
                    character: c,
                    allowed: vec![expected],
                }));
            }
        }
        Ok(value)
    }

    fn parse_number(&mut self) -> Result<GenericValue> {
        let start = self.position;
        let mut state = NumberState::Start;
        let mut negative = false;
        let mut negative_exponent = false;
        let mut mantissa = 0f64;
        let mut exact = Some(0i64);
        let mut fraction_digits = 0i32;
        let mut exponent = 0i32;

        while let Some(c) = self.peek() {
            let digit = c.to_digit(10);
            state = match (state, c, digit) {
                (NumberState::Start, '-', _) => {
                    negative = true;
                    NumberState::Sign
                }
                (NumberState::Start | NumberState::Sign, '0', _) => NumberState::LeadingZero,
                (NumberState::Start | NumberState::Sign | NumberState::Int, _, Some(d)) => {
                    mantissa = mantissa * 10.0 + f64::from(d);
                    exact = exact.and_then(|v| v.checked_mul(10)).and_then(|v| {
                        if negative {
                            v.checked_sub(i64::from(d))
                        } else {
                            v.checked_add(i64::from(d))
                        }
                    });
                    NumberState::Int
                }
                (NumberState::LeadingZero | NumberState::Int, '.', _) => NumberState::Dot,
                (NumberState::Dot | NumberState::Fraction, _, Some(d)) => {
                    mantissa = mantissa * 10.0 + f64::from(d);
                    fraction_digits += 1;
                    NumberState::Fraction
                }
                (
                    NumberState::LeadingZero | NumberState::Int | NumberState::Fraction,
                    'e' | 'E',
                    _,
                ) => NumberState::E,
                (NumberState::E, '-', _) => {
                    negative_exponent = true;
                    NumberState::ESign
                }
                (NumberState::E, '+', _) => NumberState::ESign,
                (NumberState::E | NumberState::ESign | NumberState::Exponent, _, Some(d)) => {
                    exponent = exponent.saturating_mul(10).saturating_add(d as i32);
                    NumberState::Exponent
                }
                _ => break,
            };
            self.position += 1;
        }

        match state {
            NumberState::Start
            | NumberState::Sign
            | NumberState::Dot
            | NumberState::E
            | NumberState::ESign => {
                return Err(self.error_at(self.position, ParseMessage::InvalidNumber));
            }
            NumberState::LeadingZero | NumberState::Int => {
                if let Some(int) = exact {
                    return Ok(GenericValue::Number(self.integral(int, negative)));
                }
            }
            NumberState::Fraction | NumberState::Exponent => {}
        }

        let exponent = if negative_exponent { -exponent } else { exponent };
        let power = exponent.saturating_sub(fraction_digits);
        let value = match scale(mantissa, power) {
            Some(magnitude) if negative => -magnitude,
            Some(magnitude) => magnitude,
            None => self.literal_value(start)?,
        };

        // An underflowed literal is zero without being the integer zero.
        let integral = value.fract() == 0.0 && (value != 0.0 || mantissa == 0.0);
        let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
        if value.is_finite() && integral && in_range {
            Ok(GenericValue::Number(self.integral(value as i64, negative)))
        } else {
            Ok(GenericValue::Double(value))
        }
    }

    /// Correctly rounded value of the validated literal at `start..position`.
    fn literal_value(&self, start: usize) -> Result<f64> {
        let literal: String = self.chars[start..self.position].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| self.error_at(start, ParseMessage::InvalidNumber))
    }

    fn integral(&self, int: i64, negative: bool) -> SupportedNumber {
        let number = SupportedNumber::from_int(int);
        if self.numeric_booleans && !negative && (int == 0 || int == 1) {
            number.with_bool(int == 1)
        } else {
            number
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    fn next_or_eof(&mut self) -> Result<char> {
        match self.next() {
            Some(c) => Ok(c),
            None => Err(self.error_at(self.chars.len(), ParseMessage::UnexpectedEof)),
        }
    }

    fn next_non_whitespace(&mut self) -> Result<char> {
        loop {
            let c = self.next_or_eof()?;
            if !is_whitespace(c) {
                return Ok(c);
            }
        }
    }

    /// Steps back over the character just read.
    fn back(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// An error at the character just read.
    fn error(&self, message: ParseMessage) -> JsonError {
        self.error_at(self.position.saturating_sub(1), message)
    }

    fn error_at(&self, offset: usize, message: ParseMessage) -> JsonError {
        let before = &self.chars[..offset.min(self.chars.len())];
        let line_start = before
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |index| index + 1);

        JsonError::Parse {
            offset,
            line: 1 + before.iter().filter(|&&c| c == '\n').count(),
            column: offset - line_start + 1,
            character: self.chars.get(offset).copied(),
            message,
        }
    }
}
