//! Ambiguous numeric values.

use std::fmt;

/// A number whose kind was not decided by its source.
///
/// Text formats such as JSON do not distinguish `2` from `2.0`, so the parser keeps every
/// projection the literal supports and lets the reader pick one. Two ambiguous numbers are equal
/// only when all three projections are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SupportedNumber {
    bool: Option<bool>,
    int: Option<i64>,
    double: Option<f64>,
}

impl SupportedNumber {
    /// Creates a number from explicit projections.
    pub fn new(bool: Option<bool>, int: Option<i64>, double: Option<f64>) -> Self {
        Self { bool, int, double }
    }

    /// An integral number, readable both as an int and as a double.
    pub fn from_int(value: i64) -> Self {
        Self {
            bool: None,
            int: Some(value),
            double: Some(value as f64),
        }
    }

    /// Adds a boolean projection.
    pub fn with_bool(mut self, value: bool) -> Self {
        self.bool = Some(value);
        self
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.bool
    }

    pub fn as_int(&self) -> Option<i64> {
        self.int
    }

    /// The double projection, falling back to a widened int.
    pub fn as_double(&self) -> Option<f64> {
        self.double.or(self.int.map(|int| int as f64))
    }

    /// Returns true if no projection is present.
    pub fn is_empty(&self) -> bool {
        self.bool.is_none() && self.int.is_none() && self.double.is_none()
    }
}

impl fmt::Display for SupportedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.int, self.double, self.bool) {
            (Some(int), _, _) => write!(f, "{}", int),
            (None, Some(double), _) => write!(f, "{:?}", double),
            (None, None, Some(bool)) => write!(f, "{}", bool),
            (None, None, None) => write!(f, "null"),
        }
    }
}
