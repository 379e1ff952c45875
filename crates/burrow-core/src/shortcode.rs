use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Symbols a short code may contain: digits, then upper and lower case ASCII letters.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_LENGTH: usize = 6;
pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 16;

/// A validated short code identifier for a shortened URL.
///
/// Short codes are 4-16 characters long and drawn from [`ALPHABET`].
/// A deployment uses one fixed length; see [`ShortCode::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    ///
    /// Accepts any length within `MIN_LENGTH..=MAX_LENGTH`.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate_charset(&code)?;
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&code.len()) {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }
        Ok(Self(code))
    }

    /// Parses a code that must be exactly `length` characters long.
    ///
    /// This is the envelope check used on the read path: anything a
    /// configured allocator could never have produced is rejected here.
    pub fn parse(code: &str, length: usize) -> Result<Self, CoreError> {
        if code.len() != length {
            return Err(CoreError::InvalidShortCode(format!(
                "expected {} characters, got {}",
                length,
                code.len()
            )));
        }
        Self::new(code)
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (generators, or rows read back from the store).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate_charset(code: &str) -> Result<(), CoreError> {
        if let Some(c) = code.bytes().find(|b| !ALPHABET.contains(b)) {
            return Err(CoreError::InvalidShortCode(format!(
                "unexpected character {:?} in '{}'",
                c as char, code
            )));
        }
        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0
    }
}
