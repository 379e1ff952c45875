use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use url::Url;

const DEFAULT_SCHEME_PREFIX: &str = "http://";
const RECOGNIZED_PREFIXES: [&str; 2] = ["http://", "https://"];

/// A normalized absolute URL that a short code points to.
///
/// The only way to build one from user input is [`TargetUrl::normalize`],
/// so a `TargetUrl` always carries an explicit `http`/`https` scheme and a
/// non-empty host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetUrl(String);

impl TargetUrl {
    /// Canonicalizes raw user input into a target URL.
    ///
    /// # Normalization Rules
    ///
    /// 1. Surrounding whitespace is trimmed; empty input is rejected.
    /// 2. Input without an `http://` or `https://` prefix (case-insensitive)
    ///    gets `http://` prepended.
    /// 3. The result must parse as an absolute URL with a non-empty host and
    ///    must not contain whitespace or control characters.
    ///
    /// The normalized value is the prefixed string itself, not the parser's
    /// re-serialization, so `example.com` becomes `http://example.com`
    /// without a trailing slash.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow_core::TargetUrl;
    ///
    /// let target = TargetUrl::normalize("  example.com/docs ").unwrap();
    /// assert_eq!(target.as_str(), "http://example.com/docs");
    /// assert!(TargetUrl::normalize("not a url").is_err());
    /// ```
    pub fn normalize(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidUrl("URL cannot be empty".to_string()));
        }

        let candidate = if has_recognized_scheme(trimmed) {
            trimmed.to_string()
        } else {
            format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
        };

        if candidate.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CoreError::InvalidUrl(format!(
                "URL must not contain whitespace: '{}'",
                trimmed
            )));
        }

        let parsed =
            Url::parse(&candidate).map_err(|e| CoreError::InvalidUrl(format!("{e}: '{trimmed}'")))?;
        if !parsed.host_str().is_some_and(|host| !host.is_empty()) {
            return Err(CoreError::InvalidUrl(format!(
                "URL must have a host: '{}'",
                trimmed
            )));
        }

        Ok(Self(candidate))
    }

    /// Wraps an already-normalized string without validation.
    ///
    /// Use this only for values read back from the store.
    pub fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the target, producing the fully escaped ASCII form of the URL.
    pub fn to_url(&self) -> Result<Url, CoreError> {
        Url::parse(&self.0).map_err(|e| CoreError::InvalidUrl(e.to_string()))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn has_recognized_scheme(input: &str) -> bool {
    RECOGNIZED_PREFIXES.iter().any(|prefix| {
        input
            .as_bytes()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
    })
}

impl Display for TargetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TargetUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
