//! Token types for the two authentication worlds of the forum.

use std::fmt;

/// The anti-forgery token ("formhash") required by state-mutating forms.
///
/// It is read from a hidden `input[name="formhash"]` on forum pages and
/// expires server-side after an unspecified time.
#[derive(Clone, PartialEq, Eq)]
pub struct FormHash(String);

impl FormHash {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw value for form submission.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FormHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FormHash").field(&"[REDACTED]").finish()
    }
}

/// The bearer credential required by the `/star/api` JSON family.
///
/// Obtained by exchanging an authenticated cookie session. The forum
/// expects the raw value in the `Authorization` header, without a scheme.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct Authorization(String);

impl Authorization {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Authorization").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_hides_value_in_debug() {
        let token = Authorization::new("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn formhash_hides_value_in_debug() {
        let hash = FormHash::new("a1b2c3d4");
        assert!(!format!("{:?}", hash).contains("a1b2c3d4"));
        assert_eq!(hash.as_str(), "a1b2c3d4");
    }
}
