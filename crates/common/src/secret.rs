//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types
//! for every sensitive value the portal handles: the session signing secret,
//! upstream server keys and bearer tokens.
//!
//! `SecretString` implements `Debug` with redaction, so any struct deriving
//! `Debug` that holds one is safe to pass to `tracing`. Secrets are zeroized
//! when dropped.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct ServerTarget {
//!     name: String,
//!     credential: SecretString,
//! }
//!
//! let target = ServerTarget {
//!     name: "Servidor 1".to_string(),
//!     credential: SecretString::from("server-key-value"),
//! };
//!
//! // The credential is redacted in debug output
//! assert!(!format!("{target:?}").contains("server-key-value"));
//!
//! // Reading the value requires an explicit call
//! let key: &str = target.credential.expose_secret();
//! assert_eq!(key, "server-key-value");
//! ```

pub use secrecy::{ExposeSecret, SecretString};

/// Mask a credential for display, keeping only its last four characters.
///
/// Returns an empty string for an empty credential. Credentials of four
/// characters or fewer are fully masked.
#[must_use]
pub fn mask_credential(credential: &str) -> String {
    let len = credential.chars().count();
    if len == 0 {
        return String::new();
    }
    if len <= 4 {
        return "*".repeat(len);
    }

    let visible: String = credential.chars().skip(len - 4).collect();
    format!("{}{}", "*".repeat(len - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("hunter2");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_deserialize_keeps_value_hidden() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct ServerKey {
            name: String,
            key: SecretString,
        }

        let json = r#"{"name": "Servidor 1", "key": "abc-secret"}"#;
        let parsed: ServerKey = serde_json::from_str(json).expect("deserialize");

        assert_eq!(parsed.key.expose_secret(), "abc-secret");
        assert!(!format!("{parsed:?}").contains("abc-secret"));
    }

    #[test]
    fn test_mask_credential_keeps_last_four() {
        assert_eq!(mask_credential("abcdefgh1234"), "********1234");
    }

    #[test]
    fn test_mask_credential_empty() {
        assert_eq!(mask_credential(""), "");
    }

    #[test]
    fn test_mask_credential_short_values_fully_masked() {
        assert_eq!(mask_credential("abc"), "***");
        assert_eq!(mask_credential("abcd"), "****");
    }

    #[test]
    fn test_mask_credential_multibyte() {
        assert_eq!(mask_credential("ñandú-key1"), "******key1");
    }
}
