//! Opaque continuation tokens handed to HTTP clients.
//!
//! Tokens are base64url-encoded JSON (no padding). The payload is not a
//! security boundary; it only stops a cursor issued for one table from being
//! replayed against another.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Selection;

/// Errors raised while decoding or checking a [`ContinuationToken`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token was not valid base64url.
    #[error("continuation token is not valid base64")]
    InvalidEncoding,
    /// The decoded bytes were not a valid token payload.
    #[error("continuation token payload is invalid: {message}")]
    InvalidPayload {
        /// Parser diagnostic.
        message: String,
    },
    /// The token was issued for another deployment or table.
    #[error("continuation token does not belong to this table")]
    SelectionMismatch,
}

/// Continuation state bound to the selection that produced it.
///
/// # Examples
/// ```
/// use pagination::{ContinuationToken, Selection};
///
/// let selection = Selection::new("dep-1", "users");
/// let token = ContinuationToken::new(&selection, 1, "remote-cursor");
/// let decoded = ContinuationToken::decode(&token.encode()).expect("valid token");
/// assert_eq!(decoded.verify_for(&selection), Ok(()));
/// assert_eq!(decoded.cursor(), "remote-cursor");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationToken {
    #[serde(rename = "s")]
    source: String,
    #[serde(rename = "t")]
    table: String,
    #[serde(rename = "p")]
    page: u32,
    #[serde(rename = "c")]
    cursor: String,
}

impl ContinuationToken {
    /// Bind `cursor` for `page` to `selection`.
    pub fn new(selection: &Selection, page: u32, cursor: impl Into<String>) -> Self {
        Self {
            source: selection.source().to_owned(),
            table: selection.table().to_owned(),
            page,
            cursor: cursor.into(),
        }
    }

    /// Serialise to the opaque client-facing form.
    #[must_use]
    pub fn encode(&self) -> String {
        // Serialising a struct of strings and integers cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Parse a token previously produced by [`ContinuationToken::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidEncoding`] for malformed base64 and
    /// [`TokenError::InvalidPayload`] when the bytes are not a token.
    pub fn decode(value: &str) -> Result<Self, TokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(value.trim())
            .map_err(|_| TokenError::InvalidEncoding)?;
        serde_json::from_slice(&bytes).map_err(|err| TokenError::InvalidPayload {
            message: err.to_string(),
        })
    }

    /// Confirm the token was issued for `selection`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::SelectionMismatch`] when the source or table differ.
    pub fn verify_for(&self, selection: &Selection) -> Result<(), TokenError> {
        if self.source == selection.source() && self.table == selection.table() {
            Ok(())
        } else {
            Err(TokenError::SelectionMismatch)
        }
    }

    /// Remote cursor to send upstream.
    #[must_use]
    pub fn cursor(&self) -> &str {
        self.cursor.as_str()
    }

    /// Zero-based page index the cursor leads to.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn encoded_token_is_url_safe() {
        let selection = Selection::new("dep/1", "users+admins");
        let encoded = ContinuationToken::new(&selection, 3, "a/b+c==").encode();
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[rstest]
    fn decode_restores_page_and_cursor() {
        let selection = Selection::new("dep-1", "users");
        let token = ContinuationToken::new(&selection, 4, "cursor-4");
        let decoded = ContinuationToken::decode(&token.encode()).expect("decode");
        assert_eq!(decoded, token);
        assert_eq!(decoded.page(), 4);
    }

    #[rstest]
    #[case("dep-2", "users")]
    #[case("dep-1", "orders")]
    fn token_rejects_other_selection(#[case] source: &str, #[case] table: &str) {
        let token = ContinuationToken::new(&Selection::new("dep-1", "users"), 1, "c");
        assert_eq!(
            token.verify_for(&Selection::new(source, table)),
            Err(TokenError::SelectionMismatch)
        );
    }

    #[rstest]
    fn decode_rejects_bad_base64() {
        assert_eq!(
            ContinuationToken::decode("not base64!"),
            Err(TokenError::InvalidEncoding)
        );
    }

    #[rstest]
    fn decode_rejects_foreign_payload() {
        let encoded = URL_SAFE_NO_PAD.encode(br#"{"hello":"world"}"#);
        assert!(matches!(
            ContinuationToken::decode(&encoded),
            Err(TokenError::InvalidPayload { .. })
        ));
    }
}
