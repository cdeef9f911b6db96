//! Opaque pagination-token codec
//!
//! Every syncer call carries an opaque string token between pages. The token
//! is the base64 of a JSON-serialized, kind-specific cursor state; the empty
//! string marks both "first page" (incoming) and "no more pages" (outgoing).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Encodes a cursor state into an opaque token.
pub fn encode_token<T: Serialize>(state: &T) -> Result<String> {
    let bytes =
        serde_json::to_vec(state).map_err(|err| CoreError::Internal(err.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Decodes an opaque token back into a cursor state.
///
/// An empty token decodes to `None` (start of the enumeration).
pub fn decode_token<T: DeserializeOwned>(token: &str) -> Result<Option<T>> {
    if token.is_empty() {
        return Ok(None);
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|err| CoreError::InvalidPageToken(err.to_string()))?;
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|err| CoreError::InvalidPageToken(err.to_string()))
}

/// Cursor state for plain single-phase listings: just the upstream
/// continuation token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCursor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
}

/// Decodes the incoming token of a plain listing; empty token means the
/// first page.
pub fn decode_list_cursor(token: &str) -> Result<ListCursor> {
    Ok(decode_token(token)?.unwrap_or_default())
}

/// Builds the outgoing token of a plain listing from the upstream
/// continuation token; `None` or empty means the enumeration is complete.
pub fn next_list_token(continue_token: Option<&str>) -> Result<String> {
    match continue_token {
        Some(token) if !token.is_empty() => encode_token(&ListCursor {
            continue_token: Some(token.to_string()),
        }),
        _ => Ok(String::new()),
    }
}
