//! Wire payloads for the request/reply surface.
//!
//! Field names are part of the wire contract and must not change.

use serde::{Deserialize, Serialize};

use userhub_auth::token::TokenPair;
use userhub_core::error::AppError;
use userhub_core::result::AppResult;

/// Sign-up and sign-in request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    /// Login name.
    pub name: String,
    /// Plaintext secret.
    pub password: String,
}

/// Refresh request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token to rotate.
    pub refresh_token: String,
}

/// Token pair reply body for sign-in and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPairReply {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
}

impl From<&TokenPair> for TokenPairReply {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
        }
    }
}

/// Decode a JSON request payload.
pub fn decode_json<'a, T: Deserialize<'a>>(payload: &'a [u8]) -> AppResult<T> {
    serde_json::from_slice(payload)
        .map_err(|e| AppError::malformed_request(format!("cannot unmarshal message: {e}")))
}

/// Interpret a raw payload as a bare token string.
pub fn decode_token(payload: &[u8]) -> AppResult<String> {
    let token = std::str::from_utf8(payload)
        .map_err(|e| AppError::malformed_request(format!("payload is not valid UTF-8: {e}")))?
        .trim();

    if token.is_empty() {
        return Err(AppError::malformed_request("empty token payload"));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use userhub_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_decode_credentials() {
        let req: CredentialsRequest =
            decode_json(br#"{"name":"alice","password":"pw1"}"#).unwrap();
        assert_eq!(req.name, "alice");
        assert_eq!(req.password, "pw1");
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let err = decode_json::<RefreshRequest>(b"not json").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
    }

    #[test]
    fn test_decode_token_trims_and_rejects_empty() {
        assert_eq!(decode_token(b"  abc.def.ghi \n").unwrap(), "abc.def.ghi");
        assert_eq!(
            decode_token(b"   ").unwrap_err().kind,
            ErrorKind::MalformedRequest
        );
    }
}
