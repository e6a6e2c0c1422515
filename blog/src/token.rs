//! Session token payload decoding.
//!
//! The token is a three-segment bearer token (`header.payload.signature`).
//! Only the payload is read, and only to learn which user to look up; the
//! signature is never checked here. Whatever the payload claims, the user is
//! not considered signed in until the CMS returns their record.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use serde::Deserialize;

use crate::status::UserId;

/// Why a token could not yield a user identifier.
///
/// Every variant means the same thing to callers: there is no usable session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token does not have exactly three dot-separated segments.
    #[error("malformed token: expected 3 segments, found {0}")]
    Segments(usize),

    /// The header or payload segment is empty.
    #[error("malformed token: {0} segment is empty")]
    EmptySegment(&'static str),

    /// The payload segment is not valid base64.
    #[error("malformed token: payload is not base64")]
    Encoding,

    /// The decoded payload is not a JSON object of the expected shape.
    #[error("malformed token: payload is not valid JSON: {0}")]
    Payload(String),

    /// The payload has no usable `id` claim.
    #[error("malformed token: payload has no user id")]
    MissingId,
}

/// Claims read from the token payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    pub id: UserId,
    pub issued_at: Option<i64>,
    pub expires_at: Option<i64>,
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    id: Option<UserId>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decode the payload segment of `token`.
///
/// # Errors
///
/// Returns a [`TokenError`] when the token is not three segments, the payload
/// is not base64/base64url, or the payload JSON has no `id`.
pub fn decode(token: &str) -> Result<SessionClaims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Segments(segments.len()));
    }
    if segments[0].is_empty() {
        return Err(TokenError::EmptySegment("header"));
    }
    if segments[1].is_empty() {
        return Err(TokenError::EmptySegment("payload"));
    }

    let bytes = decode_segment(segments[1])?;
    let raw: RawClaims = serde_json::from_slice(&bytes).map_err(|e| TokenError::Payload(e.to_string()))?;
    let id = raw.id.ok_or(TokenError::MissingId)?;

    Ok(SessionClaims { id, issued_at: raw.iat, expires_at: raw.exp })
}

/// Shorthand for callers that only need the identifier.
///
/// # Errors
///
/// Same as [`decode`].
pub fn user_id(token: &str) -> Result<UserId, TokenError> {
    decode(token).map(|claims| claims.id)
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    [URL_SAFE_NO_PAD, URL_SAFE, STANDARD_NO_PAD, STANDARD]
        .iter()
        .find_map(|engine| engine.decode(segment).ok())
        .ok_or(TokenError::Encoding)
}
