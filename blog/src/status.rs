//! Session status and the signed-in user's profile.
//!
//! DESIGN
//! ======
//! `SessionState` carries the profile inside the `SignedIn` variant, so a
//! profile without a signed-in status (or the reverse) cannot be represented.

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// CMS user identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_u64_from_number_or_string(deserializer).map(UserId)
    }
}

/// Accept a non-negative integer given either as a JSON number or a decimal string.
pub(crate) fn deserialize_u64_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| D::Error::custom("expected non-negative integer")),
        serde_json::Value::String(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom("expected decimal integer string")),
        _ => Err(D::Error::custom("expected number or string")),
    }
}

/// Article reference embedded in a user record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    #[serde(deserialize_with = "deserialize_u64_from_number_or_string")]
    pub id: u64,
    #[serde(default, alias = "Title")]
    pub title: String,
    #[serde(default, alias = "Slug")]
    pub slug: String,
}

/// Fixed projection of the CMS user record kept while signed in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "avatarurl")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub articles: Vec<ArticleRef>,
}

/// Tri-state session status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    SignedOut,
    Loading,
    SignedIn,
}

/// Published session state: status plus the profile when signed in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    SignedOut,
    Loading,
    SignedIn(UserProfile),
}

impl SessionState {
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::SignedOut => SessionStatus::SignedOut,
            Self::Loading => SessionStatus::Loading,
            Self::SignedIn(_) => SessionStatus::SignedIn,
        }
    }

    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::SignedIn(profile) => Some(profile),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }
}
