//! Content API contract: endpoints, request bodies, response parsing, errors.
//!
//! SYSTEM CONTEXT
//! ==============
//! The CMS owns users and articles. This module knows its URL layout and JSON
//! shapes but performs no I/O; the browser client implements [`CmsApi`] over
//! `gloo-net` and the CLI over `reqwest`, and both hand raw status + body to
//! the parsers here.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses are decoded once, in [`parse_error_body`], into a typed
//! [`CmsError`]. Callers match on variants instead of digging through the
//! error envelope.

#[cfg(test)]
#[path = "cms_test.rs"]
mod cms_test;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::article::{Article, ArticleDraft, Category, ImageUpload};
use crate::status::{UserId, UserProfile, deserialize_u64_from_number_or_string};

pub const DEFAULT_CMS_URL: &str = "http://localhost:1337";

const LOGIN_PATH: &str = "/api/auth/local";
const REGISTER_PATH: &str = "/api/auth/local/register";
const ARTICLES_PATH: &str = "/api/articles";
const CATEGORIES_PATH: &str = "/api/categories";
const UPLOAD_PATH: &str = "/api/upload";

/// Longest raw body echoed into an error message.
const ERROR_BODY_PREVIEW: usize = 200;

// =============================================================================
// ERROR
// =============================================================================

/// Failure of any CMS call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CmsError {
    /// The request never produced a response (network, CORS, DNS, timeout).
    #[error("CMS request failed: {0}")]
    Transport(String),

    /// Non-2xx response that is not a field validation error.
    #[error("CMS returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The CMS rejected submitted fields.
    #[error("CMS rejected input (status {status}): {message}")]
    Validation { status: u16, message: String, field: Option<String> },

    /// A 2xx response body did not have the expected shape.
    #[error("CMS response parse failed: {0}")]
    Parse(String),

    /// No transport is available in this build (e.g. server-side render).
    #[error("CMS not available in this build")]
    Unavailable,
}

impl CmsError {
    /// Name of the first rejected field, for validation errors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

/// Request body for `POST /api/auth/local`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Request body for `POST /api/auth/local/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// File record returned by the upload endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    #[serde(deserialize_with = "deserialize_u64_from_number_or_string")]
    pub id: u64,
    pub url: String,
}

/// Operations the front ends need from the CMS.
///
/// Futures are not required to be `Send` so browser transports can hold
/// `JsValue`s across awaits.
#[async_trait(?Send)]
pub trait CmsApi {
    /// `GET /api/users/{id}?populate=*`, projected to [`UserProfile`].
    async fn fetch_user(&self, id: UserId) -> Result<UserProfile, CmsError>;

    /// Exchange credentials for a session token.
    async fn login(&self, request: &LoginRequest) -> Result<String, CmsError>;

    /// Create an account and return its session token.
    async fn register(&self, request: &RegisterRequest) -> Result<String, CmsError>;

    async fn list_articles(&self) -> Result<Vec<Article>, CmsError>;

    async fn list_categories(&self) -> Result<Vec<Category>, CmsError>;

    /// Create the article text and return its id.
    async fn create_article(&self, draft: &ArticleDraft) -> Result<u64, CmsError>;

    /// Link an existing article to its category and author.
    async fn attach_relations(&self, article_id: u64, category: u64, author: UserId) -> Result<(), CmsError>;

    async fn upload_image(&self, image: &ImageUpload) -> Result<UploadedFile, CmsError>;

    async fn set_article_image(&self, article_id: u64, url: &str) -> Result<(), CmsError>;
}

// =============================================================================
// ENDPOINTS
// =============================================================================

/// Base URL plus the static API token sent on protected calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CmsEndpoint {
    base_url: String,
    api_token: Option<String>,
}

impl Default for CmsEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_CMS_URL, None)
    }
}

impl CmsEndpoint {
    #[must_use]
    pub fn new(base_url: &str, api_token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            api_token: api_token.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Authorization` header value for protected calls, if a token is configured.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.api_token.as_ref().map(|t| format!("Bearer {t}"))
    }

    /// Resolve a CMS-relative media path (`/uploads/..`) against the base URL.
    #[must_use]
    pub fn media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else {
            self.url(path)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    #[must_use]
    pub fn user_url(&self, id: UserId) -> String {
        self.url(&format!("/api/users/{id}?populate=*"))
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        self.url(LOGIN_PATH)
    }

    #[must_use]
    pub fn register_url(&self) -> String {
        self.url(REGISTER_PATH)
    }

    #[must_use]
    pub fn articles_url(&self) -> String {
        self.url(&format!("{ARTICLES_PATH}?populate=*&sort=createdAt:desc"))
    }

    #[must_use]
    pub fn create_article_url(&self) -> String {
        self.url(ARTICLES_PATH)
    }

    #[must_use]
    pub fn article_url(&self, id: u64) -> String {
        self.url(&format!("{ARTICLES_PATH}/{id}"))
    }

    #[must_use]
    pub fn categories_url(&self) -> String {
        self.url(CATEGORIES_PATH)
    }

    #[must_use]
    pub fn upload_url(&self) -> String {
        self.url(UPLOAD_PATH)
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// Body for creating an article from a draft. The image is attached later.
#[must_use]
pub fn create_article_body(draft: &ArticleDraft) -> Value {
    json!({
        "data": {
            "Title": draft.title,
            "Body": draft.body,
            "shortDescription": draft.short_description,
            "Slug": draft.slug(),
            "imageurl": "",
        }
    })
}

#[must_use]
pub fn relations_body(category: u64, author: UserId) -> Value {
    json!({ "data": { "Category": [category], "author": [author.0] } })
}

#[must_use]
pub fn article_image_body(url: &str) -> Value {
    json!({ "data": { "imageurl": url } })
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

/// Map a response to `Ok(())` for 2xx, or the decoded error otherwise.
///
/// # Errors
///
/// Returns the [`CmsError`] produced by [`parse_error_body`] for non-2xx statuses.
pub fn check_status(status: u16, body: &str) -> Result<(), CmsError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(parse_error_body(status, body))
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Option<ErrorDetails>,
}

#[derive(Deserialize)]
struct ErrorDetails {
    #[serde(default)]
    errors: Vec<FieldIssue>,
}

#[derive(Deserialize)]
struct FieldIssue {
    #[serde(default)]
    path: Vec<Value>,
}

/// Decode a non-2xx response body into a typed error.
#[must_use]
pub fn parse_error_body(status: u16, body: &str) -> CmsError {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        let preview: String = body.trim().chars().take(ERROR_BODY_PREVIEW).collect();
        let message = if preview.is_empty() { format!("HTTP {status}") } else { preview };
        return CmsError::Status { status, message };
    };

    let error = envelope.error;
    let issues = error.details.map(|d| d.errors).unwrap_or_default();
    if error.name == "ValidationError" || !issues.is_empty() {
        let field = issues
            .first()
            .and_then(|issue| issue.path.first())
            .map(|segment| match segment {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        return CmsError::Validation { status, message: error.message, field };
    }

    CmsError::Status { status, message: error.message }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, CmsError> {
    serde_json::from_str(body).map_err(|e| CmsError::Parse(e.to_string()))
}

/// Parse a user record into the session profile projection.
///
/// # Errors
///
/// Returns [`CmsError::Parse`] if the body is not a user record.
pub fn parse_user(body: &str) -> Result<UserProfile, CmsError> {
    parse_json(body)
}

#[derive(Deserialize)]
struct AuthResponse {
    jwt: String,
}

/// Extract the session token from a login/register response.
///
/// # Errors
///
/// Returns [`CmsError::Parse`] if the body has no non-empty `jwt`.
pub fn parse_auth(body: &str) -> Result<String, CmsError> {
    let auth: AuthResponse = parse_json(body)?;
    if auth.jwt.trim().is_empty() {
        return Err(CmsError::Parse("empty jwt in auth response".to_owned()));
    }
    Ok(auth.jwt)
}

#[derive(Deserialize)]
struct Collection<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct Single {
    data: EntryRef,
}

#[derive(Deserialize)]
struct EntryRef {
    #[serde(deserialize_with = "deserialize_u64_from_number_or_string")]
    id: u64,
}

/// Parse a `{ data: [..] }` collection response.
///
/// # Errors
///
/// Returns [`CmsError::Parse`] if any entry is malformed.
pub fn parse_collection<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, CmsError> {
    parse_json::<Collection<T>>(body).map(|c| c.data)
}

/// Id of the entry in a `{ data: { id, .. } }` response.
///
/// # Errors
///
/// Returns [`CmsError::Parse`] if the body has no entry id.
pub fn parse_created_id(body: &str) -> Result<u64, CmsError> {
    parse_json::<Single>(body).map(|s| s.data.id)
}

/// First file of an upload response (`[ { id, url, .. } ]`).
///
/// # Errors
///
/// Returns [`CmsError::Parse`] if the list is empty or malformed.
pub fn parse_upload(body: &str) -> Result<UploadedFile, CmsError> {
    parse_json::<Vec<UploadedFile>>(body)?
        .into_iter()
        .next()
        .ok_or_else(|| CmsError::Parse("upload response contained no files".to_owned()))
}
