//! Shared fixtures for unit tests: a scripted CMS and token builders.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tokio::sync::oneshot;

use crate::article::{Article, ArticleDraft, Category, ImageUpload};
use crate::cms::{CmsApi, CmsError, LoginRequest, RegisterRequest, UploadedFile};
use crate::status::{SessionStatus, UserId, UserProfile};
use crate::store::SessionStore;

/// Token whose payload carries `{"id": <id>}`.
pub fn token_for(id: u64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":{id},"iat":1700000000}}"#));
    format!("{header}.{payload}.sig")
}

pub fn profile(id: u64) -> UserProfile {
    UserProfile {
        id: UserId(id),
        email: format!("user{id}@example.com"),
        username: format!("user{id}"),
        avatar_url: None,
        about: None,
        articles: Vec::new(),
    }
}

/// Scripted CMS recording every call.
#[derive(Default)]
pub struct MockCms {
    pub users: Mutex<HashMap<u64, UserProfile>>,
    /// When set, every call fails with this error.
    pub failure: Mutex<Option<CmsError>>,
    /// Per-call failures for specific operations, keyed by call name.
    pub failures: Mutex<HashMap<&'static str, CmsError>>,
    pub calls: Mutex<Vec<String>>,
    /// Each `fetch_user` waits on the next gate, if any.
    pub gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    /// Store whose status is sampled when `fetch_user` starts.
    pub observe: Mutex<Option<Arc<SessionStore>>>,
    pub observed: Mutex<Vec<SessionStatus>>,
    pub login_token: Mutex<Option<String>>,
}

impl MockCms {
    pub fn with_user(profile: UserProfile) -> Self {
        let cms = Self::default();
        cms.users.lock().unwrap().insert(profile.id.0, profile);
        cms
    }

    pub fn failing(error: CmsError) -> Self {
        let cms = Self::default();
        *cms.failure.lock().unwrap() = Some(error);
        cms
    }

    pub fn fail_on(&self, call: &'static str, error: CmsError) {
        self.failures.lock().unwrap().insert(call, error);
    }

    pub fn gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: &'static str, detail: String) -> Result<(), CmsError> {
        self.calls.lock().unwrap().push(format!("{call}:{detail}"));
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        match self.failures.lock().unwrap().get(call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl CmsApi for MockCms {
    async fn fetch_user(&self, id: UserId) -> Result<UserProfile, CmsError> {
        if let Some(store) = self.observe.lock().unwrap().as_ref() {
            self.observed.lock().unwrap().push(store.status());
        }
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.record("fetch_user", id.to_string())?;
        self.users
            .lock()
            .unwrap()
            .get(&id.0)
            .cloned()
            .ok_or_else(|| CmsError::Status { status: 404, message: "Not Found".to_owned() })
    }

    async fn login(&self, request: &LoginRequest) -> Result<String, CmsError> {
        self.record("login", request.identifier.clone())?;
        self.login_token
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CmsError::Validation {
                status: 400,
                message: "Invalid identifier or password".to_owned(),
                field: None,
            })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<String, CmsError> {
        self.record("register", request.email.clone())?;
        self.login_token
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CmsError::Status { status: 400, message: "Email or Username are already taken".to_owned() })
    }

    async fn list_articles(&self) -> Result<Vec<Article>, CmsError> {
        self.record("list_articles", String::new())?;
        Ok(Vec::new())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CmsError> {
        self.record("list_categories", String::new())?;
        Ok(vec![Category { id: 1, title: "Rust".to_owned() }])
    }

    async fn create_article(&self, draft: &ArticleDraft) -> Result<u64, CmsError> {
        self.record("create_article", draft.slug())?;
        Ok(41)
    }

    async fn attach_relations(&self, article_id: u64, category: u64, author: UserId) -> Result<(), CmsError> {
        self.record("attach_relations", format!("{article_id}/{category}/{author}"))
    }

    async fn upload_image(&self, image: &ImageUpload) -> Result<UploadedFile, CmsError> {
        self.record("upload_image", image.file_name.clone())?;
        Ok(UploadedFile { id: 7, url: "/uploads/cover.png".to_owned() })
    }

    async fn set_article_image(&self, article_id: u64, url: &str) -> Result<(), CmsError> {
        self.record("set_article_image", format!("{article_id}/{url}"))
    }
}
