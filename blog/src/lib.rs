//! Session gate and CMS model shared by the browser and command-line clients.
//!
//! This crate owns everything both front ends agree on: the persisted bearer
//! token, decoding its payload, the process-wide session store, route guard
//! decisions, form validation, and the wire shapes of the content API. It has
//! no HTTP transport of its own; each front end implements [`CmsApi`] with
//! whatever client its platform provides.
//!
//! ARCHITECTURE
//! ============
//! `credentials` → `token` → `service` (+ `store`) → `guard`. Writes that do
//! not touch the session (publishing) go through `publish`, which borrows the
//! service only to learn who the author is.

pub mod article;
pub mod cms;
pub mod credentials;
pub mod guard;
pub mod publish;
pub mod service;
pub mod slug;
pub mod status;
pub mod store;
pub mod token;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use article::{Article, ArticleDraft, Category, ImageUpload};
pub use cms::{CmsApi, CmsEndpoint, CmsError};
pub use credentials::{CredentialError, CredentialStore, MemoryCredentialStore};
pub use guard::{PageAccess, ProtectedView, Route};
pub use publish::{PublishError, PublishedArticle, publish};
pub use service::{AuthError, SessionService};
pub use status::{SessionState, SessionStatus, UserId, UserProfile};
pub use store::SessionStore;
pub use token::TokenError;
pub use validate::ValidationFailure;
