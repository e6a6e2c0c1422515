//! Publishing a composed article.
//!
//! Four CMS calls in sequence: create the text entry, link category and
//! author, upload the cover image, point the entry at the uploaded file.
//! Validation runs first and a failure there sends nothing.

#[cfg(test)]
#[path = "publish_test.rs"]
mod publish_test;

use crate::article::{ArticleDraft, ImageUpload};
use crate::cms::{CmsApi, CmsError};
use crate::credentials::CredentialStore;
use crate::service::SessionService;
use crate::token;
use crate::validate::{FieldError, ValidationFailure, validate_draft};

/// Field the CMS enforces as unique on articles.
const UNIQUE_TITLE_FIELD: &str = "Title";

/// Article created by [`publish`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedArticle {
    pub id: u64,
    pub slug: String,
    pub image_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    /// No usable token or no signed-in profile; the page sends the user to signup.
    #[error("not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Cms(#[from] CmsError),
}

impl PublishError {
    /// User-facing notices for a failed publish.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        match self {
            Self::Invalid(failure) => failure.notices().map(str::to_owned).collect(),
            Self::NotSignedIn => vec!["Sign in to publish an article.".to_owned()],
            Self::Cms(err) if err.field() == Some(UNIQUE_TITLE_FIELD) => {
                vec!["An article with this title already exists.".to_owned()]
            }
            Self::Cms(CmsError::Validation { message, .. }) if !message.is_empty() => vec![message.clone()],
            Self::Cms(_) => vec!["Publishing failed. Try again.".to_owned()],
        }
    }
}

/// Validate and publish `draft` as the signed-in user.
///
/// # Errors
///
/// - [`PublishError::Invalid`] if any field fails validation (nothing sent).
/// - [`PublishError::NotSignedIn`] if there is no decodable token or the
///   session is not `SignedIn`.
/// - [`PublishError::Cms`] if any CMS call fails.
pub async fn publish<C, S>(
    service: &SessionService<C, S>,
    draft: &ArticleDraft,
    image: Option<&ImageUpload>,
) -> Result<PublishedArticle, PublishError>
where
    C: CmsApi,
    S: CredentialStore,
{
    validate_draft(draft, image.is_some())?;
    let (Some(image), Some(category)) = (image, draft.category) else {
        return Err(ValidationFailure { fields: vec![FieldError::Category] }.into());
    };

    let has_usable_token = service
        .credentials()
        .get()
        .is_some_and(|raw| token::decode(&raw).is_ok());
    if !has_usable_token {
        return Err(PublishError::NotSignedIn);
    }
    let Some(author) = service.snapshot().profile().map(|p| p.id) else {
        return Err(PublishError::NotSignedIn);
    };

    let cms = service.cms();
    let id = cms.create_article(draft).await?;
    cms.attach_relations(id, category, author).await?;
    let file = cms.upload_image(image).await?;
    cms.set_article_image(id, &file.url).await?;

    tracing::info!(article_id = id, author = %author, "article published");
    Ok(PublishedArticle { id, slug: draft.slug(), image_url: file.url })
}
