//! Articles and categories as the front ends see them.
//!
//! The CMS wraps collection entries as `{ id, attributes: { .. } }` and
//! relations as `{ data: { id } | [{ id }] | null }`; the `Deserialize`
//! impls here flatten both so callers work with plain structs.

#[cfg(test)]
#[path = "article_test.rs"]
mod article_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::slug::slugify;
use crate::status::deserialize_u64_from_number_or_string;

/// Published article (read-only on the client).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub body: String,
    pub image_url: Option<String>,
    pub category: Option<u64>,
    pub author: Option<u64>,
}

/// Article category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: u64,
    pub title: String,
}

/// Text fields of an article being composed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub body: String,
    pub short_description: String,
    /// Selected category id; `None` until the user picks one.
    pub category: Option<u64>,
}

impl ArticleDraft {
    /// Slug derived from the current title.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }
}

/// Image file attached to a draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Media type for an image file name, from its extension.
    #[must_use]
    pub fn guess_content_type(file_name: &str) -> &'static str {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            "avif" => "image/avif",
            _ => "application/octet-stream",
        }
    }
}

// =============================================================================
// WIRE SHAPES
// =============================================================================

#[derive(Deserialize)]
struct Entry<T> {
    #[serde(deserialize_with = "deserialize_u64_from_number_or_string")]
    id: u64,
    attributes: T,
}

#[derive(Deserialize)]
struct EntryId {
    #[serde(deserialize_with = "deserialize_u64_from_number_or_string")]
    id: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelationData {
    One(EntryId),
    Many(Vec<EntryId>),
}

#[derive(Deserialize)]
struct Relation {
    #[serde(default)]
    data: Option<RelationData>,
}

impl Relation {
    fn first_id(&self) -> Option<u64> {
        match self.data.as_ref()? {
            RelationData::One(entry) => Some(entry.id),
            RelationData::Many(entries) => entries.first().map(|e| e.id),
        }
    }
}

#[derive(Deserialize)]
struct ArticleAttributes {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Slug", default)]
    slug: String,
    #[serde(rename = "shortDescription", default)]
    short_description: String,
    #[serde(rename = "Body", default)]
    body: String,
    #[serde(rename = "imageurl", default)]
    image_url: Option<String>,
    #[serde(rename = "Category", default)]
    category: Option<Relation>,
    #[serde(default)]
    author: Option<Relation>,
}

#[derive(Deserialize)]
struct CategoryAttributes {
    #[serde(rename = "Title", default)]
    title: String,
}

impl<'de> Deserialize<'de> for Article {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entry = Entry::<ArticleAttributes>::deserialize(deserializer)?;
        let attrs = entry.attributes;
        Ok(Self {
            id: entry.id,
            title: attrs.title,
            slug: attrs.slug,
            short_description: attrs.short_description,
            body: attrs.body,
            image_url: attrs.image_url.filter(|url| !url.is_empty()),
            category: attrs.category.as_ref().and_then(Relation::first_id),
            author: attrs.author.as_ref().and_then(Relation::first_id),
        })
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entry = Entry::<CategoryAttributes>::deserialize(deserializer)?;
        Ok(Self { id: entry.id, title: entry.attributes.title })
    }
}
