//! Story record as returned by the Algolia search API.
//!
//! The API uses its own field names (`objectID`, `_tags`); serde renames keep
//! the Rust side idiomatic while serializing back to the wire names for the
//! detail view's raw JSON dump.
use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// One story hit.
///
/// String fields that the API sends as `null` (Ask HN posts have no `url`,
/// deleted stories have no `title`) deserialize to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    #[serde(rename = "objectID")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    #[serde(rename = "_tags", default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

/// Body of one `search_by_date` response. Everything besides `hits` is ignored.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    pub hits: Vec<Story>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Story {
    /// Case-insensitive substring match on title or author.
    ///
    /// `needle` must already be lowercased; the list controller lowercases the
    /// query once per filter pass instead of once per story.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
    }

    /// Tags joined for display (`"story, author_pg"`).
    pub fn tag_line(&self) -> String {
        self.tags.join(", ")
    }

    /// `created_at` as a unix timestamp, if it parses as RFC 3339.
    pub fn published(&self) -> Option<i64> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.timestamp())
    }
}
