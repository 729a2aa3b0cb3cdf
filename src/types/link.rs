//! Shortened link records.

use serde::{Deserialize, Serialize};

use super::common::ListId;

/// One shortened-URL record as returned by the dashboard endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Link {
    /// Synthetic list identity, minted at decode time.
    #[serde(skip)]
    pub id: ListId,

    /// Backend identifier of the link.
    pub url_id: i64,

    /// Canonical long URL.
    pub web_link: String,

    /// Shortened URL.
    pub smart_link: String,

    /// Display title.
    pub title: String,

    /// Lifetime click count.
    pub total_clicks: i64,

    /// Preview image URL.
    pub original_image: Option<String>,

    /// Thumbnail URL.
    pub thumbnail: Option<String>,

    /// Human-readable relative timestamp ("2 hours ago").
    pub times_ago: String,

    /// Creation timestamp, as sent by the backend.
    pub created_at: String,

    /// Domain identifier.
    pub domain_id: String,

    /// Optional custom URL prefix.
    pub url_prefix: Option<String>,

    /// URL suffix.
    pub url_suffix: String,

    /// Originating app label.
    pub app: String,

    /// Whether the link is marked as a favourite.
    pub is_favourite: bool,
}

impl Link {
    /// Returns the best image for a list row: the thumbnail if present,
    /// otherwise the preview image.
    pub fn preview(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .or(self.original_image.as_deref())
    }
}
