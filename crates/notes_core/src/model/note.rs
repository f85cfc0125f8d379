//! Note domain model.
//!
//! # Invariants
//! - `id == 0` marks a note that has not been persisted yet.
//! - `updated_at` is Unix epoch milliseconds.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned note identifier.
pub type NoteId = i64;

/// One block of note content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// Free text paragraph.
    Text { content: String },
    /// Image reference: an app-private path once saved, any path or
    /// `file://` URL before that.
    Image { url: String },
}

impl ContentItem {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::Image { url: url.into() }
    }

    /// Returns `true` for text blocks holding only whitespace.
    ///
    /// Images are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text { content } => content.trim().is_empty(),
            Self::Image { .. } => false,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { url } => Some(url.as_str()),
            Self::Text { .. } => None,
        }
    }
}

/// A titled, ordered sequence of text and image blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: Vec<ContentItem>,
    /// Unix epoch milliseconds of the last save.
    pub updated_at: i64,
    pub is_pinned: bool,
}

impl Note {
    /// Image URLs in block order.
    pub fn image_urls(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(ContentItem::image_url)
            .collect()
    }

    /// Drops blank text blocks, keeping every image.
    pub fn without_blank_text(mut self) -> Self {
        self.content.retain(|item| !item.is_blank());
        self
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
