//! Row shapes persisted by the DAO and their mapping to domain notes.
//!
//! # Invariants
//! - A content row's `position` is its index in the note's content list.
//! - Reading rows back never reorders blocks; rows arrive sorted by
//!   `position`.

use crate::model::note::{ContentItem, Note, NoteId};

/// Persisted discriminator of a content row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Image,
}

impl ContentType {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// One row of the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    /// `0` asks the store to assign an id.
    pub id: NoteId,
    pub title: String,
    pub updated_at: i64,
    pub is_pinned: bool,
}

/// One row of the `content_items` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItemRow {
    pub note_id: NoteId,
    pub content_type: ContentType,
    /// Text body for text rows, image URL for image rows.
    pub content: String,
    pub position: i64,
}

/// A note row joined with its content rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteWithContentRow {
    pub note: NoteRow,
    pub content: Vec<ContentItemRow>,
}

impl From<&Note> for NoteRow {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            updated_at: note.updated_at,
            is_pinned: note.is_pinned,
        }
    }
}

impl ContentItemRow {
    fn from_item(note_id: NoteId, position: usize, item: &ContentItem) -> Self {
        let (content_type, content) = match item {
            ContentItem::Text { content } => (ContentType::Text, content.clone()),
            ContentItem::Image { url } => (ContentType::Image, url.clone()),
        };
        Self {
            note_id,
            content_type,
            content,
            position: i64::try_from(position).unwrap_or(i64::MAX),
        }
    }

    fn into_item(self) -> ContentItem {
        match self.content_type {
            ContentType::Text => ContentItem::Text {
                content: self.content,
            },
            ContentType::Image => ContentItem::Image { url: self.content },
        }
    }
}

/// Maps domain content to rows owned by `note_id`.
pub fn to_content_rows(items: &[ContentItem], note_id: NoteId) -> Vec<ContentItemRow> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| ContentItemRow::from_item(note_id, position, item))
        .collect()
}

/// Maps content rows back to domain content, keeping row order.
pub fn to_content_items(rows: Vec<ContentItemRow>) -> Vec<ContentItem> {
    rows.into_iter().map(ContentItemRow::into_item).collect()
}

impl NoteWithContentRow {
    pub fn into_note(self) -> Note {
        Note {
            id: self.note.id,
            title: self.note.title,
            content: to_content_items(self.content),
            updated_at: self.note.updated_at,
            is_pinned: self.note.is_pinned,
        }
    }
}

/// Maps a list of joined rows to domain notes, keeping list order.
pub fn to_notes(rows: Vec<NoteWithContentRow>) -> Vec<Note> {
    rows.into_iter().map(NoteWithContentRow::into_note).collect()
}
