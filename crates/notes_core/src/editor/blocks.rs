//! Content block edits shared by the create and edit screens.

use crate::model::note::ContentItem;

/// Replaces the text of the block at `index`.
///
/// Ignored when `index` is out of range or points at an image.
pub fn input_text(content: &mut [ContentItem], index: usize, text: String) {
    if let Some(ContentItem::Text { content }) = content.get_mut(index) {
        *content = text;
    }
}

/// Appends an image followed by an empty text block to keep typing into.
///
/// A trailing blank text block is replaced rather than left above the image.
pub fn add_image(content: &mut Vec<ContentItem>, url: String) {
    if content.last().is_some_and(ContentItem::is_blank) {
        content.pop();
    }
    content.push(ContentItem::Image { url });
    content.push(ContentItem::text(""));
}

/// Removes the image block at `index`.
///
/// Ignored when `index` is out of range or points at a text block.
pub fn delete_image(content: &mut Vec<ContentItem>, index: usize) {
    if matches!(content.get(index), Some(ContentItem::Image { .. })) {
        content.remove(index);
    }
}

/// Appends an empty text block unless the content already ends in text.
pub fn ensure_trailing_text(content: &mut Vec<ContentItem>) {
    if !matches!(content.last(), Some(ContentItem::Text { .. })) {
        content.push(ContentItem::text(""));
    }
}

/// Whether `title` plus `content` is worth saving.
pub fn is_savable(title: &str, content: &[ContentItem]) -> bool {
    !title.trim().is_empty() && content.iter().any(|item| !item.is_blank())
}
