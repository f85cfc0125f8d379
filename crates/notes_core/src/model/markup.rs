//! Inline markup used by text front-ends to describe interleaved blocks.
//!
//! A body like `before ![](photo.jpg) after` becomes three blocks: text,
//! image, text. Image alt text is ignored.

use crate::model::note::ContentItem;
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image markup regex"));

/// Splits markup text into content blocks.
///
/// Whitespace-only text between images is dropped; text blocks are trimmed.
pub fn parse_markup(source: &str) -> Vec<ContentItem> {
    let mut items = Vec::new();
    let mut cursor = 0;

    for caps in IMAGE_MARKUP_RE.captures_iter(source) {
        let (Some(whole), Some(url)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_text(&mut items, &source[cursor..whole.start()]);
        let url = url.as_str().trim();
        if !url.is_empty() {
            items.push(ContentItem::image(url));
        }
        cursor = whole.end();
    }
    push_text(&mut items, &source[cursor..]);

    items
}

/// Renders content blocks back to markup, one block per paragraph.
pub fn render_markup(items: &[ContentItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            ContentItem::Text { content } => content.clone(),
            ContentItem::Image { url } => format!("![]({url})"),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn push_text(items: &mut Vec<ContentItem>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        items.push(ContentItem::text(trimmed));
    }
}
