//! Notes repository: domain-level persistence plus image lifecycle.
//!
//! # Responsibility
//! - Map between domain notes and DAO rows.
//! - Copy externally referenced images into private storage on save.
//! - Delete private images that a save or delete left unreferenced.
//!
//! # Invariants
//! - Text blocks never reach the image manager.
//! - `is_internal` is asked once per image block; each external image is
//!   copied exactly once per save.
//! - Private image URLs are stored in canonical form, and removed images
//!   are found by comparing canonical forms.
//! - Image files are deleted only after the row change they depend on has
//!   committed. A failed save removes the copies it made.
//! - Failing to delete an orphaned image is logged, not returned.

use crate::model::note::{ContentItem, Note, NoteId};
use crate::repo::error::RepoResult;
use crate::repo::mapper::{to_content_rows, to_notes, NoteRow};
use crate::repo::notes_dao::NotesDao;
use crate::storage::image_files::ImageFileManager;
use log::{info, warn};
use std::collections::HashSet;

/// Domain-level note persistence contract.
pub trait NotesRepository {
    /// Stores a new note; returns the id assigned by the store.
    fn add_note(
        &self,
        title: &str,
        content: &[ContentItem],
        is_pinned: bool,
        updated_at: i64,
    ) -> RepoResult<NoteId>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    /// Replaces title, flags and full content of an existing note.
    fn edit_note(&self, note: &Note) -> RepoResult<()>;
    fn get_all_notes(&self) -> RepoResult<Vec<Note>>;
    fn get_note(&self, id: NoteId) -> RepoResult<Note>;
    fn search_notes(&self, query: &str) -> RepoResult<Vec<Note>>;
    fn switch_pinned_status(&self, id: NoteId) -> RepoResult<()>;
}

/// Repository over a row DAO and an image file manager.
pub struct NotesRepositoryImpl<D, F> {
    dao: D,
    images: F,
}

impl<D: NotesDao, F: ImageFileManager> NotesRepositoryImpl<D, F> {
    pub fn new(dao: D, images: F) -> Self {
        Self { dao, images }
    }

    pub fn dao(&self) -> &D {
        &self.dao
    }

    pub fn images(&self) -> &F {
        &self.images
    }

    /// Rewrites external image URLs to private copies.
    ///
    /// On failure, copies made so far are deleted before the error returns.
    fn process_for_storage(&self, content: &[ContentItem]) -> RepoResult<StoredContent> {
        let mut stored = StoredContent::default();
        for item in content {
            let processed = match item {
                ContentItem::Text { .. } => item.clone(),
                ContentItem::Image { url } if self.images.is_internal(url) => ContentItem::Image {
                    url: self.images.canonical_url(url),
                },
                ContentItem::Image { url } => {
                    match self.images.copy_image_to_internal_storage(url) {
                        Ok(internal_path) => {
                            stored.copied.push(internal_path.clone());
                            ContentItem::Image { url: internal_path }
                        }
                        Err(err) => {
                            self.discard_copies(&stored.copied);
                            return Err(err.into());
                        }
                    }
                }
            };
            stored.items.push(processed);
        }
        Ok(stored)
    }

    fn discard_copies(&self, copied: &[String]) {
        for path in copied {
            self.delete_image_logged(path);
        }
    }

    fn delete_image_logged(&self, url: &str) {
        if let Err(err) = self.images.delete_image(url) {
            warn!("event=image_delete module=repo status=error error={err}");
        }
    }
}

#[derive(Debug, Default)]
struct StoredContent {
    items: Vec<ContentItem>,
    copied: Vec<String>,
}

impl<D: NotesDao, F: ImageFileManager> NotesRepository for NotesRepositoryImpl<D, F> {
    fn add_note(
        &self,
        title: &str,
        content: &[ContentItem],
        is_pinned: bool,
        updated_at: i64,
    ) -> RepoResult<NoteId> {
        let stored = self.process_for_storage(content)?;
        let row = NoteRow {
            id: 0,
            title: title.to_string(),
            updated_at,
            is_pinned,
        };

        match self.dao.add_note_with_content(&row, &stored.items) {
            Ok(note_id) => {
                info!(
                    "event=note_add module=repo status=ok note_id={note_id} blocks={} copied_images={}",
                    stored.items.len(),
                    stored.copied.len()
                );
                Ok(note_id)
            }
            Err(err) => {
                self.discard_copies(&stored.copied);
                Err(err)
            }
        }
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let note = self.dao.get_note(id)?.into_note();
        self.dao.delete_note(id)?;

        let urls = note.image_urls();
        for url in &urls {
            self.delete_image_logged(url);
        }
        info!(
            "event=note_delete module=repo status=ok note_id={id} deleted_images={}",
            urls.len()
        );
        Ok(())
    }

    fn edit_note(&self, note: &Note) -> RepoResult<()> {
        let old_note = self.dao.get_note(note.id)?.into_note();
        let stored = self.process_for_storage(&note.content)?;

        // Compare canonical forms: a kept image may be spelled differently
        // in the new version.
        let new_urls: HashSet<&str> = stored
            .items
            .iter()
            .filter_map(ContentItem::image_url)
            .collect();
        let mut seen = HashSet::new();
        let removed_urls: Vec<&str> = old_note
            .image_urls()
            .into_iter()
            .filter(|url| {
                let canonical = self.images.canonical_url(url);
                !new_urls.contains(canonical.as_str()) && seen.insert(canonical)
            })
            .collect();

        let row = NoteRow::from(note);
        if let Err(err) = self
            .dao
            .update_note(&row, &to_content_rows(&stored.items, note.id))
        {
            self.discard_copies(&stored.copied);
            return Err(err);
        }

        for url in &removed_urls {
            self.delete_image_logged(url);
        }
        info!(
            "event=note_edit module=repo status=ok note_id={} blocks={} copied_images={} deleted_images={}",
            note.id,
            stored.items.len(),
            stored.copied.len(),
            removed_urls.len()
        );
        Ok(())
    }

    fn get_all_notes(&self) -> RepoResult<Vec<Note>> {
        Ok(to_notes(self.dao.get_all_notes()?))
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Note> {
        Ok(self.dao.get_note(id)?.into_note())
    }

    fn search_notes(&self, query: &str) -> RepoResult<Vec<Note>> {
        Ok(to_notes(self.dao.search_notes(query)?))
    }

    fn switch_pinned_status(&self, id: NoteId) -> RepoResult<()> {
        self.dao.switch_pinned_status(id)?;
        info!("event=note_pin_toggle module=repo status=ok note_id={id}");
        Ok(())
    }
}
