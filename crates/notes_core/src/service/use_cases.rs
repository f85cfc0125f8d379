//! Thin use-case objects, one per user action.
//!
//! # Invariants
//! - Each use case performs exactly one repository call.
//! - Repository errors are returned unchanged.
//! - New notes start unpinned; every save stamps `updated_at` with the
//!   current time.

use crate::model::note::{now_millis, ContentItem, Note, NoteId};
use crate::repo::error::RepoResult;
use crate::repo::notes_repo::NotesRepository;

/// Creates a new, unpinned note stamped with the current time.
pub struct AddNoteUseCase<'r, R: ?Sized> {
    repository: &'r R,
}

impl<'r, R: NotesRepository + ?Sized> AddNoteUseCase<'r, R> {
    pub fn new(repository: &'r R) -> Self {
        Self { repository }
    }

    pub fn execute(&self, title: &str, content: &[ContentItem]) -> RepoResult<NoteId> {
        self.repository
            .add_note(title, content, false, now_millis())
    }
}

/// Saves an edited note, refreshing its `updated_at`.
pub struct EditNoteUseCase<'r, R: ?Sized> {
    repository: &'r R,
}

impl<'r, R: NotesRepository + ?Sized> EditNoteUseCase<'r, R> {
    pub fn new(repository: &'r R) -> Self {
        Self { repository }
    }

    pub fn execute(&self, note: &Note) -> RepoResult<()> {
        let stamped = Note {
            updated_at: now_millis(),
            ..note.clone()
        };
        self.repository.edit_note(&stamped)
    }
}

pub struct DeleteNoteUseCase<'r, R: ?Sized> {
    repository: &'r R,
}

impl<'r, R: NotesRepository + ?Sized> DeleteNoteUseCase<'r, R> {
    pub fn new(repository: &'r R) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: NoteId) -> RepoResult<()> {
        self.repository.delete_note(id)
    }
}

pub struct GetNoteUseCase<'r, R: ?Sized> {
    repository: &'r R,
}

impl<'r, R: NotesRepository + ?Sized> GetNoteUseCase<'r, R> {
    pub fn new(repository: &'r R) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: NoteId) -> RepoResult<Note> {
        self.repository.get_note(id)
    }
}

pub struct GetAllNotesUseCase<'r, R: ?Sized> {
    repository: &'r R,
}

impl<'r, R: NotesRepository + ?Sized> GetAllNotesUseCase<'r, R> {
    pub fn new(repository: &'r R) -> Self {
        Self { repository }
    }

    pub fn execute(&self) -> RepoResult<Vec<Note>> {
        self.repository.get_all_notes()
    }
}

/// Finds notes by title or text content. The query is passed through as-is.
pub struct SearchNotesUseCase<'r, R: ?Sized> {
    repository: &'r R,
}

impl<'r, R: NotesRepository + ?Sized> SearchNotesUseCase<'r, R> {
    pub fn new(repository: &'r R) -> Self {
        Self { repository }
    }

    pub fn execute(&self, query: &str) -> RepoResult<Vec<Note>> {
        self.repository.search_notes(query)
    }
}

pub struct SwitchPinnedStatusUseCase<'r, R: ?Sized> {
    repository: &'r R,
}

impl<'r, R: NotesRepository + ?Sized> SwitchPinnedStatusUseCase<'r, R> {
    pub fn new(repository: &'r R) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: NoteId) -> RepoResult<()> {
        self.repository.switch_pinned_status(id)
    }
}
