//! State holder for the notes list screen.
//!
//! # Invariants
//! - A blank query lists every note; otherwise the trimmed query is searched.
//! - Pinned and other notes keep store order within each group.

use crate::model::note::{Note, NoteId};
use crate::repo::error::RepoResult;
use crate::repo::notes_repo::NotesRepository;
use crate::service::use_cases::{GetAllNotesUseCase, SearchNotesUseCase, SwitchPinnedStatusUseCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesListCommand {
    InputSearchQuery(String),
    SwitchPinnedStatus(NoteId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesListState {
    pub query: String,
    pub pinned_notes: Vec<Note>,
    pub other_notes: Vec<Note>,
}

pub struct NotesListStateHolder<'r, R: ?Sized> {
    repository: &'r R,
    state: NotesListState,
}

impl<'r, R: NotesRepository + ?Sized> NotesListStateHolder<'r, R> {
    /// Creates a holder with every note loaded.
    pub fn open(repository: &'r R) -> RepoResult<Self> {
        let mut holder = Self {
            repository,
            state: NotesListState::default(),
        };
        holder.refresh()?;
        Ok(holder)
    }

    pub fn state(&self) -> &NotesListState {
        &self.state
    }

    pub fn process(&mut self, command: NotesListCommand) -> RepoResult<()> {
        match command {
            NotesListCommand::InputSearchQuery(query) => self.state.query = query,
            NotesListCommand::SwitchPinnedStatus(id) => {
                SwitchPinnedStatusUseCase::new(self.repository).execute(id)?;
            }
        }
        self.refresh()
    }

    /// Re-reads notes for the current query.
    pub fn refresh(&mut self) -> RepoResult<()> {
        let query = self.state.query.trim();
        let notes = if query.is_empty() {
            GetAllNotesUseCase::new(self.repository).execute()?
        } else {
            SearchNotesUseCase::new(self.repository).execute(query)?
        };
        let (pinned, other): (Vec<Note>, Vec<Note>) =
            notes.into_iter().partition(|note| note.is_pinned);
        self.state.pinned_notes = pinned;
        self.state.other_notes = other;
        Ok(())
    }
}
