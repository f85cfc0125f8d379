//! State holder for the note editing screen.

use crate::editor::blocks;
use crate::editor::EditorEvent;
use crate::model::note::{Note, NoteId};
use crate::repo::error::RepoResult;
use crate::repo::notes_repo::NotesRepository;
use crate::service::use_cases::{DeleteNoteUseCase, EditNoteUseCase, GetNoteUseCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditNoteCommand {
    InputTitle(String),
    InputContent { index: usize, content: String },
    AddImage(String),
    DeleteImage(usize),
    Save,
    Back,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditNoteState {
    /// The note has not been loaded yet.
    Initial,
    Editing(Note),
}

impl EditNoteState {
    pub fn is_save_enabled(&self) -> bool {
        match self {
            Self::Initial => false,
            Self::Editing(note) => blocks::is_savable(&note.title, &note.content),
        }
    }
}

pub struct EditNoteStateHolder<'r, R: ?Sized> {
    repository: &'r R,
    note_id: NoteId,
    state: EditNoteState,
}

impl<'r, R: NotesRepository + ?Sized> EditNoteStateHolder<'r, R> {
    /// Creates a holder in `Initial` state; call [`Self::load`] next.
    pub fn new(repository: &'r R, note_id: NoteId) -> Self {
        Self {
            repository,
            note_id,
            state: EditNoteState::Initial,
        }
    }

    /// Creates a holder and loads the note right away.
    pub fn open(repository: &'r R, note_id: NoteId) -> RepoResult<Self> {
        let mut holder = Self::new(repository, note_id);
        holder.load()?;
        Ok(holder)
    }

    /// Loads the note into `Editing`, appending an empty text block when the
    /// content does not end in text.
    pub fn load(&mut self) -> RepoResult<()> {
        let mut note = GetNoteUseCase::new(self.repository).execute(self.note_id)?;
        blocks::ensure_trailing_text(&mut note.content);
        self.state = EditNoteState::Editing(note);
        Ok(())
    }

    pub fn state(&self) -> &EditNoteState {
        &self.state
    }

    /// Applies one command. Commands other than `Back` are ignored until the
    /// note is loaded.
    pub fn process(&mut self, command: EditNoteCommand) -> RepoResult<Option<EditorEvent>> {
        if command == EditNoteCommand::Back {
            return Ok(Some(EditorEvent::Finished));
        }
        let EditNoteState::Editing(note) = &mut self.state else {
            return Ok(None);
        };

        match command {
            EditNoteCommand::InputTitle(title) => note.title = title,
            EditNoteCommand::InputContent { index, content } => {
                blocks::input_text(&mut note.content, index, content);
            }
            EditNoteCommand::AddImage(url) => blocks::add_image(&mut note.content, url),
            EditNoteCommand::DeleteImage(index) => blocks::delete_image(&mut note.content, index),
            EditNoteCommand::Save => {
                if !blocks::is_savable(&note.title, &note.content) {
                    return Ok(None);
                }
                let cleaned = note.clone().without_blank_text();
                EditNoteUseCase::new(self.repository).execute(&cleaned)?;
                return Ok(Some(EditorEvent::Finished));
            }
            EditNoteCommand::Delete => {
                DeleteNoteUseCase::new(self.repository).execute(note.id)?;
                return Ok(Some(EditorEvent::Finished));
            }
            EditNoteCommand::Back => return Ok(Some(EditorEvent::Finished)),
        }
        Ok(None)
    }
}
