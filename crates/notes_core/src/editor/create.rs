//! State holder for the note creation screen.

use crate::editor::blocks;
use crate::editor::EditorEvent;
use crate::model::note::ContentItem;
use crate::repo::error::RepoResult;
use crate::repo::notes_repo::NotesRepository;
use crate::service::use_cases::AddNoteUseCase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateNoteCommand {
    InputTitle(String),
    InputContent { index: usize, content: String },
    AddImage(String),
    DeleteImage(usize),
    Save,
    Back,
}

/// Draft of a note that does not exist in the store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNoteState {
    pub title: String,
    pub content: Vec<ContentItem>,
}

impl Default for CreateNoteState {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: vec![ContentItem::text("")],
        }
    }
}

impl CreateNoteState {
    pub fn is_save_enabled(&self) -> bool {
        blocks::is_savable(&self.title, &self.content)
    }
}

pub struct CreateNoteStateHolder<'r, R: ?Sized> {
    repository: &'r R,
    state: CreateNoteState,
}

impl<'r, R: NotesRepository + ?Sized> CreateNoteStateHolder<'r, R> {
    pub fn new(repository: &'r R) -> Self {
        Self {
            repository,
            state: CreateNoteState::default(),
        }
    }

    pub fn state(&self) -> &CreateNoteState {
        &self.state
    }

    /// Applies one command.
    ///
    /// `Save` is ignored while saving is disabled. When it runs, blank text
    /// blocks are dropped before the note is stored.
    pub fn process(&mut self, command: CreateNoteCommand) -> RepoResult<Option<EditorEvent>> {
        match command {
            CreateNoteCommand::InputTitle(title) => self.state.title = title,
            CreateNoteCommand::InputContent { index, content } => {
                blocks::input_text(&mut self.state.content, index, content);
            }
            CreateNoteCommand::AddImage(url) => blocks::add_image(&mut self.state.content, url),
            CreateNoteCommand::DeleteImage(index) => {
                blocks::delete_image(&mut self.state.content, index);
            }
            CreateNoteCommand::Save => {
                if !self.state.is_save_enabled() {
                    return Ok(None);
                }
                let content: Vec<ContentItem> = self
                    .state
                    .content
                    .iter()
                    .filter(|item| !item.is_blank())
                    .cloned()
                    .collect();
                AddNoteUseCase::new(self.repository).execute(&self.state.title, &content)?;
                return Ok(Some(EditorEvent::Finished));
            }
            CreateNoteCommand::Back => return Ok(Some(EditorEvent::Finished)),
        }
        Ok(None)
    }
}
