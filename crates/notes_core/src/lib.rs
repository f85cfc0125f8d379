//! Core of the notes app: storage, image lifecycle, use cases and screen
//! state holders.
//!
//! Host UIs (mobile via `notes_ffi`, terminal via `notes_cli`) only talk to
//! the use cases and state holders re-exported here.

pub mod config;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::{ConfigError, NotesConfig};
pub use editor::create::{CreateNoteCommand, CreateNoteState, CreateNoteStateHolder};
pub use editor::edit::{EditNoteCommand, EditNoteState, EditNoteStateHolder};
pub use editor::notes_list::{NotesListCommand, NotesListState, NotesListStateHolder};
pub use editor::EditorEvent;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::markup::{parse_markup, render_markup};
pub use model::note::{now_millis, ContentItem, Note, NoteId};
pub use repo::error::{RepoError, RepoResult};
pub use repo::notes_dao::{NotesDao, SqliteNotesDao};
pub use repo::notes_repo::{NotesRepository, NotesRepositoryImpl};
pub use service::use_cases::{
    AddNoteUseCase, DeleteNoteUseCase, EditNoteUseCase, GetAllNotesUseCase, GetNoteUseCase,
    SearchNotesUseCase, SwitchPinnedStatusUseCase,
};
pub use storage::image_files::{ImageError, ImageFileManager, LocalImageFileManager};

/// Repository wired to SQLite and the local file system.
pub type SqliteNotesRepository<'conn> =
    NotesRepositoryImpl<SqliteNotesDao<'conn>, LocalImageFileManager>;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
