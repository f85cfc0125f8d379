//! FFI use-case API for the mobile host UI.
//!
//! # Responsibility
//! - Expose note use cases to Dart as sync, never-panicking calls.
//! - Translate core errors into message strings inside response envelopes.
//!
//! # Invariants
//! - One data directory per process; it cannot change once chosen.
//! - Every call opens its own connection; no connection outlives a call.

use log::warn;
use notes_core::db::open_db;
use notes_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, AddNoteUseCase,
    ContentItem, DeleteNoteUseCase, EditNoteUseCase, GetAllNotesUseCase, GetNoteUseCase,
    LocalImageFileManager, Note, NotesConfig, NotesRepositoryImpl, RepoError, SearchNotesUseCase,
    SqliteNotesDao, SqliteNotesRepository, SwitchPinnedStatusUseCase,
};
use std::sync::OnceLock;

const BLOCK_KIND_TEXT: &str = "text";
const BLOCK_KIND_IMAGE: &str = "image";

static NOTES_CONFIG: OnceLock<NotesConfig> = OnceLock::new();

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core file logging once per process.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Chooses the app-private data directory holding the database and images.
///
/// # FFI contract
/// - Must be called before any note call; otherwise the platform default
///   (or `NOTES_DATA_DIR`) is used on first access.
/// - Repeating the call with the same directory is a no-op.
/// - Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_notes_store(data_dir: String) -> String {
    let trimmed = data_dir.trim();
    if trimmed.is_empty() {
        return "data_dir cannot be empty".to_string();
    }
    let requested = NotesConfig::from_data_dir(trimmed);
    let active = NOTES_CONFIG.get_or_init(|| requested.clone());
    if active.data_dir != requested.data_dir {
        return format!(
            "notes store already configured at `{}`",
            active.data_dir.display()
        );
    }
    match active.ensure_dirs() {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One content block. `kind` is `text` or `image`; `value` is the text or
/// the image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteBlock {
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: i64,
    pub title: String,
    pub blocks: Vec<NoteBlock>,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    pub is_pinned: bool,
}

/// Notes list envelope, already split the way the list screen shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub ok: bool,
    pub pinned: Vec<NoteItem>,
    pub other: Vec<NoteItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteResponse {
    pub ok: bool,
    pub note: Option<NoteItem>,
    /// `true` when no note has the requested id.
    pub not_found: bool,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Affected note id; set for successful actions.
    pub note_id: Option<i64>,
    /// `true` when the failure was a missing note.
    pub not_found: bool,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: i64) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id),
            not_found: false,
            message: message.into(),
        }
    }

    fn failure(operation: &str, err: CallError) -> Self {
        warn!(
            "event=ffi_call module=ffi status=error op={operation} not_found={}",
            err.not_found
        );
        Self {
            ok: false,
            note_id: None,
            not_found: err.not_found,
            message: format!("{operation} failed: {}", err.message),
        }
    }
}

/// Lists notes for the list screen. A blank `query` lists everything.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(query: Option<String>) -> NotesListResponse {
    let query = query.unwrap_or_default();
    let query = query.trim();
    let result = with_repository(|repo| {
        if query.is_empty() {
            GetAllNotesUseCase::new(repo).execute()
        } else {
            SearchNotesUseCase::new(repo).execute(query)
        }
    });

    match result {
        Ok(notes) => {
            let (pinned, other): (Vec<Note>, Vec<Note>) =
                notes.into_iter().partition(|note| note.is_pinned);
            let message = format!("{} note(s).", pinned.len() + other.len());
            NotesListResponse {
                ok: true,
                pinned: pinned.into_iter().map(to_note_item).collect(),
                other: other.into_iter().map(to_note_item).collect(),
                message,
            }
        }
        Err(err) => NotesListResponse {
            ok: false,
            pinned: Vec::new(),
            other: Vec::new(),
            message: format!("notes_list failed: {}", err.message),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_get(note_id: i64) -> NoteResponse {
    match with_repository(|repo| GetNoteUseCase::new(repo).execute(note_id)) {
        Ok(note) => NoteResponse {
            ok: true,
            note: Some(to_note_item(note)),
            not_found: false,
            message: String::new(),
        },
        Err(err) => NoteResponse {
            ok: false,
            note: None,
            not_found: err.not_found,
            message: format!("note_get failed: {}", err.message),
        },
    }
}

/// Creates an unpinned note. External image URLs are copied into the store.
#[flutter_rust_bridge::frb(sync)]
pub fn note_add(title: String, blocks: Vec<NoteBlock>) -> NoteActionResponse {
    let content = match to_content(blocks) {
        Ok(content) => content,
        Err(err) => return NoteActionResponse::failure("note_add", err),
    };
    match with_repository(|repo| AddNoteUseCase::new(repo).execute(title.trim(), &content)) {
        Ok(note_id) => NoteActionResponse::success("Note created.", note_id),
        Err(err) => NoteActionResponse::failure("note_add", err),
    }
}

/// Saves an edited note; images dropped from it are deleted from the store.
#[flutter_rust_bridge::frb(sync)]
pub fn note_edit(note: NoteItem) -> NoteActionResponse {
    let note_id = note.id;
    let note = match from_note_item(note) {
        Ok(note) => note,
        Err(err) => return NoteActionResponse::failure("note_edit", err),
    };
    match with_repository(|repo| EditNoteUseCase::new(repo).execute(&note)) {
        Ok(()) => NoteActionResponse::success("Note saved.", note_id),
        Err(err) => NoteActionResponse::failure("note_edit", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: i64) -> NoteActionResponse {
    match with_repository(|repo| DeleteNoteUseCase::new(repo).execute(note_id)) {
        Ok(()) => NoteActionResponse::success("Note deleted.", note_id),
        Err(err) => NoteActionResponse::failure("note_delete", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_switch_pinned(note_id: i64) -> NoteActionResponse {
    match with_repository(|repo| SwitchPinnedStatusUseCase::new(repo).execute(note_id)) {
        Ok(()) => NoteActionResponse::success("Pinned status switched.", note_id),
        Err(err) => NoteActionResponse::failure("note_switch_pinned", err),
    }
}

struct CallError {
    message: String,
    not_found: bool,
}

impl CallError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            not_found: false,
        }
    }
}

impl From<RepoError> for CallError {
    fn from(err: RepoError) -> Self {
        Self {
            not_found: matches!(err, RepoError::NotFound(_)),
            message: err.to_string(),
        }
    }
}

fn active_config() -> Result<&'static NotesConfig, CallError> {
    if let Some(config) = NOTES_CONFIG.get() {
        return Ok(config);
    }
    let resolved = NotesConfig::resolve(None).map_err(|err| CallError::new(err.to_string()))?;
    Ok(NOTES_CONFIG.get_or_init(|| resolved))
}

fn with_repository<T>(
    f: impl FnOnce(&SqliteNotesRepository<'_>) -> notes_core::RepoResult<T>,
) -> Result<T, CallError> {
    let config = active_config()?;
    config
        .ensure_dirs()
        .map_err(|err| CallError::new(format!("notes store setup failed: {err}")))?;
    let conn = open_db(&config.db_path)
        .map_err(|err| CallError::new(format!("notes DB open failed: {err}")))?;
    let images = LocalImageFileManager::try_new(&config.images_dir)
        .map_err(|err| CallError::new(format!("image store init failed: {err}")))?;
    let repo = NotesRepositoryImpl::new(SqliteNotesDao::new(&conn), images);
    f(&repo).map_err(CallError::from)
}

fn to_note_item(note: Note) -> NoteItem {
    NoteItem {
        id: note.id,
        title: note.title,
        blocks: note.content.into_iter().map(to_block).collect(),
        updated_at: note.updated_at,
        is_pinned: note.is_pinned,
    }
}

fn to_block(item: ContentItem) -> NoteBlock {
    match item {
        ContentItem::Text { content } => NoteBlock {
            kind: BLOCK_KIND_TEXT.to_string(),
            value: content,
        },
        ContentItem::Image { url } => NoteBlock {
            kind: BLOCK_KIND_IMAGE.to_string(),
            value: url,
        },
    }
}

fn from_note_item(item: NoteItem) -> Result<Note, CallError> {
    Ok(Note {
        id: item.id,
        title: item.title.trim().to_string(),
        content: to_content(item.blocks)?,
        updated_at: item.updated_at,
        is_pinned: item.is_pinned,
    })
}

fn to_content(blocks: Vec<NoteBlock>) -> Result<Vec<ContentItem>, CallError> {
    blocks
        .into_iter()
        .map(|block| match block.kind.as_str() {
            BLOCK_KIND_TEXT => Ok(ContentItem::Text {
                content: block.value,
            }),
            BLOCK_KIND_IMAGE => Ok(ContentItem::Image { url: block.value }),
            other => Err(CallError::new(format!(
                "unknown block kind `{other}`; expected text|image"
            ))),
        })
        .collect()
}
