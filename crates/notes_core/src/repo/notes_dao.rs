//! SQL access to `notes` and `content_items`.
//!
//! # Responsibility
//! - Persist and load note rows together with their content rows.
//! - Keep every multi-statement write inside one transaction.
//!
//! # Invariants
//! - Lists are ordered by `updated_at DESC, id ASC`.
//! - Content rows are read ordered by `position`.
//! - Missing ids surface as `RepoError::NotFound`, never as silent no-ops.

use crate::model::note::{ContentItem, NoteId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::mapper::{
    to_content_rows, ContentItemRow, ContentType, NoteRow, NoteWithContentRow,
};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    updated_at,
    is_pinned
FROM notes";

const LIKE_ESCAPE: char = '\\';

/// Row-level data access used by the notes repository.
pub trait NotesDao {
    /// Inserts a note and its content atomically; returns the assigned id.
    fn add_note_with_content(&self, note: &NoteRow, content: &[ContentItem])
        -> RepoResult<NoteId>;
    /// Replaces the note row and its entire content atomically.
    fn update_note(&self, note: &NoteRow, content: &[ContentItemRow]) -> RepoResult<()>;
    /// Deletes a note; content rows cascade.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<NoteWithContentRow>;
    fn get_all_notes(&self) -> RepoResult<Vec<NoteWithContentRow>>;
    /// Notes whose title or any text block contains `query`.
    fn search_notes(&self, query: &str) -> RepoResult<Vec<NoteWithContentRow>>;
    fn switch_pinned_status(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed notes DAO over a migrated connection.
pub struct SqliteNotesDao<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotesDao<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn begin(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    fn load_note_rows(&self, sql: &str, pattern: Option<&str>) -> RepoResult<Vec<NoteWithContentRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match pattern {
            Some(pattern) => stmt.query([pattern])?,
            None => stmt.query([])?,
        };

        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let note = parse_note_row(row)?;
            let content = load_content_rows(self.conn, note.id)?;
            notes.push(NoteWithContentRow { note, content });
        }
        Ok(notes)
    }
}

impl NotesDao for SqliteNotesDao<'_> {
    fn add_note_with_content(
        &self,
        note: &NoteRow,
        content: &[ContentItem],
    ) -> RepoResult<NoteId> {
        let tx = self.begin()?;
        let requested_id = (note.id != 0).then_some(note.id);
        tx.execute(
            "INSERT INTO notes (id, title, updated_at, is_pinned)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                requested_id,
                note.title.as_str(),
                note.updated_at,
                bool_to_int(note.is_pinned),
            ],
        )?;
        let note_id = tx.last_insert_rowid();

        insert_content_rows(&tx, &to_content_rows(content, note_id))?;
        tx.commit()?;
        Ok(note_id)
    }

    fn update_note(&self, note: &NoteRow, content: &[ContentItemRow]) -> RepoResult<()> {
        let tx = self.begin()?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                updated_at = ?3,
                is_pinned = ?4
             WHERE id = ?1;",
            params![
                note.id,
                note.title.as_str(),
                note.updated_at,
                bool_to_int(note.is_pinned),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        tx.execute("DELETE FROM content_items WHERE note_id = ?1;", [note.id])?;
        insert_content_rows(&tx, content)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<NoteWithContentRow> {
        let note = self
            .conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(parse_note_row(row)),
            )
            .optional()?
            .ok_or(RepoError::NotFound(id))??;
        let content = load_content_rows(self.conn, note.id)?;
        Ok(NoteWithContentRow { note, content })
    }

    fn get_all_notes(&self) -> RepoResult<Vec<NoteWithContentRow>> {
        self.load_note_rows(
            &format!("{NOTE_SELECT_SQL} ORDER BY updated_at DESC, id ASC;"),
            None,
        )
    }

    fn search_notes(&self, query: &str) -> RepoResult<Vec<NoteWithContentRow>> {
        let pattern = format!("%{}%", escape_like(query));
        self.load_note_rows(
            &format!(
                "{NOTE_SELECT_SQL}
                 WHERE title LIKE ?1 ESCAPE '{LIKE_ESCAPE}'
                    OR EXISTS (
                        SELECT 1
                        FROM content_items c
                        WHERE c.note_id = notes.id
                          AND c.content_type = 'text'
                          AND c.content LIKE ?1 ESCAPE '{LIKE_ESCAPE}'
                    )
                 ORDER BY updated_at DESC, id ASC;"
            ),
            Some(pattern.as_str()),
        )
    }

    fn switch_pinned_status(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET is_pinned = 1 - is_pinned WHERE id = ?1;",
            [id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn insert_content_rows(tx: &Transaction<'_>, rows: &[ContentItemRow]) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO content_items (note_id, content_type, content, position)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    for row in rows {
        stmt.execute(params![
            row.note_id,
            row.content_type.as_db_str(),
            row.content.as_str(),
            row.position,
        ])?;
    }
    Ok(())
}

fn load_content_rows(conn: &Connection, note_id: NoteId) -> RepoResult<Vec<ContentItemRow>> {
    let mut stmt = conn.prepare(
        "SELECT note_id, content_type, content, position
         FROM content_items
         WHERE note_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([note_id])?;
    let mut content = Vec::new();
    while let Some(row) = rows.next()? {
        let type_text: String = row.get("content_type")?;
        let content_type = ContentType::from_db_str(&type_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid content type `{type_text}` in content_items.content_type"
            ))
        })?;
        content.push(ContentItemRow {
            note_id: row.get("note_id")?,
            content_type,
            content: row.get("content")?,
            position: row.get("position")?,
        });
    }
    Ok(content)
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<NoteRow> {
    let is_pinned = match row.get::<_, i64>("is_pinned")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_pinned value `{other}` in notes.is_pinned"
            )));
        }
    };

    Ok(NoteRow {
        id: row.get("id")?,
        title: row.get("title")?,
        updated_at: row.get("updated_at")?,
        is_pinned,
    })
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
