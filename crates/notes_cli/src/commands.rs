//! Subcommand dispatch over the core use cases.

use crate::args::{Args, Command};
use anyhow::{bail, Context, Result};
use log::debug;
use notes_core::db::open_db;
use notes_core::{
    parse_markup, render_markup, AddNoteUseCase, DeleteNoteUseCase, EditNoteUseCase,
    GetNoteUseCase, LocalImageFileManager, Note, NoteId, NotesConfig, NotesListCommand,
    NotesListStateHolder, NotesRepository, NotesRepositoryImpl, RepoError, SqliteNotesDao,
    SwitchPinnedStatusUseCase,
};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ListOutput<'a> {
    pinned: &'a [Note],
    other: &'a [Note],
}

#[derive(Serialize)]
struct ActionOutput {
    note_id: NoteId,
}

/// Runs one subcommand against the store under the resolved data directory.
pub fn run(args: Args, out: &mut impl Write) -> Result<()> {
    let config = NotesConfig::resolve(args.data_dir.as_deref())
        .context("Failed to resolve the notes data directory")?;
    config
        .ensure_dirs()
        .with_context(|| format!("Failed to prepare {}", config.data_dir.display()))?;
    debug!(
        "event=cli_start module=cli command={}",
        command_name(&args.command)
    );

    let conn = open_db(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    let images = LocalImageFileManager::try_new(&config.images_dir)
        .context("Failed to prepare the image directory")?;
    let repository = NotesRepositoryImpl::new(SqliteNotesDao::new(&conn), images);

    execute(&repository, args.command, args.json, out)
}

fn execute<R: NotesRepository>(
    repository: &R,
    command: Command,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Add { title, body } => {
            if title.trim().is_empty() {
                bail!("Title must not be blank");
            }
            let content = parse_markup(&body);
            let note_id = AddNoteUseCase::new(repository)
                .execute(title.trim(), &content)
                .context("Failed to add note")?;
            write_action(out, json, note_id, "Added")
        }
        Command::List => list(repository, "", json, out),
        Command::Search { query } => list(repository, &query, json, out),
        Command::Show { note_id } => {
            let note = get_note(repository, note_id)?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &note)?;
                writeln!(out)?;
            } else {
                write_note(out, &note)?;
            }
            Ok(())
        }
        Command::Edit {
            note_id,
            title,
            body,
        } => {
            if title.is_none() && body.is_none() {
                bail!("Nothing to change: pass --title and/or --body");
            }
            let mut note = get_note(repository, note_id)?;
            if let Some(title) = title {
                if title.trim().is_empty() {
                    bail!("Title must not be blank");
                }
                note.title = title.trim().to_string();
            }
            if let Some(body) = body {
                note.content = parse_markup(&body);
            }
            EditNoteUseCase::new(repository)
                .execute(&note)
                .with_context(|| format!("Failed to edit note {note_id}"))?;
            write_action(out, json, note_id, "Updated")
        }
        Command::Pin { note_id } => {
            // Goes through the list holder so the refreshed split is what gets reported.
            let mut list = NotesListStateHolder::open(repository)?;
            list.process(NotesListCommand::SwitchPinnedStatus(note_id))
                .map_err(|err| describe(err, note_id))?;
            let pinned = list
                .state()
                .pinned_notes
                .iter()
                .any(|note| note.id == note_id);
            if json {
                serde_json::to_writer(&mut *out, &serde_json::json!({
                    "note_id": note_id,
                    "is_pinned": pinned,
                }))?;
                writeln!(out)?;
            } else {
                let verb = if pinned { "Pinned" } else { "Unpinned" };
                writeln!(out, "{verb} note {note_id}")?;
            }
            Ok(())
        }
        Command::Delete { note_id } => {
            DeleteNoteUseCase::new(repository)
                .execute(note_id)
                .map_err(|err| describe(err, note_id))?;
            write_action(out, json, note_id, "Deleted")
        }
    }
}

fn list<R: NotesRepository>(
    repository: &R,
    query: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut holder = NotesListStateHolder::open(repository).context("Failed to list notes")?;
    if !query.trim().is_empty() {
        holder
            .process(NotesListCommand::InputSearchQuery(query.to_string()))
            .context("Failed to search notes")?;
    }
    let state = holder.state();

    if json {
        serde_json::to_writer_pretty(
            &mut *out,
            &ListOutput {
                pinned: &state.pinned_notes,
                other: &state.other_notes,
            },
        )?;
        writeln!(out)?;
        return Ok(());
    }

    if state.pinned_notes.is_empty() && state.other_notes.is_empty() {
        writeln!(out, "No notes found")?;
        return Ok(());
    }
    for note in state.pinned_notes.iter().chain(&state.other_notes) {
        let marker = if note.is_pinned { '*' } else { ' ' };
        writeln!(out, "{marker} {:>5}  {}", note.id, note.title)?;
    }
    Ok(())
}

fn get_note<R: NotesRepository>(repository: &R, note_id: NoteId) -> Result<Note> {
    GetNoteUseCase::new(repository)
        .execute(note_id)
        .map_err(|err| describe(err, note_id))
}

fn describe(err: RepoError, note_id: NoteId) -> anyhow::Error {
    match err {
        RepoError::NotFound(_) => anyhow::anyhow!("Note {note_id} does not exist"),
        other => anyhow::Error::new(other).context(format!("Failed on note {note_id}")),
    }
}

fn write_note(out: &mut impl Write, note: &Note) -> Result<()> {
    let pinned = if note.is_pinned { " [pinned]" } else { "" };
    writeln!(out, "#{} {}{pinned}", note.id, note.title)?;
    writeln!(out, "updated_at: {}", note.updated_at)?;
    let body = render_markup(&note.content);
    if !body.is_empty() {
        writeln!(out)?;
        writeln!(out, "{body}")?;
    }
    Ok(())
}

fn write_action(out: &mut impl Write, json: bool, note_id: NoteId, verb: &str) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &ActionOutput { note_id })?;
        writeln!(out)?;
    } else {
        writeln!(out, "{verb} note {note_id}")?;
    }
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::List => "list",
        Command::Search { .. } => "search",
        Command::Show { .. } => "show",
        Command::Edit { .. } => "edit",
        Command::Pin { .. } => "pin",
        Command::Delete { .. } => "delete",
    }
}
