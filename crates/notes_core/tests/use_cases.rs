use notes_core::{
    now_millis, AddNoteUseCase, ContentItem, DeleteNoteUseCase, EditNoteUseCase,
    GetAllNotesUseCase, GetNoteUseCase, Note, NoteId, NotesRepository, RepoError, RepoResult,
    SearchNotesUseCase, SwitchPinnedStatusUseCase,
};
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Add {
        title: String,
        content: Vec<ContentItem>,
        is_pinned: bool,
        updated_at: i64,
    },
    Delete(NoteId),
    Edit(Note),
    GetAll,
    Get(NoteId),
    Search(String),
    Switch(NoteId),
}

#[derive(Default)]
struct FakeRepository {
    calls: RefCell<Vec<Call>>,
    notes: Vec<Note>,
    fail: bool,
}

impl FakeRepository {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn record(&self, call: Call) -> RepoResult<()> {
        self.calls.borrow_mut().push(call);
        if self.fail {
            return Err(RepoError::InvalidData("boom".to_string()));
        }
        Ok(())
    }
}

impl NotesRepository for FakeRepository {
    fn add_note(
        &self,
        title: &str,
        content: &[ContentItem],
        is_pinned: bool,
        updated_at: i64,
    ) -> RepoResult<NoteId> {
        self.record(Call::Add {
            title: title.to_string(),
            content: content.to_vec(),
            is_pinned,
            updated_at,
        })?;
        Ok(1)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        self.record(Call::Delete(id))
    }

    fn edit_note(&self, note: &Note) -> RepoResult<()> {
        self.record(Call::Edit(note.clone()))
    }

    fn get_all_notes(&self) -> RepoResult<Vec<Note>> {
        self.record(Call::GetAll)?;
        Ok(self.notes.clone())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Note> {
        self.record(Call::Get(id))?;
        self.notes
            .iter()
            .find(|note| note.id == id)
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    fn search_notes(&self, query: &str) -> RepoResult<Vec<Note>> {
        self.record(Call::Search(query.to_string()))?;
        Ok(self.notes.clone())
    }

    fn switch_pinned_status(&self, id: NoteId) -> RepoResult<()> {
        self.record(Call::Switch(id))
    }
}

fn note(id: NoteId, title: &str) -> Note {
    Note {
        id,
        title: title.to_string(),
        content: vec![ContentItem::text("body")],
        updated_at: 1000,
        is_pinned: false,
    }
}

#[test]
fn add_note_stores_unpinned_with_current_time() {
    let repo = FakeRepository::default();
    let before = now_millis();

    let id = AddNoteUseCase::new(&repo)
        .execute("Title", &[ContentItem::text("text")])
        .unwrap();

    let after = now_millis();
    assert_eq!(id, 1);
    let calls = repo.calls.borrow();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Call::Add {
            title,
            content,
            is_pinned,
            updated_at,
        } => {
            assert_eq!(title, "Title");
            assert_eq!(content, &vec![ContentItem::text("text")]);
            assert!(!is_pinned);
            assert!((before..=after).contains(updated_at));
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[test]
fn edit_note_refreshes_updated_at_and_keeps_other_fields() {
    let repo = FakeRepository::default();
    let original = Note {
        is_pinned: true,
        ..note(5, "Keep")
    };
    let before = now_millis();

    EditNoteUseCase::new(&repo).execute(&original).unwrap();

    let calls = repo.calls.borrow();
    let Call::Edit(saved) = &calls[0] else {
        panic!("expected edit call");
    };
    assert!(saved.updated_at >= before);
    assert_eq!(
        Note {
            updated_at: original.updated_at,
            ..saved.clone()
        },
        original
    );
}

#[test]
fn single_call_use_cases_delegate_unchanged() {
    let repo = FakeRepository {
        notes: vec![note(3, "Three")],
        ..FakeRepository::default()
    };

    DeleteNoteUseCase::new(&repo).execute(3).unwrap();
    assert_eq!(GetNoteUseCase::new(&repo).execute(3).unwrap(), note(3, "Three"));
    assert_eq!(GetAllNotesUseCase::new(&repo).execute().unwrap().len(), 1);
    SearchNotesUseCase::new(&repo).execute("  raw query ").unwrap();
    SwitchPinnedStatusUseCase::new(&repo).execute(0).unwrap();

    assert_eq!(
        *repo.calls.borrow(),
        vec![
            Call::Delete(3),
            Call::Get(3),
            Call::GetAll,
            Call::Search("  raw query ".to_string()),
            Call::Switch(0),
        ]
    );
}

#[test]
fn repository_errors_propagate() {
    let repo = FakeRepository::failing();

    assert!(AddNoteUseCase::new(&repo).execute("t", &[]).is_err());
    assert!(DeleteNoteUseCase::new(&repo).execute(1).is_err());
    assert!(SwitchPinnedStatusUseCase::new(&repo).execute(1).is_err());
    assert!(matches!(
        GetAllNotesUseCase::new(&repo).execute(),
        Err(RepoError::InvalidData(message)) if message == "boom"
    ));
}

#[test]
fn missing_note_is_not_found() {
    let repo = FakeRepository::default();
    assert!(matches!(
        GetNoteUseCase::new(&repo).execute(42),
        Err(RepoError::NotFound(42))
    ));
}
