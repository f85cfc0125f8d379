use notes_core::repo::mapper::{ContentItemRow, ContentType, NoteRow, NoteWithContentRow};
use notes_core::storage::image_files::ImageResult;
use notes_core::{
    ContentItem, ImageError, ImageFileManager, Note, NoteId, NotesDao, NotesRepository,
    NotesRepositoryImpl, RepoError, RepoResult,
};
use std::cell::{Cell, RefCell};

const INTERNAL_DIR: &str = "/data/user/0/com.example.notes/files/";

#[derive(Default)]
struct RecordingDao {
    stored: RefCell<Vec<NoteWithContentRow>>,
    calls: RefCell<Vec<String>>,
    added: RefCell<Vec<(NoteRow, Vec<ContentItem>)>>,
    updated: RefCell<Vec<(NoteRow, Vec<ContentItemRow>)>>,
    fail_writes: Cell<bool>,
}

impl RecordingDao {
    fn with_note(note: NoteWithContentRow) -> Self {
        let dao = Self::default();
        dao.stored.borrow_mut().push(note);
        dao
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn write_failure(&self) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::InvalidData("write rejected".to_string()));
        }
        Ok(())
    }
}

impl NotesDao for RecordingDao {
    fn add_note_with_content(
        &self,
        note: &NoteRow,
        content: &[ContentItem],
    ) -> RepoResult<NoteId> {
        self.record("add");
        self.write_failure()?;
        self.added
            .borrow_mut()
            .push((note.clone(), content.to_vec()));
        Ok(99)
    }

    fn update_note(&self, note: &NoteRow, content: &[ContentItemRow]) -> RepoResult<()> {
        self.record(format!("update:{}", note.id));
        self.write_failure()?;
        self.updated
            .borrow_mut()
            .push((note.clone(), content.to_vec()));
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        self.record(format!("delete:{id}"));
        self.write_failure()
    }

    fn get_note(&self, id: NoteId) -> RepoResult<NoteWithContentRow> {
        self.record(format!("get:{id}"));
        self.stored
            .borrow()
            .iter()
            .find(|row| row.note.id == id)
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    fn get_all_notes(&self) -> RepoResult<Vec<NoteWithContentRow>> {
        self.record("get_all");
        Ok(self.stored.borrow().clone())
    }

    fn search_notes(&self, query: &str) -> RepoResult<Vec<NoteWithContentRow>> {
        self.record(format!("search:{query}"));
        Ok(self.stored.borrow().clone())
    }

    fn switch_pinned_status(&self, id: NoteId) -> RepoResult<()> {
        self.record(format!("switch:{id}"));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingImages {
    internal_checks: RefCell<Vec<String>>,
    copied_from: RefCell<Vec<String>>,
    deleted: RefCell<Vec<String>>,
    fail_copy_of: Option<&'static str>,
    fail_delete: bool,
}

impl ImageFileManager for RecordingImages {
    fn is_internal(&self, url: &str) -> bool {
        self.internal_checks.borrow_mut().push(url.to_string());
        url.starts_with(INTERNAL_DIR)
    }

    fn copy_image_to_internal_storage(&self, url: &str) -> ImageResult<String> {
        if self.fail_copy_of == Some(url) {
            return Err(ImageError::InvalidSource(url.to_string()));
        }
        let mut copied = self.copied_from.borrow_mut();
        copied.push(url.to_string());
        Ok(format!("{INTERNAL_DIR}IMG_copy{}.jpg", copied.len()))
    }

    fn delete_image(&self, url: &str) -> ImageResult<()> {
        self.deleted.borrow_mut().push(url.to_string());
        if self.fail_delete {
            return Err(ImageError::Io {
                path: url.into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        Ok(())
    }
}

type TestRepo = NotesRepositoryImpl<RecordingDao, RecordingImages>;

fn repo_with(dao: RecordingDao, images: RecordingImages) -> TestRepo {
    NotesRepositoryImpl::new(dao, images)
}

fn internal(name: &str) -> String {
    format!("{INTERNAL_DIR}{name}")
}

fn stored_note(id: NoteId, content: &[ContentItem]) -> NoteWithContentRow {
    NoteWithContentRow {
        note: NoteRow {
            id,
            title: "Stored".to_string(),
            updated_at: 1000,
            is_pinned: false,
        },
        content: notes_core::repo::mapper::to_content_rows(content, id),
    }
}

fn edited(id: NoteId, content: Vec<ContentItem>) -> Note {
    Note {
        id,
        title: "Edited title".to_string(),
        content,
        updated_at: 5000,
        is_pinned: true,
    }
}

#[test]
fn add_text_only_note_passes_row_with_zero_id_and_untouched_content() {
    let repo = repo_with(RecordingDao::default(), RecordingImages::default());
    let content = vec![ContentItem::text("Buy milk"), ContentItem::text("Eggs")];

    let id = repo
        .add_note("Shopping List", &content, false, 1_700_000_000_000)
        .unwrap();

    assert_eq!(id, 99);
    let added = repo.dao().added.borrow();
    assert_eq!(added.len(), 1);
    let (row, stored) = &added[0];
    assert_eq!(
        row,
        &NoteRow {
            id: 0,
            title: "Shopping List".to_string(),
            updated_at: 1_700_000_000_000,
            is_pinned: false,
        }
    );
    assert_eq!(stored, &content);
    assert!(repo.images().internal_checks.borrow().is_empty());
    assert!(repo.images().copied_from.borrow().is_empty());
}

#[test]
fn add_note_keeps_pinned_flag() {
    let repo = repo_with(RecordingDao::default(), RecordingImages::default());
    repo.add_note("Pinned", &[], true, 1000).unwrap();
    assert!(repo.dao().added.borrow()[0].0.is_pinned);
}

#[test]
fn add_note_keeps_internal_image_url() {
    let repo = repo_with(RecordingDao::default(), RecordingImages::default());
    let url = internal("IMG_abc.jpg");

    repo.add_note("Internal", &[ContentItem::image(url.clone())], false, 3000)
        .unwrap();

    assert_eq!(repo.dao().added.borrow()[0].1, vec![ContentItem::image(url)]);
    assert!(repo.images().copied_from.borrow().is_empty());
}

#[test]
fn add_note_copies_external_images_once_and_keeps_order() {
    let repo = repo_with(RecordingDao::default(), RecordingImages::default());
    let content = vec![
        ContentItem::image("/sdcard/DCIM/one.jpg"),
        ContentItem::text("between"),
        ContentItem::image(internal("IMG_kept.jpg")),
        ContentItem::image("file:///sdcard/DCIM/two.jpg"),
    ];

    repo.add_note("Mixed", &content, false, 4000).unwrap();

    assert_eq!(
        *repo.images().copied_from.borrow(),
        vec!["/sdcard/DCIM/one.jpg", "file:///sdcard/DCIM/two.jpg"]
    );
    assert_eq!(
        *repo.images().internal_checks.borrow(),
        vec![
            "/sdcard/DCIM/one.jpg".to_string(),
            internal("IMG_kept.jpg"),
            "file:///sdcard/DCIM/two.jpg".to_string(),
        ]
    );
    assert_eq!(
        repo.dao().added.borrow()[0].1,
        vec![
            ContentItem::image(internal("IMG_copy1.jpg")),
            ContentItem::text("between"),
            ContentItem::image(internal("IMG_kept.jpg")),
            ContentItem::image(internal("IMG_copy2.jpg")),
        ]
    );
}

#[test]
fn add_note_with_failing_copy_stores_nothing_and_discards_earlier_copies() {
    let images = RecordingImages {
        fail_copy_of: Some("/sdcard/broken.jpg"),
        ..RecordingImages::default()
    };
    let repo = repo_with(RecordingDao::default(), images);
    let content = vec![
        ContentItem::image("/sdcard/fine.jpg"),
        ContentItem::image("/sdcard/broken.jpg"),
    ];

    let err = repo.add_note("Broken", &content, false, 1).unwrap_err();

    assert!(matches!(err, RepoError::Image(ImageError::InvalidSource(_))));
    assert!(repo.dao().added.borrow().is_empty());
    assert_eq!(
        *repo.images().deleted.borrow(),
        vec![internal("IMG_copy1.jpg")]
    );
}

#[test]
fn add_note_rejected_by_store_discards_copies() {
    let dao = RecordingDao::default();
    dao.fail_writes.set(true);
    let repo = repo_with(dao, RecordingImages::default());

    let err = repo
        .add_note("Rejected", &[ContentItem::image("/sdcard/a.jpg")], false, 1)
        .unwrap_err();

    assert!(matches!(err, RepoError::InvalidData(_)));
    assert_eq!(
        *repo.images().deleted.borrow(),
        vec![internal("IMG_copy1.jpg")]
    );
}

#[test]
fn delete_note_fetches_first_then_deletes_all_its_images_only() {
    let content = vec![
        ContentItem::text("caption"),
        ContentItem::image(internal("IMG_1.jpg")),
        ContentItem::image(internal("IMG_2.jpg")),
    ];
    let repo = repo_with(
        RecordingDao::with_note(stored_note(10, &content)),
        RecordingImages::default(),
    );

    repo.delete_note(10).unwrap();

    assert_eq!(*repo.dao().calls.borrow(), vec!["get:10", "delete:10"]);
    assert_eq!(
        *repo.images().deleted.borrow(),
        vec![internal("IMG_1.jpg"), internal("IMG_2.jpg")]
    );
}

#[test]
fn delete_text_only_note_touches_no_images() {
    let repo = repo_with(
        RecordingDao::with_note(stored_note(11, &[ContentItem::text("only text")])),
        RecordingImages::default(),
    );

    repo.delete_note(11).unwrap();

    assert!(repo.images().deleted.borrow().is_empty());
}

#[test]
fn delete_missing_note_returns_not_found_without_deleting() {
    let repo = repo_with(RecordingDao::default(), RecordingImages::default());

    let err = repo.delete_note(404).unwrap_err();

    assert!(matches!(err, RepoError::NotFound(404)));
    assert_eq!(*repo.dao().calls.borrow(), vec!["get:404"]);
    assert!(repo.images().deleted.borrow().is_empty());
}

#[test]
fn edit_note_deletes_only_removed_images() {
    let old = vec![
        ContentItem::image(internal("IMG_keep.jpg")),
        ContentItem::image(internal("IMG_drop.jpg")),
    ];
    let repo = repo_with(
        RecordingDao::with_note(stored_note(20, &old)),
        RecordingImages::default(),
    );

    repo.edit_note(&edited(
        20,
        vec![ContentItem::image(internal("IMG_keep.jpg"))],
    ))
    .unwrap();

    assert_eq!(
        *repo.images().deleted.borrow(),
        vec![internal("IMG_drop.jpg")]
    );
    assert!(repo.images().copied_from.borrow().is_empty());
}

#[test]
fn edit_note_passes_row_fields_and_content_rows_with_note_id() {
    let repo = repo_with(
        RecordingDao::with_note(stored_note(21, &[ContentItem::text("old")])),
        RecordingImages::default(),
    );

    repo.edit_note(&edited(
        21,
        vec![
            ContentItem::text("new text"),
            ContentItem::image("/sdcard/new.jpg"),
        ],
    ))
    .unwrap();

    let updated = repo.dao().updated.borrow();
    let (row, rows) = &updated[0];
    assert_eq!(
        row,
        &NoteRow {
            id: 21,
            title: "Edited title".to_string(),
            updated_at: 5000,
            is_pinned: true,
        }
    );
    assert_eq!(
        rows,
        &vec![
            ContentItemRow {
                note_id: 21,
                content_type: ContentType::Text,
                content: "new text".to_string(),
                position: 0,
            },
            ContentItemRow {
                note_id: 21,
                content_type: ContentType::Image,
                content: internal("IMG_copy1.jpg"),
                position: 1,
            },
        ]
    );
    assert_eq!(*repo.images().copied_from.borrow(), vec!["/sdcard/new.jpg"]);
    assert!(repo.images().deleted.borrow().is_empty());
}

#[test]
fn edit_note_rejected_by_store_keeps_old_images_and_discards_copies() {
    let dao = RecordingDao::with_note(stored_note(
        22,
        &[ContentItem::image(internal("IMG_old.jpg"))],
    ));
    dao.fail_writes.set(true);
    let repo = repo_with(dao, RecordingImages::default());

    let err = repo
        .edit_note(&edited(22, vec![ContentItem::image("/sdcard/new.jpg")]))
        .unwrap_err();

    assert!(matches!(err, RepoError::InvalidData(_)));
    assert_eq!(
        *repo.images().deleted.borrow(),
        vec![internal("IMG_copy1.jpg")]
    );
}

#[test]
fn failing_image_deletes_do_not_fail_edit_or_delete() {
    let old = vec![
        ContentItem::image(internal("IMG_keep.jpg")),
        ContentItem::image(internal("IMG_drop.jpg")),
    ];
    let images = RecordingImages {
        fail_delete: true,
        ..RecordingImages::default()
    };
    let repo = repo_with(RecordingDao::with_note(stored_note(24, &old)), images);

    repo.edit_note(&edited(
        24,
        vec![ContentItem::image(internal("IMG_keep.jpg"))],
    ))
    .unwrap();
    repo.delete_note(24).unwrap();

    assert_eq!(
        *repo.dao().calls.borrow(),
        vec!["get:24", "update:24", "get:24", "delete:24"]
    );
    assert_eq!(repo.dao().updated.borrow().len(), 1);
    assert_eq!(
        *repo.images().deleted.borrow(),
        vec![
            internal("IMG_drop.jpg"),
            internal("IMG_keep.jpg"),
            internal("IMG_drop.jpg"),
        ]
    );
}

#[test]
fn edit_missing_note_returns_not_found() {
    let repo = repo_with(RecordingDao::default(), RecordingImages::default());
    let err = repo.edit_note(&edited(23, Vec::new())).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(23)));
    assert!(repo.dao().updated.borrow().is_empty());
}

#[test]
fn reads_map_rows_to_domain_notes() {
    let repo = repo_with(
        RecordingDao::with_note(stored_note(
            30,
            &[ContentItem::text("hello"), ContentItem::image(internal("a.jpg"))],
        )),
        RecordingImages::default(),
    );

    let all = repo.get_all_notes().unwrap();
    let found = repo.search_notes("").unwrap();
    let one = repo.get_note(30).unwrap();

    assert_eq!(all, found);
    assert_eq!(all, vec![one.clone()]);
    assert_eq!(
        one.content,
        vec![ContentItem::text("hello"), ContentItem::image(internal("a.jpg"))]
    );
    assert_eq!(
        *repo.dao().calls.borrow(),
        vec!["get_all", "search:", "get:30"]
    );
}

#[test]
fn switch_pinned_status_delegates_each_call() {
    let repo = repo_with(RecordingDao::default(), RecordingImages::default());

    repo.switch_pinned_status(31).unwrap();
    repo.switch_pinned_status(31).unwrap();

    assert_eq!(*repo.dao().calls.borrow(), vec!["switch:31", "switch:31"]);
}
