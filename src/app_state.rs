//! Application state: both stores plus the blob store they persist to.
//!
//! `AppState` is built explicitly with [`AppState::open`], which rehydrates
//! from the blob store once. Every mutation applies the store operation and
//! then writes a full snapshot of both collections. A failed write is logged
//! and otherwise ignored; the in-memory state stays authoritative.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use log::{debug, error, info};

use crate::{
    day_one_tasks, import_notes, import_todos, parse_payload, todos_by_day, BlobStore,
    ImportPolicy, ImportReport, Note, NoteColor, NotePatch, NotesStore, Priority, Result,
    Snapshot, Todo, TodoPatch, TodoType, TodosStore,
};

/// User input for a new note.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub color: NoteColor,
    pub tags: Vec<String>,
}

/// User input for a new todo.
#[derive(Debug, Clone)]
pub struct TodoDraft {
    pub text: String,
    pub priority: Priority,
    pub todo_type: TodoType,
    pub category: String,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

pub struct AppState {
    notes: NotesStore,
    todos: TodosStore,
    blob_store: Box<dyn BlobStore>,
    key: String,
}

impl AppState {
    /// Rehydrates both collections from `blob_store` under `key`.
    ///
    /// Missing or unreadable data gives empty collections, never an error.
    pub fn open(blob_store: Box<dyn BlobStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let blob = match blob_store.load(&key) {
            Ok(blob) => blob,
            Err(e) => {
                error!("Failed to read persisted state '{}': {}", key, e);
                None
            }
        };
        let snapshot = Snapshot::from_blob(blob.as_deref());

        AppState {
            notes: NotesStore::from_notes(snapshot.notes),
            todos: TodosStore::from_todos(snapshot.todos),
            blob_store,
            key,
        }
    }

    pub fn notes(&self) -> &NotesStore {
        &self.notes
    }

    pub fn todos(&self) -> &TodosStore {
        &self.todos
    }

    /// Writes the current snapshot to the blob store.
    pub fn flush(&mut self) -> Result<()> {
        let snapshot = Snapshot::new(self.notes.notes().to_vec(), self.todos.todos().to_vec());
        let blob = snapshot.to_json()?;
        self.blob_store.save(&self.key, &blob)?;
        debug!(
            "Flushed {} notes and {} todos",
            self.notes.len(),
            self.todos.len()
        );
        Ok(())
    }

    /// Write-through after a mutation; failures are logged only.
    fn persist(&mut self) {
        if let Err(e) = self.flush() {
            error!("Failed to persist state '{}': {}", self.key, e);
        }
    }

    /// Persists only when the store reported a change; returns `changed`.
    fn persist_if(&mut self, changed: bool) -> bool {
        if changed {
            self.persist();
        }
        changed
    }

    /// Clears persisted state and empties both collections.
    pub fn purge(&mut self) -> Result<()> {
        self.blob_store.clear(&self.key)?;
        self.notes = NotesStore::new();
        self.todos = TodosStore::new();
        info!("Purged persisted state '{}'", self.key);
        Ok(())
    }

    // Notes

    /// Creates a note from `draft`. Content is trimmed; blank content creates
    /// nothing and returns `None`.
    pub fn create_note(&mut self, draft: NoteDraft) -> Option<Note> {
        let content = draft.content.trim();
        if content.is_empty() {
            debug!("Ignoring note with empty content");
            return None;
        }
        let note = Note::new(
            draft.title.trim().to_string(),
            content.to_string(),
            draft.color,
            draft.tags,
        );
        self.add_note(note.clone());
        Some(note)
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.add(note);
        self.persist();
    }

    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> bool {
        let changed = self.notes.update(id, patch);
        self.persist_if(changed)
    }

    /// Applies a user edit. Content is trimmed and a blank content edit is
    /// dropped; the rest of the patch still applies.
    pub fn edit_note(&mut self, id: &str, mut patch: NotePatch) -> bool {
        patch.content = patch
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if patch.is_empty() {
            debug!("Ignoring empty edit for note {}", id);
            return false;
        }
        self.update_note(id, patch)
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        let removed = self.notes.delete(id);
        self.persist_if(removed)
    }

    pub fn toggle_pin(&mut self, id: &str) -> bool {
        let toggled = self.notes.toggle_pin(id);
        self.persist_if(toggled)
    }

    pub fn import_notes(&mut self, notes: Vec<Note>) -> usize {
        let count = self.notes.import(notes);
        self.persist();
        count
    }

    /// Parses and validates `text`, then imports the accepted notes.
    ///
    /// Format and shape errors are returned before any state changes.
    pub fn import_notes_text(&mut self, text: &str, policy: ImportPolicy) -> Result<ImportReport<Note>> {
        let values = parse_payload(text)?;
        let report = {
            let existing: HashSet<&str> = self.notes.notes().iter().map(|n| n.id.as_str()).collect();
            import_notes(values, policy, &existing, Utc::now())
        };
        self.import_notes(report.imported.clone());
        Ok(report)
    }

    // Todos

    /// Creates a todo from `draft`. Blank text creates nothing.
    pub fn create_todo(&mut self, draft: TodoDraft) -> Option<Todo> {
        let text = draft.text.trim();
        if text.is_empty() {
            debug!("Ignoring todo with empty text");
            return None;
        }
        let mut todo = Todo::new(text.to_string(), draft.priority, draft.todo_type, draft.category)
            .with_due_date(draft.due_date);
        todo.tags = draft.tags;
        self.add_todo(todo.clone());
        Some(todo)
    }

    pub fn add_todo(&mut self, todo: Todo) {
        self.todos.add(todo);
        self.persist();
    }

    pub fn update_todo(&mut self, id: &str, patch: TodoPatch) -> bool {
        let changed = self.todos.update(id, patch);
        self.persist_if(changed)
    }

    pub fn delete_todo(&mut self, id: &str) -> bool {
        let removed = self.todos.delete(id);
        self.persist_if(removed)
    }

    pub fn toggle_complete(&mut self, id: &str) -> bool {
        let toggled = self.todos.toggle_complete(id);
        self.persist_if(toggled)
    }

    pub fn bulk_import_todos(&mut self, todos: Vec<Todo>) -> usize {
        let count = self.todos.bulk_import(todos);
        self.persist();
        count
    }

    /// Parses and validates `text`, then bulk-imports the accepted todos.
    pub fn import_todos_text(&mut self, text: &str, policy: ImportPolicy) -> Result<ImportReport<Todo>> {
        let values = parse_payload(text)?;
        let report = {
            let existing: HashSet<&str> = self.todos.todos().iter().map(|t| t.id.as_str()).collect();
            import_todos(values, policy, &existing, Utc::now())
        };
        self.bulk_import_todos(report.imported.clone());
        Ok(report)
    }

    /// Bulk-imports the day-one starter tasks unless a day-one set is
    /// already present. Returns how many todos were added.
    pub fn seed_day_one(&mut self) -> usize {
        if !todos_by_day(self.todos.todos(), 1).is_empty() {
            info!("Day 1 tasks already loaded, skipping");
            return 0;
        }
        self.bulk_import_todos(day_one_tasks())
    }

    pub fn clear_todos(&mut self) -> bool {
        let cleared = self.todos.clear();
        self.persist_if(cleared)
    }

    pub fn reorder_todos(&mut self, from: usize, to: usize) -> bool {
        let moved = self.todos.reorder(from, to);
        self.persist_if(moved)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{LnError, MemoryBlobStore, DEFAULT_STORAGE_KEY};

    fn state() -> AppState {
        AppState::open(Box::new(MemoryBlobStore::new()), DEFAULT_STORAGE_KEY)
    }

    fn draft(text: &str) -> TodoDraft {
        TodoDraft {
            text: text.into(),
            priority: Priority::Medium,
            todo_type: TodoType::Personal,
            category: "Personal".into(),
            due_date: None,
            tags: vec![],
        }
    }

    #[test]
    fn blank_content_creates_nothing() {
        let mut state = state();
        let note_draft = NoteDraft {
            content: "   \n".into(),
            ..Default::default()
        };
        assert!(state.create_note(note_draft).is_none());
        assert!(state.create_todo(draft("  ")).is_none());
        assert!(state.notes().is_empty());
        assert!(state.todos().is_empty());
    }

    #[test]
    fn blank_edit_is_ignored() {
        let mut state = state();
        let note = state
            .create_note(NoteDraft {
                content: "keep me".into(),
                ..Default::default()
            })
            .unwrap();
        assert!(!state.edit_note(&note.id, NotePatch::content("  ")));
        assert_eq!(state.notes().get(&note.id).unwrap().content, "keep me");

        let patch = NotePatch {
            title: Some("Kept".into()),
            content: Some(" \t".into()),
            ..Default::default()
        };
        assert!(state.edit_note(&note.id, patch));
        let note = state.notes().get(&note.id).unwrap();
        assert_eq!(note.title, "Kept");
        assert_eq!(note.content, "keep me");
    }

    /// Counts every save so tests can see when a write-through happened.
    struct CountingStore {
        saves: Rc<Cell<usize>>,
    }

    impl BlobStore for CountingStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn save(&mut self, _key: &str, _blob: &str) -> Result<()> {
            self.saves.set(self.saves.get() + 1);
            Ok(())
        }

        fn clear(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unknown_ids_do_not_write() {
        let saves = Rc::new(Cell::new(0));
        let store = CountingStore {
            saves: Rc::clone(&saves),
        };
        let mut state = AppState::open(Box::new(store), DEFAULT_STORAGE_KEY);
        state.create_todo(draft("real"));
        assert_eq!(saves.get(), 1);

        assert!(!state.update_note("ghost", NotePatch::content("x")));
        assert!(!state.delete_note("ghost"));
        assert!(!state.toggle_pin("ghost"));
        assert!(!state.update_todo("ghost", TodoPatch::text("x")));
        assert!(!state.delete_todo("ghost"));
        assert!(!state.toggle_complete("ghost"));
        assert!(!state.reorder_todos(9, 0));
        assert_eq!(saves.get(), 1);

        let id = state.todos().todos()[0].id.clone();
        assert!(state.toggle_complete(&id));
        assert_eq!(saves.get(), 2);
    }

    #[test]
    fn day_one_seed_loads_once() {
        let mut state = state();
        state.create_todo(draft("existing"));

        let added = state.seed_day_one();
        assert_eq!(added, day_one_tasks().len());
        assert_eq!(state.todos().len(), added + 1);
        assert_eq!(state.todos().todos()[added].text, "existing");
        assert_eq!(todos_by_day(state.todos().todos(), 1).len(), added);

        assert_eq!(state.seed_day_one(), 0);
        assert_eq!(state.todos().len(), added + 1);
    }

    #[test]
    fn import_errors_leave_state_untouched() {
        let mut state = state();
        state.create_todo(draft("existing"));
        let before = state.todos().clone();

        assert!(matches!(
            state.import_todos_text("{not valid", ImportPolicy::Lenient),
            Err(LnError::Format { .. })
        ));
        assert!(matches!(
            state.import_todos_text(r#"{"id":"1"}"#, ImportPolicy::Lenient),
            Err(LnError::Shape { .. })
        ));
        assert_eq!(state.todos(), &before);
    }

    #[test]
    fn purge_empties_everything() {
        let mut state = state();
        state.create_todo(draft("a"));
        state.purge().unwrap();
        assert!(state.todos().is_empty());
    }
}
