//! In-memory todo collection.
//!
//! Same contract as the notes store: newest first, unknown ids are no-ops.
//! Bulk import prepends a batch in its own order and never de-duplicates.

use log::{debug, trace, warn};

use crate::{Todo, TodoPatch};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodosStore {
    todos: Vec<Todo>,
}

impl TodosStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_todos(todos: Vec<Todo>) -> Self {
        Self { todos }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn add(&mut self, todo: Todo) {
        if self.get(&todo.id).is_some() {
            warn!("Adding todo with duplicate id: {}", todo.id);
        }
        trace!("Adding todo: {}", todo.id);
        self.todos.insert(0, todo);
    }

    pub fn update(&mut self, id: &str, patch: TodoPatch) -> bool {
        match self.todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => todo.apply(patch),
            None => {
                debug!("Update skipped, todo not found: {}", id);
                false
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.todos.len();
        self.todos.retain(|todo| todo.id != id);
        let removed = self.todos.len() != before;
        if !removed {
            debug!("Delete skipped, todo not found: {}", id);
        }
        removed
    }

    pub fn toggle_complete(&mut self, id: &str) -> bool {
        match self.todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                true
            }
            None => {
                debug!("Completion toggle skipped, todo not found: {}", id);
                false
            }
        }
    }

    /// Prepends `todos` ahead of the existing collection, keeping their order.
    pub fn bulk_import(&mut self, todos: Vec<Todo>) -> usize {
        let count = todos.len();
        self.todos.splice(0..0, todos);
        debug!("Bulk imported {} todos", count);
        count
    }

    pub fn clear(&mut self) -> bool {
        let had_any = !self.todos.is_empty();
        self.todos.clear();
        had_any
    }

    /// Moves the todo at `from` so it sits at `to`. `to` past the end means
    /// last; an out-of-range `from` does nothing.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.todos.len() {
            debug!(
                "Reorder skipped, index {} out of range ({} todos)",
                from,
                self.todos.len()
            );
            return false;
        }
        let moved = self.todos.remove(from);
        let to = to.min(self.todos.len());
        self.todos.insert(to, moved);
        from != to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Priority, TodoType};

    fn todo(id: &str) -> Todo {
        let mut todo = Todo::new(id.into(), Priority::Medium, TodoType::Work, "Work".into());
        todo.id = id.into();
        todo
    }

    fn ids(store: &TodosStore) -> Vec<&str> {
        store.todos().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn bulk_import_prepends_in_order() {
        let mut store = TodosStore::new();
        store.add(todo("old"));
        assert_eq!(store.bulk_import(vec![todo("a"), todo("b")]), 2);
        assert_eq!(ids(&store), ["a", "b", "old"]);
    }

    #[test]
    fn bulk_import_does_not_deduplicate() {
        let mut store = TodosStore::new();
        store.add(todo("a"));
        store.bulk_import(vec![todo("a")]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn toggle_complete_is_its_own_inverse() {
        let mut store = TodosStore::new();
        store.add(todo("a"));
        assert!(store.toggle_complete("a"));
        assert!(store.get("a").unwrap().completed);
        assert!(store.toggle_complete("a"));
        assert!(!store.get("a").unwrap().completed);
    }

    #[test]
    fn update_merges_fields_and_keeps_identity() {
        let mut store = TodosStore::new();
        store.add(todo("a"));
        let created = store.get("a").unwrap().created_at;

        let patch = TodoPatch {
            text: Some("renamed".into()),
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert!(store.update("a", patch));

        let updated = store.get("a").unwrap();
        assert_eq!(updated.id, "a");
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.text, "renamed");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.todo_type, TodoType::Work);
    }

    #[test]
    fn unknown_ids_leave_store_unchanged() {
        let mut store = TodosStore::new();
        store.add(todo("a"));
        let before = store.clone();
        assert!(!store.update("nope", TodoPatch::text("x")));
        assert!(!store.delete("nope"));
        assert!(!store.toggle_complete("nope"));
        assert_eq!(store, before);
    }

    #[test]
    fn reorder_moves_single_element() {
        let mut store = TodosStore::from_todos(vec![todo("a"), todo("b"), todo("c")]);
        assert!(store.reorder(0, 2));
        assert_eq!(ids(&store), ["b", "c", "a"]);
        assert!(store.reorder(2, 0));
        assert_eq!(ids(&store), ["a", "b", "c"]);
    }

    #[test]
    fn reorder_clamps_target_and_ignores_bad_source() {
        let mut store = TodosStore::from_todos(vec![todo("a"), todo("b")]);
        assert!(!store.reorder(5, 0));
        assert_eq!(ids(&store), ["a", "b"]);
        assert!(store.reorder(0, 99));
        assert_eq!(ids(&store), ["b", "a"]);
    }

    #[test]
    fn clear_empties_collection() {
        let mut store = TodosStore::from_todos(vec![todo("a")]);
        assert!(store.clear());
        assert!(store.is_empty());
        assert!(!store.clear());
    }
}
