//! Derived views over the note and todo collections.
//!
//! Everything here is a pure function of its inputs. Nothing is cached or
//! persisted; callers recompute after every state change. Date-sensitive
//! views take `today` explicitly.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Note, Priority, Todo, TodoType};

fn normalize_query(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Whether `note` matches an already lowercased query on content, title or tags
fn note_matches(note: &Note, needle: &str) -> bool {
    contains_ci(&note.content, needle)
        || contains_ci(&note.title, needle)
        || note.tags.iter().any(|tag| contains_ci(tag, needle))
}

fn todo_matches(todo: &Todo, needle: &str) -> bool {
    contains_ci(&todo.text, needle)
        || contains_ci(&todo.category, needle)
        || todo.tags.iter().any(|tag| contains_ci(tag, needle))
        || todo.notes.as_deref().is_some_and(|notes| contains_ci(notes, needle))
}

/// Notes whose content, title or any tag contains `query`, ignoring case.
/// An empty query keeps everything.
pub fn search_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    match normalize_query(query) {
        Some(needle) => notes.iter().filter(|note| note_matches(note, &needle)).collect(),
        None => notes.iter().collect(),
    }
}

/// Todos whose text, category, tags or notes contain `query`, ignoring case.
pub fn search_todos<'a>(todos: &'a [Todo], query: &str) -> Vec<&'a Todo> {
    match normalize_query(query) {
        Some(needle) => todos.iter().filter(|todo| todo_matches(todo, &needle)).collect(),
        None => todos.iter().collect(),
    }
}

/// Pinned notes first, then newest `created_at` first within each group.
pub fn sort_pinned_first(notes: &mut [&Note]) {
    notes.sort_by_key(|note| (Reverse(note.is_pinned), Reverse(note.created_at)));
}

/// The notes view: search, then pinned-first ordering.
pub fn notes_display<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let mut shown = search_notes(notes, query);
    sort_pinned_first(&mut shown);
    shown
}

pub fn pinned_count(notes: &[Note]) -> usize {
    notes.iter().filter(|note| note.is_pinned).count()
}

/// Completion filter for the todos view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn accepts(&self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !todo.completed,
            StatusFilter::Completed => todo.completed,
        }
    }
}

/// Combined filter behind the todos list. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoFilter {
    pub query: String,
    pub status: StatusFilter,
    pub todo_type: Option<TodoType>,
    pub category: Option<String>,
    /// Seeded day number, e.g. 1 for the day-one tasks
    pub day_number: Option<u32>,
}

impl TodoFilter {
    pub fn accepts(&self, todo: &Todo) -> bool {
        if !self.status.accepts(todo) {
            return false;
        }
        if let Some(needle) = normalize_query(&self.query) {
            if !todo_matches(todo, &needle) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &todo.category != category {
                return false;
            }
        }
        if let Some(todo_type) = self.todo_type {
            if todo.todo_type != todo_type {
                return false;
            }
        }
        if self.day_number.is_some() && todo.day_number != self.day_number {
            return false;
        }
        true
    }
}

/// Applies `filter` keeping storage order.
pub fn filter_todos<'a>(todos: &'a [Todo], filter: &TodoFilter) -> Vec<&'a Todo> {
    todos.iter().filter(|todo| filter.accepts(todo)).collect()
}

/// Counters shown above the todos list. Always computed over the whole
/// collection, never the filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub overdue: usize,
    pub due_today: usize,
}

pub fn todo_stats(todos: &[Todo], today: NaiveDate) -> TodoStats {
    TodoStats {
        total: todos.len(),
        completed: todos.iter().filter(|t| t.completed).count(),
        active: todos.iter().filter(|t| !t.completed).count(),
        overdue: todos.iter().filter(|t| t.is_overdue(today)).count(),
        due_today: todos.iter().filter(|t| t.is_due_today(today)).count(),
    }
}

pub fn active_todos(todos: &[Todo]) -> Vec<&Todo> {
    todos.iter().filter(|t| !t.completed).collect()
}

pub fn completed_todos(todos: &[Todo]) -> Vec<&Todo> {
    todos.iter().filter(|t| t.completed).collect()
}

/// Incomplete todos of the given priority
pub fn active_by_priority(todos: &[Todo], priority: Priority) -> Vec<&Todo> {
    todos
        .iter()
        .filter(|t| t.priority == priority && !t.completed)
        .collect()
}

pub fn overdue_todos(todos: &[Todo], today: NaiveDate) -> Vec<&Todo> {
    todos.iter().filter(|t| t.is_overdue(today)).collect()
}

pub fn todos_by_type(todos: &[Todo], todo_type: TodoType) -> Vec<&Todo> {
    todos.iter().filter(|t| t.todo_type == todo_type).collect()
}

pub fn todos_by_day(todos: &[Todo], day_number: u32) -> Vec<&Todo> {
    let filter = TodoFilter {
        day_number: Some(day_number),
        ..Default::default()
    };
    filter_todos(todos, &filter)
}

/// Todos due on `date` regardless of completion
pub fn todos_due_on(todos: &[Todo], date: NaiveDate) -> Vec<&Todo> {
    todos.iter().filter(|t| t.due_date == Some(date)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::NoteColor;

    fn note(id: &str, content: &str, pinned: bool, minutes: i64) -> Note {
        let mut note = Note::new(String::new(), content.into(), NoteColor::Default, vec![]);
        note.id = id.into();
        note.is_pinned = pinned;
        note.created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        note
    }

    fn todo(text: &str, category: &str) -> Todo {
        Todo::new(text.into(), Priority::Low, TodoType::Personal, category.into())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pinned_notes_come_first_newest_within_group() {
        let notes = vec![
            note("old-unpinned", "a", false, 0),
            note("old-pinned", "b", true, 1),
            note("new-unpinned", "c", false, 5),
            note("new-pinned", "d", true, 6),
        ];
        let shown: Vec<_> = notes_display(&notes, "").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(shown, ["new-pinned", "old-pinned", "new-unpinned", "old-unpinned"]);
    }

    #[test]
    fn note_search_covers_title_and_tags() {
        let mut tagged = note("t", "nothing here", false, 0);
        tagged.tags = vec!["Groceries".into()];
        let mut titled = note("h", "body", false, 1);
        titled.title = "Grocery list".into();
        let other = note("o", "unrelated", false, 2);
        let notes = vec![tagged, titled, other];

        let hits: Vec<_> = search_notes(&notes, "GROCER").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(hits, ["t", "h"]);
        assert_eq!(search_notes(&notes, "   ").len(), 3);
    }

    #[test]
    fn todo_search_matches_text_only_where_present() {
        let todos = vec![todo("Buy milk", "Shopping"), todo("Call mom", "Personal")];
        let hits = search_todos(&todos, "milk");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Buy milk");
    }

    #[test]
    fn combined_filter_applies_every_criterion() {
        let mut done = todo("Pay rent", "Finance");
        done.completed = true;
        let mut work = todo("Ship release", "Work");
        work.todo_type = TodoType::Work;
        let todos = vec![done, work, todo("Pay phone bill", "Finance")];

        let filter = TodoFilter {
            query: "pay".into(),
            status: StatusFilter::Active,
            category: Some("Finance".into()),
            ..Default::default()
        };
        let hits = filter_todos(&todos, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Pay phone bill");

        let by_type = TodoFilter {
            todo_type: Some(TodoType::Work),
            ..Default::default()
        };
        assert_eq!(filter_todos(&todos, &by_type).len(), 1);
        assert_eq!(filter_todos(&todos, &TodoFilter::default()).len(), 3);
    }

    #[test]
    fn day_filter_combines_with_status() {
        let mut todos = crate::day_one_tasks();
        todos.push(todo("Deploy later", "Work"));

        let open_day_one = TodoFilter {
            status: StatusFilter::Active,
            day_number: Some(1),
            ..Default::default()
        };
        let hits = filter_todos(&todos, &open_day_one);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].text.contains("Vercel"));
        assert!(todos_by_day(&todos, 2).is_empty());
    }

    #[test]
    fn stats_count_over_full_collection() {
        let today = day(2025, 6, 15);
        let overdue = todo("late", "Work").with_due_date(Some(day(2025, 6, 1)));
        let mut late_but_done = todo("done", "Work").with_due_date(Some(day(2025, 6, 1)));
        late_but_done.completed = true;
        let due_today = todo("today", "Work").with_due_date(Some(today));
        let undated = todo("someday", "Work");
        let todos = vec![overdue, late_but_done, due_today, undated];

        assert_eq!(
            todo_stats(&todos, today),
            TodoStats {
                total: 4,
                completed: 1,
                active: 3,
                overdue: 1,
                due_today: 1,
            }
        );
        assert_eq!(overdue_todos(&todos, today).len(), 1);
        assert_eq!(todos_due_on(&todos, day(2025, 6, 1)).len(), 2);
    }

    #[test]
    fn selectors_partition_by_field() {
        let mut high = todo("a", "Work");
        high.priority = Priority::High;
        let mut high_done = high.clone();
        high_done.completed = true;
        let mut seeded = todo("b", "Work");
        seeded.day_number = Some(1);
        let todos = vec![high, high_done, seeded];

        assert_eq!(active_by_priority(&todos, Priority::High).len(), 1);
        assert_eq!(active_todos(&todos).len(), 2);
        assert_eq!(completed_todos(&todos).len(), 1);
        assert_eq!(todos_by_day(&todos, 1).len(), 1);
        assert_eq!(todos_by_type(&todos, TodoType::Personal).len(), 3);
    }
}
