//! Bulk import of notes and todos from pasted JSON.
//!
//! Import runs in two phases. [`parse_payload`] only checks that the text is
//! a JSON array. [`import_notes`] and [`import_todos`] then turn each element
//! into an entity under an [`ImportPolicy`]. Neither phase touches a store;
//! the caller hands the result to the store's bulk-add operation.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    new_entity_id, FinanceData, LnError, Note, NoteColor, Priority, Result, Todo, TodoType,
    DEFAULT_CATEGORY,
};

/// How strictly records are checked before they become entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Any JSON object is accepted; missing fields get defaults.
    #[default]
    Lenient,
    /// Ids and the required text field must be present and non-empty, and
    /// ids must not collide with the store or with each other.
    Strict,
}

/// A record that could not be imported.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position in the payload array
    pub index: usize,
    pub reason: String,
}

/// Outcome of the semantic phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport<T> {
    /// Entities ready for the store, in payload order
    pub imported: Vec<T>,
    pub rejected: Vec<RejectedRecord>,
}

impl<T> ImportReport<T> {
    fn new() -> Self {
        ImportReport {
            imported: Vec::new(),
            rejected: Vec::new(),
        }
    }

    fn reject(&mut self, index: usize, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("Rejected import record #{}: {}", index, reason);
        self.rejected.push(RejectedRecord { index, reason });
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses `text` as a JSON array and returns its raw elements.
///
/// Fails with [`LnError::Format`] when the text is not JSON and with
/// [`LnError::Shape`] when it is JSON but not an array.
pub fn parse_payload(text: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(text).map_err(|e| LnError::Format {
        message: e.to_string(),
    })?;

    match value {
        Value::Array(items) => {
            debug!("Parsed import payload with {} records", items.len());
            Ok(items)
        }
        other => Err(LnError::Shape {
            found: json_kind(&other),
        }),
    }
}

/// Note-shaped record as it appears in a payload. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NoteRecord {
    id: Option<String>,
    title: Option<String>,
    content: Option<String>,
    color: Option<NoteColor>,
    tags: Option<Vec<String>>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    is_pinned: Option<bool>,
    is_encrypted: Option<bool>,
}

impl NoteRecord {
    fn into_note(self, now: DateTime<Utc>) -> Note {
        let created_at = self.created_at.unwrap_or(now);
        Note {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(new_entity_id),
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
            is_pinned: self.is_pinned.unwrap_or(false),
            is_encrypted: self.is_encrypted.unwrap_or(false),
        }
    }
}

/// Todo-shaped record as it appears in a payload.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TodoRecord {
    id: Option<String>,
    text: Option<String>,
    completed: Option<bool>,
    priority: Option<Priority>,
    #[serde(rename = "type")]
    todo_type: Option<TodoType>,
    due_date: Option<NaiveDate>,
    category: Option<String>,
    created_at: Option<DateTime<Utc>>,
    tags: Option<Vec<String>>,
    notes: Option<String>,
    day_number: Option<u32>,
    finance_data: Option<FinanceData>,
}

impl TodoRecord {
    fn into_todo(self, now: DateTime<Utc>) -> Todo {
        Todo {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(new_entity_id),
            text: self.text.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
            priority: self.priority.unwrap_or_default(),
            todo_type: self.todo_type.unwrap_or_default(),
            due_date: self.due_date,
            category: self
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            created_at: self.created_at.unwrap_or(now),
            tags: self.tags.unwrap_or_default(),
            notes: self.notes,
            day_number: self.day_number,
            finance_data: self.finance_data,
        }
    }
}

/// Payload record that can become an entity.
trait ImportRecord: DeserializeOwned {
    type Entity;

    /// Name of the field that must be non-empty under the strict policy
    const REQUIRED_FIELD: &'static str;

    fn id(&self) -> Option<&str>;

    fn required_text(&self) -> Option<&str>;

    fn into_entity(self, now: DateTime<Utc>) -> Self::Entity;
}

impl ImportRecord for NoteRecord {
    type Entity = Note;

    const REQUIRED_FIELD: &'static str = "content";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn required_text(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn into_entity(self, now: DateTime<Utc>) -> Note {
        self.into_note(now)
    }
}

impl ImportRecord for TodoRecord {
    type Entity = Todo;

    const REQUIRED_FIELD: &'static str = "text";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn required_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn into_entity(self, now: DateTime<Utc>) -> Todo {
        self.into_todo(now)
    }
}

fn import_records<R: ImportRecord>(
    values: Vec<Value>,
    policy: ImportPolicy,
    existing_ids: &HashSet<&str>,
    now: DateTime<Utc>,
) -> ImportReport<R::Entity> {
    let mut report = ImportReport::new();
    let mut batch_ids: HashSet<String> = HashSet::new();

    for (index, value) in values.into_iter().enumerate() {
        if !value.is_object() {
            report.reject(index, format!("expected an object, found {}", json_kind(&value)));
            continue;
        }

        let record: R = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                report.reject(index, e.to_string());
                continue;
            }
        };

        if policy == ImportPolicy::Strict {
            let id = record.id().unwrap_or("");
            if id.is_empty() {
                report.reject(index, "missing id");
                continue;
            }
            if record
                .required_text()
                .map_or(true, |text| text.trim().is_empty())
            {
                report.reject(index, format!("missing {}", R::REQUIRED_FIELD));
                continue;
            }
            if existing_ids.contains(id) || !batch_ids.insert(id.to_string()) {
                report.reject(index, format!("duplicate id '{}'", id));
                continue;
            }
        }

        report.imported.push(record.into_entity(now));
    }

    debug!(
        "Import validated: {} accepted, {} rejected",
        report.imported.len(),
        report.rejected.len()
    );
    report
}

/// Converts raw payload elements into notes.
pub fn import_notes(
    values: Vec<Value>,
    policy: ImportPolicy,
    existing_ids: &HashSet<&str>,
    now: DateTime<Utc>,
) -> ImportReport<Note> {
    import_records::<NoteRecord>(values, policy, existing_ids, now)
}

/// Converts raw payload elements into todos.
pub fn import_todos(
    values: Vec<Value>,
    policy: ImportPolicy,
    existing_ids: &HashSet<&str>,
    now: DateTime<Utc>,
) -> ImportReport<Todo> {
    import_records::<TodoRecord>(values, policy, existing_ids, now)
}
