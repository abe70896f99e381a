//! Todo entity and its fixed enumerations.
use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{new_entity_id, LnError};

/// Starter categories offered when creating a todo. Not enforced.
pub const DEFAULT_CATEGORIES: [&str; 6] = ["Personal", "Work", "Shopping", "Health", "Finance", "Other"];

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "Personal";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = LnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(LnError::InvalidInput {
                message: format!("unknown priority '{}'", s),
            }),
        }
    }
}

/// Kind of task. The `finance-*` kinds belong to an external finance app and
/// only carry an opaque [`FinanceData`] payload here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodoType {
    #[default]
    Project,
    Work,
    Personal,
    Learning,
    Essential,
    FinanceExpense,
    FinanceSaving,
}

/// Display metadata attached to each [`TodoType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoTypeInfo {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    /// Subsystem that owns todos of this type, if any
    pub app: Option<&'static str>,
}

impl TodoType {
    pub const ALL: [TodoType; 7] = [
        TodoType::Project,
        TodoType::Work,
        TodoType::Personal,
        TodoType::Learning,
        TodoType::Essential,
        TodoType::FinanceExpense,
        TodoType::FinanceSaving,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoType::Project => "project",
            TodoType::Work => "work",
            TodoType::Personal => "personal",
            TodoType::Learning => "learning",
            TodoType::Essential => "essential",
            TodoType::FinanceExpense => "finance-expense",
            TodoType::FinanceSaving => "finance-saving",
        }
    }

    pub fn info(&self) -> TodoTypeInfo {
        match self {
            TodoType::Project => TodoTypeInfo {
                label: "Project",
                color: "#8B5CF6",
                icon: "🚀",
                app: None,
            },
            TodoType::Work => TodoTypeInfo {
                label: "Work",
                color: "#3B82F6",
                icon: "💼",
                app: None,
            },
            TodoType::Personal => TodoTypeInfo {
                label: "Personal",
                color: "#10B981",
                icon: "🏠",
                app: None,
            },
            TodoType::Learning => TodoTypeInfo {
                label: "Learning",
                color: "#F59E0B",
                icon: "📚",
                app: None,
            },
            TodoType::Essential => TodoTypeInfo {
                label: "Essential",
                color: "#EF4444",
                icon: "⚡",
                app: None,
            },
            TodoType::FinanceExpense => TodoTypeInfo {
                label: "Expense",
                color: "#EC4899",
                icon: "💸",
                app: Some("wealth-pulse"),
            },
            TodoType::FinanceSaving => TodoTypeInfo {
                label: "Saving",
                color: "#14B8A6",
                icon: "🏦",
                app: Some("wealth-pulse"),
            },
        }
    }

    pub fn is_finance(&self) -> bool {
        matches!(self, TodoType::FinanceExpense | TodoType::FinanceSaving)
    }
}

impl fmt::Display for TodoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoType {
    type Err = LnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TodoType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| LnError::InvalidInput {
                message: format!("unknown todo type '{}'", s),
            })
    }
}

/// Payload reserved for the external finance integration. Stored and
/// round-tripped, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_with_wealth_pulse: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wealth_pulse_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(rename = "type", default)]
    pub todo_type: TodoType,
    /// Deadline without a time component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Grouping tag for seeded content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance_data: Option<FinanceData>,
}

impl Todo {
    /// Creates an incomplete todo with a fresh id and the current time
    pub fn new(text: String, priority: Priority, todo_type: TodoType, category: String) -> Self {
        Todo {
            id: new_entity_id(),
            text,
            completed: false,
            priority,
            todo_type,
            due_date: None,
            category,
            created_at: Utc::now(),
            tags: Vec::new(),
            notes: None,
            day_number: None,
            finance_data: None,
        }
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Incomplete and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Incomplete and due on `today`.
    pub fn is_due_today(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date == Some(today)
    }

    /// Merges `patch` into the todo. Returns whether any field was written.
    pub fn apply(&mut self, patch: TodoPatch) -> bool {
        if patch.is_empty() {
            return false;
        }

        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(todo_type) = patch.todo_type {
            self.todo_type = todo_type;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(day_number) = patch.day_number {
            self.day_number = day_number;
        }
        if let Some(finance_data) = patch.finance_data {
            self.finance_data = finance_data;
        }
        true
    }
}

/// Field-level partial update for a [`Todo`].
///
/// Optional entity fields use `Option<Option<_>>`: `Some(None)` clears the
/// field, `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub todo_type: Option<TodoType>,
    pub due_date: Option<Option<NaiveDate>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<Option<String>>,
    pub day_number: Option<Option<u32>>,
    pub finance_data: Option<Option<FinanceData>>,
}

impl TodoPatch {
    pub fn text(text: impl Into<String>) -> Self {
        TodoPatch {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TodoPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn todo_due(due: Option<NaiveDate>) -> Todo {
        Todo::new("t".into(), Priority::Low, TodoType::Work, "Work".into()).with_due_date(due)
    }

    #[test]
    fn overdue_requires_incomplete_and_past_due() {
        let today = day(2025, 3, 10);
        let mut todo = todo_due(Some(day(2025, 3, 9)));
        assert!(todo.is_overdue(today));

        todo.completed = true;
        assert!(!todo.is_overdue(today));

        assert!(!todo_due(Some(today)).is_overdue(today));
        assert!(!todo_due(None).is_overdue(today));
    }

    #[test]
    fn due_today_is_date_only() {
        let today = day(2025, 3, 10);
        assert!(todo_due(Some(today)).is_due_today(today));
        assert!(!todo_due(Some(day(2025, 3, 11))).is_due_today(today));
    }

    #[test]
    fn patch_can_clear_due_date() {
        let mut todo = todo_due(Some(day(2025, 1, 1)));
        let patch = TodoPatch {
            due_date: Some(None),
            ..Default::default()
        };
        assert!(todo.apply(patch));
        assert_eq!(todo.due_date, None);
    }

    #[test]
    fn finance_types_carry_app_tag() {
        for kind in TodoType::ALL {
            assert_eq!(kind.is_finance(), kind.info().app == Some("wealth-pulse"));
        }
        assert_eq!(TodoType::FinanceSaving.info().label, "Saving");
    }

    #[test]
    fn type_serializes_kebab_case_under_type_key() {
        let mut todo = todo_due(Some(day(2025, 11, 29)));
        todo.todo_type = TodoType::FinanceExpense;
        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value["type"], "finance-expense");
        assert_eq!(value["dueDate"], "2025-11-29");
        assert_eq!(value["priority"], "low");
    }

    #[test]
    fn parses_priority_and_type_names() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(
            "finance-saving".parse::<TodoType>().unwrap(),
            TodoType::FinanceSaving
        );
        assert!("urgent".parse::<Priority>().is_err());
    }
}
