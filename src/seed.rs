//! Starter content: the day-one task set.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::{new_entity_id, Priority, Todo, TodoType};

/// Day the starter tasks were created and are due on.
const DAY_ONE: (i32, u32, u32) = (2025, 11, 29);

const DAY_ONE_TASKS: &[(&str, bool, Priority, TodoType, &str)] = &[
    (
        "📚 Created Life-Sync 2.0 master documentation (README.md)",
        true,
        Priority::High,
        TodoType::Project,
        "Work",
    ),
    (
        "🏗️ Created ARCHITECTURE.md with system design",
        true,
        Priority::High,
        TodoType::Project,
        "Work",
    ),
    (
        "📝 Created LEARNING_ROADMAP.md for 4-month journey",
        true,
        Priority::High,
        TodoType::Learning,
        "Personal",
    ),
    (
        "✅ Built Life Notes app with Notes & Todos features",
        true,
        Priority::High,
        TodoType::Project,
        "Work",
    ),
    (
        "🚀 Pushed life-notes to GitHub repository",
        true,
        Priority::High,
        TodoType::Project,
        "Work",
    ),
    (
        "📁 Set up multi-repo architecture (docs + apps)",
        true,
        Priority::High,
        TodoType::Project,
        "Work",
    ),
    (
        "📄 Created FOLDER-STRUCTURE.md documentation",
        true,
        Priority::Medium,
        TodoType::Project,
        "Work",
    ),
    (
        "🔧 Configured .gitignore for multi-repo setup",
        true,
        Priority::Medium,
        TodoType::Project,
        "Work",
    ),
    (
        "⬆️ Pushed life-sync-2.0 docs to GitHub",
        true,
        Priority::High,
        TodoType::Project,
        "Work",
    ),
    (
        "🌐 Deploy life-notes to Vercel",
        false,
        Priority::High,
        TodoType::Project,
        "Work",
    ),
];

/// Builds the day-one tasks with fresh `day1-` ids, tagged `dayNumber: 1`,
/// created and due on the same day.
pub fn day_one_tasks() -> Vec<Todo> {
    let (year, month, day) = DAY_ONE;
    let due = NaiveDate::from_ymd_opt(year, month, day);
    let created_at = Utc
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);

    DAY_ONE_TASKS
        .iter()
        .map(|&(text, completed, priority, todo_type, category)| {
            let mut todo = Todo::new(text.to_string(), priority, todo_type, category.to_string())
                .with_due_date(due);
            todo.id = format!("day1-{}", new_entity_id());
            todo.completed = completed;
            todo.created_at = created_at;
            todo.day_number = Some(1);
            todo
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_one_set_shape() {
        let tasks = day_one_tasks();
        assert_eq!(tasks.len(), 10);
        assert!(tasks.iter().all(|t| t.id.starts_with("day1-")));
        assert!(tasks.iter().all(|t| t.day_number == Some(1)));
        assert!(tasks
            .iter()
            .all(|t| t.due_date == NaiveDate::from_ymd_opt(2025, 11, 29)));
        assert_eq!(tasks.iter().filter(|t| !t.completed).count(), 1);
        assert_eq!(tasks[2].todo_type, TodoType::Learning);
        assert_eq!(tasks[2].category, "Personal");
    }

    #[test]
    fn ids_are_unique_per_call() {
        let first = day_one_tasks();
        let second = day_one_tasks();
        assert_ne!(first[0].id, second[0].id);
    }
}
