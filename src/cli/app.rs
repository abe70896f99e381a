//! CLI module for the lifenotes application
//!
//! This module turns parsed commands into operations on the application
//! state and renders the derived views to the terminal.
use std::{
    fs::{read_to_string, OpenOptions},
    io::{stdin, stdout, Read, Write},
    path::Path,
    process::Command,
};

use chrono::{Local, NaiveDate};
use console::style;
use log::info;
use shell_words::split;
use tempfile::Builder;

use crate::{
    content_preview, filter_todos, notes_display, parse_date, parse_month, parse_tags,
    pinned_count, todo_stats, AppState, CalendarMonth, Commands, Config, DayBucket, ImportArgs,
    ImportPolicy, ImportReport, LnError, Note, NoteColor, NoteCommand, NoteDraft, NotePatch,
    Priority, Result, Todo, TodoCommand, TodoDraft, TodoFilter, TodoFilterArgs, TodoPatch,
    TodoType, DEFAULT_CATEGORIES,
};

const EDITOR_COMMENT_OPEN: &str = "<!--";
const EDITOR_COMMENT_CLOSE: &str = "-->";

/// CLI Application handler - processes CLI commands against the application state
pub struct App {
    state: AppState,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    pub fn new(state: AppState, config: Config, verbose: bool) -> Self {
        Self {
            state,
            config,
            verbose,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Notes { action } => self.run_note_command(action),
            Commands::Todos { action } => self.run_todo_command(action),
            Commands::Purge { force } => self.handle_purge(force),
            Commands::Config { show } => self.handle_config(show),
        }
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn run_note_command(&mut self, action: NoteCommand) -> Result<()> {
        match action {
            NoteCommand::Add {
                content,
                title,
                color,
                tags,
                edit,
            } => {
                let title = title.unwrap_or_default();
                let content = match (content, edit) {
                    (content, true) => {
                        self.open_editor_for_content(&title, content.as_deref().unwrap_or(""))?
                    }
                    (Some(content), false) => content,
                    (None, false) => {
                        return Err(LnError::InvalidInput {
                            message: "note content is required (or use --edit)".to_string(),
                        })
                    }
                };
                let draft = NoteDraft {
                    title,
                    content,
                    color: color.parse::<NoteColor>()?,
                    tags: parse_tags(tags),
                };
                match self.state.create_note(draft) {
                    Some(note) => println!("Note created with ID: {}", note.id),
                    None => println!("Nothing to save: note content is empty."),
                }
            }

            NoteCommand::List { search, json } => {
                let notes = self.state.notes().notes();
                let shown = notes_display(notes, search.as_deref().unwrap_or(""));
                if json {
                    println!("{}", serde_json::to_string_pretty(&shown)?);
                } else {
                    println!(
                        "Total: {}  Pinned: {}",
                        style(notes.len()).bold(),
                        style(pinned_count(notes)).yellow().bold()
                    );
                    self.display_notes_text(&shown);
                }
            }

            NoteCommand::Edit {
                id,
                content,
                title,
                color,
                tags,
                edit,
            } => {
                let Some(existing) = self.state.notes().get(&id).cloned() else {
                    println!("No note with ID {}", id);
                    return Ok(());
                };

                let content = if edit {
                    Some(self.open_editor_for_content(&existing.title, &existing.content)?)
                } else {
                    content
                };

                let patch = NotePatch {
                    title,
                    content,
                    color: color.map(|c| c.parse::<NoteColor>()).transpose()?,
                    tags: tags.map(|t| parse_tags(Some(t))),
                    ..Default::default()
                };

                if self.state.edit_note(&id, patch) {
                    println!("Note {} updated.", id);
                } else {
                    println!("Nothing to change.");
                }
            }

            NoteCommand::Delete { id } => {
                if self.state.delete_note(&id) {
                    println!("Note {} deleted.", id);
                } else {
                    println!("No note with ID {}", id);
                }
            }

            NoteCommand::Pin { id } => {
                if self.state.toggle_pin(&id) {
                    let pinned = self.state.notes().get(&id).is_some_and(|n| n.is_pinned);
                    println!("Note {} {}.", id, if pinned { "pinned" } else { "unpinned" });
                } else {
                    println!("No note with ID {}", id);
                }
            }

            NoteCommand::Import(args) => {
                let text = self.read_import_text(&args)?;
                let report = self.state.import_notes_text(&text, policy_for(&args))?;
                self.print_import_summary("notes", &report);
            }

            NoteCommand::Export => {
                println!("{}", serde_json::to_string_pretty(self.state.notes().notes())?);
            }
        }
        Ok(())
    }

    fn run_todo_command(&mut self, action: TodoCommand) -> Result<()> {
        match action {
            TodoCommand::Add {
                text,
                priority,
                todo_type,
                category,
                due,
                tags,
            } => {
                let draft = TodoDraft {
                    text,
                    priority: priority.parse::<Priority>()?,
                    todo_type: todo_type.parse::<TodoType>()?,
                    category: category.unwrap_or_else(|| self.config.default_category.clone()),
                    due_date: due.as_deref().map(parse_date).transpose()?,
                    tags: parse_tags(tags),
                };
                match self.state.create_todo(draft) {
                    Some(todo) => println!("Todo created with ID: {}", todo.id),
                    None => println!("Nothing to save: todo text is empty."),
                }
            }

            TodoCommand::List { filter, day, json } => {
                let filter = TodoFilter {
                    day_number: day,
                    ..todo_filter(filter)?
                };
                let shown = filter_todos(self.state.todos().todos(), &filter);
                if json {
                    println!("{}", serde_json::to_string_pretty(&shown)?);
                } else {
                    self.display_todos_text(&shown);
                }
            }

            TodoCommand::Edit {
                id,
                text,
                priority,
                todo_type,
                category,
                due,
                clear_due,
                tags,
                notes,
            } => {
                let due_date = if clear_due {
                    Some(None)
                } else {
                    due.as_deref().map(parse_date).transpose()?.map(Some)
                };
                let patch = TodoPatch {
                    text: text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
                    priority: priority.map(|p| p.parse::<Priority>()).transpose()?,
                    todo_type: todo_type.map(|t| t.parse::<TodoType>()).transpose()?,
                    due_date,
                    category,
                    tags: tags.map(|t| parse_tags(Some(t))),
                    notes: notes.map(Some),
                    ..Default::default()
                };

                if patch.is_empty() {
                    println!("Nothing to change.");
                } else if self.state.update_todo(&id, patch) {
                    println!("Todo {} updated.", id);
                } else {
                    println!("No todo with ID {}", id);
                }
            }

            TodoCommand::Delete { id } => {
                if self.state.delete_todo(&id) {
                    println!("Todo {} deleted.", id);
                } else {
                    println!("No todo with ID {}", id);
                }
            }

            TodoCommand::Toggle { id } => {
                if self.state.toggle_complete(&id) {
                    let done = self.state.todos().get(&id).is_some_and(|t| t.completed);
                    println!("Todo {} marked {}.", id, if done { "done" } else { "not done" });
                } else {
                    println!("No todo with ID {}", id);
                }
            }

            TodoCommand::Import(args) => {
                let text = self.read_import_text(&args)?;
                let report = self.state.import_todos_text(&text, policy_for(&args))?;
                self.print_import_summary("todos", &report);
            }

            TodoCommand::Export => {
                println!("{}", serde_json::to_string_pretty(self.state.todos().todos())?);
            }

            TodoCommand::Clear { force } => {
                let count = self.state.todos().len();
                if !force && !confirm(&format!("Delete all {} todos?", count))? {
                    println!("Clear cancelled.");
                    return Ok(());
                }
                self.state.clear_todos();
                println!("Deleted {} todos.", count);
            }

            TodoCommand::Move { from, to } => {
                if from >= self.state.todos().len() {
                    return Err(LnError::InvalidInput {
                        message: format!(
                            "position {} is out of range ({} todos)",
                            from,
                            self.state.todos().len()
                        ),
                    });
                }
                self.state.reorder_todos(from, to);
                println!("Moved todo from position {} to {}.", from, to);
            }

            TodoCommand::Stats { json } => {
                let stats = todo_stats(self.state.todos().todos(), self.today());
                if json {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                } else {
                    println!("Total:     {}", stats.total);
                    println!("Completed: {}", style(stats.completed).green());
                    println!("Active:    {}", style(stats.active).blue());
                    println!("Overdue:   {}", style(stats.overdue).red());
                    println!("Due today: {}", style(stats.due_today).yellow());
                }
            }

            TodoCommand::Seed => match self.state.seed_day_one() {
                0 => println!("Day 1 tasks are already loaded."),
                count => println!("Loaded {} day 1 tasks.", count),
            },

            TodoCommand::Calendar {
                month,
                prev,
                next,
                filter,
            } => {
                let today = self.today();
                let base = match month {
                    Some(month) => {
                        let (year, month) = parse_month(&month)?;
                        CalendarMonth::new(year, month).ok_or_else(|| LnError::InvalidInput {
                            message: format!("{}-{:02} is out of range", year, month),
                        })?
                    }
                    None => CalendarMonth::containing(today),
                };
                let offset = i64::from(next) - i64::from(prev);
                let shown = base.shift(offset).ok_or_else(|| LnError::InvalidInput {
                    message: format!("cannot move {} months from {}", offset, base.label()),
                })?;
                let filter = todo_filter(filter)?;
                let todos = filter_todos(self.state.todos().todos(), &filter);
                let buckets = shown.buckets(&todos, today);
                self.display_calendar(shown, &buckets);
            }
        }
        Ok(())
    }

    fn handle_purge(&mut self, force: bool) -> Result<()> {
        if !force
            && !confirm(&format!(
                "Delete {} notes and {} todos permanently?",
                self.state.notes().len(),
                self.state.todos().len()
            ))?
        {
            println!("Purge cancelled.");
            return Ok(());
        }
        self.state.purge()?;
        println!("All notes and todos deleted.");
        Ok(())
    }

    fn handle_config(&self, show: bool) -> Result<()> {
        if show || self.verbose {
            println!("{}", serde_json::to_string_pretty(&self.config)?);
        }
        if let Some(path) = Config::default_path() {
            println!("Config file: {}", path.display());
        }
        println!("Starter categories: {}", DEFAULT_CATEGORIES.join(", "));
        Ok(())
    }

    fn read_import_text(&self, args: &ImportArgs) -> Result<String> {
        match &args.file {
            Some(path) => {
                if !path.exists() {
                    return Err(LnError::InvalidInput {
                        message: format!("file not found: {}", path.display()),
                    });
                }
                Ok(read_to_string(path)?)
            }
            None => {
                info!("Reading import payload from stdin");
                let mut text = String::new();
                stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }

    fn print_import_summary<T>(&self, what: &str, report: &ImportReport<T>) {
        println!("Imported {} {}.", report.imported.len(), what);
        if !report.rejected.is_empty() {
            println!("Skipped {} records:", report.rejected.len());
            for rejected in &report.rejected {
                println!("  #{}: {}", rejected.index, rejected.reason);
            }
        }
    }

    fn open_editor_for_content(&self, title: &str, existing_content: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        self.write_editor_template(&temp_path, title, existing_content)?;

        let editor_cmd = self.config.get_editor_command();
        info!("Opening editor to write note content. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(strip_editor_comments(&content))
    }

    fn write_editor_template(&self, path: &Path, title: &str, existing_content: &str) -> Result<()> {
        let mut file = OpenOptions::new().write(true).open(path)?;

        let heading = if title.is_empty() { "New note" } else { title };
        writeln!(file, "{} {} {}", EDITOR_COMMENT_OPEN, heading, EDITOR_COMMENT_CLOSE)?;
        writeln!(
            file,
            "{} Lines like this one are ignored. Save and exit when done. {}",
            EDITOR_COMMENT_OPEN, EDITOR_COMMENT_CLOSE
        )?;
        if !existing_content.is_empty() {
            writeln!(file, "{}", existing_content)?;
        }

        Ok(())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let args = split(editor_cmd).map_err(|e| LnError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(LnError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program)
            .args(rest)
            .arg(file_path)
            .status()
            .map_err(|e| LnError::EditorError {
                message: format!("Failed to execute editor command '{}': {}", program, e),
            })?;

        if !status.success() {
            return Err(LnError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }

    /// Display notes in text format
    fn display_notes_text(&self, notes: &[&Note]) {
        if notes.is_empty() {
            println!("No notes found.");
            return;
        }

        // Use terminal width for formatting if available
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            let pin = if note.is_pinned {
                style("[pinned] ").yellow().to_string()
            } else {
                String::new()
            };
            println!(
                "{}{} | {} | {}",
                pin,
                note.id,
                note.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                note.color
            );
            if !note.title.is_empty() {
                println!("{}", style(&note.title).bold());
            }

            if !note.tags.is_empty() {
                let tags = note
                    .tags
                    .iter()
                    .map(|tag| format!("#{}", tag))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}", style(tags).cyan());
            }

            if self.verbose {
                println!("{}", note.content);
            } else {
                println!("{}", content_preview(&note.content, term_width.saturating_sub(4).max(20)));
            }
        }
    }

    fn display_todos_text(&self, todos: &[&Todo]) {
        if todos.is_empty() {
            println!("No todos found.");
            return;
        }

        let today = self.today();
        for todo in todos {
            let info = todo.todo_type.info();
            let check = if todo.completed { "[x]" } else { "[ ]" };
            let text = if todo.completed {
                style(&todo.text).dim().strikethrough()
            } else {
                style(&todo.text)
            };
            let priority = match todo.priority {
                Priority::High => style(todo.priority.as_str()).red(),
                Priority::Medium => style(todo.priority.as_str()).yellow(),
                Priority::Low => style(todo.priority.as_str()).green(),
            };

            let due = match todo.due_date {
                Some(due) if todo.is_overdue(today) => style(format!("overdue {}", due)).red().bold().to_string(),
                Some(due) if todo.is_due_today(today) => style(format!("due today {}", due)).yellow().bold().to_string(),
                Some(due) => format!("due {}", due),
                None => String::new(),
            };

            println!(
                "{} {} {}  {} {} | {} | {} {}",
                check,
                info.icon,
                text,
                style(info.label).dim(),
                priority,
                todo.category,
                due,
                style(&todo.id).dim()
            );
        }
    }

    fn display_calendar(&self, month: CalendarMonth, buckets: &[DayBucket]) {
        println!("{}", style(month.label()).bold());
        println!("Sun  Mon  Tue  Wed  Thu  Fri  Sat");

        let mut column = month.leading_blanks();
        let mut line = "     ".repeat(column as usize);
        for bucket in buckets {
            let day = bucket.date.format("%e").to_string();
            let marker = match bucket.todos.len() {
                0 => ' ',
                n if n < 10 => char::from_digit(n as u32, 10).unwrap_or('+'),
                _ => '+',
            };
            let cell = format!("{}{}  ", day, marker);
            if bucket.is_today {
                line.push_str(&style(cell).reverse().to_string());
            } else {
                line.push_str(&cell);
            }
            column += 1;
            if column == 7 {
                println!("{}", line);
                line.clear();
                column = 0;
            }
        }
        if !line.is_empty() {
            println!("{}", line);
        }

        for bucket in buckets.iter().filter(|b| !b.todos.is_empty()) {
            println!();
            println!("{}", style(bucket.date.format("%a %d %b")).bold());
            for todo in &bucket.todos {
                let mark = if todo.completed { "[x]" } else { "[ ]" };
                println!("  {} {} {}", mark, todo.todo_type.info().icon, todo.text);
            }
        }
    }
}

fn todo_filter(args: TodoFilterArgs) -> Result<TodoFilter> {
    Ok(TodoFilter {
        query: args.search.unwrap_or_default(),
        status: args.status,
        todo_type: args.todo_type.map(|t| t.parse::<TodoType>()).transpose()?,
        category: args.category,
        day_number: None,
    })
}

fn policy_for(args: &ImportArgs) -> ImportPolicy {
    if args.strict {
        ImportPolicy::Strict
    } else {
        ImportPolicy::Lenient
    }
}

/// Drops the comment lines written by the editor template
fn strip_editor_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| {
            let line = line.trim();
            !(line.starts_with(EDITOR_COMMENT_OPEN) && line.ends_with(EDITOR_COMMENT_CLOSE))
        })
        .collect::<Vec<&str>>()
        .join("\n")
        .trim()
        .to_string()
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} This action cannot be undone! [y/N]: ", prompt);
    stdout().flush()?;

    let mut input = String::new();
    stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryBlobStore, DEFAULT_STORAGE_KEY};

    fn app() -> App {
        let state = AppState::open(Box::new(MemoryBlobStore::new()), DEFAULT_STORAGE_KEY);
        App::new(state, Config::default(), false)
    }

    fn add_todo(app: &mut App, text: &str, due: Option<&str>) {
        app.run(Commands::Todos {
            action: TodoCommand::Add {
                text: text.into(),
                priority: "high".into(),
                todo_type: "work".into(),
                category: None,
                due: due.map(str::to_string),
                tags: Some("a, b".into()),
            },
        })
        .unwrap();
    }

    #[test]
    fn editor_comments_are_stripped() {
        let raw = "<!-- title -->\n<!-- help -->\nfirst line\n\nsecond\n";
        assert_eq!(strip_editor_comments(raw), "first line\n\nsecond");
    }

    #[test]
    fn todo_add_uses_configured_default_category() {
        let mut app = app();
        add_todo(&mut app, "Write report", Some("2025-12-01"));

        let todo = &app.state().todos().todos()[0];
        assert_eq!(todo.category, "Personal");
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.todo_type, TodoType::Work);
        assert_eq!(todo.tags, ["a", "b"]);
        assert_eq!(todo.due_date, NaiveDate::from_ymd_opt(2025, 12, 1));
    }

    #[test]
    fn bad_arguments_are_rejected_before_mutation() {
        let mut app = app();
        let result = app.run(Commands::Todos {
            action: TodoCommand::Add {
                text: "x".into(),
                priority: "urgent".into(),
                todo_type: "work".into(),
                category: None,
                due: None,
                tags: None,
            },
        });
        assert!(matches!(result, Err(LnError::InvalidInput { .. })));
        assert!(app.state().todos().is_empty());
    }

    #[test]
    fn edit_can_clear_due_date() {
        let mut app = app();
        add_todo(&mut app, "Pay rent", Some("2025-12-01"));
        let id = app.state().todos().todos()[0].id.clone();

        app.run(Commands::Todos {
            action: TodoCommand::Edit {
                id: id.clone(),
                text: None,
                priority: None,
                todo_type: None,
                category: None,
                due: None,
                clear_due: true,
                tags: None,
                notes: Some("by transfer".into()),
            },
        })
        .unwrap();

        let todo = app.state().todos().get(&id).unwrap();
        assert_eq!(todo.due_date, None);
        assert_eq!(todo.notes.as_deref(), Some("by transfer"));
    }

    #[test]
    fn move_out_of_range_is_an_error() {
        let mut app = app();
        add_todo(&mut app, "only", None);
        let result = app.run(Commands::Todos {
            action: TodoCommand::Move { from: 3, to: 0 },
        });
        assert!(matches!(result, Err(LnError::InvalidInput { .. })));
    }

    fn calendar(prev: u32, next: u32, filter: TodoFilterArgs) -> Commands {
        Commands::Todos {
            action: TodoCommand::Calendar {
                month: Some("2025-01".into()),
                prev,
                next,
                filter,
            },
        }
    }

    #[test]
    fn calendar_rejects_offsets_past_the_date_range() {
        let mut app = app();
        for (prev, next) in [(2_147_483_648, 0), (3_000_000_000, 0), (0, u32::MAX)] {
            let result = app.run(calendar(prev, next, TodoFilterArgs::default()));
            assert!(matches!(result, Err(LnError::InvalidInput { .. })));
        }
        assert!(app.run(calendar(13, 1, TodoFilterArgs::default())).is_ok());
    }

    #[test]
    fn calendar_accepts_list_filters() {
        let mut app = app();
        add_todo(&mut app, "Pay rent", Some("2025-01-05"));
        let filter = TodoFilterArgs {
            search: Some("rent".into()),
            todo_type: Some("work".into()),
            ..Default::default()
        };
        assert!(app.run(calendar(0, 0, filter)).is_ok());

        let bad = TodoFilterArgs {
            todo_type: Some("chores".into()),
            ..Default::default()
        };
        assert!(matches!(
            app.run(calendar(0, 0, bad)),
            Err(LnError::InvalidInput { .. })
        ));
    }

    #[test]
    fn seed_command_loads_day_one_once() {
        let mut app = app();
        let seed = || Commands::Todos {
            action: TodoCommand::Seed,
        };
        app.run(seed()).unwrap();
        let seeded = app.state().todos().len();
        assert_eq!(seeded, 10);
        app.run(seed()).unwrap();
        assert_eq!(app.state().todos().len(), seeded);

        add_todo(&mut app, "unrelated", None);
        assert!(app
            .run(Commands::Todos {
                action: TodoCommand::List {
                    filter: TodoFilterArgs::default(),
                    day: Some(1),
                    json: true,
                },
            })
            .is_ok());
    }

    #[test]
    fn note_pin_and_edit_flow() {
        let mut app = app();
        app.run(Commands::Notes {
            action: NoteCommand::Add {
                content: Some("  remember the milk  ".into()),
                title: None,
                color: "yellow".into(),
                tags: None,
                edit: false,
            },
        })
        .unwrap();
        let id = app.state().notes().notes()[0].id.clone();
        assert_eq!(app.state().notes().notes()[0].content, "remember the milk");

        app.run(Commands::Notes {
            action: NoteCommand::Pin { id: id.clone() },
        })
        .unwrap();
        app.run(Commands::Notes {
            action: NoteCommand::Edit {
                id: id.clone(),
                content: Some("   ".into()),
                title: Some("Groceries".into()),
                color: None,
                tags: None,
                edit: false,
            },
        })
        .unwrap();

        let note = app.state().notes().get(&id).unwrap();
        assert!(note.is_pinned);
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "remember the milk");
        assert_eq!(note.color, NoteColor::Yellow);
    }
}
