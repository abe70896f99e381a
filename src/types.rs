//! Shared result alias and the command-line command tree.
use std::path::PathBuf;

use clap::Subcommand;

use crate::{LnError, StatusFilter};

/// A specialized Result type for lifenotes operations.
pub type Result<T> = std::result::Result<T, LnError>;

/// Available subcommands for the lifenotes application
#[derive(Subcommand)]
pub enum Commands {
    /// Work with notes
    Notes {
        #[clap(subcommand)]
        action: NoteCommand,
    },

    /// Work with todos
    Todos {
        #[clap(subcommand)]
        action: TodoCommand,
    },

    /// Delete all persisted notes and todos
    Purge {
        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Create a new note
    Add {
        /// Content of the note
        content: Option<String>,

        /// Optional title
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// Card color (default, blue, green, yellow, red, purple, pink)
        #[clap(short = 'C', long, default_value = "default")]
        color: String,

        /// Tags to associate with the note (comma-separated)
        #[clap(short, long)]
        tags: Option<String>,

        /// Write the content in an editor
        #[clap(short, long)]
        edit: bool,
    },

    /// List notes, pinned first
    List {
        /// Only notes whose content, title or tags contain this text
        #[clap(short, long)]
        search: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: String,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New color for the note
        #[clap(short = 'C', long)]
        color: Option<String>,

        /// Replacement tags (comma-separated)
        #[clap(short, long)]
        tags: Option<String>,

        /// Edit the current content in an editor
        #[clap(short, long)]
        edit: bool,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: String,
    },

    /// Pin or unpin a note
    Pin {
        /// ID of the note
        id: String,
    },

    /// Import notes from a JSON array
    Import(ImportArgs),

    /// Print all notes as a JSON array
    Export,
}

#[derive(Subcommand)]
pub enum TodoCommand {
    /// Create a new todo
    Add {
        /// What needs doing
        text: String,

        /// low, medium or high
        #[clap(short, long, default_value = "medium")]
        priority: String,

        /// project, work, personal, learning, essential, finance-expense, finance-saving
        #[clap(short = 'k', long = "type", default_value = "project")]
        todo_type: String,

        /// Category label (defaults to the configured default category)
        #[clap(short, long)]
        category: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[clap(short, long)]
        due: Option<String>,

        /// Tags (comma-separated)
        #[clap(short, long)]
        tags: Option<String>,
    },

    /// List todos
    List {
        #[clap(flatten)]
        filter: TodoFilterArgs,

        /// Only todos from this seeded day
        #[clap(long)]
        day: Option<u32>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing todo
    Edit {
        /// ID of the todo to edit
        id: String,

        #[clap(long)]
        text: Option<String>,

        #[clap(short, long)]
        priority: Option<String>,

        #[clap(short = 'k', long = "type")]
        todo_type: Option<String>,

        #[clap(short, long)]
        category: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[clap(short, long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[clap(long)]
        clear_due: bool,

        /// Replacement tags (comma-separated)
        #[clap(short, long)]
        tags: Option<String>,

        /// Free-text annotation
        #[clap(short, long)]
        notes: Option<String>,
    },

    /// Delete a todo by ID
    Delete {
        /// ID of the todo to delete
        id: String,
    },

    /// Mark a todo done, or not done again
    Toggle {
        /// ID of the todo
        id: String,
    },

    /// Import todos from a JSON array
    Import(ImportArgs),

    /// Print all todos as a JSON array
    Export,

    /// Delete every todo
    Clear {
        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Move a todo from one list position to another (0-based)
    Move { from: usize, to: usize },

    /// Load the day-one starter tasks (once)
    Seed,

    /// Show total, completed, active, overdue and due-today counts
    Stats {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Show a month of todos by due and creation date
    Calendar {
        /// Month to show (YYYY-MM); defaults to the current month
        #[clap(short, long)]
        month: Option<String>,

        /// Go back this many months
        #[clap(long, default_value_t = 0)]
        prev: u32,

        /// Go forward this many months
        #[clap(long, default_value_t = 0)]
        next: u32,

        #[clap(flatten)]
        filter: TodoFilterArgs,
    },
}

/// Filters shared by the todo list and calendar
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TodoFilterArgs {
    /// Only todos whose text, category, tags or notes contain this text
    #[clap(short, long)]
    pub search: Option<String>,

    /// Completion filter
    #[clap(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    /// Only todos of this type
    #[clap(short = 'k', long = "type")]
    pub todo_type: Option<String>,

    /// Only todos in this category
    #[clap(short, long)]
    pub category: Option<String>,
}

/// Where an import payload comes from
#[derive(clap::Args)]
pub struct ImportArgs {
    /// File containing the JSON array; reads stdin when omitted
    #[clap(short, long)]
    pub file: Option<PathBuf>,

    /// Reject records with missing ids, missing text or duplicate ids
    #[clap(long)]
    pub strict: bool,
}
