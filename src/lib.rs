//! Personal notes and todos library
//!
//! This library holds the note and todo collections, their write-through
//! persistence to a key-value blob store, the derived views (search, ordering,
//! stats, calendar) and the JSON bulk importer.

mod app_state;
mod calendar;
mod cli;
mod config;
mod errors;
mod helper;
mod import;
mod note;
mod notes_store;
mod seed;
mod storage;
mod todo;
mod todos_store;
mod types;
mod views;

// Re-export key components
pub use app_state::*;
pub use calendar::*;
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use import::*;
pub use note::*;
pub use notes_store::*;
pub use seed::*;
pub use storage::*;
pub use todo::*;
pub use todos_store::*;
pub use types::*;
pub use views::*;
