//! Command-line front end: argument parsing and command dispatch.
mod app;
mod args;

pub use app::App;
pub use args::Cli;
