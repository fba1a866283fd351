pub mod commands;
pub mod core;
pub mod forms;
mod help;
pub mod io;
pub mod output;
mod shell;
pub mod steps;
pub mod ui;

pub use core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
