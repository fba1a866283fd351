//! Thin message and confirmation helpers shared by command handlers.

use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::output;

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Yes/no question; `default` is preselected and taken on Enter.
pub fn confirm(
    theme: &ColorfulTheme,
    prompt: impl Into<String>,
    default: bool,
) -> Result<bool, dialoguer::Error> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
}
