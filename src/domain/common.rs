/// Identifies entities that expose a stable identifier within their owner.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Closed set of choices offered by a wizard field.
pub trait OptionSet: Sized + Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn labels() -> Vec<String> {
        Self::ALL.iter().map(|option| option.label().to_string()).collect()
    }

    fn position(&self) -> Option<usize> {
        Self::ALL.iter().position(|option| option == self)
    }
}

/// Formats a currency amount, dropping the cents when they are zero.
pub fn format_amount(symbol: &str, value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{symbol}{value:.0}")
    } else {
        format!("{symbol}{value:.2}")
    }
}

/// Trims `value`, mapping blank input to `None`.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;
