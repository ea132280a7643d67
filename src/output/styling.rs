use console::{style, StyledObject};

/// Styling helpers for the summary tables and the banner.
///
/// Each helper owns its text so callers can hand over counts, borrowed
/// names or formatted strings alike.
fn styled(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string())
}

pub fn bright(text: impl std::fmt::Display) -> StyledObject<String> {
    styled(text).bright()
}

/// Overdue count within tolerance.
pub fn bright_green(text: impl std::fmt::Display) -> StyledObject<String> {
    styled(text).bright().green()
}

/// Overdue count beyond tolerance.
pub fn bright_red(text: impl std::fmt::Display) -> StyledObject<String> {
    styled(text).bright().red()
}

pub fn bright_yellow(text: impl std::fmt::Display) -> StyledObject<String> {
    styled(text).bright().yellow()
}

pub fn cyan(text: impl std::fmt::Display) -> StyledObject<String> {
    styled(text).cyan()
}

pub fn dim(text: impl std::fmt::Display) -> StyledObject<String> {
    styled(text).dim()
}

pub fn magenta_bold(text: impl std::fmt::Display) -> StyledObject<String> {
    styled(text).magenta().bold()
}
