//! Terminal color helpers.

use std::io::IsTerminal;
use std::sync::OnceLock;

static NO_COLOR: OnceLock<bool> = OnceLock::new();

/// Decides once per process whether output is colored. Later calls are
/// ignored.
pub fn init(no_color: bool) {
    let disabled = no_color || !std::io::stderr().is_terminal();
    let _ = NO_COLOR.set(disabled);
}

fn is_disabled() -> bool {
    *NO_COLOR.get().unwrap_or(&true)
}

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREY: &str = "\x1b[90m";

/// Wraps `text` in `code` unless color is off.
fn paint(text: &str, code: &str) -> String {
    if is_disabled() {
        text.to_string()
    } else {
        format!("{code}{text}{RESET}")
    }
}

/// Styles used by the presenters.
pub struct Colors;

impl Colors {
    pub fn error(text: &str) -> String {
        paint(text, RED)
    }

    pub fn dim(text: &str) -> String {
        paint(text, GREY)
    }
}
