use serde_json::{Value, json};

use cmdbind_common::Colors;

use crate::action::ActionResponse;
use crate::config::OutputFormat;
use crate::error::CliError;

/// Trait for presenting output to the user.
///
/// Handlers return data; presenters decide how it reaches the terminal, so
/// the same command can serve humans (text) and scripts (JSON).
pub trait Presenter {
    /// Present the result of a dispatched command.
    fn present_response(&self, response: &ActionResponse);

    /// Present a failed run.
    fn present_error(&self, error: &CliError);

    /// Present rendered help text. Always shown as-is.
    fn present_help(&self, help: &str);
}

/// Human-readable form of a handler's data. `None` when there is nothing to
/// show.
pub fn format_response(response: &ActionResponse) -> Option<String> {
    match &response.data {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(serde_json::to_string_pretty(other).unwrap_or_default()),
    }
}

/// Plain, uncolored rendering used for logs and text output.
pub fn format_error(error: &CliError) -> String {
    match error.suggestion() {
        Some(suggestion) => format!("Error: {}\nSuggestion: {}", error, suggestion),
        None => format!("Error: {}", error),
    }
}

/// Text presenter for human-readable output.
pub struct TextPresenter;

impl Presenter for TextPresenter {
    fn present_response(&self, response: &ActionResponse) {
        if let Some(text) = format_response(response) {
            println!("{}", text);
        }
    }

    fn present_error(&self, error: &CliError) {
        eprintln!("{} {}", Colors::error("Error:"), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{} {}", Colors::dim("Suggestion:"), suggestion);
        }
    }

    fn present_help(&self, help: &str) {
        print!("{}", help);
        if !help.ends_with('\n') {
            println!();
        }
    }
}

/// JSON presenter for machine-readable output.
pub struct JsonPresenter;

impl JsonPresenter {
    pub fn response_json(response: &ActionResponse) -> Value {
        json!({
            "command": response.command.path,
            "data": response.data
        })
    }
}

impl Presenter for JsonPresenter {
    fn present_response(&self, response: &ActionResponse) {
        println!(
            "{}",
            serde_json::to_string_pretty(&Self::response_json(response)).unwrap_or_default()
        );
    }

    fn present_error(&self, error: &CliError) {
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&error.to_json()).unwrap_or_default()
        );
    }

    fn present_help(&self, help: &str) {
        print!("{}", help);
    }
}

pub fn create_presenter(format: OutputFormat) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Text => Box::new(TextPresenter),
        OutputFormat::Json => Box::new(JsonPresenter),
    }
}
