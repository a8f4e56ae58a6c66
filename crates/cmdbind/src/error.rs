//! Registration and dispatch errors with structured context.
//!
//! Errors carry a category, a sysexits.h-compliant exit code, and an optional
//! suggestion so both humans and scripts can act on them.

use clap::error::ErrorKind;
use serde_json::{Value, json};
use thiserror::Error;

use crate::action::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    Configuration,
    Handler,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "invalid_input",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Handler => "handler",
        }
    }

    /// Converts to UNIX sysexits.h-compliant exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCategory::InvalidInput => 64,  // EX_USAGE
            ErrorCategory::Handler => 70,       // EX_SOFTWARE
            ErrorCategory::Configuration => 78, // EX_CONFIG
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mistakes in how commands were declared or wired. Raised at registration
/// time (or at `run` entry for an empty CLI), never mid-dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no commands registered")]
    EmptyCli,

    #[error("cannot bind '{child}' under '{parent}': parent takes positional arguments")]
    ArgumentedParent { child: String, parent: String },

    #[error("group name '{name}' must be a bare command name")]
    NotBare { name: String },

    #[error("invalid command pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid option flags '{flags}': {reason}")]
    InvalidOption { flags: String, reason: String },

    #[error("'{name}' is already registered under '{scope}'")]
    DuplicateName { scope: String, name: String },

    #[error("unknown parent node {0}")]
    UnknownParent(usize),

    #[error("no instance of {type_name} provided to the container")]
    MissingProvider { type_name: &'static str },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("unknown command '{token}' in '{scope}'")]
    UnknownCommand { scope: String, token: String },

    #[error("missing required argument: {}", .arguments.join(", "))]
    MissingArgument {
        arguments: Vec<String>,
        message: String,
    },

    #[error("{message}")]
    Usage { kind: ErrorKind, message: String },

    #[error("{0}")]
    Handler(#[source] ActionError),
}

impl CliError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CliError::Configuration(_) => ErrorCategory::Configuration,
            CliError::UnknownCommand { .. }
            | CliError::MissingArgument { .. }
            | CliError::Usage { .. } => ErrorCategory::InvalidInput,
            CliError::Handler(_) => ErrorCategory::Handler,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    /// Whether the runner logs this error before re-raising it.
    /// Missing arguments propagate silently so the caller decides how to exit.
    pub fn should_log(&self) -> bool {
        !matches!(self, CliError::MissingArgument { .. })
    }

    /// The error a handler returned, unwrapped for downcasting.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            CliError::Handler(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    pub fn suggestion(&self) -> Option<String> {
        match self {
            CliError::Configuration(ConfigError::EmptyCli) => {
                Some("Register at least one command before calling run.".to_string())
            }
            CliError::Configuration(ConfigError::ArgumentedParent { .. }) => Some(
                "Groups can only be nested under the root, another group, or a command without arguments."
                    .to_string(),
            ),
            CliError::Configuration(_) => None,
            CliError::UnknownCommand { scope, .. } => {
                Some(format!("Run '{} --help' to list available commands.", scope))
            }
            CliError::MissingArgument { .. } | CliError::Usage { .. } => {
                Some("Use --help to see the expected usage.".to_string())
            }
            CliError::Handler(_) => None,
        }
    }

    pub fn context(&self) -> Value {
        match self {
            CliError::UnknownCommand { scope, token } => json!({
                "scope": scope,
                "token": token
            }),
            CliError::MissingArgument { arguments, .. } => json!({
                "arguments": arguments
            }),
            CliError::Usage { kind, .. } => json!({
                "kind": format!("{:?}", kind)
            }),
            CliError::Configuration(e) => json!({
                "reason": e.to_string()
            }),
            CliError::Handler(_) => Value::Null,
        }
    }

    /// Returns structured JSON representation of this error.
    pub fn to_json(&self) -> Value {
        json!({
            "message": self.to_string(),
            "category": self.category().as_str(),
            "exit_code": self.exit_code(),
            "context": self.context(),
            "suggestion": self.suggestion()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct DiskOnFire;

    #[test]
    fn test_exit_codes_follow_category() {
        assert_eq!(CliError::from(ConfigError::EmptyCli).exit_code(), 78);
        let unknown = CliError::UnknownCommand {
            scope: "prog".into(),
            token: "nope".into(),
        };
        assert_eq!(unknown.exit_code(), 64);
        assert_eq!(CliError::Handler(Box::new(DiskOnFire)).exit_code(), 70);
    }

    #[test]
    fn test_missing_argument_is_not_logged() {
        let err = CliError::MissingArgument {
            arguments: vec!["<name>".into()],
            message: "the following required arguments were not provided".into(),
        };
        assert!(!err.should_log());
        assert_eq!(err.to_string(), "missing required argument: <name>");
        assert!(CliError::from(ConfigError::EmptyCli).should_log());
    }

    #[test]
    fn test_handler_error_is_downcastable_source() {
        let err = CliError::Handler(Box::new(DiskOnFire));
        assert_eq!(err.to_string(), "disk on fire");
        assert!(err.handler_error().unwrap().downcast_ref::<DiskOnFire>().is_some());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unknown_command_to_json() {
        let err = CliError::UnknownCommand {
            scope: "prog group2".into(),
            token: "bogus".into(),
        };
        let json = err.to_json();
        assert_eq!(json["category"], "invalid_input");
        assert_eq!(json["exit_code"], 64);
        assert_eq!(json["context"]["scope"], "prog group2");
        assert_eq!(json["context"]["token"], "bogus");
        assert!(json["suggestion"].as_str().unwrap().contains("prog group2 --help"));
    }
}
