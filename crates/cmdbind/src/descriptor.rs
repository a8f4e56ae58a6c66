//! Declarative command metadata.
//!
//! Descriptors are plain values built once by application code and consumed
//! when registered. Patterns and flag strings are validated at registration,
//! so a malformed declaration fails before any argv is parsed.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;

static COMMAND_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_:.-]*$").expect("Invalid command name regex")
});

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:<([A-Za-z][A-Za-z0-9_-]*)(\.\.\.)?>|\[([A-Za-z][A-Za-z0-9_-]*)(\.\.\.)?\])$")
        .expect("Invalid placeholder regex")
});

static SHORT_FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-([A-Za-z0-9])$").expect("Invalid short flag regex"));

static LONG_FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--([A-Za-z][A-Za-z0-9-]*)$").expect("Invalid long flag regex")
});

/// Whether `name` can name a command or group on its own, with no argument
/// placeholders attached.
pub fn is_bare_name(name: &str) -> bool {
    COMMAND_NAME_RE.is_match(name)
}

/// A leaf command: `"name <required> [optional] <rest...>"` plus metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    command: String,
    description: Option<String>,
    alias: Option<String>,
    options: Vec<OptionSpec>,
}

impl CommandDescriptor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: None,
            alias: None,
            options: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn pattern(&self) -> &str {
        &self.command
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Splits the pattern into the command name and its positional arguments.
    pub fn parse_pattern(&self) -> Result<(String, Vec<ArgumentSpec>), ConfigError> {
        parse_pattern(&self.command)
    }
}

/// A namespace node whose children are the invokable commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDescriptor {
    name: String,
    description: Option<String>,
    alias: Option<String>,
}

impl GroupDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            alias: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

/// One positional placeholder from a command pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub id: String,
    pub required: bool,
    pub variadic: bool,
}

impl ArgumentSpec {
    pub fn placeholder(&self) -> String {
        let dots = if self.variadic { "..." } else { "" };
        if self.required {
            format!("<{}{}>", self.id, dots)
        } else {
            format!("[{}{}]", self.id, dots)
        }
    }
}

pub fn parse_pattern(pattern: &str) -> Result<(String, Vec<ArgumentSpec>), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let mut words = pattern.split_whitespace();
    let name = words.next().ok_or_else(|| invalid("empty pattern"))?;
    if !is_bare_name(name) {
        return Err(invalid("command name must come first"));
    }

    let mut arguments: Vec<ArgumentSpec> = Vec::new();
    for word in words {
        let caps = PLACEHOLDER_RE.captures(word).ok_or_else(|| {
            invalid(&format!(
                "'{}' is not a <required> or [optional] placeholder",
                word
            ))
        })?;

        let (id, required, variadic) = match (caps.get(1), caps.get(3)) {
            (Some(id), _) => (id.as_str(), true, caps.get(2).is_some()),
            (None, Some(id)) => (id.as_str(), false, caps.get(4).is_some()),
            (None, None) => return Err(invalid("empty placeholder")),
        };

        if let Some(last) = arguments.last() {
            if last.variadic {
                return Err(invalid("variadic argument must be last"));
            }
            if required && !last.required {
                return Err(invalid("required argument cannot follow an optional one"));
            }
        }
        if id == "help" {
            return Err(invalid("'help' is reserved"));
        }
        if arguments.iter().any(|a| a.id == id) {
            return Err(invalid(&format!("duplicate argument '{}'", id)));
        }

        arguments.push(ArgumentSpec {
            id: id.to_string(),
            required,
            variadic,
        });
    }

    Ok((name.to_string(), arguments))
}

/// An option flag spec such as `"-n, --name <value>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    flags: String,
    description: Option<String>,
    default: Option<String>,
    required: bool,
}

impl OptionSpec {
    pub fn new(flags: impl Into<String>) -> Self {
        Self {
            flags: flags.into(),
            description: None,
            default: None,
            required: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn parse(&self) -> Result<ParsedOption, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidOption {
            flags: self.flags.clone(),
            reason: reason.to_string(),
        };

        let mut short = None;
        let mut long = None;
        let mut value = OptionValue::Flag;

        for word in self.flags.split([',', ' ']).filter(|w| !w.is_empty()) {
            if let Some(caps) = LONG_FLAG_RE.captures(word) {
                if long.replace(caps[1].to_string()).is_some() {
                    return Err(invalid("more than one long flag"));
                }
            } else if let Some(caps) = SHORT_FLAG_RE.captures(word) {
                let c = caps[1].chars().next().ok_or_else(|| invalid("empty short flag"))?;
                if short.replace(c).is_some() {
                    return Err(invalid("more than one short flag"));
                }
            } else if let Some(caps) = PLACEHOLDER_RE.captures(word) {
                if value != OptionValue::Flag {
                    return Err(invalid("more than one value placeholder"));
                }
                value = match (caps.get(1), caps.get(3)) {
                    (Some(name), _) => OptionValue::Required(name.as_str().to_string()),
                    (None, Some(name)) => OptionValue::Optional(name.as_str().to_string()),
                    (None, None) => return Err(invalid("empty placeholder")),
                };
            } else {
                return Err(invalid(&format!("unrecognized token '{}'", word)));
            }
        }

        let id = match (&long, short) {
            (Some(long), _) => long.clone(),
            (None, Some(short)) => short.to_string(),
            (None, None) => return Err(invalid("no -s or --long flag")),
        };

        if value == OptionValue::Flag && (self.default.is_some() || self.required) {
            return Err(invalid("boolean flags take no default and cannot be required"));
        }
        if self.required && self.default.is_some() {
            return Err(invalid("a required option cannot have a default"));
        }

        Ok(ParsedOption {
            id,
            short,
            long,
            value,
            description: self.description.clone(),
            default: self.default.clone(),
            required: self.required,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag,
    Required(String),
    Optional(String),
}

/// A validated option, ready to be rendered as a parser argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOption {
    pub id: String,
    pub short: Option<char>,
    pub long: Option<String>,
    pub value: OptionValue,
    pub description: Option<String>,
    pub default: Option<String>,
    pub required: bool,
}
