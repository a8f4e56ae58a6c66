//! Declarative command binding on top of clap.
//!
//! Commands and command groups are described with descriptors, registered
//! into a [`Cli`], and dispatched from argv. Parsing and help layout belong
//! to clap; this crate owns the command tree, group lookup, handler
//! normalization and error classification.

#![deny(clippy::all)]

pub mod action;
mod binder;
pub mod cli;
pub mod config;
pub mod controller;
pub mod descriptor;
pub mod error;
mod parser;
pub mod presenter;
pub mod registry;
pub mod runner;
pub mod telemetry;
pub mod tree;

pub use action::{Action, ActionError, ActionResponse, CommandRef, Invocation, Outcome};
pub use cli::Cli;
pub use config::{OutputFormat, Settings};
pub use controller::{Binding, Container, Controller};
pub use descriptor::{CommandDescriptor, GroupDescriptor, OptionSpec};
pub use error::{CliError, ConfigError, ErrorCategory};
pub use presenter::{JsonPresenter, Presenter, TextPresenter, create_presenter};
pub use registry::CommandRegistry;
pub use runner::RunOutcome;
pub use tree::{NodeId, NodeKind, NodeRef, ParseSettings};
