//! Top-level dispatch: argv in, one response (or help, or an error) out.

use std::ffi::OsString;

use clap::error::{ContextKind, ErrorKind};
use tracing::{debug, error};

use crate::action::ActionResponse;
use crate::cli::Cli;
use crate::error::{CliError, ConfigError};
use crate::parser;
use crate::presenter::format_error;
use crate::tree::{NodeId, NodeKind};

#[derive(Debug)]
pub enum RunOutcome {
    Dispatched(ActionResponse),
    HelpDisplayed,
}

impl RunOutcome {
    pub fn into_response(self) -> Option<ActionResponse> {
        match self {
            RunOutcome::Dispatched(response) => Some(response),
            RunOutcome::HelpDisplayed => None,
        }
    }

    pub fn is_help(&self) -> bool {
        matches!(self, RunOutcome::HelpDisplayed)
    }
}

/// Where the token walk over leading command names ended up.
enum Walk {
    Parse,
    Help(NodeId),
}

impl Cli {
    /// Parses `argv` (program name first) and runs the matched handler.
    ///
    /// Help requests resolve to [`RunOutcome::HelpDisplayed`]. Failures are
    /// logged once and returned; a missing required argument is returned
    /// without logging.
    pub async fn run<I, T>(&self, argv: I) -> Result<RunOutcome, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let result = self.dispatch(argv).await;
        if let Err(e) = &result {
            if e.should_log() {
                error!(category = %e.category(), "{}", format_error(e));
            }
        }
        result
    }

    async fn dispatch<I, T>(&self, argv: I) -> Result<RunOutcome, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let root = self.root();
        if self.tree[root].children.is_empty() {
            return Err(ConfigError::EmptyCli.into());
        }

        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        debug!(?argv, "Dispatching");

        if let Walk::Help(target) = self.walk(&argv)? {
            self.present_help(target);
            return Ok(RunOutcome::HelpDisplayed);
        }

        let matches = match self.command().try_get_matches_from(&argv) {
            Ok(matches) => matches,
            Err(err) => return self.parse_failure(err),
        };

        let (id, leaf_matches) = parser::resolve_matches(&self.tree, &matches);
        let Some(action) = self.tree[id].action.as_ref() else {
            self.present_help(id);
            return Ok(RunOutcome::HelpDisplayed);
        };

        let invocation = parser::invocation(&self.tree, id, leaf_matches);
        debug!(command = %invocation.command().path, "Invoking handler");
        let response = action.invoke(invocation).await.map_err(CliError::Handler)?;
        Ok(RunOutcome::Dispatched(response))
    }

    /// Descends through leading tokens that name groups or commands, stopping
    /// at the first flag or at a leaf command. An unrecognized name fails
    /// here, scoped to the node it was looked up in, so clap never reports it
    /// against the root. Groups always expect a child name, even while empty.
    ///
    /// Tokens are compared lossily: names are ASCII, so a token that is not
    /// UTF-8 never matches and is reported as unknown or left to clap.
    fn walk(&self, argv: &[OsString]) -> Result<Walk, CliError> {
        let mut current = self.root();
        for token in argv.iter().skip(1) {
            let token = token.to_string_lossy();
            let node = &self.tree[current];
            let leaf = node.kind == NodeKind::Command && node.children.is_empty();
            if token.starts_with('-') || leaf {
                break;
            }
            match self.tree.find_child(current, &token) {
                Some(child) => current = child,
                None if token == "help" => {
                    let last = argv.last().map(|last| last.to_string_lossy());
                    let target = last
                        .and_then(|last| self.tree.find_child(current, &last))
                        .unwrap_or(current);
                    return Ok(Walk::Help(target));
                }
                None => {
                    return Err(CliError::UnknownCommand {
                        scope: self.tree.path_string(current),
                        token: token.into_owned(),
                    });
                }
            }
        }
        Ok(Walk::Parse)
    }

    fn parse_failure(&self, err: clap::Error) -> Result<RunOutcome, CliError> {
        match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion => {
                self.presenter.present_help(&err.render().to_string());
                Ok(RunOutcome::HelpDisplayed)
            }
            ErrorKind::MissingRequiredArgument => Err(CliError::MissingArgument {
                arguments: parser::context_strings(&err, ContextKind::InvalidArg),
                message: parser::summary(&err),
            }),
            ErrorKind::InvalidSubcommand => Err(CliError::UnknownCommand {
                scope: self.program().to_string(),
                token: parser::context_strings(&err, ContextKind::InvalidSubcommand)
                    .into_iter()
                    .next()
                    .unwrap_or_default(),
            }),
            kind => Err(CliError::Usage {
                kind,
                message: parser::summary(&err),
            }),
        }
    }

    fn present_help(&self, id: NodeId) {
        if let Some(help) = self.render_help(id) {
            self.presenter.present_help(&help);
        }
    }
}
