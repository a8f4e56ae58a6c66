//! Sample application wired into the `cmdbind` binary.

use std::cell::{OnceCell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use clap_complete::Shell;
use serde_json::json;
use thiserror::Error;

use cmdbind::{
    Action, ActionError, Binding, Cli, CliError, CommandDescriptor, Container, Controller,
    GroupDescriptor, Invocation, OptionSpec, Presenter,
};

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("'{0}' is not an integer")]
    NotAnInteger(String),

    #[error("sum overflows a 64-bit integer")]
    Overflow,

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("unsupported shell '{0}'")]
    UnsupportedShell(String),
}

/// In-memory settings store exposed as the `config` group.
pub struct ConfigController {
    values: RefCell<BTreeMap<String, String>>,
}

impl ConfigController {
    pub fn with_defaults() -> Self {
        let values = [("editor", "vim"), ("pager", "less")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: RefCell::new(values),
        }
    }

    fn get(&self, inv: &Invocation) -> Result<String, ActionError> {
        let key = inv.arg_str("key").unwrap_or_default();
        self.values
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| DemoError::UnknownKey(key.to_string()).into())
    }

    fn set(&self, inv: &Invocation) -> Result<serde_json::Value, ActionError> {
        let key = inv.arg_str("key").unwrap_or_default().to_string();
        let value = inv.arg_str("value").unwrap_or_default().to_string();
        let previous = self.values.borrow_mut().insert(key.clone(), value.clone());
        Ok(json!({ "key": key, "value": value, "previous": previous }))
    }

    fn list(&self) -> BTreeMap<String, String> {
        self.values.borrow().clone()
    }
}

impl Controller for ConfigController {
    fn group(&self) -> Option<GroupDescriptor> {
        Some(
            GroupDescriptor::new("config")
                .with_alias("cfg")
                .with_description("Read and change settings"),
        )
    }

    fn bindings(self: Rc<Self>) -> Vec<Binding> {
        let (get, set, list) = (Rc::clone(&self), Rc::clone(&self), self);
        vec![
            Binding::new(
                CommandDescriptor::new("get <key>").with_description("Print one setting"),
                Action::sync(move |inv: &Invocation| get.get(inv)),
            ),
            Binding::new(
                CommandDescriptor::new("set <key> <value>").with_description("Change one setting"),
                Action::sync(move |inv: &Invocation| set.set(inv)),
            ),
            Binding::new(
                CommandDescriptor::new("list")
                    .with_alias("ls")
                    .with_description("Print every setting"),
                Action::sync(move |_: &Invocation| Ok(list.list())),
            ),
        ]
    }
}

fn greet(inv: &Invocation) -> Result<String, ActionError> {
    let name = inv.arg_str("name").unwrap_or_default();
    let greeting = inv.arg_str("greeting").unwrap_or("Hello");
    let line = format!("{}, {}!", greeting, name);
    Ok(if inv.flag("shout") {
        line.to_uppercase()
    } else {
        line
    })
}

async fn sum(inv: Invocation) -> Result<i64, ActionError> {
    let mut total: i64 = 0;
    for raw in inv.arg_list("numbers") {
        let n: i64 = raw
            .parse()
            .map_err(|_| DemoError::NotAnInteger(raw.to_string()))?;
        total = total.checked_add(n).ok_or(DemoError::Overflow)?;
        tokio::task::yield_now().await;
    }
    Ok(total)
}

fn completions(cmd: &OnceCell<clap::Command>, inv: &Invocation) -> Result<String, ActionError> {
    let raw = inv.arg_str("shell").unwrap_or_default();
    let shell: Shell = raw
        .parse()
        .map_err(|_| DemoError::UnsupportedShell(raw.to_string()))?;
    let mut cmd = cmd.get().cloned().unwrap_or_else(|| clap::Command::new("cmdbind"));
    let bin_name = cmd.get_name().to_string();
    let mut out = Vec::new();
    clap_complete::generate(shell, &mut cmd, bin_name, &mut out);
    Ok(String::from_utf8(out)?)
}

pub fn build_cli(presenter: Box<dyn Presenter>) -> Result<Cli, CliError> {
    let mut cli = Cli::new("cmdbind")
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_about("Sample commands wired through cmdbind")
        .with_presenter(presenter);
    let root = cli.root();

    cli.register_command(
        CommandDescriptor::new("greet <name> [greeting]")
            .with_description("Greet someone")
            .with_option(OptionSpec::new("-s, --shout").with_description("Shout the greeting")),
        Action::sync(greet),
        root,
    )?;

    cli.register_command(
        CommandDescriptor::new("sum <numbers...>").with_description("Add integers"),
        Action::deferred(sum),
        root,
    )?;

    let mut container = Container::new();
    container.provide(ConfigController::with_defaults());
    cli.mount::<ConfigController>(&container, root)?;

    let snapshot: Rc<OnceCell<clap::Command>> = Rc::new(OnceCell::new());
    let handle = Rc::clone(&snapshot);
    cli.register_command(
        CommandDescriptor::new("completions <shell>")
            .with_description("Print a shell completion script"),
        Action::sync(move |inv: &Invocation| completions(&handle, inv)),
        root,
    )?;
    let _ = snapshot.set(cli.command());

    Ok(cli)
}
