//! Handler wrapping.
//!
//! A handler produces an [`Outcome`]: either a value it already has or a
//! future that will produce one. [`Action::invoke`] awaits both the same way
//! and pairs the settled value with the command that ran, so callers never
//! need to know which kind of handler they dispatched to.

use std::future::Future;

use cmdbind_common::ValueExt;
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::tree::NodeId;

/// Whatever a handler fails with. Passed through to the caller untouched.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type ActionResult = Result<Value, ActionError>;

pub enum Outcome {
    Immediate(ActionResult),
    Deferred(LocalBoxFuture<'static, ActionResult>),
}

impl Outcome {
    pub async fn settle(self) -> ActionResult {
        match self {
            Outcome::Immediate(result) => result,
            Outcome::Deferred(future) => future.await,
        }
    }
}

impl From<ActionResult> for Outcome {
    fn from(result: ActionResult) -> Self {
        Outcome::Immediate(result)
    }
}

/// The node that handled an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRef {
    pub id: NodeId,
    pub path: String,
}

/// Normalized result of a dispatched command.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub data: Value,
    pub command: CommandRef,
}

/// Parsed input handed to a handler: positional values in declaration order,
/// option values keyed by option id, and the command being run.
#[derive(Debug, Clone)]
pub struct Invocation {
    arguments: Vec<(String, Value)>,
    options: Value,
    command: CommandRef,
}

impl Invocation {
    pub fn new(command: CommandRef) -> Self {
        Self {
            arguments: Vec::new(),
            options: Value::Object(Map::new()),
            command,
        }
    }

    pub fn with_arg(mut self, id: impl Into<String>, value: Value) -> Self {
        self.arguments.push((id.into(), value));
        self
    }

    pub fn with_option(mut self, id: impl Into<String>, value: Value) -> Self {
        if let Value::Object(map) = &mut self.options {
            map.insert(id.into(), value);
        }
        self
    }

    /// Positional values in declaration order.
    pub fn args(&self) -> impl Iterator<Item = &Value> {
        self.arguments.iter().map(|(_, value)| value)
    }

    pub fn arg(&self, id: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, value)| value)
    }

    pub fn arg_str(&self, id: &str) -> Option<&str> {
        self.arg(id).and_then(Value::as_str)
    }

    /// Values of a variadic argument; empty when it was not supplied.
    pub fn arg_list(&self, id: &str) -> Vec<&str> {
        match self.arg(id) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn options(&self) -> &Value {
        &self.options
    }

    pub fn option_str(&self, id: &str) -> Option<&str> {
        self.options.opt_str(id)
    }

    pub fn flag(&self, id: &str) -> bool {
        self.options.bool_or(id, false)
    }

    pub fn command(&self) -> &CommandRef {
        &self.command
    }
}

type HandlerFn = dyn Fn(Invocation) -> Outcome;

/// A bound command handler.
pub struct Action(Box<HandlerFn>);

impl Action {
    pub fn new(handler: impl Fn(Invocation) -> Outcome + 'static) -> Self {
        Self(Box::new(handler))
    }

    /// Handler that answers right away.
    pub fn sync<F, T>(handler: F) -> Self
    where
        F: Fn(&Invocation) -> Result<T, ActionError> + 'static,
        T: Serialize + 'static,
    {
        Self::new(move |invocation| Outcome::Immediate(to_value(handler(&invocation))))
    }

    /// Handler that answers through a future.
    pub fn deferred<F, Fut, T>(handler: F) -> Self
    where
        F: Fn(Invocation) -> Fut + 'static,
        Fut: Future<Output = Result<T, ActionError>> + 'static,
        T: Serialize + 'static,
    {
        Self::new(move |invocation| {
            let future = handler(invocation);
            Outcome::Deferred(async move { to_value(future.await) }.boxed_local())
        })
    }

    /// Runs the handler and settles its outcome into a response. Handler
    /// errors come back exactly as the handler returned them.
    pub async fn invoke(&self, invocation: Invocation) -> Result<ActionResponse, ActionError> {
        let command = invocation.command().clone();
        let data = (self.0)(invocation).settle().await?;
        Ok(ActionResponse { data, command })
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Action")
    }
}

fn to_value<T: Serialize>(result: Result<T, ActionError>) -> ActionResult {
    let value = result?;
    Ok(serde_json::to_value(value)?)
}
