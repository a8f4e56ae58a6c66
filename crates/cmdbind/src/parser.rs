//! Bridge between the command tree and clap.
//!
//! The tree is rendered into a fresh `clap::Command` whenever one is needed;
//! clap does the tokenizing, option matching and help layout, and the parsed
//! `ArgMatches` are mapped back onto tree nodes by name.

use clap::error::{ContextKind, ContextValue};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;

use crate::action::{CommandRef, Invocation};
use crate::descriptor::{ArgumentSpec, OptionValue, ParsedOption};
use crate::tree::{CommandTree, NodeId};

pub(crate) fn build_command(tree: &CommandTree, id: NodeId) -> Command {
    let node = &tree[id];
    let mut cmd = Command::new(node.name.clone())
        .color(node.settings.color)
        .next_line_help(node.settings.next_line_help);

    if let Some(description) = &node.description {
        cmd = cmd.about(description.clone());
    }
    for alias in &node.aliases {
        cmd = cmd.visible_alias(alias.clone());
    }
    for (index, argument) in node.arguments.iter().enumerate() {
        cmd = cmd.arg(positional(argument, index));
    }
    for option in &node.options {
        cmd = cmd.arg(option_arg(option));
    }

    // `help <command>` is resolved by the runner before clap sees argv.
    if !node.children.is_empty() {
        cmd = cmd.disable_help_subcommand(true);
    }
    if node.action.is_none() {
        cmd = cmd.arg_required_else_help(true);
    }
    for child in &node.children {
        cmd = cmd.subcommand(build_command(tree, *child));
    }
    cmd
}

fn positional(argument: &ArgumentSpec, index: usize) -> Arg {
    let arg = Arg::new(argument.id.clone())
        .value_name(argument.id.clone())
        .index(index + 1)
        .required(argument.required)
        .allow_negative_numbers(true);

    if argument.variadic {
        let min = usize::from(argument.required);
        arg.num_args(min..).action(ArgAction::Append)
    } else {
        arg.action(ArgAction::Set)
    }
}

fn option_arg(option: &ParsedOption) -> Arg {
    let mut arg = Arg::new(option.id.clone());
    if let Some(short) = option.short {
        arg = arg.short(short);
    }
    if let Some(long) = &option.long {
        arg = arg.long(long.clone());
    }
    if let Some(help) = &option.description {
        arg = arg.help(help.clone());
    }

    arg = match &option.value {
        OptionValue::Flag => arg.action(ArgAction::SetTrue),
        OptionValue::Required(name) => arg
            .action(ArgAction::Set)
            .value_name(name.clone())
            .num_args(1),
        OptionValue::Optional(name) => arg
            .action(ArgAction::Set)
            .value_name(name.clone())
            .num_args(0..=1)
            .default_missing_value("true"),
    };

    if let Some(default) = &option.default {
        arg = arg.default_value(default.clone());
    }
    arg.required(option.required)
}

/// Follows the matched subcommand chain down to the deepest tree node.
pub(crate) fn resolve_matches<'m>(
    tree: &CommandTree,
    matches: &'m ArgMatches,
) -> (NodeId, &'m ArgMatches) {
    let mut current = tree.root();
    let mut current_matches = matches;
    while let Some((name, sub_matches)) = current_matches.subcommand() {
        match tree.find_child(current, name) {
            Some(child) => {
                current = child;
                current_matches = sub_matches;
            }
            None => break,
        }
    }
    (current, current_matches)
}

pub(crate) fn invocation(tree: &CommandTree, id: NodeId, matches: &ArgMatches) -> Invocation {
    let node = &tree[id];
    let mut invocation = Invocation::new(CommandRef {
        id,
        path: tree.path_string(id),
    });

    for argument in &node.arguments {
        let value = if argument.variadic {
            let values = matches
                .get_many::<String>(&argument.id)
                .map(|values| values.cloned().map(Value::String).collect())
                .unwrap_or_default();
            Value::Array(values)
        } else {
            string_or_null(matches.get_one::<String>(&argument.id))
        };
        invocation = invocation.with_arg(argument.id.clone(), value);
    }

    for option in &node.options {
        let value = match option.value {
            OptionValue::Flag => Value::Bool(matches.get_flag(&option.id)),
            OptionValue::Required(_) | OptionValue::Optional(_) => {
                string_or_null(matches.get_one::<String>(&option.id))
            }
        };
        invocation = invocation.with_option(option.id.clone(), value);
    }

    invocation
}

fn string_or_null(value: Option<&String>) -> Value {
    value.cloned().map(Value::String).unwrap_or(Value::Null)
}

/// Renders help for the subcommand reached by following `names` from `cmd`.
/// `cmd` must already be built so usage lines carry the full command path.
pub(crate) fn render_help_at(cmd: &mut Command, names: &[&str]) -> Option<String> {
    let mut current = cmd;
    for name in names {
        current = current.find_subcommand_mut(name)?;
    }
    Some(current.render_help().to_string())
}

pub(crate) fn context_strings(err: &clap::Error, kind: ContextKind) -> Vec<String> {
    match err.get(kind) {
        Some(ContextValue::String(value)) => vec![value.clone()],
        Some(ContextValue::Strings(values)) => values.clone(),
        _ => Vec::new(),
    }
}

/// The first line of clap's rendered error, without the `error:` prefix.
pub(crate) fn summary(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error:").trim().to_string()
}
