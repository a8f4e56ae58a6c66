//! Turns descriptors into tree nodes.
//!
//! Everything here validates before it builds, and nothing here touches the
//! tree: a rejected descriptor leaves the `Cli` exactly as it was.

use std::collections::HashSet;

use crate::action::Action;
use crate::descriptor::{CommandDescriptor, GroupDescriptor, ParsedOption, is_bare_name};
use crate::error::ConfigError;
use crate::tree::{CommandTree, Node, NodeId, NodeKind};

/// Parents must exist and must not take positional arguments: a token after
/// such a parent could be either an argument or a child name.
fn checked_parent<'t>(
    tree: &'t CommandTree,
    parent: NodeId,
    child: &str,
) -> Result<&'t Node, ConfigError> {
    let node = tree
        .get(parent)
        .ok_or(ConfigError::UnknownParent(parent.index()))?;
    if !node.arguments.is_empty() {
        return Err(ConfigError::ArgumentedParent {
            child: child.to_string(),
            parent: tree.path_string(parent),
        });
    }
    Ok(node)
}

fn check_siblings(
    tree: &CommandTree,
    parent: &Node,
    parent_id: NodeId,
    names: &[&str],
) -> Result<(), ConfigError> {
    for name in names {
        if parent.children.iter().any(|c| tree[*c].answers_to(name)) {
            return Err(ConfigError::DuplicateName {
                scope: tree.path_string(parent_id),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn check_alias(name: &str, alias: Option<&str>) -> Result<(), ConfigError> {
    match alias {
        Some(alias) if !is_bare_name(alias) => Err(ConfigError::NotBare {
            name: alias.to_string(),
        }),
        Some(alias) if alias == name => Err(ConfigError::DuplicateName {
            scope: name.to_string(),
            name: alias.to_string(),
        }),
        _ => Ok(()),
    }
}

pub(crate) fn group_node(
    tree: &CommandTree,
    descriptor: &GroupDescriptor,
    parent: NodeId,
) -> Result<Node, ConfigError> {
    let name = descriptor.name();
    let parent_node = checked_parent(tree, parent, name)?;
    if !is_bare_name(name) {
        return Err(ConfigError::NotBare {
            name: name.to_string(),
        });
    }
    check_alias(name, descriptor.alias())?;

    let mut names = vec![name];
    names.extend(descriptor.alias());
    check_siblings(tree, parent_node, parent, &names)?;

    let mut node = Node::new(name.to_string(), NodeKind::Group, parent_node.settings);
    node.description = descriptor.description().map(str::to_string);
    node.aliases.extend(descriptor.alias().map(str::to_string));
    Ok(node)
}

pub(crate) fn command_node(
    tree: &CommandTree,
    descriptor: &CommandDescriptor,
    action: Action,
    parent: NodeId,
) -> Result<Node, ConfigError> {
    let (name, arguments) = descriptor.parse_pattern()?;
    let parent_node = checked_parent(tree, parent, &name)?;
    check_alias(&name, descriptor.alias())?;

    let mut names = vec![name.as_str()];
    names.extend(descriptor.alias());
    check_siblings(tree, parent_node, parent, &names)?;

    let options = descriptor
        .options()
        .iter()
        .map(|spec| spec.parse())
        .collect::<Result<Vec<_>, _>>()?;
    let argument_ids: Vec<&str> = arguments.iter().map(|a| a.id.as_str()).collect();
    check_options(&options, &argument_ids)?;

    let mut node = Node::new(name, NodeKind::Command, parent_node.settings);
    node.description = descriptor.description().map(str::to_string);
    node.aliases.extend(descriptor.alias().map(str::to_string));
    node.arguments = arguments;
    node.options = options;
    node.action = Some(action);
    Ok(node)
}

/// Option ids, shorts and longs must be unique within a command, must not
/// shadow a positional argument, and must leave `-h/--help` to the parser.
fn check_options(options: &[ParsedOption], argument_ids: &[&str]) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();
    let mut shorts = HashSet::new();
    for option in options {
        let clash = |reason: &str| ConfigError::InvalidOption {
            flags: option.long.clone().unwrap_or_else(|| option.id.clone()),
            reason: reason.to_string(),
        };
        if option.short == Some('h') || option.long.as_deref() == Some("help") {
            return Err(clash("-h/--help is reserved"));
        }
        if argument_ids.contains(&option.id.as_str()) {
            return Err(clash("shadows a positional argument"));
        }
        if !ids.insert(option.id.as_str()) {
            return Err(clash("declared twice"));
        }
        if let Some(short) = option.short {
            if !shorts.insert(short) {
                return Err(clash("short flag declared twice"));
            }
        }
    }
    Ok(())
}
