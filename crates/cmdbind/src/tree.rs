//! The command tree: every registered group and command is a node in an arena
//! owned by the `Cli`. Callers and the registry hold `NodeId` handles.

use std::ops::Index;

use clap::ColorChoice;
use serde::Serialize;

use crate::action::Action;
use crate::descriptor::{ArgumentSpec, ParsedOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Group,
    Command,
}

/// Parser behavior a child inherits from its parent at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSettings {
    pub color: ColorChoice,
    pub next_line_help: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
            next_line_help: false,
        }
    }
}

#[derive(Debug)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) kind: NodeKind,
    pub(crate) arguments: Vec<ArgumentSpec>,
    pub(crate) options: Vec<ParsedOption>,
    pub(crate) action: Option<Action>,
    pub(crate) settings: ParseSettings,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(name: String, kind: NodeKind, settings: ParseSettings) -> Self {
        Self {
            name,
            aliases: Vec::new(),
            description: None,
            kind,
            arguments: Vec::new(),
            options: Vec::new(),
            action: None,
            settings,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn answers_to(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }
}

#[derive(Debug)]
pub struct CommandTree {
    nodes: Vec<Node>,
}

impl CommandTree {
    pub fn new(program: impl Into<String>, settings: ParseSettings) -> Self {
        Self {
            nodes: vec![Node::new(program.into(), NodeKind::Root, settings)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub(crate) fn insert(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Finds a direct child of `parent` by name or alias.
    pub fn find_child(&self, parent: NodeId, token: &str) -> Option<NodeId> {
        self.get(parent)?
            .children
            .iter()
            .copied()
            .find(|child| self[*child].answers_to(token))
    }

    /// Names from the root (program name) down to `id`.
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.get(id)) {
            names.push(node.name.as_str());
            current = node.parent;
        }
        names.reverse();
        names
    }

    pub fn path_string(&self, id: NodeId) -> String {
        self.path(id).join(" ")
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.get(id).map(|_| NodeRef { tree: self, id })
    }
}

impl Index<NodeId> for CommandTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// Read-only view of one node, returned by `Cli::node`.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a CommandTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn inner(&self) -> &'a Node {
        &self.tree[self.id]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.inner().name
    }

    pub fn aliases(&self) -> &'a [String] {
        &self.inner().aliases
    }

    pub fn description(&self) -> Option<&'a str> {
        self.inner().description.as_deref()
    }

    pub fn kind(&self) -> NodeKind {
        self.inner().kind
    }

    pub fn arguments(&self) -> &'a [ArgumentSpec] {
        &self.inner().arguments
    }

    pub fn options(&self) -> &'a [ParsedOption] {
        &self.inner().options
    }

    pub fn settings(&self) -> ParseSettings {
        self.inner().settings
    }

    pub fn has_action(&self) -> bool {
        self.inner().action.is_some()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.inner().parent.and_then(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.inner()
            .children
            .iter()
            .map(move |id| NodeRef { tree, id: *id })
    }

    pub fn child(&self, token: &str) -> Option<NodeRef<'a>> {
        self.tree.find_child(self.id, token).and_then(|id| self.tree.node(id))
    }

    /// Full command path, program name first.
    pub fn path(&self) -> String {
        self.tree.path_string(self.id)
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("path", &self.path())
            .finish()
    }
}
