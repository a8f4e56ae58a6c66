//! The `Cli` context: owns the command tree, the group registry and the
//! presenter. Built once at startup, populated, then run.

use tracing::debug;

use crate::action::Action;
use crate::binder;
use crate::descriptor::{CommandDescriptor, GroupDescriptor};
use crate::error::CliError;
use crate::parser;
use crate::presenter::{Presenter, TextPresenter};
use crate::registry::CommandRegistry;
use crate::tree::{CommandTree, NodeId, NodeRef, ParseSettings};

pub struct Cli {
    program: String,
    about: Option<String>,
    version: Option<String>,
    pub(crate) tree: CommandTree,
    registry: CommandRegistry,
    pub(crate) presenter: Box<dyn Presenter>,
}

impl Cli {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            tree: CommandTree::new(program.clone(), ParseSettings::default()),
            program,
            about: None,
            version: None,
            registry: CommandRegistry::new(),
            presenter: Box::new(TextPresenter),
        }
    }

    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Root parse settings. Inherited by every node registered afterwards.
    pub fn with_settings(mut self, settings: ParseSettings) -> Self {
        let root = self.tree.root();
        if let Some(node) = self.tree.get_mut(root) {
            node.settings = settings;
        }
        self
    }

    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Binds a group under `parent` and returns its id for further nesting.
    /// A rejected descriptor leaves the tree and registry untouched.
    pub fn register_group(
        &mut self,
        descriptor: GroupDescriptor,
        parent: NodeId,
    ) -> Result<NodeId, CliError> {
        let node = binder::group_node(&self.tree, &descriptor, parent)?;
        let id = self.tree.insert(parent, node);

        self.registry.register(descriptor.name(), id);
        if let Some(alias) = descriptor.alias() {
            self.registry.register(alias, id);
        }

        debug!(group = %self.tree.path_string(id), "Registered group");
        Ok(id)
    }

    pub fn register_command(
        &mut self,
        descriptor: CommandDescriptor,
        action: Action,
        parent: NodeId,
    ) -> Result<NodeId, CliError> {
        let node = binder::command_node(&self.tree, &descriptor, action, parent)?;
        let id = self.tree.insert(parent, node);
        debug!(
            command = %self.tree.path_string(id),
            pattern = descriptor.pattern(),
            "Registered command"
        );
        Ok(id)
    }

    /// The root when `name` is `None`, otherwise the group registered under
    /// that name or alias.
    pub fn node(&self, name: Option<&str>) -> Option<NodeRef<'_>> {
        let id = match name {
            None => self.tree.root(),
            Some(name) => self.registry.lookup(name)?,
        };
        self.tree.node(id)
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.tree.node(id)
    }

    /// Drops a group name or alias from the registry. The node itself stays
    /// in the tree and remains dispatchable.
    pub fn unregister(&mut self, name: &str) -> Option<NodeId> {
        self.registry.unregister(name)
    }

    /// Replaces the tree with an empty root and clears the registry.
    pub fn reset(&mut self) {
        let settings = self.tree[self.tree.root()].settings;
        self.tree = CommandTree::new(self.program.clone(), settings);
        self.registry.clear();
    }

    /// The whole tree rendered as a clap command.
    pub fn command(&self) -> clap::Command {
        let mut cmd = parser::build_command(&self.tree, self.tree.root());
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        if let Some(version) = &self.version {
            cmd = cmd.version(version.clone());
        }
        cmd
    }

    pub fn render_help(&self, id: NodeId) -> Option<String> {
        let path = self.tree.path(id);
        let mut cmd = self.command();
        cmd.build();
        parser::render_help_at(&mut cmd, path.get(1..)?)
    }
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("program", &self.program)
            .field("tree", &self.tree)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
