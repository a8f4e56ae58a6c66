//! Controllers: types that declare a group of commands and own the state
//! their handlers need. Instances come from a [`Container`]; the `Cli` only
//! resolves them, it never constructs or drops them.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::rc::Rc;

use crate::action::Action;
use crate::cli::Cli;
use crate::descriptor::{CommandDescriptor, GroupDescriptor};
use crate::error::{CliError, ConfigError};
use crate::tree::NodeId;

/// A command descriptor paired with the action that serves it.
pub struct Binding {
    pub descriptor: CommandDescriptor,
    pub action: Action,
}

impl Binding {
    pub fn new(descriptor: CommandDescriptor, action: Action) -> Self {
        Self { descriptor, action }
    }
}

pub trait Controller: 'static {
    /// The group the bindings live under; `None` mounts them directly.
    fn group(&self) -> Option<GroupDescriptor> {
        None
    }

    /// Actions typically capture a clone of `self`.
    fn bindings(self: Rc<Self>) -> Vec<Binding>;
}

/// Typed instance map, one instance per type.
#[derive(Default)]
pub struct Container {
    instances: HashMap<TypeId, Rc<dyn Any>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provide<T: 'static>(&mut self, instance: T) -> &mut Self {
        self.provide_shared(Rc::new(instance))
    }

    pub fn provide_shared<T: 'static>(&mut self, instance: Rc<T>) -> &mut Self {
        self.instances.insert(TypeId::of::<T>(), instance);
        self
    }

    pub fn resolve<T: 'static>(&self) -> Option<Rc<T>> {
        let instance = self.instances.get(&TypeId::of::<T>())?;
        Rc::clone(instance).downcast::<T>().ok()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.instances.contains_key(&TypeId::of::<T>())
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("instances", &self.instances.len())
            .finish()
    }
}

impl Cli {
    /// Resolves `C` from `container` and registers its group and bindings
    /// under `parent`. Returns the node the commands were attached to.
    pub fn mount<C: Controller>(
        &mut self,
        container: &Container,
        parent: NodeId,
    ) -> Result<NodeId, CliError> {
        let controller = container
            .resolve::<C>()
            .ok_or(ConfigError::MissingProvider {
                type_name: type_name::<C>(),
            })?;

        let target = match controller.group() {
            Some(group) => self.register_group(group, parent)?,
            None => parent,
        };
        for binding in controller.bindings() {
            self.register_command(binding.descriptor, binding.action, target)?;
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Invocation;
    use std::cell::Cell;

    struct Counter {
        hits: Cell<u32>,
    }

    impl Controller for Counter {
        fn group(&self) -> Option<GroupDescriptor> {
            Some(GroupDescriptor::new("counter").with_alias("c"))
        }

        fn bindings(self: Rc<Self>) -> Vec<Binding> {
            let this = Rc::clone(&self);
            vec![Binding::new(
                CommandDescriptor::new("hit"),
                Action::sync(move |_: &Invocation| {
                    this.hits.set(this.hits.get() + 1);
                    Ok(this.hits.get())
                }),
            )]
        }
    }

    #[test]
    fn test_resolve_by_type() {
        let mut container = Container::new();
        container.provide(Counter { hits: Cell::new(0) });
        assert!(container.contains::<Counter>());
        assert!(container.resolve::<String>().is_none());
        assert_eq!(container.resolve::<Counter>().unwrap().hits.get(), 0);
    }

    #[test]
    fn test_mount_registers_group_and_bindings() {
        let mut container = Container::new();
        container.provide(Counter { hits: Cell::new(0) });
        let mut cli = Cli::new("prog");
        let root = cli.root();

        let group = cli.mount::<Counter>(&container, root).unwrap();
        let view = cli.node(Some("c")).unwrap();
        assert_eq!(view.id(), group);
        assert!(view.child("hit").unwrap().has_action());
    }

    #[tokio::test]
    async fn test_mounted_action_shares_resolved_instance() {
        let mut container = Container::new();
        container.provide(Counter { hits: Cell::new(0) });
        let mut cli = Cli::new("prog");
        let root = cli.root();
        cli.mount::<Counter>(&container, root).unwrap();

        cli.run(["prog", "counter", "hit"]).await.unwrap();
        let outcome = cli.run(["prog", "c", "hit"]).await.unwrap();
        assert_eq!(outcome.into_response().unwrap().data, 2);
        assert_eq!(container.resolve::<Counter>().unwrap().hits.get(), 2);
    }

    #[test]
    fn test_mount_without_provider_fails() {
        let container = Container::new();
        let mut cli = Cli::new("prog");
        let root = cli.root();
        let err = cli.mount::<Counter>(&container, root).unwrap_err();
        assert!(matches!(
            err,
            CliError::Configuration(ConfigError::MissingProvider { .. })
        ));
    }
}
