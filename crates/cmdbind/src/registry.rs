use std::collections::HashMap;

use tracing::warn;

use crate::tree::NodeId;

/// Group name and alias lookup. Keys are independent: a group registered
/// with an alias occupies two entries pointing at the same node.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: HashMap<String, NodeId>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `node`, returning the binding it replaced. The last
    /// registration for a key wins.
    pub fn register(&mut self, name: impl Into<String>, node: NodeId) -> Option<NodeId> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), node);
        if let Some(previous) = previous.filter(|p| *p != node) {
            warn!(
                name = %name,
                previous = previous.index(),
                current = node.index(),
                "Group name rebound"
            );
        }
        previous
    }

    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).copied()
    }

    pub fn unregister(&mut self, name: &str) -> Option<NodeId> {
        self.entries.remove(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{CommandTree, Node, NodeKind, ParseSettings};

    fn two_nodes() -> (NodeId, NodeId) {
        let mut tree = CommandTree::new("prog", ParseSettings::default());
        let root = tree.root();
        let a = tree.insert(root, Node::new("a".into(), NodeKind::Group, ParseSettings::default()));
        let b = tree.insert(root, Node::new("b".into(), NodeKind::Group, ParseSettings::default()));
        (a, b)
    }

    #[test]
    fn test_register_and_lookup() {
        let (a, _) = two_nodes();
        let mut registry = CommandRegistry::new();
        assert_eq!(registry.register("group2", a), None);
        assert_eq!(registry.lookup("group2"), Some(a));
        assert_eq!(registry.lookup("group3"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let (a, b) = two_nodes();
        let mut registry = CommandRegistry::new();
        registry.register("dup", a);
        assert_eq!(registry.register("dup", b), Some(a));
        assert_eq!(registry.lookup("dup"), Some(b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_and_clear() {
        let (a, b) = two_nodes();
        let mut registry = CommandRegistry::new();
        registry.register("a", a);
        registry.register("alias-a", a);
        registry.register("b", b);

        assert_eq!(registry.unregister("alias-a"), Some(a));
        assert_eq!(registry.lookup("a"), Some(a));
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }
}
