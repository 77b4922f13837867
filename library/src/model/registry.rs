//! Node registry with stable insertion order.

use std::collections::HashMap;

use super::ids::NodeId;
use super::node::Node;

/// Owns every node record. Iteration follows insertion order.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    nodes: HashMap<NodeId, Node>,
    order: Vec<NodeId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = node.id();
        if self.nodes.insert(id, node).is_none() {
            self.order.push(id);
        }
        id
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.nodes.values_mut()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{NodeKind, NodeParams};

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut registry = Registry::new();
        let ids: Vec<NodeId> = [NodeKind::Plot, NodeKind::Time, NodeKind::Sin]
            .into_iter()
            .map(|kind| registry.insert(Node::new(kind, &NodeParams::default())))
            .collect();

        assert_eq!(registry.ids(), ids.as_slice());
        let kinds: Vec<NodeKind> = registry.iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::Plot, NodeKind::Time, NodeKind::Sin]);
    }

    #[test]
    fn test_remove() {
        let mut registry = Registry::new();
        let id = registry.insert(Node::new(NodeKind::Time, &NodeParams::default()));
        assert!(registry.contains(id));
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
    }
}
