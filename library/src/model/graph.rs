//! The owned graph context: registry, attribute index and link table.

use std::collections::HashSet;

use super::attribute::{Attribute, AttributeIndex};
use super::connection::{Link, LinkTable};
use super::ids::{AttrId, LinkId, NodeId};
use super::node::{Node, NodeKind, NodeParams};
use super::registry::Registry;
use crate::error::GraphError;

/// All nodes and links of one calculator.
///
/// Every mutation keeps the three tables consistent: an attribute is indexed
/// exactly as long as its owner is registered, and no link refers to an
/// attribute that is not indexed.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    registry: Registry,
    attributes: AttributeIndex,
    links: LinkTable,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Nodes ---

    /// Register a new node of `kind` together with its attribute slots.
    pub fn insert_node(&mut self, kind: NodeKind, params: &NodeParams) -> Result<NodeId, GraphError> {
        params.validate(kind)?;

        let node = Node::new(kind, params);
        let id = node.id();
        for (index, (attr, name)) in node
            .inputs()
            .iter()
            .zip(kind.input_names().iter())
            .enumerate()
        {
            let default = params.defaults.get(index).copied().unwrap_or(0.0);
            self.attributes
                .insert(Attribute::input(*attr, id, *name, default));
        }
        if let Some(output) = node.output() {
            self.attributes.insert(Attribute::output(output, id));
        }
        self.registry.insert(node);
        Ok(id)
    }

    /// Remove a node, its attributes, and every link touching them.
    ///
    /// Returns the removed node and the links removed along with it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(Node, Vec<Link>), GraphError> {
        let owned: HashSet<AttrId> = self.node(id)?.attributes().collect();

        let removed_links = self
            .links
            .touching(&owned)
            .into_iter()
            .filter_map(|link_id| self.links.remove(link_id))
            .collect();

        for attr in &owned {
            self.attributes.remove(*attr);
        }
        let node = self.registry.remove(id).ok_or(GraphError::NodeNotFound(id))?;
        Ok((node, removed_links))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.registry.get(id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        self.registry.get_mut(id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.registry.contains(id)
    }

    /// Nodes in registry (insertion) order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.registry.iter()
    }

    pub fn node_ids(&self) -> &[NodeId] {
        self.registry.ids()
    }

    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    pub fn set_constant(&mut self, id: NodeId, value: f64) -> Result<(), GraphError> {
        self.node_mut(id)?.set_constant(value)
    }

    pub(crate) fn clear_cached_values(&mut self) {
        for node in self.registry.values_mut() {
            node.cached_value = None;
        }
    }

    // --- Attributes ---

    pub fn attribute(&self, id: AttrId) -> Result<&Attribute, GraphError> {
        self.attributes
            .get(id)
            .ok_or(GraphError::AttributeNotFound(id))
    }

    pub fn owner_of(&self, id: AttrId) -> Option<NodeId> {
        self.attributes.owner_of(id)
    }

    /// Input slot of `node` by pin name ("a", "b" or "in").
    pub fn input(&self, node: NodeId, name: &str) -> Result<AttrId, GraphError> {
        let n = self.node(node)?;
        n.kind()
            .input_names()
            .iter()
            .position(|pin| *pin == name)
            .and_then(|index| n.inputs().get(index).copied())
            .ok_or_else(|| {
                GraphError::parameter(format!("{} node {} has no input '{}'", n.kind(), node, name))
            })
    }

    /// Output slot of `node`. Sinks have none.
    pub fn output(&self, node: NodeId) -> Result<AttrId, GraphError> {
        let n = self.node(node)?;
        n.output().ok_or_else(|| {
            GraphError::parameter(format!("{} node {} has no output", n.kind(), node))
        })
    }

    pub fn set_input_default(&mut self, id: AttrId, value: f64) -> Result<(), GraphError> {
        let slot = self
            .attributes
            .get_mut(id)
            .ok_or(GraphError::AttributeNotFound(id))?;
        if !slot.is_input() {
            return Err(GraphError::parameter(format!(
                "attribute {} is an output and has no local value",
                id
            )));
        }
        slot.default = value;
        Ok(())
    }

    // --- Links ---

    /// Check that `source -> destination` joins an output to an input.
    pub fn validate_link(&self, source: AttrId, destination: AttrId) -> Result<(), GraphError> {
        let from = self.attribute(source)?;
        let to = self.attribute(destination)?;
        if from.is_input() {
            return Err(GraphError::invalid_link(
                source,
                destination,
                "source is not an output",
            ));
        }
        if !to.is_input() {
            return Err(GraphError::invalid_link(
                source,
                destination,
                "destination is not an input",
            ));
        }
        Ok(())
    }

    /// Link `source -> destination`, replacing any link already feeding `destination`.
    pub fn link(
        &mut self,
        source: AttrId,
        destination: AttrId,
    ) -> Result<(LinkId, Option<Link>), GraphError> {
        self.validate_link(source, destination)?;
        Ok(self.links.insert(source, destination))
    }

    pub fn unlink(&mut self, id: LinkId) -> Result<Link, GraphError> {
        self.links.remove(id).ok_or(GraphError::LinkNotFound(id))
    }

    /// Source attribute feeding `destination`, if linked.
    pub fn incoming(&self, destination: AttrId) -> Option<AttrId> {
        self.links.incoming_source(destination)
    }

    pub fn link_record(&self, id: LinkId) -> Result<&Link, GraphError> {
        self.links.get(id).ok_or(GraphError::LinkNotFound(id))
    }

    pub fn contains_link(&self, id: LinkId) -> bool {
        self.links.contains(id)
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Links whose source or destination belongs to `node`.
    pub fn links_touching(&self, node: NodeId) -> Result<Vec<LinkId>, GraphError> {
        let owned: HashSet<AttrId> = self.node(node)?.attributes().collect();
        Ok(self.links.touching(&owned))
    }

    /// Links leaving the output of `node`.
    pub fn downstream_links(&self, node: NodeId) -> Result<Vec<&Link>, GraphError> {
        Ok(match self.node(node)?.output() {
            Some(output) => self.links.outgoing(output).collect(),
            None => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(graph: &mut Graph, kind: NodeKind) -> NodeId {
        graph.insert_node(kind, &NodeParams::default()).unwrap()
    }

    #[test]
    fn test_insert_registers_attributes() {
        let mut graph = Graph::new();
        let node = add(&mut graph, NodeKind::Sub);
        let a = graph.input(node, "a").unwrap();
        let b = graph.input(node, "b").unwrap();
        let out = graph.output(node).unwrap();

        for attr in [a, b, out] {
            assert_eq!(graph.owner_of(attr), Some(node));
        }
        assert!(graph.input(node, "in").is_err());
    }

    #[test]
    fn test_input_defaults_from_params() {
        let mut graph = Graph::new();
        let node = graph
            .insert_node(NodeKind::Add, &NodeParams::default().with_defaults(vec![2.5]))
            .unwrap();
        let a = graph.input(node, "a").unwrap();
        let b = graph.input(node, "b").unwrap();
        assert_eq!(graph.attribute(a).unwrap().default, 2.5);
        assert_eq!(graph.attribute(b).unwrap().default, 0.0);
    }

    #[test]
    fn test_sink_has_no_output() {
        let mut graph = Graph::new();
        let display = add(&mut graph, NodeKind::Display);
        assert!(matches!(
            graph.output(display),
            Err(GraphError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_link_direction_is_checked() {
        let mut graph = Graph::new();
        let time = add(&mut graph, NodeKind::Time);
        let sin = add(&mut graph, NodeKind::Sin);
        let time_out = graph.output(time).unwrap();
        let sin_in = graph.input(sin, "in").unwrap();
        let sin_out = graph.output(sin).unwrap();

        assert!(matches!(
            graph.link(sin_in, sin_out),
            Err(GraphError::InvalidLink { .. })
        ));
        assert!(matches!(
            graph.link(time_out, sin_out),
            Err(GraphError::InvalidLink { .. })
        ));
        assert!(graph.link(time_out, sin_in).is_ok());
        assert_eq!(graph.incoming(sin_in), Some(time_out));
    }

    #[test]
    fn test_link_to_removed_attribute_fails() {
        let mut graph = Graph::new();
        let time = add(&mut graph, NodeKind::Time);
        let sin = add(&mut graph, NodeKind::Sin);
        let time_out = graph.output(time).unwrap();
        let sin_in = graph.input(sin, "in").unwrap();
        graph.remove_node(time).unwrap();

        assert!(matches!(
            graph.link(time_out, sin_in),
            Err(GraphError::AttributeNotFound(_))
        ));
    }

    #[test]
    fn test_remove_node_drops_attributes_and_links() {
        let mut graph = Graph::new();
        let time = add(&mut graph, NodeKind::Time);
        let sin = add(&mut graph, NodeKind::Sin);
        let plot = add(&mut graph, NodeKind::Plot);
        let sin_in = graph.input(sin, "in").unwrap();
        let sin_out = graph.output(sin).unwrap();
        let (upstream, _) = graph.link(graph.output(time).unwrap(), sin_in).unwrap();
        let (downstream, _) = graph
            .link(sin_out, graph.input(plot, "in").unwrap())
            .unwrap();

        let (removed, links) = graph.remove_node(sin).unwrap();
        assert_eq!(removed.kind(), NodeKind::Sin);
        let removed_ids: Vec<LinkId> = links.iter().map(|l| l.id).collect();
        assert_eq!(removed_ids, vec![upstream, downstream]);
        assert_eq!(graph.link_count(), 0);
        assert_eq!(graph.owner_of(sin_in), None);
        assert_eq!(graph.owner_of(sin_out), None);
        assert!(matches!(
            graph.remove_node(sin),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_set_input_default_rejects_outputs() {
        let mut graph = Graph::new();
        let sin = add(&mut graph, NodeKind::Sin);
        let sin_in = graph.input(sin, "in").unwrap();
        graph.set_input_default(sin_in, 0.5).unwrap();
        assert_eq!(graph.attribute(sin_in).unwrap().default, 0.5);
        assert!(graph
            .set_input_default(graph.output(sin).unwrap(), 1.0)
            .is_err());
    }
}
