use log::{debug, warn};

use crate::error::GraphError;
use crate::model::connection::Link;
use crate::model::graph::Graph;
use crate::model::graph_analysis::would_create_cycle;
use crate::model::ids::{AttrId, LinkId, NodeId};
use crate::model::node::{Node, NodeKind, NodeParams};
use crate::presentation::Presentation;

/// What a deletion removed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Deleted {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

/// Graph mutations.
///
/// Every operation validates before it mutates, so an `Err` leaves the graph
/// exactly as it was.
pub struct GraphHandler;

impl GraphHandler {
    /// Add a node of `kind` with fresh attribute slots. Returns the new node's ID.
    pub fn add_node(
        graph: &mut Graph,
        kind: NodeKind,
        params: &NodeParams,
    ) -> Result<NodeId, GraphError> {
        let node_id = graph.insert_node(kind, params)?;
        debug!("Added {} node {}", kind, node_id);
        Ok(node_id)
    }

    /// Link an output to an input, replacing the input's existing link.
    ///
    /// The destination's widget is disabled while the link drives it.
    pub fn connect(
        graph: &mut Graph,
        presentation: &mut dyn Presentation,
        source: AttrId,
        destination: AttrId,
    ) -> Result<LinkId, GraphError> {
        let closes_cycle = would_create_cycle(graph, source, destination);
        let (link_id, replaced) = graph.link(source, destination)?;

        if let Some(old) = replaced {
            debug!("Link {} replaced by {} on input {}", old.id, link_id, destination);
        }
        if closes_cycle {
            warn!(
                "Link {} -> {} closes a cycle; it will read {} at the cycle edge",
                source,
                destination,
                crate::evaluation::context::CYCLE_FALLBACK
            );
        }
        presentation.disable_input(destination);
        debug!("Connected {} -> {} as {}", source, destination, link_id);
        Ok(link_id)
    }

    /// Remove a link. The destination reads its own local value again.
    pub fn disconnect(
        graph: &mut Graph,
        presentation: &mut dyn Presentation,
        link_id: LinkId,
    ) -> Result<Link, GraphError> {
        let link = graph.unlink(link_id)?;
        presentation.enable_input(link.destination);
        debug!("Disconnected {}", link_id);
        Ok(link)
    }

    /// Disconnect every link touching the node, then remove it.
    ///
    /// Downstream consumers fall back to their local values.
    pub fn delete_node(
        graph: &mut Graph,
        presentation: &mut dyn Presentation,
        node_id: NodeId,
    ) -> Result<Deleted, GraphError> {
        let mut deleted = Deleted::default();
        for link_id in graph.links_touching(node_id)? {
            let link = graph.unlink(link_id)?;
            if graph.owner_of(link.destination) != Some(node_id) {
                presentation.enable_input(link.destination);
            }
            deleted.links.push(link);
        }

        let (node, leftover) = graph.remove_node(node_id)?;
        deleted.links.extend(leftover);
        debug!(
            "Deleted {} node {} and {} link(s)",
            node.kind(),
            node_id,
            deleted.links.len()
        );
        deleted.nodes.push(node);
        Ok(deleted)
    }

    /// Delete the given links, then the given nodes.
    ///
    /// Every id must exist when the call starts. Ids already removed by an
    /// earlier step of the same call (a link touching a deleted node, or a
    /// repeated id) are skipped.
    pub fn delete_selection(
        graph: &mut Graph,
        presentation: &mut dyn Presentation,
        node_ids: &[NodeId],
        link_ids: &[LinkId],
    ) -> Result<Deleted, GraphError> {
        for link_id in link_ids {
            graph.link_record(*link_id)?;
        }
        for node_id in node_ids {
            graph.node(*node_id)?;
        }

        let mut deleted = Deleted::default();
        for link_id in link_ids {
            if graph.contains_link(*link_id) {
                deleted
                    .links
                    .push(Self::disconnect(graph, presentation, *link_id)?);
            }
        }
        for node_id in node_ids {
            if graph.contains_node(*node_id) {
                let removed = Self::delete_node(graph, presentation, *node_id)?;
                deleted.nodes.extend(removed.nodes);
                deleted.links.extend(removed.links);
            }
        }
        Ok(deleted)
    }

    /// Set the stored value of a `Const` node.
    pub fn set_const(graph: &mut Graph, node_id: NodeId, value: f64) -> Result<(), GraphError> {
        graph.set_constant(node_id, value)
    }

    /// Set the local value an unconnected input reads.
    pub fn set_input_default(
        graph: &mut Graph,
        attr: AttrId,
        value: f64,
    ) -> Result<(), GraphError> {
        graph.set_input_default(attr, value)
    }
}
