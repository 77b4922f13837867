//! Reachability queries over the calculator graph.

use std::collections::{HashSet, VecDeque};

use super::graph::Graph;
use super::ids::{AttrId, NodeId};

/// Check if linking `source -> destination` would close a cycle.
///
/// True when the destination's owner can already reach the source's owner by
/// following links downstream (a self-loop counts).
pub fn would_create_cycle(graph: &Graph, source: AttrId, destination: AttrId) -> bool {
    let (Some(from_node), Some(to_node)) = (graph.owner_of(source), graph.owner_of(destination))
    else {
        return false;
    };

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(to_node);

    while let Some(current) = queue.pop_front() {
        if current == from_node {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Ok(links) = graph.downstream_links(current) {
            for link in links {
                if let Some(next) = graph.owner_of(link.destination) {
                    queue.push_back(next);
                }
            }
        }
    }
    false
}

/// Nodes that `node` pulls values from, directly or transitively, nearest first.
///
/// The node itself is not included unless it lies on a cycle through itself.
pub fn upstream_nodes(graph: &Graph, node: NodeId) -> Vec<NodeId> {
    let mut result = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(node);

    while let Some(current) = queue.pop_front() {
        let Ok(n) = graph.node(current) else {
            continue;
        };
        for input in n.inputs() {
            let Some(source) = graph.incoming(*input) else {
                continue;
            };
            let Some(owner) = graph.owner_of(source) else {
                continue;
            };
            if visited.insert(owner) {
                result.push(owner);
                queue.push_back(owner);
            }
        }
    }
    result
}
