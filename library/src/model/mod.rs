//! Data model of the calculator graph: nodes, attributes and links.

pub mod attribute;
pub mod connection;
pub mod graph;
pub mod graph_analysis;
pub mod ids;
pub mod node;
pub mod registry;
