//! Editing operations, the API the GUI calls when the user changes the graph.

pub mod handlers;

pub use handlers::graph_handler::{Deleted, GraphHandler};
