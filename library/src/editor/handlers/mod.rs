pub mod graph_handler;
