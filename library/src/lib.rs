//! Dataflow graph engine for a node-based visual calculator.
//!
//! Nodes (constants, arithmetic, trigonometry, a time source, numeric and plot
//! displays) are wired together through links between their attributes. Every
//! tick, the engine re-evaluates the graph by pulling values from upstream nodes
//! with per-tick memoization. Rendering and widgets live outside this crate and
//! are reached through the [`Presentation`] trait.

pub mod config;
pub mod editor;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod presentation;
pub mod presets;
pub mod session;
pub mod util;

pub use config::EngineConfig;
pub use error::{EvaluationError, GraphError};
pub use evaluation::output::TickReport;
pub use evaluation::samples::Sample;
pub use model::graph::Graph;
pub use model::ids::{AttrId, LinkId, NodeId};
pub use model::node::{Node, NodeKind, NodeParams};
pub use presentation::{Effect, EffectLog, Headless, Presentation};
pub use session::Calculator;
pub use session::shared::SharedCalculator;
