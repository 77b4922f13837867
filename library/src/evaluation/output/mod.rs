//! What a tick produces besides its side effects.

use crate::error::EvaluationError;
use crate::model::ids::NodeId;

/// Summary of one evaluation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// 1-based tick number.
    pub tick: u64,
    /// Time since the epoch seen by `Time` nodes.
    pub elapsed: f64,
    /// Nodes that got a value this tick.
    pub evaluated: usize,
    pub errors: Vec<EvaluationError>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Nodes at which a cycle was detected.
    pub fn cycles(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.errors.iter().filter_map(|error| match error {
            EvaluationError::Cycle { node } => Some(*node),
            _ => None,
        })
    }

    pub fn has_cycle(&self) -> bool {
        self.cycles().next().is_some()
    }
}

/// Label text for a value.
pub fn format_value(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}
