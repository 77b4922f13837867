//! Timed node highlights.

use std::collections::HashMap;

use crate::model::ids::NodeId;
use crate::presentation::Presentation;

/// Highlighted nodes and the tick after which each one clears.
#[derive(Clone, Debug, Default)]
pub struct Highlights {
    expires_after: HashMap<NodeId, u64>,
}

impl Highlights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight `node` through tick `base_tick + ticks`.
    ///
    /// Re-highlighting an active node only extends it; the presentation sees a
    /// single "on" effect.
    pub fn start(
        &mut self,
        node: NodeId,
        base_tick: u64,
        ticks: u32,
        presentation: &mut dyn Presentation,
    ) {
        let expiry = base_tick + u64::from(ticks.max(1));
        match self.expires_after.get_mut(&node) {
            Some(existing) => *existing = (*existing).max(expiry),
            None => {
                self.expires_after.insert(node, expiry);
                presentation.set_highlight(node, true);
            }
        }
    }

    /// Clear every highlight whose last tick is `tick` or earlier.
    pub fn expire(&mut self, tick: u64, presentation: &mut dyn Presentation) {
        let mut expired: Vec<NodeId> = self
            .expires_after
            .iter()
            .filter(|(_, expiry)| **expiry <= tick)
            .map(|(node, _)| *node)
            .collect();
        expired.sort();
        for node in expired {
            self.expires_after.remove(&node);
            presentation.set_highlight(node, false);
        }
    }

    /// Drop a deleted node without emitting an effect.
    pub fn forget(&mut self, node: NodeId) {
        self.expires_after.remove(&node);
    }

    pub fn is_active(&self, node: NodeId) -> bool {
        self.expires_after.contains_key(&node)
    }
}
