//! Plot sample storage.

use std::collections::HashMap;

use crate::model::ids::NodeId;

/// One plotted point: time since the epoch and the value seen at that time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub t: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(t: f64, y: f64) -> Self {
        Self { t, y }
    }
}

/// Append-only series, one per plot node.
///
/// Written only by the evaluator during a tick; read by the presentation
/// between ticks.
#[derive(Clone, Debug, Default)]
pub struct SampleStore {
    series: HashMap<NodeId, Vec<Sample>>,
    /// When set, oldest samples are dropped beyond this many per series.
    capacity: Option<usize>,
}

impl SampleStore {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            series: HashMap::new(),
            capacity,
        }
    }

    pub fn push(&mut self, node: NodeId, sample: Sample) {
        let series = self.series.entry(node).or_default();
        series.push(sample);
        if let Some(capacity) = self.capacity {
            if series.len() > capacity {
                let excess = series.len() - capacity;
                series.drain(..excess);
            }
        }
    }

    /// Every sample recorded for `node`, oldest first.
    pub fn series(&self, node: NodeId) -> &[Sample] {
        self.series.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The trailing samples whose time lies within `window` of the newest one.
    pub fn visible(&self, node: NodeId, window: f64) -> &[Sample] {
        let series = self.series(node);
        let Some(last) = series.last() else {
            return series;
        };
        let cutoff = last.t - window;
        let start = series
            .iter()
            .rposition(|s| s.t < cutoff)
            .map_or(0, |index| index + 1);
        &series[start..]
    }

    /// Forget the series of a deleted plot node.
    pub fn remove(&mut self, node: NodeId) -> Option<Vec<Sample>> {
        self.series.remove(&node)
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }

    pub fn total_len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }
}
