//! Evaluation context: the state of a single tick.

use std::collections::HashMap;

use log::warn;

use super::highlight::Highlights;
use super::output::format_value;
use super::samples::{Sample, SampleStore};
use crate::config::EngineConfig;
use crate::error::{EvaluationError, GraphError};
use crate::model::graph::Graph;
use crate::model::ids::{AttrId, NodeId};
use crate::model::node::NodeBody;
use crate::presentation::Presentation;

/// Value substituted for an edge that closes a cycle.
pub const CYCLE_FALLBACK: f64 = 0.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Visit {
    InProgress,
    Done(f64),
}

/// Context for a single tick.
///
/// Created fresh for each tick. Provides pull-based input resolution with
/// per-tick memoization, the cycle guard, and the sink side effects.
pub struct EvalContext<'a> {
    pub graph: &'a mut Graph,
    pub samples: &'a mut SampleStore,
    pub highlights: &'a mut Highlights,
    pub presentation: &'a mut dyn Presentation,
    pub config: &'a EngineConfig,
    pub tick: u64,
    /// `now - epoch` for this tick.
    pub elapsed: f64,

    visits: HashMap<NodeId, Visit>,
    errors: Vec<EvaluationError>,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        graph: &'a mut Graph,
        samples: &'a mut SampleStore,
        highlights: &'a mut Highlights,
        presentation: &'a mut dyn Presentation,
        config: &'a EngineConfig,
        tick: u64,
        elapsed: f64,
    ) -> Self {
        Self {
            graph,
            samples,
            highlights,
            presentation,
            config,
            tick,
            elapsed,
            visits: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Value of `node_id` for this tick, computing it on first request.
    ///
    /// Re-entering a node that is still being computed means the links form a
    /// cycle: the cycle is reported and the edge reads [`CYCLE_FALLBACK`].
    pub fn resolve(&mut self, node_id: NodeId) -> Result<f64, GraphError> {
        match self.visits.get(&node_id) {
            Some(Visit::Done(value)) => return Ok(*value),
            Some(Visit::InProgress) => {
                self.report_cycle(node_id);
                return Ok(CYCLE_FALLBACK);
            }
            None => {}
        }

        let (body, inputs) = {
            let node = self.graph.node(node_id)?;
            (*node.body(), node.inputs().to_vec())
        };

        self.visits.insert(node_id, Visit::InProgress);
        let value = match self.compute(node_id, body, &inputs) {
            Ok(value) => value,
            Err(e) => {
                self.visits.remove(&node_id);
                return Err(e);
            }
        };
        self.visits.insert(node_id, Visit::Done(value));
        self.graph.node_mut(node_id)?.cached_value = Some(value);

        self.publish(node_id, body, value)?;
        Ok(value)
    }

    /// Value seen by an input slot: the linked upstream value, else the live
    /// widget value, else the slot's stored default.
    pub fn resolve_input(&mut self, attr: AttrId) -> Result<f64, GraphError> {
        if let Some(source) = self.graph.incoming(attr) {
            let owner = self
                .graph
                .owner_of(source)
                .ok_or(GraphError::AttributeNotFound(source))?;
            return self.resolve(owner);
        }
        if let Some(value) = self.presentation.input_value(attr) {
            return Ok(value);
        }
        Ok(self.graph.attribute(attr)?.default)
    }

    fn compute(
        &mut self,
        node_id: NodeId,
        body: NodeBody,
        inputs: &[AttrId],
    ) -> Result<f64, GraphError> {
        Ok(match body {
            NodeBody::Time => self.elapsed,
            NodeBody::Const { value } => self.presentation.const_value(node_id).unwrap_or(value),
            NodeBody::Binary(op) => {
                let a = self.resolve_input(input_slot(inputs, 0, node_id)?)?;
                let b = self.resolve_input(input_slot(inputs, 1, node_id)?)?;
                op.apply(a, b)
            }
            NodeBody::Unary(op) => op.apply(self.resolve_input(input_slot(inputs, 0, node_id)?)?),
            NodeBody::Display | NodeBody::Plot => {
                self.resolve_input(input_slot(inputs, 0, node_id)?)?
            }
        })
    }

    /// Side effects of a freshly computed node. Runs once per node per tick.
    fn publish(&mut self, node_id: NodeId, body: NodeBody, value: f64) -> Result<(), GraphError> {
        match body {
            NodeBody::Display => self.write_label(node_id, value),
            NodeBody::Plot => {
                self.samples.push(node_id, Sample::new(self.elapsed, value));
                let visible = self.samples.visible(node_id, self.config.plot_window);
                self.presentation.set_plot_series(node_id, visible);
                Ok(())
            }
            _ if self.config.mirror_labels => self.write_label(node_id, value),
            _ => Ok(()),
        }
    }

    fn write_label(&mut self, node_id: NodeId, value: f64) -> Result<(), GraphError> {
        let text = format_value(value, self.config.label_precision);
        self.presentation.set_label_text(node_id, &text);
        self.graph.node_mut(node_id)?.label = Some(text);
        Ok(())
    }

    fn report_cycle(&mut self, node_id: NodeId) {
        let error = EvaluationError::Cycle { node: node_id };
        if self.errors.contains(&error) {
            return;
        }
        warn!("Cycle detected at node {} in tick {}", node_id, self.tick);
        self.highlights.start(
            node_id,
            self.tick,
            self.config.highlight_ticks,
            &mut *self.presentation,
        );
        self.errors.push(error);
    }

    /// Record a node that failed to resolve; the tick carries on without it.
    pub fn report_unresolved(&mut self, node_id: NodeId, error: GraphError) {
        warn!("Node {} could not be evaluated: {}", node_id, error);
        self.errors.push(EvaluationError::Unresolved {
            node: node_id,
            reason: error.to_string(),
        });
    }

    /// Number of nodes that got a value this tick.
    pub fn evaluated(&self) -> usize {
        self.visits
            .values()
            .filter(|visit| matches!(visit, Visit::Done(_)))
            .count()
    }

    pub fn into_errors(self) -> Vec<EvaluationError> {
        self.errors
    }
}

fn input_slot(inputs: &[AttrId], index: usize, node_id: NodeId) -> Result<AttrId, GraphError> {
    inputs
        .get(index)
        .copied()
        .ok_or_else(|| GraphError::parameter(format!("node {} has no input slot {}", node_id, index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{NodeKind, NodeParams};
    use crate::presentation::EffectLog;

    struct Fixture {
        graph: Graph,
        samples: SampleStore,
        highlights: Highlights,
        log: EffectLog,
        config: EngineConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                graph: Graph::new(),
                samples: SampleStore::default(),
                highlights: Highlights::new(),
                log: EffectLog::new(),
                config: EngineConfig::default(),
            }
        }

        fn context(&mut self, elapsed: f64) -> EvalContext<'_> {
            EvalContext::new(
                &mut self.graph,
                &mut self.samples,
                &mut self.highlights,
                &mut self.log,
                &self.config,
                1,
                elapsed,
            )
        }
    }

    #[test]
    fn test_unlinked_input_reads_default() {
        let mut fx = Fixture::new();
        let sin = fx
            .graph
            .insert_node(
                NodeKind::Sin,
                &NodeParams::default().with_defaults(vec![std::f64::consts::FRAC_PI_2]),
            )
            .unwrap();
        let mut ctx = fx.context(0.0);
        let value = ctx.resolve(sin).unwrap();
        assert!((value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_widget_value_overrides_default() {
        let mut fx = Fixture::new();
        let cos = fx
            .graph
            .insert_node(NodeKind::Cos, &NodeParams::default().with_defaults(vec![1.0]))
            .unwrap();
        let cos_in = fx.graph.input(cos, "in").unwrap();
        fx.log.set_input_widget(cos_in, 0.0);
        let mut ctx = fx.context(0.0);
        assert_eq!(ctx.resolve(cos).unwrap(), 1.0);
    }

    #[test]
    fn test_memoized_within_tick() {
        let mut fx = Fixture::new();
        let time = fx.graph.insert_node(NodeKind::Time, &NodeParams::default()).unwrap();
        let mut ctx = fx.context(2.5);
        assert_eq!(ctx.resolve(time).unwrap(), 2.5);
        ctx.elapsed = 99.0;
        assert_eq!(ctx.resolve(time).unwrap(), 2.5);
        assert_eq!(ctx.evaluated(), 1);
    }

    #[test]
    fn test_self_loop_reports_cycle() {
        let mut fx = Fixture::new();
        let add = fx
            .graph
            .insert_node(NodeKind::Add, &NodeParams::default().with_defaults(vec![0.0, 1.0]))
            .unwrap();
        let out = fx.graph.output(add).unwrap();
        let a = fx.graph.input(add, "a").unwrap();
        fx.graph.link(out, a).unwrap();

        let mut ctx = fx.context(0.0);
        assert_eq!(ctx.resolve(add).unwrap(), 1.0);
        let errors = ctx.into_errors();
        assert_eq!(errors, vec![EvaluationError::Cycle { node: add }]);
        assert!(fx.highlights.is_active(add));
    }

    #[test]
    fn test_display_writes_label_once() {
        let mut fx = Fixture::new();
        let display = fx
            .graph
            .insert_node(NodeKind::Display, &NodeParams::default().with_defaults(vec![1.234]))
            .unwrap();
        let mut ctx = fx.context(0.0);
        ctx.resolve(display).unwrap();
        ctx.resolve(display).unwrap();
        drop(ctx);

        assert_eq!(fx.log.effects().len(), 1);
        assert_eq!(fx.log.last_label(display), Some("1.23"));
        assert_eq!(fx.graph.node(display).unwrap().label(), Some("1.23"));
    }
}
