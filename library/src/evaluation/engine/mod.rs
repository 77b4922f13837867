//! Evaluation engine: drives one pull-based pass over the graph per tick.

use log::debug;

use super::context::EvalContext;
use super::highlight::Highlights;
use super::output::TickReport;
use super::samples::SampleStore;
use crate::config::EngineConfig;
use crate::error::GraphError;
use crate::model::graph::Graph;
use crate::model::ids::NodeId;
use crate::presentation::Presentation;
use crate::util::timing::ScopedTimer;

/// Runs ticks with a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct EvalEngine {
    config: EngineConfig,
}

impl EvalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate every node in registry order.
    ///
    /// Cached values from the previous tick are cleared first, so each node is
    /// computed at most once and every sink fires exactly once.
    pub fn evaluate_tick(
        &self,
        graph: &mut Graph,
        samples: &mut SampleStore,
        highlights: &mut Highlights,
        presentation: &mut dyn Presentation,
        tick: u64,
        elapsed: f64,
    ) -> TickReport {
        let order = graph.node_ids().to_vec();
        self.run(graph, samples, highlights, presentation, tick, elapsed, &order)
    }

    /// Evaluate only `targets` and the nodes they pull from.
    ///
    /// Nodes outside that upstream cone keep no cached value for this tick and
    /// their sinks do not fire. Unknown targets fail before anything runs.
    pub fn evaluate_targets(
        &self,
        graph: &mut Graph,
        samples: &mut SampleStore,
        highlights: &mut Highlights,
        presentation: &mut dyn Presentation,
        tick: u64,
        elapsed: f64,
        targets: &[NodeId],
    ) -> Result<TickReport, GraphError> {
        for target in targets {
            graph.node(*target)?;
        }
        Ok(self.run(graph, samples, highlights, presentation, tick, elapsed, targets))
    }

    fn run(
        &self,
        graph: &mut Graph,
        samples: &mut SampleStore,
        highlights: &mut Highlights,
        presentation: &mut dyn Presentation,
        tick: u64,
        elapsed: f64,
        order: &[NodeId],
    ) -> TickReport {
        let _timer = ScopedTimer::debug_lazy(|| {
            format!("Tick {} ({} nodes)", tick, graph.node_count())
        });

        graph.clear_cached_values();

        let mut ctx = EvalContext::new(
            graph,
            samples,
            highlights,
            presentation,
            &self.config,
            tick,
            elapsed,
        );
        for node_id in order {
            if let Err(e) = ctx.resolve(*node_id) {
                ctx.report_unresolved(*node_id, e);
            }
        }
        let evaluated = ctx.evaluated();
        let errors = ctx.into_errors();

        highlights.expire(tick, presentation);

        if !errors.is_empty() {
            debug!("Tick {} finished with {} error(s)", tick, errors.len());
        }
        TickReport {
            tick,
            elapsed,
            evaluated,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::samples::Sample;
    use crate::model::node::{NodeKind, NodeParams};
    use crate::presentation::{Effect, EffectLog};

    #[test]
    fn test_tick_evaluates_every_node() {
        let mut graph = Graph::new();
        let time = graph.insert_node(NodeKind::Time, &NodeParams::default()).unwrap();
        let plot = graph.insert_node(NodeKind::Plot, &NodeParams::default()).unwrap();
        graph
            .link(graph.output(time).unwrap(), graph.input(plot, "in").unwrap())
            .unwrap();

        let engine = EvalEngine::default();
        let mut samples = SampleStore::default();
        let mut highlights = Highlights::new();
        let mut log = EffectLog::new();

        let report = engine.evaluate_tick(&mut graph, &mut samples, &mut highlights, &mut log, 1, 0.5);
        assert!(report.is_clean());
        assert_eq!(report.evaluated, 2);
        assert_eq!(samples.series(plot), &[Sample::new(0.5, 0.5)]);
        assert_eq!(log.effects(), &[Effect::PlotSeries { node: plot, len: 1 }]);
    }

    #[test]
    fn test_cached_values_do_not_leak_between_ticks() {
        let mut graph = Graph::new();
        let time = graph.insert_node(NodeKind::Time, &NodeParams::default()).unwrap();
        let sin = graph.insert_node(NodeKind::Sin, &NodeParams::default()).unwrap();

        let engine = EvalEngine::default();
        let mut samples = SampleStore::default();
        let mut highlights = Highlights::new();
        let mut log = EffectLog::new();

        engine.evaluate_tick(&mut graph, &mut samples, &mut highlights, &mut log, 1, 1.0);
        assert_eq!(graph.node(time).unwrap().cached_value(), Some(1.0));

        engine
            .evaluate_targets(&mut graph, &mut samples, &mut highlights, &mut log, 2, 2.0, &[sin])
            .unwrap();
        assert_eq!(graph.node(time).unwrap().cached_value(), None);
        assert_eq!(graph.node(sin).unwrap().cached_value(), Some(0.0));
    }

    #[test]
    fn test_unknown_target_fails_before_running() {
        let mut graph = Graph::new();
        let time = graph.insert_node(NodeKind::Time, &NodeParams::default()).unwrap();
        let engine = EvalEngine::default();
        let mut samples = SampleStore::default();
        let mut highlights = Highlights::new();
        let mut log = EffectLog::new();

        let result = engine.evaluate_targets(
            &mut graph,
            &mut samples,
            &mut highlights,
            &mut log,
            1,
            1.0,
            &[time, NodeId::new()],
        );
        assert!(matches!(result, Err(GraphError::NodeNotFound(_))));
        assert_eq!(graph.node(time).unwrap().cached_value(), None);
    }
}
