//! The calculator session: the single owned context a presentation layer drives.

pub mod shared;

use log::{debug, info};

use crate::config::EngineConfig;
use crate::editor::{Deleted, GraphHandler};
use crate::error::GraphError;
use crate::evaluation::engine::EvalEngine;
use crate::evaluation::highlight::Highlights;
use crate::evaluation::output::TickReport;
use crate::evaluation::samples::{Sample, SampleStore};
use crate::model::connection::Link;
use crate::model::graph::Graph;
use crate::model::graph_analysis;
use crate::model::ids::{AttrId, LinkId, NodeId};
use crate::model::node::{Node, NodeKind, NodeParams};
use crate::presentation::{Headless, Presentation};

/// A graph plus everything needed to evaluate it and show the results.
///
/// Edits and ticks both take `&mut self`, so an edit can never interleave
/// with a tick in progress.
pub struct Calculator<P: Presentation = Headless> {
    graph: Graph,
    samples: SampleStore,
    highlights: Highlights,
    engine: EvalEngine,
    presentation: P,
    /// Timestamp that `Time` nodes measure from.
    epoch: f64,
    ticks: u64,
    last_report: Option<TickReport>,
}

impl Calculator<Headless> {
    /// A session with default configuration and no presentation.
    pub fn headless(epoch: f64) -> Self {
        Self::new(EngineConfig::default(), epoch, Headless)
    }
}

impl<P: Presentation> Calculator<P> {
    pub fn new(config: EngineConfig, epoch: f64, presentation: P) -> Self {
        info!(
            "Calculator session created (epoch {}, plot window {})",
            epoch, config.plot_window
        );
        Self {
            graph: Graph::new(),
            samples: SampleStore::new(config.max_samples),
            highlights: Highlights::new(),
            engine: EvalEngine::new(config),
            presentation,
            epoch,
            ticks: 0,
            last_report: None,
        }
    }

    // --- Editing ---

    pub fn create(&mut self, kind: NodeKind, params: NodeParams) -> Result<NodeId, GraphError> {
        GraphHandler::add_node(&mut self.graph, kind, &params)
    }

    /// Create a node from a menu type id such as "math.add" or "Plot".
    pub fn create_by_type(&mut self, type_id: &str) -> Result<NodeId, GraphError> {
        let kind: NodeKind = type_id.parse()?;
        self.create(kind, NodeParams::default())
    }

    pub fn connect(&mut self, source: AttrId, destination: AttrId) -> Result<LinkId, GraphError> {
        GraphHandler::connect(&mut self.graph, &mut self.presentation, source, destination)
    }

    /// Connect `from`'s output to `to`'s input named `pin`.
    pub fn connect_nodes(
        &mut self,
        from: NodeId,
        to: NodeId,
        pin: &str,
    ) -> Result<LinkId, GraphError> {
        let source = self.graph.output(from)?;
        let destination = self.graph.input(to, pin)?;
        self.connect(source, destination)
    }

    pub fn disconnect(&mut self, link: LinkId) -> Result<Link, GraphError> {
        GraphHandler::disconnect(&mut self.graph, &mut self.presentation, link)
    }

    /// Delete a selection: links first, then nodes.
    pub fn delete(&mut self, node_ids: &[NodeId], link_ids: &[LinkId]) -> Result<Deleted, GraphError> {
        let deleted = GraphHandler::delete_selection(
            &mut self.graph,
            &mut self.presentation,
            node_ids,
            link_ids,
        )?;
        for node in &deleted.nodes {
            self.samples.remove(node.id());
            self.highlights.forget(node.id());
        }
        Ok(deleted)
    }

    pub fn set_const(&mut self, node: NodeId, value: f64) -> Result<(), GraphError> {
        GraphHandler::set_const(&mut self.graph, node, value)
    }

    pub fn set_input_default(&mut self, attr: AttrId, value: f64) -> Result<(), GraphError> {
        GraphHandler::set_input_default(&mut self.graph, attr, value)
    }

    /// Highlight a node for the configured number of ticks.
    pub fn highlight(&mut self, node: NodeId) -> Result<(), GraphError> {
        self.graph.node(node)?;
        self.highlights.start(
            node,
            self.ticks,
            self.engine.config().highlight_ticks,
            &mut self.presentation,
        );
        Ok(())
    }

    // --- Evaluation ---

    /// Run one evaluation pass over every node at time `now`.
    pub fn tick(&mut self, now: f64) -> TickReport {
        self.ticks += 1;
        let report = self.engine.evaluate_tick(
            &mut self.graph,
            &mut self.samples,
            &mut self.highlights,
            &mut self.presentation,
            self.ticks,
            now - self.epoch,
        );
        self.finish_tick(report)
    }

    /// Run a pass that only resolves `targets` and what they pull from.
    pub fn tick_targets(&mut self, now: f64, targets: &[NodeId]) -> Result<TickReport, GraphError> {
        let report = self.engine.evaluate_targets(
            &mut self.graph,
            &mut self.samples,
            &mut self.highlights,
            &mut self.presentation,
            self.ticks + 1,
            now - self.epoch,
            targets,
        )?;
        self.ticks += 1;
        Ok(self.finish_tick(report))
    }

    fn finish_tick(&mut self, report: TickReport) -> TickReport {
        debug!(
            "Tick {} evaluated {} node(s) at t={:.3}",
            report.tick, report.evaluated, report.elapsed
        );
        self.last_report = Some(report.clone());
        report
    }

    // --- Accessors ---

    /// Value computed for `node` in the latest tick, if it was evaluated.
    pub fn value(&self, node: NodeId) -> Result<Option<f64>, GraphError> {
        Ok(self.graph.node(node)?.cached_value())
    }

    /// Last label text written for `node`.
    pub fn label(&self, node: NodeId) -> Result<Option<&str>, GraphError> {
        Ok(self.graph.node(node)?.label())
    }

    /// Every sample a plot node has recorded.
    pub fn samples(&self, node: NodeId) -> &[Sample] {
        self.samples.series(node)
    }

    /// The samples inside the configured plot window.
    pub fn visible_samples(&self, node: NodeId) -> &[Sample] {
        self.samples.visible(node, self.engine.config().plot_window)
    }

    pub fn node(&self, node: NodeId) -> Result<&Node, GraphError> {
        self.graph.node(node)
    }

    pub fn input(&self, node: NodeId, pin: &str) -> Result<AttrId, GraphError> {
        self.graph.input(node, pin)
    }

    pub fn output(&self, node: NodeId) -> Result<AttrId, GraphError> {
        self.graph.output(node)
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.graph.links()
    }

    /// Nodes `node` pulls from, nearest first.
    pub fn upstream(&self, node: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.graph.node(node)?;
        Ok(graph_analysis::upstream_nodes(&self.graph, node))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn is_highlighted(&self, node: NodeId) -> bool {
        self.highlights.is_active(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::EffectLog;

    #[test]
    fn test_tick_counts_and_elapsed() {
        let mut calc = Calculator::headless(100.0);
        let time = calc.create(NodeKind::Time, NodeParams::default()).unwrap();
        let report = calc.tick(101.5);
        assert_eq!(report.tick, 1);
        assert_eq!(report.elapsed, 1.5);
        assert_eq!(calc.value(time).unwrap(), Some(1.5));
        assert_eq!(calc.tick_count(), 1);
        assert_eq!(calc.last_report(), Some(&report));
    }

    #[test]
    fn test_create_by_type() {
        let mut calc = Calculator::headless(0.0);
        let node = calc.create_by_type("math.divide").unwrap();
        assert_eq!(calc.node(node).unwrap().kind(), NodeKind::Div);
        assert!(matches!(
            calc.create_by_type("math.modulo"),
            Err(GraphError::UnknownNodeType(_))
        ));
    }

    #[test]
    fn test_highlight_clears_after_one_tick() {
        let mut calc = Calculator::new(EngineConfig::default(), 0.0, EffectLog::new());
        let time = calc.create(NodeKind::Time, NodeParams::default()).unwrap();
        calc.highlight(time).unwrap();
        assert!(calc.presentation().is_highlighted(time));

        calc.tick(0.1);
        assert!(!calc.is_highlighted(time));
        assert!(!calc.presentation().is_highlighted(time));
    }

    #[test]
    fn test_delete_forgets_samples() {
        let mut calc = Calculator::headless(0.0);
        let time = calc.create(NodeKind::Time, NodeParams::default()).unwrap();
        let plot = calc.create(NodeKind::Plot, NodeParams::default()).unwrap();
        calc.connect_nodes(time, plot, "in").unwrap();
        calc.tick(1.0);
        assert_eq!(calc.samples(plot).len(), 1);

        calc.delete(&[plot], &[]).unwrap();
        assert!(calc.samples(plot).is_empty());
        assert!(calc.value(plot).is_err());
    }
}
