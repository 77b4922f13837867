//! Ready-made graphs for a fresh session.

use crate::error::GraphError;
use crate::model::ids::{LinkId, NodeId};
use crate::model::node::{NodeKind, NodeParams};
use crate::presentation::Presentation;
use crate::session::Calculator;

/// Nodes and links of the `Time -> Sin -> Plot` startup graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinePlot {
    pub time: NodeId,
    pub sin: NodeId,
    pub plot: NodeId,
    pub links: [LinkId; 2],
}

/// Build the startup graph: a sine wave of elapsed time, plotted.
pub fn sine_plot<P: Presentation>(calc: &mut Calculator<P>) -> Result<SinePlot, GraphError> {
    let time = calc.create(NodeKind::Time, NodeParams::default())?;
    let sin = calc.create(NodeKind::Sin, NodeParams::default())?;
    let plot = calc.create(NodeKind::Plot, NodeParams::default())?;
    let first = calc.connect_nodes(time, sin, "in")?;
    let second = calc.connect_nodes(sin, plot, "in")?;
    Ok(SinePlot {
        time,
        sin,
        plot,
        links: [first, second],
    })
}

/// Nodes of a `Const + Const -> Display` graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstSum {
    pub a: NodeId,
    pub b: NodeId,
    pub add: NodeId,
    pub display: NodeId,
}

pub fn const_sum<P: Presentation>(
    calc: &mut Calculator<P>,
    a: f64,
    b: f64,
) -> Result<ConstSum, GraphError> {
    let const_a = calc.create(NodeKind::Const, NodeParams::constant(a))?;
    let const_b = calc.create(NodeKind::Const, NodeParams::constant(b))?;
    let add = calc.create(NodeKind::Add, NodeParams::default())?;
    let display = calc.create(NodeKind::Display, NodeParams::default())?;
    calc.connect_nodes(const_a, add, "a")?;
    calc.connect_nodes(const_b, add, "b")?;
    calc.connect_nodes(add, display, "in")?;
    Ok(ConstSum {
        a: const_a,
        b: const_b,
        add,
        display,
    })
}
