//! The boundary between the engine and whatever draws it.
//!
//! The engine never touches widgets directly. It reads live widget values and
//! pushes effects through [`Presentation`]; a GUI implements the trait on top of
//! its own widget handles.

use std::collections::HashMap;

use crate::evaluation::samples::Sample;
use crate::model::ids::{AttrId, NodeId};

/// Widget access and effect sinks consumed by the engine.
///
/// All methods have no-op defaults so an implementation only overrides what it
/// renders.
pub trait Presentation {
    /// Live value of the widget next to an unconnected input, if it has one.
    fn input_value(&self, attr: AttrId) -> Option<f64> {
        let _ = attr;
        None
    }

    /// Live value of a `Const` node's widget, if it has one.
    fn const_value(&self, node: NodeId) -> Option<f64> {
        let _ = node;
        None
    }

    fn set_label_text(&mut self, node: NodeId, text: &str) {
        let _ = (node, text);
    }

    /// Replace the series drawn for a plot node with `samples`.
    fn set_plot_series(&mut self, node: NodeId, samples: &[Sample]) {
        let _ = (node, samples);
    }

    /// The input is no longer driven by a link; its widget becomes editable.
    fn enable_input(&mut self, attr: AttrId) {
        let _ = attr;
    }

    /// The input is now driven by a link; its widget is read-only.
    fn disable_input(&mut self, attr: AttrId) {
        let _ = attr;
    }

    fn set_highlight(&mut self, node: NodeId, on: bool) {
        let _ = (node, on);
    }
}

/// A presentation that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Presentation for Headless {}

/// An effect emitted by the engine, as recorded by [`EffectLog`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Label { node: NodeId, text: String },
    PlotSeries { node: NodeId, len: usize },
    EnableInput(AttrId),
    DisableInput(AttrId),
    Highlight { node: NodeId, on: bool },
}

/// A presentation that records effects and serves widget values from maps.
///
/// Used by the demo driver and tests in place of a real GUI.
#[derive(Debug, Default, Clone)]
pub struct EffectLog {
    effects: Vec<Effect>,
    input_widgets: HashMap<AttrId, f64>,
    const_widgets: HashMap<NodeId, f64>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user typing into an input's widget.
    pub fn set_input_widget(&mut self, attr: AttrId, value: f64) {
        self.input_widgets.insert(attr, value);
    }

    /// Simulate the user editing a `Const` node's widget.
    pub fn set_const_widget(&mut self, node: NodeId, value: f64) {
        self.const_widgets.insert(node, value);
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Take the recorded effects, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Most recent label text written for `node`.
    pub fn last_label(&self, node: NodeId) -> Option<&str> {
        self.effects.iter().rev().find_map(|effect| match effect {
            Effect::Label { node: n, text } if *n == node => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether the most recent enable/disable effect for `attr` disabled it.
    pub fn is_disabled(&self, attr: AttrId) -> bool {
        self.effects
            .iter()
            .rev()
            .find_map(|effect| match effect {
                Effect::DisableInput(a) if *a == attr => Some(true),
                Effect::EnableInput(a) if *a == attr => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Whether `node` is currently highlighted according to the recorded effects.
    pub fn is_highlighted(&self, node: NodeId) -> bool {
        self.effects
            .iter()
            .rev()
            .find_map(|effect| match effect {
                Effect::Highlight { node: n, on } if *n == node => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl Presentation for EffectLog {
    fn input_value(&self, attr: AttrId) -> Option<f64> {
        self.input_widgets.get(&attr).copied()
    }

    fn const_value(&self, node: NodeId) -> Option<f64> {
        self.const_widgets.get(&node).copied()
    }

    fn set_label_text(&mut self, node: NodeId, text: &str) {
        self.effects.push(Effect::Label {
            node,
            text: text.to_string(),
        });
    }

    fn set_plot_series(&mut self, node: NodeId, samples: &[Sample]) {
        self.effects.push(Effect::PlotSeries {
            node,
            len: samples.len(),
        });
    }

    fn enable_input(&mut self, attr: AttrId) {
        self.effects.push(Effect::EnableInput(attr));
    }

    fn disable_input(&mut self, attr: AttrId) {
        self.effects.push(Effect::DisableInput(attr));
    }

    fn set_highlight(&mut self, node: NodeId, on: bool) {
        self.effects.push(Effect::Highlight { node, on });
    }
}
