//! Node kinds and node records.

use std::fmt;
use std::str::FromStr;

use super::ids::{AttrId, NodeId};
use crate::error::GraphError;

/// The closed set of node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Time,
    Const,
    Add,
    Sub,
    Mul,
    Div,
    Sin,
    Cos,
    Tan,
    Display,
    Plot,
}

impl NodeKind {
    pub const ALL: [NodeKind; 11] = [
        NodeKind::Time,
        NodeKind::Const,
        NodeKind::Add,
        NodeKind::Sub,
        NodeKind::Mul,
        NodeKind::Div,
        NodeKind::Sin,
        NodeKind::Cos,
        NodeKind::Tan,
        NodeKind::Display,
        NodeKind::Plot,
    ];

    /// Input pin names, in slot order.
    pub fn input_names(self) -> &'static [&'static str] {
        match self {
            NodeKind::Time | NodeKind::Const => &[],
            NodeKind::Add | NodeKind::Sub | NodeKind::Mul | NodeKind::Div => &["a", "b"],
            NodeKind::Sin | NodeKind::Cos | NodeKind::Tan | NodeKind::Display | NodeKind::Plot => {
                &["in"]
            }
        }
    }

    pub fn arity(self) -> usize {
        self.input_names().len()
    }

    /// Sinks have side effects and no connectable output.
    pub fn is_sink(self) -> bool {
        matches!(self, NodeKind::Display | NodeKind::Plot)
    }

    pub fn has_output(self) -> bool {
        !self.is_sink()
    }

    /// Stable identifier used by node menus (e.g. "math.add").
    pub fn type_id(self) -> &'static str {
        match self {
            NodeKind::Time => "input.time",
            NodeKind::Const => "input.const",
            NodeKind::Add => "math.add",
            NodeKind::Sub => "math.subtract",
            NodeKind::Mul => "math.multiply",
            NodeKind::Div => "math.divide",
            NodeKind::Sin => "math.sin",
            NodeKind::Cos => "math.cos",
            NodeKind::Tan => "math.tan",
            NodeKind::Display => "output.display",
            NodeKind::Plot => "output.plot",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::Time => "Time",
            NodeKind::Const => "Const",
            NodeKind::Add => "Add",
            NodeKind::Sub => "Subtract",
            NodeKind::Mul => "Multiply",
            NodeKind::Div => "Divide",
            NodeKind::Sin => "Sin",
            NodeKind::Cos => "Cos",
            NodeKind::Tan => "Tan",
            NodeKind::Display => "Display",
            NodeKind::Plot => "Plot",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for NodeKind {
    type Err = GraphError;

    /// Accepts either the type id ("math.add") or the display name ("Add"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| {
                kind.type_id().eq_ignore_ascii_case(needle)
                    || kind.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| GraphError::UnknownNodeType(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Division by zero yields 0.0.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => {
                if b == 0.0 {
                    0.0
                } else {
                    a / b
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Sin,
    Cos,
    Tan,
}

impl UnaryOp {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Tan => x.tan(),
        }
    }
}

/// Kind-specific state of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeBody {
    Time,
    Const { value: f64 },
    Binary(BinaryOp),
    Unary(UnaryOp),
    Display,
    Plot,
}

impl NodeBody {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeBody::Time => NodeKind::Time,
            NodeBody::Const { .. } => NodeKind::Const,
            NodeBody::Binary(BinaryOp::Add) => NodeKind::Add,
            NodeBody::Binary(BinaryOp::Sub) => NodeKind::Sub,
            NodeBody::Binary(BinaryOp::Mul) => NodeKind::Mul,
            NodeBody::Binary(BinaryOp::Div) => NodeKind::Div,
            NodeBody::Unary(UnaryOp::Sin) => NodeKind::Sin,
            NodeBody::Unary(UnaryOp::Cos) => NodeKind::Cos,
            NodeBody::Unary(UnaryOp::Tan) => NodeKind::Tan,
            NodeBody::Display => NodeKind::Display,
            NodeBody::Plot => NodeKind::Plot,
        }
    }

    fn from_kind(kind: NodeKind, value: f64) -> Self {
        match kind {
            NodeKind::Time => NodeBody::Time,
            NodeKind::Const => NodeBody::Const { value },
            NodeKind::Add => NodeBody::Binary(BinaryOp::Add),
            NodeKind::Sub => NodeBody::Binary(BinaryOp::Sub),
            NodeKind::Mul => NodeBody::Binary(BinaryOp::Mul),
            NodeKind::Div => NodeBody::Binary(BinaryOp::Div),
            NodeKind::Sin => NodeBody::Unary(UnaryOp::Sin),
            NodeKind::Cos => NodeBody::Unary(UnaryOp::Cos),
            NodeKind::Tan => NodeBody::Unary(UnaryOp::Tan),
            NodeKind::Display => NodeBody::Display,
            NodeKind::Plot => NodeBody::Plot,
        }
    }
}

/// Creation parameters for a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeParams {
    /// Initial value of a `Const` node.
    pub value: Option<f64>,
    /// Local defaults for the input slots, in slot order. Missing entries are 0.0.
    pub defaults: Vec<f64>,
}

impl NodeParams {
    pub fn constant(value: f64) -> Self {
        Self {
            value: Some(value),
            defaults: Vec::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: Vec<f64>) -> Self {
        self.defaults = defaults;
        self
    }

    pub(crate) fn validate(&self, kind: NodeKind) -> Result<(), GraphError> {
        if self.value.is_some() && kind != NodeKind::Const {
            return Err(GraphError::parameter(format!(
                "{} nodes have no constant value",
                kind
            )));
        }
        if self.defaults.len() > kind.arity() {
            return Err(GraphError::parameter(format!(
                "{} takes {} inputs, got {} defaults",
                kind,
                kind.arity(),
                self.defaults.len()
            )));
        }
        Ok(())
    }
}

/// A computational unit with fixed input/output slots.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: NodeId,
    body: NodeBody,
    inputs: Vec<AttrId>,
    output: Option<AttrId>,
    /// Value computed during the current tick.
    pub(crate) cached_value: Option<f64>,
    /// Last label text written for this node.
    pub(crate) label: Option<String>,
}

impl Node {
    /// Builds a node with fresh attribute ids for every slot of `kind`.
    pub(crate) fn new(kind: NodeKind, params: &NodeParams) -> Self {
        let inputs = (0..kind.arity()).map(|_| AttrId::new()).collect();
        let output = kind.has_output().then(AttrId::new);
        Self {
            id: NodeId::new(),
            body: NodeBody::from_kind(kind, params.value.unwrap_or(0.0)),
            inputs,
            output,
            cached_value: None,
            label: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.body.kind()
    }

    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn inputs(&self) -> &[AttrId] {
        &self.inputs
    }

    pub fn output(&self) -> Option<AttrId> {
        self.output
    }

    pub fn cached_value(&self) -> Option<f64> {
        self.cached_value
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The stored value of a `Const` node.
    pub fn constant(&self) -> Option<f64> {
        match self.body {
            NodeBody::Const { value } => Some(value),
            _ => None,
        }
    }

    pub(crate) fn set_constant(&mut self, new_value: f64) -> Result<(), GraphError> {
        match &mut self.body {
            NodeBody::Const { value } => {
                *value = new_value;
                Ok(())
            }
            other => Err(GraphError::parameter(format!(
                "{} node {} has no constant value",
                other.kind(),
                self.id
            ))),
        }
    }

    /// Every attribute owned by this node, inputs first.
    pub fn attributes(&self) -> impl Iterator<Item = AttrId> + '_ {
        self.inputs.iter().copied().chain(self.output)
    }
}
