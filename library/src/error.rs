use thiserror::Error;

use crate::model::ids::{AttrId, LinkId, NodeId};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Link not found: {0}")]
    LinkNotFound(LinkId),
    #[error("Attribute not found: {0}")]
    AttributeNotFound(AttrId),
    #[error("Invalid link {from} -> {to}: {reason}")]
    InvalidLink {
        from: AttrId,
        to: AttrId,
        reason: String,
    },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Lock poisoned")]
    LockPoisoned,
}

impl GraphError {
    pub fn invalid_link(from: AttrId, to: AttrId, reason: impl Into<String>) -> Self {
        GraphError::InvalidLink {
            from,
            to,
            reason: reason.into(),
        }
    }

    pub fn parameter(msg: impl Into<String>) -> Self {
        GraphError::InvalidParameter(msg.into())
    }

    /// True for the stale-id family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::NodeNotFound(_)
                | GraphError::LinkNotFound(_)
                | GraphError::AttributeNotFound(_)
        )
    }
}

impl From<toml::de::Error> for GraphError {
    fn from(err: toml::de::Error) -> Self {
        GraphError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for GraphError {
    fn from(err: toml::ser::Error) -> Self {
        GraphError::Config(err.to_string())
    }
}

/// Conditions reported by a tick. None of them stop the tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Cycle detected at node {node}")]
    Cycle { node: NodeId },
    #[error("Node {node} could not be evaluated: {reason}")]
    Unresolved { node: NodeId, reason: String },
}

impl EvaluationError {
    pub fn node(&self) -> NodeId {
        match self {
            EvaluationError::Cycle { node } | EvaluationError::Unresolved { node, .. } => *node,
        }
    }
}
