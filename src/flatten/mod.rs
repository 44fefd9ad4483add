//! Flattening of tree-sitter syntax trees into ID-indexed node tables.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ ParsedSource │────▶│ Flattener    │────▶│ NodeTable     │
//! └──────────────┘     │ (engine.rs)  │     │ (FlatNode[])  │
//!                      └──────────────┘     └───────────────┘
//!                             ▲
//!                             │ policy(kind), slot(slot)
//!                      ┌──────────────┐
//!                      │ PolicyTable  │
//!                      │ (fine/coarse)│
//!                      └──────────────┘
//! ```
//!
//! A node is appended to the table when it is entered, before any of its
//! children are visited, so every child ID is strictly greater than its
//! parent's and the table can be rebuilt into a tree in one linear scan.

mod coarse;
mod engine;
mod fine;
mod policy;

pub use coarse::CoarsePolicy;
pub use engine::{flatten, MAX_DEPTH};
pub use fine::FinePolicy;
pub use policy::{
    canonical_binary, canonical_unary, Granularity, OperatorStyle, Policy, PolicyTable, Slot,
    SlotPolicy,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while flattening a syntax tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    #[error("policy gap: no policy for grammar kind `{kind}`")]
    PolicyGap { kind: String },
    #[error("policy gap: no canonical name for operator `{operator}`")]
    UnknownOperator { operator: String },
    #[error("syntax tree nested deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("malformed `{kind}` node: {detail}")]
    Malformed { kind: &'static str, detail: String },
}

impl FlattenError {
    /// Whether the error points at a hole in the policy tables rather than
    /// at the input.
    pub fn is_policy_gap(&self) -> bool {
        matches!(
            self,
            FlattenError::PolicyGap { .. } | FlattenError::UnknownOperator { .. }
        )
    }
}

/// One record of a flattened tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatNode {
    /// Position of this node in its table.
    pub id: usize,
    /// Canonical tag or grammar kind name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Literal text, identifier name or operator symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// IDs of the direct semantic children, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
    /// Declaration modifiers, e.g. "public static".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<String>,
}

impl FlatNode {
    pub fn new(id: usize, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            value: None,
            children: Vec::new(),
            modifiers: None,
        }
    }
}

/// Invariant violations found by [`NodeTable::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table is empty")]
    Empty,
    #[error("root node has kind `{0}`, expected `root`")]
    RootKind(String),
    #[error("node at index {index} has id {id}")]
    IdMismatch { index: usize, id: usize },
    #[error("node {parent} references earlier node {child}")]
    BackwardReference { parent: usize, child: usize },
    #[error("node {parent} references missing node {child}")]
    DanglingChild { parent: usize, child: usize },
}

/// The flattened form of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTable {
    nodes: Vec<FlatNode>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    pub fn get(&self, id: usize) -> Option<&FlatNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&FlatNode> {
        self.nodes.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlatNode> {
        self.nodes.iter()
    }

    /// Children of `id` resolved to their records.
    pub fn children_of(&self, id: usize) -> Vec<&FlatNode> {
        self.get(id)
            .map(|n| n.children.iter().filter_map(|c| self.get(*c)).collect())
            .unwrap_or_default()
    }

    /// Append a node and return its ID.
    pub(crate) fn push(&mut self, kind: impl Into<String>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(FlatNode::new(id, kind));
        id
    }

    pub(crate) fn node_mut(&mut self, id: usize) -> &mut FlatNode {
        &mut self.nodes[id]
    }

    /// Serialize as a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Check the root, ID and forward-reference invariants.
    pub fn validate(&self) -> Result<(), TableError> {
        let root = self.nodes.first().ok_or(TableError::Empty)?;
        if root.kind != "root" {
            return Err(TableError::RootKind(root.kind.clone()));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.id != index {
                return Err(TableError::IdMismatch { index, id: node.id });
            }
            for &child in &node.children {
                if child <= node.id {
                    return Err(TableError::BackwardReference {
                        parent: node.id,
                        child,
                    });
                }
                if child >= self.nodes.len() {
                    return Err(TableError::DanglingChild {
                        parent: node.id,
                        child,
                    });
                }
            }
        }

        Ok(())
    }
}

impl IntoIterator for NodeTable {
    type Item = FlatNode;
    type IntoIter = std::vec::IntoIter<FlatNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeTable {
    type Item = &'a FlatNode;
    type IntoIter = std::slice::Iter<'a, FlatNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl From<Vec<FlatNode>> for NodeTable {
    fn from(nodes: Vec<FlatNode>) -> Self {
        Self { nodes }
    }
}
