//! Policy vocabulary shared by the fine and coarse tables.

use phf::phf_map;
use serde::{Deserialize, Serialize};

use super::{CoarsePolicy, FinePolicy, FlattenError};
use crate::parser::SyntaxKind;

/// How one grammar kind appears in a flattened table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Emit a node with a canonical tag, then visit the children.
    Transformed(&'static str),
    /// Emit an operator node carrying the operator symbol as its value.
    Operator(OperatorStyle),
    /// Emit a node tagged with the grammar's own kind name, then visit the children.
    Verbatim,
    /// Emit a tagged node with its value but none of its subtree.
    Leaf(&'static str),
    /// Emit nothing; the children attach to the caller instead.
    PassThrough,
    /// Emit nothing and skip the subtree.
    Drop,
}

/// Naming of operator nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorStyle {
    /// Tag is the canonical operator name, e.g. `add` for `+`.
    Semantic,
    /// Tag is fixed, e.g. `binaryop`.
    Symbolic(&'static str),
}

/// Fixed positions where the engine may open a synthetic group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Formal parameters of methods, constructors and records.
    Params,
    /// Parameters of a lambda.
    LambdaParams,
    /// Type parameters of methods and constructors.
    TypeParams,
    /// Members of a class, interface or record body.
    Members,
    /// Header of an `if`, loop or branch.
    Condition,
    /// Body of an anonymous class in an object creation.
    AnonymousBody,
    /// Type declared inside a block.
    LocalClass,
}

/// What a table does with a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Wrap the slot's children in a synthetic node with this tag.
    Group(&'static str),
    /// Attach the slot's children directly to the owner.
    Inline,
    /// Discard the slot's children.
    Drop,
}

/// A static mapping from grammar kinds and slots to policies.
///
/// Implementations hold no state and are shared across worker threads.
pub trait PolicyTable: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn policy(&self, kind: SyntaxKind) -> Policy;

    fn slot(&self, slot: Slot) -> SlotPolicy;

    /// Whether declaration nodes record their modifiers.
    fn keeps_modifiers(&self) -> bool;
}

/// Selects one of the built-in policy tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Fine,
    Coarse,
}

static FINE: FinePolicy = FinePolicy;
static COARSE: CoarsePolicy = CoarsePolicy;

impl Granularity {
    pub fn table(self) -> &'static dyn PolicyTable {
        match self {
            Granularity::Fine => &FINE,
            Granularity::Coarse => &COARSE,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Fine => write!(f, "fine"),
            Granularity::Coarse => write!(f, "coarse"),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fine" => Ok(Granularity::Fine),
            "coarse" => Ok(Granularity::Coarse),
            _ => Err(format!("unknown granularity: {} (expected fine or coarse)", s)),
        }
    }
}

/// Canonical names of binary operators.
static BINARY_OPERATORS: phf::Map<&'static str, &'static str> = phf_map! {
    "&&" => "and",
    "||" => "or",
    "+" => "add",
    "-" => "sub",
    "*" => "multiply",
    "/" => "divide",
    "<<" => "lshift",
    ">>" => "rshift",
    "|" => "bitor",
    "^" => "bitxor",
    "&" => "bitand",
    "==" => "equal",
    "!=" => "notequal",
    "<" => "lt",
    "<=" => "lte",
    ">" => "gt",
    ">=" => "gte",
    ">>>" => "unsignedrshift",
    "%" => "remainder",
};

/// Canonical names of unary and update operators.
static UNARY_OPERATORS: phf::Map<&'static str, &'static str> = phf_map! {
    "~" => "invert",
    "!" => "not",
    "+" => "uadd",
    "-" => "usub",
    "++" => "increment",
    "--" => "decrement",
};

pub fn canonical_binary(operator: &str) -> Result<&'static str, FlattenError> {
    BINARY_OPERATORS
        .get(operator)
        .copied()
        .ok_or_else(|| FlattenError::UnknownOperator {
            operator: operator.to_string(),
        })
}

pub fn canonical_unary(operator: &str) -> Result<&'static str, FlattenError> {
    UNARY_OPERATORS
        .get(operator)
        .copied()
        .ok_or_else(|| FlattenError::UnknownOperator {
            operator: operator.to_string(),
        })
}
