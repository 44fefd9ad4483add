//! astcorpus - Java corpus to flattened syntax tree tables.
//!
//! Every source file is parsed with tree-sitter and flattened into a
//! `NodeTable`: a pre-order list of nodes in which each node refers to its
//! children by table index. A run over a corpus writes one table per
//! accepted file plus the paired path index and a list of failures.
//!
//! # Architecture
//!
//! - `parser`: tree-sitter adapter with whole-file and member-only modes
//! - `flatten`: policy tables (fine, coarse) and the flattening engine
//! - `corpus`: discovery, parallel processing and the output streams
//! - `config`: YAML run configuration
//! - `cli`: the `astcorpus` command
//!
//! # Adding a Policy Table
//!
//! Implement `PolicyTable` (see `src/flatten/fine.rs`); its `match` over
//! `SyntaxKind` must be exhaustive, so new grammar kinds cannot be missed.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod flatten;
pub mod parser;

pub use config::CorpusConfig;
pub use corpus::{CorpusOutcome, CorpusRunner, NodeBounds, OutputSink, RunSummary};
pub use flatten::{flatten, FlatNode, FlattenError, Granularity, NodeTable, PolicyTable};
pub use parser::{ParseError, ParseMode, ParsedSource, SourceParser, SyntaxKind};
