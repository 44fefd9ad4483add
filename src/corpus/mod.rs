//! Corpus-scale processing.
//!
//! This module provides:
//! - `discover`: expands an input pattern into a sorted file list
//! - `CorpusRunner`: flattens files on a rayon pool and filters by size
//! - `OutputSink`: the accepted JSON, accepted index and failed streams

mod discover;
mod runner;
mod sink;

pub use discover::{discover, Discovery, DiscoveryError};
pub use runner::{CorpusRunner, WORKER_STACK_SIZE};
pub use sink::{OutputPaths, OutputSink};

use std::path::PathBuf;

use thiserror::Error;

use crate::flatten::{FlattenError, NodeTable};
use crate::parser::ParseError;

/// Why a single file was rejected. Never aborts a run.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Flatten(#[from] FlattenError),
    #[error("too few nodes")]
    TooFewNodes { count: usize },
    #[error("too many nodes")]
    TooManyNodes { count: usize },
}

/// Errors that abort a corpus run.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("cannot create output file {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
    #[error("failed to serialize node table: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Accepted table sizes: `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for NodeBounds {
    fn default() -> Self {
        Self {
            min: 20,
            max: 30_000,
        }
    }
}

impl NodeBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn check(&self, count: usize) -> Result<(), FileError> {
        if count < self.min {
            Err(FileError::TooFewNodes { count })
        } else if count >= self.max {
            Err(FileError::TooManyNodes { count })
        } else {
            Ok(())
        }
    }
}

/// The result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusOutcome {
    Accepted { path: String, table: NodeTable },
    Rejected { path: String, reason: String },
}

/// Counts of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejected: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}
