//! Error types for sixdeg-core.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which input a load error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Nodes,
    Adjacency,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Nodes => f.write_str("node-name"),
            SourceKind::Adjacency => f.write_str("adjacency"),
        }
    }
}

/// Errors raised while building the graph store. All of them are fatal to start-up.
#[derive(Error, Debug)]
pub enum GraphError {
    /// A required input could not be opened.
    #[error("cannot open {kind} source {}: {source}", path.display())]
    SourceUnreadable {
        kind: SourceKind,
        path: PathBuf,
        source: io::Error,
    },

    /// The input opened but reading it failed part-way.
    #[error("failed reading {kind} source: {source}")]
    Read { kind: SourceKind, source: io::Error },

    /// More names than fit in the 32-bit id space.
    #[error("node table exceeds the maximum of {max} nodes")]
    TooManyNodes { max: u64 },
}

/// Which side of a search an endpoint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Start,
    Target,
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRole::Start => f.write_str("start"),
            EndpointRole::Target => f.write_str("target"),
        }
    }
}

/// Per-search failures. None of these should take the process down.
///
/// "No path" is not an error: see [`crate::shortest_path`] and [`crate::find_path`].
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{role} node '{query}' not found")]
    UnknownEndpoint { role: EndpointRole, query: String },

    #[error("search cancelled after {waves} waves")]
    Cancelled { waves: u32 },

    #[error("failed to build BFS worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
