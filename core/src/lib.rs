//! sixdeg-core: in-memory link graph and parallel shortest-path engine.
//!
//! Loads a page graph (one name per line plus a compact adjacency listing)
//! into an immutable store, then answers "fewest clicks from A to B" queries
//! with a wave-synchronized parallel BFS. The store is read-only after load
//! and can be shared by any number of concurrent searches.
//!
//! No console output and no subprocesses here; the `sixdeg` binary does that.

mod cancel;
mod discovery;
mod error;
mod graph;
mod load;
mod lookup;
mod path;
mod resolve;
mod traversal;

pub use cancel::CancelToken;
pub use discovery::{Discovery, DiscoveryMap};
pub use error::{EndpointRole, GraphError, SearchError, SourceKind};
pub use graph::{Adjacency, Graph, NodeId, NodeTable};
pub use load::{
    load_adjacency, load_adjacency_from_path, load_graph, load_nodes, load_nodes_from_path,
    LoadOptions, LoadReport, MalformedPolicy,
};
pub use lookup::{find_path, resolve_endpoint, PathStep};
pub use path::reconstruct;
pub use resolve::{Resolver, TitleResolver};
pub use traversal::{
    search, shortest_path, shortest_path_sequential, BfsEngine, SearchResult,
};
