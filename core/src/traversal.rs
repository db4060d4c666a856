use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::discovery::DiscoveryMap;
use crate::error::SearchError;
use crate::graph::{Graph, NodeId};
use crate::path::reconstruct;

/// Outcome of a completed (not cancelled) search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Start-to-target node sequence. Empty when the target is unreachable.
    pub path: Vec<NodeId>,
    /// Number of BFS waves expanded.
    pub waves: u32,
    /// Nodes claimed in the discovery map, start included.
    pub discovered: usize,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Edge count of the path, if one was found.
    pub fn hops(&self) -> Option<usize> {
        self.path.len().checked_sub(1)
    }
}

/// Parallel BFS engine bound to a fixed-size worker pool.
///
/// One engine can serve any number of searches, sequentially or concurrently;
/// each search owns its discovery map and frontier.
pub struct BfsEngine {
    pool: rayon::ThreadPool,
}

impl BfsEngine {
    /// Build an engine with `workers` threads. `None` or `Some(0)` uses one per CPU.
    pub fn new(workers: Option<usize>) -> Result<Self, SearchError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("sixdeg-bfs-{i}"));
        if let Some(n) = workers.filter(|&n| n > 0) {
            builder = builder.num_threads(n);
        }
        Ok(Self {
            pool: builder.build()?,
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn search(
        &self,
        graph: &Graph,
        start: NodeId,
        target: NodeId,
        cancel: &CancelToken,
    ) -> Result<SearchResult, SearchError> {
        self.pool.install(|| search(graph, start, target, cancel))
    }

    pub fn shortest_path(
        &self,
        graph: &Graph,
        start: NodeId,
        target: NodeId,
        cancel: &CancelToken,
    ) -> Result<Vec<NodeId>, SearchError> {
        self.search(graph, start, target, cancel).map(|r| r.path)
    }
}

/// Shortest path from `start` to `target` by edge count, on the current rayon pool.
///
/// Returns `[start]` when `start == target` and an empty path when the target
/// is unreachable. When several shortest paths exist, which one comes back
/// depends on worker scheduling; the length does not.
pub fn shortest_path(
    graph: &Graph,
    start: NodeId,
    target: NodeId,
    cancel: &CancelToken,
) -> Result<Vec<NodeId>, SearchError> {
    search(graph, start, target, cancel).map(|r| r.path)
}

/// Like [`shortest_path`], with wave and discovery counts.
pub fn search(
    graph: &Graph,
    start: NodeId,
    target: NodeId,
    cancel: &CancelToken,
) -> Result<SearchResult, SearchError> {
    debug!(from = start, to = target, "search started");
    let t = Instant::now();
    let expansion = expand(graph, start, target, cancel)?;
    let path = if expansion.found {
        reconstruct(&expansion.discovery, target)
    } else {
        Vec::new()
    };

    debug!(
        from = start,
        to = target,
        hops = path.len().saturating_sub(1),
        found = expansion.found,
        waves = expansion.waves,
        discovered = expansion.discovery.len(),
        elapsed_ms = t.elapsed().as_secs_f64() * 1000.0,
        "search finished"
    );

    Ok(SearchResult {
        path,
        waves: expansion.waves,
        discovered: expansion.discovery.len(),
    })
}

pub(crate) struct Expansion {
    pub discovery: DiscoveryMap,
    pub waves: u32,
    pub found: bool,
}

/// Run BFS waves until the target is claimed or the frontier drains.
///
/// Every node of wave n is expanded (in parallel) before any node of wave n+1;
/// the end of each `par_iter` is the barrier. The found flag only stops workers
/// from starting new expansions and enqueueing; a claim in progress always
/// completes, so every entry in the map has a full parent chain.
pub(crate) fn expand(
    graph: &Graph,
    start: NodeId,
    target: NodeId,
    cancel: &CancelToken,
) -> Result<Expansion, SearchError> {
    let discovery = DiscoveryMap::with_root(start);
    if start == target {
        return Ok(Expansion {
            discovery,
            waves: 0,
            found: true,
        });
    }

    let found = AtomicBool::new(false);
    let mut frontier: Vec<NodeId> = vec![start];
    let mut waves = 0u32;

    while !frontier.is_empty() && !found.load(Ordering::Acquire) {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled { waves });
        }
        waves += 1;

        let next = Mutex::new(Vec::new());
        frontier.par_iter().for_each(|&current| {
            if found.load(Ordering::Relaxed) || cancel.is_cancelled() {
                return;
            }
            let mut claimed = Vec::new();
            for &succ in graph.successors_of(current) {
                if !discovery.claim(succ, current) {
                    continue;
                }
                if succ == target {
                    found.store(true, Ordering::Release);
                } else if !found.load(Ordering::Relaxed) {
                    claimed.push(succ);
                }
            }
            if !claimed.is_empty() {
                next.lock().extend(claimed);
            }
        });

        frontier = next.into_inner();
        debug!(
            wave = waves,
            next_frontier = frontier.len(),
            discovered = discovery.len(),
            "wave expanded"
        );
    }

    let found = found.into_inner();
    if !found && cancel.is_cancelled() {
        // The last wave may have been cut short.
        return Err(SearchError::Cancelled { waves });
    }

    Ok(Expansion {
        discovery,
        waves,
        found,
    })
}

/// Single-threaded reference BFS. Same contract as [`shortest_path`] minus
/// cancellation; ties resolve to the lowest-index successor first.
pub fn shortest_path_sequential(graph: &Graph, start: NodeId, target: NodeId) -> Vec<NodeId> {
    if start == target {
        return vec![start];
    }

    // node → parent; the start node has no entry in `parents`.
    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for &succ in graph.successors_of(current) {
            if succ == start || parents.contains_key(&succ) {
                continue;
            }
            parents.insert(succ, current);
            if succ == target {
                let mut path = vec![target];
                let mut node = target;
                while node != start {
                    node = parents[&node];
                    path.push(node);
                }
                path.reverse();
                return path;
            }
            queue.push_back(succ);
        }
    }

    Vec::new()
}
