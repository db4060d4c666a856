use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::graph::NodeId;

const SHARD_BITS: u32 = 6;
const SHARDS: usize = 1 << SHARD_BITS;

/// State of one node in a search's discovery map.
///
/// `Root` is its own variant rather than a reserved id, so a real parent with
/// id 0 (a coerced malformed token) can never be mistaken for the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    Unvisited,
    Root,
    Parent(NodeId),
}

/// Per-search map from node to the node it was first reached from.
///
/// Sharded by id so concurrent claims on different nodes rarely contend.
/// Each entry is written at most once: [`claim`](Self::claim) is an
/// insert-if-absent under the shard lock and never overwrites.
pub struct DiscoveryMap {
    shards: Box<[Mutex<HashMap<NodeId, Discovery>>]>,
    len: AtomicUsize,
}

impl DiscoveryMap {
    /// A fresh map containing only `root`.
    pub fn with_root(root: NodeId) -> Self {
        let shards = (0..SHARDS).map(|_| Mutex::new(HashMap::new())).collect();
        let map = Self {
            shards,
            len: AtomicUsize::new(1),
        };
        map.shard(root).lock().insert(root, Discovery::Root);
        map
    }

    fn shard(&self, id: NodeId) -> &Mutex<HashMap<NodeId, Discovery>> {
        // Fibonacci hashing; dense ids would otherwise stripe by low bits.
        let h = id.wrapping_mul(0x9E37_79B9) >> (NodeId::BITS - SHARD_BITS);
        &self.shards[h as usize]
    }

    /// Record `parent` as the parent of `node` unless `node` is already claimed.
    ///
    /// Returns true for exactly one caller per node over the map's lifetime.
    pub fn claim(&self, node: NodeId, parent: NodeId) -> bool {
        let mut shard = self.shard(node).lock();
        if shard.contains_key(&node) {
            return false;
        }
        shard.insert(node, Discovery::Parent(parent));
        self.len.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn get(&self, node: NodeId) -> Discovery {
        self.shard(node)
            .lock()
            .get(&node)
            .copied()
            .unwrap_or(Discovery::Unvisited)
    }

    /// Number of discovered nodes, root included.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
