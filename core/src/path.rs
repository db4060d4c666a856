use crate::discovery::{Discovery, DiscoveryMap};
use crate::graph::NodeId;

/// Walk parent links from `target` back to the root and return the path in
/// root-to-target order.
///
/// Returns an empty path if `target` was never discovered. The walk is bounded
/// by the map size, so a corrupt map yields an empty path instead of looping.
pub fn reconstruct(discovery: &DiscoveryMap, target: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = target;

    for _ in 0..discovery.len() {
        match discovery.get(current) {
            Discovery::Unvisited => return Vec::new(),
            Discovery::Root => {
                path.push(current);
                path.reverse();
                return path;
            }
            Discovery::Parent(parent) => {
                path.push(current);
                current = parent;
            }
        }
    }

    tracing::warn!(node = target, "parent chain does not reach the root");
    Vec::new()
}
