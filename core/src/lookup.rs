use crate::cancel::CancelToken;
use crate::error::{EndpointRole, SearchError};
use crate::graph::{Graph, NodeId};
use crate::traversal::BfsEngine;

/// A single node on a named path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub node_id: NodeId,
    /// Empty for ids outside the node table (e.g. coerced malformed links).
    pub name: String,
}

/// Resolve an endpoint given by name or by numeric id.
///
/// Names win: a page literally titled "1984" resolves by name, not as id 1984.
pub fn resolve_endpoint(
    graph: &Graph,
    role: EndpointRole,
    query: &str,
) -> Result<NodeId, SearchError> {
    graph
        .id_of(query)
        .or_else(|| {
            query
                .parse::<NodeId>()
                .ok()
                .filter(|&id| graph.contains(id))
        })
        .ok_or_else(|| SearchError::UnknownEndpoint {
            role,
            query: query.to_string(),
        })
}

/// Shortest path between two endpoints given by name or id.
///
/// `Ok(None)` means the target is unreachable. Unknown endpoints fail before
/// any traversal starts.
pub fn find_path(
    engine: &BfsEngine,
    graph: &Graph,
    start: &str,
    target: &str,
    cancel: &CancelToken,
) -> Result<Option<Vec<PathStep>>, SearchError> {
    let start_id = resolve_endpoint(graph, EndpointRole::Start, start)?;
    let target_id = resolve_endpoint(graph, EndpointRole::Target, target)?;

    let path = engine.shortest_path(graph, start_id, target_id, cancel)?;
    if path.is_empty() {
        return Ok(None);
    }

    Ok(Some(
        path.into_iter()
            .map(|node_id| PathStep {
                node_id,
                name: graph.name_of(node_id).unwrap_or_default().to_string(),
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph {
        let mut g = Graph::new();
        for name in ["A", "B", "C", "D", "E", "3"] {
            g.add_node(name);
        }
        g.add_edge(1, 2);
        g.add_edge(1, 3);
        g.add_edge(2, 4);
        g.add_edge(3, 4);
        g
    }

    #[test]
    fn test_resolve_by_name_then_id() {
        let g = diamond();
        assert_eq!(resolve_endpoint(&g, EndpointRole::Start, "B").unwrap(), 2);
        assert_eq!(resolve_endpoint(&g, EndpointRole::Start, "4").unwrap(), 4);
        // Node 6 is named "3".
        assert_eq!(resolve_endpoint(&g, EndpointRole::Start, "3").unwrap(), 6);
    }

    #[test]
    fn test_resolve_rejects_unknown_and_out_of_range() {
        let g = diamond();
        for query in ["Z", "0", "7", "-1", ""] {
            let err = resolve_endpoint(&g, EndpointRole::Target, query).unwrap_err();
            assert!(
                matches!(err, SearchError::UnknownEndpoint { role: EndpointRole::Target, .. }),
                "{query}"
            );
        }
    }

    #[test]
    fn test_find_path_named() {
        let g = diamond();
        let engine = BfsEngine::new(Some(2)).unwrap();
        let path = find_path(&engine, &g, "A", "D", &CancelToken::new())
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].name, "A");
        assert_eq!(path[2].name, "D");
    }

    #[test]
    fn test_find_path_unreachable() {
        let g = diamond();
        let engine = BfsEngine::new(Some(2)).unwrap();
        assert_eq!(find_path(&engine, &g, "A", "E", &CancelToken::new()).unwrap(), None);
    }

    #[test]
    fn test_find_path_unknown_start() {
        let g = diamond();
        let engine = BfsEngine::new(Some(2)).unwrap();
        let err = find_path(&engine, &g, "Nope", "D", &CancelToken::new()).unwrap_err();
        assert!(matches!(err, SearchError::UnknownEndpoint { role: EndpointRole::Start, .. }));
    }
}
