use proptest::prelude::*;
use sixdeg_core::{
    search, shortest_path, shortest_path_sequential, BfsEngine, CancelToken, Graph, NodeId,
};

fn arb_graph() -> impl Strategy<Value = Graph> {
    (1u32..=40).prop_flat_map(|n| {
        prop::collection::vec((1..=n, 1..=n), 0..(n as usize * 4)).prop_map(move |edges| {
            let mut g = Graph::with_capacity(n as usize, n as usize);
            for i in 1..=n {
                g.add_node(format!("page_{i}"));
            }
            for (from, to) in edges {
                g.add_edge(from, to);
            }
            g
        })
    })
}

fn arb_query() -> impl Strategy<Value = (Graph, NodeId, NodeId)> {
    arb_graph().prop_flat_map(|g| {
        let n = g.node_count() as NodeId;
        (Just(g), 1..=n, 1..=n)
    })
}

fn is_edge_path(g: &Graph, path: &[NodeId]) -> bool {
    path.windows(2)
        .all(|pair| g.successors_of(pair[0]).contains(&pair[1]))
}

proptest! {
    #[test]
    fn prop_parallel_matches_reference_length((g, start, target) in arb_query()) {
        let engine = BfsEngine::new(Some(4)).unwrap();
        let par = engine.shortest_path(&g, start, target, &CancelToken::new()).unwrap();
        let seq = shortest_path_sequential(&g, start, target);
        prop_assert_eq!(par.len(), seq.len());
    }

    #[test]
    fn prop_found_path_is_valid((g, start, target) in arb_query()) {
        let path = shortest_path(&g, start, target, &CancelToken::new()).unwrap();
        if !path.is_empty() {
            prop_assert_eq!(path[0], start);
            prop_assert_eq!(*path.last().unwrap(), target);
            prop_assert!(is_edge_path(&g, &path));
        }
    }

    #[test]
    fn prop_self_path_is_single_node((g, start, _target) in arb_query()) {
        let path = shortest_path(&g, start, start, &CancelToken::new()).unwrap();
        prop_assert_eq!(path, vec![start]);
    }

    #[test]
    fn prop_repeat_search_same_length((g, start, target) in arb_query()) {
        let first = search(&g, start, target, &CancelToken::new()).unwrap();
        let second = search(&g, start, target, &CancelToken::new()).unwrap();
        prop_assert_eq!(first.path.len(), second.path.len());
        prop_assert_eq!(first.hops(), second.hops());
    }
}

/// Layered graph where every node links to every node of the next layer, so
/// each node is contested by a full layer of parents at once.
fn fan_in(layers: u32, width: u32) -> Graph {
    let mut g = Graph::new();
    let root = g.add_node("root");
    let mut prev = vec![root];
    for layer in 0..layers {
        let ids: Vec<NodeId> = (0..width)
            .map(|i| g.add_node(format!("l{layer}_{i}")))
            .collect();
        for &p in &prev {
            for &c in &ids {
                g.add_edge(p, c);
            }
        }
        prev = ids;
    }
    let sink = g.add_node("sink");
    for &p in &prev {
        g.add_edge(p, sink);
    }
    g
}

#[test]
fn heavy_fan_in_paths_stay_consistent() {
    let g = fan_in(6, 64);
    let sink = g.id_of("sink").unwrap();
    let engine = BfsEngine::new(Some(16)).unwrap();

    for _ in 0..25 {
        let result = engine.search(&g, 1, sink, &CancelToken::new()).unwrap();
        assert_eq!(result.hops(), Some(7));
        assert!(is_edge_path(&g, &result.path));
        assert_eq!(result.path[0], 1);
    }
}

#[test]
fn concurrent_searches_share_one_graph() {
    let g = fan_in(4, 32);
    let sink = g.id_of("sink").unwrap();
    let engine = BfsEngine::new(Some(4)).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| engine.shortest_path(&g, 1, sink, &CancelToken::new())))
            .collect();
        for h in handles {
            let path = h.join().unwrap().unwrap();
            assert_eq!(path.len(), 6);
        }
    });
}
