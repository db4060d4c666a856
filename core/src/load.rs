//! Flat-file loaders for the node table and the adjacency relation.
//!
//! Node source: one name per line, line n (1-based) is node id n.
//!
//! Adjacency source: whitespace-separated tokens. A token ending in `:` sets
//! the current source id, plain integer tokens after it are that source's
//! successors, in order:
//!
//! ```text
//! 1: 2 3
//! 2: 4
//! 3: 4
//! ```
//!
//! Both readers stream line by line and never hold more than one line of raw
//! input at a time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::{GraphError, SourceKind};
use crate::graph::{Adjacency, Graph, NodeId, NodeTable};

const READ_BUFFER: usize = 1 << 20;

/// What to do with adjacency tokens that are not clean integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Parse leading digits like C `atoi`; no digits (or out of range) gives 0.
    /// Compatible with the historical data dumps, at the cost of spurious
    /// edges into id 0.
    #[default]
    CoerceToZero,
    /// Skip malformed successors. A malformed header discards its successors
    /// up to the next header.
    Drop,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub malformed: MalformedPolicy,
}

/// Summary of a full graph load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub nodes: usize,
    pub edges: usize,
    pub sources: usize,
    pub malformed: usize,
    pub duplicates: usize,
    pub nodes_elapsed: Duration,
    pub adjacency_elapsed: Duration,
    pub elapsed: Duration,
}

fn open(path: &Path, kind: SourceKind) -> Result<BufReader<File>, GraphError> {
    let file = File::open(path).map_err(|source| GraphError::SourceUnreadable {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::with_capacity(READ_BUFFER, file))
}

/// Read a newline-delimited name list. An empty source gives an empty table.
pub fn load_nodes<R: BufRead>(mut reader: R) -> Result<NodeTable, GraphError> {
    let mut table = NodeTable::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .map_err(|source| GraphError::Read {
                kind: SourceKind::Nodes,
                source,
            })?;
        if n == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if table.len() >= NodeId::MAX as usize - 1 {
            return Err(GraphError::TooManyNodes {
                max: NodeId::MAX as u64 - 1,
            });
        }
        table.push(String::from_utf8_lossy(&line).into_owned());
    }

    Ok(table)
}

pub fn load_nodes_from_path(path: impl AsRef<Path>) -> Result<NodeTable, GraphError> {
    load_nodes(open(path.as_ref(), SourceKind::Nodes)?)
}

/// Best-effort integer parse. Returns the value and whether the token was a clean integer.
fn parse_id(token: &[u8]) -> (NodeId, bool) {
    let digits = token.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return (0, false);
    }
    let mut value: u64 = 0;
    for &b in &token[..digits] {
        value = value * 10 + (b - b'0') as u64;
        if value > NodeId::MAX as u64 {
            return (0, false);
        }
    }
    (value as NodeId, digits == token.len())
}

/// Stream the adjacency relation.
pub fn load_adjacency<R: BufRead>(
    mut reader: R,
    options: &LoadOptions,
) -> Result<Adjacency, GraphError> {
    let mut adjacency = Adjacency::new();
    let mut line = Vec::new();

    let mut current: Option<NodeId> = match options.malformed {
        MalformedPolicy::CoerceToZero => Some(0),
        MalformedPolicy::Drop => None,
    };

    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .map_err(|source| GraphError::Read {
                kind: SourceKind::Adjacency,
                source,
            })?;
        if n == 0 {
            break;
        }

        for token in line
            .split(|b| b.is_ascii_whitespace())
            .filter(|t| !t.is_empty())
        {
            if let Some(head) = token.strip_suffix(b":") {
                let (id, clean) = parse_id(head);
                if !clean {
                    adjacency.malformed += 1;
                }
                current = match (clean, options.malformed) {
                    (false, MalformedPolicy::Drop) => None,
                    _ => Some(id),
                };
                if let Some(source) = current {
                    adjacency.touch(source);
                }
                continue;
            }

            let (id, clean) = parse_id(token);
            match current {
                Some(source) if clean => adjacency.push(source, id),
                Some(source) => {
                    adjacency.malformed += 1;
                    if options.malformed == MalformedPolicy::CoerceToZero {
                        adjacency.push(source, id);
                    }
                }
                None => adjacency.malformed += 1,
            }
        }
    }

    Ok(adjacency)
}

pub fn load_adjacency_from_path(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<Adjacency, GraphError> {
    load_adjacency(open(path.as_ref(), SourceKind::Adjacency)?, options)
}

/// Load both sources concurrently and assemble the graph store.
pub fn load_graph(
    nodes_path: impl AsRef<Path>,
    adjacency_path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<(Graph, LoadReport), GraphError> {
    let nodes_path = nodes_path.as_ref();
    let adjacency_path = adjacency_path.as_ref();
    let start = Instant::now();

    let (nodes, adjacency) = rayon::join(
        || {
            let t = Instant::now();
            load_nodes_from_path(nodes_path).map(|table| (table, t.elapsed()))
        },
        || {
            let t = Instant::now();
            load_adjacency_from_path(adjacency_path, options).map(|adj| (adj, t.elapsed()))
        },
    );
    let (nodes, nodes_elapsed) = nodes?;
    let (adjacency, adjacency_elapsed) = adjacency?;

    info!(
        path = %nodes_path.display(),
        nodes = nodes.len(),
        elapsed_ms = nodes_elapsed.as_millis() as u64,
        "loaded node table"
    );
    info!(
        path = %adjacency_path.display(),
        edges = adjacency.edge_count(),
        sources = adjacency.source_count(),
        elapsed_ms = adjacency_elapsed.as_millis() as u64,
        "loaded adjacency"
    );
    if nodes.duplicates > 0 {
        warn!(duplicates = nodes.duplicates, "duplicate node names; first occurrence wins");
    }
    if adjacency.malformed > 0 {
        warn!(
            malformed = adjacency.malformed,
            policy = ?options.malformed,
            "malformed adjacency tokens"
        );
    }

    let report = LoadReport {
        nodes: nodes.len(),
        edges: adjacency.edge_count(),
        sources: adjacency.source_count(),
        malformed: adjacency.malformed,
        duplicates: nodes.duplicates,
        nodes_elapsed,
        adjacency_elapsed,
        elapsed: start.elapsed(),
    };

    Ok((Graph::from_parts(nodes, adjacency), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn adjacency(text: &str, malformed: MalformedPolicy) -> Adjacency {
        load_adjacency(Cursor::new(text), &LoadOptions { malformed }).unwrap()
    }

    fn graph(names: &str, links: &str) -> Graph {
        Graph::from_parts(
            load_nodes(Cursor::new(names)).unwrap(),
            adjacency(links, MalformedPolicy::CoerceToZero),
        )
    }

    #[test]
    fn test_nodes_line_numbers_are_ids() {
        let g = graph("A\nB\nC\nD\n", "");
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.id_of("A"), Some(1));
        assert_eq!(g.id_of("C"), Some(3));
        assert_eq!(g.name_of(4), Some("D"));
    }

    #[test]
    fn test_nodes_without_trailing_newline() {
        let table = load_nodes(Cursor::new("A\nB")).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_nodes_crlf_stripped() {
        let g = graph("Alpha\r\nBeta\r\n", "");
        assert_eq!(g.id_of("Alpha"), Some(1));
        assert_eq!(g.id_of("Beta"), Some(2));
    }

    #[test]
    fn test_nodes_blank_line_is_a_node() {
        let g = graph("A\n\nC\n", "");
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.name_of(2), Some(""));
        assert_eq!(g.id_of("C"), Some(3));
    }

    #[test]
    fn test_nodes_empty_source() {
        let table = load_nodes(Cursor::new("")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_nodes_invalid_utf8_is_lossy() {
        let table = load_nodes(Cursor::new(b"ok\n\xff\xfe\n".to_vec())).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_adjacency_basic() {
        let g = graph("A\nB\nC\nD\n", "1: 2 3\n2: 4\n3: 4\n");
        assert_eq!(g.successors_of(1), &[2, 3]);
        assert_eq!(g.successors_of(2), &[4]);
        assert_eq!(g.successors_of(3), &[4]);
        assert!(g.successors_of(4).is_empty());
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.malformed_tokens(), 0);
    }

    #[test]
    fn test_adjacency_header_has_no_implicit_self_edge() {
        let adj = adjacency("7:\n", MalformedPolicy::CoerceToZero);
        assert_eq!(adj.edge_count(), 0);
        assert_eq!(adj.source_count(), 1);
    }

    #[test]
    fn test_adjacency_tokens_span_lines() {
        // Successors keep attaching to the last header regardless of line breaks.
        let g = graph("A\nB\nC\n", "1: 2\n3\n2:\n1");
        assert_eq!(g.successors_of(1), &[2, 3]);
        assert_eq!(g.successors_of(2), &[1]);
    }

    #[test]
    fn test_adjacency_duplicates_and_self_loops_kept() {
        let g = graph("A\nB\n", "1: 1 2 2\n");
        assert_eq!(g.successors_of(1), &[1, 2, 2]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn test_adjacency_malformed_coerced_to_zero() {
        let adj = adjacency("1: 2 abc 3x\n", MalformedPolicy::CoerceToZero);
        let g = Graph::from_parts(NodeTable::new(), adj);
        assert_eq!(g.successors_of(1), &[2, 0, 3]);
        assert_eq!(g.malformed_tokens(), 2);
    }

    #[test]
    fn test_adjacency_malformed_dropped() {
        let adj = adjacency("1: 2 abc 3x 4\nzz: 5 6\n2: 1\n", MalformedPolicy::Drop);
        let g = Graph::from_parts(NodeTable::new(), adj);
        assert_eq!(g.successors_of(1), &[2, 4]);
        assert_eq!(g.successors_of(2), &[1]);
        assert!(g.successors_of(0).is_empty());
        // abc, 3x, zz:, and the two successors orphaned by zz:
        assert_eq!(g.malformed_tokens(), 5);
    }

    #[test]
    fn test_adjacency_successors_before_header() {
        let coerced = adjacency("5 6\n1: 2\n", MalformedPolicy::CoerceToZero);
        let g = Graph::from_parts(NodeTable::new(), coerced);
        assert_eq!(g.successors_of(0), &[5, 6]);

        let dropped = adjacency("5 6\n1: 2\n", MalformedPolicy::Drop);
        assert_eq!(dropped.edge_count(), 1);
        assert_eq!(dropped.malformed, 2);
    }

    #[test]
    fn test_adjacency_out_of_range_is_malformed() {
        let adj = adjacency("1: 99999999999\n", MalformedPolicy::CoerceToZero);
        let g = Graph::from_parts(NodeTable::new(), adj);
        assert_eq!(g.successors_of(1), &[0]);
        assert_eq!(g.malformed_tokens(), 1);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(b"42"), (42, true));
        assert_eq!(parse_id(b"42abc"), (42, false));
        assert_eq!(parse_id(b"-3"), (0, false));
        assert_eq!(parse_id(b""), (0, false));
        assert_eq!(parse_id(b"4294967295"), (4_294_967_295, true));
        assert_eq!(parse_id(b"4294967296"), (0, false));
    }

    #[test]
    fn test_load_graph_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let titles = dir.path().join("titles-sorted");
        let links = dir.path().join("links-simple-sorted");
        let mut f = File::create(&titles).unwrap();
        writeln!(f, "Rust\nCargo\nCrate").unwrap();
        let mut f = File::create(&links).unwrap();
        writeln!(f, "1: 2\n2: 3").unwrap();

        let (g, report) = load_graph(&titles, &links, &LoadOptions::default()).unwrap();
        assert_eq!(report.nodes, 3);
        assert_eq!(report.edges, 2);
        assert_eq!(report.sources, 2);
        assert_eq!(g.successors_of(2), &[3]);
    }

    #[test]
    fn test_missing_source_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let titles = dir.path().join("titles-sorted");
        File::create(&titles).unwrap();
        let err = load_graph(&titles, dir.path().join("nope"), &LoadOptions::default())
            .unwrap_err();
        match err {
            GraphError::SourceUnreadable { kind, .. } => assert_eq!(kind, SourceKind::Adjacency),
            other => panic!("unexpected error: {other}"),
        }
    }
}
