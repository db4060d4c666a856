use sixdeg_core::{shortest_path_sequential, BfsEngine, CancelToken, Graph, NodeId, SearchResult};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(2_000_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: sixdeg-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  lsystem     Fractal branching tree (deep paths)");
        println!("  scalefree   Preferential attachment via edge sampling (hub-and-spoke)");
        println!("  random      Erdos-Renyi uniform random links");
        println!("  barbell     Two dense clusters joined by a thin chain");
        println!();
        println!("Default node_count: 2000000");
        return ExitCode::SUCCESS;
    }

    if node_count < 32 {
        eprintln!("node_count must be at least 32");
        return ExitCode::FAILURE;
    }

    println!("sixdeg-bench");
    println!("============");
    println!();

    let generators: Vec<(&str, fn(u32) -> Graph)> = match mode {
        "lsystem" => vec![("L-system tree", gen_lsystem)],
        "scalefree" => vec![("Scale-free (edge sampling)", gen_scale_free)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "barbell" => vec![("Barbell (cluster-chain-cluster)", gen_barbell)],
        "all" => vec![
            ("L-system tree", gen_lsystem as fn(u32) -> Graph),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (cluster-chain-cluster)", gen_barbell),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return ExitCode::FAILURE;
        }
    };

    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let mut worker_counts = vec![1, 2, 4, cpus];
    worker_counts.sort_unstable();
    worker_counts.dedup();

    let engines: Vec<BfsEngine> = worker_counts
        .iter()
        .filter_map(|&n| match BfsEngine::new(Some(n)) {
            Ok(engine) => Some(engine),
            Err(e) => {
                eprintln!("skipping {} workers: {}", n, e);
                None
            }
        })
        .collect();

    let mut mismatches = 0;
    for (name, generator) in generators {
        mismatches += run_benchmark(name, generator, node_count, &engines);
    }

    if mismatches > 0 {
        eprintln!("{} run(s) disagreed with the sequential hop count", mismatches);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Returns the number of parallel runs whose hop count differs from the
/// sequential reference.
fn run_benchmark(
    name: &str,
    generator: fn(u32) -> Graph,
    node_count: u32,
    engines: &[BfsEngine],
) -> usize {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let graph = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} nodes, {} links, ~{:.0}MB",
        gen_time.as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );

    // First page to last page: the deepest pair for the tree-shaped generators.
    let start: NodeId = 1;
    let target = graph.node_count() as NodeId;

    let t = Instant::now();
    let reference = shortest_path_sequential(&graph, start, target);
    let seq_time = t.elapsed();
    let hops = reference.len().checked_sub(1);

    println!();
    println!("{:>10} {:>8} {:>10} {:>12}", "workers", "hops", "waves", "time");
    println!("{:->10} {:->8} {:->10} {:->12}", "", "", "", "");
    println!(
        "{:>10} {:>8} {:>10} {:>10.1}ms",
        "sequential",
        fmt_hops(hops),
        "-",
        seq_time.as_secs_f64() * 1000.0
    );

    let mut mismatches = 0;
    for engine in engines {
        let t = Instant::now();
        let result = engine.search(&graph, start, target, &CancelToken::new());
        let elapsed = t.elapsed();
        match result {
            Ok(r) => {
                let marker = if hops_match(hops, &r) {
                    ""
                } else {
                    mismatches += 1;
                    "  MISMATCH"
                };
                println!(
                    "{:>10} {:>8} {:>10} {:>10.1}ms{}",
                    engine.workers(),
                    fmt_hops(r.hops()),
                    r.waves,
                    elapsed.as_secs_f64() * 1000.0,
                    marker
                );
            }
            Err(e) => {
                mismatches += 1;
                println!("{:>10} error: {}", engine.workers(), e);
            }
        }
    }
    println!();
    mismatches
}

fn hops_match(reference: Option<usize>, result: &SearchResult) -> bool {
    result.hops() == reference
}

fn fmt_hops(hops: Option<usize>) -> String {
    hops.map(|h| h.to_string()).unwrap_or_else(|| "none".to_string())
}

// ---------------------------------------------------------------------------
// Generators: O(n + links), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
}

/// `node_count` named pages with ids 1..=node_count and no links yet.
fn pages(node_count: u32) -> Graph {
    let mut graph = Graph::with_capacity(node_count as usize, node_count as usize);
    for i in 1..=node_count {
        graph.add_node(format!("Page_{}", i));
    }
    graph
}

/// L-system fractal tree: every page links to three child pages.
///
/// Log-depth paths with exponential width; the last page is a deepest leaf.
fn gen_lsystem(node_count: u32) -> Graph {
    let mut graph = pages(node_count);
    let branching = 3u32;

    let mut next_id: u32 = 2;
    let mut frontier: Vec<u32> = vec![1];

    while next_id <= node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id > node_count {
                    break;
                }
                graph.add_edge(parent, next_id);
                next_frontier.push(next_id);
                next_id += 1;
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Scale-free via edge-list sampling (O(links), not O(n²)).
///
/// Each new page links to pages picked from existing link endpoints, so
/// well-linked pages attract more links. Links go both ways half the time,
/// which keeps most of the graph reachable from page 1.
fn gen_scale_free(node_count: u32) -> Graph {
    let links_per_page = 10u32;
    let mut graph = pages(node_count);
    let mut rng = FastRng::new(12345);

    let mut endpoints: Vec<u32> = Vec::with_capacity(node_count as usize * links_per_page as usize * 2);

    // Seed: small fully linked cluster
    let seed = 5u32;
    for i in 1..=seed {
        for j in 1..=seed {
            if i != j {
                graph.add_edge(i, j);
                endpoints.push(i);
                endpoints.push(j);
            }
        }
    }

    for page in seed + 1..=node_count {
        for _ in 0..links_per_page.min(page - 1) {
            let other = endpoints[rng.next(endpoints.len() as u64) as usize];
            if other == page {
                continue;
            }
            graph.add_edge(page, other);
            if rng.next(2) == 0 {
                graph.add_edge(other, page);
            }
            endpoints.push(page);
            endpoints.push(other);
        }
    }

    graph
}

/// Erdos-Renyi: ~10 uniformly random links per page. No structure at all.
fn gen_random(node_count: u32) -> Graph {
    let mut graph = pages(node_count);
    let mut rng = FastRng::new(54321);

    for _ in 0..node_count as u64 * 10 {
        let from = rng.next(node_count as u64) as u32 + 1;
        let to = rng.next(node_count as u64) as u32 + 1;
        graph.add_edge(from, to);
    }

    graph
}

/// Barbell: two dense clusters joined by a single chain of ten pages.
///
/// Every path from the first cluster to the second squeezes through the chain,
/// so the frontier balloons, collapses to one page per wave, then balloons again.
fn gen_barbell(node_count: u32) -> Graph {
    let chain_len = 10u32;
    let cluster = (node_count - chain_len) / 2;
    let mut graph = pages(node_count);
    let mut rng = FastRng::new(99999);

    let link_cluster = |graph: &mut Graph, rng: &mut FastRng, first: u32| {
        for i in 0..cluster {
            for _ in 0..20u32.min(cluster - 1) {
                let other = rng.next(cluster as u64) as u32;
                if other != i {
                    graph.add_edge(first + i, first + other);
                }
            }
        }
    };

    // Cluster A: 1..=cluster
    link_cluster(&mut graph, &mut rng, 1);

    // Chain from the last page of A to the first page of B
    let chain_start = cluster + 1;
    graph.add_edge(cluster, chain_start);
    for id in chain_start..chain_start + chain_len - 1 {
        graph.add_edge(id, id + 1);
    }

    // Cluster B takes the rest, so the final page id lands inside it
    let b_start = chain_start + chain_len;
    graph.add_edge(b_start - 1, b_start);
    link_cluster(&mut graph, &mut rng, b_start);
    for id in b_start + cluster..=node_count {
        graph.add_edge(b_start, id);
    }

    graph
}
