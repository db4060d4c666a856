//! Console and JSON rendering of search results and graph status.

use std::time::Duration;

use colored::Colorize;
use serde::Serialize;
use sixdeg_core::{PathStep, SearchError};

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub id: u32,
    pub name: String,
}

/// Machine-readable result of one search.
#[derive(Debug, Serialize)]
pub struct PathReport {
    pub start: String,
    pub target: String,
    pub found: bool,
    pub hops: Option<usize>,
    pub elapsed_ms: f64,
    pub path: Vec<StepReport>,
}

impl PathReport {
    pub fn new(start: &str, target: &str, path: Option<&[PathStep]>, elapsed: Duration) -> Self {
        let path: Vec<StepReport> = path
            .unwrap_or_default()
            .iter()
            .map(|s| StepReport {
                id: s.node_id,
                name: s.name.clone(),
            })
            .collect();
        Self {
            start: start.to_string(),
            target: target.to_string(),
            found: !path.is_empty(),
            hops: path.len().checked_sub(1),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            path,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub titles: String,
    pub links: String,
    pub nodes: usize,
    pub edges: usize,
    pub sources: usize,
    pub malformed_tokens: usize,
    pub duplicate_names: usize,
    pub memory_bytes: usize,
    pub load_time_ms: f64,
    pub workers: usize,
}

pub fn header(msg: &str) {
    println!("{} {}", "==>".green(), msg);
}

pub fn detail(msg: &str) {
    println!("{}{}", "  -> ".blue(), msg);
}

pub fn failure(msg: &str) {
    println!("{} {}", "==>".red(), msg);
}

pub fn searching(start: &str, target: &str) {
    header(&format!(
        "Finding path from {} → {}",
        start.magenta(),
        target.blue()
    ));
}

pub fn print_path(steps: &[PathStep], elapsed: Duration) {
    let hops = steps.len().saturating_sub(1);
    let unit = if hops == 1 { "click" } else { "clicks" };
    detail(&format!("Found path in {}", format!("{hops} {unit}").green()));
    detail(&format!("Took {:.3} seconds", elapsed.as_secs_f64()));
    println!();
    for step in steps {
        let name = if step.name.is_empty() {
            format!("#{}", step.node_id)
        } else {
            step.name.clone()
        };
        println!("   {} {}", "↓".blue(), name);
    }
    println!();
}

pub fn print_unreachable(elapsed: Duration) {
    failure(&format!(
        "Unable to find path ({:.3} seconds)",
        elapsed.as_secs_f64()
    ));
    println!();
}

/// One line per error kind, phrased for someone typing page names.
pub fn describe_error(err: &SearchError) -> String {
    match err {
        SearchError::UnknownEndpoint { role, query } => {
            let role = match role {
                sixdeg_core::EndpointRole::Start => "Start",
                sixdeg_core::EndpointRole::Target => "Target",
            };
            format!("{role} page '{query}' is not a known page")
        }
        SearchError::Cancelled { waves } => {
            format!("Search timed out after {waves} waves")
        }
        SearchError::WorkerPool(e) => format!("Search could not start: {e}"),
    }
}

pub fn print_status(report: &StatusReport) {
    header("Graph status");
    detail(&format!("titles:     {}", report.titles));
    detail(&format!("links:      {}", report.links));
    detail(&format!("nodes:      {}", report.nodes));
    detail(&format!("edges:      {}", report.edges));
    detail(&format!("sources:    {}", report.sources));
    detail(&format!("malformed:  {}", report.malformed_tokens));
    detail(&format!("duplicates: {}", report.duplicate_names));
    detail(&format!(
        "memory:     ~{:.0}MB",
        report.memory_bytes as f64 / 1_048_576.0
    ));
    detail(&format!("load time:  {:.1}ms", report.load_time_ms));
    detail(&format!("workers:    {}", report.workers));
}
