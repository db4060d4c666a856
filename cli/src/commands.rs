use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Result;
use sixdeg_core::{
    find_path, BfsEngine, EndpointRole, Graph, LoadReport, NodeId, PathStep, Resolver, SearchError,
};

use crate::config::Settings;
use crate::output::{self, PathReport, StatusReport};

/// Everything a command needs once the graph is loaded.
pub struct Session<'a> {
    pub graph: &'a Graph,
    pub engine: &'a BfsEngine,
    pub resolver: &'a dyn Resolver,
    pub settings: &'a Settings,
}

struct Answer {
    start: String,
    target: String,
    outcome: Result<Option<Vec<PathStep>>, SearchError>,
    elapsed: Duration,
}

impl Session<'_> {
    /// Resolver output wins; a query the resolver rejects is only accepted
    /// as a numeric id of a loaded page.
    fn canonical(&self, role: EndpointRole, query: &str) -> Result<String, SearchError> {
        let query = query.trim();
        if let Some(name) = self.resolver.resolve(query) {
            return Ok(name);
        }
        match query.parse::<NodeId>() {
            Ok(id) if self.graph.contains(id) => Ok(query.to_string()),
            _ => Err(SearchError::UnknownEndpoint {
                role,
                query: query.to_string(),
            }),
        }
    }

    fn answer(&self, start: &str, target: &str) -> Answer {
        let endpoints = self
            .canonical(EndpointRole::Start, start)
            .and_then(|s| Ok((s, self.canonical(EndpointRole::Target, target)?)));
        let (start, target) = match endpoints {
            Ok(pair) => pair,
            Err(e) => {
                return Answer {
                    start: start.trim().to_string(),
                    target: target.trim().to_string(),
                    outcome: Err(e),
                    elapsed: Duration::ZERO,
                }
            }
        };
        let cancel = self.settings.cancel_token();

        let t = Instant::now();
        let outcome = find_path(self.engine, self.graph, &start, &target, &cancel);
        Answer {
            start,
            target,
            outcome,
            elapsed: t.elapsed(),
        }
    }
}

/// One-shot search. Exit code 0 only when a path was found.
pub fn path(session: &Session<'_>, start: &str, target: &str, json: bool) -> Result<ExitCode> {
    let answer = session.answer(start, target);

    if json {
        let steps = match &answer.outcome {
            Ok(steps) => steps.as_deref(),
            Err(e) => {
                eprintln!("{}", output::describe_error(e));
                return Ok(ExitCode::FAILURE);
            }
        };
        let report = PathReport::new(&answer.start, &answer.target, steps, answer.elapsed);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(if report.found {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    output::searching(&answer.start, &answer.target);
    match answer.outcome {
        Ok(Some(steps)) => {
            output::print_path(&steps, answer.elapsed);
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            output::print_unreachable(answer.elapsed);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("{}", output::describe_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prompt for start/target pairs until stdin closes. Search failures are
/// reported and the loop carries on.
pub fn interactive(session: &Session<'_>) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    output::header("Ready to path find! (Ctrl-D to quit)");
    println!();

    loop {
        write!(stdout, "Start page: ")?;
        stdout.flush()?;
        let Some(start) = lines.next().transpose()? else {
            break;
        };

        write!(stdout, "Target page: ")?;
        stdout.flush()?;
        let Some(target) = lines.next().transpose()? else {
            break;
        };

        if start.trim().is_empty() || target.trim().is_empty() {
            output::failure("Both a start and a target page are needed");
            println!();
            continue;
        }

        println!();
        let answer = session.answer(&start, &target);
        output::searching(&answer.start, &answer.target);
        match answer.outcome {
            Ok(Some(steps)) => output::print_path(&steps, answer.elapsed),
            Ok(None) => output::print_unreachable(answer.elapsed),
            Err(e) => {
                output::failure(&output::describe_error(&e));
                println!();
            }
        }
    }

    println!();
    Ok(())
}

pub fn status(session: &Session<'_>, report: &LoadReport, json: bool) -> Result<()> {
    let status = StatusReport {
        titles: session.settings.titles.display().to_string(),
        links: session.settings.links.display().to_string(),
        nodes: session.graph.node_count(),
        edges: session.graph.edge_count(),
        sources: session.graph.source_count(),
        malformed_tokens: session.graph.malformed_tokens(),
        duplicate_names: session.graph.duplicate_names(),
        memory_bytes: session.graph.memory_usage(),
        load_time_ms: report.elapsed.as_secs_f64() * 1000.0,
        workers: session.engine.workers(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        output::print_status(&status);
    }
    Ok(())
}
