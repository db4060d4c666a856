//! Start-up configuration: input locations, worker count, search deadline
//! and the memory cap, each settable by flag or environment variable.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use sixdeg_core::{CancelToken, LoadOptions, MalformedPolicy};

/// Default node-name file inside the data directory.
pub const TITLES_FILE: &str = "titles-sorted";
/// Default adjacency file inside the data directory.
pub const LINKS_FILE: &str = "links-simple-sorted";

#[derive(Args, Debug, Clone)]
pub struct GraphOptions {
    /// Directory holding titles-sorted and links-simple-sorted
    #[arg(long, env = "SIXDEG_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Node-name file, one name per line (overrides --data-dir)
    #[arg(long, env = "SIXDEG_TITLES", global = true)]
    pub titles: Option<PathBuf>,

    /// Adjacency file, "id: succ succ ..." (overrides --data-dir)
    #[arg(long, env = "SIXDEG_LINKS", global = true)]
    pub links: Option<PathBuf>,

    /// BFS worker threads (0 = one per CPU)
    #[arg(long, env = "SIXDEG_THREADS", global = true)]
    pub threads: Option<usize>,

    /// Abandon a search after this many seconds
    #[arg(
        long,
        env = "SIXDEG_TIMEOUT_SECS",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// Refuse to start if the loaded graph needs more than this (MB)
    #[arg(
        long,
        env = "SIXDEG_MAX_MEMORY_MB",
        default_value_t = 16384,
        global = true,
        value_parser = clap::value_parser!(u64).range(64..=1_048_576)
    )]
    pub max_memory_mb: u64,

    /// External helper that maps a search phrase to a page name
    #[arg(long, env = "SIXDEG_RESOLVER", global = true)]
    pub resolver: Option<PathBuf>,

    /// Drop malformed adjacency tokens instead of reading them as id 0
    #[arg(long, global = true)]
    pub drop_malformed: bool,
}

/// Resolved settings the commands run with.
#[derive(Debug, Clone)]
pub struct Settings {
    pub titles: PathBuf,
    pub links: PathBuf,
    pub threads: Option<usize>,
    pub timeout: Option<Duration>,
    pub max_memory_mb: u64,
    pub resolver: Option<PathBuf>,
    pub load: LoadOptions,
}

impl Settings {
    pub fn from_options(opts: &GraphOptions) -> Self {
        let titles = opts
            .titles
            .clone()
            .unwrap_or_else(|| opts.data_dir.join(TITLES_FILE));
        let links = opts
            .links
            .clone()
            .unwrap_or_else(|| opts.data_dir.join(LINKS_FILE));
        let malformed = if opts.drop_malformed {
            MalformedPolicy::Drop
        } else {
            MalformedPolicy::CoerceToZero
        };

        Self {
            titles,
            links,
            threads: opts.threads.filter(|&n| n > 0),
            timeout: opts.timeout.map(Duration::from_secs),
            max_memory_mb: opts.max_memory_mb,
            resolver: opts.resolver.clone(),
            load: LoadOptions { malformed },
        }
    }

    /// A fresh token per search, carrying the configured deadline.
    pub fn cancel_token(&self) -> CancelToken {
        match self.timeout {
            Some(t) => CancelToken::with_timeout(t),
            None => CancelToken::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GraphOptions {
        GraphOptions {
            data_dir: PathBuf::from("/srv/wiki"),
            titles: None,
            links: None,
            threads: None,
            timeout: None,
            max_memory_mb: 16384,
            resolver: None,
            drop_malformed: false,
        }
    }

    #[test]
    fn test_defaults_come_from_data_dir() {
        let s = Settings::from_options(&options());
        assert_eq!(s.titles, PathBuf::from("/srv/wiki/titles-sorted"));
        assert_eq!(s.links, PathBuf::from("/srv/wiki/links-simple-sorted"));
        assert_eq!(s.load.malformed, MalformedPolicy::CoerceToZero);
        assert!(s.timeout.is_none());
    }

    #[test]
    fn test_explicit_paths_win() {
        let mut o = options();
        o.titles = Some(PathBuf::from("t.txt"));
        o.links = Some(PathBuf::from("l.txt"));
        let s = Settings::from_options(&o);
        assert_eq!(s.titles, PathBuf::from("t.txt"));
        assert_eq!(s.links, PathBuf::from("l.txt"));
    }

    #[test]
    fn test_zero_threads_means_default_pool() {
        let mut o = options();
        o.threads = Some(0);
        assert_eq!(Settings::from_options(&o).threads, None);
    }

    #[test]
    fn test_timeout_and_policy() {
        let mut o = options();
        o.timeout = Some(30);
        o.drop_malformed = true;
        let s = Settings::from_options(&o);
        assert_eq!(s.timeout, Some(Duration::from_secs(30)));
        assert_eq!(s.load.malformed, MalformedPolicy::Drop);
        assert!(!s.cancel_token().is_cancelled());
    }
}
