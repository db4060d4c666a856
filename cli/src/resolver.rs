use std::path::PathBuf;
use std::process::{Command, Stdio};

use sixdeg_core::Resolver;
use tracing::{debug, warn};

/// Resolves queries by running `<program> <query>` and reading the page name
/// from the first line of its stdout.
///
/// A non-zero exit, a failed spawn or empty output all mean "no such page".
pub struct CommandResolver {
    program: PathBuf,
}

impl CommandResolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Resolver for CommandResolver {
    fn resolve(&self, query: &str) -> Option<String> {
        let output = match Command::new(&self.program)
            .arg(query)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!(program = %self.program.display(), error = %e, "resolver helper failed to run");
                return None;
            }
        };

        if !output.status.success() {
            debug!(query, status = ?output.status, "resolver found no page");
            return None;
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}
