//! Current VCS branch for the status bar.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// `git rev-parse --abbrev-ref HEAD` in `dir`; `None` when git is missing,
/// `dir` is not a repository, or the output is empty.
pub(crate) fn current_branch(dir: &Path) -> Option<String> {
    let output = match Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(dir)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            debug!(target: "runtime", ?e, "git_unavailable");
            return None;
        }
    };
    if !output.status.success() {
        debug!(target: "runtime", status = ?output.status, "git_branch_unavailable");
        return None;
    }
    parse_branch(&output.stdout)
}

fn parse_branch(stdout: &[u8]) -> Option<String> {
    let name = String::from_utf8_lossy(stdout).trim().to_string();
    (!name.is_empty()).then_some(name)
}
