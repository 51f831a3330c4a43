//! Running external tools (`go`, `git`) and condensing their failures into a
//! single-line reason.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

/// Run `program args...` (optionally in `cwd`, with extra `env`) and return
/// its trimmed stdout.
///
/// On failure returns a one-line reason. Full stderr is logged at `warn`.
pub(crate) fn run_tool<I, S>(
    program: &Path,
    args: I,
    cwd: Option<&Path>,
    env: &[(&str, &OsStr)],
) -> Result<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    for (key, value) in env {
        cmd.env(key, value);
    }

    tracing::debug!("running {cmd:?}");
    let out = cmd
        .output()
        .map_err(|e| format!("failed to execute {}: {e}", program.display()))?;

    let stderr = String::from_utf8_lossy(&out.stderr);
    if !out.status.success() {
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            tracing::warn!("{}: {line}", program.display());
        }
        let last = stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("no output");
        return Err(format!("{} exited with {}: {last}", program.display(), out.status));
    }

    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}
