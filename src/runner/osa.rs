//! osascript host: `osascript -l JavaScript <file>`.
//!
//! The script always travels by file path, never as an inline `-e` argument —
//! inline scripts hit shell-escaping trouble and ARG_MAX limits on large
//! payloads. Stdout is read through a byte cap so a runaway template cannot
//! balloon memory; stderr is diagnostic only and capped small.

use super::ExecOutput;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

const STDERR_CAP: u64 = 64 * 1024;

/// Production scripting host.
pub struct OsaHost {
    binary: PathBuf,
}

impl OsaHost {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl super::ScriptHost for OsaHost {
    async fn invoke(
        &self,
        script_path: &Path,
        max_output_bytes: u64,
    ) -> Result<ExecOutput, String> {
        let mut child = Command::new(&self.binary)
            .arg("-l")
            .arg("JavaScript")
            .arg(script_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The runner enforces the wall-clock bound by dropping this
            // future; the child must not outlive it.
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to spawn {}: {e}", self.binary.display()))?;

        read_capped(&mut child, max_output_bytes).await
    }
}

async fn read_capped(child: &mut Child, max_output_bytes: u64) -> Result<ExecOutput, String> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| "stdout pipe missing".to_string())?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| "stderr pipe missing".to_string())?;

    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut stdout = stdout.take(max_output_bytes);
    let mut stderr = stderr.take(STDERR_CAP);
    tokio::try_join!(stdout.read_to_end(&mut out), stderr.read_to_end(&mut err))
        .map_err(|e| format!("pipe read error: {e}"))?;

    let status = child.wait().await.map_err(|e| format!("wait error: {e}"))?;

    Ok(ExecOutput {
        exit_code: status.code().unwrap_or(super::SIGNAL_EXIT),
        stdout: String::from_utf8_lossy(&out).to_string(),
        stderr: String::from_utf8_lossy(&err).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScriptHost;

    // osascript only exists on macOS; these tests exercise the subprocess
    // plumbing with portable binaries instead.

    #[tokio::test]
    async fn test_osa_spawn_failure_is_reported() {
        let host = OsaHost::new("/nonexistent/osascript");
        let err = host
            .invoke(Path::new("/tmp/nope.js"), 1024)
            .await
            .unwrap_err();
        assert!(err.contains("failed to spawn"));
    }

    #[tokio::test]
    async fn test_osa_captures_stdout_and_exit_zero() {
        let host = OsaHost::new("/bin/echo");
        let out = host.invoke(Path::new("/tmp/x.js"), 1024 * 1024).await.unwrap();
        assert!(out.success());
        // echo reproduces the fixed argument shape
        assert!(out.stdout.contains("-l JavaScript /tmp/x.js"));
    }

    #[tokio::test]
    async fn test_osa_nonzero_exit_captured() {
        let host = OsaHost::new("/bin/false");
        let out = host.invoke(Path::new("/tmp/x.js"), 1024).await.unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, 1);
    }

    #[tokio::test]
    async fn test_osa_stdout_capped() {
        let host = OsaHost::new("/bin/echo");
        let out = host.invoke(Path::new("/tmp/x.js"), 4).await.unwrap();
        assert!(out.stdout.len() <= 4);
    }
}
