//! Process runner — one osascript subprocess per call.
//!
//! The transient script file is owned exclusively by the in-flight call that
//! created it: written before the host call, removed after it on every path
//! (success, payload error, process error, timeout). Removal failures are
//! logged at debug and swallowed. There is no shared mutable state between
//! concurrent calls; filenames carry a fresh UUID so the filesystem namespace
//! cannot collide.

pub mod osa;

use crate::core::normalizer::normalize;
use crate::core::types::{ClassifiedResult, ErrorKind, Failure, ScriptArtifact};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Exit code recorded when the child terminated without one (signal-killed).
pub const SIGNAL_EXIT: i32 = -1;

/// Output captured from one host invocation.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// The subprocess boundary. Production uses [`osa::OsaHost`]; tests
/// substitute mocks to exercise timeout, cleanup, and classification paths.
#[async_trait]
pub trait ScriptHost: Send + Sync {
    async fn invoke(
        &self,
        script_path: &Path,
        max_output_bytes: u64,
    ) -> Result<ExecOutput, String>;
}

/// Runner configuration. Constructor-supplied so tests can point the script
/// directory at a tempdir and shrink the timeout.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory for transient script files.
    pub script_dir: PathBuf,

    /// Wall-clock bound per invocation. Generous by default: a full
    /// collection scan on a large document can legitimately take tens of
    /// seconds.
    pub timeout: Duration,

    /// Cap on captured stdout.
    pub max_output_bytes: u64,

    /// Scripting host binary.
    pub host_binary: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            script_dir: std::env::temp_dir().join("ofbridge"),
            timeout: Duration::from_secs(120),
            max_output_bytes: 10 * 1024 * 1024,
            host_binary: PathBuf::from("osascript"),
        }
    }
}

/// Executes script artifacts: persist, invoke, clean up, normalize.
pub struct ScriptRunner {
    config: RunnerConfig,
    host: Arc<dyn ScriptHost>,
}

impl ScriptRunner {
    pub fn new(config: RunnerConfig) -> Self {
        let host = Arc::new(osa::OsaHost::new(config.host_binary.clone()));
        Self { config, host }
    }

    /// Construct with an injected host (mocks in tests, alternate hosts in
    /// callers).
    pub fn with_host(config: RunnerConfig, host: Arc<dyn ScriptHost>) -> Self {
        Self { config, host }
    }

    /// Run an artifact and return its raw captured stdout.
    pub async fn run(&self, artifact: &ScriptArtifact) -> ClassifiedResult<String> {
        tokio::fs::create_dir_all(&self.config.script_dir)
            .await
            .map_err(|e| {
                Failure::new(
                    ErrorKind::InternalError,
                    format!(
                        "cannot create script dir {}: {e}",
                        self.config.script_dir.display()
                    ),
                )
            })?;

        let path = self
            .config
            .script_dir
            .join(format!("of-{}.js", Uuid::new_v4().simple()));

        if let Err(e) = tokio::fs::write(&path, &artifact.source).await {
            cleanup(&path).await;
            return Err(Failure::new(
                ErrorKind::InternalError,
                format!("cannot write transient script: {e}"),
            ));
        }

        tracing::debug!(
            description = %artifact.description,
            strategy = %artifact.strategy,
            path = %path.display(),
            "invoking scripting host"
        );

        let outcome = tokio::time::timeout(
            self.config.timeout,
            self.host.invoke(&path, self.config.max_output_bytes),
        )
        .await;

        cleanup(&path).await;

        match outcome {
            Err(_elapsed) => Err(Failure::new(
                ErrorKind::Timeout,
                format!(
                    "{} timed out after {:?}",
                    artifact.description, self.config.timeout
                ),
            )),
            Ok(Err(message)) => Err(Failure::new(
                ErrorKind::InternalError,
                format!("{}: {message}", artifact.description),
            )),
            Ok(Ok(out)) if out.exit_code == SIGNAL_EXIT => Err(Failure::new(
                ErrorKind::Timeout,
                format!(
                    "{} was killed before completion (bound {:?})",
                    artifact.description, self.config.timeout
                ),
            )),
            Ok(Ok(out)) if !out.success() => {
                let stderr = out.stderr.trim();
                let message = if stderr.is_empty() {
                    format!(
                        "{} exited with status {}",
                        artifact.description, out.exit_code
                    )
                } else {
                    format!("{}: {stderr}", artifact.description)
                };
                Err(Failure::new(classify_stderr(stderr), message))
            }
            Ok(Ok(out)) => Ok(out.stdout),
        }
    }

    /// Run an artifact and normalize its output into typed data.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        artifact: &ScriptArtifact,
    ) -> ClassifiedResult<T> {
        let raw = self.run(artifact).await?;
        let data = normalize(&raw, artifact)?;
        serde_json::from_value(data).map_err(|e| {
            Failure::new(
                ErrorKind::InvalidOutput,
                format!("{} response shape mismatch: {e}", artifact.description),
            )
        })
    }
}

/// Delete the transient script file; failures are diagnostic only.
async fn cleanup(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!(
            path = %path.display(),
            error = %e,
            "transient script cleanup failed; ignoring"
        );
    }
}

/// Map host stderr onto the failure taxonomy. Apple Events error numbers are
/// stable across macOS releases.
fn classify_stderr(stderr: &str) -> ErrorKind {
    if stderr.contains("-1743") || stderr.contains("Not authorized") {
        ErrorKind::PermissionDenied
    } else if stderr.contains("-600") || stderr.contains("isn't running") {
        ErrorKind::NotRunning
    } else {
        ErrorKind::InternalError
    }
}

// ============================================================================
// Tests
// ============================================================================
