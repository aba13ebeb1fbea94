//! Core types: operations, execution strategies, script artifacts, and the
//! closed failure taxonomy.
//!
//! Everything that crosses the engine boundary lives here and derives
//! Serialize/Deserialize so the outer request layer can log and forward it
//! without translation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Caller-supplied parameter payload. Consumed once per `synthesize` call.
pub type Payload = serde_json::Map<String, Value>;

// ============================================================================
// Operations
// ============================================================================

/// Logical operations the engine can synthesize scripts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    ListTasks,
    CreateTask,
    UpdateTask,
    CompleteTask,
    DeleteTask,
    ListProjects,
    ListTags,
    ListFolders,
    ProductivityStats,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListTasks => "listTasks",
            Self::CreateTask => "createTask",
            Self::UpdateTask => "updateTask",
            Self::CompleteTask => "completeTask",
            Self::DeleteTask => "deleteTask",
            Self::ListProjects => "listProjects",
            Self::ListTags => "listTags",
            Self::ListFolders => "listFolders",
            Self::ProductivityStats => "productivityStats",
        }
    }

    /// All operations, for exhaustive checks over the template table.
    pub fn all() -> [Operation; 9] {
        [
            Self::ListTasks,
            Self::CreateTask,
            Self::UpdateTask,
            Self::CompleteTask,
            Self::DeleteTask,
            Self::ListProjects,
            Self::ListTags,
            Self::ListFolders,
            Self::ProductivityStats,
        ]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operation {
    type Err = Failure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| {
                Failure::new(ErrorKind::InternalError, format!("unknown operation: {s}"))
            })
    }
}

// ============================================================================
// Execution strategy
// ============================================================================

/// How a synthesized script reaches the document model.
///
/// Decided once per call from (operation, present optional fields); callers
/// only ever see it as artifact metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// JXA only. Slow object-specifier access, but the only dialect with a
    /// constructor for new document objects.
    Direct,
    /// Whole body runs as Omni Automation, reached by one
    /// `evaluateJavascript` call from the JXA shell.
    Bridged,
    /// Primary action in JXA, then nested bridge calls for properties the
    /// direct dialect cannot set reliably (tags, planned date).
    Hybrid,
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Bridged => write!(f, "bridged"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

// ============================================================================
// Script artifact
// ============================================================================

/// A complete, self-contained program ready for the osascript host.
///
/// `source` carries exactly one payload-injection statement per dialect
/// boundary and no other interpolation points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptArtifact {
    /// Full script source (JXA shell, possibly embedding an Omni Automation
    /// program).
    pub source: String,

    /// Strategy chosen for this artifact.
    pub strategy: ExecutionStrategy,

    /// Human-readable description, used in failure messages.
    pub description: String,
}

// ============================================================================
// Failure taxonomy
// ============================================================================

/// Closed set of failure categories crossing the engine boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// macOS rejected automation access (Apple Events error -1743).
    PermissionDenied,
    /// The subprocess exceeded the configured wall-clock bound.
    Timeout,
    /// The host exited cleanly but printed nothing.
    EmptyOutput,
    /// Captured output was not parseable JSON — template/host mismatch.
    InvalidOutput,
    /// OmniFocus is not running (Apple Events error -600).
    NotRunning,
    /// The script itself reported a payload-level error (e.g. task not found).
    ScriptError,
    /// Anything uncategorized.
    InternalError,
}

/// Coarse severity, consumed by the outer layer for logging/telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

impl ErrorKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::ScriptError | Self::EmptyOutput => Severity::Warning,
            Self::Timeout | Self::NotRunning | Self::InvalidOutput => Severity::Error,
            Self::PermissionDenied | Self::InternalError => Severity::Critical,
        }
    }

    /// Whether the caller can plausibly retry after corrective action.
    pub fn recoverable(self) -> bool {
        match self {
            Self::Timeout | Self::NotRunning | Self::ScriptError => true,
            Self::PermissionDenied
            | Self::EmptyOutput
            | Self::InvalidOutput
            | Self::InternalError => false,
        }
    }

    /// One-line remediation hint for the outer layer's user-facing messages.
    pub fn remediation(self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Grant automation access in System Settings > Privacy & Security > Automation"
            }
            Self::Timeout => "Narrow the query (filters, limit) and retry",
            Self::EmptyOutput => "The script produced no output; check the OmniFocus document state",
            Self::InvalidOutput => "Template/host mismatch; update ofbridge or OmniFocus",
            Self::NotRunning => "Launch OmniFocus and retry",
            Self::ScriptError => "Correct the request parameters and retry",
            Self::InternalError => "Unexpected failure; check logs",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::EmptyOutput => write!(f, "EMPTY_OUTPUT"),
            Self::InvalidOutput => write!(f, "INVALID_OUTPUT"),
            Self::NotRunning => write!(f, "NOT_RUNNING"),
            Self::ScriptError => write!(f, "SCRIPT_ERROR"),
            Self::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// The single failure shape that crosses the engine's outward boundary.
///
/// Engine internals may use control-flow errors freely, but everything is
/// converted to this before returning; callers never need catch logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Tagged success-or-classified-failure result.
pub type ClassifiedResult<T> = Result<T, Failure>;

// ============================================================================
// Tests
// ============================================================================
