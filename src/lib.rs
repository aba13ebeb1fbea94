//! ofbridge — script synthesis and execution engine for OmniFocus automation.
//!
//! Turns logical operations plus a JSON payload into complete, injection-safe
//! JXA / Omni Automation scripts, runs them through osascript with a bounded
//! timeout, and classifies every outcome into one typed result shape.

pub mod core;
pub mod runner;
pub mod templates;

pub use crate::core::normalizer::normalize;
pub use crate::core::synthesizer::{select_strategy, synthesize};
pub use crate::core::types::{
    ClassifiedResult, ErrorKind, ExecutionStrategy, Failure, Operation, Payload, ScriptArtifact,
    Severity,
};
pub use crate::runner::{ExecOutput, RunnerConfig, ScriptHost, ScriptRunner};
