//! Template library — fixed table of script bodies per (operation, strategy).
//!
//! Bodies are pure text. They assume only the declared shell contract: the
//! injected `params` value, plus `app`/`doc` in the direct (JXA) shell and
//! the Omni Automation globals (`flattenedTasks`, `Task`, `deleteObject`, …)
//! in the bridged shell. Every body ends by returning one JSON document.

pub mod folders;
pub mod projects;
pub mod stats;
pub mod tags;
pub mod tasks;

use crate::core::types::{ExecutionStrategy, Operation};

/// Look up the body for an operation under the chosen strategy.
///
/// `create_bridge` is the composed fix-up section for the hybrid create
/// path; it is ignored for every other combination. Total over all inputs —
/// strategy only changes the body for create and update.
pub fn body_for(
    operation: Operation,
    strategy: ExecutionStrategy,
    create_bridge: Option<&str>,
) -> String {
    match operation {
        Operation::ListTasks => tasks::list_body().to_string(),
        Operation::CreateTask => match strategy {
            ExecutionStrategy::Hybrid => tasks::create_body(create_bridge),
            _ => tasks::create_body(None),
        },
        Operation::UpdateTask => match strategy {
            ExecutionStrategy::Direct => tasks::update_direct_body().to_string(),
            _ => tasks::update_bridged_body().to_string(),
        },
        Operation::CompleteTask => tasks::complete_body().to_string(),
        Operation::DeleteTask => tasks::delete_body().to_string(),
        Operation::ListProjects => projects::list_body().to_string(),
        Operation::ListTags => tags::list_body().to_string(),
        Operation::ListFolders => folders::list_body().to_string(),
        Operation::ProductivityStats => stats::aggregate_body().to_string(),
    }
}
