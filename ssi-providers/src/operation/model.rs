//! `struct`s for the operation engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationState {
    Pending,
    Done,
    Failed,
    Cancelled,
}

/// Outcome stored on a terminal operation: either a failure reason or a
/// caller-defined response payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationResult {
    Error { error: String },
    Response { response: serde_json::Value },
}

/// A durable record of asynchronous, possibly human-reviewed work.
///
/// Ids are hierarchical strings of the form `<parent>/<uuid>`, where the
/// parent path groups operations of one resource type (e.g.
/// `presentations/submissions/<uuid>`). The parent doubles as the listing
/// scope: each parent path maps to its own storage namespace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: String,
    pub done: bool,
    pub state: OperationState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<OperationResult>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

impl Operation {
    /// `done` and `state` move together; a terminal record never reopens.
    pub fn is_terminal(&self) -> bool {
        self.done
    }
}

#[derive(Clone, Debug, Default)]
pub struct OperationListPage {
    pub operations: Vec<Operation>,
    pub next_page_token: Option<String>,
}

/// Builds a fresh operation id under the given parent path.
pub fn new_operation_id(parent: &str) -> String {
    format!("{parent}/{}", Uuid::new_v4())
}

/// The parent path of a hierarchical operation id, i.e. everything before
/// the final `/` segment.
pub fn parent_of(id: &str) -> Option<&str> {
    match id.rsplit_once('/') {
        Some((parent, leaf)) if !parent.is_empty() && !leaf.is_empty() => Some(parent),
        _ => None,
    }
}
