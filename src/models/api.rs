//! JSON envelopes shared by the route handlers and the client.

use serde::{Deserialize, Serialize};

use super::Task;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of create, update and single-task responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub task: Task,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}
