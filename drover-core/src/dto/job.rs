//! Job DTOs for the orchestration service API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request body for `POST orchestrator/v1/jobs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub environment: String,
    pub task: String,
    pub params: HashMap<String, serde_json::Value>,
    pub scope: JobScope,
}

/// The set of target nodes a job applies to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobScope {
    pub nodes: Vec<String>,
}

/// Response body for a successful job creation
///
/// The identifier lives at `job.name`; the service may include other
/// fields, which are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobResponse {
    pub job: JobRef,
}

/// Reference to a created job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRef {
    /// Opaque job identifier, the key for all subsequent status queries.
    pub name: String,
}
