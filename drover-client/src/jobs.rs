//! Job submission and retrieval endpoints

use std::collections::HashMap;

use tracing::debug;

use crate::OrchestratorClient;
use crate::error::{ClientError, Result};
use crate::transport::{ApiResponse, pagination_path};
use drover_core::dto::job::{CreateJobRequest, CreateJobResponse, JobScope};

/// Job creation and listing endpoint
pub const JOBS_ENDPOINT: &str = "orchestrator/v1/jobs";

/// Generic task-invocation endpoint
pub const TASK_ENDPOINT: &str = "/command/task";

const PRODUCTION_ENVIRONMENT: &str = "production";
const FACTS_TASK: &str = "facts";

impl OrchestratorClient {
    // =============================================================================
    // Job Submission
    // =============================================================================

    /// Submit a fact-gathering job against a set of nodes
    ///
    /// Builds a job request running the `facts` task in the production
    /// environment, scoped to `nodes` (order preserved), and POSTs it to
    /// the job-creation endpoint. An empty node list fails with
    /// [`ClientError::InvalidArgument`] before any network call.
    ///
    /// Returns the raw service response; feed it to
    /// [`OrchestratorClient::extract_job_id`] to obtain the identifier.
    ///
    /// # Example
    /// ```no_run
    /// # use drover_client::OrchestratorClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = OrchestratorClient::new("https://console.example:8143");
    /// let response = client.submit_facts_job(&["web01.example".to_string()]).await?;
    /// let job_id = OrchestratorClient::extract_job_id(&response)?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_facts_job(&self, nodes: &[String]) -> Result<ApiResponse> {
        if nodes.is_empty() {
            return Err(ClientError::InvalidArgument(
                "facts job requires at least one node".to_string(),
            ));
        }

        let request = CreateJobRequest {
            environment: PRODUCTION_ENVIRONMENT.to_string(),
            task: FACTS_TASK.to_string(),
            params: HashMap::new(),
            scope: JobScope {
                nodes: nodes.to_vec(),
            },
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| ClientError::InvalidArgument(format!("unencodable job request: {e}")))?;

        debug!(task = FACTS_TASK, nodes = nodes.len(), "submitting job");
        self.transport().post(JOBS_ENDPOINT, &body).await
    }

    /// Submit an arbitrary task-invocation payload
    ///
    /// The body shape is defined by the orchestration protocol and is not
    /// validated here; this is the escape hatch for task types the client
    /// does not model explicitly.
    pub async fn submit_task(&self, body: serde_json::Value) -> Result<ApiResponse> {
        debug!("submitting task invocation");
        self.transport().post(TASK_ENDPOINT, &body).await
    }

    // =============================================================================
    // Job Retrieval
    // =============================================================================

    /// List all jobs known to the service
    pub async fn list_jobs(&self) -> Result<ApiResponse> {
        self.transport().get(JOBS_ENDPOINT).await
    }

    /// Get a job's status report by identifier
    ///
    /// `limit` and `offset` are encoded as pagination query parameters
    /// when non-zero; zero requests the server's default page.
    pub async fn get_job(&self, job_id: &str, limit: u64, offset: u64) -> Result<ApiResponse> {
        let path = pagination_path(&format!("{JOBS_ENDPOINT}/{job_id}"), limit, offset);
        self.transport().get(&path).await
    }

    // =============================================================================
    // Response Interpretation
    // =============================================================================

    /// Extract the job identifier from a creation response
    ///
    /// Decodes the body as `{ "job": { "name": ... } }` and returns the
    /// name. Fails with [`ClientError::MalformedResponse`] if the body
    /// does not parse, the fields are absent, or the identifier is empty;
    /// this never silently yields an empty id.
    pub fn extract_job_id(response: &ApiResponse) -> Result<String> {
        let decoded: CreateJobResponse = serde_json::from_str(&response.body)
            .map_err(|e| ClientError::MalformedResponse(format!("job creation response: {e}")))?;

        if decoded.job.name.is_empty() {
            return Err(ClientError::MalformedResponse(
                "job creation response carried an empty job name".to_string(),
            ));
        }

        Ok(decoded.job.name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::{ScriptedTransport, ok_response};

    fn client_with(script: Vec<ApiResponse>) -> (OrchestratorClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(script));
        (
            OrchestratorClient::with_transport(transport.clone()),
            transport,
        )
    }

    #[tokio::test]
    async fn submit_facts_job_builds_wire_body() {
        let (client, transport) = client_with(vec![ok_response(r#"{"job":{"name":"42"}}"#)]);
        let nodes = vec!["b.example".to_string(), "a.example".to_string()];

        client.submit_facts_job(&nodes).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, JOBS_ENDPOINT);

        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["environment"], "production");
        assert_eq!(body["task"], "facts");
        assert!(body["params"].as_object().unwrap().is_empty());
        // Node order is preserved
        assert_eq!(body["scope"]["nodes"][0], "b.example");
        assert_eq!(body["scope"]["nodes"][1], "a.example");
    }

    #[tokio::test]
    async fn submit_facts_job_rejects_empty_node_list_without_network() {
        let (client, transport) = client_with(vec![]);

        let err = client.submit_facts_job(&[]).await.unwrap_err();

        assert!(matches!(err, ClientError::InvalidArgument(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn submit_task_posts_caller_body_unchanged() {
        let (client, transport) = client_with(vec![ok_response("{}")]);
        let body = serde_json::json!({
            "task": "package",
            "params": { "action": "install", "package": "httpd" },
        });

        client.submit_task(body.clone()).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, TASK_ENDPOINT);
        assert_eq!(calls[0].body.as_ref().unwrap(), &body);
    }

    #[tokio::test]
    async fn list_jobs_hits_jobs_endpoint() {
        let (client, transport) = client_with(vec![ok_response("[]")]);

        client.list_jobs().await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].path, JOBS_ENDPOINT);
    }

    #[tokio::test]
    async fn get_job_encodes_pagination_when_nonzero() {
        let (client, transport) = client_with(vec![ok_response(r#"{"status":[]}"#)]);

        client.get_job("123", 5, 10).await.unwrap();
        client.get_job("123", 0, 0).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].path, "orchestrator/v1/jobs/123?limit=5&offset=10");
        assert_eq!(calls[1].path, "orchestrator/v1/jobs/123");
    }

    #[test]
    fn extract_job_id_reads_nested_name() {
        let response = ok_response(r#"{"job":{"name":"123"}}"#);
        assert_eq!(
            OrchestratorClient::extract_job_id(&response).unwrap(),
            "123"
        );
    }

    #[test]
    fn extract_job_id_rejects_missing_fields() {
        for body in [r#"{}"#, r#"{"job":{}}"#, r#"{"name":"123"}"#, "not json"] {
            let err = OrchestratorClient::extract_job_id(&ok_response(body)).unwrap_err();
            assert!(
                matches!(err, ClientError::MalformedResponse(_)),
                "body {body:?} should be rejected, got: {err}"
            );
        }
    }

    #[test]
    fn extract_job_id_rejects_empty_name() {
        let response = ok_response(r#"{"job":{"name":""}}"#);
        let err = OrchestratorClient::extract_job_id(&response).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }
}
