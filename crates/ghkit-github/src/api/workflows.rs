use std::collections::BTreeMap;

use futures_util::Stream;
use ghkit_core::Result;
use serde::Serialize;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::pagination::{paginate, PageRequest};
use crate::types::{Workflow, WorkflowRun, WorkflowRunFilter};

#[derive(Serialize)]
struct WorkflowDispatch<'a> {
    #[serde(rename = "ref")]
    ref_name: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    inputs: &'a BTreeMap<String, String>,
}

/// GitHub Actions workflows and their runs.
pub struct Workflows<'a> {
    client: &'a GitHubClient,
}

impl<'a> Workflows<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub fn get_all(&self, repo: &str) -> impl Stream<Item = Result<Workflow>> + Send + 'static {
        let request =
            PageRequest::new(format!("/repos/{}/actions/workflows", repo)).items_key("workflows");
        paginate(self.client, request)
    }

    /// Workflow by ID or file name (e.g. `ci.yml`).
    pub async fn get(&self, repo: &str, workflow: &str) -> Result<Workflow> {
        let api = format!("/repos/{}/actions/workflows/{}", repo, workflow);
        self.client.get_json(&api, NO_PARAMS).await
    }

    /// Trigger a `workflow_dispatch` event for the workflow on `ref_name`.
    pub async fn create_workflow_dispatch(
        &self,
        repo: &str,
        workflow: &str,
        ref_name: &str,
        inputs: &BTreeMap<String, String>,
    ) -> Result<()> {
        let api = format!("/repos/{}/actions/workflows/{}/dispatches", repo, workflow);
        self.client
            .post(&api, &WorkflowDispatch { ref_name, inputs })
            .await?;
        Ok(())
    }

    /// Runs of one workflow, or of the whole repository when
    /// `filter.workflow` is unset.
    pub fn get_workflow_runs(
        &self,
        repo: &str,
        filter: &WorkflowRunFilter,
    ) -> impl Stream<Item = Result<WorkflowRun>> + Send + 'static {
        let api = match &filter.workflow {
            Some(workflow) => format!("/repos/{}/actions/workflows/{}/runs", repo, workflow),
            None => format!("/repos/{}/actions/runs", repo),
        };
        let request = PageRequest::new(api)
            .items_key("workflow_runs")
            .param_opt("actor", filter.actor.as_deref())
            .param_opt("branch", filter.branch.as_deref())
            .param_opt("event", filter.event.as_deref())
            .param_opt("status", filter.status.as_deref())
            .param_opt("created", filter.created.as_deref())
            .param_opt("exclude_pull_requests", filter.exclude_pull_requests);
        paginate(self.client, request)
    }

    pub async fn get_workflow_run(&self, repo: &str, run: u64) -> Result<WorkflowRun> {
        let api = format!("/repos/{}/actions/runs/{}", repo, run);
        self.client.get_json(&api, NO_PARAMS).await
    }
}
