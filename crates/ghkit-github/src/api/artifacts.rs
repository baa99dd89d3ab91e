use futures_util::Stream;
use ghkit_core::Result;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::pagination::{paginate, PageRequest, Strategy};
use crate::transfer::Transfer;
use crate::types::Artifact;

/// GitHub Actions artifacts.
pub struct Artifacts<'a> {
    client: &'a GitHubClient,
}

impl<'a> Artifacts<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// All artifacts of a repository.
    ///
    /// This listing pages by `total_count` rather than `Link` headers.
    pub fn get_all(&self, repo: &str) -> impl Stream<Item = Result<Artifact>> + Send + 'static {
        let request = PageRequest::new(format!("/repos/{}/actions/artifacts", repo))
            .items_key("artifacts")
            .strategy(Strategy::Count);
        paginate(self.client, request)
    }

    pub async fn get(&self, repo: &str, artifact: u64) -> Result<Artifact> {
        let api = format!("/repos/{}/actions/artifacts/{}", repo, artifact);
        self.client.get_json(&api, NO_PARAMS).await
    }

    /// Artifacts uploaded by one workflow run.
    pub fn workflow_run_artifacts(
        &self,
        repo: &str,
        run: u64,
    ) -> impl Stream<Item = Result<Artifact>> + Send + 'static {
        let request = PageRequest::new(format!("/repos/{}/actions/runs/{}/artifacts", repo, run))
            .items_key("artifacts")
            .strategy(Strategy::Count);
        paginate(self.client, request)
    }

    pub async fn delete(&self, repo: &str, artifact: u64) -> Result<()> {
        let api = format!("/repos/{}/actions/artifacts/{}", repo, artifact);
        self.client.delete(&api).await
    }

    /// Download the artifact's zip archive.
    pub async fn download(&self, repo: &str, artifact: u64) -> Result<Transfer> {
        let api = format!("/repos/{}/actions/artifacts/{}/zip", repo, artifact);
        self.client.download(&api, None).await
    }
}
