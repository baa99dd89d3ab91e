use ghkit_core::Result;

use crate::client::GitHubClient;

/// Repository file contents.
pub struct Contents<'a> {
    client: &'a GitHubClient,
}

impl<'a> Contents<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Whether a file or directory exists, on `branch` or the default branch.
    pub async fn path_exists(
        &self,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<bool> {
        let api = format!("/repos/{}/contents/{}", repo, path.trim_start_matches('/'));
        let params: Vec<(&str, &str)> = branch.map(|b| ("ref", b)).into_iter().collect();
        super::exists_with(self.client, &api, &params).await
    }
}
