use ghkit_core::Result;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::types::{CreateRepositoryRequest, Repository, UpdateRepositoryRequest};

/// Repositories.
pub struct Repositories<'a> {
    client: &'a GitHubClient,
}

impl<'a> Repositories<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, repo: &str) -> Result<Repository> {
        self.client
            .get_json(&format!("/repos/{}", repo), NO_PARAMS)
            .await
    }

    /// Create a repository in `organization`.
    pub async fn create(
        &self,
        organization: &str,
        request: &CreateRepositoryRequest,
    ) -> Result<Repository> {
        let api = format!("/orgs/{}/repos", organization);
        self.client.post_json(&api, request).await
    }

    pub async fn update(&self, repo: &str, request: &UpdateRepositoryRequest) -> Result<Repository> {
        self.client
            .patch_json(&format!("/repos/{}", repo), request)
            .await
    }

    pub async fn archive(&self, repo: &str) -> Result<Repository> {
        let request = UpdateRepositoryRequest {
            archived: Some(true),
            ..Default::default()
        };
        self.update(repo, &request).await
    }

    pub async fn delete(&self, repo: &str) -> Result<()> {
        self.client.delete(&format!("/repos/{}", repo)).await
    }
}
