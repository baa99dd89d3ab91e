use ghkit_core::Result;
use serde_json::json;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::types::{CreateTagRequest, Tag};

/// Annotated git tags.
pub struct Tags<'a> {
    client: &'a GitHubClient,
}

impl<'a> Tags<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Create an annotated tag object.
    ///
    /// This only creates the tag object. Call [`Tags::create_tag_reference`]
    /// with the returned sha to make the tag visible as `refs/tags/<tag>`.
    pub async fn create(&self, repo: &str, request: &CreateTagRequest) -> Result<Tag> {
        let api = format!("/repos/{}/git/tags", repo);
        self.client.post_json(&api, request).await
    }

    pub async fn create_tag_reference(&self, repo: &str, tag: &str, sha: &str) -> Result<()> {
        let api = format!("/repos/{}/git/refs", repo);
        let body = json!({ "ref": format!("refs/tags/{}", tag), "sha": sha });
        self.client.post(&api, &body).await?;
        Ok(())
    }

    /// Tag object by its sha.
    pub async fn get(&self, repo: &str, tag_sha: &str) -> Result<Tag> {
        let api = format!("/repos/{}/git/tags/{}", repo, tag_sha);
        self.client.get_json(&api, NO_PARAMS).await
    }
}
