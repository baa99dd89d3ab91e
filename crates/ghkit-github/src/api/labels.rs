use futures_util::{Stream, TryStreamExt};
use ghkit_core::Result;
use serde_json::json;

use crate::client::GitHubClient;
use crate::pagination::{paginate, PageRequest};
use crate::types::Label;

/// Labels of issues and pull requests.
pub struct Labels<'a> {
    client: &'a GitHubClient,
}

impl<'a> Labels<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Names of the labels set on an issue or pull request.
    pub fn get_all(
        &self,
        repo: &str,
        issue: u64,
    ) -> impl Stream<Item = Result<String>> + Send + 'static {
        let api = format!("/repos/{}/issues/{}/labels", repo, issue);
        paginate(self.client, PageRequest::new(api)).map_ok(|label: Label| label.name)
    }

    /// Replace the labels of an issue or pull request with `labels`.
    pub async fn set_all<S: AsRef<str>>(
        &self,
        repo: &str,
        issue: u64,
        labels: &[S],
    ) -> Result<()> {
        let api = format!("/repos/{}/issues/{}/labels", repo, issue);
        let labels: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
        self.client.put(&api, &json!({ "labels": labels })).await?;
        Ok(())
    }
}
