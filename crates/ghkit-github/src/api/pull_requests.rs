use futures_util::Stream;
use ghkit_core::Result;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::pagination::{paginate, PageRequest};
use crate::types::{
    Comment, CreateCommentRequest, CreatePullRequest, PullRequest, PullRequestCommit,
    PullRequestFile, UpdatePullRequest,
};

/// Pull requests and their comments.
pub struct PullRequests<'a> {
    client: &'a GitHubClient,
}

impl<'a> PullRequests<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub async fn exists(&self, repo: &str, pull_request: u64) -> Result<bool> {
        super::exists(self.client, &format!("/repos/{}/pulls/{}", repo, pull_request)).await
    }

    pub async fn get(&self, repo: &str, pull_request: u64) -> Result<PullRequest> {
        let api = format!("/repos/{}/pulls/{}", repo, pull_request);
        self.client.get_json(&api, NO_PARAMS).await
    }

    pub async fn create(&self, repo: &str, request: &CreatePullRequest) -> Result<PullRequest> {
        let api = format!("/repos/{}/pulls", repo);
        self.client.post_json(&api, request).await
    }

    pub async fn update(
        &self,
        repo: &str,
        pull_request: u64,
        request: &UpdatePullRequest,
    ) -> Result<PullRequest> {
        let api = format!("/repos/{}/pulls/{}", repo, pull_request);
        self.client.patch_json(&api, request).await
    }

    pub fn commits(
        &self,
        repo: &str,
        pull_request: u64,
    ) -> impl Stream<Item = Result<PullRequestCommit>> + Send + 'static {
        let api = format!("/repos/{}/pulls/{}/commits", repo, pull_request);
        paginate(self.client, PageRequest::new(api))
    }

    /// Comment on the pull request's conversation.
    pub async fn add_comment(&self, repo: &str, pull_request: u64, body: &str) -> Result<Comment> {
        let api = format!("/repos/{}/issues/{}/comments", repo, pull_request);
        let request = CreateCommentRequest {
            body: body.to_string(),
        };
        self.client.post_json(&api, &request).await
    }

    /// Replace the text of an existing comment.
    pub async fn update_comment(
        &self,
        repo: &str,
        comment_id: u64,
        body: &str,
    ) -> Result<Comment> {
        let api = format!("/repos/{}/issues/comments/{}", repo, comment_id);
        let request = CreateCommentRequest {
            body: body.to_string(),
        };
        self.client.patch_json(&api, &request).await
    }

    pub fn comments(
        &self,
        repo: &str,
        pull_request: u64,
    ) -> impl Stream<Item = Result<Comment>> + Send + 'static {
        let api = format!("/repos/{}/issues/{}/comments", repo, pull_request);
        paginate(self.client, PageRequest::new(api))
    }

    /// Changed files, optionally only those with one of `statuses`
    /// (`added`, `modified`, `removed`, ...).
    pub fn files(
        &self,
        repo: &str,
        pull_request: u64,
        statuses: &[&str],
    ) -> impl Stream<Item = Result<PullRequestFile>> + Send + 'static {
        use futures_util::{future, TryStreamExt};

        let api = format!("/repos/{}/pulls/{}/files", repo, pull_request);
        let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
        paginate(self.client, PageRequest::new(api)).try_filter(move |file: &PullRequestFile| {
            future::ready(statuses.is_empty() || statuses.contains(&file.status))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::create_test_api;
    use crate::types::{CreatePullRequest, UpdatePullRequest};
    use futures_util::TryStreamExt;
    use httpmock::prelude::*;
    use serde_json::json;

    fn pull_request(title: &str) -> serde_json::Value {
        json!({
            "id": 1,
            "number": 1347,
            "title": title,
            "state": "open",
            "html_url": "https://github.com/foo/bar/pull/1347",
            "head": {"ref": "feature", "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e"},
            "base": {"ref": "main", "sha": "bbcd538c8e72b8c175046e27cc8f907076331401"}
        })
    }

    #[tokio::test]
    async fn test_get_and_exists() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/pulls/1347");
            then.status(200).json_body(pull_request("Amazing new feature"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/pulls/1");
            then.status(404);
        });

        let api = create_test_api(&server);
        let pulls = api.pull_requests();
        let pr = pulls.get("foo/bar", 1347).await.unwrap();
        assert_eq!(pr.head.ref_name, "feature");
        assert!(pulls.exists("foo/bar", 1347).await.unwrap());
        assert!(!pulls.exists("foo/bar", 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let server = MockServer::start();

        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/repos/foo/bar/pulls")
                .json_body(json!({"head": "feature", "base": "main", "title": "New"}));
            then.status(201).json_body(pull_request("New"));
        });
        let update = server.mock(|when, then| {
            when.method(PATCH)
                .path("/repos/foo/bar/pulls/1347")
                .json_body(json!({"title": "Renamed"}));
            then.status(200).json_body(pull_request("Renamed"));
        });

        let api = create_test_api(&server);
        let pulls = api.pull_requests();
        let request = CreatePullRequest {
            head: "feature".to_string(),
            base: "main".to_string(),
            title: "New".to_string(),
            body: None,
        };
        assert_eq!(pulls.create("foo/bar", &request).await.unwrap().title, "New");

        let request = UpdatePullRequest {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let pr = pulls.update("foo/bar", 1347, &request).await.unwrap();
        assert_eq!(pr.title, "Renamed");

        create.assert();
        update.assert();
    }

    #[tokio::test]
    async fn test_comments() {
        let server = MockServer::start();

        let add = server.mock(|when, then| {
            when.method(POST)
                .path("/repos/foo/bar/issues/1347/comments")
                .json_body(json!({"body": "Looks good"}));
            then.status(201)
                .json_body(json!({"id": 10, "body": "Looks good"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/issues/1347/comments");
            then.status(200).json_body(json!([
                {"id": 9, "body": "First"},
                {"id": 10, "body": "Looks good"}
            ]));
        });

        let api = create_test_api(&server);
        let comment = api
            .pull_requests()
            .add_comment("foo/bar", 1347, "Looks good")
            .await
            .unwrap();
        assert_eq!(comment.id, 10);
        add.assert();

        let comments: Vec<_> = api
            .pull_requests()
            .comments("foo/bar", 1347)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(comments.len(), 2);
    }

    #[tokio::test]
    async fn test_commits() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/pulls/1347/commits");
            then.status(200).json_body(json!([{
                "sha": "6dcb09b5",
                "commit": {"message": "Fix all the bugs", "author": {"name": "Monalisa"}}
            }]));
        });

        let api = create_test_api(&server);
        let commits: Vec<_> = api
            .pull_requests()
            .commits("foo/bar", 1347)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(commits[0].commit.message, "Fix all the bugs");
    }

    #[tokio::test]
    async fn test_files_filtered_by_status() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/pulls/1347/files");
            then.status(200).json_body(json!([
                {"sha": "a", "filename": "new.rs", "status": "added", "additions": 10, "deletions": 0, "changes": 10},
                {"sha": "b", "filename": "old.rs", "status": "removed", "additions": 0, "deletions": 5, "changes": 5},
                {"sha": "c", "filename": "lib.rs", "status": "modified", "additions": 1, "deletions": 1, "changes": 2}
            ]));
        });

        let api = create_test_api(&server);
        let files: Vec<_> = api
            .pull_requests()
            .files("foo/bar", 1347, &["added", "modified"])
            .try_collect()
            .await
            .unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["new.rs", "lib.rs"]);

        let all: Vec<_> = api
            .pull_requests()
            .files("foo/bar", 1347, &[])
            .try_collect()
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_comment() {
        let server = MockServer::start();

        let update = server.mock(|when, then| {
            when.method(PATCH)
                .path("/repos/foo/bar/issues/comments/10")
                .json_body(json!({"body": "Looks great"}));
            then.status(200)
                .json_body(json!({"id": 10, "body": "Looks great"}));
        });

        let api = create_test_api(&server);
        let comment = api
            .pull_requests()
            .update_comment("foo/bar", 10, "Looks great")
            .await
            .unwrap();
        assert_eq!(comment.body, "Looks great");
        update.assert();
    }
}
