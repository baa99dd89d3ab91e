use std::io::Write;
use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, ValueEnum};
use futures_util::TryStreamExt;
use ghkit_github::{CreatePullRequest, GitHubApi, PullRequestFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FileStatusArg {
    Added,
    #[value(alias = "deleted")]
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
}

impl FileStatusArg {
    fn as_str(self) -> &'static str {
        match self {
            FileStatusArg::Added => "added",
            FileStatusArg::Removed => "removed",
            FileStatusArg::Modified => "modified",
            FileStatusArg::Renamed => "renamed",
            FileStatusArg::Copied => "copied",
            FileStatusArg::Changed => "changed",
            FileStatusArg::Unchanged => "unchanged",
        }
    }
}

/// Arguments of `pull-request`.
#[derive(Debug, Clone, Args)]
pub(crate) struct PullRequestArgs {
    /// org/repo combination
    pub repository: String,

    /// Branch to create the pull request from
    pub head: String,

    /// Branch to merge into
    pub target: String,

    pub title: String,

    /// Description of the pull request, in Markdown
    #[arg(short, long)]
    pub body: Option<String>,
}

/// Arguments of `file-status`.
#[derive(Debug, Clone, Args)]
pub(crate) struct FileStatusArgs {
    /// org/repo combination
    pub repository: String,

    /// Pull request number
    pub pull_request: u64,

    /// File statuses to list
    #[arg(
        short,
        long,
        value_enum,
        num_args = 1..,
        default_values_t = [FileStatusArg::Added, FileStatusArg::Modified]
    )]
    pub status: Vec<FileStatusArg>,

    /// Also write the file names, one per line, to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Open a pull request after checking that both branches exist.
pub(crate) async fn handle_pull_request(
    api: &GitHubApi,
    args: &PullRequestArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let branches = api.branches();
    for (role, branch) in [("Head", &args.head), ("Target", &args.target)] {
        if !branches.exists(&args.repository, branch).await? {
            bail!("{} branch {} does not exist in {}", role, branch, args.repository);
        }
        writeln!(out, "{} branch {} exists.", role, branch)?;
    }

    let request = CreatePullRequest {
        head: args.head.clone(),
        base: args.target.clone(),
        title: args.title.clone(),
        body: args.body.clone(),
    };
    let pull_request = api
        .pull_requests()
        .create(&args.repository, &request)
        .await?;

    writeln!(out, "Pull request created: {}", pull_request.html_url)?;
    Ok(())
}

/// List the changed files of a pull request, grouped by status.
pub(crate) async fn handle_file_status(
    api: &GitHubApi,
    args: &FileStatusArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let pulls = api.pull_requests();
    if !pulls.exists(&args.repository, args.pull_request).await? {
        bail!(
            "Pull request {} does not exist in {}",
            args.pull_request,
            args.repository
        );
    }

    let statuses: Vec<&str> = args.status.iter().map(|s| s.as_str()).collect();
    let files: Vec<PullRequestFile> = pulls
        .files(&args.repository, args.pull_request, &statuses)
        .try_collect()
        .await?;

    let mut listed = Vec::new();
    for status in &statuses {
        writeln!(out, "{}:", status)?;
        for file in files.iter().filter(|f| f.status == *status) {
            writeln!(out, "{}", file.filename)?;
            listed.push(file.filename.as_str());
        }
    }

    if let Some(path) = &args.output {
        let mut content = listed.join("\n");
        content.push('\n');
        tokio::fs::write(path, content).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{create_test_api, output};
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn pull_request_args() -> PullRequestArgs {
        PullRequestArgs {
            repository: "foo/bar".to_string(),
            head: "feature".to_string(),
            target: "main".to_string(),
            title: "Add feature".to_string(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_pull_request_created() {
        let server = MockServer::start();

        for branch in ["feature", "main"] {
            server.mock(|when, then| {
                when.method(GET)
                    .path(format!("/repos/foo/bar/branches/{}", branch));
                then.status(200).json_body(json!({"name": branch}));
            });
        }
        let create = server.mock(|when, then| {
            when.method(POST).path("/repos/foo/bar/pulls").json_body(json!({
                "head": "feature",
                "base": "main",
                "title": "Add feature"
            }));
            then.status(201).json_body(json!({
                "id": 1,
                "number": 12,
                "title": "Add feature",
                "state": "open",
                "html_url": "https://github.com/foo/bar/pull/12",
                "head": {"ref": "feature", "sha": "6dcb09b5"},
                "base": {"ref": "main", "sha": "bbcd538c"}
            }));
        });

        let api = create_test_api(&server);
        let mut out = Vec::new();
        handle_pull_request(&api, &pull_request_args(), &mut out)
            .await
            .unwrap();

        create.assert();
        assert_eq!(
            output(out),
            "Head branch feature exists.\n\
             Target branch main exists.\n\
             Pull request created: https://github.com/foo/bar/pull/12\n"
        );
    }

    #[tokio::test]
    async fn test_pull_request_missing_target() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/branches/feature");
            then.status(200).json_body(json!({"name": "feature"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/branches/main");
            then.status(404);
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/repos/foo/bar/pulls");
            then.status(201);
        });

        let api = create_test_api(&server);
        let mut out = Vec::new();
        let result = handle_pull_request(&api, &pull_request_args(), &mut out).await;

        assert!(result.is_err());
        create.assert_calls(0);
        assert_eq!(output(out), "Head branch feature exists.\n");
    }

    #[tokio::test]
    async fn test_file_status_groups_and_writes_output() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/pulls/12");
            then.status(200).json_body(json!({
                "id": 1,
                "number": 12,
                "title": "Add feature",
                "state": "open",
                "html_url": "https://github.com/foo/bar/pull/12",
                "head": {"ref": "feature", "sha": "6dcb09b5"},
                "base": {"ref": "main", "sha": "bbcd538c"}
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/pulls/12/files");
            then.status(200).json_body(json!([
                {"sha": "a", "filename": "src/lib.rs", "status": "modified", "additions": 3, "deletions": 1, "changes": 4},
                {"sha": "b", "filename": "src/new.rs", "status": "added", "additions": 10, "deletions": 0, "changes": 10},
                {"sha": "c", "filename": "old.rs", "status": "removed", "additions": 0, "deletions": 8, "changes": 8}
            ]));
        });

        let dir = tempdir().unwrap();
        let file = dir.path().join("files.txt");
        let args = FileStatusArgs {
            repository: "foo/bar".to_string(),
            pull_request: 12,
            status: vec![FileStatusArg::Added, FileStatusArg::Modified],
            output: Some(file.clone()),
        };

        let api = create_test_api(&server);
        let mut out = Vec::new();
        handle_file_status(&api, &args, &mut out).await.unwrap();

        assert_eq!(
            output(out),
            "added:\nsrc/new.rs\nmodified:\nsrc/lib.rs\n"
        );
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "src/new.rs\nsrc/lib.rs\n"
        );
    }

    #[tokio::test]
    async fn test_file_status_unknown_pull_request() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/pulls/99");
            then.status(404);
        });

        let args = FileStatusArgs {
            repository: "foo/bar".to_string(),
            pull_request: 99,
            status: vec![FileStatusArg::Removed],
            output: None,
        };
        let api = create_test_api(&server);
        let result = handle_file_status(&api, &args, &mut Vec::new()).await;
        assert!(result.is_err());
    }
}
