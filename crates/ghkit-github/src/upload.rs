//! Concurrent file uploads.
//!
//! Every file is uploaded by its own task. Results come back in completion
//! order and a failing upload does not stop the others.

use std::path::{Path, PathBuf};

use futures_util::stream::{self, Stream};
use ghkit_core::{Error, Result};
use tokio::task::JoinSet;
use tracing::debug;

use crate::client::GitHubClient;
use crate::transfer;

/// Content type used when none is given.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file to upload together with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub content_type: String,
}

impl UploadFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Parse `PATH[:CONTENT_TYPE]`.
    ///
    /// The content type must contain a `/`, otherwise the whole argument is
    /// taken as the path (e.g. `C:\dist\app.zip`).
    pub fn parse(arg: &str) -> Self {
        match arg.rsplit_once(':') {
            Some((path, content_type)) if !path.is_empty() && content_type.contains('/') => {
                Self::new(path).with_content_type(content_type)
            }
            _ => Self::new(arg),
        }
    }
}

impl From<PathBuf> for UploadFile {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for UploadFile {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

async fn upload_one(client: GitHubClient, url: String, file: UploadFile) -> Result<PathBuf> {
    let name = file
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::InvalidData(format!("{} has no usable file name", file.path.display()))
        })?
        .to_string();

    let transfer = transfer::upload(&file.path).await?;
    let length = transfer.length();
    debug!(file = %file.path.display(), length = ?length, "Uploading file");

    let body = reqwest::Body::wrap_stream(transfer.into_bytes_stream());
    client
        .post_stream(&url, &[("name", name.as_str())], &file.content_type, length, body)
        .await?;

    Ok(file.path)
}

/// Upload every file to `url` concurrently, passing the file name as `name`.
///
/// Results arrive as uploads finish. Each failure is reported in place of
/// its file and the remaining uploads continue. Dropping the stream aborts
/// the uploads that are still running.
///
/// The tasks are spawned on the first poll, so the stream has to be polled
/// from within a tokio runtime.
pub fn upload_many<I>(
    client: &GitHubClient,
    url: &str,
    files: I,
) -> impl Stream<Item = Result<PathBuf>> + Send + 'static
where
    I: IntoIterator,
    I::Item: Into<UploadFile>,
{
    let uploads = Uploads {
        client: client.clone(),
        url: url.to_string(),
        pending: files.into_iter().map(Into::into).collect(),
        tasks: JoinSet::new(),
    };

    stream::unfold(uploads, |mut uploads| async move {
        for file in std::mem::take(&mut uploads.pending) {
            let task = upload_one(uploads.client.clone(), uploads.url.clone(), file);
            uploads.tasks.spawn(task);
        }

        let joined = uploads.tasks.join_next().await?;
        let result = joined.unwrap_or_else(|e| Err(Error::Task(e.to_string())));
        Some((result, uploads))
    })
}

struct Uploads {
    client: GitHubClient,
    url: String,
    pending: Vec<UploadFile>,
    tasks: JoinSet<Result<PathBuf>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_file_parse() {
        assert_eq!(
            UploadFile::parse("dist/app.tar.gz:application/gzip"),
            UploadFile::new("dist/app.tar.gz").with_content_type("application/gzip")
        );
        assert_eq!(
            UploadFile::parse("dist/app.zip"),
            UploadFile::new("dist/app.zip")
        );
        assert_eq!(
            UploadFile::parse(r"C:\dist\app.zip").content_type,
            DEFAULT_CONTENT_TYPE
        );
    }

    #[test]
    fn test_upload_many_spawns_nothing_until_polled() {
        let client = GitHubClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();

        // no runtime here: creating and dropping the stream must not spawn
        let uploads = upload_many(&client, "http://127.0.0.1:9/assets", [PathBuf::from("a.txt")]);
        drop(uploads);
    }

    mod integration {
        use super::*;
        use futures_util::TryStreamExt;
        use futures_util::StreamExt;
        use httpmock::prelude::*;

        fn create_test_client(server: &MockServer) -> GitHubClient {
            GitHubClient::builder()
                .base_url(server.base_url())
                .token("test-token")
                .build()
                .unwrap()
        }

        fn write_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
            names
                .iter()
                .map(|name| {
                    let path = dir.join(name);
                    std::fs::write(&path, format!("contents of {}", name)).unwrap();
                    path
                })
                .collect()
        }

        #[tokio::test]
        async fn test_upload_many_completes_every_file() {
            let server = MockServer::start();
            let dir = tempfile::tempdir().unwrap();
            let paths = write_files(dir.path(), &["a.txt", "b.txt", "c.txt"]);

            let mocks: Vec<_> = ["a.txt", "b.txt", "c.txt"]
                .iter()
                .map(|name| {
                    server.mock(|when, then| {
                        when.method(POST)
                            .path("/repos/foo/bar/releases/1/assets")
                            .query_param("name", *name)
                            .header("Content-Type", "text/plain")
                            .header("Content-Length", "17")
                            .body(format!("contents of {}", name));
                        then.status(201).json_body(serde_json::json!({"name": name}));
                    })
                })
                .collect();

            let client = create_test_client(&server);
            let url = server.url("/repos/foo/bar/releases/1/assets");
            let files = paths
                .iter()
                .map(|p| UploadFile::new(p).with_content_type("text/plain"));

            let mut uploaded: Vec<PathBuf> =
                upload_many(&client, &url, files).try_collect().await.unwrap();
            uploaded.sort();

            assert_eq!(uploaded, paths);
            for mock in mocks {
                mock.assert();
            }
        }

        #[tokio::test]
        async fn test_upload_failure_is_isolated() {
            let server = MockServer::start();
            let dir = tempfile::tempdir().unwrap();
            let paths = write_files(dir.path(), &["a.txt", "b.txt", "c.txt"]);

            server.mock(|when, then| {
                when.method(POST)
                    .path("/assets")
                    .query_param("name", "b.txt");
                then.status(500).body("upload failed");
            });
            server.mock(|when, then| {
                when.method(POST).path("/assets");
                then.status(201).json_body(serde_json::json!({}));
            });

            let client = create_test_client(&server);
            let results: Vec<Result<PathBuf>> =
                upload_many(&client, "/assets", paths.clone()).collect().await;

            assert_eq!(results.len(), 3);
            let mut succeeded: Vec<PathBuf> = results
                .iter()
                .filter_map(|r| r.as_ref().ok().cloned())
                .collect();
            succeeded.sort();
            assert_eq!(succeeded, vec![paths[0].clone(), paths[2].clone()]);

            let failures: Vec<&Error> = results.iter().filter_map(|r| r.as_ref().err()).collect();
            assert_eq!(failures.len(), 1);
            assert!(matches!(failures[0], Error::Api { status: 500, .. }));
        }

        #[tokio::test]
        async fn test_missing_file_fails_alone() {
            let server = MockServer::start();
            let dir = tempfile::tempdir().unwrap();
            let mut paths = write_files(dir.path(), &["present.bin"]);
            paths.push(dir.path().join("absent.bin"));

            let mock = server.mock(|when, then| {
                when.method(POST)
                    .path("/assets")
                    .header("Content-Type", DEFAULT_CONTENT_TYPE);
                then.status(201);
            });

            let client = create_test_client(&server);
            let results: Vec<Result<PathBuf>> =
                upload_many(&client, "/assets", paths.clone()).collect().await;

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert!(results.iter().any(|r| matches!(r, Err(Error::Io(_)))));
            mock.assert_calls(1);
        }

        #[tokio::test]
        async fn test_no_files_yields_nothing() {
            let server = MockServer::start();
            let client = create_test_client(&server);

            let results: Vec<Result<PathBuf>> =
                upload_many(&client, "/assets", Vec::<PathBuf>::new()).collect().await;
            assert!(results.is_empty());
        }
    }
}
