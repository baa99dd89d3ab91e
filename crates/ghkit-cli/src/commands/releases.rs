use std::io::Write;
use std::path::Path;
use std::pin::pin;

use anyhow::bail;
use clap::ValueEnum;
use futures_util::StreamExt;
use ghkit_github::api::ArchiveFormat;
use ghkit_github::{GitHubApi, UploadFile};

use super::save_transfer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ArchiveType {
    Zip,
    Tar,
}

impl From<ArchiveType> for ArchiveFormat {
    fn from(value: ArchiveType) -> Self {
        match value {
            ArchiveType::Zip => ArchiveFormat::Zipball,
            ArchiveType::Tar => ArchiveFormat::Tarball,
        }
    }
}

pub(crate) async fn handle_download(
    api: &GitHubApi,
    repository: &str,
    tag: &str,
    archive_type: ArchiveType,
    file: &Path,
    out: &mut impl Write,
    progress: &mut impl Write,
) -> anyhow::Result<()> {
    let transfer = api
        .releases()
        .download_archive(repository, tag, archive_type.into())
        .await?;
    let label = format!(
        "Downloading asset for tag {} as {}...",
        tag,
        ArchiveFormat::from(archive_type).extension()
    );
    let written = save_transfer(transfer, file, &label, progress).await?;
    writeln!(out, "Wrote {} bytes to {}", written, file.display())?;
    Ok(())
}

/// Upload all files at once and report each one as it finishes.
///
/// A failed upload doesn't stop the others; the command fails afterwards if
/// any upload did.
pub(crate) async fn handle_upload(
    api: &GitHubApi,
    repository: &str,
    tag: &str,
    files: &[String],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let files: Vec<UploadFile> = files.iter().map(|arg| UploadFile::parse(arg)).collect();
    let mut uploads = pin!(
        api.releases()
            .upload_release_assets(repository, tag, files)
            .await?
    );

    let mut uploaded = 0;
    let mut failed = 0;
    while let Some(result) = uploads.next().await {
        match result {
            Ok(path) => {
                writeln!(out, "Uploaded {}", path.display())?;
                uploaded += 1;
            }
            Err(e) => {
                writeln!(out, "Upload failed: {}", e)?;
                failed += 1;
            }
        }
    }
    writeln!(out, "{} assets uploaded.", uploaded)?;

    if failed > 0 {
        bail!("{} upload(s) failed", failed);
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

    #[tokio::test]
    async fn test_download_tarball() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/tarball/v1.0.0");
            then.status(200)
                .header("content-length", "8")
                .body("tar-data");
        });

        let dir = tempdir().unwrap();
        let file = dir.path().join("bar.tar.gz");
        let api = create_test_api(&server);
        let mut out = Vec::new();
        let mut progress = Vec::new();
        handle_download(
            &api,
            "foo/bar",
            "v1.0.0",
            ArchiveType::Tar,
            &file,
            &mut out,
            &mut progress,
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read(&file).unwrap(), b"tar-data");
        assert!(output(progress).ends_with("100%\n"));
    }

    #[tokio::test]
    async fn test_upload_reports_failures() {
        let server = MockServer::start();
        let upload_url = server.url("/uploads/repos/foo/bar/releases/1/assets");

        server.mock(|when, then| {
            when.method(GET).path("/repos/foo/bar/releases/tags/v1.0.0");
            then.status(200).json_body(json!({
                "id": 1,
                "tag_name": "v1.0.0",
                "html_url": "https://github.com/foo/bar/releases/v1.0.0",
                "url": "https://api.github.com/repos/foo/bar/releases/1",
                "assets_url": "https://api.github.com/repos/foo/bar/releases/1/assets",
                "upload_url": format!("{}{{?name,label}}", upload_url)
            }));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/uploads/repos/foo/bar/releases/1/assets")
                .query_param("name", "broken.txt");
            then.status(500);
        });
        let uploaded = server.mock(|when, then| {
            when.method(POST)
                .path("/uploads/repos/foo/bar/releases/1/assets")
                .query_param("name", "notes.txt")
                .header("content-type", "text/plain");
            then.status(201).json_body(json!({"id": 2}));
        });

        let dir = tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        let broken = dir.path().join("broken.txt");
        std::fs::write(&notes, "release notes").unwrap();
        std::fs::write(&broken, "oops").unwrap();

        let files = vec![
            format!("{}:text/plain", notes.display()),
            broken.display().to_string(),
        ];
        let api = create_test_api(&server);
        let mut out = Vec::new();
        let result = handle_upload(&api, "foo/bar", "v1.0.0", &files, &mut out).await;

        assert!(result.is_err());
        uploaded.assert();
        let out = output(out);
        assert!(out.contains(&format!("Uploaded {}", notes.display())));
        assert!(out.contains("Upload failed"));
        assert!(out.ends_with("1 assets uploaded.\n"));
    }
}
