use std::path::PathBuf;

use futures_util::Stream;
use ghkit_core::Result;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::transfer::Transfer;
use crate::types::{CreateReleaseRequest, Release, ReleaseAsset};
use crate::upload::{upload_many, UploadFile};

/// Source archive formats GitHub generates for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tarball,
    Zipball,
}

impl ArchiveFormat {
    fn api_segment(self) -> &'static str {
        match self {
            ArchiveFormat::Tarball => "tarball",
            ArchiveFormat::Zipball => "zipball",
        }
    }

    /// File extension of the downloaded archive.
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::Tarball => "tar.gz",
            ArchiveFormat::Zipball => "zip",
        }
    }
}

/// A release asset that has not been downloaded yet.
///
/// Nothing is requested until [`AssetDownload::start`] is awaited.
#[derive(Clone)]
pub struct AssetDownload {
    client: GitHubClient,
    asset: ReleaseAsset,
}

impl AssetDownload {
    pub fn name(&self) -> &str {
        &self.asset.name
    }

    pub fn asset(&self) -> &ReleaseAsset {
        &self.asset
    }

    /// Start the download. The asset's size is used as the known length.
    pub async fn start(&self) -> Result<Transfer> {
        let length = (self.asset.size > 0).then_some(self.asset.size);
        self.client
            .download(&self.asset.browser_download_url, length)
            .await
    }
}

/// Releases and release assets.
pub struct Releases<'a> {
    client: &'a GitHubClient,
}

impl<'a> Releases<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, repo: &str, request: &CreateReleaseRequest) -> Result<Release> {
        let api = format!("/repos/{}/releases", repo);
        self.client.post_json(&api, request).await
    }

    pub async fn exists(&self, repo: &str, tag: &str) -> Result<bool> {
        super::exists(self.client, &format!("/repos/{}/releases/tags/{}", repo, tag)).await
    }

    pub async fn get(&self, repo: &str, tag: &str) -> Result<Release> {
        let api = format!("/repos/{}/releases/tags/{}", repo, tag);
        self.client.get_json(&api, NO_PARAMS).await
    }

    /// Download the source archive of `tag`.
    pub async fn download_archive(
        &self,
        repo: &str,
        tag: &str,
        format: ArchiveFormat,
    ) -> Result<Transfer> {
        let api = format!("/repos/{}/{}/{}", repo, format.api_segment(), tag);
        self.client.download(&api, None).await
    }

    pub async fn download_release_tarball(&self, repo: &str, tag: &str) -> Result<Transfer> {
        self.download_archive(repo, tag, ArchiveFormat::Tarball).await
    }

    pub async fn download_release_zip(&self, repo: &str, tag: &str) -> Result<Transfer> {
        self.download_archive(repo, tag, ArchiveFormat::Zipball).await
    }

    /// Assets of the release for `tag`, optionally filtered by a glob on the
    /// asset name (`*` and `?` are supported).
    pub async fn download_release_assets(
        &self,
        repo: &str,
        tag: &str,
        pattern: Option<&str>,
    ) -> Result<Vec<AssetDownload>> {
        let release = self.get(repo, tag).await?;
        let assets: Vec<ReleaseAsset> = self
            .client
            .get_json(&release.assets_url, NO_PARAMS)
            .await?;

        Ok(assets
            .into_iter()
            .filter(|asset| pattern.map_or(true, |p| matches_pattern(&asset.name, p)))
            .map(|asset| AssetDownload {
                client: self.client.clone(),
                asset,
            })
            .collect())
    }

    /// Upload files to the release for `tag`, all at once.
    ///
    /// The release is looked up first. Uploaded paths are yielded as their
    /// uploads finish.
    pub async fn upload_release_assets<I>(
        &self,
        repo: &str,
        tag: &str,
        files: I,
    ) -> Result<impl Stream<Item = Result<PathBuf>> + Send + 'static>
    where
        I: IntoIterator,
        I::Item: Into<UploadFile>,
    {
        let release = self.get(repo, tag).await?;
        Ok(upload_many(self.client, release.asset_upload_url(), files))
    }
}

/// Shell-style match of a whole file name: `*` is any run of characters,
/// `?` is exactly one.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    let name: Vec<char> = name.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut n, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                n += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    n = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}
