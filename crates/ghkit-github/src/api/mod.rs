//! Typed wrappers for the GitHub REST endpoints ghkit uses.
//!
//! [`GitHubApi`] hands out one borrowed accessor per resource group. Listing
//! methods return lazy streams, everything else resolves to a model.

mod artifacts;
mod billing;
mod branches;
mod code_scanning;
mod contents;
mod dependabot;
mod labels;
mod organizations;
mod packages;
mod pull_requests;
mod releases;
mod repositories;
mod search;
mod secret_scanning;
mod tags;
mod teams;
mod users;
mod workflows;

pub use artifacts::Artifacts;
pub use billing::Billing;
pub use branches::Branches;
pub use code_scanning::CodeScanning;
pub use contents::Contents;
pub use dependabot::Dependabot;
pub use labels::Labels;
pub use organizations::Organizations;
pub use packages::Packages;
pub use pull_requests::PullRequests;
pub use releases::{matches_pattern, ArchiveFormat, AssetDownload, Releases};
pub use repositories::Repositories;
pub use search::{Search, SearchQualifier};
pub use secret_scanning::SecretScanning;
pub use tags::Tags;
pub use teams::Teams;
pub use users::Users;
pub use workflows::Workflows;

use ghkit_core::{Config, Result};
use reqwest::StatusCode;
use serde::Serialize;

use crate::client::{check_status, GitHubClient, NO_PARAMS};

/// Entry point to the endpoint groups.
#[derive(Clone)]
pub struct GitHubApi {
    client: GitHubClient,
}

impl GitHubApi {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config, token: Option<String>) -> Result<Self> {
        Ok(Self::new(GitHubClient::from_config(config, token)?))
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn artifacts(&self) -> Artifacts<'_> {
        Artifacts::new(&self.client)
    }

    pub fn billing(&self) -> Billing<'_> {
        Billing::new(&self.client)
    }

    pub fn branches(&self) -> Branches<'_> {
        Branches::new(&self.client)
    }

    pub fn code_scanning(&self) -> CodeScanning<'_> {
        CodeScanning::new(&self.client)
    }

    pub fn contents(&self) -> Contents<'_> {
        Contents::new(&self.client)
    }

    pub fn dependabot(&self) -> Dependabot<'_> {
        Dependabot::new(&self.client)
    }

    pub fn labels(&self) -> Labels<'_> {
        Labels::new(&self.client)
    }

    pub fn organizations(&self) -> Organizations<'_> {
        Organizations::new(&self.client)
    }

    pub fn packages(&self) -> Packages<'_> {
        Packages::new(&self.client)
    }

    pub fn pull_requests(&self) -> PullRequests<'_> {
        PullRequests::new(&self.client)
    }

    pub fn releases(&self) -> Releases<'_> {
        Releases::new(&self.client)
    }

    pub fn repositories(&self) -> Repositories<'_> {
        Repositories::new(&self.client)
    }

    pub fn search(&self) -> Search<'_> {
        Search::new(&self.client)
    }

    pub fn secret_scanning(&self) -> SecretScanning<'_> {
        SecretScanning::new(&self.client)
    }

    pub fn tags(&self) -> Tags<'_> {
        Tags::new(&self.client)
    }

    pub fn teams(&self) -> Teams<'_> {
        Teams::new(&self.client)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.client)
    }

    pub fn workflows(&self) -> Workflows<'_> {
        Workflows::new(&self.client)
    }
}

/// `true` on 2xx, `false` on 404, error otherwise.
async fn exists(client: &GitHubClient, api: &str) -> Result<bool> {
    exists_with(client, api, NO_PARAMS).await
}

async fn exists_with<Q: Serialize + ?Sized>(
    client: &GitHubClient,
    api: &str,
    params: &Q,
) -> Result<bool> {
    let response = client.get_response(api, params).await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(false);
    }
    check_status(response).await?;
    Ok(true)
}
