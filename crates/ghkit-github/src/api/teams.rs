use futures_util::Stream;
use ghkit_core::Result;
use serde_json::json;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::pagination::{paginate, PageRequest};
use crate::types::{
    CreateTeamRequest, Permission, Repository, Team, TeamRole, UpdateTeamRequest, User,
};

/// Organization teams.
pub struct Teams<'a> {
    client: &'a GitHubClient,
}

impl<'a> Teams<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub fn get_all(&self, organization: &str) -> impl Stream<Item = Result<Team>> + Send + 'static {
        paginate(
            self.client,
            PageRequest::new(format!("/orgs/{}/teams", organization)),
        )
    }

    /// Team by slug.
    pub async fn get(&self, organization: &str, team: &str) -> Result<Team> {
        let api = format!("/orgs/{}/teams/{}", organization, team);
        self.client.get_json(&api, NO_PARAMS).await
    }

    pub async fn create(&self, organization: &str, request: &CreateTeamRequest) -> Result<Team> {
        let api = format!("/orgs/{}/teams", organization);
        self.client.post_json(&api, request).await
    }

    pub async fn update(
        &self,
        organization: &str,
        team: &str,
        request: &UpdateTeamRequest,
    ) -> Result<Team> {
        let api = format!("/orgs/{}/teams/{}", organization, team);
        self.client.patch_json(&api, request).await
    }

    pub async fn delete(&self, organization: &str, team: &str) -> Result<()> {
        let api = format!("/orgs/{}/teams/{}", organization, team);
        self.client.delete(&api).await
    }

    pub fn members(
        &self,
        organization: &str,
        team: &str,
    ) -> impl Stream<Item = Result<User>> + Send + 'static {
        let api = format!("/orgs/{}/teams/{}/members", organization, team);
        paginate(self.client, PageRequest::new(api))
    }

    /// Add a user to the team, or change their role in it.
    pub async fn update_member(
        &self,
        organization: &str,
        team: &str,
        username: &str,
        role: TeamRole,
    ) -> Result<()> {
        let api = format!(
            "/orgs/{}/teams/{}/memberships/{}",
            organization, team, username
        );
        self.client.put(&api, &json!({ "role": role })).await?;
        Ok(())
    }

    pub async fn remove_member(
        &self,
        organization: &str,
        team: &str,
        username: &str,
    ) -> Result<()> {
        let api = format!(
            "/orgs/{}/teams/{}/memberships/{}",
            organization, team, username
        );
        self.client.delete(&api).await
    }

    pub fn repositories(
        &self,
        organization: &str,
        team: &str,
    ) -> impl Stream<Item = Result<Repository>> + Send + 'static {
        let api = format!("/orgs/{}/teams/{}/repos", organization, team);
        paginate(self.client, PageRequest::new(api))
    }

    /// Grant (or change) the team's permission on a repository of the organization.
    pub async fn update_permission(
        &self,
        organization: &str,
        team: &str,
        repository: &str,
        permission: Permission,
    ) -> Result<()> {
        let api = format!(
            "/orgs/{}/teams/{}/repos/{}/{}",
            organization, team, organization, repository
        );
        self.client
            .put(&api, &json!({ "permission": permission }))
            .await?;
        Ok(())
    }
}
