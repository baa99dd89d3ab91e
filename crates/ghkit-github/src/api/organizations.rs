use futures_util::Stream;
use ghkit_core::Result;

use crate::client::GitHubClient;
use crate::pagination::{paginate, PageRequest};
use crate::types::{
    MemberFilter, MemberRole, OrganizationInvitation, Repository, RepositoryType, User,
};

/// Organizations and their members.
pub struct Organizations<'a> {
    client: &'a GitHubClient,
}

impl<'a> Organizations<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub async fn exists(&self, organization: &str) -> Result<bool> {
        super::exists(self.client, &format!("/orgs/{}", organization)).await
    }

    pub fn repositories(
        &self,
        organization: &str,
        repository_type: RepositoryType,
    ) -> impl Stream<Item = Result<Repository>> + Send + 'static {
        let request = PageRequest::new(format!("/orgs/{}/repos", organization))
            .param("type", repository_type);
        paginate(self.client, request)
    }

    pub fn members(
        &self,
        organization: &str,
        member_filter: MemberFilter,
        role: MemberRole,
    ) -> impl Stream<Item = Result<User>> + Send + 'static {
        let request = PageRequest::new(format!("/orgs/{}/members", organization))
            .param("filter", member_filter)
            .param("role", role);
        paginate(self.client, request)
    }

    /// Invite a user (by ID) or an email address.
    pub async fn invite(
        &self,
        organization: &str,
        invitation: &OrganizationInvitation,
    ) -> Result<()> {
        let api = format!("/orgs/{}/invitations", organization);
        self.client.post(&api, invitation).await?;
        Ok(())
    }

    /// Remove a member (or cancel their pending invitation).
    pub async fn remove_member(&self, organization: &str, username: &str) -> Result<()> {
        let api = format!("/orgs/{}/memberships/{}", organization, username);
        self.client.delete(&api).await
    }

    pub async fn remove_outside_collaborator(
        &self,
        organization: &str,
        username: &str,
    ) -> Result<()> {
        let api = format!("/orgs/{}/outside_collaborators/{}", organization, username);
        self.client.delete(&api).await
    }

    pub fn outside_collaborators(
        &self,
        organization: &str,
        member_filter: MemberFilter,
    ) -> impl Stream<Item = Result<User>> + Send + 'static {
        let request = PageRequest::new(format!("/orgs/{}/outside_collaborators", organization))
            .param("filter", member_filter);
        paginate(self.client, request)
    }
}
