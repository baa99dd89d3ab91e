//! GitHub API request and response types.
//!
//! Response models only carry the fields ghkit reads. Unknown fields are
//! ignored, optional ones default to `None` so partial payloads still decode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Query/body values that GitHub spells in lowercase snake case.
macro_rules! api_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $value)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// =============================================================================
// Users, teams, apps
// =============================================================================

/// GitHub user representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    /// User, Organization or Bot
    #[serde(default, rename = "type")]
    pub user_type: Option<String>,
    #[serde(default)]
    pub site_admin: bool,
}

/// GitHub team representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// GitHub App, as listed in branch restrictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub id: Option<u64>,
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Public SSH key of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshPublicKey {
    pub id: u64,
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Email address of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailInformation {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
    #[serde(default)]
    pub visibility: Option<String>,
}

api_enum! {
    /// Visibility of a team inside its organization.
    TeamPrivacy {
        Secret => "secret",
        Closed => "closed",
    }
}

api_enum! {
    /// Role of a user in a team.
    TeamRole {
        Member => "member",
        Maintainer => "maintainer",
    }
}

/// Request body for creating a team.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Logins of the team maintainers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<String>,
    /// `org/repo` names the team gets access to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repo_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<TeamPrivacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_team_id: Option<u64>,
}

/// Request body for updating a team. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTeamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<TeamPrivacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_team_id: Option<u64>,
}

// =============================================================================
// Repositories & organizations
// =============================================================================

/// GitHub repository representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub owner: Option<User>,
    /// Present on team repository listings
    #[serde(default)]
    pub permissions: Option<RepositoryPermissions>,
}

/// Permissions of the requesting user or team on a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryPermissions {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub maintain: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub triage: bool,
    #[serde(default)]
    pub pull: bool,
}

api_enum! {
    /// Filter for organization repository listings.
    RepositoryType {
        All => "all",
        Public => "public",
        Private => "private",
        Forks => "forks",
        Sources => "sources",
        Member => "member",
    }
}

api_enum! {
    /// Filter for organization member listings.
    MemberFilter {
        TwoFactorDisabled => "2fa_disabled",
        All => "all",
    }
}

api_enum! {
    /// Role filter for organization member listings.
    MemberRole {
        All => "all",
        Admin => "admin",
        Member => "member",
    }
}

api_enum! {
    /// Role granted by an organization invitation.
    InvitationRole {
        Admin => "admin",
        DirectMember => "direct_member",
        BillingManager => "billing_manager",
    }
}

api_enum! {
    /// Permission of a team on a repository.
    Permission {
        Pull => "pull",
        Triage => "triage",
        Push => "push",
        Maintain => "maintain",
        Admin => "admin",
    }
}

/// Request body for creating an organization repository.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// public, private or internal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    /// Team granted access to the new repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_auto_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,
}

/// Request body for updating a repository.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateRepositoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_auto_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_forking: Option<bool>,
}

/// Request body for inviting someone to an organization.
///
/// Exactly one of `invitee_id` and `email` should be set.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationInvitation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitee_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: InvitationRole,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<u64>,
}

// =============================================================================
// Actions: artifacts & workflows
// =============================================================================

/// Workflow run that produced an artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactWorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub repository_id: Option<u64>,
    #[serde(default)]
    pub head_branch: Option<String>,
    #[serde(default)]
    pub head_sha: Option<String>,
}

/// GitHub Actions artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: u64,
    pub name: String,
    pub size_in_bytes: u64,
    pub url: String,
    pub archive_download_url: String,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub workflow_run: Option<ArtifactWorkflowRun>,
}

/// GitHub Actions workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    pub path: String,
    /// active, deleted, disabled_fork, disabled_inactivity, disabled_manually
    pub state: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub badge_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A single run of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub head_branch: Option<String>,
    pub head_sha: String,
    pub run_number: u64,
    pub event: String,
    /// queued, in_progress, completed, ...
    #[serde(default)]
    pub status: Option<String>,
    /// success, failure, cancelled, ... (only once completed)
    #[serde(default)]
    pub conclusion: Option<String>,
    pub workflow_id: u64,
    pub html_url: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub actor: Option<User>,
}

/// Filters for workflow run listings. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct WorkflowRunFilter {
    /// Workflow ID or file name; all runs of the repository when unset
    pub workflow: Option<String>,
    pub actor: Option<String>,
    pub branch: Option<String>,
    pub event: Option<String>,
    pub status: Option<String>,
    /// Date range, e.g. `>=2024-01-01`
    pub created: Option<String>,
    pub exclude_pull_requests: Option<bool>,
}

// =============================================================================
// Releases
// =============================================================================

/// File attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub content_type: String,
    pub size: u64,
    #[serde(default)]
    pub download_count: u64,
    /// uploaded or open
    #[serde(default)]
    pub state: Option<String>,
    pub url: String,
    pub browser_download_url: String,
}

/// GitHub release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub target_commitish: Option<String>,
    pub html_url: String,
    pub url: String,
    pub assets_url: String,
    /// URI template, e.g. `https://uploads.github.com/.../assets{?name,label}`
    pub upload_url: String,
    #[serde(default)]
    pub tarball_url: Option<String>,
    #[serde(default)]
    pub zipball_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Upload URL without its `{?name,label}` template suffix.
    pub fn asset_upload_url(&self) -> &str {
        match self.upload_url.find('{') {
            Some(idx) => &self.upload_url[..idx],
            None => &self.upload_url,
        }
    }
}

/// Request body for creating a release.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateReleaseRequest {
    pub tag_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
}

// =============================================================================
// Pull requests
// =============================================================================

/// GitHub branch reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// GitHub pull request representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: String,
    pub html_url: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    pub head: BranchRef,
    pub base: BranchRef,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Git author or committer of a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitActor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Git-level data of a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    #[serde(default)]
    pub author: Option<GitActor>,
    #[serde(default)]
    pub committer: Option<GitActor>,
}

/// Commit listed on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestCommit {
    pub sha: String,
    pub commit: CommitDetails,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// GitHub pull request file (diff).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestFile {
    pub sha: String,
    pub filename: String,
    /// added, removed, modified, renamed, copied, changed, unchanged
    pub status: String,
    pub additions: u32,
    pub deletions: u32,
    pub changes: u32,
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(default)]
    pub previous_filename: Option<String>,
}

/// Issue comment on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request body for creating a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequest {
    pub head: String,
    pub base: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Request body for updating a pull request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePullRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Request body for creating a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

// =============================================================================
// Branch protection
// =============================================================================

/// A single on/off branch protection setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionFeature {
    pub enabled: bool,
    #[serde(default)]
    pub url: Option<String>,
}

/// Required status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredStatusChecks {
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub checks: Vec<StatusCheck>,
}

/// Users, teams and apps named by a protection rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Actors {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub apps: Vec<App>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredPullRequestReviews {
    #[serde(default)]
    pub dismiss_stale_reviews: bool,
    #[serde(default)]
    pub require_code_owner_reviews: bool,
    #[serde(default)]
    pub required_approving_review_count: u32,
    #[serde(default)]
    pub require_last_push_approval: bool,
    #[serde(default)]
    pub dismissal_restrictions: Option<Actors>,
    #[serde(default)]
    pub bypass_pull_request_allowances: Option<Actors>,
}

/// Branch protection currently applied to a branch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchProtection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub required_status_checks: Option<RequiredStatusChecks>,
    #[serde(default)]
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,
    #[serde(default)]
    pub restrictions: Option<Actors>,
    #[serde(default)]
    pub enforce_admins: Option<ProtectionFeature>,
    #[serde(default)]
    pub required_linear_history: Option<ProtectionFeature>,
    #[serde(default)]
    pub allow_force_pushes: Option<ProtectionFeature>,
    #[serde(default)]
    pub allow_deletions: Option<ProtectionFeature>,
    #[serde(default)]
    pub block_creations: Option<ProtectionFeature>,
    #[serde(default)]
    pub required_conversation_resolution: Option<ProtectionFeature>,
    #[serde(default)]
    pub lock_branch: Option<ProtectionFeature>,
    #[serde(default)]
    pub allow_fork_syncing: Option<ProtectionFeature>,
    #[serde(default)]
    pub required_signatures: Option<ProtectionFeature>,
}

/// Login/slug lists used when writing protection rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActorNames {
    pub users: Vec<String>,
    pub teams: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps: Option<Vec<String>>,
}

impl From<&Actors> for ActorNames {
    fn from(actors: &Actors) -> Self {
        Self {
            users: actors.users.iter().map(|u| u.login.clone()).collect(),
            teams: actors.teams.iter().map(|t| t.slug.clone()).collect(),
            apps: Some(actors.apps.iter().map(|a| a.slug.clone()).collect()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequiredStatusChecksUpdate {
    pub strict: bool,
    pub checks: Vec<StatusCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestReviewsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissal_restrictions: Option<ActorNames>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_stale_reviews: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_code_owner_reviews: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_last_push_approval: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass_pull_request_allowances: Option<ActorNames>,
}

/// Body of `PUT /repos/{repo}/branches/{branch}/protection`.
///
/// The four leading fields are always sent (as `null` when unset). Signed
/// commits are toggled through a separate endpoint and never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProtectionRulesUpdate {
    pub required_status_checks: Option<RequiredStatusChecksUpdate>,
    pub enforce_admins: Option<bool>,
    pub required_pull_request_reviews: Option<PullRequestReviewsUpdate>,
    pub restrictions: Option<ActorNames>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_linear_history: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_force_pushes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_deletions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_creations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_conversation_resolution: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_fork_syncing: Option<bool>,
    #[serde(skip)]
    pub required_signatures: Option<bool>,
}

impl ProtectionRulesUpdate {
    /// Start from the rules currently applied to a branch.
    ///
    /// Changing one field of the result and writing it back keeps every
    /// other rule as it was.
    pub fn from_applied(applied: &BranchProtection) -> Self {
        let enabled = |feature: &Option<ProtectionFeature>| feature.as_ref().map(|f| f.enabled);

        let required_pull_request_reviews =
            applied
                .required_pull_request_reviews
                .as_ref()
                .map(|reviews| PullRequestReviewsUpdate {
                    dismissal_restrictions: reviews
                        .dismissal_restrictions
                        .as_ref()
                        .map(ActorNames::from),
                    dismiss_stale_reviews: Some(reviews.dismiss_stale_reviews),
                    require_code_owner_reviews: Some(reviews.require_code_owner_reviews),
                    required_approving_review_count: Some(reviews.required_approving_review_count),
                    require_last_push_approval: Some(reviews.require_last_push_approval),
                    bypass_pull_request_allowances: reviews
                        .bypass_pull_request_allowances
                        .as_ref()
                        .map(ActorNames::from),
                });

        Self {
            required_status_checks: applied.required_status_checks.as_ref().map(|checks| {
                RequiredStatusChecksUpdate {
                    strict: checks.strict,
                    checks: checks.checks.clone(),
                }
            }),
            enforce_admins: enabled(&applied.enforce_admins),
            required_pull_request_reviews,
            restrictions: applied.restrictions.as_ref().map(ActorNames::from),
            required_linear_history: enabled(&applied.required_linear_history),
            allow_force_pushes: enabled(&applied.allow_force_pushes),
            allow_deletions: enabled(&applied.allow_deletions),
            block_creations: enabled(&applied.block_creations),
            required_conversation_resolution: enabled(&applied.required_conversation_resolution),
            lock_branch: enabled(&applied.lock_branch),
            allow_fork_syncing: enabled(&applied.allow_fork_syncing),
            required_signatures: enabled(&applied.required_signatures),
        }
    }
}

// =============================================================================
// Security alerts
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisTool {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeScanningRule {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub security_severity_level: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Code scanning alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeScanningAlert {
    pub number: u64,
    /// open, dismissed, fixed
    pub state: String,
    pub html_url: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub dismissed_reason: Option<String>,
    #[serde(default)]
    pub dismissed_comment: Option<String>,
    pub rule: CodeScanningRule,
    pub tool: AnalysisTool,
    #[serde(default)]
    pub repository: Option<Repository>,
}

/// Uploaded code scanning analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeScanningAnalysis {
    pub id: u64,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub commit_sha: String,
    pub analysis_key: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub results_count: u64,
    #[serde(default)]
    pub rules_count: u64,
    pub tool: AnalysisTool,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub sarif_id: Option<String>,
}

/// Filters shared by code scanning alert listings.
#[derive(Debug, Clone, Default)]
pub struct CodeScanningAlertFilter {
    pub tool_name: Option<String>,
    pub tool_guid: Option<String>,
    pub severity: Option<String>,
    pub state: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// Filters for code scanning analysis listings.
#[derive(Debug, Clone, Default)]
pub struct AnalysisFilter {
    pub tool_name: Option<String>,
    pub tool_guid: Option<String>,
    pub ref_name: Option<String>,
    pub sarif_id: Option<String>,
    pub direction: Option<String>,
}

/// Request body for changing the state of a code scanning or Dependabot alert.
#[derive(Debug, Clone, Serialize)]
pub struct AlertStateUpdate {
    /// open, dismissed (code scanning) / open, dismissed (Dependabot)
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissed_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissed_comment: Option<String>,
}

impl AlertStateUpdate {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            dismissed_reason: None,
            dismissed_comment: None,
        }
    }

    pub fn dismissed(reason: impl Into<String>, comment: Option<String>) -> Self {
        Self {
            state: "dismissed".to_string(),
            dismissed_reason: Some(reason.into()),
            dismissed_comment: comment,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependabotPackage {
    pub ecosystem: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(default)]
    pub package: Option<DependabotPackage>,
    #[serde(default)]
    pub manifest_path: Option<String>,
    /// development or runtime
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAdvisory {
    pub ghsa_id: String,
    #[serde(default)]
    pub cve_id: Option<String>,
    pub summary: String,
    pub severity: String,
}

/// Dependabot alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependabotAlert {
    pub number: u64,
    /// auto_dismissed, dismissed, fixed, open
    pub state: String,
    pub html_url: String,
    pub dependency: Dependency,
    pub security_advisory: SecurityAdvisory,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub dismissed_reason: Option<String>,
    #[serde(default)]
    pub dismissed_comment: Option<String>,
    #[serde(default)]
    pub repository: Option<Repository>,
}

/// Filters shared by Dependabot alert listings.
#[derive(Debug, Clone, Default)]
pub struct DependabotAlertFilter {
    pub state: Option<String>,
    pub severity: Option<String>,
    pub ecosystem: Option<String>,
    /// Joined with `,` on the wire
    pub packages: Vec<String>,
    pub scope: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// Secret scanning alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretScanningAlert {
    pub number: u64,
    /// open or resolved
    pub state: String,
    pub html_url: String,
    pub secret_type: String,
    #[serde(default)]
    pub secret_type_display_name: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub resolution_comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub repository: Option<Repository>,
}

/// Where a secret was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretScanningLocation {
    /// commit, issue_title, issue_body, ...
    #[serde(rename = "type")]
    pub location_type: String,
    pub details: serde_json::Value,
}

/// Filters shared by secret scanning alert listings.
#[derive(Debug, Clone, Default)]
pub struct SecretScanningAlertFilter {
    pub state: Option<String>,
    /// Joined with `,` on the wire
    pub secret_types: Vec<String>,
    /// Joined with `,` on the wire
    pub resolutions: Vec<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// Request body for resolving or reopening a secret scanning alert.
#[derive(Debug, Clone, Serialize)]
pub struct SecretScanningAlertUpdate {
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_comment: Option<String>,
}

// =============================================================================
// Packages
// =============================================================================

api_enum! {
    /// Registry a package lives in.
    PackageType {
        Npm => "npm",
        Maven => "maven",
        Rubygems => "rubygems",
        Docker => "docker",
        Nuget => "nuget",
        Container => "container",
    }
}

/// Package in an organization registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: u64,
    pub name: String,
    pub package_type: PackageType,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub version_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageVersionMetadata {
    pub package_type: PackageType,
    #[serde(default)]
    pub container: Option<ContainerMetadata>,
}

/// Version of a package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageVersion {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<PackageVersionMetadata>,
}

impl PackageVersion {
    /// Container tags of this version (empty for other package types).
    pub fn tags(&self) -> &[String] {
        self.metadata
            .as_ref()
            .and_then(|m| m.container.as_ref())
            .map(|c| c.tags.as_slice())
            .unwrap_or(&[])
    }
}

// =============================================================================
// Labels & git tags
// =============================================================================

/// Issue or pull request label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

api_enum! {
    /// Kind of object a git tag points to.
    GitObjectType {
        Commit => "commit",
        Tree => "tree",
        Blob => "blob",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitObject {
    pub sha: String,
    #[serde(rename = "type")]
    pub object_type: GitObjectType,
    pub url: String,
}

/// Author of an annotated tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagger {
    pub name: String,
    pub email: String,
    /// ISO 8601 timestamp, e.g. `2024-01-31T12:00:00Z`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Signature verification of a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub verified: bool,
    /// valid, unsigned, expired_key, ...
    pub reason: String,
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// Annotated git tag object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub node_id: Option<String>,
    pub tag: String,
    pub sha: String,
    pub url: String,
    pub message: String,
    pub tagger: Tagger,
    pub object: GitObject,
    #[serde(default)]
    pub verification: Option<Verification>,
}

/// Request body for creating an annotated tag object.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTagRequest {
    pub tag: String,
    pub message: String,
    /// SHA of the object to tag.
    pub object: String,
    #[serde(rename = "type")]
    pub object_type: GitObjectType,
    pub tagger: Tagger,
}

// =============================================================================
// Billing
// =============================================================================

/// Actions minutes used per runner OS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionsMinutesUsedBreakdown {
    #[serde(default, rename = "UBUNTU")]
    pub ubuntu: Option<u64>,
    #[serde(default, rename = "MACOS")]
    pub macos: Option<u64>,
    #[serde(default, rename = "WINDOWS")]
    pub windows: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// GitHub Actions minutes of an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsBilling {
    pub total_minutes_used: u64,
    pub total_paid_minutes_used: u64,
    pub included_minutes: u64,
    #[serde(default)]
    pub minutes_used_breakdown: ActionsMinutesUsedBreakdown,
}

/// GitHub Packages bandwidth of an organization, in gigabytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagesBilling {
    pub total_gigabytes_bandwidth_used: u64,
    pub total_paid_gigabytes_bandwidth_used: u64,
    pub included_gigabytes_bandwidth: u64,
}

/// Shared Actions and Packages storage of an organization, in gigabytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageBilling {
    pub days_left_in_billing_cycle: u64,
    pub estimated_paid_storage_for_month: u64,
    pub estimated_storage_for_month: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(login: &str) -> serde_json::Value {
        json!({"id": 1, "login": login})
    }

    fn team(slug: &str) -> serde_json::Value {
        json!({"id": 2, "name": slug, "slug": slug})
    }

    #[test]
    fn test_asset_upload_url_strips_template() {
        let release: Release = serde_json::from_value(json!({
            "id": 1,
            "tag_name": "v1.0.0",
            "html_url": "https://github.com/foo/bar/releases/tag/v1.0.0",
            "url": "https://api.github.com/repos/foo/bar/releases/1",
            "assets_url": "https://api.github.com/repos/foo/bar/releases/1/assets",
            "upload_url": "https://uploads.github.com/repos/foo/bar/releases/1/assets{?name,label}"
        }))
        .unwrap();

        assert_eq!(
            release.asset_upload_url(),
            "https://uploads.github.com/repos/foo/bar/releases/1/assets"
        );
        assert!(release.assets.is_empty());
    }

    #[test]
    fn test_api_enum_wire_names() {
        assert_eq!(MemberFilter::TwoFactorDisabled.as_str(), "2fa_disabled");
        assert_eq!(InvitationRole::DirectMember.to_string(), "direct_member");
        assert_eq!(
            serde_json::to_value(Permission::Maintain).unwrap(),
            json!("maintain")
        );
        let package_type: PackageType = serde_json::from_value(json!("container")).unwrap();
        assert_eq!(package_type, PackageType::Container);
    }

    #[test]
    fn test_protection_update_from_applied() {
        let applied: BranchProtection = serde_json::from_value(json!({
            "url": "https://api.github.com/repos/foo/bar/branches/main/protection",
            "required_status_checks": {
                "strict": true,
                "checks": [{"context": "build", "app_id": 15368}]
            },
            "required_pull_request_reviews": {
                "dismiss_stale_reviews": true,
                "require_code_owner_reviews": false,
                "required_approving_review_count": 2,
                "require_last_push_approval": false,
                "dismissal_restrictions": {
                    "users": [user("octocat")],
                    "teams": [team("core")],
                    "apps": []
                }
            },
            "restrictions": {
                "users": [],
                "teams": [team("release")],
                "apps": []
            },
            "enforce_admins": {"enabled": true},
            "allow_force_pushes": {"enabled": false},
            "lock_branch": {"enabled": false},
            "required_signatures": {"enabled": true}
        }))
        .unwrap();

        let mut update = ProtectionRulesUpdate::from_applied(&applied);
        update.lock_branch = Some(true);

        assert_eq!(update.enforce_admins, Some(true));
        assert_eq!(update.required_signatures, Some(true));
        assert_eq!(update.required_linear_history, None);

        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["lock_branch"], json!(true));
        assert_eq!(body["allow_force_pushes"], json!(false));
        assert_eq!(body["required_status_checks"]["strict"], json!(true));
        assert_eq!(
            body["required_status_checks"]["checks"],
            json!([{"context": "build", "app_id": 15368}])
        );
        assert_eq!(
            body["required_pull_request_reviews"]["required_approving_review_count"],
            json!(2)
        );
        assert_eq!(
            body["required_pull_request_reviews"]["dismissal_restrictions"],
            json!({"users": ["octocat"], "teams": ["core"], "apps": []})
        );
        assert_eq!(body["restrictions"]["teams"], json!(["release"]));
        assert!(body.get("required_signatures").is_none());
        assert!(body.get("required_linear_history").is_none());
    }

    #[test]
    fn test_protection_update_keeps_required_nulls() {
        let body = serde_json::to_value(ProtectionRulesUpdate::default()).unwrap();
        assert_eq!(
            body,
            json!({
                "required_status_checks": null,
                "enforce_admins": null,
                "required_pull_request_reviews": null,
                "restrictions": null
            })
        );
    }

    #[test]
    fn test_package_version_tags() {
        let version: PackageVersion = serde_json::from_value(json!({
            "id": 7,
            "name": "sha256:abc",
            "metadata": {
                "package_type": "container",
                "container": {"tags": ["latest", "1.2"]}
            }
        }))
        .unwrap();
        assert_eq!(version.tags(), ["latest", "1.2"]);

        let version: PackageVersion =
            serde_json::from_value(json!({"id": 8, "name": "1.0.0"})).unwrap();
        assert!(version.tags().is_empty());
    }
}
