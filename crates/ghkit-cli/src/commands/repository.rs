use std::io::Write;

use anyhow::bail;
use clap::{Args, ValueEnum};
use ghkit_github::{
    ActorNames, CreateRepositoryRequest, GitHubApi, Permission, ProtectionRulesUpdate,
    PullRequestReviewsUpdate, RequiredStatusChecksUpdate,
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Template {
    Python,
    Go,
}

impl Template {
    fn gitignore(self) -> &'static str {
        match self {
            Template::Python => "Python",
            Template::Go => "Go",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum License {
    #[value(name = "gpl-2.0")]
    Gpl2,
    #[value(name = "gpl-3.0")]
    Gpl3,
    #[value(name = "agpl-3.0")]
    Agpl3,
}

impl License {
    fn template(self) -> &'static str {
        match self {
            License::Gpl2 => "gpl-2.0",
            License::Gpl3 => "gpl-3.0",
            License::Agpl3 => "agpl-3.0",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Visibility {
    Public,
    Private,
}

/// Arguments of `create-repository`.
#[derive(Debug, Clone, Args)]
pub(crate) struct CreateRepositoryArgs {
    /// Repository to create
    pub name: String,

    /// Organization to create the repository in. Defaults to
    /// `github.organization` from the config
    pub organization: Option<String>,

    /// Team that gets admin access to the repository
    #[arg(long)]
    pub team: Option<String>,

    /// License of the repository
    #[arg(long, value_enum, default_value_t = License::Agpl3)]
    pub license: License,

    #[arg(long, value_enum, default_value_t = Visibility::Private)]
    pub visibility: Visibility,

    #[arg(long)]
    pub description: Option<String>,

    /// Project type, selects the .gitignore template
    #[arg(long, value_enum)]
    pub template: Option<Template>,
}

/// Protection applied to the default branch of new repositories.
fn default_protection() -> ProtectionRulesUpdate {
    ProtectionRulesUpdate {
        required_status_checks: Some(RequiredStatusChecksUpdate {
            strict: true,
            checks: Vec::new(),
        }),
        required_pull_request_reviews: Some(PullRequestReviewsUpdate {
            dismiss_stale_reviews: Some(true),
            require_code_owner_reviews: Some(true),
            required_approving_review_count: Some(1),
            ..Default::default()
        }),
        restrictions: Some(ActorNames::default()),
        required_conversation_resolution: Some(true),
        allow_force_pushes: Some(false),
        allow_deletions: Some(false),
        ..Default::default()
    }
}

/// Create a repository with the organization defaults: squash/merge/rebase
/// allowed, branches deleted on merge, an initial commit with license and
/// .gitignore, and a protected default branch.
pub(crate) async fn handle_create_repository(
    api: &GitHubApi,
    args: &CreateRepositoryArgs,
    default_organization: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(organization) = args.organization.as_deref().or(default_organization) else {
        bail!("No organization given and github.organization is not configured");
    };

    let team = match &args.team {
        Some(slug) => Some(api.teams().get(organization, slug).await?),
        None => None,
    };

    let request = CreateRepositoryRequest {
        name: args.name.clone(),
        description: args.description.clone(),
        private: Some(args.visibility == Visibility::Private),
        has_projects: Some(false),
        has_wiki: Some(false),
        is_template: Some(false),
        team_id: team.as_ref().map(|t| t.id),
        auto_init: Some(true),
        gitignore_template: args.template.map(|t| t.gitignore().to_string()),
        license_template: Some(args.license.template().to_string()),
        allow_squash_merge: Some(true),
        allow_merge_commit: Some(true),
        allow_rebase_merge: Some(true),
        allow_auto_merge: Some(true),
        delete_branch_on_merge: Some(true),
        ..Default::default()
    };
    let repo = api.repositories().create(organization, &request).await?;
    info!(repository = %repo.full_name, "Repository created");

    if let Some(team) = &team {
        api.teams()
            .update_permission(organization, &team.slug, &args.name, Permission::Admin)
            .await?;
    }

    let branch = repo.default_branch.as_deref().unwrap_or("main");
    api.branches()
        .update_protection_rules(&repo.full_name, branch, &default_protection())
        .await?;

    writeln!(out, "Created repository {}", repo.html_url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{create_test_api, output};
    use httpmock::prelude::*;
    use serde_json::json;

    fn args(organization: Option<&str>, team: Option<&str>) -> CreateRepositoryArgs {
        CreateRepositoryArgs {
            name: "scanner".to_string(),
            organization: organization.map(str::to_string),
            team: team.map(str::to_string),
            license: License::Gpl3,
            visibility: Visibility::Public,
            description: Some("Vulnerability scanner".to_string()),
            template: Some(Template::Go),
        }
    }

    #[tokio::test]
    async fn test_create_repository_with_team() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/orgs/foo/teams/core");
            then.status(200)
                .json_body(json!({"id": 42, "name": "Core", "slug": "core"}));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/orgs/foo/repos").json_body(json!({
                "name": "scanner",
                "description": "Vulnerability scanner",
                "private": false,
                "has_projects": false,
                "has_wiki": false,
                "is_template": false,
                "team_id": 42,
                "auto_init": true,
                "gitignore_template": "Go",
                "license_template": "gpl-3.0",
                "allow_squash_merge": true,
                "allow_merge_commit": true,
                "allow_rebase_merge": true,
                "allow_auto_merge": true,
                "delete_branch_on_merge": true
            }));
            then.status(201).json_body(json!({
                "id": 7,
                "name": "scanner",
                "full_name": "foo/scanner",
                "html_url": "https://github.com/foo/scanner",
                "default_branch": "main"
            }));
        });
        let permission = server.mock(|when, then| {
            when.method(PUT)
                .path("/orgs/foo/teams/core/repos/foo/scanner")
                .json_body(json!({"permission": "admin"}));
            then.status(204);
        });
        let protection = server.mock(|when, then| {
            when.method(PUT)
                .path("/repos/foo/scanner/branches/main/protection")
                .json_body(json!({
                    "required_status_checks": {"strict": true, "checks": []},
                    "enforce_admins": null,
                    "required_pull_request_reviews": {
                        "dismiss_stale_reviews": true,
                        "require_code_owner_reviews": true,
                        "required_approving_review_count": 1
                    },
                    "restrictions": {"users": [], "teams": []},
                    "allow_force_pushes": false,
                    "allow_deletions": false,
                    "required_conversation_resolution": true
                }));
            then.status(200).json_body(json!({}));
        });

        let api = create_test_api(&server);
        let mut out = Vec::new();
        handle_create_repository(&api, &args(Some("foo"), Some("core")), None, &mut out)
            .await
            .unwrap();

        create.assert();
        permission.assert();
        protection.assert();
        assert_eq!(
            output(out),
            "Created repository https://github.com/foo/scanner\n"
        );
    }

    #[tokio::test]
    async fn test_create_repository_uses_configured_organization() {
        let server = MockServer::start();

        let create = server.mock(|when, then| {
            when.method(POST).path("/orgs/configured/repos");
            then.status(201).json_body(json!({
                "id": 8,
                "name": "scanner",
                "full_name": "configured/scanner",
                "html_url": "https://github.com/configured/scanner"
            }));
        });
        server.mock(|when, then| {
            when.method(PUT)
                .path("/repos/configured/scanner/branches/main/protection");
            then.status(200).json_body(json!({}));
        });

        let api = create_test_api(&server);
        let mut out = Vec::new();
        handle_create_repository(&api, &args(None, None), Some("configured"), &mut out)
            .await
            .unwrap();
        create.assert();
    }

    #[tokio::test]
    async fn test_create_repository_requires_organization() {
        let server = MockServer::start();
        let api = create_test_api(&server);

        let result = handle_create_repository(&api, &args(None, None), None, &mut Vec::new()).await;
        assert!(result.is_err());
    }
}
