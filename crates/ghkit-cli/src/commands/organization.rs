use std::io::Write;
use std::path::PathBuf;
use std::pin::pin;

use anyhow::bail;
use clap::{Args, ValueEnum};
use futures_util::TryStreamExt;
use ghkit_github::api::SearchQualifier;
use ghkit_github::{GitHubApi, MemberFilter, MemberRole, Permission, RepositoryType};
use tokio::task::JoinSet;
use tracing::debug;

use super::or_dash;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum MemberFilterArg {
    All,
    #[value(name = "2fa-disabled", alias = "2fa_disabled")]
    TwoFactorDisabled,
}

impl From<MemberFilterArg> for MemberFilter {
    fn from(value: MemberFilterArg) -> Self {
        match value {
            MemberFilterArg::All => MemberFilter::All,
            MemberFilterArg::TwoFactorDisabled => MemberFilter::TwoFactorDisabled,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum MemberRoleArg {
    All,
    Admin,
    Member,
}

impl From<MemberRoleArg> for MemberRole {
    fn from(value: MemberRoleArg) -> Self {
        match value {
            MemberRoleArg::All => MemberRole::All,
            MemberRoleArg::Admin => MemberRole::Admin,
            MemberRoleArg::Member => MemberRole::Member,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum RepositoryTypeArg {
    All,
    Public,
    Private,
    Forks,
    Sources,
    Member,
}

impl From<RepositoryTypeArg> for RepositoryType {
    fn from(value: RepositoryTypeArg) -> Self {
        match value {
            RepositoryTypeArg::All => RepositoryType::All,
            RepositoryTypeArg::Public => RepositoryType::Public,
            RepositoryTypeArg::Private => RepositoryType::Private,
            RepositoryTypeArg::Forks => RepositoryType::Forks,
            RepositoryTypeArg::Sources => RepositoryType::Sources,
            RepositoryTypeArg::Member => RepositoryType::Member,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum PermissionArg {
    Pull,
    Triage,
    Push,
    Maintain,
    Admin,
}

impl From<PermissionArg> for Permission {
    fn from(value: PermissionArg) -> Self {
        match value {
            PermissionArg::Pull => Permission::Pull,
            PermissionArg::Triage => Permission::Triage,
            PermissionArg::Push => Permission::Push,
            PermissionArg::Maintain => Permission::Maintain,
            PermissionArg::Admin => Permission::Admin,
        }
    }
}

/// Arguments of `team-repositories`.
#[derive(Debug, Clone, Args)]
pub(crate) struct GrantArgs {
    pub organization: String,

    /// Team(s) to give access to the repositories
    #[arg(long, required = true, num_args = 1..)]
    pub teams: Vec<String>,

    /// Repositories to give the team(s) access to
    #[arg(long, num_args = 1.., required_unless_present = "repositories_file", conflicts_with = "repositories_file")]
    pub repositories: Vec<String>,

    /// File with one repository per line, '-' for stdin
    #[arg(long)]
    pub repositories_file: Option<PathBuf>,

    /// Permission to grant
    #[arg(long, value_enum, default_value_t = PermissionArg::Pull)]
    pub permission: PermissionArg,

    /// Stop on the first error instead of continuing
    #[arg(long, alias = "failfast")]
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum SortArg {
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
}

impl SortArg {
    fn as_str(self) -> &'static str {
        match self {
            SortArg::Stars => "stars",
            SortArg::Forks => "forks",
            SortArg::HelpWantedIssues => "help-wanted-issues",
            SortArg::Updated => "updated",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum OrderArg {
    Asc,
    Desc,
}

impl OrderArg {
    fn as_str(self) -> &'static str {
        match self {
            OrderArg::Asc => "asc",
            OrderArg::Desc => "desc",
        }
    }
}

/// Arguments of `search-repositories`.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct SearchArgs {
    #[arg(required = true)]
    pub terms: Vec<String>,

    /// Restrict the search to the repositories of an organization
    #[arg(long, conflicts_with = "user")]
    pub organization: Option<String>,

    /// Restrict the search to the repositories of a user
    #[arg(long)]
    pub user: Option<String>,

    /// Search for terms within the repository name
    #[arg(long)]
    pub in_name: bool,

    /// Search for terms within the repository description
    #[arg(long)]
    pub in_description: bool,

    /// Search for terms within the README
    #[arg(long)]
    pub in_readme: bool,

    /// Search for terms within the repository topics
    #[arg(long)]
    pub in_topics: bool,

    /// Only private repositories
    #[arg(long, conflicts_with = "public")]
    pub private: bool,

    /// Only public repositories
    #[arg(long)]
    pub public: bool,

    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,
}

impl SearchArgs {
    fn qualifiers(&self) -> Vec<SearchQualifier> {
        let mut qualifiers = Vec::new();
        if self.public {
            qualifiers.push(SearchQualifier::IsPublic);
        }
        if self.private {
            qualifiers.push(SearchQualifier::IsPrivate);
        }
        if let Some(organization) = &self.organization {
            qualifiers.push(SearchQualifier::Organization(organization.clone()));
        }
        if let Some(user) = &self.user {
            qualifiers.push(SearchQualifier::User(user.clone()));
        }
        if self.in_name {
            qualifiers.push(SearchQualifier::InName);
        }
        if self.in_description {
            qualifiers.push(SearchQualifier::InDescription);
        }
        if self.in_readme {
            qualifiers.push(SearchQualifier::InReadme);
        }
        if self.in_topics {
            qualifiers.push(SearchQualifier::InTopics);
        }
        qualifiers
    }
}

pub(crate) async fn handle_teams(
    api: &GitHubApi,
    organization: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut teams = pin!(api.teams().get_all(organization));
    let mut count = 0;
    while let Some(team) = teams.try_next().await? {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            team.name,
            or_dash(team.description.as_deref()),
            or_dash(team.html_url.as_deref()),
            or_dash(team.privacy.as_deref()),
        )?;
        count += 1;
    }
    writeln!(out, "{} teams.", count)?;
    Ok(())
}

pub(crate) async fn handle_members(
    api: &GitHubApi,
    organization: &str,
    filter: MemberFilterArg,
    role: MemberRoleArg,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut members = pin!(api
        .organizations()
        .members(organization, filter.into(), role.into()));
    let mut count = 0;
    while let Some(user) = members.try_next().await? {
        writeln!(
            out,
            "{}\t{}",
            user.login,
            or_dash(user.html_url.as_deref())
        )?;
        count += 1;
    }
    writeln!(out, "{} members.", count)?;
    Ok(())
}

pub(crate) async fn handle_repositories(
    api: &GitHubApi,
    organization: &str,
    repository_type: RepositoryTypeArg,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut repositories = pin!(api
        .organizations()
        .repositories(organization, repository_type.into()));
    let mut count = 0;
    while let Some(repo) = repositories.try_next().await? {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            repo.full_name,
            or_dash(repo.visibility.as_deref()),
            repo.html_url,
            or_dash(repo.description.as_deref()),
        )?;
        count += 1;
    }
    writeln!(out, "{} repositories.", count)?;
    Ok(())
}

pub(crate) async fn handle_search(
    api: &GitHubApi,
    args: &SearchArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let terms: Vec<&str> = args.terms.iter().map(String::as_str).collect();
    let order = args.order.unwrap_or(OrderArg::Desc);
    let mut repositories = pin!(api.search().repositories(
        &terms,
        &args.qualifiers(),
        args.sort.map(SortArg::as_str),
        Some(order.as_str()),
    ));

    let mut count = 0;
    while let Some(repo) = repositories.try_next().await? {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            repo.name,
            or_dash(repo.description.as_deref()),
            repo.html_url,
            or_dash(repo.visibility.as_deref()),
        )?;
        count += 1;
    }
    writeln!(out, "{} repositories.", count)?;
    Ok(())
}

fn read_repositories(args: &GrantArgs) -> anyhow::Result<Vec<String>> {
    let Some(path) = &args.repositories_file else {
        return Ok(args.repositories.clone());
    };

    let contents = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Grant every team the permission on every repository, concurrently.
///
/// Failures are reported per team/repository pair. With `fail_fast` the
/// remaining updates are aborted after the first failure.
pub(crate) async fn handle_grant(
    api: &GitHubApi,
    args: GrantArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let repositories = read_repositories(&args)?;
    if repositories.is_empty() {
        bail!("No repositories given");
    }

    let permission: Permission = args.permission.into();
    let mut tasks = JoinSet::new();
    for team in &args.teams {
        for repo in &repositories {
            let api = api.clone();
            let organization = args.organization.clone();
            let team = team.clone();
            let repo = repo.clone();
            tasks.spawn(async move {
                let result = api
                    .teams()
                    .update_permission(&organization, &team, &repo, permission)
                    .await;
                (team, repo, result)
            });
        }
    }
    debug!(updates = tasks.len(), "Updating team permissions");

    let mut failures = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((team, repo, Ok(()))) => {
                writeln!(
                    out,
                    "Granted {} {} permission on {}/{}",
                    team, permission, args.organization, repo
                )?;
            }
            Ok((team, repo, Err(e))) => {
                failures += 1;
                writeln!(
                    out,
                    "Failed to grant {} permission on {}/{}: {}",
                    team, args.organization, repo, e
                )?;
                if args.fail_fast {
                    tasks.abort_all();
                }
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => return Err(e.into()),
        }
    }

    if failures > 0 {
        bail!("{} permission update(s) failed", failures);
    }
    Ok(())
}
