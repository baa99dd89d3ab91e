//! ghkit CLI - scripts for GitHub organizations and repositories.

mod commands;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ghkit_core::config::resolve_token;
use ghkit_core::Config;
use ghkit_github::GitHubApi;
use tracing_subscriber::EnvFilter;

use commands::actions::{self, ArtifactDownload, WorkflowRunsArgs};
use commands::branches;
use commands::config::{self as config_cmd, ConfigCommands};
use commands::organization::{
    self, GrantArgs, MemberFilterArg, MemberRoleArg, RepositoryTypeArg, SearchArgs,
};
use commands::pull_requests::{self, FileStatusArgs, PullRequestArgs};
use commands::releases::{self, ArchiveType};
use commands::repository::{self, CreateRepositoryArgs};

#[derive(Parser)]
#[command(name = "ghkit")]
#[command(author, version, about = "ghkit - scripts for GitHub organizations and repositories", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// GitHub token. Defaults to $GITHUB_TOKEN, then $GH_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    /// GitHub API URL (for GitHub Enterprise)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the teams of an organization
    Teams {
        organization: String,
    },

    /// Grant teams a permission on repositories of an organization
    TeamRepositories(GrantArgs),

    /// List the members of an organization
    Members {
        organization: String,

        /// Filter members
        #[arg(short, long, value_enum, default_value_t = MemberFilterArg::All)]
        filter: MemberFilterArg,

        /// Show only members in this role
        #[arg(short, long, value_enum, default_value_t = MemberRoleArg::All)]
        role: MemberRoleArg,
    },

    /// List the repositories of an organization
    Repositories {
        organization: String,

        /// Type of repositories to list
        #[arg(short = 't', long = "type", value_enum, default_value_t = RepositoryTypeArg::All)]
        repository_type: RepositoryTypeArg,
    },

    /// Search repositories
    SearchRepositories(SearchArgs),

    /// List the artifacts of a repository
    Artifacts {
        repository: String,
    },

    /// Download a single artifact of a repository
    ArtifactsDownload {
        repository: String,

        /// ID of the artifact to download
        artifact: u64,

        /// File to write the artifact to
        #[arg(long, default_value = "out.file")]
        file: PathBuf,
    },

    /// List the runs of a workflow
    WorkflowRuns(WorkflowRunsArgs),

    /// Lock (or unlock) a branch via branch protection
    LockBranch {
        /// org/repo combination
        repository: String,

        branch: String,

        /// Unlock the branch instead
        #[arg(long)]
        unlock: bool,
    },

    /// Stop admins from bypassing the branch protection rules
    EnforceAdmins {
        /// org/repo combination
        repository: String,

        branch: String,

        /// Allow admins to bypass the rules again
        #[arg(long)]
        disable: bool,
    },

    /// Toggle whether signed commits are required on a protected branch
    RequiredSignatures {
        /// org/repo combination
        repository: String,

        branch: String,
    },

    /// Create a pull request
    #[command(visible_alias = "pr")]
    PullRequest(PullRequestArgs),

    /// List the changed files of a pull request by status
    #[command(visible_alias = "status")]
    FileStatus(FileStatusArgs),

    /// Create a repository with default settings
    CreateRepository(CreateRepositoryArgs),

    /// Download the source archive of a release
    ReleaseAssetsDownload {
        repository: String,

        /// Release tag
        tag: String,

        /// File to write the archive to
        #[arg(long, default_value = "out.file")]
        file: PathBuf,

        /// Archive type
        #[arg(long = "type", value_enum, default_value_t = ArchiveType::Tar)]
        archive_type: ArchiveType,
    },

    /// Upload files to a release
    ReleaseAssetsUpload {
        repository: String,

        /// Release tag
        tag: String,

        /// Files to upload, as PATH or PATH:CONTENT_TYPE
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();

    if let Commands::Config { command } = cli.command {
        return config_cmd::handle_config(command, &mut stdout);
    }

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(url) = &cli.url {
        config.set("github.base_url", url)?;
    }
    if let Some(timeout) = cli.timeout {
        config.set("github.timeout", &timeout.to_string())?;
    }

    let token = resolve_token(cli.token);
    if token.is_none() {
        tracing::warn!("No GitHub token given, requests are unauthenticated");
    }

    let api = GitHubApi::from_config(&config, token)?;
    run(&api, &config, cli.command, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}

async fn run(
    api: &GitHubApi,
    config: &Config,
    command: Commands,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Teams { organization } => organization::handle_teams(api, &organization, out).await,
        Commands::TeamRepositories(args) => organization::handle_grant(api, args, out).await,
        Commands::Members {
            organization,
            filter,
            role,
        } => organization::handle_members(api, &organization, filter, role, out).await,
        Commands::Repositories {
            organization,
            repository_type,
        } => organization::handle_repositories(api, &organization, repository_type, out).await,
        Commands::SearchRepositories(args) => organization::handle_search(api, &args, out).await,
        Commands::Artifacts { repository } => {
            actions::handle_artifacts(api, &repository, out).await
        }
        Commands::ArtifactsDownload {
            repository,
            artifact,
            file,
        } => {
            let download = ArtifactDownload {
                repository,
                artifact,
                file,
            };
            actions::handle_artifact_download(api, &download, out, &mut std::io::stderr()).await
        }
        Commands::WorkflowRuns(args) => actions::handle_workflow_runs(api, &args, out).await,
        Commands::LockBranch {
            repository,
            branch,
            unlock,
        } => branches::handle_lock_branch(api, &repository, &branch, !unlock, out).await,
        Commands::EnforceAdmins {
            repository,
            branch,
            disable,
        } => branches::handle_enforce_admins(api, &repository, &branch, !disable, out).await,
        Commands::RequiredSignatures { repository, branch } => {
            branches::handle_required_signatures(api, &repository, &branch, out).await
        }
        Commands::PullRequest(args) => pull_requests::handle_pull_request(api, &args, out).await,
        Commands::FileStatus(args) => pull_requests::handle_file_status(api, &args, out).await,
        Commands::CreateRepository(args) => {
            repository::handle_create_repository(api, &args, config.organization(), out).await
        }
        Commands::ReleaseAssetsDownload {
            repository,
            tag,
            file,
            archive_type,
        } => {
            releases::handle_download(
                api,
                &repository,
                &tag,
                archive_type,
                &file,
                out,
                &mut std::io::stderr(),
            )
            .await
        }
        Commands::ReleaseAssetsUpload {
            repository,
            tag,
            files,
        } => releases::handle_upload(api, &repository, &tag, &files, out).await,
        Commands::Config { command } => config_cmd::handle_config(command, out),
    }
}
