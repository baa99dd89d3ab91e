use std::io::Write;
use std::path::PathBuf;
use std::pin::pin;

use clap::Args;
use futures_util::TryStreamExt;
use ghkit_github::{GitHubApi, WorkflowRunFilter};

use super::{or_dash, save_transfer};

pub(crate) struct ArtifactDownload {
    pub repository: String,
    pub artifact: u64,
    pub file: PathBuf,
}

/// Arguments of `workflow-runs`.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct WorkflowRunsArgs {
    pub repository: String,

    /// Workflow ID or file name, e.g. `main.yml`. All runs of the
    /// repository when omitted
    pub workflow: Option<String>,

    /// Only runs of this user
    #[arg(long)]
    pub actor: Option<String>,

    /// Only runs for this branch
    #[arg(long)]
    pub branch: Option<String>,

    /// Only runs triggered by this event, e.g. `push` or `pull_request`
    #[arg(long)]
    pub event: Option<String>,

    /// Only runs with this status or conclusion
    #[arg(long)]
    pub status: Option<String>,

    /// Only runs created within this date-time range
    #[arg(long)]
    pub created: Option<String>,
}

pub(crate) async fn handle_artifacts(
    api: &GitHubApi,
    repository: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut artifacts = pin!(api.artifacts().get_all(repository));
    let mut count = 0;
    while let Some(artifact) = artifacts.try_next().await? {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{:.2} KB",
            artifact.name,
            artifact.id,
            artifact.archive_download_url,
            or_dash(artifact.updated_at.as_deref()),
            if artifact.expired { "expired" } else { "active" },
            artifact.size_in_bytes as f64 / 1024.0,
        )?;
        count += 1;
    }
    writeln!(out, "{} artifacts.", count)?;
    Ok(())
}

pub(crate) async fn handle_artifact_download(
    api: &GitHubApi,
    download: &ArtifactDownload,
    out: &mut impl Write,
    progress: &mut impl Write,
) -> anyhow::Result<()> {
    let transfer = api
        .artifacts()
        .download(&download.repository, download.artifact)
        .await?;
    let label = format!("Downloading artifact {}...", download.artifact);
    let written = save_transfer(transfer, &download.file, &label, progress).await?;
    writeln!(
        out,
        "Wrote {} bytes to {}",
        written,
        download.file.display()
    )?;
    Ok(())
}

pub(crate) async fn handle_workflow_runs(
    api: &GitHubApi,
    args: &WorkflowRunsArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let filter = WorkflowRunFilter {
        workflow: args.workflow.clone(),
        actor: args.actor.clone(),
        branch: args.branch.clone(),
        event: args.event.clone(),
        status: args.status.clone(),
        created: args.created.clone(),
        exclude_pull_requests: None,
    };

    let mut runs = pin!(api.workflows().get_workflow_runs(&args.repository, &filter));
    let mut count = 0;
    while let Some(run) = runs.try_next().await? {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            or_dash(run.name.as_deref()),
            run.id,
            run.html_url,
            or_dash(run.head_branch.as_deref()),
            run.event,
            or_dash(run.conclusion.as_deref().or(run.status.as_deref())),
            or_dash(run.updated_at.as_deref()),
            or_dash(run.actor.as_ref().map(|actor| actor.login.as_str())),
        )?;
        count += 1;
    }
    writeln!(out, "{} workflow runs.", count)?;
    Ok(())
}
