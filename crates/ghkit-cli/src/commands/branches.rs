use std::io::Write;

use ghkit_github::{GitHubApi, ProtectionRulesUpdate};
use tracing::debug;

/// Rewrite the branch protection of `branch` with one rule changed.
async fn update_applied(
    api: &GitHubApi,
    repository: &str,
    branch: &str,
    change: impl FnOnce(&mut ProtectionRulesUpdate),
) -> anyhow::Result<()> {
    let branches = api.branches();
    let applied = branches.protection_rules(repository, branch).await?;
    let mut rules = ProtectionRulesUpdate::from_applied(&applied);
    change(&mut rules);
    debug!(repository, branch, "Updating branch protection");
    branches
        .update_protection_rules(repository, branch, &rules)
        .await?;
    Ok(())
}

pub(crate) async fn handle_lock_branch(
    api: &GitHubApi,
    repository: &str,
    branch: &str,
    lock: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    update_applied(api, repository, branch, |rules| {
        rules.lock_branch = Some(lock)
    })
    .await?;

    if lock {
        writeln!(out, "Locked branch {} in {}", branch, repository)?;
    } else {
        writeln!(out, "Unlocked branch {} in {}", branch, repository)?;
    }
    Ok(())
}

pub(crate) async fn handle_enforce_admins(
    api: &GitHubApi,
    repository: &str,
    branch: &str,
    enforce: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    update_applied(api, repository, branch, |rules| {
        rules.enforce_admins = Some(enforce)
    })
    .await?;

    if enforce {
        writeln!(
            out,
            "Admin users are not allowed to bypass the branch protection rules for branch {} in {} now.",
            branch, repository
        )?;
    } else {
        writeln!(
            out,
            "Allowed admins to bypass the branch protection rules for branch {} in {} now.",
            branch, repository
        )?;
    }
    Ok(())
}

/// Flip the signed-commits requirement of a protected branch.
pub(crate) async fn handle_required_signatures(
    api: &GitHubApi,
    repository: &str,
    branch: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut required = false;
    update_applied(api, repository, branch, |rules| {
        required = !rules.required_signatures.unwrap_or(false);
        rules.required_signatures = Some(required);
    })
    .await?;

    if required {
        writeln!(
            out,
            "Signed commits are required on branch {} in {} now.",
            branch, repository
        )?;
    } else {
        writeln!(
            out,
            "Signed commits are no longer required on branch {} in {}.",
            branch, repository
        )?;
    }
    Ok(())
}
