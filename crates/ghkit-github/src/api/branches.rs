use ghkit_core::Result;
use serde::Serialize;
use serde_json::json;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::types::{
    BranchProtection, ProtectionFeature, ProtectionRulesUpdate, RequiredStatusChecks, StatusCheck,
};

#[derive(Serialize)]
struct StatusChecksPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<&'a [StatusCheck]>,
}

/// Branches and branch protection.
pub struct Branches<'a> {
    client: &'a GitHubClient,
}

impl<'a> Branches<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub async fn exists(&self, repo: &str, branch: &str) -> Result<bool> {
        super::exists(self.client, &format!("/repos/{}/branches/{}", repo, branch)).await
    }

    /// Delete the branch's git ref.
    pub async fn delete(&self, repo: &str, branch: &str) -> Result<()> {
        let api = format!("/repos/{}/git/refs/heads/{}", repo, branch);
        self.client.delete(&api).await
    }

    /// Protection rules currently applied to a branch.
    pub async fn protection_rules(&self, repo: &str, branch: &str) -> Result<BranchProtection> {
        let api = format!("/repos/{}/branches/{}/protection", repo, branch);
        self.client.get_json(&api, NO_PARAMS).await
    }

    /// Replace the branch's protection rules.
    ///
    /// Use [`ProtectionRulesUpdate::from_applied`] to change single settings
    /// without dropping the others. `required_signatures` is applied with a
    /// second request when set.
    pub async fn update_protection_rules(
        &self,
        repo: &str,
        branch: &str,
        rules: &ProtectionRulesUpdate,
    ) -> Result<BranchProtection> {
        let api = format!("/repos/{}/branches/{}/protection", repo, branch);
        let mut protection: BranchProtection = self.client.put_json(&api, rules).await?;

        if let Some(enabled) = rules.required_signatures {
            let feature = self.set_required_signatures(repo, branch, enabled).await?;
            protection.required_signatures = Some(feature);
        }

        Ok(protection)
    }

    pub async fn delete_protection_rules(&self, repo: &str, branch: &str) -> Result<()> {
        let api = format!("/repos/{}/branches/{}/protection", repo, branch);
        self.client.delete(&api).await
    }

    /// Enforce (or stop enforcing) the rules for administrators.
    pub async fn set_enforce_admins(
        &self,
        repo: &str,
        branch: &str,
        enforce: bool,
    ) -> Result<ProtectionFeature> {
        let api = format!(
            "/repos/{}/branches/{}/protection/enforce_admins",
            repo, branch
        );
        self.set_feature(&api, enforce).await
    }

    /// Require (or stop requiring) signed commits.
    pub async fn set_required_signatures(
        &self,
        repo: &str,
        branch: &str,
        require: bool,
    ) -> Result<ProtectionFeature> {
        let api = format!(
            "/repos/{}/branches/{}/protection/required_signatures",
            repo, branch
        );
        self.set_feature(&api, require).await
    }

    /// Change the required status checks of a protected branch.
    ///
    /// `strict` requires branches to be up to date before merging. `None`
    /// leaves a setting as it is.
    pub async fn update_required_status_checks(
        &self,
        repo: &str,
        branch: &str,
        checks: Option<&[StatusCheck]>,
        strict: Option<bool>,
    ) -> Result<RequiredStatusChecks> {
        let api = format!(
            "/repos/{}/branches/{}/protection/required_status_checks",
            repo, branch
        );
        self.client
            .patch_json(&api, &StatusChecksPatch { strict, checks })
            .await
    }

    pub async fn remove_required_status_checks(&self, repo: &str, branch: &str) -> Result<()> {
        let api = format!(
            "/repos/{}/branches/{}/protection/required_status_checks",
            repo, branch
        );
        self.client.delete(&api).await
    }

    async fn set_feature(&self, api: &str, enabled: bool) -> Result<ProtectionFeature> {
        if enabled {
            self.client.post_json(api, &json!({})).await
        } else {
            self.client.delete(api).await?;
            Ok(ProtectionFeature {
                enabled: false,
                url: Some(self.client.request_url(api)),
            })
        }
    }
}
