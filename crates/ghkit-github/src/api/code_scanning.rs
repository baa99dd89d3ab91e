use futures_util::Stream;
use ghkit_core::Result;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::pagination::{paginate, PageRequest};
use crate::types::{
    AlertStateUpdate, AnalysisFilter, CodeScanningAlert, CodeScanningAlertFilter,
    CodeScanningAnalysis,
};

/// Code scanning alerts and analyses.
pub struct CodeScanning<'a> {
    client: &'a GitHubClient,
}

impl<'a> CodeScanning<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    fn alert_listing(
        &self,
        api: String,
        filter: &CodeScanningAlertFilter,
    ) -> impl Stream<Item = Result<CodeScanningAlert>> + Send + 'static {
        let request = PageRequest::new(api)
            .param_opt("tool_name", filter.tool_name.as_deref())
            .param_opt("tool_guid", filter.tool_guid.as_deref())
            .param_opt("severity", filter.severity.as_deref())
            .param_opt("state", filter.state.as_deref())
            .param_opt("sort", filter.sort.as_deref())
            .param_opt("direction", filter.direction.as_deref());
        paginate(self.client, request)
    }

    /// Alerts of every repository in an organization.
    pub fn organization_alerts(
        &self,
        organization: &str,
        filter: &CodeScanningAlertFilter,
    ) -> impl Stream<Item = Result<CodeScanningAlert>> + Send + 'static {
        self.alert_listing(
            format!("/orgs/{}/code-scanning/alerts", organization),
            filter,
        )
    }

    pub fn alerts(
        &self,
        repo: &str,
        filter: &CodeScanningAlertFilter,
    ) -> impl Stream<Item = Result<CodeScanningAlert>> + Send + 'static {
        self.alert_listing(format!("/repos/{}/code-scanning/alerts", repo), filter)
    }

    pub async fn alert(&self, repo: &str, alert_number: u64) -> Result<CodeScanningAlert> {
        let api = format!("/repos/{}/code-scanning/alerts/{}", repo, alert_number);
        self.client.get_json(&api, NO_PARAMS).await
    }

    /// Dismiss or reopen an alert.
    pub async fn update_alert(
        &self,
        repo: &str,
        alert_number: u64,
        update: &AlertStateUpdate,
    ) -> Result<CodeScanningAlert> {
        let api = format!("/repos/{}/code-scanning/alerts/{}", repo, alert_number);
        self.client.patch_json(&api, update).await
    }

    pub fn analyses(
        &self,
        repo: &str,
        filter: &AnalysisFilter,
    ) -> impl Stream<Item = Result<CodeScanningAnalysis>> + Send + 'static {
        let request = PageRequest::new(format!("/repos/{}/code-scanning/analyses", repo))
            .param_opt("tool_name", filter.tool_name.as_deref())
            .param_opt("tool_guid", filter.tool_guid.as_deref())
            .param_opt("ref", filter.ref_name.as_deref())
            .param_opt("sarif_id", filter.sarif_id.as_deref())
            .param_opt("direction", filter.direction.as_deref());
        paginate(self.client, request)
    }
}
