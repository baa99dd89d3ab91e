use futures_util::Stream;
use ghkit_core::Result;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::pagination::{paginate, PageRequest};
use crate::types::{
    SecretScanningAlert, SecretScanningAlertFilter, SecretScanningAlertUpdate,
    SecretScanningLocation,
};

/// Secret scanning alerts.
pub struct SecretScanning<'a> {
    client: &'a GitHubClient,
}

impl<'a> SecretScanning<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    fn alert_listing(
        &self,
        api: String,
        filter: &SecretScanningAlertFilter,
    ) -> impl Stream<Item = Result<SecretScanningAlert>> + Send + 'static {
        let secret_types = (!filter.secret_types.is_empty()).then(|| filter.secret_types.join(","));
        let resolutions = (!filter.resolutions.is_empty()).then(|| filter.resolutions.join(","));
        let request = PageRequest::new(api)
            .param_opt("state", filter.state.as_deref())
            .param_opt("secret_type", secret_types)
            .param_opt("resolution", resolutions)
            .param_opt("sort", filter.sort.as_deref())
            .param_opt("direction", filter.direction.as_deref());
        paginate(self.client, request)
    }

    pub fn enterprise_alerts(
        &self,
        enterprise: &str,
        filter: &SecretScanningAlertFilter,
    ) -> impl Stream<Item = Result<SecretScanningAlert>> + Send + 'static {
        self.alert_listing(
            format!("/enterprises/{}/secret-scanning/alerts", enterprise),
            filter,
        )
    }

    pub fn organization_alerts(
        &self,
        organization: &str,
        filter: &SecretScanningAlertFilter,
    ) -> impl Stream<Item = Result<SecretScanningAlert>> + Send + 'static {
        self.alert_listing(
            format!("/orgs/{}/secret-scanning/alerts", organization),
            filter,
        )
    }

    pub fn alerts(
        &self,
        repo: &str,
        filter: &SecretScanningAlertFilter,
    ) -> impl Stream<Item = Result<SecretScanningAlert>> + Send + 'static {
        self.alert_listing(format!("/repos/{}/secret-scanning/alerts", repo), filter)
    }

    pub async fn alert(&self, repo: &str, alert_number: u64) -> Result<SecretScanningAlert> {
        let api = format!("/repos/{}/secret-scanning/alerts/{}", repo, alert_number);
        self.client.get_json(&api, NO_PARAMS).await
    }

    /// Resolve or reopen an alert.
    pub async fn update_alert(
        &self,
        repo: &str,
        alert_number: u64,
        update: &SecretScanningAlertUpdate,
    ) -> Result<SecretScanningAlert> {
        let api = format!("/repos/{}/secret-scanning/alerts/{}", repo, alert_number);
        self.client.patch_json(&api, update).await
    }

    /// Places where the secret of an alert was found.
    pub fn locations(
        &self,
        repo: &str,
        alert_number: u64,
    ) -> impl Stream<Item = Result<SecretScanningLocation>> + Send + 'static {
        let api = format!(
            "/repos/{}/secret-scanning/alerts/{}/locations",
            repo, alert_number
        );
        paginate(self.client, PageRequest::new(api))
    }
}
