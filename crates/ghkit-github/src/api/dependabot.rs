use futures_util::Stream;
use ghkit_core::Result;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::pagination::{paginate, PageRequest};
use crate::types::{AlertStateUpdate, DependabotAlert, DependabotAlertFilter};

/// Dependabot alerts.
pub struct Dependabot<'a> {
    client: &'a GitHubClient,
}

impl<'a> Dependabot<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    fn alert_listing(
        &self,
        api: String,
        filter: &DependabotAlertFilter,
    ) -> impl Stream<Item = Result<DependabotAlert>> + Send + 'static {
        let packages = (!filter.packages.is_empty()).then(|| filter.packages.join(","));
        let request = PageRequest::new(api)
            .param_opt("state", filter.state.as_deref())
            .param_opt("severity", filter.severity.as_deref())
            .param_opt("ecosystem", filter.ecosystem.as_deref())
            .param_opt("package", packages)
            .param_opt("scope", filter.scope.as_deref())
            .param_opt("sort", filter.sort.as_deref())
            .param_opt("direction", filter.direction.as_deref());
        paginate(self.client, request)
    }

    pub fn enterprise_alerts(
        &self,
        enterprise: &str,
        filter: &DependabotAlertFilter,
    ) -> impl Stream<Item = Result<DependabotAlert>> + Send + 'static {
        self.alert_listing(
            format!("/enterprises/{}/dependabot/alerts", enterprise),
            filter,
        )
    }

    pub fn organization_alerts(
        &self,
        organization: &str,
        filter: &DependabotAlertFilter,
    ) -> impl Stream<Item = Result<DependabotAlert>> + Send + 'static {
        self.alert_listing(format!("/orgs/{}/dependabot/alerts", organization), filter)
    }

    pub fn alerts(
        &self,
        repo: &str,
        filter: &DependabotAlertFilter,
    ) -> impl Stream<Item = Result<DependabotAlert>> + Send + 'static {
        self.alert_listing(format!("/repos/{}/dependabot/alerts", repo), filter)
    }

    pub async fn alert(&self, repo: &str, alert_number: u64) -> Result<DependabotAlert> {
        let api = format!("/repos/{}/dependabot/alerts/{}", repo, alert_number);
        self.client.get_json(&api, NO_PARAMS).await
    }

    pub async fn update_alert(
        &self,
        repo: &str,
        alert_number: u64,
        update: &AlertStateUpdate,
    ) -> Result<DependabotAlert> {
        let api = format!("/repos/{}/dependabot/alerts/{}", repo, alert_number);
        self.client.patch_json(&api, update).await
    }
}
