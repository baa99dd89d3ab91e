use ghkit_core::Result;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::types::{ActionsBilling, PackagesBilling, StorageBilling};

/// Organization billing summaries.
pub struct Billing<'a> {
    client: &'a GitHubClient,
}

impl<'a> Billing<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Free and paid GitHub Actions minutes used.
    pub async fn actions(&self, organization: &str) -> Result<ActionsBilling> {
        let api = format!("/orgs/{}/settings/billing/actions", organization);
        self.client.get_json(&api, NO_PARAMS).await
    }

    /// GitHub Packages bandwidth used.
    pub async fn packages(&self, organization: &str) -> Result<PackagesBilling> {
        let api = format!("/orgs/{}/settings/billing/packages", organization);
        self.client.get_json(&api, NO_PARAMS).await
    }

    /// Estimated storage shared by Actions and Packages.
    pub async fn storage(&self, organization: &str) -> Result<StorageBilling> {
        let api = format!("/orgs/{}/settings/billing/shared-storage", organization);
        self.client.get_json(&api, NO_PARAMS).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::create_test_api;
    use ghkit_core::Error;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_billing_summaries() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/orgs/foo/settings/billing/actions");
            then.status(200).json_body(json!({
                "total_minutes_used": 305,
                "total_paid_minutes_used": 0,
                "included_minutes": 3000,
                "minutes_used_breakdown": {"UBUNTU": 205, "MACOS": 10, "WINDOWS": 90, "total": 305}
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/orgs/foo/settings/billing/packages");
            then.status(200).json_body(json!({
                "total_gigabytes_bandwidth_used": 50,
                "total_paid_gigabytes_bandwidth_used": 40,
                "included_gigabytes_bandwidth": 10
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/orgs/foo/settings/billing/shared-storage");
            then.status(200).json_body(json!({
                "days_left_in_billing_cycle": 20,
                "estimated_paid_storage_for_month": 15,
                "estimated_storage_for_month": 40
            }));
        });

        let api = create_test_api(&server);
        let billing = api.billing();

        let actions = billing.actions("foo").await.unwrap();
        assert_eq!(actions.included_minutes, 3000);
        assert_eq!(actions.minutes_used_breakdown.ubuntu, Some(205));
        assert_eq!(actions.minutes_used_breakdown.total, Some(305));

        let packages = billing.packages("foo").await.unwrap();
        assert_eq!(packages.total_paid_gigabytes_bandwidth_used, 40);

        let storage = billing.storage("foo").await.unwrap();
        assert_eq!(storage.days_left_in_billing_cycle, 20);
    }

    #[tokio::test]
    async fn test_billing_requires_admin() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/orgs/foo/settings/billing/actions");
            then.status(403)
                .json_body(json!({"message": "Must have admin rights"}));
        });

        let api = create_test_api(&server);
        assert!(matches!(
            api.billing().actions("foo").await,
            Err(Error::Forbidden(_))
        ));
    }
}
