use futures_util::{Stream, TryStreamExt};
use ghkit_core::Result;
use tracing::debug;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::pagination::{paginate, PageRequest};
use crate::types::{Package, PackageType, PackageVersion};

/// Organization packages.
pub struct Packages<'a> {
    client: &'a GitHubClient,
}

impl<'a> Packages<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    fn package_api(organization: &str, package_type: PackageType, package_name: &str) -> String {
        format!(
            "/orgs/{}/packages/{}/{}",
            organization, package_type, package_name
        )
    }

    pub async fn exists(
        &self,
        organization: &str,
        package_type: PackageType,
        package_name: &str,
    ) -> Result<bool> {
        let api = Self::package_api(organization, package_type, package_name);
        super::exists(self.client, &api).await
    }

    pub async fn package(
        &self,
        organization: &str,
        package_type: PackageType,
        package_name: &str,
    ) -> Result<Package> {
        let api = Self::package_api(organization, package_type, package_name);
        self.client.get_json(&api, NO_PARAMS).await
    }

    pub fn packages(
        &self,
        organization: &str,
        package_type: PackageType,
    ) -> impl Stream<Item = Result<Package>> + Send + 'static {
        let request = PageRequest::new(format!("/orgs/{}/packages", organization))
            .param("package_type", package_type);
        paginate(self.client, request)
    }

    pub fn package_versions(
        &self,
        organization: &str,
        package_type: PackageType,
        package_name: &str,
    ) -> impl Stream<Item = Result<PackageVersion>> + Send + 'static {
        let api = Self::package_api(organization, package_type, package_name);
        paginate(self.client, PageRequest::new(format!("{}/versions", api)))
    }

    pub async fn package_version(
        &self,
        organization: &str,
        package_type: PackageType,
        package_name: &str,
        version: u64,
    ) -> Result<PackageVersion> {
        let api = Self::package_api(organization, package_type, package_name);
        self.client
            .get_json(&format!("{}/versions/{}", api, version), NO_PARAMS)
            .await
    }

    /// Container tags of a single package version.
    pub async fn package_version_tags(
        &self,
        organization: &str,
        package_type: PackageType,
        package_name: &str,
        version: u64,
    ) -> Result<Vec<String>> {
        let version = self
            .package_version(organization, package_type, package_name, version)
            .await?;
        Ok(version.tags().to_vec())
    }

    pub async fn delete_package(
        &self,
        organization: &str,
        package_type: PackageType,
        package_name: &str,
    ) -> Result<()> {
        let api = Self::package_api(organization, package_type, package_name);
        self.client.delete(&api).await
    }

    pub async fn delete_package_version(
        &self,
        organization: &str,
        package_type: PackageType,
        package_name: &str,
        version: u64,
    ) -> Result<()> {
        let api = Self::package_api(organization, package_type, package_name);
        self.client
            .delete(&format!("{}/versions/{}", api, version))
            .await
    }

    /// Delete every version carrying `tag`. Returns how many were deleted.
    pub async fn delete_package_with_tag(
        &self,
        organization: &str,
        package_type: PackageType,
        package_name: &str,
        tag: &str,
    ) -> Result<usize> {
        let tagged: Vec<PackageVersion> = self
            .package_versions(organization, package_type, package_name)
            .try_filter(|version| {
                futures_util::future::ready(version.tags().iter().any(|t| t == tag))
            })
            .try_collect()
            .await?;

        for version in &tagged {
            debug!(version = version.id, tag = tag, "Deleting tagged package version");
            self.delete_package_version(organization, package_type, package_name, version.id)
                .await?;
        }

        Ok(tagged.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::create_test_api;
    use crate::types::PackageType;
    use futures_util::TryStreamExt;
    use httpmock::prelude::*;
    use serde_json::json;

    fn package(name: &str) -> serde_json::Value {
        json!({
            "id": 197,
            "name": name,
            "package_type": "container",
            "visibility": "public",
            "version_count": 2
        })
    }

    fn version(id: u64, tags: &[&str]) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("sha256:{}", id),
            "metadata": {"package_type": "container", "container": {"tags": tags}}
        })
    }

    #[tokio::test]
    async fn test_exists_and_package() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/orgs/foo/packages/container/bar");
            then.status(200).json_body(package("bar"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/orgs/foo/packages/container/nope");
            then.status(404);
        });

        let api = create_test_api(&server);
        let packages = api.packages();
        assert!(packages
            .exists("foo", PackageType::Container, "bar")
            .await
            .unwrap());
        assert!(!packages
            .exists("foo", PackageType::Container, "nope")
            .await
            .unwrap());

        let package = packages
            .package("foo", PackageType::Container, "bar")
            .await
            .unwrap();
        assert_eq!(package.package_type, PackageType::Container);
        assert_eq!(package.version_count, 2);
    }

    #[tokio::test]
    async fn test_packages_listing() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET)
                .path("/orgs/foo/packages")
                .query_param("package_type", "container");
            then.status(200)
                .json_body(json!([package("bar"), package("baz")]));
        });

        let api = create_test_api(&server);
        let packages: Vec<_> = api
            .packages()
            .packages("foo", PackageType::Container)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(packages.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_package_with_tag() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET)
                .path("/orgs/foo/packages/container/bar/versions");
            then.status(200).json_body(json!([
                version(1, &["latest", "1.1"]),
                version(2, &["1.0"]),
                version(3, &[])
            ]));
        });
        let delete_tagged = server.mock(|when, then| {
            when.method(DELETE)
                .path("/orgs/foo/packages/container/bar/versions/1");
            then.status(204);
        });
        let delete_other = server.mock(|when, then| {
            when.method(DELETE)
                .path("/orgs/foo/packages/container/bar/versions/2");
            then.status(204);
        });

        let api = create_test_api(&server);
        let deleted = api
            .packages()
            .delete_package_with_tag("foo", PackageType::Container, "bar", "latest")
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        delete_tagged.assert();
        delete_other.assert_calls(0);
    }

    #[tokio::test]
    async fn test_delete_package() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/orgs/foo/packages/npm/bar");
            then.status(204);
        });

        let api = create_test_api(&server);
        api.packages()
            .delete_package("foo", PackageType::Npm, "bar")
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_package_version_and_tags() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET)
                .path("/orgs/foo/packages/container/scanner/versions/45");
            then.status(200).json_body(json!({
                "id": 45,
                "name": "sha256:3a2f",
                "metadata": {
                    "package_type": "container",
                    "container": {"tags": ["latest", "1.2.0"]}
                }
            }));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/orgs/foo/packages/container/scanner/versions/46");
            then.status(404);
        });

        let api = create_test_api(&server);
        let packages = api.packages();
        let version = packages
            .package_version("foo", PackageType::Container, "scanner", 45)
            .await
            .unwrap();
        assert_eq!(version.name, "sha256:3a2f");

        let tags = packages
            .package_version_tags("foo", PackageType::Container, "scanner", 45)
            .await
            .unwrap();
        assert_eq!(tags, vec!["latest", "1.2.0"]);

        assert!(packages
            .package_version_tags("foo", PackageType::Container, "scanner", 46)
            .await
            .is_err());
    }
}
