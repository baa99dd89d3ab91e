use futures_util::Stream;
use ghkit_core::Result;
use serde_json::json;

use crate::client::{GitHubClient, NO_PARAMS};
use crate::pagination::{paginate, PageRequest};
use crate::types::{EmailInformation, SshPublicKey, User};

/// Users and the authenticated user's account.
pub struct Users<'a> {
    client: &'a GitHubClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Every user, in sign-up order.
    pub fn users(&self) -> impl Stream<Item = Result<User>> + Send + 'static {
        paginate(self.client, PageRequest::new("/users"))
    }

    pub async fn user(&self, username: &str) -> Result<User> {
        self.client
            .get_json(&format!("/users/{}", username), NO_PARAMS)
            .await
    }

    /// User the token belongs to.
    pub async fn current_user(&self) -> Result<User> {
        self.client.get_json("/user", NO_PARAMS).await
    }

    /// Public SSH keys of the authenticated user.
    pub fn keys(&self) -> impl Stream<Item = Result<SshPublicKey>> + Send + 'static {
        paginate(self.client, PageRequest::new("/user/keys"))
    }

    /// Public SSH keys of any user.
    pub fn user_keys(
        &self,
        username: &str,
    ) -> impl Stream<Item = Result<SshPublicKey>> + Send + 'static {
        paginate(
            self.client,
            PageRequest::new(format!("/users/{}/keys", username)),
        )
    }

    /// Key of the authenticated user, with title and verification state.
    pub async fn key(&self, key_id: u64) -> Result<SshPublicKey> {
        self.client
            .get_json(&format!("/user/keys/{}", key_id), NO_PARAMS)
            .await
    }

    pub async fn create_key(&self, title: &str, key: &str) -> Result<SshPublicKey> {
        self.client
            .post_json("/user/keys", &json!({ "title": title, "key": key }))
            .await
    }

    pub async fn delete_key(&self, key_id: u64) -> Result<()> {
        self.client.delete(&format!("/user/keys/{}", key_id)).await
    }

    pub fn emails(&self) -> impl Stream<Item = Result<EmailInformation>> + Send + 'static {
        paginate(self.client, PageRequest::new("/user/emails"))
    }
}
