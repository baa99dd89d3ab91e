//! GitHub REST client for ghkit.
//!
//! Listings are exposed as lazy streams that follow GitHub's pagination,
//! downloads and uploads as progress-tracked chunk streams, and batches of
//! release asset uploads run concurrently and report in completion order.

pub mod api;
pub mod client;
pub mod pagination;
pub mod transfer;
pub mod types;
pub mod upload;

pub use api::GitHubApi;
pub use client::{GitHubClient, GitHubClientBuilder};
pub use ghkit_core::{Error, Result};
pub use pagination::{paginate, paginate_items, LinkHeader, PageRequest, Strategy};
pub use transfer::Transfer;
pub use types::*;
pub use upload::{upload_many, UploadFile};
