use std::fmt;

use futures_util::Stream;
use ghkit_core::Result;

use crate::client::GitHubClient;
use crate::pagination::{paginate, PageRequest};
use crate::types::Repository;

/// Search qualifier appended to the keywords of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQualifier {
    InName,
    InDescription,
    InTopics,
    InReadme,
    Repository(String),
    Organization(String),
    User(String),
    IsPublic,
    IsPrivate,
    /// Negates the wrapped qualifier
    Not(Box<SearchQualifier>),
}

impl fmt::Display for SearchQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchQualifier::InName => f.write_str("in:name"),
            SearchQualifier::InDescription => f.write_str("in:description"),
            SearchQualifier::InTopics => f.write_str("in:topics"),
            SearchQualifier::InReadme => f.write_str("in:readme"),
            SearchQualifier::Repository(repo) => write!(f, "repo:{}", repo),
            SearchQualifier::Organization(org) => write!(f, "org:{}", org),
            SearchQualifier::User(user) => write!(f, "user:{}", user),
            SearchQualifier::IsPublic => f.write_str("is:public"),
            SearchQualifier::IsPrivate => f.write_str("is:private"),
            SearchQualifier::Not(inner) => write!(f, "-{}", inner),
        }
    }
}

/// Search endpoints.
pub struct Search<'a> {
    client: &'a GitHubClient,
}

impl<'a> Search<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Search repositories by keywords and qualifiers.
    ///
    /// `sort` is one of `stars`, `forks`, `help-wanted-issues`, `updated`.
    pub fn repositories(
        &self,
        keywords: &[&str],
        qualifiers: &[SearchQualifier],
        sort: Option<&str>,
        order: Option<&str>,
    ) -> impl Stream<Item = Result<Repository>> + Send + 'static {
        let query = keywords
            .iter()
            .map(|k| k.to_string())
            .chain(qualifiers.iter().map(|q| q.to_string()))
            .collect::<Vec<_>>()
            .join(" ");

        let request = PageRequest::new("/search/repositories")
            .items_key("items")
            .param("q", query)
            .param_opt("sort", sort)
            .param_opt("order", order);
        paginate(self.client, request)
    }
}
