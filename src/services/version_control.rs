use async_trait::async_trait;

use crate::domain::pull_request::PullRequestCandidate;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestQuery {
    pub workspace: String,
    pub issue_key: String,
    pub selected_user: String,
}

#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Open pull requests mentioning the issue key, best match first.
    async fn open_pull_requests(
        &self,
        query: &PullRequestQuery,
    ) -> AppResult<Vec<PullRequestCandidate>>;
}
