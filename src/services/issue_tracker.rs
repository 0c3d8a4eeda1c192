use async_trait::async_trait;

use crate::error::AppResult;

/// Source of known ticket keys, used only to seed autocompletion.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn ticket_keys(&self, namespace: &str) -> AppResult<Vec<String>>;
}
