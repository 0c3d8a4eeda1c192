use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const TICKET_JQL: &str = "assignee = currentUser() ORDER BY updated DESC";
const MAX_PAGES: u32 = 20;

pub struct JiraClient {
    http: Client,
    host: Option<String>,
    email: Option<String>,
    token: Option<String>,
    batch_size: u32,
    delay: Duration,
}

impl JiraClient {
    pub fn new(
        host: Option<String>,
        email: Option<String>,
        token: Option<String>,
        batch_size: u32,
        delay_ms: u64,
    ) -> Self {
        Self {
            http: Client::new(),
            host,
            email,
            token,
            batch_size: batch_size.max(1),
            delay: Duration::from_millis(delay_ms),
        }
    }

    fn credentials(&self) -> AppResult<(&str, &str)> {
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira email not configured".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((email, token))
    }

    /// Configured host, or the namespace's Atlassian cloud site.
    fn base_url(&self, namespace: &str) -> AppResult<String> {
        if let Some(host) = self.host.as_deref().filter(|host| !host.trim().is_empty()) {
            return Ok(normalize_host(host));
        }
        let namespace = namespace.trim();
        if namespace.is_empty() {
            return Err(AppError::Configuration(
                "Jira host not configured and no namespace given".to_string(),
            ));
        }
        Ok(format!("https://{namespace}.atlassian.net"))
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn search_endpoint(base_url: &str) -> String {
        format!("{base_url}/rest/api/3/search")
    }

    async fn fetch_page(
        &self,
        base_url: &str,
        auth: &str,
        start_at: u32,
    ) -> AppResult<JiraSearchResponse> {
        let response = self
            .http
            .get(Self::search_endpoint(base_url))
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json")
            .query(&[
                ("jql", TICKET_JQL.to_string()),
                ("fields", "key".to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", self.batch_size.to_string()),
            ])
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to parse Jira response: {err}")))
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn ticket_keys(&self, namespace: &str) -> AppResult<Vec<String>> {
        let (email, token) = self.credentials()?;
        let base_url = self.base_url(namespace)?;
        let auth = Self::auth_header(email, token);

        let mut keys: Vec<String> = Vec::new();
        let mut start_at = 0;
        for page in 0..MAX_PAGES {
            if page > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let payload = self.fetch_page(&base_url, &auth, start_at).await?;
            let fetched = payload.issues.len() as u32;
            debug!(page, fetched, total = payload.total, "fetched Jira ticket keys");

            for issue in payload.issues {
                if !keys.contains(&issue.key) {
                    keys.push(issue.key);
                }
            }

            start_at += fetched;
            if fetched == 0 || start_at >= payload.total {
                break;
            }
        }

        Ok(keys)
    }
}

fn normalize_host(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[derive(Deserialize)]
struct JiraSearchResponse {
    #[serde(default)]
    total: u32,
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Deserialize)]
struct JiraIssue {
    key: String,
}
