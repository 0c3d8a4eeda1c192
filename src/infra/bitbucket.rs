use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use tracing::debug;

use crate::domain::pull_request::PullRequestCandidate;
use crate::error::{AppError, AppResult};
use crate::services::{PullRequestQuery, VersionControlService};

const DEFAULT_API_BASE: &str = "https://api.bitbucket.org/2.0";
const PAGE_LEN: u32 = 50;
const MAX_PAGES: usize = 10;

pub struct BitbucketClient {
    http: Client,
    api_base: String,
    username: Option<String>,
    token: Option<String>,
}

impl BitbucketClient {
    pub fn new(username: Option<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            username,
            token,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn credentials(&self) -> AppResult<(&str, &str)> {
        let username = self.username.as_deref().ok_or_else(|| {
            AppError::Configuration("Bitbucket username not configured".to_string())
        })?;
        let token = self.token.as_deref().ok_or_else(|| {
            AppError::Configuration("Bitbucket API token not configured".to_string())
        })?;
        Ok((username, token))
    }

    fn auth_header(username: &str, token: &str) -> String {
        let encoded = BASE64_STANDARD.encode(format!("{username}:{token}"));
        format!("Basic {encoded}")
    }

    fn pull_requests_endpoint(&self, selected_user: &str) -> String {
        format!(
            "{}/pullrequests/{selected_user}?state=OPEN&pagelen={PAGE_LEN}",
            self.api_base
        )
    }

    async fn fetch_page(&self, url: &str, auth: &str) -> AppResult<BitbucketPage> {
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::PullRequests(format!("failed to call Bitbucket: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::PullRequests(format!(
                "Bitbucket responded with {status}: {body}"
            )));
        }

        response.json().await.map_err(|err| {
            AppError::PullRequests(format!("failed to parse Bitbucket response: {err}"))
        })
    }
}

#[async_trait]
impl VersionControlService for BitbucketClient {
    async fn open_pull_requests(
        &self,
        query: &PullRequestQuery,
    ) -> AppResult<Vec<PullRequestCandidate>> {
        let (username, token) = self.credentials()?;
        let selected_user = query.selected_user.trim();
        if selected_user.is_empty() {
            return Err(AppError::Configuration(
                "no Bitbucket user to search pull requests for".to_string(),
            ));
        }
        let auth = Self::auth_header(username, token);

        let mut candidates = Vec::new();
        let mut next = Some(self.pull_requests_endpoint(selected_user));
        let mut pages = 0;
        while let Some(url) = next.take() {
            if pages == MAX_PAGES {
                break;
            }
            pages += 1;

            let page = self.fetch_page(&url, &auth).await?;
            debug!(
                issue = query.issue_key.as_str(),
                returned = page.values.len(),
                "fetched Bitbucket pull requests"
            );
            candidates.extend(
                page.values
                    .into_iter()
                    .filter(|pr| pr.belongs_to(&query.workspace))
                    .filter(|pr| pr.mentions(&query.issue_key))
                    .map(BitbucketPullRequest::into_candidate),
            );
            next = page.next;
        }

        Ok(candidates)
    }
}

/// True when `key` occurs in `text` as a whole ticket key, ignoring case.
fn mentions_key(text: &str, key: &str) -> bool {
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    text.match_indices(&key).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(|ch| ch.is_ascii_alphanumeric())
            && !after.is_some_and(|ch| ch.is_ascii_alphanumeric())
    })
}

#[derive(Deserialize)]
struct BitbucketPage {
    #[serde(default)]
    values: Vec<BitbucketPullRequest>,
    next: Option<String>,
}

#[derive(Deserialize)]
struct BitbucketPullRequest {
    title: String,
    source: BitbucketEndpoint,
    destination: BitbucketEndpoint,
    links: BitbucketLinks,
}

impl BitbucketPullRequest {
    fn belongs_to(&self, workspace: &str) -> bool {
        let workspace = workspace.trim();
        if workspace.is_empty() {
            return true;
        }
        self.destination
            .repository
            .as_ref()
            .and_then(|repository| repository.full_name.split_once('/'))
            .is_some_and(|(owner, _)| owner.eq_ignore_ascii_case(workspace))
    }

    fn mentions(&self, issue_key: &str) -> bool {
        mentions_key(&self.title, issue_key) || mentions_key(&self.source.branch.name, issue_key)
    }

    fn into_candidate(self) -> PullRequestCandidate {
        PullRequestCandidate {
            branch_name: self.source.branch.name,
            title: self.title,
            link: self.links.html.href,
        }
    }
}

#[derive(Deserialize)]
struct BitbucketEndpoint {
    branch: BitbucketBranch,
    repository: Option<BitbucketRepository>,
}

#[derive(Deserialize)]
struct BitbucketBranch {
    name: String,
}

#[derive(Deserialize)]
struct BitbucketRepository {
    full_name: String,
}

#[derive(Deserialize)]
struct BitbucketLinks {
    html: BitbucketHref,
}

#[derive(Deserialize)]
struct BitbucketHref {
    href: String,
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn pull_request_json(title: &str, branch: &str, repository: &str, id: u32) -> String {
        format!(
            r#"{{
                "title": "{title}",
                "source": {{ "branch": {{ "name": "{branch}" }}, "repository": {{ "full_name": "{repository}" }} }},
                "destination": {{ "branch": {{ "name": "main" }}, "repository": {{ "full_name": "{repository}" }} }},
                "links": {{ "html": {{ "href": "https://bitbucket.org/{repository}/pull-requests/{id}" }} }}
            }}"#
        )
    }

    fn query(issue_key: &str) -> PullRequestQuery {
        PullRequestQuery {
            workspace: "acme".to_string(),
            issue_key: issue_key.to_string(),
            selected_user: "alex".to_string(),
        }
    }

    #[test]
    fn matches_whole_ticket_keys_only() {
        assert!(mentions_key("feature/ABC-1-login", "ABC-1"));
        assert!(mentions_key("abc-1: fix login", "ABC-1"));
        assert!(!mentions_key("feature/ABC-12", "ABC-1"));
        assert!(!mentions_key("XABC-1", "ABC-1"));
        assert!(mentions_key("XABC-1 and ABC-1", "ABC-1"));
        assert!(!mentions_key("anything", ""));
    }

    #[tokio::test]
    async fn filters_by_workspace_and_issue_key() {
        let mut server = mockito::Server::new_async().await;
        let body = format!(
            r#"{{ "values": [{}, {}, {}, {}] }}"#,
            pull_request_json("Login fix", "fix/ABC-1", "acme/app", 7),
            pull_request_json("ABC-1 follow up", "chore/cleanup", "acme/web", 8),
            pull_request_json("Other", "fix/ABC-1", "elsewhere/app", 9),
            pull_request_json("Unrelated", "feature/ABC-12", "acme/app", 10),
        );
        let mock = server
            .mock("GET", "/pullrequests/alex")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("state".into(), "OPEN".into()),
                Matcher::UrlEncoded("pagelen".into(), "50".into()),
            ]))
            .match_header("authorization", "Basic YWxleDpzZWNyZXQ=")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = BitbucketClient::new(Some("alex".to_string()), Some("secret".to_string()))
            .with_api_base(server.url());
        let candidates = client.open_pull_requests(&query("ABC-1")).await.unwrap();

        assert_eq!(
            candidates,
            vec![
                PullRequestCandidate {
                    branch_name: "fix/ABC-1".to_string(),
                    title: "Login fix".to_string(),
                    link: "https://bitbucket.org/acme/app/pull-requests/7".to_string(),
                },
                PullRequestCandidate {
                    branch_name: "chore/cleanup".to_string(),
                    title: "ABC-1 follow up".to_string(),
                    link: "https://bitbucket.org/acme/web/pull-requests/8".to_string(),
                },
            ]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn follows_next_links() {
        let mut server = mockito::Server::new_async().await;
        let next_url = format!("{}/pullrequests/alex/page-2", server.url());
        let first_body = format!(
            r#"{{ "values": [{}], "next": "{next_url}" }}"#,
            pull_request_json("First", "fix/ABC-1", "acme/app", 1),
        );
        let second_body = format!(
            r#"{{ "values": [{}] }}"#,
            pull_request_json("Second", "fix/ABC-1-again", "acme/app", 2),
        );
        server
            .mock("GET", "/pullrequests/alex")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(first_body)
            .create_async()
            .await;
        server
            .mock("GET", "/pullrequests/alex/page-2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(second_body)
            .create_async()
            .await;

        let client = BitbucketClient::new(Some("alex".to_string()), Some("secret".to_string()))
            .with_api_base(server.url());
        let candidates = client.open_pull_requests(&query("ABC-1")).await.unwrap();

        let titles: Vec<&str> = candidates.iter().map(|pr| pr.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn server_errors_surface_as_lookup_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pullrequests/alex")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = BitbucketClient::new(Some("alex".to_string()), Some("secret".to_string()))
            .with_api_base(server.url());
        let err = client.open_pull_requests(&query("ABC-1")).await.unwrap_err();

        assert!(matches!(err, AppError::PullRequests(_)));
    }

    #[tokio::test]
    async fn missing_credentials_are_configuration_errors() {
        let client = BitbucketClient::new(None, None);
        let err = client.open_pull_requests(&query("ABC-1")).await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
