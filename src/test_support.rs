use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::pull_request::PullRequestCandidate;
use crate::error::{AppError, AppResult};
use crate::services::{
    ClipboardService, ConsoleService, IssueTrackerService, LineRequest, PullRequestQuery, Tone,
    VersionControlService,
};

/// Replays canned answers and records every prompt and notice.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<LineRequest>>,
    notices: Mutex<Vec<(Tone, String)>>,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|answer| answer.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<LineRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.label)
            .collect()
    }

    pub fn notices(&self) -> Vec<(Tone, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

#[async_trait]
impl ConsoleService for ScriptedConsole {
    async fn read_line(&self, request: LineRequest) -> AppResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.answers.lock().unwrap().pop_front().ok_or_else(|| {
            AppError::Console(format!("no scripted answer for '{}'", request.label))
        })
    }

    fn say(&self, tone: Tone, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((tone, message.to_string()));
    }
}

pub struct FakeIssueTracker {
    keys: Result<Vec<String>, String>,
}

impl FakeIssueTracker {
    pub fn with_keys(keys: &[&str]) -> Self {
        Self {
            keys: Ok(keys.iter().map(|key| key.to_string()).collect()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            keys: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl IssueTrackerService for FakeIssueTracker {
    async fn ticket_keys(&self, _namespace: &str) -> AppResult<Vec<String>> {
        self.keys.clone().map_err(AppError::IssueTracker)
    }
}

#[derive(Default)]
pub struct FakeVersionControl {
    responses: HashMap<String, Result<Vec<PullRequestCandidate>, String>>,
    queries: Mutex<Vec<PullRequestQuery>>,
}

impl FakeVersionControl {
    pub fn respond(mut self, issue_key: &str, candidates: Vec<PullRequestCandidate>) -> Self {
        self.responses.insert(issue_key.to_string(), Ok(candidates));
        self
    }

    pub fn fail(mut self, issue_key: &str, message: &str) -> Self {
        self.responses
            .insert(issue_key.to_string(), Err(message.to_string()));
        self
    }

    pub fn queries(&self) -> Vec<PullRequestQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionControlService for FakeVersionControl {
    async fn open_pull_requests(
        &self,
        query: &PullRequestQuery,
    ) -> AppResult<Vec<PullRequestCandidate>> {
        self.queries.lock().unwrap().push(query.clone());
        match self.responses.get(&query.issue_key) {
            Some(Ok(candidates)) => Ok(candidates.clone()),
            Some(Err(message)) => Err(AppError::PullRequests(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    fail: bool,
    copies: Mutex<Vec<String>>,
}

impl FakeClipboard {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn copies(&self) -> Vec<String> {
        self.copies.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipboardService for FakeClipboard {
    async fn copy(&self, text: &str) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Clipboard("no clipboard utility available".to_string()));
        }
        self.copies.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub fn candidate(branch_name: &str, number: u32) -> PullRequestCandidate {
    PullRequestCandidate {
        branch_name: branch_name.to_string(),
        title: format!("Work on {branch_name}"),
        link: format!("https://bitbucket.org/acme/app/pull-requests/{number}"),
    }
}

pub struct Harness {
    pub context: AppContext,
    pub console: Arc<ScriptedConsole>,
    pub version_control: Arc<FakeVersionControl>,
    pub clipboard: Arc<FakeClipboard>,
}

pub struct HarnessBuilder {
    config: AppConfig,
    answers: Vec<String>,
    issue_tracker: FakeIssueTracker,
    version_control: FakeVersionControl,
    clipboard: FakeClipboard,
}

impl HarnessBuilder {
    pub fn new(answers: &[&str]) -> Self {
        let mut config = AppConfig::default();
        config.bitbucket.workspace = Some("acme".to_string());
        config.bitbucket.username = Some("alex".to_string());
        Self {
            config,
            answers: answers.iter().map(|answer| answer.to_string()).collect(),
            issue_tracker: FakeIssueTracker::with_keys(&[]),
            version_control: FakeVersionControl::default(),
            clipboard: FakeClipboard::default(),
        }
    }

    pub fn config(mut self, edit: impl FnOnce(&mut AppConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    pub fn issue_tracker(mut self, issue_tracker: FakeIssueTracker) -> Self {
        self.issue_tracker = issue_tracker;
        self
    }

    pub fn version_control(mut self, version_control: FakeVersionControl) -> Self {
        self.version_control = version_control;
        self
    }

    pub fn clipboard(mut self, clipboard: FakeClipboard) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn build(self) -> Harness {
        let answers = self.answers.iter().map(String::as_str).collect::<Vec<_>>();
        let console = Arc::new(ScriptedConsole::new(&answers));
        let version_control = Arc::new(self.version_control);
        let clipboard = Arc::new(self.clipboard);
        let context = AppContext::new(
            self.config,
            console.clone(),
            Arc::new(self.issue_tracker),
            version_control.clone(),
            clipboard.clone(),
        );
        Harness {
            context,
            console,
            version_control,
            clipboard,
        }
    }
}
