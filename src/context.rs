use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{
    ClipboardService, ConsoleService, IssueTrackerService, VersionControlService,
};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub console: Arc<dyn ConsoleService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub version_control: Arc<dyn VersionControlService>,
    pub clipboard: Arc<dyn ClipboardService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        console: Arc<dyn ConsoleService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
        version_control: Arc<dyn VersionControlService>,
        clipboard: Arc<dyn ClipboardService>,
    ) -> Self {
        Self {
            config,
            console,
            issue_tracker,
            version_control,
            clipboard,
        }
    }
}
