pub mod clipboard;
pub mod console;
pub mod issue_tracker;
pub mod version_control;

pub use clipboard::ClipboardService;
pub use console::{ConsoleService, LineRequest, Tone};
pub use issue_tracker::IssueTrackerService;
pub use version_control::{PullRequestQuery, VersionControlService};
