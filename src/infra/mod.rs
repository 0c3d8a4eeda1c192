pub mod bitbucket;
pub mod clipboard;
pub mod jira;
pub mod terminal;
