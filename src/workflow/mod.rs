pub mod collector;
pub mod prompt;
pub mod pull_request;
