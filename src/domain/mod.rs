pub mod pull_request;
pub mod report;
pub mod ticket;
