use crate::domain::pull_request::{CandidateReview, PullRequestCandidate};

/// A ticket key paired with its deep link into the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketReference {
    pub key: String,
    pub url: String,
    pub accomplishments: Vec<String>,
}

impl TicketReference {
    pub fn with_accomplishments(mut self, accomplishments: Vec<String>) -> Self {
        self.accomplishments = accomplishments;
        self
    }
}

/// Any key is accepted verbatim; no shape validation is performed.
pub fn build_reference(namespace: &str, key: &str) -> TicketReference {
    TicketReference {
        key: key.to_string(),
        url: browse_url(namespace, key),
        accomplishments: Vec::new(),
    }
}

pub fn browse_url(namespace: &str, key: &str) -> String {
    format!("https://{namespace}.atlassian.net/browse/{key}")
}

pub fn normalize_producer_handle(handle: &str) -> String {
    let trimmed = handle.trim();
    if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{trimmed}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTicket {
    pub key: String,
    pub url: String,
    pub pull_request_candidates: Vec<PullRequestCandidate>,
    pub review: CandidateReview,
}

impl CompletedTicket {
    pub fn new(
        reference: TicketReference,
        pull_request_candidates: Vec<PullRequestCandidate>,
        review: CandidateReview,
    ) -> Self {
        Self {
            key: reference.key,
            url: reference.url,
            pull_request_candidates,
            review,
        }
    }

    /// Candidates the user did not turn down.
    pub fn surviving_candidates(&self) -> &[PullRequestCandidate] {
        match self.review {
            CandidateReview::Accepted => &self.pull_request_candidates,
            CandidateReview::Declined | CandidateReview::NoneFound => &[],
        }
    }
}
