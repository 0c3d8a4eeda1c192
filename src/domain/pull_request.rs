#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestCandidate {
    pub branch_name: String,
    pub title: String,
    pub link: String,
}

/// What happened when a completed ticket's lookup results were shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateReview {
    NoneFound,
    Accepted,
    Declined,
}

/// The one pull request that headlines an end-of-day report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestSelection {
    Resolved {
        ticket_key: String,
        candidate: PullRequestCandidate,
    },
    Manual {
        label: String,
        url: String,
    },
    None,
}

impl PullRequestSelection {
    pub fn manual(label: String, repository: &str, number: &str) -> Self {
        PullRequestSelection::Manual {
            label,
            url: pull_request_url(repository, number),
        }
    }

    /// The `(label, url)` pair to link, if any.
    pub fn link(&self) -> Option<(&str, &str)> {
        match self {
            PullRequestSelection::Resolved { candidate, .. } => {
                Some((&candidate.branch_name, &candidate.link))
            }
            PullRequestSelection::Manual { label, url } => Some((label, url)),
            PullRequestSelection::None => None,
        }
    }
}

pub fn pull_request_url(repository: &str, number: &str) -> String {
    format!("https://bitbucket.org/{repository}/pull-requests/{number}")
}
