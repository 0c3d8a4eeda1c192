use crate::domain::pull_request::PullRequestSelection;
use crate::domain::ticket::{CompletedTicket, TicketReference};

/// Asked verbatim and reused as the rendered section header.
pub const ESTIMATE_QUESTION: &str = "Will any of these tickets exceed the original estimate? If so, what should the estimates be changed to? (notify the producer, but don't change the estimate yourself)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Standup,
    EndOfDay,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Standup => "standup",
            ReportKind::EndOfDay => "eod",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandupAnswers {
    pub producer: String,
    pub namespace: String,
    pub tickets: Vec<TicketReference>,
    pub estimate_exceeded: String,
    pub work_remaining: String,
    pub time_remaining: String,
    pub completion_date: String,
    pub blockers: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EodAnswers {
    pub producer: String,
    pub namespace: String,
    pub tickets: Vec<TicketReference>,
    /// Accomplishments not tied to a ticket; only asked when no tickets were entered.
    pub accomplishments: Vec<String>,
    pub completed_tickets: Vec<CompletedTicket>,
    pub status: String,
    pub pull_request: PullRequestSelection,
    pub blockers: String,
    pub tomorrow: String,
}

/// Frozen output of one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerRecord {
    Standup(StandupAnswers),
    EndOfDay(EodAnswers),
}

impl AnswerRecord {
    pub fn namespace(&self) -> &str {
        match self {
            AnswerRecord::Standup(answers) => &answers.namespace,
            AnswerRecord::EndOfDay(answers) => &answers.namespace,
        }
    }

    pub fn ticket_count(&self) -> usize {
        match self {
            AnswerRecord::Standup(answers) => answers.tickets.len(),
            AnswerRecord::EndOfDay(answers) => answers.tickets.len(),
        }
    }
}
