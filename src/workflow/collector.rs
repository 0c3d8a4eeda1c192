use tracing::{debug, warn};

use crate::context::AppContext;
use crate::domain::pull_request::PullRequestSelection;
use crate::domain::report::{
    AnswerRecord, ESTIMATE_QUESTION, EodAnswers, ReportKind, StandupAnswers,
};
use crate::domain::ticket::{
    CompletedTicket, TicketReference, build_reference, normalize_producer_handle,
};
use crate::error::AppResult;
use crate::workflow::prompt::{RepeatablePrompt, ask_list, ask_repeatable, ask_text};
use crate::workflow::pull_request::{review_completed_ticket, select_primary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Producer,
    Namespace,
    TicketKeys,
    Accomplishments,
    EstimateExceeded,
    WorkRemaining,
    TimeRemaining,
    CompletionDate,
    CompletedTickets,
    Status,
    PullRequest,
    Blockers,
    Tomorrow,
}

const STANDUP_STEPS: &[Step] = &[
    Step::Producer,
    Step::Namespace,
    Step::TicketKeys,
    Step::Accomplishments,
    Step::EstimateExceeded,
    Step::WorkRemaining,
    Step::TimeRemaining,
    Step::CompletionDate,
    Step::Blockers,
];

const EOD_STEPS: &[Step] = &[
    Step::Producer,
    Step::Namespace,
    Step::TicketKeys,
    Step::Accomplishments,
    Step::CompletedTickets,
    Step::Status,
    Step::PullRequest,
    Step::Blockers,
    Step::Tomorrow,
];

/// The ordered steps one run walks through.
pub fn plan(kind: ReportKind, track_accomplishments: bool) -> Vec<Step> {
    let steps = match kind {
        ReportKind::Standup => STANDUP_STEPS,
        ReportKind::EndOfDay => EOD_STEPS,
    };
    steps
        .iter()
        .copied()
        .filter(|step| track_accomplishments || *step != Step::Accomplishments)
        .collect()
}

pub async fn collect_answers(ctx: &AppContext, kind: ReportKind) -> AppResult<AnswerRecord> {
    let track_accomplishments = ctx.config.report(kind).track_accomplishments;
    let mut draft = AnswerDraft::default();

    for step in plan(kind, track_accomplishments) {
        debug!(report = kind.as_str(), ?step, "collecting");
        draft.run_step(ctx, kind, step).await?;
    }

    Ok(draft.freeze(kind))
}

#[derive(Default)]
struct AnswerDraft {
    producer: String,
    namespace: String,
    known_keys: Vec<String>,
    tickets: Vec<TicketReference>,
    accomplishments: Vec<String>,
    estimate_exceeded: String,
    work_remaining: String,
    time_remaining: String,
    completion_date: String,
    completed_tickets: Vec<CompletedTicket>,
    status: String,
    pull_request: Option<PullRequestSelection>,
    blockers: String,
    tomorrow: String,
}

impl AnswerDraft {
    async fn run_step(&mut self, ctx: &AppContext, kind: ReportKind, step: Step) -> AppResult<()> {
        let console = ctx.console.as_ref();
        match step {
            Step::Producer => {
                let handle = ask_text(
                    console,
                    "Who is the producer? (e.g. @alex)",
                    ctx.config.default_producer.as_deref(),
                    &[],
                )
                .await?;
                self.producer = normalize_producer_handle(&handle);
            }
            Step::Namespace => {
                self.namespace = ask_text(
                    console,
                    "Jira company subdomain (company in https://company.atlassian.net)",
                    ctx.config.default_namespace.as_deref(),
                    &[],
                )
                .await?;
            }
            Step::TicketKeys => {
                self.known_keys = self.fetch_known_keys(ctx).await;
                let label = match kind {
                    ReportKind::Standup => {
                        "Ticket keys you're working on (space-separated, e.g. ABC-123 DEF-456)"
                    }
                    ReportKind::EndOfDay => {
                        "Ticket keys you worked on today (space-separated, e.g. ABC-123 DEF-456)"
                    }
                };
                let keys = ask_list(console, label, &self.known_keys).await?;
                self.tickets = keys
                    .iter()
                    .map(|key| build_reference(&self.namespace, key))
                    .collect();
            }
            Step::Accomplishments if self.tickets.is_empty() => {
                if kind == ReportKind::EndOfDay {
                    self.accomplishments = ask_repeatable(
                        console,
                        "What did you accomplish today?",
                        "Anything else accomplished today?",
                        &[],
                    )
                    .await?;
                }
            }
            Step::Accomplishments => {
                let mut tickets = Vec::with_capacity(self.tickets.len());
                for ticket in std::mem::take(&mut self.tickets) {
                    let accomplishments = ask_repeatable(
                        console,
                        &format!("What did you accomplish on {}?", ticket.key),
                        &format!("Anything else accomplished on {}?", ticket.key),
                        &[],
                    )
                    .await?;
                    tickets.push(ticket.with_accomplishments(accomplishments));
                }
                self.tickets = tickets;
            }
            Step::EstimateExceeded => {
                self.estimate_exceeded = ask_text(console, ESTIMATE_QUESTION, None, &[]).await?;
            }
            Step::WorkRemaining => {
                self.work_remaining = ask_text(console, "Work remaining", None, &[]).await?;
            }
            Step::TimeRemaining => {
                self.time_remaining = ask_text(console, "Time remaining", None, &[]).await?;
            }
            Step::CompletionDate => {
                self.completion_date = ask_text(console, "Completion date", None, &[]).await?;
            }
            Step::CompletedTickets => {
                self.completed_tickets = self.collect_completed(ctx).await?;
            }
            Step::Status => {
                self.status = ask_text(console, "Current status/progress", None, &[]).await?;
            }
            Step::PullRequest => {
                let selection = select_primary(ctx, &self.completed_tickets).await?;
                if let PullRequestSelection::Resolved {
                    ticket_key,
                    candidate,
                } = &selection
                {
                    debug!(
                        ticket = ticket_key.as_str(),
                        branch = candidate.branch_name.as_str(),
                        "using found pull request"
                    );
                }
                self.pull_request = Some(selection);
            }
            Step::Blockers => {
                let label = match kind {
                    ReportKind::Standup => "Blockers or dependencies",
                    ReportKind::EndOfDay => "Blockers or issues",
                };
                self.blockers = ask_text(console, label, None, &[]).await?;
            }
            Step::Tomorrow => {
                self.tomorrow = ask_text(console, "Plan for tomorrow", None, &[]).await?;
            }
        }
        Ok(())
    }

    async fn fetch_known_keys(&self, ctx: &AppContext) -> Vec<String> {
        match ctx.issue_tracker.ticket_keys(&self.namespace).await {
            Ok(keys) => {
                debug!(count = keys.len(), "loaded ticket key suggestions");
                keys
            }
            Err(err) => {
                warn!(error = %err, "ticket key suggestions unavailable");
                Vec::new()
            }
        }
    }

    async fn collect_completed(&self, ctx: &AppContext) -> AppResult<Vec<CompletedTicket>> {
        let mut suggestions: Vec<String> = self.tickets.iter().map(|t| t.key.clone()).collect();
        for key in &self.known_keys {
            if !suggestions.contains(key) {
                suggestions.push(key.clone());
            }
        }

        let mut prompt = RepeatablePrompt::new(
            "Any ticket completed today? (enter ticket key like ABC-123, or leave blank if none)",
            "Any other tickets completed?",
            &suggestions,
        );
        let mut completed = Vec::new();
        while let Some(key) = prompt.next(ctx.console.as_ref()).await? {
            completed.push(review_completed_ticket(ctx, &self.namespace, &key).await?);
        }
        Ok(completed)
    }

    fn freeze(self, kind: ReportKind) -> AnswerRecord {
        match kind {
            ReportKind::Standup => AnswerRecord::Standup(StandupAnswers {
                producer: self.producer,
                namespace: self.namespace,
                tickets: self.tickets,
                estimate_exceeded: self.estimate_exceeded,
                work_remaining: self.work_remaining,
                time_remaining: self.time_remaining,
                completion_date: self.completion_date,
                blockers: self.blockers,
            }),
            ReportKind::EndOfDay => AnswerRecord::EndOfDay(EodAnswers {
                producer: self.producer,
                namespace: self.namespace,
                tickets: self.tickets,
                accomplishments: self.accomplishments,
                completed_tickets: self.completed_tickets,
                status: self.status,
                pull_request: self.pull_request.unwrap_or(PullRequestSelection::None),
                blockers: self.blockers,
                tomorrow: self.tomorrow,
            }),
        }
    }
}
