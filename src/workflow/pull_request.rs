use tracing::{debug, warn};

use crate::context::AppContext;
use crate::domain::pull_request::{CandidateReview, PullRequestCandidate, PullRequestSelection};
use crate::domain::ticket::{CompletedTicket, build_reference};
use crate::error::AppResult;
use crate::services::{PullRequestQuery, Tone};
use crate::workflow::prompt::{ask_confirm, ask_text};

/// Looks up open pull requests for a completed ticket and offers the first one.
///
/// Lookup failures degrade to "no candidates" with a warning.
pub async fn review_completed_ticket(
    ctx: &AppContext,
    namespace: &str,
    key: &str,
) -> AppResult<CompletedTicket> {
    let reference = build_reference(namespace, key);
    let candidates = lookup_candidates(ctx, key).await;

    if candidates.is_empty() {
        return Ok(CompletedTicket::new(
            reference,
            candidates,
            CandidateReview::NoneFound,
        ));
    }

    let first = &candidates[0];
    let console = ctx.console.as_ref();
    console.say(
        Tone::Info,
        &format!("Found open PR: {} ({})", first.title, first.branch_name),
    );
    console.say(Tone::Detail, &first.link);

    let review = if ask_confirm(console, "Use this PR?", true).await? {
        CandidateReview::Accepted
    } else {
        CandidateReview::Declined
    };
    debug!(ticket = key, ?review, "reviewed pull request candidate");

    Ok(CompletedTicket::new(reference, candidates, review))
}

async fn lookup_candidates(ctx: &AppContext, key: &str) -> Vec<PullRequestCandidate> {
    let settings = &ctx.config.bitbucket;
    let query = PullRequestQuery {
        workspace: settings.workspace.clone().unwrap_or_default(),
        issue_key: key.to_string(),
        selected_user: settings.lookup_user().unwrap_or_default().to_string(),
    };

    match ctx.version_control.open_pull_requests(&query).await {
        Ok(candidates) => {
            debug!(ticket = key, found = candidates.len(), "pull request lookup");
            candidates
        }
        Err(err) => {
            warn!(ticket = key, error = %err, "pull request lookup failed");
            ctx.console.say(
                Tone::Warning,
                &format!("Could not fetch PRs for ticket: {key}"),
            );
            Vec::new()
        }
    }
}

/// First ticket in entry order with a surviving candidate wins; so does its first candidate.
pub fn first_surviving_candidate(
    completed: &[CompletedTicket],
) -> Option<(&CompletedTicket, &PullRequestCandidate)> {
    completed.iter().find_map(|ticket| {
        ticket
            .surviving_candidates()
            .first()
            .map(|candidate| (ticket, candidate))
    })
}

/// Picks the pull request that headlines the report, asking for one when none was found.
pub async fn select_primary(
    ctx: &AppContext,
    completed: &[CompletedTicket],
) -> AppResult<PullRequestSelection> {
    if let Some((ticket, candidate)) = first_surviving_candidate(completed) {
        return Ok(PullRequestSelection::Resolved {
            ticket_key: ticket.key.clone(),
            candidate: candidate.clone(),
        });
    }

    let console = ctx.console.as_ref();
    let has_pull_request = ask_confirm(
        console,
        "Is there a pull request for the completed work?",
        completed.is_empty(),
    )
    .await?;
    if !has_pull_request {
        return Ok(PullRequestSelection::None);
    }

    let default_label = default_label(completed);
    let label = ask_text(
        console,
        "Pull request label (e.g. branch name)",
        default_label.as_deref(),
        &[],
    )
    .await?;
    let repository = ask_text(
        console,
        "Bitbucket repo path (e.g. workspace/repository)",
        ctx.config.bitbucket.default_repository.as_deref(),
        &[],
    )
    .await?;
    let number = ask_text(console, "Pull request number (e.g. 361)", None, &[]).await?;

    Ok(PullRequestSelection::manual(label, &repository, &number))
}

fn default_label(completed: &[CompletedTicket]) -> Option<String> {
    let first = completed.first()?;
    if completed.len() == 1 {
        Some(format!("fix/{}", first.key))
    } else {
        Some(format!("fix/{}-etc", first.key))
    }
}
