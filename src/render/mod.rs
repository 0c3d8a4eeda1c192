mod eod;
mod standup;

pub use eod::render_eod;
pub use standup::render_standup;

use crate::domain::report::AnswerRecord;
use crate::domain::ticket::TicketReference;

pub const NONE_PLACEHOLDER: &str = "None.";

pub fn render(record: &AnswerRecord) -> String {
    match record {
        AnswerRecord::Standup(answers) => render_standup(answers),
        AnswerRecord::EndOfDay(answers) => render_eod(answers),
    }
}

pub(crate) fn markdown_link(label: &str, url: &str) -> String {
    format!("[{label}]({url})")
}

/// One bullet per ticket, each followed by its indented accomplishments.
pub(crate) fn ticket_bullets(tickets: &[TicketReference]) -> String {
    if tickets.is_empty() {
        return NONE_PLACEHOLDER.to_string();
    }

    let mut lines = Vec::new();
    for ticket in tickets {
        lines.push(format!("* {}", markdown_link(&ticket.key, &ticket.url)));
        lines.extend(
            ticket
                .accomplishments
                .iter()
                .map(|accomplishment| format!("  * {accomplishment}")),
        );
    }
    lines.join("\n")
}
