use crate::domain::report::EodAnswers;
use crate::domain::ticket::CompletedTicket;
use crate::render::{NONE_PLACEHOLDER, markdown_link, ticket_bullets};

pub fn render_eod(answers: &EodAnswers) -> String {
    let pull_request = answers
        .pull_request
        .link()
        .map(|(label, url)| markdown_link(label, url))
        .unwrap_or_else(|| NONE_PLACEHOLDER.to_string());

    let mut sections = vec![
        format!("*_End of Day Status_*\n*Producer:* {}", answers.producer),
        format!(
            "*What tickets did you work on today?:*\n{}",
            ticket_bullets(&answers.tickets)
        ),
    ];
    if !answers.accomplishments.is_empty() {
        sections.push(format!(
            "*What did you accomplish today?:*\n{}",
            plain_bullets(&answers.accomplishments)
        ));
    }
    sections.extend([
        format!(
            "*Any tickets completed?:* {}",
            completed_links(&answers.completed_tickets)
        ),
        format!("*Current status/progress:* {}", answers.status),
        format!("*Pull Request for review:* {pull_request}"),
        format!("*Blockers or issues:* {}", answers.blockers),
        format!("*Plan for tomorrow:* {}", answers.tomorrow),
    ]);
    sections.join("\n\n")
}

fn plain_bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("* {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn completed_links(tickets: &[CompletedTicket]) -> String {
    if tickets.is_empty() {
        return NONE_PLACEHOLDER.to_string();
    }
    tickets
        .iter()
        .map(|ticket| markdown_link(&ticket.key, &ticket.url))
        .collect::<Vec<_>>()
        .join(", ")
}
