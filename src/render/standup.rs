use crate::domain::report::{ESTIMATE_QUESTION, StandupAnswers};
use crate::render::ticket_bullets;

pub fn render_standup(answers: &StandupAnswers) -> String {
    let sections = [
        format!("*Producer:* {}", answers.producer),
        format!(
            "*What tickets are you working on?:*\n{}",
            ticket_bullets(&answers.tickets)
        ),
        format!("*{ESTIMATE_QUESTION}:* {}", answers.estimate_exceeded),
        format!("*Work remaining:* {}", answers.work_remaining),
        format!("*Time remaining:* {}", answers.time_remaining),
        format!("*Completion date:* {}", answers.completion_date),
        format!("*Blockers or dependencies:* {}", answers.blockers),
    ];
    sections.join("\n\n")
}
