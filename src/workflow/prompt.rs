use crate::error::AppResult;
use crate::services::{ConsoleService, LineRequest};

const SKIP_HINT: &str = "(or press enter to skip)";

/// Trimmed answer, or the default (empty when none) for a blank line.
pub async fn ask_text(
    console: &dyn ConsoleService,
    label: &str,
    default_value: Option<&str>,
    suggestions: &[String],
) -> AppResult<String> {
    let request = LineRequest::new(label)
        .with_default(default_value)
        .with_suggestions(suggestions);
    let answer = console.read_line(request).await?;
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        Ok(default_value.unwrap_or_default().to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

pub async fn ask_confirm(
    console: &dyn ConsoleService,
    label: &str,
    default_value: bool,
) -> AppResult<bool> {
    let suffix = if default_value { "(Y/n)" } else { "(y/N)" };
    let answer = ask_text(console, &format!("{label} {suffix}"), None, &[]).await?;
    if answer.is_empty() {
        return Ok(default_value);
    }
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

pub async fn ask_list(
    console: &dyn ConsoleService,
    label: &str,
    suggestions: &[String],
) -> AppResult<Vec<String>> {
    let answer = ask_text(console, label, None, suggestions).await?;
    Ok(split_list(&answer))
}

pub async fn ask_repeatable(
    console: &dyn ConsoleService,
    first_label: &str,
    continuation_label: &str,
    suggestions: &[String],
) -> AppResult<Vec<String>> {
    let mut prompt = RepeatablePrompt::new(first_label, continuation_label, suggestions);
    let mut answers = Vec::new();
    while let Some(answer) = prompt.next(console).await? {
        answers.push(answer);
    }
    Ok(answers)
}

/// Asks the first label once, then the continuation label until a stop answer.
///
/// Callers that need to act between answers drive it with [`RepeatablePrompt::next`];
/// [`ask_repeatable`] simply collects everything.
pub struct RepeatablePrompt<'a> {
    first_label: &'a str,
    continuation_label: &'a str,
    suggestions: &'a [String],
    asked: bool,
    finished: bool,
}

impl<'a> RepeatablePrompt<'a> {
    pub fn new(first_label: &'a str, continuation_label: &'a str, suggestions: &'a [String]) -> Self {
        Self {
            first_label,
            continuation_label,
            suggestions,
            asked: false,
            finished: false,
        }
    }

    pub async fn next(&mut self, console: &dyn ConsoleService) -> AppResult<Option<String>> {
        if self.finished {
            return Ok(None);
        }

        let label = if self.asked {
            format!("{} {SKIP_HINT}", self.continuation_label)
        } else {
            self.first_label.to_string()
        };
        self.asked = true;

        let answer = ask_text(console, &label, None, self.suggestions).await?;
        if is_stop_answer(&answer) {
            self.finished = true;
            return Ok(None);
        }
        Ok(Some(answer))
    }
}

fn is_stop_answer(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "n" | "no")
}

fn split_list(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}
