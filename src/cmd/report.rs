use tracing::{debug, warn};

use crate::context::AppContext;
use crate::domain::report::ReportKind;
use crate::error::AppResult;
use crate::render::render;
use crate::services::Tone;
use crate::workflow::collector::collect_answers;

fn banner(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Standup => "\n=== Daily Standup Questions (Markdown) ===\n",
        ReportKind::EndOfDay => "\n=== End of Day Update (Slack Markdown) ===\n",
    }
}

fn output_banner(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Standup => "\n=== Generated Markdown Message ===\n",
        ReportKind::EndOfDay => "\n=== Generated Slack Markdown Message ===\n",
    }
}

/// Runs one interactive report, prints it and hands it to the clipboard.
pub async fn run(ctx: &AppContext, kind: ReportKind) -> AppResult<String> {
    let console = ctx.console.as_ref();
    console.say(Tone::Heading, banner(kind));

    let record = collect_answers(ctx, kind).await?;
    debug!(
        report = kind.as_str(),
        namespace = record.namespace(),
        tickets = record.ticket_count(),
        "answers collected"
    );
    let output = render(&record);

    console.say(Tone::Heading, output_banner(kind));
    console.say(Tone::Plain, &output);

    match ctx.clipboard.copy(&output).await {
        Ok(()) => console.say(Tone::Success, "\n✓ Copied to clipboard!"),
        Err(err) => {
            warn!(error = %err, "clipboard copy failed");
            console.say(Tone::Warning, "\n⚠ Could not copy to clipboard.");
            console.say(Tone::Detail, &err.to_string());
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeClipboard, HarnessBuilder};

    const STANDUP_ANSWERS: &[&str] = &["alex", "acme", "ABC-1", "n/a", "n/a", "n/a", "n/a", "n/a"];

    #[tokio::test]
    async fn standup_end_to_end() {
        let harness = HarnessBuilder::new(STANDUP_ANSWERS).build();

        let output = run(&harness.context, ReportKind::Standup).await.unwrap();

        assert!(output.contains("*Producer:* @alex"));
        assert!(
            output
                .lines()
                .any(|line| line == "* [ABC-1](https://acme.atlassian.net/browse/ABC-1)")
        );
        assert!(output.contains("*Blockers or dependencies:* n/a"));
        assert_eq!(harness.clipboard.copies(), vec![output.clone()]);
        assert!(
            harness
                .console
                .notices()
                .contains(&(Tone::Plain, output.clone()))
        );
    }

    #[tokio::test]
    async fn clipboard_failure_is_not_fatal() {
        let harness = HarnessBuilder::new(STANDUP_ANSWERS)
            .clipboard(FakeClipboard::failing())
            .build();

        let output = run(&harness.context, ReportKind::Standup).await;

        assert!(output.is_ok());
        assert!(harness.console.notices().contains(&(
            Tone::Warning,
            "\n⚠ Could not copy to clipboard.".to_string()
        )));
    }

    #[tokio::test]
    async fn end_of_day_end_to_end() {
        let harness = HarnessBuilder::new(&[
            "@alex", "acme", "ABC-1", "", "", "Wrapping up", "n", "none", "Tests",
        ])
        .build();

        let output = run(&harness.context, ReportKind::EndOfDay).await.unwrap();

        assert!(output.starts_with("*_End of Day Status_*\n*Producer:* @alex"));
        assert!(output.contains("*Any tickets completed?:* None."));
        assert!(output.contains("*Pull Request for review:* None."));
        assert!(output.ends_with("*Plan for tomorrow:* Tests"));
        assert!(harness.console.notices().contains(&(
            Tone::Heading,
            "\n=== Generated Slack Markdown Message ===\n".to_string()
        )));
    }
}
