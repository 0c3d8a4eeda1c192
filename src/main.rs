mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod render;
mod services;
#[cfg(test)]
mod test_support;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::report;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::report::ReportKind;
use crate::error::AppResult;
use crate::infra::bitbucket::BitbucketClient;
use crate::infra::clipboard::SystemClipboard;
use crate::infra::jira::JiraClient;
use crate::infra::terminal::TerminalConsole;

const LOG_FILTER_VAR: &str = "DAILY_DIGEST_LOG";

#[derive(Parser)]
#[command(
    name = "daily-digest",
    author,
    version,
    about = "CLI tool for generating daily standup and end-of-day updates"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate daily standup message.
    Standup,
    /// Generate end-of-day update message.
    Eod,
}

impl Commands {
    fn kind(&self) -> ReportKind {
        match self {
            Commands::Standup => ReportKind::Standup,
            Commands::Eod => ReportKind::EndOfDay,
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let context = build_context(config);

    report::run(&context, cli.command.kind()).await?;
    Ok(())
}

fn build_context(config: AppConfig) -> AppContext {
    let jira = &config.jira;
    let issue_tracker = Arc::new(JiraClient::new(
        jira.host.clone(),
        jira.email.clone(),
        jira.api_token.clone(),
        jira.batch_size,
        jira.delay_ms,
    ));

    let bitbucket = &config.bitbucket;
    let version_control = Arc::new(BitbucketClient::new(
        bitbucket.username.clone(),
        bitbucket.api_token.clone(),
    ));

    AppContext::new(
        config,
        Arc::new(TerminalConsole::new()),
        issue_tracker,
        version_control,
        Arc::new(SystemClipboard::new()),
    )
}
