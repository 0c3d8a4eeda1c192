use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::ClipboardService;

/// Pipes text into whichever platform clipboard utility is installed.
pub struct SystemClipboard {
    programs: Vec<(&'static str, Vec<&'static str>)>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            programs: platform_programs(),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_programs() -> Vec<(&'static str, Vec<&'static str>)> {
    #[cfg(target_os = "macos")]
    {
        vec![("pbcopy", vec![])]
    }
    #[cfg(target_os = "windows")]
    {
        vec![("cmd", vec!["/C", "clip"])]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![
            ("wl-copy", vec![]),
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
        ]
    }
}

#[async_trait]
impl ClipboardService for SystemClipboard {
    async fn copy(&self, text: &str) -> AppResult<()> {
        for (program, args) in &self.programs {
            match run_program(program, args, text).await {
                Ok(()) => return Ok(()),
                Err(err) => debug!(program = *program, error = %err, "clipboard utility failed"),
            }
        }

        let names = self
            .programs
            .iter()
            .map(|(program, _)| *program)
            .collect::<Vec<_>>()
            .join("/");
        Err(AppError::Clipboard(format!(
            "no clipboard utility available (expected {names})"
        )))
    }
}

async fn run_program(program: &str, args: &[&str], text: &str) -> AppResult<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| AppError::Clipboard(format!("failed to run {program}: {err}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .await
            .map_err(|err| AppError::Clipboard(format!("failed to write to {program}: {err}")))?;
    }

    let status = child
        .wait()
        .await
        .map_err(|err| AppError::Clipboard(format!("failed to wait for {program}: {err}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(AppError::Clipboard(format!(
            "{program} exited with {status}"
        )))
    }
}
