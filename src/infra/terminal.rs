use std::io::{self, IsTerminal, Write};

use async_trait::async_trait;
use colored::Colorize;
use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, disable_raw_mode, enable_raw_mode},
};

use crate::error::{AppError, AppResult};
use crate::services::{ConsoleService, LineRequest, Tone};

/// Interactive console on the process's stdin/stdout.
#[derive(Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConsoleService for TerminalConsole {
    async fn read_line(&self, request: LineRequest) -> AppResult<String> {
        tokio::task::spawn_blocking(move || {
            if io::stdin().is_terminal() {
                edit_line(&request)
            } else {
                read_plain_line(&request)
            }
        })
        .await
        .map_err(|err| AppError::Console(format!("input task failed: {err}")))?
    }

    fn say(&self, tone: Tone, message: &str) {
        match tone {
            Tone::Heading => println!("{}", message.bold().cyan()),
            Tone::Info => println!("{}", message.cyan()),
            Tone::Success => println!("{}", message.green()),
            Tone::Warning => eprintln!("{}", message.yellow()),
            Tone::Detail => println!("{}", message.dimmed()),
            Tone::Plain => println!("{message}"),
        }
    }
}

fn read_plain_line(request: &LineRequest) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", request.prompt_text())?;
    stdout.flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(AppError::Console("input closed".to_string()));
    }
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

struct RawMode;

impl RawMode {
    fn enable() -> AppResult<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn edit_line(request: &LineRequest) -> AppResult<String> {
    let mut stdout = io::stdout();
    let _raw = RawMode::enable()?;
    let mut view = LineView::new(request.prompt_text());
    let mut buffer = String::new();

    view.redraw(&mut stdout, &buffer)?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match apply_key(&mut buffer, key, &request.suggestions) {
            EditOutcome::Redraw => view.redraw(&mut stdout, &buffer)?,
            EditOutcome::ShowMatches(matches) => {
                queue!(
                    stdout,
                    Print("\r\n"),
                    Print(matches.join("  ")),
                    Print("\r\n")
                )?;
                view.start_fresh();
                view.redraw(&mut stdout, &buffer)?;
            }
            EditOutcome::Submit => {
                execute!(stdout, Print("\r\n"))?;
                return Ok(buffer);
            }
            EditOutcome::Abort(reason) => {
                execute!(stdout, Print("\r\n"))?;
                return Err(AppError::Console(reason.to_string()));
            }
        }
    }
}

/// Prompt plus buffer, redrawn from the row the prompt starts on.
struct LineView {
    prompt: String,
    prompt_width: usize,
    cursor_rows: u16,
}

impl LineView {
    fn new(prompt: String) -> Self {
        let prompt_width = prompt.chars().count();
        Self {
            prompt,
            prompt_width,
            cursor_rows: 0,
        }
    }

    fn start_fresh(&mut self) {
        self.cursor_rows = 0;
    }

    fn redraw(&mut self, stdout: &mut io::Stdout, buffer: &str) -> AppResult<()> {
        let (columns, _) = terminal::size()?;
        if self.cursor_rows > 0 {
            queue!(stdout, MoveUp(self.cursor_rows))?;
        }
        queue!(
            stdout,
            MoveToColumn(0),
            Clear(ClearType::FromCursorDown),
            Print(&self.prompt),
            Print(buffer)
        )?;
        stdout.flush()?;
        self.cursor_rows = rows_below_start(self.prompt_width + buffer.chars().count(), columns);
        Ok(())
    }
}

/// Rows between the starting row and the cursor after printing `width` cells from column 0.
///
/// A line that exactly fills the last column leaves the cursor on that row.
fn rows_below_start(width: usize, columns: u16) -> u16 {
    let columns = usize::from(columns.max(1));
    u16::try_from(width.saturating_sub(1) / columns).unwrap_or(u16::MAX)
}

#[derive(Debug, PartialEq, Eq)]
enum EditOutcome {
    Redraw,
    ShowMatches(Vec<String>),
    Submit,
    Abort(&'static str),
}

fn apply_key(buffer: &mut String, key: KeyEvent, suggestions: &[String]) -> EditOutcome {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => EditOutcome::Submit,
        KeyCode::Char('c') if control => EditOutcome::Abort("input interrupted"),
        KeyCode::Char('d') if control && buffer.is_empty() => EditOutcome::Abort("input closed"),
        KeyCode::Char('u') if control => {
            buffer.clear();
            EditOutcome::Redraw
        }
        KeyCode::Char('w') if control => {
            delete_last_word(buffer);
            EditOutcome::Redraw
        }
        KeyCode::Char(_) if control => EditOutcome::Redraw,
        KeyCode::Char(ch) => {
            buffer.push(ch);
            EditOutcome::Redraw
        }
        KeyCode::Backspace => {
            buffer.pop();
            EditOutcome::Redraw
        }
        KeyCode::Tab => match complete(buffer, suggestions) {
            Completion::Ambiguous(matches) => EditOutcome::ShowMatches(matches),
            Completion::Extended | Completion::NoMatch => EditOutcome::Redraw,
        },
        _ => EditOutcome::Redraw,
    }
}

fn delete_last_word(buffer: &mut String) {
    let kept = buffer.trim_end().len();
    buffer.truncate(kept);
    let start = token_start(buffer);
    buffer.truncate(start);
}

#[derive(Debug, PartialEq, Eq)]
enum Completion {
    Extended,
    Ambiguous(Vec<String>),
    NoMatch,
}

/// Completes the last whitespace-separated token against the suggestions.
fn complete(buffer: &mut String, suggestions: &[String]) -> Completion {
    let start = token_start(buffer);
    let token = buffer[start..].to_string();

    let mut matches: Vec<&str> = Vec::new();
    for suggestion in suggestions {
        if suggestion.starts_with(&token) && !matches.contains(&suggestion.as_str()) {
            matches.push(suggestion);
        }
    }

    match matches.as_slice() {
        [] => Completion::NoMatch,
        [only] => {
            buffer.truncate(start);
            buffer.push_str(only);
            Completion::Extended
        }
        several => {
            let prefix = common_prefix(several);
            if prefix.len() > token.len() {
                buffer.truncate(start);
                buffer.push_str(prefix);
                Completion::Extended
            } else {
                Completion::Ambiguous(several.iter().map(|s| s.to_string()).collect())
            }
        }
    }
}

fn token_start(buffer: &str) -> usize {
    buffer
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map(|(index, ch)| index + ch.len_utf8())
        .unwrap_or(0)
}

fn common_prefix<'a>(values: &[&'a str]) -> &'a str {
    let Some((first, rest)) = values.split_first() else {
        return "";
    };
    let mut end = first.len();
    for value in rest {
        end = first
            .char_indices()
            .zip(value.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((index, ch), _)| index + ch.len_utf8())
            .unwrap_or(0)
            .min(end);
    }
    &first[..end]
}
