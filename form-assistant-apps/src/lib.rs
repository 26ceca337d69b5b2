//! Shared plumbing of the terminal front-ends.

use std::io::{self, stdout, Write};
use std::process::exit;

use anyhow::Result;
use form_assistant::assistant::FormEvent;
use form_assistant::utils::printing::IncrementalMarkdownPrinter;
use log::warn;
use termimad::crossterm::{cursor, ExecutableCommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Loads `.env`, installs the logger and makes Ctrl-C restore the cursor before exiting.
pub fn init() -> Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err.into());
        }
    }
    env_logger::init();
    ctrlc::set_handler(move || {
        // to avoid a missing cursor when Ctrl-C is pressed while a reply is streaming
        let _ = stdout().execute(cursor::Show);
        exit(0);
    })?;
    Ok(())
}

pub struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    pub fn stdin() -> Self {
        Self { lines: BufReader::new(tokio::io::stdin()).lines() }
    }

    /// Prints `prompt` and waits for the next non-blank line. `None` at end of input.
    pub async fn next(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            print!("{}", prompt);
            stdout().flush()?;
            match self.lines.next_line().await? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(line.trim().to_string())),
            }
        }
    }
}

/// Where a streamed reply goes. Without a usable terminal (piped output, no cursor report) chunks are
/// written to stdout as they arrive.
pub enum ReplyOutput {
    Anchored(IncrementalMarkdownPrinter),
    Plain,
}

impl ReplyOutput {
    pub fn start() -> Self {
        let mut printer = IncrementalMarkdownPrinter::default();
        let activation = printer.activate(true);
        Self::from_activation(printer, activation)
    }

    fn from_activation(printer: IncrementalMarkdownPrinter, activation: io::Result<()>) -> Self {
        match activation {
            Ok(()) => ReplyOutput::Anchored(printer),
            Err(err) => {
                warn!("cannot render replies in place, printing plain text: {}", err);
                ReplyOutput::Plain
            }
        }
    }

    pub fn push(&mut self, chunk: &str) {
        if let ReplyOutput::Anchored(printer) = self {
            match printer.push_and_print(chunk) {
                Ok(()) => return,
                Err(err) => {
                    warn!("in-place rendering failed, printing plain text: {}", err);
                    let _ = printer.deactivate();
                    *self = ReplyOutput::Plain;
                }
            }
        }
        print!("{}", chunk);
        let _ = stdout().flush();
    }

    pub fn finish(self) {
        if let ReplyOutput::Anchored(mut printer) = self {
            if let Err(err) = printer.deactivate() {
                warn!("cannot restore the cursor: {}", err);
            }
        }
        println!();
    }
}

/// A line typed into the form assistant.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Event(FormEvent),
    ShowForm,
    ShowAnswer,
    Help,
    Quit,
}

pub const FORM_HELP: &str = "\
| command | |
|:-|:-|
| `/requirement <text>` | 設定需求 |
| `/build` | 建立表格 |
| `/questions` | 對話引導報稅 |
| `/form` | 顯示表格 |
| `/answer` | 顯示答案 json |
| `/reset` | 重新開始 |
| `/quit` | 離開 |

Any other line is your answer.
";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if !line.starts_with('/') {
            return Command::Event(FormEvent::UserReply(line.to_string()));
        }
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match name {
            "/requirement" => Command::Event(FormEvent::SetRequirement(rest.trim().to_string())),
            "/build" => Command::Event(FormEvent::BuildForm),
            "/questions" => Command::Event(FormEvent::BuildQuestions),
            "/reset" => Command::Event(FormEvent::Reset),
            "/form" => Command::ShowForm,
            "/answer" => Command::ShowAnswer,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Help,
        }
    }
}
