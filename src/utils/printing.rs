//! Terminal rendering of transcript messages and streamed replies.

use std::io::{self, stdout, Write};
use termimad::crossterm::{cursor, ExecutableCommand};
use termimad::crossterm::terminal::Clear;
use termimad::crossterm::terminal::ClearType::FromCursorDown;
use termimad::{FmtLine, FmtText, MadSkin};

use crate::session::Message;

struct RenderedMarkdown {
    text: String,
    rows: u16,
    last_line_width: u16,
}

impl From<FmtText<'_, '_>> for RenderedMarkdown {
    fn from(fmt_text: FmtText<'_, '_>) -> Self {
        let text = format!("{}", fmt_text);
        let rows = fmt_text.lines.len() as u16;
        let last_line_width = fmt_text.lines.last().map(FmtLine::visible_length).unwrap_or(0) as u16;
        Self { text, rows, last_line_width }
    }
}

/// Markdown heading line for a transcript entry.
pub fn message_markdown(message: &Message) -> String {
    format!("**{}**\n\n{}\n", message.role.as_str(), message.content)
}

/// Wraps `code` in a fenced block so the skin renders it verbatim.
pub fn code_markdown(language: &str, code: &str) -> String {
    format!("```{}\n{}\n```\n", language, code)
}

pub fn print_message(skin: &MadSkin, message: &Message) {
    skin.print_text(&message_markdown(message));
}

pub fn print_code(skin: &MadSkin, language: &str, code: &str) {
    skin.print_text(&code_markdown(language, code));
}

/// Re-renders a growing markdown buffer in place, starting from the cursor position at activation.
///
/// The anchor is relative to the terminal window, so it drifts once the output scrolls.
pub struct IncrementalMarkdownPrinter {
    pub skin: MadSkin,
    pub wrap_width: Option<usize>,
    buffer: String,
    anchor: Option<(u16, u16)>,
    hide_cursor: bool,
}

impl Default for IncrementalMarkdownPrinter {
    fn default() -> Self {
        Self {
            skin: MadSkin::default(),
            wrap_width: None,
            buffer: String::new(),
            anchor: None,
            hide_cursor: false,
        }
    }
}

impl IncrementalMarkdownPrinter {
    pub fn activated(&self) -> bool {
        self.anchor.is_some()
    }

    /// Anchors at the current cursor position and clears the buffer.
    pub fn activate(&mut self, hide_cursor: bool) -> io::Result<()> {
        if self.activated() {
            return Ok(());
        }
        self.anchor = Some(cursor::position()?);
        self.buffer.clear();
        if hide_cursor {
            stdout().execute(cursor::Hide)?;
        }
        self.hide_cursor = hide_cursor;
        Ok(())
    }

    pub fn deactivate(&mut self) -> io::Result<()> {
        if self.anchor.take().is_some() && self.hide_cursor {
            stdout().execute(cursor::Show)?;
        }
        self.hide_cursor = false;
        Ok(())
    }

    pub fn push_and_print(&mut self, chunk: &str) -> io::Result<()> {
        self.buffer.push_str(chunk);
        self.print()
    }

    /// Clears everything below the anchor and prints the whole buffer again.
    pub fn print(&mut self) -> io::Result<()> {
        let Some((column, row)) = self.anchor else {
            return Err(io::Error::new(io::ErrorKind::Other, "printer is not activated"));
        };
        let rendered: RenderedMarkdown = FmtText::from(&self.skin, &self.buffer, self.wrap_width).into();
        let mut out = stdout();
        out.execute(cursor::MoveTo(column, row))?
            .execute(Clear(FromCursorDown))?;
        write!(out, "{}", rendered.text)?;
        out.flush()?;
        // the terminal may have scrolled, so derive the anchor back from where printing ended
        let (end_column, end_row) = cursor::position()?;
        self.anchor = Some((
            end_column.saturating_sub(rendered.last_line_width),
            end_row.saturating_sub(rendered.rows),
        ));
        Ok(())
    }
}

impl Drop for IncrementalMarkdownPrinter {
    fn drop(&mut self) {
        let _ = self.deactivate();
    }
}
