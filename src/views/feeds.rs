// src/views/feeds.rs
//! RSS feed registration form.

use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;
use url::Url;

use super::{muted, title_style};
use crate::error::SubmitError;

pub const EXAMPLE_FEEDS: [&str; 3] = [
    "https://rss.nytimes.com/services/xml/rss/nyt/Technology.xml",
    "https://feeds.bbci.co.uk/news/technology/rss.xml",
    "https://www.theguardian.com/technology/rss",
];

pub const EMPTY_URL_MESSAGE: &str = "Please enter a valid RSS feed URL";
const SUBMIT_LABEL: &str = "Add Feed [Enter]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl FeedMessage {
    fn success(text: String) -> Self {
        Self {
            kind: MessageKind::Success,
            text,
        }
    }

    fn error(text: String) -> Self {
        Self {
            kind: MessageKind::Error,
            text,
        }
    }
}

/// Hostname shown on the prefill shortcuts.
pub fn feed_label(feed: &str) -> String {
    Url::parse(feed)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| feed.to_string())
}

#[derive(Debug, Default)]
pub struct FeedsView {
    pub input: String,
    pub submitting: bool,
    pub message: Option<FeedMessage>,
}

impl FeedsView {
    pub fn push_char(&mut self, c: char) {
        if !self.submitting {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.submitting {
            self.input.pop();
        }
    }

    pub fn clear_input(&mut self) {
        if !self.submitting {
            self.input.clear();
        }
    }

    /// Fill the input with one of `EXAMPLE_FEEDS`; does not submit.
    pub fn prefill(&mut self, idx: usize) {
        if self.submitting {
            return;
        }
        if let Some(feed) = EXAMPLE_FEEDS.get(idx) {
            self.input = (*feed).to_string();
        }
    }

    /// Returns the trimmed URL to send, or `None` when nothing should be
    /// sent (blank input, or a submission already in flight).
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.submitting {
            return None;
        }
        let url = self.input.trim();
        if url.is_empty() {
            self.message = Some(FeedMessage::error(EMPTY_URL_MESSAGE.to_string()));
            return None;
        }
        let url = url.to_string();
        self.submitting = true;
        self.message = None;
        Some(url)
    }

    pub fn finish_submit(&mut self, outcome: Result<String, SubmitError>) {
        self.submitting = false;
        match outcome {
            Ok(url) => {
                self.message = Some(FeedMessage::success(format!("Fetch started for: {url}")));
                self.input.clear();
            }
            Err(e) => self.message = Some(FeedMessage::error(e.to_string())),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let [title, input_row, message, quick, note] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Min(3),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled("RSS Feed Manager", title_style())),
            title,
        );

        let button = if self.submitting { "Adding..." } else { SUBMIT_LABEL };
        // Label plus the two border columns.
        let button_width = SUBMIT_LABEL.chars().count() as u16 + 2;
        let [input_area, button_area] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(button_width)])
                .areas(input_row);
        let placeholder = self.input.is_empty();
        let shown = if placeholder {
            Span::styled(
                format!("Enter RSS feed URL (e.g., {})", EXAMPLE_FEEDS[0]),
                muted(),
            )
        } else {
            Span::raw(self.input.clone())
        };
        frame.render_widget(
            Paragraph::new(Line::from(shown)).block(Block::bordered().title("Feed URL")),
            input_area,
        );
        let button_style = if self.submitting {
            muted()
        } else {
            Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(button, button_style)).block(Block::bordered()),
            button_area,
        );
        if !self.submitting {
            let typed = self.input.chars().count().min(usize::from(input_area.width));
            let x = input_area
                .x
                .saturating_add(1)
                .saturating_add(typed as u16)
                .min(input_area.right().saturating_sub(2));
            frame.set_cursor_position(Position::new(x, input_area.y + 1));
        }

        if let Some(msg) = &self.message {
            let style = match msg.kind {
                MessageKind::Success => Style::new().fg(Color::Green),
                MessageKind::Error => Style::new().fg(Color::Red),
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg.text.clone(), style)).wrap(Wrap { trim: true }),
                message,
            );
        }

        let mut lines = vec![Line::from(Span::styled(
            "Quick Add Popular Feeds:",
            title_style(),
        ))];
        for (i, feed) in EXAMPLE_FEEDS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("  [F{}] ", i + 1), Style::new().fg(Color::Blue)),
                Span::raw(feed_label(feed)),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), quick);

        frame.render_widget(
            Paragraph::new(
                "Note: the tracker fetches the latest items from the feed and analyzes them for sentiment and topics. Processing may take a few moments.",
            )
            .style(Style::new().fg(Color::Cyan))
            .wrap(Wrap { trim: true })
            .block(Block::bordered()),
            note,
        );
    }
}
