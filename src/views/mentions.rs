// src/views/mentions.rs
//! Recent mentions with a client-side sentiment filter.

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use super::{error_style, muted, title_style, Load};
use crate::error::FetchError;
use crate::format::relative_label;
use crate::model::Mention;

pub const PROCESSING_LABEL: &str = "Processing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentimentFilter {
    #[default]
    All,
    Positive,
    Neutral,
    Negative,
}

impl SentimentFilter {
    pub const ALL: [SentimentFilter; 4] = [
        SentimentFilter::All,
        SentimentFilter::Positive,
        SentimentFilter::Neutral,
        SentimentFilter::Negative,
    ];

    /// Exact value matched against `Mention::sentiment`; `None` for `All`.
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            SentimentFilter::All => None,
            SentimentFilter::Positive => Some("positive"),
            SentimentFilter::Neutral => Some("neutral"),
            SentimentFilter::Negative => Some("negative"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentFilter::All => "All",
            SentimentFilter::Positive => "Positive",
            SentimentFilter::Neutral => "Neutral",
            SentimentFilter::Negative => "Negative",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn matches(self, mention: &Mention) -> bool {
        match self.as_str() {
            None => true,
            Some(want) => mention.sentiment.as_deref() == Some(want),
        }
    }
}

/// Order-preserving; `All` returns every mention.
pub fn filter_mentions(mentions: &[Mention], filter: SentimentFilter) -> Vec<&Mention> {
    mentions.iter().filter(|m| filter.matches(m)).collect()
}

fn sentiment_color(sentiment: Option<&str>) -> Color {
    match sentiment.map(str::to_ascii_lowercase).as_deref() {
        Some("positive") => Color::Green,
        Some("negative") => Color::Red,
        _ => Color::Gray,
    }
}

#[derive(Debug, Default)]
pub struct MentionsView {
    pub mentions: Load<Vec<Mention>>,
    pub filter: SentimentFilter,
    pub scroll: usize,
}

impl MentionsView {
    pub fn apply(&mut self, result: Result<Vec<Mention>, FetchError>) {
        self.mentions.apply(result);
        self.clamp_scroll();
    }

    pub fn set_filter(&mut self, filter: SentimentFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.scroll = 0;
        }
    }

    pub fn visible(&self) -> Vec<&Mention> {
        self.mentions
            .loaded()
            .map(|all| filter_mentions(all, self.filter))
            .unwrap_or_default()
    }

    pub fn scroll_down(&mut self) {
        self.scroll += 1;
        self.clamp_scroll();
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn clamp_scroll(&mut self) {
        let len = self.visible().len();
        self.scroll = self.scroll.min(len.saturating_sub(1));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, now: DateTime<Utc>) {
        let all = match &self.mentions {
            Load::Loading => {
                frame.render_widget(Paragraph::new("Loading mentions...").style(muted()), area);
                return;
            }
            Load::Failed(e) => {
                frame.render_widget(
                    Paragraph::new(format!("Error loading mentions: {e}"))
                        .style(error_style())
                        .wrap(Wrap { trim: true }),
                    area,
                );
                return;
            }
            Load::Loaded(v) => v,
        };

        let [header, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
        let [title, filters] =
            Layout::horizontal([Constraint::Min(16), Constraint::Length(44)]).areas(header);

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("Recent Mentions ({})", all.len()),
                title_style(),
            )),
            title,
        );
        frame.render_widget(
            Tabs::new(SentimentFilter::ALL.iter().map(|f| f.label()))
                .select(self.filter.index())
                .highlight_style(Style::new().fg(Color::Black).bg(Color::Blue)),
            filters,
        );

        let visible = filter_mentions(all, self.filter);
        if visible.is_empty() {
            let text = match self.filter.as_str() {
                None => "No mentions found".to_string(),
                Some(s) => format!("No mentions found with {s} sentiment"),
            };
            frame.render_widget(Paragraph::new(text).style(muted()).block(Block::bordered()), body);
            return;
        }

        let items: Vec<ListItem> = visible
            .into_iter()
            .skip(self.scroll)
            .map(|m| mention_item(m, now))
            .collect();
        frame.render_widget(List::new(items).block(Block::bordered()), body);
    }
}

fn mention_item(m: &Mention, now: DateTime<Utc>) -> ListItem<'static> {
    let sentiment = m.sentiment.as_deref().filter(|s| !s.is_empty());
    let mut head = vec![Span::styled(
        format!(" {} ", sentiment.unwrap_or(PROCESSING_LABEL)),
        Style::new()
            .fg(sentiment_color(sentiment))
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(score) = m.sentiment_score.filter(|s| *s != 0.0) {
        head.push(Span::styled(format!(" {:.0}%", score * 100.0), muted()));
    }
    head.push(Span::raw(format!("  [{}]", m.source)));
    head.push(Span::styled(
        format!("  {}", relative_label(m.created_at.as_deref(), now, "Unknown")),
        muted(),
    ));

    let mut lines = vec![Line::from(head), Line::from(format!("  {}", m.text))];
    if let Some(topic) = m.topic.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(vec![
            Span::styled("  Topic: ", muted()),
            Span::styled(topic.to_string(), Style::new().fg(Color::Blue)),
        ]));
    }
    lines.push(Line::default());
    ListItem::new(lines)
}
