// src/views/alerts.rs
//! # Alerts View
//!
//! Two feeds into one list: alerts pushed over the live stream and alerts
//! from the periodic poll. The display list is the live ones first, then the
//! polled ones, cut at `MAX_ALERTS`. It is a stacking rule, not a
//! chronological merge, and nothing is de-duplicated across the two
//! channels: an alert can show twice until the cap pushes the older copy out.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use super::{error_style, muted, title_style};
use crate::error::FetchError;
use crate::format::relative_label;
use crate::model::Alert;
use crate::stream::{StreamEvent, StreamStatus};

pub const MAX_ALERTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Pushed over the live stream.
    Realtime,
    /// Returned by the periodic poll.
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedAlert<'a> {
    pub alert: &'a Alert,
    pub provenance: Provenance,
}

/// Substring classifier: "negative" or "spike" anywhere in the type.
pub fn is_urgent(alert_type: Option<&str>) -> bool {
    alert_type.is_some_and(|t| t.contains("negative") || t.contains("spike"))
}

pub fn merge_alerts<'a>(live: &'a VecDeque<Alert>, polled: &'a [Alert]) -> Vec<TaggedAlert<'a>> {
    live.iter()
        .map(|alert| TaggedAlert {
            alert,
            provenance: Provenance::Realtime,
        })
        .chain(polled.iter().map(|alert| TaggedAlert {
            alert,
            provenance: Provenance::Api,
        }))
        .take(MAX_ALERTS)
        .collect()
}

#[derive(Debug)]
pub struct AlertsView {
    /// Newest first, at most `MAX_ALERTS`.
    pub live: VecDeque<Alert>,
    /// `None` until the first poll answers.
    pub polled: Option<Vec<Alert>>,
    pub poll_error: Option<String>,
    pub stream: StreamStatus,
    pub scroll: usize,
}

impl Default for AlertsView {
    fn default() -> Self {
        Self {
            live: VecDeque::with_capacity(MAX_ALERTS),
            polled: None,
            poll_error: None,
            stream: StreamStatus::Connecting,
            scroll: 0,
        }
    }
}

impl AlertsView {
    pub fn apply_poll(&mut self, result: Result<Vec<Alert>, FetchError>) {
        match result {
            Ok(alerts) => {
                self.polled = Some(alerts);
                self.poll_error = None;
            }
            Err(e) => self.poll_error = Some(e.to_string()),
        }
        self.clamp_scroll();
    }

    pub fn apply_stream(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Alert(alert) => self.push_live(alert),
            StreamEvent::Status(status) => self.stream = status,
        }
    }

    pub fn push_live(&mut self, alert: Alert) {
        self.live.push_front(alert);
        self.live.truncate(MAX_ALERTS);
    }

    pub fn merged(&self) -> Vec<TaggedAlert<'_>> {
        merge_alerts(&self.live, self.polled.as_deref().unwrap_or(&[]))
    }

    pub fn scroll_down(&mut self) {
        self.scroll += 1;
        self.clamp_scroll();
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn clamp_scroll(&mut self) {
        let len = self.merged().len();
        self.scroll = self.scroll.min(len.saturating_sub(1));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, now: DateTime<Utc>) {
        if let Some(e) = &self.poll_error {
            frame.render_widget(
                Paragraph::new(format!("Error loading alerts: {e}"))
                    .style(error_style())
                    .wrap(Wrap { trim: true }),
                area,
            );
            return;
        }

        let [header, body] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(area);
        let status_color = match self.stream {
            StreamStatus::Open => Color::Green,
            StreamStatus::Connecting => Color::Yellow,
            StreamStatus::Closed | StreamStatus::Failed(_) => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(vec![
                    Span::styled("Real-time Alerts", title_style()),
                    Span::raw("  "),
                    Span::styled(format!("stream: {}", self.stream.label()), Style::new().fg(status_color)),
                ]),
                Line::from(Span::styled(
                    "Live alerts for negative spikes and unusual activity",
                    muted(),
                )),
            ]),
            header,
        );

        let merged = self.merged();
        if merged.is_empty() {
            frame.render_widget(
                Paragraph::new(
                    "No alerts yet. Alerts will appear here when negative sentiment spikes are detected.",
                )
                .style(muted())
                .wrap(Wrap { trim: true })
                .block(Block::bordered()),
                body,
            );
            return;
        }

        let items: Vec<ListItem> = merged
            .iter()
            .skip(self.scroll)
            .map(|t| alert_item(t, now))
            .collect();
        frame.render_widget(List::new(items).block(Block::bordered()), body);
    }
}

fn alert_item(tagged: &TaggedAlert<'_>, now: DateTime<Utc>) -> ListItem<'static> {
    let a = tagged.alert;
    let color = if is_urgent(a.alert_type.as_deref()) {
        Color::Red
    } else {
        Color::Yellow
    };
    let bar = Span::styled("▌ ", Style::new().fg(color));

    let mut head = vec![
        bar.clone(),
        Span::styled(
            a.alert_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or("Alert")
                .to_uppercase(),
            Style::new().fg(color).add_modifier(Modifier::BOLD),
        ),
    ];
    if tagged.provenance == Provenance::Realtime {
        head.push(Span::raw(" "));
        head.push(Span::styled(
            " LIVE ",
            Style::new()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }
    head.push(Span::styled(
        format!("  {}", relative_label(a.created_at.as_deref(), now, "Just now")),
        muted(),
    ));

    let mut lines = vec![
        Line::from(head),
        Line::from(vec![
            bar.clone(),
            Span::raw(a.description.clone().unwrap_or_default()),
        ]),
    ];
    if let Some(text) = a.related_mention() {
        lines.push(Line::from(vec![
            bar,
            Span::styled("Related Mention: ", muted()),
            Span::raw(text.to_string()),
        ]));
    }
    lines.push(Line::default());
    ListItem::new(lines)
}
