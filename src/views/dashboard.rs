// src/views/dashboard.rs
//! # Dashboard View
//!
//! Summary cards, sentiment breakdown, hourly chart, topics and sources, all
//! drawn from one server-computed `DashboardStats`. The only arithmetic done
//! here is percentages and chart scaling.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use super::{error_style, muted, title_style, Load};
use crate::error::FetchError;
use crate::format::percent_of;
use crate::model::{DashboardStats, HourBucket, SentimentCounts, TopicCount};

pub const TOP_TOPICS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

pub fn sentiment_breakdown(counts: &SentimentCounts) -> SentimentBreakdown {
    let total = counts.total();
    SentimentBreakdown {
        positive: percent_of(counts.positive, total),
        neutral: percent_of(counts.neutral, total),
        negative: percent_of(counts.negative, total),
    }
}

/// Bar heights in percent of the busiest hour; the divisor never drops
/// below 1.
pub fn hourly_bar_heights(buckets: &[HourBucket]) -> Vec<f64> {
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    buckets
        .iter()
        .map(|b| b.count as f64 / max as f64 * 100.0)
        .collect()
}

/// Axis label for an hourly bucket, e.g. `9:00`.
pub fn hour_label(hour: u32) -> String {
    format!("{hour}:00")
}

pub fn top_topics(topics: &[TopicCount]) -> &[TopicCount] {
    &topics[..topics.len().min(TOP_TOPICS)]
}

#[derive(Debug, Default)]
pub struct DashboardView {
    pub stats: Load<DashboardStats>,
}

impl DashboardView {
    pub fn apply(&mut self, result: Result<DashboardStats, FetchError>) {
        self.stats.apply(result);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let stats = match &self.stats {
            Load::Loading => {
                frame.render_widget(Paragraph::new("Loading dashboard...").style(muted()), area);
                return;
            }
            Load::Failed(e) => {
                frame.render_widget(
                    Paragraph::new(format!("Error loading dashboard: {e}"))
                        .style(error_style())
                        .wrap(Wrap { trim: true }),
                    area,
                );
                return;
            }
            Load::Loaded(s) => s,
        };

        let has_lists = !stats.topics.is_empty() || !stats.sources.is_empty();
        let [cards, breakdown, chart, lists] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(8),
            Constraint::Length(if has_lists { 12 } else { 0 }),
        ])
        .areas(area);

        render_cards(frame, cards, stats);
        render_breakdown(frame, breakdown, &stats.sentiment);
        render_hourly(frame, chart, &stats.hourly_mentions);
        if has_lists {
            render_topics_and_sources(frame, lists, stats);
        }
    }
}

fn card<'a>(title: &'a str, value: u64, sub: String, color: Color) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::new().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub, muted())),
    ])
    .block(
        Block::bordered()
            .title(title)
            .border_style(Style::new().fg(color)),
    )
}

fn render_cards(frame: &mut Frame, area: Rect, stats: &DashboardStats) {
    let pct = sentiment_breakdown(&stats.sentiment);
    let [a, b, c, d] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(area);
    frame.render_widget(
        card(
            "Total Mentions",
            stats.mentions.total,
            format!("{} in last 24h", stats.mentions.last_24h),
            Color::Blue,
        ),
        a,
    );
    frame.render_widget(
        card(
            "Positive",
            stats.sentiment.positive,
            format!("{:.1}% of total", pct.positive),
            Color::Green,
        ),
        b,
    );
    frame.render_widget(
        card(
            "Negative",
            stats.sentiment.negative,
            format!("{:.1}% of total", pct.negative),
            Color::Red,
        ),
        c,
    );
    frame.render_widget(
        card(
            "Active Alerts",
            stats.alerts.unresolved,
            format!("{} in last 24h", stats.alerts.recent_24h),
            Color::Yellow,
        ),
        d,
    );
}

fn render_breakdown(frame: &mut Frame, area: Rect, counts: &SentimentCounts) {
    let pct = sentiment_breakdown(counts);
    let block = Block::bordered().title(Span::styled("Sentiment Breakdown", title_style()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1); 3]).split(inner);
    let entries = [
        ("Positive", counts.positive, pct.positive, Color::Green),
        ("Neutral", counts.neutral, pct.neutral, Color::Gray),
        ("Negative", counts.negative, pct.negative, Color::Red),
    ];
    for ((label, count, p, color), row) in entries.into_iter().zip(rows.iter()) {
        let gauge = Gauge::default()
            .gauge_style(Style::new().fg(color).bg(Color::Black))
            .ratio((p / 100.0).clamp(0.0, 1.0))
            .label(format!("{label}: {count} ({p:.1}%)"));
        frame.render_widget(gauge, *row);
    }
}

fn render_hourly(frame: &mut Frame, area: Rect, buckets: &[HourBucket]) {
    let block = Block::bordered().title(Span::styled("Mentions Over Last 24 Hours", title_style()));
    let heights = hourly_bar_heights(buckets);
    let bars: Vec<Bar> = buckets
        .iter()
        .zip(heights)
        .map(|(b, h)| {
            Bar::default()
                .value(h.round() as u64)
                .text_value(b.count.to_string())
                .label(Line::from(hour_label(b.hour)))
        })
        .collect();

    let n = bars.len().max(1) as u16;
    let bar_width = (area.width.saturating_sub(2) / n).saturating_sub(1).max(1);
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(100)
        .bar_style(Style::new().fg(Color::Blue))
        .value_style(Style::new().fg(Color::White).bg(Color::Blue));
    frame.render_widget(chart, area);
}

fn render_topics_and_sources(frame: &mut Frame, area: Rect, stats: &DashboardStats) {
    let [left, right] = Layout::horizontal([Constraint::Percentage(50); 2]).areas(area);

    if !stats.topics.is_empty() {
        let items: Vec<ListItem> = top_topics(&stats.topics)
            .iter()
            .map(|t| {
                ListItem::new(Line::from(vec![
                    Span::raw(t.topic.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| "Unknown".into())),
                    Span::styled(format!("  {} mentions", t.count), muted()),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(items).block(Block::bordered().title(Span::styled("Top Topics", title_style()))),
            left,
        );
    }

    if !stats.sources.is_empty() {
        let mut spans = Vec::with_capacity(stats.sources.len() * 2);
        for s in &stats.sources {
            spans.push(Span::styled(
                format!(" {}: {} ", s.source, s.count),
                Style::new().fg(Color::Blue).bg(Color::Black),
            ));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans))
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Span::styled("Sources", title_style()))),
            right,
        );
    }
}
