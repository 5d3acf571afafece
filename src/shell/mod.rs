// src/shell/mod.rs
//! # Tab Shell
//!
//! Holds the active tab and the state of the one mounted view. All state
//! changes go through `App::update`, which is pure: it returns `Effect`s and
//! the runtime performs them (spawning pollers, opening the stream, sending
//! the feed command, cancelling a mount).
//!
//! Every mount gets a fresh `MountId`. Background results carry the id they
//! were started under; anything tagged with an older id is dropped.

pub mod runtime;
pub mod terminal;

use chrono::{DateTime, Utc};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

use crate::error::{FetchError, SubmitError};
use crate::model::{Alert, DashboardStats, Mention};
use crate::stream::StreamEvent;
use crate::views::alerts::AlertsView;
use crate::views::dashboard::DashboardView;
use crate::views::feeds::FeedsView;
use crate::views::mentions::{MentionsView, SentimentFilter};
use crate::views::muted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Mentions,
    Alerts,
    Feeds,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Mentions, Tab::Alerts, Tab::Feeds];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Mentions => "Mentions",
            Tab::Alerts => "Alerts",
            Tab::Feeds => "RSS Feeds",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tab::Dashboard => "📊",
            Tab::Mentions => "💬",
            Tab::Alerts => "🚨",
            Tab::Feeds => "📡",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MountId(pub u64);

/// Everything the runtime feeds into `App::update`.
#[derive(Debug)]
pub enum AppEvent {
    Terminal(Event),
    Tick,
    Dashboard(MountId, Result<DashboardStats, FetchError>),
    Mentions(MountId, Result<Vec<Mention>, FetchError>),
    AlertsPolled(MountId, Result<Vec<Alert>, FetchError>),
    AlertStream(MountId, StreamEvent),
    FeedSubmitted(MountId, Result<String, SubmitError>),
}

impl AppEvent {
    fn mount(&self) -> Option<MountId> {
        match self {
            AppEvent::Terminal(_) | AppEvent::Tick => None,
            AppEvent::Dashboard(m, _)
            | AppEvent::Mentions(m, _)
            | AppEvent::AlertsPolled(m, _)
            | AppEvent::AlertStream(m, _)
            | AppEvent::FeedSubmitted(m, _) => Some(*m),
        }
    }
}

/// Side effects requested by `App::update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the background work of `tab` under `mount`.
    Mount { tab: Tab, mount: MountId },
    /// Cancel everything started under the current mount.
    Unmount { mount: MountId },
    SubmitFeed { mount: MountId, url: String },
    Quit,
}

/// State of whichever view is mounted.
#[derive(Debug)]
pub enum ViewState {
    Dashboard(DashboardView),
    Mentions(MentionsView),
    Alerts(AlertsView),
    Feeds(FeedsView),
}

impl ViewState {
    fn fresh(tab: Tab) -> Self {
        match tab {
            Tab::Dashboard => ViewState::Dashboard(DashboardView::default()),
            Tab::Mentions => ViewState::Mentions(MentionsView::default()),
            Tab::Alerts => ViewState::Alerts(AlertsView::default()),
            Tab::Feeds => ViewState::Feeds(FeedsView::default()),
        }
    }
}

#[derive(Debug)]
pub struct App {
    active: Tab,
    mount: MountId,
    view: ViewState,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Tab::default())
    }
}

impl App {
    pub fn new(initial: Tab) -> Self {
        Self {
            active: initial,
            mount: MountId(1),
            view: ViewState::fresh(initial),
            should_quit: false,
        }
    }

    /// Effects to run once at startup.
    pub fn start(&self) -> Vec<Effect> {
        vec![Effect::Mount {
            tab: self.active,
            mount: self.mount,
        }]
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn mount(&self) -> MountId {
        self.mount
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Unmount the current view and mount `tab` with fresh state. Selecting
    /// the active tab is a no-op.
    pub fn select(&mut self, tab: Tab) -> Vec<Effect> {
        if tab == self.active {
            return Vec::new();
        }
        let old = self.mount;
        self.active = tab;
        self.mount = MountId(old.0 + 1);
        self.view = ViewState::fresh(tab);
        tracing::debug!(target: "shell", tab = tab.label(), mount = self.mount.0, "tab mounted");
        vec![
            Effect::Unmount { mount: old },
            Effect::Mount {
                tab,
                mount: self.mount,
            },
        ]
    }

    pub fn update(&mut self, event: AppEvent) -> Vec<Effect> {
        if let Some(m) = event.mount() {
            if m != self.mount {
                tracing::trace!(target: "shell", stale = m.0, current = self.mount.0, "dropping stale result");
                return Vec::new();
            }
        }

        let event = match event {
            AppEvent::Terminal(Event::Key(key)) => return self.on_key(key),
            other => other,
        };

        match (event, &mut self.view) {
            (AppEvent::Terminal(Event::Paste(text)), ViewState::Feeds(v)) => {
                text.chars().filter(|c| !c.is_control()).for_each(|c| v.push_char(c));
                Vec::new()
            }
            (AppEvent::Terminal(_), _) | (AppEvent::Tick, _) => Vec::new(),
            (AppEvent::Dashboard(_, r), ViewState::Dashboard(v)) => {
                v.apply(r);
                Vec::new()
            }
            (AppEvent::Mentions(_, r), ViewState::Mentions(v)) => {
                v.apply(r);
                Vec::new()
            }
            (AppEvent::AlertsPolled(_, r), ViewState::Alerts(v)) => {
                v.apply_poll(r);
                Vec::new()
            }
            (AppEvent::AlertStream(_, e), ViewState::Alerts(v)) => {
                v.apply_stream(e);
                Vec::new()
            }
            (AppEvent::FeedSubmitted(_, r), ViewState::Feeds(v)) => {
                v.finish_submit(r);
                Vec::new()
            }
            (other, _) => {
                tracing::warn!(target: "shell", event = ?other, "result does not belong to the mounted view");
                Vec::new()
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => return self.quit(),
            KeyCode::Esc => return self.quit(),
            KeyCode::Tab => return self.select(self.active.next()),
            KeyCode::BackTab => return self.select(self.active.prev()),
            _ => {}
        }

        // The feed form takes plain characters as text input.
        if let ViewState::Feeds(v) = &mut self.view {
            return match key.code {
                KeyCode::Char('u') if ctrl => {
                    v.clear_input();
                    Vec::new()
                }
                KeyCode::Char(c) if !ctrl => {
                    v.push_char(c);
                    Vec::new()
                }
                KeyCode::Backspace => {
                    v.backspace();
                    Vec::new()
                }
                KeyCode::F(n @ 1..=3) => {
                    v.prefill(usize::from(n - 1));
                    Vec::new()
                }
                KeyCode::Enter => match v.begin_submit() {
                    Some(url) => vec![Effect::SubmitFeed {
                        mount: self.mount,
                        url,
                    }],
                    None => Vec::new(),
                },
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as usize) - ('1' as usize);
                return self.select(Tab::ALL[idx]);
            }
            _ => {}
        }

        match &mut self.view {
            ViewState::Mentions(v) => match key.code {
                KeyCode::Char('a') => v.set_filter(SentimentFilter::All),
                KeyCode::Char('p') => v.set_filter(SentimentFilter::Positive),
                KeyCode::Char('u') => v.set_filter(SentimentFilter::Neutral),
                KeyCode::Char('n') => v.set_filter(SentimentFilter::Negative),
                KeyCode::Right => v.set_filter(v.filter.next()),
                KeyCode::Left => v.set_filter(v.filter.prev()),
                KeyCode::Down => v.scroll_down(),
                KeyCode::Up => v.scroll_up(),
                _ => {}
            },
            ViewState::Alerts(v) => match key.code {
                KeyCode::Down => v.scroll_down(),
                KeyCode::Up => v.scroll_up(),
                _ => {}
            },
            ViewState::Dashboard(_) | ViewState::Feeds(_) => {}
        }
        Vec::new()
    }

    fn quit(&mut self) -> Vec<Effect> {
        self.should_quit = true;
        vec![
            Effect::Unmount { mount: self.mount },
            Effect::Quit,
        ]
    }

    pub fn render(&self, frame: &mut Frame, now: DateTime<Utc>) {
        let [header, tabs, body, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "Brand Mention & Reputation Tracker",
                    Style::new().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Monitor brand mentions across multiple platforms in real-time",
                    muted(),
                )),
            ]),
            header,
        );

        frame.render_widget(
            Tabs::new(
                Tab::ALL
                    .iter()
                    .map(|t| format!("{} {}", t.icon(), t.label())),
            )
            .select(self.active.index())
            .highlight_style(
                Style::new()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .block(Block::default().borders(Borders::BOTTOM)),
            tabs,
        );

        let body = inset(body);
        match &self.view {
            ViewState::Dashboard(v) => v.render(frame, body),
            ViewState::Mentions(v) => v.render(frame, body, now),
            ViewState::Alerts(v) => v.render(frame, body, now),
            ViewState::Feeds(v) => v.render(frame, body),
        }

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(self.key_hints(), muted())),
                Line::from(Span::styled(
                    "Brand Mention Tracker - Real-time monitoring and sentiment analysis",
                    muted(),
                )),
            ])
            .block(Block::default().borders(Borders::TOP)),
            footer,
        );
    }

    fn key_hints(&self) -> &'static str {
        match self.view {
            ViewState::Feeds(_) => "Tab/Shift-Tab: switch · Enter: add feed · F1-F3: prefill · Ctrl-U: clear · Esc: quit",
            ViewState::Mentions(_) => "Tab/1-4: switch · a/p/u/n or ←/→: filter · ↑/↓: scroll · q: quit",
            ViewState::Alerts(_) => "Tab/1-4: switch · ↑/↓: scroll · q: quit",
            ViewState::Dashboard(_) => "Tab/1-4: switch · q: quit",
        }
    }
}

fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    }
}
