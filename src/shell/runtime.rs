//! Runtime: owns the terminal, runs the event loop, executes effects.
//!
//! `App::update` stays pure; everything that touches the network happens in
//! `EffectRunner`. Background tasks report back through one inbox channel,
//! each message tagged with the `MountId` it was started under.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::event::EventStream;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::terminal::{self, Term};
use super::{App, AppEvent, Effect, MountId, Tab};
use crate::client::Backend;
use crate::config::RefreshIntervals;
use crate::poll::spawn_poller;
use crate::stream::spawn_alert_stream;

/// Redraw cadence for relative timestamps when nothing else happens.
pub const TICK: Duration = Duration::from_secs(1);

pub type Inbox = mpsc::UnboundedReceiver<AppEvent>;

/// Executes effects against a `Backend`. Holds the cancellation scope of the
/// current mount.
pub struct EffectRunner {
    backend: Arc<dyn Backend>,
    stream_url: String,
    refresh: RefreshIntervals,
    inbox: mpsc::UnboundedSender<AppEvent>,
    scope: Option<(MountId, CancellationToken)>,
}

impl EffectRunner {
    /// Returns the runner and the receiving end of its inbox.
    pub fn new(
        backend: Arc<dyn Backend>,
        stream_url: impl Into<String>,
        refresh: RefreshIntervals,
    ) -> (Self, Inbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = Self {
            backend,
            stream_url: stream_url.into(),
            refresh,
            inbox: tx,
            scope: None,
        };
        (runner, rx)
    }

    pub fn current_mount(&self) -> Option<MountId> {
        self.scope.as_ref().map(|(m, _)| *m)
    }

    pub fn execute_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.execute(effect);
        }
    }

    pub fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Mount { tab, mount } => self.mount(tab, mount),
            Effect::Unmount { mount } => self.unmount(mount),
            Effect::SubmitFeed { mount, url } => self.submit_feed(mount, url),
            Effect::Quit => self.cancel_scope(),
        }
    }

    fn mount(&mut self, tab: Tab, mount: MountId) {
        self.cancel_scope();
        let cancel = CancellationToken::new();
        self.scope = Some((mount, cancel.clone()));

        match tab {
            Tab::Dashboard => {
                let backend = self.backend.clone();
                let tx = self.inbox.clone();
                spawn_poller(
                    "dashboard",
                    self.refresh.dashboard,
                    cancel,
                    move || {
                        let b = backend.clone();
                        async move { b.dashboard_stats().await }
                    },
                    move |r| {
                        let _ = tx.send(AppEvent::Dashboard(mount, r));
                    },
                );
            }
            Tab::Mentions => {
                let backend = self.backend.clone();
                let tx = self.inbox.clone();
                spawn_poller(
                    "mentions",
                    self.refresh.mentions,
                    cancel,
                    move || {
                        let b = backend.clone();
                        async move { b.recent_mentions().await }
                    },
                    move |r| {
                        let _ = tx.send(AppEvent::Mentions(mount, r));
                    },
                );
            }
            Tab::Alerts => {
                let backend = self.backend.clone();
                let tx = self.inbox.clone();
                spawn_poller(
                    "alerts",
                    self.refresh.alerts,
                    cancel.clone(),
                    move || {
                        let b = backend.clone();
                        async move { b.alerts().await }
                    },
                    move |r| {
                        let _ = tx.send(AppEvent::AlertsPolled(mount, r));
                    },
                );
                let tx = self.inbox.clone();
                spawn_alert_stream(self.stream_url.clone(), cancel, move |e| {
                    let _ = tx.send(AppEvent::AlertStream(mount, e));
                });
            }
            // Nothing runs in the background until a submission.
            Tab::Feeds => {}
        }
        tracing::debug!(target: "shell", tab = tab.label(), mount = mount.0, "mount scope opened");
    }

    fn unmount(&mut self, mount: MountId) {
        if self.current_mount() == Some(mount) {
            self.cancel_scope();
        }
    }

    fn cancel_scope(&mut self) {
        if let Some((mount, cancel)) = self.scope.take() {
            cancel.cancel();
            tracing::debug!(target: "shell", mount = mount.0, "mount scope cancelled");
        }
    }

    /// Not tied to the mount scope; a result that arrives after the tab
    /// changed is dropped by `App::update`.
    fn submit_feed(&self, mount: MountId, url: String) {
        let backend = self.backend.clone();
        let tx = self.inbox.clone();
        tokio::spawn(async move {
            let outcome = backend.start_fetch(&url).await;
            match &outcome {
                Ok(u) => tracing::info!(target: "shell", url = %u, "feed fetch started"),
                Err(e) => tracing::warn!(target: "shell", %url, error = %e, "feed fetch rejected"),
            }
            let _ = tx.send(AppEvent::FeedSubmitted(mount, outcome));
        });
    }
}

impl Drop for EffectRunner {
    fn drop(&mut self) {
        self.cancel_scope();
    }
}

/// Full-screen runtime. Restores the terminal on drop.
pub struct Runtime {
    terminal: Term,
    app: App,
    runner: EffectRunner,
    inbox: Inbox,
}

impl Runtime {
    pub fn new(
        app: App,
        backend: Arc<dyn Backend>,
        stream_url: impl Into<String>,
        refresh: RefreshIntervals,
    ) -> Result<Self> {
        terminal::install_panic_hook();
        // No Drop runs for a half-built runtime, so a failed setup undoes itself.
        let terminal = terminal::undo_on_error(terminal::setup_terminal, || {
            let _ = terminal::restore_terminal();
        })
        .context("Failed to setup terminal")?;
        let (runner, inbox) = EffectRunner::new(backend, stream_url, refresh);
        Ok(Self {
            terminal,
            app,
            runner,
            inbox,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        let result = self.event_loop().await;
        let _ = terminal::disable_input_features();
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        let mut input = EventStream::new();
        let mut tick = tokio::time::interval(TICK);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let effects = self.app.start();
        self.runner.execute_all(effects);

        while !self.app.should_quit() {
            let app = &self.app;
            self.terminal
                .draw(|frame| app.render(frame, Utc::now()))
                .context("Failed to draw frame")?;

            let event = tokio::select! {
                maybe = input.next() => match maybe {
                    Some(Ok(ev)) => AppEvent::Terminal(ev),
                    Some(Err(e)) => return Err(e).context("Failed to read terminal input"),
                    None => break,
                },
                Some(ev) = self.inbox.recv() => ev,
                _ = tick.tick() => AppEvent::Tick,
            };
            self.dispatch(event);

            // Batch whatever else is already queued into the same frame.
            while let Ok(ev) = self.inbox.try_recv() {
                self.dispatch(ev);
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, event: AppEvent) {
        let effects = self.app.update(event);
        self.runner.execute_all(effects);
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = terminal::restore_terminal();
    }
}
