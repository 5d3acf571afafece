// tests/shell_flow.rs
//
// App + EffectRunner wired together over a fake Backend, no terminal.
//
// Covered:
// - mounting a tab starts its poller; results land in that view
// - switching tabs cancels the old poller and stale results are dropped
// - a feed submission outlives the tab but its result is ignored afterwards
// - the alerts tab runs its poller and the live stream under one mount

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use brand_tracker_dashboard::client::Backend;
use brand_tracker_dashboard::config::RefreshIntervals;
use brand_tracker_dashboard::error::{FetchError, SubmitError};
use brand_tracker_dashboard::model::{Alert, DashboardStats, Mention};
use brand_tracker_dashboard::shell::runtime::{EffectRunner, Inbox};
use brand_tracker_dashboard::shell::{App, AppEvent, Effect, MountId, Tab, ViewState};
use brand_tracker_dashboard::stream::{StreamEvent, StreamStatus};

#[derive(Default)]
struct FakeBackend {
    stats_calls: AtomicUsize,
    mention_calls: AtomicUsize,
    alert_calls: AtomicUsize,
    /// Simulated latency of start-fetch.
    submit_delay: Duration,
}

#[async_trait]
impl Backend for FakeBackend {
    async fn dashboard_stats(&self) -> Result<DashboardStats, FetchError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        let mut stats = DashboardStats::default();
        stats.mentions.total = 42;
        Ok(stats)
    }

    async fn recent_mentions(&self) -> Result<Vec<Mention>, FetchError> {
        self.mention_calls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::Status(503))
    }

    async fn alerts(&self) -> Result<Vec<Alert>, FetchError> {
        self.alert_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Alert {
            id: Some(1),
            alert_type: Some("volume".into()),
            description: Some("busy".into()),
            mention_text: None,
            mention: None,
            created_at: None,
            resolved: Some(false),
        }])
    }

    async fn start_fetch(&self, url: &str) -> Result<String, SubmitError> {
        tokio::time::sleep(self.submit_delay).await;
        Ok(url.to_string())
    }
}

fn refresh() -> RefreshIntervals {
    RefreshIntervals {
        dashboard: Duration::from_secs(30),
        mentions: Duration::from_secs(15),
        alerts: Duration::from_secs(10),
    }
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

/// Pump everything currently queued through the app.
fn drain(app: &mut App, runner: &mut EffectRunner, inbox: &mut Inbox) -> Vec<MountId> {
    let mut mounts = Vec::new();
    while let Ok(ev) = inbox.try_recv() {
        match &ev {
            AppEvent::Dashboard(m, _)
            | AppEvent::Mentions(m, _)
            | AppEvent::AlertsPolled(m, _)
            | AppEvent::AlertStream(m, _)
            | AppEvent::FeedSubmitted(m, _) => mounts.push(*m),
            _ => {}
        }
        let effects = app.update(ev);
        runner.execute_all(effects);
    }
    mounts
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn dashboard_mount_polls_and_fills_view() {
    let backend = Arc::new(FakeBackend::default());
    let (mut runner, mut inbox) = EffectRunner::new(backend.clone(), "ws://unused", refresh());
    let mut app = App::new(Tab::Dashboard);

    runner.execute_all(app.start());
    settle().await;
    drain(&mut app, &mut runner, &mut inbox);

    assert_eq!(backend.stats_calls.load(Ordering::SeqCst), 1);
    match app.view() {
        ViewState::Dashboard(v) => {
            assert_eq!(v.stats.loaded().map(|s| s.mentions.total), Some(42))
        }
        other => panic!("unexpected view {other:?}"),
    }

    tokio::time::sleep(Duration::from_secs(31)).await;
    settle().await;
    drain(&mut app, &mut runner, &mut inbox);
    assert_eq!(backend.stats_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn switching_tabs_cancels_previous_poller() {
    let backend = Arc::new(FakeBackend::default());
    let (mut runner, mut inbox) = EffectRunner::new(backend.clone(), "ws://unused", refresh());
    let mut app = App::new(Tab::Dashboard);

    runner.execute_all(app.start());
    settle().await;
    drain(&mut app, &mut runner, &mut inbox);

    let effects = app.update(key(KeyCode::Char('2')));
    assert!(effects.contains(&Effect::Unmount { mount: MountId(1) }));
    runner.execute_all(effects);
    assert_eq!(runner.current_mount(), Some(MountId(2)));
    settle().await;
    drain(&mut app, &mut runner, &mut inbox);

    let stats_before = backend.stats_calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(120)).await;
    settle().await;
    let mounts = drain(&mut app, &mut runner, &mut inbox);

    assert_eq!(backend.stats_calls.load(Ordering::SeqCst), stats_before);
    assert!(backend.mention_calls.load(Ordering::SeqCst) >= 2);
    assert!(mounts.iter().all(|m| *m == MountId(2)));
    match app.view() {
        ViewState::Mentions(v) => assert_eq!(v.mentions.error(), Some("HTTP status 503")),
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn feed_result_after_tab_change_is_dropped() {
    let backend = Arc::new(FakeBackend {
        submit_delay: Duration::from_secs(5),
        ..FakeBackend::default()
    });
    let (mut runner, mut inbox) = EffectRunner::new(backend.clone(), "ws://unused", refresh());
    let mut app = App::new(Tab::Feeds);
    runner.execute_all(app.start());

    app.update(key(KeyCode::F(1)));
    let effects = app.update(key(KeyCode::Enter));
    assert!(matches!(effects.as_slice(), [Effect::SubmitFeed { .. }]));
    runner.execute_all(effects);

    // Leave and come back before the backend answers.
    let effects = app.update(key(KeyCode::Tab));
    runner.execute_all(effects);
    let effects = app.update(key(KeyCode::BackTab));
    runner.execute_all(effects);
    assert_eq!(app.mount(), MountId(3));

    tokio::time::sleep(Duration::from_secs(6)).await;
    settle().await;
    let mounts = drain(&mut app, &mut runner, &mut inbox);

    assert!(mounts.contains(&MountId(1)), "submission was not cancelled");
    match app.view() {
        ViewState::Feeds(v) => {
            assert!(v.message.is_none());
            assert!(v.input.is_empty());
            assert!(!v.submitting);
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn alerts_mount_runs_poller_and_stream() {
    let backend = Arc::new(FakeBackend::default());
    // Not a ws:// URL, so the handshake fails without touching the network.
    let (mut runner, mut inbox) = EffectRunner::new(backend.clone(), "not a url", refresh());
    let mut app = App::new(Tab::Alerts);

    runner.execute_all(app.start());
    settle().await;

    let mut stream_events = Vec::new();
    while let Ok(ev) = inbox.try_recv() {
        if let AppEvent::AlertStream(_, e) = &ev {
            stream_events.push(e.clone());
        }
        let effects = app.update(ev);
        runner.execute_all(effects);
    }

    assert_eq!(backend.alert_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        stream_events.first(),
        Some(&StreamEvent::Status(StreamStatus::Connecting))
    );
    assert!(matches!(
        stream_events.last(),
        Some(StreamEvent::Status(StreamStatus::Failed(_)))
    ));
    match app.view() {
        ViewState::Alerts(v) => {
            assert_eq!(v.merged().len(), 1);
            assert!(matches!(v.stream, StreamStatus::Failed(_)));
        }
        other => panic!("unexpected view {other:?}"),
    }
}
