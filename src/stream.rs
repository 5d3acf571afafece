// src/stream.rs
//! Live alert channel.
//!
//! One WebSocket per alerts mount. Every inbound text frame is one JSON
//! alert; frames that do not parse are logged and skipped without touching
//! the connection. A dropped connection is reported once and not retried:
//! live alerts resume only when the view is mounted again.

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::error::StreamParseError;
use crate::model::Alert;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    Connecting,
    Open,
    Closed,
    Failed(String),
}

impl StreamStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StreamStatus::Connecting => "connecting",
            StreamStatus::Open => "live",
            StreamStatus::Closed => "closed",
            StreamStatus::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Status(StreamStatus),
    Alert(Alert),
}

pub fn parse_alert(payload: &str) -> Result<Alert, StreamParseError> {
    serde_json::from_str::<Alert>(payload).map_err(|e| StreamParseError::new(e, payload))
}

pub fn spawn_alert_stream<D>(url: String, cancel: CancellationToken, deliver: D) -> JoinHandle<()>
where
    D: Fn(StreamEvent) + Send + Sync + 'static,
{
    tokio::spawn(async move {
        deliver(StreamEvent::Status(StreamStatus::Connecting));

        let connected = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            r = connect_async(url.as_str()) => r,
        };
        let (mut ws, _rsp) = match connected {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(target: "stream", %url, error = %e, "connect failed");
                deliver(StreamEvent::Status(StreamStatus::Failed(e.to_string())));
                return;
            }
        };
        tracing::info!(target: "stream", %url, "alert stream connected");
        deliver(StreamEvent::Status(StreamStatus::Open));

        let on_payload = |payload: &str| match parse_alert(payload) {
            Ok(alert) => deliver(StreamEvent::Alert(alert)),
            Err(e) => tracing::warn!(target: "stream", error = %e, "discarding live message"),
        };

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    let _ = ws.close(None).await;
                    tracing::info!(target: "stream", %url, "alert stream closed on unmount");
                    return;
                }
                msg = ws.next() => match msg {
                    Some(Ok(Message::Text(text))) => on_payload(&text),
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => on_payload(text),
                        Err(e) => tracing::warn!(target: "stream", error = %e, "discarding non-utf8 frame"),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!(target: "stream", %url, "alert stream closed by server");
                        deliver(StreamEvent::Status(StreamStatus::Closed));
                        return;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(target: "stream", %url, error = %e, "alert stream dropped");
                        deliver(StreamEvent::Status(StreamStatus::Failed(e.to_string())));
                        return;
                    }
                },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_broadcast_payload() {
        let a = parse_alert(
            r#"{"id":4,"alert_type":"negative_spike","description":"6 negative mentions in last 10 minutes","mention_text":"awful","created_at":"2025-09-06T09:00:00+00:00"}"#,
        )
        .unwrap();
        assert_eq!(a.id, Some(4));
        assert_eq!(a.alert_type.as_deref(), Some("negative_spike"));
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(parse_alert("not json").is_err());
        assert!(parse_alert("[1,2]").is_err());
        let e = parse_alert("{\"id\": \"x\"").unwrap_err();
        assert!(e.excerpt.starts_with("{\"id\""));
    }
}
