// src/error.rs
//! Error taxonomy shared by the client, the poller and the alert stream.

use std::fmt;

/// A polled read that did not produce data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, DNS failure, reset mid-body, ...
    Transport(String),
    /// Non-2xx response.
    Status(u16),
    /// 2xx response whose body is not the expected JSON.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "request failed: {msg}"),
            FetchError::Status(code) => write!(f, "HTTP status {code}"),
            FetchError::Decode(msg) => write!(f, "invalid response body: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Outcome of a failed feed registration, shaped for direct display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The backend answered non-2xx; carries its `error` text.
    Rejected(String),
    /// Network fault or unreadable response.
    Transport(String),
}

pub const DEFAULT_REJECTION: &str = "Failed to start fetch";

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Rejected(text) => f.write_str(text),
            SubmitError::Transport(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// A live-channel payload that is not an alert record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamParseError {
    pub reason: String,
    /// Leading part of the offending payload, for the log line.
    pub excerpt: String,
}

impl StreamParseError {
    const EXCERPT_CHARS: usize = 120;

    pub fn new(reason: impl fmt::Display, payload: &str) -> Self {
        Self {
            reason: reason.to_string(),
            excerpt: payload.chars().take(Self::EXCERPT_CHARS).collect(),
        }
    }
}

impl fmt::Display for StreamParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed alert payload ({}): {}", self.reason, self.excerpt)
    }
}

impl std::error::Error for StreamParseError {}
