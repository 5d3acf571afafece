// src/views/mod.rs
//! The four tab views. Each one owns its own slice of state and its own
//! render function; they never read each other's data.

pub mod alerts;
pub mod dashboard;
pub mod feeds;
pub mod mentions;

use ratatui::style::{Color, Modifier, Style};

use crate::error::FetchError;

/// Lifecycle of a polled resource inside one mount.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Load<T> {
    #[default]
    Loading,
    Failed(String),
    Loaded(T),
}

impl<T> Load<T> {
    /// Latest poll wins, success or failure.
    pub fn apply(&mut self, result: Result<T, FetchError>) {
        *self = match result {
            Ok(v) => Load::Loaded(v),
            Err(e) => Load::Failed(e.to_string()),
        };
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Load::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Load::Failed(e) => Some(e.as_str()),
            _ => None,
        }
    }
}

pub(crate) fn title_style() -> Style {
    Style::new().add_modifier(Modifier::BOLD)
}

pub(crate) fn muted() -> Style {
    Style::new().fg(Color::DarkGray)
}

pub(crate) fn error_style() -> Style {
    Style::new().fg(Color::Red)
}
