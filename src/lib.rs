// src/lib.rs
// Public library surface for the binary and the integration tests.

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod poll;
pub mod shell;
pub mod stream;
pub mod views;

// ---- Re-exports for stable public API ----
pub use crate::client::{ApiClient, Backend};
pub use crate::config::{DashboardConfig, Endpoints, PageLocation, RefreshIntervals};
pub use crate::error::{FetchError, StreamParseError, SubmitError};
pub use crate::shell::{App, AppEvent, Effect, MountId, Tab};
