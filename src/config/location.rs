// src/config/location.rs
//! Endpoint derivation from the page location the dashboard is served from.
//!
//! The HTTP base is the location origin plus a fixed relative prefix. The
//! WebSocket origin always carries an explicit port: the location's own, or
//! 443/80 by scheme.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use url::Url;

static ENDPOINTS: OnceCell<Endpoints> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// `http` / `https` (lower-case, without the colon).
    pub scheme: String,
    pub hostname: String,
    /// `None` when the location uses the scheme's default port.
    pub port: Option<u16>,
    /// `scheme://host[:port]`
    pub origin: String,
}

impl PageLocation {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim()).with_context(|| format!("invalid page location '{raw}'"))?;
        let hostname = url
            .host_str()
            .ok_or_else(|| anyhow!("page location '{raw}' has no host"))?
            .to_string();
        Ok(Self {
            scheme: url.scheme().to_ascii_lowercase(),
            hostname,
            port: url.port(),
            origin: url.origin().ascii_serialization(),
        })
    }

    pub fn is_secure(&self) -> bool {
        self.scheme == "https"
    }
}

/// Resolved base URLs; every request path hangs off these two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub ws_base: String,
}

impl Endpoints {
    pub fn resolve(loc: &PageLocation, api_prefix: &str, ws_prefix: &str) -> Self {
        let port = loc
            .port
            .unwrap_or(if loc.is_secure() { 443 } else { 80 });
        let proto = if loc.is_secure() { "wss" } else { "ws" };
        Self {
            api_base: format!("{}{}", loc.origin, normalize_prefix(api_prefix)),
            ws_base: format!(
                "{proto}://{}:{port}{}",
                loc.hostname,
                normalize_prefix(ws_prefix)
            ),
        }
    }

    /// Install the process-wide endpoints. The first call wins; later calls
    /// get the already-installed value back.
    pub fn install(self) -> &'static Endpoints {
        let installed = ENDPOINTS.get_or_init(|| self);
        tracing::info!(
            target: "config",
            api_base = %installed.api_base,
            ws_base = %installed.ws_base,
            "endpoints resolved"
        );
        installed
    }

    pub fn dashboard_stats(&self) -> String {
        format!("{}/dashboard-stats/", self.api_base)
    }

    pub fn recent_mentions(&self, limit: usize) -> String {
        format!("{}/mentions/recent/?limit={limit}", self.api_base)
    }

    pub fn alerts(&self) -> String {
        format!("{}/alerts/?ordering=-created_at", self.api_base)
    }

    pub fn start_fetch(&self) -> String {
        format!("{}/start-fetch/", self.api_base)
    }

    pub fn alert_stream(&self) -> String {
        format!("{}/mentions/", self.ws_base)
    }
}

/// `"api/"` → `"/api"`, `""` → `""`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
