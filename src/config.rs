//! Viewer configuration.
//!
//! Layers, later ones winning: built-in defaults (the backend URL may be baked
//! in at build time through `LOG_VIEWER_BACKEND_URL`), a JSON document
//! embedded in the page, then `?backend=` and `?maxLines=` query parameters.
//! A bad layer is logged and skipped; the viewer always starts.

use serde::Deserialize;
use url::Url;

use crate::error::{Result, ViewerError};
use crate::reconnect::ReconnectPolicy;
use crate::state::parse_max_lines;

/// Element id of the optional `<script type="application/json">` config block.
pub const CONFIG_ELEMENT_ID: &str = "log-viewer-config";

const FALLBACK_BACKEND_URL: &str = "ws://127.0.0.1:9211/ws";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub backend_url: String,
    pub max_log_lines: usize,
    pub title: String,
    pub reconnect: ReconnectPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            backend_url: option_env!("LOG_VIEWER_BACKEND_URL")
                .unwrap_or(FALLBACK_BACKEND_URL)
                .to_string(),
            max_log_lines: 200,
            title: "Realtime Log Viewer".to_string(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_backend_url(&self.backend_url)?;
        self.reconnect.validate()
    }

    /// Applies `backend` and `maxLines` from a query string (with or without
    /// the leading `?`). Invalid values are logged and ignored.
    pub fn with_query_overrides(mut self, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "backend" => match validate_backend_url(&value) {
                    Ok(()) => self.backend_url = value.into_owned(),
                    Err(err) => log::warn!("ignoring backend override: {err}"),
                },
                "maxLines" => self.max_log_lines = parse_max_lines(&value),
                _ => {}
            }
        }
        self
    }

    /// Builds the configuration for the current page.
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };

        let embedded = window
            .document()
            .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|element| element.text_content());

        let base = match embedded {
            Some(raw) => Self::from_json(&raw).unwrap_or_else(|err| {
                log::warn!("ignoring embedded viewer config: {err}");
                Self::default()
            }),
            None => Self::default(),
        };

        match window.location().search() {
            Ok(query) => base.with_query_overrides(&query),
            Err(_) => base,
        }
    }
}

fn validate_backend_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).map_err(|source| ViewerError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(()),
        other => Err(ViewerError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = ViewerConfig::default();
        assert_eq!(config.max_log_lines, 200);
        assert_eq!(config.reconnect.min_interval_ms, 1_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = ViewerConfig::from_json(
            r#"{ "backendUrl": "wss://logs.example.com/ws", "reconnect": { "maxIntervalMs": 8000 } }"#,
        )
        .unwrap();

        assert_eq!(config.backend_url, "wss://logs.example.com/ws");
        assert_eq!(config.max_log_lines, 200);
        assert_eq!(config.reconnect.min_interval_ms, 1_000);
        assert_eq!(config.reconnect.max_interval_ms, 8_000);
    }

    #[test]
    fn json_rejects_http_urls() {
        let err = ViewerConfig::from_json(r#"{ "backendUrl": "http://localhost/ws" }"#).unwrap_err();
        assert!(matches!(err, ViewerError::UnsupportedScheme(scheme) if scheme == "http"));
    }

    #[test]
    fn json_rejects_bad_policy() {
        let err = ViewerConfig::from_json(r#"{ "reconnect": { "minIntervalMs": 0 } }"#).unwrap_err();
        assert!(matches!(err, ViewerError::Policy(_)));
    }

    #[test]
    fn json_rejects_intervals_past_timer_limit() {
        let err = ViewerConfig::from_json(
            r#"{ "reconnect": { "minIntervalMs": 4294967295, "maxIntervalMs": 4294967295 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ViewerError::Policy(_)));
    }

    #[test]
    fn json_reports_syntax_errors() {
        let err = ViewerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test]
    fn query_overrides_apply() {
        let config = ViewerConfig::default()
            .with_query_overrides("?backend=ws%3A%2F%2F10.0.0.2%3A9211%2Fws&maxLines=50&x=1");
        assert_eq!(config.backend_url, "ws://10.0.0.2:9211/ws");
        assert_eq!(config.max_log_lines, 50);
    }

    #[test]
    fn invalid_backend_override_is_ignored() {
        let before = ViewerConfig::default();
        let after = before.clone().with_query_overrides("backend=not%20a%20url");
        assert_eq!(after.backend_url, before.backend_url);
    }
}
