//! Synthetic response artifact
//!
//! The engine hands the adapter a fully formed artifact; the adapter only
//! applies it to the live exchange (and sleeps the injected delay first).

use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::config::{ErrorDefinition, ResponseFormat};
use crate::context::RequestContext;

/// Marker header stamped on every injected response
pub const HEADER_CHAOS_INJECTED: &str = "x-chaos-injected";
/// Engine version header stamped on every injected response
pub const HEADER_CHAOS_VERSION: &str = "x-naas-version";

/// A synthetic response ready for the adapter to write
///
/// Headers are kept in insertion order: engine-identifying headers first,
/// user-configured custom headers after, so last-write-wins header maps
/// let custom headers shadow the engine's.
#[derive(Debug, Clone)]
pub struct InjectedResponse {
    /// HTTP status code of the injected error
    pub status: u16,
    /// Ordered response headers
    pub headers: Vec<(String, String)>,
    /// Rendered body
    pub body: String,
    /// MIME type matching the body rendering
    pub content_type: String,
    /// Hold the request this long before completing
    pub delay: Option<Duration>,
}

impl InjectedResponse {
    /// Minimal plain-text artifact, mostly useful from custom hooks
    pub fn plain(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            content_type: "text/plain".to_string(),
            delay: None,
        }
    }

    /// Build the artifact for a selected catalog error
    pub(crate) fn for_error(
        error: &ErrorDefinition,
        ctx: &RequestContext,
        format: ResponseFormat,
        custom_headers: &[(String, String)],
        delay: Option<Duration>,
    ) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let (body, content_type) = match format {
            ResponseFormat::Json => (
                serde_json::json!({
                    "error": {
                        "code": error.code,
                        "message": error.message,
                        "timestamp": timestamp,
                        "path": ctx.path,
                        "method": ctx.method,
                        "chaos": true,
                        "naas": crate::ENGINE_VERSION,
                    }
                })
                .to_string(),
                "application/json",
            ),
            ResponseFormat::Xml => (
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <error><code>{}</code><message>{}</message>\
                     <timestamp>{}</timestamp><path>{}</path>\
                     <method>{}</method></error>",
                    error.code,
                    xml_escape(&error.message),
                    timestamp,
                    xml_escape(&ctx.path),
                    xml_escape(&ctx.method),
                ),
                "application/xml",
            ),
            ResponseFormat::Plain => (error.message.clone(), "text/plain"),
        };

        let mut headers = Vec::with_capacity(2 + custom_headers.len());
        headers.push((HEADER_CHAOS_INJECTED.to_string(), "true".to_string()));
        headers.push((
            HEADER_CHAOS_VERSION.to_string(),
            crate::ENGINE_VERSION.to_string(),
        ));
        headers.extend(custom_headers.iter().cloned());

        Self {
            status: error.code,
            headers,
            body,
            content_type: content_type.to_string(),
            delay,
        }
    }
}

/// Escape text content for embedding in the xml envelope
fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
