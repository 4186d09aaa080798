use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use super::error::{ConvertError, Result};
use super::model::{RawSource, SourceOrigin};
use crate::config::FetchConfig;

/// Characters of an error body kept for display.
const BODY_PREVIEW_CHARS: usize = 1000;
/// Bytes of an HTML payload kept for display.
const HTML_PREVIEW_BYTES: usize = 500;
/// Prefixes (lowercased) that mark a body as markup rather than point data.
const MARKUP_PREFIXES: [&[u8]; 3] = [b"<!do", b"<html", b"<?xml"];

// ---------------------------------------------------------------------------
// Auth – mutually exclusive credential modes
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Eq, Default)]
pub enum Auth {
    #[default]
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Bearer(_) => f.write_str("Bearer(***)"),
            Auth::Basic { username, .. } => write!(f, "Basic({username}, ***)"),
        }
    }
}

/// Auth mode picked in the UI selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthKind {
    #[default]
    None,
    Bearer,
    Basic,
}

impl AuthKind {
    pub const ALL: [AuthKind; 3] = [AuthKind::None, AuthKind::Bearer, AuthKind::Basic];

    pub fn label(self) -> &'static str {
        match self {
            AuthKind::None => "None",
            AuthKind::Bearer => "Bearer token",
            AuthKind::Basic => "Basic auth",
        }
    }
}

impl Auth {
    /// Collapse the raw form inputs into a credential.
    ///
    /// An empty token means no auth; Basic is used when either the username or
    /// the password is filled in.
    pub fn from_inputs(kind: AuthKind, token: &str, username: &str, password: &str) -> Self {
        match kind {
            AuthKind::Bearer if !token.is_empty() => Auth::Bearer(token.to_string()),
            AuthKind::Basic if !username.is_empty() || !password.is_empty() => Auth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
            _ => Auth::None,
        }
    }

    /// Mode name for logs; never includes the secret.
    fn describe(&self) -> &'static str {
        match self {
            Auth::None => "none",
            Auth::Bearer(_) => "bearer",
            Auth::Basic { .. } => "basic",
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Download `url` into memory.
///
/// Only a `200 OK` with a non-markup body is accepted. Redirects are followed
/// and the request is bounded by `config.timeout_secs`. There are no retries.
pub fn fetch(url: &str, auth: &Auth, config: &FetchConfig) -> Result<RawSource> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()?;

    log::debug!(
        "GET {url} (auth: {}, timeout: {}s)",
        auth.describe(),
        config.timeout_secs
    );

    let request = match auth {
        Auth::None => client.get(url),
        Auth::Bearer(token) => client.get(url).bearer_auth(token),
        Auth::Basic { username, password } => client.get(url).basic_auth(username, Some(password)),
    };
    let response = request.send()?;

    let status = response.status();
    if status != StatusCode::OK {
        let reason = status.canonical_reason().unwrap_or("").to_string();
        let body = response.text().unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            log::warn!("{url} requires credentials or a presigned URL");
        }
        return Err(ConvertError::HttpStatus {
            status: status.as_u16(),
            reason,
            body_preview: body.chars().take(BODY_PREVIEW_CHARS).collect(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    let bytes = response.bytes()?.to_vec();

    check_payload(&content_type, &bytes)?;

    Ok(RawSource {
        origin: SourceOrigin::Url(url.to_string()),
        bytes,
        content_type: Some(content_type),
        status: Some(status.as_u16()),
    })
}

/// Reject bodies that look like an HTML/XML document, e.g. a login or error
/// page served with a 200.
pub fn check_payload(content_type: &str, body: &[u8]) -> Result<()> {
    let prefix = body[..body.len().min(8)].to_ascii_lowercase();
    let is_markup = MARKUP_PREFIXES.iter().any(|p| prefix.starts_with(p))
        || content_type.to_ascii_lowercase().contains("html");

    if is_markup {
        let preview = &body[..body.len().min(HTML_PREVIEW_BYTES)];
        return Err(ConvertError::UnexpectedContent {
            content_type: content_type.to_string(),
            preview: String::from_utf8_lossy(preview).into_owned(),
        });
    }
    Ok(())
}
