use crate::utils::error::{Result, WatchError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A page under watch. The nickname doubles as the snapshot file stem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchUrl {
    pub url: String,
    pub nickname: String,
}

impl WatchUrl {
    pub fn new(url: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            nickname: nickname.into(),
        }
    }

    /// Parse a command-line spec: either `nickname=https://...` or a bare URL,
    /// in which case the nickname is derived from host and path.
    pub fn from_spec(spec: &str) -> Result<Self> {
        let (nickname, url_str) = match spec.split_once('=') {
            // '=' can also appear inside a query string; only treat the prefix
            // as a nickname when it is not itself a URL fragment
            Some((name, rest)) if !name.contains("://") && rest.contains("://") => {
                (Some(name.to_string()), rest.to_string())
            }
            _ => (None, spec.to_string()),
        };

        let parsed = Url::parse(&url_str).map_err(|e| WatchError::InvalidConfigValueError {
            field: "url".to_string(),
            value: spec.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let nickname = match nickname {
            Some(name) => sanitize_nickname(&name),
            None => derive_nickname(&parsed),
        };

        if nickname.is_empty() {
            return Err(WatchError::InvalidConfigValueError {
                field: "url".to_string(),
                value: spec.to_string(),
                reason: "Could not derive a nickname from the URL".to_string(),
            });
        }

        Ok(Self {
            url: url_str,
            nickname,
        })
    }
}

impl std::fmt::Display for WatchUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

fn derive_nickname(url: &Url) -> String {
    let host = url.host_str().unwrap_or("page");
    let slug = format!("{}{}", host, url.path());
    sanitize_nickname(&slug)
}

fn sanitize_nickname(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .trim_matches('-')
        .to_string()
}

/// Result of a single page fetch. `status_code` is `None` for drivers that
/// cannot observe it (subprocess-based fetches).
#[derive(Debug, Clone)]
pub struct HttpGetResponse {
    pub text: String,
    pub final_url: String,
    pub status_code: Option<u16>,
    pub fetched_at: DateTime<Utc>,
}

impl HttpGetResponse {
    pub fn new(text: String, final_url: String, status_code: Option<u16>) -> Self {
        Self {
            text,
            final_url,
            status_code,
            fetched_at: Utc::now(),
        }
    }

    /// A fetch without an observable status is assumed good: the driver would
    /// have returned an error otherwise.
    pub fn ok(&self) -> bool {
        match self.status_code {
            Some(code) => (200..400).contains(&code),
            None => true,
        }
    }
}
