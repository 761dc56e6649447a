// File: maskbot-common/src/models/member.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::privacy::Privacy;

/// A single prefix/suffix pattern belonging to a member. Stored as one
/// element of the `proxy_tags` jsonb array on the member row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTag {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl ProxyTag {
    pub fn new(prefix: Option<&str>, suffix: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(String::from),
            suffix: suffix.map(String::from),
        }
    }

    /// Matches this tag against the given message content.
    ///
    /// Returns the content with the tags stripped and the remainder trimmed,
    /// or the content unchanged when `keep_proxy` is set. A tag with neither
    /// prefix nor suffix never matches. A message consisting of nothing but
    /// the tags matches with an empty result; policy for that case belongs to
    /// the caller.
    pub fn matches(&self, content: &str, keep_proxy: bool) -> Option<String> {
        match (self.prefix.as_deref(), self.suffix.as_deref()) {
            (Some(prefix), Some(suffix)) => {
                if content.starts_with(prefix) && content.ends_with(suffix) {
                    if keep_proxy {
                        return Some(content.to_string());
                    }
                    let rest = content.strip_prefix(prefix).unwrap_or(content);
                    // The suffix may already be gone when prefix and suffix
                    // overlapped; stripping is a no-op then.
                    let rest = rest.strip_suffix(suffix).unwrap_or(rest);
                    Some(rest.trim().to_string())
                } else {
                    None
                }
            }
            (Some(prefix), None) => {
                if content.starts_with(prefix) {
                    if keep_proxy {
                        return Some(content.to_string());
                    }
                    let rest = content.strip_prefix(prefix).unwrap_or(content);
                    Some(rest.trim().to_string())
                } else {
                    None
                }
            }
            (None, Some(suffix)) => {
                if content.ends_with(suffix) {
                    if keep_proxy {
                        return Some(content.to_string());
                    }
                    let rest = content.strip_suffix(suffix).unwrap_or(content);
                    Some(rest.trim().to_string())
                } else {
                    None
                }
            }
            (None, None) => None,
        }
    }
}

impl fmt::Display for ProxyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}text{}",
            self.prefix.as_deref().unwrap_or(""),
            self.suffix.as_deref().unwrap_or("")
        )
    }
}

/// A member row from the database.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: i32,
    pub hid: String,
    /// Only present when the member was loaded through a view that joins the
    /// owning system.
    pub system_hid: Option<String>,
    pub name: String,
    pub display_name: Option<String>,
    pub colour: Option<String>,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    /// Ordered; the first tag that matches wins.
    pub proxy_tags: Vec<ProxyTag>,
    pub keep_proxy: bool,
    pub description_privacy: Privacy,
    pub created: DateTime<Utc>,
}

impl Member {
    /// Tries this member's proxy tags in stored order and returns the first
    /// match, already stripped (or untouched when the member keeps proxies).
    pub fn match_proxy(&self, content: &str) -> Option<String> {
        self.proxy_tags
            .iter()
            .find_map(|tag| tag.matches(content, self.keep_proxy))
    }

    /// The name messages are delivered under.
    pub fn proxy_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}
