//! Author avatar URLs
//!
//! Builds avatar image URLs for commit authors from their email, either
//! from Gravatar or from GitHub. Results are memoized in an [`AvatarCache`]
//! owned by whoever renders the commits.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Pixel size requested from the avatar service
const AVATAR_SIZE: u32 = 20;

/// Characters `encodeURIComponent` leaves alone
const EMAIL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Service avatars are fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarSource {
    #[default]
    Gravatar,
    Github,
}

impl AvatarSource {
    /// Source matching a remote's hosting service, else `fallback`
    pub fn for_host(host: Option<&str>, fallback: AvatarSource) -> Self {
        match host {
            Some("github") => AvatarSource::Github,
            _ => fallback,
        }
    }

    /// Avatar URL for `email`
    pub fn url(self, email: &str) -> String {
        match self {
            AvatarSource::Gravatar => {
                let hash = md5::compute(email.as_bytes());
                format!("https://www.gravatar.com/avatar/{:x}?s={}", hash, AVATAR_SIZE)
            }
            AvatarSource::Github => match github_user_id(email) {
                Some(id) => format!("https://avatars.githubusercontent.com/u/{}?s={}", id, AVATAR_SIZE),
                None => format!(
                    "https://avatars.githubusercontent.com/u/e?email={}&s={}",
                    utf8_percent_encode(email, EMAIL_ENCODE_SET),
                    AVATAR_SIZE
                ),
            },
        }
    }
}

/// Numeric user id of a `<id>+<login>@users.noreply.github.com` address
fn github_user_id(email: &str) -> Option<&str> {
    let local = email.strip_suffix("@users.noreply.github.com")?;
    let (id, login) = local.split_once('+')?;

    if id.is_empty() || login.is_empty() || login.contains('@') || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(id)
}

/// Memoized avatar URLs keyed by source and email
#[derive(Debug, Default)]
pub struct AvatarCache {
    urls: HashMap<(AvatarSource, String), String>,
}

impl AvatarCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Avatar URL for `email`, computed once per source
    pub fn url(&mut self, email: &str, source: AvatarSource) -> &str {
        self.urls
            .entry((source, email.to_string()))
            .or_insert_with(|| source.url(email))
    }
}
