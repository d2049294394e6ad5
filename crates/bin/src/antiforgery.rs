//! Anti-forgery token management for the web interface.
//!
//! Each browser gets an http-only session cookie; the server keeps one
//! token per session and embeds it as a hidden field in every
//! state-changing form. A POST whose token is missing or does not match
//! is rejected before any binding or mutation. Tokens are ephemeral:
//! they are lost on server restart (the next page render issues a fresh
//! one), and entries older than [`TOKEN_TTL`] are evicted whenever a
//! token is issued, so the map stays bounded by recent sessions.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

/// Name of the session cookie carrying the anti-forgery session id.
pub const SESSION_COOKIE: &str = "bookbinder_session";
/// Name of the hidden form field carrying the token.
pub const TOKEN_FIELD: &str = "csrf_token";
/// Tokens older than this are evicted; a form rendered with an evicted
/// token fails verification and must be reloaded.
const TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24);

struct IssuedToken {
    token: String,
    issued_at: Instant,
}

/// In-memory anti-forgery token store, keyed by session id.
#[derive(Clone, Default)]
pub struct AntiForgery {
    tokens: Arc<RwLock<HashMap<String, IssuedToken>>>,
}

impl AntiForgery {
    /// Create a new empty token store
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the token for this client, minting the session cookie and
    /// token as needed. Called when rendering a form.
    pub async fn issue(&self, cookies: &Cookies) -> String {
        let session = match cookies.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => {
                let session = Uuid::new_v4().to_string();
                let mut cookie = Cookie::new(SESSION_COOKIE, session.clone());
                cookie.set_http_only(true);
                cookie.set_path("/");
                cookies.add(cookie);
                session
            }
        };

        let now = Instant::now();
        let mut tokens = self.tokens.write().await;
        evict_expired(&mut tokens, now);

        if let Some(entry) = tokens.get(&session) {
            return entry.token.clone();
        }

        let token = Uuid::new_v4().to_string();
        tokens.insert(
            session,
            IssuedToken {
                token: token.clone(),
                issued_at: now,
            },
        );
        token
    }

    /// Check a submitted token against the requester's session.
    pub async fn verify(&self, cookies: &Cookies, submitted: Option<&str>) -> bool {
        let Some(cookie) = cookies.get(SESSION_COOKIE) else {
            return false;
        };
        let tokens = self.tokens.read().await;
        match (tokens.get(cookie.value()), submitted) {
            (Some(entry), Some(token)) => entry.token == token,
            _ => false,
        }
    }
}

fn evict_expired(tokens: &mut HashMap<String, IssuedToken>, now: Instant) {
    tokens.retain(|_, entry| now.duration_since(entry.issued_at) < TOKEN_TTL);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(token: &str, issued_at: Instant) -> IssuedToken {
        IssuedToken {
            token: token.to_string(),
            issued_at,
        }
    }

    #[test]
    fn test_eviction_drops_only_expired_entries() {
        let start = Instant::now();
        let later = start + TOKEN_TTL + Duration::from_secs(1);

        let mut tokens = HashMap::new();
        tokens.insert("stale".to_string(), entry("a", start));
        tokens.insert("fresh".to_string(), entry("b", later));

        evict_expired(&mut tokens, later);
        assert!(!tokens.contains_key("stale"));
        assert!(tokens.contains_key("fresh"));
    }

    #[test]
    fn test_eviction_keeps_everything_within_ttl() {
        let now = Instant::now();
        let mut tokens = HashMap::new();
        tokens.insert("a".to_string(), entry("a", now));
        tokens.insert("b".to_string(), entry("b", now + Duration::from_secs(5)));

        evict_expired(&mut tokens, now + Duration::from_secs(10));
        assert_eq!(tokens.len(), 2);
    }
}
