use crate::resolver::ViewerContext;
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[cfg(test)]
mod tests;

pub const SESSION_COOKIE: &str = "fuel_stats_session";
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Entry {
    context: ViewerContext,
    stored_at: Instant,
}

/// Server-side time zone of each viewer, keyed by the session cookie.
///
/// Entries expire `ttl` after they were last stored, and the store never
/// holds more than `capacity` of them.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(SESSION_TTL, MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Context recorded for the session named in `headers`, if any.
    pub fn lookup(&self, headers: &HeaderMap) -> Option<ViewerContext> {
        let id = session_id(headers)?;
        let sessions = self.sessions.lock().ok()?;
        sessions
            .get(id)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.context.clone())
    }

    /// Records `context` under the session of `headers`. Only ids this store
    /// issued and still holds are reused; anything else gets a fresh id.
    /// Returns the session id.
    pub fn store(&self, headers: &HeaderMap, context: ViewerContext) -> String {
        let Ok(mut sessions) = self.sessions.lock() else {
            return new_session_id();
        };
        let now = Instant::now();
        sessions.retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);

        let known = session_id(headers)
            .filter(|id| sessions.contains_key(*id))
            .map(str::to_string);
        let id = match known {
            Some(id) => id,
            None => {
                while sessions.len() >= self.capacity {
                    let Some(oldest) = sessions
                        .iter()
                        .min_by_key(|(_, entry)| entry.stored_at)
                        .map(|(id, _)| id.clone())
                    else {
                        break;
                    };
                    sessions.remove(&oldest);
                }
                new_session_id()
            }
        };
        sessions.insert(
            id.clone(),
            Entry {
                context,
                stored_at: now,
            },
        );
        id
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or_default()
    }
}

pub fn set_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn new_session_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}
