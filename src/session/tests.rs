use super::*;
use axum::http::HeaderValue;

fn with_cookie(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn test_lookup_without_cookie() {
    let store = SessionStore::new();
    assert_eq!(store.lookup(&HeaderMap::new()), None);
}

#[test]
fn test_store_starts_new_session() {
    let store = SessionStore::new();
    let context = ViewerContext::new(60, "Europe/Paris");

    let id = store.store(&HeaderMap::new(), context.clone());
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    let headers = with_cookie(&format!("{SESSION_COOKIE}={id}"));
    assert_eq!(store.lookup(&headers), Some(context));
}

fn cookie_for(id: &str) -> HeaderMap {
    with_cookie(&format!("theme=dark; {SESSION_COOKIE}={id}; lang=en"))
}

#[test]
fn test_store_reuses_issued_session() {
    let store = SessionStore::new();
    let id = store.store(&HeaderMap::new(), ViewerContext::new(60, "CET"));

    let headers = cookie_for(&id);
    let again = store.store(&headers, ViewerContext::new(-300, "EST"));
    assert_eq!(again, id);

    assert_eq!(store.len(), 1);
    assert_eq!(store.lookup(&headers), Some(ViewerContext::new(-300, "EST")));
}

#[test]
fn test_unknown_cookie_id_gets_fresh_id() {
    let store = SessionStore::new();
    let id = store.store(&cookie_for("chosen-by-client"), ViewerContext::default());

    assert_ne!(id, "chosen-by-client");
    assert_eq!(id.len(), 32);
    assert_eq!(store.lookup(&cookie_for("chosen-by-client")), None);
    assert_eq!(store.lookup(&cookie_for(&id)), Some(ViewerContext::default()));
}

#[test]
fn test_unknown_session_has_no_context() {
    let store = SessionStore::new();
    store.store(&HeaderMap::new(), ViewerContext::default());

    assert_eq!(store.lookup(&cookie_for("stranger")), None);
}

#[test]
fn test_capacity_evicts_oldest_session() {
    let store = SessionStore::with_limits(SESSION_TTL, 2);
    let first = store.store(&HeaderMap::new(), ViewerContext::new(1, "A"));
    std::thread::sleep(Duration::from_millis(2));
    let second = store.store(&HeaderMap::new(), ViewerContext::new(2, "B"));
    std::thread::sleep(Duration::from_millis(2));
    let third = store.store(&HeaderMap::new(), ViewerContext::new(3, "C"));

    assert_eq!(store.len(), 2);
    assert_eq!(store.lookup(&cookie_for(&first)), None);
    assert_eq!(store.lookup(&cookie_for(&second)), Some(ViewerContext::new(2, "B")));
    assert_eq!(store.lookup(&cookie_for(&third)), Some(ViewerContext::new(3, "C")));
}

#[test]
fn test_repeated_anonymous_stores_stay_bounded() {
    let store = SessionStore::with_limits(SESSION_TTL, 50);
    for i in 0..500 {
        store.store(&cookie_for(&format!("client-{i}")), ViewerContext::default());
        store.store(&HeaderMap::new(), ViewerContext::default());
    }
    assert_eq!(store.len(), 50);
}

#[test]
fn test_expired_sessions_are_pruned() {
    let store = SessionStore::with_limits(Duration::from_millis(20), MAX_SESSIONS);
    let old = store.store(&HeaderMap::new(), ViewerContext::new(60, "CET"));
    std::thread::sleep(Duration::from_millis(40));

    assert_eq!(store.lookup(&cookie_for(&old)), None);

    // the expired id is not revived
    let renewed = store.store(&cookie_for(&old), ViewerContext::new(-60, "X"));
    assert_ne!(renewed, old);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_empty_cookie_value_is_ignored() {
    let headers = with_cookie(&format!("{SESSION_COOKIE}="));
    assert_eq!(session_id(&headers), None);
}

#[test]
fn test_set_cookie_format() {
    assert_eq!(
        set_cookie("abc"),
        "fuel_stats_session=abc; Path=/; HttpOnly; SameSite=Lax"
    );
}
