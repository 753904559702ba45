mod basic;
mod pages;
mod stats;
mod timezone;


use crate::Result;
use crate::logging::*;
use crate::session::SessionStore;
use crate::storage::FuelLogSource;
use axum::Router;
use std::sync::Arc;

pub use stats::{parse_date, stats_for_day};

pub struct AppState {
    pub source: Arc<dyn FuelLogSource>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(source: Arc<dyn FuelLogSource>) -> Arc<Self> {
        Arc::new(Self {
            source,
            sessions: SessionStore::new(),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    add_routes(
        Router::new(),
        &[basic::add_route, timezone::add_route, stats::add_route],
    )
    .with_state(state)
}

pub async fn run(state: Arc<AppState>, port: u16) -> Result<()> {
    let log = DEFAULT.new(o!("function" => "web::run"));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(log, "listening"; "addr" => %listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn add_routes<T>(app: Router<T>, funcs: &[fn(Router<T>) -> Router<T>]) -> Router<T> {
    let mut app = app;
    for func in funcs {
        app = func(app);
    }
    app
}
