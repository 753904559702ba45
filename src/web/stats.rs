use super::AppState;
use super::pages;
use crate::errors::Error;
use crate::fuel_log::FuelStatView;
use crate::logging::*;
use crate::resolver::{self, DATE_FORMAT, ViewerContext};
use crate::storage::FuelLogSource;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/", get(today)).route("/{date}", get(by_date))
}

/// Checks the `yyyy-mm-dd` shape first, then that the day exists.
pub fn parse_date(text: &str) -> std::result::Result<NaiveDate, Error> {
    if !DATE_PATTERN.is_match(text) {
        return Err(Error::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_string()))
}

/// Fetches the log once and resolves `date` for `viewer`.
pub async fn stats_for_day(
    source: &dyn FuelLogSource,
    date: NaiveDate,
    viewer: &ViewerContext,
) -> std::result::Result<Vec<FuelStatView>, Error> {
    let fuel_log = source.fetch().await?.ok_or(Error::SourceNotFound)?;
    resolver::resolve_day(&fuel_log, date, viewer)
        .ok_or_else(|| Error::NoDataForDay(resolver::day_key(date)))
}

async fn today(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let recorded = state.sessions.lookup(&headers);
    let viewer = recorded.clone().unwrap_or_default();
    let date = viewer.today(Utc::now());
    render_day(&state, date, viewer, recorded.is_none()).await
}

async fn by_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    headers: HeaderMap,
) -> Response {
    let log = DEFAULT.new(o!("function" => "by_date"));
    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(err) => {
            info!(log, "rejected date"; "error" => %err);
            return pages::error_response(&err);
        }
    };
    let recorded = state.sessions.lookup(&headers);
    let viewer = recorded.clone().unwrap_or_default();
    render_day(&state, date, viewer, recorded.is_none()).await
}

async fn render_day(
    state: &AppState,
    date: NaiveDate,
    viewer: ViewerContext,
    capture_timezone: bool,
) -> Response {
    let log = DEFAULT.new(o!(
        "function" => "render_day",
        "date" => resolver::day_key(date),
        "timezone" => viewer.label.clone(),
    ));
    match stats_for_day(state.source.as_ref(), date, &viewer).await {
        Ok(views) => {
            info!(log, "rendering"; "rows" => views.len());
            let page = pages::stats_table(&resolver::day_key(date), &viewer, &views, capture_timezone);
            Html(page).into_response()
        }
        Err(err) => {
            warn!(log, "no stats"; "error" => %err);
            let day = resolver::day_key(date);
            let capture = capture_timezone && matches!(err, Error::NoDataForDay(_));
            pages::error_response_for(&err, capture.then_some(day.as_str()))
        }
    }
}
