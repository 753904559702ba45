use super::AppState;
use super::pages;
use super::stats::parse_date;
use crate::errors::Error;
use crate::logging::*;
use crate::resolver::{self, ViewerContext};
use crate::session;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use serde::Deserialize;
use std::sync::Arc;

const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/timezone", get(capture))
}

#[derive(Debug, Deserialize)]
pub struct TimezoneQuery {
    /// Browser `getTimezoneOffset()`: minutes from local time to UTC.
    pub offset: Option<String>,
    pub tz: Option<String>,
    pub date: Option<String>,
}

impl TimezoneQuery {
    pub fn viewer(&self) -> std::result::Result<ViewerContext, Error> {
        let offset_minutes = match self.offset.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(text) => {
                let browser: i32 = text
                    .parse()
                    .map_err(|_| Error::InvalidOffset(text.to_string()))?;
                if browser.abs() > MAX_OFFSET_MINUTES {
                    return Err(Error::InvalidOffset(text.to_string()));
                }
                -browser
            }
        };
        let label = match self.tz.as_deref().map(str::trim) {
            None | Some("") => ViewerContext::default().label,
            Some(label) => label.to_string(),
        };
        Ok(ViewerContext::new(offset_minutes, label))
    }

    pub fn redirect_target(&self) -> std::result::Result<String, Error> {
        match self.date.as_deref() {
            None | Some("") => Ok("/".to_string()),
            Some(date) => Ok(format!("/{}", resolver::day_key(parse_date(date)?))),
        }
    }
}

async fn capture(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TimezoneQuery>,
) -> Response {
    let log = DEFAULT.new(o!("function" => "capture_timezone"));
    let (viewer, target) = match query.viewer().and_then(|v| Ok((v, query.redirect_target()?))) {
        Ok(pair) => pair,
        Err(err) => {
            info!(log, "rejected time zone"; "error" => %err);
            return pages::error_response(&err);
        }
    };
    info!(log, "client time zone";
        "offset" => viewer.offset_minutes,
        "timezone" => viewer.label.clone()
    );
    let id = state.sessions.store(&headers, viewer);
    debug!(log, "session stored"; "sessions" => state.sessions.len());
    ([(SET_COOKIE, session::set_cookie(&id))], Redirect::to(&target)).into_response()
}
