use crate::errors::Error;
use crate::fuel_log::FuelStatView;
use crate::resolver::ViewerContext;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::fmt::Write;

const TITLE: &str = "Fuel Statistics";
const DATE_HINT: &str =
    "You can check stats based on date by using the url endpoint \"/yyyy-mm-dd\".";

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #999; padding: 0.3em 0.8em; text-align: right; }}
td.low {{ background: #c8f7c5; font-weight: bold; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Posts the browser's offset and zone name once per browser session.
fn timezone_script(date: &str) -> String {
    format!(
        r#"<script>
if (!window.sessionStorage.getItem("tzSent")) {{
  window.sessionStorage.setItem("tzSent", "1");
  var zone = Intl.DateTimeFormat().resolvedOptions().timeZone || "UTC";
  window.location.replace("/timezone?offset=" + new Date().getTimezoneOffset()
    + "&tz=" + encodeURIComponent(zone) + "&date={date}");
}}
</script>
"#,
        date = escape(date),
    )
}

fn price_cell(price: i64, low: bool) -> String {
    if low {
        format!(r#"<td class="low">{price}</td>"#)
    } else {
        format!("<td>{price}</td>")
    }
}

pub fn stats_table(
    date: &str,
    viewer: &ViewerContext,
    views: &[FuelStatView],
    capture_timezone: bool,
) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>{TITLE}</h1>\n<p>{} ({})</p>",
        escape(date),
        escape(&viewer.label)
    );
    body.push_str("<table>\n<tr><th>Time</th><th>Fuel</th><th>CO2</th></tr>\n");
    for view in views {
        let _ = writeln!(
            body,
            "<tr><td>{}</td>{}{}</tr>",
            escape(&view.display_time),
            price_cell(view.fuel_price, view.fuel_low),
            price_cell(view.co2_price, view.co2_low),
        );
    }
    body.push_str("</table>\n");
    if capture_timezone {
        body.push_str(&timezone_script(date));
    }
    layout(TITLE, &body)
}

pub fn status_of(err: &Error) -> StatusCode {
    match err {
        Error::SourceNotFound | Error::NoDataForDay(_) => StatusCode::NOT_FOUND,
        Error::InvalidDate(_) | Error::InvalidOffset(_) => StatusCode::BAD_REQUEST,
        Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error page; `capture_date` adds the time zone script for viewers without
/// a session.
pub fn error_page(err: &Error, capture_date: Option<&str>) -> String {
    let detail = match err {
        Error::SourceNotFound | Error::Storage(_) => "Please try again later.",
        Error::NoDataForDay(_) | Error::InvalidDate(_) => DATE_HINT,
        Error::InvalidOffset(_) => "Reload the page to send your time zone again.",
    };
    let mut body = format!(
        "<h1>Ooops!</h1>\n<p>{}.</p>\n<p>{}</p>\n",
        escape(&err.to_string()),
        escape(detail)
    );
    if let Some(date) = capture_date {
        body.push_str(&timezone_script(date));
    }
    layout("Error", &body)
}

pub fn error_response(err: &Error) -> Response {
    error_response_for(err, None)
}

pub fn error_response_for(err: &Error, capture_date: Option<&str>) -> Response {
    (status_of(err), Html(error_page(err, capture_date))).into_response()
}
