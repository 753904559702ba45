use crate::fuel_log::{FuelLog, FuelStatView};
use crate::logging::*;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};


pub const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Time zone of the viewer a request is rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerContext {
    /// Minutes added to UTC to get the viewer's local time.
    pub offset_minutes: i32,
    pub label: String,
}

impl Default for ViewerContext {
    fn default() -> Self {
        Self {
            offset_minutes: 0,
            label: "UTC".to_string(),
        }
    }
}

impl ViewerContext {
    pub fn new(offset_minutes: i32, label: impl Into<String>) -> Self {
        Self {
            offset_minutes,
            label: label.into(),
        }
    }

    /// Calendar day of `now` in the viewer's local time.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        (now.naive_utc() + TimeDelta::minutes(self.offset_minutes.into())).date()
    }
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Time of day from a `"HH:MM:SS TZ"` key. The zone label is ignored.
pub fn parse_time_of_day(key: &str) -> Option<NaiveTime> {
    let time = key.split_whitespace().next()?;
    NaiveTime::parse_from_str(time, TIME_FORMAT).ok()
}

/// Rows of `log` that fall on `target` in the viewer's local time.
///
/// With a zero offset the target day is returned as stored. Otherwise every
/// record of the target day is shifted by the offset and kept if it stays on
/// the target day, then one neighbour is consulted: the previous day for a
/// positive offset, the next day for a negative one. Target-day rows come
/// first, each group in source order.
///
/// Returns `None` when nothing lands on `target`.
pub fn resolve_day(
    log: &FuelLog,
    target: NaiveDate,
    viewer: &ViewerContext,
) -> Option<Vec<FuelStatView>> {
    let logger = DEFAULT.new(o!(
        "function" => "resolve_day",
        "date" => format!("{}", target),
        "offset" => viewer.offset_minutes,
    ));

    let views: Vec<FuelStatView> = if viewer.offset_minutes == 0 {
        log.day(&day_key(target))
            .map(|day| {
                day.iter()
                    .map(|(time, record)| FuelStatView::new(time.as_str(), record))
                    .collect()
            })
            .unwrap_or_default()
    } else {
        let offset = TimeDelta::minutes(viewer.offset_minutes.into());
        let neighbour = if viewer.offset_minutes > 0 {
            target.pred_opt()
        } else {
            target.succ_opt()
        };

        let mut views = shifted_into(log, target, target, offset, &viewer.label, &logger);
        if let Some(neighbour) = neighbour {
            let pulled = shifted_into(log, neighbour, target, offset, &viewer.label, &logger);
            debug!(logger, "pulled rows from neighbour";
                "neighbour" => %neighbour,
                "count" => pulled.len()
            );
            views.extend(pulled);
        }
        views
    };

    debug!(logger, "resolved"; "count" => views.len());
    if views.is_empty() { None } else { Some(views) }
}

fn shifted_into(
    log: &FuelLog,
    source: NaiveDate,
    target: NaiveDate,
    offset: TimeDelta,
    label: &str,
    logger: &Logger,
) -> Vec<FuelStatView> {
    let Some(day) = log.day(&day_key(source)) else {
        return Vec::new();
    };
    day.iter()
        .filter_map(|(key, record)| {
            let Some(time) = parse_time_of_day(key) else {
                warn!(logger, "skipping unparseable time"; "date" => %source, "time" => key);
                return None;
            };
            let shifted = source.and_time(time).checked_add_signed(offset)?;
            if shifted.date() != target {
                return None;
            }
            let display = if label.is_empty() {
                shifted.format(TIME_FORMAT).to_string()
            } else {
                format!("{} {}", shifted.format(TIME_FORMAT), label)
            };
            Some(FuelStatView::new(display, record))
        })
        .collect()
}
