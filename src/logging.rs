use crate::config;
use once_cell::sync::Lazy;
pub use slog::*;

#[cfg(test)]
mod tests;

/// Outcome of reading `LOG_LEVEL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSetting {
    Level(FilterLevel),
    Invalid(String),
    Unset,
}

impl LevelSetting {
    pub fn parse(value: Option<&str>) -> Self {
        let Some(name) = value.filter(|v| !v.is_empty()) else {
            return LevelSetting::Unset;
        };
        let level = match name {
            "NOTSET" => FilterLevel::Trace,
            "DEBUG" => FilterLevel::Debug,
            "INFO" => FilterLevel::Info,
            "WARN" => FilterLevel::Warning,
            "ERROR" => FilterLevel::Error,
            "CRITICAL" => FilterLevel::Critical,
            _ => return LevelSetting::Invalid(name.to_string()),
        };
        LevelSetting::Level(level)
    }

    fn current() -> Self {
        Self::parse(config::get("LOG_LEVEL").ok().as_deref())
    }
}

fn wrap<D>(drain: D) -> Fuse<slog_async::Async>
where
    D: Drain<Err = Never, Ok = ()> + Send + 'static,
{
    let filtered = match LevelSetting::current() {
        LevelSetting::Level(level) => slog_envlogger::LogBuilder::new(drain)
            .filter(None, level)
            .build(),
        _ => slog_envlogger::new(drain),
    };
    slog_async::Async::new(filtered)
        .chan_size(2 << 12)
        .thread_name("slog-async".into())
        .build()
        .fuse()
}

pub static DEFAULT: Lazy<Logger> = Lazy::new(|| {
    let mk_term = || {
        slog_term::FullFormat::new(slog_term::TermDecorator::new().build())
            .build()
            .fuse()
    };

    let mk_json = || slog_json::Json::default(std::io::stdout()).fuse();

    let format = config::get("RUST_LOG_FORMAT").unwrap_or_default();
    let drain = match format.as_str() {
        "json" => wrap(mk_json()),
        _ => wrap(mk_term()),
    };

    Logger::root(
        drain,
        o!(
            "version" => env!("CARGO_PKG_VERSION"),
        ),
    )
});

/// Reports how `LOG_LEVEL` was interpreted.
pub fn report_level(log: &Logger) {
    match LevelSetting::current() {
        LevelSetting::Level(level) => {
            info!(log, "log level configured"; "level" => ?level)
        }
        LevelSetting::Invalid(name) => error!(
            log,
            "LOG_LEVEL is not a valid level, keeping the default filter"; "LOG_LEVEL" => name
        ),
        LevelSetting::Unset => warn!(log, "LOG_LEVEL not set, using the default filter"),
    }
}
