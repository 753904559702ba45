use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Fuel stats file not found")]
    SourceNotFound,
    #[error("Unable to find fuel stats for the day {0}")]
    NoDataForDay(String),
    #[error("Date supplied \"{0}\" is not of the format yyyy-mm-dd")]
    InvalidDate(String),
    #[error("Time zone offset \"{0}\" is not a number of minutes")]
    InvalidOffset(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Storage(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Storage(e.to_string())
    }
}
