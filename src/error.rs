//! Error types and the exit codes they map to.

use thiserror::Error;

/// Exit code for a successful run.
pub const EXIT_OK: u8 = 0;
/// Bad command line.
pub const EXIT_USAGE: u8 = 1;
/// Browser failure, missing page element or unusable countdown.
pub const EXIT_EXTRACTION: u8 = 2;
/// The chat completion call failed.
pub const EXIT_API: u8 = 3;
/// The chat completion answered with something we cannot use.
pub const EXIT_MALFORMED: u8 = 4;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("webdriver: {0}")]
    Driver(#[from] thirtyfour::error::WebDriverError),
    #[error("could not start chromedriver at {path}: {source}")]
    SpawnDriver {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid css selector {0:?}")]
    Selector(String),
    #[error("no timeline found on the page")]
    NoTimeline,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("no countdown found on the page")]
    MissingCountdown,
    #[error("countdown {0:?} is not in HH:MM:SS form")]
    BadCountdown(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("environment variable {0} is not set")]
    MissingKey(&'static str),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("malformed api output: {0}")]
    Malformed(String),
    #[error("could not write csv: {0}")]
    Csv(#[from] csv::Error),
}

impl From<thirtyfour::error::WebDriverError> for Error {
    fn from(e: thirtyfour::error::WebDriverError) -> Self {
        Error::Extract(ExtractError::Driver(e))
    }
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(_) => EXIT_USAGE,
            Error::Extract(_) | Error::Convert(_) | Error::Csv(_) => EXIT_EXTRACTION,
            Error::Api(_) => EXIT_API,
            Error::Malformed(_) => EXIT_MALFORMED,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_failure_class() {
        assert_eq!(Error::Usage("x".into()).exit_code(), EXIT_USAGE);
        assert_eq!(
            Error::Extract(ExtractError::NoTimeline).exit_code(),
            EXIT_EXTRACTION
        );
        assert_eq!(
            Error::Convert(ConvertError::MissingCountdown).exit_code(),
            EXIT_EXTRACTION
        );
        assert_eq!(
            Error::Api(ApiError::MissingKey("OPENAI_API_KEY")).exit_code(),
            EXIT_API
        );
        assert_eq!(Error::Malformed("empty".into()).exit_code(), EXIT_MALFORMED);
    }
}
