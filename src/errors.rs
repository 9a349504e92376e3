use crate::scraper::ScraperError;
use astra::Response;
// errors.rs
use std::fmt;

/// Errors originating from the storage and snapshot layers, configuration,
/// or the HTTP surface. Scraping failures are wrapped as `Scrape`.
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    /// Nothing on disk to merge or export.
    NoData(String),
    Storage(String),
    XlsxError(String),
    Scrape(ScraperError),
    Config(String),
    /// Another operation holds the data directory.
    Busy,
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::NoData(msg) => write!(f, "No data: {msg}"),
            ServerError::Storage(msg) => write!(f, "Storage Error: {msg}"),
            ServerError::XlsxError(msg) => write!(f, "Spreadsheet Error: {msg}"),
            ServerError::Scrape(err) => write!(f, "Scrape Error: {err}"),
            ServerError::Config(msg) => write!(f, "Config Error: {msg}"),
            ServerError::Busy => write!(f, "Another operation is running"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<ScraperError> for ServerError {
    fn from(err: ScraperError) -> Self {
        ServerError::Scrape(err)
    }
}
