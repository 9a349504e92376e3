use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ScraperError {
    Network(String),
    HtmlParse(String),
    MissingElement(&'static str),
    UnexpectedShape(String),
    Config(String),
}

impl fmt::Display for ScraperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScraperError::Network(msg) => write!(f, "Network error: {msg}"),
            ScraperError::HtmlParse(msg) => write!(f, "HTML parse error: {msg}"),
            ScraperError::MissingElement(what) => write!(f, "{what} not found"),
            ScraperError::UnexpectedShape(msg) => write!(f, "Unexpected data shape: {msg}"),
            ScraperError::Config(msg) => write!(f, "Scraper config error: {msg}"),
        }
    }
}

impl Error for ScraperError {}
