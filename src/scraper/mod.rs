mod extract;
mod scraper;
mod scraper_error;

pub use scraper::{
    fetch_exchange_rate, HttpFetcher, OlxScraper, PageFetcher, SectionSource,
};
pub use scraper_error::ScraperError;
