use crate::app::App;
use crate::config::Config;
use crate::domain::{ListingRecord, SectionFilter};
use crate::scraper::{PageFetcher, ScraperError, SectionSource};
use crate::store::BatchStore;
use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fresh, empty data directory under the system temp dir.
pub fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "housing_scrape_{label}_{}_{nanos}",
        std::process::id()
    ))
}

/// A store rooted in a fresh temp dir, with its directories created.
pub fn temp_store(label: &str) -> BatchStore {
    let store = BatchStore::new(temp_dir(label));
    store.ensure_dirs().expect("Failed to create test store");
    store
}

/// App over a fresh temp dir with a fixed exchange rate.
pub fn temp_app(label: &str) -> App {
    let config = Config {
        data_dir: temp_dir(label),
        usd_to_uzs: Some(12500.0),
        ..Config::default()
    };
    let app = App::new(config).with_rate(12500.0);
    app.store.ensure_dirs().expect("Failed to create test store");
    app
}

/// Serves canned pages by exact URL; anything else is a 404.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn with(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScraperError::Network(format!("HTTP 404 Not Found for {url}")))
    }
}

/// Section source that returns one priced row and one noise row per call.
#[derive(Default)]
pub struct StubSource {
    calls: Cell<usize>,
    fail_every: Option<usize>,
}

impl StubSource {
    /// Fails calls 0, n, 2n, ...
    pub fn failing_every(mut self, n: usize) -> Self {
        self.fail_every = Some(n);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl SectionSource for StubSource {
    fn scrape_section(&self, filter: &SectionFilter) -> Result<Vec<ListingRecord>, ScraperError> {
        let call = self.calls.get();
        self.calls.set(call + 1);

        if self.fail_every.is_some_and(|n| call % n == 0) {
            return Err(ScraperError::MissingElement("result count header"));
        }

        let mut priced = ListingRecord::new(format!(
            "https://www.olx.uz/obyavlenie/{}-{}.html",
            filter.district.code(),
            call
        ));
        priced.price = Some(30_000.0);
        priced.date = Some("Вчера 10:00".into());

        Ok(vec![priced, ListingRecord::new("https://www.olx.uz/obyavlenie/empty.html")])
    }
}

/// Search result page with a count header and listing links.
pub fn result_page_fixture(count_header: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| {
            format!(r#"<div class="offer"><a class="marginright5 link linkWithHash detailsLink" href="{l}">Квартира</a></div>"#)
        })
        .collect();

    format!(
        r#"<html><body><div id="offers_table">
             <div class="dontHasPromoted section clr rel"><h2>{count_header}</h2></div>
             {anchors}
           </div></body></html>"#
    )
}

/// Minimal listing page with a price block and an attribute list.
pub fn listing_fixture(amount: &str, unit: &str, details: &[&str]) -> String {
    let items: String = details
        .iter()
        .map(|d| format!("<li><p>{d}</p></li>"))
        .collect();

    format!(
        r#"<html><body><div id="root"><div>
             <div></div><div></div>
             <div><div></div><div><div><div></div><div>
               <div><span><span>Сегодня 10:15</span></span></div>
               <div><h1>Квартира</h1></div>
               <div><h3>{amount} <span>{unit}</span></h3></div>
               <ul>{items}</ul>
             </div></div></div></div>
           </div></div></body></html>"#
    )
}
