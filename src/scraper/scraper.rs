// scraper.rs
use crate::config::Config;
use crate::domain::{ListingRecord, SectionFilter};
use crate::scraper::extract::{fragments, parse_regex, parse_selector, FieldExtractor};
use crate::scraper::ScraperError;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, CONNECTION};
use scraper::{Html, Selector};
use tracing::{debug, error, info};
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:66.0) Gecko/20100101 Firefox/66.0";

/// Anything that can turn a URL into page markup.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScraperError>;
}

/// Source of listings for one search section.
pub trait SectionSource {
    fn scrape_section(&self, filter: &SectionFilter) -> Result<Vec<ListingRecord>, ScraperError>;
}

/// Blocking HTTP fetcher with the fixed browser-like header set.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("*"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ScraperError::Network(format!("HTTP {status} for {url}")));
        }

        Ok(text)
    }
}

/// Reads the USD rate off the central bank's front page.
pub fn fetch_exchange_rate<F: PageFetcher>(fetcher: &F, url: &str) -> Result<f64, ScraperError> {
    let html = fetcher.fetch(url)?;
    let rate = parse_exchange_rate(&html)?;
    info!(rate, "USD exchange rate fetched");
    Ok(rate)
}

pub fn parse_exchange_rate(html: &str) -> Result<f64, ScraperError> {
    let document = Html::parse_document(html);
    let selector = parse_selector("div.exchange__content div.exchange__item_value")?;

    let raw = fragments(&document, &selector)
        .into_iter()
        .next()
        .ok_or(ScraperError::MissingElement("exchange rate"))?;

    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        _ => Err(ScraperError::UnexpectedShape(format!(
            "exchange rate {raw:?}"
        ))),
    }
}

/// Paginates olx.uz apartment-sale sections and extracts every listing.
pub struct OlxScraper<F: PageFetcher> {
    fetcher: F,
    extractor: FieldExtractor,
    base_url: String,
    region: String,
    page_size: usize,
    max_pages: usize,
    count_selector: Selector,
    link_selector: Selector,
    count_pattern: Regex,
}

impl<F: PageFetcher> OlxScraper<F> {
    pub fn new(fetcher: F, cfg: &Config, usd_to_uzs: f64) -> Result<Self, ScraperError> {
        if cfg.page_size == 0 {
            return Err(ScraperError::Config("page size must be > 0".into()));
        }

        Ok(Self {
            fetcher,
            extractor: FieldExtractor::new(usd_to_uzs)?,
            base_url: cfg.base_url.clone(),
            region: cfg.region.clone(),
            page_size: cfg.page_size,
            max_pages: cfg.max_pages,
            count_selector: parse_selector(
                "#offers_table div.dontHasPromoted.section.clr.rel > h2",
            )?,
            link_selector: parse_selector(
                "#offers_table a.marginright5.link.linkWithHash.detailsLink",
            )?,
            count_pattern: parse_regex(r"[0-9]+\s?[0-9]*")?,
        })
    }

    pub fn section_url(&self, filter: &SectionFilter) -> Result<Url, ScraperError> {
        let path = format!(
            "{}/nedvizhimost/kvartiry/prodazha/{}/{}/",
            self.base_url,
            filter.home_type.slug(),
            self.region
        );

        Url::parse_with_params(
            &path,
            &[
                ("search[filter_enum_furnished][0]", filter.furnished.as_str().to_string()),
                ("search[filter_enum_comission][0]", filter.commission.as_str().to_string()),
                ("search[district_id]", filter.district.code().to_string()),
            ],
        )
        .map_err(|e| ScraperError::Config(format!("bad section url {path}: {e}")))
    }

    pub fn page_url(section: &Url, page: usize) -> Url {
        let mut url = section.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }

    /// Number of result pages, capped at what the site will display.
    pub fn page_count(&self, html: &str) -> Result<usize, ScraperError> {
        let document = Html::parse_document(html);
        let header = fragments(&document, &self.count_selector)
            .into_iter()
            .next()
            .ok_or(ScraperError::MissingElement("result count header"))?;

        let token = self
            .count_pattern
            .find(&header)
            .ok_or_else(|| ScraperError::UnexpectedShape(format!("result count {header:?}")))?;

        let digits: String = token
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let count: usize = digits
            .parse()
            .map_err(|e| ScraperError::UnexpectedShape(format!("result count {digits:?}: {e}")))?;

        Ok(count.div_ceil(self.page_size).min(self.max_pages))
    }

    /// Absolute links of every listing on a result page.
    pub fn listing_links(&self, html: &str, page_url: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.link_selector)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| page_url.join(href).ok())
            .map(String::from)
            .collect()
    }

    pub fn scrape_listing(&self, link: &str) -> Result<ListingRecord, ScraperError> {
        let html = self.fetcher.fetch(link)?;
        Ok(self.extractor.extract(link, &html))
    }

    fn scrape_page(
        &self,
        section: &Url,
        page: usize,
        rows: &mut Vec<ListingRecord>,
    ) -> Result<(), ScraperError> {
        let page_url = Self::page_url(section, page);
        let html = self.fetcher.fetch(page_url.as_str())?;
        let links = self.listing_links(&html, &page_url);
        debug!(page, links = links.len(), "result page parsed");

        for link in links {
            match self.scrape_listing(&link) {
                Ok(record) => rows.push(record),
                Err(e) => {
                    error!("{link} could not be analyzed.");
                    error!("{e}");
                }
            }
        }

        Ok(())
    }
}

impl<F: PageFetcher> SectionSource for OlxScraper<F> {
    fn scrape_section(&self, filter: &SectionFilter) -> Result<Vec<ListingRecord>, ScraperError> {
        let section = self.section_url(filter)?;
        let first = self.fetcher.fetch(section.as_str())?;
        let pages = self.page_count(&first)?;
        info!(%filter, pages, "section paginated");

        let mut rows = Vec::new();
        for page in 1..=pages {
            if let Err(e) = self.scrape_page(&section, page, &mut rows) {
                error!(page, "{e}");
            }
        }

        Ok(rows)
    }
}
