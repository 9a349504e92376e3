// extract.rs
//
// Listing page -> ListingRecord. Every field has its own rule and a rule that
// finds nothing just leaves its field empty.

use crate::domain::ListingRecord;
use crate::scraper::ScraperError;
use regex::Regex;
use scraper::{Html, Selector};

/// Local currency unit as printed next to the price.
pub const LOCAL_CURRENCY: &str = "сум";
/// Reference currency unit (USD).
pub const REFERENCE_CURRENCY: &str = "у.е.";

// Listing content column; the site lays every zone out under it.
const CONTENT_ROOT: &str = "#root > div:nth-of-type(1) > div:nth-of-type(3) > \
     div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(2)";

/// Text fragments of one listing page, grouped by the zone they came from.
///
/// Fragments are trimmed and empty ones are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    pub breadcrumbs: Vec<String>,
    pub date: Vec<String>,
    pub title: Vec<String>,
    pub price: Vec<String>,
    pub details: Vec<String>,
    pub content: Vec<String>,
}

struct ZoneSelectors {
    breadcrumbs: Selector,
    date: Selector,
    title: Selector,
    price: Selector,
    details: Selector,
    content: Selector,
}

impl ZoneSelectors {
    fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            breadcrumbs: parse_selector("#root a")?,
            date: parse_selector(&format!("{CONTENT_ROOT} > div:nth-of-type(1) > span > span"))?,
            title: parse_selector(&format!("{CONTENT_ROOT} > div:nth-of-type(2) > h1"))?,
            price: parse_selector(&format!("{CONTENT_ROOT} > div:nth-of-type(3) > h3"))?,
            details: parse_selector(&format!("{CONTENT_ROOT} > ul > li > p"))?,
            content: parse_selector(&format!("{CONTENT_ROOT} > div:nth-of-type(8) > div"))?,
        })
    }

    fn split(&self, html: &str) -> ListingPage {
        let document = Html::parse_document(html);

        ListingPage {
            breadcrumbs: fragments(&document, &self.breadcrumbs),
            date: fragments(&document, &self.date),
            title: fragments(&document, &self.title),
            price: fragments(&document, &self.price),
            details: fragments(&document, &self.details),
            content: fragments(&document, &self.content),
        }
    }
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
}

pub(crate) fn parse_regex(pattern: &str) -> Result<Regex, ScraperError> {
    Regex::new(pattern).map_err(|e| ScraperError::Config(format!("{pattern}: {e}")))
}

/// All non-empty descendant text nodes of every matched element, in order.
pub(crate) fn fragments(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .flat_map(|el| el.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Labeled lines in the attribute list ("Этаж: 5").
struct LabelRules {
    home_type: Regex,
    rooms: Regex,
    area: Regex,
    floor: Regex,
    home_floor: Regex,
    build_type: Regex,
    build_plan: Regex,
    build_year: Regex,
    bathroom: Regex,
    furnished: Regex,
    ceil_height: Regex,
    condition: Regex,
    commission: Regex,
    nearby: Regex,
    district: Regex,
    price_amount: Regex,
    leading_number: Regex,
}

impl LabelRules {
    fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            home_type: parse_regex(r"^Тип жилья: (.*)")?,
            rooms: parse_regex(r"^Количество комнат: (\d+)")?,
            area: parse_regex(r"^Общая площадь: (\d+)")?,
            floor: parse_regex(r"^Этаж: (\d+)")?,
            home_floor: parse_regex(r"^Этажность дома: (\d+)")?,
            build_type: parse_regex(r"^Тип строения: (.*)")?,
            build_plan: parse_regex(r"^Планировка: (.*)")?,
            build_year: parse_regex(r"^Год постройки.*(\d{4})")?,
            bathroom: parse_regex(r"^Санузел: (.*)")?,
            furnished: parse_regex(r"^Меблирована: (.*)")?,
            ceil_height: parse_regex(r"^Высота потолков: (.*)")?,
            condition: parse_regex(r"^Ремонт: (.*)")?,
            commission: parse_regex(r"^Комиссионные: (.*)")?,
            nearby: parse_regex(r"^Рядом есть:")?,
            district: parse_regex(r"^Продажа - (.*) район")?,
            price_amount: parse_regex(r"^\d[\d\s]*(?:[.,]\d+)?")?,
            leading_number: parse_regex(r"^\d+(?:[.,]\d+)?")?,
        })
    }
}

/// Turns raw listing markup into a `ListingRecord`.
pub struct FieldExtractor {
    zones: ZoneSelectors,
    rules: LabelRules,
    usd_to_uzs: f64,
}

impl FieldExtractor {
    pub fn new(usd_to_uzs: f64) -> Result<Self, ScraperError> {
        if !(usd_to_uzs.is_finite() && usd_to_uzs > 0.0) {
            return Err(ScraperError::Config(format!(
                "exchange rate must be positive, got {usd_to_uzs}"
            )));
        }

        Ok(Self {
            zones: ZoneSelectors::new()?,
            rules: LabelRules::new()?,
            usd_to_uzs,
        })
    }

    pub fn extract(&self, link: &str, html: &str) -> ListingRecord {
        self.extract_page(link, &self.zones.split(html))
    }

    pub fn extract_page(&self, link: &str, page: &ListingPage) -> ListingRecord {
        let r = &self.rules;
        let details = &page.details;

        let price = self.price(&page.price);
        let area = labeled_int(details, &r.area);
        let nearby = details
            .iter()
            .find(|line| r.nearby.is_match(line))
            .map(String::as_str)
            .unwrap_or("");

        ListingRecord {
            link: link.to_string(),
            date: page.date.first().cloned(),
            price,
            home_type: labeled(details, &r.home_type),
            district: labeled(&page.breadcrumbs, &r.district),
            price_m2: price_per_area(price, area),
            furnished: labeled(details, &r.furnished).and_then(|v| yes_no(&v)),
            commission: labeled(details, &r.commission).and_then(|v| yes_no(&v)),
            num_rooms: labeled_int(details, &r.rooms),
            area,
            apart_floor: labeled_int(details, &r.floor),
            home_floor: labeled_int(details, &r.home_floor),
            condition: labeled(details, &r.condition),
            build_type: labeled(details, &r.build_type),
            build_plan: labeled(details, &r.build_plan),
            build_year: labeled_int(details, &r.build_year),
            bathroom: labeled(details, &r.bathroom),
            ceil_height: labeled(details, &r.ceil_height)
                .and_then(|v| self.leading_number(&v))
                .map(normalize_ceiling),
            hospital: nearby.contains("Больница"),
            playground: nearby.contains("Детская площадка"),
            kindergarten: nearby.contains("Детский сад"),
            park: nearby.contains("Парк"),
            recreation: nearby.contains("Развлекательные заведения"),
            school: nearby.contains("Школа"),
            restaurant: nearby.contains("Рестораны"),
            supermarket: nearby.contains("Супермаркет"),
            title_text: page.title.first().cloned(),
            post_text: body_text(&page.content),
        }
    }

    /// USD price. The unit is the last fragment of the price block, or the
    /// tail of the only fragment.
    fn price(&self, block: &[String]) -> Option<f64> {
        let first = block.first()?;
        let amount = self.rules.price_amount.find(first)?;

        let value: f64 = amount
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect::<String>()
            .parse()
            .ok()?;

        let unit = if block.len() > 1 {
            block.last()?.as_str()
        } else {
            first[amount.end()..].trim()
        };

        match unit {
            LOCAL_CURRENCY => Some(value / self.usd_to_uzs),
            REFERENCE_CURRENCY => Some(value),
            _ => None,
        }
    }

    fn leading_number(&self, text: &str) -> Option<f64> {
        self.rules
            .leading_number
            .find(text.trim())?
            .as_str()
            .replace(',', ".")
            .parse()
            .ok()
    }
}

/// Capture group 1 of the first line the rule matches.
fn labeled(lines: &[String], rule: &Regex) -> Option<String> {
    lines
        .iter()
        .find_map(|line| rule.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn labeled_int(lines: &[String], rule: &Regex) -> Option<i64> {
    labeled(lines, rule)?.parse().ok()
}

fn yes_no(value: &str) -> Option<bool> {
    match value.trim() {
        "Да" => Some(true),
        "Нет" => Some(false),
        _ => None,
    }
}

pub fn price_per_area(price: Option<f64>, area: Option<i64>) -> Option<f64> {
    match (price, area) {
        (Some(p), Some(a)) if a != 0 => Some(p / a as f64),
        _ => None,
    }
}

/// Sellers type ceiling height in m, dm or cm.
pub fn normalize_ceiling(height: f64) -> f64 {
    if height > 150.0 {
        height / 100.0
    } else if height >= 20.0 {
        height / 10.0
    } else {
        height
    }
}

fn body_text(content: &[String]) -> Option<String> {
    if content.is_empty() {
        return None;
    }

    let joined = content
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(". ");
    Some(joined.replace('\n', ""))
}
