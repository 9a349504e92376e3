// src/domain/dates.rs

use chrono::{Duration, NaiveDate};
use regex::Regex;

/// Storage date format for batches, snapshots and normalized listing dates.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

const MONTHS: [(&str, &str); 12] = [
    (" января ", "-01-"),
    (" февраля ", "-02-"),
    (" марта ", "-03-"),
    (" апреля ", "-04-"),
    (" мая ", "-05-"),
    (" июня ", "-06-"),
    (" июля ", "-07-"),
    (" августа ", "-08-"),
    (" сентября ", "-09-"),
    (" октября ", "-10-"),
    (" ноября ", "-11-"),
    (" декабря ", "-12-"),
];

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Rewrites the site's date phrasings ("15 марта 2021 г.", "Сегодня 12:30",
/// "Вчера 23:10") into `dd-mm-yyyy`.
///
/// Rules run in order over the output of the previous rule.
pub struct DateNormalizer {
    rules: Vec<(Regex, String)>,
    normalized: Regex,
}

impl DateNormalizer {
    pub fn new(today: NaiveDate) -> Result<Self, regex::Error> {
        let yesterday = today - Duration::days(1);

        let mut rules = Vec::with_capacity(MONTHS.len() + 4);
        rules.push((literal(" г.")?, String::new()));
        for (month, number) in MONTHS {
            rules.push((literal(month)?, number.to_string()));
        }
        rules.push((pattern(r"^Сегодня.*")?, format_date(today)));
        rules.push((pattern(r"^Вчера.*")?, format_date(yesterday)));
        // "5-03-2021" -> "05-03-2021"
        rules.push((pattern(r"^(\d)-(\d{2})-")?, "0${1}-${2}-".to_string()));

        Ok(Self {
            rules,
            normalized: pattern(r"^\d{2}-\d{2}-\d{4}$")?,
        })
    }

    /// Returns `None` when the text does not end up as a `dd-mm-yyyy` date.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let mut value = raw.trim().to_string();
        for (re, replacement) in &self.rules {
            value = re.replace_all(&value, replacement.as_str()).into_owned();
        }

        let value = value.trim();
        self.normalized.is_match(value).then(|| value.to_string())
    }
}

fn literal(text: &str) -> Result<Regex, regex::Error> {
    pattern(&regex::escape(text))
}

fn pattern(re: &str) -> Result<Regex, regex::Error> {
    Regex::new(re)
}
