// src/config.rs
use crate::errors::ServerError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    /// Root for `batches/` and `database/`.
    pub data_dir: PathBuf,
    pub listen_addr: SocketAddr,
    /// Classifieds site, without trailing slash.
    pub base_url: String,
    pub region: String,
    /// Central bank page that lists the USD rate.
    pub fx_rate_url: String,
    /// Fixed USD→UZS rate; skips the fetch when set.
    pub usd_to_uzs: Option<f64>,
    /// Listings per result page.
    pub page_size: usize,
    /// The site stops paginating after this many pages.
    pub max_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Housing_Scrape"),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            base_url: "https://www.olx.uz".to_string(),
            region: "tashkent".to_string(),
            fx_rate_url: "https://cbu.uz/oz/".to_string(),
            usd_to_uzs: None,
            page_size: 39,
            max_pages: 25,
        }
    }
}

impl Config {
    /// Defaults overridden by `HOUSING_*` environment variables.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(dir) = lookup("HOUSING_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(addr) = lookup("HOUSING_LISTEN_ADDR") {
            cfg.listen_addr = parse_var("HOUSING_LISTEN_ADDR", &addr)?;
        }
        if let Some(url) = lookup("HOUSING_BASE_URL") {
            cfg.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(region) = lookup("HOUSING_REGION") {
            cfg.region = region;
        }
        if let Some(url) = lookup("HOUSING_FX_URL") {
            cfg.fx_rate_url = url;
        }
        if let Some(rate) = lookup("HOUSING_USD_TO_UZS") {
            let rate: f64 = parse_var("HOUSING_USD_TO_UZS", &rate)?;
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ServerError::Config(format!(
                    "HOUSING_USD_TO_UZS must be positive, got {rate}"
                )));
            }
            cfg.usd_to_uzs = Some(rate);
        }
        if let Some(size) = lookup("HOUSING_PAGE_SIZE") {
            cfg.page_size = parse_var("HOUSING_PAGE_SIZE", &size)?;
            if cfg.page_size == 0 {
                return Err(ServerError::Config("HOUSING_PAGE_SIZE must be > 0".into()));
            }
        }
        if let Some(pages) = lookup("HOUSING_MAX_PAGES") {
            cfg.max_pages = parse_var("HOUSING_MAX_PAGES", &pages)?;
        }

        Ok(cfg)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ServerError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ServerError::Config(format!("{key}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.page_size, 39);
        assert_eq!(cfg.max_pages, 25);
        assert_eq!(cfg.usd_to_uzs, None);
        assert_eq!(cfg.base_url, "https://www.olx.uz");
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("HOUSING_DATA_DIR", "/tmp/housing"),
            ("HOUSING_BASE_URL", "http://localhost:8080/"),
            ("HOUSING_USD_TO_UZS", "12500"),
            ("HOUSING_MAX_PAGES", "3"),
        ]))
        .unwrap();

        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/housing"));
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.usd_to_uzs, Some(12500.0));
        assert_eq!(cfg.max_pages, 3);
    }

    #[test]
    fn bad_values_are_config_errors() {
        let err = Config::from_lookup(lookup_from(&[("HOUSING_PAGE_SIZE", "many")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("HOUSING_USD_TO_UZS", "-1")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
