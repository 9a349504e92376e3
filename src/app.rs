// src/app.rs
use crate::config::Config;
use crate::errors::ServerError;
use crate::manager::merge::{Export, MergeSummary};
use crate::manager::{self, ScrapeSummary, SnapshotManager};
use crate::scraper::{fetch_exchange_rate, HttpFetcher, OlxScraper};
use crate::store::BatchStore;
use chrono::{Local, NaiveDate};
use std::sync::{Mutex, MutexGuard, TryLockError};
use tracing::info;

/// Shared entry point for the CLI and the HTTP trigger surface.
///
/// Operations run one at a time; the data directory is never touched by two
/// of them at once. A call made while another is running fails with `Busy`.
pub struct App {
    pub config: Config,
    pub store: BatchStore,
    usd_to_uzs: Option<f64>,
    busy: Mutex<()>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let store = BatchStore::new(&config.data_dir);
        Self {
            config,
            store,
            usd_to_uzs: None,
            busy: Mutex::new(()),
        }
    }

    /// Uses the configured rate or fetches it from the central bank.
    pub fn with_exchange_rate(mut self) -> Result<Self, ServerError> {
        let rate = match self.config.usd_to_uzs {
            Some(rate) => {
                info!(rate, "using configured USD exchange rate");
                rate
            }
            None => {
                let fetcher = HttpFetcher::new()?;
                fetch_exchange_rate(&fetcher, &self.config.fx_rate_url)?
            }
        };
        self.usd_to_uzs = Some(rate);
        Ok(self)
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.usd_to_uzs = Some(rate);
        self
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, ServerError> {
        self.busy.try_lock().map_err(|e| match e {
            TryLockError::WouldBlock => ServerError::Busy,
            TryLockError::Poisoned(_) => ServerError::InternalError,
        })
    }

    pub fn scrape_all(&self, today: NaiveDate) -> Result<ScrapeSummary, ServerError> {
        let rate = self
            .usd_to_uzs
            .ok_or_else(|| ServerError::Config("exchange rate not loaded".into()))?;
        let _guard = self.lock()?;

        let scraper = OlxScraper::new(HttpFetcher::new()?, &self.config, rate)?;
        SnapshotManager::new(self.store.clone(), scraper, today)?.scrape_all()
    }

    pub fn rename_yesterday(&self, today: NaiveDate) -> Result<usize, ServerError> {
        let _guard = self.lock()?;
        manager::rename_yesterday(&self.store, today)
    }

    pub fn merge(&self, date: NaiveDate) -> Result<MergeSummary, ServerError> {
        let _guard = self.lock()?;
        manager::merge_batches(&self.store, date)
    }

    pub fn export(&self, date: NaiveDate) -> Result<Export, ServerError> {
        let _guard = self.lock()?;
        manager::export_spreadsheet(&self.store, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::temp_app;

    #[test]
    fn concurrent_operation_is_rejected_as_busy() {
        let app = temp_app("busy");
        let _running = app.lock().unwrap();

        let err = app.merge(App::today()).unwrap_err();
        assert!(matches!(err, ServerError::Busy));
    }

    #[test]
    fn lock_is_released_after_an_operation() {
        let app = temp_app("released");

        assert!(app.merge(App::today()).is_err());
        assert!(app.lock().is_ok());
    }
}
