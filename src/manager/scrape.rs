// src/manager/scrape.rs
use crate::domain::{DateNormalizer, ListingRecord, SectionFilter};
use crate::errors::ServerError;
use crate::scraper::SectionSource;
use crate::store::BatchStore;
use chrono::NaiveDate;
use tracing::{error, info};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Walks every search section for one day and persists a batch per section.
pub struct SnapshotManager<S: SectionSource> {
    store: BatchStore,
    source: S,
    today: NaiveDate,
    dates: DateNormalizer,
}

impl<S: SectionSource> SnapshotManager<S> {
    pub fn new(store: BatchStore, source: S, today: NaiveDate) -> Result<Self, ServerError> {
        let dates = DateNormalizer::new(today)
            .map_err(|e| ServerError::Config(format!("date rules: {e}")))?;

        Ok(Self {
            store,
            source,
            today,
            dates,
        })
    }

    /// Scrapes all sections that have no batch yet for today.
    ///
    /// A failing section is logged and counted; only failing to create the
    /// data directories stops the run.
    pub fn scrape_all(&self) -> Result<ScrapeSummary, ServerError> {
        self.store.ensure_dirs()?;

        let mut summary = ScrapeSummary::default();
        for filter in SectionFilter::all() {
            info!("Analyzing {filter}");
            let batch_id = BatchStore::batch_id(self.today, &filter);

            if self.store.has_batch(self.today, &filter) {
                info!("{batch_id} already exists.");
                summary.skipped += 1;
                continue;
            }

            match self.scrape_section(&filter) {
                Ok(rows) => {
                    info!(status = "success", "Number of observations scraped: {rows}.");
                    summary.written += 1;
                }
                Err(e) => {
                    error!("{e}");
                    error!("{batch_id} could not be created.");
                    summary.failed += 1;
                }
            }
        }

        info!(
            written = summary.written,
            skipped = summary.skipped,
            failed = summary.failed,
            "scrape finished"
        );
        Ok(summary)
    }

    fn scrape_section(&self, filter: &SectionFilter) -> Result<usize, ServerError> {
        let rows = self.source.scrape_section(filter)?;
        let rows = self.clean(rows);
        self.store.write_batch(self.today, filter, &rows)?;
        Ok(rows.len())
    }

    /// Normalizes listing dates and drops rows without any core attribute.
    pub fn clean(&self, rows: Vec<ListingRecord>) -> Vec<ListingRecord> {
        rows.into_iter()
            .map(|mut row| {
                row.date = row.date.as_deref().and_then(|d| self.dates.normalize(d));
                row
            })
            .filter(|row| !row.is_noise())
            .collect()
    }
}
