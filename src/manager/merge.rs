// src/manager/merge.rs
use crate::domain::logic::{dedup_records, is_plausible};
use crate::domain::{ListingRecord, SnapshotRow};
use crate::errors::ServerError;
use crate::spreadsheets::snapshot_workbook;
use crate::store::{read_records, BatchStore};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct MergeSummary {
    pub files: usize,
    pub rows: usize,
    pub path: PathBuf,
}

/// Concatenates every batch of `date` into the `{date}-merged` snapshot.
pub fn merge_batches(store: &BatchStore, date: NaiveDate) -> Result<MergeSummary, ServerError> {
    let files = store.batch_files(date)?;
    if files.is_empty() {
        return Err(ServerError::NoData(format!(
            "no batches in {}",
            store.batches_dir().display()
        )));
    }
    info!("Found {} files to merge.", files.len());

    let mut merged = Vec::new();
    for file in &files {
        merged.extend(read_records(file)?);
    }

    let path = store.write_snapshot(date, &merged)?;
    info!(status = "success", "{} has been created.", path.display());

    Ok(MergeSummary {
        files: files.len(),
        rows: merged.len(),
        path,
    })
}

/// All daily snapshots, de-duplicated and limited to plausible apartments.
pub fn merge_snapshots(store: &BatchStore) -> Result<Vec<SnapshotRow>, ServerError> {
    let files = store.snapshot_files()?;
    if files.is_empty() {
        return Ok(Vec::new());
    }
    info!("Found {} files to merge.", files.len());

    let mut merged: Vec<ListingRecord> = Vec::new();
    for file in &files {
        merged.extend(read_records(file)?);
    }

    Ok(dedup_records(merged)
        .into_iter()
        .filter(is_plausible)
        .map(SnapshotRow::from_record)
        .collect())
}

#[derive(Debug, Clone)]
pub struct Export {
    pub path: PathBuf,
    pub rows: usize,
    pub workbook: Vec<u8>,
}

/// Writes the cross-date snapshot to `{date}-merged.xlsx`.
pub fn export_spreadsheet(store: &BatchStore, date: NaiveDate) -> Result<Export, ServerError> {
    let rows = merge_snapshots(store)?;
    if rows.is_empty() {
        return Err(ServerError::NoData(format!(
            "no merged snapshots in {}",
            store.database_dir().display()
        )));
    }

    let workbook = snapshot_workbook(&rows)?;
    let path = store.spreadsheet_path(date);
    fs::write(&path, &workbook)
        .map_err(|e| ServerError::Storage(format!("Failed to write {}: {e}", path.display())))?;
    info!(status = "success", "{} has been created.", path.display());

    Ok(Export {
        path,
        rows: rows.len(),
        workbook,
    })
}

/// Re-dates yesterday's batches as today's.
pub fn rename_yesterday(store: &BatchStore, today: NaiveDate) -> Result<usize, ServerError> {
    let yesterday = today - chrono::Duration::days(1);
    let renamed = store.rename_batches(yesterday, today)?;
    info!(status = "success", "{renamed} files have been renamed.");
    Ok(renamed)
}
