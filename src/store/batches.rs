// src/store/batches.rs
use crate::domain::dates::format_date;
use crate::domain::{ListingRecord, SectionFilter};
use crate::errors::ServerError;
use chrono::NaiveDate;
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const BATCHES_DIR: &str = "batches";
const DATABASE_DIR: &str = "database";

/// On-disk layout: one JSON file per batch under `batches/`, merged
/// snapshots and spreadsheets under `database/`.
#[derive(Clone, Debug)]
pub struct BatchStore {
    batches_dir: PathBuf,
    database_dir: PathBuf,
}

impl BatchStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            batches_dir: root.join(BATCHES_DIR),
            database_dir: root.join(DATABASE_DIR),
        }
    }

    pub fn batches_dir(&self) -> &Path {
        &self.batches_dir
    }

    pub fn database_dir(&self) -> &Path {
        &self.database_dir
    }

    pub fn ensure_dirs(&self) -> Result<(), ServerError> {
        for dir in [&self.batches_dir, &self.database_dir] {
            fs::create_dir_all(dir).map_err(|e| {
                ServerError::Storage(format!("Failed to create {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }

    /// `{date}-{commission}-{furnished}-{home_type}-{district}`
    pub fn batch_id(date: NaiveDate, filter: &SectionFilter) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            format_date(date),
            filter.commission.as_str(),
            filter.furnished.as_str(),
            filter.home_type.slug(),
            filter.district.name()
        )
    }

    pub fn batch_path(&self, date: NaiveDate, filter: &SectionFilter) -> PathBuf {
        self.batches_dir
            .join(format!("{}.json", Self::batch_id(date, filter)))
    }

    pub fn has_batch(&self, date: NaiveDate, filter: &SectionFilter) -> bool {
        self.batch_path(date, filter).is_file()
    }

    /// Batches are written once; an existing file is never overwritten.
    /// The file only appears under its final name once fully written, so a
    /// failed write leaves the batch missing and it is scraped again.
    pub fn write_batch(
        &self,
        date: NaiveDate,
        filter: &SectionFilter,
        records: &[ListingRecord],
    ) -> Result<PathBuf, ServerError> {
        let path = self.batch_path(date, filter);
        if path.exists() {
            return Err(ServerError::Storage(format!(
                "{} already exists",
                path.display()
            )));
        }

        write_json(&path, records)?;
        Ok(path)
    }

    /// Batch files for one date, sorted by name.
    pub fn batch_files(&self, date: NaiveDate) -> Result<Vec<PathBuf>, ServerError> {
        if !self.batches_dir.is_dir() {
            return Err(ServerError::NoData(format!(
                "{} does not exist",
                self.batches_dir.display()
            )));
        }

        let pattern = date_pattern(date, r"-(yes|no)-.*\.json$")?;
        list_matching(&self.batches_dir, &pattern)
    }

    /// Renames every batch of `from` to the same batch of `to`, leaving
    /// alone any that already exist under the new date.
    pub fn rename_batches(&self, from: NaiveDate, to: NaiveDate) -> Result<usize, ServerError> {
        let from_prefix = format_date(from);
        let to_prefix = format_date(to);

        let mut renamed = 0;
        for path in self.batch_files(from)? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let target = self
                .batches_dir
                .join(name.replacen(&from_prefix, &to_prefix, 1));

            if target.exists() {
                continue;
            }

            fs::rename(&path, &target).map_err(|e| {
                ServerError::Storage(format!("Failed to rename {}: {e}", path.display()))
            })?;
            renamed += 1;
        }

        Ok(renamed)
    }

    pub fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
        self.database_dir
            .join(format!("{}-merged.json", format_date(date)))
    }

    pub fn spreadsheet_path(&self, date: NaiveDate) -> PathBuf {
        self.database_dir
            .join(format!("{}-merged.xlsx", format_date(date)))
    }

    pub fn write_snapshot(
        &self,
        date: NaiveDate,
        records: &[ListingRecord],
    ) -> Result<PathBuf, ServerError> {
        fs::create_dir_all(&self.database_dir).map_err(|e| {
            ServerError::Storage(format!(
                "Failed to create {}: {e}",
                self.database_dir.display()
            ))
        })?;

        let path = self.snapshot_path(date);
        write_json(&path, records)?;
        Ok(path)
    }

    /// Every `dd-mm-yyyy-merged.json` snapshot, sorted by name.
    pub fn snapshot_files(&self) -> Result<Vec<PathBuf>, ServerError> {
        if !self.database_dir.is_dir() {
            return Err(ServerError::NoData(format!(
                "{} does not exist",
                self.database_dir.display()
            )));
        }

        let pattern = Regex::new(r"^\d{2}-\d{2}-\d{4}-merged\.json$")
            .map_err(|e| ServerError::Storage(e.to_string()))?;
        list_matching(&self.database_dir, &pattern)
    }
}

pub fn read_records(path: &Path) -> Result<Vec<ListingRecord>, ServerError> {
    let file = File::open(path)
        .map_err(|e| ServerError::Storage(format!("Failed to open {}: {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| ServerError::Storage(format!("Failed to read {}: {e}", path.display())))
}

/// Writes to `<path>.tmp`, flushes, then renames into place. The temp
/// file is removed on any failure.
fn write_json(path: &Path, records: &[ListingRecord]) -> Result<(), ServerError> {
    let tmp = path.with_extension("json.tmp");

    let result = write_tmp(&tmp, records).and_then(|()| {
        fs::rename(&tmp, path)
            .map_err(|e| ServerError::Storage(format!("Failed to move {}: {e}", tmp.display())))
    });

    if result.is_err() && tmp.is_file() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_tmp(tmp: &Path, records: &[ListingRecord]) -> Result<(), ServerError> {
    let file = File::create(tmp)
        .map_err(|e| ServerError::Storage(format!("Failed to create {}: {e}", tmp.display())))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, records)
        .map_err(|e| ServerError::Storage(format!("Failed to write {}: {e}", tmp.display())))?;
    writer
        .into_inner()
        .map_err(|e| ServerError::Storage(format!("Failed to flush {}: {}", tmp.display(), e.error())))?
        .sync_all()
        .map_err(|e| ServerError::Storage(format!("Failed to sync {}: {e}", tmp.display())))
}

fn date_pattern(date: NaiveDate, suffix: &str) -> Result<Regex, ServerError> {
    let re = format!("^{}{}", regex::escape(&format_date(date)), suffix);
    Regex::new(&re).map_err(|e| ServerError::Storage(format!("{re}: {e}")))
}

fn list_matching(dir: &Path, pattern: &Regex) -> Result<Vec<PathBuf>, ServerError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ServerError::Storage(format!("Failed to list {}: {e}", dir.display())))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ServerError::Storage(e.to_string()))?;
        let name = entry.file_name();
        if name.to_str().is_some_and(|n| pattern.is_match(n)) {
            out.push(entry.path());
        }
    }

    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{District, Flag, HomeType};
    use crate::tests::utils::temp_store;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    fn filter(district: District) -> SectionFilter {
        SectionFilter {
            commission: Flag::No,
            furnished: Flag::Yes,
            home_type: HomeType::Resale,
            district,
        }
    }

    #[test]
    fn batch_id_follows_naming_scheme() {
        assert_eq!(
            BatchStore::batch_id(day(5), &filter(District::MirzoUlugbek)),
            "05-03-2021-no-yes-vtorichnyy-rynok-Mirzo-Ulugbek"
        );
    }

    #[test]
    fn batches_are_write_once() {
        let store = temp_store("write_once");
        let f = filter(District::Sergeli);
        let rec = ListingRecord::new("a");

        assert!(!store.has_batch(day(1), &f));
        store.write_batch(day(1), &f, &[rec.clone()]).unwrap();
        assert!(store.has_batch(day(1), &f));

        let err = store.write_batch(day(1), &f, &[]).unwrap_err();
        assert!(matches!(err, ServerError::Storage(_)));

        let stored = read_records(&store.batch_path(day(1), &f)).unwrap();
        assert_eq!(stored, vec![rec]);
    }

    #[test]
    fn failed_write_leaves_no_batch_behind() {
        let store = temp_store("failed_write");
        let f = filter(District::Yashnobod);
        let path = store.batch_path(day(1), &f);
        let tmp = path.with_extension("json.tmp");

        // A directory in the temp file's place makes the write fail.
        fs::create_dir(&tmp).unwrap();
        let err = store.write_batch(day(1), &f, &[ListingRecord::new("a")]).unwrap_err();
        assert!(matches!(err, ServerError::Storage(_)));
        assert!(!store.has_batch(day(1), &f));

        fs::remove_dir(&tmp).unwrap();
        store.write_batch(day(1), &f, &[ListingRecord::new("a")]).unwrap();
        assert!(store.has_batch(day(1), &f));
        assert!(!tmp.exists());
    }

    #[test]
    fn leftover_temp_file_is_not_a_batch() {
        let store = temp_store("leftover_tmp");
        let f = filter(District::Uchtepa);
        let tmp = store.batch_path(day(1), &f).with_extension("json.tmp");
        fs::write(&tmp, "[{\"link\": \"trunc").unwrap();

        assert!(!store.has_batch(day(1), &f));
        assert!(store.batch_files(day(1)).unwrap().is_empty());

        let rec = ListingRecord::new("a");
        let path = store.write_batch(day(1), &f, &[rec.clone()]).unwrap();
        assert_eq!(read_records(&path).unwrap(), vec![rec]);
    }

    #[test]
    fn batch_files_only_match_their_date() {
        let store = temp_store("by_date");
        store.write_batch(day(1), &filter(District::Sergeli), &[]).unwrap();
        store.write_batch(day(1), &filter(District::Bektemir), &[]).unwrap();
        store.write_batch(day(2), &filter(District::Sergeli), &[]).unwrap();

        assert_eq!(store.batch_files(day(1)).unwrap().len(), 2);
        assert_eq!(store.batch_files(day(2)).unwrap().len(), 1);
        assert!(store.batch_files(day(3)).unwrap().is_empty());
    }

    #[test]
    fn missing_batch_dir_is_no_data() {
        let store = BatchStore::new(std::env::temp_dir().join("housing_scrape_does_not_exist"));
        assert!(matches!(
            store.batch_files(day(1)),
            Err(ServerError::NoData(_))
        ));
    }

    #[test]
    fn rename_skips_existing_targets() {
        let store = temp_store("rename");
        store.write_batch(day(1), &filter(District::Sergeli), &[]).unwrap();
        store.write_batch(day(1), &filter(District::Bektemir), &[]).unwrap();
        store.write_batch(day(2), &filter(District::Bektemir), &[]).unwrap();

        let renamed = store.rename_batches(day(1), day(2)).unwrap();

        assert_eq!(renamed, 1);
        assert!(store.has_batch(day(2), &filter(District::Sergeli)));
        assert!(store.has_batch(day(1), &filter(District::Bektemir)));
    }
}
