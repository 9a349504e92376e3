pub mod merge;
pub mod scrape;

pub use merge::{export_spreadsheet, merge_batches, merge_snapshots, rename_yesterday};
pub use scrape::{ScrapeSummary, SnapshotManager};
