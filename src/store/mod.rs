pub mod batches;

pub use batches::{read_records, BatchStore};
