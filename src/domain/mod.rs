pub mod dates;
pub mod filters;
pub mod listing;
pub mod logic;

pub use dates::DateNormalizer;
pub use filters::{District, Flag, HomeType, SectionFilter};
pub use listing::{ListingRecord, SnapshotRow};
