// src/domain/logic.rs

use crate::domain::listing::ListingRecord;
use std::collections::HashSet;

/// Fields that identify the same apartment re-posted across days or sections.
#[derive(Debug, PartialEq, Eq, Hash)]
struct DedupKey {
    price_bits: Option<u64>,
    num_rooms: Option<i64>,
    area: Option<i64>,
    home_type: Option<String>,
    district: Option<String>,
    post_text: Option<String>,
}

impl DedupKey {
    fn of(record: &ListingRecord) -> Self {
        Self {
            price_bits: record.price.map(f64::to_bits),
            num_rooms: record.num_rooms,
            area: record.area,
            home_type: record.home_type.clone(),
            district: record.district.clone(),
            post_text: record.post_text.clone(),
        }
    }
}

/// Keeps the first occurrence of every (price, rooms, area, home type,
/// district, body text) combination, preserving order.
pub fn dedup_records(records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(DedupKey::of(r)))
        .collect()
}

/// Sanity bounds for an apartment sale in Tashkent.
///
/// A record missing any value the bounds look at is not plausible.
pub fn is_plausible(record: &ListingRecord) -> bool {
    let (Some(area), Some(price_m2), Some(floor), Some(floors), Some(rooms)) = (
        record.area,
        record.price_m2,
        record.apart_floor,
        record.home_floor,
        record.num_rooms,
    ) else {
        return false;
    };

    (30..=310).contains(&area) && price_m2 >= 300.0 && floor <= floors && rooms <= 8
}
