use serde::{Deserialize, Serialize};

/// One scraped apartment listing, keyed by its source URL.
///
/// Every field but `link` is best-effort: the extractor fills what it can find
/// and leaves the rest as `None`. Amenity flags are presence tests and are
/// therefore plain booleans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub link: String,
    pub date: Option<String>,

    // Price is always in USD once extracted.
    pub price: Option<f64>,
    pub home_type: Option<String>,
    pub district: Option<String>,
    pub price_m2: Option<f64>,
    pub furnished: Option<bool>,
    pub commission: Option<bool>,

    pub num_rooms: Option<i64>,
    pub area: Option<i64>,
    pub apart_floor: Option<i64>,
    pub home_floor: Option<i64>,
    pub condition: Option<String>,
    pub build_type: Option<String>,
    pub build_plan: Option<String>,
    pub build_year: Option<i64>,
    pub bathroom: Option<String>,
    pub ceil_height: Option<f64>,

    // "Рядом есть" block
    #[serde(default)]
    pub hospital: bool,
    #[serde(default)]
    pub playground: bool,
    #[serde(default)]
    pub kindergarten: bool,
    #[serde(default)]
    pub park: bool,
    #[serde(default)]
    pub recreation: bool,
    #[serde(default)]
    pub school: bool,
    #[serde(default)]
    pub restaurant: bool,
    #[serde(default)]
    pub supermarket: bool,

    pub title_text: Option<String>,
    pub post_text: Option<String>,
}

impl ListingRecord {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Default::default()
        }
    }

    /// A row with none of price, rooms, area or floor carries no usable signal.
    pub fn is_noise(&self) -> bool {
        self.price.is_none()
            && self.num_rooms.is_none()
            && self.area.is_none()
            && self.apart_floor.is_none()
    }
}

/// A merged record ready for export, with its date split into parts.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub record: ListingRecord,
    pub day: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl SnapshotRow {
    pub fn from_record(record: ListingRecord) -> Self {
        let mut parts = record
            .date
            .as_deref()
            .map(|d| d.splitn(3, '-').map(str::to_string).collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter();

        let day = parts.next();
        let month = parts.next();
        let year = parts.next();

        Self {
            record,
            day,
            month,
            year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_price_is_not_noise() {
        let mut rec = ListingRecord::new("https://www.olx.uz/obyavlenie/a.html");
        assert!(rec.is_noise());

        rec.price = Some(42_000.0);
        assert!(!rec.is_noise());
    }

    #[test]
    fn snapshot_row_splits_date() {
        let mut rec = ListingRecord::new("x");
        rec.date = Some("05-03-2021".to_string());

        let row = SnapshotRow::from_record(rec);
        assert_eq!(row.day.as_deref(), Some("05"));
        assert_eq!(row.month.as_deref(), Some("03"));
        assert_eq!(row.year.as_deref(), Some("2021"));
    }

    #[test]
    fn missing_amenities_deserialize_as_false() {
        let rec: ListingRecord = serde_json::from_str(r#"{"link":"x","price":10.0}"#).unwrap();
        assert!(!rec.hospital);
        assert!(!rec.supermarket);
        assert_eq!(rec.price, Some(10.0));
    }
}
