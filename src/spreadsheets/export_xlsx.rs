use crate::domain::SnapshotRow;
use crate::errors::ServerError;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

const HEADERS: [&str; 31] = [
    "link",
    "date",
    "price",
    "home_type",
    "district",
    "price_m2",
    "furnished",
    "commission",
    "num_rooms",
    "area",
    "apart_floor",
    "home_floor",
    "condition",
    "build_type",
    "build_plan",
    "build_year",
    "bathroom",
    "ceil_height",
    "hospital",
    "playground",
    "kindergarten",
    "park",
    "recreation",
    "school",
    "restaurant",
    "supermarket",
    "title_text",
    "post_text",
    "day",
    "month",
    "year",
];

/// Renders merged snapshot rows into an xlsx file held in memory.
pub fn snapshot_workbook(rows: &[SnapshotRow]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        write_row(worksheet, r, row).map_err(|e| {
            ServerError::XlsxError(format!("Failed to write {}: {}", row.record.link, e))
        })?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

fn write_row(ws: &mut Worksheet, r: u32, row: &SnapshotRow) -> Result<(), XlsxError> {
    let rec = &row.record;

    ws.write_string(r, 0, &rec.link)?;
    text(ws, r, 1, rec.date.as_deref())?;
    number(ws, r, 2, rec.price)?;
    text(ws, r, 3, rec.home_type.as_deref())?;
    text(ws, r, 4, rec.district.as_deref())?;
    number(ws, r, 5, rec.price_m2)?;
    flag(ws, r, 6, rec.furnished)?;
    flag(ws, r, 7, rec.commission)?;
    number(ws, r, 8, rec.num_rooms.map(|v| v as f64))?;
    number(ws, r, 9, rec.area.map(|v| v as f64))?;
    number(ws, r, 10, rec.apart_floor.map(|v| v as f64))?;
    number(ws, r, 11, rec.home_floor.map(|v| v as f64))?;
    text(ws, r, 12, rec.condition.as_deref())?;
    text(ws, r, 13, rec.build_type.as_deref())?;
    text(ws, r, 14, rec.build_plan.as_deref())?;
    number(ws, r, 15, rec.build_year.map(|v| v as f64))?;
    text(ws, r, 16, rec.bathroom.as_deref())?;
    number(ws, r, 17, rec.ceil_height)?;

    let amenities = [
        rec.hospital,
        rec.playground,
        rec.kindergarten,
        rec.park,
        rec.recreation,
        rec.school,
        rec.restaurant,
        rec.supermarket,
    ];
    for (offset, present) in amenities.into_iter().enumerate() {
        ws.write_boolean(r, 18 + offset as u16, present)?;
    }

    text(ws, r, 26, rec.title_text.as_deref())?;
    text(ws, r, 27, rec.post_text.as_deref())?;
    text(ws, r, 28, row.day.as_deref())?;
    text(ws, r, 29, row.month.as_deref())?;
    text(ws, r, 30, row.year.as_deref())?;

    Ok(())
}

// Missing values stay as empty cells.

fn text(ws: &mut Worksheet, r: u32, c: u16, v: Option<&str>) -> Result<(), XlsxError> {
    if let Some(v) = v {
        ws.write_string(r, c, v)?;
    }
    Ok(())
}

fn number(ws: &mut Worksheet, r: u32, c: u16, v: Option<f64>) -> Result<(), XlsxError> {
    if let Some(v) = v {
        ws.write_number(r, c, v)?;
    }
    Ok(())
}

fn flag(ws: &mut Worksheet, r: u32, c: u16, v: Option<bool>) -> Result<(), XlsxError> {
    if let Some(v) = v {
        ws.write_boolean(r, c, v)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingRecord;

    #[test]
    fn workbook_is_a_zip_archive() {
        let mut rec = ListingRecord::new("https://www.olx.uz/obyavlenie/1.html");
        rec.price = Some(50_000.0);
        rec.date = Some("16-03-2021".into());
        rec.park = true;

        let buffer = snapshot_workbook(&[SnapshotRow::from_record(rec)]).unwrap();
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn empty_snapshot_still_has_headers() {
        let buffer = snapshot_workbook(&[]).unwrap();
        assert!(!buffer.is_empty());
    }
}
