// src/tests/router_tests/export_tests.rs
use crate::domain::ListingRecord;
use crate::router::handle;
use crate::tests::utils::temp_app;
use astra::{Body, Request};
use chrono::NaiveDate;
use http::Method;
use std::io::Read;

#[test]
fn export_returns_xlsx_download() {
    let app = temp_app("export_route");
    let record = ListingRecord {
        link: "https://www.olx.uz/obyavlenie/1.html".into(),
        date: Some("15-03-2021".into()),
        price: Some(60_000.0),
        price_m2: Some(1_000.0),
        area: Some(60),
        num_rooms: Some(2),
        apart_floor: Some(1),
        home_floor: Some(4),
        ..Default::default()
    };
    app.store
        .write_snapshot(NaiveDate::from_ymd_opt(2021, 3, 15).unwrap(), &[record])
        .unwrap();

    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = "/export?date=16-03-2021".parse().unwrap();

    let mut resp = handle(req, &app).unwrap();

    assert_eq!(resp.status(), 200);
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert_eq!(disposition, "attachment; filename=\"16-03-2021-merged.xlsx\"");

    let mut body = Vec::new();
    resp.body_mut().reader().read_to_end(&mut body).unwrap();
    assert!(body.starts_with(b"PK"));
    assert!(app
        .store
        .spreadsheet_path(NaiveDate::from_ymd_opt(2021, 3, 16).unwrap())
        .is_file());
}
