// src/tests/router_tests/merge_tests.rs
use crate::domain::{District, Flag, HomeType, ListingRecord, SectionFilter};
use crate::errors::ServerError;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::tests::utils::temp_app;
use astra::{Body, Request};
use chrono::NaiveDate;
use http::Method;
use std::io::Read;

fn post_form(uri: &str, form: &str) -> Request {
    let mut req = Request::new(Body::from(form.to_string()));
    *req.method_mut() = Method::POST;
    *req.uri_mut() = uri.parse().unwrap();
    req.headers_mut().insert(
        "Content-Type",
        "application/x-www-form-urlencoded".parse().unwrap(),
    );
    req
}

#[test]
fn merge_form_post_merges_that_date() {
    let app = temp_app("merge_route");
    let date = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
    let filter = SectionFilter {
        commission: Flag::No,
        furnished: Flag::No,
        home_type: HomeType::Resale,
        district: District::Yunusobod,
    };
    app.store
        .write_batch(date, &filter, &[ListingRecord::new("a"), ListingRecord::new("b")])
        .unwrap();

    let resp = handle(post_form("/merge", "date=15-03-2021"), &app).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(app.store.snapshot_path(date).is_file());
}

#[test]
fn merge_with_bad_date_is_bad_request() {
    let app = temp_app("merge_bad_date");

    let err = handle(post_form("/merge", "date=2021-03-15"), &app).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
    assert_eq!(error_to_response(err).status(), 400);
}

#[test]
fn merge_without_batches_is_not_found() {
    let app = temp_app("merge_no_batches");

    let err = handle(post_form("/merge?date=01-01-2020", ""), &app).unwrap_err();
    assert!(matches!(err, ServerError::NoData(_)));
    assert_eq!(error_to_response(err).status(), 404);
}

#[test]
fn bad_date_is_escaped_in_error_page() {
    let app = temp_app("merge_escape");

    let err = handle(
        post_form("/merge", "date=%3Cscript%3Ealert(1)%3C%2Fscript%3E"),
        &app,
    )
    .unwrap_err();
    let mut resp = error_to_response(err);
    assert_eq!(resp.status(), 400);

    let mut body = String::new();
    resp.body_mut().reader().read_to_string(&mut body).unwrap();
    assert!(body.contains("&lt;script&gt;"));
    assert!(!body.contains("<script>"));
}

#[test]
fn busy_app_answers_conflict() {
    assert_eq!(error_to_response(ServerError::Busy).status(), 409);
}
