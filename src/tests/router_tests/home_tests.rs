// src/tests/router_tests/home_tests.rs
use crate::router::handle;
use crate::tests::utils::temp_app;
use astra::{Body, Request};
use http::Method;
use std::io::Read;

fn request(method: Method, uri: &str) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = method;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

#[test]
fn home_page_lists_all_triggers() {
    let app = temp_app("home");

    let mut resp = handle(request(Method::GET, "/"), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let mut body = String::new();
    resp.body_mut().reader().read_to_string(&mut body).unwrap();

    for action in ["/scrape", "/rename-yesterday", "/merge", "/export"] {
        assert!(
            body.contains(&format!("action=\"{action}\"")),
            "missing trigger {action}"
        );
    }
}

#[test]
fn unknown_route_is_not_found() {
    let app = temp_app("not_found");
    let err = handle(request(Method::GET, "/nope"), &app).unwrap_err();
    assert!(matches!(err, crate::errors::ServerError::NotFound));
}

#[test]
fn rename_yesterday_reports_count() {
    let app = temp_app("rename_route");

    let mut resp = handle(request(Method::POST, "/rename-yesterday"), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let mut body = String::new();
    resp.body_mut().reader().read_to_string(&mut body).unwrap();
    assert!(body.contains("0 files have been renamed."));
}
