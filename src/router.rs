use crate::app::App;
use crate::domain::dates::{format_date, parse_date};
use crate::errors::ServerError;
use crate::responses::{html_response, xlsx_response, ResultResp};
use crate::templates;
use astra::Request;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Read;
use tracing::info;

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    info!(%method, %path, "request");

    let today = App::today();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => html_response(templates::pages::home_page(&format_date(today))),

        ("POST", "/scrape") => {
            let summary = app.scrape_all(today)?;
            html_response(templates::pages::result_page(
                "Scrape finished",
                &[
                    format!("{} batches written", summary.written),
                    format!("{} already existed", summary.skipped),
                    format!("{} failed", summary.failed),
                ],
            ))
        }

        ("POST", "/rename-yesterday") => {
            let renamed = app.rename_yesterday(today)?;
            html_response(templates::pages::result_page(
                "Rename finished",
                &[format!("{renamed} files have been renamed.")],
            ))
        }

        ("POST", "/merge") => {
            let params = parse_params(&mut req)?;
            let date = date_param(&params, today)?;
            let summary = app.merge(date)?;
            html_response(templates::pages::result_page(
                "Merge finished",
                &[
                    format!("Found {} files to merge.", summary.files),
                    format!("{} has been created.", summary.path.display()),
                ],
            ))
        }

        ("GET", "/export") => {
            let params = parse_params(&mut req)?;
            let date = date_param(&params, today)?;
            let export = app.export(date)?;
            xlsx_response(export.workbook, &format!("{}-merged.xlsx", format_date(date)))
        }

        _ => Err(ServerError::NotFound),
    }
}

/// Query string plus, for form posts, the urlencoded body.
fn parse_params(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut map = HashMap::new();

    if let Some(q) = req.uri().query() {
        map.extend(url::form_urlencoded::parse(q.as_bytes()).into_owned());
    }

    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;
    map.extend(url::form_urlencoded::parse(&body).into_owned());

    Ok(map)
}

fn date_param(params: &HashMap<String, String>, today: NaiveDate) -> Result<NaiveDate, ServerError> {
    match params.get("date").map(|d| d.trim()).filter(|d| !d.is_empty()) {
        None => Ok(today),
        Some(raw) => parse_date(raw)
            .ok_or_else(|| ServerError::BadRequest(format!("date must be dd-mm-yyyy, got {raw}"))),
    }
}
