use crate::app::App;
use crate::config::Config;
use crate::domain::dates::parse_date;
use crate::errors::ServerError;
use crate::responses::error_to_response;
use crate::router::handle;
use astra::Server;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod domain;
mod errors;
mod manager;
mod responses;
mod router;
mod scraper;
mod spreadsheets;
mod store;
mod templates;

#[cfg(test)]
mod tests;

const USAGE: &str = "usage: housing-scrape [serve | scrape | rename-yesterday | merge [dd-mm-yyyy] | export [dd-mm-yyyy]]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("housing_scrape=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), ServerError> {
    let config = Config::from_env()?;
    let app = App::new(config);
    app.store.ensure_dirs()?;

    let command = args.first().map(String::as_str).unwrap_or("serve");
    let date = match args.get(1) {
        Some(raw) => parse_date(raw)
            .ok_or_else(|| ServerError::BadRequest(format!("date must be dd-mm-yyyy, got {raw}")))?,
        None => App::today(),
    };

    match command {
        "serve" => serve(app.with_exchange_rate()?),
        "scrape" => {
            let summary = app.with_exchange_rate()?.scrape_all(App::today())?;
            info!(?summary, "scrape done");
            Ok(())
        }
        "rename-yesterday" => {
            app.rename_yesterday(App::today())?;
            Ok(())
        }
        "merge" => {
            let summary = app.merge(date)?;
            info!(files = summary.files, rows = summary.rows, "merge done");
            Ok(())
        }
        "export" => {
            let export = app.export(date)?;
            info!(rows = export.rows, path = %export.path.display(), "export done");
            Ok(())
        }
        _ => Err(ServerError::BadRequest(USAGE.to_string())),
    }
}

fn serve(app: App) -> Result<(), ServerError> {
    let addr = app.config.listen_addr;
    info!("Starting server at http://{addr}");

    let app = Arc::new(app);
    let result = Server::bind(&addr).serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => {
            error!("{err}");
            error_to_response(err)
        }
    });

    if let Err(e) = result {
        error!("Server ended with error: {e}");
        return Err(ServerError::InternalError);
    }

    info!("Server shut down cleanly.");
    Ok(())
}
