// templates/pages/home.rs

use crate::templates::{action_form, desktop_layout};
use maud::{html, Markup};

/// The four trigger buttons; `today` pre-fills the date inputs.
pub fn home_page(today: &str) -> Markup {
    desktop_layout(
        "Scraping Apartment Prices",
        html! {
            (action_form("Scrape Info", "post", "/scrape", None))
            (action_form("Change Yesterday's Files", "post", "/rename-yesterday", None))
            (action_form("Merge Districts", "post", "/merge", Some(today)))
            (action_form("Make Excel", "get", "/export", Some(today)))
        },
    )
}
