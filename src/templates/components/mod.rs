use maud::{html, Markup};

/// A single-button form that triggers one operation.
pub fn action_form(label: &str, method: &str, action: &str, with_date: Option<&str>) -> Markup {
    html! {
        form class="action" method=(method) action=(action) {
            @if let Some(date) = with_date {
                input type="text" name="date" value=(date) placeholder="dd-mm-yyyy";
            }
            button class="btn" type="submit" { (label) }
        }
    }
}

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}
