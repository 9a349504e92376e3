use crate::templates::{card, desktop_layout};
use maud::{html, Markup};

pub fn result_page(title: &str, lines: &[String]) -> Markup {
    desktop_layout(
        title,
        card(
            title,
            html! {
                @for line in lines {
                    p { (line) }
                }
                p { a href="/" { "Back" } }
            },
        ),
    )
}
