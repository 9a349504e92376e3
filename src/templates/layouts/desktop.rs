use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style {
                    "body { font-family: system-ui, sans-serif; max-width: 480px; margin: 2rem auto; }"
                    ".action { margin: 0.75rem 0; }"
                    ".btn { width: 100%; padding: 0.6rem; background: #3DC70D; border: 0; font-size: 1rem; }"
                    ".btn:hover { background: #33E6FF; }"
                }
            }
            body {
                header {
                    h3 { a href="/" { "Scraping Apartment Prices" } }
                }
                (content)
            }
        }
    }
}
