//! HTML rendering for the deck and landing page.

pub mod button;
pub mod render;

pub use button::{Button, ButtonStyle, ButtonVariant};
pub use render::{ViewMode, render_deck_page, render_export_page, render_landing_page};

/// Escape text for interpolation into HTML content or attribute values.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}
