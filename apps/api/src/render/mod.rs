// Document renderer: pure functions of a document snapshot.
// HTML feeds the PDF export and the browser preview; text is a quick preview.

pub mod handlers;
pub mod html;
pub mod labels;
pub mod text;

use serde::Deserialize;

use crate::models::{Education, Experience, Locale};
use labels::Labels;

pub use html::render_html;
pub use text::render_text;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewFormat {
    #[default]
    Html,
    Text,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub locale: Locale,
}

/// "enero 2020 - Actual" / "enero 2020 - marzo 2022".
pub(crate) fn date_range(entry: &Experience, labels: &Labels) -> String {
    let end = entry.end_date.as_deref().unwrap_or(labels.current);
    format!("{} - {}", entry.start_date, end)
}

/// "Ingeniería en Sistemas (2020)", or just "(2020)" without a field.
pub(crate) fn education_detail(entry: &Education) -> String {
    match &entry.field {
        Some(field) => format!("{field} ({})", entry.graduation_year),
        None => format!("({})", entry.graduation_year),
    }
}
