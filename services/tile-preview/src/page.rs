//! Table description input and the standalone HTML page around it.

use notebook_display::shell::{TEXT_HTML, TEXT_PLAIN};
use notebook_display::tile_html::SOFTWARE;
use notebook_display::{html::escape_html, Column, DataFrame, MimeBundle};
use raster_common::RasterResult;
use serde::Deserialize;

/// JSON table description.
#[derive(Debug, Deserialize)]
pub struct PageInput {
    #[serde(default)]
    pub title: Option<String>,
    pub columns: Vec<Column>,
}

impl PageInput {
    pub fn into_frame(self) -> RasterResult<DataFrame> {
        DataFrame::new(self.columns)
    }
}

/// A complete HTML document showing one display bundle.
pub struct PreviewPage<'a> {
    title: &'a str,
    bundle: &'a MimeBundle,
}

impl<'a> PreviewPage<'a> {
    pub fn new(title: Option<&'a str>, bundle: &'a MimeBundle) -> Self {
        Self {
            title: title.unwrap_or("Tile preview"),
            bundle,
        }
    }

    /// HTML body from `text/html`, or the plain text in a `<pre>` block.
    pub fn render(&self) -> String {
        let body = match self.bundle.get(TEXT_HTML) {
            Some(html) => html.to_string(),
            None => {
                tracing::warn!("No HTML representation, using plain text");
                format!(
                    "<pre>{}</pre>",
                    escape_html(self.bundle.get(TEXT_PLAIN).unwrap_or_default())
                )
            }
        };
        let title = escape_html(self.title);
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"generator\" content=\"{}\">\n<title>{}</title>\n</head>\n<body>\n<h1>{}</h1>\n{}\n</body>\n</html>\n",
            SOFTWARE, title, title, body
        )
    }
}
