//! HTML table writer for [`DataFrame`].
//!
//! Produces the layout notebooks expect from a dataframe:
//!
//! ```text
//! <div><style scoped>...</style>          (notebook mode only)
//! <table border="1" class="dataframe">
//!   <thead> index header + column names </thead>
//!   <tbody> one row per record, "..." rows/columns where elided </tbody>
//! </table>
//! <p>N rows × M columns</p>               (per `show_dimensions`)
//! </div>
//! ```
//!
//! Each cell goes through: column formatter (or the value's repr), width
//! truncation, then either link rendering or HTML escaping.

use crate::frame::{DataFrame, Value};
use crate::options::{DisplayOptions, ShowDimensions};
use raster_common::RasterResult;
use std::collections::HashMap;

/// Renders one cell of a column to HTML/text.
pub type CellFormatter<'a> = Box<dyn Fn(&Value) -> RasterResult<String> + 'a>;

const ELLIPSIS: &str = "...";

const NOTEBOOK_STYLE: &str = r#"<style scoped>
    .dataframe tbody tr th:only-of-type {
        vertical-align: middle;
    }

    .dataframe tbody tr th {
        vertical-align: top;
    }

    .dataframe thead th {
        text-align: right;
    }
</style>
"#;

const URL_SCHEMES: [&str; 5] = ["http://", "https://", "ftp://", "file://", "mailto:"];

/// Options for [`to_html`].
pub struct HtmlOptions<'a> {
    /// Escape `&`, `<` and `>` in cell text and headers
    pub escape: bool,
    /// Turn cells that are exactly one URL into links
    pub render_links: bool,
    /// Wrap the table in a `<div>` with a scoped style block
    pub notebook: bool,
    pub max_rows: Option<usize>,
    pub max_cols: Option<usize>,
    pub max_colwidth: Option<usize>,
    pub show_dimensions: ShowDimensions,
    pub border: u32,
    pub classes: Vec<String>,
    /// Per-column cell formatters by column name
    pub formatters: HashMap<String, CellFormatter<'a>>,
}

impl Default for HtmlOptions<'_> {
    fn default() -> Self {
        Self {
            escape: true,
            render_links: false,
            notebook: false,
            max_rows: None,
            max_cols: None,
            max_colwidth: None,
            show_dimensions: ShowDimensions::Never,
            border: 1,
            classes: Vec::new(),
            formatters: HashMap::new(),
        }
    }
}

impl<'a> HtmlOptions<'a> {
    /// Limits taken from the display options.
    pub fn from_display(options: &DisplayOptions) -> Self {
        Self {
            max_rows: options.max_rows,
            max_cols: options.max_columns,
            max_colwidth: options.max_colwidth,
            show_dimensions: options.show_dimensions,
            ..Self::default()
        }
    }

    pub fn with_formatter(
        mut self,
        column: impl Into<String>,
        formatter: impl Fn(&Value) -> RasterResult<String> + 'a,
    ) -> Self {
        self.formatters.insert(column.into(), Box::new(formatter));
        self
    }
}

impl std::fmt::Debug for HtmlOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formatters: Vec<&String> = self.formatters.keys().collect();
        formatters.sort();
        f.debug_struct("HtmlOptions")
            .field("escape", &self.escape)
            .field("render_links", &self.render_links)
            .field("notebook", &self.notebook)
            .field("max_rows", &self.max_rows)
            .field("max_cols", &self.max_cols)
            .field("max_colwidth", &self.max_colwidth)
            .field("show_dimensions", &self.show_dimensions)
            .field("formatters", &formatters)
            .finish()
    }
}

/// Positions kept along one axis. `split` is where the `...` marker goes.
struct Selection {
    indices: Vec<usize>,
    split: Option<usize>,
}

impl Selection {
    /// Keep everything, or the head and tail halves of `limit`.
    /// A zero limit means no limit.
    fn new(len: usize, limit: Option<usize>) -> Self {
        match limit.filter(|max| *max > 0) {
            Some(max) if len > max => {
                let half = max / 2;
                if half == 0 {
                    Self {
                        indices: (0..max).collect(),
                        split: Some(max),
                    }
                } else {
                    Self {
                        indices: (0..half).chain(len - half..len).collect(),
                        split: Some(half),
                    }
                }
            }
            _ => Self {
                indices: (0..len).collect(),
                split: None,
            },
        }
    }

    fn is_truncated(&self) -> bool {
        self.split.is_some()
    }
}

/// Render `frame` as an HTML table.
pub fn to_html(frame: &DataFrame, options: &HtmlOptions<'_>) -> RasterResult<String> {
    let columns = frame.columns();
    let rows = Selection::new(frame.num_rows(), options.max_rows);
    let cols = Selection::new(columns.len(), options.max_cols);

    let mut html = String::new();
    if options.notebook {
        html.push_str("<div>\n");
        html.push_str(NOTEBOOK_STYLE);
    }

    let mut class = vec!["dataframe".to_string()];
    class.extend(options.classes.iter().cloned());
    html.push_str(&format!(
        "<table border=\"{}\" class=\"{}\">\n",
        options.border,
        class.join(" ")
    ));

    // Header
    html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n      <th></th>\n");
    for (pos, &c) in cols.indices.iter().enumerate() {
        if cols.split == Some(pos) {
            html.push_str(&format!("      <th>{}</th>\n", ELLIPSIS));
        }
        let name = text_cell(&columns[c].name, options.escape, false);
        html.push_str(&format!("      <th>{}</th>\n", name));
    }
    if cols.split == Some(cols.indices.len()) {
        html.push_str(&format!("      <th>{}</th>\n", ELLIPSIS));
    }
    html.push_str("    </tr>\n  </thead>\n");

    // Body
    html.push_str("  <tbody>\n");
    for (pos, &r) in rows.indices.iter().enumerate() {
        if rows.split == Some(pos) {
            write_ellipsis_row(&mut html, &cols);
        }
        html.push_str("    <tr>\n");
        html.push_str(&format!("      <th>{}</th>\n", r));
        for (cpos, &c) in cols.indices.iter().enumerate() {
            if cols.split == Some(cpos) {
                html.push_str(&format!("      <td>{}</td>\n", ELLIPSIS));
            }
            let column = &columns[c];
            let content = format_cell(&column.name, &column.values[r], options)?;
            html.push_str(&format!("      <td>{}</td>\n", content));
        }
        if cols.split == Some(cols.indices.len()) {
            html.push_str(&format!("      <td>{}</td>\n", ELLIPSIS));
        }
        html.push_str("    </tr>\n");
    }
    if rows.split == Some(rows.indices.len()) {
        write_ellipsis_row(&mut html, &cols);
    }
    html.push_str("  </tbody>\n</table>\n");

    let show_dims = match options.show_dimensions {
        ShowDimensions::Always => true,
        ShowDimensions::Never => false,
        ShowDimensions::Truncate => rows.is_truncated() || cols.is_truncated(),
    };
    if show_dims {
        html.push_str(&format!(
            "<p>{} rows × {} columns</p>\n",
            frame.num_rows(),
            frame.num_columns()
        ));
    }

    if options.notebook {
        html.push_str("</div>");
    }
    Ok(html)
}

fn write_ellipsis_row(html: &mut String, cols: &Selection) {
    html.push_str("    <tr>\n");
    html.push_str(&format!("      <th>{}</th>\n", ELLIPSIS));
    let cells = cols.indices.len() + usize::from(cols.is_truncated());
    for _ in 0..cells {
        html.push_str(&format!("      <td>{}</td>\n", ELLIPSIS));
    }
    html.push_str("    </tr>\n");
}

fn format_cell(column: &str, value: &Value, options: &HtmlOptions<'_>) -> RasterResult<String> {
    let text = match options.formatters.get(column) {
        Some(formatter) => formatter(value)?,
        None => value.repr(),
    };
    let text = truncate(&text, options.max_colwidth);
    Ok(text_cell(&text, options.escape, options.render_links))
}

fn text_cell(text: &str, escape: bool, render_links: bool) -> String {
    if render_links && is_url(text) {
        let shown = if escape { escape_html(text) } else { text.to_string() };
        return format!("<a href=\"{}\" target=\"_blank\">{}</a>", shown, shown);
    }
    if escape {
        escape_html(text)
    } else {
        text.to_string()
    }
}

/// Cap `text` at `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if text.chars().count() > max => {
            let keep = max.saturating_sub(ELLIPSIS.len());
            let mut out: String = text.chars().take(keep).collect();
            out.push_str(ELLIPSIS);
            out
        }
        _ => text.to_string(),
    }
}

/// Whether the whole text is a single URL.
pub fn is_url(text: &str) -> bool {
    URL_SCHEMES
        .iter()
        .any(|scheme| text.len() > scheme.len() && text.starts_with(scheme))
        && !text.chars().any(char::is_whitespace)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
