//! Dataframe HTML with inline tile thumbnails.

use crate::frame::{Column, DataFrame, Value};
use crate::html::{CellFormatter, HtmlOptions};
use crate::options::{global_options, OptionsStore};
use crate::tile_html::tile_to_html_with;
use raster_common::RasterResult;
use renderer::ThumbnailStyle;

/// Whether a column should be rendered as thumbnails.
///
/// Only row 0 is inspected. A column whose first value is not a tile shows
/// any later tiles as their repr.
pub fn classify_column(column: &Column) -> bool {
    column.values.first().is_some_and(Value::is_tile)
}

/// Cell formatter for tile columns: tiles become `<img>` tags (or their repr
/// when they have no cells), anything else its repr.
pub fn tile_cell_formatter(style: ThumbnailStyle) -> impl Fn(&Value) -> RasterResult<String> {
    move |value| match value {
        Value::Tile(tile) => Ok(tile_to_html_with(tile, &style)?.unwrap_or_else(|| tile.repr())),
        other => Ok(other.repr()),
    }
}

/// HTML for a dataframe using the global display options.
pub fn dataframe_to_html(frame: &DataFrame) -> RasterResult<Option<String>> {
    dataframe_to_html_with(frame, global_options())
}

/// HTML for a dataframe using the options in `store`.
///
/// `None` when `notebook_repr_html` is off. `max_colwidth` is lifted for the
/// duration of the call so image tags are not cut, and restored on return,
/// error, or panic.
pub fn dataframe_to_html_with(frame: &DataFrame, store: &OptionsStore) -> RasterResult<Option<String>> {
    dataframe_to_html_with_formatters(frame, store, std::iter::empty())
}

/// Like [`dataframe_to_html_with`], with extra cell formatters keyed by
/// column name.
///
/// Tile columns always use the thumbnail formatter; an extra formatter for
/// one of them is ignored.
pub fn dataframe_to_html_with_formatters<'a>(
    frame: &DataFrame,
    store: &OptionsStore,
    formatters: impl IntoIterator<Item = (String, CellFormatter<'a>)>,
) -> RasterResult<Option<String>> {
    let options = store.snapshot();
    if !options.notebook_repr_html {
        return Ok(None);
    }
    if frame.is_empty() {
        return frame.repr_html(&options);
    }

    let tile_columns: Vec<&str> = frame
        .columns()
        .iter()
        .filter(|c| classify_column(c))
        .map(|c| c.name.as_str())
        .collect();

    let _widen = store.widen_columns();
    let current = store.snapshot();

    let mut html_options = HtmlOptions {
        escape: false,
        render_links: true,
        notebook: true,
        ..HtmlOptions::from_display(&current)
    };
    html_options.formatters.extend(formatters);
    for name in &tile_columns {
        html_options
            .formatters
            .insert(name.to_string(), Box::new(tile_cell_formatter(current.thumbnail.clone())));
    }

    let html = frame.to_html(&html_options)?;
    tracing::debug!(
        rows = frame.num_rows(),
        columns = frame.num_columns(),
        tile_columns = tile_columns.len(),
        bytes = html.len(),
        "Rendered dataframe HTML"
    );
    Ok(Some(html))
}
