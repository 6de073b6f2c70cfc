//! Notebook display of raster tiles.
//!
//! - `tile_to_png` / `tile_to_html`: one tile to a PNG thumbnail, or an
//!   inline `<img>` tag carrying it as a data URI
//! - `dataframe_to_html`: table HTML where tile columns show thumbnails
//! - `register_notebook_display`: install the table renderer as the
//!   `text/html` formatter of the active interactive shell
//!
//! Registration is explicit; call it once at startup:
//!
//! ```ignore
//! notebook_display::register_notebook_display();
//! ```

pub mod config;
pub mod formatter;
pub mod frame;
pub mod html;
pub mod options;
pub mod shell;
pub mod tile_html;

pub use config::NotebookConfig;
pub use formatter::{
    classify_column, dataframe_to_html, dataframe_to_html_with, dataframe_to_html_with_formatters,
};
pub use frame::{Column, DataFrame, Value};
pub use html::{CellFormatter, HtmlOptions};
pub use options::{global_options, ColumnWidthOverride, DisplayOptions, OptionsStore, ShowDimensions};
pub use shell::{
    clear_active_shell, get_shell, install_renderer, register_notebook_display, set_active_shell,
    DisplayFormatter, InteractiveShell, MimeBundle,
};
pub use tile_html::{tile_to_html, tile_to_html_with, tile_to_png, tile_to_png_with};
