//! YAML configuration for notebook display.
//!
//! ```yaml
//! display:
//!   max_rows: 20
//!   show_dimensions: always
//!   thumbnail:
//!     colormap: magma
//!     nominal_size: 4.0
//! colormap_file: colormaps/terrain.json   # optional, overrides thumbnail.colormap
//! ```

use crate::options::{DisplayOptions, OptionsStore};
use raster_common::{RasterError, RasterResult};
use renderer::{Colormap, ColormapSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    pub display: DisplayOptions,
    /// JSON colormap file; relative paths resolve against the config file
    pub colormap_file: Option<PathBuf>,
}

impl NotebookConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> RasterResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("Notebook config {:?} does not exist, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| RasterError::ConfigError(format!("Failed to read {:?}: {}", path, e)))?;
        let mut config = Self::from_yaml(&content)?;

        if let (Some(file), Some(dir)) = (&config.colormap_file, path.parent()) {
            if file.is_relative() {
                config.colormap_file = Some(dir.join(file));
            }
        }

        tracing::info!("Loaded notebook config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> RasterResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| RasterError::ConfigError(format!("Failed to parse notebook config: {}", e)))
    }

    /// Display options with the colormap file, if any, applied.
    pub fn display_options(&self) -> RasterResult<DisplayOptions> {
        let mut options = self.display.clone();
        if let Some(file) = &self.colormap_file {
            let colormap = Colormap::from_file(file)?;
            tracing::debug!(name = %colormap.name, "Loaded colormap from {:?}", file);
            options.thumbnail.colormap = ColormapSpec::Custom(colormap);
        }
        options.thumbnail.colormap.resolve()?;
        Ok(options)
    }

    /// Validate and install into an options store.
    pub fn apply(&self, store: &OptionsStore) -> RasterResult<()> {
        store.replace(self.display_options()?);
        Ok(())
    }
}
