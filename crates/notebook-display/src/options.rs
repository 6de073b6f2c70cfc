//! Display options shared by the table and tile renderers.
//!
//! Options live in an [`OptionsStore`]. The process-wide store returned by
//! [`global_options`] is what the shell-facing entry points read; tests and
//! embedders can pass their own store instead.

use once_cell::sync::Lazy;
use renderer::ThumbnailStyle;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// When to print the `N rows × M columns` footer under a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowDimensions {
    Always,
    Never,
    /// Only when rows or columns were elided
    #[default]
    Truncate,
}

/// Rendering options for tables and thumbnails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Produce HTML at all; when false the shell falls back to plain text
    pub notebook_repr_html: bool,
    /// Rows shown before eliding the middle (`None` = all)
    pub max_rows: Option<usize>,
    /// Columns shown before eliding the middle (`None` = all)
    pub max_columns: Option<usize>,
    /// Characters per cell before truncation with `...` (`None` = unbounded)
    pub max_colwidth: Option<usize>,
    pub show_dimensions: ShowDimensions,
    pub thumbnail: ThumbnailStyle,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            notebook_repr_html: true,
            max_rows: Some(60),
            max_columns: Some(20),
            max_colwidth: Some(50),
            show_dimensions: ShowDimensions::Truncate,
            thumbnail: ThumbnailStyle::default(),
        }
    }
}

/// Live column width overrides and the width they replaced.
#[derive(Debug, Default)]
struct WidthOverrides {
    active: usize,
    saved: Option<usize>,
}

/// Thread-safe holder for [`DisplayOptions`].
///
/// A panic while the lock is held does not make the store unusable; the
/// last written options stay in effect.
#[derive(Debug, Default)]
pub struct OptionsStore {
    inner: RwLock<DisplayOptions>,
    overrides: Mutex<WidthOverrides>,
}

impl OptionsStore {
    pub fn new(options: DisplayOptions) -> Self {
        Self {
            inner: RwLock::new(options),
            overrides: Mutex::default(),
        }
    }

    // Lock order: `overrides` before `inner`.
    fn overrides(&self) -> MutexGuard<'_, WidthOverrides> {
        self.overrides.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, DisplayOptions> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DisplayOptions> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current options.
    pub fn snapshot(&self) -> DisplayOptions {
        self.read().clone()
    }

    /// Replace all options.
    pub fn replace(&self, options: DisplayOptions) {
        *self.write() = options;
    }

    /// Modify options in place.
    pub fn update(&self, f: impl FnOnce(&mut DisplayOptions)) {
        f(&mut self.write());
    }

    pub fn max_colwidth(&self) -> Option<usize> {
        self.read().max_colwidth
    }

    pub fn set_max_colwidth(&self, width: Option<usize>) {
        self.write().max_colwidth = width;
    }

    /// Make cell width unbounded until the returned guard is dropped.
    ///
    /// Guards may overlap, nested or from other threads. The width in effect
    /// before the first of them is restored when the last one drops.
    pub fn widen_columns(&self) -> ColumnWidthOverride<'_> {
        let mut overrides = self.overrides();
        let width = self.write().max_colwidth.take();
        if overrides.active == 0 {
            overrides.saved = width;
        }
        overrides.active += 1;
        tracing::trace!(
            previous = ?overrides.saved,
            active = overrides.active,
            "Column width override active"
        );
        ColumnWidthOverride {
            store: self,
            previous: overrides.saved,
        }
    }

    fn end_override(&self) {
        let mut overrides = self.overrides();
        overrides.active = overrides.active.saturating_sub(1);
        if overrides.active == 0 {
            let saved = overrides.saved.take();
            self.set_max_colwidth(saved);
            tracing::trace!(restored = ?saved, "Column width override ended");
        }
    }
}

/// Restores the previous `max_colwidth` when the last overlapping guard is
/// dropped, including during unwinding.
#[must_use = "the override ends when the guard is dropped"]
#[derive(Debug)]
pub struct ColumnWidthOverride<'a> {
    store: &'a OptionsStore,
    previous: Option<usize>,
}

impl ColumnWidthOverride<'_> {
    /// Width that will be restored.
    pub fn previous(&self) -> Option<usize> {
        self.previous
    }
}

impl Drop for ColumnWidthOverride<'_> {
    fn drop(&mut self) {
        self.store.end_override();
    }
}

static GLOBAL_OPTIONS: Lazy<OptionsStore> = Lazy::new(OptionsStore::default);

/// Process-wide options used by the shell-facing entry points.
pub fn global_options() -> &'static OptionsStore {
    &GLOBAL_OPTIONS
}
