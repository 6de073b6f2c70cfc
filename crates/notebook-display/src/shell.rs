//! Interactive shell display-formatter registry.
//!
//! A shell owns one [`DisplayFormatter`] per MIME type. Each formatter maps a
//! Rust type to a render function. Displaying a value collects every format
//! that can render it into a [`MimeBundle`], always including `text/plain`.

use crate::formatter::dataframe_to_html;
use crate::frame::DataFrame;
use once_cell::sync::Lazy;
use raster_common::RasterResult;
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";

/// Render function stored by a formatter.
pub type RenderFn = Arc<dyn Fn(&dyn Any) -> RasterResult<Option<String>> + Send + Sync>;

/// Per-MIME formatter table keyed by type.
pub struct DisplayFormatter {
    format_type: String,
    renderers: RwLock<HashMap<TypeId, (&'static str, RenderFn)>>,
}

impl DisplayFormatter {
    pub fn new(format_type: impl Into<String>) -> Self {
        Self {
            format_type: format_type.into(),
            renderers: RwLock::new(HashMap::new()),
        }
    }

    pub fn format_type(&self) -> &str {
        &self.format_type
    }

    /// Register (or replace) the renderer for values of type `T`.
    pub fn for_type<T, F>(&self, render: F)
    where
        T: Any,
        F: Fn(&T) -> RasterResult<Option<String>> + Send + Sync + 'static,
    {
        let erased: RenderFn = Arc::new(move |value: &dyn Any| match value.downcast_ref::<T>() {
            Some(value) => render(value),
            None => Ok(None),
        });
        let previous = self
            .renderers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), (type_name::<T>(), erased));
        tracing::debug!(
            format = %self.format_type,
            type_name = type_name::<T>(),
            replaced = previous.is_some(),
            "Registered display renderer"
        );
    }

    pub fn is_registered<T: Any>(&self) -> bool {
        self.renderers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// Render a value. `Ok(None)` when no renderer is registered for its
    /// type or the renderer declines.
    pub fn format(&self, value: &dyn Any) -> RasterResult<Option<String>> {
        let renderer = self
            .renderers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&value.type_id())
            .map(|(_, render)| Arc::clone(render));
        match renderer {
            Some(render) => render(value),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for DisplayFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let renderers = self.renderers.read().unwrap_or_else(PoisonError::into_inner);
        let mut types: Vec<&str> = renderers.values().map(|(name, _)| *name).collect();
        types.sort_unstable();
        f.debug_struct("DisplayFormatter")
            .field("format_type", &self.format_type)
            .field("types", &types)
            .finish()
    }
}

/// Representations of one value keyed by MIME type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeBundle {
    data: BTreeMap<String, String>,
}

impl MimeBundle {
    pub fn get(&self, mime: &str) -> Option<&str> {
        self.data.get(mime).map(String::as_str)
    }

    pub fn contains(&self, mime: &str) -> bool {
        self.data.contains_key(mime)
    }

    pub fn insert(&mut self, mime: impl Into<String>, content: impl Into<String>) {
        self.data.insert(mime.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A display host holding formatters for each MIME type.
#[derive(Debug, Default)]
pub struct InteractiveShell {
    formatters: RwLock<HashMap<String, Arc<DisplayFormatter>>>,
}

impl InteractiveShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter for a MIME type, created on first use.
    pub fn formatter(&self, mime: &str) -> Arc<DisplayFormatter> {
        if let Some(existing) = self
            .formatters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(mime)
        {
            return Arc::clone(existing);
        }
        let mut formatters = self.formatters.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            formatters
                .entry(mime.to_string())
                .or_insert_with(|| Arc::new(DisplayFormatter::new(mime))),
        )
    }

    /// Build every available representation of `value`.
    ///
    /// `text/plain` is always present. A formatter that fails is logged and
    /// left out of the bundle.
    pub fn display<T: Any + fmt::Display>(&self, value: &T) -> MimeBundle {
        let mut bundle = MimeBundle::default();
        bundle.insert(TEXT_PLAIN, value.to_string());

        let formatters: Vec<Arc<DisplayFormatter>> = self
            .formatters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for formatter in formatters {
            if formatter.format_type() == TEXT_PLAIN {
                continue;
            }
            match formatter.format(value) {
                Ok(Some(content)) => bundle.insert(formatter.format_type(), content),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        format = formatter.format_type(),
                        type_name = type_name::<T>(),
                        error = %e,
                        data_error = e.is_data_error(),
                        "Display formatter failed, falling back to plain text"
                    );
                }
            }
        }
        bundle
    }
}

static ACTIVE_SHELL: Lazy<RwLock<Option<Arc<InteractiveShell>>>> = Lazy::new(|| RwLock::new(None));

/// The active interactive shell, if any.
pub fn get_shell() -> Option<Arc<InteractiveShell>> {
    ACTIVE_SHELL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Make `shell` the active shell, returning the one it replaces.
pub fn set_active_shell(shell: Arc<InteractiveShell>) -> Option<Arc<InteractiveShell>> {
    ACTIVE_SHELL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(shell)
}

pub fn clear_active_shell() -> Option<Arc<InteractiveShell>> {
    ACTIVE_SHELL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// Install `render` as the `format_name` renderer for `T` on `shell`.
pub fn install_renderer<T, F>(shell: &InteractiveShell, format_name: &str, render: F)
where
    T: Any,
    F: Fn(&T) -> RasterResult<Option<String>> + Send + Sync + 'static,
{
    shell.formatter(format_name).for_type::<T, F>(render);
}

/// Install the dataframe thumbnail renderer as the `text/html` formatter of
/// the active shell.
///
/// Returns `false` (and does nothing) when no shell is active.
pub fn register_notebook_display() -> bool {
    let Some(shell) = get_shell() else {
        tracing::debug!("No interactive shell active, notebook display not registered");
        return false;
    };
    install_renderer::<DataFrame, _>(&shell, TEXT_HTML, dataframe_to_html);
    tracing::info!("Registered dataframe thumbnail renderer for {}", TEXT_HTML);
    true
}
