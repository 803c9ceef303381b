//! Static page loading and placeholder interpolation.

use crate::error::{ServerError, ServerResult};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Content type of rendered pages.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Replaces every `{{NAME}}` whose name is in `values`.
///
/// Placeholders with unknown names stay in the output verbatim, and
/// substituted values are never scanned again.
pub fn interpolate(template: &str, values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        match values.get(&after[..close]) {
            Some(value) => {
                out.push_str(value);
                rest = &after[close + 2..];
            }
            None => {
                // Step one brace so "{{{NAME}}}" still matches the inner pair.
                out.push('{');
                rest = &rest[open + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Loads templates from a static directory.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    static_dir: PathBuf,
}

impl PageRenderer {
    /// Creates a renderer rooted at `static_dir`.
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    /// Returns the static directory.
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Reads a template as UTF-8 text.
    pub fn load(&self, name: &str) -> ServerResult<String> {
        let path = self.static_dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ServerError::ResourceNotFound(path)),
            Err(e) => Err(ServerError::Io(e)),
        }
    }

    /// Loads `name` and substitutes `values` into it.
    pub fn render(&self, name: &str, values: &HashMap<String, String>) -> ServerResult<String> {
        let template = self.load(name)?;
        debug!(template = name, bytes = template.len(), "rendering page");
        Ok(interpolate(&template, values))
    }
}
