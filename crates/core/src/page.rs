//! Viewer page rendering and the single output write.
//!
//! The page is a fixed template with the dataset embedded as JS literals.
//! Nothing is computed here beyond serialization and escaping.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::dataset::Dataset;

const VIEWER_TEMPLATE: &str = include_str!("assets/viewer.html");

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Failed to serialize {what} for the viewer page: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown template placeholder '{0}'")]
    UnknownPlaceholder(String),
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write viewer page at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Static text and paths the template needs besides the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    pub title: String,
    pub footer: String,
    /// Prepended to dataset image paths by the viewer.
    pub asset_prefix: String,
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Pretty JSON that is safe to place inside a `<script>` element.
///
/// `</` only occurs inside JSON strings, where `<\/` is an equivalent escape.
pub fn script_json<T: Serialize>(value: &T, what: &'static str) -> Result<String, EmitError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| EmitError::Serialize { what, source })?;
    Ok(json.replace("</", "<\\/"))
}

/// `<option>` lines for the test selector, in the dataset's sorted order.
pub fn test_options(dataset: &Dataset) -> String {
    dataset
        .test_names()
        .into_iter()
        .map(|name| {
            let escaped = escape_html(name);
            format!("      <option value=\"{escaped}\">{escaped}</option>")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitute `{{name}}` placeholders in a single pass, so inserted values
/// are never re-scanned for placeholders.
fn fill_template(
    template: &str,
    mut lookup: impl FnMut(&str) -> Option<String>,
) -> Result<String, EmitError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };
        let key = &after[..end];
        let value = lookup(key).ok_or_else(|| EmitError::UnknownPlaceholder(key.to_string()))?;
        out.push_str(&value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Render the complete viewer page for `dataset`.
pub fn render_page(dataset: &Dataset, options: &PageOptions) -> Result<String, EmitError> {
    let tests_json = script_json(&dataset.tests, "tests")?;
    let metrics_json = script_json(&dataset.metrics, "metrics")?;
    let asset_prefix = script_json(&options.asset_prefix, "asset prefix")?;
    let title = escape_html(&options.title);
    let footer = escape_html(&options.footer);
    let options_html = test_options(dataset);

    fill_template(VIEWER_TEMPLATE, |key| {
        let value = match key {
            "title" => &title,
            "footer" => &footer,
            "test_options" => &options_html,
            "asset_prefix" => &asset_prefix,
            "tests_json" => &tests_json,
            "metrics_json" => &metrics_json,
            _ => return None,
        };
        Some(value.clone())
    })
}

/// Write the page to `path`, creating parent directories first.
///
/// The content goes to a sibling `.tmp` file which is then renamed over the
/// target, so a failed run never leaves a half-written page.
pub fn write_page(path: &Path, html: &str) -> Result<(), EmitError> {
    let Some(file_name) = path.file_name() else {
        return Err(EmitError::Write {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
        });
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| EmitError::CreateDir { path: parent.to_path_buf(), source })?;
    }

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let write_err = |source| EmitError::Write { path: path.to_path_buf(), source };
    fs::write(&tmp_path, html).map_err(write_err)?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(err));
    }
    Ok(())
}
