#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions, // Rust naming conventions
    clippy::missing_errors_doc,      // error enums document themselves
    clippy::missing_panics_doc,      // same
)]

pub mod error;
pub mod format;
pub mod load;
pub mod page;
pub mod types;
pub mod view;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use error::{ConvertError, LoadError};
use page::RenderOptions;
use types::Detection;

/// Knobs for a single conversion.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub render: RenderOptions,
    /// On unparseable or empty input, write a page describing the error
    /// to the output path (the conversion still fails).
    pub error_page: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            error_page: true,
        }
    }
}

/// What a successful conversion produced.
#[derive(Debug, Serialize)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub bytes: u64,
    pub detection: Detection,
}

/// The single public API: load → render → write.
///
/// `output` defaults to the input path with an `.html` extension and
/// `title` to `Data from <file stem>`. Missing or non-CSV inputs fail
/// before anything is written.
pub fn convert(
    input: &Path,
    output: Option<&Path>,
    title: Option<&str>,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    let output = output.map_or_else(|| default_output(input), Path::to_path_buf);

    let loaded = match load::load(input) {
        Ok(l) => l,
        Err(e) => {
            if options.error_page && e.is_content_error() {
                write_error_page(&output, &e);
            }
            return Err(e.into());
        }
    };

    let title = title.map_or_else(|| default_title(input), str::to_string);
    let html = page::render_with(&loaded.table, &title, &options.render);

    fs::write(&output, &html).map_err(|e| ConvertError::Write {
        path: output.clone(),
        source: e,
    })?;
    info!(output = %output.display(), bytes = html.len(), "wrote page");

    Ok(Conversion {
        input: input.to_path_buf(),
        output,
        rows: loaded.table.row_count(),
        columns: loaded.table.column_count(),
        bytes: html.len() as u64,
        detection: loaded.detection,
    })
}

/// `data/report.csv` → `data/report.html`
#[must_use]
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("html")
}

/// `data/report.csv` → `Data from report`
#[must_use]
pub fn default_title(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("Data from {stem}")
}

fn write_error_page(output: &Path, error: &LoadError) {
    let html = page::render_error(&error.to_string());
    match fs::write(output, html) {
        Ok(()) => info!(output = %output.display(), "wrote error page"),
        Err(e) => warn!(output = %output.display(), error = %e, "could not write error page"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_from_input_path() {
        let input = Path::new("data/sales 2024.csv");
        assert_eq!(default_output(input), PathBuf::from("data/sales 2024.html"));
        assert_eq!(default_title(input), "Data from sales 2024");
    }
}
