//! Export pipeline
//!
//! Serializes a [`BrowseResult`](crate::model::BrowseResult) into one of the
//! supported artifact formats. All three strategies share the same field
//! vocabulary and boolean/timestamp tokens, so the same result renders to
//! equivalent documents regardless of format. A failed result is still a
//! valid artifact carrying the error message and whatever nodes were
//! collected before the failure.
//!
//! Output is byte-deterministic for a given result: the node order is the
//! traversal order and every timestamp comes from the result itself, never
//! from the wall clock at export time.

pub mod error;

mod csv;
mod json;
mod xml;

use clap::ValueEnum;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub use error::ExportError;
pub use json::{JsonDocument, JsonMetadata};

use crate::model::BrowseResult;

/// Artifact format for an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// Spreadsheet-friendly CSV with summary and namespace blocks
    #[default]
    Csv,
    /// Structured JSON document with metadata, namespaces and nodes
    Json,
    /// XML address-space document
    Xml,
}

impl ExportFormat {
    /// File extension used for default artifact names
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes browse results to artifact files
#[derive(Debug, Clone, Copy)]
pub struct Exporter {
    format: ExportFormat,
    full_export: bool,
}

impl Exporter {
    /// Create an exporter for the given format
    #[must_use]
    pub const fn new(format: ExportFormat) -> Self {
        Self {
            format,
            full_export: false,
        }
    }

    /// Include extended attributes in the artifact
    #[must_use]
    pub const fn full_export(mut self, full: bool) -> Self {
        self.full_export = full;
        self
    }

    /// Export a result to `path`, or to a generated name under `export/`
    ///
    /// The generated name embeds the result's export timestamp, so exporting
    /// the same result twice produces the same file name. Parent directories
    /// are created as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] when the file cannot be created or a
    /// serialization step fails.
    pub fn export(
        &self,
        result: &BrowseResult,
        path: Option<&Path>,
    ) -> Result<PathBuf, ExportError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.default_path(result),
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        let writer = BufWriter::new(file);
        match self.format {
            ExportFormat::Csv => csv::write(result, self.full_export, writer)?,
            ExportFormat::Json => json::write(result, self.full_export, writer)?,
            ExportFormat::Xml => xml::write(result, self.full_export, writer)?,
        }

        info!(
            path = %path.display(),
            format = %self.format,
            nodes = result.total_nodes,
            "wrote export artifact"
        );
        Ok(path)
    }

    /// Generated artifact file name for a result
    ///
    /// Embeds the result's export timestamp, so the name is stable for one
    /// result.
    #[must_use]
    pub fn file_name(&self, result: &BrowseResult) -> String {
        let stamp = result.export_timestamp.format("%Y%m%d_%H%M%S");
        format!("opcua_export_{stamp}.{}", self.format.extension())
    }

    fn default_path(&self, result: &BrowseResult) -> PathBuf {
        PathBuf::from("export").join(self.file_name(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::{BrowseConfig, Browser};
    use crate::source::StaticSource;

    fn demo_result() -> BrowseResult {
        let source = StaticSource::demo();
        Browser::new(BrowseConfig::new("i=84", 3).unwrap()).browse(&source)
    }

    #[test]
    fn test_default_path_embeds_result_timestamp() {
        let result = demo_result();
        let exporter = Exporter::new(ExportFormat::Json);
        let a = exporter.default_path(&result);
        let b = exporter.default_path(&result);
        assert_eq!(a, b);
        assert!(a.starts_with("export"));
        assert!(a.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn test_export_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        let written = Exporter::new(ExportFormat::Csv)
            .export(&demo_result(), Some(&path))
            .unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
    }

    #[test]
    fn test_each_format_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = demo_result();
        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Xml] {
            let path = dir.path().join(format!("out.{}", format.extension()));
            Exporter::new(format).export(&result, Some(&path)).unwrap();
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_extension_matches_display() {
        assert_eq!(ExportFormat::Xml.to_string(), ExportFormat::Xml.extension());
    }
}
