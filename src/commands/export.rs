//! Export command - walk an address space and write an artifact

use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::UaBrowseError;
use crate::cli::{SecurityArgs, SessionArgs};
use crate::config::UabrowseConfig;
use crate::export::{ExportFormat, Exporter};

type Result<T> = std::result::Result<T, UaBrowseError>;

/// Execute the export command
///
/// The artifact is written even when the session fails mid-walk; it then
/// records the error message and the partial node set, and the failure is
/// surfaced afterwards so the process exits non-zero.
///
/// # Errors
///
/// Returns `UaBrowseError` for invalid arguments, connection failures,
/// serialization failures, or a session that did not complete.
pub fn execute(
    session: &SessionArgs,
    security: &SecurityArgs,
    config: &UabrowseConfig,
    format: ExportFormat,
    output: Option<&Path>,
    full: bool,
    quiet: bool,
) -> Result<()> {
    let result = super::run_session(session, security, config, full)?;

    // --full reads extended attributes during the walk, so the session
    // flag and the artifact flag always agree.
    let exporter = Exporter::new(format).full_export(full);
    let target = resolve_output(output, config, &exporter, &result);
    let path = exporter.export(&result, target.as_deref())?;

    if quiet {
        println!("{}", path.display());
    } else {
        println!(
            "Exported {} nodes to {}",
            result.total_nodes,
            path.display().to_string().green()
        );
    }

    if result.success {
        Ok(())
    } else {
        if !quiet {
            eprintln!(
                "{} {}",
                "Session failed; the artifact carries the partial result:".yellow(),
                result.error_message.as_deref().unwrap_or("unknown error")
            );
        }
        Err(UaBrowseError::SessionFailed(
            result
                .error_message
                .unwrap_or_else(|| "browse session failed".to_string()),
        ))
    }
}

// An explicit -o wins; otherwise a configured export_dir relocates the
// generated file name.
fn resolve_output(
    output: Option<&Path>,
    config: &UabrowseConfig,
    exporter: &Exporter,
    result: &crate::model::BrowseResult,
) -> Option<PathBuf> {
    match (output, &config.export_dir) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(dir)) => Some(dir.join(exporter.file_name(result))),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BrowseResult;

    #[test]
    fn test_explicit_output_wins() {
        let config = UabrowseConfig {
            export_dir: Some(PathBuf::from("/tmp/exports")),
            ..UabrowseConfig::default()
        };
        let exporter = Exporter::new(ExportFormat::Csv);
        let result = BrowseResult::new();
        let resolved = resolve_output(Some(Path::new("out.csv")), &config, &exporter, &result);
        assert_eq!(resolved, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_export_dir_relocates_generated_name() {
        let config = UabrowseConfig {
            export_dir: Some(PathBuf::from("/tmp/exports")),
            ..UabrowseConfig::default()
        };
        let exporter = Exporter::new(ExportFormat::Json);
        let result = BrowseResult::new();
        let resolved = resolve_output(None, &config, &exporter, &result).unwrap();
        assert!(resolved.starts_with("/tmp/exports"));
        assert!(resolved.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn test_no_output_defers_to_exporter() {
        let exporter = Exporter::new(ExportFormat::Csv);
        let result = BrowseResult::new();
        assert_eq!(
            resolve_output(None, &UabrowseConfig::default(), &exporter, &result),
            None
        );
    }
}
