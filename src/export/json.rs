//! JSON export strategy
//!
//! Emits a single document with top-level `metadata`, `namespaces` and
//! `nodes` keys in that order, two-space indented, timestamps as ISO-8601
//! with microsecond precision, and absent optional fields as `null`.
//! [`JsonDocument`] also deserializes, which is what the replay source and
//! the round-trip tests build on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use super::error::ExportError;
use crate::model::{iso8601, BrowseResult, NamespaceEntry, NodeRecord};

/// `metadata` section of the JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonMetadata {
    pub total_nodes: usize,
    pub max_depth_reached: u32,
    pub success: bool,
    pub error_message: Option<String>,
    pub full_export: bool,
    #[serde(with = "iso8601")]
    pub export_timestamp: DateTime<Utc>,
}

/// The complete JSON export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDocument {
    pub metadata: JsonMetadata,
    pub namespaces: Vec<NamespaceEntry>,
    pub nodes: Vec<NodeRecord>,
}

impl JsonDocument {
    /// Build the document for a result
    ///
    /// Without `full_export`, captured extended attributes are left out of
    /// the artifact entirely.
    #[must_use]
    pub fn build(result: &BrowseResult, full_export: bool) -> Self {
        let nodes = result
            .nodes
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if !full_export {
                    node.extended = None;
                }
                node
            })
            .collect();

        Self {
            metadata: JsonMetadata {
                total_nodes: result.total_nodes,
                max_depth_reached: result.max_depth_reached,
                success: result.success,
                error_message: result.error_message.clone(),
                full_export,
                export_timestamp: result.export_timestamp,
            },
            namespaces: result.namespaces.clone(),
            nodes,
        }
    }
}

/// Write a result as a JSON document
pub(super) fn write<W: Write>(
    result: &BrowseResult,
    full_export: bool,
    mut writer: W,
) -> Result<(), ExportError> {
    let document = JsonDocument::build(result, full_export);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::{BrowseConfig, Browser};
    use crate::source::StaticSource;

    fn demo_result() -> BrowseResult {
        let source = StaticSource::demo();
        Browser::new(BrowseConfig::new("i=84", 4).unwrap().include_values(true)).browse(&source)
    }

    fn export_to_string(result: &BrowseResult, full: bool) -> String {
        let mut buffer = Vec::new();
        write(result, full, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_top_level_key_order() {
        let text = export_to_string(&demo_result(), false);
        let metadata = text.find("\"metadata\"").unwrap();
        let namespaces = text.find("\"namespaces\"").unwrap();
        let nodes = text.find("\"nodes\"").unwrap();
        assert!(metadata < namespaces && namespaces < nodes);
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let result = demo_result();
        let text = export_to_string(&result, false);
        let parsed: JsonDocument = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed.metadata.total_nodes, parsed.nodes.len());
        assert_eq!(parsed.nodes.len(), result.nodes.len());
        for (original, reparsed) in result.nodes.iter().zip(&parsed.nodes) {
            assert_eq!(original.node_id, reparsed.node_id);
            assert_eq!(original.parent_id, reparsed.parent_id);
            assert_eq!(original.depth, reparsed.depth);
            assert_eq!(original.full_path, reparsed.full_path);
        }
    }

    #[test]
    fn test_absent_optionals_are_null() {
        let text = export_to_string(&demo_result(), false);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        let root = &value["nodes"][0];
        assert!(root["data_type"].is_null());
        assert!(root["value"].is_null());
        assert!(root["parent_id"].is_null());
        assert!(value["metadata"]["error_message"].is_null());
    }

    #[test]
    fn test_failed_result_still_yields_valid_document() {
        let result = BrowseResult::failed("connection refused before first read");
        let text = export_to_string(&result, false);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["nodes"].as_array().unwrap().len(), 0);
        assert_eq!(value["metadata"]["success"], serde_json::json!(false));
        assert_eq!(
            value["metadata"]["error_message"],
            serde_json::json!("connection refused before first read")
        );
    }

    #[test]
    fn test_extended_attributes_follow_full_export_flag() {
        let source = StaticSource::demo();
        let result = Browser::new(
            BrowseConfig::new("i=84", 4).unwrap().include_extended(true),
        )
        .browse(&source);

        let plain = export_to_string(&result, false);
        assert!(!plain.contains("access_level"));

        let full = export_to_string(&result, true);
        assert!(full.contains("\"access_level\": \"CurrentRead\""));
    }

    #[test]
    fn test_two_space_indentation() {
        let text = export_to_string(&demo_result(), false);
        assert!(text.starts_with("{\n  \"metadata\""));
    }

    #[test]
    fn test_deterministic_output() {
        let result = demo_result();
        assert_eq!(export_to_string(&result, false), export_to_string(&result, false));
    }

    #[test]
    fn test_timestamp_has_subsecond_precision() {
        let text = export_to_string(&demo_result(), false);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let stamp = value["metadata"]["export_timestamp"].as_str().unwrap();
        let (_, fraction) = stamp.split_once('.').expect("sub-second part present");
        assert_eq!(fraction.len(), "123456Z".len());
    }
}
