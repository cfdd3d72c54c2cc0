//! Integration tests for the uabrowse pipeline
//!
//! These tests verify end-to-end functionality: browsing the demo address
//! space, exporting artifacts in every format, and replaying a JSON capture
//! through a fresh session.

use std::fs;
use std::path::Path;

use uabrowse::browse::{BrowseConfig, Browser};
use uabrowse::export::{ExportFormat, Exporter, JsonDocument};
use uabrowse::model::BrowseResult;
use uabrowse::source::{ConnectOptions, StaticSource, connect};

fn browse_demo(depth: u32) -> BrowseResult {
    let source = StaticSource::demo();
    Browser::new(
        BrowseConfig::new("i=84", depth)
            .unwrap()
            .include_values(true),
    )
    .browse(&source)
}

#[test]
fn test_browse_demo_space_end_to_end() {
    let result = browse_demo(4);

    assert!(result.success);
    assert_eq!(result.total_nodes, 14);
    assert_eq!(result.max_depth_reached, 4);
    assert_eq!(result.namespaces.len(), 2);
    assert_eq!(result.nodes[0].full_path, "Root");

    // Every record path is rooted at the start node.
    for node in &result.nodes {
        assert!(node.full_path.starts_with("Root"));
    }
}

#[test]
fn test_export_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let result = browse_demo(4);

    for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Xml] {
        let path = dir.path().join(format!("space.{}", format.extension()));
        let written = Exporter::new(format)
            .export(&result, Some(&path))
            .unwrap();
        assert_eq!(written, path);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    let csv_text = fs::read_to_string(dir.path().join("space.csv")).unwrap();
    assert!(csv_text.starts_with('\u{feff}'));
    assert!(csv_text.contains("\"Tag, A\""));

    let xml_text = fs::read_to_string(dir.path().join("space.xml")).unwrap();
    assert!(xml_text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(xml_text.contains("<OpcUaAddressSpace>"));
}

#[test]
fn test_json_artifact_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let result = browse_demo(4);
    let path = dir.path().join("space.json");
    Exporter::new(ExportFormat::Json)
        .export(&result, Some(&path))
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let document: JsonDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(document.metadata.total_nodes, result.total_nodes);
    assert!(document.metadata.success);
    assert_eq!(document.nodes.len(), result.nodes.len());
    assert_eq!(document.namespaces.len(), 2);
}

#[test]
fn test_replay_capture_through_connect() {
    let dir = tempfile::tempdir().unwrap();
    let original = browse_demo(5);
    let path = dir.path().join("capture.json");
    Exporter::new(ExportFormat::Json)
        .export(&original, Some(&path))
        .unwrap();

    let options = ConnectOptions::plain(path.to_string_lossy().to_string());
    let source = connect(&options).unwrap();
    let replayed = Browser::new(BrowseConfig::new("i=84", 5).unwrap()).browse(source.as_ref());

    assert!(replayed.success);
    assert_eq!(replayed.total_nodes, original.total_nodes);
    let original_ids: Vec<String> = original.nodes.iter().map(|n| n.node_id.to_string()).collect();
    let replayed_ids: Vec<String> = replayed.nodes.iter().map(|n| n.node_id.to_string()).collect();
    assert_eq!(replayed_ids, original_ids);
}

#[test]
fn test_failed_session_still_exports_valid_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = StaticSource::demo();
    source.disconnect_after(6);
    let result = Browser::new(BrowseConfig::new("i=84", 4).unwrap()).browse(&source);
    assert!(!result.success);
    assert!(result.total_nodes > 0);

    let json_path = dir.path().join("partial.json");
    Exporter::new(ExportFormat::Json)
        .export(&result, Some(&json_path))
        .unwrap();
    let document: JsonDocument =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert!(!document.metadata.success);
    assert!(document.metadata.error_message.is_some());
    assert_eq!(document.nodes.len(), result.total_nodes);

    let csv_path = dir.path().join("partial.csv");
    Exporter::new(ExportFormat::Csv)
        .export(&result, Some(&csv_path))
        .unwrap();
    assert!(fs::read_to_string(&csv_path).unwrap().contains("Success,False"));
}

#[test]
fn test_exports_are_deterministic_for_one_result() {
    let dir = tempfile::tempdir().unwrap();
    let result = browse_demo(4);

    for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Xml] {
        let a = dir.path().join(format!("a.{}", format.extension()));
        let b = dir.path().join(format!("b.{}", format.extension()));
        Exporter::new(format).export(&result, Some(&a)).unwrap();
        Exporter::new(format).export(&result, Some(&b)).unwrap();
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }
}

#[test]
fn test_full_export_toggles_extended_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let source = StaticSource::demo();
    let result = Browser::new(
        BrowseConfig::new("i=84", 4)
            .unwrap()
            .include_extended(true),
    )
    .browse(&source);

    let full_path = dir.path().join("full.json");
    Exporter::new(ExportFormat::Json)
        .full_export(true)
        .export(&result, Some(&full_path))
        .unwrap();
    let full_text = fs::read_to_string(&full_path).unwrap();
    assert!(full_text.contains("CurrentRead"));

    let trimmed_path = dir.path().join("trimmed.json");
    Exporter::new(ExportFormat::Json)
        .export(&result, Some(&trimmed_path))
        .unwrap();
    let trimmed_text = fs::read_to_string(&trimmed_path).unwrap();
    assert!(!trimmed_text.contains("CurrentRead"));
}

#[test]
fn test_unknown_capture_path_fails_cleanly() {
    let options = ConnectOptions::plain("/definitely/missing/capture.json");
    assert!(connect(&options).is_err());
    assert!(!Path::new("/definitely/missing/capture.json").exists());
}
