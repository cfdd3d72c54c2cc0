//! CSV export strategy
//!
//! UTF-8 with a leading byte-order mark for spreadsheet compatibility, one
//! header row, one row per node with RFC4180 quoting, and absent fields as
//! empty strings. After the node table, separated by blank lines, follow a
//! summary block and a namespace table block; conformant readers treat
//! everything after the first blank line as non-tabular metadata.

use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;

use super::error::ExportError;
use crate::model::{BrowseResult, NodeRecord};
use crate::stats::BrowseStats;

const BOM: &[u8] = b"\xEF\xBB\xBF";

const BASE_HEADERS: &[&str] = &[
    "node_id",
    "browse_name",
    "display_name",
    "node_class",
    "data_type",
    "value",
    "parent_id",
    "depth",
    "namespace_index",
    "is_namespace_node",
    "full_path",
    "timestamp",
];

const EXTENDED_HEADERS: &[&str] = &[
    "description",
    "access_level",
    "user_access_level",
    "write_mask",
    "user_write_mask",
    "event_notifier",
    "executable",
    "user_executable",
    "minimum_sampling_interval",
    "historizing",
];

fn bool_token(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn timestamp_token(stamp: DateTime<Utc>) -> String {
    stamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn node_row(node: &NodeRecord, full_export: bool) -> Vec<String> {
    let mut row = vec![
        node.node_id.to_string(),
        node.browse_name.clone(),
        node.display_name.clone(),
        node.node_class.to_string(),
        node.data_type.clone().unwrap_or_default(),
        node.value.clone().unwrap_or_default(),
        opt(&node.parent_id),
        node.depth.to_string(),
        node.namespace_index.to_string(),
        bool_token(node.is_namespace_node).to_string(),
        node.full_path.clone(),
        timestamp_token(node.timestamp),
    ];

    if full_export {
        let extended = node.extended.clone().unwrap_or_default();
        row.extend([
            extended.description.unwrap_or_default(),
            extended.access_level.unwrap_or_default(),
            extended.user_access_level.unwrap_or_default(),
            opt(&extended.write_mask),
            opt(&extended.user_write_mask),
            opt(&extended.event_notifier),
            extended.executable.map(bool_token).unwrap_or_default().to_string(),
            extended.user_executable.map(bool_token).unwrap_or_default().to_string(),
            opt(&extended.minimum_sampling_interval),
            extended.historizing.map(bool_token).unwrap_or_default().to_string(),
        ]);
    }

    row
}

/// Write a result as a CSV artifact
pub(super) fn write<W: Write>(
    result: &BrowseResult,
    full_export: bool,
    mut writer: W,
) -> Result<(), ExportError> {
    writer.write_all(BOM)?;

    // Node table.
    {
        let mut table = csv::Writer::from_writer(&mut writer);
        let mut headers: Vec<&str> = BASE_HEADERS.to_vec();
        if full_export {
            headers.extend_from_slice(EXTENDED_HEADERS);
        }
        table.write_record(&headers)?;
        for node in &result.nodes {
            table.write_record(node_row(node, full_export))?;
        }
        table.flush()?;
    }

    // Summary block.
    writer.write_all(b"\n")?;
    let stats = BrowseStats::from_result(result);
    {
        let mut block = csv::WriterBuilder::new().flexible(true).from_writer(&mut writer);
        block.write_record(["Summary"])?;
        block.write_record(["Total Nodes", stats.total_nodes.to_string().as_str()])?;
        block.write_record(["Max Depth Reached", stats.max_depth_reached.to_string().as_str()])?;
        block.write_record(["Success", bool_token(result.success)])?;
        block.write_record(["Error Message", result.error_message.as_deref().unwrap_or("")])?;
        block.write_record([
            "Export Timestamp",
            timestamp_token(result.export_timestamp).as_str(),
        ])?;
        block.write_record(["Namespace Nodes", stats.namespace_nodes.to_string().as_str()])?;
        for (class, count) in &stats.by_class {
            block.write_record([format!("Nodes: {class}"), count.to_string()])?;
        }
        block.flush()?;
    }

    // Namespace table block.
    writer.write_all(b"\n")?;
    {
        let mut block = csv::WriterBuilder::new().flexible(true).from_writer(&mut writer);
        block.write_record(["Namespaces"])?;
        block.write_record(["Index", "URI", "Node Count"])?;
        for entry in &result.namespaces {
            block.write_record([
                entry.index.to_string(),
                entry.uri.clone(),
                stats.namespace_count(entry.index).to_string(),
            ])?;
        }
        block.flush()?;
    }

    Ok(())
}
