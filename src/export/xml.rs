//! XML export strategy
//!
//! A single `OpcUaAddressSpace` document with `Metadata`, `Namespaces` and
//! `Nodes` sections, indented with two spaces. Absent optional attributes are
//! omitted entirely rather than rendered as empty elements, and booleans use
//! the `True`/`False` tokens shared with the CSV strategy.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

use super::error::ExportError;
use crate::model::{BrowseResult, NodeRecord};

fn bool_token(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn timestamp_token(stamp: DateTime<Utc>) -> String {
    stamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn open<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn close<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), ExportError> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), ExportError> {
    open(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    close(writer, name)
}

fn optional_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: Option<&str>,
) -> Result<(), ExportError> {
    match value {
        Some(text) => text_element(writer, name, text),
        None => Ok(()),
    }
}

fn write_node<W: Write>(
    writer: &mut Writer<W>,
    node: &NodeRecord,
    full_export: bool,
) -> Result<(), ExportError> {
    open(writer, "Node")?;
    text_element(writer, "NodeId", &node.node_id.to_string())?;
    text_element(writer, "BrowseName", &node.browse_name)?;
    text_element(writer, "DisplayName", &node.display_name)?;
    text_element(writer, "NodeClass", node.node_class.as_str())?;
    optional_element(writer, "DataType", node.data_type.as_deref())?;
    optional_element(writer, "Value", node.value.as_deref())?;
    let parent = node.parent_id.as_ref().map(ToString::to_string);
    optional_element(writer, "ParentId", parent.as_deref())?;
    text_element(writer, "Depth", &node.depth.to_string())?;
    text_element(writer, "NamespaceIndex", &node.namespace_index.to_string())?;
    text_element(writer, "IsNamespaceNode", bool_token(node.is_namespace_node))?;
    text_element(writer, "FullPath", &node.full_path)?;
    text_element(writer, "Timestamp", &timestamp_token(node.timestamp))?;

    if full_export {
        if let Some(extended) = &node.extended {
            optional_element(writer, "Description", extended.description.as_deref())?;
            optional_element(writer, "AccessLevel", extended.access_level.as_deref())?;
            optional_element(
                writer,
                "UserAccessLevel",
                extended.user_access_level.as_deref(),
            )?;
            let write_mask = extended.write_mask.map(|v| v.to_string());
            optional_element(writer, "WriteMask", write_mask.as_deref())?;
            let user_write_mask = extended.user_write_mask.map(|v| v.to_string());
            optional_element(writer, "UserWriteMask", user_write_mask.as_deref())?;
            let event_notifier = extended.event_notifier.map(|v| v.to_string());
            optional_element(writer, "EventNotifier", event_notifier.as_deref())?;
            optional_element(writer, "Executable", extended.executable.map(bool_token))?;
            optional_element(
                writer,
                "UserExecutable",
                extended.user_executable.map(bool_token),
            )?;
            let sampling = extended.minimum_sampling_interval.map(|v| v.to_string());
            optional_element(writer, "MinimumSamplingInterval", sampling.as_deref())?;
            optional_element(writer, "Historizing", extended.historizing.map(bool_token))?;
        }
    }

    close(writer, "Node")
}

/// Write a result as an XML artifact
pub(super) fn write<W: Write>(
    result: &BrowseResult,
    full_export: bool,
    writer: W,
) -> Result<(), ExportError> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    open(&mut xml, "OpcUaAddressSpace")?;

    open(&mut xml, "Metadata")?;
    text_element(&mut xml, "TotalNodes", &result.total_nodes.to_string())?;
    text_element(
        &mut xml,
        "MaxDepthReached",
        &result.max_depth_reached.to_string(),
    )?;
    text_element(&mut xml, "Success", bool_token(result.success))?;
    text_element(&mut xml, "FullExport", bool_token(full_export))?;
    text_element(
        &mut xml,
        "ExportTimestamp",
        &timestamp_token(result.export_timestamp),
    )?;
    optional_element(&mut xml, "ErrorMessage", result.error_message.as_deref())?;
    close(&mut xml, "Metadata")?;

    open(&mut xml, "Namespaces")?;
    for entry in &result.namespaces {
        open(&mut xml, "Namespace")?;
        text_element(&mut xml, "Index", &entry.index.to_string())?;
        text_element(&mut xml, "URI", &entry.uri)?;
        close(&mut xml, "Namespace")?;
    }
    close(&mut xml, "Namespaces")?;

    open(&mut xml, "Nodes")?;
    for node in &result.nodes {
        write_node(&mut xml, node, full_export)?;
    }
    close(&mut xml, "Nodes")?;

    close(&mut xml, "OpcUaAddressSpace")?;
    Ok(())
}
