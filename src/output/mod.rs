//! Output formatting for CLI display
//!
//! Renders a browse result as an indented tree plus a summary block. Large
//! results are truncated on screen after a fixed number of lines; exports
//! always carry the full set.

use colored::Colorize;

use crate::model::{BrowseResult, NodeClass, NodeRecord};
use crate::stats::BrowseStats;

/// Nodes shown on screen before the tree is truncated
pub const DISPLAY_LIMIT: usize = 500;

const VALUE_LIMIT: usize = 60;

fn class_tag(class: NodeClass) -> String {
    let name = class.as_str();
    match class {
        NodeClass::Object => name.blue().to_string(),
        NodeClass::Variable => name.green().to_string(),
        NodeClass::Method => name.yellow().to_string(),
        NodeClass::ObjectType | NodeClass::VariableType | NodeClass::DataType => {
            name.magenta().to_string()
        }
        NodeClass::ReferenceType | NodeClass::View => name.cyan().to_string(),
        NodeClass::Unspecified => name.dimmed().to_string(),
    }
}

fn truncate_value(value: &str) -> String {
    if value.chars().count() > VALUE_LIMIT {
        let head: String = value.chars().take(VALUE_LIMIT).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

/// Render one node as a tree line
#[must_use]
pub fn node_line(node: &NodeRecord) -> String {
    let mut line = String::new();
    for _ in 0..node.depth {
        line.push_str("│  ");
    }
    if node.depth > 0 {
        line.push_str("└─ ");
    }

    line.push_str(&node.display_name.bold().to_string());
    if node.browse_name != node.display_name {
        line.push_str(&format!(" ({})", node.browse_name));
    }
    line.push_str(&format!(" [{}]", class_tag(node.node_class)));
    if let Some(data_type) = &node.data_type {
        line.push_str(&format!(" <{data_type}>"));
    }
    if let Some(value) = &node.value {
        line.push_str(&format!(" = {}", truncate_value(value)));
    }
    if node.namespace_index > 0 {
        line.push_str(&format!(" [ns={}]", node.namespace_index).dimmed().to_string());
    }
    if node.is_namespace_node {
        line.push_str(&" (namespace)".dimmed().to_string());
    }
    if node.depth == 0 {
        line.push_str(&format!("  {}", node.node_id).dimmed().to_string());
    }
    line
}

/// Render the summary block for a result
#[must_use]
pub fn summary(result: &BrowseResult) -> String {
    let stats = BrowseStats::from_result(result);
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} nodes, max depth {}\n",
        "Summary:".bold(),
        stats.total_nodes,
        stats.max_depth_reached
    ));
    for (class, count) in &stats.by_class {
        out.push_str(&format!("  {:<14} {count}\n", class.to_string()));
    }
    if stats.namespace_nodes > 0 {
        out.push_str(&format!("  namespace nodes: {}\n", stats.namespace_nodes));
    }
    for entry in &result.namespaces {
        out.push_str(&format!(
            "  ns={} {} ({} nodes)\n",
            entry.index,
            entry.uri,
            stats.namespace_count(entry.index)
        ));
    }
    out
}

/// Print a result to stdout as a tree with a trailing summary
///
/// With `quiet` set, only the tree lines are printed, one node per line,
/// without the summary block or the failure banner.
pub fn print_result(result: &BrowseResult, quiet: bool) {
    if !result.success
        && !quiet
        && let Some(message) = &result.error_message
    {
        eprintln!("{} {message}", "Browse failed:".red().bold());
        if result.total_nodes > 0 {
            eprintln!("{}", "Partial result collected before the failure:".dimmed());
        }
    }

    for node in result.nodes.iter().take(DISPLAY_LIMIT) {
        println!("{}", node_line(node));
    }
    if result.total_nodes > DISPLAY_LIMIT && !quiet {
        println!(
            "{}",
            format!(
                "... {} more nodes not shown (exports carry the full set)",
                result.total_nodes - DISPLAY_LIMIT
            )
            .dimmed()
        );
    }

    if !quiet {
        println!();
        print!("{}", summary(result));
    }
}
