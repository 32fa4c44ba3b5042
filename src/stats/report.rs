//! Report generation for container resource usage.
//!
//! Generates both JSON and human-readable text reports.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::types::*;

/// Generate JSON report
pub fn generate_json_report(report: &ResourceReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

fn summary_line(label: &str, unit: &str, summary: &Option<SeriesSummary>) -> String {
    match summary {
        Some(s) => format!(
            "  {:<7} min {:>10.3}  max {:>10.3}  mean {:>10.3}  std {:>10.3}  ({}, {} samples)",
            label, s.min, s.max, s.mean, s.std_dev, unit, s.samples
        ),
        None => format!("  {:<7} no samples", label),
    }
}

/// Generate human-readable text report
pub fn generate_text_report(report: &ResourceReport, output_path: &Path) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(80));
    lines.push("                      CONTAINER RESOURCE USAGE REPORT".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    lines.push(format!("Generated: {}", report.metadata.generated_at));
    lines.push(format!("Report Directory: {}", report.metadata.report_dir));
    lines.push(format!("Containers: {}", report.metadata.total_nodes));
    lines.push(format!("Aligned Length: {} ticks", report.metadata.aligned_length));
    if let Some(window) = report.metadata.moving_average_window {
        lines.push(format!("CPU Moving Average Window: {} samples", window));
    }
    lines.push(String::new());

    for node in &report.nodes {
        lines.push("-".repeat(80));
        lines.push(format!(
            "{} ({} ticks, {} without data)",
            node.node, node.ticks, node.missing_ticks
        ));
        lines.push(summary_line("CPU", Metric::Cpu.unit(), &node.cpu));
        lines.push(summary_line("Memory", Metric::Memory.unit(), &node.memory));
    }

    lines.push("=".repeat(80));

    let content = lines.join("\n");
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print a summary to stdout
pub fn print_summary(report: &ResourceReport) {
    println!("\n=== CONTAINER RESOURCE USAGE SUMMARY ===\n");
    println!("Containers: {}", report.metadata.total_nodes);

    let busiest = report
        .nodes
        .iter()
        .filter_map(|n| n.cpu.map(|cpu| (n, cpu)))
        .max_by(|(_, a), (_, b)| a.mean.total_cmp(&b.mean));
    if let Some((node, cpu)) = busiest {
        println!("Highest mean CPU: {} ({:.2}%)", node.node, cpu.mean);
    }

    let heaviest = report
        .nodes
        .iter()
        .filter_map(|n| n.memory.map(|mem| (n, mem)))
        .max_by(|(_, a), (_, b)| a.max.total_cmp(&b.max));
    if let Some((node, mem)) = heaviest {
        println!("Highest peak memory: {} ({:.3} GiB)", node.node, mem.max);
    }

    println!();
}
