//! Container resource usage reports.
//!
//! Reads the `stats-{node}.txt` snippets captured during an experiment,
//! turns them into numeric series and produces charts plus CPU/memory
//! summaries.

pub mod aggregate;
pub mod chart;
pub mod parser;
pub mod report;
pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use rayon::prelude::*;

use crate::config::{orderer_name, peer_name, Topology};

pub use aggregate::{align_series, moving_average, summarize, DEFAULT_MOVING_AVERAGE_WINDOW};
pub use parser::{parse_stats, parse_stats_file};
pub use types::*;

/// Sub-directory of the report directory that receives charts and summaries
pub const PLOTS_SUBDIR: &str = "plots";

/// Container names whose stats were captured, in reporting order
pub fn monitored_nodes(topology: &Topology) -> Vec<String> {
    let mut nodes = Vec::new();
    for org in &topology.organizations {
        let lower = org.lower();
        for index in (1..=org.orderer_quantity).rev() {
            nodes.push(orderer_name(index, &lower));
        }
        for index in (1..=org.peer_quantity).rev() {
            let peer = peer_name(index, &lower);
            let chaincode = format!("chaincode-{}", peer);
            nodes.push(peer);
            nodes.push(chaincode);
        }
    }
    for index in (1..=topology.applications_quantity).rev() {
        nodes.push(format!("cli-applications-{}", index));
    }
    nodes
}

pub fn stats_file(report_dir: &Path, node: &str) -> PathBuf {
    report_dir.join(format!("stats-{}.txt", node))
}

/// Parse all stats files in parallel, preserving `nodes` order
pub fn load_samples(report_dir: &Path, nodes: &[String]) -> Result<Vec<ResourceSample>> {
    log::info!("Parsing stats for {} containers in parallel...", nodes.len());

    let samples = nodes
        .par_iter()
        .map(|node| {
            let sample = parse_stats_file(&stats_file(report_dir, node), node)?;
            log::debug!("Parsed {}: {} ticks", node, sample.len());
            Ok(sample)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(samples)
}

/// Options for [`generate_report`]
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// CPU moving average window; `None` disables the overlay
    pub moving_average_window: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            moving_average_window: Some(DEFAULT_MOVING_AVERAGE_WINDOW),
        }
    }
}

/// Summarize, align and chart the samples, then write `summary.json` and
/// `summary.txt` into `{report_dir}/plots`
pub fn generate_report(
    report_dir: &Path,
    mut samples: Vec<ResourceSample>,
    options: &ReportOptions,
) -> Result<ResourceReport> {
    let plots_dir = report_dir.join(PLOTS_SUBDIR);
    fs::create_dir_all(&plots_dir)
        .with_context(|| format!("Failed to create plots directory: {}", plots_dir.display()))?;

    // Summaries use the raw series, before padding
    let summaries: Vec<NodeSummary> = samples.iter().map(summarize).collect();

    let aligned_length = align_series(&mut samples);
    log::info!(
        "Aligned {} containers to {} ticks",
        samples.len(),
        aligned_length
    );

    for sample in &samples {
        let average = options
            .moving_average_window
            .map(|window| moving_average(&sample.cpu, window));
        chart::write_node_charts(&plots_dir, sample, average.as_ref())?;
    }
    log::info!("Charts written to {}", plots_dir.display());

    let report = ResourceReport {
        metadata: ReportMetadata {
            generated_at: chrono::Utc::now().to_rfc3339(),
            report_dir: report_dir.display().to_string(),
            total_nodes: samples.len(),
            aligned_length,
            moving_average_window: options.moving_average_window,
        },
        nodes: summaries,
    };

    report::generate_json_report(&report, &plots_dir.join("summary.json"))?;
    report::generate_text_report(&report, &plots_dir.join("summary.txt"))?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_loader::parse_topology;

    #[test]
    fn test_monitored_nodes_order() {
        let topology = parse_topology(
            r#"
organizations:
  - name: org1
    orderer-quantity: 2
    peer-quantity: 2
  - name: org2
    orderer-quantity: 1
    peer-quantity: 0
applications-quantity: 2
"#,
            "test",
        )
        .unwrap();

        assert_eq!(
            monitored_nodes(&topology),
            vec![
                "orderer2-org1",
                "orderer1-org1",
                "peer2-org1",
                "chaincode-peer2-org1",
                "peer1-org1",
                "chaincode-peer1-org1",
                "orderer1-org2",
                "cli-applications-2",
                "cli-applications-1",
            ]
        );
    }

    #[test]
    fn test_load_samples_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_samples(dir.path(), &["peer1-org1".to_string()]).is_err());
    }

    #[test]
    fn test_generate_report() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            stats_file(dir.path(), "peer1-org1"),
            "1%:512MiB / 1GiB:1MB / 1MB:0B / 0B\n3%:1GiB / 2GiB:2MB / 2MB:0B / 1MB\n",
        )
        .unwrap();
        fs::write(
            stats_file(dir.path(), "orderer1-org1"),
            "--:-- / --:--:--\n2%:1GiB / 2GiB:1kB / 1kB:0B / 0B\n4%:1GiB / 2GiB:1kB / 1kB:0B / 0B\n6%:1GiB / 2GiB:1kB / 1kB:0B / 0B\n",
        )
        .unwrap();

        let nodes = vec!["orderer1-org1".to_string(), "peer1-org1".to_string()];
        let samples = load_samples(dir.path(), &nodes).unwrap();
        let report = generate_report(dir.path(), samples, &ReportOptions::default()).unwrap();

        assert_eq!(report.metadata.aligned_length, 4);
        assert_eq!(report.nodes[0].missing_ticks, 1);
        assert_eq!(report.nodes[1].ticks, 2);
        assert_eq!(report.nodes[1].cpu.unwrap().mean, 2.0);

        let plots = dir.path().join(PLOTS_SUBDIR);
        assert!(plots.join("summary.json").exists());
        assert!(plots.join("summary.txt").exists());
        assert!(plots.join("stats-peer1-org1-Disk-Writes.svg").exists());
    }
}
