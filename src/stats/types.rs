//! Core data types for container resource reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One sample per capture tick; `None` when the container had no data yet
pub type Series = Vec<Option<f64>>;

/// Value used to left-pad shorter series
pub const PADDING: Option<f64> = Some(0.0);

/// Resource usage metrics captured per container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Cpu,
    Memory,
    NetworkIn,
    NetworkOut,
    DiskReads,
    DiskWrites,
}

/// Whether a metric is a point-in-time reading or a running total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    Instantaneous,
    Cumulative,
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Instantaneous => write!(f, "Instantaneous"),
            MetricKind::Cumulative => write!(f, "Cumulative"),
        }
    }
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Cpu,
        Metric::Memory,
        Metric::NetworkIn,
        Metric::NetworkOut,
        Metric::DiskReads,
        Metric::DiskWrites,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Cpu => "Cpu",
            Metric::Memory => "Memory",
            Metric::NetworkIn => "Network In",
            Metric::NetworkOut => "Network Out",
            Metric::DiskReads => "Disk Reads",
            Metric::DiskWrites => "Disk Writes",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Cpu => "%",
            Metric::Memory => "GiB",
            _ => "MB",
        }
    }

    pub fn kind(self) -> MetricKind {
        match self {
            Metric::Cpu | Metric::Memory => MetricKind::Instantaneous,
            _ => MetricKind::Cumulative,
        }
    }

    /// Label with spaces replaced, as used in chart file names
    pub fn file_slug(self) -> String {
        self.label().replace(' ', "-")
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Six parallel series for one container, indexed by capture tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub node: String,
    pub cpu: Series,
    pub memory: Series,
    pub network_in: Series,
    pub network_out: Series,
    pub disk_reads: Series,
    pub disk_writes: Series,
}

impl ResourceSample {
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            ..Default::default()
        }
    }

    pub fn series(&self, metric: Metric) -> &Series {
        match metric {
            Metric::Cpu => &self.cpu,
            Metric::Memory => &self.memory,
            Metric::NetworkIn => &self.network_in,
            Metric::NetworkOut => &self.network_out,
            Metric::DiskReads => &self.disk_reads,
            Metric::DiskWrites => &self.disk_writes,
        }
    }

    pub fn series_mut(&mut self, metric: Metric) -> &mut Series {
        match metric {
            Metric::Cpu => &mut self.cpu,
            Metric::Memory => &mut self.memory,
            Metric::NetworkIn => &mut self.network_in,
            Metric::NetworkOut => &mut self.network_out,
            Metric::DiskReads => &mut self.disk_reads,
            Metric::DiskWrites => &mut self.disk_writes,
        }
    }

    /// Number of capture ticks
    pub fn len(&self) -> usize {
        Metric::ALL
            .iter()
            .map(|m| self.series(*m).len())
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn push_tick(&mut self, tick: Tick) {
        self.cpu.push(tick.cpu);
        self.memory.push(tick.memory);
        self.network_in.push(tick.network_in);
        self.network_out.push(tick.network_out);
        self.disk_reads.push(tick.disk_reads);
        self.disk_writes.push(tick.disk_writes);
    }
}

/// One parsed snapshot line
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tick {
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
    pub network_in: Option<f64>,
    pub network_out: Option<f64>,
    pub disk_reads: Option<f64>,
    pub disk_writes: Option<f64>,
}

/// min/max/mean/std-dev of the present values of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub samples: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Summaries for the instantaneous metrics of one container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub node: String,
    pub ticks: usize,
    pub missing_ticks: usize,
    pub cpu: Option<SeriesSummary>,
    pub memory: Option<SeriesSummary>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub report_dir: String,
    pub total_nodes: usize,
    pub aligned_length: usize,
    pub moving_average_window: Option<usize>,
}

/// Complete resource report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceReport {
    pub metadata: ReportMetadata,
    pub nodes: Vec<NodeSummary>,
}
