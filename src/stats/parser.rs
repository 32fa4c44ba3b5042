//! Parsing of captured `docker stats` snippets.
//!
//! Each capture tick is one line of four `:`-separated fields:
//! `CPU%:MEM USAGE / LIMIT:NET IN / OUT:BLOCK READ / WRITE`, e.g.
//! `1.25%:512MiB / 7.6GiB:1.2kB / 3MB:0B / 12.3MB`.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use color_eyre::eyre::{Context, Result};
use regex::Regex;

use super::types::*;
use crate::error::GenError;

const FIELDS_PER_TICK: usize = 4;

/// Compiled regex patterns for resource usage fields
pub struct StatPatterns {
    /// Match: "12.5%"
    pub cpu: Regex,
    /// Match the usage part of "512MiB / 1GiB"
    pub memory: Regex,
    /// Match: "1.2kB", "3MB", "0B"
    pub size: Regex,
    /// Terminal clear-screen sequence written before every snapshot
    pub clear_screen: Regex,
}

impl StatPatterns {
    pub fn new() -> Self {
        Self {
            cpu: Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*%\s*$").expect("Invalid cpu regex"),
            memory: Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*(GiB|MiB|KiB|B)\s*/")
                .expect("Invalid memory regex"),
            size: Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*(GB|MB|kB|B)\s*$")
                .expect("Invalid size regex"),
            clear_screen: Regex::new(r"\x1b?\[2J\x1b?\[H").expect("Invalid clear_screen regex"),
        }
    }
}

impl Default for StatPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<StatPatterns> = LazyLock::new(StatPatterns::new);

/// Parse a CPU percentage such as "12.5%"
pub fn parse_cpu(field: &str) -> Option<f64> {
    let caps = PATTERNS.cpu.captures(field)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Convert the usage part of a "usage / limit" memory field to GiB
pub fn memory_to_gib(field: &str) -> Option<f64> {
    let caps = PATTERNS.memory.captures(field)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let gib = match caps.get(2)?.as_str() {
        "GiB" => value,
        "MiB" => value / 1024.0,
        "KiB" => value / (1024.0 * 1024.0),
        _ => value / (1024.0 * 1024.0 * 1024.0),
    };
    Some(gib)
}

/// Convert a network or block I/O amount to MB
pub fn size_to_mb(field: &str) -> Option<f64> {
    let caps = PATTERNS.size.captures(field)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let mb = match caps.get(2)?.as_str() {
        "GB" => value * 1024.0,
        "MB" => value,
        "kB" => value / 1024.0,
        _ => value / (1024.0 * 1024.0),
    };
    Some(mb)
}

/// "--", "-- / --" and friends: the container had not reported yet
fn is_placeholder(field: &str) -> bool {
    let trimmed = field.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| matches!(c, '-' | '/' | ' '))
}

fn split_pair<'a>(
    field: &'a str,
    what: &str,
    line_number: usize,
    line: &str,
) -> Result<(&'a str, &'a str), GenError> {
    let mut parts = field.split(" / ");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        _ => Err(GenError::MalformedMetricLine {
            line_number,
            line: line.to_string(),
            reason: format!("{} field '{}' is not 'a / b'", what, field),
        }),
    }
}

fn unit_error(line_number: usize, line: &str, what: &str, field: &str) -> GenError {
    GenError::MalformedMetricLine {
        line_number,
        line: line.to_string(),
        reason: format!("unrecognized {} value '{}'", what, field.trim()),
    }
}

/// Parse one snapshot line; `line_number` is 1-based and only labels errors
pub fn parse_tick(line: &str, line_number: usize) -> Result<Tick, GenError> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() != FIELDS_PER_TICK {
        return Err(GenError::MalformedMetricLine {
            line_number,
            line: line.to_string(),
            reason: format!("expected {} fields, found {}", FIELDS_PER_TICK, fields.len()),
        });
    }

    if fields.iter().all(|f| is_placeholder(f)) {
        return Ok(Tick::default());
    }

    let cpu = parse_cpu(fields[0]).ok_or_else(|| unit_error(line_number, line, "cpu", fields[0]))?;
    let memory =
        memory_to_gib(fields[1]).ok_or_else(|| unit_error(line_number, line, "memory", fields[1]))?;

    let (net_in, net_out) = split_pair(fields[2], "network", line_number, line)?;
    let (disk_read, disk_write) = split_pair(fields[3], "block I/O", line_number, line)?;
    let size = |field: &str, what: &str| {
        size_to_mb(field).ok_or_else(|| unit_error(line_number, line, what, field))
    };

    Ok(Tick {
        cpu: Some(cpu),
        memory: Some(memory),
        network_in: Some(size(net_in, "network in")?),
        network_out: Some(size(net_out, "network out")?),
        disk_reads: Some(size(disk_read, "disk read")?),
        disk_writes: Some(size(disk_write, "disk write")?),
    })
}

/// Parse the full text captured for one container
pub fn parse_stats(node: &str, text: &str) -> Result<ResourceSample, GenError> {
    let cleaned = PATTERNS.clear_screen.replace_all(text, "");
    let mut sample = ResourceSample::new(node);

    for (i, line) in cleaned.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        sample.push_tick(parse_tick(line, i + 1)?);
    }

    Ok(sample)
}

/// Parse `stats-{node}.txt`
pub fn parse_stats_file(path: &Path, node: &str) -> Result<ResourceSample> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open stats file: {}", path.display()))?;
    let sample = parse_stats(node, &text)
        .with_context(|| format!("Failed to parse stats file: {}", path.display()))?;
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_memory_units() {
        assert!(close(memory_to_gib("512MiB / 1GiB").unwrap(), 0.5));
        assert!(close(memory_to_gib("2GiB / 4GiB").unwrap(), 2.0));
        assert!(close(memory_to_gib("100KiB / 1MiB").unwrap(), 100.0 / 1_048_576.0));
        assert!(memory_to_gib("12MB / 1GiB").is_none());
    }

    #[test]
    fn test_size_units() {
        assert!(close(size_to_mb("1.5GB").unwrap(), 1536.0));
        assert!(close(size_to_mb("3MB").unwrap(), 3.0));
        assert!(close(size_to_mb("512kB").unwrap(), 0.5));
        assert!(close(size_to_mb("0B").unwrap(), 0.0));
        assert!(close(size_to_mb(" 1048576B").unwrap(), 1.0));
        assert!(size_to_mb("3MiB").is_none());
    }

    #[test]
    fn test_parse_stats() {
        let text = "\x1b[2J\x1b[H0.50%:512MiB / 7.6GiB:1.2kB / 3MB:0B / 12.3MB\n\
                    \x1b[2J\x1b[H--:-- / --:--:--\n\
                    [2J[H12.25%:1GiB / 7.6GiB:2MB / 1GB:4kB / 13MB\n";
        let sample = parse_stats("peer1-org1", text).unwrap();

        assert_eq!(sample.len(), 3);
        assert_eq!(sample.cpu, vec![Some(0.5), None, Some(12.25)]);
        assert_eq!(sample.memory, vec![Some(0.5), None, Some(1.0)]);
        assert_eq!(sample.network_out, vec![Some(3.0), None, Some(1024.0)]);
        assert_eq!(sample.disk_reads[2], Some(4.0 / 1024.0));
        assert_eq!(sample.disk_writes[1], None);
    }

    #[test]
    fn test_malformed_lines() {
        let err = parse_stats("n", "1%:1GiB / 2GiB:1MB / 1MB\n").unwrap_err();
        assert!(matches!(err, GenError::MalformedMetricLine { line_number: 1, .. }));

        let text = "1%:1GiB / 2GiB:1MB / 1MB:1MB / 1MB\n1%:1XB / 2GiB:1MB / 1MB:1MB / 1MB\n";
        let err = parse_stats("n", text).unwrap_err();
        match err {
            GenError::MalformedMetricLine { line_number, reason, .. } => {
                assert_eq!(line_number, 2);
                assert!(reason.contains("memory"));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(parse_stats("n", "1%:1GiB / 2GiB:1MB:1MB / 1MB\n").is_err());
    }

    #[test]
    fn test_empty_input() {
        let sample = parse_stats("n", "\n\n").unwrap();
        assert!(sample.is_empty());
    }
}
