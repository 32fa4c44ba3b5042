//! SVG line charts for resource series.
//!
//! One chart per container per metric. Absent samples break the line.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};

use super::types::*;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const GRID_LINES: usize = 5;

/// A line to draw: label, stroke colour and values
pub struct Line<'a> {
    pub label: &'a str,
    pub color: &'a str,
    pub values: &'a Series,
}

/// Chart file name for a container and metric
pub fn chart_file_name(node: &str, metric: Metric) -> String {
    format!("stats-{}-{}.svg", node, metric.file_slug())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn value_range(lines: &[Line<'_>]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in lines.iter().flat_map(|l| l.values.iter().flatten()) {
        min = min.min(*v);
        max = max.max(*v);
    }
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }
    (min, max)
}

/// Render a chart with a title, axis labels, a grid and one polyline per run of present values
pub fn render_svg(title: &str, x_label: &str, y_label: &str, lines: &[Line<'_>]) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let points = lines.iter().map(|l| l.values.len()).max().unwrap_or(0);
    let (min, max) = value_range(lines);

    let x = |i: usize| {
        if points <= 1 {
            MARGIN_LEFT
        } else {
            MARGIN_LEFT + plot_w * i as f64 / (points - 1) as f64
        }
    };
    let y = |v: f64| MARGIN_TOP + plot_h * (1.0 - (v - min) / (max - min));

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n"
    ));
    svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\">{}</text>\n",
        WIDTH / 2.0,
        escape(title)
    ));

    // Grid
    for step in 0..=GRID_LINES {
        let value = min + (max - min) * step as f64 / GRID_LINES as f64;
        let gy = y(value);
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT}\" y1=\"{gy:.2}\" x2=\"{:.2}\" y2=\"{gy:.2}\" stroke=\"#dddddd\"/>\n",
            WIDTH - MARGIN_RIGHT
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-size=\"11\">{:.3}</text>\n",
            MARGIN_LEFT - 6.0,
            gy + 4.0,
            value
        ));
    }

    // Axes
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{:.2}\" stroke=\"black\"/>\n",
        HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{0:.2}\" x2=\"{1:.2}\" y2=\"{0:.2}\" stroke=\"black\"/>\n",
        HEIGHT - MARGIN_BOTTOM,
        WIDTH - MARGIN_RIGHT
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"13\">{}</text>\n",
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 12.0,
        escape(x_label)
    ));
    svg.push_str(&format!(
        "  <text x=\"16\" y=\"{0:.2}\" text-anchor=\"middle\" font-size=\"13\" transform=\"rotate(-90 16 {0:.2})\">{1}</text>\n",
        MARGIN_TOP + plot_h / 2.0,
        escape(y_label)
    ));

    for (n, line) in lines.iter().enumerate() {
        let mut run: Vec<String> = Vec::new();
        let mut runs: Vec<Vec<String>> = Vec::new();
        for (i, value) in line.values.iter().enumerate() {
            match value {
                Some(v) => run.push(format!("{:.2},{:.2}", x(i), y(*v))),
                None if !run.is_empty() => runs.push(std::mem::take(&mut run)),
                None => {}
            }
        }
        if !run.is_empty() {
            runs.push(run);
        }

        svg.push_str(&format!(
            "  <g stroke=\"{}\" fill=\"none\" stroke-width=\"1.5\">\n",
            line.color
        ));
        for run in runs {
            svg.push_str(&format!("    <polyline points=\"{}\"/>\n", run.join(" ")));
        }
        svg.push_str("  </g>\n");

        // Legend
        let ly = MARGIN_TOP + 14.0 * (n as f64 + 1.0);
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{ly:.2}\" text-anchor=\"end\" font-size=\"11\" fill=\"{}\">{}</text>\n",
            WIDTH - MARGIN_RIGHT - 4.0,
            line.color,
            escape(line.label)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write every metric chart of one container into `plots_dir`
pub fn write_node_charts(
    plots_dir: &Path,
    sample: &ResourceSample,
    cpu_moving_average: Option<&Series>,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(Metric::ALL.len());

    for metric in Metric::ALL {
        let mut lines = vec![Line {
            label: metric.label(),
            color: "#1f77b4",
            values: sample.series(metric),
        }];
        if let (Metric::Cpu, Some(avg)) = (metric, cpu_moving_average) {
            lines.push(Line {
                label: "Moving average",
                color: "#d62728",
                values: avg,
            });
        }

        let title = format!("{} - {} - {}", sample.node, metric, metric.kind());
        let y_label = format!("{} ({})", metric, metric.unit());
        let svg = render_svg(&title, "Time (s)", &y_label, &lines);

        let path = plots_dir.join(chart_file_name(&sample.node, metric));
        fs::write(&path, svg)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        log::debug!("Chart written to {}", path.display());
        written.push(path);
    }

    Ok(written)
}
