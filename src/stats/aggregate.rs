//! Alignment and summary statistics over parsed resource samples.

use super::types::*;

/// Default trailing window for the CPU moving average
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 20;

/// Longest series length across all samples
pub fn longest_len(samples: &[ResourceSample]) -> usize {
    samples.iter().map(ResourceSample::len).max().unwrap_or(0)
}

/// Left-pad a series with [`PADDING`] up to `len`
pub fn left_pad(series: &Series, len: usize) -> Series {
    let missing = len.saturating_sub(series.len());
    let mut padded = Vec::with_capacity(missing + series.len());
    padded.resize(missing, PADDING);
    padded.extend_from_slice(series);
    padded
}

/// Left-pad every series of every sample to the longest length.
///
/// Captures start at different ticks but stop together, so the most recent
/// ends are aligned. Returns the common length.
pub fn align_series(samples: &mut [ResourceSample]) -> usize {
    let len = longest_len(samples);
    for sample in samples.iter_mut() {
        for metric in Metric::ALL {
            let padded = left_pad(sample.series(metric), len);
            *sample.series_mut(metric) = padded;
        }
    }
    len
}

/// Population statistics over the present values, `None` if there are none
pub fn summarize_series(series: &Series) -> Option<SeriesSummary> {
    let values: Vec<f64> = series.iter().flatten().copied().collect();
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;

    Some(SeriesSummary {
        samples: values.len(),
        min,
        max,
        mean,
        std_dev: variance.sqrt(),
    })
}

/// Summaries for CPU and memory; call before [`align_series`] so padding is not counted
pub fn summarize(sample: &ResourceSample) -> NodeSummary {
    NodeSummary {
        node: sample.node.clone(),
        ticks: sample.len(),
        missing_ticks: sample.cpu.iter().filter(|v| v.is_none()).count(),
        cpu: summarize_series(&sample.cpu),
        memory: summarize_series(&sample.memory),
    }
}

/// Trailing moving average with a running sum.
///
/// Position `i` averages the present values in `series[i + 1 - window ..= i]`;
/// it is `None` until the first full window or when the window holds no values.
pub fn moving_average(series: &Series, window: usize) -> Series {
    if window == 0 {
        return vec![None; series.len()];
    }

    let mut out = Vec::with_capacity(series.len());
    let mut sum = 0.0;
    let mut count = 0usize;

    for (i, value) in series.iter().enumerate() {
        if let Some(v) = value {
            sum += v;
            count += 1;
        }
        if i >= window {
            if let Some(old) = series[i - window] {
                sum -= old;
                count -= 1;
            }
        }

        if i + 1 >= window && count > 0 {
            out.push(Some(sum / count as f64));
        } else {
            out.push(None);
        }
    }

    out
}
