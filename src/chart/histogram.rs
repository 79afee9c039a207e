use std::collections::HashMap;

use serde::Serialize;

use crate::data::model::{CategoryColumn, ListingTable};

/// Declarative description of a stacked price histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSpec {
    pub title: String,
    pub x_label: &'static str,
    pub color_by: CategoryColumn,
    pub legend_title: String,
    pub bin_count: usize,
    /// Left edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    /// Fraction of each bin left empty between bars.
    pub bargap: f64,
    pub opacity: f32,
    pub marker_line_width: f32,
    /// One series per colour group, in order of first appearance.
    pub series: Vec<HistogramSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub name: String,
    /// Count per bin; always `bin_count` long.
    pub counts: Vec<u64>,
}

impl HistogramSpec {
    /// Centre of bin `i` on the price axis.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width
    }

    /// Number of rows counted across all series.
    pub fn total(&self) -> u64 {
        self.series.iter().flat_map(|s| s.counts.iter()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Build the price histogram for the filtered rows, grouped by `color_by`.
///
/// Rows without a price or without a value in the colour column are left
/// out. Bins are equal-width and span the plotted prices exactly.
pub fn build_histogram(
    table: &ListingTable,
    indices: &[usize],
    color_by: CategoryColumn,
    bin_count: usize,
) -> HistogramSpec {
    let bin_count = bin_count.max(1);
    let plotted: Vec<(f64, &str)> = table
        .rows(indices)
        .filter_map(|(_, l)| {
            let price = l.price.filter(|p| p.is_finite())?;
            Some((price, color_by.value(l)?))
        })
        .collect();

    let (start, bin_width) = bin_layout(plotted.iter().map(|(p, _)| *p), bin_count);

    let mut series: Vec<HistogramSeries> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for &(price, group) in &plotted {
        let s = *slot.entry(group).or_insert_with(|| {
            series.push(HistogramSeries {
                name: group.to_string(),
                counts: vec![0; bin_count],
            });
            series.len() - 1
        });
        let bin = (((price - start) / bin_width).floor() as usize).min(bin_count - 1);
        series[s].counts[bin] += 1;
    }

    log::info!(
        "Histogram: {} rows in {} groups by {}",
        plotted.len(),
        series.len(),
        color_by
    );

    HistogramSpec {
        title: format!("Price distribution by {}", color_by.label()),
        x_label: "price",
        color_by,
        legend_title: color_by.label(),
        bin_count,
        start,
        bin_width,
        bargap: 0.1,
        opacity: 0.8,
        marker_line_width: 0.5,
        series,
    }
}

/// `(start, width)` covering `[min, max]` of the values in `bins` bins.
fn bin_layout(values: impl Iterator<Item = f64>, bins: usize) -> (f64, f64) {
    let bounds = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    });
    match bounds {
        None => (0.0, 1.0),
        Some((lo, hi)) if hi > lo => (lo, (hi - lo) / bins as f64),
        // single distinct value: centre it in a unit-wide range
        Some((lo, _)) => (lo - 0.5, 1.0 / bins as f64),
    }
}
