use std::collections::{BTreeMap, HashMap};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::data::derive::title_case;
use crate::data::model::{CategoryColumn, ListingTable};

/// Row cap applied to the scatter for render performance.
pub const DEFAULT_SAMPLE_CAP: usize = 3000;
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Largest bubble diameter in pixels.
const SIZE_MAX: f32 = 40.0;
const FRAME_DURATION_MS: u32 = 300;
const TRANSITION_DURATION_MS: u32 = 300;

// ---------------------------------------------------------------------------
// Animation-ready subset
// ---------------------------------------------------------------------------

/// One cleaned row of the animated scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimatedPoint {
    /// Index into the source table.
    pub row: usize,
    pub odometer: f64,
    pub price: f64,
    pub model_year: i32,
    /// `"{model} ({Manufacturer})"`.
    pub info: String,
    pub color_group: Option<String>,
    pub condition: Option<String>,
    pub fuel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationSubset {
    pub color_by: CategoryColumn,
    /// Sorted non-decreasing by `model_year`.
    pub points: Vec<AnimatedPoint>,
    /// Whether the row cap forced a random sample.
    pub sampled: bool,
}

/// Clean, cap and sort the filtered rows for the animated scatter.
///
/// Rows missing odometer, year, price or model are dropped, as are rows
/// with a non-positive odometer. Above `cap` rows a uniform sample of
/// exactly `cap` rows is drawn from an RNG seeded with `seed`.
pub fn prepare_animation_subset(
    table: &ListingTable,
    indices: &[usize],
    color_by: CategoryColumn,
    cap: usize,
    seed: u64,
) -> AnimationSubset {
    let mut cleaned: Vec<(usize, f64)> = table
        .rows(indices)
        .filter(|(_, l)| {
            l.odometer.is_some_and(|o| o > 0.0)
                && l.price.is_some_and(f64::is_finite)
                && l.model.is_some()
        })
        .filter_map(|(i, l)| l.model_year.filter(|y| y.is_finite()).map(|y| (i, y)))
        .collect();
    cleaned.sort_by(|a, b| a.1.total_cmp(&b.1));

    let available = cleaned.len();
    let sampled = available > cap;
    if sampled {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut picks = rand::seq::index::sample(&mut rng, cleaned.len(), cap).into_vec();
        picks.sort_unstable();
        cleaned = picks.into_iter().map(|p| cleaned[p]).collect();
        cleaned.sort_by(|a, b| a.1.total_cmp(&b.1));
        log::debug!("Sampled {cap} of {available} scatter rows (seed {seed})");
    }

    let points = cleaned
        .into_iter()
        .filter_map(|(row, year)| {
            let l = table.get(row)?;
            let model = l.model.clone()?;
            let manufacturer = l.manufacturer.as_deref().map(title_case);
            let info = match &manufacturer {
                Some(m) => format!("{model} ({m})"),
                None => model,
            };
            let color_group = match color_by {
                CategoryColumn::Manufacturer => manufacturer,
                other => other.value(l).map(str::to_string),
            };
            Some(AnimatedPoint {
                row,
                odometer: l.odometer?,
                price: l.price?,
                model_year: year as i32,
                info,
                color_group,
                condition: l.condition.clone(),
                fuel: l.fuel.clone(),
            })
        })
        .collect();

    AnimationSubset {
        color_by,
        points,
        sampled,
    }
}

// ---------------------------------------------------------------------------
// Colour-dimension summary
// ---------------------------------------------------------------------------

/// Distinct-value count and most frequent values of the colour dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorSummary {
    pub color_by: CategoryColumn,
    pub distinct: usize,
    /// Up to ten `(value, count)` pairs, most frequent first.
    pub top: Vec<(String, usize)>,
}

pub fn summarize(subset: &AnimationSubset) -> ColorSummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in &subset.points {
        if let Some(g) = p.color_group.as_deref() {
            *counts.entry(g).or_default() += 1;
        }
    }
    let distinct = counts.len();
    let mut top: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top.truncate(10);

    ColorSummary {
        color_by: subset.color_by,
        distinct,
        top,
    }
}

// ---------------------------------------------------------------------------
// Animated scatter spec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationFrame {
    /// Frame key; the year as text.
    pub name: String,
    pub year: i32,
    pub points: Vec<AnimatedPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderStep {
    pub label: String,
    /// Name of the frame this step jumps to.
    pub frame: String,
    pub method: &'static str,
    pub mode: &'static str,
    pub redraw: bool,
    pub frame_duration_ms: u32,
    pub transition_duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderSpec {
    pub prefix: &'static str,
    pub steps: Vec<SliderStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendSpec {
    pub title: String,
    pub orientation: &'static str,
    pub x: f32,
    pub y: f32,
}

/// Declarative description of the animated price-vs-odometer bubble chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationSpec {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub color_by: CategoryColumn,
    /// Colour groups in order of first appearance; drives the legend.
    pub color_groups: Vec<String>,
    pub legend: LegendSpec,
    pub size_max: f32,
    pub max_odometer: f64,
    pub opacity: f32,
    pub marker_line_width: f32,
    pub marker_line_color: &'static str,
    /// Fixed axis ranges so the view does not jump between frames.
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub hover_template: &'static str,
    /// One frame per distinct year, ascending.
    pub frames: Vec<AnimationFrame>,
    /// One step per frame, same order.
    pub slider: SliderSpec,
}

impl AnimationSpec {
    /// Bubble radius in pixels, area proportional to the odometer.
    pub fn bubble_radius(&self, odometer: f64) -> f32 {
        if self.max_odometer <= 0.0 {
            return 1.0;
        }
        let ratio = (odometer / self.max_odometer).clamp(0.0, 1.0) as f32;
        (self.size_max / 2.0 * ratio.sqrt()).max(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Build frames and slider steps in ascending year order.
pub fn build_animation(subset: &AnimationSubset) -> AnimationSpec {
    let color_by = subset.color_by;

    let mut by_year: BTreeMap<i32, Vec<AnimatedPoint>> = BTreeMap::new();
    for p in &subset.points {
        by_year.entry(p.model_year).or_default().push(p.clone());
    }
    let frames: Vec<AnimationFrame> = by_year
        .into_iter()
        .map(|(year, points)| AnimationFrame {
            name: year.to_string(),
            year,
            points,
        })
        .collect();

    let steps = frames
        .iter()
        .map(|f| SliderStep {
            label: f.name.clone(),
            frame: f.name.clone(),
            method: "animate",
            mode: "immediate",
            redraw: true,
            frame_duration_ms: FRAME_DURATION_MS,
            transition_duration_ms: TRANSITION_DURATION_MS,
        })
        .collect();

    let mut color_groups: Vec<String> = Vec::new();
    for g in subset.points.iter().filter_map(|p| p.color_group.as_ref()) {
        if !color_groups.contains(g) {
            color_groups.push(g.clone());
        }
    }

    let x_range = padded_range(subset.points.iter().map(|p| p.odometer));
    let y_range = padded_range(subset.points.iter().map(|p| p.price));
    let max_odometer = subset
        .points
        .iter()
        .map(|p| p.odometer)
        .fold(0.0, f64::max);

    log::info!(
        "Scatter: {} points in {} frames, {} colour groups",
        subset.points.len(),
        frames.len(),
        color_groups.len()
    );

    AnimationSpec {
        title: format!(
            "Price vs odometer by model year, coloured by {}",
            color_by.label()
        ),
        x_label: "odometer",
        y_label: "price",
        color_by,
        color_groups,
        legend: LegendSpec {
            title: color_by.label(),
            orientation: "v",
            x: 1.01,
            y: 1.0,
        },
        size_max: SIZE_MAX,
        max_odometer,
        opacity: 0.8,
        marker_line_width: 2.0,
        marker_line_color: "white",
        x_range,
        y_range,
        hover_template: "<b>{info}</b><br>Odometer: {odometer}<br>Price: ${price}<br>Condition: {condition}<br>Fuel: {fuel}",
        frames,
        slider: SliderSpec {
            prefix: "Year: ",
            steps,
        },
    }
}

/// `[min, max]` widened by 5% on each side.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let bounds = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    });
    match bounds {
        None => (0.0, 1.0),
        Some((lo, hi)) => {
            let pad = ((hi - lo) * 0.05).max(1.0);
            (lo - pad, hi + pad)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::data::model::Listing;

    fn all(table: &ListingTable) -> Vec<usize> {
        (0..table.len()).collect()
    }

    fn mixed_table() -> ListingTable {
        ListingTable::from_listings(vec![
            listing(Some("ford f-150"), Some(2015.0), Some("good"), Some(20000.0), Some(50000.0)),
            listing(Some("honda civic"), Some(2008.0), Some("fair"), Some(3000.0), Some(180000.0)),
            listing(Some("ford focus"), Some(2011.9), Some("good"), Some(6000.0), Some(0.0)),
            listing(Some("kia rio"), Some(2012.0), Some("good"), Some(6000.0), Some(-5.0)),
            listing(Some("kia soul"), Some(2012.0), Some("good"), None, Some(1000.0)),
            listing(Some("bmw x3"), None, Some("good"), Some(9000.0), Some(1000.0)),
            listing(None, Some(2012.0), Some("good"), Some(9000.0), Some(1000.0)),
            listing(Some("honda fit"), Some(2011.6), Some("excellent"), Some(7000.0), Some(70000.0)),
        ])
    }

    fn big_table(n: usize) -> ListingTable {
        let rows = (0..n)
            .map(|i| {
                listing(
                    Some(if i % 3 == 0 { "toyota corolla" } else { "chevrolet malibu" }),
                    Some(2000.0 + (i % 19) as f64),
                    Some("good"),
                    Some(1000.0 + i as f64),
                    Some(10.0 + i as f64),
                )
            })
            .collect();
        ListingTable::from_listings(rows)
    }

    #[test]
    fn cleaning_drops_missing_and_non_positive_rows() {
        let t = mixed_table();
        let subset = prepare_animation_subset(&t, &all(&t), CategoryColumn::Manufacturer, 3000, 42);

        let rows: Vec<usize> = subset.points.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![1, 7, 0]);
        assert!(!subset.sampled);
        for p in &subset.points {
            assert!(p.odometer > 0.0);
        }
    }

    #[test]
    fn years_are_sorted_and_truncated() {
        let t = mixed_table();
        let subset = prepare_animation_subset(&t, &all(&t), CategoryColumn::Manufacturer, 3000, 42);
        let years: Vec<i32> = subset.points.iter().map(|p| p.model_year).collect();
        assert_eq!(years, vec![2008, 2011, 2015]);
    }

    #[test]
    fn hover_info_and_color_group() {
        let t = mixed_table();
        let subset = prepare_animation_subset(&t, &[0], CategoryColumn::Manufacturer, 3000, 42);
        let p = &subset.points[0];
        assert_eq!(p.info, "Ford F-150 (Ford)");
        assert_eq!(p.color_group.as_deref(), Some("Ford"));

        let by_condition = prepare_animation_subset(&t, &[0], CategoryColumn::Condition, 3000, 42);
        assert_eq!(by_condition.points[0].color_group.as_deref(), Some("good"));
    }

    #[test]
    fn small_subsets_are_kept_whole() {
        let t = big_table(3000);
        let subset = prepare_animation_subset(&t, &all(&t), CategoryColumn::Manufacturer, 3000, 42);
        assert_eq!(subset.points.len(), 3000);
        assert!(!subset.sampled);
    }

    #[test]
    fn large_subsets_are_capped_and_sorted() {
        let t = big_table(5000);
        let subset = prepare_animation_subset(&t, &all(&t), CategoryColumn::Manufacturer, 3000, 42);
        assert_eq!(subset.points.len(), 3000);
        assert!(subset.sampled);
        assert!(subset.points.windows(2).all(|w| w[0].model_year <= w[1].model_year));

        let mut rows: Vec<usize> = subset.points.iter().map(|p| p.row).collect();
        rows.sort_unstable();
        rows.dedup();
        assert_eq!(rows.len(), 3000);
    }

    #[test]
    fn sampling_is_reproducible_per_seed() {
        let t = big_table(4000);
        let idx = all(&t);
        let a = prepare_animation_subset(&t, &idx, CategoryColumn::Fuel, 100, 7);
        let b = prepare_animation_subset(&t, &idx, CategoryColumn::Fuel, 100, 7);
        let c = prepare_animation_subset(&t, &idx, CategoryColumn::Fuel, 100, 8);
        assert_eq!(a, b);
        assert_ne!(a.points, c.points);
    }

    #[test]
    fn summary_counts_top_values() {
        let t = big_table(30);
        let subset = prepare_animation_subset(&t, &all(&t), CategoryColumn::Manufacturer, 3000, 42);
        let summary = summarize(&subset);
        assert_eq!(summary.distinct, 2);
        assert_eq!(
            summary.top,
            vec![("Chevrolet".to_string(), 20), ("Toyota".to_string(), 10)]
        );
    }

    #[test]
    fn summary_keeps_ten_entries() {
        let rows = (0..15)
            .map(|i| Listing {
                model: Some(format!("make{i} thing")),
                model_year: Some(2010.0),
                price: Some(100.0),
                odometer: Some(10.0),
                ..Default::default()
            })
            .collect();
        let t = ListingTable::from_listings(rows);
        let subset = prepare_animation_subset(&t, &all(&t), CategoryColumn::Manufacturer, 3000, 42);
        let summary = summarize(&subset);
        assert_eq!(summary.distinct, 15);
        assert_eq!(summary.top.len(), 10);
    }

    #[test]
    fn frames_and_steps_follow_year_order() {
        let t = big_table(500);
        let subset = prepare_animation_subset(&t, &all(&t), CategoryColumn::Manufacturer, 100, 42);
        let spec = build_animation(&subset);

        let years: Vec<i32> = spec.frames.iter().map(|f| f.year).collect();
        let mut sorted = years.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(years, sorted);

        let labels: Vec<&str> = spec.slider.steps.iter().map(|s| s.label.as_str()).collect();
        let names: Vec<&str> = spec.frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(labels, names);
        assert_eq!(spec.frames.iter().map(|f| f.points.len()).sum::<usize>(), 100);
        assert_eq!(spec.slider.prefix, "Year: ");
        assert!(spec.slider.steps.iter().all(|s| s.frame_duration_ms == 300 && s.redraw));
    }

    #[test]
    fn legend_and_bubbles() {
        let t = mixed_table();
        let subset = prepare_animation_subset(&t, &all(&t), CategoryColumn::Manufacturer, 3000, 42);
        let spec = build_animation(&subset);

        assert_eq!(spec.color_groups, ["Honda", "Ford"]);
        assert_eq!(spec.legend.title, "Manufacturer");
        assert_eq!(spec.max_odometer, 180000.0);
        assert_eq!(spec.bubble_radius(180000.0), 20.0);
        assert!(spec.bubble_radius(50000.0) < 20.0);
        assert!(spec.x_range.0 < 50000.0 && spec.x_range.1 > 180000.0);
    }

    #[test]
    fn empty_subset_has_no_frames() {
        let t = mixed_table();
        let subset = prepare_animation_subset(&t, &[], CategoryColumn::Fuel, 3000, 42);
        let spec = build_animation(&subset);
        assert!(spec.is_empty());
        assert!(spec.slider.steps.is_empty());
        assert_eq!(summarize(&subset).distinct, 0);
    }
}
