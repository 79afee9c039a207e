use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Corner, Legend, Plot, PlotPoint, Points};

use crate::chart::animation::{AnimationSpec, ColorSummary};
use crate::chart::histogram::HistogramSpec;
use crate::chart::ChartSpec;
use crate::color::ColorMap;
use crate::state::{AppState, Interaction};
use crate::ui::table::preview_table;

const PLOT_HEIGHT: f32 = 460.0;

// ---------------------------------------------------------------------------
// Central panel: preview, chart buttons, chart
// ---------------------------------------------------------------------------

/// Render the central dashboard panel.
pub fn dashboard(ui: &mut Ui, state: &AppState, events: &mut Vec<Interaction>) {
    ui.heading("Used vehicle listings");
    ui.add_space(4.0);

    ui.strong("First rows of the filtered listings");
    preview_table(ui, &state.table, &state.visible_indices, state.config.preview_rows);
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Show price histogram").clicked() {
            events.push(Interaction::ShowHistogram);
        }
        if ui.button("Show animated scatter").clicked() {
            events.push(Interaction::ShowAnimation);
        }
    });
    ui.add_space(4.0);

    let Some(chart) = &state.chart else {
        return;
    };
    let Some(colors) = &state.color_map else {
        return;
    };

    match chart {
        ChartSpec::Histogram(spec) => histogram_plot(ui, spec, colors),
        ChartSpec::Animation { spec, summary } => {
            summary_text(ui, summary);
            frame_controls(ui, spec, state, events);
            animation_plot(ui, spec, state.playback.frame, colors);
        }
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

pub fn histogram_plot(ui: &mut Ui, spec: &HistogramSpec, colors: &ColorMap) {
    ui.strong(&spec.title);
    if spec.is_empty() {
        ui.label("No data to plot.");
    } else {
        ui.label(format!("{} listings plotted", spec.total()));
    }

    let bar_width = spec.bin_width * (1.0 - spec.bargap);
    let mut charts: Vec<BarChart> = Vec::with_capacity(spec.series.len());
    for series in &spec.series {
        let bars: Vec<Bar> = series
            .counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                Bar::new(spec.bin_center(i), count as f64)
                    .width(bar_width)
                    .stroke(egui::Stroke::new(spec.marker_line_width, Color32::WHITE))
            })
            .collect();
        let color = colors.color_for(Some(&series.name)).gamma_multiply(spec.opacity);
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&series.name)
            .color(color)
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new("price_histogram")
        .height(PLOT_HEIGHT)
        .legend(Legend::default().position(Corner::RightTop))
        .x_axis_label(spec.x_label)
        .y_axis_label("count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Animated scatter
// ---------------------------------------------------------------------------

fn summary_text(ui: &mut Ui, summary: &ColorSummary) {
    let label = summary.color_by.label();
    ui.label(RichText::new(format!(
        "Distinct {label} values in the filtered data: {}",
        summary.distinct
    )));
    ui.label(format!("Top {} {label} values:", summary.top.len()));
    for (value, count) in &summary.top {
        ui.label(format!("• {value}: {count} listings"));
    }
    ui.add_space(4.0);
}

fn frame_controls(ui: &mut Ui, spec: &AnimationSpec, state: &AppState, events: &mut Vec<Interaction>) {
    if spec.is_empty() {
        return;
    }
    let last = spec.frames.len() - 1;
    ui.horizontal(|ui: &mut Ui| {
        let play_label = if state.playback.playing { "⏸ Pause" } else { "▶ Play" };
        if ui.button(play_label).clicked() {
            events.push(Interaction::TogglePlayback);
        }

        let mut frame = state.playback.frame.min(last);
        let steps = &spec.slider.steps;
        let slider = egui::Slider::new(&mut frame, 0..=last)
            .prefix(spec.slider.prefix)
            .custom_formatter(|v, _| {
                steps
                    .get(v as usize)
                    .map(|s| s.label.clone())
                    .unwrap_or_default()
            })
            .custom_parser(|text| {
                steps
                    .iter()
                    .position(|s| s.label == text.trim())
                    .map(|i| i as f64)
            });
        if ui.add(slider).changed() {
            events.push(Interaction::SeekFrame(frame));
        }
    });
}

pub fn animation_plot(ui: &mut Ui, spec: &AnimationSpec, frame: usize, colors: &ColorMap) {
    ui.strong(&spec.title);
    let Some(current) = spec.frames.get(frame).or_else(|| spec.frames.last()) else {
        ui.label("No data to plot.");
        return;
    };

    // hover text keyed by exact plotted coordinates
    let hover: Vec<([f64; 2], String)> = current
        .points
        .iter()
        .map(|p| {
            let text = format!(
                "{}\nOdometer: {}\nPrice: ${}\nCondition: {}\nFuel: {}",
                p.info,
                thousands(p.odometer),
                thousands(p.price),
                p.condition.as_deref().unwrap_or(""),
                p.fuel.as_deref().unwrap_or(""),
            );
            ([p.odometer, p.price], text)
        })
        .collect();

    ui.label(RichText::new(format!("Legend: {}", spec.legend.title)).weak());
    Plot::new("price_vs_odometer")
        .height(PLOT_HEIGHT)
        .legend(Legend::default().position(Corner::RightTop))
        .x_axis_label(spec.x_label)
        .y_axis_label(spec.y_label)
        .include_x(spec.x_range.0)
        .include_x(spec.x_range.1)
        .include_y(spec.y_range.0)
        .include_y(spec.y_range.1)
        .label_formatter(move |_name: &str, value: &PlotPoint| {
            hover
                .iter()
                .find(|(xy, _)| xy[0] == value.x && xy[1] == value.y)
                .map(|(_, text)| text.clone())
                .unwrap_or_else(|| format!("odometer {}\nprice {}", thousands(value.x), thousands(value.y)))
        })
        .show(ui, |plot_ui| {
            for p in &current.points {
                let radius = spec.bubble_radius(p.odometer);
                let group = p.color_group.as_deref();
                let color = colors.color_for(group).gamma_multiply(spec.opacity);

                plot_ui.points(
                    Points::new(vec![[p.odometer, p.price]])
                        .radius(radius + spec.marker_line_width / 2.0)
                        .color(Color32::WHITE)
                        .filled(true),
                );
                plot_ui.points(
                    Points::new(vec![[p.odometer, p.price]])
                        .radius(radius)
                        .color(color)
                        .filled(true)
                        .name(group.unwrap_or("")),
                );
            }
        });
}

/// `1234567.8` → `"1,234,568"`.
pub fn thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::thousands;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(1234567.8), "1,234,568");
        assert_eq!(thousands(-45000.0), "-45,000");
    }
}
