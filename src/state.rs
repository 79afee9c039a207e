use crate::chart::animation::{build_animation, prepare_animation_subset, summarize};
use crate::chart::histogram::build_histogram;
use crate::chart::ChartSpec;
use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::filter::FilterState;
use crate::data::model::ListingTable;

// ---------------------------------------------------------------------------
// Interaction events
// ---------------------------------------------------------------------------

/// Everything the UI can ask the application to do. Widgets never touch
/// the state directly; they emit one of these.
#[derive(Debug, Clone)]
pub enum Interaction {
    /// New filter selection from the side panel.
    FiltersChanged(FilterState),
    ShowHistogram,
    ShowAnimation,
    /// A different listings file was opened.
    DatasetLoaded(ListingTable),
    /// Jump the scatter animation to a frame.
    SeekFrame(usize),
    TogglePlayback,
    /// Clock tick, seconds since start.
    Tick(f64),
}

// ---------------------------------------------------------------------------
// Animation playback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playback {
    pub frame: usize,
    pub playing: bool,
    /// Time of the last frame change while playing.
    last_advance: Option<f64>,
}

impl Playback {
    /// Advance one frame once `step_secs` has elapsed. Stops on the last frame.
    fn tick(&mut self, now: f64, step_secs: f64, frame_count: usize) {
        if !self.playing {
            return;
        }
        let Some(last) = self.last_advance else {
            self.last_advance = Some(now);
            return;
        };
        if now - last < step_secs {
            return;
        }
        if self.frame + 1 < frame_count {
            self.frame += 1;
            self.last_advance = Some(now);
        } else {
            self.playing = false;
            self.last_advance = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset; immutable, replaced wholesale by File → Open.
    pub table: ListingTable,

    /// Current filter selections.
    pub filters: FilterState,

    /// Indices of listings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// The chart built by the last button press, if still valid.
    pub chart: Option<ChartSpec>,

    /// Colours for the chart's groups.
    pub color_map: Option<ColorMap>,

    pub playback: Playback,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, table: ListingTable) -> Self {
        let mut state = Self {
            config,
            table: ListingTable::default(),
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            chart: None,
            color_map: None,
            playback: Playback::default(),
            status_message: None,
        };
        state.set_dataset(table);
        state
    }

    /// Process one interaction event.
    pub fn handle(&mut self, event: Interaction) {
        match event {
            Interaction::FiltersChanged(filters) => {
                if filters != self.filters {
                    self.filters = filters;
                    self.refilter();
                    self.clear_chart();
                }
            }
            Interaction::ShowHistogram => self.show_histogram(),
            Interaction::ShowAnimation => self.show_animation(),
            Interaction::DatasetLoaded(table) => self.set_dataset(table),
            Interaction::SeekFrame(frame) => {
                let last = self.frame_count().saturating_sub(1);
                self.playback.frame = frame.min(last);
                self.playback.playing = false;
            }
            Interaction::TogglePlayback => {
                let count = self.frame_count();
                if count == 0 {
                    return;
                }
                if !self.playback.playing && self.playback.frame + 1 >= count {
                    self.playback.frame = 0;
                }
                self.playback.playing = !self.playback.playing;
                self.playback.last_advance = None;
            }
            Interaction::Tick(now) => {
                let step = self.frame_step_secs();
                let count = self.frame_count();
                self.playback.tick(now, step, count);
            }
        }
    }

    /// Ingest a newly loaded table and reset filters to "everything".
    fn set_dataset(&mut self, table: ListingTable) {
        self.filters = FilterState::select_all(&table);
        self.table = table;
        self.refilter();
        self.clear_chart();
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a filter change.
    fn refilter(&mut self) {
        self.visible_indices = self.filters.apply(&self.table);
        log::debug!(
            "Filter {:?}: {} of {} listings",
            self.filters.year_range,
            self.visible_indices.len(),
            self.table.len()
        );
    }

    fn clear_chart(&mut self) {
        self.chart = None;
        self.color_map = None;
        self.playback = Playback::default();
    }

    fn show_histogram(&mut self) {
        let spec = build_histogram(
            &self.table,
            &self.visible_indices,
            self.filters.color_by,
            self.config.histogram_bins,
        );
        let groups: Vec<String> = spec.series.iter().map(|s| s.name.clone()).collect();
        self.color_map = Some(ColorMap::new(&groups));
        self.playback = Playback::default();
        self.chart = Some(ChartSpec::Histogram(spec));
    }

    fn show_animation(&mut self) {
        let subset = prepare_animation_subset(
            &self.table,
            &self.visible_indices,
            self.filters.color_by,
            self.config.sample_cap,
            self.config.sample_seed,
        );
        let summary = summarize(&subset);
        let spec = build_animation(&subset);
        self.color_map = Some(ColorMap::new(&spec.color_groups));
        self.playback = Playback::default();
        self.chart = Some(ChartSpec::Animation { spec, summary });
    }

    /// Number of animation frames in the current chart (0 for histograms).
    pub fn frame_count(&self) -> usize {
        match &self.chart {
            Some(ChartSpec::Animation { spec, .. }) => spec.frames.len(),
            _ => 0,
        }
    }

    /// Seconds per frame while playing: frame plus transition duration.
    pub fn frame_step_secs(&self) -> f64 {
        match &self.chart {
            Some(ChartSpec::Animation { spec, .. }) => spec
                .slider
                .steps
                .get(self.playback.frame)
                .map(|s| f64::from(s.frame_duration_ms + s.transition_duration_ms) / 1000.0)
                .unwrap_or(0.6),
            _ => 0.6,
        }
    }
}
