/// Chart data preparation: filtered rows → declarative chart specs.
///
/// Specs are plain serialisable values; `ui::plot` renders them and the
/// File menu can export them as JSON.

pub mod animation;
pub mod histogram;

use serde::Serialize;

use animation::{AnimationSpec, ColorSummary};
use histogram::HistogramSpec;

/// A built chart ready for rendering or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Histogram(HistogramSpec),
    Animation {
        spec: AnimationSpec,
        summary: ColorSummary,
    },
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Histogram(h) => &h.title,
            ChartSpec::Animation { spec, .. } => &spec.title,
        }
    }

    /// Pretty JSON for the export menu.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
