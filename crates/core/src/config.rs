use crate::Pixels;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Configuration for an elevation-aware ruler. This mirrors the relevant
/// parts of the host's scene and grid settings, plus a few knobs that control
/// how measurements are presented.
///
/// Missing fields are populated with defaults when deserializing, so an empty
/// object is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RulerConfig {
    /// The grid that distances are measured on
    #[validate]
    pub grid: GridConfig,

    /// Config for the text shown on each measured segment
    #[validate]
    pub label: LabelConfig,

    /// Segments shorter than this (in pixels, after elevation is taken into
    /// account) are skipped entirely. They aren't drawn, labelled, or counted
    /// towards the total. This keeps a pile of zero-length labels from
    /// stacking up on a waypoint when the cursor hovers over it.
    #[validate(range(min = 0.0))]
    pub min_segment_length: f64,
}

/// Description of the host's grid. Both the planar distance rules and the
/// size of one elevation step come from here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GridConfig {
    pub kind: GridKind,

    /// Width (and height) of one grid cell, in pixels. This is also the
    /// height of one elevation step.
    #[validate(range(min = 1.0))]
    pub size: f64,

    /// Distance covered by crossing one grid cell, in grid units. E.g. 5 for
    /// the classic 5 foot square.
    #[validate(range(min = 0.0001))]
    pub distance: f64,

    /// Label for grid units, e.g. "ft" or "m". Appended to every distance.
    pub units: String,

    /// How diagonal steps are counted on square grids when measuring in
    /// whole grid spaces. Ignored for gridless scenes.
    pub diagonals: DiagonalRule,
}

/// Shape of the host's grid
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GridKind {
    /// No grid, all distances are straight lines
    Gridless,
    /// Square cells
    Square,
}

/// Rules for counting diagonal movement across a square grid
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiagonalRule {
    /// Every diagonal step costs one cell (AKA "5-5-5")
    #[serde(alias = "555")]
    #[strum(to_string = "equidistant", serialize = "555")]
    Equidistant,
    /// Every second diagonal step costs two cells (AKA "5-10-5")
    #[serde(alias = "5105")]
    #[strum(to_string = "alternating", serialize = "5105")]
    Alternating,
    /// Diagonal steps are measured by their true length, then the total is
    /// rounded to a whole number of grid units
    Euclidean,
}

/// Presentation options for segment labels
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LabelConfig {
    /// Number of decimal places to round distances to
    #[validate(range(min = 0, max = 6))]
    pub precision: u8,

    /// Prefix for segments that climb
    pub up_glyph: String,

    /// Prefix for segments that descend
    pub down_glyph: String,
}

impl RulerConfig {
    /// Validate this config, returning it if it's valid. The error can be
    /// downcast to [validator::ValidationErrors] to find the offending
    /// fields.
    pub fn validated(self) -> anyhow::Result<Self> {
        self.validate().context("invalid ruler config")?;
        Ok(self)
    }
}

impl GridConfig {
    /// Planar size of one grid cell. One elevation increment is one cell, so
    /// this is also the conversion from [Cells](crate::Cells) to pixels.
    pub fn cell_size(&self) -> Pixels {
        Pixels(self.size)
    }
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            label: LabelConfig::default(),
            min_segment_length: 10.0,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        // Matches the host's default scene
        Self {
            kind: GridKind::Square,
            size: 100.0,
            distance: 5.0,
            units: "ft".into(),
            diagonals: DiagonalRule::Equidistant,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            up_glyph: "↑".into(),
            down_glyph: "↓".into(),
        }
    }
}
