//! Elevation-aware distance measurement for grid-based rulers. A ruler path
//! is a series of waypoints on a 2D canvas, but the things being measured
//! (tokens, creatures, whatever) can also climb and descend along the way.
//! This crate folds those elevation changes into the path so that the host's
//! existing 2D distance rules still apply, but the distances come out the
//! same as if the path had been measured in 3D.
//!
//! ```
//! use elevation_ruler::{
//!     GridMeasurer, MeasurementSession, Point2, RulerConfig,
//! };
//!
//! let config = RulerConfig::default();
//! let native = GridMeasurer::new(config.grid.clone())?;
//! let mut session = MeasurementSession::new();
//!
//! session.start(Point2::new(0.0, 0.0));
//! session.raise();
//! let measurement = session
//!     .measure(Point2::new(300.0, 400.0), &config, &native, false)?
//!     .expect("session is active");
//! for segment in measurement.visible_segments() {
//!     println!("{}", segment.label.as_deref().unwrap_or_default());
//! }
//! # Ok::<(), elevation_ruler::anyhow::Error>(())
//! ```
//!
//! See [RulerConfig] for details on how the grid and labels can be
//! customized, and [geometry] for how the projection works.

pub mod geometry;
pub mod measure;
mod config;
mod session;
mod util;

pub use crate::{
    config::{DiagonalRule, GridConfig, GridKind, LabelConfig, RulerConfig},
    geometry::{project_elevation, Point2, Segment, Vector2},
    measure::{
        ElevationMeasurer, GridMeasurer, LabelFormatter, Measurement,
        RulerPath, SegmentMeasurement, SegmentMeasurer,
    },
    session::{CommittedPath, MeasurementSession, SessionState, Termination},
    util::{
        pairwise, round_to,
        unit::{Cells, Pixels},
    },
};

// Re-export these so downstream crates don't need to depend on them directly
pub use anyhow;
pub use validator;
