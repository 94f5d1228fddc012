//! Distance measurement for ruler paths that change elevation along the way.
//!
//! The host already knows how to measure planar segments on its grid (see
//! [SegmentMeasurer]), and we want to keep using its rules for that. So
//! rather than measuring anything ourselves, each leg of the path is
//! [projected](crate::project_elevation) into an equivalent planar leg that
//! has the same length as the true 3D leg, and the host measures that
//! instead. The original legs are kept around for display, since the
//! projected ones point off into nowhere.
//!
//! When nothing in the path changes elevation, we skip all of that and
//! measure exactly the way the host would have without us.

mod grid;
mod label;

pub use self::{grid::GridMeasurer, label::LabelFormatter};
use crate::{util::pairwise, Cells, Point2, RulerConfig, Segment};
use anyhow::{ensure, Context};
use log::trace;
use serde::{Deserialize, Serialize};
use std::iter;
use validator::Validate;

/// The host's native distance measurer. Given a batch of planar segments,
/// return the distance covered by each one, in grid units.
///
/// `grid_spaces` indicates whether distances should snap to whole grid
/// cells, or be measured as straight lines.
pub trait SegmentMeasurer {
    fn measure_distances(
        &self,
        segments: &[Segment],
        grid_spaces: bool,
    ) -> anyhow::Result<Vec<f64>>;
}

/// A path to be measured: a series of committed waypoints, plus the live
/// destination under the cursor. Each point carries the number of cells of
/// elevation gained (or lost) to reach it from the previous point.
#[derive(Copy, Clone, Debug)]
pub struct RulerPath<'a> {
    waypoints: &'a [Point2],
    increments: &'a [Cells],
    destination: Point2,
    pending: Cells,
}

impl<'a> RulerPath<'a> {
    /// Build a path. `increments` must line up one-to-one with `waypoints`,
    /// and since the first waypoint is where the path starts, it can't have
    /// an elevation change.
    pub fn new(
        waypoints: &'a [Point2],
        increments: &'a [Cells],
        destination: Point2,
        pending: Cells,
    ) -> anyhow::Result<Self> {
        ensure!(
            waypoints.len() == increments.len(),
            "got {} waypoints but {} elevation increments",
            waypoints.len(),
            increments.len()
        );
        if let Some(first) = increments.first() {
            ensure!(
                first.is_zero(),
                "path origin must have no elevation change, but had {}",
                first
            );
        }

        Ok(Self {
            waypoints,
            increments,
            destination,
            pending,
        })
    }

    pub fn waypoints(&self) -> &'a [Point2] {
        self.waypoints
    }

    pub fn increments(&self) -> &'a [Cells] {
        self.increments
    }

    pub fn destination(&self) -> Point2 {
        self.destination
    }

    pub fn pending(&self) -> Cells {
        self.pending
    }

    /// Does this path stay at a single elevation the whole way? This
    /// includes the pending change for the destination.
    pub fn is_flat(&self) -> bool {
        self.pending.is_zero() && self.increments.iter().all(|i| i.is_zero())
    }

    /// Net elevation change from the origin to the destination
    pub fn total_elevation(&self) -> Cells {
        self.increments.iter().copied().sum::<Cells>() + self.pending
    }

    /// Iterate over each leg of this path, along with the elevation change
    /// for that leg. A path with `n` waypoints has `n` legs, the last of which
    /// ends at the destination.
    pub fn legs(&self) -> impl Iterator<Item = (Segment, Cells)> + 'a {
        let destination = self.destination;
        let segments = pairwise(self.waypoints)
            .map(|(origin, destination)| Segment::new(*origin, *destination))
            .chain(
                self.waypoints
                    .last()
                    .map(move |last| Segment::new(*last, destination)),
            );
        // The elevation for a leg is stored on the point at its far end
        let elevations = self
            .increments
            .iter()
            .copied()
            .chain(iter::once(self.pending))
            .skip(1);

        segments.zip(elevations)
    }
}

/// The outcome of measuring one leg of a path
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentMeasurement {
    /// The leg as the user drew it. This is what should be rendered.
    pub ray: Segment,
    /// The leg after folding its elevation into the plane. This is what was
    /// actually measured. Same as `ray` when the leg is flat.
    pub measured_ray: Segment,
    /// Elevation change over this leg
    pub elevation: Cells,
    /// Measured distance, in grid units. Zero if the segment was too short to
    /// be shown.
    pub distance: f64,
    /// Should this segment be drawn and labelled? Segments that are too short
    /// are hidden, and don't count towards the total.
    pub visible: bool,
    /// Is this the final visible segment of the path? The last segment's
    /// label includes the path total.
    pub last: bool,
    /// Text to display with the segment. Only visible segments get a label.
    pub label: Option<String>,
}

/// The outcome of measuring an entire path
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// One entry per leg of the path, in order, including hidden ones
    pub segments: Vec<SegmentMeasurement>,
    /// Sum of all visible segment distances, in grid units
    pub total_distance: f64,
    /// Sum of elevation changes over all visible segments. Hidden segments
    /// are left out so that this matches the label on the last segment. This
    /// can differ from [crate::CommittedPath::total_elevation].
    pub total_elevation: Cells,
}

impl Measurement {
    /// Iterate over the segments that should actually be displayed
    pub fn visible_segments(
        &self,
    ) -> impl Iterator<Item = &SegmentMeasurement> {
        self.segments.iter().filter(|segment| segment.visible)
    }

    /// Serialize this measurement to JSON
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> String {
        // Panics only if the measurement contains something unserializable,
        // which would be a bug
        serde_json::to_string(self).expect("error serializing measurement")
    }
}

/// One leg of a path, prepared for measuring
struct Leg {
    ray: Segment,
    measured_ray: Segment,
    elevation: Cells,
}

/// Measures paths that can change elevation. This wraps the host's native
/// measurer: it decides for each path whether the native measurer can
/// handle it as-is (when the path is flat) or whether the legs need to be
/// projected first.
pub struct ElevationMeasurer<'a, M: SegmentMeasurer + ?Sized> {
    config: &'a RulerConfig,
    native: &'a M,
}

impl<'a, M: SegmentMeasurer + ?Sized> ElevationMeasurer<'a, M> {
    /// Create a new measurer. Returns an error if the config is invalid.
    pub fn new(
        config: &'a RulerConfig,
        native: &'a M,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config, native })
    }

    /// Measure a path, accounting for elevation. If the path is entirely
    /// flat, this is identical to [Self::measure_planar].
    pub fn measure(
        &self,
        path: &RulerPath,
        grid_spaces: bool,
    ) -> anyhow::Result<Measurement> {
        if path.is_flat() {
            trace!("Path is flat, measuring without elevation");
            return self.measure_planar(path, grid_spaces);
        }

        let cell_size = self.config.grid.cell_size();
        let legs = path.legs().map(|(ray, elevation)| Leg {
            ray,
            measured_ray: ray.project_elevation(elevation * cell_size),
            elevation,
        });
        self.measure_legs(legs, grid_spaces)
    }

    /// Measure a path while ignoring elevation entirely. This is how the host
    /// measures paths on its own.
    pub fn measure_planar(
        &self,
        path: &RulerPath,
        grid_spaces: bool,
    ) -> anyhow::Result<Measurement> {
        let legs = path.legs().map(|(ray, _)| Leg {
            ray,
            measured_ray: ray,
            elevation: Cells::ZERO,
        });
        self.measure_legs(legs, grid_spaces)
    }

    fn measure_legs(
        &self,
        legs: impl Iterator<Item = Leg>,
        grid_spaces: bool,
    ) -> anyhow::Result<Measurement> {
        let legs: Vec<Leg> = legs.collect();

        // Short segments get dropped before measuring, so they don't count
        // towards the total at all
        let visible: Vec<bool> = legs
            .iter()
            .map(|leg| {
                leg.measured_ray.length().0 >= self.config.min_segment_length
            })
            .collect();
        let rays: Vec<Segment> = legs
            .iter()
            .zip(&visible)
            .filter(|(_, visible)| **visible)
            .map(|(leg, _)| leg.measured_ray)
            .collect();

        let distances = self
            .native
            .measure_distances(&rays, grid_spaces)
            .context("error measuring segments")?;
        ensure!(
            distances.len() == rays.len(),
            "measured {} segments but got {} distances",
            rays.len(),
            distances.len()
        );

        let formatter = LabelFormatter::new(self.config);
        let mut measurement = Measurement::default();
        let mut distances = distances.into_iter().enumerate();
        for (leg, visible) in legs.into_iter().zip(visible) {
            let mut segment = SegmentMeasurement {
                ray: leg.ray,
                measured_ray: leg.measured_ray,
                elevation: leg.elevation,
                distance: 0.0,
                visible,
                last: false,
                label: None,
            };

            if visible {
                // We already checked that there's one distance per visible
                // segment
                if let Some((i, distance)) = distances.next() {
                    measurement.total_distance += distance;
                    measurement.total_elevation += leg.elevation;
                    segment.distance = distance;
                    segment.last = i == rays.len() - 1;
                    segment.label = Some(formatter.segment_label(
                        distance,
                        leg.elevation,
                        measurement.total_distance,
                        measurement.total_elevation,
                        segment.last,
                    ));
                }
            }

            measurement.segments.push(segment);
        }

        Ok(measurement)
    }
}
