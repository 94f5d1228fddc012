use crate::{
    measure::SegmentMeasurer, DiagonalRule, GridConfig, GridKind, Segment,
};
use validator::Validate;

/// A planar distance measurer that follows the host's own grid rules. The
/// host normally supplies its native measurer, but this lets measurements run
/// without one (e.g. from the CLI), and gives us a baseline to test the
/// elevation logic against.
#[derive(Clone, Debug)]
pub struct GridMeasurer {
    grid: GridConfig,
}

impl GridMeasurer {
    /// Create a new measurer. Returns an error if the grid config is
    /// invalid, e.g. if it has zero-sized cells.
    pub fn new(grid: GridConfig) -> anyhow::Result<Self> {
        grid.validate()?;
        Ok(Self { grid })
    }

    /// Measure one segment, in grid units
    pub fn measure(&self, segment: &Segment, grid_spaces: bool) -> f64 {
        match (self.grid.kind, grid_spaces) {
            (GridKind::Square, true) => self.measure_spaces(segment),
            // Off the grid, everything is a straight line
            _ => segment.length().0 / self.grid.size * self.grid.distance,
        }
    }

    /// Count the number of cells a segment crosses, then convert that to
    /// grid units according to the diagonal rule.
    fn measure_spaces(&self, segment: &Segment) -> f64 {
        let delta = segment.delta();
        let nx = (delta.x / self.grid.size).ceil().abs();
        let ny = (delta.y / self.grid.size).ceil().abs();
        let diagonal = nx.min(ny);
        let straight = (nx - ny).abs();

        match self.grid.diagonals {
            DiagonalRule::Equidistant => {
                (diagonal + straight) * self.grid.distance
            }
            DiagonalRule::Alternating => {
                // Every other diagonal step counts double
                let doubled = (diagonal / 2.0).floor();
                (diagonal + doubled + straight) * self.grid.distance
            }
            DiagonalRule::Euclidean => {
                (nx.hypot(ny) * self.grid.distance).round()
            }
        }
    }
}

impl SegmentMeasurer for GridMeasurer {
    fn measure_distances(
        &self,
        segments: &[Segment],
        grid_spaces: bool,
    ) -> anyhow::Result<Vec<f64>> {
        Ok(segments
            .iter()
            .map(|segment| self.measure(segment, grid_spaces))
            .collect())
    }
}
