use crate::{util::round_to, Cells, LabelConfig, RulerConfig};

/// Builds the text shown next to each measured segment. A label looks like
/// `↑7.07 ft`, and the final segment of a path also gets the running total:
/// `↑7.07 ft [↑12.07 ft]`.
#[derive(Copy, Clone, Debug)]
pub struct LabelFormatter<'a> {
    config: &'a LabelConfig,
    units: &'a str,
}

impl<'a> LabelFormatter<'a> {
    pub fn new(config: &'a RulerConfig) -> Self {
        Self {
            config: &config.label,
            units: &config.grid.units,
        }
    }

    /// Arrow indicating which way a segment (or the path as a whole) moves
    /// vertically. Flat movement gets no arrow at all.
    pub fn glyph(&self, elevation: Cells) -> &'a str {
        match elevation.signum() {
            1 => self.config.up_glyph.as_str(),
            -1 => self.config.down_glyph.as_str(),
            _ => "",
        }
    }

    /// Format a single distance with its direction glyph and units
    pub fn distance(&self, distance: f64, elevation: Cells) -> String {
        format!(
            "{}{} {}",
            self.glyph(elevation),
            round_to(distance, self.config.precision),
            self.units
        )
    }

    /// Format the label for one segment. `total_distance` and
    /// `total_elevation` are the sums over the path up to and including this
    /// segment, and are only shown on the last segment.
    pub fn segment_label(
        &self,
        distance: f64,
        elevation: Cells,
        total_distance: f64,
        total_elevation: Cells,
        last: bool,
    ) -> String {
        let mut label = self.distance(distance, elevation);
        if last {
            label.push_str(&format!(
                " [{}]",
                self.distance(total_distance, total_elevation)
            ));
        }
        label
    }
}
