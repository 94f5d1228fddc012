//! This crate provides WebAssembly bindings for the elevation ruler. The
//! [ElevationRuler] struct is the main interface; the host creates one per
//! ruler tool, then forwards its ruler events (drag start, waypoint added,
//! elevation keys, cursor movement, etc.) to it. The ruler keeps track of
//! the measurement session and hands back measurements that the host can
//! render however it likes.
//!
//! The host's own distance measurer can be passed in so that its grid rules
//! (including any rules added by game systems) are used for every planar
//! measurement. If it isn't given, the built-in grid rules are used.
//!
//! You probably won't ever want to include this crate in another Rust project.
//! Instead, use `wasm-pack` to build this into an npm package, then import that
//! into your JS project.

mod util;

use crate::util::{
    from_js_object, parse_config, to_js_object, JsMeasurer, ResultExt,
};
use elevation_ruler::{
    Cells, GridMeasurer, MeasurementSession, Pixels, Point2, RulerConfig,
};
use js_sys::Function;
use log::info;
use wasm_bindgen::prelude::*;

/// Executed when the Wasm module is first loaded
#[wasm_bindgen(start)]
pub fn main() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    wasm_logger::init(wasm_logger::Config::default());
}

/// Get the default ruler config as a JS object.
#[wasm_bindgen]
pub fn default_config() -> Result<RulerConfigObject, JsValue> {
    to_js_object(&RulerConfig::default())
}

/// Verify that the given JS object is a valid ruler config. Return the
/// validated config, with all defaults populated, if it's valid. Return an
/// error if it isn't.
///
/// Because validation populates missing fields, you can "validate" an empty
/// object to get the default config.
#[wasm_bindgen]
pub fn validate_config(
    input: RulerConfigObject,
) -> Result<RulerConfigObject, JsValue> {
    let config = parse_config(&input)?;
    to_js_object(&config)
}

/// Fold a vertical displacement into a planar leg. See
/// [elevation_ruler::project_elevation] for the details. `height` is in
/// pixels.
#[wasm_bindgen]
pub fn project_elevation(a: &Point2, b: &Point2, height: f64) -> Point2 {
    elevation_ruler::project_elevation(*a, *b, Pixels(height))
}

/// An elevation-aware ruler. Holds the config for the current scene, and
/// the state of the measurement in progress.
#[wasm_bindgen]
pub struct ElevationRuler {
    config: RulerConfig,
    session: MeasurementSession,
    /// The host's `measureDistances` function, if it provided one
    native: Option<Function>,
}

#[wasm_bindgen]
impl ElevationRuler {
    /// Create a new ruler. `config` will be validated, and any missing fields
    /// populated with defaults. `measure_distances` is the host's native
    /// measurer, which will be called as `measure_distances(segments, {
    /// gridSpaces })` and must return one distance per segment.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: RulerConfigObject,
        measure_distances: Option<Function>,
    ) -> Result<ElevationRuler, JsValue> {
        let config = parse_config(&config)?;
        info!("Created elevation ruler with config {:?}", config);
        Ok(Self {
            config,
            session: MeasurementSession::new(),
            native: measure_distances,
        })
    }

    /// Replace the config, e.g. when the scene's grid changes. The measurement
    /// in progress (if any) is kept.
    pub fn set_config(
        &mut self,
        config: RulerConfigObject,
    ) -> Result<(), JsValue> {
        self.config = parse_config(&config)?;
        Ok(())
    }

    /// Get the current config as a JS object
    pub fn config(&self) -> Result<RulerConfigObject, JsValue> {
        to_js_object(&self.config)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// Elevation increment for each waypoint, in cells
    pub fn increments(&self) -> Vec<i32> {
        self.session.increments().iter().map(|cells| cells.0).collect()
    }

    /// Elevation increment queued up for the destination, in cells
    pub fn pending_increment(&self) -> i32 {
        self.session.pending().0
    }

    /// Start measuring from the given point
    pub fn start(&mut self, origin: PointObject) -> Result<(), JsValue> {
        self.session.start(from_js_object(&origin)?);
        Ok(())
    }

    pub fn add_waypoint(&mut self, point: PointObject) -> Result<(), JsValue> {
        self.session.add_waypoint(from_js_object(&point)?);
        Ok(())
    }

    pub fn remove_waypoint(&mut self) {
        self.session.remove_waypoint();
    }

    /// Queue up one cell of climbing for the destination
    pub fn raise(&mut self) {
        self.session.raise();
    }

    /// Queue up one cell of descending for the destination
    pub fn lower(&mut self) {
        self.session.lower();
    }

    /// Change the destination's queued elevation by any number of cells
    pub fn adjust_pending(&mut self, delta: i32) {
        self.session.adjust_pending(Cells(delta));
    }

    /// Measure the path out to the given destination. This should be called
    /// whenever the cursor moves. Returns `null` if no measurement is in
    /// progress.
    pub fn measure(
        &mut self,
        destination: PointObject,
        grid_spaces: bool,
    ) -> Result<MeasurementResult, JsValue> {
        let destination: Point2 = from_js_object(&destination)?;
        let measurement = match &self.native {
            Some(function) => self.session.measure(
                destination,
                &self.config,
                &JsMeasurer::new(function),
                grid_spaces,
            ),
            None => GridMeasurer::new(self.config.grid.clone()).and_then(
                |native| {
                    self.session.measure(
                        destination,
                        &self.config,
                        &native,
                        grid_spaces,
                    )
                },
            ),
        }
        .into_js()?;
        to_js_object(&measurement)
    }

    /// Accept the current path and end the measurement. Returns the path,
    /// so the host can move a token along it, or `null` if no measurement was
    /// in progress.
    pub fn commit(&mut self) -> Result<CommittedPathResult, JsValue> {
        to_js_object(&self.session.commit())
    }

    /// Throw away the current path and end the measurement
    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    /// Forget everything about the current measurement
    pub fn clear(&mut self) {
        self.session.clear();
    }
}

#[wasm_bindgen(typescript_custom_section)]
const TS_APPEND_CONTENT: &'static str = r#"

/**
 * See description in the `extern "C"` section below
 */
export interface RulerConfigObject {
    grid: {
        kind: 'gridless' | 'square';
        size: number;
        distance: number;
        units: string;
        diagonals: 'equidistant' | 'alternating' | 'euclidean' | '555' | '5105';
    };
    label: {
        precision: number;
        up_glyph: string;
        down_glyph: string;
    };
    min_segment_length: number;
}

export interface PointObject {
    x: number;
    y: number;
}

export interface SegmentObject {
    origin: PointObject;
    destination: PointObject;
}

export interface SegmentMeasurement {
    ray: SegmentObject;
    measured_ray: SegmentObject;
    elevation: number;
    distance: number;
    visible: boolean;
    last: boolean;
    label: string | null;
}

export interface Measurement {
    segments: SegmentMeasurement[];
    total_distance: number;
    total_elevation: number;
}

export interface CommittedPath {
    points: PointObject[];
    increments: number[];
    total_elevation: number;
}
"#;

#[wasm_bindgen]
extern "C" {
    /// A TS version of the [RulerConfig] type from the core crate. This
    /// represents what **can be deserialized into a [RulerConfig]**.
    ///
    /// **It is very important that this stays up to date with the
    /// [RulerConfig] type**.
    #[wasm_bindgen(typescript_type = "RulerConfigObject")]
    pub type RulerConfigObject;

    /// A plain `{x, y}` object, e.g. the host's own points
    #[wasm_bindgen(typescript_type = "PointObject")]
    pub type PointObject;

    /// Serialized [elevation_ruler::Measurement], or null
    #[wasm_bindgen(typescript_type = "Measurement | null")]
    pub type MeasurementResult;

    /// Serialized [elevation_ruler::CommittedPath], or null
    #[wasm_bindgen(typescript_type = "CommittedPath | null")]
    pub type CommittedPathResult;
}
