use elevation_ruler::{
    anyhow::{self, anyhow, Context},
    Point2, RulerConfig, Segment, SegmentMeasurer,
};
use js_sys::Function;
use serde::{Deserialize, Serialize};
use wasm_bindgen::{prelude::*, JsCast};

/// An extension trait for `Result` to allow us to add custom methods
pub trait ResultExt<T, E> {
    /// Helper to convert any result to a result with a JS error value.
    fn into_js(self) -> Result<T, JsValue>;
}

impl<T> ResultExt<T, anyhow::Error> for Result<T, anyhow::Error> {
    fn into_js(self) -> Result<T, JsValue> {
        self.map_err(|error| {
            js_sys::Error::new(&format!("{:#}", error)).into()
        })
    }
}

/// Convert any Rust value to a JS object of the given (TS-only) type. This
/// assumes that the TS interface matches the serialization format of the
/// Rust type, which we have no way of checking.
pub fn to_js_object<T: Serialize, J: JsCast>(
    value: &T,
) -> Result<J, JsValue> {
    let value = JsValue::from_serde(value)
        .context("error serializing value")
        .into_js()?;
    Ok(value.unchecked_into())
}

/// Deserialize a JS object into a Rust value. The input should be an
/// **object**, not a JSON string.
pub fn from_js_object<T: for<'a> Deserialize<'a>>(
    input: &JsValue,
) -> Result<T, JsValue> {
    input
        .into_serde()
        .context("error deserializing value")
        .into_js()
}

/// Deserialize a JS object into a [RulerConfig], then validate it. Any missing
/// values will be populated with defaults.
pub fn parse_config(input: &JsValue) -> Result<RulerConfig, JsValue> {
    let config: RulerConfig = from_js_object(input)?;
    config.validated().into_js()
}

/// The shape of a segment that the host's native measurer expects. The host
/// reads the delta and length straight off the ray, so we precompute them.
#[derive(Serialize)]
struct HostSegment {
    ray: HostRay,
}

#[derive(Serialize)]
struct HostRay {
    #[serde(rename = "A")]
    a: Point2,
    #[serde(rename = "B")]
    b: Point2,
    dx: f64,
    dy: f64,
    distance: f64,
}

impl From<&Segment> for HostSegment {
    fn from(segment: &Segment) -> Self {
        let delta = segment.delta();
        Self {
            ray: HostRay {
                a: segment.origin,
                b: segment.destination,
                dx: delta.x,
                dy: delta.y,
                distance: segment.length().0,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HostMeasureOptions {
    grid_spaces: bool,
}

/// Adapter that lets the host's native `measureDistances` JS function act as
/// a [SegmentMeasurer].
pub struct JsMeasurer<'a> {
    function: &'a Function,
}

impl<'a> JsMeasurer<'a> {
    pub fn new(function: &'a Function) -> Self {
        Self { function }
    }
}

impl SegmentMeasurer for JsMeasurer<'_> {
    fn measure_distances(
        &self,
        segments: &[Segment],
        grid_spaces: bool,
    ) -> anyhow::Result<Vec<f64>> {
        let segments: Vec<HostSegment> =
            segments.iter().map(HostSegment::from).collect();
        let segments = JsValue::from_serde(&segments)?;
        let options = JsValue::from_serde(&HostMeasureOptions { grid_spaces })?;

        // JsValue isn't thread-safe, so stringify errors before anyhow gets
        // them
        let distances = self
            .function
            .call2(&JsValue::NULL, &segments, &options)
            .map_err(|err| anyhow!("native measurer failed: {:?}", err))?;
        distances
            .into_serde()
            .context("native measurer should return an array of numbers")
    }
}
