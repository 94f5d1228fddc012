use elevation_ruler::{
    DiagonalRule, ElevationMeasurer, GridConfig, GridKind, GridMeasurer,
    LabelConfig, RulerConfig, Segment, SegmentMeasurer,
};
use serde_test::{assert_de_tokens, Token};
use validator::ValidationErrors;

/// Get a sorted list of the top-level fields that failed validation
fn error_fields(err: anyhow::Error) -> Vec<&'static str> {
    let validation_errors = err.downcast::<ValidationErrors>().unwrap();
    let mut error_fields = validation_errors
        .errors()
        .keys()
        .copied()
        .collect::<Vec<&str>>();
    error_fields.sort_unstable();
    error_fields
}

/// Native measurer that should never get called, because construction
/// fails first
struct UnusedMeasurer;

impl SegmentMeasurer for UnusedMeasurer {
    fn measure_distances(
        &self,
        _segments: &[Segment],
        _grid_spaces: bool,
    ) -> anyhow::Result<Vec<f64>> {
        unreachable!("measurer should not be used with an invalid config")
    }
}

#[test]
fn test_ruler_config_validation() {
    let config = RulerConfig {
        grid: GridConfig {
            kind: GridKind::Square,            // valid
            size: 0.0,                         // invalid
            distance: 5.0,                     // valid
            units: String::new(),              // valid (but weird)
            diagonals: DiagonalRule::Euclidean, // valid
        },
        label: LabelConfig {
            precision: 12,              // invalid
            up_glyph: "^".into(),       // valid
            down_glyph: String::new(),  // valid (but weird)
        },
        min_segment_length: -1.0, // invalid
    };

    // This is a bit of a lazy check but it works well enough
    let err = config.clone().validated().unwrap_err();
    assert_eq!(error_fields(err), vec!["grid", "label", "min_segment_length"]);

    let err = ElevationMeasurer::new(&config, &UnusedMeasurer)
        .err()
        .unwrap();
    assert_eq!(error_fields(err), vec!["grid", "label", "min_segment_length"]);
}

#[test]
fn test_grid_config_validation() {
    let grid = GridConfig {
        size: 0.0,     // invalid
        distance: 0.0, // invalid
        ..Default::default()
    };

    let err = GridMeasurer::new(grid.clone()).unwrap_err();
    assert_eq!(error_fields(err), vec!["distance", "size"]);

    let config = RulerConfig {
        grid,
        ..Default::default()
    };
    let err = ElevationMeasurer::new(&config, &UnusedMeasurer)
        .err()
        .unwrap();
    assert_eq!(error_fields(err), vec!["grid"]);
}

/// An empty object should deserialize to the default config, and the default
/// config has to be usable as-is
#[test]
fn test_empty_config() {
    assert_de_tokens(
        &RulerConfig::default(),
        &[
            Token::Struct {
                name: "RulerConfig",
                len: 0,
            },
            Token::StructEnd,
        ],
    );
}

#[test]
fn test_default_config() {
    let config = RulerConfig::default().validated().unwrap();
    assert_eq!(config.grid.cell_size().0, 100.0);
    let native = GridMeasurer::new(config.grid.clone()).unwrap();
    ElevationMeasurer::new(&config, &native).unwrap();
}
