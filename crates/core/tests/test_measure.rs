use assert_approx_eq::assert_approx_eq;
use elevation_ruler::{
    project_elevation, Cells, DiagonalRule, ElevationMeasurer, GridConfig,
    GridKind, GridMeasurer, MeasurementSession, Pixels, Point2, RulerConfig,
    RulerPath, Segment,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Fixed seed so failures are reproducible
const SEED: u64 = 8_675_309;
const SAMPLES: usize = 1000;

fn random_point(rng: &mut impl Rng) -> Point2 {
    Point2::new(rng.gen_range(-5000.0..5000.0), rng.gen_range(-5000.0..5000.0))
}

/// Signed distance from `point` to the line through `a` and `b`. Only the
/// sign is meaningful here.
fn side_of_line(a: Point2, b: Point2, point: Point2) -> f64 {
    let ab = b - a;
    let ap = point - a;
    ab.x * ap.y - ab.y * ap.x
}

#[test]
fn test_zero_height_is_identity() {
    let mut rng = Pcg64::seed_from_u64(SEED);
    for _ in 0..SAMPLES {
        let a = random_point(&mut rng);
        let b = random_point(&mut rng);
        let c = project_elevation(a, b, Pixels(0.0));
        // Exact, not approximate
        assert_eq!(c.x.to_bits(), b.x.to_bits());
        assert_eq!(c.y.to_bits(), b.y.to_bits());
    }
}

#[test]
fn test_slant_distance() {
    let mut rng = Pcg64::seed_from_u64(SEED);
    for _ in 0..SAMPLES {
        let a = random_point(&mut rng);
        let b = random_point(&mut rng);
        let height = rng.gen_range(-2000.0..2000.0);
        let c = project_elevation(a, b, Pixels(height));

        let expected = a.distance_to(b).0.hypot(height);
        let actual = a.distance_to(c).0;
        assert!(
            ((actual - expected) / expected).abs() < 1e-9,
            "{} -> {} with height {}: expected {}, got {}",
            a,
            b,
            height,
            expected,
            actual
        );
    }
}

#[test]
fn test_projection_direction() {
    let mut rng = Pcg64::seed_from_u64(SEED);
    for _ in 0..SAMPLES {
        let a = random_point(&mut rng);
        let b = random_point(&mut rng);
        let height = rng.gen_range(1.0..2000.0);
        let up = project_elevation(a, b, Pixels(height));
        let down = project_elevation(a, b, Pixels(-height));

        // Climbing and descending land on opposite sides of the leg, the
        // same distance from it
        let up_side = side_of_line(a, b, up);
        let down_side = side_of_line(a, b, down);
        assert!(up_side * down_side < 0.0);
        assert_approx_eq!(up_side, -down_side, up_side.abs() * 1e-9);
        // And both are exactly `height` away from the original destination
        assert_approx_eq!(b.distance_to(up).0, height, height * 1e-9);
        assert_approx_eq!(b.distance_to(down).0, height, height * 1e-9);
    }
}

#[test]
fn test_coincident_points() {
    let a = Point2::new(0.0, 0.0);
    let c = project_elevation(a, a, Pixels(50.0));
    assert!(!c.x.is_nan() && !c.y.is_nan());
    assert_eq!(c, Point2::new(0.0, 0.0));
}

#[test]
fn test_scenarios() {
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(100.0, 0.0);

    let flat = project_elevation(a, b, Pixels(0.0));
    assert_eq!(flat, Point2::new(100.0, 0.0));
    assert_approx_eq!(a.distance_to(flat).0, 100.0);

    let raised = project_elevation(a, b, Pixels(75.0));
    assert_approx_eq!(a.distance_to(raised).0, 125.0);
}

/// Drive a session through a bunch of random edits and make sure the
/// waypoints and increments always stay in sync
#[test]
fn test_session_parity() {
    let mut rng = Pcg64::seed_from_u64(SEED);
    let mut session = MeasurementSession::new();
    session.start(random_point(&mut rng));

    for _ in 0..SAMPLES {
        match rng.gen_range(0..5) {
            0 => session.add_waypoint(random_point(&mut rng)),
            1 => session.remove_waypoint(),
            2 => session.raise(),
            3 => session.lower(),
            _ => {
                if rng.gen_bool(0.1) {
                    session.start(random_point(&mut rng));
                }
            }
        }

        assert_eq!(session.waypoints().len(), session.increments().len());
        if let Some(first) = session.increments().first() {
            assert_eq!(*first, Cells(0));
        }
        // The origin never goes away, so the path is always measurable
        assert!(!session.waypoints().is_empty());
        assert!(session.path(random_point(&mut rng)).is_ok());
    }
}

/// A path with no elevation changes has to measure exactly the same as it
/// would without elevation support, for every grid type
#[test]
fn test_flat_path_matches_planar() {
    let mut rng = Pcg64::seed_from_u64(SEED);
    let grids = [
        (GridKind::Gridless, DiagonalRule::Equidistant),
        (GridKind::Square, DiagonalRule::Equidistant),
        (GridKind::Square, DiagonalRule::Alternating),
        (GridKind::Square, DiagonalRule::Euclidean),
    ];

    for (kind, diagonals) in grids.iter().copied() {
        let config = RulerConfig {
            grid: GridConfig {
                kind,
                diagonals,
                ..Default::default()
            },
            ..Default::default()
        };
        let native = GridMeasurer::new(config.grid.clone()).unwrap();
        let measurer = ElevationMeasurer::new(&config, &native).unwrap();

        for _ in 0..100 {
            let waypoints: Vec<Point2> =
                (0..rng.gen_range(1..6)).map(|_| random_point(&mut rng)).collect();
            let increments = vec![Cells(0); waypoints.len()];
            let destination = random_point(&mut rng);
            let path =
                RulerPath::new(&waypoints, &increments, destination, Cells(0))
                    .unwrap();

            for &grid_spaces in &[true, false] {
                let measured = measurer.measure(&path, grid_spaces).unwrap();
                let planar =
                    measurer.measure_planar(&path, grid_spaces).unwrap();
                assert_eq!(measured, planar);

                // And the planar total is just the host's own measurement
                let segments: Vec<Segment> = path
                    .legs()
                    .map(|(segment, _)| segment)
                    .filter(|segment| {
                        segment.length().0 >= config.min_segment_length
                    })
                    .collect();
                let native_total: f64 = segments
                    .iter()
                    .map(|segment| native.measure(segment, grid_spaces))
                    .sum();
                assert_eq!(measured.total_distance, native_total);
            }
        }
    }
}

/// Segments that are too short get hidden, but measurement carries on past
/// them
#[test]
fn test_short_segments_are_skipped() {
    let config = RulerConfig {
        grid: GridConfig {
            kind: GridKind::Gridless,
            ..Default::default()
        },
        ..Default::default()
    };
    let native = GridMeasurer::new(config.grid.clone()).unwrap();
    let measurer = ElevationMeasurer::new(&config, &native).unwrap();

    let waypoints = [
        Point2::new(0.0, 0.0),
        Point2::new(5.0, 0.0), // Too close to the origin
        Point2::new(105.0, 0.0),
    ];
    let increments = [Cells(0), Cells(0), Cells(1)];
    let path = RulerPath::new(
        &waypoints,
        &increments,
        Point2::new(205.0, 0.0),
        Cells(0),
    )
    .unwrap();
    let measurement = measurer.measure(&path, false).unwrap();

    let visible: Vec<bool> =
        measurement.segments.iter().map(|s| s.visible).collect();
    assert_eq!(visible, vec![false, true, true]);
    assert_eq!(measurement.segments[0].label, None);
    // 100px across and 100px up, in 100px/5ft cells
    assert_approx_eq!(measurement.segments[1].distance, 50f64.sqrt());
    assert_approx_eq!(measurement.segments[2].distance, 5.0);
    assert_approx_eq!(measurement.total_distance, 50f64.sqrt() + 5.0);
    assert_eq!(measurement.total_elevation, Cells(1));
    assert_eq!(
        measurement.segments[1].label.as_deref(),
        Some("↑7.07 ft")
    );
    assert_eq!(
        measurement.segments[2].label.as_deref(),
        Some("5 ft [↑12.07 ft]")
    );
}

/// Even with elevation, the rendered path keeps the original waypoints
#[test]
fn test_display_path_is_unprojected() {
    let config = RulerConfig::default();
    let native = GridMeasurer::new(config.grid.clone()).unwrap();
    let mut session = MeasurementSession::new();
    session.start(Point2::new(0.0, 0.0));
    session.lower();
    session.add_waypoint(Point2::new(300.0, 0.0));
    session.raise();
    session.raise();
    let destination = Point2::new(300.0, 400.0);

    let measurement = session
        .measure(destination, &config, &native, false)
        .unwrap()
        .unwrap();
    let displayed: Vec<Segment> =
        measurement.segments.iter().map(|s| s.ray).collect();
    assert_eq!(
        displayed,
        vec![
            Segment::new(Point2::new(0.0, 0.0), Point2::new(300.0, 0.0)),
            Segment::new(Point2::new(300.0, 0.0), destination),
        ]
    );
    for segment in &measurement.segments {
        assert_ne!(segment.ray, segment.measured_ray);
        assert_eq!(segment.ray.origin, segment.measured_ray.origin);
    }
    // sqrt(300² + 100²) and sqrt(400² + 200²), in 100px/5ft cells
    assert_approx_eq!(
        measurement.total_distance,
        (10f64.sqrt() + 20f64.sqrt()) * 5.0
    );
    assert_eq!(measurement.total_elevation, Cells(1));
}
