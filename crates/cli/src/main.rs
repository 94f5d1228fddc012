use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use elevation_ruler::{
    timed, Cells, GridMeasurer, LabelFormatter, Measurement,
    MeasurementSession, Point2, RulerConfig,
};
use log::{info, warn, LevelFilter};
use serde::{de::DeserializeOwned, Deserialize};
use simple_logger::SimpleLogger;
use std::{
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for measuring ruler paths that climb and descend along the way.
#[derive(Debug, StructOpt)]
#[structopt(name = "elevation-ruler")]
struct Opt {
    /// Path to a file that defines the grid and label settings. If not given,
    /// the defaults are used (100px squares, 5 ft per square). Supported
    /// formats: JSON, TOML
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Path to a file that lists the waypoints to measure, under a
    /// `waypoints` key. Each waypoint has an `x` and `y` in pixels, and an
    /// optional `elevation`, which is the number of cells climbed (or
    /// descended, if negative) to reach it from the previous waypoint. The
    /// last waypoint is the destination. Supported formats: JSON, TOML
    #[structopt(required_unless = "print-config")]
    path: Option<PathBuf>,

    /// Measure straight-line distances instead of counting grid spaces
    #[structopt(long)]
    no_grid_spaces: bool,

    /// How to print the measurement. Supported formats:
    ///
    /// text - One label per segment, then the total
    ///
    /// json - The full measurement, including hidden segments
    #[structopt(short = "f", long, default_value = "text")]
    format: OutputFormat,

    /// Print the full ruler config, with defaults filled in, as TOML
    #[structopt(long)]
    print_config: bool,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "warn")]
    log_level: LevelFilter,
}

/// Different ways to print a measurement
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for `--format`!
    /// Human-readable labels, the same ones the ruler would display
    Text,
    /// Serialized measurement
    Json,
}

/// A file full of waypoints to measure
#[derive(Debug, Deserialize)]
struct PathFile {
    waypoints: Vec<PathWaypoint>,
}

#[derive(Copy, Clone, Debug, Deserialize)]
struct PathWaypoint {
    x: f64,
    y: f64,
    /// Cells climbed to reach this waypoint from the previous one
    #[serde(default)]
    elevation: i32,
}

impl PathWaypoint {
    fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Load any deserializable value from a JSON or TOML file
fn load_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let mut settings = Config::new();
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow!("invalid character in path {:?}", path))?;
    settings
        .merge(File::with_name(path_str))
        .with_context(|| format!("error reading file {:?}", path))?;
    settings
        .try_into()
        .with_context(|| format!("error parsing file {:?}", path))
}

fn load_config(config_path: Option<&Path>) -> anyhow::Result<RulerConfig> {
    let config: RulerConfig = match config_path {
        Some(path) => load_file(path)?,
        None => RulerConfig::default(),
    };
    config.validated()
}

/// Play a list of waypoints through a measurement session, the same way a
/// user would place them with the ruler, then measure out to the last one.
fn measure_path(
    waypoints: &[PathWaypoint],
    config: &RulerConfig,
    grid_spaces: bool,
) -> anyhow::Result<Measurement> {
    let (origin, middle, destination) = match waypoints {
        [origin, middle @ .., destination] => (origin, middle, destination),
        _ => bail!(
            "path needs at least 2 waypoints (an origin and a destination), \
            but got {}",
            waypoints.len()
        ),
    };

    if origin.elevation != 0 {
        warn!(
            "Ignoring elevation {} on path origin {}",
            origin.elevation,
            origin.point()
        );
    }

    let mut session = MeasurementSession::new();
    session.start(origin.point());
    for waypoint in middle {
        session.adjust_pending(Cells(waypoint.elevation));
        session.add_waypoint(waypoint.point());
    }
    session.adjust_pending(Cells(destination.elevation));

    let native = GridMeasurer::new(config.grid.clone())?;
    session
        .measure(destination.point(), config, &native, grid_spaces)?
        .ok_or_else(|| anyhow!("measurement ended unexpectedly"))
}

fn print_text(measurement: &Measurement, config: &RulerConfig) {
    for segment in measurement.visible_segments() {
        println!(
            "{}: {}",
            segment.ray,
            segment.label.as_deref().unwrap_or_default()
        );
    }
    let formatter = LabelFormatter::new(config);
    println!(
        "Total: {}",
        formatter
            .distance(measurement.total_distance, measurement.total_elevation)
    );
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let config = load_config(opt.config.as_deref())
        .context("error loading ruler config")?;
    if opt.print_config {
        // Going through a Value puts plain values ahead of tables, which
        // TOML requires
        let value = toml::Value::try_from(&config)
            .context("error serializing config")?;
        println!("{}", toml::to_string_pretty(&value)?);
    }

    let path_file: PathFile = match &opt.path {
        Some(path) => load_file(path)?,
        None => return Ok(()),
    };
    info!("Loaded {} waypoints", path_file.waypoints.len());

    let measurement = timed!("Measuring path", log::Level::Info, {
        measure_path(&path_file.waypoints, &config, !opt.no_grid_spaces)?
    });

    match opt.format {
        OutputFormat::Text => print_text(&measurement, &config),
        OutputFormat::Json => println!("{}", measurement.to_json()),
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
