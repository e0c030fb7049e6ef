use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::math::{LatLng, bearing_line, rect_bounds, scene_to_lat_lng};
use framing::{
    FramingConfig, FramingSession, GroundTarget, OrbitalPose, neighborhood_coords,
};
use serde::Serialize;
use streaming::{TileBounds, TileCoord, TileLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod replay;

use replay::{LoggingBackend, ReplayScript, run_replay};

#[derive(Parser, Debug)]
#[command(author, version, about = "Framing preview math for satellite image requests")]
struct Args {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ground footprint of a rectangular camera view
    Footprint {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Footprint width (meters)
        #[arg(long)]
        width_m: f64,
        /// Footprint height (meters)
        #[arg(long)]
        height_m: f64,
        /// Rotation of the footprint (degrees)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        rotation_deg: f64,
        /// Also draw a bearing line from the center at this heading (degrees)
        #[arg(long, allow_hyphen_values = true)]
        bearing_deg: Option<f64>,
    },

    /// Aim the preview camera from a satellite pose at a ground target
    LookAt {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        height_km: f64,
        #[arg(long, allow_hyphen_values = true)]
        target_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        target_lng: f64,
        /// Pass time (unix seconds), used for sun placement
        #[arg(long, default_value_t = 0.0)]
        timestamp: f64,
    },

    /// Tile neighborhood around a point
    Tiles {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Override the configured zoom level
        #[arg(long)]
        zoom: Option<u8>,
    },

    /// Run a recorded interaction script and print the emitted events
    Replay {
        /// JSON script with `pass`, `events` and optional `viewport`
        script: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => FramingConfig::load(path).map_err(|e| e.to_string())?,
        None => FramingConfig::default(),
    };
    config.apply_env().map_err(|e| e.to_string())?;

    match args.command {
        Command::Footprint {
            lat,
            lng,
            width_m,
            height_m,
            rotation_deg,
            bearing_deg,
        } => cmd_footprint(LatLng::new(lat, lng), width_m, height_m, rotation_deg, bearing_deg),
        Command::LookAt {
            lat,
            lng,
            height_km,
            target_lat,
            target_lng,
            timestamp,
        } => cmd_look_at(
            config,
            OrbitalPose::new(lat, lng, height_km, timestamp),
            GroundTarget::new(target_lat, target_lng),
        ),
        Command::Tiles { lat, lng, zoom } => {
            if let Some(zoom) = zoom {
                config.tiles.zoom = zoom;
                config.validate().map_err(|e| e.to_string())?;
            }
            cmd_tiles(&config, LatLng::new(lat, lng))
        }
        Command::Replay { script } => cmd_replay(config, script),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

#[derive(Serialize)]
struct LatLngDto {
    lat: f64,
    lng: f64,
}

impl From<LatLng> for LatLngDto {
    fn from(p: LatLng) -> Self {
        Self {
            lat: p.lat,
            lng: p.lng,
        }
    }
}

#[derive(Serialize)]
struct FootprintReport {
    /// Closed ring, `[lng, lat]` pairs.
    ring: Vec<[f64; 2]>,
    centroid: LatLngDto,
    lng_extent_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    bearing_line: Option<[LatLngDto; 2]>,
}

fn cmd_footprint(
    center: LatLng,
    width_m: f64,
    height_m: f64,
    rotation_deg: f64,
    bearing_deg: Option<f64>,
) -> Result<(), String> {
    if !(width_m > 0.0 && height_m > 0.0) {
        return Err(format!("footprint must be positive, got {width_m}x{height_m} m"));
    }
    let polygon = rect_bounds(center, width_m, height_m, rotation_deg);
    let report = FootprintReport {
        ring: polygon.closed_ring().iter().map(|p| [p.lng, p.lat]).collect(),
        centroid: polygon.centroid().into(),
        lng_extent_deg: polygon.lng_extent(),
        bearing_line: bearing_deg.map(|heading| {
            let [a, b] = bearing_line(center, 0.5 * height_m, heading);
            [a.into(), b.into()]
        }),
    };
    print_json(&report)
}

#[derive(Serialize)]
struct LookAtReport {
    position: [f64; 3],
    orientation: [f64; 4],
    euler: [f64; 3],
    pitch_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    subsolar: Option<LatLngDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    center_tile: Option<TileCoord>,
    /// Row-major, north to south.
    neighborhood: Vec<TileCoord>,
}

fn cmd_look_at(config: FramingConfig, pose: OrbitalPose, target: GroundTarget) -> Result<(), String> {
    let viewport = config.viewport;
    let mut session =
        FramingSession::new(config, LoggingBackend::default()).map_err(|e| e.to_string())?;
    session.mount(viewport);
    let placement = session
        .select_pass(pose, target)
        .ok_or_else(|| "satellite pose coincides with the target".to_string())?;

    let q = placement.orientation;
    let euler = session.controller().euler();
    let report = LookAtReport {
        position: [placement.position.x, placement.position.y, placement.position.z],
        orientation: [q.x, q.y, q.z, q.w],
        euler: [euler.x, euler.y, euler.z],
        pitch_deg: placement.pitch_deg(),
        subsolar: scene_to_lat_lng(session.lights().sun.position).map(Into::into),
        center_tile: session.tiles().map(|t| t.center),
        neighborhood: session.tiles().map(|t| t.coords()).unwrap_or_default(),
    };
    session.unmount();
    print_json(&report)
}

#[derive(Serialize)]
struct TileReport {
    #[serde(flatten)]
    coord: TileCoord,
    bounds: TileBounds,
    day_url: String,
    night_url: String,
}

fn cmd_tiles(config: &FramingConfig, at: LatLng) -> Result<(), String> {
    let center = TileCoord::containing(at.wrapped(), config.tiles.zoom);
    let tiles: Vec<TileReport> = neighborhood_coords(center, config.tiles.neighborhood_radius)
        .into_iter()
        .map(|coord| TileReport {
            coord,
            bounds: coord.bounds(),
            day_url: config.tiles.url_for(TileLayer::Day, coord),
            night_url: config.tiles.url_for(TileLayer::Night, coord),
        })
        .collect();
    info!(z = center.z, x = center.x, y = center.y, count = tiles.len(), "tile neighborhood");
    print_json(&tiles)
}

fn cmd_replay(config: FramingConfig, path: PathBuf) -> Result<(), String> {
    let text = fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    let script: ReplayScript =
        serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))?;
    let report = run_replay(config, &script)?;
    print_json(&report)
}
