use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use narrative::{NarrativeConfig, points_from_json};
use replay::{
    DEFAULT_STEPS, ReplayOptions, VIEWPORT_HEIGHT_PX, format_report, parse_steps, run_replay,
};

#[derive(Parser, Debug)]
#[command(
    name = "portfolio_replay",
    version,
    about = "Replay a scroll script through the globe narrative"
)]
struct Args {
    /// Narrative configuration (JSON); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Point list (JSON array) replacing the configured points
    #[arg(long)]
    points: Option<PathBuf>,

    /// Comma-separated steps: pinned progress (0.6) or page offset (6vh)
    #[arg(long, default_value = DEFAULT_STEPS)]
    steps: String,

    /// Frames simulated at 60 fps after each step
    #[arg(long, default_value_t = 90)]
    frames_per_step: u32,

    /// Collapse tween durations the way the page does for reduced motion
    #[arg(long)]
    reduced_motion: bool,

    /// Viewport height used to resolve the layout, in pixels
    #[arg(long, default_value_t = VIEWPORT_HEIGHT_PX)]
    viewport_height: f64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
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

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => NarrativeConfig::from_json(&read(path)?)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => NarrativeConfig::default(),
    };
    if let Some(path) = &args.points {
        config.points =
            points_from_json(&read(path)?).map_err(|e| format!("{}: {e}", path.display()))?;
    }

    let options = ReplayOptions {
        steps: parse_steps(&args.steps)?,
        frames_per_step: args.frames_per_step,
        reduced_motion: args.reduced_motion,
        viewport_height_px: args.viewport_height,
    };
    info!(
        steps = options.steps.len(),
        points = config.points.len(),
        "replaying scroll script"
    );

    let report = run_replay(config, &options)?;
    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}
