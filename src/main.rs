use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use doodlepad::Config;
use doodlepad::doodle::{
    RecognitionOutcome, RecognitionRaster, RecognitionService, Recognizer, present,
};
use doodlepad::draw::{DrawingSurface, StrokeStyle};
use doodlepad::export::{FileRasterStore, export_raster};
use doodlepad::input::{GestureScript, GestureTracker, ScriptAction};

#[derive(Parser, Debug)]
#[command(name = "doodlepad")]
#[command(
    version,
    about = "Stroke canvas with undo and PNG export, plus a 28x28 doodle recognizer"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a gesture script on the paint canvas and export it as PNG
    Paint {
        /// Gesture script (JSON)
        script: PathBuf,

        /// Directory to write the PNG to (overrides the config)
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Config file to use instead of ~/.config/doodlepad/config.toml
        #[arg(long, short = 'c', value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Replay a gesture script on the recognition grid and classify it
    Recognize {
        /// Gesture script (JSON)
        script: PathBuf,

        /// Model artifact (overrides the config)
        #[arg(long, short = 'm', value_name = "FILE")]
        model: Option<PathBuf>,

        /// Config file to use instead of ~/.config/doodlepad/config.toml
        #[arg(long, short = 'c', value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Write a documented default config file
    InitConfig,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Paint {
            script,
            output_dir,
            config,
        }) => run_paint(&script, output_dir.as_deref(), config.as_deref()),
        Some(Command::Recognize {
            script,
            model,
            config,
        }) => run_recognize(&script, model, config.as_deref()),
        Some(Command::InitConfig) => {
            let path = Config::create_default_file()?;
            println!("Created default config at {}", path.display());
            Ok(())
        }
        None => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("doodlepad: Stroke canvas with undo and PNG export, plus a 28x28 doodle recognizer");
    println!();
    println!("Usage:");
    println!("  doodlepad paint <SCRIPT> [--output-dir DIR]   Draw a script and export drawing.png");
    println!("  doodlepad recognize <SCRIPT> [--model FILE]   Draw a script on the grid and classify it");
    println!("  doodlepad init-config                         Write ~/.config/doodlepad/config.toml");
    println!("  doodlepad --help                              Show help");
    println!();
    println!("Scripts are JSON:");
    println!(r#"  {{"source_size": [280, 280], "actions": [{{"op": "down", "x": 0, "y": 0}}, ...]}}"#);
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Applies a scripted style change on top of `style`.
fn apply_style(style: &mut StrokeStyle, config: &Config, action: &ScriptAction) {
    if let ScriptAction::Style {
        color,
        width,
        cap,
        smoothing,
    } = action
    {
        if let Some(color) = color {
            style.color = color.to_color();
        }
        if let Some(width) = width {
            style.width = width.clamp(1.0, 100.0);
        }
        if let Some(cap) = cap {
            style.cap = (*cap).into();
        }
        if let Some(smoothing) = smoothing {
            style.smoothing = config.drawing.smoothing(*smoothing);
        }
        log::debug!("Pen style now {:?}", style);
    }
}

fn run_paint(script_path: &Path, output_dir: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let script = GestureScript::load(script_path)?;

    let mut surface = DrawingSurface::new(
        config.canvas.width,
        config.canvas.height,
        config.canvas.background_color(),
    )
    .context("Failed to allocate the paint canvas")?;
    let target = (surface.width() as f64, surface.height() as f64);
    let mut style = config.drawing.stroke_style();

    for action in &script.actions {
        match action {
            ScriptAction::Style { .. } => apply_style(&mut style, &config, action),
            ScriptAction::Undo => {
                if surface.undo().is_none() {
                    log::debug!("Nothing to undo");
                }
            }
            ScriptAction::Clear => log::debug!("Ignoring clear on the paint canvas"),
            _ => {
                if let Some(event) = action.pointer_event() {
                    let event = match script.source_size {
                        Some([w, h]) => event.scaled((w, h), target),
                        None => event,
                    };
                    surface.handle_pointer(event, style);
                }
            }
        }
    }

    if surface.is_drawing() {
        log::warn!("Script ended with an unfinished stroke; it is not exported");
    }
    log::info!("Replayed {} strokes", surface.history().len());

    let snapshot = surface
        .export_raster()
        .context("Failed to read the paint canvas")?;
    let request = config.export_request(output_dir);
    match export_raster(&snapshot, &FileRasterStore, &request) {
        Ok(path) => {
            println!("Saved drawing to {}", path.display());
            Ok(())
        }
        Err(err) => {
            log::error!("Export failed: {}", err);
            Err(err).context("Failed to export drawing")
        }
    }
}

fn run_recognize(
    script_path: &Path,
    model_override: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let script = GestureScript::load(script_path)?;

    let recognizer = match model_override.or_else(|| config.model_path()) {
        Some(path) => Recognizer::load(&path),
        None => Recognizer::disabled("no model path configured"),
    };
    println!("{}", recognizer.status_message());

    let Some(classifier) = recognizer.classifier() else {
        return Ok(());
    };

    let mut raster = RecognitionRaster::new(config.recognizer.brush_width)
        .context("Failed to allocate the recognition grid")?;
    let mut tracker = GestureTracker::new();

    for action in &script.actions {
        match action {
            ScriptAction::Clear => {
                tracker.cancel();
                raster.clear();
            }
            ScriptAction::Style { .. } | ScriptAction::Undo => {
                log::debug!("Ignoring {:?} on the recognition grid", action)
            }
            _ => {
                let Some(event) = action.pointer_event() else {
                    continue;
                };
                if let Some(points) = tracker.handle(event) {
                    match script.source_size {
                        Some([w, h]) => raster.paint_scaled(&points, w, h),
                        None => raster.paint(&points),
                    }
                }
            }
        }
    }

    let Some(tensor) = recognizer.prepare(&raster)? else {
        println!("Nothing to recognize: the grid is blank");
        return Ok(());
    };

    let timeout = config.recognizer.timeout();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start the tokio runtime")?;
    let service = RecognitionService::new(runtime.handle(), classifier, timeout);
    service.submit(tensor)?;

    let outcome = runtime
        .block_on(service.wait_for_result(timeout + Duration::from_secs(1)))
        .unwrap_or(RecognitionOutcome::TimedOut);

    match outcome {
        RecognitionOutcome::Success(result) => {
            print!("{}", present(&result));
            Ok(())
        }
        RecognitionOutcome::Failed(message) => Err(anyhow::anyhow!("Recognition failed: {}", message)),
        RecognitionOutcome::TimedOut => Err(anyhow::anyhow!(
            "Recognition timed out after {} ms",
            config.recognizer.timeout_ms
        )),
    }
}
