//! Application entry point for the grove viewer.
//!
//! This binary parses the command line, installs logging, builds the
//! [`Engine`] and hands it to [`Viewer`], which drives it inside an
//! eframe window.

mod painter;
mod signals;
mod viewer;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use grove_core::{Engine, EngineConfig, FlowerStyle};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use signals::HostSignals;
use viewer::Viewer;

/// Mood-driven blossoming tree animation
#[derive(Parser, Debug)]
#[command(name = "grove")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Engine config as JSON; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene mode: 1 single tree, 2 pair, 3 forest
    #[arg(short, long, default_value_t = 1)]
    scene_mode: i32,

    /// Flower style: peach, sakura or delonix
    #[arg(long, default_value_t = FlowerStyle::Peach)]
    style: FlowerStyle,

    /// Override the particle cap from the config
    #[arg(long)]
    max_particles: Option<usize>,

    /// Window width
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Window height
    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("grove v{}", env!("CARGO_PKG_VERSION"));

    let mut cfg = load_config(cli.config.as_deref())?;
    if let Some(max) = cli.max_particles {
        cfg.max_particles = max;
    }

    let signals = HostSignals::new(cli.style, cli.scene_mode, cfg.base_seed);
    let engine =
        Engine::new(signals, cli.width, cli.height, cfg).context("invalid engine config")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Grove")
            .with_inner_size([cli.width, cli.height]),
        ..Default::default()
    };

    eframe::run_native(
        "Grove",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(engine)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}

/// Reads an [`EngineConfig`] from a JSON file, or the defaults when no path
/// is given.
fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!(path = %path.display(), "loaded engine config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_single_peach_scene() {
        let cli = Cli::parse_from(["grove"]);
        assert_eq!(cli.scene_mode, 1);
        assert_eq!(cli.style, FlowerStyle::Peach);
        assert!(cli.config.is_none());
        assert!(cli.max_particles.is_none());
    }

    #[test]
    fn cli_parses_style_case_insensitively() {
        let cli = Cli::parse_from(["grove", "--style", "Sakura", "-s", "3"]);
        assert_eq!(cli.style, FlowerStyle::Sakura);
        assert_eq!(cli.scene_mode, 3);
    }

    #[test]
    fn cli_rejects_unknown_style() {
        assert!(Cli::try_parse_from(["grove", "--style", "tulip"]).is_err());
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn unreadable_config_reports_path() {
        let err = load_config(Some(Path::new("/nonexistent/grove.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/grove.json"));
    }
}
