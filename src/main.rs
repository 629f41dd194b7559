//! layerstack - interactive 3D viewer for neural network layer stacks
//!
//! Each layer is drawn as a box sized by the log of its dimensions, stacked
//! along the depth axis with labels, a color legend and an edit panel.

mod config;
mod viewer;

use anyhow::{Context, Result};
use config::ViewerConfig;
use layerstack_core::NetworkState;
use std::{env, path::PathBuf};
use tracing::info;
use viewer::{Viewer, ViewerAction};
use winit::event_loop::{ControlFlow, EventLoop};

const USAGE: &str = "\
Usage: layerstack [OPTIONS]

Options:
  --config <PATH>        Viewer settings (default: config/layerstack.toml)
  --network <PATH>       Network description to show instead of the built-in one
  --resolution <WxH>     Initial window size, e.g. 1280x720
  --dump-layout          Print the computed layout as JSON and exit
  --dump-network         Print the loaded network description as TOML and exit
  --write-config <PATH>  Write the effective viewer settings to PATH and exit
  -h, --help             Show this message";

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting layerstack v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    if cli.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => ViewerConfig::load_from_path(path),
        None => ViewerConfig::load(),
    };

    if let Some(path) = &cli.write_config {
        config
            .save_to_path(path)
            .with_context(|| format!("writing viewer config {}", path.display()))?;
        info!(path = %path.display(), "viewer config written");
        return Ok(());
    }

    let state = match cli.network.as_ref().or(config.network.as_ref()) {
        Some(path) => NetworkState::load_from_path(path)
            .with_context(|| format!("loading network description {}", path.display()))?,
        None => NetworkState::default(),
    };
    info!(
        layers = state.layers.len(),
        legend = state.legend.len(),
        "network loaded"
    );

    if cli.dump_network {
        print!("{}", state.to_toml_string()?);
        return Ok(());
    }

    if cli.dump_layout {
        let layout = state.layout();
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut viewer = Viewer::new(&event_loop, &config, cli.resolution, state)?;

    event_loop.run(move |event, elwt| match viewer.handle_event(&event) {
        ViewerAction::Continue => {}
        ViewerAction::Quit => {
            info!("Exiting layerstack");
            elwt.exit();
        }
    })?;

    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    config: Option<PathBuf>,
    network: Option<PathBuf>,
    resolution: Option<(u32, u32)>,
    write_config: Option<PathBuf>,
    dump_layout: bool,
    dump_network: bool,
    help: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--network" => {
                    if let Some(path) = args.next() {
                        opts.network = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--network requires a file path");
                    }
                }
                "--resolution" => {
                    if let Some(raw) = args.next() {
                        opts.resolution = parse_resolution(&raw);
                        if opts.resolution.is_none() {
                            tracing::error!(value = %raw, "--resolution must be like 1280x720");
                        }
                    } else {
                        tracing::error!("--resolution requires a value like 1280x720");
                    }
                }
                "--write-config" => {
                    if let Some(path) = args.next() {
                        opts.write_config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--write-config requires a file path");
                    }
                }
                "--dump-layout" => opts.dump_layout = true,
                "--dump-network" => opts.dump_network = true,
                "-h" | "--help" => opts.help = true,
                other => {
                    tracing::warn!(arg = other, "ignoring unknown argument");
                }
            }
        }

        opts
    }
}

fn parse_resolution(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.split_once('x')?;
    match (w.parse::<u32>(), h.parse::<u32>()) {
        (Ok(width), Ok(height)) if width > 0 && height > 0 => Some((width, height)),
        _ => None,
    }
}
