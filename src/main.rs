mod app;
mod background;
mod config;
mod error;
mod geometry;
mod item;
mod scene;
mod view;

use std::path::PathBuf;

use anyhow::{bail, Context};
use eframe::egui;

use crate::app::BoxEditorApp;
use crate::config::EditorConfig;

const USAGE: &str = "Usage: boxeditor [--config <file.json>] [image]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    image: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ if arg.starts_with('-') => bail!("unknown option {arg}\n{USAGE}"),
            _ if parsed.image.is_some() => bail!("only one image can be given\n{USAGE}"),
            _ => parsed.image = Some(PathBuf::from(arg)),
        }
    }
    Ok(parsed)
}

/// Console logging filtered by `RUST_LOG`, `info` by default.
fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let args = parse_args(std::env::args().skip(1))?;
    let mut config = EditorConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(image) = args.image {
        config.image_path = Some(image);
    }

    let title = app::window_title(config.image_path.as_deref());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title(&title),
        ..Default::default()
    };

    tracing::info!(image = ?config.image_path, "starting editor");
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(BoxEditorApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run editor: {e}"))
}
