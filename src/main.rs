//! Binary entrypoint for the image gallery screen.
//!
//! Delegates all logic to the library crate; stdin lines stand in for the
//! device buttons and frames are reported through the log.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser};
use crossbeam_channel::Sender;
use photo_gallery::codec::ImageRsCodec;
use photo_gallery::input::{Button, Press, ScriptedInput};
use photo_gallery::render::console::ConsoleRenderer;
use photo_gallery::storage::LocalStorage;
use photo_gallery::{GalleryConfig, GalleryScreen};
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "photo-gallery", about = "Image gallery screen for e-paper devices")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to browse as the storage root (overrides the config)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(format!("photo_gallery={level}").parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

/// Forward stdin commands as button presses until stdin closes.
fn read_commands(tx: Sender<Press>, cfg: &GalleryConfig) {
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("stdin read failed: {err}");
                break;
            }
        };
        let press = match line.trim() {
            "" => continue,
            "settings" => Press::hold(Button::Confirm, cfg.settings_hold),
            "home" => Press::hold(Button::Back, cfg.go_home_hold),
            other => match other.parse::<Press>() {
                Ok(press) => press,
                Err(err) => {
                    warn!("ignoring `{other}`: {err}");
                    continue;
                }
            },
        };
        if tx.send(press).is_err() {
            break;
        }
    }
}

fn run_screen(cfg: GalleryConfig, mut input: ScriptedInput, cancel: CancellationToken) -> Result<()> {
    let storage = Arc::new(LocalStorage::new(&cfg.storage_root));
    let codec = Arc::new(ImageRsCodec::new(cfg.display));
    let renderer = Box::new(ConsoleRenderer::new(cfg.display));

    let go_home = {
        let cancel = cancel.clone();
        Box::new(move || cancel.cancel())
    };
    let mut screen = GalleryScreen::enter(&cfg, storage, codec, renderer, go_home)
        .context("starting render task")?;

    while !cancel.is_cancelled() {
        input.advance();
        if input.is_exhausted() {
            info!("stdin closed; leaving gallery");
            break;
        }
        screen.poll(&input, Instant::now());
        std::thread::sleep(POLL_INTERVAL);
    }

    screen.exit();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = match &cli.config {
        Some(path) => GalleryConfig::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GalleryConfig::default(),
    };
    if let Some(root) = cli.root {
        cfg.storage_root = root;
    }
    let cfg = cfg.validated().context("validating configuration")?;
    if !cfg.storage_root.is_dir() {
        return Err(anyhow!(
            "storage root {} is not a directory",
            cfg.storage_root.display()
        ));
    }

    let cancel = CancellationToken::new();
    let (press_tx, press_rx) = crossbeam_channel::unbounded::<Press>();

    // dropping the sender on stdin EOF lets the control loop drain queued
    // presses before it leaves the screen
    {
        let cfg = cfg.clone();
        std::thread::spawn(move || read_commands(press_tx, &cfg));
    }

    let control = {
        let cancel = cancel.clone();
        let input = ScriptedInput::new(press_rx);
        tokio::task::spawn_blocking(move || {
            let res = run_screen(cfg, input, cancel.clone());
            cancel.cancel();
            res
        })
    };

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(err) = res {
                warn!("ctrl-c handler failed: {err}");
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        }
        _ = cancel.cancelled() => {}
    }

    control.await.context("control loop panicked")??;
    Ok(())
}
