//! conjure: command-line entry point.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use conjure::app::{run, InputChoice};
use conjure::config::AppConfig;
use particle_shapes::ShapeLibrary;

/// Hand-gesture particle controller.
///
/// Without a hand source the mouse drives the cloud.  Settings come from
/// `--config`, else ./conjure.json when present, else built-in defaults.
#[derive(Parser, Debug)]
#[command(author, version, long_about, verbatim_doc_comment)]
struct Args {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the mouse even when a hand source is given.
    #[arg(long)]
    pointer: bool,

    /// JSON-lines landmark stream; `-` reads stdin.
    #[arg(short, long, value_name = "PATH|-")]
    landmarks: Option<PathBuf>,

    /// Read hands from a LeapMotion controller.
    #[cfg(feature = "leap")]
    #[arg(long, conflicts_with = "landmarks")]
    leap: bool,

    /// Particle count (overrides the config file).
    #[arg(short, long)]
    particles: Option<usize>,

    /// Initial shape (overrides the config file).
    #[arg(short, long)]
    shape: Option<String>,

    /// Print the available shapes and exit.
    #[arg(long)]
    list_shapes: bool,
}

impl Args {
    fn input(&self) -> InputChoice {
        if self.pointer {
            return InputChoice::Pointer;
        }
        #[cfg(feature = "leap")]
        if self.leap {
            return InputChoice::Leap;
        }
        match &self.landmarks {
            Some(path) => InputChoice::Landmarks(path.clone()),
            None => InputChoice::Pointer,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list_shapes {
        for name in ShapeLibrary::with_builtins().names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut cfg = AppConfig::resolve(args.config.as_deref())?;
    if let Some(n) = args.particles {
        cfg.particles = n;
    }
    if let Some(shape) = &args.shape {
        if !ShapeLibrary::with_builtins().contains(shape) {
            bail!("unknown shape \"{}\" (try --list-shapes)", shape);
        }
        cfg.shape = shape.clone();
    }
    cfg.validate()?;

    let input = args.input();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Conjure - Hand-Driven Particle Controller           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match &input {
        InputChoice::Pointer => println!("  Input: mouse pointer"),
        InputChoice::Landmarks(p) => println!("  Input: landmarks from {}", p.display()),
        #[cfg(feature = "leap")]
        InputChoice::Leap => println!("  Input: LeapMotion hardware"),
    }
    println!("  Shape: {}   Particles: {}", cfg.shape, cfg.particles);
    println!();
    println!("  Opening visualizer window…");
    println!();

    run(cfg, input)
}
