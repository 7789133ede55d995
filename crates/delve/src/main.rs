//! delve: generate one tile-grid level and print it
//!
//! Reads a JSON configuration (or the bundled one), runs the generator for
//! one style and prints the level as ASCII art or JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use delve_core::{DungeonGenerator, DungeonStyle, GenerationConfig, Level};

const DEFAULT_CONFIG: &str = include_str!("../assets/default_config.json");

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Map drawing followed by a room summary
    Ascii,
    /// The whole level as JSON
    Json,
}

/// Procedural tile-grid level generator
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(
    author,
    version,
    about = "Delve - generate a dungeon, spaceship or cave level",
    long_about = None
)]
struct Args {
    /// Configuration file (JSON); the bundled configuration if absent
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Level style (dungeon, spaceship, cave)
    #[arg(short = 's', long = "style", default_value = "dungeon")]
    style: DungeonStyle,

    /// Seed; a random one is picked and reported if absent
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Grid width override, in cells
    #[arg(long = "width")]
    width: Option<i32>,

    /// Grid height override, in cells
    #[arg(long = "height")]
    height: Option<i32>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Ascii)]
    format: Format,

    /// Verbose output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GenerationConfig> {
    let Some(path) = path else {
        return serde_json::from_str(DEFAULT_CONFIG).context("parsing bundled configuration");
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading configuration {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing configuration {}", path.display()))
}

fn print_ascii(level: &Level) {
    println!("{}", level.tile_map());
    println!();
    println!(
        "{} level, seed {}, {}x{}: {} rooms, {} corridors, {} occupants",
        level.style,
        level.seed,
        level.grid.width,
        level.grid.height,
        level.rooms.len(),
        level.corridors.len(),
        level.occupant_count()
    );
    for room in &level.rooms {
        let shape = room.shape().map(|s| s.to_string()).unwrap_or_default();
        let origin = room.origin().unwrap_or_default();
        println!(
            "  room {:>3} {:<12} {:<9} at ({:>2},{:>2}) {}x{}  enemies {} artifacts {} items {}",
            room.id,
            room.room_type,
            shape,
            origin.x,
            origin.y,
            room.width(),
            room.height(),
            room.enemies.len(),
            room.artifacts.len(),
            room.items.len()
        );
    }
    if !level.warnings.is_empty() {
        println!("{} warnings (see log)", level.warnings.len());
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.grid.width = width;
    }
    if let Some(height) = args.height {
        config.grid.height = height;
    }

    let styles: Vec<String> = DungeonStyle::iter().map(|s| s.to_string()).collect();
    info!(style = %args.style, available = ?styles, "style selected");

    let generator = match args.seed {
        Some(seed) => DungeonGenerator::new(args.style, seed),
        None => DungeonGenerator::from_entropy(args.style),
    };
    let level = generator
        .generate(&config)
        .with_context(|| format!("generating {} level", args.style))?;

    match args.format {
        Format::Ascii => print_ascii(&level),
        Format::Json => println!("{}", serde_json::to_string_pretty(&level)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_is_valid() {
        let config = load_config(None).unwrap();
        config.validate().unwrap();
        for style in DungeonStyle::iter() {
            assert!(!config.for_style(style).rooms.is_empty(), "no rooms for {style}");
        }
    }

    #[test]
    fn test_bundled_config_generates_every_style() {
        let config = load_config(None).unwrap();
        for style in DungeonStyle::iter() {
            let level = DungeonGenerator::new(style, 42).generate(&config).unwrap();
            assert!(level.is_connected());
        }
    }

    #[test]
    fn test_args_parse() {
        let args =
            Args::parse_from(["delve", "--style", "Cave", "--seed", "9", "-f", "json", "-vv"]);
        assert_eq!(args.style, DungeonStyle::Cave);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.verbose, 2);
    }
}
