//! Dungeon map generator
//!
//! Generates a map and writes it as a map artifact.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use log::{info, warn};
use serde::Serialize;

use dg_core::dungeon::{Corridor, GeneratedMap, Generator, PlacementStats, Point, Room, render};
use dg_core::save::MapFile;
use dg_core::{GameRng, GenConfig};

/// Procedural dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungen")]
#[command(author, version, about = "Generate a dungeon map", long_about = None)]
struct Args {
    /// JSON configuration file; flags override its values
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long = "width")]
    width: Option<usize>,

    /// Grid height
    #[arg(long = "height")]
    height: Option<usize>,

    /// Smallest room side
    #[arg(long = "min-size")]
    min_size: Option<usize>,

    /// Largest room side
    #[arg(long = "max-size")]
    max_size: Option<usize>,

    /// Failed room placements allowed
    #[arg(long = "tries")]
    tries: Option<usize>,

    /// Required gap between rooms
    #[arg(long = "tolerance")]
    tolerance: Option<f64>,

    /// Uninitialized tile id
    #[arg(long = "default-tile")]
    default_tile: Option<u8>,

    /// Number of tile ids
    #[arg(long = "num-tiles")]
    num_tiles: Option<u16>,

    /// Only dig spanning tree corridors
    #[arg(long = "no-extra-edges")]
    no_extra_edges: bool,

    /// RNG seed (random if omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Output map file
    #[arg(short = 'o', long = "output", default_value = "world.dat")]
    output: PathBuf,

    /// Print the map as text
    #[arg(short = 'p', long = "print")]
    print: bool,

    /// Show room indices when printing
    #[arg(short = 'l', long = "labels")]
    labels: bool,

    /// Print a JSON summary of the run
    #[arg(long = "summary")]
    summary: bool,

    /// Read and print an existing map file instead of generating
    #[arg(long = "inspect", conflicts_with = "config")]
    inspect: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied
    fn gen_config(&self) -> Result<GenConfig> {
        let mut config = match &self.config {
            Some(path) => GenConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GenConfig::default(),
        };

        if let Some(w) = self.width {
            config.width = w;
        }
        if let Some(h) = self.height {
            config.height = h;
        }
        if let Some(min) = self.min_size {
            config.min_size = min;
        }
        if let Some(max) = self.max_size {
            config.max_size = max;
        }
        if self.tries.is_some() {
            config.tries = self.tries;
        }
        if self.tolerance.is_some() {
            config.tolerance = self.tolerance;
        }
        if let Some(d) = self.default_tile {
            config.tileset.default_tile = d;
        }
        if let Some(n) = self.num_tiles {
            config.tileset.num_tiles = n;
        }
        if self.no_extra_edges {
            config.extra_edges = false;
        }

        config.validate()?;
        Ok(config)
    }

    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Machine-readable description of a run
#[derive(Debug, Serialize)]
struct Summary<'a> {
    seed: u64,
    width: usize,
    height: usize,
    placement: PlacementStats,
    rooms: &'a [Room],
    tree_corridors: &'a [Corridor],
    extra_corridors: &'a [Corridor],
    final_ratio: Option<f64>,
    hit_cap: bool,
    starting_square: Option<Point>,
    output: &'a str,
}

impl<'a> Summary<'a> {
    fn new(map: &'a GeneratedMap, output: &'a str) -> Self {
        Self {
            seed: map.seed,
            width: map.grid.width(),
            height: map.grid.height(),
            placement: map.placement,
            rooms: map.rooms(),
            tree_corridors: &map.tree_corridors,
            extra_corridors: &map.augment.added,
            final_ratio: map.augment.final_ratio,
            hit_cap: map.augment.hit_cap,
            starting_square: map.starting_square,
            output,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    if let Some(path) = &args.inspect {
        return inspect(&args, path);
    }

    let config = args.gen_config()?;
    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => {
            let rng = GameRng::from_entropy();
            info!("Using seed {}", rng.seed());
            rng
        }
    };

    let map = Generator::new(config, rng)?.run()?;
    if map.augment.hit_cap {
        warn!("Stopped adding corridors at the cap");
    }

    MapFile::from_generated(&map)
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("Wrote {}", args.output.display());

    if args.print {
        println!("{}", render(&map.grid, &map.tileset, args.labels));
    }
    if args.summary {
        let output = args.output.to_string_lossy();
        println!(
            "{}",
            serde_json::to_string_pretty(&Summary::new(&map, &output))?
        );
    }
    Ok(())
}

/// Load a map file and print it
fn inspect(args: &Args, path: &Path) -> Result<()> {
    let file = MapFile::load(path).with_context(|| format!("reading {}", path.display()))?;
    let mut config = args.gen_config()?;
    config.tileset.default_tile = file.default_tile;
    let tileset = config.build_tileset()?;
    file.validate_tiles(&tileset)?;

    let Some(grid) = file.to_grid() else {
        bail!("{} does not describe a {}x{} grid", path.display(), file.width, file.height);
    };
    println!("{}", render(&grid, &tileset, args.labels));
    Ok(())
}
