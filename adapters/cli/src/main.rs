#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line front-end that generates Delve dungeons.

mod ascii_map;
mod share_code;

use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use delve_core::{Command, DungeonSummary, Event, GenerationConfig, Seed};
use delve_rendering::{write_obj, Scene, SceneInput, WallMode, DEFAULT_WALL_HEIGHT};
use delve_world::{self as world, query, Dungeon, World};
use serde::Serialize;

use crate::share_code::ShareCode;

/// Generates a cave dungeon and prints it as text.
#[derive(Debug, Parser)]
#[command(name = "delve", version)]
struct Args {
    /// TOML file holding a base generation configuration.
    #[arg(long = "config", value_name = "FILE", conflicts_with = "import")]
    config: Option<PathBuf>,

    /// Share code to reproduce instead of a configuration file.
    #[arg(long = "import", value_name = "CODE")]
    import: Option<String>,

    /// Grid width in cells.
    #[arg(long = "width")]
    width: Option<u32>,

    /// Grid height in cells.
    #[arg(long = "height")]
    height: Option<u32>,

    /// Seed, either an integer or any text.
    #[arg(long = "seed")]
    seed: Option<String>,

    /// Percentage of interior cells that start solid.
    #[arg(long = "fill", value_name = "PERCENT")]
    fill: Option<u8>,

    /// Smallest room edge length.
    #[arg(long = "room-min")]
    room_min: Option<u32>,

    /// Largest room edge length.
    #[arg(long = "room-max")]
    room_max: Option<u32>,

    /// Number of random room placements to attempt.
    #[arg(long = "room-attempts")]
    room_attempts: Option<u32>,

    /// Number of smoothing passes.
    #[arg(long = "smooth", value_name = "PASSES")]
    smooth: Option<u32>,

    /// Carve passages so that every cave room is reachable.
    #[arg(long = "connect-regions")]
    connect_regions: bool,

    /// Regenerate the noise at this fill after the first pass, keeping the rooms.
    #[arg(long = "regenerate-fill", value_name = "PERCENT")]
    regenerate_fill: Option<u8>,

    /// Write the dungeon geometry as a Wavefront OBJ file.
    #[arg(long = "obj", value_name = "FILE")]
    obj: Option<PathBuf>,

    /// How walls are represented in the exported geometry.
    #[arg(long = "wall-mode", value_enum, default_value_t = WallArg::Extruded)]
    wall_mode: WallArg,

    /// Print a share code reproducing this dungeon.
    #[arg(long = "share")]
    share: bool,

    /// Print the summary as JSON instead of the map.
    #[arg(long = "json")]
    json: bool,

    /// Additional logging to stderr; repeat for more.
    #[arg(long = "verbose", short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum WallArg {
    /// Vertical wall quads below the outlines.
    Extruded,
    /// Flat edge paths following the outlines.
    Edges,
}

impl From<WallArg> for WallMode {
    fn from(arg: WallArg) -> Self {
        match arg {
            WallArg::Extruded => WallMode::Extruded,
            WallArg::Edges => WallMode::EdgePaths,
        }
    }
}

impl Args {
    /// Builds the configuration from the base source and the flag overrides.
    fn resolve_config(&self) -> Result<GenerationConfig, anyhow::Error> {
        let mut config = if let Some(code) = &self.import {
            ShareCode::decode(code)
                .context("failed to import share code")?
                .config
        } else if let Some(path) = &self.config {
            load_config(path)?
        } else {
            GenerationConfig::default()
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(seed) = &self.seed {
            config.seed = Some(Seed::from(seed.as_str()));
        }
        if let Some(fill) = self.fill {
            config.fill_percent = fill;
        }
        if let Some(min) = self.room_min {
            config.room_size.min = min;
        }
        if let Some(max) = self.room_max {
            config.room_size.max = max;
        }
        if let Some(attempts) = self.room_attempts {
            config.room_attempts = attempts;
        }
        if let Some(passes) = self.smooth {
            config.smoothing_passes = passes;
        }
        if self.connect_regions {
            config.connect_regions = true;
        }

        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<GenerationConfig, anyhow::Error> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("failed to parse configuration {}", path.display()))
}

fn install_logging(verbose: u8) -> Result<(), anyhow::Error> {
    use log::LevelFilter::{Debug, Info, Off, Trace};

    let level = match verbose {
        0 => Info,
        1 => Debug,
        _ => Trace,
    };
    simplelog::WriteLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        std::io::stderr(),
    )
    .context("failed to install logger")
}

#[derive(Debug, Serialize)]
struct Report {
    seed: String,
    summary: DungeonSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_code: Option<String>,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    install_logging(args.verbose)?;

    let config = args.resolve_config()?;
    let mut world = World::new();
    let mut commands = vec![Command::Generate { config }];
    if let Some(fill_percent) = args.regenerate_fill {
        commands.push(Command::RegenerateFill { fill_percent });
    }

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        for event in events {
            if let Event::GenerationRejected { error } = event {
                return Err(anyhow::Error::new(error).context("dungeon generation failed"));
            }
        }
    }

    let dungeon = query::dungeon(&world).context("no dungeon was generated")?;

    if let Some(path) = &args.obj {
        export_obj(dungeon, args.wall_mode.into(), path)?;
        log::info!("wrote {}", path.display());
    }

    let share_code = if args.share {
        let code = ShareCode::new(dungeon.config().clone())
            .and_then(|code| code.encode())
            .context("failed to build share code")?;
        Some(code)
    } else {
        None
    };

    let report = Report {
        seed: dungeon.seed().to_string(),
        summary: dungeon.summary(),
        share_code,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report).context("failed to write summary")?;
        writeln!(out)?;
    } else {
        write!(out, "{}", ascii_map::render(dungeon.grid(), dungeon.rooms()))?;
        print_summary(&mut out, &report)?;
    }

    Ok(())
}

fn export_obj(dungeon: &Dungeon, mode: WallMode, path: &Path) -> Result<(), anyhow::Error> {
    let input = SceneInput {
        grid: dungeon.grid(),
        mesh: dungeon.mesh(),
        outlines: dungeon.outlines(),
        rooms: dungeon.rooms(),
        mesh_padding: dungeon.mesh_padding(),
        square_size: dungeon.config().square_size,
    };
    let scene = Scene::build(&input, mode, DEFAULT_WALL_HEIGHT).context("failed to build scene")?;

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_obj(&scene, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))
}

fn print_summary(out: &mut impl std::io::Write, report: &Report) -> std::io::Result<()> {
    let summary = &report.summary;
    writeln!(out, "seed:       {}", report.seed)?;
    writeln!(out, "size:       {}x{}", summary.width, summary.height)?;
    writeln!(out, "rooms:      {}", summary.rooms)?;
    writeln!(out, "cave rooms: {}", summary.cave_rooms)?;
    writeln!(out, "solid:      {}", summary.solid_cells)?;
    writeln!(
        out,
        "mesh:       {} vertices, {} triangles",
        summary.vertices, summary.triangles
    )?;
    writeln!(out, "outlines:   {}", summary.outlines)?;
    if let Some(code) = &report.share_code {
        writeln!(out, "share:      {code}")?;
    }
    Ok(())
}
