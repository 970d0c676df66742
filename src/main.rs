use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use strata::{
    ChunkWorkers, GenerationConfig, GenerationType, TileRegistry, TileWorld, Vec2, WorldOptions,
    WorldSave, load_config_from_path, load_world_from_path, preview, save_world_to_path,
};

#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Procedural 2D tile worlds")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a world and print an ASCII preview
    Generate {
        #[command(flatten)]
        world: WorldArgs,
        /// Left edge of the preview window
        #[arg(long, default_value_t = 0)]
        x: i32,
        /// Top edge of the preview window
        #[arg(long, default_value_t = 0)]
        y: i32,
        /// Preview columns (defaults to the world width, or 80)
        #[arg(long)]
        cols: Option<usize>,
        /// Preview rows (defaults to the world height, or 40)
        #[arg(long)]
        rows: Option<usize>,
        /// Dim tiles that are mostly dark
        #[arg(long, default_value_t = false)]
        shade: bool,
        /// Generate infinite-world chunks on background workers
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Generate a world and write it to a file
    Save {
        #[command(flatten)]
        world: WorldArgs,
        /// Output path
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Summarise a saved world
    Info {
        /// World file
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct WorldArgs {
    /// Generation config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Tile table (TOML)
    #[arg(long)]
    tiles: Option<PathBuf>,
    /// Override the config seed
    #[arg(long)]
    seed: Option<u32>,
    /// Override the generation type (terraria, noise, caverns, islands, flat, mountains)
    #[arg(long = "type")]
    generation_type: Option<GenerationType>,
    #[arg(long, default_value_t = 120)]
    width: usize,
    #[arg(long, default_value_t = 60)]
    height: usize,
    /// Stream chunks instead of generating a fixed-size grid
    #[arg(long, default_value_t = false)]
    infinite: bool,
    #[arg(long, default_value_t = 32)]
    chunk_size: usize,
    /// Chunks kept loaded around the reference point
    #[arg(long, default_value_t = 2)]
    load_radius: i32,
    #[arg(long, default_value_t = strata::DEFAULT_GRADIENT_SIZE)]
    gradient_size: u32,
    #[arg(long, default_value_t = false)]
    no_lighting: bool,
}

impl WorldArgs {
    fn build(&self) -> Result<TileWorld, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(p) => load_config_from_path(p)?,
            None => GenerationConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(t) = self.generation_type {
            config.generation_type = t;
        }
        let registry = match &self.tiles {
            Some(p) => TileRegistry::load_from_path(p)?,
            None => TileRegistry::builtin(),
        };
        let options = if self.infinite {
            WorldOptions::infinite(self.chunk_size, self.load_radius)
        } else {
            WorldOptions::finite(self.width, self.height)
        }
        .with_lighting(!self.no_lighting && !self.infinite)
        .with_gradient_size(self.gradient_size);
        Ok(TileWorld::new(options, config, registry)?)
    }
}

fn stream_chunks(world: &mut TileWorld, x: i32, y: i32, workers: Option<usize>) -> Result<(), Box<dyn Error>> {
    match workers {
        Some(n) => {
            let mut pool = ChunkWorkers::new(n)?;
            let queued = world.request_chunks(&mut pool, x, y);
            log::info!(target: "runtime", "queued {queued} chunk(s)");
            while pool.pending_len() > 0 {
                world.publish_chunks(&mut pool, x, y);
                std::thread::sleep(Duration::from_millis(2));
            }
        }
        None => {
            let generated = world.preload(x, y);
            log::info!(target: "chunks", "preloaded {generated} chunk(s)");
        }
    }
    Ok(())
}

/// Infinite saves are opened without lighting.
fn inspect_options(save: &WorldSave) -> WorldOptions {
    WorldOptions::default().with_lighting(!save.is_infinite())
}

fn info(path: &Path) -> Result<(), Box<dyn Error>> {
    let save = load_world_from_path(path)?;
    let mut world = TileWorld::from_save(&save, inspect_options(&save))?;
    let cfg = world.config().clone();
    println!("file:        {}", path.display());
    println!("generation:  {} (seed {})", cfg.generation_type.name(), cfg.seed);
    println!("tile types:  {}", world.registry().len());
    if let Some(stats) = world.chunk_stats() {
        println!("mode:        infinite (chunk size {})", world.chunk_store().map_or(0, |s| s.chunk_size()));
        println!("chunks:      {} saved", stats.cached);
        println!("edits:       {} tile(s) in {} chunk(s)", stats.tile_edits, stats.edited_chunks);
    } else if let Some(grid) = world.grid() {
        let (w, h) = (grid.width(), grid.height());
        let solid = grid.tiles().iter().filter(|id| world.registry().is_solid(**id)).count();
        println!("mode:        finite {w}x{h}");
        println!("solid tiles: {solid} of {}", w * h);
        let hit = world.raycast(Vec2::new(w as f32 / 2.0, 0.5), Vec2::new(w as f32 / 2.0, h as f32));
        if hit.hit {
            println!("surface:     y = {} at x = {}", hit.tile_y, hit.tile_x);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate {
            world: args,
            x,
            y,
            cols,
            rows,
            shade,
            workers,
        } => {
            let mut world = args.build()?;
            let (default_cols, default_rows) = if args.infinite {
                (80, 40)
            } else {
                (args.width, args.height)
            };
            let cols = cols.unwrap_or(default_cols);
            let rows = rows.unwrap_or(default_rows);
            if world.is_infinite() {
                let center = (x + cols as i32 / 2, y + rows as i32 / 2);
                stream_chunks(&mut world, center.0, center.1, workers)?;
            }
            for line in preview::render(&mut world, x, y, cols, rows, shade) {
                println!("{line}");
            }
            if let Some(stats) = world.chunk_stats() {
                log::info!(
                    target: "chunks",
                    "{} cached, {} generated, {} evicted",
                    stats.cached, stats.generated_total, stats.evicted_total
                );
            }
        }
        Command::Save { world: args, out } => {
            let mut world = args.build()?;
            if world.is_infinite() {
                world.preload(0, 0);
            }
            save_world_to_path(&world.to_save(), &out)?;
        }
        Command::Info { path } => info(&path)?,
    }
    Ok(())
}
