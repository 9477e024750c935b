//! Command-line entry point for backdrop

use std::path::PathBuf;

use anyhow::{Context, Result};
use backdrop::{
    render_headless, FieldConfig, LinkMode, NeighborSearch, Rgba, SparkConfig, Viewport, WindowOptions,
};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(name = "backdrop")]
#[command(about = "Ambient particle-field backdrops", long_about = None)]
#[command(version)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a window and animate the backdrop
    Window {
        /// Window width in logical pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,

        /// Window height in logical pixels
        #[arg(long, default_value_t = 720)]
        height: u32,

        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        field: FieldArgs,
    },

    /// Render frames without a window and write the last one as PNG
    Snapshot {
        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = 720)]
        height: u32,

        /// Number of frames to simulate
        #[arg(long, default_value_t = 120)]
        frames: u32,

        /// Random seed
        #[arg(long, default_value_t = 1)]
        seed: u64,

        #[command(flatten)]
        field: FieldArgs,
    },
}

/// Field tuning shared by both subcommands
#[derive(Args)]
struct FieldArgs {
    /// Square pixels per particle
    #[arg(long, default_value_t = backdrop::DEFAULT_DENSITY)]
    density: u32,

    /// Maximum distance at which two particles are linked
    #[arg(long, default_value_t = backdrop::DEFAULT_LINK_DISTANCE)]
    link_distance: f32,

    /// Link each unordered pair once instead of twice
    #[arg(long)]
    unique_links: bool,

    /// Find links with a uniform grid instead of checking every pair
    #[arg(long)]
    grid: bool,

    /// Opacity of the whole layer over the background
    #[arg(long, default_value_t = 0.5)]
    opacity: f32,

    /// Leave out the rising sparks
    #[arg(long)]
    no_sparks: bool,
}

impl FieldArgs {
    fn config(&self) -> FieldConfig {
        let mut config = FieldConfig::default()
            .with_density(self.density)
            .with_link_distance(self.link_distance)
            .with_layer_opacity(self.opacity);
        if self.unique_links {
            config = config.with_link_mode(LinkMode::UniquePairs);
        }
        if self.grid {
            config = config.with_neighbor_search(NeighborSearch::Grid);
        }
        config
    }

    fn sparks(&self) -> Option<SparkConfig> {
        (!self.no_sparks).then(SparkConfig::default)
    }
}

/// Default log filter for the verbosity flags; `RUST_LOG` still wins.
fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.verbose, cli.quiet)),
    )
    .init();

    match cli.command {
        Commands::Window {
            width,
            height,
            seed,
            field,
        } => {
            let mut options = WindowOptions::default()
                .with_size(width, height)
                .with_field(field.config())
                .with_sparks(field.sparks());
            if let Some(seed) = seed {
                options = options.with_seed(seed);
            }
            backdrop::run(options).context("window host failed")
        }
        Commands::Snapshot {
            out,
            width,
            height,
            frames,
            seed,
            field,
        } => {
            let config = field.config();
            let opacity = config.layer_opacity;
            let frame = render_headless(
                Viewport::new(width, height),
                frames,
                config,
                field.sparks(),
                StdRng::seed_from_u64(seed),
            )
            .context("invalid field options")?;
            frame
                .save_png(&out, Rgba::NAVY, opacity)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("{}", out.display());
            Ok(())
        }
    }
}
