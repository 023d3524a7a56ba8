use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ringflight_common::{Difficulty, GameConfig};
use ringflight_input::{ControlFrame, Toggle};
use ringflight_kernel::{LevelGrid, SimEvent, Simulation};
use ringflight_render::{HudTextRenderer, RenderView, Renderer};
use ringflight_tools::SimInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ringflight-cli", about = "Headless tools for ringflight")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default difficulty table
    Info,
    /// Parse level files and report their rings
    Validate {
        /// Level files to check
        #[arg(required = true)]
        levels: Vec<PathBuf>,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fly the levels on autopilot without a window
    Run {
        /// Game configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Level files in play order
        #[arg(long = "level", default_values = ["levels/level1.txt", "levels/level2.txt", "levels/level3.txt"])]
        levels: Vec<PathBuf>,
        /// Craft mesh (OBJ)
        #[arg(long)]
        mesh: Option<PathBuf>,
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        /// Number of 10 ms ticks to simulate
        #[arg(short, long, default_value = "6000")]
        ticks: u64,
        /// Print the text HUD every N ticks (0 disables)
        #[arg(long, default_value = "500")]
        every: u64,
        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },
}

struct RunOptions {
    config: Option<PathBuf>,
    levels: Vec<PathBuf>,
    mesh: Option<PathBuf>,
    difficulty: Difficulty,
    ticks: u64,
    every: u64,
    json: bool,
}

fn info() {
    println!("ringflight-cli v{}", env!("CARGO_PKG_VERSION"));
    println!("assets: {}", ringflight_assets::crate_info());
    println!("render: {}", ringflight_render::crate_info());
    println!("tools: {}", ringflight_tools::crate_info());
    let config = GameConfig::default();
    println!("tick: {} s", config.tick_seconds);
    for difficulty in Difficulty::ALL {
        let s = config.settings(difficulty);
        println!(
            "{difficulty}: lives={} ring outer={} inner={} max force={} scale=({}, {}, {})",
            s.lives,
            s.ring_outer_radius,
            s.ring_inner_radius,
            s.max_force,
            s.scale.x,
            s.scale.y,
            s.scale.z
        );
    }
}

fn validate(levels: &[PathBuf], json: bool) -> Result<()> {
    let mut reports = Vec::with_capacity(levels.len());
    for path in levels {
        let grid =
            LevelGrid::load(path).with_context(|| format!("loading level {}", path.display()))?;
        reports.push(SimInspector::level(&grid));
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{report}");
        }
        println!("{} level(s) OK", reports.len());
    }
    Ok(())
}

fn run(opts: RunOptions) -> Result<()> {
    let config = match &opts.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let levels = opts
        .levels
        .iter()
        .map(|path| {
            LevelGrid::load(path).with_context(|| format!("loading level {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let craft_bounds = ringflight_assets::craft_bounds(opts.mesh.as_deref())
        .context("loading craft mesh")?;

    let mut sim = Simulation::new(config, levels, craft_bounds).context("building simulation")?;
    sim.new_game(opts.difficulty);
    sim.step(&ControlFrame::with_toggles([Toggle::Autopilot]));

    let hud = HudTextRenderer::new();
    let view = RenderView::default();
    let idle = ControlFrame::default();
    let mut rings = (0usize, 0usize, 0usize);
    for tick in 1..=opts.ticks {
        sim.step(&idle);
        for event in sim.drain_events() {
            match event {
                SimEvent::RingEntered { .. } => rings.0 += 1,
                SimEvent::RingCollided { .. } => rings.1 += 1,
                SimEvent::RingMissed { .. } => rings.2 += 1,
                SimEvent::LevelComplete { level } => {
                    tracing::info!(level = level + 1, tick, "level complete")
                }
                _ => {}
            }
        }
        if opts.every > 0 && tick % opts.every == 0 && !opts.json {
            print!("{}", hud.render(&sim, &view));
        }
        if sim.is_game_over() {
            tracing::info!(tick, "game over");
            break;
        }
    }

    let summary = SimInspector::summary(&sim);
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
        println!(
            "rings entered={} clipped={} missed={}",
            rings.0, rings.1, rings.2
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Info => {
            info();
            Ok(())
        }
        Commands::Validate { levels, json } => validate(&levels, json),
        Commands::Run {
            config,
            levels,
            mesh,
            difficulty,
            ticks,
            every,
            json,
        } => run(RunOptions {
            config,
            levels,
            mesh,
            difficulty,
            ticks,
            every,
            json,
        }),
    };
    result.inspect_err(|e| tracing::error!("{e:#}"))
}
