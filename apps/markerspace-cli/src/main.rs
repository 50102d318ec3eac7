mod demo;
mod scenario;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use markerspace_carousel::CarouselConfig;
use markerspace_render::{DebugTextRenderer, Renderer};
use tracing_subscriber::EnvFilter;

use scenario::{DEFAULT_FRAME_RATE, Scenario, Script};

#[derive(Parser)]
#[command(name = "markerspace-cli", about = "CLI harness for the marker-anchored prefab carousel")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the final state as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the built-in demo scenario
    Demo {
        /// Carousel config (YAML) whose primary has `left` and `right` parts;
        /// defaults to the built-in demo prefabs
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of built-in variants when no config is given
        #[arg(short = 'n', long, default_value = "3")]
        variants: usize,
    },
    /// Run a YAML scenario script
    Run {
        script: PathBuf,
        /// Overrides the config named in the script
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a carousel config
    CheckConfig { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("markerspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("ecs: {}", markerspace_ecs::crate_info());
            println!("scene: {}", markerspace_scene::crate_info());
            println!("input: {}", markerspace_input::crate_info());
            println!("render: {}", markerspace_render::crate_info());
            println!("carousel: {}", markerspace_carousel::crate_info());
        }
        Commands::Demo { config, variants } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => demo::demo_config(variants),
            };
            let mut run = Scenario::new(config, DEFAULT_FRAME_RATE);
            run.run(&demo::demo_steps())?;
            report(&run, cli.json)?;
        }
        Commands::Run { script, config } => {
            let script = Script::load(&script)?;
            let config = match config.as_deref().or(script.config.as_deref()) {
                Some(path) => load_config(path)?,
                None => {
                    tracing::info!("no config given, using built-in demo prefabs");
                    demo::demo_config(3)
                }
            };
            let mut run = Scenario::new(config, script.frame_rate);
            run.run(&script.steps)?;
            report(&run, cli.json)?;
        }
        Commands::CheckConfig { path } => {
            let config = load_config(&path)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!(
                    "OK: reference image {:?}, {} prefab(s)",
                    config.reference_image,
                    config.prefabs.len()
                );
                for (i, prefab) in config.prefabs.iter().enumerate() {
                    println!(
                        "  [{i}] {} parts={} animator={} audio={}",
                        prefab.name,
                        prefab.parts.len(),
                        prefab.animator.is_some(),
                        prefab.audio.as_ref().is_some_and(|a| a.clip.is_some()),
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<CarouselConfig> {
    CarouselConfig::load(path).with_context(|| format!("loading config {}", path.display()))
}

fn report(run: &Scenario, json: bool) -> anyhow::Result<()> {
    let summary = run.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print!("{}", DebugTextRenderer::new().render(run.scene()));
    println!(
        "marker {:?}: index={} of {} after {} frames ({:.2}s)",
        run.carousel().config().reference_image,
        summary.current_index,
        summary.variant_count,
        summary.frames,
        summary.time
    );
    println!("index history: {:?}", summary.index_history);
    println!(
        "highlighted: {}, label: {}",
        summary.highlighted.as_deref().unwrap_or("none"),
        summary.label.as_deref().unwrap_or("none")
    );
    println!(
        "events: scene={}, component={}",
        summary.scene_events,
        summary.component_events.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["markerspace-cli", "demo", "-v", "--json"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Demo { variants: 3, .. }));

        let cli = Cli::try_parse_from(["markerspace-cli", "run", "script.yaml", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.json);
    }
}
