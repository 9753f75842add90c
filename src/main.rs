use std::path::PathBuf;

use anyhow::Context;
use base64::Engine as _;
use clap::Parser;

use mauritius_map::{GeneratorConfig, Scene, DEFAULT_OUTPUT_PATH};

/// Draw the placeholder Mauritius map logo and write it as PNG.
#[derive(Parser, Debug)]
#[command(name = "mauritius-map", version, about)]
struct Cli {
    /// Output file; parent directories are created as needed
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Load the scene from a JSON file instead of the built-in map
    #[arg(long, value_name = "JSON")]
    scene: Option<PathBuf>,

    /// Print the built-in scene as JSON and exit
    #[arg(long)]
    dump_scene: bool,

    /// Also print the PNG as base64, for embedding
    #[arg(long)]
    base64: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.dump_scene {
        println!("{}", Scene::mauritius().to_json()?);
        return Ok(());
    }

    let mut config = GeneratorConfig::default();
    if let Some(path) = &cli.scene {
        config.scene = Scene::load(path).with_context(|| format!("loading scene {}", path.display()))?;
    }

    let asset = mauritius_map::generate_with(&config, &cli.output)
        .with_context(|| format!("generating {}", cli.output.display()))?;

    println!("Created Mauritius map at {}", asset.path.display());
    println!("File size: {} bytes", asset.bytes_written);
    println!("SHA-256: {}", asset.digest);
    if cli.base64 {
        println!("{}", base64::engine::general_purpose::STANDARD.encode(&asset.png_data));
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("mauritius-map failed: {:#}", e);
        std::process::exit(1);
    }
}
