use clap::{Parser, Subcommand};
use rolestage_common::ViewerConfig;
use rolestage_render::{DebugTextRenderer, Renderer};
use rolestage_scene::{assemble_scene, PerspectiveCamera, SceneOptions};
use rolestage_tools::SceneInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rolestage-cli", about = "CLI tool for inspecting the rolestage scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Assemble the stage scene and describe what a frame would draw
    Describe {
        /// Print a JSON summary instead of the text dump
        #[arg(long)]
        json: bool,
        /// Viewport width used for the camera
        #[arg(long)]
        width: Option<u32>,
        /// Viewport height used for the camera
        #[arg(long)]
        height: Option<u32>,
    },
}

fn describe(config: &ViewerConfig, json: bool) -> anyhow::Result<String> {
    let scene = assemble_scene(&SceneOptions {
        shadows: config.shadows,
    });
    if json {
        let summary = SceneInspector::summary(&scene);
        return Ok(serde_json::to_string_pretty(&summary)?);
    }

    let camera = PerspectiveCamera::for_viewport(config.window.width, config.window.height);
    let mut out = DebugTextRenderer::new().render(&scene, &camera);
    out.push_str(&SceneInspector::summary(&scene).to_string());
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let mut config = ViewerConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("rolestage-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", rolestage_common::crate_info());
            println!("assets: {}", rolestage_assets::crate_info());
            println!("scene: {}", rolestage_scene::crate_info());
            println!("render: {}", rolestage_render::crate_info());
            println!("input: {}", rolestage_input::crate_info());
            println!("tools: {}", rolestage_tools::crate_info());
            println!(
                "config: {}x{} shadows={} clear={}",
                config.window.width, config.window.height, config.shadows, config.clear_color
            );
        }
        Commands::Describe {
            json,
            width,
            height,
        } => {
            if let Some(width) = width {
                config.window.width = width;
            }
            if let Some(height) = height {
                config.window.height = height;
            }
            println!("{}", describe(&config, json)?);
        }
    }

    Ok(())
}
