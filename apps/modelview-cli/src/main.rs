use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use modelview_assets::{LoadRequest, run_pipeline};
use modelview_render::DebugTextRenderer;
use modelview_tools::SceneInspector;
use modelview_viewer::{ViewerApp, ViewerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modelview-cli", about = "Headless tool for the modelview viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the built-in configuration as YAML
    DefaultConfig,
    /// Load one OBJ model with its materials and print statistics
    Inspect {
        /// Geometry file
        obj: PathBuf,
        /// Material library (defaults to the OBJ path with .mtl)
        #[arg(long)]
        mtl: Option<PathBuf>,
    },
    /// Build the scene and load every configured model
    Load {
        /// Viewer config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the frame loop headlessly and print the last frame
    Run {
        /// Viewer config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to render
        #[arg(short, long, default_value = "3")]
        frames: u64,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::debug!("modelview-cli starting");

    match cli.command {
        Commands::Info => {
            println!("modelview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", modelview_assets::crate_info());
            println!("render: {}", modelview_render::crate_info());
            println!("tools: {}", modelview_tools::crate_info());
            println!("viewer: {}", modelview_viewer::crate_info());
        }
        Commands::DefaultConfig => {
            print!("{}", ViewerConfig::default().to_yaml()?);
        }
        Commands::Inspect { obj, mtl } => {
            let name = obj
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "model".into());
            let mut request = LoadRequest::new(name, &obj);
            if let Some(mtl) = mtl {
                request = request.with_materials(mtl);
            }
            let model = run_pipeline(&request)?;
            let (min, max) = model.bounds();
            println!(
                "{}: parts={} materials={} vertices={} triangles={}",
                model.name,
                model.parts.len(),
                model.materials.len(),
                model.vertex_count(),
                model.triangle_count()
            );
            println!(
                "bounds: ({:.2}, {:.2}, {:.2})..({:.2}, {:.2}, {:.2})",
                min.x, min.y, min.z, max.x, max.y, max.z
            );
            for part in &model.parts {
                let material = part
                    .material
                    .and_then(|i| model.materials.get(i))
                    .map_or("<default>", |m| m.name.as_str());
                println!(
                    "  part {}: triangles={} material={}",
                    part.name,
                    part.triangle_count(),
                    material
                );
            }
        }
        Commands::Load { config } => {
            let config = load_config(config.as_deref())?;
            let (width, height) = (config.window.width, config.window.height);
            let mut app = ViewerApp::init_gl(config, DebugTextRenderer::new(width, height))?;
            let report = app.load_content().context("content loading did not finish")?;
            println!("{report}");
            let failed = report.failures.len();

            println!("{}", SceneInspector::summary(app.scene()));
            for model in SceneInspector::describe_models(app.scene()) {
                println!("  {model}");
            }
            if failed > 0 {
                anyhow::bail!("{failed} model(s) failed to load");
            }
        }
        Commands::Run {
            config,
            frames,
            width,
            height,
        } => {
            let config = load_config(config.as_deref())?;
            let width = width.unwrap_or(config.window.width);
            let height = height.unwrap_or(config.window.height);

            let mut app = ViewerApp::init_gl(config, DebugTextRenderer::new(width, height))?;
            app.resize_display_gl(width, height);
            app.init_content();
            app.frame_loop_mut().set_max_frames(Some(frames));
            let ran = app.run()?;
            // Models still in flight land before the report is printed.
            app.wait_for_content();

            println!("{}", app.renderer().last_frame());
            println!("Ran {ran} frame(s)");
            if let Some(report) = app.report() {
                println!("{report}");
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}
