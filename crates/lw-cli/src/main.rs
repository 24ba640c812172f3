//! Linework outline pass preview entry point
//!
//! Runs one outline frame headless and prints the commands it submits.

mod scene_file;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use lw_core::{Occlusion, OutlineSettings, OutlineTarget, ShaderKind};
use lw_renderer::{
    CommandRecorder, DrawCommand, FrameContext, FrameOutcome, HandleMaterialProvider,
    OutlineFeature, RenderTarget,
};

use scene_file::SceneFile;

#[derive(Parser, Debug)]
#[command(name = "lw-preview", version, about = "Headless outline pass preview")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter settings file
    Init {
        #[arg(default_value = "outlines.ron")]
        path: PathBuf,
    },
    /// Run one frame and print the submitted commands
    Frame {
        /// Outline settings (RON)
        #[arg(long)]
        settings: PathBuf,
        /// Scene with camera and objects (RON)
        #[arg(long)]
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lw_cli=info,lw_renderer=info,lw_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Init { path } => init(&path),
        Command::Frame { settings, scene } => frame(&settings, &scene),
    }
}

fn init(path: &Path) -> Result<()> {
    let settings = OutlineSettings::new(vec![
        OutlineTarget::new().with_color([1.0, 0.6, 0.0, 1.0]),
        OutlineTarget::new()
            .with_occlusion(Occlusion::WhenOccluded)
            .with_color([0.2, 0.4, 1.0, 0.6]),
    ]);
    settings.save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn frame(settings: &Path, scene: &Path) -> Result<()> {
    let mut feature = OutlineFeature::from_settings_file(settings)?;
    let scene_file = SceneFile::load(scene)?;
    let scene = scene_file.to_scene();

    let mut provider = HandleMaterialProvider::new();
    let mut recorder = CommandRecorder::new();
    let ctx = FrameContext::new(scene_file.camera, RenderTarget::default());

    tracing::info!(
        "Injection point: {}",
        feature.injection_point().display_name()
    );
    let outcome = feature.render_frame(&mut provider, &scene, &ctx, &mut recorder)?;

    for kind in ShaderKind::all() {
        if let Some(material) = feature.materials().get(*kind) {
            println!("{:<8} {} ({})", kind.to_string(), material.0, kind.shader_name());
        }
    }
    for command in recorder.take() {
        print_command(&scene, &command);
    }

    match outcome {
        FrameOutcome::Skipped(reason) => println!("Frame skipped: {:?}", reason),
        FrameOutcome::Rendered(stats) => println!(
            "Frame rendered: {} mask draw(s), {} outline draw(s), {} stencil clear(s)",
            stats.mask_draws, stats.outline_draws, stats.stencil_clears
        ),
    }

    feature.destroy(&mut provider);
    Ok(())
}

fn print_command(scene: &lw_renderer::Scene, command: &DrawCommand) {
    match command {
        DrawCommand::BeginPass { name, .. } => println!("begin {name}"),
        DrawCommand::Draw(draw) => {
            let name = scene
                .get_object(draw.object)
                .map(|o| o.name.as_str())
                .unwrap_or("?");
            let stencil = draw
                .state
                .stencil()
                .map(|s| {
                    format!(
                        "{:?}/{:?}/{:?} ref {}",
                        s.compare, s.pass_op, s.fail_op, s.reference
                    )
                })
                .unwrap_or_else(|| "none".to_string());
            println!(
                "  draw target {} object {:<12} pass {:?} depth {:?} stencil {}",
                draw.target_index,
                name,
                draw.pass_index,
                draw.state.depth_compare(),
                stencil
            );
        }
        DrawCommand::ClearStencil { vertex_count, .. } => {
            println!("  clear stencil ({vertex_count} vertices)")
        }
        DrawCommand::EndPass => println!("end"),
    }
}
