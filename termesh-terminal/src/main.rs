//! termesh — depth-buffered ASCII renderer for Wavefront OBJ meshes.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use termesh_core::camera::ZOOM_DEFAULT;
use termesh_core::load_obj;
use termesh_terminal::{AppOptions, TerminalApp};

/// Uniform scale applied after normalization so the model fills most of the
/// viewport at the default zoom.
const MODEL_SCALE: f32 = 1.2;

#[derive(Parser)]
#[command(
    name = "termesh",
    version,
    about = "Render OBJ meshes as depth-correct ASCII in the terminal"
)]
struct Cli {
    /// Wavefront OBJ file to render
    file: PathBuf,

    /// Enable colors from the .mtl file
    #[arg(short, long)]
    color: bool,

    /// Keep the light fixed in world space instead of following the camera
    #[arg(short = 'l', long = "light")]
    static_light: bool,

    /// Start with the object spinning, optionally at DEG_PER_S
    #[arg(
        short,
        long,
        value_name = "DEG_PER_S",
        num_args = 0..=1,
        default_missing_value = "30"
    )]
    animate: Option<f32>,

    /// Initial zoom factor
    #[arg(short, long, default_value_t = ZOOM_DEFAULT)]
    zoom: f32,

    /// Flip face winding order
    #[arg(long)]
    flip: bool,

    /// Mirror the mesh along the x axis
    #[arg(long)]
    invert_x: bool,

    /// Mirror the mesh along the y axis
    #[arg(long)]
    invert_y: bool,

    /// Mirror the mesh along the z axis
    #[arg(long)]
    invert_z: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut mesh = load_obj(&cli.file, cli.color)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;
    log::info!(
        "loaded {}: {} vertices, {} faces, {} materials",
        cli.file.display(),
        mesh.vertices.len(),
        mesh.faces.len(),
        mesh.materials.len()
    );

    // fit the model to the viewport independent of its source units
    mesh.normalize();
    mesh.scale(MODEL_SCALE);

    if cli.flip {
        mesh.flip_faces();
    }
    if cli.invert_x {
        mesh.invert_x();
    }
    if cli.invert_y {
        mesh.invert_y();
    }
    if cli.invert_z {
        mesh.invert_z();
    }

    let mut app = TerminalApp::new(
        mesh,
        AppOptions {
            zoom: cli.zoom,
            animate: cli.animate,
            color: cli.color,
            static_light: cli.static_light,
        },
    )
    .context("failed to initialize terminal")?;

    app.run().context("render loop failed")
}
