use anyhow::{Context, Result};
use glearn::{
    app::{self, FrameInfo},
    config::{AppConfig, WindowConfig},
    render::{GlContext, Mesh, PolygonMode, ShaderProgram, VertexLayout},
    utils::init_logging,
};
use std::path::Path;

const SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

#[rustfmt::skip]
const VERTICES: [f32; 24] = [
    // positions        // colors
    -0.5,  0.5, 0.0,    1.0, 1.0, 1.0,
     0.5,  0.5, 0.0,    1.0, 0.0, 0.0,
    -0.5, -0.5, 0.0,    0.0, 1.0, 0.0,
     0.5, -0.5, 0.0,    0.0, 0.0, 1.0,
];

const INDICES: [u32; 6] = [0, 1, 2, 1, 2, 3];

struct Quad {
    program: ShaderProgram,
    mesh: Mesh,
}

fn setup(gl: &GlContext) -> Result<Quad> {
    let dir = Path::new(SHADER_DIR);
    let program = ShaderProgram::from_files(gl, dir.join("quad.vert"), dir.join("quad.frag"))
        .map_err(|e| {
            log::error!("{}", e);
            e
        })
        .context("Failed to build quad program")?;

    let layout = VertexLayout::new()
        .with_attribute(0, 3)
        .with_attribute(1, 3);
    let mesh = Mesh::with_indices(gl, &VERTICES, &INDICES, &layout)
        .context("Failed to upload quad")?;

    gl.set_polygon_mode(PolygonMode::Line);
    Ok(Quad { program, mesh })
}

fn draw(quad: &mut Quad, _gl: &GlContext, _frame: &FrameInfo) -> Result<()> {
    quad.program.set_used();
    quad.mesh.draw();
    Ok(())
}

fn main() -> Result<()> {
    let defaults = AppConfig {
        window: WindowConfig::default().with_title("Quad"),
        ..AppConfig::default()
    };
    let (config, source) = AppConfig::load_or("quad", defaults)?;
    init_logging(&config.logging)?;
    if let Some(path) = source {
        log::info!("Loaded config from {:?}", path);
    }

    app::run(&config.window, setup, draw)
}
