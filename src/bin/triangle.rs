use anyhow::{Context, Result};
use glam::Vec4;
use glearn::{
    app::{self, FrameInfo},
    config::{AppConfig, WindowConfig},
    render::{GlContext, Mesh, ShaderProgram, VertexLayout},
    utils::init_logging,
};

const VERTEX_SOURCE: &str = r#"
#version 330 core
layout (location = 0) in vec3 pos;

void main() {
    gl_Position = vec4(pos, 1.0);
}
"#;

const FRAGMENT_SOURCE: &str = r#"
#version 330 core
out vec4 fragmentColor;

uniform vec4 green;

void main() {
    fragmentColor = green;
}
"#;

#[rustfmt::skip]
const VERTICES: [f32; 9] = [
     0.0,  0.5, 0.0,
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
];

struct Triangle {
    program: ShaderProgram,
    mesh: Mesh,
}

fn setup(gl: &GlContext) -> Result<Triangle> {
    let program = ShaderProgram::from_sources(gl, VERTEX_SOURCE, FRAGMENT_SOURCE)
        .map_err(|e| {
            log::error!("{}", e);
            e
        })
        .context("Failed to build triangle program")?;

    let layout = VertexLayout::new().with_attribute(0, 3);
    let mesh = Mesh::new(gl, &VERTICES, &layout).context("Failed to upload triangle")?;

    Ok(Triangle { program, mesh })
}

fn draw(triangle: &mut Triangle, _gl: &GlContext, frame: &FrameInfo) -> Result<()> {
    let green = frame.seconds().sin() / 2.0 + 0.5;

    triangle.program.set_used();
    triangle
        .program
        .set_uniform("green", Vec4::new(0.0, green, 0.0, 1.0));
    triangle.mesh.draw();
    Ok(())
}

fn main() -> Result<()> {
    let defaults = AppConfig {
        window: WindowConfig::default().with_title("Triangle"),
        ..AppConfig::default()
    };
    let (config, source) = AppConfig::load_or("triangle", defaults)?;
    init_logging(&config.logging)?;
    if let Some(path) = source {
        log::info!("Loaded config from {:?}", path);
    }

    app::run(&config.window, setup, draw)
}
