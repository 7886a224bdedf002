//! Shader program checks against a real driver.
//!
//! Runs without the libtest harness because winit wants the event loop on
//! the main thread. Without a display or a GL 3.3 context the checks are
//! skipped.

use glearn::{
    GlContext, Mesh, RenderWindow, ShaderError, ShaderKind, ShaderProgram, VertexLayout,
    WindowConfig,
};
use std::fs;
use std::process::ExitCode;
use tempfile::tempdir;
use winit::event_loop::EventLoop;

const PASS_VERTEX: &str = r#"
#version 330 core
layout (location = 0) in vec3 pos;
void main() {
    gl_Position = vec4(pos, 1.0);
}
"#;

const CONSTANT_FRAGMENT: &str = r#"
#version 330 core
out vec4 color;
void main() {
    color = vec4(1.0, 0.5, 0.2, 1.0);
}
"#;

const UNIFORM_FRAGMENT: &str = r#"
#version 330 core
out vec4 color;
uniform int mode;
uniform float scale;
uniform vec2 offset;
uniform vec3 shade;
uniform vec4 tint;
void main() {
    color = tint * scale + vec4(shade, float(mode)) + vec4(offset, 0.0, 0.0);
}
"#;

const BROKEN_VERTEX: &str = r#"
#version 330 core
layout (location = 0) in vec3 pos;
void main() {
    gl_Position = vec4(pos, 1.0)
}
"#;

const VARYING_FRAGMENT: &str = r#"
#version 330 core
in vec3 vertexColor;
out vec4 color;
void main() {
    color = vec4(vertexColor, 1.0);
}
"#;

const MATRIX_FRAGMENT: &str = r#"
#version 330 core
out vec4 color;
uniform mat4 transform;
void main() {
    color = transform * vec4(1.0, 0.5, 0.2, 1.0);
}
"#;

#[rustfmt::skip]
const QUAD_VERTICES: [f32; 24] = [
    // position         colour
     0.5,  0.5, 0.0,    1.0, 0.0, 0.0,
     0.5, -0.5, 0.0,    0.0, 1.0, 0.0,
    -0.5,  0.5, 0.0,    0.0, 0.0, 1.0,
    -0.5, -0.5, 0.0,    1.0, 1.0, 0.0,
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 1, 2, 3];

type Check = fn(&GlContext) -> Result<(), String>;

fn main() -> ExitCode {
    if cfg!(all(unix, not(target_os = "macos")))
        && std::env::var_os("DISPLAY").is_none()
        && std::env::var_os("WAYLAND_DISPLAY").is_none()
    {
        println!("gl_program: no display, skipping");
        return ExitCode::SUCCESS;
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            println!("gl_program: no event loop ({e}), skipping");
            return ExitCode::SUCCESS;
        }
    };

    let config = WindowConfig {
        title: "gl_program".to_string(),
        visible: false,
        vsync: false,
        ..WindowConfig::default()
    };
    let window = match RenderWindow::new(&*event_loop, &config) {
        Ok(window) => window,
        Err(e) => {
            println!("gl_program: no OpenGL 3.3 context ({e:#}), skipping");
            return ExitCode::SUCCESS;
        }
    };

    let checks: [(&str, Check); 9] = [
        ("valid program has a non-zero id", valid_program_has_id),
        ("program loads from files", program_from_files),
        ("uniforms read back exactly", uniforms_read_back),
        ("unknown uniform is a no-op", unknown_uniform_is_noop),
        ("broken vertex stage is a vertex compile error", broken_vertex_reported),
        ("interface mismatch is a link error", mismatch_is_link_error),
        ("draw leaves no GL error", draw_without_error),
        ("mat4 uniform reads back", mat4_uniform_read_back),
        ("indexed quad draws", quad_indexed_draw),
    ];

    let mut failed = 0;
    for (name, check) in checks {
        window.gl().drain_errors();
        match check(window.gl()) {
            Ok(()) => println!("test {name} ... ok"),
            Err(reason) => {
                println!("test {name} ... FAILED: {reason}");
                failed += 1;
            }
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        println!("{failed} check(s) failed");
        ExitCode::FAILURE
    }
}

fn valid_program_has_id(gl: &GlContext) -> Result<(), String> {
    let program = ShaderProgram::from_sources(gl, PASS_VERTEX, CONSTANT_FRAGMENT)
        .map_err(|e| e.to_string())?;
    if program.id() == 0 {
        return Err("program id is 0".into());
    }
    program.set_used();
    gl.check_error().map_err(|e| e.to_string())
}

fn program_from_files(gl: &GlContext) -> Result<(), String> {
    let dir = tempdir().map_err(|e| e.to_string())?;
    let vertex = dir.path().join("pass.vert");
    let fragment = dir.path().join("constant.frag");
    fs::write(&vertex, PASS_VERTEX).map_err(|e| e.to_string())?;
    fs::write(&fragment, CONSTANT_FRAGMENT).map_err(|e| e.to_string())?;

    let program = ShaderProgram::from_files(gl, &vertex, &fragment).map_err(|e| e.to_string())?;
    if program.id() == 0 {
        return Err("program id is 0".into());
    }

    match ShaderProgram::from_files(gl, &vertex, dir.path().join("absent.frag")) {
        Err(ShaderError::Read {
            kind: ShaderKind::Fragment,
            ..
        }) => Ok(()),
        Err(other) => Err(format!("expected fragment read error, got {other}")),
        Ok(_) => Err("missing fragment file produced a program".into()),
    }
}

fn uniforms_read_back(gl: &GlContext) -> Result<(), String> {
    let mut program = ShaderProgram::from_sources(gl, PASS_VERTEX, UNIFORM_FRAGMENT)
        .map_err(|e| e.to_string())?;

    program.set_uniform_1i("mode", 7);
    program.set_uniform_1f("scale", 0.1);
    program.set_uniform_2f("offset", -1.5, 2.25);
    program.set_uniform_3f("shade", 0.3, 0.6, 0.9);
    program.set_uniform_4f("tint", 0.0, 0.75, 0.0, 1.0);

    expect_eq("mode", program.uniform_i32("mode"), Some(7))?;
    expect_eq("scale", program.uniform_f32s::<1>("scale"), Some([0.1]))?;
    expect_eq("offset", program.uniform_f32s::<2>("offset"), Some([-1.5, 2.25]))?;
    expect_eq("shade", program.uniform_f32s::<3>("shade"), Some([0.3, 0.6, 0.9]))?;
    expect_eq(
        "tint",
        program.uniform_f32s::<4>("tint"),
        Some([0.0, 0.75, 0.0, 1.0]),
    )?;
    gl.check_error().map_err(|e| e.to_string())
}

fn unknown_uniform_is_noop(gl: &GlContext) -> Result<(), String> {
    let mut program = ShaderProgram::from_sources(gl, PASS_VERTEX, UNIFORM_FRAGMENT)
        .map_err(|e| e.to_string())?;

    program.set_uniform("tint", [0.25f32, 0.5, 0.75, 1.0]);
    program.set_uniform("Tint", [9.0f32, 9.0, 9.0, 9.0]);
    program.set_uniform("doesNotExist", 3.0f32);

    gl.check_error().map_err(|e| e.to_string())?;
    if program.uniform_location("doesNotExist").is_some() {
        return Err("unknown uniform resolved to a location".into());
    }
    expect_eq(
        "tint",
        program.uniform_f32s::<4>("tint"),
        Some([0.25, 0.5, 0.75, 1.0]),
    )
}

fn broken_vertex_reported(gl: &GlContext) -> Result<(), String> {
    match ShaderProgram::from_sources(gl, BROKEN_VERTEX, CONSTANT_FRAGMENT) {
        Err(ShaderError::Compile {
            kind: ShaderKind::Vertex,
            log,
        }) => {
            if log.is_empty() {
                println!("  (driver returned an empty compile log)");
            }
            Ok(())
        }
        Err(other) => Err(format!("expected vertex compile error, got {other}")),
        Ok(program) => Err(format!("broken source linked as program {}", program.id())),
    }
}

fn mismatch_is_link_error(gl: &GlContext) -> Result<(), String> {
    match ShaderProgram::from_sources(gl, PASS_VERTEX, VARYING_FRAGMENT) {
        Err(err) if err.is_link_failure() => Ok(()),
        Err(other) => Err(format!("expected link error, got {other}")),
        Ok(program) => Err(format!("mismatched stages linked as program {}", program.id())),
    }
}

fn draw_without_error(gl: &GlContext) -> Result<(), String> {
    let program = ShaderProgram::from_sources(gl, PASS_VERTEX, CONSTANT_FRAGMENT)
        .map_err(|e| e.to_string())?;
    let layout = VertexLayout::new().with_attribute(0, 3);
    let vertices = [0.0, 0.5, 0.0, -0.5, -0.5, 0.0, 0.5, -0.5, 0.0];
    let mesh = Mesh::new(gl, &vertices, &layout).map_err(|e| e.to_string())?;

    gl.clear();
    program.set_used();
    mesh.draw();

    let errors = gl.drain_errors();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("GL errors after draw: {errors:?}"))
    }
}

fn mat4_uniform_read_back(gl: &GlContext) -> Result<(), String> {
    let mut program = ShaderProgram::from_sources(gl, PASS_VERTEX, MATRIX_FRAGMENT)
        .map_err(|e| e.to_string())?;

    // the driver writes all 16 components whatever N is
    expect_eq("transform", program.uniform_f32s::<4>("transform"), Some([0.0; 4]))?;
    expect_eq(
        "transform",
        program.uniform_f32s::<16>("transform"),
        Some([0.0; 16]),
    )?;
    gl.check_error().map_err(|e| e.to_string())
}

fn quad_indexed_draw(gl: &GlContext) -> Result<(), String> {
    let shaders = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");
    let program = ShaderProgram::from_files(
        gl,
        format!("{shaders}/quad.vert"),
        format!("{shaders}/quad.frag"),
    )
    .map_err(|e| e.to_string())?;

    let layout = VertexLayout::new().with_attribute(0, 3).with_attribute(1, 3);
    let mesh = Mesh::with_indices(gl, &QUAD_VERTICES, &QUAD_INDICES, &layout)
        .map_err(|e| e.to_string())?;
    expect_eq("vertex count", Some(mesh.vertex_count()), Some(4))?;
    expect_eq("index count", Some(mesh.index_count()), Some(6))?;

    gl.clear();
    program.set_used();
    mesh.draw();

    let errors = gl.drain_errors();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("GL errors after indexed draw: {errors:?}"))
    }
}

fn expect_eq<T: PartialEq + std::fmt::Debug>(
    name: &str,
    actual: Option<T>,
    expected: Option<T>,
) -> Result<(), String> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("{name}: expected {expected:?}, got {actual:?}"))
    }
}
