//! Window, GL context and the shared render loop used by the demos.

use crate::config::WindowConfig;
use crate::render::GlContext;
use anyhow::{anyhow, Context, Result};
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext,
        PossiblyCurrentContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use std::{
    ffi::CString,
    num::NonZeroU32,
    ptr,
    time::{Duration, Instant},
};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

/// A window with a current OpenGL context and loaded function pointers.
pub struct RenderWindow {
    // dropped in declaration order: surface, context, then window
    gl: GlContext,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl RenderWindow {
    pub fn new<T>(event_loop: &EventLoopWindowTarget<T>, config: &WindowConfig) -> Result<Self> {
        let window_builder = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable)
            .with_visible(config.visible);

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("glutin always offers at least one config")
            })
            .map_err(|e| anyhow!("Failed to create window: {e}"))?;

        let window = window.context("glutin did not create a window")?;
        let raw_window_handle = window.raw_window_handle();

        let (major, minor) = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();
        let not_current = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .with_context(|| format!("Failed to create OpenGL {major}.{minor} core context"))?
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .context("Failed to create GL surface")?
        };

        let gl_context = not_current
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            log::warn!("Could not set swap interval: {}", e);
        }

        // Load OpenGL functions
        let gl = unsafe {
            GlContext::load_with(|symbol| match CString::new(symbol) {
                Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()),
                Err(_) => ptr::null(),
            })
        };

        let size = window.inner_size();
        gl.viewport(size.width, size.height);
        gl.clear_color(config.clear_color);

        Ok(Self {
            gl,
            gl_surface,
            gl_context,
            window,
        })
    }

    pub fn gl(&self) -> &GlContext {
        &self.gl
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, width, height);
        self.gl.viewport(size.width, size.height);
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("Failed to swap buffers")
    }
}

/// Per-frame timing and framebuffer size handed to the draw callback.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    pub index: u64,
    pub elapsed: Duration,
    pub size: PhysicalSize<u32>,
}

impl FrameInfo {
    /// Seconds since the loop started, like `glfwGetTime`.
    pub fn seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.size.height == 0 {
            return 1.0;
        }
        self.size.width as f32 / self.size.height as f32
    }
}

/// Opens a window, runs `setup` once, then calls `draw` every frame until
/// the window is closed or Escape is pressed.
///
/// The colour buffer is cleared before each `draw` and buffers are swapped
/// after it. An error from `draw` is logged and ends the loop.
pub fn run<S, Setup, Draw>(config: &WindowConfig, setup: Setup, mut draw: Draw) -> Result<()>
where
    Setup: FnOnce(&GlContext) -> Result<S>,
    Draw: FnMut(&mut S, &GlContext, &FrameInfo) -> Result<()>,
{
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let render_window = RenderWindow::new(&*event_loop, config)?;
    log::info!(
        "Opened '{}' at {}x{}",
        config.title,
        config.width,
        config.height
    );

    let mut state = Some(setup(render_window.gl()).context("Setup failed")?);
    let mut failure: Option<anyhow::Error> = None;
    let start = Instant::now();
    let mut frame_index = 0u64;

    event_loop.run(|event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => elwt.exit(),
            WindowEvent::Resized(size) => render_window.resize(size),
            WindowEvent::RedrawRequested => {
                let Some(state) = state.as_mut() else {
                    return;
                };
                let frame = FrameInfo {
                    index: frame_index,
                    elapsed: start.elapsed(),
                    size: render_window.window().inner_size(),
                };

                let gl = render_window.gl();
                gl.clear();
                let result = draw(state, gl, &frame).and_then(|_| render_window.swap_buffers());
                if let Err(e) = result {
                    log::error!("Frame {} failed: {:#}", frame_index, e);
                    failure = Some(e);
                    elwt.exit();
                }
                frame_index += 1;
            }
            _ => (),
        },
        Event::AboutToWait => render_window.window().request_redraw(),
        Event::LoopExiting => {
            // GL objects must go while the context is still current
            state.take();
            log::info!("Exiting after {} frames", frame_index);
        }
        _ => (),
    })?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
