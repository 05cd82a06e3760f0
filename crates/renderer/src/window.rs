//! Windowed render loop: build everything once, then clear/draw/swap until
//! the window closes or Escape is pressed.

use anyhow::{anyhow, Result};
use glow::HasContext;
use tracing::{debug, error, info};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget};
use winit::keyboard::{Key, NamedKey};
use winit::window::Window;

use crate::context::GlWindowContext;
use crate::program::ShaderProgram;
use crate::quad::{QuadGeometry, QUAD_SAMPLER_UNIFORM};
use crate::texture::Texture2d;
use crate::types::RendererConfig;

/// Aggregates the GL resources behind the windowed path. Built exactly once
/// at start-up; any failure here aborts the run with a diagnostic.
struct WindowState {
    context: GlWindowContext,
    program: ShaderProgram,
    quad: QuadGeometry,
    texture: Texture2d,
    clear_color: [f32; 4],
}

impl WindowState {
    fn new(target: &EventLoopWindowTarget<()>, config: &RendererConfig) -> Result<Self> {
        let context = GlWindowContext::new(target, config)?;
        let gl = context.gl();

        let program =
            ShaderProgram::build(gl.clone(), &config.vertex_source, &config.fragment_source)
                .map_err(|err| {
                    error!(error = %err, "shader program build failed");
                    anyhow::Error::new(err)
                })?;
        debug!(program = program.id(), "shader program linked");

        let quad = QuadGeometry::new(gl.clone())?;
        let texture = Texture2d::new(gl, &config.texture, config.wrap, config.filter)?;
        program.set_sampler_unit(QUAD_SAMPLER_UNIFORM, 0);

        Ok(Self {
            context,
            program,
            quad,
            texture,
            clear_color: config.clear_color,
        })
    }

    fn window(&self) -> &Window {
        self.context.window()
    }

    fn resize(&self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    fn render_frame(&self) -> Result<()> {
        let gl = self.context.gl();
        let [r, g, b, a] = self.clear_color;
        unsafe {
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }

        self.program.bind();
        self.texture.bind(0);
        self.quad.draw();

        self.context.swap_buffers()
    }
}

pub(crate) fn run_windowed(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoopBuilder::new()
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let state = match WindowState::new(&event_loop, &config) {
        Ok(state) => state,
        Err(err) => {
            error!("failed to initialise renderer: {err:#}");
            return Err(err);
        }
    };
    info!(
        width = config.surface_size.0,
        height = config.surface_size.1,
        "entering render loop"
    );

    let mut loop_result = Ok(());
    let run_result = event_loop.run(|event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state == ElementState::Pressed
                        && matches!(event.logical_key, Key::Named(NamedKey::Escape))
                    {
                        elwt.exit();
                    }
                }
                WindowEvent::Resized(new_size) => {
                    state.resize(new_size);
                }
                WindowEvent::RedrawRequested => {
                    if let Err(err) = state.render_frame() {
                        record_frame_failure(&mut loop_result, err);
                        elwt.exit();
                    }
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            // Continuous rendering: one redraw per swap.
            elwt.set_control_flow(ControlFlow::Poll);
            state.window().request_redraw();
        }
        _ => {}
    });

    if let Err(err) = run_result {
        loop_result = Err(anyhow!("window event loop error: {err}"));
    }

    loop_result
}

/// Records a failed frame so the caller sees the error (and exits nonzero)
/// once the loop has wound down.
fn record_frame_failure(slot: &mut Result<()>, err: anyhow::Error) {
    error!("failed to render frame: {err:#}");
    *slot = Err(err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_failed_frame_surfaces_in_the_loop_result() {
        let mut loop_result = Ok(());
        record_frame_failure(&mut loop_result, anyhow!("failed to swap buffers"));

        let err = loop_result.expect_err("frame failure must not be swallowed");
        assert!(err.to_string().contains("failed to swap buffers"));
    }
}
