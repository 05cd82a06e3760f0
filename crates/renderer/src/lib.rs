//! Renderer crate for texquad.
//!
//! Glues the winit/glutin window, the shader-program build step, and the
//! textured-quad resources together. The overall flow is:
//!
//! ```text
//!   CLI / texquad
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          │                 │
//!          │                 └─▶ ShaderProgram::build (once, at start-up)
//!          ▼
//!   GlWindowContext (3.3 core, current on this thread)
//! ```
//!
//! `WindowState` owns all GL resources (context, program, quad, texture),
//! while [`Renderer`] is the thin entry point. The shader program is built
//! exactly once; a compile or link failure carries the driver diagnostic up
//! as a typed [`ShaderError`] and aborts start-up.

mod context;
mod program;
mod quad;
mod texture;
mod types;
mod window;

use anyhow::Result;

pub use program::{
    ShaderError, ShaderProgram, ShaderSource, StageKind, MAX_DIAGNOSTIC_BYTES,
};
pub use quad::{QUAD_FRAGMENT_SHADER, QUAD_SAMPLER_UNIFORM, QUAD_VERTEX_SHADER};
pub use types::{FilterMode, RendererConfig, TextureSource, WrapMode};

/// Thin entry point owning the start-up configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and drives the render loop until it exits.
    ///
    /// Must be called on the main thread; the GL context created inside is
    /// bound to it.
    pub fn run(self) -> Result<()> {
        window::run_windowed(self.config)
    }
}
