//! Window + OpenGL context wiring.
//!
//! Builds the winit window and a 3.3 core-profile glutin context in one pass,
//! makes the context current on the calling thread, and loads the `glow`
//! function table from the display. Everything shader- or buffer-shaped
//! elsewhere in the crate assumes the context produced here is current.

use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use glow::HasContext;
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use tracing::{info, warn};
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{Window, WindowBuilder};

use crate::types::RendererConfig;

/// Owns the window, the current GL context, its surface, and the loaded
/// function table. Handles created against this context are context-bound, so
/// the struct must stay on the thread that created it.
pub(crate) struct GlWindowContext {
    window: Window,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    gl: Arc<glow::Context>,
}

impl GlWindowContext {
    pub(crate) fn new(
        target: &EventLoopWindowTarget<()>,
        config: &RendererConfig,
    ) -> Result<Self> {
        let (width, height) = config.surface_size;
        let window_builder = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(target, ConfigTemplateBuilder::new(), |mut configs| {
                configs
                    .next()
                    .expect("display offered no matching GL config")
            })
            .map_err(|err| anyhow!("failed to create window and GL display: {err}"))?;
        let window = window.ok_or_else(|| anyhow!("display builder returned no window"))?;

        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("failed to create OpenGL 3.3 core context")?;

        let surface_attributes =
            window.build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new());
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .context("failed to create window surface")?;
        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| {
                gl_display.get_proc_address(symbol).cast()
            })
        };

        let swap_interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, swap_interval) {
            warn!(vsync = config.vsync, "failed to set swap interval: {err}");
        }

        let renderer_name = unsafe { gl.get_parameter_string(glow::RENDERER) };
        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        info!(renderer = %renderer_name, version = %version, samples = gl_config.num_samples(), "OpenGL context ready");

        Ok(Self {
            window,
            surface,
            context,
            gl: Arc::new(gl),
        })
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn gl(&self) -> Arc<glow::Context> {
        Arc::clone(&self.gl)
    }

    /// Keeps the surface and viewport in step with the framebuffer size.
    pub(crate) fn resize(&self, new_size: PhysicalSize<u32>) {
        let width = NonZeroU32::new(new_size.width.max(1)).unwrap_or(NonZeroU32::MIN);
        let height = NonZeroU32::new(new_size.height.max(1)).unwrap_or(NonZeroU32::MIN);
        self.surface.resize(&self.context, width, height);
        unsafe {
            self.gl
                .viewport(0, 0, width.get() as i32, height.get() as i32);
        }
    }

    pub(crate) fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }
}
