use std::path::PathBuf;

use crate::program::ShaderSource;
use crate::quad::{QUAD_FRAGMENT_SHADER, QUAD_VERTEX_SHADER};

/// Texture coordinate wrapping outside the 0..=1 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

impl WrapMode {
    pub(crate) fn gl_enum(self) -> i32 {
        match self {
            WrapMode::Repeat => glow::REPEAT as i32,
            WrapMode::MirroredRepeat => glow::MIRRORED_REPEAT as i32,
            WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
        }
    }
}

/// Magnification filtering; minification always samples the mipmap chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Linear,
    Nearest,
}

impl FilterMode {
    pub(crate) fn gl_mag_enum(self) -> i32 {
        match self {
            FilterMode::Linear => glow::LINEAR as i32,
            FilterMode::Nearest => glow::NEAREST as i32,
        }
    }

    pub(crate) fn gl_min_enum(self) -> i32 {
        match self {
            FilterMode::Linear => glow::LINEAR_MIPMAP_LINEAR as i32,
            FilterMode::Nearest => glow::NEAREST_MIPMAP_NEAREST as i32,
        }
    }
}

/// Where the quad's texture pixels come from.
#[derive(Debug, Clone, Default)]
pub enum TextureSource {
    /// Generated checkerboard; lets the demo run with no assets on disk.
    #[default]
    Checkerboard,
    /// Image file decoded through the `image` crate.
    File(PathBuf),
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags and tells the renderer how large the
/// window should be, which shader pair to build, and how the quad's texture
/// is sourced and sampled.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Vertex shader source for the quad program.
    pub vertex_source: ShaderSource,
    /// Fragment shader source for the quad program.
    pub fragment_source: ShaderSource,
    /// Texture applied to the quad.
    pub texture: TextureSource,
    /// Wrap mode for both texture axes.
    pub wrap: WrapMode,
    /// Filter mode for the quad texture.
    pub filter: FilterMode,
    /// Synchronise buffer swaps with the display refresh.
    pub vsync: bool,
    /// RGBA clear colour applied before each draw.
    pub clear_color: [f32; 4],
}

impl Default for RendererConfig {
    /// The original tutorial set-up: a square window, the built-in shader
    /// pair, a checkerboard texture, and a teal background.
    fn default() -> Self {
        Self {
            surface_size: (1000, 1000),
            title: "texquad".to_string(),
            vertex_source: ShaderSource::vertex(QUAD_VERTEX_SHADER),
            fragment_source: ShaderSource::fragment(QUAD_FRAGMENT_SHADER),
            texture: TextureSource::Checkerboard,
            wrap: WrapMode::default(),
            filter: FilterMode::default(),
            vsync: true,
            clear_color: [0.2, 0.3, 0.3, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::StageKind;

    #[test]
    fn default_config_uses_the_builtin_shader_pair() {
        let config = RendererConfig::default();
        assert_eq!(config.vertex_source.stage(), StageKind::Vertex);
        assert_eq!(config.fragment_source.stage(), StageKind::Fragment);
        assert!(matches!(config.texture, TextureSource::Checkerboard));
        assert_eq!(config.surface_size, (1000, 1000));
    }
}
