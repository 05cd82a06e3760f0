//! Quad texture materialisation: decode (or generate) pixels, upload as
//! RGBA8, apply sampling parameters, build the mipmap chain.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use glow::HasContext;
use image::imageops::flip_vertical_in_place;
use tracing::info;

use crate::types::{FilterMode, TextureSource, WrapMode};

const CHECKERBOARD_SIZE: u32 = 256;
const CHECKERBOARD_TILE: u32 = 32;
const CHECKER_DARK: [u8; 4] = [40, 40, 48, 255];
const CHECKER_LIGHT: [u8; 4] = [220, 220, 210, 255];

/// A 2D GL texture owned for the lifetime of the render loop; the GL object
/// is released on drop.
pub(crate) struct Texture2d {
    gl: Arc<glow::Context>,
    texture: glow::Texture,
}

impl Texture2d {
    pub(crate) fn new(
        gl: Arc<glow::Context>,
        source: &TextureSource,
        wrap: WrapMode,
        filter: FilterMode,
    ) -> Result<Self> {
        let (pixels, width, height) = match source {
            TextureSource::File(path) => decode_image(path)?,
            TextureSource::Checkerboard => checkerboard_pixels(),
        };

        let texture = unsafe { gl.create_texture() }
            .map_err(|message| anyhow!("failed to create texture object: {message}"))?;

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap.gl_enum());
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap.gl_enum());
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                filter.gl_min_enum(),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                filter.gl_mag_enum(),
            );
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(&pixels),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        info!(width, height, ?wrap, ?filter, "quad texture uploaded");

        Ok(Self { gl, texture })
    }

    /// Binds the texture to the given texture unit for sampling.
    pub(crate) fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
        }
    }
}

impl Drop for Texture2d {
    fn drop(&mut self) {
        unsafe { self.gl.delete_texture(self.texture) };
    }
}

/// Decodes an image file into bottom-left-origin RGBA8 pixels, the layout GL
/// expects for texture coordinate (0, 0).
fn decode_image(path: &Path) -> Result<(Vec<u8>, u32, u32)> {
    let mut decoded = image::open(path)
        .with_context(|| format!("failed to load texture at {}", path.display()))?;
    flip_vertical_in_place(&mut decoded);
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width, height))
}

fn checkerboard_pixels() -> (Vec<u8>, u32, u32) {
    let size = CHECKERBOARD_SIZE;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let tile = (x / CHECKERBOARD_TILE + y / CHECKERBOARD_TILE) % 2;
            let color = if tile == 0 { CHECKER_DARK } else { CHECKER_LIGHT };
            pixels.extend_from_slice(&color);
        }
    }
    (pixels, size, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_is_square_rgba() {
        let (pixels, width, height) = checkerboard_pixels();
        assert_eq!(width, height);
        assert_eq!(pixels.len(), (width * height * 4) as usize);
    }

    #[test]
    fn checkerboard_alternates_between_two_colours() {
        let (pixels, width, _) = checkerboard_pixels();
        let at = |x: u32, y: u32| {
            let offset = ((y * width + x) * 4) as usize;
            &pixels[offset..offset + 4]
        };
        assert_eq!(at(0, 0), CHECKER_DARK);
        assert_eq!(at(CHECKERBOARD_TILE, 0), CHECKER_LIGHT);
        assert_eq!(at(0, CHECKERBOARD_TILE), CHECKER_LIGHT);
        assert_eq!(at(CHECKERBOARD_TILE, CHECKERBOARD_TILE), CHECKER_DARK);
    }

    #[test]
    fn missing_texture_file_is_an_error() {
        let err = decode_image(Path::new("/nonexistent/container.jpg")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/container.jpg"));
    }
}
