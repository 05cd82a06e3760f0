//! The one hardcoded quad: interleaved vertex data, index buffer, and the
//! GLSL 330 shader pair whose attribute layout matches it.

use std::mem;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use glow::HasContext;

/// Name of the sampler uniform the built-in fragment shader reads from.
pub const QUAD_SAMPLER_UNIFORM: &str = "u_texture";

/// Pass-through vertex shader: clip-space position plus colour and texture
/// coordinate varyings. Attribute locations 0/1/2 match [`Vertex`].
pub const QUAD_VERTEX_SHADER: &str = r"#version 330 core
layout (location = 0) in vec3 a_pos;
layout (location = 1) in vec3 a_color;
layout (location = 2) in vec2 a_uv;

out vec3 v_color;
out vec2 v_uv;

void main() {
    gl_Position = vec4(a_pos, 1.0);
    v_color = a_color;
    v_uv = a_uv;
}
";

/// Fragment shader sampling the bound 2D texture at the interpolated
/// coordinate.
pub const QUAD_FRAGMENT_SHADER: &str = r"#version 330 core
in vec3 v_color;
in vec2 v_uv;

out vec4 frag_color;

uniform sampler2D u_texture;

void main() {
    frag_color = texture(u_texture, v_uv);
}
";

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
    uv: [f32; 2],
}

const VERTICES: [Vertex; 4] = [
    // top right
    Vertex {
        position: [0.5, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
        uv: [1.0, 1.0],
    },
    // bottom right
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
        uv: [1.0, 0.0],
    },
    // bottom left
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 0.0, 1.0],
        uv: [0.0, 0.0],
    },
    // top left
    Vertex {
        position: [-0.5, 0.5, 0.0],
        color: [1.0, 1.0, 0.0],
        uv: [0.0, 1.0],
    },
];

const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// VAO/VBO/EBO triple holding the quad, uploaded once at start-up. All three
/// GL objects are released on drop.
pub(crate) struct QuadGeometry {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
}

impl QuadGeometry {
    pub(crate) fn new(gl: Arc<glow::Context>) -> Result<Self> {
        let stride = mem::size_of::<Vertex>() as i32;

        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(|message| anyhow!("failed to create vertex array: {message}"))?;
            let vbo = gl
                .create_buffer()
                .map_err(|message| anyhow!("failed to create vertex buffer: {message}"))?;
            let ebo = gl
                .create_buffer()
                .map_err(|message| anyhow!("failed to create index buffer: {message}"))?;

            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&VERTICES),
                glow::STATIC_DRAW,
            );

            // The element buffer binding is recorded by the VAO, so it stays
            // bound while the VAO does.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&INDICES),
                glow::STATIC_DRAW,
            );

            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(2, 2, glow::FLOAT, false, stride, 6 * 4);
            gl.enable_vertex_attrib_array(2);

            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);

            Ok(Self { gl, vao, vbo, ebo })
        }
    }

    /// Issues the indexed draw for the quad's two triangles.
    pub(crate) fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl
                .draw_elements(glow::TRIANGLES, INDICES.len() as i32, glow::UNSIGNED_INT, 0);
        }
    }
}

impl Drop for QuadGeometry {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_interleaved() {
        assert_eq!(mem::size_of::<Vertex>(), 8 * mem::size_of::<f32>());
        assert_eq!(mem::offset_of!(Vertex, position), 0);
        assert_eq!(mem::offset_of!(Vertex, color), 12);
        assert_eq!(mem::offset_of!(Vertex, uv), 24);
    }

    #[test]
    fn indices_cover_all_four_corners() {
        let mut seen = [false; 4];
        for index in INDICES {
            seen[index as usize] = true;
        }
        assert!(seen.iter().all(|corner| *corner));
    }

    #[test]
    fn builtin_shaders_agree_on_the_sampler_and_varyings() {
        assert!(QUAD_FRAGMENT_SHADER.contains(QUAD_SAMPLER_UNIFORM));
        for varying in ["v_color", "v_uv"] {
            assert!(QUAD_VERTEX_SHADER.contains(varying));
            assert!(QUAD_FRAGMENT_SHADER.contains(varying));
        }
    }
}
