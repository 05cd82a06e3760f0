//! Checks on the built-in shader pair the binary falls back to when no
//! override files are given.

use renderer::{QUAD_FRAGMENT_SHADER, QUAD_SAMPLER_UNIFORM, QUAD_VERTEX_SHADER};

#[test]
fn both_stages_target_glsl_330_core() {
    assert!(QUAD_VERTEX_SHADER.starts_with("#version 330 core"));
    assert!(QUAD_FRAGMENT_SHADER.starts_with("#version 330 core"));
}

#[test]
fn vertex_stage_writes_clip_space_position() {
    assert!(QUAD_VERTEX_SHADER.contains("gl_Position"));
}

#[test]
fn fragment_stage_samples_the_bound_texture() {
    assert!(QUAD_FRAGMENT_SHADER.contains(&format!("uniform sampler2D {QUAD_SAMPLER_UNIFORM}")));
    assert!(QUAD_FRAGMENT_SHADER.contains(&format!("texture({QUAD_SAMPLER_UNIFORM}, v_uv)")));
}

#[test]
fn vertex_attributes_cover_the_quad_layout() {
    for (location, attribute) in [(0, "a_pos"), (1, "a_color"), (2, "a_uv")] {
        let declaration = format!("layout (location = {location}) in");
        assert!(QUAD_VERTEX_SHADER.contains(&declaration));
        assert!(QUAD_VERTEX_SHADER.contains(attribute));
    }
}
