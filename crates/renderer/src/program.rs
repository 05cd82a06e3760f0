//! Shader-program build step: source → compiled stage → linked program.
//!
//! The compiled stages are build-time-only objects; the linked program is the
//! long-lived artifact. Both stage handles are detached and deleted
//! unconditionally once linking has been attempted, so no intermediate GL
//! object outlives [`ShaderProgram::build`] regardless of the outcome.

use std::fmt;
use std::sync::Arc;

use glow::HasContext;
use thiserror::Error;

/// Upper bound on driver diagnostic text carried inside a [`ShaderError`].
///
/// GL drivers occasionally produce multi-kilobyte logs for cascading syntax
/// errors; everything past this bound is cut rather than propagated.
pub const MAX_DIAGNOSTIC_BYTES: usize = 1024;

/// Pipeline stage a piece of shader source is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub(crate) fn gl_enum(self) -> u32 {
        match self {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// GLSL text tagged with the stage it targets. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    stage: StageKind,
    text: String,
}

impl ShaderSource {
    pub fn vertex(text: impl Into<String>) -> Self {
        Self {
            stage: StageKind::Vertex,
            text: text.into(),
        }
    }

    pub fn fragment(text: impl Into<String>) -> Self {
        Self {
            stage: StageKind::Fragment,
            text: text.into(),
        }
    }

    pub fn stage(&self) -> StageKind {
        self.stage
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Why a shader program could not be built.
///
/// `handle` is the raw GL object name, matching what the driver prints in its
/// own diagnostics; `log` is the driver's compiler/linker output, bounded by
/// [`MAX_DIAGNOSTIC_BYTES`].
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to allocate {stage} shader object: {message}")]
    CreateStage { stage: StageKind, message: String },
    #[error("failed to compile {stage} shader (handle {handle}): {log}")]
    Compile {
        stage: StageKind,
        handle: u32,
        log: String,
    },
    #[error("failed to allocate program object: {message}")]
    CreateProgram { message: String },
    #[error("failed to link program (handle {handle}): {log}")]
    Link { handle: u32, log: String },
}

/// A compiled-but-not-yet-linked stage. Never escapes this module; the GL
/// shader object is deleted on drop so early returns cannot leak it.
struct CompiledStage<'a> {
    gl: &'a glow::Context,
    shader: glow::Shader,
}

impl CompiledStage<'_> {
    fn raw_id(&self) -> u32 {
        self.shader.0.get()
    }
}

impl Drop for CompiledStage<'_> {
    fn drop(&mut self) {
        unsafe { self.gl.delete_shader(self.shader) };
    }
}

/// A linked, executable GL program. Deletes the program object on drop.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    program: glow::Program,
}

impl ShaderProgram {
    /// Compiles both stages, links them, and releases the stage objects.
    ///
    /// The vertex stage is compiled first; a compile failure short-circuits
    /// before linking is ever attempted. A `ShaderProgram` is only returned
    /// when both compiles and the link succeeded — there is no partially
    /// valid state to observe on the error path.
    pub fn build(
        gl: Arc<glow::Context>,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<Self, ShaderError> {
        debug_assert_eq!(vertex.stage(), StageKind::Vertex);
        debug_assert_eq!(fragment.stage(), StageKind::Fragment);

        let vertex_stage = compile_stage(&gl, vertex)?;
        let fragment_stage = compile_stage(&gl, fragment)?;
        let program = link_stages(&gl, vertex_stage, fragment_stage)?;

        Ok(Self { gl, program })
    }

    /// Raw GL object name, for diagnostics.
    pub fn id(&self) -> u32 {
        self.program.0.get()
    }

    /// Makes this program current for subsequent draw calls.
    pub fn bind(&self) {
        unsafe { self.gl.use_program(Some(self.program)) };
    }

    /// Looks up an active uniform by name; `None` if the linker optimised it
    /// away or it was never declared.
    pub fn uniform_location(&self, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(self.program, name) }
    }

    /// Binds the named sampler uniform to a texture unit.
    pub fn set_sampler_unit(&self, name: &str, unit: i32) {
        if let Some(location) = self.uniform_location(name) {
            unsafe {
                self.gl.use_program(Some(self.program));
                self.gl.uniform_1_i32(Some(&location), unit);
            }
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { self.gl.delete_program(self.program) };
    }
}

fn compile_stage<'a>(
    gl: &'a glow::Context,
    source: &ShaderSource,
) -> Result<CompiledStage<'a>, ShaderError> {
    let shader = unsafe { gl.create_shader(source.stage().gl_enum()) }.map_err(|message| {
        ShaderError::CreateStage {
            stage: source.stage(),
            message,
        }
    })?;

    // From here on the wrapper owns the handle, so the object is deleted even
    // when the status check below bails out.
    let stage = CompiledStage { gl, shader };

    unsafe {
        gl.shader_source(shader, source.text());
        gl.compile_shader(shader);
    }

    if unsafe { gl.get_shader_compile_status(shader) } {
        Ok(stage)
    } else {
        let log = bounded_log(unsafe { gl.get_shader_info_log(shader) });
        Err(ShaderError::Compile {
            stage: source.stage(),
            handle: stage.raw_id(),
            log,
        })
    }
}

fn link_stages(
    gl: &glow::Context,
    vertex: CompiledStage<'_>,
    fragment: CompiledStage<'_>,
) -> Result<glow::Program, ShaderError> {
    let program =
        unsafe { gl.create_program() }.map_err(|message| ShaderError::CreateProgram { message })?;

    unsafe {
        gl.attach_shader(program, vertex.shader);
        gl.attach_shader(program, fragment.shader);
        gl.link_program(program);
        // The linked binary does not depend on the stage objects staying
        // attached or alive; detach here, the wrappers delete on drop.
        gl.detach_shader(program, vertex.shader);
        gl.detach_shader(program, fragment.shader);
    }

    if unsafe { gl.get_program_link_status(program) } {
        Ok(program)
    } else {
        let log = bounded_log(unsafe { gl.get_program_info_log(program) });
        let handle = program.0.get();
        unsafe { gl.delete_program(program) };
        Err(ShaderError::Link { handle, log })
    }
}

/// Trims and bounds a driver info log to [`MAX_DIAGNOSTIC_BYTES`].
///
/// Drivers NUL-terminate their logs C-style, so trailing NULs are stripped
/// along with whitespace. Truncation lands on a char boundary so the result
/// stays valid UTF-8 even for drivers that localise their messages.
fn bounded_log(raw: String) -> String {
    let mut log = raw.trim_end_matches('\0').trim_end().to_owned();
    if log.len() > MAX_DIAGNOSTIC_BYTES {
        let mut cut = MAX_DIAGNOSTIC_BYTES;
        while !log.is_char_boundary(cut) {
            cut -= 1;
        }
        log.truncate(cut);
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_logs_pass_through_trimmed() {
        // C drivers NUL-terminate; neither the NUL nor the newline survive.
        let log = bounded_log("0:12(3): error: syntax error\n\0".to_string());
        assert_eq!(log, "0:12(3): error: syntax error");

        let log = bounded_log("warning: unused varying\0".to_string());
        assert_eq!(log, "warning: unused varying");
    }

    #[test]
    fn oversized_logs_are_cut_to_the_bound() {
        let raw = "e".repeat(MAX_DIAGNOSTIC_BYTES * 4);
        let log = bounded_log(raw);
        assert_eq!(log.len(), MAX_DIAGNOSTIC_BYTES);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; an odd prefix forces the cut to land mid-char.
        let raw = format!("x{}", "é".repeat(MAX_DIAGNOSTIC_BYTES));
        let log = bounded_log(raw);
        assert!(log.len() <= MAX_DIAGNOSTIC_BYTES);
        assert!(log.is_char_boundary(log.len()));
    }

    #[test]
    fn compile_error_names_stage_handle_and_log() {
        let err = ShaderError::Compile {
            stage: StageKind::Fragment,
            handle: 7,
            log: "0:4(1): error: `Texcoord` undeclared".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("fragment"));
        assert!(rendered.contains("handle 7"));
        assert!(rendered.contains("`Texcoord` undeclared"));
    }

    #[test]
    fn link_error_is_tagged_as_link_failure() {
        let err = ShaderError::Link {
            handle: 3,
            log: "error: varying `DefinedColour` not written".to_string(),
        };
        assert!(err.to_string().starts_with("failed to link program"));
    }

    #[test]
    fn sources_carry_their_stage_tag() {
        let vertex = ShaderSource::vertex("void main() {}");
        let fragment = ShaderSource::fragment("void main() {}");
        assert_eq!(vertex.stage(), StageKind::Vertex);
        assert_eq!(fragment.stage(), StageKind::Fragment);
        assert_eq!(vertex.text(), "void main() {}");
    }
}
