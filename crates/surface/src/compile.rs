//! Shader compilation and program linking.

use tracing::error;

use crate::context::{GraphicsContext, ShaderStage};
use crate::error::SurfaceError;

/// Compiles one shader stage from GLSL source.
///
/// The source is handed to the context verbatim; no preprocessing or
/// validation happens here. On failure the driver log is reported and the
/// shader object is deleted before returning, so no half-compiled handle
/// ever escapes.
pub fn compile_shader<G: GraphicsContext>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, SurfaceError> {
    if source.trim().is_empty() {
        return Err(SurfaceError::EmptySource { stage });
    }

    let shader = gl.create_shader(stage)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if gl.compile_succeeded(shader) {
        return Ok(shader);
    }

    let log = gl.shader_log(shader);
    error!(stage = %stage, log = %log, "shader compilation failed");
    gl.delete_shader(shader);
    Err(SurfaceError::Compile { stage, log })
}

/// Links a vertex/fragment pair into a program and activates it.
///
/// Activation is part of the contract: after a successful link the program
/// is current, so callers can start writing uniforms immediately. On failure
/// the program object is not deleted here; it is reclaimed only when the
/// owning context goes away.
pub fn link_program<G: GraphicsContext>(
    gl: &G,
    vertex: G::Shader,
    fragment: G::Shader,
) -> Result<G::Program, SurfaceError> {
    let program = gl.create_program()?;
    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);
    if gl.link_succeeded(program) {
        gl.use_program(program);
        return Ok(program);
    }

    let log = gl.program_log(program);
    error!(log = %log, "program link failed");
    Err(SurfaceError::Link { log })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessContext;

    const VERTEX_SOURCE: &str = "attribute vec3 position;\n\
                                 void main() { gl_Position = vec4(position, 1.0); }\n";
    const FRAGMENT_SOURCE: &str = "void main() { gl_FragColor = vec4(1.0); }\n";

    #[test]
    fn compiles_valid_source() {
        let gl = HeadlessContext::new();
        compile_shader(&gl, ShaderStage::Vertex, VERTEX_SOURCE).unwrap();
        assert_eq!(gl.created().shaders, 1);
        assert_eq!(gl.deleted().shaders, 0);
    }

    #[test]
    fn deletes_shader_when_compilation_fails() {
        let gl = HeadlessContext::new();
        gl.fail_compile(ShaderStage::Fragment, "0:2: 'vec5' : undeclared identifier");

        let result = compile_shader(&gl, ShaderStage::Fragment, FRAGMENT_SOURCE);
        assert!(matches!(
            result,
            Err(SurfaceError::Compile { stage: ShaderStage::Fragment, ref log })
                if log.contains("undeclared")
        ));
        assert_eq!(gl.created().shaders, 1);
        assert_eq!(gl.deleted().shaders, 1);
        assert_eq!(gl.live().shaders, 0);
    }

    #[test]
    fn rejects_empty_source_before_allocating() {
        let gl = HeadlessContext::new();
        let result = compile_shader(&gl, ShaderStage::Vertex, "  \n\t");
        assert!(matches!(result, Err(SurfaceError::EmptySource { stage: ShaderStage::Vertex })));
        assert_eq!(gl.created().shaders, 0);
    }

    #[test]
    fn link_activates_the_program() {
        let gl = HeadlessContext::new();
        let vertex = compile_shader(&gl, ShaderStage::Vertex, VERTEX_SOURCE).unwrap();
        let fragment = compile_shader(&gl, ShaderStage::Fragment, FRAGMENT_SOURCE).unwrap();

        let program = link_program(&gl, vertex, fragment).unwrap();
        assert_eq!(gl.active_program(), Some(program));
    }

    #[test]
    fn link_failure_keeps_program_for_context_teardown() {
        let gl = HeadlessContext::new();
        gl.fail_link("varying 'v_color' has mismatched precision");
        let vertex = compile_shader(&gl, ShaderStage::Vertex, VERTEX_SOURCE).unwrap();
        let fragment = compile_shader(&gl, ShaderStage::Fragment, FRAGMENT_SOURCE).unwrap();

        let result = link_program(&gl, vertex, fragment);
        assert!(matches!(
            result,
            Err(SurfaceError::Link { ref log }) if log.contains("mismatched precision")
        ));
        assert_eq!(gl.created().programs, 1);
        assert_eq!(gl.deleted().programs, 0);
        assert_eq!(gl.active_program(), None);
    }
}
