//! Host-facing graphics capability surface.
//!
//! Types:
//!
//! - `GraphicsContext` is the trait a host context implements so the lifecycle
//!   helpers can run against OpenGL, WebGL-style embeddings, or a recording
//!   double without caring which.
//! - `ShaderStage`, `PrimitiveMode`, and `UniformValue` are the backend-neutral
//!   vocabulary the helpers speak instead of raw API enums.
//! - `SurfaceSize` reports the host drawing surface extent so demos can feed
//!   resolution uniforms.

use std::fmt;

use crate::error::SurfaceError;

/// Pipeline stage a shader object is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Lowercase stage name used in logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Primitive assembly mode for draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Uniform payloads demos feed to their programs each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

/// Pixel extent of the host drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, guarding the degenerate zero-height case.
    pub fn aspect(self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Capability surface the lifecycle helpers require from a host context.
///
/// Implementations wrap a real graphics API (`GlowSurface`) or record every
/// call for inspection (`HeadlessContext`). The helpers never create or own a
/// context; hosts pass one explicitly into each operation, which keeps
/// resource ownership with the caller and setup code testable without a GPU.
///
/// Handle types are opaque and `Copy`; the helpers only store and return
/// them, never fabricate or interpret them.
pub trait GraphicsContext {
    /// Opaque shader object handle.
    type Shader: Copy + PartialEq + fmt::Debug;
    /// Opaque program object handle.
    type Program: Copy + PartialEq + fmt::Debug;
    /// Opaque vertex buffer handle.
    type Buffer: Copy + PartialEq + fmt::Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, SurfaceError>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn compile_succeeded(&self, shader: Self::Shader) -> bool;
    /// Driver diagnostic log for the most recent compile of `shader`.
    fn shader_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, SurfaceError>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn link_succeeded(&self, program: Self::Program) -> bool;
    fn program_log(&self, program: Self::Program) -> String;
    /// Makes `program` current for subsequent uniform and draw calls.
    fn use_program(&self, program: Self::Program);
    fn delete_program(&self, program: Self::Program);

    fn create_buffer(&self) -> Result<Self::Buffer, SurfaceError>;
    fn bind_array_buffer(&self, buffer: Self::Buffer);
    /// Uploads vertex data into the bound array buffer with static-draw usage.
    fn upload_static_vertices(&self, data: &[f32]);
    fn delete_buffer(&self, buffer: Self::Buffer);

    /// Resolves a vertex attribute by name; `None` when the linked program
    /// does not expose it.
    fn attribute_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    /// Points the attribute at the bound buffer: float components, not
    /// normalised, tightly packed (zero stride, zero offset).
    fn configure_float_attribute(&self, location: u32, components: u32);
    fn enable_attribute(&self, location: u32);

    /// Writes a uniform on `program`. Names the linker discarded are ignored,
    /// matching GL semantics.
    fn set_uniform(&self, program: Self::Program, name: &str, value: UniformValue);

    fn set_clear_color(&self, color: [f32; 4]);
    fn clear(&self);
    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32);
    fn surface_size(&self) -> SurfaceSize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_guards_zero_height() {
        assert_eq!(SurfaceSize::new(1920, 0).aspect(), 1.0);
        assert_eq!(SurfaceSize::new(1920, 1080).aspect(), 1920.0 / 1080.0);
    }

    #[test]
    fn stage_labels_match_display() {
        assert_eq!(ShaderStage::Vertex.label(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
