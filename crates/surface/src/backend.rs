//! OpenGL backend over `glow`.
//!
//! Hosts that own a real GL context (a windowed app, an offscreen EGL
//! surface, a plugin embedded in someone else's render loop) wrap it in
//! [`GlowSurface`] and hand that to the lifecycle helpers. The wrapper never
//! creates or destroys the native context; ownership stays with the host,
//! mirroring how the headless double is handed around in tests.
//!
//! Draw state assumes a context with a default vertex array object (GLES,
//! WebGL, or a compatibility profile). Hosts on a core profile bind their own
//! VAO before running a session.

use std::cell::Cell;

use glow::HasContext;

use crate::context::{GraphicsContext, PrimitiveMode, ShaderStage, SurfaceSize, UniformValue};
use crate::error::SurfaceError;

/// [`GraphicsContext`] implementation over a host-owned `glow::Context`.
pub struct GlowSurface {
    gl: glow::Context,
    size: Cell<SurfaceSize>,
}

impl GlowSurface {
    /// Wraps an initialised glow context that targets a surface of `size`.
    pub fn new(gl: glow::Context, size: SurfaceSize) -> Self {
        Self {
            gl,
            size: Cell::new(size),
        }
    }

    /// Updates the reported surface size after the host resizes its surface.
    pub fn resize(&self, size: SurfaceSize) {
        self.size.set(size);
        unsafe {
            self.gl
                .viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    /// Direct access to the wrapped context for host-side calls outside the
    /// lifecycle helpers.
    pub fn raw(&self) -> &glow::Context {
        &self.gl
    }
}

fn stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn mode_to_gl(mode: PrimitiveMode) -> u32 {
    match mode {
        PrimitiveMode::Triangles => glow::TRIANGLES,
        PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveMode::TriangleFan => glow::TRIANGLE_FAN,
    }
}

impl GraphicsContext for GlowSurface {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;

    fn create_shader(&self, stage: ShaderStage) -> Result<glow::NativeShader, SurfaceError> {
        unsafe {
            self.gl
                .create_shader(stage_to_gl(stage))
                .map_err(|reason| SurfaceError::ContextUnavailable { reason })
        }
    }

    fn shader_source(&self, shader: glow::NativeShader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: glow::NativeShader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn compile_succeeded(&self, shader: glow::NativeShader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_log(&self, shader: glow::NativeShader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: glow::NativeShader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<glow::NativeProgram, SurfaceError> {
        unsafe {
            self.gl
                .create_program()
                .map_err(|reason| SurfaceError::ContextUnavailable { reason })
        }
    }

    fn attach_shader(&self, program: glow::NativeProgram, shader: glow::NativeShader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn link_program(&self, program: glow::NativeProgram) {
        unsafe { self.gl.link_program(program) }
    }

    fn link_succeeded(&self, program: glow::NativeProgram) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_log(&self, program: glow::NativeProgram) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: glow::NativeProgram) {
        unsafe { self.gl.use_program(Some(program)) }
    }

    fn delete_program(&self, program: glow::NativeProgram) {
        unsafe { self.gl.delete_program(program) }
    }

    fn create_buffer(&self) -> Result<glow::NativeBuffer, SurfaceError> {
        unsafe {
            self.gl
                .create_buffer()
                .map_err(|reason| SurfaceError::ContextUnavailable { reason })
        }
    }

    fn bind_array_buffer(&self, buffer: glow::NativeBuffer) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer)) }
    }

    fn upload_static_vertices(&self, data: &[f32]) {
        unsafe {
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, buffer: glow::NativeBuffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn attribute_location(&self, program: glow::NativeProgram, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn configure_float_attribute(&self, location: u32, components: u32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(location, components as i32, glow::FLOAT, false, 0, 0);
        }
    }

    fn enable_attribute(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn set_uniform(&self, program: glow::NativeProgram, name: &str, value: UniformValue) {
        unsafe {
            let Some(location) = self.gl.get_uniform_location(program, name) else {
                return;
            };
            match value {
                UniformValue::Float(v) => self.gl.uniform_1_f32(Some(&location), v),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(Some(&location), x, y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(Some(&location), x, y, z),
                UniformValue::Vec4([x, y, z, w]) => {
                    self.gl.uniform_4_f32(Some(&location), x, y, z, w)
                }
            }
        }
    }

    fn set_clear_color(&self, color: [f32; 4]) {
        unsafe { self.gl.clear_color(color[0], color[1], color[2], color[3]) }
    }

    fn clear(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode_to_gl(mode), first, count) }
    }

    fn surface_size(&self) -> SurfaceSize {
        self.size.get()
    }
}
