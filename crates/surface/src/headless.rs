//! Recording context for GPU-free lifecycle runs.
//!
//! `HeadlessContext` implements [`GraphicsContext`] with no GPU behind it:
//! handles are plain counters, compile and link succeed unless a failure is
//! scripted, and every call is recorded for later inspection. Tests assert on
//! the recordings, and `shaderdeck soak` drives complete demo lifecycles
//! through it to prove that setup and teardown balance before a demo ever
//! touches a real context.
//!
//! Attribute lookups behave like a real linker: at link time the context
//! parses `attribute`/`in` declarations out of the attached vertex sources
//! and resolves names against that table, so a demo requesting a name the
//! shader never declares sees the same miss it would see on hardware.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::context::{GraphicsContext, PrimitiveMode, ShaderStage, SurfaceSize, UniformValue};
use crate::error::SurfaceError;

/// Counter-backed shader handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessShader(u32);

/// Counter-backed program handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessProgram(u32);

/// Counter-backed buffer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessBuffer(u32);

/// Per-class tally of create or delete calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResourceCounts {
    pub shaders: u32,
    pub programs: u32,
    pub buffers: u32,
}

/// One recorded `draw_arrays` invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub mode: PrimitiveMode,
    pub first: i32,
    pub count: i32,
}

#[derive(Debug)]
struct ShaderRecord {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug)]
struct ProgramRecord {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    attributes: Vec<String>,
}

#[derive(Default)]
struct State {
    next_handle: u32,
    shaders: HashMap<u32, ShaderRecord>,
    programs: HashMap<u32, ProgramRecord>,
    buffers: Vec<u32>,
    created: ResourceCounts,
    deleted: ResourceCounts,
    bound_buffer: Option<u32>,
    active_program: Option<u32>,
    uploads: Vec<Vec<f32>>,
    configured_attributes: Vec<(u32, u32)>,
    enabled_attributes: Vec<u32>,
    uniform_writes: Vec<(String, UniformValue)>,
    draw_calls: Vec<DrawCall>,
    clear_calls: u32,
    clear_color: [f32; 4],
    fail_compile: Option<(ShaderStage, String)>,
    fail_link: Option<String>,
}

/// GPU-free [`GraphicsContext`] that records every call.
pub struct HeadlessContext {
    state: RefCell<State>,
    size: Cell<SurfaceSize>,
}

impl HeadlessContext {
    /// Creates a context reporting a default 800x600 surface.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State::default()),
            size: Cell::new(SurfaceSize::new(800, 600)),
        }
    }

    /// Creates a context reporting the given surface size.
    pub fn with_size(size: SurfaceSize) -> Self {
        let context = Self::new();
        context.size.set(size);
        context
    }

    /// Arms a one-shot compile failure for the next shader of `stage`.
    pub fn fail_compile(&self, stage: ShaderStage, log: impl Into<String>) {
        self.state.borrow_mut().fail_compile = Some((stage, log.into()));
    }

    /// Arms a one-shot failure for the next program link.
    pub fn fail_link(&self, log: impl Into<String>) {
        self.state.borrow_mut().fail_link = Some(log.into());
    }

    /// Create calls issued so far, per resource class.
    pub fn created(&self) -> ResourceCounts {
        self.state.borrow().created
    }

    /// Delete calls issued so far, per resource class.
    pub fn deleted(&self) -> ResourceCounts {
        self.state.borrow().deleted
    }

    /// Handles currently alive, per resource class.
    pub fn live(&self) -> ResourceCounts {
        let state = self.state.borrow();
        ResourceCounts {
            shaders: state.shaders.len() as u32,
            programs: state.programs.len() as u32,
            buffers: state.buffers.len() as u32,
        }
    }

    /// Program made current by the most recent `use_program`, if any.
    pub fn active_program(&self) -> Option<HeadlessProgram> {
        self.state.borrow().active_program.map(HeadlessProgram)
    }

    /// Every draw call recorded so far, in order.
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state.borrow().draw_calls.clone()
    }

    /// Every uniform write recorded so far, in order.
    pub fn uniform_writes(&self) -> Vec<(String, UniformValue)> {
        self.state.borrow().uniform_writes.clone()
    }

    /// Vertex uploads recorded so far, one entry per upload.
    pub fn uploads(&self) -> Vec<Vec<f32>> {
        self.state.borrow().uploads.clone()
    }

    /// Attribute locations configured with `configure_float_attribute`,
    /// as `(location, components)` pairs.
    pub fn configured_attributes(&self) -> Vec<(u32, u32)> {
        self.state.borrow().configured_attributes.clone()
    }

    /// Attribute locations enabled so far.
    pub fn enabled_attributes(&self) -> Vec<u32> {
        self.state.borrow().enabled_attributes.clone()
    }

    /// Number of `clear` calls recorded so far.
    pub fn clear_calls(&self) -> u32 {
        self.state.borrow().clear_calls
    }

    /// Most recently set clear color.
    pub fn clear_color(&self) -> [f32; 4] {
        self.state.borrow().clear_color
    }
}

impl Default for HeadlessContext {
    fn default() -> Self {
        Self::new()
    }
}

fn declared_attributes(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let declaration = line
                .strip_prefix("attribute ")
                .or_else(|| line.strip_prefix("in "))?;
            declaration
                .trim_end_matches(';')
                .split_whitespace()
                .last()
                .map(str::to_string)
        })
        .collect()
}

impl GraphicsContext for HeadlessContext {
    type Shader = HeadlessShader;
    type Program = HeadlessProgram;
    type Buffer = HeadlessBuffer;

    fn create_shader(&self, stage: ShaderStage) -> Result<HeadlessShader, SurfaceError> {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        let id = state.next_handle;
        state.shaders.insert(
            id,
            ShaderRecord {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        state.created.shaders += 1;
        Ok(HeadlessShader(id))
    }

    fn shader_source(&self, shader: HeadlessShader, source: &str) {
        if let Some(record) = self.state.borrow_mut().shaders.get_mut(&shader.0) {
            record.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: HeadlessShader) {
        let mut state = self.state.borrow_mut();
        let stage = state.shaders.get(&shader.0).map(|record| record.stage);
        let forced = match (&state.fail_compile, stage) {
            (Some((armed, _)), Some(stage)) if *armed == stage => state.fail_compile.take(),
            _ => None,
        };
        if let Some(record) = state.shaders.get_mut(&shader.0) {
            match forced {
                Some((_, log)) => {
                    record.compiled = false;
                    record.log = log;
                }
                None => {
                    record.compiled = true;
                    record.log.clear();
                }
            }
        }
    }

    fn compile_succeeded(&self, shader: HeadlessShader) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .map(|record| record.compiled)
            .unwrap_or(false)
    }

    fn shader_log(&self, shader: HeadlessShader) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .map(|record| record.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: HeadlessShader) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader.0);
        state.deleted.shaders += 1;
    }

    fn create_program(&self) -> Result<HeadlessProgram, SurfaceError> {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        let id = state.next_handle;
        state.programs.insert(
            id,
            ProgramRecord {
                attached: Vec::new(),
                linked: false,
                log: String::new(),
                attributes: Vec::new(),
            },
        );
        state.created.programs += 1;
        Ok(HeadlessProgram(id))
    }

    fn attach_shader(&self, program: HeadlessProgram, shader: HeadlessShader) {
        if let Some(record) = self.state.borrow_mut().programs.get_mut(&program.0) {
            record.attached.push(shader.0);
        }
    }

    fn link_program(&self, program: HeadlessProgram) {
        let mut state = self.state.borrow_mut();
        let forced = state.fail_link.take();
        let attached = state
            .programs
            .get(&program.0)
            .map(|record| record.attached.clone())
            .unwrap_or_default();
        let mut attributes = Vec::new();
        for id in attached {
            if let Some(record) = state.shaders.get(&id) {
                if record.stage == ShaderStage::Vertex {
                    attributes.extend(declared_attributes(&record.source));
                }
            }
        }
        if let Some(record) = state.programs.get_mut(&program.0) {
            match forced {
                Some(log) => {
                    record.linked = false;
                    record.log = log;
                }
                None => {
                    record.linked = true;
                    record.attributes = attributes;
                }
            }
        }
    }

    fn link_succeeded(&self, program: HeadlessProgram) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .map(|record| record.linked)
            .unwrap_or(false)
    }

    fn program_log(&self, program: HeadlessProgram) -> String {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .map(|record| record.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: HeadlessProgram) {
        self.state.borrow_mut().active_program = Some(program.0);
    }

    fn delete_program(&self, program: HeadlessProgram) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program.0);
        state.deleted.programs += 1;
    }

    fn create_buffer(&self) -> Result<HeadlessBuffer, SurfaceError> {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        let id = state.next_handle;
        state.buffers.push(id);
        state.created.buffers += 1;
        Ok(HeadlessBuffer(id))
    }

    fn bind_array_buffer(&self, buffer: HeadlessBuffer) {
        self.state.borrow_mut().bound_buffer = Some(buffer.0);
    }

    fn upload_static_vertices(&self, data: &[f32]) {
        let mut state = self.state.borrow_mut();
        if state.bound_buffer.is_some() {
            state.uploads.push(data.to_vec());
        }
    }

    fn delete_buffer(&self, buffer: HeadlessBuffer) {
        let mut state = self.state.borrow_mut();
        state.buffers.retain(|id| *id != buffer.0);
        if state.bound_buffer == Some(buffer.0) {
            state.bound_buffer = None;
        }
        state.deleted.buffers += 1;
    }

    fn attribute_location(&self, program: HeadlessProgram, name: &str) -> Option<u32> {
        self.state.borrow().programs.get(&program.0).and_then(|record| {
            record
                .attributes
                .iter()
                .position(|attribute| attribute == name)
                .map(|index| index as u32)
        })
    }

    fn configure_float_attribute(&self, location: u32, components: u32) {
        self.state
            .borrow_mut()
            .configured_attributes
            .push((location, components));
    }

    fn enable_attribute(&self, location: u32) {
        self.state.borrow_mut().enabled_attributes.push(location);
    }

    fn set_uniform(&self, _program: HeadlessProgram, name: &str, value: UniformValue) {
        self.state
            .borrow_mut()
            .uniform_writes
            .push((name.to_string(), value));
    }

    fn set_clear_color(&self, color: [f32; 4]) {
        self.state.borrow_mut().clear_color = color;
    }

    fn clear(&self) {
        self.state.borrow_mut().clear_calls += 1;
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        self.state
            .borrow_mut()
            .draw_calls
            .push(DrawCall { mode, first, count });
    }

    fn surface_size(&self) -> SurfaceSize {
        self.size.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ATTRIBUTE_VERTEX: &str = "attribute vec3 a_position;\n\
                                        attribute vec2 a_uv;\n\
                                        void main() { gl_Position = vec4(a_position, 1.0); }\n";

    fn linked_program(gl: &HeadlessContext, vertex_source: &str) -> HeadlessProgram {
        let vertex = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vertex, vertex_source);
        gl.compile_shader(vertex);
        let fragment = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(fragment, "void main() { gl_FragColor = vec4(1.0); }");
        gl.compile_shader(fragment);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        program
    }

    #[test]
    fn builds_attribute_table_from_vertex_source() {
        let gl = HeadlessContext::new();
        let program = linked_program(&gl, TWO_ATTRIBUTE_VERTEX);
        assert_eq!(gl.attribute_location(program, "a_position"), Some(0));
        assert_eq!(gl.attribute_location(program, "a_uv"), Some(1));
        assert_eq!(gl.attribute_location(program, "a_normal"), None);
    }

    #[test]
    fn scripted_compile_failure_fires_once() {
        let gl = HeadlessContext::new();
        gl.fail_compile(ShaderStage::Fragment, "0:1: syntax error");

        let vertex = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.compile_shader(vertex);
        assert!(gl.compile_succeeded(vertex));

        let fragment = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.compile_shader(fragment);
        assert!(!gl.compile_succeeded(fragment));
        assert_eq!(gl.shader_log(fragment), "0:1: syntax error");

        let retry = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.compile_shader(retry);
        assert!(gl.compile_succeeded(retry));
    }

    #[test]
    fn counts_pair_creates_with_deletes() {
        let gl = HeadlessContext::new();
        let buffer = gl.create_buffer().unwrap();
        gl.delete_buffer(buffer);
        assert_eq!(gl.created().buffers, 1);
        assert_eq!(gl.deleted().buffers, 1);
        assert_eq!(gl.live().buffers, 0);
    }
}
