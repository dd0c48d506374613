//! Exactly-once release of tracked GPU resources.

use tracing::debug;

use crate::context::GraphicsContext;

/// Resource handles accumulated by one demo's setup, in teardown order.
///
/// Slots hold `Option`s so release can take each handle exactly once: a
/// released slot becomes `None` and is skipped silently on any later pass,
/// which makes double release a structural no-op rather than a double-free.
pub struct ResourceSet<G: GraphicsContext> {
    buffers: Vec<Option<G::Buffer>>,
    programs: Vec<Option<G::Program>>,
    shaders: Vec<Option<G::Shader>>,
}

impl<G: GraphicsContext> ResourceSet<G> {
    pub fn new() -> Self {
        Self {
            buffers: Vec::new(),
            programs: Vec::new(),
            shaders: Vec::new(),
        }
    }

    pub fn track_buffer(&mut self, buffer: G::Buffer) {
        self.buffers.push(Some(buffer));
    }

    pub fn track_program(&mut self, program: G::Program) {
        self.programs.push(Some(program));
    }

    pub fn track_shader(&mut self, shader: G::Shader) {
        self.shaders.push(Some(shader));
    }

    /// True when no live handle remains in any slot.
    pub fn is_empty(&self) -> bool {
        self.buffers.iter().all(Option::is_none)
            && self.programs.iter().all(Option::is_none)
            && self.shaders.iter().all(Option::is_none)
    }

    /// Releases every tracked handle: buffers first, then programs, then
    /// shaders. Never fails; empty and already-released slots are skipped.
    pub fn release(&mut self, gl: &G) {
        let mut released = 0usize;
        for slot in &mut self.buffers {
            if let Some(buffer) = slot.take() {
                gl.delete_buffer(buffer);
                released += 1;
            }
        }
        for slot in &mut self.programs {
            if let Some(program) = slot.take() {
                gl.delete_program(program);
                released += 1;
            }
        }
        for slot in &mut self.shaders {
            if let Some(shader) = slot.take() {
                gl.delete_shader(shader);
                released += 1;
            }
        }
        if released > 0 {
            debug!(released, "released surface resources");
        }
    }
}

impl<G: GraphicsContext> Default for ResourceSet<G> {
    fn default() -> Self {
        Self::new()
    }
}
