//! Scoped lifetime for one demo's GPU resources.
//!
//! A [`RenderSession`] owns everything a demo acquires: two shaders, the
//! linked program, and the quad buffer. Whichever way the session ends, by
//! [`RenderSession::finish`], by drop, or by a setup failure inside
//! [`RenderSession::begin`], every tracked handle is released exactly once.
//! [`run_session`] layers the frame loop on top: setup, pull ticks from a
//! scheduler, hand each to the demo's draw closure, tear down.

use tracing::debug;

use crate::buffer::bind_attribute_buffer;
use crate::compile::{compile_shader, link_program};
use crate::context::{GraphicsContext, PrimitiveMode, ShaderStage, UniformValue};
use crate::error::SurfaceError;
use crate::release::ResourceSet;
use crate::sched::{FrameScheduler, FrameTick};

/// Borrowed inputs a demo supplies to set up one session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig<'a> {
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    /// Flat vertex positions, `components_per_vertex` floats each.
    pub vertices: &'a [f32],
    pub components_per_vertex: u32,
    /// Vertex attribute the position buffer binds to.
    pub attribute: &'a str,
    pub mode: PrimitiveMode,
    pub clear: [f32; 4],
}

/// Counters describing a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub frames_rendered: u64,
}

/// Live GPU resources for one demo, released exactly once on every exit path.
pub struct RenderSession<'g, G: GraphicsContext> {
    gl: &'g G,
    resources: ResourceSet<G>,
    program: G::Program,
    mode: PrimitiveMode,
    vertex_count: i32,
}

impl<'g, G: GraphicsContext> RenderSession<'g, G> {
    /// Compiles, links, and binds everything the demo needs to draw.
    ///
    /// On failure the resources acquired up to that point are released before
    /// the error returns, so callers hold no cleanup obligation for a session
    /// that never began. The one exception is a failed link, which leaves its
    /// program object to the context's own teardown.
    pub fn begin(gl: &'g G, config: &SessionConfig<'_>) -> Result<Self, SurfaceError> {
        let mut resources = ResourceSet::new();

        let vertex = compile_shader(gl, ShaderStage::Vertex, config.vertex_source)?;
        resources.track_shader(vertex);

        let fragment = match compile_shader(gl, ShaderStage::Fragment, config.fragment_source) {
            Ok(fragment) => fragment,
            Err(err) => return Err(abort(gl, resources, err)),
        };
        resources.track_shader(fragment);

        let program = match link_program(gl, vertex, fragment) {
            Ok(program) => program,
            Err(err) => return Err(abort(gl, resources, err)),
        };
        resources.track_program(program);

        if let Err(err) = bind_attribute_buffer(
            gl,
            program,
            config.vertices,
            config.components_per_vertex,
            config.attribute,
            &mut resources,
        ) {
            return Err(abort(gl, resources, err));
        }

        gl.set_clear_color(config.clear);
        debug!(
            attribute = config.attribute,
            vertices = config.vertices.len() / config.components_per_vertex as usize,
            "render session ready"
        );

        Ok(Self {
            gl,
            resources,
            program,
            mode: config.mode,
            vertex_count: (config.vertices.len() / config.components_per_vertex as usize) as i32,
        })
    }

    /// The linked, active program.
    pub fn program(&self) -> G::Program {
        self.program
    }

    /// Number of vertices the bound buffer holds.
    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    /// Writes a uniform on the session's program.
    pub fn set_uniform(&self, name: &str, value: UniformValue) {
        self.gl.set_uniform(self.program, name, value);
    }

    /// Clears the surface and draws the full vertex range.
    pub fn draw_frame(&self) {
        self.gl.clear();
        self.gl.draw_arrays(self.mode, 0, self.vertex_count);
    }

    /// Releases the session's resources now instead of at drop.
    pub fn finish(mut self) {
        self.resources.release(self.gl);
    }
}

impl<G: GraphicsContext> Drop for RenderSession<'_, G> {
    fn drop(&mut self) {
        self.resources.release(self.gl);
    }
}

fn abort<G: GraphicsContext>(
    gl: &G,
    mut resources: ResourceSet<G>,
    err: SurfaceError,
) -> SurfaceError {
    resources.release(gl);
    err
}

/// Runs one demo lifecycle end to end.
///
/// Begins a session, then pulls ticks from `scheduler` until it stops
/// yielding; each tick goes to `per_frame` together with the live session.
/// Teardown runs on every exit path, including a failed setup.
pub fn run_session<G, S, F>(
    gl: &G,
    config: &SessionConfig<'_>,
    scheduler: &mut S,
    mut per_frame: F,
) -> Result<SessionStats, SurfaceError>
where
    G: GraphicsContext,
    S: FrameScheduler + ?Sized,
    F: FnMut(&RenderSession<'_, G>, FrameTick),
{
    let session = RenderSession::begin(gl, config)?;
    let mut frames_rendered = 0u64;
    while let Some(tick) = scheduler.next_frame() {
        per_frame(&session, tick);
        frames_rendered = frames_rendered.saturating_add(1);
    }
    session.finish();
    Ok(SessionStats { frames_rendered })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessContext, ResourceCounts};
    use crate::sched::FixedStepScheduler;

    const VERTEX_SOURCE: &str = "attribute vec3 position;\n\
                                 void main() { gl_Position = vec4(position, 1.0); }\n";
    const FRAGMENT_SOURCE: &str = "precision mediump float;\n\
                                   uniform float u_time;\n\
                                   void main() { gl_FragColor = vec4(vec3(sin(u_time)), 1.0); }\n";
    const QUAD: [f32; 12] = [
        -1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0,
    ];

    fn quad_config<'a>() -> SessionConfig<'a> {
        SessionConfig {
            vertex_source: VERTEX_SOURCE,
            fragment_source: FRAGMENT_SOURCE,
            vertices: &QUAD,
            components_per_vertex: 3,
            attribute: "position",
            mode: PrimitiveMode::TriangleFan,
            clear: [0.0, 0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn begin_acquires_the_full_resource_set() {
        let gl = HeadlessContext::new();
        let session = RenderSession::begin(&gl, &quad_config()).unwrap();

        assert_eq!(
            gl.created(),
            ResourceCounts {
                shaders: 2,
                programs: 1,
                buffers: 1
            }
        );
        assert_eq!(gl.active_program(), Some(session.program()));
        assert_eq!(session.vertex_count(), 4);
    }

    #[test]
    fn drop_releases_everything_exactly_once() {
        let gl = HeadlessContext::new();
        let session = RenderSession::begin(&gl, &quad_config()).unwrap();
        drop(session);

        assert_eq!(gl.created(), gl.deleted());
        assert_eq!(gl.live(), ResourceCounts::default());
    }

    #[test]
    fn finish_then_drop_does_not_double_free() {
        let gl = HeadlessContext::new();
        let session = RenderSession::begin(&gl, &quad_config()).unwrap();
        session.finish();

        assert_eq!(gl.deleted().shaders, 2);
        assert_eq!(gl.deleted().programs, 1);
        assert_eq!(gl.deleted().buffers, 1);
    }

    #[test]
    fn draw_frame_clears_then_draws_the_quad() {
        let gl = HeadlessContext::new();
        let session = RenderSession::begin(&gl, &quad_config()).unwrap();
        session.draw_frame();

        assert_eq!(gl.clear_calls(), 1);
        let draws = gl.draw_calls();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].mode, PrimitiveMode::TriangleFan);
        assert_eq!(draws[0].first, 0);
        assert_eq!(draws[0].count, 4);
    }

    #[test]
    fn fragment_failure_releases_the_vertex_shader() {
        let gl = HeadlessContext::new();
        gl.fail_compile(ShaderStage::Fragment, "0:3: syntax error");

        let result = RenderSession::begin(&gl, &quad_config());
        assert!(matches!(
            result.err(),
            Some(SurfaceError::Compile {
                stage: ShaderStage::Fragment,
                ..
            })
        ));
        assert_eq!(gl.created().shaders, 2);
        assert_eq!(gl.deleted().shaders, 2);
        assert_eq!(gl.created().programs, 0);
        assert_eq!(gl.created().buffers, 0);
    }

    #[test]
    fn link_failure_releases_shaders_and_leaves_the_program() {
        let gl = HeadlessContext::new();
        gl.fail_link("attribute count exceeds limit");

        let result = RenderSession::begin(&gl, &quad_config());
        assert!(matches!(result.err(), Some(SurfaceError::Link { .. })));
        assert_eq!(gl.deleted().shaders, 2);
        assert_eq!(gl.created().programs, 1);
        assert_eq!(gl.deleted().programs, 0);
    }

    #[test]
    fn attribute_miss_releases_the_orphan_buffer() {
        let gl = HeadlessContext::new();
        let mut config = quad_config();
        config.attribute = "pos";

        let result = RenderSession::begin(&gl, &config);
        assert!(matches!(
            result.err(),
            Some(SurfaceError::AttributeNotFound { ref name }) if name == "pos"
        ));
        assert_eq!(gl.created(), gl.deleted());
        assert_eq!(gl.live(), ResourceCounts::default());
        assert!(gl.draw_calls().is_empty());
    }

    #[test]
    fn run_session_draws_once_per_scheduled_tick() {
        let gl = HeadlessContext::new();
        let mut scheduler = FixedStepScheduler::new(3, 1.0 / 60.0);

        let stats = run_session(&gl, &quad_config(), &mut scheduler, |session, tick| {
            session.set_uniform("u_time", UniformValue::Float(tick.seconds));
            session.draw_frame();
        })
        .unwrap();

        assert_eq!(stats.frames_rendered, 3);
        assert_eq!(gl.draw_calls().len(), 3);
        assert_eq!(gl.uniform_writes().len(), 3);
        assert_eq!(gl.live(), ResourceCounts::default());
    }

    #[test]
    fn run_session_propagates_setup_failure_without_drawing() {
        let gl = HeadlessContext::new();
        gl.fail_compile(ShaderStage::Vertex, "0:1: unknown pragma");
        let mut scheduler = FixedStepScheduler::new(3, 1.0 / 60.0);

        let result = run_session(&gl, &quad_config(), &mut scheduler, |session, _| {
            session.draw_frame();
        });

        assert!(matches!(result.err(), Some(SurfaceError::Compile { .. })));
        assert!(gl.draw_calls().is_empty());
        assert_eq!(gl.live(), ResourceCounts::default());
    }
}
