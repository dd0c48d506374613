//! Runs a demo over any graphics context.

use surface::{
    run_session, FrameScheduler, GraphicsContext, SurfaceError, UniformValue,
};
use tracing::info;

use crate::demo::{DemoDefinition, UniformInput};

/// Outcome summary of a finished playback run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    pub demo: String,
    pub frames_rendered: u64,
}

/// Plays `demo` until `scheduler` stops yielding frames.
///
/// Each frame resolves the demo's uniform bindings (time from the tick,
/// resolution from the context) and draws the quad. Every resource acquired
/// during setup is released before this returns, on success and failure
/// alike.
pub fn run_demo<G, S>(
    gl: &G,
    demo: &DemoDefinition,
    scheduler: &mut S,
) -> Result<PlaybackReport, SurfaceError>
where
    G: GraphicsContext,
    S: FrameScheduler + ?Sized,
{
    let config = demo.session_config();
    let stats = run_session(gl, &config, scheduler, |session, tick| {
        for binding in &demo.uniforms {
            let value = match binding.input {
                UniformInput::Time => UniformValue::Float(tick.seconds),
                UniformInput::Resolution => {
                    let size = gl.surface_size();
                    UniformValue::Vec2([size.width as f32, size.height as f32])
                }
                UniformInput::Constant(v) => UniformValue::Float(v),
            };
            session.set_uniform(&binding.name, value);
        }
        session.draw_frame();
    })?;
    info!(demo = %demo.name, frames = stats.frames_rendered, "demo playback finished");
    Ok(PlaybackReport {
        demo: demo.name.clone(),
        frames_rendered: stats.frames_rendered,
    })
}
