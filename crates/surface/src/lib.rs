//! GPU resource lifecycle for fullscreen shader surfaces.
//!
//! The crate manages the objects a shader demo acquires from a graphics
//! context and guarantees they come back, whatever path the demo exits by.
//! The overall flow is:
//!
//! ```text
//!   host context (GlowSurface / HeadlessContext)
//!          │ &impl GraphicsContext
//!          ▼
//!   RenderSession::begin ──▶ compile_shader ×2 ──▶ link_program ──▶ bind_attribute_buffer
//!          │                                                    (everything lands in a ResourceSet)
//!          ▼
//!   run_session loop ◀── FrameScheduler ticks ──▶ per-frame closure: uniforms + draw
//!          │
//!          ▼
//!   ResourceSet::release  (exactly once: finish, drop, or failed begin)
//! ```
//!
//! Failures are recoverable by construction: a compile error deletes its own
//! shader, a failed `begin` releases whatever it had acquired, and the error
//! carries the driver's diagnostic log up to the caller. The context itself
//! always belongs to the host; every helper borrows it as a parameter, which
//! is also what keeps the whole lifecycle runnable against the recording
//! [`HeadlessContext`] with no GPU in sight.

mod buffer;
mod compile;
mod context;
mod error;
mod headless;
mod release;
mod sched;
mod session;

#[cfg(feature = "glow")]
mod backend;

pub use buffer::bind_attribute_buffer;
pub use compile::{compile_shader, link_program};
pub use context::{GraphicsContext, PrimitiveMode, ShaderStage, SurfaceSize, UniformValue};
pub use error::SurfaceError;
pub use headless::{
    DrawCall, HeadlessBuffer, HeadlessContext, HeadlessProgram, HeadlessShader, ResourceCounts,
};
pub use release::ResourceSet;
pub use sched::{FixedStepScheduler, FrameScheduler, FrameTick, WallClockScheduler};
pub use session::{run_session, RenderSession, SessionConfig, SessionStats};

#[cfg(feature = "glow")]
pub use backend::GlowSurface;
