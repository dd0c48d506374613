//! Vertex buffer creation and attribute wiring.

use tracing::error;

use crate::context::GraphicsContext;
use crate::error::SurfaceError;
use crate::release::ResourceSet;

/// Uploads `data` into a fresh array buffer and wires it to the named vertex
/// attribute of `program`.
///
/// The buffer is tracked in `resources` the moment it exists, so it reaches
/// teardown even when attribute resolution fails afterwards. On that failure
/// path no vertex-array state has been enabled; the demo simply never draws.
/// The returned handle is the same one `resources` tracks.
pub fn bind_attribute_buffer<G: GraphicsContext>(
    gl: &G,
    program: G::Program,
    data: &[f32],
    components_per_vertex: u32,
    attribute: &str,
    resources: &mut ResourceSet<G>,
) -> Result<G::Buffer, SurfaceError> {
    if !(1..=4).contains(&components_per_vertex) {
        return Err(SurfaceError::InvalidLayout {
            reason: format!("components per vertex must be 1..=4, got {components_per_vertex}"),
        });
    }
    if attribute.is_empty() {
        return Err(SurfaceError::InvalidLayout {
            reason: "attribute name is empty".to_string(),
        });
    }
    if data.is_empty() {
        return Err(SurfaceError::InvalidLayout {
            reason: "vertex data is empty".to_string(),
        });
    }
    if data.len() % components_per_vertex as usize != 0 {
        return Err(SurfaceError::InvalidLayout {
            reason: format!(
                "vertex data length {} is not a multiple of {components_per_vertex}",
                data.len()
            ),
        });
    }

    let buffer = gl.create_buffer()?;
    resources.track_buffer(buffer);
    gl.bind_array_buffer(buffer);
    gl.upload_static_vertices(data);

    let Some(location) = gl.attribute_location(program, attribute) else {
        error!(attribute, "vertex attribute not found in linked program");
        return Err(SurfaceError::AttributeNotFound {
            name: attribute.to_string(),
        });
    };

    gl.configure_float_attribute(location, components_per_vertex);
    gl.enable_attribute(location);
    Ok(buffer)
}
