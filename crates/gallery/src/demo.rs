//! Demo model shared by the built-in gallery and on-disk packs.

use serde::{Deserialize, Serialize};
use surface::{PrimitiveMode, SessionConfig};

/// Flat vertex positions plus their per-vertex component count.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadGeometry {
    pub vertices: Vec<f32>,
    pub components_per_vertex: u32,
}

impl QuadGeometry {
    /// Fullscreen quad as four xyz corners, drawn as a triangle fan.
    pub fn fan_xyz() -> Self {
        Self {
            vertices: vec![
                -1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0,
            ],
            components_per_vertex: 3,
        }
    }

    /// Fullscreen quad as four xy corners, drawn as a triangle strip.
    pub fn strip_xy() -> Self {
        Self {
            vertices: vec![-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0],
            components_per_vertex: 2,
        }
    }

    /// Number of whole vertices the flat data describes.
    pub fn vertex_count(&self) -> usize {
        if self.components_per_vertex == 0 {
            0
        } else {
            self.vertices.len() / self.components_per_vertex as usize
        }
    }
}

/// Where a uniform's per-frame value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniformInput {
    /// Seconds since the session started.
    Time,
    /// Surface size in pixels, delivered as a vec2.
    Resolution,
    /// Fixed float value.
    Constant(f32),
}

/// Binds a shader uniform name to a per-frame input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformBinding {
    pub name: String,
    pub input: UniformInput,
}

impl UniformBinding {
    pub fn new(name: impl Into<String>, input: UniformInput) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

/// A complete runnable demo: sources, geometry, and uniform plumbing.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoDefinition {
    pub name: String,
    pub summary: String,
    pub vertex_source: String,
    pub fragment_source: String,
    pub geometry: QuadGeometry,
    /// Vertex attribute the position buffer binds to.
    pub attribute: String,
    pub mode: PrimitiveMode,
    pub clear: [f32; 4],
    pub uniforms: Vec<UniformBinding>,
}

impl DemoDefinition {
    /// Session inputs borrowed from this demo.
    pub fn session_config(&self) -> SessionConfig<'_> {
        SessionConfig {
            vertex_source: &self.vertex_source,
            fragment_source: &self.fragment_source,
            vertices: &self.geometry.vertices,
            components_per_vertex: self.geometry.components_per_vertex,
            attribute: &self.attribute,
            mode: self.mode,
            clear: self.clear,
        }
    }

    /// Collects every problem a host would hit running this demo, as
    /// human-readable issues. An empty result means the demo is runnable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push("demo name is empty".to_string());
        }
        if self.vertex_source.trim().is_empty() {
            issues.push("vertex shader source is empty".to_string());
        }
        if self.fragment_source.trim().is_empty() {
            issues.push("fragment shader source is empty".to_string());
        }
        if !(1..=4).contains(&self.geometry.components_per_vertex) {
            issues.push(format!(
                "components per vertex must be 1..=4, got {}",
                self.geometry.components_per_vertex
            ));
        } else if self.geometry.vertices.is_empty() {
            issues.push("geometry has no vertices".to_string());
        } else if self.geometry.vertices.len() % self.geometry.components_per_vertex as usize != 0
        {
            issues.push(format!(
                "vertex data length {} is not a multiple of {}",
                self.geometry.vertices.len(),
                self.geometry.components_per_vertex
            ));
        }
        if self.attribute.is_empty() {
            issues.push("attribute name is empty".to_string());
        } else if !self.vertex_source.contains(self.attribute.as_str()) {
            issues.push(format!(
                "vertex shader never references attribute '{}'",
                self.attribute
            ));
        }
        let mut seen: Vec<&str> = Vec::new();
        for binding in &self.uniforms {
            if binding.name.is_empty() {
                issues.push("uniform binding has an empty name".to_string());
            } else if seen.contains(&binding.name.as_str()) {
                issues.push(format!("uniform '{}' bound more than once", binding.name));
            } else {
                seen.push(binding.name.as_str());
            }
        }
        issues
    }

    /// Serializable metadata view for host tooling.
    pub fn metadata(&self) -> DemoMetadata {
        DemoMetadata {
            name: self.name.clone(),
            summary: self.summary.clone(),
            attribute: self.attribute.clone(),
            components_per_vertex: self.geometry.components_per_vertex,
            vertex_count: self.geometry.vertex_count(),
            mode: mode_label(self.mode).to_string(),
            uniforms: self.uniforms.clone(),
        }
    }
}

/// Flattened, serializable description of a demo for list/info output.
#[derive(Debug, Clone, Serialize)]
pub struct DemoMetadata {
    pub name: String,
    pub summary: String,
    pub attribute: String,
    pub components_per_vertex: u32,
    pub vertex_count: usize,
    pub mode: String,
    pub uniforms: Vec<UniformBinding>,
}

/// Stable lowercase label for a primitive mode.
pub fn mode_label(mode: PrimitiveMode) -> &'static str {
    match mode {
        PrimitiveMode::Triangles => "triangles",
        PrimitiveMode::TriangleStrip => "strip",
        PrimitiveMode::TriangleFan => "fan",
    }
}

/// Parses a manifest mode string; accepts short and long spellings.
pub fn parse_mode(value: &str) -> Option<PrimitiveMode> {
    match value.to_ascii_lowercase().as_str() {
        "triangles" => Some(PrimitiveMode::Triangles),
        "strip" | "triangle_strip" => Some(PrimitiveMode::TriangleStrip),
        "fan" | "triangle_fan" => Some(PrimitiveMode::TriangleFan),
        _ => None,
    }
}
