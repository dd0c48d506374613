//! Manifest schema for on-disk demo packs.
//!
//! Types:
//!
//! - `DemoManifest` captures the `demo.toml` fields a pack directory declares:
//!   shader paths, attribute layout, draw mode, optional geometry override,
//!   and uniform bindings. Serde defaults tolerate sparse manifests so a
//!   minimal pack is just a name and two shader paths.
//!
//! Functions:
//!
//! - `DemoManifest::validate` returns human-readable issues so pack loading
//!   can report every problem at once instead of failing on the first.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::demo::{parse_mode, UniformBinding};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DemoManifest {
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Vertex shader path, relative to the pack root.
    pub vertex: PathBuf,
    /// Fragment shader path, relative to the pack root.
    pub fragment: PathBuf,
    #[serde(default = "default_attribute")]
    pub attribute: String,
    #[serde(default = "default_components")]
    pub components_per_vertex: u32,
    /// Draw mode; defaults to a fan for 3-component quads, a strip otherwise.
    #[serde(default)]
    pub mode: Option<String>,
    /// Explicit flat vertex data replacing the default fullscreen quad.
    #[serde(default)]
    pub geometry: Option<Vec<f32>>,
    #[serde(default)]
    pub clear: Option<[f32; 4]>,
    #[serde(default, rename = "uniform")]
    pub uniforms: Vec<UniformBinding>,
}

fn default_attribute() -> String {
    "position".to_string()
}

fn default_components() -> u32 {
    2
}

impl DemoManifest {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push("demo name is empty".to_string());
        }
        if self.vertex.as_os_str().is_empty() {
            issues.push("vertex shader path is empty".to_string());
        }
        if self.fragment.as_os_str().is_empty() {
            issues.push("fragment shader path is empty".to_string());
        }
        if let Some(mode) = &self.mode {
            if parse_mode(mode).is_none() {
                issues.push(format!("unknown draw mode '{mode}'"));
            }
        }
        let components_ok = (1..=4).contains(&self.components_per_vertex);
        if !components_ok {
            issues.push(format!(
                "components per vertex must be 1..=4, got {}",
                self.components_per_vertex
            ));
        }
        match &self.geometry {
            Some(values) => {
                if values.is_empty() {
                    issues.push("geometry override is empty".to_string());
                } else if components_ok
                    && values.len() % self.components_per_vertex as usize != 0
                {
                    issues.push(format!(
                        "geometry length {} is not a multiple of {}",
                        values.len(),
                        self.components_per_vertex
                    ));
                }
            }
            None => {
                if components_ok && !matches!(self.components_per_vertex, 2 | 3) {
                    issues.push(format!(
                        "no default quad for {} components per vertex; declare geometry explicitly",
                        self.components_per_vertex
                    ));
                }
            }
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::UniformInput;

    const MINIMAL: &str = r#"
name = "waves"
vertex = "waves.vert"
fragment = "waves.frag"
"#;

    const FULL: &str = r#"
name = "plasma"
summary = "classic plasma"
vertex = "shaders/plasma.vert"
fragment = "shaders/plasma.frag"
attribute = "a_position"
components_per_vertex = 3
mode = "fan"
clear = [0.1, 0.1, 0.1, 1.0]

[[uniform]]
name = "u_time"
input = "time"

[[uniform]]
name = "u_scale"
input = { constant = 2.5 }
"#;

    #[test]
    fn minimal_manifest_uses_defaults() {
        let manifest: DemoManifest = toml::from_str(MINIMAL).expect("parse manifest");
        assert!(manifest.validate().is_empty());
        assert_eq!(manifest.attribute, "position");
        assert_eq!(manifest.components_per_vertex, 2);
        assert!(manifest.mode.is_none());
        assert!(manifest.uniforms.is_empty());
    }

    #[test]
    fn full_manifest_parses_uniform_tables() {
        let manifest: DemoManifest = toml::from_str(FULL).expect("parse manifest");
        assert!(manifest.validate().is_empty());
        assert_eq!(manifest.uniforms.len(), 2);
        assert_eq!(manifest.uniforms[0].input, UniformInput::Time);
        assert_eq!(manifest.uniforms[1].input, UniformInput::Constant(2.5));
    }

    #[test]
    fn validation_collects_every_issue() {
        let manifest: DemoManifest = toml::from_str(
            r#"
name = ""
vertex = "a.vert"
fragment = "a.frag"
components_per_vertex = 7
mode = "lines"
"#,
        )
        .expect("parse manifest");
        let issues = manifest.validate();
        assert!(issues.iter().any(|issue| issue.contains("name")));
        assert!(issues.iter().any(|issue| issue.contains("1..=4")));
        assert!(issues.iter().any(|issue| issue.contains("lines")));
    }

    #[test]
    fn four_component_quad_requires_explicit_geometry() {
        let manifest: DemoManifest = toml::from_str(
            r#"
name = "points"
vertex = "a.vert"
fragment = "a.frag"
components_per_vertex = 4
"#,
        )
        .expect("parse manifest");
        let issues = manifest.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("declare geometry explicitly"));
    }
}
