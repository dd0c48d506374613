//! Loads demo packs from local directories.
//!
//! A pack is a directory holding a `demo.toml` manifest next to its GLSL
//! sources:
//!
//! ```text
//! waves/
//! ├── demo.toml
//! ├── waves.vert
//! └── waves.frag
//! ```
//!
//! Loading parses and validates the manifest, reads both shader files, and
//! resolves everything into a runnable [`DemoDefinition`].

use std::fs;
use std::path::{Path, PathBuf};

use surface::PrimitiveMode;
use thiserror::Error;
use tracing::debug;

use crate::demo::{parse_mode, DemoDefinition, QuadGeometry};
use crate::manifest::DemoManifest;

/// Manifest file name every pack directory must contain.
pub const MANIFEST_FILE: &str = "demo.toml";

#[derive(Debug, Error)]
pub enum PackError {
    #[error("manifest not found at {0}")]
    ManifestMissing(PathBuf),

    #[error("failed to parse manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("manifest validation failed: {0:?}")]
    ManifestValidation(Vec<String>),

    #[error("shader source not found at {0}")]
    ShaderMissing(PathBuf),

    #[error("no built-in demo named '{0}'")]
    UnknownBuiltin(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Demo pack resolved from a local directory.
#[derive(Debug, Clone)]
pub struct DemoPack {
    root: PathBuf,
    demo: DemoDefinition,
}

impl DemoPack {
    pub fn load(root: impl AsRef<Path>) -> Result<Self, PackError> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(PackError::ManifestMissing(manifest_path));
        }

        let manifest_raw = fs::read_to_string(&manifest_path)?;
        let manifest: DemoManifest = toml::from_str(&manifest_raw)?;
        let issues = manifest.validate();
        if !issues.is_empty() {
            return Err(PackError::ManifestValidation(issues));
        }

        let vertex_source = read_shader(&root, &manifest.vertex)?;
        let fragment_source = read_shader(&root, &manifest.fragment)?;
        let demo = resolve_definition(&manifest, vertex_source, fragment_source);
        debug!(root = %root.display(), demo = %demo.name, "loaded demo pack");
        Ok(Self { root, demo })
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    pub fn demo(&self) -> &DemoDefinition {
        &self.demo
    }

    pub fn into_demo(self) -> DemoDefinition {
        self.demo
    }
}

fn read_shader(root: &Path, relative: &Path) -> Result<String, PackError> {
    let path = root.join(relative);
    if !path.exists() {
        return Err(PackError::ShaderMissing(path));
    }
    Ok(fs::read_to_string(&path)?)
}

fn resolve_definition(
    manifest: &DemoManifest,
    vertex_source: String,
    fragment_source: String,
) -> DemoDefinition {
    let components = manifest.components_per_vertex;
    let geometry = match &manifest.geometry {
        Some(vertices) => QuadGeometry {
            vertices: vertices.clone(),
            components_per_vertex: components,
        },
        None if components == 3 => QuadGeometry::fan_xyz(),
        None => QuadGeometry::strip_xy(),
    };
    let mode = match manifest.mode.as_deref() {
        Some(value) => parse_mode(value).unwrap_or(PrimitiveMode::TriangleStrip),
        None if components == 3 => PrimitiveMode::TriangleFan,
        None => PrimitiveMode::TriangleStrip,
    };
    DemoDefinition {
        name: manifest.name.clone(),
        summary: manifest.summary.clone().unwrap_or_default(),
        vertex_source,
        fragment_source,
        geometry,
        attribute: manifest.attribute.clone(),
        mode,
        clear: manifest.clear.unwrap_or([0.0, 0.0, 0.0, 1.0]),
        uniforms: manifest.uniforms.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{UniformBinding, UniformInput};

    const VERTEX: &str =
        "attribute vec2 position;\nvoid main() { gl_Position = vec4(position, 0.0, 1.0); }\n";
    const FRAGMENT: &str = "precision mediump float;\nuniform float u_time;\n\
                            void main() { gl_FragColor = vec4(vec3(fract(u_time)), 1.0); }\n";

    const MANIFEST: &str = r#"
name = "waves"
summary = "sine ripples"
vertex = "demo.vert"
fragment = "demo.frag"

[[uniform]]
name = "u_time"
input = "time"
"#;

    fn write_pack(dir: &Path, manifest: &str) {
        fs::write(dir.join(MANIFEST_FILE), manifest).expect("write manifest");
        fs::write(dir.join("demo.vert"), VERTEX).expect("write vertex shader");
        fs::write(dir.join("demo.frag"), FRAGMENT).expect("write fragment shader");
    }

    #[test]
    fn loads_pack_into_runnable_demo() {
        let temp = tempfile::tempdir().unwrap();
        write_pack(temp.path(), MANIFEST);

        let pack = DemoPack::load(temp.path()).expect("load pack");
        let demo = pack.demo();
        assert_eq!(demo.name, "waves");
        assert_eq!(demo.mode, PrimitiveMode::TriangleStrip);
        assert_eq!(demo.geometry.components_per_vertex, 2);
        assert_eq!(
            demo.uniforms,
            vec![UniformBinding::new("u_time", UniformInput::Time)]
        );
        assert!(demo.validate().is_empty());
    }

    #[test]
    fn missing_manifest_is_its_own_error() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            DemoPack::load(temp.path()),
            Err(PackError::ManifestMissing(_))
        ));
    }

    #[test]
    fn missing_fragment_source_reports_its_path() {
        let temp = tempfile::tempdir().unwrap();
        write_pack(temp.path(), MANIFEST);
        fs::remove_file(temp.path().join("demo.frag")).unwrap();

        let result = DemoPack::load(temp.path());
        assert!(matches!(
            result,
            Err(PackError::ShaderMissing(ref path)) if path.ends_with("demo.frag")
        ));
    }

    #[test]
    fn invalid_manifest_lists_issues() {
        let temp = tempfile::tempdir().unwrap();
        write_pack(
            temp.path(),
            "name = \"bad\"\nvertex = \"demo.vert\"\nfragment = \"demo.frag\"\n\
             components_per_vertex = 9\n",
        );

        let result = DemoPack::load(temp.path());
        assert!(matches!(
            result,
            Err(PackError::ManifestValidation(ref issues))
                if issues.iter().any(|issue| issue.contains("1..=4"))
        ));
    }

    #[test]
    fn explicit_geometry_and_mode_override_defaults() {
        let temp = tempfile::tempdir().unwrap();
        write_pack(
            temp.path(),
            r#"
name = "tri"
vertex = "demo.vert"
fragment = "demo.frag"
mode = "triangles"
geometry = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0]
"#,
        );

        let pack = DemoPack::load(temp.path()).expect("load pack");
        assert_eq!(pack.demo().mode, PrimitiveMode::Triangles);
        assert_eq!(pack.demo().geometry.vertex_count(), 3);
    }
}
