mod builtin;
mod demo;
mod manifest;
mod pack;
mod player;

pub use builtin::{builtin_demos, find_builtin};
pub use demo::{
    mode_label, parse_mode, DemoDefinition, DemoMetadata, QuadGeometry, UniformBinding,
    UniformInput,
};
pub use manifest::DemoManifest;
pub use pack::{DemoPack, PackError, MANIFEST_FILE};
pub use player::{run_demo, PlaybackReport};

use std::path::PathBuf;

/// How a demo was named by the user: a built-in gallery entry or a pack
/// directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoHandle {
    Builtin(String),
    LocalPack(PathBuf),
}

impl DemoHandle {
    /// Parses user input. `builtin://name` and bare names select the built-in
    /// gallery; anything path-shaped loads a pack directory.
    pub fn from_input(input: &str) -> Self {
        if let Some(name) = input.strip_prefix("builtin://") {
            Self::Builtin(name.to_string())
        } else if input.contains(['/', '\\']) || input.starts_with('.') {
            Self::LocalPack(PathBuf::from(input))
        } else {
            Self::Builtin(input.to_string())
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }
}

/// Resolves a handle into a runnable demo definition.
pub fn resolve_demo(handle: &DemoHandle) -> Result<DemoDefinition, PackError> {
    match handle {
        DemoHandle::Builtin(name) => {
            find_builtin(name).ok_or_else(|| PackError::UnknownBuiltin(name.clone()))
        }
        DemoHandle::LocalPack(path) => DemoPack::load(path).map(DemoPack::into_demo),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_builtin_scheme() {
        assert_eq!(
            DemoHandle::from_input("builtin://noise"),
            DemoHandle::Builtin("noise".into())
        );
    }

    #[test]
    fn bare_names_are_builtins() {
        assert_eq!(
            DemoHandle::from_input("bloom"),
            DemoHandle::Builtin("bloom".into())
        );
    }

    #[test]
    fn path_shaped_input_is_a_local_pack() {
        assert!(matches!(
            DemoHandle::from_input("packs/waves"),
            DemoHandle::LocalPack(path) if path == PathBuf::from("packs/waves")
        ));
        assert!(matches!(
            DemoHandle::from_input("./waves"),
            DemoHandle::LocalPack(_)
        ));
    }

    #[test]
    fn unknown_builtin_resolves_to_an_error() {
        let handle = DemoHandle::from_input("plasma");
        assert!(matches!(
            resolve_demo(&handle),
            Err(PackError::UnknownBuiltin(ref name)) if name == "plasma"
        ));
    }
}
