//! Workspace crate registry.
//!
//! Reads every `Cargo.toml` under the scanned roots and records the crate
//! names they declare, in the form they take inside a `use` path (`-` becomes
//! `_`). The registry is built once per run and only read afterwards.
//!
//! Manifests that cannot be read or parsed are dropped with a warning; they
//! never stop discovery.

use crate::error::ManifestError;
use crate::scanner::{self, ScanOptions};
use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Names of crates owned by the scanned workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkspaceRegistry {
    crates: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<NamedTable>,
    lib: Option<NamedTable>,
}

#[derive(Debug, Deserialize)]
struct NamedTable {
    name: Option<String>,
}

impl WorkspaceRegistry {
    /// Builds a registry from every manifest under `paths`.
    ///
    /// Only walking the tree can fail; individual manifests fail soft.
    pub fn discover(paths: &[PathBuf], options: &ScanOptions) -> Result<Self> {
        let manifests = scanner::collect_manifests(paths, options)?;
        debug!("Found {} manifests", manifests.len());

        let mut registry = Self::default();
        for manifest in &manifests {
            match read_manifest(manifest) {
                Ok(names) => registry.extend(names),
                Err(err) => warn!("Skipping manifest: {}", err),
            }
        }

        debug!("Registry holds {} crate names", registry.len());
        Ok(registry)
    }

    /// Adds names, normalizing them to import form.
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.crates
            .extend(names.into_iter().map(|n| n.as_ref().replace('-', "_")));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.crates.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.crates.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.crates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crates.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for WorkspaceRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::default();
        registry.extend(iter);
        registry
    }
}

/// Returns the package and library names declared by one manifest.
///
/// A virtual workspace manifest declares neither and yields an empty list.
pub fn read_manifest(path: &Path) -> Result<Vec<String>, ManifestError> {
    let source = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: Manifest = toml::from_str(&source).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok([manifest.package, manifest.lib]
        .into_iter()
        .flatten()
        .filter_map(|table| table.name)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/workspace")
    }

    #[test]
    fn discovers_names_from_fixture() {
        let registry =
            WorkspaceRegistry::discover(&[fixture_root()], &ScanOptions::default()).unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["app_cli", "app_core", "cli_support"]);
    }

    #[test]
    fn broken_manifest_is_reported() {
        let path = fixture_root().join("crates/broken/Cargo.toml");
        let err = read_manifest(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn missing_manifest_is_reported() {
        let err = read_manifest(Path::new("does/not/exist/Cargo.toml")).unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[test]
    fn virtual_manifest_declares_nothing() {
        let names = read_manifest(&fixture_root().join("Cargo.toml")).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn library_name_is_recorded_alongside_package() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(
            &path,
            "[package]\nname = \"my-tool\"\n\n[lib]\nname = \"tool_core\"\npath = \"src/lib.rs\"\n",
        )
        .unwrap();
        assert_eq!(read_manifest(&path).unwrap(), vec!["my-tool", "tool_core"]);
    }

    #[test]
    fn names_are_normalized_to_import_form() {
        let registry: WorkspaceRegistry = ["app-core", "plain"].into_iter().collect();
        assert!(registry.contains("app_core"));
        assert!(!registry.contains("app-core"));
        assert!(registry.contains("plain"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn skips_manifests_under_target() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"root\"\n").unwrap();
        fs::create_dir_all(dir.path().join("target/package/vendored")).unwrap();
        fs::write(
            dir.path().join("target/package/vendored/Cargo.toml"),
            "[package]\nname = \"vendored\"\n",
        )
        .unwrap();

        let registry =
            WorkspaceRegistry::discover(&[dir.path().to_path_buf()], &ScanOptions::default())
                .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["root"]);
    }
}
