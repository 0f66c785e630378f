//! Provenance groups for `use` paths.
//!
//! Every path lands in exactly one of three ordered groups, decided by its
//! leading identifier. The rules are evaluated in order and the first match
//! wins:
//!
//! 1. `crate`, `self` or `super` → [`Group::Workspace`]
//! 2. a name starting with `_` → [`Group::Workspace`]
//! 3. a crate from the [`WorkspaceRegistry`] → [`Group::Workspace`]
//! 4. a crate from the utility allow-list → [`Group::Utility`]
//! 5. anything else → [`Group::External`]

use crate::registry::WorkspaceRegistry;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static LEADING_IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("valid identifier regex"));

/// Standard library and general-purpose crates sorted into the first group.
pub const UTILITY_CRATES: &[&str] = &[
    "std",
    "core",
    "alloc",
    "anyhow",
    "serde",
    "serde_json",
    "serde_yaml",
    "serde_repr",
    "serde_with",
    "serde_bytes",
    "serde_path_to_error",
    "serde_cbor",
    "serde_urlencoded",
    "serde_json_path",
    "toml",
    "ron",
    "regex",
    "lazy_static",
    "once_cell",
    "tokio",
    "futures",
    "async_std",
    "chrono",
    "log",
    "uuid",
    "rand",
    "base64",
    "bytes",
    "cfg_if",
    "parking_lot",
    "url",
    "rayon",
    "snap",
    "strum",
];

const WORKSPACE_KEYWORDS: [&str; 3] = ["crate", "self", "super"];

/// Import group, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    /// Standard library and shared utility crates.
    Utility = 1,
    /// Domain-specific third-party crates.
    External = 2,
    /// `crate::`, `super::`, `self::` and crates owned by the workspace.
    Workspace = 3,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Utility, Group::External, Group::Workspace];
}

/// Assigns groups using the workspace registry and the utility allow-list.
///
/// Built once per run; holds no mutable state.
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    registry: &'a WorkspaceRegistry,
    utility: BTreeSet<String>,
}

impl<'a> Classifier<'a> {
    /// Uses the built-in [`UTILITY_CRATES`] allow-list.
    pub fn new(registry: &'a WorkspaceRegistry) -> Self {
        Self {
            registry,
            utility: UTILITY_CRATES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Extends the allow-list with extra crate names.
    pub fn with_utility_crates<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.utility
            .extend(names.into_iter().map(|n| n.as_ref().replace('-', "_")));
        self
    }

    pub fn registry(&self) -> &WorkspaceRegistry {
        self.registry
    }

    pub fn classify(&self, path: &str) -> Group {
        let Some(ident) = leading_ident(path) else {
            return Group::External;
        };

        if WORKSPACE_KEYWORDS.contains(&ident)
            || ident.starts_with('_')
            || self.registry.contains(ident)
        {
            Group::Workspace
        } else if self.utility.contains(ident) {
            Group::Utility
        } else {
            Group::External
        }
    }
}

/// First identifier of a path, ignoring a leading `::`.
pub fn leading_ident(path: &str) -> Option<&str> {
    let path = path.trim_start().trim_start_matches(':').trim_start();
    LEADING_IDENT_RE.find(path).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(path: &str) -> Group {
        let registry = WorkspaceRegistry::default();
        Classifier::new(&registry).classify(path)
    }

    #[test]
    fn classifies_reference_paths() {
        assert_eq!(classify("std::collections::HashMap"), Group::Utility);
        assert_eq!(classify("crate::foo"), Group::Workspace);
        assert_eq!(classify("_internal_mod::x"), Group::Workspace);
        assert_eq!(classify("serialport::SerialPort"), Group::External);
    }

    #[test]
    fn workspace_keywords_win() {
        assert_eq!(classify("self::item"), Group::Workspace);
        assert_eq!(classify("super::parent"), Group::Workspace);
        assert_eq!(classify("crate"), Group::Workspace);
    }

    #[test]
    fn underscore_prefixes_are_internal() {
        assert_eq!(classify("_client_functions_3_1::something"), Group::Workspace);
        assert_eq!(classify("_main::run"), Group::Workspace);
        assert_eq!(classify("_utils"), Group::Workspace);
    }

    #[test]
    fn allow_listed_crates_are_utility() {
        assert_eq!(classify("anyhow::Result"), Group::Utility);
        assert_eq!(classify("tokio::spawn"), Group::Utility);
        assert_eq!(classify("serde::{Deserialize, Serialize}"), Group::Utility);
    }

    #[test]
    fn unknown_crates_are_external() {
        assert_eq!(classify("rmodbus::ModbusContext"), Group::External);
        assert_eq!(classify("clap::Parser"), Group::External);
    }

    #[test]
    fn registry_overrides_allow_list() {
        let registry: WorkspaceRegistry = ["log", "app-core"].into_iter().collect();
        let classifier = Classifier::new(&registry);
        assert_eq!(classifier.classify("log::info"), Group::Workspace);
        assert_eq!(classifier.classify("app_core::Engine"), Group::Workspace);
        assert_eq!(classifier.classify("std::fmt"), Group::Utility);
    }

    #[test]
    fn extra_utility_crates_are_honored() {
        let registry = WorkspaceRegistry::default();
        let classifier = Classifier::new(&registry).with_utility_crates(["clap", "thiserror"]);
        assert_eq!(classifier.classify("clap::Parser"), Group::Utility);
        assert_eq!(classifier.classify("thiserror::Error"), Group::Utility);
    }

    #[test]
    fn leading_separator_and_missing_ident() {
        assert_eq!(classify("::std::fmt"), Group::Utility);
        assert_eq!(classify("{std::fmt, serde::Serialize}"), Group::External);
        assert_eq!(classify(""), Group::External);
        assert_eq!(leading_ident("  ::core::mem"), Some("core"));
        assert_eq!(leading_ident("*"), None);
    }

    #[test]
    fn classification_is_stable() {
        let registry: WorkspaceRegistry = ["app_core"].into_iter().collect();
        let classifier = Classifier::new(&registry);
        for path in ["app_core::x", "std::io", "rand::Rng", "nalgebra::Vector3"] {
            assert_eq!(classifier.classify(path), classifier.classify(path));
        }
    }

    #[test]
    fn groups_are_ordered() {
        assert!(Group::Utility < Group::External);
        assert!(Group::External < Group::Workspace);
        assert_eq!(Group::ALL[0] as u8, 1);
    }
}
