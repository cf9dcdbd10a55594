//! Versioned cache generations.
//!
//! The engine manages three logical caches, one per [`GenerationRole`]. Each
//! engine version owns one *generation* per role, named
//! `"{prefix}-{role}-{version}"`. Any cache name outside the current
//! [`GenerationNames`] is stale and removed at activation.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Logical role of a cache generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationRole {
    /// Precached shell and long-lived static assets.
    Static,
    /// Documents and generic responses.
    Dynamic,
    /// API responses.
    Runtime,
}

impl GenerationRole {
    /// All roles, in lookup order.
    pub const ALL: [GenerationRole; 3] = [
        GenerationRole::Static,
        GenerationRole::Dynamic,
        GenerationRole::Runtime,
    ];

    /// Role name as embedded in generation names.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationRole::Static => "static",
            GenerationRole::Dynamic => "dynamic",
            GenerationRole::Runtime => "runtime",
        }
    }
}

impl fmt::Display for GenerationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three current generation names of one engine version.
///
/// ```
/// use offbox_core::{GenerationNames, GenerationRole};
///
/// let names = GenerationNames::new("interbox", "v1.3.0");
/// assert_eq!(names.name(GenerationRole::Static), "interbox-static-v1.3.0");
/// assert!(names.is_current("interbox-runtime-v1.3.0"));
/// assert!(!names.is_current("interbox-runtime-v1.2.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationNames {
    version: SmolStr,
    names: [SmolStr; 3],
}

impl GenerationNames {
    /// Builds the generation names for `prefix` and `version`.
    pub fn new(prefix: &str, version: &str) -> Self {
        let name = |role: GenerationRole| SmolStr::from(format!("{prefix}-{role}-{version}"));
        Self {
            version: SmolStr::new(version),
            names: [
                name(GenerationRole::Static),
                name(GenerationRole::Dynamic),
                name(GenerationRole::Runtime),
            ],
        }
    }

    /// Version tag embedded in every name.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the current generation for `role`.
    pub fn name(&self, role: GenerationRole) -> &str {
        &self.names[Self::index(role)]
    }

    /// `(role, name)` pairs in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = (GenerationRole, &str)> {
        GenerationRole::ALL
            .into_iter()
            .map(move |role| (role, self.name(role)))
    }

    /// `true` when `name` is one of the three current generations.
    pub fn is_current(&self, name: &str) -> bool {
        self.role_of(name).is_some()
    }

    /// Role of a current generation name.
    pub fn role_of(&self, name: &str) -> Option<GenerationRole> {
        self.iter()
            .find(|(_, current)| *current == name)
            .map(|(role, _)| role)
    }

    fn index(role: GenerationRole) -> usize {
        match role {
            GenerationRole::Static => 0,
            GenerationRole::Dynamic => 1,
            GenerationRole::Runtime => 2,
        }
    }
}
