//! Read-only snapshot of the host binding registry.
//!
//! The host framework exports its registry once per run as a JSON document.
//! Everything downstream borrows from the [`RegistrySnapshot`]; nothing
//! mutates it after loading.

pub mod error;

pub use error::{RegistryError, RegistryResult};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::{ClassGroup, OverloadGroup, RegisteredClass};

/// Snapshot schema version understood by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Anything that can produce a registry snapshot.
pub trait RegistrySource {
    fn load(&self) -> RegistryResult<RegistrySnapshot>;

    /// Human readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// Snapshot stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RegistrySource for JsonFileSource {
    fn load(&self) -> RegistryResult<RegistrySnapshot> {
        RegistrySnapshot::load(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    classes: Vec<RegisteredClass>,
    #[serde(default)]
    class_groups: Vec<ClassGroup>,
    /// Free functions, one entry per overload group.
    #[serde(default)]
    functions: Vec<OverloadGroup>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl RegistrySnapshot {
    pub fn new(
        classes: Vec<RegisteredClass>,
        class_groups: Vec<ClassGroup>,
        functions: Vec<OverloadGroup>,
    ) -> Self {
        let mut snapshot = Self {
            version: SNAPSHOT_VERSION,
            classes,
            class_groups,
            functions,
            by_name: HashMap::new(),
        };
        snapshot.normalize();
        snapshot
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RegistryError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json_str(&content).map_err(|e| match e {
            RegistryError::Parse { source, .. } => RegistryError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        tracing::info!(
            "[registry] loaded {}: {} classes, {} class groups, {} functions",
            path.display(),
            snapshot.classes.len(),
            snapshot.class_groups.len(),
            snapshot.functions.len()
        );
        Ok(snapshot)
    }

    pub fn from_json_str(content: &str) -> RegistryResult<Self> {
        let mut snapshot: Self =
            serde_json::from_str(content).map_err(|source| RegistryError::Parse {
                path: PathBuf::from("<memory>"),
                source,
            })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        snapshot.normalize();
        Ok(snapshot)
    }

    pub fn classes(&self) -> &[RegisteredClass] {
        &self.classes
    }

    pub fn class_groups(&self) -> &[ClassGroup] {
        &self.class_groups
    }

    pub fn functions(&self) -> &[OverloadGroup] {
        &self.functions
    }

    /// Point lookup by class name. With duplicate names the first registered
    /// class is returned.
    pub fn class(&self, name: &str) -> Option<&RegisteredClass> {
        self.by_name.get(name).map(|&i| &self.classes[i])
    }

    /// Total number of free-function signatures across all overload groups.
    pub fn num_function_overloads(&self) -> usize {
        self.functions.iter().map(|g| g.overloads.len()).sum()
    }

    /// Fill inherited overload names, rebuild the name index and report
    /// data-quality anomalies. Never fails.
    fn normalize(&mut self) {
        let inherit_names = |groups: &mut Vec<OverloadGroup>| {
            for group in groups.iter_mut() {
                for overload in group.overloads.iter_mut() {
                    if overload.name.is_empty() {
                        overload.name = group.name.clone();
                    }
                }
            }
        };
        inherit_names(&mut self.functions);
        for class in self.classes.iter_mut() {
            inherit_names(&mut class.methods);
            inherit_names(&mut class.const_methods);
        }

        self.by_name.clear();
        for (i, class) in self.classes.iter().enumerate() {
            if self.by_name.contains_key(&class.name) {
                tracing::warn!("[registry] duplicate class name '{}'", class.name);
                continue;
            }
            self.by_name.insert(class.name.clone(), i);
        }

        for group in &self.class_groups {
            if group.members.is_empty() {
                tracing::warn!("[registry] class group '{}' has no classes", group.name);
            }
            if let Some(default) = &group.default {
                if !group.members.iter().any(|m| &m.class == default) {
                    tracing::warn!(
                        "[registry] default class '{}' of group '{}' is not a member",
                        default,
                        group.name
                    );
                }
            }
            for member in &group.members {
                if !self.by_name.contains_key(&member.class) {
                    tracing::warn!(
                        "[registry] group '{}' lists unregistered class '{}'",
                        group.name,
                        member.class
                    );
                }
            }
        }
    }
}
