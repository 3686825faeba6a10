//! Registry traversal, grouping and indexing.
//!
//! Turns a flat registry snapshot into the ordered, cross-referenced
//! [`DocModel`] that every output format renders from.

pub mod classify;
pub mod function;
pub mod hierarchy;
pub mod model;
pub mod resolver;
pub mod signature;
pub mod sort;
pub mod usage;

pub use classify::{
    ClassEntry, ClassIndex, ClassifiedEntry, DefaultClassFallback, GroupBucket, GroupBuckets,
    GroupEntry, GroupMemberRef, Membership,
};
pub use function::FunctionEntity;
pub use hierarchy::ClassHierarchyNode;
pub use model::DocModel;
pub use resolver::{GroupCollision, GroupResolver, PluginPolicy, split_path};
pub use sort::{FunctionOrder, dedupe_rendered, sort_by_group_then_name, sort_functions};

use serde::{Deserialize, Serialize};

/// Knobs that differ between registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOptions {
    /// Marker at the start of plugin-contributed registry groups
    #[serde(default = "default_plugin_prefix")]
    pub plugin_prefix: String,

    /// Namespace plugin groups are moved under
    #[serde(default = "default_plugin_namespace")]
    pub plugin_namespace: String,

    /// Name of the synthetic root of the class hierarchy
    #[serde(default = "default_hierarchy_root")]
    pub hierarchy_root: String,

    /// Representative class for class groups without a default
    #[serde(default)]
    pub default_class_fallback: DefaultClassFallback,
}

fn default_plugin_prefix() -> String {
    "(Plugin) ".to_string()
}
fn default_plugin_namespace() -> String {
    "Plugins".to_string()
}
fn default_hierarchy_root() -> String {
    "Registry".to_string()
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            plugin_prefix: default_plugin_prefix(),
            plugin_namespace: default_plugin_namespace(),
            hierarchy_root: default_hierarchy_root(),
            default_class_fallback: DefaultClassFallback::default(),
        }
    }
}
