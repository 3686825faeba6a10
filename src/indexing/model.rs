//! The indexed model of one generation run.
//!
//! [`DocModel`] is built once from a registry snapshot and handed to every
//! renderer by reference. It owns the derived listings and borrows all
//! entities from the snapshot.

use super::classify::{ClassEntry, ClassIndex, ClassifiedEntry, GroupBuckets};
use super::function::{FunctionEntity, flatten_free};
use super::hierarchy::ClassHierarchyNode;
use super::resolver::{GroupResolver, PluginPolicy};
use super::sort::{FunctionOrder, sort_by};
use super::usage::{UsageKind, find_usages};
use super::IndexOptions;
use crate::registry::RegistrySnapshot;

pub struct DocModel<'r> {
    registry: &'r RegistrySnapshot,
    options: IndexOptions,
    plugins: PluginPolicy,
    resolver: GroupResolver,
    index: ClassIndex<'r>,
    buckets: GroupBuckets<'r>,
    hierarchy: ClassHierarchyNode,
}

impl<'r> DocModel<'r> {
    pub fn build(registry: &'r RegistrySnapshot, options: IndexOptions) -> Self {
        let plugins = PluginPolicy::new(&options.plugin_prefix, &options.plugin_namespace);
        let resolver = GroupResolver::build(registry.class_groups());
        let index = ClassIndex::build(registry, options.default_class_fallback);
        let buckets = GroupBuckets::build(index.classes_and_groups(), registry, &plugins);
        let hierarchy = ClassHierarchyNode::build(&options.hierarchy_root, registry.classes());

        tracing::info!(
            "[model] indexed {} classes, {} class groups, {} registry groups",
            index.classes().len(),
            registry.class_groups().len(),
            buckets.len()
        );

        Self {
            registry,
            options,
            plugins,
            resolver,
            index,
            buckets,
            hierarchy,
        }
    }

    pub fn registry(&self) -> &'r RegistrySnapshot {
        self.registry
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    pub fn plugins(&self) -> &PluginPolicy {
        &self.plugins
    }

    pub fn resolver(&self) -> &GroupResolver {
        &self.resolver
    }

    /// All classes, name-sorted, each with its class-group membership.
    pub fn all_classes(&self) -> &[ClassEntry<'r>] {
        self.index.classes()
    }

    pub fn class_entry(&self, name: &str) -> Option<&ClassEntry<'r>> {
        self.index.find_class(name)
    }

    /// Standalone classes and class groups, by name or by registry group.
    pub fn classes_and_groups(&self, group_sorted: bool) -> Vec<&ClassifiedEntry<'r>> {
        if group_sorted {
            self.index.classes_and_groups_by_group()
        } else {
            self.index.classes_and_groups().iter().collect()
        }
    }

    pub fn classes_and_groups_and_implementations(&self) -> &[ClassifiedEntry<'r>] {
        self.index.classes_and_groups_and_implementations()
    }

    pub fn group_buckets(&self) -> &GroupBuckets<'r> {
        &self.buckets
    }

    /// Class-group display name for a class name, or the name itself.
    pub fn resolve_group<'a>(&'a self, name: &'a str) -> &'a str {
        self.resolver.resolve_group(name)
    }

    /// Name of the class documenting `name`'s class group: the group default
    /// (or fallback member) when `name` belongs to a group, else `name`.
    ///
    /// Also accepts a class-group name directly.
    pub fn resolve_default_class_name<'a>(&'a self, name: &'a str) -> &'a str {
        let group = match self.index.find_class(name) {
            Some(entry) => entry.membership.map(|m| m.group.name.as_str()),
            None => Some(name),
        };
        group
            .and_then(|g| self.group_entry(g))
            .and_then(ClassifiedEntry::class)
            .map(|c| c.name.as_str())
            .unwrap_or(name)
    }

    /// Class-group entry by group name.
    pub fn group_entry(&self, group_name: &str) -> Option<&ClassifiedEntry<'r>> {
        self.index.find_group(group_name)
    }

    pub fn hierarchy(&self) -> &ClassHierarchyNode {
        &self.hierarchy
    }

    /// Every free-function signature in the requested order.
    pub fn sorted_functions(&self, by: FunctionOrder) -> Vec<FunctionEntity<'r>> {
        sort_by(flatten_free(self.registry.functions()), by)
    }

    pub fn functions_returning(&self, class_name: &str) -> Vec<FunctionEntity<'r>> {
        find_usages(self.registry, class_name, UsageKind::Returning)
    }

    pub fn functions_using(&self, class_name: &str) -> Vec<FunctionEntity<'r>> {
        find_usages(self.registry, class_name, UsageKind::Using)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassGroup, RegisteredClass};

    fn shapes() -> RegistrySnapshot {
        RegistrySnapshot::new(
            vec![
                RegisteredClass::new("Base"),
                RegisteredClass::new("Derived").with_ancestors(["Derived", "Base"]),
            ],
            vec![ClassGroup::new("Shapes")
                .with_member("Derived", "")
                .with_default("Derived")],
            vec![],
        )
    }

    #[test]
    fn test_shapes_scenario() {
        let reg = shapes();
        let model = DocModel::build(&reg, IndexOptions::default());

        let names: Vec<_> = model
            .classes_and_groups(false)
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(names, ["Base", "Shapes"]);
        assert_eq!(model.resolve_group("Derived"), "Shapes");
        assert_eq!(model.resolve_group("Base"), "Base");

        let base = model.hierarchy().find("Base").unwrap();
        let children: Vec<_> = base.children().map(|c| c.name.as_str()).collect();
        assert_eq!(children, ["Derived"]);
    }

    #[test]
    fn test_resolve_default_class_name() {
        let reg = RegistrySnapshot::new(
            vec![
                RegisteredClass::new("V1"),
                RegisteredClass::new("V2"),
                RegisteredClass::new("Lone"),
            ],
            vec![ClassGroup::new("Vector")
                .with_member("V1", "1")
                .with_member("V2", "2")
                .with_default("V2")],
            vec![],
        );
        let model = DocModel::build(&reg, IndexOptions::default());
        assert_eq!(model.resolve_default_class_name("V1"), "V2");
        assert_eq!(model.resolve_default_class_name("Vector"), "V2");
        assert_eq!(model.resolve_default_class_name("Lone"), "Lone");
        assert_eq!(model.resolve_default_class_name("Unknown"), "Unknown");
    }
}
