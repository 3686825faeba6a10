//! Group name resolution.
//!
//! This module handles:
//! - Mapping a raw class name to the class group (template family) it belongs to
//! - Relabeling plugin-origin registry groups under a synthetic namespace
//! - Tokenizing registry group paths into namespace segments

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::types::ClassGroup;

/// A class listed by more than one class group. The first mapping is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCollision {
    pub class: String,
    pub kept_group: String,
    pub ignored_group: String,
}

/// Maps class names to the display name of their class group.
#[derive(Debug, Default)]
pub struct GroupResolver {
    /// Key: class name, Value: class group name
    class_to_group: HashMap<String, String>,
    collisions: Vec<GroupCollision>,
}

impl GroupResolver {
    /// Build the lookup in one pass over all class groups.
    ///
    /// A class claimed by a second, different group is reported with a
    /// warning and otherwise ignored.
    pub fn build(groups: &[ClassGroup]) -> Self {
        tracing::debug!(
            "[resolver] initializing mapping for {} class groups",
            groups.len()
        );

        let mut resolver = Self::default();
        for group in groups {
            for member in &group.members {
                match resolver.class_to_group.entry(member.class.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(group.name.clone());
                    }
                    Entry::Occupied(existing) if existing.get() == &group.name => {}
                    Entry::Occupied(existing) => {
                        tracing::warn!(
                            "[resolver] class '{}' already mapped to group '{}', ignoring '{}'",
                            member.class,
                            existing.get(),
                            group.name
                        );
                        resolver.collisions.push(GroupCollision {
                            class: member.class.clone(),
                            kept_group: existing.get().clone(),
                            ignored_group: group.name.clone(),
                        });
                    }
                }
            }
        }
        resolver
    }

    /// Display name for `name`: its class group if it has one, otherwise the
    /// name itself. Never fails.
    pub fn resolve_group<'a>(&'a self, name: &'a str) -> &'a str {
        self.group_of(name).unwrap_or(name)
    }

    pub fn group_of(&self, name: &str) -> Option<&str> {
        self.class_to_group.get(name).map(String::as_str)
    }

    pub fn collisions(&self) -> &[GroupCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.class_to_group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.class_to_group.is_empty()
    }
}

/// Recognizes and relabels registry groups contributed by plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPolicy {
    prefix: String,
    namespace: String,
}

impl PluginPolicy {
    pub fn new(prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace: namespace.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A group is plugin-provided when any of its `/` segments carries the
    /// marker. Bucket classification, namespacing and file naming all use this.
    pub fn is_plugin_group(&self, group: &str) -> bool {
        group.split('/').any(|segment| self.strip_marker(segment).is_some())
    }

    /// The segment without every leading copy of the marker.
    fn strip_marker<'a>(&self, segment: &'a str) -> Option<&'a str> {
        if self.prefix.is_empty() || !segment.starts_with(self.prefix.as_str()) {
            return None;
        }
        Some(segment.trim_start_matches(self.prefix.as_str()))
    }

    fn stripped_segments<'a>(&self, group: &'a str) -> Vec<&'a str> {
        group
            .split('/')
            .map(|segment| self.strip_marker(segment).unwrap_or(segment))
            .collect()
    }

    /// Strip the plugin marker from every `/` segment and, if any segment
    /// carried it, thread the path through the plugin namespace.
    ///
    /// `"(Plugin) Foo/Bar"` becomes `"Plugins/Foo/Bar"`. Applying this to an
    /// already normalized path returns it unchanged.
    pub fn normalize(&self, group: &str) -> String {
        if !self.is_plugin_group(group) {
            return group.to_string();
        }

        let segments = self.stripped_segments(group);
        let path = segments.join("/");
        if segments.first() == Some(&self.namespace.as_str()) {
            path
        } else {
            format!("{}/{}", self.namespace, path)
        }
    }

    /// File name of the HTML page for a registry group.
    ///
    /// Plugin groups are filed under `plugin.` with their markers removed,
    /// path separators become dots.
    pub fn group_file_name(&self, group: &str) -> String {
        let base = if self.is_plugin_group(group) {
            format!("plugin.{}", self.stripped_segments(group).join("/"))
        } else {
            group.to_string()
        };
        format!("{}group.html", page_stem(&base.replace('/', ".")))
    }
}

impl Default for PluginPolicy {
    fn default() -> Self {
        Self::new("(Plugin) ", "Plugins")
    }
}

/// Make `name` safe as a single file name in the output directory.
///
/// Path separators become dots; other characters pass through.
pub fn page_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' => '.',
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Split a registry group path into namespace segments.
///
/// Both `_` and `/` delimit; runs of delimiters count as one split point and
/// no empty segment is produced.
pub fn split_path(group: &str) -> Vec<String> {
    group
        .split(['_', '/'])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<ClassGroup> {
        vec![
            ClassGroup::new("Vector")
                .with_member("CPUVector1", "alg=CPU1")
                .with_member("CPUVector3", "alg=CPU3")
                .with_default("CPUVector1"),
            ClassGroup::new("Solver").with_member("LU", ""),
        ]
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let resolver = GroupResolver::build(&groups());
        assert_eq!(resolver.resolve_group("CPUVector3"), "Vector");
        assert_eq!(resolver.resolve_group("LU"), "Solver");
        assert_eq!(resolver.resolve_group("NotRegistered"), "NotRegistered");
        assert_eq!(resolver.len(), 3);
        assert!(resolver.collisions().is_empty());
    }

    #[test]
    fn test_collision_keeps_first_mapping() {
        let mut g = groups();
        g.push(ClassGroup::new("OtherVector").with_member("CPUVector1", ""));
        let resolver = GroupResolver::build(&g);

        assert_eq!(resolver.collisions().len(), 1);
        let collision = &resolver.collisions()[0];
        assert_eq!(collision.class, "CPUVector1");
        assert_eq!(collision.kept_group, "Vector");
        assert_eq!(resolver.resolve_group("CPUVector1"), "Vector");
    }

    #[test]
    fn test_same_group_listed_twice_is_not_a_collision() {
        let g = vec![ClassGroup::new("G").with_member("A", "1").with_member("A", "2")];
        let resolver = GroupResolver::build(&g);
        assert!(resolver.collisions().is_empty());
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("ug4/Grid_Refinement"), ["ug4", "Grid", "Refinement"]);
        assert_eq!(split_path("a//b__c/_d"), ["a", "b", "c", "d"]);
        assert_eq!(split_path("/lead"), ["lead"]);
        assert!(split_path("").is_empty());
        assert!(split_path("_/").is_empty());
    }

    #[test]
    fn test_plugin_normalization() {
        let policy = PluginPolicy::default();
        assert!(policy.is_plugin_group("(Plugin) Electrostatics"));
        assert!(!policy.is_plugin_group("ug4/Grid"));

        let once = policy.normalize("(Plugin) Electrostatics/Solver");
        assert_eq!(once, "Plugins/Electrostatics/Solver");
        assert_eq!(policy.normalize(&once), once);

        assert_eq!(policy.normalize("ug4/Grid"), "ug4/Grid");
        assert_eq!(policy.normalize("ug4/(Plugin) Foo"), "Plugins/ug4/Foo");
    }

    #[test]
    fn test_repeated_marker_normalizes_once() {
        let policy = PluginPolicy::default();
        let once = policy.normalize("(Plugin) (Plugin) Foo");
        assert_eq!(once, "Plugins/Foo");
        assert_eq!(policy.normalize(&once), once);

        let nested = policy.normalize("Plugins/(Plugin) (Plugin) Bar");
        assert_eq!(nested, "Plugins/Bar");
        assert_eq!(policy.normalize(&nested), nested);
    }

    #[test]
    fn test_plugin_rules_agree() {
        let policy = PluginPolicy::default();
        for group in [
            "(Plugin) Electrostatics",
            "ug4/(Plugin) Foo",
            "(Plugin) (Plugin) Heat/Solver",
            "ug4/Grid",
            "",
        ] {
            let plugin = policy.is_plugin_group(group);
            assert_eq!(policy.normalize(group) != group, plugin, "{group}");
            assert_eq!(
                policy.group_file_name(group).starts_with("plugin."),
                plugin,
                "{group}"
            );
            assert!(!policy.group_file_name(group).contains(policy.prefix()));
        }
        assert!(policy.is_plugin_group("ug4/(Plugin) Foo"));
        assert_eq!(policy.group_file_name("ug4/(Plugin) Foo"), "plugin.ug4.Foogroup.html");
    }

    #[test]
    fn test_page_stem() {
        assert_eq!(page_stem("Grid"), "Grid");
        assert_eq!(page_stem("A/B"), "A.B");
        assert_eq!(page_stem("a\\b:c"), "a.b_c");
    }

    #[test]
    fn test_group_file_name() {
        let policy = PluginPolicy::default();
        assert_eq!(policy.group_file_name("ug4/Grid"), "ug4.Gridgroup.html");
        assert_eq!(
            policy.group_file_name("(Plugin) Heat/Solver"),
            "plugin.Heat.Solvergroup.html"
        );
        assert_eq!(policy.group_file_name(""), "group.html");
    }
}
