//! Class and class-group listings shared by every renderer.
//!
//! A [`ClassifiedEntry`] is either one standalone class or one class group,
//! so a templated family and a plain class can sit side by side in the same
//! list. [`ClassIndex`] builds the three canonical listings and
//! [`GroupBuckets`] partitions entries and free functions by registry group.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::function::{FunctionEntity, flatten_free};
use super::resolver::PluginPolicy;
use super::sort::sort_functions;
use crate::registry::RegistrySnapshot;
use crate::types::{ClassGroup, RegisteredClass};

/// Which class stands in for a class group that has no default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultClassFallback {
    /// Use the first member.
    #[default]
    FirstMember,
    /// Leave the group without a representative.
    None,
}

/// A class's membership in a class group.
#[derive(Debug, Clone, Copy)]
pub struct Membership<'r> {
    pub group: &'r ClassGroup,
    /// Discriminator of this specialization within the group.
    pub tag: &'r str,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassEntry<'r> {
    pub class: &'r RegisteredClass,
    pub membership: Option<Membership<'r>>,
}

impl<'r> ClassEntry<'r> {
    pub fn is_default_of_group(&self) -> bool {
        self.membership
            .is_some_and(|m| m.group.is_default(&self.class.name))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GroupMemberRef<'r> {
    pub class: &'r RegisteredClass,
    pub tag: &'r str,
    pub is_default: bool,
}

/// A class group with its members resolved against the registry.
#[derive(Debug, Clone)]
pub struct GroupEntry<'r> {
    pub group: &'r ClassGroup,
    /// Registered members in declaration order. Unregistered names are dropped.
    pub members: Vec<GroupMemberRef<'r>>,
    pub default: Option<&'r RegisteredClass>,
    /// Class shown for the group: the default, or the fallback choice.
    pub representative: Option<&'r RegisteredClass>,
}

impl<'r> GroupEntry<'r> {
    fn resolve(
        group: &'r ClassGroup,
        registry: &'r RegistrySnapshot,
        fallback: DefaultClassFallback,
    ) -> Self {
        let members: Vec<GroupMemberRef<'r>> = group
            .members
            .iter()
            .filter_map(|m| {
                registry.class(&m.class).map(|class| GroupMemberRef {
                    class,
                    tag: &m.tag,
                    is_default: group.is_default(&m.class),
                })
            })
            .collect();

        let default = members.iter().find(|m| m.is_default).map(|m| m.class);
        let representative = default.or(match fallback {
            DefaultClassFallback::FirstMember => members.first().map(|m| m.class),
            DefaultClassFallback::None => None,
        });

        Self {
            group,
            members,
            default,
            representative,
        }
    }

    /// Registry group of the default class, else of the first member.
    pub fn group_str(&self) -> &'r str {
        self.default
            .or_else(|| self.members.first().map(|m| m.class))
            .map(|c| c.group.as_str())
            .unwrap_or("")
    }
}

/// Uniform list item: one standalone class or one class group.
#[derive(Debug, Clone)]
pub enum ClassifiedEntry<'r> {
    Class(ClassEntry<'r>),
    Group(GroupEntry<'r>),
}

impl<'r> ClassifiedEntry<'r> {
    pub fn name(&self) -> &'r str {
        match self {
            ClassifiedEntry::Class(c) => &c.class.name,
            ClassifiedEntry::Group(g) => &g.group.name,
        }
    }

    /// Registry group used for bucketing and group-sorted listings.
    pub fn group_str(&self) -> &'r str {
        match self {
            ClassifiedEntry::Class(c) => &c.class.group,
            ClassifiedEntry::Group(g) => g.group_str(),
        }
    }

    /// The concrete class to document for this entry, if any.
    pub fn class(&self) -> Option<&'r RegisteredClass> {
        match self {
            ClassifiedEntry::Class(c) => Some(c.class),
            ClassifiedEntry::Group(g) => g.representative,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ClassifiedEntry::Group(_))
    }

    /// Class group this entry belongs to or represents.
    pub fn class_group(&self) -> Option<&'r ClassGroup> {
        match self {
            ClassifiedEntry::Class(c) => c.membership.map(|m| m.group),
            ClassifiedEntry::Group(g) => Some(g.group),
        }
    }

    pub fn tag(&self) -> &'r str {
        match self {
            ClassifiedEntry::Class(c) => c.membership.map(|m| m.tag).unwrap_or(""),
            ClassifiedEntry::Group(_) => "",
        }
    }
}

fn by_name(a: &ClassifiedEntry<'_>, b: &ClassifiedEntry<'_>) -> std::cmp::Ordering {
    a.name().cmp(b.name())
}

fn by_group_then_name(a: &ClassifiedEntry<'_>, b: &ClassifiedEntry<'_>) -> std::cmp::Ordering {
    a.group_str()
        .cmp(b.group_str())
        .then_with(|| a.name().cmp(b.name()))
}

/// The three canonical class listings.
#[derive(Debug)]
pub struct ClassIndex<'r> {
    classes: Vec<ClassEntry<'r>>,
    classes_and_groups: Vec<ClassifiedEntry<'r>>,
    classes_and_groups_and_implementations: Vec<ClassifiedEntry<'r>>,
    /// Key: class group name, Value: position in `classes_and_groups`
    group_positions: HashMap<&'r str, usize>,
}

impl<'r> ClassIndex<'r> {
    pub fn build(registry: &'r RegistrySnapshot, fallback: DefaultClassFallback) -> Self {
        // 1. every class, name-sorted
        let mut classes: Vec<ClassEntry<'r>> = registry
            .classes()
            .iter()
            .map(|class| ClassEntry {
                class,
                membership: None,
            })
            .collect();
        classes.sort_by(|a, b| a.class.name.cmp(&b.class.name));

        // 2. attach class groups via binary search over the sorted list
        for group in registry.class_groups() {
            for member in &group.members {
                let Some(pos) = lower_bound(&classes, &member.class) else {
                    tracing::debug!(
                        "[index] group '{}' member '{}' not registered",
                        group.name,
                        member.class
                    );
                    continue;
                };
                let entry = &mut classes[pos];
                match entry.membership {
                    None => {
                        entry.membership = Some(Membership {
                            group,
                            tag: &member.tag,
                        })
                    }
                    Some(existing) => tracing::debug!(
                        "[index] '{}' already attached to '{}', skipping '{}'",
                        member.class,
                        existing.group.name,
                        group.name
                    ),
                }
            }
        }

        let groups: Vec<GroupEntry<'r>> = registry
            .class_groups()
            .iter()
            .map(|g| GroupEntry::resolve(g, registry, fallback))
            .collect();

        // 3. every concrete class plus one entry per group
        let mut classes_and_groups_and_implementations: Vec<ClassifiedEntry<'r>> = classes
            .iter()
            .copied()
            .map(ClassifiedEntry::Class)
            .chain(groups.iter().cloned().map(ClassifiedEntry::Group))
            .collect();

        // 4. ungrouped classes plus one entry per group
        let mut classes_and_groups: Vec<ClassifiedEntry<'r>> = classes
            .iter()
            .filter(|c| c.membership.is_none())
            .copied()
            .map(ClassifiedEntry::Class)
            .chain(groups.into_iter().map(ClassifiedEntry::Group))
            .collect();

        // 5. both sorted by name; stable so ties keep classes before groups
        classes_and_groups.sort_by(by_name);
        classes_and_groups_and_implementations.sort_by(by_name);

        let mut group_positions = HashMap::new();
        for (i, entry) in classes_and_groups.iter().enumerate() {
            if entry.is_group() {
                group_positions.entry(entry.name()).or_insert(i);
            }
        }

        tracing::debug!(
            "[index] {} classes, {} classes and groups, {} with implementations",
            classes.len(),
            classes_and_groups.len(),
            classes_and_groups_and_implementations.len()
        );

        Self {
            classes,
            classes_and_groups,
            classes_and_groups_and_implementations,
            group_positions,
        }
    }

    /// All classes sorted by name, each knowing its class group.
    pub fn classes(&self) -> &[ClassEntry<'r>] {
        &self.classes
    }

    /// Standalone classes and class groups, sorted by name.
    pub fn classes_and_groups(&self) -> &[ClassifiedEntry<'r>] {
        &self.classes_and_groups
    }

    /// Same entries ordered by registry group, ties broken by name.
    pub fn classes_and_groups_by_group(&self) -> Vec<&ClassifiedEntry<'r>> {
        let mut sorted: Vec<_> = self.classes_and_groups.iter().collect();
        sorted.sort_by(|a, b| by_group_then_name(a, b));
        sorted
    }

    pub fn classes_and_groups_and_implementations(&self) -> &[ClassifiedEntry<'r>] {
        &self.classes_and_groups_and_implementations
    }

    /// Class-group entry by group name. The first group wins on duplicate names.
    pub fn find_group(&self, name: &str) -> Option<&ClassifiedEntry<'r>> {
        self.group_positions
            .get(name)
            .map(|&i| &self.classes_and_groups[i])
    }

    /// O(log n) lookup in the name-sorted class list.
    pub fn find_class(&self, name: &str) -> Option<&ClassEntry<'r>> {
        lower_bound(&self.classes, name).map(|i| &self.classes[i])
    }
}

/// Position of the first entry named `name`.
fn lower_bound(classes: &[ClassEntry<'_>], name: &str) -> Option<usize> {
    let pos = classes.partition_point(|c| c.class.name.as_str() < name);
    (pos < classes.len() && classes[pos].class.name == name).then_some(pos)
}

/// Entries and free functions sharing one registry group.
#[derive(Debug, Clone, Default)]
pub struct GroupBucket<'r> {
    pub classes_and_groups: Vec<ClassifiedEntry<'r>>,
    /// Sorted by name.
    pub functions: Vec<FunctionEntity<'r>>,
    pub is_plugin: bool,
}

/// Registry groups in ascending order. The empty string is the ungrouped bucket.
#[derive(Debug, Default)]
pub struct GroupBuckets<'r> {
    buckets: BTreeMap<String, GroupBucket<'r>>,
}

impl<'r> GroupBuckets<'r> {
    pub fn build(
        classes_and_groups: &[ClassifiedEntry<'r>],
        registry: &'r RegistrySnapshot,
        plugins: &PluginPolicy,
    ) -> Self {
        let mut buckets: BTreeMap<String, GroupBucket<'r>> = BTreeMap::new();

        for entry in classes_and_groups {
            let group = entry.group_str();
            tracing::trace!("[buckets] class: {} {}", group, entry.name());
            buckets
                .entry(group.to_string())
                .or_default()
                .classes_and_groups
                .push(entry.clone());
        }

        for function in flatten_free(registry.functions()) {
            tracing::trace!("[buckets] function: {} {}", function.group(), function.name());
            buckets
                .entry(function.group().to_string())
                .or_default()
                .functions
                .push(function);
        }

        for (group, bucket) in buckets.iter_mut() {
            bucket.functions = sort_functions(std::mem::take(&mut bucket.functions));
            bucket.is_plugin = plugins.is_plugin_group(group);
        }

        Self { buckets }
    }

    pub fn get(&self, group: &str) -> Option<&GroupBucket<'r>> {
        self.buckets.get(group)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupBucket<'r>)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Buckets whose group is not plugin-contributed.
    pub fn regular(&self) -> impl Iterator<Item = (&str, &GroupBucket<'r>)> {
        self.iter().filter(|(_, b)| !b.is_plugin)
    }

    pub fn plugins(&self) -> impl Iterator<Item = (&str, &GroupBucket<'r>)> {
        self.iter().filter(|(_, b)| b.is_plugin)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn function_count(&self) -> usize {
        self.buckets.values().map(|b| b.functions.len()).sum()
    }
}
