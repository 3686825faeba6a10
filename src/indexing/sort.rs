//! Deterministic ordering and display deduplication of overloads.
//!
//! All comparisons are byte-wise and case-sensitive, matching the ordering
//! used for class and group names.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

use super::function::FunctionEntity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionOrder {
    Name,
    GroupThenName,
}

/// Stable sort by name. Overloads sharing a name keep registration order.
pub fn sort_functions<'r>(mut fns: Vec<FunctionEntity<'r>>) -> Vec<FunctionEntity<'r>> {
    fns.sort_by(|a, b| a.name().cmp(b.name()));
    fns
}

/// Stable sort by registry group, then name.
pub fn sort_by_group_then_name<'r>(mut fns: Vec<FunctionEntity<'r>>) -> Vec<FunctionEntity<'r>> {
    fns.sort_by(|a, b| a.group().cmp(b.group()).then_with(|| a.name().cmp(b.name())));
    fns
}

pub fn sort_by<'r>(fns: Vec<FunctionEntity<'r>>, order: FunctionOrder) -> Vec<FunctionEntity<'r>> {
    match order {
        FunctionOrder::Name => sort_functions(fns),
        FunctionOrder::GroupThenName => sort_by_group_then_name(fns),
    }
}

/// Drop repeated rendered entries, keeping each one at its first position.
///
/// Equality is on the rendered value, not on the entity it came from: two
/// distinct overloads that render identically collapse into one row.
pub fn dedupe_rendered<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Hash + Eq,
{
    items.into_iter().collect::<IndexSet<T>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::function::flatten_free;
    use crate::types::{Function, OverloadGroup};

    fn groups() -> Vec<OverloadGroup> {
        vec![
            OverloadGroup::new("print", vec![Function::new("print", "util")]),
            OverloadGroup::new(
                "Add",
                vec![Function::new("Add", "math"), Function::new("Add", "math")],
            ),
            OverloadGroup::new("Zero", vec![Function::new("Zero", "algebra")]),
        ]
    }

    #[test]
    fn test_sort_by_name_is_case_sensitive() {
        let g = groups();
        let sorted = sort_functions(flatten_free(&g));
        let names: Vec<_> = sorted.iter().map(|f| f.name()).collect();
        // Uppercase sorts before lowercase
        assert_eq!(names, ["Add", "Add", "Zero", "print"]);
        // Equal names keep registration order
        assert_eq!(sorted[0].ordinal, 0);
        assert_eq!(sorted[1].ordinal, 1);
    }

    #[test]
    fn test_sort_by_group_then_name() {
        let g = groups();
        let sorted = sort_by_group_then_name(flatten_free(&g));
        let keys: Vec<_> = sorted.iter().map(|f| (f.group(), f.name())).collect();
        assert_eq!(
            keys,
            [("algebra", "Zero"), ("math", "Add"), ("math", "Add"), ("util", "print")]
        );
    }

    #[test]
    fn test_sort_is_idempotent() {
        let g = groups();
        let once = sort_by(flatten_free(&g), FunctionOrder::GroupThenName);
        let names_once: Vec<_> = once.iter().map(|f| (f.name(), f.ordinal)).collect();
        let twice = sort_by(once, FunctionOrder::GroupThenName);
        let names_twice: Vec<_> = twice.iter().map(|f| (f.name(), f.ordinal)).collect();
        assert_eq!(names_once, names_twice);
    }

    #[test]
    fn test_dedupe_keeps_first_position() {
        let rows = vec!["b", "a", "b", "c", "a"];
        assert_eq!(dedupe_rendered(rows), ["b", "a", "c"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let rows: Vec<String> = ["x", "y", "x", "x", "z", "y"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let once = dedupe_rendered(rows.clone());
        assert_eq!(dedupe_rendered(once.clone()), once);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_distinct_overloads_rendering_alike_collapse() {
        // Two undocumented overloads of `Add` produce the same text
        let g = groups();
        let rendered: Vec<String> = flatten_free(&g)
            .iter()
            .map(|f| format!("{} {}", f.group(), f.name()))
            .collect();
        assert_eq!(rendered.len(), 4);
        assert_eq!(dedupe_rendered(rendered).len(), 3);
    }
}
