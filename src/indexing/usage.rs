//! Which functions take or return a given class.

use super::function::{FunctionEntity, flatten_free, flatten_methods};
use crate::registry::RegistrySnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    /// The class appears among the out-parameters.
    Returning,
    /// The class appears among the in-parameters.
    Using,
}

/// Free functions first, then methods and const methods of every class in
/// registration order.
pub fn find_usages<'r>(
    registry: &'r RegistrySnapshot,
    class_name: &str,
    kind: UsageKind,
) -> Vec<FunctionEntity<'r>> {
    let matches = |f: &FunctionEntity<'_>| match kind {
        UsageKind::Returning => f.function.uses_class_out(class_name),
        UsageKind::Using => f.function.uses_class_in(class_name),
    };

    let mut hits: Vec<FunctionEntity<'r>> = flatten_free(registry.functions())
        .into_iter()
        .filter(|f| matches(f))
        .collect();

    for class in registry.classes() {
        hits.extend(flatten_methods(class, false).into_iter().filter(|f| matches(f)));
        hits.extend(flatten_methods(class, true).into_iter().filter(|f| matches(f)));
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Function, OverloadGroup, ParamType, Parameter, RegisteredClass};

    fn registry() -> RegistrySnapshot {
        let mut make = Function::new("MakeGrid", "grid");
        make.params_out
            .push(Parameter::new("", ParamType::SmartPointer("Grid".into())));

        let mut refine = Function::new("Refine", "grid");
        refine
            .params_in
            .push(Parameter::new("g", ParamType::Pointer("Grid".into())));

        let mut domain = RegisteredClass::new("Domain");
        let mut grid_getter = Function::new("grid", "");
        grid_getter
            .params_out
            .push(Parameter::new("", ParamType::ConstPointer("Grid".into())));
        domain
            .const_methods
            .push(OverloadGroup::new("grid", vec![grid_getter]));

        RegistrySnapshot::new(
            vec![RegisteredClass::new("Grid"), domain],
            vec![],
            vec![
                OverloadGroup::new("MakeGrid", vec![make]),
                OverloadGroup::new("Refine", vec![refine]),
            ],
        )
    }

    #[test]
    fn test_returning() {
        let reg = registry();
        let hits = find_usages(&reg, "Grid", UsageKind::Returning);
        let names: Vec<_> = hits.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["MakeGrid", "grid"]);
        assert!(hits[1].is_const);
        assert_eq!(hits[1].owner.map(|c| c.name.as_str()), Some("Domain"));
    }

    #[test]
    fn test_using() {
        let reg = registry();
        let hits = find_usages(&reg, "Grid", UsageKind::Using);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "Refine");
        assert!(find_usages(&reg, "Nothing", UsageKind::Using).is_empty());
    }
}
