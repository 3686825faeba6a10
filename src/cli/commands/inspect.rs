//! Inspect command - print the computed index without writing files.

use std::fmt::Write as _;
use std::path::Path;

use serde_json::{Value, json};

use crate::config::Settings;
use crate::indexing::{ClassHierarchyNode, ClassifiedEntry, DocModel};
use crate::io::{ExitCode, OutputFormat};
use crate::registry::RegistrySnapshot;

/// Run the inspect command.
pub fn run(registry: &Path, by_group: bool, format: OutputFormat, settings: &Settings) -> ExitCode {
    let snapshot = match RegistrySnapshot::load(registry) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error: {e}");
            return e.exit_code();
        }
    };
    let model = DocModel::build(&snapshot, settings.index.clone());

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&json_report(&model, by_group)) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::GeneralError;
            }
        },
        OutputFormat::Text => print!("{}", text_report(&model, by_group)),
    }
    ExitCode::Success
}

fn entry_json(entry: &ClassifiedEntry<'_>) -> Value {
    match entry {
        ClassifiedEntry::Class(c) => json!({
            "kind": "class",
            "name": c.class.name,
            "group": c.class.group,
            "class_group": c.membership.map(|m| m.group.name.as_str()),
            "tag": c.membership.map(|m| m.tag),
        }),
        ClassifiedEntry::Group(g) => json!({
            "kind": "class_group",
            "name": g.group.name,
            "group": g.group_str(),
            "default": g.default.map(|c| c.name.as_str()),
            "members": g.members.iter().map(|m| json!({
                "class": m.class.name,
                "tag": m.tag,
                "is_default": m.is_default,
            })).collect::<Vec<_>>(),
        }),
    }
}

/// Machine readable view of the model.
pub fn json_report(model: &DocModel<'_>, by_group: bool) -> Value {
    let entries: Vec<Value> = model
        .classes_and_groups(by_group)
        .into_iter()
        .map(entry_json)
        .collect();
    let buckets: Vec<Value> = model
        .group_buckets()
        .iter()
        .map(|(group, bucket)| {
            json!({
                "group": group,
                "plugin": bucket.is_plugin,
                "entries": bucket.classes_and_groups.iter().map(|e| e.name()).collect::<Vec<_>>(),
                "functions": bucket.functions.iter().map(|f| f.name()).collect::<Vec<_>>(),
            })
        })
        .collect();
    let collisions: Vec<Value> = model
        .resolver()
        .collisions()
        .iter()
        .map(|c| {
            json!({
                "class": c.class,
                "kept_group": c.kept_group,
                "ignored_group": c.ignored_group,
            })
        })
        .collect();

    json!({
        "classes": model.registry().classes().len(),
        "class_groups": model.registry().class_groups().len(),
        "functions": model.registry().num_function_overloads(),
        "entries": entries,
        "buckets": buckets,
        "collisions": collisions,
        "hierarchy": model.hierarchy(),
    })
}

/// Human readable view of the model.
pub fn text_report(model: &DocModel<'_>, by_group: bool) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, model, by_group);
    out
}

fn write_text(out: &mut String, model: &DocModel<'_>, by_group: bool) -> std::fmt::Result {
    let registry = model.registry();
    writeln!(
        out,
        "{} classes, {} class groups, {} functions",
        registry.classes().len(),
        registry.class_groups().len(),
        registry.num_function_overloads()
    )?;

    writeln!(out, "\nEntries:")?;
    for entry in model.classes_and_groups(by_group) {
        match entry {
            ClassifiedEntry::Class(c) => {
                writeln!(out, "  {:<32} [{}]", c.class.name, c.class.group)?;
            }
            ClassifiedEntry::Group(g) => {
                writeln!(out, "  {:<32} [{}] (class group)", g.group.name, g.group_str())?;
                for m in &g.members {
                    let marker = if m.is_default { " (default)" } else { "" };
                    writeln!(out, "    <{}> {}{marker}", m.tag, m.class.name)?;
                }
            }
        }
    }

    writeln!(out, "\nGroups:")?;
    for (group, bucket) in model.group_buckets().iter() {
        let label = if group.is_empty() { "(ungrouped)" } else { group };
        let plugin = if bucket.is_plugin { " plugin" } else { "" };
        writeln!(
            out,
            "  {label:<32} {} entries, {} functions{plugin}",
            bucket.classes_and_groups.len(),
            bucket.functions.len()
        )?;
    }

    let collisions = model.resolver().collisions();
    if !collisions.is_empty() {
        writeln!(out, "\nCollisions:")?;
        for c in collisions {
            writeln!(
                out,
                "  {} kept in '{}', ignored in '{}'",
                c.class, c.kept_group, c.ignored_group
            )?;
        }
    }

    writeln!(out, "\nHierarchy:")?;
    write_tree(out, model.hierarchy(), 1)
}

fn write_tree(out: &mut String, node: &ClassHierarchyNode, depth: usize) -> std::fmt::Result {
    let marker = if node.is_group { " *" } else { "" };
    writeln!(out, "{}{}{marker}", "  ".repeat(depth), node.name)?;
    for child in node.children() {
        write_tree(out, child, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::IndexOptions;
    use crate::types::{ClassGroup, RegisteredClass};

    fn snapshot() -> RegistrySnapshot {
        RegistrySnapshot::new(
            vec![
                RegisteredClass::new("Shape").with_group("Geo"),
                RegisteredClass::new("Circle")
                    .with_group("Geo")
                    .with_ancestors(["Circle", "Shape"]),
                RegisteredClass::new("IntVec").with_group("Math"),
                RegisteredClass::new("FloatVec").with_group("Math"),
            ],
            vec![
                ClassGroup::new("Vec")
                    .with_member("IntVec", "int")
                    .with_member("FloatVec", "float")
                    .with_default("FloatVec"),
            ],
            vec![],
        )
    }

    #[test]
    fn test_json_report_shape() {
        let snapshot = snapshot();
        let model = DocModel::build(&snapshot, IndexOptions::default());
        let report = json_report(&model, false);

        assert_eq!(report["classes"], 4);
        assert_eq!(report["class_groups"], 1);
        let names: Vec<&str> = report["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Circle", "Shape", "Vec"]);
        assert_eq!(report["entries"][2]["default"], "FloatVec");
        assert_eq!(report["entries"][2]["group"], "Math");
        assert!(report["collisions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_text_report_lists_tree() {
        let snapshot = snapshot();
        let model = DocModel::build(&snapshot, IndexOptions::default());
        let text = text_report(&model, true);

        assert!(text.contains("4 classes, 1 class groups, 0 functions"));
        assert!(text.contains("<float> FloatVec (default)"));
        assert!(text.contains("    Shape\n      Circle\n"));
    }
}
