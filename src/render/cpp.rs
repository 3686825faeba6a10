//! Compilable C++ stubs for an external documentation extractor.
//!
//! The stubs declare every registered class and function with its doc
//! comments so the extractor can cross-link them. Bodies are never emitted.
//!
//! Files:
//! - `<group_id>.cpp` for every class group, holding all of its members
//! - `<class_id>.cpp` for every class not written as part of a group
//! - `global_functions.cpp` for the free functions

use std::collections::HashSet;
use std::fmt::{self, Write};
use std::path::Path;

use super::{RenderReport, RenderResult, Renderer, write_output};
use crate::indexing::signature::{Unnamed, parameter_list, return_type};
use crate::indexing::{ClassifiedEntry, DocModel, split_path};
use crate::types::{Function, Parameter, RegisteredClass, Returns};

pub const GLOBAL_FUNCTIONS_FILE: &str = "global_functions.cpp";

const UNNAMED_PARAMETER: &str = "unnamed";
const UNDOCUMENTED: &str = "undocumented";

/// File and doxygen identifier for a class or group name: trimmed, spaces
/// removed, `/` replaced by `_`, lowercased.
pub fn name_to_id(name: &str) -> String {
    name.trim()
        .replace(' ', "")
        .replace('/', "_")
        .to_lowercase()
}

pub struct CppStubRenderer {
    root_namespace: String,
}

impl CppStubRenderer {
    pub fn new(root_namespace: impl Into<String>) -> Self {
        Self {
            root_namespace: root_namespace.into(),
        }
    }

    /// Namespace path for a registry group, root namespace first.
    fn namespaces(&self, model: &DocModel<'_>, group: &str) -> Vec<String> {
        let normalized = model.plugins().normalize(group);
        let mut path: Vec<String> = Vec::new();
        if !self.root_namespace.is_empty() {
            path.push(self.root_namespace.clone());
        }
        path.extend(
            split_path(&name_to_id(&normalized))
                .into_iter()
                .filter(|segment| *segment != self.root_namespace),
        );
        path
    }

    fn class_group_file(
        &self,
        model: &DocModel<'_>,
        entry: &ClassifiedEntry<'_>,
        written: &mut HashSet<String>,
    ) -> Result<Option<(String, String)>, fmt::Error> {
        let ClassifiedEntry::Group(group) = entry else {
            return Ok(None);
        };
        let group_name = &group.group.name;
        let group_id = name_to_id(group_name);
        if group_id.is_empty() {
            tracing::warn!("[cpp] empty id for class group '{group_name}', skipping");
            return Ok(None);
        }

        let mut out = String::new();
        let namespaces = match group.representative {
            Some(class) => self.namespaces(model, &class.group),
            None => self.namespaces(model, ""),
        };
        open_namespaces(&mut out, &namespaces)?;

        writeln!(out, "/// \\defgroup {group_id} {group_name}")?;
        if let Some(default) = group.default {
            writeln!(out, "/// default class is {}", default.name)?;
        }
        writeln!(out, "/// \\{{")?;
        for member in &group.members {
            write_class(&mut out, member.class)?;
            written.insert(member.class.name.clone());
        }
        writeln!(out, "/// \\}}")?;

        close_namespaces(&mut out, &namespaces)?;
        Ok(Some((format!("{group_id}.cpp"), out)))
    }

    fn class_file(&self, model: &DocModel<'_>, class: &RegisteredClass) -> Result<String, fmt::Error> {
        let mut out = String::new();
        let namespaces = self.namespaces(model, &class.group);
        open_namespaces(&mut out, &namespaces)?;
        write_class(&mut out, class)?;
        close_namespaces(&mut out, &namespaces)?;
        Ok(out)
    }

    fn global_functions_file(&self, model: &DocModel<'_>) -> Result<String, fmt::Error> {
        let mut out = String::new();
        let namespaces = self.namespaces(model, "");
        open_namespaces(&mut out, &namespaces)?;
        for overloads in model.registry().functions() {
            for function in &overloads.overloads {
                write_function(&mut out, function)?;
                writeln!(out, ";\n")?;
            }
        }
        close_namespaces(&mut out, &namespaces)?;
        Ok(out)
    }
}

impl Renderer for CppStubRenderer {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn render(&self, model: &DocModel<'_>, out_dir: &Path) -> RenderResult<RenderReport> {
        let mut report = RenderReport::default();
        let mut written: HashSet<String> = HashSet::new();

        let entries = model.classes_and_groups(false);
        tracing::info!(
            "[cpp] generating files for {} class groups",
            model.registry().class_groups().len()
        );
        for entry in &entries {
            if let Some((file, contents)) = self.class_group_file(model, entry, &mut written)? {
                tracing::debug!("[cpp] writing group '{}' to {file}", entry.name());
                write_output(out_dir, &file, &contents, &mut report)?;
            }
        }

        let mut ungrouped = 0usize;
        for class in model.registry().classes() {
            if written.contains(&class.name) {
                continue;
            }
            let id = name_to_id(&class.name);
            if id.is_empty() {
                tracing::warn!("[cpp] empty id for class '{}', skipping", class.name);
                continue;
            }
            let contents = self.class_file(model, class)?;
            write_output(out_dir, &format!("{id}.cpp"), &contents, &mut report)?;
            written.insert(class.name.clone());
            ungrouped += 1;
        }
        tracing::info!("[cpp] {ungrouped} additional classes written");

        tracing::info!(
            "[cpp] writing {} global functions",
            model.registry().num_function_overloads()
        );
        write_output(
            out_dir,
            GLOBAL_FUNCTIONS_FILE,
            &self.global_functions_file(model)?,
            &mut report,
        )?;

        Ok(report)
    }
}

fn open_namespaces(out: &mut String, namespaces: &[String]) -> fmt::Result {
    for namespace in namespaces {
        writeln!(out, "namespace {namespace} {{")?;
    }
    Ok(())
}

fn close_namespaces(out: &mut String, namespaces: &[String]) -> fmt::Result {
    for _ in namespaces {
        writeln!(out, "}}")?;
    }
    Ok(())
}

fn sanitize_parameter_name(name: &str) -> String {
    match name.trim() {
        "" => UNNAMED_PARAMETER.to_string(),
        trimmed => trimmed.replace(' ', "_"),
    }
}

fn stub_parameter_list(params: &[Parameter]) -> String {
    parameter_list(params, Unnamed::Placeholder(UNNAMED_PARAMETER), |p| p.to_string())
}

fn write_brief_and_details(out: &mut String, tooltip: &str, help: &str) -> fmt::Result {
    writeln!(out, "/// \\brief {}", one_line(tooltip))?;
    writeln!(out, "/// \\details {}", one_line(help))
}

fn write_parameter_docs(out: &mut String, params: &[Parameter]) -> fmt::Result {
    for param in params {
        writeln!(out, "/// \\param[in] {}", sanitize_parameter_name(&param.name))?;
    }
    Ok(())
}

/// Doc block and signature, without the terminating `;`.
fn write_function(out: &mut String, function: &Function) -> fmt::Result {
    write_brief_and_details(out, &function.tooltip, &function.help)?;
    write_parameter_docs(out, &function.params_in)?;
    if let Returns::Single(_) = function.returns() {
        let info = if function.return_name.is_empty() {
            UNDOCUMENTED
        } else {
            function.return_name.as_str()
        };
        writeln!(out, "/// \\returns {}", one_line(info))?;
    }
    write!(
        out,
        "{} {}{}",
        return_type(function),
        function.name,
        stub_parameter_list(&function.params_in)
    )
}

fn write_class(out: &mut String, class: &RegisteredClass) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "/// \\class {}", class.name)?;
    if !class.tooltip.is_empty() {
        writeln!(out, "/// \\brief {}", one_line(&class.tooltip))?;
    }

    write!(out, "class {}", class.name)?;
    if let Some(base) = class.bases().first() {
        write!(out, " : public {base}")?;
    }
    writeln!(out, " {{")?;

    if class.instantiable {
        writeln!(out, "\npublic:")?;
        for ctor in &class.constructors {
            write_brief_and_details(out, &ctor.tooltip, &ctor.help)?;
            write_parameter_docs(out, &ctor.params)?;
            writeln!(out, "{}{};", class.name, stub_parameter_list(&ctor.params))?;
        }
    } else {
        writeln!(out, "\nprivate:")?;
        writeln!(out, "/// \\brief Constructor hidden / deactivated")?;
        writeln!(out, "{}() {{}}", class.name)?;
    }

    writeln!(out, "\npublic:")?;
    for function in class.method_overloads() {
        write_function(out, function)?;
        writeln!(out, ";\n")?;
    }
    for function in class.const_method_overloads() {
        write_function(out, function)?;
        writeln!(out, " const;\n")?;
    }
    writeln!(out, "}};")
}

/// Doc comment text must stay on its `///` line.
fn one_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::IndexOptions;
    use crate::registry::RegistrySnapshot;
    use crate::types::{ClassGroup, ParamType};

    #[test]
    fn test_name_to_id() {
        assert_eq!(name_to_id(" Grid Function/CPU "), "gridfunction_cpu");
        assert_eq!(name_to_id("   "), "");
    }

    #[test]
    fn test_sanitize_parameter_name() {
        assert_eq!(sanitize_parameter_name(""), "unnamed");
        assert_eq!(sanitize_parameter_name(" max steps "), "max_steps");
    }

    #[test]
    fn test_function_stub_with_multiple_returns() {
        let mut f = Function::new("minmax", "");
        f.params_in.push(Parameter::new("", ParamType::Number));
        f.params_out.push(Parameter::new("", ParamType::Number));
        f.params_out.push(Parameter::new("", ParamType::Number));

        let mut out = String::new();
        write_function(&mut out, &f).unwrap();
        assert!(out.ends_with("() minmax(number unnamed)"));
        assert!(!out.contains("\\returns"));
        assert!(out.contains("/// \\param[in] unnamed"));
    }

    #[test]
    fn test_namespaces_from_plugin_group() {
        let reg = RegistrySnapshot::default();
        let model = DocModel::build(&reg, IndexOptions::default());
        let renderer = CppStubRenderer::new("regbridge");
        assert_eq!(
            renderer.namespaces(&model, "(Plugin) Heat/Solvers"),
            ["regbridge", "plugins", "heat", "solvers"]
        );
        assert_eq!(renderer.namespaces(&model, ""), ["regbridge"]);
        assert_eq!(renderer.namespaces(&model, "regbridge/Grid"), ["regbridge", "grid"]);
    }

    #[test]
    fn test_group_file_contains_all_members() {
        let reg = RegistrySnapshot::new(
            vec![
                RegisteredClass::new("Vec1").with_group("algebra"),
                RegisteredClass::new("Vec2").with_group("algebra"),
            ],
            vec![ClassGroup::new("Vector")
                .with_member("Vec1", "1")
                .with_member("Vec2", "2")
                .with_default("Vec2")],
            vec![],
        );
        let model = DocModel::build(&reg, IndexOptions::default());
        let renderer = CppStubRenderer::new("regbridge");
        let mut written = HashSet::new();
        let entries = model.classes_and_groups(false);

        let (file, contents) = renderer
            .class_group_file(&model, entries[0], &mut written)
            .unwrap()
            .unwrap();
        assert_eq!(file, "vector.cpp");
        assert!(contents.starts_with("namespace regbridge {\nnamespace algebra {\n"));
        assert!(contents.contains("/// \\defgroup vector Vector"));
        assert!(contents.contains("/// default class is Vec2"));
        assert!(contents.contains("class Vec1 {"));
        assert!(contents.contains("class Vec2 {"));
        assert_eq!(written.len(), 2);
    }
}
