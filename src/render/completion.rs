//! Flat completion list for editor autocompletion.
//!
//! Line-oriented format, one field per line:
//!
//! ```text
//! <header>
//! class
//! <name>
//! <ancestors, base first, space separated>
//! <html summary>
//! [constructor | memberfunction records]
//! ;
//! ...
//! function
//! <name>
//! <return type>
//! <signature>
//! <html summary>
//! ```
//!
//! Every field is a single line; embedded newlines are replaced by `<br>`.

use std::fmt::{self, Write};
use std::path::Path;

use super::html::class_file_name;
use super::{RenderReport, RenderResult, Renderer, escape_html, write_output};
use crate::indexing::signature::{plain_parameter_list, return_type};
use crate::indexing::{ClassifiedEntry, DocModel};
use crate::types::{Constructor, Function, RegisteredClass};

pub struct CompletionRenderer {
    file_name: String,
    header: String,
}

impl CompletionRenderer {
    pub fn new(file_name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            header: header.into(),
        }
    }

    /// The whole completion list as one string.
    pub fn completion_list(&self, model: &DocModel<'_>) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{}", self.header)?;

        let entries = model.classes_and_groups_and_implementations();
        for entry in entries {
            write_class_record(&mut out, entry)?;
        }
        tracing::info!("[completion] wrote {} classes/classgroups", entries.len());

        let mut count = 0usize;
        for overloads in model.registry().functions() {
            for function in &overloads.overloads {
                write_function_record(&mut out, "function", function, None, false)?;
                count += 1;
            }
        }
        tracing::info!("[completion] wrote {count} global functions");
        Ok(out)
    }
}

impl Renderer for CompletionRenderer {
    fn name(&self) -> &'static str {
        "completion"
    }

    fn render(&self, model: &DocModel<'_>, out_dir: &Path) -> RenderResult<RenderReport> {
        let mut report = RenderReport::default();
        let list = self.completion_list(model)?;
        write_output(out_dir, &self.file_name, &list, &mut report)?;
        Ok(report)
    }
}

/// The class documented by an entry: the class itself, or the group default.
fn documented_class<'r>(entry: &ClassifiedEntry<'r>) -> Option<&'r RegisteredClass> {
    match entry {
        ClassifiedEntry::Class(c) => Some(c.class),
        ClassifiedEntry::Group(g) => g.default,
    }
}

fn write_class_record(out: &mut String, entry: &ClassifiedEntry<'_>) -> fmt::Result {
    writeln!(out, "class")?;
    writeln!(out, "{}", one_line(entry.name()))?;

    let class = documented_class(entry);
    let mut bases = String::new();
    if let Some(class) = class {
        for base in class.bases().iter().rev() {
            write!(bases, "{base} ")?;
        }
    }
    writeln!(out, "{}", one_line(&bases))?;

    writeln!(out, "{}", class_summary(entry, class))?;

    if let Some(class) = class {
        for ctor in &class.constructors {
            write_constructor_record(out, class, ctor)?;
        }
        for function in class.method_overloads() {
            write_function_record(out, "memberfunction", function, Some(class), false)?;
        }
        for function in class.const_method_overloads() {
            write_function_record(out, "memberfunction", function, Some(class), true)?;
        }
    }
    writeln!(out, ";")
}

fn class_summary(entry: &ClassifiedEntry<'_>, class: Option<&RegisteredClass>) -> String {
    let mut html = String::new();
    let group_name = entry.class_group().map(|g| escape_html(&g.name));

    let Some(class) = class else {
        return format!(
            "Classgroup <b>{}</b> has no default implementation.",
            escape_html(entry.name())
        );
    };
    match (entry.is_group(), group_name) {
        (true, Some(group)) => html.push_str(&format!(
            "Class <b>{}</b>, default implementation of classgroup <b>{group}</b><br>",
            escape_html(&class.name)
        )),
        (false, Some(group)) => html.push_str(&format!("Classgroup <b>{group}</b><br>")),
        _ => {}
    }

    html.push_str(&format!(
        "Registry Group: <b>{}</b><br>",
        escape_html(&class.group)
    ));
    html.push_str(if class.instantiable {
        "class has constructor. "
    } else {
        "class has no constructor. "
    });
    let tag = entry.tag();
    if !tag.is_empty() {
        html.push_str(&format!(" Tag <b>{}</b>", escape_html(tag)));
    }
    html.push_str("<br>");
    if !class.tooltip.is_empty() {
        html.push_str(&format!("{}<br>", escape_html(&class.tooltip)));
    }
    if class.ancestors.len() > 1 {
        html.push_str("Inheritance: ");
        for name in class.ancestors.iter().rev() {
            html.push_str(&format!(
                "<a href=\"{}\">{}</a> ",
                escape_html(&class_file_name(name)),
                escape_html(name)
            ));
        }
        html.push_str("<br>");
    }
    one_line(&html)
}

fn write_constructor_record(
    out: &mut String,
    class: &RegisteredClass,
    ctor: &Constructor,
) -> fmt::Result {
    let params = plain_parameter_list(&ctor.params);
    writeln!(out, "constructor")?;
    writeln!(out, "{}", one_line(&class.name))?;
    writeln!(out)?;
    writeln!(out, "{}", one_line(&format!("{} {params}", class.name)))?;

    let mut html = format!(
        "{} {}<br>Constructor of class <b>{}</b>",
        escape_html(&class.name),
        escape_html(&params),
        escape_html(&class.name)
    );
    if !ctor.tooltip.is_empty() {
        html.push_str(&format!("<br>tooltip: {}", escape_html(&ctor.tooltip)));
    }
    if let Some(help) = ctor.documented_help() {
        html.push_str(&format!("<br>help: {}", escape_html(help)));
    }
    if !class.group.is_empty() {
        html.push_str(&format!(
            "<br>Registry Group: <b>{}</b>",
            escape_html(&class.group)
        ));
    }
    writeln!(out, "{}", one_line(&html))
}

fn write_function_record(
    out: &mut String,
    kind: &str,
    function: &Function,
    owner: Option<&RegisteredClass>,
    is_const: bool,
) -> fmt::Result {
    let ret = return_type(function);
    let params = plain_parameter_list(&function.params_in);
    let constness = if is_const { " const" } else { "" };

    writeln!(out, "{kind}")?;
    writeln!(out, "{}", one_line(&function.name))?;
    writeln!(out, "{}", one_line(&ret))?;
    writeln!(
        out,
        "{}",
        one_line(&format!("{ret} {} {params}{constness}", function.name))
    )?;

    let mut html = format!(
        "{} {} {}<br>",
        escape_html(&ret),
        escape_html(&function.name),
        escape_html(&params)
    );
    if let Some(owner) = owner {
        html.push_str(&format!(
            "<br>Member function of class <b>{}</b>",
            escape_html(&owner.name)
        ));
    }
    if !function.return_name.is_empty() {
        html.push_str(&format!("<br>returns {}", escape_html(&function.return_name)));
    }
    if !function.tooltip.is_empty() {
        html.push_str(&format!("<br>tooltip: {}", escape_html(&function.tooltip)));
    }
    if let Some(help) = function.documented_help() {
        html.push_str(&format!("<br>help: {}", escape_html(help)));
    }
    let group = owner.map_or(function.group.as_str(), |c| c.group.as_str());
    html.push_str(&format!("<br>Registry Group: <b>{}</b>", escape_html(group)));
    writeln!(out, "{}", one_line(&html))
}

fn one_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("<br>")
}
