//! Browsable HTML reference pages.
//!
//! One page per registered class plus the class, group and function indexes.
//! All pages share a stylesheet and a navigation bar; everything links by
//! plain relative file name so the output directory can be moved as a whole.

use std::collections::HashSet;
use std::fmt::{self, Write};
use std::path::Path;

use super::{RenderReport, RenderResult, Renderer, beautify_tag, escape_html, write_output};
use crate::indexing::function::flatten_methods;
use crate::indexing::signature::{plain_parameter_list, return_type};
use crate::indexing::{
    ClassHierarchyNode, ClassifiedEntry, DocModel, FunctionEntity, FunctionOrder, GroupBucket,
    dedupe_rendered, sort_functions,
};
use crate::indexing::resolver::page_stem;
use crate::types::{Constructor, RegisteredClass};

pub const STYLESHEET_FILE: &str = "regdoc.css";
pub const HIERARCHY_FILE: &str = "hierarchy.html";
pub const INDEX_FILE: &str = "index.html";
pub const GROUP_INDEX_FILE: &str = "groupindex.html";
pub const GROUPS_FILE: &str = "groups_index.html";
pub const FUNCTIONS_FILE: &str = "functions.html";
pub const GROUPED_FUNCTIONS_FILE: &str = "groupedfunctions.html";

/// Label shown for the bucket of entities without a registry group.
const EMPTY_GROUP_LABEL: &str = "(empty group)";

const STYLESHEET: &str = r#"body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
  font-size: 14px;
  color: #1a1a1a;
  margin: 0 2em 2em 2em;
}
div.qindex {
  padding: 0.5em 0;
  border-bottom: 1px solid #ccc;
  margin-bottom: 1em;
}
a.qindex { font-weight: bold; }
a.el { font-weight: bold; text-decoration: none; color: #2a5db0; }
a.el:hover { text-decoration: underline; }
h1 { font-size: 1.6em; }
h3 { margin: 0.6em 0 0.2em 0; }
table.members, table.index { border-collapse: collapse; }
td.memItemLeft {
  text-align: right;
  vertical-align: top;
  white-space: nowrap;
  padding: 2px 8px;
  background: #f4f6fa;
}
td.memItemRight { vertical-align: bottom; padding: 2px 8px; background: #f4f6fa; }
td.mdescLeft { padding: 0 8px; }
td.mdescRight { padding: 0 8px 4px 8px; font-style: italic; color: #555; }
p.tooltip { text-align: center; }
ul.group-list > li { margin-bottom: 1em; }
address.generated { text-align: right; font-size: 0.8em; color: #777; }
"#;

/// Layout of a function row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowStyle {
    /// Inside a class page member table.
    Member,
    /// Prefixed with a link to the declaring class.
    WithOwner,
    /// Leading column with the registry group.
    WithGroup,
}

pub struct HtmlRenderer {
    title: String,
}

impl HtmlRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn page(&self, title: &str, body: &str) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "  <meta charset=\"UTF-8\">")?;
        writeln!(
            out,
            "  <title>{} - {}</title>",
            escape_html(title),
            escape_html(&self.title)
        )?;
        writeln!(
            out,
            "  <link href=\"{STYLESHEET_FILE}\" rel=\"stylesheet\" type=\"text/css\">"
        )?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(
            out,
            "<address class=\"generated\">{} generated by regdoc {} on {}</address>",
            escape_html(&self.title),
            env!("CARGO_PKG_VERSION"),
            chrono::Local::now().format("%Y-%m-%d %H:%M")
        )?;
        writeln!(out, "<div class=\"qindex\">")?;
        for (file, label) in [
            (HIERARCHY_FILE, "Class Hierarchy"),
            (INDEX_FILE, "Class Index"),
            (GROUP_INDEX_FILE, "Class Index by Group"),
            (FUNCTIONS_FILE, "Global Functions"),
            (GROUPED_FUNCTIONS_FILE, "Global Functions by Group"),
            (GROUPS_FILE, "Groups"),
        ] {
            writeln!(out, " | <a class=\"qindex\" href=\"{file}\">{label}</a>")?;
        }
        writeln!(out, "</div>")?;
        out.push_str(body);
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        Ok(out)
    }

    fn hierarchy_page(&self, model: &DocModel<'_>) -> Result<String, fmt::Error> {
        let mut body = String::new();
        writeln!(body, "<h1>{} Class Hierarchy</h1>", escape_html(&self.title))?;
        writeln!(body, "This inheritance list is sorted hierarchically:")?;
        writeln!(body, "<ul>")?;
        for child in model.hierarchy().children() {
            write_hierarchy_node(&mut body, model, child)?;
        }
        writeln!(body, "</ul>")?;
        self.page("Class Hierarchy", &body)
    }

    fn class_page(
        &self,
        model: &DocModel<'_>,
        class: &RegisteredClass,
    ) -> Result<String, fmt::Error> {
        let mut body = String::new();
        let name = escape_html(&class.name);
        let membership = model.class_entry(&class.name).and_then(|e| e.membership);

        match membership {
            Some(m) => {
                writeln!(body, "<h1>{} Class Reference</h1>", escape_html(&m.group.name))?;
                writeln!(body, "{name}<br>{}<br>", escape_html(&beautify_tag(m.tag)))?;
                if m.group.is_default(&class.name) {
                    writeln!(
                        body,
                        "(default implementation of group {})<br>",
                        escape_html(&m.group.name)
                    )?;
                }
            }
            None => writeln!(body, "<h1>{name} Class Reference</h1>")?,
        }

        if !class.tooltip.is_empty() {
            writeln!(body, "<p class=\"tooltip\">{}</p>", escape_html(&class.tooltip))?;
        }
        if let Some(help) = class.documented_help() {
            writeln!(body, "<p>{}</p>", escape_html(help))?;
        }
        if class.instantiable {
            writeln!(body, "class has constructor<br>")?;
        } else {
            writeln!(body, "class has no constructor<br>")?;
        }
        writeln!(
            body,
            "<br>Group <b><a href=\"{}\">{}</a></b><br>",
            escape_html(&model.plugins().group_file_name(&class.group)),
            escape_html(group_label(&class.group))
        )?;
        writeln!(body, "<hr>")?;

        // inheritance chain, most-base outermost
        if class.ancestors.len() > 1 {
            for ancestor in class.ancestors.iter().rev() {
                writeln!(
                    body,
                    "<ul><li><a class=\"el\" href=\"{}\">{}</a>",
                    escape_html(&class_file_name(ancestor)),
                    escape_html(model.resolve_group(ancestor))
                )?;
            }
            for _ in &class.ancestors {
                write!(body, "</li></ul>")?;
            }
            writeln!(body)?;
        }

        writeln!(body, "<table class=\"members\">")?;
        write_class_functions(&mut body, model, class, false)?;
        for base in class.bases() {
            if let Some(base_class) = model.registry().class(base) {
                write_class_functions(&mut body, model, base_class, true)?;
            }
        }
        writeln!(body, "</table>")?;

        self.write_usage(&mut body, model, class)?;

        if let Some(node) = model
            .hierarchy()
            .find(&class.name)
            .filter(|n| n.has_children())
        {
            writeln!(body, "<h1>Subclasses</h1>")?;
            writeln!(body, "<ul>")?;
            for child in node.children() {
                write_hierarchy_node(&mut body, model, child)?;
            }
            writeln!(body, "</ul>")?;
        }

        if let Some(m) = membership {
            writeln!(
                body,
                "<hr><h1>Other Implementations of {}</h1>",
                escape_html(&m.group.name)
            )?;
            writeln!(body, "<ul>")?;
            for member in &m.group.members {
                write!(
                    body,
                    "<li><a class=\"el\" href=\"{0}\">{1}</a> ({2})",
                    escape_html(&class_file_name(&member.class)),
                    escape_html(&member.class),
                    escape_html(&beautify_tag(&member.tag))
                )?;
                if m.group.is_default(&member.class) {
                    write!(body, " (default)")?;
                }
                writeln!(body, "</li>")?;
            }
            writeln!(body, "</ul>")?;
        }

        self.page(&class.name, &body)
    }

    /// Functions returning the class, then functions using the class or any of
    /// its ancestors. A row already shown in an earlier section is not repeated.
    fn write_usage(
        &self,
        body: &mut String,
        model: &DocModel<'_>,
        class: &RegisteredClass,
    ) -> fmt::Result {
        writeln!(body, "<hr><h1>Usage Information</h1>")?;
        writeln!(body, "<table class=\"members\">")?;

        let mut sections = vec![(
            format!("Functions returning {}", class.name),
            model.functions_returning(&class.name),
        )];
        let used: Vec<&str> = if class.ancestors.is_empty() {
            vec![class.name.as_str()]
        } else {
            class.ancestors.iter().map(String::as_str).collect()
        };
        for name in used {
            sections.push((format!("Functions using {name}"), model.functions_using(name)));
        }

        let mut emitted: HashSet<String> = HashSet::new();
        for (heading, functions) in sections {
            let rows = functions
                .iter()
                .map(|f| function_row(model, f, RowStyle::WithOwner))
                .collect::<Result<Vec<_>, _>>()?;
            let fresh: Vec<String> = dedupe_rendered(rows)
                .into_iter()
                .filter(|row| emitted.insert(row.clone()))
                .collect();
            if fresh.is_empty() {
                continue;
            }
            writeln!(
                body,
                "<tr><td colspan=\"2\"><br><h3>{}</h3></td></tr>",
                escape_html(&heading)
            )?;
            for row in fresh {
                body.push_str(&row);
            }
        }
        writeln!(body, "</table>")
    }

    fn class_index(&self, model: &DocModel<'_>, by_group: bool) -> Result<String, fmt::Error> {
        let title = if by_group {
            "Class Index by Group"
        } else {
            "Class Index"
        };
        let mut body = String::new();
        writeln!(body, "<h1>{} {title}</h1>", escape_html(&self.title))?;
        writeln!(body, "<table class=\"index\">")?;
        for entry in model.classes_and_groups(by_group) {
            write_index_row(&mut body, entry)?;
        }
        writeln!(body, "</table>")?;
        self.page(title, &body)
    }

    fn group_body(
        &self,
        model: &DocModel<'_>,
        group: &str,
        bucket: &GroupBucket<'_>,
    ) -> Result<String, fmt::Error> {
        let mut body = String::new();
        writeln!(body, "<h1>Group {}</h1>", escape_html(group_label(group)))?;

        writeln!(body, "<h2>Classes</h2>")?;
        writeln!(body, "<table class=\"index\">")?;
        for entry in &bucket.classes_and_groups {
            write_index_row(&mut body, entry)?;
        }
        writeln!(body, "</table>")?;

        writeln!(body, "<h2>Functions</h2>")?;
        writeln!(body, "<table class=\"members\">")?;
        let rows = bucket
            .functions
            .iter()
            .map(|f| function_row(model, f, RowStyle::WithGroup))
            .collect::<Result<Vec<_>, _>>()?;
        for row in dedupe_rendered(rows) {
            body.push_str(&row);
        }
        writeln!(body, "</table>")?;
        Ok(body)
    }

    fn function_index(
        &self,
        model: &DocModel<'_>,
        order: FunctionOrder,
    ) -> Result<String, fmt::Error> {
        let title = match order {
            FunctionOrder::Name => "Global Functions",
            FunctionOrder::GroupThenName => "Global Functions by Group",
        };
        let mut body = String::new();
        writeln!(body, "<h1>{title}</h1>")?;
        writeln!(body, "<table class=\"members\">")?;
        let rows = model
            .sorted_functions(order)
            .iter()
            .map(|f| function_row(model, f, RowStyle::WithGroup))
            .collect::<Result<Vec<_>, _>>()?;
        for row in dedupe_rendered(rows) {
            body.push_str(&row);
        }
        writeln!(body, "</table>")?;
        self.page(title, &body)
    }
}

impl Renderer for HtmlRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn render(&self, model: &DocModel<'_>, out_dir: &Path) -> RenderResult<RenderReport> {
        let mut report = RenderReport::default();

        write_output(out_dir, STYLESHEET_FILE, STYLESHEET, &mut report)?;
        write_output(out_dir, HIERARCHY_FILE, &self.hierarchy_page(model)?, &mut report)?;

        let classes = model.registry().classes();
        for class in classes {
            let page = self.class_page(model, class)?;
            let file = class_file_name(&class.name);
            if file != format!("{}.html", class.name) {
                tracing::warn!(
                    "[html] class name '{}' is not a valid file name, page written as '{file}'",
                    class.name
                );
            }
            write_output(out_dir, &file, &page, &mut report)?;
        }
        tracing::info!("[html] {} class pages written", classes.len());

        write_output(out_dir, INDEX_FILE, &self.class_index(model, false)?, &mut report)?;
        write_output(out_dir, GROUP_INDEX_FILE, &self.class_index(model, true)?, &mut report)?;

        // one page per registry group, bodies reused by the groups overview
        let mut regular = String::new();
        let mut plugins = String::new();
        for (group, bucket) in model.group_buckets().iter() {
            let file = model.plugins().group_file_name(group);
            let body = self.group_body(model, group, bucket)?;
            let page = self.page(&format!("Group {}", group_label(group)), &body)?;
            write_output(out_dir, &file, &page, &mut report)?;

            let section = if bucket.is_plugin {
                &mut plugins
            } else {
                &mut regular
            };
            writeln!(
                section,
                "<li><a class=\"el\" href=\"{}\">{}</a>\n<ul><li>{body}</li></ul></li>",
                escape_html(&file),
                escape_html(group_label(group))
            )?;
        }
        tracing::info!("[html] {} group pages written", model.group_buckets().len());

        let mut overview = String::new();
        writeln!(overview, "<h1>Groups</h1>")?;
        writeln!(overview, "<ul class=\"group-list\">\n{regular}</ul>")?;
        writeln!(overview, "<h1>Plugin Groups</h1>")?;
        writeln!(overview, "<ul class=\"group-list\">\n{plugins}</ul>")?;
        write_output(out_dir, GROUPS_FILE, &self.page("Groups", &overview)?, &mut report)?;

        write_output(
            out_dir,
            FUNCTIONS_FILE,
            &self.function_index(model, FunctionOrder::Name)?,
            &mut report,
        )?;
        write_output(
            out_dir,
            GROUPED_FUNCTIONS_FILE,
            &self.function_index(model, FunctionOrder::GroupThenName)?,
            &mut report,
        )?;

        Ok(report)
    }
}

fn group_label(group: &str) -> &str {
    if group.is_empty() {
        EMPTY_GROUP_LABEL
    } else {
        group
    }
}

fn write_hierarchy_node(
    out: &mut String,
    model: &DocModel<'_>,
    node: &ClassHierarchyNode,
) -> fmt::Result {
    let label = escape_html(model.resolve_group(&node.name));
    if node.is_group {
        write!(out, "<li>{label}")?;
    } else {
        write!(
            out,
            "<li><a class=\"el\" href=\"{}\">{label}</a>",
            escape_html(&class_file_name(&node.name))
        )?;
    }
    if node.has_children() {
        writeln!(out, "<ul>")?;
        for child in node.children() {
            write_hierarchy_node(out, model, child)?;
        }
        write!(out, "</ul>")?;
    }
    writeln!(out, "</li>")
}

/// Page file of a class. Every link to a class page goes through this.
pub fn class_file_name(class: &str) -> String {
    format!("{}.html", page_stem(class))
}

fn write_index_row(out: &mut String, entry: &ClassifiedEntry<'_>) -> fmt::Result {
    write!(
        out,
        "<tr><td class=\"memItemLeft\">{}</td><td class=\"memItemRight\">",
        escape_html(entry.group_str())
    )?;
    match entry.class() {
        Some(class) => write!(
            out,
            "<a class=\"el\" href=\"{}\">{}</a>",
            escape_html(&class_file_name(&class.name)),
            escape_html(entry.name())
        )?,
        None => write!(
            out,
            "{} (has no default implementation)",
            escape_html(entry.name())
        )?,
    }
    writeln!(out, "</td></tr>")
}

/// Constructors, member functions and const member functions of `class`.
fn write_class_functions(
    out: &mut String,
    model: &DocModel<'_>,
    class: &RegisteredClass,
    inherited: bool,
) -> fmt::Result {
    let display = escape_html(model.resolve_group(&class.name));
    let prefix = if inherited { "Inherited " } else { "" };

    if !class.constructors.is_empty() && !inherited {
        writeln!(
            out,
            "<tr><td colspan=\"2\"><h3>{display} Constructors</h3></td></tr>"
        )?;
        for ctor in &class.constructors {
            out.push_str(&constructor_row(&class.name, ctor)?);
        }
    }

    for (is_const, label) in [(false, "Member Functions"), (true, "Const Member Functions")] {
        let functions = sort_functions(flatten_methods(class, is_const));
        if functions.is_empty() {
            continue;
        }
        writeln!(
            out,
            "<tr><td colspan=\"2\"><h3>{prefix}{display} {label}</h3></td></tr>"
        )?;
        for function in &functions {
            out.push_str(&function_row(model, function, RowStyle::Member)?);
        }
    }
    Ok(())
}

fn constructor_row(class_name: &str, ctor: &Constructor) -> Result<String, fmt::Error> {
    let mut row = String::new();
    writeln!(
        row,
        "<tr><td class=\"memItemLeft\"></td><td class=\"memItemRight\">{} {}</td></tr>",
        escape_html(class_name),
        escape_html(&plain_parameter_list(&ctor.params))
    )?;
    write_description(&mut row, 1, "tooltip: ", &ctor.tooltip)?;
    if let Some(help) = ctor.documented_help() {
        write_description(&mut row, 1, "help: ", help)?;
    }
    Ok(row)
}

fn function_row(
    model: &DocModel<'_>,
    entity: &FunctionEntity<'_>,
    style: RowStyle,
) -> Result<String, fmt::Error> {
    let function = entity.function;
    let mut row = String::new();

    write!(row, "<tr>")?;
    if style == RowStyle::WithGroup {
        write!(row, "<td class=\"mdescLeft\">{}</td>", escape_html(entity.group()))?;
    }
    write!(
        row,
        "<td class=\"memItemLeft\">{}</td><td class=\"memItemRight\">",
        escape_html(&return_type(function))
    )?;
    if let (RowStyle::WithOwner, Some(owner)) = (style, entity.owner) {
        write!(
            row,
            "<a class=\"el\" href=\"{}\">{}</a>::",
            escape_html(&class_file_name(&owner.name)),
            escape_html(model.resolve_group(&owner.name))
        )?;
    }
    write!(
        row,
        "{} {}",
        escape_html(&function.name),
        escape_html(&plain_parameter_list(&function.params_in))
    )?;
    if entity.is_const {
        write!(row, " const")?;
    }
    writeln!(row, "</td></tr>")?;

    let pad = if style == RowStyle::WithGroup { 2 } else { 1 };
    write_description(&mut row, pad, "returns ", &function.return_name)?;
    write_description(&mut row, pad, "tooltip: ", &function.tooltip)?;
    if let Some(help) = function.documented_help() {
        write_description(&mut row, pad, "help: ", help)?;
    }
    Ok(row)
}

/// Indented description line under a signature row. Empty text writes nothing.
fn write_description(out: &mut String, pad: usize, label: &str, text: &str) -> fmt::Result {
    if text.is_empty() {
        return Ok(());
    }
    write!(out, "<tr>")?;
    for _ in 0..pad {
        write!(out, "<td class=\"mdescLeft\">&#160;</td>")?;
    }
    writeln!(
        out,
        "<td class=\"mdescRight\">{label}{}<br></td></tr>",
        escape_html(text)
    )
}
