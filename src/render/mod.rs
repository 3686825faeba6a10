//! Output writers.
//!
//! Every writer consumes the same [`DocModel`] and writes its files into one
//! output directory. Writers never mutate the model and hold no state between
//! runs; each file is overwritten wholesale.

pub mod completion;
pub mod cpp;
pub mod error;
pub mod html;

pub use completion::CompletionRenderer;
pub use cpp::CppStubRenderer;
pub use error::{RenderError, RenderResult};
pub use html::HtmlRenderer;

use std::path::{Path, PathBuf};

use crate::indexing::DocModel;

/// Files produced by one writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub files: Vec<PathBuf>,
}

impl RenderReport {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A single output format.
pub trait Renderer {
    /// Short name used in log lines and summaries.
    fn name(&self) -> &'static str;

    fn render(&self, model: &DocModel<'_>, out_dir: &Path) -> RenderResult<RenderReport>;
}

/// Write `contents` to `out_dir/file_name` and record it in `report`.
///
/// An existing file with the same name is replaced.
pub(crate) fn write_output(
    out_dir: &Path,
    file_name: &str,
    contents: &str,
    report: &mut RenderReport,
) -> RenderResult<()> {
    let path = out_dir.join(file_name);
    std::fs::write(&path, contents).map_err(|source| RenderError::Write {
        path: path.clone(),
        source,
    })?;
    crate::debug_event!("render", "wrote", "{} ({} bytes)", path.display(), contents.len());
    report.files.push(path);
    Ok(())
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Discriminator tags separate template arguments with `;`.
pub(crate) fn beautify_tag(tag: &str) -> String {
    tag.replace(';', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("SmartPtr<Grid>"), "SmartPtr&lt;Grid&gt;");
        assert_eq!(escape_html("a & \"b\""), "a &amp; &quot;b&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_beautify_tag() {
        assert_eq!(beautify_tag("dim=2;alg=CPU1;"), "dim=2 alg=CPU1 ");
    }
}
