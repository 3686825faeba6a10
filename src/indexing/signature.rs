//! Plain-text signature pieces shared by all output formats.

use std::borrow::Cow;

use crate::types::{Function, Parameter, Returns};

/// Placeholder for a signature without out-parameters.
pub const VOID: &str = "void";
/// Placeholder for signatures with more than one out-parameter.
pub const MULTIPLE_RETURNS: &str = "()";

/// Return type text of `function`.
///
/// Zero out-parameters render as `void`. More than one cannot be expressed
/// and renders as `()` with a warning.
pub fn return_type(function: &Function) -> Cow<'static, str> {
    match function.returns() {
        Returns::Void => Cow::Borrowed(VOID),
        Returns::Single(p) => Cow::Owned(p.to_string()),
        Returns::Multiple(n) => {
            tracing::warn!(
                "[signature] '{}' has {} return values, displaying as '{}'",
                function.name,
                n,
                MULTIPLE_RETURNS
            );
            Cow::Borrowed(MULTIPLE_RETURNS)
        }
    }
}

/// How parameters without a name are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unnamed<'a> {
    /// Type only.
    Omit,
    /// Type followed by a fixed placeholder name.
    Placeholder(&'a str),
}

/// `(T1 a, T2 b)` with each type produced by `ty`.
pub fn parameter_list<F>(params: &[Parameter], unnamed: Unnamed<'_>, mut ty: F) -> String
where
    F: FnMut(&Parameter) -> String,
{
    let parts: Vec<String> = params
        .iter()
        .map(|p| {
            let name = p.name.trim();
            match (name.is_empty(), unnamed) {
                (false, _) => format!("{} {}", ty(p), name.replace(' ', "_")),
                (true, Unnamed::Placeholder(placeholder)) => format!("{} {placeholder}", ty(p)),
                (true, Unnamed::Omit) => ty(p),
            }
        })
        .collect();
    format!("({})", parts.join(", "))
}

/// Plain-text parameter list.
pub fn plain_parameter_list(params: &[Parameter]) -> String {
    parameter_list(params, Unnamed::Omit, |p| p.to_string())
}

/// Full plain-text signature: `ret name(params)` plus ` const` when requested.
pub fn plain_signature(function: &Function, is_const: bool) -> String {
    let mut s = format!(
        "{} {}{}",
        return_type(function),
        function.name,
        plain_parameter_list(&function.params_in)
    );
    if is_const {
        s.push_str(" const");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParamType;

    #[test]
    fn test_return_type_placeholders() {
        let mut f = Function::new("f", "");
        assert_eq!(return_type(&f), "void");

        f.params_out.push(Parameter::new("", ParamType::ConstPointer("Grid".into())));
        assert_eq!(return_type(&f), "const Grid*");

        f.params_out.push(Parameter::new("", ParamType::Bool));
        assert_eq!(return_type(&f), "()");
    }

    #[test]
    fn test_parameter_list_unnamed_styles() {
        let params = vec![
            Parameter::new("grid", ParamType::SmartPointer("Grid".into())),
            Parameter::new("", ParamType::Integer),
            Parameter::new("max steps", ParamType::Number),
        ];
        assert_eq!(
            plain_parameter_list(&params),
            "(SmartPtr<Grid> grid, integer, number max_steps)"
        );
        assert_eq!(
            parameter_list(&params, Unnamed::Placeholder("unnamed"), |p| p.to_string()),
            "(SmartPtr<Grid> grid, integer unnamed, number max_steps)"
        );
        assert_eq!(plain_parameter_list(&[]), "()");
    }

    #[test]
    fn test_plain_signature() {
        let mut f = Function::new("size", "");
        f.params_out.push(Parameter::new("", ParamType::Integer));
        assert_eq!(plain_signature(&f, true), "integer size() const");
    }
}
