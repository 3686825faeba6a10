//! Registered entities as exposed by the host binding registry.
//!
//! Pure data. The registry snapshot owns every value here; indexing and
//! rendering only borrow them for the duration of one generation run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Help text the host uses as a "nothing documented" marker.
pub const NO_HELP: &str = "No help";

/// Scalar or class-reference type of a single function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Bool,
    Integer,
    Number,
    String,
    Pointer(String),
    ConstPointer(String),
    SmartPointer(String),
    ConstSmartPointer(String),
}

impl ParamType {
    /// Name of the referenced class, if this is a class reference.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            ParamType::Pointer(c)
            | ParamType::ConstPointer(c)
            | ParamType::SmartPointer(c)
            | ParamType::ConstSmartPointer(c) => Some(c),
            ParamType::Bool | ParamType::Integer | ParamType::Number | ParamType::String => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Bool => f.write_str("bool"),
            ParamType::Integer => f.write_str("integer"),
            ParamType::Number => f.write_str("number"),
            ParamType::String => f.write_str("string"),
            ParamType::Pointer(c) => write!(f, "{c}*"),
            ParamType::ConstPointer(c) => write!(f, "const {c}*"),
            ParamType::SmartPointer(c) => write!(f, "SmartPtr<{c}>"),
            ParamType::ConstSmartPointer(c) => write!(f, "ConstSmartPtr<{c}>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    /// Parameter is a sequence of `ty` rather than a single value.
    #[serde(default)]
    pub sequence: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            sequence: false,
        }
    }

    pub fn sequence_of(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            sequence: true,
            ..Self::new(name, ty)
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        self.ty.class_name()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sequence {
            write!(f, "std::vector<{}>", self.ty)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}

/// One concrete signature of a free function or method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub name: String,
    /// Registry group path, e.g. `ug4/Grid` or `(Plugin) Electrostatics`.
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub params_in: Vec<Parameter>,
    #[serde(default)]
    pub params_out: Vec<Parameter>,
    #[serde(default)]
    pub return_name: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub help: String,
}

impl Function {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            ..Self::default()
        }
    }

    /// Return slots of this signature.
    pub fn returns(&self) -> Returns<'_> {
        match self.params_out.as_slice() {
            [] => Returns::Void,
            [single] => Returns::Single(single),
            many => Returns::Multiple(many.len()),
        }
    }

    /// Help text, unless it is empty or the host's placeholder.
    pub fn documented_help(&self) -> Option<&str> {
        documented(&self.help)
    }

    pub fn uses_class_in(&self, class_name: &str) -> bool {
        self.params_in
            .iter()
            .any(|p| p.class_name() == Some(class_name))
    }

    pub fn uses_class_out(&self, class_name: &str) -> bool {
        self.params_out
            .iter()
            .any(|p| p.class_name() == Some(class_name))
    }
}

/// Classification of a signature's out-parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns<'a> {
    Void,
    Single(&'a Parameter),
    /// More than one return slot. Not representable; renders as a placeholder.
    Multiple(usize),
}

/// Set of signatures sharing one externally visible name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverloadGroup {
    pub name: String,
    #[serde(default)]
    pub overloads: Vec<Function>,
}

impl OverloadGroup {
    pub fn new(name: impl Into<String>, overloads: Vec<Function>) -> Self {
        Self {
            name: name.into(),
            overloads,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub help: String,
}

impl Constructor {
    pub fn documented_help(&self) -> Option<&str> {
        documented(&self.help)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClass {
    pub name: String,
    /// Linearized ancestry, most-derived first: index 0 is the class itself,
    /// index 1 its direct base, and so on.
    #[serde(default)]
    pub ancestors: Vec<String>,
    /// Registry group path.
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub instantiable: bool,
    #[serde(default)]
    pub constructors: Vec<Constructor>,
    #[serde(default)]
    pub methods: Vec<OverloadGroup>,
    #[serde(default)]
    pub const_methods: Vec<OverloadGroup>,
}

impl RegisteredClass {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ancestors: vec![name.clone()],
            name,
            ..Self::default()
        }
    }

    /// Builder-style helper to set the ancestor chain (most-derived first).
    pub fn with_ancestors<I, S>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn documented_help(&self) -> Option<&str> {
        documented(&self.help)
    }

    /// Ancestors other than the class itself, direct base first.
    pub fn bases(&self) -> &[String] {
        self.ancestors.get(1..).unwrap_or_default()
    }

    /// All overloads of non-const methods, in registration order.
    pub fn method_overloads(&self) -> impl Iterator<Item = &Function> {
        self.methods.iter().flat_map(|g| g.overloads.iter())
    }

    pub fn const_method_overloads(&self) -> impl Iterator<Item = &Function> {
        self.const_methods.iter().flat_map(|g| g.overloads.iter())
    }
}

/// Member of a class group together with its discriminator tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub class: String,
    #[serde(default)]
    pub tag: String,
}

/// Named family of template specializations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub name: String,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    /// Class name of the default specialization, if any.
    #[serde(default)]
    pub default: Option<String>,
}

impl ClassGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_member(mut self, class: impl Into<String>, tag: impl Into<String>) -> Self {
        self.members.push(GroupMember {
            class: class.into(),
            tag: tag.into(),
        });
        self
    }

    pub fn with_default(mut self, class: impl Into<String>) -> Self {
        self.default = Some(class.into());
        self
    }

    pub fn is_default(&self, class_name: &str) -> bool {
        self.default.as_deref() == Some(class_name)
    }
}

fn documented(help: &str) -> Option<&str> {
    if help.is_empty() || help == NO_HELP {
        None
    } else {
        Some(help)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_display() {
        assert_eq!(ParamType::Number.to_string(), "number");
        assert_eq!(ParamType::ConstPointer("Grid".into()).to_string(), "const Grid*");
        assert_eq!(
            Parameter::sequence_of("v", ParamType::SmartPointer("Vec".into())).to_string(),
            "std::vector<SmartPtr<Vec>>"
        );
    }

    #[test]
    fn test_returns_classification() {
        let mut f = Function::new("get", "");
        assert_eq!(f.returns(), Returns::Void);

        f.params_out.push(Parameter::new("", ParamType::Integer));
        assert!(matches!(f.returns(), Returns::Single(_)));

        f.params_out.push(Parameter::new("", ParamType::Bool));
        assert_eq!(f.returns(), Returns::Multiple(2));
    }

    #[test]
    fn test_no_help_is_undocumented() {
        let mut f = Function::new("f", "");
        assert_eq!(f.documented_help(), None);
        f.help = NO_HELP.to_string();
        assert_eq!(f.documented_help(), None);
        f.help = "Solves it".to_string();
        assert_eq!(f.documented_help(), Some("Solves it"));
    }

    #[test]
    fn test_bases_skip_self() {
        let c = RegisteredClass::new("Derived").with_ancestors(["Derived", "Base"]);
        assert_eq!(c.bases(), ["Base".to_string()]);
        let orphan = RegisteredClass::new("X").with_ancestors(Vec::<String>::new());
        assert!(orphan.bases().is_empty());
    }

    #[test]
    fn test_param_type_json_shape() {
        let p: Parameter =
            serde_json::from_str(r#"{"name":"g","type":{"pointer":"Grid"}}"#).unwrap();
        assert_eq!(p.class_name(), Some("Grid"));
        let q: Parameter = serde_json::from_str(r#"{"type":"integer","sequence":true}"#).unwrap();
        assert!(q.sequence);
        assert_eq!(q.ty, ParamType::Integer);
    }
}
