//! Borrowed views of individual function signatures.

use serde::Serialize;

use crate::types::{Function, OverloadGroup, RegisteredClass};

/// One concrete signature, identified by (name, group, ordinal), together
/// with the class that declares it. Free functions have no declaring class.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FunctionEntity<'r> {
    #[serde(flatten)]
    pub function: &'r Function,
    /// Position within its overload group.
    pub ordinal: usize,
    #[serde(skip)]
    pub owner: Option<&'r RegisteredClass>,
    pub is_const: bool,
}

impl<'r> FunctionEntity<'r> {
    pub fn free(function: &'r Function, ordinal: usize) -> Self {
        Self {
            function,
            ordinal,
            owner: None,
            is_const: false,
        }
    }

    pub fn method(
        function: &'r Function,
        ordinal: usize,
        owner: &'r RegisteredClass,
        is_const: bool,
    ) -> Self {
        Self {
            function,
            ordinal,
            owner: Some(owner),
            is_const,
        }
    }

    pub fn name(&self) -> &'r str {
        &self.function.name
    }

    pub fn group(&self) -> &'r str {
        &self.function.group
    }

    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }
}

/// Flatten free-function overload groups into individual signatures.
pub fn flatten_free<'r>(groups: &'r [OverloadGroup]) -> Vec<FunctionEntity<'r>> {
    groups
        .iter()
        .flat_map(|g| {
            g.overloads
                .iter()
                .enumerate()
                .map(|(i, f)| FunctionEntity::free(f, i))
        })
        .collect()
}

/// Flatten a class's methods (`is_const == false`) or const methods.
pub fn flatten_methods(class: &RegisteredClass, is_const: bool) -> Vec<FunctionEntity<'_>> {
    let groups = if is_const {
        &class.const_methods
    } else {
        &class.methods
    };
    groups
        .iter()
        .flat_map(|g| {
            g.overloads
                .iter()
                .enumerate()
                .map(move |(i, f)| FunctionEntity::method(f, i, class, is_const))
        })
        .collect()
}
