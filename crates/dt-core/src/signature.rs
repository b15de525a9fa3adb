use serde::{Deserialize, Serialize};

use crate::shape::DocumentableShape;

/// One declared parameter, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    /// Annotation text with whitespace collapsed; `None` when untyped.
    pub type_text: Option<String>,
    pub is_optional: bool,
    /// Default value source text, when the parameter has one.
    pub default_value: Option<String>,
    pub is_rest: bool,
    /// Parameter is a destructuring pattern; `name` is synthetic.
    pub is_pattern: bool,
}

impl ParameterDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

/// Normalized, shape-specific summary of a construct used to drive rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDescriptor {
    pub shape: DocumentableShape,
    /// Unique names, declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: Option<String>,
    pub type_parameters: Vec<String>,
    /// Declared type of a property.
    pub value_type: Option<String>,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_abstract: bool,
    pub is_static: bool,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    /// Error types constructed by `throw new X(..)` in the body.
    pub throws: Vec<String>,
    pub decorators: Vec<String>,
    /// Name of the enclosing class or interface, for members.
    pub member_of: Option<String>,
}

impl SignatureDescriptor {
    pub fn new(shape: DocumentableShape) -> Self {
        Self {
            shape,
            parameters: Vec::new(),
            return_type: None,
            type_parameters: Vec::new(),
            value_type: None,
            is_async: false,
            is_generator: false,
            is_abstract: false,
            is_static: false,
            extends: Vec::new(),
            implements: Vec::new(),
            throws: Vec::new(),
            decorators: Vec::new(),
            member_of: None,
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether the declared return type is `void` (or a promise of it).
    pub fn returns_void(&self) -> bool {
        matches!(
            self.return_type.as_deref(),
            Some("void") | Some("Promise<void>") | Some("undefined")
        )
    }

    /// Whether a `@returns` tag can apply at all.
    pub fn can_return(&self) -> bool {
        self.shape.can_return() && !self.returns_void()
    }
}
