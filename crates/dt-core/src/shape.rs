use std::fmt;

use serde::{Deserialize, Serialize};

/// Flavor of a method-like member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodKind {
    Ordinary,
    Getter,
    Setter,
    Constructor,
}

/// Closed classification of a syntax node, selecting which tag template
/// applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentableShape {
    FunctionLike,
    ClassLike,
    MethodLike(MethodKind),
    PropertyLike,
    InterfaceLike,
    EnumLike,
    EnumMember,
    ModuleLike,
    VariableDeclarationWithFunctionInit,
    Unsupported,
}

impl DocumentableShape {
    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }

    /// Shapes whose signature carries parameters.
    pub fn is_callable(self) -> bool {
        matches!(
            self,
            Self::FunctionLike | Self::MethodLike(_) | Self::VariableDeclarationWithFunctionInit
        )
    }

    /// Callable shapes that can produce a value for `@returns`.
    pub fn can_return(self) -> bool {
        match self {
            Self::MethodLike(MethodKind::Constructor) | Self::MethodLike(MethodKind::Setter) => {
                false
            }
            other => other.is_callable(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FunctionLike => "function",
            Self::ClassLike => "class",
            Self::MethodLike(MethodKind::Ordinary) => "method",
            Self::MethodLike(MethodKind::Getter) => "getter",
            Self::MethodLike(MethodKind::Setter) => "setter",
            Self::MethodLike(MethodKind::Constructor) => "constructor",
            Self::PropertyLike => "property",
            Self::InterfaceLike => "interface",
            Self::EnumLike => "enum",
            Self::EnumMember => "enum member",
            Self::ModuleLike => "module",
            Self::VariableDeclarationWithFunctionInit => "function variable",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for DocumentableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
