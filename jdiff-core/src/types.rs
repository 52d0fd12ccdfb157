//! Declaration tree produced by the parser and consumed by the differ.
//!
//! A file is a `CompilationUnit` declaration whose children are its package,
//! imports and types. Types nest fields, methods, constructors, initializers,
//! enum constants and inner types. Every declaration keeps the token ranges
//! the comparator needs to point at the exact place of a difference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::{Location, LocationRange};
use crate::version::ComparisonRules;

/// A single source token, or a contiguous token run treated as one unit
/// (a type such as `Map<K, V>` or an annotation).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Grammar node kind, e.g. `identifier`, `{`, `generic_type`.
    pub kind: String,
    pub text: String,
    pub range: LocationRange,
}

impl Token {
    pub fn new(kind: impl Into<String>, text: impl Into<String>, range: LocationRange) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            range,
        }
    }
}

/// Flavour of a type declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "annotation",
        }
    }
}

/// Closed set of declaration variants.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    CompilationUnit,
    Package,
    Import,
    Type(TypeKind),
    Field,
    Method,
    Constructor,
    Initializer { is_static: bool },
    EnumConstant,
    /// A grammar construct the comparator has no rule for.
    Unsupported(String),
}

impl DeclarationKind {
    /// Matching category; all type flavours share one so that a class turned
    /// interface is paired and reported as a change.
    pub fn category(&self) -> Category {
        match self {
            DeclarationKind::CompilationUnit => Category::CompilationUnit,
            DeclarationKind::Package => Category::Package,
            DeclarationKind::Import => Category::Import,
            DeclarationKind::Type(_) => Category::Type,
            DeclarationKind::Field => Category::Field,
            DeclarationKind::Method => Category::Method,
            DeclarationKind::Constructor => Category::Constructor,
            DeclarationKind::Initializer { .. } => Category::Initializer,
            DeclarationKind::EnumConstant => Category::EnumConstant,
            DeclarationKind::Unsupported(kind) => Category::Unsupported(kind.clone()),
        }
    }

    pub fn has_modifiers(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Type(_)
                | DeclarationKind::Field
                | DeclarationKind::Method
                | DeclarationKind::Constructor
        )
    }

    pub fn has_parameters(&self) -> bool {
        matches!(self, DeclarationKind::Method | DeclarationKind::Constructor)
    }

    pub fn has_children(&self) -> bool {
        matches!(
            self,
            DeclarationKind::CompilationUnit | DeclarationKind::Type(_)
        )
    }
}

/// Identity-key category.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    CompilationUnit,
    Package,
    Import,
    Type,
    Field,
    Method,
    Constructor,
    Initializer,
    EnumConstant,
    Unsupported(String),
}

/// Key used for exact pairing: category, name and parameter types.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub category: Category,
    pub name: String,
    pub signature: Vec<String>,
}

/// One formal parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: Token,
    /// Declared type; varargs keep their `...` suffix.
    pub type_name: Token,
    pub range: LocationRange,
}

/// The parenthesised parameter list of a method or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterList {
    pub range: LocationRange,
    pub params: Vec<Parameter>,
}

impl ParameterList {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn types(&self, rules: &ComparisonRules) -> Vec<String> {
        self.params
            .iter()
            .map(|p| rules.normalize_type(&p.type_name.text))
            .collect()
    }
}

/// A declaration node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// From the first to the last token of the declaration.
    pub range: LocationRange,
    pub name_range: LocationRange,
    /// Keyword modifiers in source order (`public`, `static`, ...).
    pub modifiers: Vec<Token>,
    pub annotations: Vec<Token>,
    pub type_parameters: Option<Token>,
    /// Return type for methods, declared type for fields.
    pub value_type: Option<Token>,
    pub parameters: Option<ParameterList>,
    pub throws: Vec<Token>,
    pub throws_range: Option<LocationRange>,
    /// Superclass for classes, super-interfaces for interfaces.
    pub extends: Vec<Token>,
    pub implements: Vec<Token>,
    /// Field initializer tokens, without the `=`.
    pub initializer: Vec<Token>,
    /// Code tokens of a body (braces included), comments excluded.
    pub body: Vec<Token>,
    pub children: Vec<Declaration>,
    /// Where members of this declaration begin; insertion point for
    /// members added to an otherwise empty container.
    pub body_start: Location,
}

const ACCESS_MODIFIERS: &[&str] = &["public", "protected", "private"];

impl Declaration {
    pub fn new(kind: DeclarationKind, name: impl Into<String>, range: LocationRange) -> Self {
        Self {
            kind,
            name: name.into(),
            range,
            name_range: range,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_parameters: None,
            value_type: None,
            parameters: None,
            throws: Vec::new(),
            throws_range: None,
            extends: Vec::new(),
            implements: Vec::new(),
            initializer: Vec::new(),
            body: Vec::new(),
            children: Vec::new(),
            body_start: range.start(),
        }
    }

    /// Builder: set the name range.
    pub fn with_name_range(mut self, range: LocationRange) -> Self {
        self.name_range = range;
        self
    }

    /// Builder: set the parameter list.
    pub fn with_parameters(mut self, parameters: ParameterList) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// The access modifier token, if any.
    pub fn access(&self) -> Option<&Token> {
        self.modifiers
            .iter()
            .find(|m| ACCESS_MODIFIERS.contains(&m.text.as_str()))
    }

    /// A non-access modifier by keyword.
    pub fn modifier(&self, keyword: &str) -> Option<&Token> {
        self.modifiers.iter().find(|m| m.text == keyword)
    }

    /// Location of the first token; used as the from/to anchor of
    /// modifier and access differences.
    pub fn first_token_range(&self) -> LocationRange {
        self.modifiers
            .first()
            .into_iter()
            .chain(self.annotations.first())
            .chain(self.type_parameters.as_ref())
            .chain(self.value_type.as_ref())
            .map(|t| t.range)
            .chain(std::iter::once(self.name_range))
            .min_by_key(|r| r.start())
            .unwrap_or(self.name_range)
    }

    /// Parameter types after normalization.
    pub fn signature(&self, rules: &ComparisonRules) -> Vec<String> {
        self.parameters
            .as_ref()
            .map(|p| p.types(rules))
            .unwrap_or_default()
    }

    pub fn identity_key(&self, rules: &ComparisonRules) -> IdentityKey {
        IdentityKey {
            category: self.kind.category(),
            name: self.name.clone(),
            signature: self.signature(rules),
        }
    }

    /// Name used in messages: methods and constructors carry their
    /// parameter types, e.g. `foo(int, String)`.
    pub fn display_name(&self) -> String {
        match &self.parameters {
            Some(params) if self.kind.has_parameters() => {
                let types: Vec<String> = params
                    .params
                    .iter()
                    .map(|p| p.type_name.text.split_whitespace().collect::<String>())
                    .collect();
                format!("{}({})", self.name, types.join(", "))
            }
            _ => self.name.clone(),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
