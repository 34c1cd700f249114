//! Declaration syntax tree.
//!
//! A parsed source is a [`DeclarationFile`]: every declaration lives in one
//! arena and is addressed by [`DeclId`]. Containers (modules, classes,
//! interfaces, enums, object type literals) refer to their members by id, so
//! later layers can hold cheap references into a file without borrowing it.

use std::fmt;
use std::ops::BitOr;

use crate::doc::DocComment;
use crate::normalize;
use crate::span::Span;

// =============================================================================
// Identifiers
// =============================================================================

/// Index of a declaration in its file's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclId(u32);

impl DeclId {
    /// Creates an id from a raw arena index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Declaration Kinds
// =============================================================================

/// What kind of module block a [`DeclKind::Module`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// `namespace a.b { }` or `module a { }`
    Namespace,
    /// `declare module 'name' { }`
    Ambient,
    /// `declare global { }`
    Global,
}

/// Which half of an accessor pair a [`DeclKind::Accessor`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// `get name(): T`
    Get,
    /// `set name(value: T)`
    Set,
}

/// The syntactic kind of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// Namespace, ambient module, or global augmentation.
    Module(ModuleKind),
    /// Class declaration.
    Class,
    /// Interface declaration.
    Interface,
    /// Top-level function declaration.
    Function,
    /// Method declaration or method signature.
    Method,
    /// Property declaration or property signature.
    Property,
    /// Get or set accessor.
    Accessor(AccessorKind),
    /// Class constructor.
    Constructor,
    /// `var`, `let`, or `const` declaration.
    Variable,
    /// `type Name = ...`
    TypeAlias,
    /// Enum declaration.
    Enum,
    /// Enum member.
    EnumMember,
    /// Call signature `(x: T): R`.
    CallSignature,
    /// Construct signature `new (x: T): R`.
    ConstructSignature,
    /// Index signature `[key: string]: T`.
    IndexSignature,
    /// Anything else: imports, exports, and statements with no declared shape.
    Other,
}

impl DeclKind {
    /// Returns true for kinds that hold named child declarations.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Module(_) | Self::Class | Self::Interface)
    }

    /// Returns true for kinds that carry a call signature.
    #[must_use]
    pub const fn is_callable(self) -> bool {
        matches!(
            self,
            Self::Function
                | Self::Method
                | Self::Constructor
                | Self::CallSignature
                | Self::ConstructSignature
        )
    }

    /// Returns a human-readable name for this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Module(ModuleKind::Namespace) => "namespace",
            Self::Module(ModuleKind::Ambient) => "module",
            Self::Module(ModuleKind::Global) => "global",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Function => "function",
            Self::Method => "method",
            Self::Property => "property",
            Self::Accessor(AccessorKind::Get) => "get accessor",
            Self::Accessor(AccessorKind::Set) => "set accessor",
            Self::Constructor => "constructor",
            Self::Variable => "variable",
            Self::TypeAlias => "type alias",
            Self::Enum => "enum",
            Self::EnumMember => "enum member",
            Self::CallSignature => "call signature",
            Self::ConstructSignature => "construct signature",
            Self::IndexSignature => "index signature",
            Self::Other => "statement",
        }
    }
}

// =============================================================================
// Modifiers
// =============================================================================

/// A set of declaration modifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u16);

impl Modifiers {
    /// `export`
    pub const EXPORT: Self = Self(1);
    /// `declare`
    pub const DECLARE: Self = Self(1 << 1);
    /// `default`
    pub const DEFAULT: Self = Self(1 << 2);
    /// `static`
    pub const STATIC: Self = Self(1 << 3);
    /// `readonly`
    pub const READONLY: Self = Self(1 << 4);
    /// `abstract`
    pub const ABSTRACT: Self = Self(1 << 5);
    /// `const` (on variables and enums)
    pub const CONST: Self = Self(1 << 6);
    /// `private`
    pub const PRIVATE: Self = Self(1 << 7);
    /// `protected`
    pub const PROTECTED: Self = Self(1 << 8);
    /// `public`
    pub const PUBLIC: Self = Self(1 << 9);
    /// `?` after the name
    pub const OPTIONAL: Self = Self(1 << 10);
    /// `override`
    pub const OVERRIDE: Self = Self(1 << 11);

    /// Returns the empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns true if every modifier of `other` is present.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Adds the modifiers of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Returns the modifier for a keyword, if it is one.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "export" => Self::EXPORT,
            "declare" => Self::DECLARE,
            "default" => Self::DEFAULT,
            "static" => Self::STATIC,
            "readonly" => Self::READONLY,
            "abstract" => Self::ABSTRACT,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "public" => Self::PUBLIC,
            "override" => Self::OVERRIDE,
            // Carry no declared shape.
            "async" | "accessor" => Self::empty(),
            _ => return None,
        })
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// A type parameter `T extends C = D`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeParam {
    /// Parameter name.
    pub name: String,
    /// `extends` constraint.
    pub constraint: Option<TypeExpr>,
    /// Default type.
    pub default: Option<TypeExpr>,
    /// Source location.
    pub span: Span,
}

/// A function parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Parameter name; destructuring patterns keep their normalized text.
    pub name: String,
    /// Declared type, if annotated.
    pub ty: Option<TypeExpr>,
    /// `name?` or has an initializer.
    pub optional: bool,
    /// `...name`
    pub rest: bool,
    /// Source location.
    pub span: Span,
}

/// One declaration in a [`DeclarationFile`].
///
/// The meaning of [`Decl::ty`] depends on the kind: the return type of a
/// callable, the declared type of a property, variable, or accessor, the
/// target of a type alias, the value type of an index signature.
#[derive(Clone, Debug, PartialEq)]
pub struct Decl {
    /// Syntactic kind.
    pub kind: DeclKind,
    /// Declared name; `None` for signatures and anonymous default exports.
    pub name: Option<String>,
    /// Modifiers written before the name, plus `?`.
    pub modifiers: Modifiers,
    /// Type parameters.
    pub type_params: Vec<TypeParam>,
    /// Parameters of a callable or accessor.
    pub params: Vec<Param>,
    /// The declared type (see type-level docs).
    pub ty: Option<TypeExpr>,
    /// `extends` clauses.
    pub extends: Vec<TypeExpr>,
    /// `implements` clauses.
    pub implements: Vec<TypeExpr>,
    /// Member declarations of a container, enum, or type literal.
    pub children: Vec<DeclId>,
    /// Initializer text span of a variable, property, or enum member.
    pub initializer: Option<Span>,
    /// Attached documentation comment.
    pub doc: Option<DocComment>,
    /// Source span, excluding the doc comment and the trailing terminator.
    pub span: Span,
    /// Enclosing declaration, if any.
    pub parent: Option<DeclId>,
}

impl Decl {
    /// Creates an empty declaration of the given kind.
    #[must_use]
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Self {
            kind,
            name: None,
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            params: Vec::new(),
            ty: None,
            extends: Vec::new(),
            implements: Vec::new(),
            children: Vec::new(),
            initializer: None,
            doc: None,
            span,
            parent: None,
        }
    }

    /// Returns true if the declaration carries `modifier`.
    #[must_use]
    pub const fn has(&self, modifier: Modifiers) -> bool {
        self.modifiers.contains(modifier)
    }

    /// Returns true if the name was written with `?`.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.has(Modifiers::OPTIONAL)
    }

    /// Returns true if the attached doc comment marks this declaration as a stub.
    #[must_use]
    pub fn is_stubbed(&self) -> bool {
        self.doc.as_ref().is_some_and(DocComment::is_stubbed)
    }
}

// =============================================================================
// Type Expressions
// =============================================================================

/// Built-in keyword types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeywordType {
    /// `any`
    Any,
    /// `unknown`
    Unknown,
    /// `never`
    Never,
    /// `void`
    Void,
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `bigint`
    BigInt,
    /// `symbol`
    Symbol,
    /// `object`
    Object,
    /// `this`
    This,
}

impl KeywordType {
    /// Returns the keyword type named by `word`.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "any" => Self::Any,
            "unknown" => Self::Unknown,
            "never" => Self::Never,
            "void" => Self::Void,
            "undefined" => Self::Undefined,
            "null" => Self::Null,
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "bigint" => Self::BigInt,
            "symbol" => Self::Symbol,
            "object" => Self::Object,
            "this" => Self::This,
            _ => return None,
        })
    }

    /// Returns the keyword as written.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::Void => "void",
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
            Self::Symbol => "symbol",
            Self::Object => "object",
            Self::This => "this",
        }
    }
}

/// A literal type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralType {
    /// `'text'`
    String(String),
    /// `42`, `-1`, `0x10`; kept as written
    Number(String),
    /// `true` or `false`
    Boolean(bool),
}

/// A type operator prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeOperator {
    /// `keyof T`
    KeyOf,
    /// `readonly T[]`
    Readonly,
    /// `unique symbol`
    Unique,
}

/// One element of a tuple type.
#[derive(Clone, Debug, PartialEq)]
pub struct TupleElement {
    /// Label of a named element.
    pub name: Option<String>,
    /// Element type.
    pub ty: TypeExpr,
    /// `T?` or `name?: T`
    pub optional: bool,
    /// `...T`
    pub rest: bool,
}

/// A function or constructor type.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionType {
    /// Type parameters.
    pub type_params: Vec<TypeParam>,
    /// Parameters.
    pub params: Vec<Param>,
    /// Return type.
    pub ret: TypeExpr,
}

/// A type expression as written in source.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    /// Keyword type like `string`.
    Keyword(KeywordType, Span),
    /// Literal type like `'a'` or `1`.
    Literal(LiteralType, Span),
    /// Possibly qualified reference with type arguments: `a.B<C>`.
    Reference {
        /// Name segments.
        name: Vec<String>,
        /// Type arguments.
        args: Vec<TypeExpr>,
        /// Source location.
        span: Span,
    },
    /// `T[]`
    Array(Box<TypeExpr>, Span),
    /// `[A, B?, ...C[]]`
    Tuple(Vec<TupleElement>, Span),
    /// `A | B`
    Union(Vec<TypeExpr>, Span),
    /// `A & B`
    Intersection(Vec<TypeExpr>, Span),
    /// `(x: A) => B`
    Function(Box<FunctionType>, Span),
    /// `new (x: A) => B`
    Constructor(Box<FunctionType>, Span),
    /// Object type literal; members live in the declaration arena.
    Object(Vec<DeclId>, Span),
    /// `(T)`
    Paren(Box<TypeExpr>, Span),
    /// `keyof T`, `readonly T`, `unique T`
    Operator(TypeOperator, Box<TypeExpr>, Span),
    /// `T[K]`
    IndexedAccess(Box<TypeExpr>, Box<TypeExpr>, Span),
    /// `typeof a.b`
    Query(Vec<String>, Span),
    /// `x is T`, `asserts x`, `asserts x is T`
    Predicate {
        /// Parameter name, or `this`.
        param: String,
        /// `asserts` form.
        asserts: bool,
        /// Narrowed type.
        ty: Option<Box<TypeExpr>>,
        /// Source location.
        span: Span,
    },
    /// `C extends E ? T : F`
    Conditional {
        /// Checked type.
        check: Box<TypeExpr>,
        /// Extends type.
        extends: Box<TypeExpr>,
        /// True branch.
        then: Box<TypeExpr>,
        /// False branch.
        otherwise: Box<TypeExpr>,
        /// Source location.
        span: Span,
    },
    /// `infer T`
    Infer(String, Span),
    /// Skipped construct (mapped types, template literal types, import types).
    Opaque(Span),
}

impl TypeExpr {
    /// Returns the source span of this type expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Keyword(_, s)
            | Self::Literal(_, s)
            | Self::Array(_, s)
            | Self::Tuple(_, s)
            | Self::Union(_, s)
            | Self::Intersection(_, s)
            | Self::Function(_, s)
            | Self::Constructor(_, s)
            | Self::Object(_, s)
            | Self::Paren(_, s)
            | Self::Operator(_, _, s)
            | Self::IndexedAccess(_, _, s)
            | Self::Query(_, s)
            | Self::Infer(_, s)
            | Self::Opaque(s)
            | Self::Reference { span: s, .. }
            | Self::Predicate { span: s, .. }
            | Self::Conditional { span: s, .. } => *s,
        }
    }

    /// Returns true for the `void` keyword.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Keyword(KeywordType::Void, _))
    }
}

// =============================================================================
// Declaration File
// =============================================================================

/// A parsed declaration source.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclarationFile {
    /// Where the source was loaded from.
    pub path: String,
    /// The full source text.
    pub text: String,
    /// Declaration arena.
    pub decls: Vec<Decl>,
    /// Top-level declarations in source order.
    pub roots: Vec<DeclId>,
}

impl DeclarationFile {
    /// Gets a declaration by id.
    #[must_use]
    pub fn get(&self, id: DeclId) -> Option<&Decl> {
        self.decls.get(id.index())
    }

    /// Iterates over the direct children of a declaration.
    pub fn children(&self, id: DeclId) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.get(id)
            .map(|d| d.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&child| self.get(child).map(|d| (child, d)))
    }

    /// Iterates over the top-level declarations.
    pub fn top_level(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.roots
            .iter()
            .filter_map(|&id| self.get(id).map(|d| (id, d)))
    }

    /// Returns the source text of a declaration.
    #[must_use]
    pub fn decl_text(&self, id: DeclId) -> &str {
        self.get(id).map_or("", |d| d.span.text(&self.text))
    }

    /// Returns the source text of a type expression.
    #[must_use]
    pub fn type_text(&self, ty: &TypeExpr) -> &str {
        ty.span().text(&self.text)
    }

    /// Returns the declaration text with whitespace and comments removed.
    #[must_use]
    pub fn normalized_text(&self, id: DeclId) -> String {
        normalize::normalize_source(self.decl_text(id))
    }

    /// Finds the first top-level declaration named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<DeclId> {
        self.top_level()
            .find(|(_, d)| d.name.as_deref() == Some(name))
            .map(|(id, _)| id)
    }

    /// Finds a direct child of `parent` named `name`.
    #[must_use]
    pub fn find_child(&self, parent: DeclId, name: &str) -> Option<DeclId> {
        self.children(parent)
            .find(|(_, d)| d.name.as_deref() == Some(name))
            .map(|(id, _)| id)
    }
}
