//! Semantic types.
//!
//! Types are interned in a per-session [`TypeTable`]: structurally equal
//! types share one [`TypeId`], so identity comparison is a cheap first step
//! of every relation check. A `TypeId` means nothing outside the session
//! that produced it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::bind::SymbolId;

/// Interned type handle, valid only inside its session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

impl TypeId {
    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Built-in primitive and top/bottom types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Intrinsic {
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

impl Intrinsic {
    /// Returns true for types that admit every value.
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::Any | Self::Unknown)
    }

    /// Returns true for primitive value types.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Number
                | Self::Boolean
                | Self::BigInt
                | Self::Symbol
                | Self::Undefined
                | Self::Null
                | Self::Void
        )
    }
}

/// A literal type value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    /// String literal.
    String(String),
    /// Numeric literal, as written.
    Number(String),
    /// `true` or `false`.
    Boolean(bool),
}

impl Literal {
    /// Returns the primitive this literal widens to.
    #[must_use]
    pub const fn widened(&self) -> Intrinsic {
        match self {
            Self::String(_) => Intrinsic::String,
            Self::Number(_) => Intrinsic::Number,
            Self::Boolean(_) => Intrinsic::Boolean,
        }
    }
}

/// One parameter of a signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamType {
    /// Declared type (`any` when unannotated).
    pub ty: TypeId,
    /// `x?` or has a default.
    pub optional: bool,
    /// `...x`; `ty` is then the array type.
    pub rest: bool,
}

/// A call or construct signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Number of type parameters.
    pub type_params: u32,
    /// Parameters in order.
    pub params: Vec<ParamType>,
    /// Return type.
    pub ret: TypeId,
}

impl Signature {
    /// Number of parameters a caller must pass.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.params
            .iter()
            .filter(|p| !p.optional && !p.rest)
            .count()
    }

    /// Returns true if the last parameter is a rest parameter.
    #[must_use]
    pub fn has_rest(&self) -> bool {
        self.params.last().is_some_and(|p| p.rest)
    }
}

/// A property of an object shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropType {
    /// Property type; optional properties include `undefined`.
    pub ty: TypeId,
    /// Declared with `?`.
    pub optional: bool,
}

/// The members of an object type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Named properties, methods, and accessors.
    pub props: BTreeMap<String, PropType>,
    /// Call signatures.
    pub calls: Vec<Signature>,
    /// Construct signatures.
    pub constructs: Vec<Signature>,
    /// `[key: string]: T`
    pub string_index: Option<TypeId>,
    /// `[key: number]: T`
    pub number_index: Option<TypeId>,
    /// Base types whose members are unknown, with type arguments
    /// substituted. Only the bases themselves can be compared.
    pub unknown_bases: Vec<TypeId>,
}

impl Shape {
    /// Fills in members of `base` that this shape does not declare.
    pub fn inherit(&mut self, base: &Shape) {
        for (name, prop) in &base.props {
            self.props
                .entry(name.clone())
                .or_insert_with(|| prop.clone());
        }
        if self.calls.is_empty() {
            self.calls.clone_from(&base.calls);
        }
        if self.constructs.is_empty() {
            self.constructs.clone_from(&base.constructs);
        }
        self.string_index = self.string_index.or(base.string_index);
        self.number_index = self.number_index.or(base.number_index);
        for &unknown in &base.unknown_bases {
            if !self.unknown_bases.contains(&unknown) {
                self.unknown_bases.push(unknown);
            }
        }
    }

    /// Records a base type whose members cannot be expanded.
    pub fn add_unknown_base(&mut self, base: TypeId) {
        if !self.unknown_bases.contains(&base) {
            self.unknown_bases.push(base);
        }
    }
}

/// One element of a tuple type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElem {
    /// Element type.
    pub ty: TypeId,
    /// `T?`
    pub optional: bool,
    /// `...T`
    pub rest: bool,
}

/// A semantic type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Primitive, top, or bottom type.
    Intrinsic(Intrinsic),
    /// Literal type.
    Literal(Literal),
    /// Reference to a declared interface, class, alias, or enum.
    Named {
        /// The referenced symbol.
        symbol: SymbolId,
        /// Type arguments.
        args: Vec<TypeId>,
    },
    /// One member of an enum.
    EnumMember {
        /// The enum symbol.
        symbol: SymbolId,
        /// Member name.
        name: String,
    },
    /// The static side of a class (`typeof C`).
    ClassStatic(SymbolId),
    /// A type parameter, identified by its position in the enclosing scopes.
    Param {
        /// Declared name.
        name: String,
        /// Position across all enclosing type parameter lists.
        position: u32,
    },
    /// `T[]` or `readonly T[]`
    Array {
        /// Element type.
        elem: TypeId,
        /// Declared readonly.
        readonly: bool,
    },
    /// `[A, B?, ...C]`
    Tuple(Vec<TupleElem>),
    /// Flattened, deduplicated, sorted union.
    Union(Vec<TypeId>),
    /// Flattened, deduplicated, sorted intersection.
    Intersection(Vec<TypeId>),
    /// A single call signature.
    Function(Signature),
    /// Several call signatures declared under one name.
    Overloads(Vec<Signature>),
    /// A single construct signature.
    Constructor(Signature),
    /// Anonymous object type.
    Object(Shape),
    /// A reference that did not resolve to any declaration.
    Unresolved {
        /// Dotted name as written.
        name: String,
        /// Type arguments.
        args: Vec<TypeId>,
    },
    /// A construct the checker does not model, by normalized text.
    Opaque(String),
}

// =============================================================================
// Type Table
// =============================================================================

/// Interning arena for types.
#[derive(Debug, Default)]
pub struct TypeTable {
    types: Vec<Arc<Type>>,
    index: HashMap<Arc<Type>, TypeId>,
}

impl TypeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a type, returning the existing id for an equal type.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.index.get(&ty) {
            return id;
        }
        let id = TypeId(u32::try_from(self.types.len()).unwrap_or(u32::MAX));
        let ty = Arc::new(ty);
        self.types.push(Arc::clone(&ty));
        self.index.insert(ty, id);
        id
    }

    /// Gets a type by id.
    ///
    /// Ids from another table yield `unknown`.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Arc<Type> {
        self.types
            .get(id.index())
            .cloned()
            .unwrap_or_else(|| Arc::new(Type::Intrinsic(Intrinsic::Unknown)))
    }

    /// Returns the number of interned types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Interns an intrinsic.
    pub fn intrinsic(&mut self, intrinsic: Intrinsic) -> TypeId {
        self.intern(Type::Intrinsic(intrinsic))
    }

    /// Builds a canonical union: nested unions are flattened, `never` is
    /// dropped, members are deduplicated and sorted.
    pub fn union(&mut self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let never = self.intrinsic(Intrinsic::Never);
        let mut flat = Vec::new();
        for member in members {
            match &*self.get(member) {
                Type::Union(inner) => flat.extend(inner.iter().copied()),
                _ if member == never => {}
                _ => flat.push(member),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => never,
            1 => flat[0],
            _ => self.intern(Type::Union(flat)),
        }
    }

    /// Builds a canonical intersection.
    pub fn intersection(&mut self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut flat = Vec::new();
        for member in members {
            match &*self.get(member) {
                Type::Intersection(inner) => flat.extend(inner.iter().copied()),
                _ => flat.push(member),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => self.intrinsic(Intrinsic::Unknown),
            1 => flat[0],
            _ => self.intern(Type::Intersection(flat)),
        }
    }

    /// Returns `ty | undefined`.
    pub fn optional(&mut self, ty: TypeId) -> TypeId {
        let undefined = self.intrinsic(Intrinsic::Undefined);
        self.union([ty, undefined])
    }
}
