//! Type resolution.
//!
//! Turns syntactic [`TypeExpr`]s into interned [`TypeId`]s, resolving names
//! through the binder. References to interfaces and classes stay lazy
//! ([`Type::Named`]); their members are expanded into a [`Shape`] only when
//! a relation check needs them. Type aliases are expanded eagerly, except
//! when an alias refers to itself, which yields a deferred reference.

use std::collections::BTreeMap;
use std::sync::Arc;

use parity_language::{
    AccessorKind, DeclKind, DeclarationFile, KeywordType, LiteralType, Modifiers, Param,
    TypeExpr, TypeOperator, TypeParam, normalize_source,
};

use crate::bind::{ScopeId, SymbolId};
use crate::session::{DeclRef, Session, SourceId};
use crate::types::{
    Intrinsic, Literal, ParamType, PropType, Shape, Signature, TupleElem, Type, TypeId,
};

/// Where a type expression is resolved: the source it was written in, the
/// scope its names resolve from, and the type parameters in view.
#[derive(Clone, Debug)]
pub(crate) struct Ctx {
    source: SourceId,
    scope: ScopeId,
    env: Vec<(String, TypeId)>,
}

impl Ctx {
    fn lookup_param(&self, name: &str) -> Option<TypeId> {
        self.env
            .iter()
            .rev()
            .find(|(param, _)| param == name)
            .map(|&(_, ty)| ty)
    }
}

/// A member declaration paired with the context it resolves in.
#[derive(Clone, Debug)]
struct Member {
    decl: DeclRef,
    ctx: Ctx,
}

impl Session {
    // =========================================================================
    // Declaration Types
    // =========================================================================

    /// Returns the type of a group of same-named declarations.
    ///
    /// Callables contribute one signature each; several signatures form an
    /// overload set. Otherwise the first declaration decides the type.
    pub fn type_of_decls(&mut self, decls: &[DeclRef]) -> TypeId {
        let members: Vec<Member> = decls
            .iter()
            .map(|&decl| Member {
                decl,
                ctx: self.context_for(decl),
            })
            .collect();
        self.group_type(&members)
    }

    /// Returns the type of a single declaration.
    pub fn type_of_decl(&mut self, decl: DeclRef) -> TypeId {
        self.type_of_decls(&[decl])
    }

    /// Resolves a type expression written inside `decl`'s scope.
    pub fn resolve_in(&mut self, decl: DeclRef, expr: &TypeExpr) -> TypeId {
        let ctx = self.context_for(decl);
        match self.file(decl.source) {
            Some(file) => self.resolve_type(&ctx, &file, expr),
            None => self.types.intrinsic(Intrinsic::Unknown),
        }
    }

    /// Builds the context of a declaration: its binding scope plus the type
    /// parameters of every enclosing class or interface.
    fn context_for(&mut self, decl: DeclRef) -> Ctx {
        let Some(file) = self.file(decl.source) else {
            return Ctx {
                source: decl.source,
                scope: ScopeId::GLOBAL,
                env: Vec::new(),
            };
        };

        let mut scope = self.binder.scope_of(decl);
        let mut containers = Vec::new();
        let mut current = file.get(decl.decl).and_then(|d| d.parent);
        while let Some(id) = current {
            let Some(parent) = file.get(id) else {
                break;
            };
            if matches!(parent.kind, DeclKind::Class | DeclKind::Interface) {
                containers.push(id);
            }
            if scope.is_none() {
                scope = self.binder.scope_of(DeclRef::new(decl.source, id));
            }
            current = parent.parent;
        }

        let mut ctx = Ctx {
            source: decl.source,
            scope: scope.unwrap_or(ScopeId::GLOBAL),
            env: Vec::new(),
        };
        for id in containers.into_iter().rev() {
            if let Some(container) = file.get(id) {
                self.push_params(&mut ctx, &container.type_params);
            }
        }
        ctx
    }

    fn push_params(&mut self, ctx: &mut Ctx, params: &[TypeParam]) {
        for param in params {
            let position = u32::try_from(ctx.env.len()).unwrap_or(u32::MAX);
            let ty = self.types.intern(Type::Param {
                name: param.name.clone(),
                position,
            });
            ctx.env.push((param.name.clone(), ty));
        }
    }

    /// Binds a declaration's type parameters to concrete arguments.
    fn bind_args(
        &mut self,
        ctx: &mut Ctx,
        file: &DeclarationFile,
        params: &[TypeParam],
        args: &[TypeId],
    ) {
        for (i, param) in params.iter().enumerate() {
            let ty = match (args.get(i), &param.default) {
                (Some(&arg), _) => arg,
                (None, Some(default)) => self.resolve_type(ctx, file, default),
                (None, None) => self.types.intrinsic(Intrinsic::Any),
            };
            ctx.env.push((param.name.clone(), ty));
        }
    }

    fn group_type(&mut self, members: &[Member]) -> TypeId {
        let mut signatures = Vec::new();
        let mut optional = false;
        let mut first = None;
        let mut getter = None;

        for member in members {
            let Some(file) = self.file(member.decl.source) else {
                continue;
            };
            let Some(decl) = file.get(member.decl.decl) else {
                continue;
            };
            optional |= decl.has(Modifiers::OPTIONAL);
            match decl.kind {
                DeclKind::Function | DeclKind::Method | DeclKind::CallSignature => {
                    let sig = self.signature(
                        &member.ctx,
                        &file,
                        &decl.type_params,
                        &decl.params,
                        decl.ty.as_ref(),
                        Intrinsic::Any,
                    );
                    signatures.push(sig);
                }
                DeclKind::Constructor => {
                    let sig = self.signature(
                        &member.ctx,
                        &file,
                        &decl.type_params,
                        &decl.params,
                        None,
                        Intrinsic::Void,
                    );
                    signatures.push(sig);
                }
                DeclKind::Accessor(AccessorKind::Get) if getter.is_none() => {
                    getter = Some(member);
                }
                _ => {}
            }
            if first.is_none() {
                first = Some(member);
            }
        }

        let ty = match signatures.len() {
            0 => match getter.or(first) {
                Some(member) => self.single_decl_type(member),
                None => self.types.intrinsic(Intrinsic::Unknown),
            },
            1 => {
                let sig = signatures.remove(0);
                self.types.intern(Type::Function(sig))
            }
            _ => self.types.intern(Type::Overloads(signatures)),
        };

        if optional {
            self.types.optional(ty)
        } else {
            ty
        }
    }

    fn single_decl_type(&mut self, member: &Member) -> TypeId {
        let Some(file) = self.file(member.decl.source) else {
            return self.types.intrinsic(Intrinsic::Unknown);
        };
        let Some(decl) = file.get(member.decl.decl) else {
            return self.types.intrinsic(Intrinsic::Unknown);
        };
        let ctx = &member.ctx;

        match decl.kind {
            DeclKind::Property | DeclKind::Accessor(_) | DeclKind::IndexSignature => {
                match &decl.ty {
                    Some(ty) => self.resolve_type(ctx, &file, ty),
                    None => self.types.intrinsic(Intrinsic::Any),
                }
            }
            DeclKind::Variable => match (&decl.ty, decl.initializer) {
                (Some(ty), _) => self.resolve_type(ctx, &file, ty),
                (None, Some(init)) => self.literal_initializer(init.text(&file.text)),
                (None, None) => self.types.intrinsic(Intrinsic::Any),
            },
            DeclKind::TypeAlias => {
                let mut ctx = ctx.clone();
                self.push_params(&mut ctx, &decl.type_params);
                match &decl.ty {
                    Some(ty) => self.resolve_type(&ctx, &file, ty),
                    None => self.types.intrinsic(Intrinsic::Unknown),
                }
            }
            DeclKind::ConstructSignature => {
                let sig = self.signature(
                    ctx,
                    &file,
                    &decl.type_params,
                    &decl.params,
                    decl.ty.as_ref(),
                    Intrinsic::Any,
                );
                self.types.intern(Type::Constructor(sig))
            }
            DeclKind::Enum | DeclKind::Class | DeclKind::Interface => {
                match self.binder.symbol_of(member.decl) {
                    Some(symbol) => {
                        let mut ctx = ctx.clone();
                        self.push_params(&mut ctx, &decl.type_params);
                        let args = ctx_params(&ctx, decl.type_params.len());
                        self.types.intern(Type::Named { symbol, args })
                    }
                    None => self.types.intrinsic(Intrinsic::Unknown),
                }
            }
            DeclKind::EnumMember => match (self.binder.symbol_of(member.decl), &decl.name) {
                (Some(symbol), Some(name)) => self.types.intern(Type::EnumMember {
                    symbol,
                    name: name.clone(),
                }),
                _ => self.types.intrinsic(Intrinsic::Number),
            },
            _ => {
                let text = file.normalized_text(member.decl.decl);
                self.types.intern(Type::Opaque(text))
            }
        }
    }

    fn literal_initializer(&mut self, text: &str) -> TypeId {
        let text = text.trim();
        let literal = if let Some(inner) = text
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
        {
            Literal::String(inner.to_string())
        } else if text == "true" || text == "false" {
            Literal::Boolean(text == "true")
        } else if text.parse::<f64>().is_ok() {
            Literal::Number(text.to_string())
        } else {
            return self.types.intrinsic(Intrinsic::Any);
        };
        self.types.intern(Type::Literal(literal))
    }

    fn signature(
        &mut self,
        ctx: &Ctx,
        file: &DeclarationFile,
        type_params: &[TypeParam],
        params: &[Param],
        ret: Option<&TypeExpr>,
        default_ret: Intrinsic,
    ) -> Signature {
        let mut ctx = ctx.clone();
        self.push_params(&mut ctx, type_params);
        let params = params
            .iter()
            .map(|param| ParamType {
                ty: match &param.ty {
                    Some(ty) => self.resolve_type(&ctx, file, ty),
                    None => self.types.intrinsic(Intrinsic::Any),
                },
                optional: param.optional,
                rest: param.rest,
            })
            .collect();
        let ret = match ret {
            Some(ty) => self.resolve_type(&ctx, file, ty),
            None => self.types.intrinsic(default_ret),
        };
        Signature {
            type_params: u32::try_from(type_params.len()).unwrap_or(u32::MAX),
            params,
            ret,
        }
    }

    // =========================================================================
    // Type Expressions
    // =========================================================================

    fn resolve_type(&mut self, ctx: &Ctx, file: &DeclarationFile, expr: &TypeExpr) -> TypeId {
        match expr {
            TypeExpr::Keyword(keyword, _) => self.types.intrinsic(intrinsic(*keyword)),
            TypeExpr::Literal(literal, _) => self.types.intern(Type::Literal(match literal {
                LiteralType::String(s) => Literal::String(s.clone()),
                LiteralType::Number(n) => Literal::Number(n.clone()),
                LiteralType::Boolean(b) => Literal::Boolean(*b),
            })),
            TypeExpr::Reference { name, args, .. } => {
                let args: Vec<TypeId> = args
                    .iter()
                    .map(|arg| self.resolve_type(ctx, file, arg))
                    .collect();
                self.resolve_reference(ctx, name, args)
            }
            TypeExpr::Array(elem, _) => {
                let elem = self.resolve_type(ctx, file, elem);
                self.types.intern(Type::Array {
                    elem,
                    readonly: false,
                })
            }
            TypeExpr::Tuple(elements, _) => {
                let elements = elements
                    .iter()
                    .map(|element| TupleElem {
                        ty: self.resolve_type(ctx, file, &element.ty),
                        optional: element.optional,
                        rest: element.rest,
                    })
                    .collect();
                self.types.intern(Type::Tuple(elements))
            }
            TypeExpr::Union(members, _) => {
                let members: Vec<TypeId> = members
                    .iter()
                    .map(|m| self.resolve_type(ctx, file, m))
                    .collect();
                self.types.union(members)
            }
            TypeExpr::Intersection(members, _) => {
                let members: Vec<TypeId> = members
                    .iter()
                    .map(|m| self.resolve_type(ctx, file, m))
                    .collect();
                self.types.intersection(members)
            }
            TypeExpr::Function(function, _) => {
                let sig = self.signature(
                    ctx,
                    file,
                    &function.type_params,
                    &function.params,
                    Some(&function.ret),
                    Intrinsic::Any,
                );
                self.types.intern(Type::Function(sig))
            }
            TypeExpr::Constructor(function, _) => {
                let sig = self.signature(
                    ctx,
                    file,
                    &function.type_params,
                    &function.params,
                    Some(&function.ret),
                    Intrinsic::Any,
                );
                self.types.intern(Type::Constructor(sig))
            }
            TypeExpr::Object(members, _) => {
                let members: Vec<Member> = members
                    .iter()
                    .map(|&decl| Member {
                        decl: DeclRef::new(ctx.source, decl),
                        ctx: ctx.clone(),
                    })
                    .collect();
                let shape = self.shape_from_members(&members);
                self.types.intern(Type::Object(shape))
            }
            TypeExpr::Paren(inner, _) => self.resolve_type(ctx, file, inner),
            TypeExpr::Operator(TypeOperator::Readonly, inner, _) => {
                let inner = self.resolve_type(ctx, file, inner);
                match &*self.types.get(inner) {
                    Type::Array { elem, .. } => self.types.intern(Type::Array {
                        elem: *elem,
                        readonly: true,
                    }),
                    _ => inner,
                }
            }
            TypeExpr::Query(path, _) => self.resolve_query(ctx, path),
            TypeExpr::Operator(..)
            | TypeExpr::IndexedAccess(..)
            | TypeExpr::Predicate { .. }
            | TypeExpr::Conditional { .. }
            | TypeExpr::Infer(..)
            | TypeExpr::Opaque(_) => {
                let text = normalize_source(file.type_text(expr));
                self.types.intern(Type::Opaque(text))
            }
        }
    }

    fn resolve_reference(&mut self, ctx: &Ctx, name: &[String], args: Vec<TypeId>) -> TypeId {
        if let [single] = name {
            if args.is_empty() {
                if let Some(param) = ctx.lookup_param(single) {
                    return param;
                }
            }
        }

        if let Some(symbol) = self.binder.resolve_path(ctx.scope, name) {
            return self.named_type(symbol, args, name);
        }

        // `Enum.Member`
        if let Some((member, prefix)) = name.split_last() {
            if let Some(symbol) = self.binder.resolve_path(ctx.scope, prefix) {
                if self.symbol_has(symbol, |k| k == DeclKind::Enum) {
                    return self.types.intern(Type::EnumMember {
                        symbol,
                        name: member.clone(),
                    });
                }
            }
        }

        match (name, args.as_slice()) {
            ([single], [elem]) if single == "Array" || single == "ReadonlyArray" => {
                self.types.intern(Type::Array {
                    elem: *elem,
                    readonly: single == "ReadonlyArray",
                })
            }
            _ => self.types.intern(Type::Unresolved {
                name: name.join("."),
                args,
            }),
        }
    }

    fn named_type(&mut self, symbol: SymbolId, args: Vec<TypeId>, name: &[String]) -> TypeId {
        if let Some(alias) = self.symbol_decl(symbol, |k| k == DeclKind::TypeAlias) {
            return self.expand_alias(symbol, alias, args);
        }
        if self.symbol_has(symbol, |k| {
            matches!(k, DeclKind::Class | DeclKind::Interface | DeclKind::Enum)
        }) {
            return self.types.intern(Type::Named { symbol, args });
        }
        self.types.intern(Type::Unresolved {
            name: name.join("."),
            args,
        })
    }

    /// Resolves an alias target with its parameters bound to `args`.
    ///
    /// A reference to an alias already being expanded stays a deferred
    /// [`Type::Named`] so that recursive aliases terminate.
    pub(crate) fn expand_alias(
        &mut self,
        symbol: SymbolId,
        alias: DeclRef,
        args: Vec<TypeId>,
    ) -> TypeId {
        let key = (symbol, args.clone());
        if self.aliasing.contains(&key) {
            return self.types.intern(Type::Named { symbol, args });
        }
        let Some(file) = self.file(alias.source) else {
            return self.types.intrinsic(Intrinsic::Unknown);
        };
        let Some(decl) = file.get(alias.decl) else {
            return self.types.intrinsic(Intrinsic::Unknown);
        };
        let Some(target) = &decl.ty else {
            return self.types.intrinsic(Intrinsic::Unknown);
        };

        self.aliasing.insert(key.clone());
        let mut ctx = self.context_for(alias);
        self.bind_args(&mut ctx, &file, &decl.type_params, &args);
        let ty = self.resolve_type(&ctx, &file, target);
        self.aliasing.remove(&key);
        ty
    }

    fn resolve_query(&mut self, ctx: &Ctx, path: &[String]) -> TypeId {
        let unresolved = |session: &mut Self| {
            session.types.intern(Type::Unresolved {
                name: format!("typeof {}", path.join(".")),
                args: Vec::new(),
            })
        };
        let Some(symbol) = self.binder.resolve_path(ctx.scope, path) else {
            return unresolved(self);
        };
        if self.symbol_has(symbol, |k| k == DeclKind::Class) {
            return self.types.intern(Type::ClassStatic(symbol));
        }
        if self.symbol_has(symbol, |k| k == DeclKind::Enum) {
            return self.types.intern(Type::Named {
                symbol,
                args: Vec::new(),
            });
        }
        if self.querying.contains(&symbol) {
            return unresolved(self);
        }

        let values: Vec<DeclRef> = self
            .binder
            .symbol(symbol)
            .map(|s| {
                s.decls
                    .iter()
                    .copied()
                    .filter(|&d| {
                        self.decl(d)
                            .is_some_and(|d| matches!(d.kind, DeclKind::Variable | DeclKind::Function))
                    })
                    .collect()
            })
            .unwrap_or_default();
        if values.is_empty() {
            return unresolved(self);
        }
        self.querying.insert(symbol);
        let ty = self.type_of_decls(&values);
        self.querying.remove(&symbol);
        ty
    }

    // =========================================================================
    // Shapes
    // =========================================================================

    /// Returns the members of an object-like type, or `None` for types
    /// without members (primitives, parameters, unresolved names).
    pub(crate) fn shape_of(&mut self, ty: TypeId) -> Option<Arc<Shape>> {
        if let Some(shape) = self.shapes.get(&ty) {
            return Some(Arc::clone(shape));
        }
        if self.expanding.contains(&ty) {
            return Some(Arc::new(Shape::default()));
        }

        let shape = match &*self.types.get(ty) {
            Type::Object(shape) => shape.clone(),
            Type::Function(sig) => Shape {
                calls: vec![sig.clone()],
                ..Shape::default()
            },
            Type::Overloads(sigs) => Shape {
                calls: sigs.clone(),
                ..Shape::default()
            },
            Type::Constructor(sig) => Shape {
                constructs: vec![sig.clone()],
                ..Shape::default()
            },
            Type::Named { symbol, args } => {
                let (symbol, args) = (*symbol, args.clone());
                if let Some(alias) = self.symbol_decl(symbol, |k| k == DeclKind::TypeAlias) {
                    let expanded = self.expand_alias(symbol, alias, args);
                    if expanded == ty {
                        return None;
                    }
                    return self.shape_of(expanded);
                }
                if !self.symbol_has(symbol, |k| matches!(k, DeclKind::Class | DeclKind::Interface)) {
                    return None;
                }
                self.expanding.insert(ty);
                let shape = self.instance_shape(symbol, &args);
                self.expanding.remove(&ty);
                shape
            }
            Type::ClassStatic(symbol) => {
                let symbol = *symbol;
                self.expanding.insert(ty);
                let shape = self.static_shape(symbol);
                self.expanding.remove(&ty);
                shape
            }
            Type::Intersection(members) => {
                let members = members.clone();
                let mut merged = Shape::default();
                for member in members {
                    let part = self.shape_of(member)?;
                    for (name, prop) in &part.props {
                        match merged.props.get(name).cloned() {
                            Some(existing) => {
                                let ty = self.types.intersection([existing.ty, prop.ty]);
                                merged.props.insert(
                                    name.clone(),
                                    PropType {
                                        ty,
                                        optional: existing.optional && prop.optional,
                                    },
                                );
                            }
                            None => {
                                merged.props.insert(name.clone(), prop.clone());
                            }
                        }
                    }
                    merged.calls.extend(part.calls.iter().cloned());
                    merged.constructs.extend(part.constructs.iter().cloned());
                    merged.string_index = merged.string_index.or(part.string_index);
                    merged.number_index = merged.number_index.or(part.number_index);
                    for &base in &part.unknown_bases {
                        merged.add_unknown_base(base);
                    }
                }
                merged
            }
            _ => return None,
        };

        let shape = Arc::new(shape);
        self.shapes.insert(ty, Arc::clone(&shape));
        Some(shape)
    }

    fn instance_shape(&mut self, symbol: SymbolId, args: &[TypeId]) -> Shape {
        let mut members = Vec::new();
        let mut bases = Vec::new();

        for decl_ref in self.symbol_decls(symbol) {
            let Some(file) = self.file(decl_ref.source) else {
                continue;
            };
            let Some(decl) = file.get(decl_ref.decl) else {
                continue;
            };
            if !matches!(decl.kind, DeclKind::Class | DeclKind::Interface) {
                continue;
            }
            let mut ctx = self.context_for(decl_ref);
            self.bind_args(&mut ctx, &file, &decl.type_params, args);
            for (id, child) in file.children(decl_ref.decl) {
                if child.has(Modifiers::STATIC) || child.kind == DeclKind::Constructor {
                    continue;
                }
                members.push(Member {
                    decl: DeclRef::new(decl_ref.source, id),
                    ctx: ctx.clone(),
                });
            }
            for base in &decl.extends {
                bases.push(self.resolve_type(&ctx, &file, base));
            }
        }

        let mut shape = self.shape_from_members(&members);
        for base in bases {
            match self.shape_of(base) {
                Some(base_shape) => shape.inherit(&base_shape),
                None => shape.add_unknown_base(base),
            }
        }
        shape
    }

    fn static_shape(&mut self, symbol: SymbolId) -> Shape {
        let mut members = Vec::new();
        let mut constructs = Vec::new();
        let mut bases = Vec::new();
        let mut unknown_bases = Vec::new();

        for decl_ref in self.symbol_decls(symbol) {
            let Some(file) = self.file(decl_ref.source) else {
                continue;
            };
            let Some(decl) = file.get(decl_ref.decl) else {
                continue;
            };
            if decl.kind != DeclKind::Class {
                continue;
            }
            let mut ctx = self.context_for(decl_ref);
            self.push_params(&mut ctx, &decl.type_params);
            let args = ctx_params(&ctx, decl.type_params.len());
            let instance = self.types.intern(Type::Named { symbol, args });

            for (id, child) in file.children(decl_ref.decl) {
                if child.kind == DeclKind::Constructor {
                    let mut sig = self.signature(
                        &ctx,
                        &file,
                        &child.type_params,
                        &child.params,
                        None,
                        Intrinsic::Void,
                    );
                    sig.type_params = u32::try_from(decl.type_params.len()).unwrap_or(u32::MAX);
                    sig.ret = instance;
                    constructs.push(sig);
                } else if child.has(Modifiers::STATIC) {
                    members.push(Member {
                        decl: DeclRef::new(decl_ref.source, id),
                        ctx: ctx.clone(),
                    });
                }
            }
            for base in &decl.extends {
                let base = self.resolve_type(&ctx, &file, base);
                let static_side = match &*self.types.get(base) {
                    Type::Named { symbol, .. } => Some(*symbol),
                    _ => None,
                };
                match static_side {
                    Some(base_symbol) => {
                        bases.push(self.types.intern(Type::ClassStatic(base_symbol)));
                    }
                    None => unknown_bases.push(base),
                }
            }
            if constructs.is_empty() && decl.extends.is_empty() {
                constructs.push(Signature {
                    type_params: u32::try_from(decl.type_params.len()).unwrap_or(u32::MAX),
                    params: Vec::new(),
                    ret: instance,
                });
            }
        }

        let mut shape = self.shape_from_members(&members);
        shape.constructs = constructs;
        for base in bases {
            match self.shape_of(base) {
                Some(base_shape) => shape.inherit(&base_shape),
                None => shape.add_unknown_base(base),
            }
        }
        for base in unknown_bases {
            shape.add_unknown_base(base);
        }
        shape
    }

    fn shape_from_members(&mut self, members: &[Member]) -> Shape {
        let mut shape = Shape::default();
        let mut named: BTreeMap<String, Vec<Member>> = BTreeMap::new();

        for member in members {
            let Some(file) = self.file(member.decl.source) else {
                continue;
            };
            let Some(decl) = file.get(member.decl.decl) else {
                continue;
            };
            if decl.has(Modifiers::PRIVATE) || decl.has(Modifiers::PROTECTED) {
                continue;
            }
            match decl.kind {
                DeclKind::CallSignature => {
                    let sig = self.signature(
                        &member.ctx,
                        &file,
                        &decl.type_params,
                        &decl.params,
                        decl.ty.as_ref(),
                        Intrinsic::Any,
                    );
                    shape.calls.push(sig);
                }
                DeclKind::ConstructSignature => {
                    let sig = self.signature(
                        &member.ctx,
                        &file,
                        &decl.type_params,
                        &decl.params,
                        decl.ty.as_ref(),
                        Intrinsic::Any,
                    );
                    shape.constructs.push(sig);
                }
                DeclKind::IndexSignature => {
                    let value = match &decl.ty {
                        Some(ty) => self.resolve_type(&member.ctx, &file, ty),
                        None => self.types.intrinsic(Intrinsic::Any),
                    };
                    let numeric = decl.params.first().and_then(|p| p.ty.as_ref()).is_some_and(
                        |key| matches!(key, TypeExpr::Keyword(KeywordType::Number, _)),
                    );
                    if numeric {
                        shape.number_index = Some(value);
                    } else {
                        shape.string_index = Some(value);
                    }
                }
                _ => {
                    if let Some(name) = &decl.name {
                        if !name.starts_with('#') {
                            named.entry(name.clone()).or_default().push(member.clone());
                        }
                    }
                }
            }
        }

        for (name, group) in named {
            let optional = group.iter().any(|m| {
                self.decl(m.decl)
                    .is_some_and(|d| d.has(Modifiers::OPTIONAL))
            });
            let ty = self.group_type(&group);
            shape.props.insert(name, PropType { ty, optional });
        }
        shape
    }

    // =========================================================================
    // Symbol Helpers
    // =========================================================================

    fn symbol_decls(&self, symbol: SymbolId) -> Vec<DeclRef> {
        self.binder
            .symbol(symbol)
            .map(|s| s.decls.clone())
            .unwrap_or_default()
    }

    fn symbol_decl(&self, symbol: SymbolId, pred: impl Fn(DeclKind) -> bool) -> Option<DeclRef> {
        self.binder
            .symbol(symbol)?
            .decls
            .iter()
            .copied()
            .find(|&d| self.decl(d).is_some_and(|d| pred(d.kind)))
    }

    fn symbol_has(&self, symbol: SymbolId, pred: impl Fn(DeclKind) -> bool) -> bool {
        self.symbol_decl(symbol, pred).is_some()
    }

    /// Returns true if the symbol names an enum.
    pub(crate) fn is_enum(&self, symbol: SymbolId) -> bool {
        self.symbol_has(symbol, |k| k == DeclKind::Enum)
    }

    /// Returns the member names of an enum symbol, sorted.
    pub(crate) fn enum_members(&self, symbol: SymbolId) -> Vec<String> {
        let mut names: Vec<String> = self
            .symbol_decls(symbol)
            .into_iter()
            .filter_map(|d| {
                let file = self.source(d.source)?;
                let decl = file.get(d.decl)?;
                (decl.kind == DeclKind::Enum).then(|| {
                    file.children(d.decl)
                        .filter_map(|(_, member)| member.name.clone())
                        .collect::<Vec<_>>()
                })
            })
            .flatten()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Returns the last `count` parameters in view, as type arguments.
fn ctx_params(ctx: &Ctx, count: usize) -> Vec<TypeId> {
    let start = ctx.env.len().saturating_sub(count);
    ctx.env[start..].iter().map(|&(_, ty)| ty).collect()
}

const fn intrinsic(keyword: KeywordType) -> Intrinsic {
    match keyword {
        KeywordType::Any => Intrinsic::Any,
        KeywordType::Unknown => Intrinsic::Unknown,
        KeywordType::Never => Intrinsic::Never,
        KeywordType::Void => Intrinsic::Void,
        KeywordType::Undefined => Intrinsic::Undefined,
        KeywordType::Null => Intrinsic::Null,
        KeywordType::String => Intrinsic::String,
        KeywordType::Number => Intrinsic::Number,
        KeywordType::Boolean => Intrinsic::Boolean,
        KeywordType::BigInt => Intrinsic::BigInt,
        KeywordType::Symbol => Intrinsic::Symbol,
        KeywordType::Object => Intrinsic::Object,
        KeywordType::This => Intrinsic::This,
    }
}
