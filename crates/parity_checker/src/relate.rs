//! Assignability.
//!
//! [`Session::relate`] answers whether a value of one type may be used where
//! another is expected. The check is structural: object types relate when
//! the target's members are all present in the source with related types.
//!
//! Recursive types are handled coinductively. A pair under examination is
//! assumed related until its structural check completes, so a cycle back to
//! the same pair succeeds instead of looping. Past the session's depth limit
//! a check gives up with [`Verdict::Undecidable`].

use std::collections::HashMap;
use std::fmt;

use crate::bind::SymbolId;
use crate::session::Session;
use crate::types::{Intrinsic, Shape, Signature, TupleElem, Type, TypeId};

/// The outcome of a relation check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The source type is assignable to the target.
    Related,
    /// The source type is not assignable to the target.
    Unrelated,
    /// The checker cannot decide, for example because a name did not
    /// resolve or the depth limit was reached.
    Undecidable,
}

impl Verdict {
    /// Returns true for [`Verdict::Related`].
    #[must_use]
    pub const fn is_related(self) -> bool {
        matches!(self, Self::Related)
    }

    /// Conjunction: unrelated wins, then undecidable.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unrelated, _) | (_, Self::Unrelated) => Self::Unrelated,
            (Self::Undecidable, _) | (_, Self::Undecidable) => Self::Undecidable,
            _ => Self::Related,
        }
    }

    /// Disjunction: related wins, then undecidable.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Related, _) | (_, Self::Related) => Self::Related,
            (Self::Undecidable, _) | (_, Self::Undecidable) => Self::Undecidable,
            _ => Self::Unrelated,
        }
    }

    const fn from_bool(related: bool) -> Self {
        if related { Self::Related } else { Self::Unrelated }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Related => "related",
            Self::Unrelated => "unrelated",
            Self::Undecidable => "undecidable",
        })
    }
}

impl Session {
    /// Checks whether `source` is assignable to `target`.
    ///
    /// Answers are memoized per session.
    pub fn relate(&mut self, source: TypeId, target: TypeId) -> Verdict {
        if let Some(&verdict) = self.memo.get(&(source, target)) {
            return verdict;
        }
        let verdict = Relater::new(self).relate(source, target, 0);
        self.memo.insert((source, target), verdict);
        verdict
    }

    /// Checks assignability in both directions.
    pub fn relate_mutual(&mut self, a: TypeId, b: TypeId) -> Verdict {
        let forward = self.relate(a, b);
        if forward == Verdict::Unrelated {
            return forward;
        }
        forward.and(self.relate(b, a))
    }
}

// =============================================================================
// Relater
// =============================================================================

/// State of one top-level relation query.
struct Relater<'s> {
    session: &'s mut Session,
    /// Pairs under examination or already answered in this query.
    assumed: HashMap<(TypeId, TypeId), Verdict>,
    max_depth: usize,
    strict_null_checks: bool,
}

impl<'s> Relater<'s> {
    fn new(session: &'s mut Session) -> Self {
        let options = session.options();
        Self {
            session,
            assumed: HashMap::new(),
            max_depth: options.max_depth,
            strict_null_checks: options.strict_null_checks,
        }
    }

    fn relate(&mut self, source: TypeId, target: TypeId, depth: usize) -> Verdict {
        if source == target {
            return Verdict::Related;
        }
        if depth > self.max_depth {
            return Verdict::Undecidable;
        }
        let key = (source, target);
        if let Some(&verdict) = self.session.memo.get(&key) {
            return verdict;
        }
        if let Some(&verdict) = self.assumed.get(&key) {
            return verdict;
        }
        self.assumed.insert(key, Verdict::Related);
        let verdict = self.structural(source, target, depth + 1);
        self.assumed.insert(key, verdict);
        verdict
    }

    fn all(
        &mut self,
        items: impl IntoIterator<Item = (TypeId, TypeId)>,
        depth: usize,
    ) -> Verdict {
        let mut verdict = Verdict::Related;
        for (s, t) in items {
            verdict = verdict.and(self.relate(s, t, depth));
            if verdict == Verdict::Unrelated {
                break;
            }
        }
        verdict
    }

    fn any(
        &mut self,
        items: impl IntoIterator<Item = (TypeId, TypeId)>,
        depth: usize,
    ) -> Verdict {
        let mut verdict = Verdict::Unrelated;
        for (s, t) in items {
            verdict = verdict.or(self.relate(s, t, depth));
            if verdict == Verdict::Related {
                break;
            }
        }
        verdict
    }

    #[allow(clippy::too_many_lines)]
    fn structural(&mut self, source: TypeId, target: TypeId, depth: usize) -> Verdict {
        let s = self.session.types.get(source);
        let t = self.session.types.get(target);

        // Top and bottom.
        if let Type::Intrinsic(i) = &*t {
            if i.is_top() {
                return Verdict::Related;
            }
        }
        if matches!(&*s, Type::Intrinsic(Intrinsic::Any | Intrinsic::Never)) {
            return Verdict::Related;
        }
        if !self.strict_null_checks
            && matches!(&*s, Type::Intrinsic(Intrinsic::Null | Intrinsic::Undefined))
        {
            return Verdict::Related;
        }

        // Aliases are transparent.
        if let Some(expanded) = self.expand_alias(source) {
            return self.relate(expanded, target, depth);
        }
        if let Some(expanded) = self.expand_alias(target) {
            return self.relate(source, expanded, depth);
        }

        // Unions and intersections.
        if let Type::Union(members) = &*s {
            return self.all(members.iter().map(|&m| (m, target)), depth);
        }
        if let Type::Intersection(members) = &*t {
            return self.all(members.iter().map(|&m| (source, m)), depth);
        }
        if let Type::Union(members) = &*t {
            return self.any(members.iter().map(|&m| (source, m)), depth);
        }
        if let Type::Intersection(members) = &*s {
            let verdict = self.any(members.iter().map(|&m| (m, target)), depth);
            if verdict.is_related() {
                return verdict;
            }
            return verdict.or(self.relate_objects(source, target, depth));
        }

        match (&*s, &*t) {
            // Unmodeled types only relate to themselves, which identity covers.
            (
                Type::Unresolved { name: a, args: xs },
                Type::Unresolved { name: b, args: ys },
            ) => {
                if a == b && xs.len() == ys.len() {
                    self.all(xs.iter().copied().zip(ys.iter().copied()), depth)
                } else {
                    Verdict::Undecidable
                }
            }
            (Type::Unresolved { .. } | Type::Opaque(_), _)
            | (_, Type::Unresolved { .. } | Type::Opaque(_))
            | (Type::Intrinsic(Intrinsic::This), _)
            | (_, Type::Intrinsic(Intrinsic::This)) => Verdict::Undecidable,

            (Type::Intrinsic(a), Type::Intrinsic(b)) => Verdict::from_bool(
                a == b || (*a == Intrinsic::Undefined && *b == Intrinsic::Void),
            ),
            (Type::Literal(literal), Type::Intrinsic(i)) => {
                Verdict::from_bool(literal.widened() == *i)
            }

            // Enums.
            (Type::EnumMember { .. }, Type::Intrinsic(Intrinsic::Number)) => Verdict::Related,
            (
                Type::EnumMember { symbol: a, name: x },
                Type::EnumMember { symbol: b, name: y },
            ) => Verdict::from_bool(x == y && self.enums_equivalent(*a, *b)),
            (Type::EnumMember { symbol: a, .. }, Type::Named { symbol: b, .. })
                if self.session.is_enum(*b) =>
            {
                Verdict::from_bool(self.enums_equivalent(*a, *b))
            }
            (Type::Named { symbol: a, .. }, Type::Named { symbol: b, .. })
                if self.session.is_enum(*a) || self.session.is_enum(*b) =>
            {
                Verdict::from_bool(self.enums_equivalent(*a, *b))
            }
            (Type::Named { symbol, .. }, Type::Intrinsic(Intrinsic::Number))
            | (Type::Intrinsic(Intrinsic::Number), Type::Named { symbol, .. })
                if self.session.is_enum(*symbol) =>
            {
                Verdict::Related
            }
            (Type::Named { symbol, .. }, _) | (_, Type::Named { symbol, .. })
                if self.session.is_enum(*symbol) =>
            {
                Verdict::Unrelated
            }

            (Type::Param { .. }, _) | (_, Type::Param { .. }) => Verdict::Unrelated,

            (_, Type::Intrinsic(Intrinsic::Object)) => Verdict::from_bool(matches!(
                &*s,
                Type::Named { .. }
                    | Type::ClassStatic(_)
                    | Type::Object(_)
                    | Type::Array { .. }
                    | Type::Tuple(_)
                    | Type::Function(_)
                    | Type::Overloads(_)
                    | Type::Constructor(_)
            )),

            // Arrays and tuples.
            (
                Type::Array {
                    elem: a,
                    readonly: ra,
                },
                Type::Array {
                    elem: b,
                    readonly: rb,
                },
            ) => {
                if *ra && !*rb {
                    Verdict::Unrelated
                } else {
                    self.relate(*a, *b, depth)
                }
            }
            (Type::Tuple(elements), Type::Array { elem, .. }) => {
                let elem = *elem;
                let pairs: Vec<_> = elements
                    .iter()
                    .map(|e| (self.element_type(e), elem))
                    .collect();
                self.all(pairs, depth)
            }
            (Type::Tuple(a), Type::Tuple(b)) => self.relate_tuples(a, b, depth),
            (Type::Array { .. }, Type::Tuple(_)) => Verdict::Unrelated,

            (Type::Intrinsic(_) | Type::Literal(_), _) | (_, Type::Intrinsic(_) | Type::Literal(_)) => {
                // An empty object type accepts any non-nullish value.
                if matches!(&*s, Type::Intrinsic(Intrinsic::Null | Intrinsic::Undefined | Intrinsic::Void)) {
                    return Verdict::Unrelated;
                }
                match self.session.shape_of(target) {
                    Some(shape) if is_empty_shape(&shape) => Verdict::Related,
                    _ => Verdict::Unrelated,
                }
            }

            _ => {
                if let (
                    Type::Named {
                        symbol: a,
                        args: xs,
                    },
                    Type::Named {
                        symbol: b,
                        args: ys,
                    },
                ) = (&*s, &*t)
                {
                    if a == b && xs.len() == ys.len() {
                        let verdict =
                            self.all(xs.iter().copied().zip(ys.iter().copied()), depth);
                        if verdict.is_related() {
                            return verdict;
                        }
                    }
                }
                self.relate_objects(source, target, depth)
            }
        }
    }

    /// Expands a deferred alias reference.
    fn expand_alias(&mut self, ty: TypeId) -> Option<TypeId> {
        let named = self.session.types.get(ty);
        let Type::Named { symbol, args } = &*named else {
            return None;
        };
        let alias = self
            .session
            .binder
            .symbol(*symbol)?
            .decls
            .iter()
            .copied()
            .find(|&d| {
                self.session
                    .decl(d)
                    .is_some_and(|d| d.kind == parity_language::DeclKind::TypeAlias)
            })?;
        let expanded = self.session.expand_alias(*symbol, alias, args.clone());
        (expanded != ty).then_some(expanded)
    }

    fn enums_equivalent(&self, a: SymbolId, b: SymbolId) -> bool {
        if a == b {
            return true;
        }
        let binder = self.session.binder();
        let same_name = match (binder.symbol(a), binder.symbol(b)) {
            (Some(x), Some(y)) => x.name == y.name,
            _ => false,
        };
        same_name && self.session.enum_members(a) == self.session.enum_members(b)
    }

    fn element_type(&self, element: &TupleElem) -> TypeId {
        if element.rest {
            if let Type::Array { elem, .. } = &*self.session.types.get(element.ty) {
                return *elem;
            }
        }
        element.ty
    }

    fn relate_tuples(&mut self, source: &[TupleElem], target: &[TupleElem], depth: usize) -> Verdict {
        let source_rest = source.iter().any(|e| e.rest);
        let target_rest = target.iter().any(|e| e.rest);
        let source_fixed = source.iter().filter(|e| !e.rest).count();
        let target_fixed = target.iter().filter(|e| !e.rest).count();
        let target_required = target.iter().filter(|e| !e.optional && !e.rest).count();

        if (source_rest && !target_rest)
            || source_fixed < target_required
            || (source_fixed > target_fixed && !target_rest)
        {
            return Verdict::Unrelated;
        }
        let pairs: Vec<_> = source
            .iter()
            .zip(target)
            .map(|(s, t)| (self.element_type(s), self.element_type(t)))
            .collect();
        self.all(pairs, depth)
    }

    // =========================================================================
    // Objects and Signatures
    // =========================================================================

    fn relate_objects(&mut self, source: TypeId, target: TypeId, depth: usize) -> Verdict {
        let Some(target_shape) = self.session.shape_of(target) else {
            return Verdict::Unrelated;
        };
        let Some(source_shape) = self.session.shape_of(source) else {
            return Verdict::from_bool(is_empty_shape(&target_shape));
        };
        self.relate_shapes(&source_shape, &target_shape, depth)
    }

    fn relate_shapes(&mut self, source: &Shape, target: &Shape, depth: usize) -> Verdict {
        let mut verdict =
            self.relate_unknown_bases(&source.unknown_bases, &target.unknown_bases, depth);
        if verdict == Verdict::Unrelated {
            return verdict;
        }

        for (name, target_prop) in &target.props {
            match source.props.get(name) {
                Some(source_prop) => {
                    verdict = verdict.and(self.relate(source_prop.ty, target_prop.ty, depth));
                }
                None if target_prop.optional => {}
                None => return Verdict::Unrelated,
            }
            if verdict == Verdict::Unrelated {
                return verdict;
            }
        }

        verdict = verdict.and(self.relate_signature_sets(&source.calls, &target.calls, depth));
        if verdict == Verdict::Unrelated {
            return verdict;
        }
        verdict = verdict.and(self.relate_signature_sets(
            &source.constructs,
            &target.constructs,
            depth,
        ));
        if verdict == Verdict::Unrelated {
            return verdict;
        }

        if let Some(index) = target.string_index {
            let mut pairs: Vec<_> = source.props.values().map(|p| (p.ty, index)).collect();
            if let Some(source_index) = source.string_index {
                pairs.push((source_index, index));
            }
            verdict = verdict.and(self.all(pairs, depth));
        }
        if let Some(index) = target.number_index {
            if let Some(source_index) = source.number_index.or(source.string_index) {
                verdict = verdict.and(self.relate(source_index, index, depth));
            }
        }
        verdict
    }

    /// Every unknown target base must be matched by an unknown source base.
    ///
    /// Unknown bases relate by name and type arguments only. A target base
    /// the source does not mention could still be satisfied by members the
    /// source declares itself, so that case is undecidable.
    fn relate_unknown_bases(
        &mut self,
        source: &[TypeId],
        target: &[TypeId],
        depth: usize,
    ) -> Verdict {
        let mut verdict = Verdict::Related;
        for &target_base in target {
            let matched = if source.is_empty() {
                Verdict::Undecidable
            } else {
                self.any(source.iter().map(|&s| (s, target_base)), depth)
            };
            verdict = verdict.and(matched);
            if verdict == Verdict::Unrelated {
                break;
            }
        }
        verdict
    }

    /// Every target signature must be matched by some source signature.
    fn relate_signature_sets(
        &mut self,
        source: &[Signature],
        target: &[Signature],
        depth: usize,
    ) -> Verdict {
        let mut verdict = Verdict::Related;
        for target_sig in target {
            let mut matched = Verdict::Unrelated;
            for source_sig in source {
                matched = matched.or(self.relate_signatures(source_sig, target_sig, depth));
                if matched.is_related() {
                    break;
                }
            }
            verdict = verdict.and(matched);
            if verdict == Verdict::Unrelated {
                break;
            }
        }
        verdict
    }

    /// Parameters compare bivariantly; a `void` target return accepts any
    /// source return.
    fn relate_signatures(&mut self, source: &Signature, target: &Signature, depth: usize) -> Verdict {
        if !target.has_rest() && source.required_count() > target.params.len() {
            return Verdict::Unrelated;
        }

        let mut verdict = Verdict::Related;
        let count = source.params.len().max(target.params.len());
        for i in 0..count {
            let (Some(s), Some(t)) = (self.param_at(source, i), self.param_at(target, i)) else {
                continue;
            };
            let param = self.relate(t, s, depth);
            let param = if param.is_related() {
                param
            } else {
                param.or(self.relate(s, t, depth))
            };
            verdict = verdict.and(param);
            if verdict == Verdict::Unrelated {
                return verdict;
            }
        }

        let void = self.session.types.intrinsic(Intrinsic::Void);
        if target.ret == void {
            return verdict;
        }
        verdict.and(self.relate(source.ret, target.ret, depth))
    }

    /// Returns the type accepted at argument position `i`.
    fn param_at(&self, sig: &Signature, i: usize) -> Option<TypeId> {
        match sig.params.get(i) {
            Some(param) if !param.rest => Some(param.ty),
            _ => {
                let last = sig.params.last().filter(|p| p.rest)?;
                match &*self.session.types.get(last.ty) {
                    Type::Array { elem, .. } => Some(*elem),
                    _ => Some(last.ty),
                }
            }
        }
    }
}

fn is_empty_shape(shape: &Shape) -> bool {
    shape.props.is_empty()
        && shape.calls.is_empty()
        && shape.constructs.is_empty()
        && shape.string_index.is_none()
        && shape.number_index.is_none()
        && shape.unknown_bases.is_empty()
}
