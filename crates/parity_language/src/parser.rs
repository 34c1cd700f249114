//! Parser for declaration sources.
//!
//! The parser converts a token stream into a [`DeclarationFile`]. It covers
//! the ambient subset of the language: modules and namespaces, classes,
//! interfaces, functions, variables, type aliases, enums, and the full type
//! expression grammar. Function bodies and initializers are skipped as
//! balanced token runs; mapped, template literal, and import types become
//! [`TypeExpr::Opaque`].

use parity_foundation::{Error, ErrorContext, ErrorKind, Result};

use crate::ast::{
    AccessorKind, Decl, DeclId, DeclKind, DeclarationFile, FunctionType, KeywordType, LiteralType,
    Modifiers, ModuleKind, Param, TupleElement, TypeExpr, TypeOperator, TypeParam,
};
use crate::doc::DocComment;
use crate::lexer::Lexer;
use crate::normalize::normalize_source;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Keywords that begin a statement; a line starting with one ends a
/// statement that omitted its semicolon.
const STATEMENT_KEYWORDS: &[&str] = &[
    "export",
    "declare",
    "import",
    "interface",
    "class",
    "namespace",
    "module",
    "function",
    "type",
    "const",
    "let",
    "var",
    "enum",
    "abstract",
];

/// Maximum nesting of types and module blocks.
const MAX_NESTING: usize = 128;

/// Parser for declaration source text.
pub struct Parser<'src> {
    /// Source text (for spans and error messages).
    source: &'src str,
    /// Significant tokens; always ends with [`TokenKind::Eof`].
    tokens: Vec<Token>,
    /// Documentation comment directly preceding each significant token.
    docs: Vec<Option<DocComment>>,
    /// Index of the current token.
    pos: usize,
    /// Declaration arena being built.
    decls: Vec<Decl>,
    /// Current type and module nesting depth.
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut tokens = Vec::new();
        let mut docs = Vec::new();
        let mut pending: Option<DocComment> = None;

        for token in Lexer::tokenize_all(source) {
            match &token.kind {
                TokenKind::DocComment(raw) => {
                    let doc = DocComment::parse(raw);
                    match &mut pending {
                        Some(existing) => existing.merge(doc),
                        None => pending = Some(doc),
                    }
                }
                kind if kind.is_trivia() => {}
                _ => {
                    docs.push(pending.take());
                    tokens.push(token);
                }
            }
        }

        Self {
            source,
            tokens,
            docs,
            pos: 0,
            decls: Vec::new(),
            depth: 0,
        }
    }

    /// Parses every declaration in the source.
    ///
    /// # Errors
    /// Returns a parse error, with `path` attached as context, if the source
    /// is malformed.
    pub fn parse_declarations(mut self, path: impl Into<String>) -> Result<DeclarationFile> {
        let path = path.into();
        let roots = self
            .check_lexical_errors()
            .and_then(|()| self.parse_statements(None))
            .map_err(|err| attach_source(err, &path))?;

        Ok(DeclarationFile {
            path,
            text: self.source.to_string(),
            decls: self.decls,
            roots,
        })
    }

    /// Parses a single type expression.
    ///
    /// # Errors
    /// Returns an error if the source is not exactly one type expression.
    pub fn parse_type_only(mut self) -> Result<TypeExpr> {
        self.check_lexical_errors()?;
        let ty = self.parse_type()?;
        if !self.at(&TokenKind::Eof) {
            return Err(self.error(&format!(
                "expected end of input, found {}",
                self.describe_current()
            )));
        }
        Ok(ty)
    }

    fn check_lexical_errors(&self) -> Result<()> {
        match self
            .tokens
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Error(_)))
        {
            Some(Token {
                kind: TokenKind::Error(message),
                span,
            }) => Err(self.error_at(*span, message)),
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parses statements until end of input or a closing brace.
    fn parse_statements(&mut self, parent: Option<DeclId>) -> Result<Vec<DeclId>> {
        let mut ids = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::RBrace if parent.is_some() => break,
                TokenKind::Semicolon => self.advance(),
                _ => ids.extend(self.parse_statement(parent)?),
            }
        }
        Ok(ids)
    }

    fn parse_statement(&mut self, parent: Option<DeclId>) -> Result<Vec<DeclId>> {
        let start = self.span();
        let doc = self.doc_here();

        if self.at_word("import") || (self.at_word("export") && self.is_export_statement()) {
            return Ok(vec![self.parse_other(start, parent)]);
        }

        let mut modifiers = Modifiers::empty();
        loop {
            let modifier = match self.kind() {
                TokenKind::Ident(word) => match word.as_str() {
                    "export" => Modifiers::EXPORT,
                    "declare" => Modifiers::DECLARE,
                    "default" => Modifiers::DEFAULT,
                    "abstract" => Modifiers::ABSTRACT,
                    "async" => Modifiers::empty(),
                    _ => break,
                },
                _ => break,
            };
            if !matches!(self.peek(1), TokenKind::Ident(_)) {
                break;
            }
            modifiers.insert(modifier);
            self.advance();
        }

        let head = Head {
            start,
            doc,
            modifiers,
            parent,
        };

        let word = self.current().as_ident().unwrap_or_default().to_string();
        match word.as_str() {
            "namespace" | "module"
                if matches!(self.peek(1), TokenKind::Ident(_) | TokenKind::String(_)) =>
            {
                self.parse_module(head).map(|id| vec![id])
            }
            "global" if self.peek(1) == &TokenKind::LBrace => {
                self.parse_module(head).map(|id| vec![id])
            }
            "class" => self.parse_class(head).map(|id| vec![id]),
            "interface" => self.parse_interface(head).map(|id| vec![id]),
            "function" => self.parse_function(head).map(|id| vec![id]),
            "const" if self.peek_word(1, "enum") => {
                self.advance();
                let mut head = head;
                head.modifiers.insert(Modifiers::CONST);
                self.parse_enum(head).map(|id| vec![id])
            }
            "var" | "let" | "const" => self.parse_variables(head),
            "enum" => self.parse_enum(head).map(|id| vec![id]),
            "type" if matches!(self.peek(1), TokenKind::Ident(_)) => {
                self.parse_type_alias(head).map(|id| vec![id])
            }
            _ if modifiers.contains(Modifiers::DEFAULT) => Ok(vec![self.parse_other(start, parent)]),
            _ => Err(self.error(&format!(
                "expected declaration, found {}",
                self.describe_current()
            ))),
        }
    }

    /// Returns true at an `export` that re-exports rather than declares.
    fn is_export_statement(&self) -> bool {
        match self.peek(1) {
            TokenKind::Eq | TokenKind::LBrace | TokenKind::Star => true,
            TokenKind::Ident(word) => {
                word == "as"
                    || word == "import"
                    || (word == "type" && self.peek(2) == &TokenKind::LBrace)
            }
            _ => false,
        }
    }

    /// Skips a statement with no declared shape.
    fn parse_other(&mut self, start: Span, parent: Option<DeclId>) -> DeclId {
        self.skip_statement();
        let mut decl = Decl::new(DeclKind::Other, self.finish_span(start));
        decl.parent = parent;
        self.eat(&TokenKind::Semicolon);
        self.alloc(decl)
    }

    fn parse_module(&mut self, head: Head) -> Result<DeclId> {
        let (kind, first, rest) = if self.eat_word("global") {
            (ModuleKind::Global, "global".to_string(), Vec::new())
        } else {
            self.advance(); // `namespace` or `module`
            if let TokenKind::String(name) = self.kind() {
                let name = name.clone();
                self.advance();
                (ModuleKind::Ambient, name, Vec::new())
            } else {
                let first = self.expect_ident()?;
                let mut rest = Vec::new();
                while self.eat(&TokenKind::Dot) {
                    rest.push(self.expect_ident()?);
                }
                (ModuleKind::Namespace, first, rest)
            }
        };

        let outer = self.alloc(head.decl(DeclKind::Module(kind), Some(first)));
        let mut chain = vec![outer];
        for name in rest {
            let mut inner = Decl::new(DeclKind::Module(kind), head.start);
            inner.name = Some(name);
            inner.modifiers = Modifiers::EXPORT;
            inner.parent = chain.last().copied();
            let id = self.alloc(inner);
            if let Some(&enclosing) = chain.last() {
                self.decl_mut(enclosing).children.push(id);
            }
            chain.push(id);
        }
        let innermost = chain.last().copied().unwrap_or(outer);

        // `declare module 'x';` has no body.
        if self.eat(&TokenKind::LBrace) {
            let body = self.nested(|p| p.parse_statements(Some(innermost)))?;
            self.expect(&TokenKind::RBrace)?;
            self.decl_mut(innermost).children = body;
        }

        let span = self.finish_span(head.start);
        for id in chain {
            self.decl_mut(id).span = span;
        }
        self.eat(&TokenKind::Semicolon);
        Ok(outer)
    }

    fn parse_class(&mut self, head: Head) -> Result<DeclId> {
        self.advance(); // `class`
        let name = self.optional_declaration_name(&["extends", "implements"]);
        let mut decl = head.decl(DeclKind::Class, name);
        decl.type_params = self.parse_type_params()?;
        if self.eat_word("extends") {
            decl.extends.push(self.parse_reference()?);
        }
        if self.eat_word("implements") {
            loop {
                decl.implements.push(self.parse_reference()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.parse_container_body(decl, head.start)
    }

    fn parse_interface(&mut self, head: Head) -> Result<DeclId> {
        self.advance(); // `interface`
        let name = self.expect_ident()?;
        let mut decl = head.decl(DeclKind::Interface, Some(name));
        decl.type_params = self.parse_type_params()?;
        if self.eat_word("extends") {
            loop {
                decl.extends.push(self.parse_reference()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.parse_container_body(decl, head.start)
    }

    /// Allocates a class or interface and parses its `{ members }`.
    fn parse_container_body(&mut self, decl: Decl, start: Span) -> Result<DeclId> {
        let id = self.alloc(decl);
        self.expect(&TokenKind::LBrace)?;
        let members = self.parse_members(Some(id))?;
        self.expect(&TokenKind::RBrace)?;
        let span = self.finish_span(start);
        let decl = self.decl_mut(id);
        decl.children = members;
        decl.span = span;
        self.eat(&TokenKind::Semicolon);
        Ok(id)
    }

    fn parse_function(&mut self, head: Head) -> Result<DeclId> {
        self.advance(); // `function`
        self.eat(&TokenKind::Star);
        let name = self.optional_declaration_name(&[]);
        let mut decl = head.decl(DeclKind::Function, name);
        self.parse_signature(&mut decl)?;
        decl.span = self.finish_span(head.start);
        self.eat(&TokenKind::Semicolon);
        Ok(self.alloc(decl))
    }

    fn parse_variables(&mut self, head: Head) -> Result<Vec<DeclId>> {
        let mut modifiers = head.modifiers;
        if self.at_word("const") {
            modifiers.insert(Modifiers::CONST);
        }
        self.advance(); // `var`, `let`, or `const`

        let mut ids = Vec::new();
        loop {
            let start = if ids.is_empty() { head.start } else { self.span() };
            let name = self.expect_ident()?;
            let mut decl = head.decl(DeclKind::Variable, Some(name));
            decl.modifiers = modifiers;
            self.eat(&TokenKind::Bang);
            if self.eat(&TokenKind::Colon) {
                decl.ty = Some(self.parse_type()?);
            }
            if self.eat(&TokenKind::Eq) {
                decl.initializer = Some(self.skip_initializer());
            }
            decl.span = self.finish_span(start);
            ids.push(self.alloc(decl));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.eat(&TokenKind::Semicolon);
        Ok(ids)
    }

    fn parse_type_alias(&mut self, head: Head) -> Result<DeclId> {
        self.advance(); // `type`
        let name = self.expect_ident()?;
        let mut decl = head.decl(DeclKind::TypeAlias, Some(name));
        decl.type_params = self.parse_type_params()?;
        self.expect(&TokenKind::Eq)?;
        decl.ty = Some(self.parse_type()?);
        decl.span = self.finish_span(head.start);
        self.eat(&TokenKind::Semicolon);
        Ok(self.alloc(decl))
    }

    fn parse_enum(&mut self, head: Head) -> Result<DeclId> {
        self.advance(); // `enum`
        let name = self.expect_ident()?;
        let id = self.alloc(head.decl(DeclKind::Enum, Some(name)));
        self.expect(&TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.at(&TokenKind::RBrace) && !self.at(&TokenKind::Eof) {
            let start = self.span();
            let mut member = Decl::new(DeclKind::EnumMember, start);
            member.doc = self.doc_here();
            member.name = Some(self.parse_property_name()?);
            member.parent = Some(id);
            if self.eat(&TokenKind::Eq) {
                member.initializer = Some(self.skip_initializer());
            }
            member.span = self.finish_span(start);
            members.push(self.alloc(member));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        let span = self.finish_span(head.start);
        let decl = self.decl_mut(id);
        decl.children = members;
        decl.span = span;
        Ok(id)
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Parses members of a class, interface, or type literal up to `}`.
    fn parse_members(&mut self, parent: Option<DeclId>) -> Result<Vec<DeclId>> {
        let mut members = Vec::new();
        loop {
            match self.kind() {
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Semicolon | TokenKind::Comma => self.advance(),
                _ => members.push(self.parse_member(parent)?),
            }
        }
        Ok(members)
    }

    fn parse_member(&mut self, parent: Option<DeclId>) -> Result<DeclId> {
        let start = self.span();
        let doc = self.doc_here();

        while self.eat(&TokenKind::At) {
            self.parse_reference()?;
            if self.at(&TokenKind::LParen) {
                self.skip_balanced()?;
            }
        }

        let mut modifiers = Modifiers::empty();
        while let Some(modifier) = self.current().as_ident().and_then(Modifiers::from_keyword) {
            if !self.peek(1).starts_property_name() {
                break;
            }
            modifiers.insert(modifier);
            self.advance();
        }

        let head = Head {
            start,
            doc,
            modifiers,
            parent,
        };

        if (self.at_word("get") || self.at_word("set")) && self.peek(1).starts_property_name() {
            return self.parse_accessor(head);
        }
        if self.at_word("constructor")
            && matches!(self.peek(1), TokenKind::LParen | TokenKind::Lt)
        {
            self.advance();
            return self.finish_callable_member(head, DeclKind::Constructor, None);
        }
        if self.at_word("new") && matches!(self.peek(1), TokenKind::LParen | TokenKind::Lt) {
            self.advance();
            return self.finish_callable_member(head, DeclKind::ConstructSignature, None);
        }
        if matches!(self.kind(), TokenKind::LParen | TokenKind::Lt) {
            return self.finish_callable_member(head, DeclKind::CallSignature, None);
        }
        if self.at(&TokenKind::LBracket)
            && matches!(self.peek(1), TokenKind::Ident(_))
            && self.peek(2) == &TokenKind::Colon
        {
            return self.parse_index_signature(head);
        }

        let name = self.parse_property_name()?;
        let mut head = head;
        if self.eat(&TokenKind::Question) {
            head.modifiers.insert(Modifiers::OPTIONAL);
        }
        self.eat(&TokenKind::Bang);

        if matches!(self.kind(), TokenKind::LParen | TokenKind::Lt) {
            return self.finish_callable_member(head, DeclKind::Method, Some(name));
        }

        let mut decl = head.decl(DeclKind::Property, Some(name));
        if self.eat(&TokenKind::Colon) {
            decl.ty = Some(self.parse_type()?);
        }
        if self.eat(&TokenKind::Eq) {
            decl.initializer = Some(self.skip_initializer());
        }
        decl.span = self.finish_span(start);
        Ok(self.alloc(decl))
    }

    fn finish_callable_member(
        &mut self,
        head: Head,
        kind: DeclKind,
        name: Option<String>,
    ) -> Result<DeclId> {
        let mut decl = head.decl(kind, name);
        self.parse_signature(&mut decl)?;
        decl.span = self.finish_span(head.start);
        Ok(self.alloc(decl))
    }

    fn parse_accessor(&mut self, head: Head) -> Result<DeclId> {
        let kind = if self.eat_word("get") {
            AccessorKind::Get
        } else {
            self.advance(); // `set`
            AccessorKind::Set
        };
        let name = self.parse_property_name()?;
        let mut decl = head.decl(DeclKind::Accessor(kind), Some(name));
        self.parse_signature(&mut decl)?;
        if kind == AccessorKind::Set {
            decl.ty = decl.params.first().and_then(|p| p.ty.clone());
        }
        decl.span = self.finish_span(head.start);
        Ok(self.alloc(decl))
    }

    fn parse_index_signature(&mut self, head: Head) -> Result<DeclId> {
        let mut decl = head.decl(DeclKind::IndexSignature, None);
        let param_start = self.span();
        self.expect(&TokenKind::LBracket)?;
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let key = self.parse_type()?;
        self.expect(&TokenKind::RBracket)?;
        decl.params.push(Param {
            name,
            ty: Some(key),
            optional: false,
            rest: false,
            span: self.finish_span(param_start),
        });
        if self.eat(&TokenKind::Question) {
            decl.modifiers.insert(Modifiers::OPTIONAL);
        }
        if self.eat(&TokenKind::Colon) {
            decl.ty = Some(self.parse_type()?);
        }
        decl.span = self.finish_span(head.start);
        Ok(self.alloc(decl))
    }

    /// Parses type parameters, parameters, return type, and a skipped body.
    fn parse_signature(&mut self, decl: &mut Decl) -> Result<()> {
        decl.type_params = self.parse_type_params()?;
        decl.params = self.parse_params()?;
        if self.eat(&TokenKind::Colon) {
            decl.ty = Some(self.parse_return_type()?);
        }
        if self.at(&TokenKind::LBrace) {
            self.skip_balanced()?;
        }
        Ok(())
    }

    fn parse_property_name(&mut self) -> Result<String> {
        match self.kind().clone() {
            TokenKind::Ident(name) | TokenKind::String(name) | TokenKind::Number(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::LBracket => {
                let start = self.span();
                self.skip_balanced()?;
                let span = self.finish_span(start);
                Ok(normalize_source(span.text(self.source)))
            }
            _ => Err(self.error(&format!(
                "expected property name, found {}",
                self.describe_current()
            ))),
        }
    }

    /// Takes an identifier as a declaration name unless it is one of `stop`.
    fn optional_declaration_name(&mut self, stop: &[&str]) -> Option<String> {
        let name = self
            .current()
            .as_ident()
            .filter(|word| !stop.contains(word))?
            .to_string();
        self.advance();
        Some(name)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    fn parse_type_params(&mut self) -> Result<Vec<TypeParam>> {
        let mut params = Vec::new();
        if !self.eat(&TokenKind::Lt) {
            return Ok(params);
        }
        while !self.at(&TokenKind::Gt) {
            let start = self.span();
            while matches!(self.current().as_ident(), Some("const" | "in" | "out"))
                && matches!(self.peek(1), TokenKind::Ident(_))
            {
                self.advance();
            }
            let name = self.expect_ident()?;
            let constraint = if self.eat_word("extends") {
                Some(self.parse_type()?)
            } else {
                None
            };
            let default = if self.eat(&TokenKind::Eq) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(TypeParam {
                name,
                constraint,
                default,
                span: self.finish_span(start),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::Gt)?;
        Ok(params)
    }

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.at(&TokenKind::RParen) {
            params.push(self.parse_param()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<Param> {
        let start = self.span();
        while matches!(
            self.current().as_ident(),
            Some("public" | "private" | "protected" | "readonly" | "override")
        ) && matches!(
            self.peek(1),
            TokenKind::Ident(_) | TokenKind::LBrace | TokenKind::LBracket | TokenKind::Ellipsis
        ) {
            self.advance();
        }

        let rest = self.eat(&TokenKind::Ellipsis);
        let name = match self.kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                name
            }
            TokenKind::LBrace | TokenKind::LBracket => {
                let pattern_start = self.span();
                self.skip_balanced()?;
                normalize_source(self.finish_span(pattern_start).text(self.source))
            }
            _ => {
                return Err(self.error(&format!(
                    "expected parameter name, found {}",
                    self.describe_current()
                )));
            }
        };

        let mut optional = self.eat(&TokenKind::Question);
        let ty = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        if self.eat(&TokenKind::Eq) {
            self.skip_initializer();
            optional = true;
        }

        Ok(Param {
            name,
            ty,
            optional,
            rest,
            span: self.finish_span(start),
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Parses a type expression.
    fn parse_type(&mut self) -> Result<TypeExpr> {
        self.parse_type_inner(true)
    }

    fn parse_type_inner(&mut self, allow_conditional: bool) -> Result<TypeExpr> {
        self.nested(|p| p.parse_type_body(allow_conditional))
    }

    fn parse_type_body(&mut self, allow_conditional: bool) -> Result<TypeExpr> {
        let start = self.span();

        if self.starts_function_type() {
            let function = self.parse_function_type()?;
            return Ok(TypeExpr::Function(
                Box::new(function),
                self.finish_span(start),
            ));
        }
        if self.at_word("new") || (self.at_word("abstract") && self.peek_word(1, "new")) {
            self.eat_word("abstract");
            self.advance(); // `new`
            let function = self.parse_function_type()?;
            return Ok(TypeExpr::Constructor(
                Box::new(function),
                self.finish_span(start),
            ));
        }

        let check = self.parse_union()?;
        if allow_conditional && self.at_word("extends") {
            self.advance();
            let extends = self.parse_type_inner(false)?;
            self.expect(&TokenKind::Question)?;
            let then = self.parse_type()?;
            self.expect(&TokenKind::Colon)?;
            let otherwise = self.parse_type()?;
            return Ok(TypeExpr::Conditional {
                check: Box::new(check),
                extends: Box::new(extends),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
                span: self.finish_span(start),
            });
        }
        Ok(check)
    }

    /// Parses a return type, which may be a type predicate.
    fn parse_return_type(&mut self) -> Result<TypeExpr> {
        let start = self.span();

        if self.at_word("asserts")
            && matches!(self.peek(1), TokenKind::Ident(_))
            && !self.peek_word(1, "is")
        {
            self.advance();
            let param = self.expect_ident()?;
            let ty = if self.eat_word("is") {
                Some(Box::new(self.parse_type()?))
            } else {
                None
            };
            return Ok(TypeExpr::Predicate {
                param,
                asserts: true,
                ty,
                span: self.finish_span(start),
            });
        }

        if matches!(self.kind(), TokenKind::Ident(_)) && self.peek_word(1, "is") {
            let param = self.expect_ident()?;
            self.advance(); // `is`
            let ty = self.parse_type()?;
            return Ok(TypeExpr::Predicate {
                param,
                asserts: false,
                ty: Some(Box::new(ty)),
                span: self.finish_span(start),
            });
        }

        self.parse_type()
    }

    fn parse_function_type(&mut self) -> Result<FunctionType> {
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        self.expect(&TokenKind::Arrow)?;
        let ret = self.parse_return_type()?;
        Ok(FunctionType {
            type_params,
            params,
            ret,
        })
    }

    fn starts_function_type(&self) -> bool {
        match self.kind() {
            TokenKind::Lt => true,
            TokenKind::LParen => self.is_parenthesized_parameter_list(),
            _ => false,
        }
    }

    /// Looks ahead from `(` to tell a parameter list from a parenthesized type.
    fn is_parenthesized_parameter_list(&self) -> bool {
        let after_name = match self.peek(1) {
            TokenKind::RParen | TokenKind::Ellipsis => return true,
            TokenKind::LBrace | TokenKind::LBracket => match self.matching_close(self.pos + 1) {
                Some(close) => close + 1 - self.pos,
                None => return false,
            },
            TokenKind::Ident(_) => 2,
            _ => return false,
        };
        match self.peek(after_name) {
            TokenKind::Colon | TokenKind::Comma | TokenKind::Question | TokenKind::Eq => true,
            TokenKind::RParen => self.peek(after_name + 1) == &TokenKind::Arrow,
            _ => false,
        }
    }

    fn parse_union(&mut self) -> Result<TypeExpr> {
        let start = self.span();
        self.eat(&TokenKind::Pipe);
        let first = self.parse_intersection()?;
        if !self.at(&TokenKind::Pipe) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(&TokenKind::Pipe) {
            members.push(self.parse_intersection()?);
        }
        Ok(TypeExpr::Union(members, self.finish_span(start)))
    }

    fn parse_intersection(&mut self) -> Result<TypeExpr> {
        let start = self.span();
        self.eat(&TokenKind::Amp);
        let first = self.parse_type_operator()?;
        if !self.at(&TokenKind::Amp) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(&TokenKind::Amp) {
            members.push(self.parse_type_operator()?);
        }
        Ok(TypeExpr::Intersection(members, self.finish_span(start)))
    }

    fn parse_type_operator(&mut self) -> Result<TypeExpr> {
        let start = self.span();

        let operator = match self.current().as_ident() {
            Some("keyof") => Some(TypeOperator::KeyOf),
            Some("readonly") => Some(TypeOperator::Readonly),
            Some("unique") => Some(TypeOperator::Unique),
            _ => None,
        };
        if let Some(operator) = operator {
            if self.peek_starts_type(1) {
                self.advance();
                let inner = self.parse_type_operator()?;
                return Ok(TypeExpr::Operator(
                    operator,
                    Box::new(inner),
                    self.finish_span(start),
                ));
            }
        }

        if self.at_word("infer") && matches!(self.peek(1), TokenKind::Ident(_)) {
            self.advance();
            let name = self.expect_ident()?;
            if self.at_word("extends") {
                // `infer U extends C` constrains U only when no `?` follows;
                // otherwise the `extends` belongs to an enclosing conditional.
                let saved = self.checkpoint();
                self.advance();
                let constrained = self.parse_type_inner(false).is_ok()
                    && !self.at(&TokenKind::Question);
                if !constrained {
                    self.rewind(saved);
                }
            }
            return Ok(TypeExpr::Infer(name, self.finish_span(start)));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<TypeExpr> {
        let start = self.span();
        let mut ty = self.parse_primary()?;
        while self.at(&TokenKind::LBracket) && !self.preceded_by_line_break() {
            self.advance();
            if self.eat(&TokenKind::RBracket) {
                ty = TypeExpr::Array(Box::new(ty), self.finish_span(start));
            } else {
                let index = self.parse_type()?;
                self.expect(&TokenKind::RBracket)?;
                ty = TypeExpr::IndexedAccess(
                    Box::new(ty),
                    Box::new(index),
                    self.finish_span(start),
                );
            }
        }
        Ok(ty)
    }

    fn parse_primary(&mut self) -> Result<TypeExpr> {
        let start = self.span();
        match self.kind().clone() {
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(&TokenKind::RParen)?;
                Ok(TypeExpr::Paren(Box::new(inner), self.finish_span(start)))
            }
            TokenKind::LBracket => self.parse_tuple(),
            TokenKind::LBrace => self.parse_object_type(),
            TokenKind::String(value) => {
                self.advance();
                Ok(TypeExpr::Literal(LiteralType::String(value), start))
            }
            TokenKind::Number(text) => {
                self.advance();
                Ok(TypeExpr::Literal(LiteralType::Number(text), start))
            }
            TokenKind::Minus => {
                self.advance();
                let TokenKind::Number(text) = self.kind().clone() else {
                    return Err(self.error("expected number after '-'"));
                };
                self.advance();
                Ok(TypeExpr::Literal(
                    LiteralType::Number(format!("-{text}")),
                    self.finish_span(start),
                ))
            }
            TokenKind::Template(_) => {
                self.advance();
                Ok(TypeExpr::Opaque(start))
            }
            TokenKind::Ident(word) => self.parse_named_type(&word),
            _ => Err(self.error(&format!(
                "expected type, found {}",
                self.describe_current()
            ))),
        }
    }

    fn parse_named_type(&mut self, word: &str) -> Result<TypeExpr> {
        let start = self.span();
        match word {
            "typeof" => {
                self.advance();
                if self.at_word("import") {
                    self.skip_import_type()?;
                    return Ok(TypeExpr::Opaque(self.finish_span(start)));
                }
                let mut path = vec![self.expect_ident()?];
                while self.at(&TokenKind::Dot) && matches!(self.peek(1), TokenKind::Ident(_)) {
                    self.advance();
                    path.push(self.expect_ident()?);
                }
                if self.at(&TokenKind::Lt) && !self.preceded_by_line_break() {
                    self.parse_type_args()?;
                }
                Ok(TypeExpr::Query(path, self.finish_span(start)))
            }
            "import" if self.peek(1) == &TokenKind::LParen => {
                self.skip_import_type()?;
                Ok(TypeExpr::Opaque(self.finish_span(start)))
            }
            "true" | "false" => {
                self.advance();
                Ok(TypeExpr::Literal(LiteralType::Boolean(word == "true"), start))
            }
            _ => match KeywordType::from_keyword(word) {
                Some(keyword) if self.peek(1) != &TokenKind::Dot => {
                    self.advance();
                    Ok(TypeExpr::Keyword(keyword, start))
                }
                _ => self.parse_reference(),
            },
        }
    }

    /// Parses a possibly qualified name with optional type arguments.
    fn parse_reference(&mut self) -> Result<TypeExpr> {
        let start = self.span();
        let mut name = vec![self.expect_ident()?];
        while self.at(&TokenKind::Dot) && matches!(self.peek(1), TokenKind::Ident(_)) {
            self.advance();
            name.push(self.expect_ident()?);
        }
        let args = if self.at(&TokenKind::Lt) && !self.preceded_by_line_break() {
            self.parse_type_args()?
        } else {
            Vec::new()
        };
        Ok(TypeExpr::Reference {
            name,
            args,
            span: self.finish_span(start),
        })
    }

    fn parse_type_args(&mut self) -> Result<Vec<TypeExpr>> {
        self.expect(&TokenKind::Lt)?;
        let mut args = Vec::new();
        while !self.at(&TokenKind::Gt) {
            args.push(self.parse_type()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::Gt)?;
        Ok(args)
    }

    fn parse_tuple(&mut self) -> Result<TypeExpr> {
        let start = self.span();
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.at(&TokenKind::RBracket) {
            let rest = self.eat(&TokenKind::Ellipsis);
            let mut name = None;
            let mut optional = false;
            let labelled = self.peek(1) == &TokenKind::Colon
                || (self.peek(1) == &TokenKind::Question && self.peek(2) == &TokenKind::Colon);
            if matches!(self.kind(), TokenKind::Ident(_)) && labelled {
                name = Some(self.expect_ident()?);
                optional = self.eat(&TokenKind::Question);
                self.expect(&TokenKind::Colon)?;
            }
            let ty = self.parse_type()?;
            if self.eat(&TokenKind::Question) {
                optional = true;
            }
            elements.push(TupleElement {
                name,
                ty,
                optional,
                rest,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(TypeExpr::Tuple(elements, self.finish_span(start)))
    }

    fn parse_object_type(&mut self) -> Result<TypeExpr> {
        let start = self.span();
        if self.is_mapped_type() {
            self.skip_balanced()?;
            return Ok(TypeExpr::Opaque(self.finish_span(start)));
        }
        self.expect(&TokenKind::LBrace)?;
        let members = self.parse_members(None)?;
        self.expect(&TokenKind::RBrace)?;
        Ok(TypeExpr::Object(members, self.finish_span(start)))
    }

    /// Returns true at `{ [K in`, optionally with a `readonly` modifier.
    fn is_mapped_type(&self) -> bool {
        let mut i = 1;
        if matches!(self.peek(i), TokenKind::Plus | TokenKind::Minus) {
            i += 1;
        }
        if self.peek_word(i, "readonly") {
            i += 1;
        }
        self.peek(i) == &TokenKind::LBracket
            && matches!(self.peek(i + 1), TokenKind::Ident(_))
            && self.peek_word(i + 2, "in")
    }

    /// Skips `import('m').A.B<C>`.
    fn skip_import_type(&mut self) -> Result<()> {
        self.advance(); // `import`
        self.skip_balanced()?;
        while self.eat(&TokenKind::Dot) {
            self.expect_ident()?;
        }
        if self.at(&TokenKind::Lt) {
            self.parse_type_args()?;
        }
        Ok(())
    }

    /// Returns true if the token `n` ahead can start a type operand.
    fn peek_starts_type(&self, n: usize) -> bool {
        matches!(
            self.peek(n),
            TokenKind::Ident(_)
                | TokenKind::String(_)
                | TokenKind::Number(_)
                | TokenKind::Template(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Minus
        )
    }

    // =========================================================================
    // Skipping
    // =========================================================================

    /// Skips a delimited group starting at the current opening delimiter.
    fn skip_balanced(&mut self) -> Result<()> {
        let open = self.span();
        let mut depth = 0usize;
        loop {
            match self.kind() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                TokenKind::Eof => return Err(self.error_at(open, "unbalanced delimiter")),
                _ => {}
            }
            self.advance();
        }
    }

    /// Skips tokens up to the end of the current statement, leaving any `;`.
    fn skip_statement(&mut self) {
        let line = self.span().line;
        let mut depth = 0usize;
        let mut first = true;
        loop {
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Ident(word)
                    if depth == 0
                        && !first
                        && self.span().line > line
                        && STATEMENT_KEYWORDS.contains(&word.as_str()) =>
                {
                    break;
                }
                _ => {}
            }
            first = false;
            self.advance();
        }
    }

    /// Skips an initializer expression and returns its span.
    fn skip_initializer(&mut self) -> Span {
        let start = self.span();
        let line = start.line;
        let mut depth = 0usize;
        loop {
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::Comma | TokenKind::Semicolon if depth == 0 => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Ident(word)
                    if depth == 0
                        && self.span().line > line
                        && STATEMENT_KEYWORDS.contains(&word.as_str()) =>
                {
                    break;
                }
                _ => {}
            }
            self.advance();
        }
        self.finish_span(start)
    }

    /// Returns the index of the token closing the group opened at `open`.
    fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(open) {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    // =========================================================================
    // Token Helpers
    // =========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn span(&self) -> Span {
        self.current().span
    }

    fn peek(&self, n: usize) -> &TokenKind {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn peek_word(&self, n: usize, word: &str) -> bool {
        matches!(self.peek(n), TokenKind::Ident(w) if w == word)
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.kind() == kind
    }

    fn at_word(&self, word: &str) -> bool {
        self.peek_word(0, word)
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!(
                "expected {}, found {}",
                expected.name(),
                self.describe_current()
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error(&format!(
                "expected identifier, found {}",
                self.describe_current()
            ))),
        }
    }

    fn describe_current(&self) -> String {
        match self.kind() {
            TokenKind::Ident(word) => format!("'{word}'"),
            kind => kind.name().to_string(),
        }
    }

    fn preceded_by_line_break(&self) -> bool {
        self.pos > 0 && self.tokens[self.pos - 1].span.line < self.span().line
    }

    fn doc_here(&self) -> Option<DocComment> {
        self.docs.get(self.pos).cloned().flatten()
    }

    /// Returns a span from `start` to the end of the last consumed token.
    fn finish_span(&self, start: Span) -> Span {
        match self.pos.checked_sub(1).map(|i| self.tokens[i].span) {
            Some(end) if end.end >= start.start => start.to(end),
            _ => Span::new(start.start, start.start, start.line, start.column),
        }
    }

    /// Runs `f` one nesting level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn checkpoint(&self) -> (usize, usize) {
        (self.pos, self.decls.len())
    }

    fn rewind(&mut self, (pos, decls): (usize, usize)) {
        self.pos = pos;
        self.decls.truncate(decls);
    }

    fn alloc(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::new(u32::try_from(self.decls.len()).unwrap_or(u32::MAX));
        self.decls.push(decl);
        id
    }

    fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.span(), message)
    }

    /// Creates a parse error at a specific span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::new(ErrorKind::Parse {
            message: message.to_string(),
            line: span.line,
            column: span.column,
            context: span.line_text(self.source).to_string(),
        })
    }
}

/// The parts of a declaration read before its keyword.
struct Head {
    start: Span,
    doc: Option<DocComment>,
    modifiers: Modifiers,
    parent: Option<DeclId>,
}

impl Head {
    fn decl(&self, kind: DeclKind, name: Option<String>) -> Decl {
        let mut decl = Decl::new(kind, self.start);
        decl.name = name;
        decl.doc.clone_from(&self.doc);
        decl.modifiers = self.modifiers;
        decl.parent = self.parent;
        decl
    }
}

fn attach_source(err: Error, path: &str) -> Error {
    let mut context = ErrorContext::new().with_source(path);
    if let ErrorKind::Parse { line, column, .. } = &err.kind {
        context = context.with_position(*line as usize, *column as usize);
    }
    err.with_context(context)
}

/// Parses a declaration source.
///
/// # Errors
/// Returns an error if the source cannot be parsed.
pub fn parse_file(path: impl Into<String>, source: &str) -> Result<DeclarationFile> {
    Parser::new(source).parse_declarations(path)
}

/// Parses a standalone type expression.
///
/// # Errors
/// Returns an error if the source is not a single type expression.
pub fn parse_type(source: &str) -> Result<TypeExpr> {
    Parser::new(source).parse_type_only()
}
