//! Name binding.
//!
//! The binder walks every loaded source and records which declarations a
//! name refers to in each lexical scope. Declarations that share a name in
//! the same scope merge into one [`Symbol`]: two `interface A` blocks, a
//! class and a namespace of the same name, or two `namespace n` blocks in
//! different sources all contribute to a single symbol.
//!
//! Top-level declarations outside any ambient module land in the global
//! scope, as do members of `declare global` blocks. Each ambient module
//! (`declare module 'name'`) gets its own export scope, keyed by name.

use std::collections::HashMap;

use parity_language::{DeclKind, DeclarationFile, ModuleKind};

use crate::session::{DeclRef, SourceId};

/// Index of a lexical scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The global scope.
    pub const GLOBAL: Self = Self(0);
}

/// Index of a merged symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

/// All declarations bound to one name in one scope.
#[derive(Clone, Debug)]
pub struct Symbol {
    /// The bound name.
    pub name: String,
    /// Contributing declarations in binding order.
    pub decls: Vec<DeclRef>,
    /// Export scope for namespaces and ambient modules.
    pub exports: Option<ScopeId>,
}

#[derive(Clone, Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    symbols: HashMap<String, SymbolId>,
}

/// Scope and symbol tables for a set of sources.
#[derive(Clone, Debug)]
pub struct Binder {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
    ambient_modules: HashMap<String, SymbolId>,
    decl_scopes: HashMap<DeclRef, ScopeId>,
    decl_symbols: HashMap<DeclRef, SymbolId>,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    /// Creates a binder holding only the empty global scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            symbols: Vec::new(),
            ambient_modules: HashMap::new(),
            decl_scopes: HashMap::new(),
            decl_symbols: HashMap::new(),
        }
    }

    /// Binds every declaration of a source.
    pub fn bind_file(&mut self, source: SourceId, file: &DeclarationFile) {
        for &id in &file.roots {
            self.bind_decl(source, file, id, ScopeId::GLOBAL);
        }
    }

    fn bind_decl(
        &mut self,
        source: SourceId,
        file: &DeclarationFile,
        id: parity_language::DeclId,
        scope: ScopeId,
    ) {
        let Some(decl) = file.get(id) else {
            return;
        };
        let decl_ref = DeclRef::new(source, id);
        self.decl_scopes.insert(decl_ref, scope);

        match decl.kind {
            DeclKind::Module(ModuleKind::Global) => {
                for &child in &decl.children {
                    self.bind_decl(source, file, child, ScopeId::GLOBAL);
                }
            }
            DeclKind::Module(ModuleKind::Ambient) => {
                let Some(name) = decl.name.clone() else {
                    return;
                };
                let symbol = match self.ambient_modules.get(&name) {
                    Some(&symbol) => symbol,
                    None => {
                        let symbol = self.new_symbol(name.clone());
                        self.ambient_modules.insert(name, symbol);
                        symbol
                    }
                };
                self.symbols[symbol.0 as usize].decls.push(decl_ref);
                self.decl_symbols.insert(decl_ref, symbol);
                let exports = self.exports_of(symbol, ScopeId::GLOBAL);
                for &child in &decl.children {
                    self.bind_decl(source, file, child, exports);
                }
            }
            DeclKind::Module(ModuleKind::Namespace) => {
                let Some(symbol) = self.declare(scope, decl.name.as_deref(), decl_ref) else {
                    return;
                };
                let exports = self.exports_of(symbol, scope);
                for &child in &decl.children {
                    self.bind_decl(source, file, child, exports);
                }
            }
            DeclKind::Class | DeclKind::Interface => {
                self.declare(scope, decl.name.as_deref(), decl_ref);
                // Members resolve names in the scope enclosing their container.
                for &child in &decl.children {
                    self.decl_scopes.insert(DeclRef::new(source, child), scope);
                }
            }
            DeclKind::Enum => {
                if let Some(symbol) = self.declare(scope, decl.name.as_deref(), decl_ref) {
                    for &child in &decl.children {
                        let member = DeclRef::new(source, child);
                        self.decl_scopes.insert(member, scope);
                        self.decl_symbols.insert(member, symbol);
                    }
                }
            }
            DeclKind::Function | DeclKind::Variable | DeclKind::TypeAlias => {
                self.declare(scope, decl.name.as_deref(), decl_ref);
            }
            _ => {}
        }
    }

    fn declare(&mut self, scope: ScopeId, name: Option<&str>, decl: DeclRef) -> Option<SymbolId> {
        let name = name?;
        let symbol = match self.scope(scope).symbols.get(name) {
            Some(&symbol) => symbol,
            None => {
                let symbol = self.new_symbol(name.to_string());
                self.scopes[scope.0 as usize]
                    .symbols
                    .insert(name.to_string(), symbol);
                symbol
            }
        };
        self.symbols[symbol.0 as usize].decls.push(decl);
        self.decl_symbols.insert(decl, symbol);
        Some(symbol)
    }

    fn new_symbol(&mut self, name: String) -> SymbolId {
        let id = SymbolId(u32::try_from(self.symbols.len()).unwrap_or(u32::MAX));
        self.symbols.push(Symbol {
            name,
            decls: Vec::new(),
            exports: None,
        });
        id
    }

    /// Returns the export scope of a symbol, creating it under `parent`.
    fn exports_of(&mut self, symbol: SymbolId, parent: ScopeId) -> ScopeId {
        if let Some(exports) = self.symbols[symbol.0 as usize].exports {
            return exports;
        }
        let exports = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Scope {
            parent: Some(parent),
            symbols: HashMap::new(),
        });
        self.symbols[symbol.0 as usize].exports = Some(exports);
        exports
    }

    fn scope(&self, id: ScopeId) -> &Scope {
        self.scopes.get(id.0 as usize).unwrap_or(&self.scopes[0])
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gets a symbol by id.
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    /// Returns the number of bound symbols.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the scope a declaration's names resolve in.
    #[must_use]
    pub fn scope_of(&self, decl: DeclRef) -> Option<ScopeId> {
        self.decl_scopes.get(&decl).copied()
    }

    /// Returns the symbol a declaration contributes to.
    #[must_use]
    pub fn symbol_of(&self, decl: DeclRef) -> Option<SymbolId> {
        self.decl_symbols.get(&decl).copied()
    }

    /// Looks up a name from `scope` outward.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(&symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }

    /// Looks up an export of a namespace or module symbol.
    #[must_use]
    pub fn member(&self, symbol: SymbolId, name: &str) -> Option<SymbolId> {
        let exports = self.symbol(symbol)?.exports?;
        self.scope(exports).symbols.get(name).copied()
    }

    /// Resolves a dotted name from `scope`.
    #[must_use]
    pub fn resolve_path(&self, scope: ScopeId, path: &[String]) -> Option<SymbolId> {
        let (first, rest) = path.split_first()?;
        let mut symbol = self.lookup(scope, first)?;
        for segment in rest {
            symbol = self.member(symbol, segment)?;
        }
        Some(symbol)
    }

    /// Gets the symbol of an ambient module by its quoted name.
    #[must_use]
    pub fn ambient_module(&self, name: &str) -> Option<SymbolId> {
        self.ambient_modules.get(name).copied()
    }
}
