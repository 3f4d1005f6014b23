//! Two-tier symbol table for the Jack compiler
//!
//! A class table (STATIC/FIELD) lives for the lifetime of one class; a
//! subroutine table (ARG/VAR) is reset at the start of each subroutine.
//! Both are backed by a growable `Vec` of entries with per-kind counters —
//! the corpus of symbols per class is small enough that linear lookup is
//! the right tradeoff over a hash map.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Static,
    Field,
    Arg,
    Var,
}

impl SymbolKind {
    /// The VM segment a variable of this kind lives in.
    #[must_use]
    pub fn segment(self) -> &'static str {
        match self {
            SymbolKind::Static => "static",
            SymbolKind::Field => "this",
            SymbolKind::Arg => "argument",
            SymbolKind::Var => "local",
        }
    }
}

#[derive(Debug, Clone)]
struct SymbolEntry {
    name: String,
    type_name: String,
    kind: SymbolKind,
    index: u16,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    static_count: u16,
    field_count: u16,
    arg_count: u16,
    var_count: u16,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.static_count = 0;
        self.field_count = 0;
        self.arg_count = 0;
        self.var_count = 0;
    }

    pub fn define(&mut self, name: &str, type_name: &str, kind: SymbolKind) {
        let counter = match kind {
            SymbolKind::Static => &mut self.static_count,
            SymbolKind::Field => &mut self.field_count,
            SymbolKind::Arg => &mut self.arg_count,
            SymbolKind::Var => &mut self.var_count,
        };
        let index = *counter;
        *counter += 1;

        self.entries.push(SymbolEntry {
            name: name.to_string(),
            type_name: type_name.to_string(),
            kind,
            index,
        });
    }

    #[must_use]
    pub fn var_count(&self, kind: SymbolKind) -> u16 {
        match kind {
            SymbolKind::Static => self.static_count,
            SymbolKind::Field => self.field_count,
            SymbolKind::Arg => self.arg_count,
            SymbolKind::Var => self.var_count,
        }
    }

    fn find(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.iter().rev().find(|e| e.name == name)
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        self.find(name).map(|e| e.kind)
    }

    #[must_use]
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.find(name).map(|e| e.type_name.as_str())
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.find(name).map(|e| e.index)
    }
}

/// Looks a name up in the subroutine table first, then the class table —
/// the lookup order the language defines for shadowing.
#[must_use]
pub fn resolve<'a>(
    subroutine: &'a SymbolTable,
    class: &'a SymbolTable,
    name: &str,
) -> Option<(SymbolKind, &'a str, u16)> {
    if let Some(kind) = subroutine.kind_of(name) {
        return Some((kind, subroutine.type_of(name).unwrap(), subroutine.index_of(name).unwrap()));
    }
    if let Some(kind) = class.kind_of(name) {
        return Some((kind, class.type_of(name).unwrap(), class.index_of(name).unwrap()));
    }
    None
}
