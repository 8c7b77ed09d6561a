//! The interner backing [`super::Symbol`].

use rustc_hash::FxHashMap;
use std::cell::RefCell;

use super::Symbol;

thread_local! {
    /// Thread-local string table.
    ///
    /// The core compiler never touches a `Symbol` from more than one thread
    /// at a time, so a `thread_local!` table avoids the locking a shared
    /// global table would need without giving up the `'static` string
    /// references that make `Symbol::as_str` infallible.
    pub static INTERNER: RefCell<Interner> = RefCell::new(Interner::new());
}

/// String table mapping interned strings to dense `u32` indices.
///
/// Strings are leaked to obtain `'static` references; the table never shrinks
/// and entries are never removed, which is fine for a single compilation run.
pub struct Interner {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            strings: Vec::new(),
        }
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&idx) = self.index.get(s) {
            return Symbol(idx);
        }
        let leaked: &'static str = Box::leak(s.to_string().into_boxed_str());
        let idx = self.strings.len() as u32;
        self.strings.push(leaked);
        self.index.insert(leaked, idx);
        Symbol(idx)
    }

    pub fn resolve(&self, sym: Symbol) -> &'static str {
        self.strings[sym.as_u32() as usize]
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_interner_is_empty() {
        let i = Interner::new();
        assert!(i.strings.is_empty());
    }

    #[test]
    fn repeated_intern_reuses_index() {
        let mut i = Interner::new();
        let a = i.intern("same");
        let b = i.intern("same");
        assert_eq!(a, b);
        assert_eq!(i.strings.len(), 1);
    }
}
