//! String interning for identifiers.
//!
//! The type checker and desugarer compare identifiers constantly (environment
//! lookups, record field names, variant constructor names). Interning turns
//! those comparisons into a `u32` equality check instead of a `str` compare,
//! and keeps an `Env` cheap to clone since every name inside it is `Copy`.
//!
//! The core compiler is single-threaded (no shared mutable state crosses a
//! thread boundary — see the concurrency model this crate supports), so the
//! interner below is a plain `RefCell`-guarded table rather than a concurrent
//! one.

mod interner;

pub use interner::{Interner, INTERNER};

use std::fmt;

/// An interned identifier.
///
/// # Examples
///
/// ```
/// use vibefun_util::symbol::Symbol;
///
/// let a = Symbol::intern("x");
/// let b = Symbol::intern("x");
/// let c = Symbol::intern("y");
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(a.as_str(), "x");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern `s`, returning the symbol for it. Interning the same string
    /// twice returns the same `Symbol`.
    pub fn intern(s: &str) -> Self {
        INTERNER.with(|i| i.borrow_mut().intern(s))
    }

    /// Look up the string this symbol was interned from.
    ///
    /// Every `Symbol` in circulation was produced by [`Symbol::intern`], so
    /// this never fails.
    pub fn as_str(&self) -> &'static str {
        INTERNER.with(|i| i.borrow().resolve(*self))
    }

    /// Raw index, for debugging and for encoding symbols in test fixtures.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_yields_same_symbol() {
        assert_eq!(Symbol::intern("foo"), Symbol::intern("foo"));
    }

    #[test]
    fn interning_distinct_strings_yields_distinct_symbols() {
        assert_ne!(Symbol::intern("foo"), Symbol::intern("bar"));
    }

    #[test]
    fn resolve_roundtrips() {
        let sym = Symbol::intern("identifier_under_test");
        assert_eq!(sym.as_str(), "identifier_under_test");
    }

    #[test]
    fn display_matches_source_text() {
        let sym = Symbol::intern("display_me");
        assert_eq!(format!("{sym}"), "display_me");
    }

    #[quickcheck_macros::quickcheck]
    fn intern_is_injective_on_distinct_strings(a: String, b: String) -> bool {
        if a == b {
            Symbol::intern(&a) == Symbol::intern(&b)
        } else {
            Symbol::intern(&a) != Symbol::intern(&b)
        }
    }
}
