//! The type language: constants, unification variables, applications,
//! n-ary functions, structural records, and FFI-only unions.

use std::collections::BTreeMap;
use std::fmt;
use vibefun_util::{define_idx, Symbol};

define_idx!(TypeVarId);

/// The binding depth at which a [`TypeVarId`] was allocated. Compared
/// against the level a binding generalizes at to decide which variables
/// are quantified ([`super::env::generalize`]) and to reject types that
/// would let a variable escape its defining scope.
pub type Level = u32;

/// The outermost level, active before any `let` has been entered.
pub const TOP_LEVEL: Level = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Const(Symbol),
    Var { id: TypeVarId, level: Level },
    App { ctor: Symbol, args: Vec<Type> },
    /// Kept n-ary; `unify` treats this as interchangeable with a curried
    /// chain of the same arrows rather than normalizing to one shape.
    Function { params: Vec<Type>, result: Box<Type> },
    /// A structural record; width subtyping means a record with extra
    /// fields is usable wherever one with fewer fields is expected.
    Record(BTreeMap<Symbol, Type>),
    /// A general union — legal only in `external` signatures.
    Union(Vec<Type>),
}

impl Type {
    pub fn unit() -> Self {
        Type::Const(Symbol::intern("Unit"))
    }

    pub fn int() -> Self {
        Type::Const(Symbol::intern("Int"))
    }

    pub fn float() -> Self {
        Type::Const(Symbol::intern("Float"))
    }

    pub fn string() -> Self {
        Type::Const(Symbol::intern("String"))
    }

    pub fn bool() -> Self {
        Type::Const(Symbol::intern("Bool"))
    }

    pub fn list(elem: Type) -> Self {
        Type::App { ctor: Symbol::intern("List"), args: vec![elem] }
    }

    pub fn option(elem: Type) -> Self {
        Type::App { ctor: Symbol::intern("Option"), args: vec![elem] }
    }

    pub fn result(ok: Type, err: Type) -> Self {
        Type::App { ctor: Symbol::intern("Result"), args: vec![ok, err] }
    }

    pub fn reference(elem: Type) -> Self {
        Type::App { ctor: Symbol::intern("Ref"), args: vec![elem] }
    }

    /// Every [`TypeVarId`] occurring anywhere in this type, with its level.
    pub fn free_vars(&self, out: &mut Vec<(TypeVarId, Level)>) {
        match self {
            Type::Const(_) => {}
            Type::Var { id, level } => out.push((*id, *level)),
            Type::App { args, .. } => args.iter().for_each(|t| t.free_vars(out)),
            Type::Function { params, result } => {
                params.iter().for_each(|t| t.free_vars(out));
                result.free_vars(out);
            }
            Type::Record(fields) => fields.values().for_each(|t| t.free_vars(out)),
            Type::Union(members) => members.iter().for_each(|t| t.free_vars(out)),
        }
    }

    /// Whether `id` occurs anywhere inside this type. Used by the
    /// occurs-check before binding a unification variable.
    pub fn occurs(&self, id: TypeVarId) -> bool {
        let mut vars = Vec::new();
        self.free_vars(&mut vars);
        vars.iter().any(|(v, _)| *v == id)
    }

    /// Curry an n-ary function type into a chain of single-argument arrows,
    /// used when unification needs to align an n-ary call against a
    /// differently-aritied declared type (see `Function` unification rule).
    pub fn curry(&self) -> Type {
        match self {
            Type::Function { params, result } => {
                params.iter().rev().fold((**result).clone(), |acc, p| Type::Function {
                    params: vec![p.clone()],
                    result: Box::new(acc),
                })
            }
            other => other.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Const(name) => write!(f, "{name}"),
            Type::Var { id, .. } => write!(f, "'t{}", id.0),
            Type::App { ctor, args } if args.is_empty() => write!(f, "{ctor}"),
            Type::App { ctor, args } => {
                write!(f, "{ctor}<")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ">")
            }
            Type::Function { params, result } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {result}")
            }
            Type::Record(fields) => {
                write!(f, "{{ ")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, " }}")
            }
            Type::Union(members) => {
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{m}")?;
                }
                Ok(())
            }
        }
    }
}

/// `Scheme { quantified, body }`. Produced only by generalization, consumed
/// only by instantiation (I1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheme {
    pub quantified: Vec<TypeVarId>,
    pub body: Type,
}

impl Scheme {
    /// A scheme with no quantified variables: a monomorphic type lifted to
    /// scheme position, e.g. for a binding the value restriction rejected.
    pub fn monomorphic(body: Type) -> Self {
        Self { quantified: Vec::new(), body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curry_turns_nary_function_into_chain() {
        let f = Type::Function {
            params: vec![Type::int(), Type::bool()],
            result: Box::new(Type::string()),
        };
        let curried = f.curry();
        match curried {
            Type::Function { params, result } => {
                assert_eq!(params, vec![Type::int()]);
                match *result {
                    Type::Function { params, result } => {
                        assert_eq!(params, vec![Type::bool()]);
                        assert_eq!(*result, Type::string());
                    }
                    _ => panic!("expected nested Function"),
                }
            }
            _ => panic!("expected Function"),
        }
    }

    #[test]
    fn occurs_check_finds_nested_var() {
        let var = Type::Var { id: TypeVarId(0), level: 0 };
        let wrapped = Type::list(var.clone());
        assert!(wrapped.occurs(TypeVarId(0)));
        assert!(!wrapped.occurs(TypeVarId(1)));
    }

    #[test]
    fn display_renders_function_type() {
        let f = Type::Function { params: vec![Type::int()], result: Box::new(Type::bool()) };
        assert_eq!(f.to_string(), "(Int) -> Bool");
    }
}
