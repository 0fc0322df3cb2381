//! The checker compiler: type specifications in, checkers out.
//!
//! `TypeSpec` is the in-memory specification grammar; `CheckerCompiler`
//! resolves a spec to a `Checker`, recursing into sub-specs, and caches
//! the result when the spec is usable as a cache key. Container-literal
//! patterns and user predicates are recompiled each time: such specs are
//! rarely reused and never mutated after being passed in.

mod cache;

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::checker::{CheckDefinition, Checker, TextPolicy};
use crate::errors::{combinator_arity, misplaced_ellipsis, unrecognized_spec, SpecError};
use crate::value::Value;

use cache::CheckerCache;

/// Declarative type specification.
///
/// Mirrors what a caller can express: nominal classes, scalar literals,
/// generic container markers, container literals used as patterns,
/// combinators, already-compiled checkers, and user predicates.
#[derive(Clone)]
pub enum TypeSpec {
    /// Matches everything.
    Any,
    /// Nominal class or built-in type tag (`"int"`, `"str"`, `"list"`,
    /// user class names). Primitive tags compile to the primitive
    /// classifiers; everything else to a nominal checker.
    Class(String),
    /// Scalar literal constant (booleans, numbers, strings, `None`).
    Literal(Value),
    /// Generic list marker, optionally parameterized.
    ListOf(Option<Box<TypeSpec>>),
    /// Generic set marker, optionally parameterized.
    SetOf(Option<Box<TypeSpec>>),
    /// Generic dict marker, optionally parameterized by key and value.
    DictOf(Option<Box<(TypeSpec, TypeSpec)>>),
    /// Generic tuple marker. An empty member list degrades to the bare
    /// nominal tuple checker; a trailing `Ellipsis` makes it variadic.
    TupleOf(Vec<TypeSpec>),
    /// Union combinator; requires at least two members.
    UnionOf(Vec<TypeSpec>),
    /// Intersection combinator; requires at least two members.
    IntersectionOf(Vec<TypeSpec>),
    /// Negation combinator; requires at least one member.
    NegationOf(Vec<TypeSpec>),
    /// List literal used as a pattern: element type is the union of the
    /// members (any element for an empty literal).
    ListPattern(Vec<TypeSpec>),
    /// Set literal used as a pattern.
    SetPattern(Vec<TypeSpec>),
    /// Tuple literal used as a pattern: per-slot types, with a trailing
    /// `Ellipsis` for variadic tails.
    TuplePattern(Vec<TypeSpec>),
    /// Dict literal used as a pattern: key-spec/value-spec entries. An
    /// `Ellipsis` key declares the catch-all value spec.
    DictPattern(Vec<(TypeSpec, TypeSpec)>),
    /// The variadic-tuple sentinel / dict catch-all key.
    Ellipsis,
    /// An already-compiled checker, returned unchanged.
    Compiled(Checker),
    /// A user-supplied matcher.
    Magic(Arc<dyn CheckDefinition>),
}

impl TypeSpec {
    /// Nominal class spec.
    pub fn class(name: impl Into<String>) -> Self {
        TypeSpec::Class(name.into())
    }

    /// Scalar literal spec.
    pub fn literal(value: Value) -> Self {
        TypeSpec::Literal(value)
    }

    /// Parameterized list marker.
    pub fn list_of(elem: TypeSpec) -> Self {
        TypeSpec::ListOf(Some(Box::new(elem)))
    }

    /// Parameterized set marker.
    pub fn set_of(elem: TypeSpec) -> Self {
        TypeSpec::SetOf(Some(Box::new(elem)))
    }

    /// Parameterized dict marker.
    pub fn dict_of(key: TypeSpec, value: TypeSpec) -> Self {
        TypeSpec::DictOf(Some(Box::new((key, value))))
    }

    /// Fixed or variadic tuple marker.
    pub fn tuple_of(items: Vec<TypeSpec>) -> Self {
        TypeSpec::TupleOf(items)
    }

    /// Union of member specs.
    pub fn union_of(members: Vec<TypeSpec>) -> Self {
        TypeSpec::UnionOf(members)
    }

    /// Intersection of member specs.
    pub fn intersection_of(members: Vec<TypeSpec>) -> Self {
        TypeSpec::IntersectionOf(members)
    }

    /// Negation of member specs.
    pub fn negation_of(members: Vec<TypeSpec>) -> Self {
        TypeSpec::NegationOf(members)
    }

    /// Optional wrapper: the union of `spec` and the `None` literal.
    pub fn optional(spec: TypeSpec) -> Self {
        TypeSpec::UnionOf(vec![spec, TypeSpec::Literal(Value::None)])
    }

    /// Wrap an already-compiled checker.
    pub fn compiled(checker: Checker) -> Self {
        TypeSpec::Compiled(checker)
    }

    /// Wrap a user-supplied matcher.
    pub fn magic(def: Arc<dyn CheckDefinition>) -> Self {
        TypeSpec::Magic(def)
    }

    /// Derive the cache key, if this spec is usable as one.
    ///
    /// Container-literal patterns, compiled checkers, and user
    /// predicates have no key and are recompiled on every use.
    fn cache_key(&self) -> Option<SpecKey> {
        fn keys(specs: &[TypeSpec]) -> Option<Vec<SpecKey>> {
            specs.iter().map(TypeSpec::cache_key).collect()
        }
        match self {
            TypeSpec::Any => Some(SpecKey::Any),
            TypeSpec::Ellipsis => Some(SpecKey::Ellipsis),
            TypeSpec::Class(name) => Some(SpecKey::Class(name.clone())),
            TypeSpec::Literal(value) => Some(SpecKey::Literal(value.clone())),
            TypeSpec::ListOf(elem) => match elem {
                None => Some(SpecKey::ListOf(None)),
                Some(e) => Some(SpecKey::ListOf(Some(Box::new(e.cache_key()?)))),
            },
            TypeSpec::SetOf(elem) => match elem {
                None => Some(SpecKey::SetOf(None)),
                Some(e) => Some(SpecKey::SetOf(Some(Box::new(e.cache_key()?)))),
            },
            TypeSpec::DictOf(kv) => match kv {
                None => Some(SpecKey::DictOf(None)),
                Some(kv) => Some(SpecKey::DictOf(Some(Box::new((
                    kv.0.cache_key()?,
                    kv.1.cache_key()?,
                ))))),
            },
            TypeSpec::TupleOf(items) => Some(SpecKey::TupleOf(keys(items)?)),
            TypeSpec::UnionOf(members) => Some(SpecKey::UnionOf(keys(members)?)),
            TypeSpec::IntersectionOf(members) => Some(SpecKey::IntersectionOf(keys(members)?)),
            TypeSpec::NegationOf(members) => Some(SpecKey::NegationOf(keys(members)?)),
            TypeSpec::ListPattern(_)
            | TypeSpec::SetPattern(_)
            | TypeSpec::TuplePattern(_)
            | TypeSpec::DictPattern(_)
            | TypeSpec::Compiled(_)
            | TypeSpec::Magic(_) => None,
        }
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Any => write!(f, "Any"),
            TypeSpec::Ellipsis => write!(f, "..."),
            TypeSpec::Class(name) => write!(f, "Class({name})"),
            TypeSpec::Literal(value) => write!(f, "Literal({value:?})"),
            TypeSpec::ListOf(elem) => f.debug_tuple("ListOf").field(elem).finish(),
            TypeSpec::SetOf(elem) => f.debug_tuple("SetOf").field(elem).finish(),
            TypeSpec::DictOf(kv) => f.debug_tuple("DictOf").field(kv).finish(),
            TypeSpec::TupleOf(items) => f.debug_tuple("TupleOf").field(items).finish(),
            TypeSpec::UnionOf(members) => f.debug_tuple("UnionOf").field(members).finish(),
            TypeSpec::IntersectionOf(members) => {
                f.debug_tuple("IntersectionOf").field(members).finish()
            }
            TypeSpec::NegationOf(members) => f.debug_tuple("NegationOf").field(members).finish(),
            TypeSpec::ListPattern(members) => f.debug_tuple("ListPattern").field(members).finish(),
            TypeSpec::SetPattern(members) => f.debug_tuple("SetPattern").field(members).finish(),
            TypeSpec::TuplePattern(items) => f.debug_tuple("TuplePattern").field(items).finish(),
            TypeSpec::DictPattern(entries) => f.debug_tuple("DictPattern").field(entries).finish(),
            TypeSpec::Compiled(_) => write!(f, "Compiled(<checker>)"),
            TypeSpec::Magic(_) => write!(f, "Magic(<user>)"),
        }
    }
}

/// Hashable projection of a cacheable `TypeSpec`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SpecKey {
    Any,
    Ellipsis,
    Class(String),
    Literal(Value),
    ListOf(Option<Box<SpecKey>>),
    SetOf(Option<Box<SpecKey>>),
    DictOf(Option<Box<(SpecKey, SpecKey)>>),
    TupleOf(Vec<SpecKey>),
    UnionOf(Vec<SpecKey>),
    IntersectionOf(Vec<SpecKey>),
    NegationOf(Vec<SpecKey>),
}

/// Compiles type specifications into checkers.
///
/// Owns the text policy and the checker cache. Created once at engine
/// configuration time and shared by reference; all methods take `&self`
/// and are safe to call concurrently.
pub struct CheckerCompiler {
    policy: TextPolicy,
    cache: CheckerCache,
    // The boolean literal checkers are pre-seeded: `true`/`false` specs
    // are the hot path of flag-typed parameters.
    true_checker: Checker,
    false_checker: Checker,
}

impl CheckerCompiler {
    /// Create a compiler with the given text policy.
    pub fn new(policy: TextPolicy) -> Self {
        CheckerCompiler {
            policy,
            cache: CheckerCache::new(),
            true_checker: Checker::Literal(Value::Bool(true)),
            false_checker: Checker::Literal(Value::Bool(false)),
        }
    }

    /// Compile a type specification into a checker.
    ///
    /// Cacheable specs compiled twice return behavior-equivalent
    /// checkers; racing callers may both compile, which is benign.
    pub fn compile(&self, spec: &TypeSpec) -> Result<Checker, SpecError> {
        if let TypeSpec::Literal(Value::Bool(b)) = spec {
            let checker = if *b {
                &self.true_checker
            } else {
                &self.false_checker
            };
            return Ok(checker.clone());
        }
        let key = spec.cache_key();
        if let Some(key) = &key {
            if let Some(hit) = self.cache.get(key) {
                trace!(spec = ?spec, "checker cache hit");
                return Ok(hit);
            }
        }
        let checker = self.build(spec)?;
        if let Some(key) = key {
            self.cache.insert(key, checker.clone());
            trace!(spec = ?spec, cached = self.cache.len(), "checker compiled");
        }
        Ok(checker)
    }

    /// Test a value against a specification.
    pub fn is_type(&self, value: &Value, spec: &TypeSpec) -> Result<bool, SpecError> {
        Ok(self.compile(spec)?.matches(value))
    }

    /// Test a value against any of several specifications (union
    /// semantics; an empty slice matches nothing).
    pub fn is_type_any(&self, value: &Value, specs: &[TypeSpec]) -> Result<bool, SpecError> {
        for spec in specs {
            if self.is_type(value, spec)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Render the name of a specification.
    pub fn name_type(&self, spec: &TypeSpec) -> Result<String, SpecError> {
        Ok(self.compile(spec)?.name())
    }

    fn build(&self, spec: &TypeSpec) -> Result<Checker, SpecError> {
        match spec {
            TypeSpec::Any => Ok(Checker::Any),
            TypeSpec::Literal(value) => Ok(Checker::Literal(value.clone())),
            TypeSpec::Compiled(checker) => Ok(checker.clone()),
            TypeSpec::Magic(def) => Ok(Checker::User(Arc::clone(def))),
            TypeSpec::ListOf(None) => Ok(Checker::class("list")),
            TypeSpec::ListOf(Some(elem)) => Ok(Checker::list(self.compile(elem)?)),
            TypeSpec::SetOf(None) => Ok(Checker::class("set")),
            TypeSpec::SetOf(Some(elem)) => Ok(Checker::set(self.compile(elem)?)),
            TypeSpec::DictOf(None) => Ok(Checker::class("dict")),
            TypeSpec::DictOf(Some(kv)) => Ok(Checker::homogeneous_map(
                self.compile(&kv.0)?,
                self.compile(&kv.1)?,
            )),
            TypeSpec::TupleOf(items) if items.is_empty() => Ok(Checker::class("tuple")),
            TypeSpec::TupleOf(items) | TypeSpec::TuplePattern(items) => self.build_tuple(items),
            TypeSpec::UnionOf(members) => {
                if members.len() < 2 {
                    return Err(combinator_arity("Union", 2, members.len()));
                }
                Checker::union(self.compile_all(members)?)
            }
            TypeSpec::IntersectionOf(members) => {
                if members.len() < 2 {
                    return Err(combinator_arity("Intersection", 2, members.len()));
                }
                Checker::intersection(self.compile_all(members)?)
            }
            TypeSpec::NegationOf(members) => {
                if members.is_empty() {
                    return Err(combinator_arity("Negation", 1, 0));
                }
                Checker::negation(self.compile_all(members)?)
            }
            TypeSpec::Class(name) => Ok(match name.as_str() {
                "bool" => Checker::Bool,
                "int" => Checker::Int,
                "float" => Checker::Float,
                "str" => Checker::Str(self.policy),
                _ => Checker::class(name.clone()),
            }),
            TypeSpec::ListPattern(members) => Ok(Checker::list(self.member_union(members)?)),
            TypeSpec::SetPattern(members) => Ok(Checker::set(self.member_union(members)?)),
            TypeSpec::DictPattern(entries) => self.build_keyed_map(entries),
            TypeSpec::Ellipsis => Err(unrecognized_spec("...")),
        }
    }

    fn compile_all(&self, specs: &[TypeSpec]) -> Result<Vec<Checker>, SpecError> {
        specs.iter().map(|s| self.compile(s)).collect()
    }

    /// Element checker for a container literal: the union over members
    /// when there is more than one, any element when there are none.
    fn member_union(&self, members: &[TypeSpec]) -> Result<Checker, SpecError> {
        match members {
            [] => Ok(Checker::Any),
            [single] => self.compile(single),
            _ => Checker::union(self.compile_all(members)?),
        }
    }

    fn build_tuple(&self, items: &[TypeSpec]) -> Result<Checker, SpecError> {
        if items.len() >= 2 && matches!(items[items.len() - 1], TypeSpec::Ellipsis) {
            let head_specs = &items[..items.len() - 2];
            if head_specs.iter().any(|s| matches!(s, TypeSpec::Ellipsis)) {
                return Err(misplaced_ellipsis());
            }
            let head = self.compile_all(head_specs)?;
            let tail = self.compile(&items[items.len() - 2])?;
            return Ok(Checker::variadic_tuple(head, tail));
        }
        if items.iter().any(|s| matches!(s, TypeSpec::Ellipsis)) {
            return Err(misplaced_ellipsis());
        }
        Ok(Checker::fixed_tuple(self.compile_all(items)?))
    }

    fn build_keyed_map(&self, entries: &[(TypeSpec, TypeSpec)]) -> Result<Checker, SpecError> {
        let mut compiled = Vec::with_capacity(entries.len());
        let mut catch_all = None;
        for (key_spec, value_spec) in entries {
            if matches!(key_spec, TypeSpec::Ellipsis) {
                catch_all = Some(self.compile(value_spec)?);
                continue;
            }
            compiled.push((self.compile(key_spec)?, self.compile(value_spec)?));
        }
        Ok(Checker::keyed_map(compiled, catch_all))
    }
}

impl Default for CheckerCompiler {
    fn default() -> Self {
        Self::new(TextPolicy::default())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
