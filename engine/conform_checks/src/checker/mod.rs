//! Compiled checkers: immutable matchers over runtime values.
//!
//! `Checker` is a closed sum type with exhaustive dispatch per
//! operation (`matches`, `fuzzy_score`, `name`, `describe_failure`).
//! The single open extension point is the `CheckDefinition` trait:
//! user-supplied matchers plug in through `Checker::User` without
//! reopening the closed variant set.
//!
//! Checkers are immutable once constructed and `Send + Sync`, so a
//! compiled checker may be consulted concurrently from any number of
//! threads without synchronization.

mod describe;
mod name;

use std::sync::Arc;

use crate::errors::{combinator_arity, SpecError};
use crate::value::{Heap, Value};

/// How the string classifier treats the two textual encodings.
///
/// Resolved once at engine configuration time, never inferred per value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextPolicy {
    /// `str` and `bytes` values both satisfy the string classifier.
    #[default]
    Lenient,
    /// Only `str` values satisfy the string classifier.
    Strict,
}

/// User-supplied matcher: the open extension point of the checker set.
///
/// Implementations must be pure over the value argument. `matches` may
/// never panic; `fuzzy_score` must stay within `[0, 1]` and return `1`
/// whenever `matches` returns `true`.
pub trait CheckDefinition: Send + Sync {
    /// Return `true` iff the value conforms to this type.
    fn matches(&self, value: &Value) -> bool;

    /// The rendered name of this type.
    fn name(&self) -> String {
        "?".to_string()
    }

    /// Estimate partial conformance in `[0, 1]`.
    ///
    /// Used only to rank union branches when attributing an error.
    /// The default implementation is binary.
    fn fuzzy_score(&self, value: &Value) -> f64 {
        if self.matches(value) {
            1.0
        } else {
            0.0
        }
    }
}

/// Tuple checker: fixed head slots plus an optional repeating tail.
#[derive(Clone)]
pub struct TupleChecker {
    /// Per-slot checkers for the leading elements.
    pub(crate) head: Vec<Checker>,
    /// Checker applied to every element past the head. `None` makes the
    /// tuple fixed-arity.
    pub(crate) tail: Option<Checker>,
}

/// Dict-literal-as-pattern checker.
///
/// A present key/value pair conforms when ANY declared entry jointly
/// matches it (key checker and value checker together). This is
/// deliberately not optimized to a map lookup: declared key checkers
/// may overlap in what they accept, and the joint-match semantics is
/// part of the contract.
#[derive(Clone)]
pub struct KeyedMapChecker {
    pub(crate) entries: Vec<(Checker, Checker)>,
    /// Checker for values under keys no declared entry accepts.
    pub(crate) catch_all: Option<Checker>,
}

impl KeyedMapChecker {
    /// Check one present key/value pair against the declared entries.
    fn entry_conforms(&self, key: &Value, value: &Value) -> bool {
        if self
            .entries
            .iter()
            .any(|(kc, vc)| kc.matches(key) && vc.matches(value))
        {
            return true;
        }
        if self.key_is_listed(key) {
            // A declared key accepts this key, but no entry jointly
            // matched: the value is wrong, not merely uncovered.
            return false;
        }
        self.catch_all.as_ref().is_some_and(|c| c.matches(value))
    }

    /// Whether some declared key checker accepts this key.
    pub(crate) fn key_is_listed(&self, key: &Value) -> bool {
        self.entries.iter().any(|(kc, _)| kc.matches(key))
    }
}

/// Homogeneous dict checker: every key and every value classified.
#[derive(Clone)]
pub struct MapChecker {
    pub(crate) key: Checker,
    pub(crate) value: Checker,
}

/// Compiled matcher for one type specification.
#[derive(Clone)]
pub enum Checker {
    /// Matches everything.
    Any,
    /// Matches values equal to the literal (equality, not identity).
    Literal(Value),
    /// Boolean classifier.
    Bool,
    /// Integer classifier. Booleans never satisfy it.
    Int,
    /// Numeric classifier: floats and ints, never booleans.
    Float,
    /// String classifier under the given text policy.
    Str(TextPolicy),
    /// Nominal membership in the named class.
    Class(Heap<String>),
    /// Homogeneous list.
    List(Heap<Checker>),
    /// Homogeneous set.
    Set(Heap<Checker>),
    /// Fixed or variadic tuple.
    Tuple(Heap<TupleChecker>),
    /// Dict-literal-as-pattern.
    KeyedMap(Heap<KeyedMapChecker>),
    /// Homogeneous dict.
    Map(Heap<MapChecker>),
    /// Logical OR over at least two children.
    Union(Heap<Vec<Checker>>),
    /// Logical AND over at least two children.
    Intersection(Heap<Vec<Checker>>),
    /// Matches iff no child matches.
    Negation(Heap<Vec<Checker>>),
    /// User-supplied matcher.
    User(Arc<dyn CheckDefinition>),
}

// Constructors

impl Checker {
    /// Nominal class checker.
    pub fn class(name: impl Into<String>) -> Self {
        Checker::Class(Heap::new(name.into()))
    }

    /// Homogeneous list checker.
    pub fn list(elem: Checker) -> Self {
        Checker::List(Heap::new(elem))
    }

    /// Homogeneous set checker.
    pub fn set(elem: Checker) -> Self {
        Checker::Set(Heap::new(elem))
    }

    /// Fixed-arity tuple checker: exact length, per-slot checkers.
    pub fn fixed_tuple(items: Vec<Checker>) -> Self {
        Checker::Tuple(Heap::new(TupleChecker {
            head: items,
            tail: None,
        }))
    }

    /// Variadic tuple checker: fixed head slots plus a repeating tail
    /// applied to all remaining elements.
    pub fn variadic_tuple(head: Vec<Checker>, tail: Checker) -> Self {
        Checker::Tuple(Heap::new(TupleChecker {
            head,
            tail: Some(tail),
        }))
    }

    /// Dict-literal-as-pattern checker.
    pub fn keyed_map(entries: Vec<(Checker, Checker)>, catch_all: Option<Checker>) -> Self {
        Checker::KeyedMap(Heap::new(KeyedMapChecker { entries, catch_all }))
    }

    /// Homogeneous dict checker.
    pub fn homogeneous_map(key: Checker, value: Checker) -> Self {
        Checker::Map(Heap::new(MapChecker { key, value }))
    }

    /// Union of at least two children.
    pub fn union(children: Vec<Checker>) -> Result<Self, SpecError> {
        if children.len() < 2 {
            return Err(combinator_arity("Union", 2, children.len()));
        }
        Ok(Checker::Union(Heap::new(children)))
    }

    /// Intersection of at least two children. A degenerate one-child
    /// intersection is a construction error, not an identity.
    pub fn intersection(children: Vec<Checker>) -> Result<Self, SpecError> {
        if children.len() < 2 {
            return Err(combinator_arity("Intersection", 2, children.len()));
        }
        Ok(Checker::Intersection(Heap::new(children)))
    }

    /// Negation of at least one child.
    pub fn negation(children: Vec<Checker>) -> Result<Self, SpecError> {
        if children.is_empty() {
            return Err(combinator_arity("Negation", 1, 0));
        }
        Ok(Checker::Negation(Heap::new(children)))
    }

    /// Wrap a user-supplied matcher.
    pub fn user(def: Arc<dyn CheckDefinition>) -> Self {
        Checker::User(def)
    }
}

// Matching

impl Checker {
    /// Test a value for structural conformance.
    ///
    /// Total over the value domain: never panics, never errors.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Checker::Any => true,
            Checker::Literal(lit) => value == lit,
            Checker::Bool => matches!(value, Value::Bool(_)),
            Checker::Int => matches!(value, Value::Int(_)),
            Checker::Float => matches!(value, Value::Int(_) | Value::Float(_)),
            Checker::Str(policy) => match value {
                Value::Str(_) => true,
                Value::Bytes(_) => *policy == TextPolicy::Lenient,
                _ => false,
            },
            Checker::Class(class_name) => class_matches(class_name, value),
            Checker::List(elem) => match value {
                Value::List(items) => items.iter().all(|v| elem.matches(v)),
                _ => false,
            },
            Checker::Set(elem) => match value {
                Value::Set(items) => items.iter().all(|v| elem.matches(v)),
                _ => false,
            },
            Checker::Tuple(tuple) => match value {
                Value::Tuple(items) => tuple_matches(tuple, items),
                _ => false,
            },
            Checker::KeyedMap(keyed) => match value {
                Value::Map(entries) => entries.iter().all(|(k, v)| keyed.entry_conforms(k, v)),
                _ => false,
            },
            Checker::Map(map) => match value {
                Value::Map(entries) => entries
                    .iter()
                    .all(|(k, v)| map.key.matches(k) && map.value.matches(v)),
                _ => false,
            },
            Checker::Union(children) => children.iter().any(|c| c.matches(value)),
            Checker::Intersection(children) => children.iter().all(|c| c.matches(value)),
            Checker::Negation(children) => !children.iter().any(|c| c.matches(value)),
            Checker::User(def) => def.matches(value),
        }
    }

    /// Estimate partial conformance in `[0, 1]`.
    ///
    /// `matches(v)` implies `fuzzy_score(v) == 1`. Container checkers
    /// score as the mean per-element score of their children (empty
    /// containers are vacuously compatible and score 1); scalar
    /// checkers score binary.
    pub fn fuzzy_score(&self, value: &Value) -> f64 {
        match self {
            Checker::List(elem) => match value {
                Value::List(items) => mean_score(items.iter().map(|v| elem.fuzzy_score(v))),
                _ => 0.0,
            },
            Checker::Set(elem) => match value {
                Value::Set(items) => mean_score(items.iter().map(|v| elem.fuzzy_score(v))),
                _ => 0.0,
            },
            Checker::Tuple(tuple) => match value {
                Value::Tuple(items) => tuple_fuzzy_score(tuple, items),
                _ => 0.0,
            },
            Checker::KeyedMap(keyed) => match value {
                Value::Map(entries) => mean_score(
                    entries
                        .iter()
                        .map(|(k, v)| keyed_entry_score(keyed, k, v)),
                ),
                _ => 0.0,
            },
            Checker::Map(map) => match value {
                Value::Map(entries) => mean_score(entries.iter().map(|(k, v)| {
                    if map.key.matches(k) {
                        map.value.fuzzy_score(v)
                    } else {
                        0.0
                    }
                })),
                _ => 0.0,
            },
            Checker::Union(children) => children
                .iter()
                .map(|c| c.fuzzy_score(value))
                .fold(0.0, f64::max),
            Checker::Intersection(children) => children
                .iter()
                .map(|c| c.fuzzy_score(value))
                .fold(1.0, f64::min),
            Checker::User(def) => def.fuzzy_score(value).clamp(0.0, 1.0),
            // Scalar checkers score binary
            _ => {
                if self.matches(value) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Nominal membership: built-in tag by name, or instance ancestry.
fn class_matches(class_name: &str, value: &Value) -> bool {
    match value {
        Value::Instance(inst) => inst.is_instance_of(class_name),
        _ => value.type_name() == class_name,
    }
}

fn tuple_matches(tuple: &TupleChecker, items: &[Value]) -> bool {
    let n = tuple.head.len();
    match &tuple.tail {
        Some(tail) => {
            items.len() >= n
                && tuple
                    .head
                    .iter()
                    .zip(items.iter())
                    .all(|(c, v)| c.matches(v))
                && items[n..].iter().all(|v| tail.matches(v))
        }
        None => {
            items.len() == n
                && tuple
                    .head
                    .iter()
                    .zip(items.iter())
                    .all(|(c, v)| c.matches(v))
        }
    }
}

fn tuple_fuzzy_score(tuple: &TupleChecker, items: &[Value]) -> f64 {
    let n = tuple.head.len();
    match &tuple.tail {
        Some(tail) => {
            if items.len() < n {
                return 0.0;
            }
            mean_score(
                tuple
                    .head
                    .iter()
                    .zip(items.iter())
                    .map(|(c, v)| c.fuzzy_score(v))
                    .chain(items[n..].iter().map(|v| tail.fuzzy_score(v))),
            )
        }
        None => {
            if items.len() != n {
                return 0.0;
            }
            mean_score(
                tuple
                    .head
                    .iter()
                    .zip(items.iter())
                    .map(|(c, v)| c.fuzzy_score(v)),
            )
        }
    }
}

fn keyed_entry_score(keyed: &KeyedMapChecker, key: &Value, value: &Value) -> f64 {
    if keyed.entry_conforms(key, value) {
        return 1.0;
    }
    if keyed.key_is_listed(key) {
        // Partial credit from the best value checker among the entries
        // whose key checker accepts this key.
        return keyed
            .entries
            .iter()
            .filter(|(kc, _)| kc.matches(key))
            .map(|(_, vc)| vc.fuzzy_score(value))
            .fold(0.0, f64::max);
    }
    0.0
}

/// Mean of an iterator of scores; empty iterators score 1 (vacuous).
fn mean_score(scores: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0_usize;
    for s in scores {
        sum += s;
        count += 1;
    }
    if count == 0 {
        1.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;
        sum / n
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
