//! Diagnostic message synthesis for failed checks.
//!
//! Messages embed the checker's rendered name verbatim and pinpoint the
//! first offending element of a container. Union failures are
//! attributed to the child with the highest fuzzy score, with the
//! message verb rewritten to signal that the blamed type is only the
//! best partial match.

use super::{Checker, KeyedMapChecker, MapChecker, TupleChecker};
use crate::value::Value;

impl Checker {
    /// Synthesize the diagnostic for a value that failed this checker.
    ///
    /// `param` is the label of the slot that received the value (a
    /// parameter name, or `*name` for a var-positional slot).
    pub fn describe_failure(&self, param: &str, value: &Value) -> String {
        match self {
            Checker::List(elem) => match value {
                Value::List(items) => {
                    self.element_failure(param, "list", items, elem)
                }
                _ => self.scalar_failure(param, value),
            },
            Checker::Set(elem) => match value {
                Value::Set(items) => self.element_failure(param, "set", items, elem),
                _ => self.scalar_failure(param, value),
            },
            Checker::Tuple(tuple) => match value {
                Value::Tuple(items) => self.tuple_failure(param, tuple, items),
                _ => self.scalar_failure(param, value),
            },
            Checker::KeyedMap(keyed) => match value {
                Value::Map(entries) => self.keyed_map_failure(param, keyed, entries),
                _ => self.scalar_failure(param, value),
            },
            Checker::Map(map) => match value {
                Value::Map(entries) => self.map_failure(param, map, entries),
                _ => self.scalar_failure(param, value),
            },
            Checker::Union(children) => union_failure(children, param, value),
            _ => self.scalar_failure(param, value),
        }
    }

    /// The base message shape shared by every scalar failure.
    fn scalar_failure(&self, param: &str, value: &Value) -> String {
        format!(
            "Parameter `{param}` of type `{}` received value {value} of type {}",
            self.name(),
            value.type_name()
        )
    }

    /// Blame the first element failing the element checker.
    fn element_failure(&self, param: &str, noun: &str, items: &[Value], elem: &Checker) -> String {
        let offender = items.iter().enumerate().find(|(_, v)| !elem.matches(v));
        match offender {
            Some((i, v)) => format!(
                "Parameter `{param}` of type `{}` received a {noun} where {} element is {v} of type {}",
                self.name(),
                ordinal(i + 1),
                v.type_name()
            ),
            None => self.scalar_failure(param, &Value::list(items.to_vec())),
        }
    }

    fn tuple_failure(&self, param: &str, tuple: &TupleChecker, items: &[Value]) -> String {
        let n = tuple.head.len();
        match &tuple.tail {
            None if items.len() != n => format!(
                "Parameter `{param}` of type `{}` received a tuple of length {}, whereas length {n} was expected",
                self.name(),
                items.len()
            ),
            Some(_) if items.len() < n => format!(
                "Parameter `{param}` of type `{}` received a tuple of length {}, whereas length of at least {n} was expected",
                self.name(),
                items.len()
            ),
            _ => {
                let offender = items.iter().enumerate().find(|(i, v)| {
                    let checker = tuple.head.get(*i).or(tuple.tail.as_ref());
                    checker.is_some_and(|c| !c.matches(v))
                });
                match offender {
                    Some((i, v)) => format!(
                        "Parameter `{param}` of type `{}` received a tuple where {} element is {v} of type {}",
                        self.name(),
                        ordinal(i + 1),
                        v.type_name()
                    ),
                    None => self.scalar_failure(param, &Value::tuple(items.to_vec())),
                }
            }
        }
    }

    fn keyed_map_failure(
        &self,
        param: &str,
        keyed: &KeyedMapChecker,
        entries: &[(Value, Value)],
    ) -> String {
        for (k, v) in entries {
            if keyed
                .entries
                .iter()
                .any(|(kc, vc)| kc.matches(k) && vc.matches(v))
            {
                continue;
            }
            if keyed.key_is_listed(k) || keyed.catch_all.is_some() {
                // The key is allowed, so its value must be the problem
                if keyed
                    .catch_all
                    .as_ref()
                    .is_some_and(|c| !keyed.key_is_listed(k) && c.matches(v))
                {
                    continue;
                }
                return format!(
                    "Parameter `{param}` of type `{}` received a dict where key {k} is {v} of type {}",
                    self.name(),
                    v.type_name()
                );
            }
            return format!(
                "Parameter `{param}` of type `{}` received a dict where key {k} of type {} is not allowed",
                self.name(),
                k.type_name()
            );
        }
        self.scalar_failure(param, &Value::map(entries.to_vec()))
    }

    fn map_failure(&self, param: &str, map: &MapChecker, entries: &[(Value, Value)]) -> String {
        for (k, v) in entries {
            if !map.key.matches(k) {
                return format!(
                    "Parameter `{param}` of type `{}` received a dict where key {k} of type {} is not allowed",
                    self.name(),
                    k.type_name()
                );
            }
            if !map.value.matches(v) {
                return format!(
                    "Parameter `{param}` of type `{}` received a dict where key {k} is {v} of type {}",
                    self.name(),
                    v.type_name()
                );
            }
        }
        self.scalar_failure(param, &Value::map(entries.to_vec()))
    }
}

/// Attribute a union failure to the best-scoring child.
///
/// Ties break toward the first-declared child. When no child scores
/// above zero, the fallback names only the received value.
fn union_failure(children: &[Checker], param: &str, value: &Value) -> String {
    let mut best_index = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, child) in children.iter().enumerate() {
        let score = child.fuzzy_score(value);
        if score > best_score {
            best_index = i;
            best_score = score;
        }
    }
    if best_score > 0.0 {
        let child = &children[best_index];
        let child_name = child.name();
        // Rewrite the verb: the blamed type is only the best partial
        // match, not a confirmed expectation.
        child.describe_failure(param, value).replacen(
            &format!("of type `{child_name}` received"),
            &format!("expects type `{child_name}` but received"),
            1,
        )
    } else {
        format!(
            "Parameter `{param}` received value {value} of type {}",
            value.type_name()
        )
    }
}

/// English ordinal: 1st, 2nd, 3rd, 4th, ..., 11th, 12th, 13th, 21st...
fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
