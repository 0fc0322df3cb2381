//! Deterministic name rendering for checkers.
//!
//! The rendered name is reused verbatim inside diagnostic messages, so
//! `name()` and `describe_failure()` must agree exactly.

use super::Checker;
use crate::value::Value;

impl Checker {
    /// Render the name of this type.
    ///
    /// Pure and deterministic over the checker's structure.
    pub fn name(&self) -> String {
        match self {
            Checker::Any => "Any".to_string(),
            Checker::Literal(v) => v.to_string(),
            Checker::Bool => "bool".to_string(),
            Checker::Int => "int".to_string(),
            // The numeric classifier accepts ints as well as floats
            Checker::Float => "numeric".to_string(),
            Checker::Str(_) => "str".to_string(),
            Checker::Class(class_name) => class_name.to_string(),
            Checker::List(elem) => format!("List[{}]", elem.name()),
            Checker::Set(elem) => format!("Set[{}]", elem.name()),
            Checker::Tuple(tuple) => {
                let mut parts: Vec<String> = tuple.head.iter().map(Checker::name).collect();
                if let Some(tail) = &tuple.tail {
                    parts.push(tail.name());
                    parts.push("...".to_string());
                }
                format!("Tuple[{}]", parts.join(", "))
            }
            Checker::Map(map) => format!("Dict[{}, {}]", map.key.name(), map.value.name()),
            Checker::KeyedMap(keyed) => {
                let mut parts: Vec<String> = keyed
                    .entries
                    .iter()
                    .map(|(kc, vc)| format!("{}: {}", kc.name(), vc.name()))
                    .collect();
                if keyed.catch_all.is_some() {
                    parts.push("...".to_string());
                }
                format!("{{{}}}", parts.join(", "))
            }
            Checker::Union(children) => union_name(children),
            Checker::Intersection(children) => {
                let parts: Vec<String> = children.iter().map(Checker::name).collect();
                format!("Intersection[{}]", parts.join(", "))
            }
            Checker::Negation(children) => {
                if let [child] = children.as_slice() {
                    format!("!{}", child.name())
                } else {
                    let parts: Vec<String> = children.iter().map(Checker::name).collect();
                    format!("!({})", parts.join(", "))
                }
            }
            Checker::User(def) => def.name(),
        }
    }
}

/// A two-member union containing the `None` literal renders as an
/// optional wrapper around the other member.
fn union_name(children: &[Checker]) -> String {
    if children.len() == 2 {
        let none_at = children
            .iter()
            .position(|c| matches!(c, Checker::Literal(Value::None)));
        if let Some(i) = none_at {
            return format!("?{}", children[1 - i].name());
        }
    }
    let parts: Vec<String> = children.iter().map(Checker::name).collect();
    format!("Union[{}]", parts.join(", "))
}
