//! Signature construction: from a parameter roster to bound checkers.
//!
//! A `Signature` is derived once per callable at declaration time,
//! immutable thereafter, and shared across all calls to that callable.
//! Construction validates the declared type mapping and the directives
//! eagerly: malformed declarations are programmer errors and surface
//! immediately rather than at call time.

use rustc_hash::FxHashMap;
use tracing::debug;

use conform_checks::{Checker, CheckerCompiler, TypeSpec, Value};

use crate::decl::{Directives, FunctionDecl, ParamKind, RECEIVER_NAME};
use crate::errors::{
    kwonly_conflict, kwonly_receiver, kwonly_too_large, typed_receiver, unknown_arguments,
    DeclError,
};

/// One parameter slot with its bound checker.
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<Value>,
    pub(crate) checker: Option<Checker>,
}

impl Parameter {
    /// Whether this parameter binds positionally.
    pub(crate) fn is_positional(&self) -> bool {
        matches!(
            self.kind,
            ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword
        )
    }
}

/// Variadic slot (`*args` or `**kws`) with its optional checker.
pub(crate) struct VarSlot {
    pub(crate) name: String,
    pub(crate) checker: Option<Checker>,
}

/// Derived, immutable description of a callable's parameters, defaults,
/// and attached checkers.
pub struct Signature {
    pub(crate) name: String,
    /// Named parameters in declaration order: the positional prefix
    /// first, keyword-only parameters after it.
    pub(crate) params: Vec<Parameter>,
    pub(crate) param_index: FxHashMap<String, usize>,
    pub(crate) vararg: Option<VarSlot>,
    pub(crate) varkw: Option<VarSlot>,
    pub(crate) ret_checker: Option<Checker>,
    /// 1 when the first parameter is the implicit receiver.
    pub(crate) num_receiver: usize,
    /// Number of leading parameters that must be supplied.
    pub(crate) min_positional: usize,
    /// Number of parameters that may be supplied positionally.
    pub(crate) positional_count: usize,
}

impl Signature {
    /// Build a signature from a declared roster, a name-to-spec type
    /// mapping, and the out-of-band directives.
    pub fn new(
        decl: &FunctionDecl,
        declared: &[(String, TypeSpec)],
        directives: &Directives,
        compiler: &CheckerCompiler,
    ) -> Result<Signature, DeclError> {
        let mut params: Vec<Parameter> = Vec::new();
        let mut vararg: Option<VarSlot> = None;
        let mut varkw: Option<VarSlot> = None;
        let mut has_native_kwonly = false;
        let mut kw_region = false;

        for (i, spec) in decl.params.iter().enumerate() {
            match spec.kind {
                ParamKind::VarPositional => {
                    vararg = Some(VarSlot {
                        name: spec.name.clone(),
                        checker: None,
                    });
                    // Named parameters after `*args` bind by name only
                    kw_region = true;
                }
                ParamKind::VarKeyword => {
                    varkw = Some(VarSlot {
                        name: spec.name.clone(),
                        checker: None,
                    });
                }
                _ => {
                    let mut kind = spec.kind;
                    if i == 0 && spec.name == RECEIVER_NAME {
                        kind = ParamKind::PositionalOnly;
                    } else if kw_region {
                        kind = ParamKind::KeywordOnly;
                    }
                    if kind == ParamKind::KeywordOnly {
                        kw_region = true;
                        has_native_kwonly = true;
                    }
                    params.push(Parameter {
                        name: spec.name.clone(),
                        kind,
                        default: spec.default.clone(),
                        checker: None,
                    });
                }
            }
        }

        let num_receiver = usize::from(
            params
                .first()
                .is_some_and(|p| p.name == RECEIVER_NAME && p.kind == ParamKind::PositionalOnly),
        );
        let mut positional_count = params.iter().take_while(|p| p.is_positional()).count();
        let mut min_positional = params[..positional_count]
            .iter()
            .take_while(|p| p.default.is_none())
            .count();

        if let Some(n) = directives.kwonly {
            if has_native_kwonly {
                return Err(kwonly_conflict());
            }
            let available = positional_count - num_receiver;
            if n > available {
                if num_receiver > 0 && n <= positional_count {
                    return Err(kwonly_receiver());
                }
                return Err(kwonly_too_large());
            }
            if vararg.is_some() {
                return Err(kwonly_conflict());
            }
            for param in &mut params[positional_count - n..positional_count] {
                // A converted parameter without a default becomes a
                // required keyword-only parameter.
                param.kind = ParamKind::KeywordOnly;
            }
            positional_count -= n;
            min_positional = min_positional.min(positional_count);
        }

        let ret_checker = match &directives.ret {
            Some(spec) => Some(compiler.compile(spec)?),
            None => None,
        };

        let param_index: FxHashMap<String, usize> = params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();

        let mut unknown: Vec<String> = Vec::new();
        for (name, spec) in declared {
            if num_receiver == 1 && name == RECEIVER_NAME {
                return Err(typed_receiver());
            }
            if vararg.as_ref().is_some_and(|slot| slot.name == *name) {
                let checker = compiler.compile(spec)?;
                if let Some(slot) = vararg.as_mut() {
                    slot.checker = Some(checker);
                }
            } else if varkw.as_ref().is_some_and(|slot| slot.name == *name) {
                let checker = compiler.compile(spec)?;
                if let Some(slot) = varkw.as_mut() {
                    slot.checker = Some(checker);
                }
            } else if let Some(&i) = param_index.get(name) {
                params[i].checker = Some(compiler.compile(spec)?);
            } else {
                unknown.push(name.clone());
            }
        }
        if !unknown.is_empty() {
            return Err(unknown_arguments(unknown));
        }

        debug!(
            function = %decl.name,
            params = params.len(),
            "signature constructed"
        );

        Ok(Signature {
            name: decl.name.clone(),
            params,
            param_index,
            vararg,
            varkw,
            ret_checker,
            num_receiver,
            min_positional,
            positional_count,
        })
    }

    /// Function name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Named parameters, positional prefix first.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Number of leading parameters that must be supplied.
    pub fn min_positional(&self) -> usize {
        self.min_positional
    }

    /// Ceiling on positional arguments; `None` with a var-positional
    /// slot.
    pub fn max_positional(&self) -> Option<usize> {
        if self.vararg.is_some() {
            None
        } else {
            Some(self.positional_count)
        }
    }

    /// Whether the callable takes no arguments at all (beyond the
    /// receiver).
    pub fn has_no_args(&self) -> bool {
        self.params.len() == self.num_receiver && self.vararg.is_none() && self.varkw.is_none()
    }

    /// Whether every non-receiver parameter binds by name only.
    pub fn accepts_only_keywords(&self) -> bool {
        self.vararg.is_none() && self.positional_count == self.num_receiver
    }

    /// Whether the first parameter is the implicit receiver.
    pub fn has_receiver(&self) -> bool {
        self.num_receiver == 1
    }

    /// Whether a return checker is attached.
    pub fn checks_return(&self) -> bool {
        self.ret_checker.is_some()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
