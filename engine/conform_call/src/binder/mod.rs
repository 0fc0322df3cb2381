//! Call binding: validate actual arguments against a signature.
//!
//! A state machine over a single call, raising on the first detected
//! violation. Arity is checked before types, and required-parameter
//! presence before either kind of per-value check, mirroring the host
//! calling convention exactly.

use conform_checks::Value;

use crate::decl::ParamKind;
use crate::errors::{
    duplicate_argument, missing_required, no_arguments, only_keyword_arguments, return_mismatch,
    too_many_positional, type_mismatch, unexpected_keyword, CallError, ParamRole,
};
use crate::signature::Signature;

impl Signature {
    /// Validate a call's positional and keyword arguments.
    ///
    /// Keyword arguments are an ordered slice so that first-violation
    /// detection is deterministic.
    pub fn check_call(&self, args: &[Value], kws: &[(String, Value)]) -> Result<(), CallError> {
        self.check_arity_ceiling(args)?;
        self.check_missing_positional(args, kws)?;
        self.check_missing_keyword(kws)?;
        self.check_positional_types(args)?;
        self.check_keywords(args, kws)
    }

    /// Validate the wrapped callable's return value.
    pub fn check_return(&self, value: &Value) -> Result<(), CallError> {
        if let Some(checker) = &self.ret_checker {
            if !checker.matches(value) {
                return Err(return_mismatch(
                    &self.name,
                    &checker.name(),
                    value.type_name(),
                ));
            }
        }
        Ok(())
    }

    /// Step 1: too many positional arguments. The receiver is excluded
    /// from the displayed counts.
    fn check_arity_ceiling(&self, args: &[Value]) -> Result<(), CallError> {
        let Some(max) = self.max_positional() else {
            return Ok(());
        };
        if args.len() <= max {
            return Ok(());
        }
        if self.has_no_args() {
            return Err(no_arguments(&self.name));
        }
        if max == self.num_receiver {
            return Err(only_keyword_arguments(&self.name));
        }
        Err(too_many_positional(
            &self.name,
            max - self.num_receiver,
            args.len() - self.num_receiver,
        ))
    }

    /// Step 2: required positional parameters left unsupplied, unless
    /// supplied by name.
    fn check_missing_positional(
        &self,
        args: &[Value],
        kws: &[(String, Value)],
    ) -> Result<(), CallError> {
        if args.len() >= self.min_positional {
            return Ok(());
        }
        let missing: Vec<String> = self.params[args.len()..self.min_positional]
            .iter()
            .filter(|p| !kws.iter().any(|(name, _)| name == &p.name))
            .map(|p| p.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(missing_required(&self.name, ParamRole::Positional, missing))
    }

    /// Step 3: required keyword-only parameters absent from `kws`.
    fn check_missing_keyword(&self, kws: &[(String, Value)]) -> Result<(), CallError> {
        let missing: Vec<String> = self
            .params
            .iter()
            .filter(|p| p.kind == ParamKind::KeywordOnly && p.default.is_none())
            .filter(|p| !kws.iter().any(|(name, _)| name == &p.name))
            .map(|p| p.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(missing_required(&self.name, ParamRole::Keyword, missing))
    }

    /// Step 4: per-positional type checks. A value equal to the
    /// parameter's declared default is exempt, which permits sentinel
    /// defaults regardless of the declared type.
    fn check_positional_types(&self, args: &[Value]) -> Result<(), CallError> {
        for (i, value) in args.iter().enumerate() {
            if i < self.num_receiver {
                continue;
            }
            if i < self.positional_count {
                let param = &self.params[i];
                let Some(checker) = &param.checker else {
                    continue;
                };
                if param.default.as_ref() == Some(value) {
                    continue;
                }
                if !checker.matches(value) {
                    return Err(type_mismatch(checker.describe_failure(&param.name, value)));
                }
            } else if let Some(slot) = &self.vararg {
                let Some(checker) = &slot.checker else {
                    continue;
                };
                if !checker.matches(value) {
                    let label = format!("*{}", slot.name);
                    return Err(type_mismatch(checker.describe_failure(&label, value)));
                }
            }
        }
        Ok(())
    }

    /// Step 5: per-keyword checks, in supplied order. Duplicate
    /// coverage is detected before the value is type-checked.
    fn check_keywords(&self, args: &[Value], kws: &[(String, Value)]) -> Result<(), CallError> {
        for (name, value) in kws {
            if let Some(&i) = self.param_index.get(name) {
                let param = &self.params[i];
                if param.is_positional() && i < args.len() {
                    return Err(duplicate_argument(&self.name, name));
                }
                let Some(checker) = &param.checker else {
                    continue;
                };
                if param.default.as_ref() == Some(value) {
                    continue;
                }
                if !checker.matches(value) {
                    return Err(type_mismatch(checker.describe_failure(name, value)));
                }
            } else if let Some(slot) = &self.varkw {
                let Some(checker) = &slot.checker else {
                    continue;
                };
                if !checker.matches(value) {
                    return Err(type_mismatch(checker.describe_failure(name, value)));
                }
            } else {
                return Err(unexpected_keyword(&self.name, name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
