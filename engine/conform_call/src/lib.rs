//! Conform Call - call-signature binding for the Conform validator.
//!
//! This crate applies the checker engine to function parameter lists:
//! - `FunctionDecl`/`ParamSpec` describe a callable's roster (the core
//!   never reflects; the calling layer declares)
//! - `Signature` binds declared type specifications to parameters once,
//!   at definition time
//! - `Signature::check_call`/`check_return` validate each call,
//!   reproducing exact call-binding semantics (arity, defaults,
//!   positional/keyword/variadic parameters)
//!
//! The decorator layer above is expected to call `check_call`, invoke
//! the real callable, then call `check_return`; exception-class
//! selection and presentation stay out of this crate.

mod binder;
mod decl;
mod errors;
mod signature;

pub use decl::{Directives, FunctionDecl, ParamKind, ParamSpec, RECEIVER_NAME};
pub use errors::{CallError, CallErrorKind, DeclError, DeclErrorKind, ParamRole};
pub use signature::{Parameter, Signature};

// Re-export error constructors for use by other crates
pub use errors::{
    duplicate_argument, kwonly_conflict, kwonly_receiver, kwonly_too_large, missing_required,
    no_arguments, only_keyword_arguments, return_mismatch, too_many_positional, type_mismatch,
    typed_receiver, unexpected_keyword, unknown_arguments,
};

// Re-export the checker engine surface the binder is built on
pub use conform_checks::{CheckerCompiler, TextPolicy, TypeSpec, Value};
