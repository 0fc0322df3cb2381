//! Conform Checks - checker engine for the Conform runtime validator.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `Heap`, `InstanceValue`)
//! - Compiled matchers (`Checker`) with matching, fuzzy scoring, name
//!   rendering, and diagnostic synthesis
//! - The checker compiler (`CheckerCompiler`, `TypeSpec`) with its
//!   process-lifetime cache
//! - Specification-construction errors (`SpecError`)
//!
//! # Architecture
//!
//! The checker set is a closed sum type with exhaustive dispatch per
//! operation, plus one open extension point:
//! - New built-in checker kinds extend the `Checker` enum
//! - User-supplied matchers implement `CheckDefinition` and plug in
//!   through `Checker::User` without reopening the closed set
//!
//! # Concurrency
//!
//! Checkers are immutable and `Send + Sync`; the compiler's cache is
//! the only shared mutable state and tolerates concurrent population
//! (a racing double-compile is benign).

mod checker;
mod compile;
mod errors;
mod value;

pub use checker::{CheckDefinition, Checker, KeyedMapChecker, MapChecker, TextPolicy, TupleChecker};
pub use compile::{CheckerCompiler, TypeSpec};
pub use errors::{SpecError, SpecErrorKind};

// Re-export error constructors for use by other crates
pub use errors::{combinator_arity, misplaced_ellipsis, unrecognized_spec};

pub use value::{Heap, InstanceValue, Value};
