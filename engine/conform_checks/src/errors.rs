//! Construction errors for malformed type specifications.
//!
//! `SpecErrorKind` provides typed error categories; `#[cold]` factory
//! functions populate both `kind` and `message`. These errors surface at
//! definition time (compiling a specification), never while matching a
//! value: `Checker::matches` is total.

use std::fmt;

/// Typed category for specification-construction failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecErrorKind {
    /// The specification matched no recognized shape.
    UnrecognizedSpec {
        /// Rendering of the offending specification.
        spec: String,
    },
    /// A combinator was given fewer member types than it requires.
    CombinatorArity {
        combinator: &'static str,
        min: usize,
        got: usize,
    },
    /// The `...` sentinel appeared somewhere other than the final member
    /// of a tuple specification.
    MisplacedEllipsis,
}

impl fmt::Display for SpecErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedSpec { spec } => {
                write!(f, "unrecognized type specification: {spec}")
            }
            Self::CombinatorArity {
                combinator,
                min,
                got,
            } => {
                let member_word = if *min == 1 { "member type" } else { "member types" };
                write!(
                    f,
                    "{combinator} requires at least {min} {member_word}, got {got}"
                )
            }
            Self::MisplacedEllipsis => {
                write!(
                    f,
                    "`...` is only allowed as the final member of a tuple \
                     specification with a preceding element type"
                )
            }
        }
    }
}

/// Specification-construction error.
#[derive(Clone, Debug)]
pub struct SpecError {
    /// Structured error category.
    pub kind: SpecErrorKind,
    /// Human-readable error message, equal to `kind.to_string()`.
    pub message: String,
}

impl SpecError {
    fn from_kind(kind: SpecErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SpecError {}

/// The specification matched no recognized shape.
#[cold]
pub fn unrecognized_spec(spec: impl Into<String>) -> SpecError {
    SpecError::from_kind(SpecErrorKind::UnrecognizedSpec { spec: spec.into() })
}

/// A combinator received fewer member types than its contract allows.
#[cold]
pub fn combinator_arity(combinator: &'static str, min: usize, got: usize) -> SpecError {
    SpecError::from_kind(SpecErrorKind::CombinatorArity {
        combinator,
        min,
        got,
    })
}

/// The `...` sentinel appeared outside a variadic tuple tail position.
#[cold]
pub fn misplaced_ellipsis() -> SpecError {
    SpecError::from_kind(SpecErrorKind::MisplacedEllipsis)
}
