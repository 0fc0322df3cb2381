//! Error types for signature construction and call binding.
//!
//! Two families, matching how failures are consumed:
//! - `DeclError`: definition-time errors for malformed declarations.
//!   Fatal to defining the callable, raised exactly once.
//! - `CallError`: per-call errors, split along the two runtime kinds:
//!   a value failing its checker (type mismatch) versus a violation of
//!   the calling convention (arity/binding).
//!
//! Factory functions (e.g. `no_arguments()`) populate both `kind` and
//! `message`; the `Display` impls produce the exact message strings the
//! binder's callers assert on.

use std::fmt;

use conform_checks::SpecError;

/// Typed category for declaration-time failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclErrorKind {
    /// Declared type names that match no parameter.
    UnknownArguments { names: Vec<String> },
    /// The implicit receiver parameter was given a type.
    TypedReceiver,
    /// The kwonly directive cannot coexist with variadic or native
    /// keyword-only parameters.
    KwonlyConflict,
    /// The kwonly directive asked for more parameters than exist.
    KwonlyTooLarge,
    /// The kwonly directive would convert the receiver parameter.
    KwonlyReceiver,
    /// A declared type specification failed to compile.
    BadSpec { message: String },
}

impl fmt::Display for DeclErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownArguments { names } => {
                write!(f, "Invalid function argument(s): {}", names.join(", "))
            }
            Self::TypedReceiver => write!(f, "`self` parameter must not be typed"),
            Self::KwonlyConflict => write!(
                f,
                "kwonly directive cannot be combined with variadic or \
                 keyword-only parameters"
            ),
            Self::KwonlyTooLarge => write!(f, "Too many keyword-only parameters requested"),
            Self::KwonlyReceiver => write!(
                f,
                "positional-only parameter `self` cannot be made keyword-only"
            ),
            Self::BadSpec { message } => write!(f, "{message}"),
        }
    }
}

/// Declaration-time error: the signature cannot be constructed.
#[derive(Clone, Debug)]
pub struct DeclError {
    /// Structured error category.
    pub kind: DeclErrorKind,
    /// Human-readable error message, equal to `kind.to_string()`.
    pub message: String,
}

impl DeclError {
    fn from_kind(kind: DeclErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }
}

impl fmt::Display for DeclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DeclError {}

impl From<SpecError> for DeclError {
    fn from(err: SpecError) -> Self {
        DeclError::from_kind(DeclErrorKind::BadSpec {
            message: err.message,
        })
    }
}

/// Declared type names match no parameter, vararg, or varkw name.
#[cold]
pub fn unknown_arguments(names: Vec<String>) -> DeclError {
    DeclError::from_kind(DeclErrorKind::UnknownArguments { names })
}

/// The receiver parameter was given a type.
#[cold]
pub fn typed_receiver() -> DeclError {
    DeclError::from_kind(DeclErrorKind::TypedReceiver)
}

/// Kwonly directive combined with variadic or keyword-only parameters.
#[cold]
pub fn kwonly_conflict() -> DeclError {
    DeclError::from_kind(DeclErrorKind::KwonlyConflict)
}

/// Kwonly directive exceeds the available positional parameters.
#[cold]
pub fn kwonly_too_large() -> DeclError {
    DeclError::from_kind(DeclErrorKind::KwonlyTooLarge)
}

/// Kwonly directive would convert the receiver parameter.
#[cold]
pub fn kwonly_receiver() -> DeclError {
    DeclError::from_kind(DeclErrorKind::KwonlyReceiver)
}

/// Which parameter family a missing-argument error talks about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamRole {
    Positional,
    Keyword,
}

impl ParamRole {
    fn word(self) -> &'static str {
        match self {
            ParamRole::Positional => "positional",
            ParamRole::Keyword => "keyword",
        }
    }
}

/// Typed category for per-call failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallErrorKind {
    // Arity / binding errors
    /// Positional arguments given to a callable that takes none.
    NoArguments { func: String },
    /// Positional arguments given to a keyword-only callable.
    OnlyKeywordArguments { func: String },
    /// More positional arguments than the roster allows.
    TooManyPositional {
        func: String,
        expected: usize,
        got: usize,
    },
    /// Required parameters left unsupplied.
    MissingRequired {
        func: String,
        role: ParamRole,
        names: Vec<String>,
    },
    /// A parameter received both a positional and a keyword value.
    DuplicateArgument { func: String, name: String },
    /// A keyword name matching no parameter and no catch-all.
    UnexpectedKeyword { func: String, name: String },

    // Type errors
    /// A supplied value failed its parameter's checker. The message is
    /// the checker's own diagnostic.
    TypeMismatch { message: String },
    /// The return value failed the declared return checker.
    ReturnMismatch {
        func: String,
        expected: String,
        actual: String,
    },
}

impl CallErrorKind {
    /// Whether this is a type error, as opposed to an arity or binding
    /// error.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. } | Self::ReturnMismatch { .. }
        )
    }
}

/// Join names as `` `a`, `b` and `c` ``.
fn backtick_join(names: &[String]) -> String {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            if i + 1 == names.len() {
                out.push_str(" and ");
            } else {
                out.push_str(", ");
            }
        }
        out.push('`');
        out.push_str(name);
        out.push('`');
    }
    out
}

impl fmt::Display for CallErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoArguments { func } => {
                write!(f, "`{func}()` doesn't take any arguments")
            }
            Self::OnlyKeywordArguments { func } => {
                write!(f, "`{func}()` accepts only keyword arguments")
            }
            Self::TooManyPositional {
                func,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                let given_word = if *got == 1 { "was" } else { "were" };
                write!(
                    f,
                    "`{func}()` takes {expected} positional {arg_word} but {got} {given_word} given"
                )
            }
            Self::MissingRequired { func, role, names } => {
                if let [name] = names.as_slice() {
                    write!(
                        f,
                        "`{func}()` missing 1 required {} argument `{name}`",
                        role.word()
                    )
                } else {
                    write!(
                        f,
                        "`{func}()` missing {} required {} arguments: {}",
                        names.len(),
                        role.word(),
                        backtick_join(names)
                    )
                }
            }
            Self::DuplicateArgument { func, name } => {
                write!(f, "`{func}()` got multiple values for argument `{name}`")
            }
            Self::UnexpectedKeyword { func, name } => {
                write!(f, "`{func}()` got an unexpected keyword argument `{name}`")
            }
            Self::TypeMismatch { message } => write!(f, "{message}"),
            Self::ReturnMismatch {
                func,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Incorrect return type in `{func}()`: expected {expected} got {actual}"
                )
            }
        }
    }
}

/// Per-call error raised by the binder.
#[derive(Clone, Debug)]
pub struct CallError {
    /// Structured error category.
    pub kind: CallErrorKind,
    /// Human-readable error message, equal to `kind.to_string()`.
    pub message: String,
}

impl CallError {
    fn from_kind(kind: CallErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Whether this is a type error, as opposed to an arity or binding
    /// error.
    pub fn is_type_mismatch(&self) -> bool {
        self.kind.is_type_mismatch()
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CallError {}

/// Positional arguments given to a callable that takes none.
#[cold]
pub fn no_arguments(func: &str) -> CallError {
    CallError::from_kind(CallErrorKind::NoArguments {
        func: func.to_string(),
    })
}

/// Positional arguments given to a keyword-only callable.
#[cold]
pub fn only_keyword_arguments(func: &str) -> CallError {
    CallError::from_kind(CallErrorKind::OnlyKeywordArguments {
        func: func.to_string(),
    })
}

/// More positional arguments than the roster allows. Counts exclude the
/// receiver.
#[cold]
pub fn too_many_positional(func: &str, expected: usize, got: usize) -> CallError {
    CallError::from_kind(CallErrorKind::TooManyPositional {
        func: func.to_string(),
        expected,
        got,
    })
}

/// Required parameters left unsupplied.
#[cold]
pub fn missing_required(func: &str, role: ParamRole, names: Vec<String>) -> CallError {
    CallError::from_kind(CallErrorKind::MissingRequired {
        func: func.to_string(),
        role,
        names,
    })
}

/// A parameter received both a positional and a keyword value.
#[cold]
pub fn duplicate_argument(func: &str, name: &str) -> CallError {
    CallError::from_kind(CallErrorKind::DuplicateArgument {
        func: func.to_string(),
        name: name.to_string(),
    })
}

/// A keyword name matching no parameter and no catch-all.
#[cold]
pub fn unexpected_keyword(func: &str, name: &str) -> CallError {
    CallError::from_kind(CallErrorKind::UnexpectedKeyword {
        func: func.to_string(),
        name: name.to_string(),
    })
}

/// A supplied value failed its parameter's checker.
#[cold]
pub fn type_mismatch(message: String) -> CallError {
    CallError::from_kind(CallErrorKind::TypeMismatch { message })
}

/// The return value failed the declared return checker.
#[cold]
pub fn return_mismatch(func: &str, expected: &str, actual: &str) -> CallError {
    CallError::from_kind(CallErrorKind::ReturnMismatch {
        func: func.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}
