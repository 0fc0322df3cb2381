//! Parameter descriptors supplied by the calling layer.
//!
//! The core never reflects over callables. Whatever layer sits above
//! (a macro, a binding generator, a test) declares the parameter roster
//! once, at registration time, through these descriptors.

use conform_checks::{TypeSpec, Value};

/// Name of the implicit receiver parameter.
pub const RECEIVER_NAME: &str = "self";

/// How a parameter binds during a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Bound by position only; never addressable by name.
    PositionalOnly,
    /// Bound by position or by name.
    PositionalOrKeyword,
    /// Bound by name only.
    KeywordOnly,
    /// Collects positional arguments beyond the declared roster.
    VarPositional,
    /// Collects keyword arguments matching no declared name.
    VarKeyword,
}

/// One declared parameter.
#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    /// Declared default value; its presence makes the parameter
    /// optional.
    pub default: Option<Value>,
}

impl ParamSpec {
    /// Ordinary positional-or-keyword parameter.
    pub fn positional(name: impl Into<String>) -> Self {
        ParamSpec {
            name: name.into(),
            kind: ParamKind::PositionalOrKeyword,
            default: None,
        }
    }

    /// Keyword-only parameter.
    pub fn keyword_only(name: impl Into<String>) -> Self {
        ParamSpec {
            name: name.into(),
            kind: ParamKind::KeywordOnly,
            default: None,
        }
    }

    /// Var-positional parameter (`*args`).
    pub fn var_positional(name: impl Into<String>) -> Self {
        ParamSpec {
            name: name.into(),
            kind: ParamKind::VarPositional,
            default: None,
        }
    }

    /// Var-keyword parameter (`**kws`).
    pub fn var_keyword(name: impl Into<String>) -> Self {
        ParamSpec {
            name: name.into(),
            kind: ParamKind::VarKeyword,
            default: None,
        }
    }

    /// Attach a default value, making the parameter optional.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Declared roster of a callable, in declaration order.
#[derive(Clone, Debug)]
pub struct FunctionDecl {
    /// Function name, rendered in messages as `` `name()` ``.
    pub name: String,
    pub params: Vec<ParamSpec>,
}

impl FunctionDecl {
    /// Start a declaration with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        FunctionDecl {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Append the implicit receiver parameter.
    #[must_use]
    pub fn with_receiver(self) -> Self {
        self.with_param(ParamSpec::positional(RECEIVER_NAME))
    }
}

/// Out-of-band directives extracted from a declared type mapping before
/// ordinary parameter matching.
#[derive(Clone, Debug, Default)]
pub struct Directives {
    /// Reclassify the last N positional parameters as keyword-only.
    pub kwonly: Option<usize>,
    /// Return-value type specification.
    pub ret: Option<TypeSpec>,
}

impl Directives {
    /// No directives.
    pub fn none() -> Self {
        Directives::default()
    }

    /// Only a return type.
    pub fn returns(spec: TypeSpec) -> Self {
        Directives {
            kwonly: None,
            ret: Some(spec),
        }
    }

    /// Only a kwonly conversion count.
    pub fn kwonly(count: usize) -> Self {
        Directives {
            kwonly: Some(count),
            ret: None,
        }
    }
}
