//! Runtime values for the Conform engine.
//!
//! # Arc Enforcement Architecture
//!
//! This module enforces that all heap allocations go through factory
//! methods on `Value`. The `Heap<T>` wrapper type has a crate-private
//! constructor, so external code cannot create heap values directly.
//!
//! ## Correct Usage
//!
//! ```text
//! let s = Value::string("hello");          // OK
//! let list = Value::list(vec![]);          // OK
//! let pair = Value::tuple(vec![Value::Int(1), Value::Bool(true)]);
//! ```
//!
//! # Thread Safety
//!
//! All heap types use `Arc` internally for thread-safe reference
//! counting. Values are immutable once constructed, so checkers may
//! inspect them concurrently without synchronization.

mod heap;

use std::fmt;

pub use heap::Heap;

/// Nominal class instance.
///
/// Models values of user-defined classes that the engine cannot inspect
/// structurally. The `ancestry` list carries the names of all ancestor
/// classes, so nominal membership tests can honor subtyping.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceValue {
    /// Name of the concrete class.
    pub class_name: String,
    /// Names of ancestor classes, nearest first.
    pub ancestry: Vec<String>,
}

impl InstanceValue {
    /// Check nominal membership in the class named `name`.
    pub fn is_instance_of(&self, name: &str) -> bool {
        self.class_name == name || self.ancestry.iter().any(|a| a == name)
    }
}

/// Runtime value tested by checkers.
#[derive(Clone)]
pub enum Value {
    // Primitives (inline, no heap allocation)
    /// Boolean value. Never satisfies the int or numeric classifiers.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Null value.
    None,

    // Heap Types (use Heap<T> for enforced Arc usage)
    /// Text string.
    Str(Heap<String>),
    /// Byte string (the second textual encoding).
    Bytes(Heap<Vec<u8>>),
    /// List of values.
    List(Heap<Vec<Value>>),
    /// Set of values. Membership is structural; the engine does not
    /// deduplicate, values arrive from the host already formed.
    Set(Heap<Vec<Value>>),
    /// Tuple of values.
    Tuple(Heap<Vec<Value>>),
    /// Dict as ordered key/value pairs.
    Map(Heap<Vec<(Value, Value)>>),
    /// Nominal class instance.
    Instance(Heap<InstanceValue>),
}

// Factory Methods (ONLY way to construct heap values)

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a byte-string value.
    #[inline]
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(Heap::new(b.into()))
    }

    /// Create a list value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a set value.
    #[inline]
    pub fn set(items: Vec<Value>) -> Self {
        Value::Set(Heap::new(items))
    }

    /// Create a tuple value.
    #[inline]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    /// Create a dict value from ordered key/value pairs.
    #[inline]
    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(Heap::new(entries))
    }

    /// Create an instance of the named class with the given ancestry.
    #[inline]
    pub fn instance(class_name: impl Into<String>, ancestry: Vec<String>) -> Self {
        Value::Instance(Heap::new(InstanceValue {
            class_name: class_name.into(),
            ancestry,
        }))
    }
}

// Value Methods

impl Value {
    /// Get the type name used in diagnostics.
    ///
    /// For instances this is the concrete class name; for everything
    /// else a fixed lowercase tag (`None` keeps its literal spelling).
    pub fn type_name(&self) -> &str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::None => "None",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "dict",
            Value::Instance(inst) => &inst.class_name,
        }
    }

    /// Try to view this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to view this value as a list slice.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Write a string with double-quote delimiters, escaping embedded
/// backslashes and double quotes.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            _ => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::None => write!(f, "None"),
            Value::Str(s) => write_quoted(f, s),
            Value::Bytes(b) => {
                write!(f, "b\"")?;
                for byte in b.iter() {
                    if byte.is_ascii_graphic() || *byte == b' ' {
                        write!(f, "{}", *byte as char)?;
                    } else {
                        write!(f, "\\x{byte:02x}")?;
                    }
                }
                write!(f, "\"")
            }
            Value::List(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            Value::Set(items) => {
                write!(f, "{{")?;
                write_joined(f, items)?;
                write!(f, "}}")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_joined(f, items)?;
                write!(f, ")")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Instance(inst) => write!(f, "<{}>", inst.class_name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::None => write!(f, "None"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Bytes(b) => write!(f, "Bytes({:?})", &**b),
            Value::List(items) => write!(f, "List({:?})", &**items),
            Value::Set(items) => write!(f, "Set({:?})", &**items),
            Value::Tuple(items) => write!(f, "Tuple({:?})", &**items),
            Value::Map(entries) => write!(f, "Map({:?})", &**entries),
            Value::Instance(inst) => write!(f, "Instance({:?})", &**inst),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b))
            | (Value::Set(a), Value::Set(b))
            | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Discriminant tags keep different kinds from colliding
        std::mem::discriminant(self).hash(state);

        match self {
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(x) => x.to_bits().hash(state),
            Value::None => {}
            Value::Str(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::List(items) | Value::Set(items) | Value::Tuple(items) => {
                for item in items.iter() {
                    item.hash(state);
                }
            }
            Value::Map(entries) => {
                for (k, v) in entries.iter() {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Value::Instance(inst) => inst.hash(state),
        }
    }
}
