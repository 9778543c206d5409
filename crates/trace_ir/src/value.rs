//! Runtime value snapshots.
//!
//! # Sharing
//!
//! Arrays are shared through `Arc<ArrayValue>` so that the same captured
//! container can appear in several frames (or inside itself) without being
//! copied. Identity matters: the formatter compares containers with
//! [`Arc::ptr_eq`] to recognise the global scope.
//!
//! # Cycles
//!
//! A captured scope may contain itself. [`ArrayValue::deferred`] creates an
//! empty container whose entries are filled in later with
//! [`ArrayValue::fill`], which lets the capture layer close the loop. The
//! formatter never relies on the host stack to escape such cycles; it stops
//! at its configured depth.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Numeric argument value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(n) => write!(f, "{n}"),
            Numeric::Float(x) if x.is_nan() => f.write_str("NAN"),
            Numeric::Float(x) if x.is_infinite() => {
                f.write_str(if x.is_sign_negative() { "-INF" } else { "INF" })
            }
            Numeric::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Key of an array entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Index(i64),
    Name(String),
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Index(i) => write!(f, "{i}"),
            ArrayKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(i: i64) -> Self {
        ArrayKey::Index(i)
    }
}

impl From<&str> for ArrayKey {
    fn from(name: &str) -> Self {
        ArrayKey::Name(name.to_string())
    }
}

impl From<String> for ArrayKey {
    fn from(name: String) -> Self {
        ArrayKey::Name(name)
    }
}

/// Ordered key → value container.
pub struct ArrayValue {
    entries: OnceLock<Vec<(ArrayKey, RuntimeValue)>>,
}

impl ArrayValue {
    /// Create a filled container.
    pub fn new(entries: Vec<(ArrayKey, RuntimeValue)>) -> Arc<Self> {
        Arc::new(ArrayValue {
            entries: OnceLock::from(entries),
        })
    }

    /// Create an empty container whose entries are supplied later.
    ///
    /// Used when a captured scope refers back to itself.
    pub fn deferred() -> Arc<Self> {
        Arc::new(ArrayValue {
            entries: OnceLock::new(),
        })
    }

    /// Fill a deferred container. Returns `false` if it was already filled.
    pub fn fill(&self, entries: Vec<(ArrayKey, RuntimeValue)>) -> bool {
        self.entries.set(entries).is_ok()
    }

    /// Entries in capture order. A never-filled container is empty.
    pub fn entries(&self) -> &[(ArrayKey, RuntimeValue)] {
        self.entries.get().map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

// Entries are not printed: a container may contain itself.
impl fmt::Debug for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayValue")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Source lines a closure was declared on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRange {
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
}

/// Captured closure or callable.
#[derive(Clone, Debug)]
pub struct CallableValue {
    /// Display name (`{closure}` for anonymous functions).
    pub name: String,
    /// Declaring source range, when the capture layer knows it.
    pub location: Option<SourceRange>,
    /// Receiver the closure was bound to.
    pub bound_this: Option<RuntimeValue>,
}

/// Captured object. Only the class is recorded; fields are never captured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectValue {
    /// Fully qualified class name.
    pub class: String,
}

/// Captured open resource handle (stream, socket, ...).
#[derive(Clone, Debug)]
pub struct ResourceValue {
    pub id: u64,
    /// Resource kind reported by the runtime (`stream`, `curl`, ...).
    pub kind: String,
    pub metadata: Vec<(String, RuntimeValue)>,
}

/// Captured argument value.
///
/// The variant set is closed; anything the capture layer cannot describe is
/// stored as [`RuntimeValue::Other`] with its type name.
#[derive(Clone, Debug)]
pub enum RuntimeValue {
    Str(String),
    Numeric(Numeric),
    Bool(bool),
    Null,
    Array(Arc<ArrayValue>),
    Callable(Box<CallableValue>),
    Object(ObjectValue),
    Resource(Box<ResourceValue>),
    /// Resource that was closed before capture; only its id survives.
    ClosedResource(u64),
    /// Value of a type the capture layer has no variant for.
    Other(String),
}

impl RuntimeValue {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        RuntimeValue::Str(s.into())
    }

    #[inline]
    pub fn int(n: i64) -> Self {
        RuntimeValue::Numeric(Numeric::Int(n))
    }

    #[inline]
    pub fn float(x: f64) -> Self {
        RuntimeValue::Numeric(Numeric::Float(x))
    }

    /// List with implicit `0..n` keys.
    pub fn list(items: Vec<RuntimeValue>) -> Self {
        let entries = (0_i64..).zip(items).map(|(i, v)| (ArrayKey::Index(i), v));
        RuntimeValue::Array(ArrayValue::new(entries.collect()))
    }

    /// Array with explicit keys.
    pub fn map<K: Into<ArrayKey>>(entries: Vec<(K, RuntimeValue)>) -> Self {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        RuntimeValue::Array(ArrayValue::new(entries))
    }

    pub fn object(class: impl Into<String>) -> Self {
        RuntimeValue::Object(ObjectValue {
            class: class.into(),
        })
    }

    /// Callable with no source information.
    pub fn callable(name: impl Into<String>) -> Self {
        RuntimeValue::Callable(Box::new(CallableValue {
            name: name.into(),
            location: None,
            bound_this: None,
        }))
    }

    pub fn resource(
        id: u64,
        kind: impl Into<String>,
        metadata: Vec<(String, RuntimeValue)>,
    ) -> Self {
        RuntimeValue::Resource(Box::new(ResourceValue {
            id,
            kind: kind.into(),
            metadata,
        }))
    }

    /// Runtime type name, used for `Other` fallbacks.
    pub fn type_name(&self) -> &str {
        match self {
            RuntimeValue::Str(_) => "string",
            RuntimeValue::Numeric(Numeric::Int(_)) => "int",
            RuntimeValue::Numeric(Numeric::Float(_)) => "float",
            RuntimeValue::Bool(_) => "bool",
            RuntimeValue::Null => "null",
            RuntimeValue::Array(_) => "array",
            RuntimeValue::Callable(_) => "callable",
            RuntimeValue::Object(_) => "object",
            RuntimeValue::Resource(_) => "resource",
            RuntimeValue::ClosedResource(_) => "resource (closed)",
            RuntimeValue::Other(name) => name,
        }
    }
}

impl From<&str> for RuntimeValue {
    fn from(s: &str) -> Self {
        RuntimeValue::Str(s.to_string())
    }
}

impl From<String> for RuntimeValue {
    fn from(s: String) -> Self {
        RuntimeValue::Str(s)
    }
}

impl From<i64> for RuntimeValue {
    fn from(n: i64) -> Self {
        RuntimeValue::int(n)
    }
}

impl From<f64> for RuntimeValue {
    fn from(x: f64) -> Self {
        RuntimeValue::float(x)
    }
}

impl From<bool> for RuntimeValue {
    fn from(b: bool) -> Self {
        RuntimeValue::Bool(b)
    }
}
