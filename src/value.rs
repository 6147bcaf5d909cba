use std::fmt;

/// A type-erased value passed to or returned from a registered function
///
/// `Value` is a closed sum over the types the erasure layer understands.
/// Recovering the static type is always an explicit, possibly-failing step
/// (see [`FromValue`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The "no value" marker returned by functions returning `()`
    #[default]
    Unit,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f64),
    Text(String),
}

/// The tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Unit,
    Bool,
    Int,
    Long,
    Float,
    Text,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unit => ValueKind::Unit,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Human-readable name of the contained type
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Unit => "void",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "double",
            ValueKind::Text => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Recovers a static type from an erased result
///
/// Recovery is an exact tag match; an `Int` is never read back as an `i64`
/// or `f64`. The `()` implementation accepts any value and discards it.
pub trait FromValue: Sized {
    /// The kind this type expects, or `None` when any kind is accepted
    const KIND: Option<ValueKind>;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident) => {
        impl FromValue for $ty {
            const KIND: Option<ValueKind> = Some(ValueKind::$variant);

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_from_value!(bool, Bool);
impl_from_value!(i32, Int);
impl_from_value!(i64, Long);
impl_from_value!(f64, Float);
impl_from_value!(String, Text);

impl FromValue for () {
    const KIND: Option<ValueKind> = None;

    fn from_value(_: Value) -> Option<Self> {
        Some(())
    }
}

impl FromValue for Value {
    const KIND: Option<ValueKind> = None;

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}
