use std::fmt;

use crate::value::{Value, ValueKind};

/// A parameter type the erasure layer can recover from a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKind {
    Int,
    Long,
    Float,
    Bool,
    /// An owned `String` parameter
    Text,
    /// A borrowed `&str` parameter
    TextRef,
}

/// The fixed priority in which parameter types are tried during dispatch.
///
/// When an argument could satisfy more than one overload, the overload whose
/// parameter types come first in this order wins. Only `Text` and `TextRef`
/// accept the same values, so an overload set holding both a `String` and a
/// `&str` version always resolves to the `String` one.
pub const TRIAL_ORDER: [ParamKind; 6] = [
    ParamKind::Int,
    ParamKind::Long,
    ParamKind::Float,
    ParamKind::Bool,
    ParamKind::Text,
    ParamKind::TextRef,
];

impl ParamKind {
    /// Whether an erased value actually holds this parameter type
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ParamKind::Int, Value::Int(_))
                | (ParamKind::Long, Value::Long(_))
                | (ParamKind::Float, Value::Float(_))
                | (ParamKind::Bool, Value::Bool(_))
                | (ParamKind::Text | ParamKind::TextRef, Value::Text(_))
        )
    }

    /// How a parameter of this kind is reached from an argument holding `held`
    ///
    /// Numeric kinds convert into one another. `bool` and the string kinds
    /// only take their own kind.
    pub fn conversion_from(self, held: ParamKind) -> Option<Conversion> {
        match (self, held) {
            _ if self == held => Some(Conversion::Exact),
            (ParamKind::Long, ParamKind::Int)
            | (ParamKind::Float, ParamKind::Int | ParamKind::Long) => Some(Conversion::Widening),
            (ParamKind::Int, ParamKind::Long | ParamKind::Float)
            | (ParamKind::Long, ParamKind::Float) => Some(Conversion::Narrowing),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamKind::Int => "int",
            ParamKind::Long => "long",
            ParamKind::Float => "double",
            ParamKind::Bool => "bool",
            ParamKind::Text => "string",
            ParamKind::TextRef => "&string",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The conversion an argument goes through to reach a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Conversion {
    Exact,
    /// `int` to `long`, or an integer to `double`
    Widening,
    /// A conversion that may truncate, such as `double` to `int`
    Narrowing,
}

impl Conversion {
    fn cost(self) -> u32 {
        match self {
            Conversion::Exact => 0,
            Conversion::Widening => 1,
            Conversion::Narrowing => 2,
        }
    }
}

/// Every parameter-kind combination of `arity`, in trial order
///
/// Combinations are ordered lexicographically by [`TRIAL_ORDER`]: for arity
/// two, `(int, int)` comes first, then `(int, long)`, and so on.
pub fn candidates(arity: usize) -> Vec<Vec<ParamKind>> {
    let mut combos: Vec<Vec<ParamKind>> = vec![Vec::new()];
    for _ in 0..arity {
        combos = combos
            .into_iter()
            .flat_map(|prefix| {
                TRIAL_ORDER.iter().map(move |kind| {
                    let mut next = prefix.clone();
                    next.push(*kind);
                    next
                })
            })
            .collect();
    }
    combos
}

/// A type usable as an owned parameter of a registered function
///
/// Numeric parameters extract from any numeric value, converting the way
/// `as` casts do.
pub trait Param: Sized + 'static {
    const KIND: ParamKind;

    fn extract(value: &Value) -> Option<Self>;
}

impl Param for i32 {
    const KIND: ParamKind = ParamKind::Int;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            Value::Long(v) => Some(*v as i32),
            Value::Float(v) => Some(*v as i32),
            _ => None,
        }
    }
}

impl Param for i64 {
    const KIND: ParamKind = ParamKind::Long;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            Value::Float(v) => Some(*v as i64),
            _ => None,
        }
    }
}

impl Param for f64 {
    const KIND: ParamKind = ParamKind::Float;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(f64::from(*v)),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl Param for bool {
    const KIND: ParamKind = ParamKind::Bool;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl Param for String {
    const KIND: ParamKind = ParamKind::Text;

    fn extract(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// The static shape of one overload: parameter kinds and return kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<ParamKind>,
    pub returns: ValueKind,
}

impl Signature {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Total conversion cost of calling this signature with arguments of
    /// the `held` kinds, or `None` if some argument cannot reach its parameter
    pub fn conversion_cost(&self, held: &[ParamKind]) -> Option<u32> {
        if held.len() != self.params.len() {
            return None;
        }
        self.params
            .iter()
            .zip(held)
            .map(|(param, held)| param.conversion_from(*held).map(Conversion::cost))
            .sum()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ") -> {}", self.returns)
    }
}
