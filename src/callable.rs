use std::fmt::Display;

use crate::param::{ParamKind, Param, Signature};
use crate::value::{Value, ValueKind};

/// Why an erased invocation did not produce a value
pub(crate) enum Failure {
    /// An argument did not hold the type the overload expects
    Mismatch,
    /// The callable returned an error
    Raised(String),
}

type Invoker = Box<dyn Fn(&[Value]) -> Result<Value, Failure> + Send + Sync>;

/// One erased callable together with the static signature it was built from
pub struct Overload {
    signature: Signature,
    invoke: Invoker,
}

impl Overload {
    fn new<I>(params: Vec<ParamKind>, returns: ValueKind, invoke: I) -> Self
    where
        I: Fn(&[Value]) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        Self {
            signature: Signature { params, returns },
            invoke: Box::new(invoke),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn invoke(&self, args: &[Value]) -> Result<Value, Failure> {
        (self.invoke)(args)
    }
}

/// A return type the erasure layer can wrap in a [`Value`]
///
/// Returning `Err` from a registered function surfaces to the caller as
/// [`CallError::InvocationFailed`](crate::CallError::InvocationFailed).
pub trait IntoReturn {
    const KIND: ValueKind;

    fn into_return(self) -> Result<Value, String>;
}

macro_rules! impl_into_return {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl IntoReturn for $ty {
                const KIND: ValueKind = ValueKind::$kind;

                fn into_return(self) -> Result<Value, String> {
                    Ok(Value::from(self))
                }
            }
        )*
    };
}

impl_into_return! {
    () => Unit,
    bool => Bool,
    i32 => Int,
    i64 => Long,
    f64 => Float,
    String => Text,
}

impl<T: IntoReturn, E: Display> IntoReturn for Result<T, E> {
    const KIND: ValueKind = T::KIND;

    fn into_return(self) -> Result<Value, String> {
        match self {
            Ok(value) => value.into_return(),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Marker for a borrowed `&str` parameter position
pub struct StrRef;

/// Marker for an [`Overloads`] set
pub struct Overloaded;

/// Anything that can be stored as a binding
///
/// Implemented for every `Fn` taking zero, one or two parameters where each
/// parameter is `i32`, `i64`, `f64`, `bool`, `String` or `&str`, and the
/// return type implements [`IntoReturn`]. The `Marker` parameter only exists
/// to keep those implementations apart and is always inferred.
pub trait Callable<Marker>: Send + Sync + 'static {
    fn into_overloads(self) -> Vec<Overload>;
}

fn arg(args: &[Value], index: usize) -> Result<&Value, Failure> {
    args.get(index).ok_or(Failure::Mismatch)
}

fn text(args: &[Value], index: usize) -> Result<&str, Failure> {
    arg(args, index)?.as_str().ok_or(Failure::Mismatch)
}

fn owned<A: Param>(args: &[Value], index: usize) -> Result<A, Failure> {
    A::extract(arg(args, index)?).ok_or(Failure::Mismatch)
}

impl<F, R> Callable<fn() -> R> for F
where
    F: Fn() -> R + Send + Sync + 'static,
    R: IntoReturn,
{
    fn into_overloads(self) -> Vec<Overload> {
        let f = self;
        vec![Overload::new(vec![], R::KIND, move |_| {
            f().into_return().map_err(Failure::Raised)
        })]
    }
}

impl<F, A, R> Callable<fn(A) -> R> for F
where
    F: Fn(A) -> R + Send + Sync + 'static,
    A: Param,
    R: IntoReturn,
{
    fn into_overloads(self) -> Vec<Overload> {
        let f = self;
        vec![Overload::new(vec![A::KIND], R::KIND, move |args| {
            let a = owned::<A>(args, 0)?;
            f(a).into_return().map_err(Failure::Raised)
        })]
    }
}

impl<F, R> Callable<fn(StrRef) -> R> for F
where
    F: for<'a> Fn(&'a str) -> R + Send + Sync + 'static,
    R: IntoReturn,
{
    fn into_overloads(self) -> Vec<Overload> {
        let f = self;
        vec![Overload::new(vec![ParamKind::TextRef], R::KIND, move |args| {
            let a = text(args, 0)?;
            f(a).into_return().map_err(Failure::Raised)
        })]
    }
}

impl<F, A, B, R> Callable<fn(A, B) -> R> for F
where
    F: Fn(A, B) -> R + Send + Sync + 'static,
    A: Param,
    B: Param,
    R: IntoReturn,
{
    fn into_overloads(self) -> Vec<Overload> {
        let f = self;
        vec![Overload::new(vec![A::KIND, B::KIND], R::KIND, move |args| {
            let a = owned::<A>(args, 0)?;
            let b = owned::<B>(args, 1)?;
            f(a, b).into_return().map_err(Failure::Raised)
        })]
    }
}

impl<F, A, R> Callable<fn(A, StrRef) -> R> for F
where
    F: for<'a> Fn(A, &'a str) -> R + Send + Sync + 'static,
    A: Param,
    R: IntoReturn,
{
    fn into_overloads(self) -> Vec<Overload> {
        let f = self;
        vec![Overload::new(
            vec![A::KIND, ParamKind::TextRef],
            R::KIND,
            move |args| {
                let a = owned::<A>(args, 0)?;
                let b = text(args, 1)?;
                f(a, b).into_return().map_err(Failure::Raised)
            },
        )]
    }
}

impl<F, B, R> Callable<fn(StrRef, B) -> R> for F
where
    F: for<'a> Fn(&'a str, B) -> R + Send + Sync + 'static,
    B: Param,
    R: IntoReturn,
{
    fn into_overloads(self) -> Vec<Overload> {
        let f = self;
        vec![Overload::new(
            vec![ParamKind::TextRef, B::KIND],
            R::KIND,
            move |args| {
                let a = text(args, 0)?;
                let b = owned::<B>(args, 1)?;
                f(a, b).into_return().map_err(Failure::Raised)
            },
        )]
    }
}

impl<F, R> Callable<fn(StrRef, StrRef) -> R> for F
where
    F: for<'a, 'b> Fn(&'a str, &'b str) -> R + Send + Sync + 'static,
    R: IntoReturn,
{
    fn into_overloads(self) -> Vec<Overload> {
        let f = self;
        vec![Overload::new(
            vec![ParamKind::TextRef, ParamKind::TextRef],
            R::KIND,
            move |args| {
                let a = text(args, 0)?;
                let b = text(args, 1)?;
                f(a, b).into_return().map_err(Failure::Raised)
            },
        )]
    }
}

/// Several callables stored under one name
///
/// Dispatch picks among them by [`TRIAL_ORDER`](crate::TRIAL_ORDER). Adding
/// a callable whose parameter list matches an earlier one replaces it.
///
/// ```
/// use fnregistry::{Group, Overloads};
///
/// let math = Group::new("math");
/// math.register(
///     "add",
///     Overloads::new()
///         .with(|a: i32, b: i32| a + b)
///         .with(|a: f64, b: f64| a + b),
/// );
///
/// assert_eq!(math.call_as::<i32>("add", (2, 3)), Ok(5));
/// assert_eq!(math.call_as::<f64>("add", (0.5, 0.25)), Ok(0.75));
/// ```
#[derive(Default)]
pub struct Overloads {
    overloads: Vec<Overload>,
}

impl Overloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M>(mut self, f: impl Callable<M>) -> Self {
        for overload in f.into_overloads() {
            self.overloads
                .retain(|existing| existing.signature.params != overload.signature.params);
            self.overloads.push(overload);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.overloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overloads.is_empty()
    }
}

impl Callable<Overloaded> for Overloads {
    fn into_overloads(self) -> Vec<Overload> {
        self.overloads
    }
}
