use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::trace;

use crate::callable::{Callable, Failure, Overload};
use crate::error::CallError;
use crate::param::{candidates, Signature};
use crate::value::{FromValue, Value};

/// The largest argument count the erased-call path implements
pub const MAX_ARITY: usize = 2;

/// A named, erased callable
///
/// A binding owns one or more [`Overload`]s. Calling it resolves an overload
/// by argument count and then by trying parameter types in
/// [`TRIAL_ORDER`](crate::TRIAL_ORDER). The first combination every argument
/// actually holds and some overload can take is invoked, numeric arguments
/// converting to numeric parameters where no overload takes them exactly.
pub struct Binding {
    name: String,
    overloads: Vec<Overload>,
}

impl Binding {
    pub fn new<M>(name: impl Into<String>, f: impl Callable<M>) -> Self {
        Self {
            name: name.into(),
            overloads: f.into_overloads(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signatures(&self) -> Vec<Signature> {
        self.overloads.iter().map(|o| o.signature().clone()).collect()
    }

    /// Argument counts this binding accepts, ascending
    pub fn arities(&self) -> Vec<usize> {
        let mut arities: Vec<usize> = self
            .overloads
            .iter()
            .map(|o| o.signature().arity())
            .collect();
        arities.sort_unstable();
        arities.dedup();
        arities
    }

    /// Invokes the binding with erased arguments
    ///
    /// # Errors
    ///
    /// - `UnsupportedArity` if more than [`MAX_ARITY`] arguments are supplied
    /// - `ArityMismatch` if no overload takes that many arguments
    /// - `TypeMismatch` if no trial combination matches the arguments
    /// - `InvocationFailed` if the callable returns an error or panics
    pub fn invoke(&self, args: &[Value]) -> Result<Value, CallError> {
        let overload = self.resolve(args)?;
        trace!(function = %self.name, signature = %overload.signature(), "dispatching");

        match panic::catch_unwind(AssertUnwindSafe(|| overload.invoke(args))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(Failure::Raised(message))) => Err(CallError::InvocationFailed {
                name: self.name.clone(),
                message,
            }),
            Ok(Err(Failure::Mismatch)) => Err(self.type_mismatch(args)),
            Err(payload) => Err(CallError::InvocationFailed {
                name: self.name.clone(),
                message: panic_message(payload),
            }),
        }
    }

    /// Invokes the binding and unerases the result as `T`
    ///
    /// # Errors
    ///
    /// Everything [`invoke`](Self::invoke) returns, plus `TypeMismatch` if
    /// the result does not hold a `T`.
    pub fn invoke_as<T: FromValue>(&self, args: &[Value]) -> Result<T, CallError> {
        let value = self.invoke(args)?;
        let found = value.type_name();
        T::from_value(value).ok_or_else(|| CallError::TypeMismatch {
            name: self.name.clone(),
            expected: T::KIND.map_or("any", |kind| kind.name()).to_string(),
            found: found.to_string(),
        })
    }

    fn resolve(&self, args: &[Value]) -> Result<&Overload, CallError> {
        if args.len() > MAX_ARITY {
            return Err(CallError::UnsupportedArity { got: args.len() });
        }

        let same_arity: Vec<&Overload> = self
            .overloads
            .iter()
            .filter(|o| o.signature().arity() == args.len())
            .collect();
        if same_arity.is_empty() {
            return Err(CallError::ArityMismatch {
                name: self.name.clone(),
                got: args.len(),
                accepted: self.arities(),
            });
        }

        // Each combination is what the arguments hold; an overload taking
        // it exactly wins, otherwise the cheapest numeric conversion does.
        for combo in candidates(args.len()) {
            if !combo.iter().zip(args).all(|(kind, value)| kind.accepts(value)) {
                continue;
            }
            let found = same_arity
                .iter()
                .copied()
                .filter_map(|o| o.signature().conversion_cost(&combo).map(|cost| (cost, o)))
                .min_by_key(|(cost, _)| *cost);
            if let Some((_, overload)) = found {
                return Ok(overload);
            }
        }

        Err(self.type_mismatch(args))
    }

    fn type_mismatch(&self, args: &[Value]) -> CallError {
        let expected = self
            .overloads
            .iter()
            .filter(|o| o.signature().arity() == args.len())
            .map(|o| o.signature().to_string())
            .collect::<Vec<_>>()
            .join(" | ");
        let found = args
            .iter()
            .map(Value::type_name)
            .collect::<Vec<_>>()
            .join(", ");

        CallError::TypeMismatch {
            name: self.name.clone(),
            expected,
            found: format!("({})", found),
        }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("signatures", &self.signatures())
            .finish()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "callable panicked".to_string()
    }
}
