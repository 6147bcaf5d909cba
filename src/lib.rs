//! # fnregistry
//!
//! A registry of type-erased callables with trial-based type recovery.
//!
//! `fnregistry` stores functions and closures of different shapes (zero, one
//! or two parameters, different parameter and return types) under string
//! names in named groups, and calls them through one uniform interface. Type
//! checking is deferred to the call site: arguments travel as erased
//! [`Value`]s and the static types are recovered at runtime.
//!
//! ## Key Features
//!
//! - **Heterogeneous**: any `Fn` over `i32`, `i64`, `f64`, `bool`, `String`
//!   and `&str` can be registered, with or without a return value
//! - **Checked at runtime**: a wrong argument count or type is an error;
//!   numbers convert between numeric parameters, strings never become numbers
//! - **Explicit dispatch order**: overloads are chosen by a fixed, documented
//!   [`TRIAL_ORDER`]
//! - **Two lookup strategies**: by name or by precomputed [`FunctionId`]
//! - **Safe entry point**: [`Registry::try_call`] turns every failure into `None`
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use fnregistry::{Category, CallError, Registry};
//!
//! fn main() -> Result<(), CallError> {
//!     let registry = Registry::<Category>::new();
//!
//!     // Register functions of different shapes
//!     registry.register(Category::Math, "add", |a: i32, b: i32| a + b);
//!     registry.register(Category::Math, "sqrt", |x: f64| x.sqrt());
//!     registry.register(Category::String, "upper", |s: &str| s.to_uppercase());
//!
//!     // Call them with static types recovered at the call site
//!     let sum = registry.call_as::<i32>(Category::Math, "add", (15, 25))?;
//!     let root = registry.call_as::<f64>(Category::Math, "sqrt", (16.0,))?;
//!     let shout = registry.call_as::<String>(Category::String, "upper", ("hey",))?;
//!
//!     assert_eq!(sum, 40);
//!     assert_eq!(root, 4.0);
//!     assert_eq!(shout, "HEY");
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use fnregistry::{Category, CallError, Registry};
//!
//! let registry = Registry::<Category>::new();
//! registry.register(Category::Math, "add", |a: i32, b: i32| a + b);
//!
//! match registry.call_as::<i32>(Category::Math, "add", ("15", "25")) {
//!     Ok(sum) => println!("Sum: {}", sum),
//!     Err(CallError::NotFound { name, .. }) => println!("{} is not registered", name),
//!     Err(CallError::TypeMismatch { expected, found, .. }) => {
//!         println!("expected {}, got {}", expected, found)
//!     }
//!     Err(e) => println!("Other error: {}", e),
//! }
//!
//! // The safe entry point never fails
//! assert_eq!(registry.try_call::<i32>(Category::Math, "missing", ()), None);
//! ```
//!
//! ### Failing Functions
//!
//! Functions that can fail return `Result`; an `Err` (or a panic) reaches the
//! caller as [`CallError::InvocationFailed`].
//!
//! ```rust
//! use fnregistry::{Category, ErrorKind, Registry};
//!
//! let registry = Registry::<Category>::new();
//! registry.register(Category::Math, "divide", |a: f64, b: f64| {
//!     if b == 0.0 {
//!         Err("division by zero")
//!     } else {
//!         Ok(a / b)
//!     }
//! });
//!
//! assert_eq!(registry.call_as::<f64>(Category::Math, "divide", (9.0, 3.0)), Ok(3.0));
//!
//! let err = registry
//!     .call(Category::Math, "divide", (1.0, 0.0))
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvocationFailed);
//! ```

mod args;
mod binding;
mod callable;
mod error;
mod group;
mod param;
mod registry;
mod value;


pub use args::IntoArgs;
pub use binding::{Binding, MAX_ARITY};
pub use callable::{Callable, IntoReturn, Overload, Overloaded, Overloads, StrRef};
pub use error::{CallError, ErrorKind};
pub use group::{FunctionId, FunctionKey, Group, Lookup};
pub use param::{candidates, Conversion, Param, ParamKind, Signature, TRIAL_ORDER};
pub use registry::{global, Category, Registry};
pub use value::{FromValue, Value, ValueKind};
