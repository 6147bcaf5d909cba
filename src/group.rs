use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::args::IntoArgs;
use crate::binding::Binding;
use crate::callable::Callable;
use crate::error::CallError;
use crate::param::Signature;
use crate::value::{FromValue, Value};

/// A precomputed function identifier for hashed lookups
///
/// Computed with the DJB2 string hash, so ids can be built in `const`
/// context and reused across calls:
///
/// ```
/// use fnregistry::{FunctionId, Group};
///
/// const SQUARE: FunctionId = FunctionId::of("square");
///
/// let math = Group::new("math");
/// math.register("square", |x: i32| x * x);
/// assert_eq!(math.call_as::<i32>(SQUARE, (7,)), Ok(49));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(u64);

impl FunctionId {
    pub const fn of(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash: u64 = 5381;
        let mut i = 0;
        while i < bytes.len() {
            hash = (hash << 5).wrapping_add(hash).wrapping_add(bytes[i] as u64);
            i += 1;
        }
        FunctionId(hash)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:016x}", self.0)
    }
}

/// How a [`FunctionKey`] finds its binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Through the ordered name index
    Name(&'a str),
    /// Through the hashed id index
    Id(FunctionId),
}

/// Anything that can address a binding within a group
pub trait FunctionKey {
    fn lookup(&self) -> Lookup<'_>;
}

impl FunctionKey for str {
    fn lookup(&self) -> Lookup<'_> {
        Lookup::Name(self)
    }
}

impl FunctionKey for String {
    fn lookup(&self) -> Lookup<'_> {
        Lookup::Name(self)
    }
}

impl FunctionKey for FunctionId {
    fn lookup(&self) -> Lookup<'_> {
        Lookup::Id(*self)
    }
}

impl<K: FunctionKey + ?Sized> FunctionKey for &K {
    fn lookup(&self) -> Lookup<'_> {
        (**self).lookup()
    }
}

impl fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lookup::Name(name) => f.write_str(name),
            Lookup::Id(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Default)]
struct Entries {
    by_name: BTreeMap<String, Arc<Binding>>,
    by_id: HashMap<FunctionId, Arc<Binding>>,
}

/// A named collection of bindings
///
/// Binding names are unique within a group. Registering a name again
/// replaces the previous binding. Lookups work by name or by
/// [`FunctionId`]; both go through the same [`FunctionKey`] entry points.
pub struct Group {
    name: String,
    description: String,
    version: String,
    entries: RwLock<Entries>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: "1.0.0".to_string(),
            entries: RwLock::new(Entries::default()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `f` under `name`, replacing any binding already there
    ///
    /// An empty name is ignored.
    pub fn register<M>(&self, name: impl Into<String>, f: impl Callable<M>) {
        let name = name.into();
        if name.is_empty() {
            warn!(group = %self.name, "ignoring registration with an empty name");
            return;
        }

        let id = FunctionId::of(&name);
        let binding = Arc::new(Binding::new(name.clone(), f));
        let mut entries = self.write();

        if let Some(existing) = entries.by_id.get(&id) {
            if existing.name() != name {
                warn!(
                    group = %self.name,
                    function = %name,
                    shadowed = %existing.name(),
                    %id,
                    "function id collision; id lookups now reach the newer binding"
                );
            }
        }
        entries.by_id.insert(id, Arc::clone(&binding));

        if entries.by_name.insert(name.clone(), binding).is_some() {
            debug!(group = %self.name, function = %name, "replaced function");
        } else {
            debug!(group = %self.name, function = %name, "registered function");
        }
    }

    /// Returns the binding behind `key`, if any
    pub fn binding(&self, key: impl FunctionKey) -> Option<Arc<Binding>> {
        let entries = self.read();
        match key.lookup() {
            Lookup::Name(name) => entries.by_name.get(name).cloned(),
            Lookup::Id(id) => entries.by_id.get(&id).cloned(),
        }
    }

    pub fn has(&self, key: impl FunctionKey) -> bool {
        self.binding(key).is_some()
    }

    /// Calls a binding with the given arguments and returns the erased result
    ///
    /// The group's lock is released before the callable runs, so a callable
    /// may itself register into or call through this group.
    ///
    /// # Errors
    ///
    /// Returns `CallError::NotFound` if `key` is not registered, otherwise
    /// whatever [`Binding::invoke`] returns.
    pub fn call(&self, key: impl FunctionKey, args: impl IntoArgs) -> Result<Value, CallError> {
        self.find(&key)?.invoke(&args.into_args())
    }

    /// Calls a binding and unerases the result as `T`
    ///
    /// Use `T = ()` to call for side effects and discard any result.
    pub fn call_as<T: FromValue>(
        &self,
        key: impl FunctionKey,
        args: impl IntoArgs,
    ) -> Result<T, CallError> {
        self.find(&key)?.invoke_as(&args.into_args())
    }

    /// Like [`call_as`](Self::call_as), with every failure turned into `None`
    pub fn try_call<T: FromValue>(
        &self,
        key: impl FunctionKey,
        args: impl IntoArgs,
    ) -> Option<T> {
        self.call_as(key, args).ok()
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<String> {
        self.read().by_name.keys().cloned().collect()
    }

    /// Overload signatures of the binding behind `key`
    pub fn signatures(&self, key: impl FunctionKey) -> Option<Vec<Signature>> {
        self.binding(key).map(|binding| binding.signatures())
    }

    pub fn len(&self) -> usize {
        self.read().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().by_name.is_empty()
    }

    /// Removes every binding
    pub fn clear(&self) {
        let mut entries = self.write();
        let removed = entries.by_name.len();
        entries.by_name.clear();
        entries.by_id.clear();
        debug!(group = %self.name, removed, "cleared group");
    }

    fn find(&self, key: &impl FunctionKey) -> Result<Arc<Binding>, CallError> {
        self.binding(key).ok_or_else(|| CallError::NotFound {
            group: self.name.clone(),
            name: key.lookup().to_string(),
        })
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("functions", &self.names())
            .finish()
    }
}
