use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::args::IntoArgs;
use crate::callable::Callable;
use crate::error::CallError;
use crate::group::{FunctionKey, Group};
use crate::value::{FromValue, Value};

/// The stock group identifier, one category per functional domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Math,
    String,
    Utility,
    Custom1,
    Custom2,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A collection of [`Group`]s keyed by a caller-defined identifier
///
/// The registry is an in-memory lookup table. Registration is expected to
/// happen during the embedding application's startup; afterwards it is
/// read-mostly. Groups are only removed by [`unregister_group`] or
/// [`clear`].
///
/// # Examples
///
/// ```
/// use fnregistry::{CallError, Registry};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Domain {
///     Math,
///     Text,
/// }
///
/// let registry = Registry::<Domain>::new();
/// registry.register(Domain::Math, "add", |a: i32, b: i32| a + b);
/// registry.register(Domain::Text, "upper", |s: &str| s.to_uppercase());
///
/// assert_eq!(registry.call_as::<i32>(Domain::Math, "add", (15, 25)), Ok(40));
/// assert_eq!(
///     registry.try_call::<String>(Domain::Text, "upper", ("abc",)),
///     Some("ABC".to_string())
/// );
/// assert!(matches!(
///     registry.call(Domain::Text, "add", (1, 2)),
///     Err(CallError::NotFound { .. })
/// ));
/// ```
///
/// [`unregister_group`]: Registry::unregister_group
/// [`clear`]: Registry::clear
pub struct Registry<G> {
    groups: RwLock<HashMap<G, Arc<Group>>>,
}

impl<G> Registry<G>
where
    G: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<G, Arc<Group>>> {
        self.groups.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<G, Arc<Group>>> {
        self.groups.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attaches `group` under `id`, returning the group it replaced
    pub fn register_group(&self, id: G, group: Group) -> Option<Arc<Group>> {
        debug!(id = ?id, group = %group.name(), "attached group");
        self.write().insert(id, Arc::new(group))
    }

    pub fn get_group(&self, id: G) -> Option<Arc<Group>> {
        self.read().get(&id).cloned()
    }

    /// Identifiers of every attached group, in no particular order
    pub fn group_ids(&self) -> Vec<G> {
        self.read().keys().copied().collect()
    }

    /// Detaches the group under `id`; returns whether one was attached
    pub fn unregister_group(&self, id: G) -> bool {
        let removed = self.write().remove(&id).is_some();
        if removed {
            debug!(id = ?id, "detached group");
        }
        removed
    }

    /// Detaches every group
    pub fn clear(&self) {
        let mut groups = self.write();
        debug!(removed = groups.len(), "cleared registry");
        groups.clear();
    }

    fn group_or_insert(&self, id: G) -> Arc<Group> {
        if let Some(group) = self.get_group(id) {
            return group;
        }
        let mut groups = self.write();
        Arc::clone(groups.entry(id).or_insert_with(|| {
            debug!(id = ?id, "created group on first registration");
            Arc::new(Group::new(format!("{:?}", id)))
        }))
    }

    fn find_group(&self, id: G, key: &impl FunctionKey) -> Result<Arc<Group>, CallError> {
        self.get_group(id).ok_or_else(|| CallError::NotFound {
            group: format!("{:?}", id),
            name: key.lookup().to_string(),
        })
    }

    /// Stores `f` under `name` in group `id`, creating the group if needed
    ///
    /// Re-registering a name replaces the previous binding. An empty name is
    /// ignored and creates no group.
    pub fn register<M>(&self, id: G, name: impl Into<String>, f: impl Callable<M>) {
        let name = name.into();
        if name.is_empty() {
            warn!(group = ?id, "ignoring registration with an empty name");
            return;
        }
        self.group_or_insert(id).register(name, f);
    }

    pub fn has(&self, id: G, key: impl FunctionKey) -> bool {
        self.get_group(id).is_some_and(|group| group.has(key))
    }

    /// Calls a binding and returns the erased result
    ///
    /// # Errors
    ///
    /// - `NotFound` if the group or the binding does not exist
    /// - `UnsupportedArity`, `ArityMismatch`, `TypeMismatch` or
    ///   `InvocationFailed` from dispatch
    pub fn call(
        &self,
        id: G,
        key: impl FunctionKey,
        args: impl IntoArgs,
    ) -> Result<Value, CallError> {
        self.find_group(id, &key)?.call(key, args)
    }

    /// Calls a binding and unerases the result as `T`
    ///
    /// # Errors
    ///
    /// Everything [`call`](Self::call) returns, plus `TypeMismatch` if the
    /// result does not hold a `T`.
    pub fn call_as<T: FromValue>(
        &self,
        id: G,
        key: impl FunctionKey,
        args: impl IntoArgs,
    ) -> Result<T, CallError> {
        self.find_group(id, &key)?.call_as(key, args)
    }

    /// Like [`call_as`](Self::call_as), with every failure turned into `None`
    pub fn try_call<T: FromValue>(
        &self,
        id: G,
        key: impl FunctionKey,
        args: impl IntoArgs,
    ) -> Option<T> {
        self.call_as(id, key, args).ok()
    }

    /// Registered names in group `id`, sorted; empty for an unknown group
    pub fn list_names(&self, id: G) -> Vec<String> {
        self.get_group(id)
            .map(|group| group.names())
            .unwrap_or_default()
    }
}

impl<G> Default for Registry<G>
where
    G: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G> Debug for Registry<G>
where
    G: Copy + Eq + Hash + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.read().iter()).finish()
    }
}

/// The process-wide registry, constructed on first use
///
/// ```
/// use fnregistry::{global, Category};
///
/// global().register(Category::Utility, "answer", || 42);
/// assert_eq!(global().call_as::<i32>(Category::Utility, "answer", ()), Ok(42));
/// ```
pub fn global() -> &'static Registry<Category> {
    static GLOBAL: OnceLock<Registry<Category>> = OnceLock::new();
    GLOBAL.get_or_init(Registry::new)
}
