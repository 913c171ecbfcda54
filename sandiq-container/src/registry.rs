//! Binding table: the local id → factory map of one container.
//!
//! Factories are stored type-erased. The concrete type only reappears at
//! the call site of [`Container::get`](crate::Container::get) or
//! [`Inject::get`](Resolver), where the caller states what it expects.

use std::any::{Any, type_name};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tracing::debug;

use crate::error::{Result, SandiqError};
use crate::id::Id;

/// Type-erased factory as stored in a binding table.
///
/// # Why `Arc` and not `Box`?
/// Resolution clones the factory out of the table before calling it, so no
/// table lock is held while user code runs.
pub type FactoryFn = Arc<dyn Fn(&Inject<'_>) -> Result<Box<dyn Any>> + Send + Sync>;

/// A factory producing `T`: receives the inject function, returns the value.
pub type FactoryOf<T> = dyn Fn(&Inject<'_>) -> Result<T> + Send + Sync;

/// Resolves identifiers on behalf of a factory.
///
/// [`Container`](crate::Container) is the only implementation in this crate;
/// the trait exists so factories can be exercised against a stand-in.
pub trait Resolver: Send + Sync {
    /// Resolve `id` to its type-erased value.
    fn resolve_id(&self, id: &Id) -> Result<Box<dyn Any>>;

    /// Whether `id` can be resolved at all.
    fn is_bound(&self, id: &Id) -> bool;
}

/// The inject function handed to every factory.
///
/// ```
/// use sandiq_container::prelude::*;
///
/// let container = Container::new();
/// container
///     .bind("url", |_| Ok(String::from("postgres://localhost")))
///     .bind("url.len", |inject: &Inject<'_>| {
///         let url: String = inject.get("url")?;
///         Ok(url.len())
///     });
///
/// assert_eq!(container.get::<usize>("url.len").unwrap(), 20);
/// ```
pub type Inject<'a> = dyn Resolver + 'a;

impl dyn Resolver + '_ {
    /// Resolve `id` and assert the result is a `T`.
    ///
    /// Same contract as [`Container::get`](crate::Container::get).
    pub fn get<T: 'static>(&self, id: impl Into<Id>) -> Result<T> {
        let id = id.into();
        downcast(id, self.resolve_id(&id)?)
    }
}

/// Recovers a `T` from a resolved value.
pub(crate) fn downcast<T: 'static>(id: Id, value: Box<dyn Any>) -> Result<T> {
    value
        .downcast::<T>()
        .map(|b| *b)
        .map_err(|_| SandiqError::TypeMismatch {
            id,
            expected: type_name::<T>(),
        })
}

/// Erases a typed factory into a [`FactoryFn`].
pub(crate) fn erase<T: 'static>(
    factory: impl Fn(&Inject<'_>) -> Result<T> + Send + Sync + 'static,
) -> FactoryFn {
    Arc::new(move |inject: &Inject<'_>| Ok(Box::new(factory(inject)?) as Box<dyn Any>))
}

/// The local bindings of one container.
///
/// Last bind wins; there is no override protection.
#[derive(Default)]
pub(crate) struct Bindings {
    table: DashMap<Id, FactoryFn>,
    /// Inserts ever made, replacements included.
    writes: AtomicUsize,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the factory for `id`.
    pub fn insert(&self, id: Id, factory: FactoryFn) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        if self.table.insert(id, factory).is_some() {
            debug!(id = %id, "Replaced binding");
        } else {
            debug!(id = %id, "Bound");
        }
    }

    /// Removes the binding for `id`. Returns whether one existed.
    pub fn remove(&self, id: &Id) -> bool {
        let removed = self.table.remove(id).is_some();
        if removed {
            debug!(id = %id, "Unbound");
        }
        removed
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.table.contains_key(id)
    }

    /// Clones the factory out so the shard guard is released before use.
    pub fn get(&self, id: &Id) -> Option<FactoryFn> {
        self.table.get(id).map(|entry| entry.value().clone())
    }

    pub fn ids(&self) -> Vec<Id> {
        self.table.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bindings")
            .field("len", &self.len())
            .finish()
    }
}
