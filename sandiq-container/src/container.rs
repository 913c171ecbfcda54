//! # The Container, heart of Sandiq
//!
//! A container owns a local binding table and an ordered list of parent
//! containers. Resolution looks locally first, then asks each parent in the
//! order it was added.
//!
//! # Architecture
//! ```text
//!   root ◄──────── parent ────────┐
//!    ▲                            │
//!    │ create_child()        extend(root, shared)
//!    │                            │
//!  child ──get(id)──► local? ──no──► parents[0] ──► parents[1] ──► …
//!                       │
//!                      yes ──► factory(inject = child)
//! ```
//!
//! # Examples
//! ```rust
//! use sandiq_container::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct Database {
//!     name: &'static str,
//! }
//!
//! let root = Container::new();
//! root.bind("db", |_| Ok(Database { name: "real-db" }));
//!
//! let child = root.create_child();
//! child.bind("db", |_| Ok(Database { name: "mock-db" }));
//!
//! assert_eq!(child.get::<Database>("db").unwrap().name, "mock-db");
//! assert_eq!(root.get::<Database>("db").unwrap().name, "real-db");
//! ```

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use sandiq_support::rendering::suggest_similar;
use tracing::{debug, instrument, trace};

use crate::error::{BindingNotFoundError, Result, SandiqError};
use crate::id::Id;
use crate::module::Module;
use crate::registry::{Bindings, FactoryFn, Inject, Resolver, downcast, erase};

const MAX_SUGGESTIONS: usize = 3;

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Hierarchical, thread-safe inversion-of-control container.
///
/// `Container` is a cheap handle: cloning it yields another handle to the
/// same bindings and parents. Identity (for [`extend`](Container::extend)
/// deduplication) is the identity of that shared state.
///
/// Mutators take `&self` and return `&Self`, so calls chain:
///
/// ```rust
/// use sandiq_container::prelude::*;
///
/// let base = Container::new();
/// let app = Container::new();
/// app.extend([&base])
///     .bind("port", |_| Ok(8080u16))
///     .bind_value("host", String::from("localhost"));
///
/// assert_eq!(app.get::<u16>("port").unwrap(), 8080);
/// ```
#[derive(Clone, Default)]
pub struct Container {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    bindings: Bindings,
    parents: RwLock<Vec<Container>>,
}

impl Container {
    /// Create an empty root container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to `factory`, replacing any previous local binding.
    ///
    /// The factory runs on every [`get`](Container::get); nothing is cached.
    /// A factory that should hand out one shared instance captures it
    /// (e.g. an `Arc`) and clones it.
    pub fn bind<T: 'static>(
        &self,
        id: impl Into<Id>,
        factory: impl Fn(&Inject<'_>) -> Result<T> + Send + Sync + 'static,
    ) -> &Self {
        self.inner.bindings.insert(id.into(), erase(factory));
        self
    }

    /// Bind `id` to a clone of `value`.
    ///
    /// Cloned on every resolve (use `Arc<T>` for cheap sharing).
    pub fn bind_value<T: Clone + Send + Sync + 'static>(
        &self,
        id: impl Into<Id>,
        value: T,
    ) -> &Self {
        self.bind(id, move |_| Ok(value.clone()))
    }

    /// Remove the local binding for `id`, if any.
    ///
    /// Parents are untouched: a parent binding for the same id stays
    /// reachable.
    pub fn unbind(&self, id: impl Into<Id>) -> &Self {
        self.inner.bindings.remove(&id.into());
        self
    }

    /// `true` iff `id` is bound in this container's own table.
    pub fn is_current_bound(&self, id: impl Into<Id>) -> bool {
        self.inner.bindings.contains(&id.into())
    }

    /// `true` iff `id` is bound here or in any parent, recursively.
    pub fn is_bound(&self, id: impl Into<Id>) -> bool {
        let id = id.into();
        self.inner.bindings.contains(&id)
            || self.parents().iter().any(|parent| parent.is_bound(id))
    }

    /// Resolve `id` and assert the result is a `T`.
    ///
    /// The local table is consulted first, then each parent in order; the
    /// first parent that can resolve `id` supplies the factory. The factory
    /// is invoked with an inject function rooted at `self`, so its own
    /// dependencies see this container's overrides too.
    ///
    /// # Errors
    /// - [`SandiqError::BindingNotFound`]: `id` is bound nowhere
    /// - [`SandiqError::TypeMismatch`]: the factory does not produce `T`
    /// - any error the factory itself returns, unchanged
    pub fn get<T: 'static>(&self, id: impl Into<Id>) -> Result<T> {
        let id = id.into();
        trace!(id = %id, "Resolving");

        downcast(id, self.resolve_erased(&id)?)
    }

    /// Append `containers` to the parent list, skipping any already present.
    ///
    /// Duplicates are detected by identity, not content. New parents go after
    /// the existing ones, in argument order.
    ///
    /// The parent graph must stay acyclic: extending a container with itself
    /// or with one of its descendants is not detected, and resolving an
    /// unbound id through such a graph recurses without end.
    pub fn extend<'a>(&self, containers: impl IntoIterator<Item = &'a Container>) -> &Self {
        // Drain the caller's iterator before locking; it may read `self`.
        let candidates: Vec<&Container> = containers.into_iter().collect();
        let mut parents = self.inner.parents.write();

        for candidate in candidates {
            if parents.iter().any(|parent| parent.ptr_eq(candidate)) {
                trace!("Skipping parent already present");
                continue;
            }
            parents.push(candidate.clone());
        }

        debug!(parents = parents.len(), "Extended container");
        self
    }

    /// Create an empty container whose only parent is `self`.
    ///
    /// Handy for per-request bindings that must not leak into `self`.
    pub fn create_child(&self) -> Container {
        debug!("Creating child container");
        Container {
            inner: Arc::new(Inner {
                bindings: Bindings::new(),
                parents: RwLock::new(vec![self.clone()]),
            }),
        }
    }

    /// Snapshot of the parent list, in resolution order.
    pub fn parents(&self) -> Vec<Container> {
        self.inner.parents.read().clone()
    }

    pub fn parent_count(&self) -> usize {
        self.inner.parents.read().len()
    }

    /// Identifiers bound in this container's own table.
    pub fn local_ids(&self) -> Vec<Id> {
        self.inner.bindings.ids()
    }

    /// `true` if both handles point at the same container.
    #[inline]
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Let `module` register its bindings on this container.
    #[instrument(skip_all, fields(module = module.name()))]
    pub fn load(&self, module: &dyn Module) -> &Self {
        let before = self.inner.bindings.writes();
        module.register(self);
        debug!(
            bound = self.inner.bindings.writes().wrapping_sub(before),
            total = self.inner.bindings.len(),
            "Loaded module"
        );
        self
    }

    /// Finds the factory for `id`: local table first, then parents in order.
    fn lookup(&self, id: &Id) -> Option<FactoryFn> {
        if let Some(factory) = self.inner.bindings.get(id) {
            return Some(factory);
        }

        self.parents().iter().find_map(|parent| {
            let factory = parent.lookup(id);
            if factory.is_some() {
                trace!(id = %id, "Found in parent");
            }
            factory
        })
    }

    /// Internal resolve; returns the type-erased value.
    fn resolve_erased(&self, id: &Id) -> Result<Box<dyn Any>> {
        let factory = self.lookup(id).ok_or_else(|| self.not_found(id))?;
        let inject: &Inject<'_> = self;
        factory(inject)
    }

    fn not_found(&self, id: &Id) -> SandiqError {
        let mut seen = HashSet::new();
        let mut visible = HashSet::new();
        self.collect_visible(&mut seen, &mut visible);

        let labels: Vec<&str> = visible.iter().map(Id::label).collect();
        trace!(id = %id, visible = labels.len(), "Binding not found");

        BindingNotFoundError::new(*id)
            .with_suggestions(suggest_similar(id.label(), &labels, MAX_SUGGESTIONS))
            .into()
    }

    fn collect_visible(&self, seen: &mut HashSet<*const Inner>, visible: &mut HashSet<Id>) {
        if !seen.insert(Arc::as_ptr(&self.inner)) {
            return;
        }
        visible.extend(self.inner.bindings.ids());
        for parent in self.parents() {
            parent.collect_visible(seen, visible);
        }
    }
}

impl Resolver for Container {
    fn resolve_id(&self, id: &Id) -> Result<Box<dyn Any>> {
        self.resolve_erased(id)
    }

    fn is_bound(&self, id: &Id) -> bool {
        Container::is_bound(self, id)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.inner.bindings.len())
            .field("parents", &self.parent_count())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::Container;
    pub use crate::error::{BindingNotFoundError, Result, SandiqError};
    pub use crate::id::Id;
    pub use crate::module::Module;
    pub use crate::registry::{FactoryOf, Inject, Resolver};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
