//! Module trait: a group of related bindings.
//!
//! Modules keep registration code next to the services it wires up,
//! instead of one long block of `bind` calls at startup.
//!
//! # Examples
//! ```rust
//! use sandiq_container::prelude::*;
//!
//! struct StorageModule {
//!     url: &'static str,
//! }
//!
//! impl Module for StorageModule {
//!     fn register(&self, container: &Container) {
//!         let url = self.url;
//!         container
//!             .bind_value("storage.url", url)
//!             .bind("storage.scheme", |inject: &Inject<'_>| {
//!                 let url: &str = inject.get("storage.url")?;
//!                 Ok(url.split("://").next().unwrap_or_default().to_string())
//!             });
//!     }
//! }
//!
//! let container = Container::new();
//! container.load(&StorageModule { url: "s3://bucket" });
//! assert_eq!(container.get::<String>("storage.scheme").unwrap(), "s3");
//! ```

use crate::container::Container;

/// A reusable set of bindings.
///
/// Loading the same module into several containers gives each one its own
/// copy of the bindings; loading into a shared parent makes them visible to
/// every child.
pub trait Module: Send + Sync {
    /// Bind this module's identifiers on `container`.
    fn register(&self, container: &Container);

    /// Human-readable name, used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
