//! # Sandiq: a small hierarchical IoC container
//!
//! Bind identifiers to factories, resolve them on demand, and compose
//! containers through parents and throwaway children.
//!
//! ```rust
//! use sandiq::prelude::*;
//!
//! let app = Container::new();
//! app.bind_value("greeting", "hello");
//!
//! let request = app.create_child();
//! request.bind("message", |inject: &Inject<'_>| {
//!     let greeting: &str = inject.get("greeting")?;
//!     Ok(format!("{greeting}, world"))
//! });
//!
//! assert_eq!(request.get::<String>("message").unwrap(), "hello, world");
//! assert!(!app.is_bound("message"));
//! ```

pub use sandiq_container::*;
pub use sandiq_support::*;
