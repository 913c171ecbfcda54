//! Core container implementation for Sandiq.

pub mod container;
pub mod error;
pub mod id;
pub mod module;
pub mod registry;

pub use container::{Container, prelude};
pub use error::{BindingNotFoundError, Result, SandiqError};
pub use id::Id;
pub use module::Module;
pub use registry::{FactoryOf, Inject, Resolver};
