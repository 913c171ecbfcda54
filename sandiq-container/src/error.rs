//! Error types for Sandiq container operations.
//!
//! Resolution has exactly one failure of its own: the identifier is not
//! bound anywhere in the container hierarchy. Everything else a caller sees
//! either comes from a type assertion at the call site or from a factory.

use std::error::Error as StdError;
use std::fmt::Write;

use sandiq_support::rendering::shorten_type_name;

use crate::id::Id;

/// Main error type for all Sandiq operations.
#[derive(Debug, thiserror::Error)]
pub enum SandiqError {
    /// Identifier is bound neither locally nor through any parent.
    #[error(transparent)]
    BindingNotFound(#[from] BindingNotFoundError),

    /// The factory produced a value of a different type than the caller
    /// asked for.
    #[error("Type mismatch for {id}: the bound factory does not produce {}", shorten_type_name(.expected))]
    TypeMismatch { id: Id, expected: &'static str },

    /// Error raised by a factory. Passed through untouched.
    #[error(transparent)]
    Factory(Box<dyn StdError + Send + Sync>),
}

impl SandiqError {
    /// Wraps an arbitrary error raised inside a factory.
    ///
    /// ```
    /// use sandiq_container::error::SandiqError;
    ///
    /// let err = SandiqError::factory("connection refused");
    /// assert_eq!(err.to_string(), "connection refused");
    /// ```
    pub fn factory(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        SandiqError::Factory(err.into())
    }

    /// Returns the not-found payload, if this is a missing binding.
    pub fn binding_not_found(&self) -> Option<&BindingNotFoundError> {
        match self {
            SandiqError::BindingNotFound(err) => Some(err),
            _ => None,
        }
    }

    #[inline]
    pub fn is_binding_not_found(&self) -> bool {
        matches!(self, SandiqError::BindingNotFound(_))
    }
}

/// Error when an identifier cannot be resolved.
///
/// Can be built and matched on its own, independently of [`SandiqError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Binding not found: {id}{}", render_hints(.id, .suggestions))]
pub struct BindingNotFoundError {
    /// The identifier that was requested
    pub id: Id,
    /// Visible identifiers with a similar label
    pub suggestions: Vec<String>,
}

impl BindingNotFoundError {
    pub fn new(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

fn render_hints(id: &Id, suggestions: &[String]) -> String {
    let mut out = String::new();

    if !suggestions.is_empty() {
        out.push_str("\n  Did you mean one of:");
        for suggestion in suggestions {
            let _ = write!(out, "\n    - {suggestion}");
        }
    }

    let _ = write!(
        out,
        "\n  Hint: bind {:?} on this container or on one of its parents",
        id.label()
    );
    out
}

/// Convenient Result type for Sandiq operations.
pub type Result<T> = std::result::Result<T, SandiqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_not_found_display() {
        let err = SandiqError::from(
            BindingNotFoundError::new("databse").with_suggestions(vec!["database".into()]),
        );

        let msg = format!("{err}");
        assert!(msg.contains("not found"));
        assert!(msg.contains("databse"));
        assert!(msg.contains("- database"));
    }

    #[test]
    fn binding_not_found_is_distinguishable() {
        let err: SandiqError = BindingNotFoundError::new("db").into();
        assert!(err.is_binding_not_found());
        assert_eq!(err.binding_not_found().map(|e| e.id), Some(Id::name("db")));

        let other = SandiqError::factory("boom");
        assert!(!other.is_binding_not_found());
        assert!(other.binding_not_found().is_none());
    }

    #[test]
    fn binding_not_found_stands_alone() {
        let err = BindingNotFoundError::new("cache");
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(err.clone());

        assert!(boxed.source().is_none());
        assert!(boxed.to_string().starts_with("Binding not found: cache"));
        assert!(boxed.to_string().contains("Hint: bind \"cache\""));
        assert!(!boxed.to_string().contains("Did you mean"));
        assert_eq!(SandiqError::from(err).to_string(), boxed.to_string());
    }

    #[test]
    fn type_mismatch_display_shortens_type() {
        let err = SandiqError::TypeMismatch {
            id: Id::name("pool"),
            expected: std::any::type_name::<Vec<String>>(),
        };

        let msg = format!("{err}");
        assert!(msg.contains("Type mismatch for pool"));
        assert!(msg.contains("Vec<String>"));
    }

    #[test]
    fn factory_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = SandiqError::factory(io);

        assert_eq!(err.to_string(), "refused");
        match err {
            SandiqError::Factory(inner) => {
                let io = inner.downcast_ref::<std::io::Error>().expect("io error");
                assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
            }
            other => panic!("Expected Factory, got: {other:?}"),
        }
    }
}
