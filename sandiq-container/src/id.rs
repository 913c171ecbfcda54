//! Binding identifiers.
//!
//! An [`Id`] is an opaque key in a container's binding table. It comes in
//! two forms that can be mixed freely in the same table:
//!
//! - **name**: an interned string; equal text means equal ids.
//! - **token**: a unique value minted by [`Id::token`]; never equal to any
//!   other id, even one carrying the same label.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

static INTERNER: Lazy<Mutex<HashSet<&'static str>>> = Lazy::new(Default::default);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Returns the canonical `'static` copy of `text`, leaking it on first use.
fn intern(text: &str) -> &'static str {
    let mut interned = INTERNER.lock();
    if let Some(existing) = interned.get(text) {
        return *existing;
    }

    let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
    interned.insert(leaked);
    leaked
}

/// Identifies a binding in a [`Container`](crate::Container).
///
/// # Examples
/// ```
/// use sandiq_container::id::Id;
///
/// // Names compare by text
/// assert_eq!(Id::name("db"), Id::from("db"));
///
/// // Tokens are unique, whatever their label
/// let a = Id::token("db");
/// let b = Id::token("db");
/// assert_ne!(a, b);
/// assert_ne!(a, Id::name("db"));
/// assert_eq!(a.label(), "db");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(Repr);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Repr {
    Name(&'static str),
    Token { serial: u64, label: &'static str },
}

impl Id {
    /// Creates a name id, interning `name`.
    pub fn name(name: &str) -> Self {
        Self(Repr::Name(intern(name)))
    }

    /// Creates a name id from a string literal without touching the
    /// interner. Usable in `const` and `static` items.
    ///
    /// ```
    /// use sandiq_container::id::Id;
    ///
    /// const DB: Id = Id::from_static("db");
    /// assert_eq!(DB, Id::name("db"));
    /// ```
    #[inline]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Repr::Name(name))
    }

    /// Mints a new token id. `label` is only used for display.
    ///
    /// Keep tokens in a `static` (for example behind `once_cell::sync::Lazy`)
    /// so every caller shares the same value.
    pub fn token(label: &str) -> Self {
        let serial = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        Self(Repr::Token {
            serial,
            label: intern(label),
        })
    }

    /// Returns the name of a name id, or the label of a token.
    #[inline]
    pub fn label(&self) -> &'static str {
        match self.0 {
            Repr::Name(name) => name,
            Repr::Token { label, .. } => label,
        }
    }

    /// Returns `true` if this id was minted by [`Id::token`].
    #[inline]
    pub fn is_token(&self) -> bool {
        matches!(self.0, Repr::Token { .. })
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Id::name(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Id::name(&name)
    }
}

impl From<&Id> for Id {
    fn from(id: &Id) -> Self {
        *id
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Name(name) => write!(f, "Id({name:?})"),
            Repr::Token { serial, label } => write!(f, "Id(token {label:?}, #{serial})"),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Name(name) => f.write_str(name),
            Repr::Token { serial, label } => write!(f, "{label}#{serial}"),
        }
    }
}
