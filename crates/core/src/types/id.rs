//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are short opaque
//! strings; see [`IdGenerator`] for how new ones are minted.

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// Characters an ID may be built from.
const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of every generated ID.
pub const ID_LENGTH: usize = 9;

/// How many fresh candidates [`IdGenerator::next_unique`] draws before giving up.
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
/// - `matches()` for the case-insensitive comparison used by lookups
///
/// # Example
///
/// ```rust
/// # use tienda_core::define_id;
/// define_id!(CustomerId);
/// define_id!(InvoiceId);
///
/// let customer = CustomerId::new("C1");
/// let invoice = InvoiceId::new("C1");
///
/// // These are different types, so this won't compile:
/// // let _: CustomerId = invoice;
/// assert!(customer.matches("c1"));
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Case-insensitive comparison against user-typed input.
            #[must_use]
            pub fn matches(&self, candidate: &str) -> bool {
                self.0.to_uppercase() == candidate.to_uppercase()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(OrderId);

/// Generate a single ID: [`ID_LENGTH`] characters drawn from `[0-9A-Z]`.
///
/// There is no uniqueness guarantee beyond the size of the space
/// (36^9 combinations); callers that need uniqueness use
/// [`IdGenerator::next_unique`].
pub fn generate_id<R: rand::Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LENGTH)
        .filter_map(|_| ID_ALPHABET.choose(rng).copied().map(char::from))
        .collect()
}

/// Random source for product and order IDs.
///
/// Owns a seedable RNG behind a mutex so a single generator can be shared by
/// the services that mint IDs.
#[derive(Debug)]
pub struct IdGenerator {
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    /// Create a generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Create a deterministic generator. Intended for tests and fixtures.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw the next ID.
    pub fn next_id(&self) -> String {
        // A poisoned lock still holds a perfectly usable RNG.
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        generate_id(&mut *rng)
    }

    /// Draw IDs until one is not taken.
    ///
    /// Returns `None` if [`MAX_ID_ATTEMPTS`] candidates in a row collided.
    pub fn next_unique(&self, is_taken: impl Fn(&str) -> bool) -> Option<String> {
        (0..MAX_ID_ATTEMPTS)
            .map(|_| self.next_id())
            .find(|candidate| !is_taken(candidate))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
