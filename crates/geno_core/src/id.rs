//! Unique identifier generation for entities and commands

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID
            #[inline]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Build an identifier from a raw 128-bit value
            #[inline]
            pub const fn from_u128(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Get the underlying UUID
            #[inline]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_newtype!(
    /// Identity of a person, relationship or annotation.
    ///
    /// All entity kinds of one document share a single id space.
    EntityId
);

uuid_newtype!(
    /// Identity of a command, distinct from the entities it touches
    CommandId
);

/// Source of fresh identifiers.
///
/// The editor never reaches for ambient global state: every controller is
/// handed an `IdSource`, so tests can substitute a deterministic one.
pub trait IdSource: Send + Sync {
    /// Produce the next unique UUID
    fn next_uuid(&self) -> Uuid;

    /// Produce a fresh entity id
    fn entity_id(&self) -> EntityId {
        EntityId(self.next_uuid())
    }

    /// Produce a fresh command id
    fn command_id(&self) -> CommandId {
        CommandId(self.next_uuid())
    }
}

/// Random version-4 identifiers. Collisions are treated as impossible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Thread-safe counter-backed generator with deterministic output
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Create a generator whose first id is `1`
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first id is `seed`
    pub const fn starting_at(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }

    /// Generate a batch of ids with a single counter bump
    pub fn next_batch(&self, count: u32) -> impl Iterator<Item = Uuid> {
        let start = self.next.fetch_add(count as u64, Ordering::Relaxed);
        (0..count as u64).map(move |i| Uuid::from_u128((start + i) as u128))
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_uuid(&self) -> Uuid {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        Uuid::from_u128(value as u128)
    }
}
