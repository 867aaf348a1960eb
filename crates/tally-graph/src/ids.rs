//! Typed entity identities and the counters that hand them out.
//!
//! Every entity in the graph is addressed by a small integer newtype. Ids are
//! allocated by an [`IdCounter`] owned by the graph that stores the entity, so
//! two graphs built from the same input in the same order get identical ids.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw id, e.g. one read back from serialized data.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw integer value.
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identity of a [`Module`](crate::Module).
    ModuleId
);
define_id!(
    /// Identity of a [`Dependency`](crate::Dependency) edge.
    DependencyId
);
define_id!(
    /// Identity of a [`Chunk`](crate::Chunk).
    ChunkId
);
define_id!(
    /// Identity of an [`Asset`](crate::Asset).
    AssetId
);
define_id!(
    /// Identity of an [`EntryPoint`](crate::EntryPoint).
    EntryPointId
);
define_id!(
    /// Identity of a [`Package`](crate::Package).
    PackageId
);
define_id!(
    /// Identity of a [`PackageDependency`](crate::PackageDependency).
    PackageDependencyId
);
define_id!(
    /// Identity of an [`ExportInfo`](crate::ExportInfo).
    ExportId
);
define_id!(
    /// Identity of a [`SideEffect`](crate::SideEffect).
    SideEffectId
);
define_id!(
    /// Identity of a [`Variable`](crate::Variable).
    VariableId
);

/// Monotonic id allocator.
///
/// Counters start at 1. A graph owns one counter per entity kind and resets
/// them when a fresh graph is constructed; deserialized graphs call
/// [`IdCounter::observe`] so later allocations never collide with restored ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCounter {
    next: u32,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next_id<I: From<u32>>(&mut self) -> I {
        let raw = self.next;
        self.next += 1;
        I::from(raw)
    }

    /// Raw value the next allocation will return.
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Record an externally supplied id so it is never handed out again.
    pub fn observe(&mut self, raw: u32) {
        if raw >= self.next {
            self.next = raw + 1;
        }
    }

    pub fn reset(&mut self) {
        self.next = 1;
    }
}
