//! # geno_core - Genogram Editor Core Primitives
//!
//! Small building blocks shared by the editor and its collaborators:
//! - **Identity**: 128-bit entity and command ids behind an injectable [`IdSource`]
//! - **Time**: an injectable [`Clock`] for stamping commands
//! - **Grid**: the layout grid contract ([`GRID_GAP`], [`SizeClass`])
//!
//! Nothing here knows about genograms or commands.

pub mod clock;
pub mod grid;
pub mod id;

pub use clock::*;
pub use grid::*;
pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::grid::{GridPoint, Rect, SizeClass, GRID_GAP};
    pub use crate::id::{CommandId, EntityId, IdSource, RandomIds, SequentialIds};
}
