//! Document persistence.
//!
//! A document is a versioned JSON snapshot of the editor state. Saving
//! and loading preserve every id and placement.

mod serializer;

pub use serializer::{Document, DocumentError, FORMAT_VERSION};
