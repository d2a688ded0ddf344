//! Row-justified photo collage engine and the small application around it.
//!
//! The engine consumes already-decoded images ([`ImageRef`]) and composes
//! them into rows that exactly fill a target width, stacking the rows into
//! one RGBA canvas ([`Collage`]). Scanning, decoding, configuration, and
//! export live in the surrounding modules; the engine itself is pure and
//! synchronous.

/// Build orchestration and the [`Collage`] result type.
pub mod builder;
/// Decoded image handles and file loading.
pub mod catalog;
/// Canvas compositing.
pub mod compose;
/// YAML configuration for the binary.
pub mod config;
/// Library error types.
pub mod error;
/// Row partitioning and justified scaling.
pub mod layout;
/// Directory scanning and input ordering.
pub mod scan;

pub use builder::{BuildOptions, Collage, CompactionOptions, build, build_compacted, build_with};
pub use catalog::ImageRef;
pub use error::{BuildError, Error};
