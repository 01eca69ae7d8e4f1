//! Loads benchmark track definitions.
//!
//! - [`version`] turns a product version into fallback lookup candidates.
//! - [`track`] validates a parsed track specification and builds the model.
//! - [`repo`] finds version-specific track files on disk and feeds them to
//!   the reader.

pub mod error;
pub mod repo;
pub mod track;
pub mod version;

pub use error::{InvalidSyntax, TrackSyntaxError};
pub use track::{Track, TrackReader};

pub type Result<T> = anyhow::Result<T>;
