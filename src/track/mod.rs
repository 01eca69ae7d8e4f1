//! Track layer: raw specification tree to validated in-memory model.
//!
//! It owns:
//! - the model (Track, Index, Type, Operation, Challenge)
//! - the reader that validates and builds it
//! - path composition for data and mapping files

pub mod model;
pub mod paths;
pub mod reader;

pub use model::{Challenge, Index, Operation, OperationType, Track, Type};
pub use reader::TrackReader;
