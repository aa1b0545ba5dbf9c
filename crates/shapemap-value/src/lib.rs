#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # shapemap-value
//!
//! Value model and shape identities shared by the shapemap crates.
//!
//! Mapped data travels as a dynamic [`Value`] so that the runtime category of
//! a transform's output can be checked against a [`TypeTag`]. Destination
//! instances are assembled as a [`Record`] before being adapted into a
//! concrete structured type.

/// Shape identities, type-pair keys, and the [`Shape`] trait.
pub mod shape;
/// Runtime type categories and record conversion helpers.
pub mod value;

/// Shape naming primitives used as registry keys.
pub use shape::{Shape, ShapeId, TypePairKey};
/// Dynamic values, keyed records, and their type categories.
pub use value::{Record, TypeTag, Types, Value, from_record, to_record};

use thiserror::Error;

/// Errors raised while converting between structured shapes and records
#[derive(Error, Debug)]
pub enum Error {
    #[error("Shape '{shape}' does not serialize to a record, found {found}")]
    NotARecord { shape: ShapeId, found: TypeTag },

    #[error("Cannot convert '{shape}' to a record: {message}")]
    Serialize { shape: ShapeId, message: String },

    #[error("Cannot build '{shape}' from a record: {message}")]
    Deserialize { shape: ShapeId, message: String },
}

impl Error {
    /// Build a serialization error for the given shape.
    pub fn serialize(shape: ShapeId, message: impl Into<String>) -> Self {
        Self::Serialize {
            shape,
            message: message.into(),
        }
    }

    /// Build a deserialization error for the given shape.
    pub fn deserialize(shape: ShapeId, message: impl Into<String>) -> Self {
        Self::Deserialize {
            shape,
            message: message.into(),
        }
    }
}

/// Crate-local result type for value conversions.
pub type Result<T> = std::result::Result<T, Error>;
