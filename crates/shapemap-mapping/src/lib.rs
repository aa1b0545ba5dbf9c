//! # shapemap-mapping
//!
//! Registry, fluent builder, and runtime for object-to-object mappings.
//!
//! A [`TypeMapper`] holds one [`FieldPlan`] per (source, destination) shape
//! pair. Plans are configured through [`MapBuilder`] and executed with
//! [`TypeMapper::map`]:
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use shapemap_mapping::{Shape, TypeMapper, Types};
//!
//! struct PersonDto { first: String, last: String, age: u32 }
//! impl Shape for PersonDto {}
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Person { name: String, age: u32 }
//! impl Shape for Person {}
//!
//! # fn main() -> shapemap_mapping::Result<()> {
//! let mut mapper = TypeMapper::new();
//! mapper
//!     .create_map::<PersonDto, Person>()?
//!     .for_member("name", |p| format!("{} {}", p.first, p.last))?
//!     .for_member("age", |p| p.age)?
//!     .is(Types::Number);
//!
//! let dto = PersonDto { first: "Ada".into(), last: "Lovelace".into(), age: 36 };
//! let person: Person = mapper.map(&dto)?;
//! assert_eq!(person.name, "Ada Lovelace");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod plan;
pub mod profile;
pub mod registry;
pub mod runtime;

pub use builder::{MapBuilder, MemberBuilder, MemberOptions};
pub use config::{DuplicatePolicy, MapperConfig};
pub use plan::{FieldPlan, FieldRule, TransformFn};
pub use profile::MappingProfile;
pub use registry::TypeMapper;
pub use shapemap_value::{Record, Shape, ShapeId, TypePairKey, TypeTag, Types, Value};

use thiserror::Error;

/// Errors that can occur while configuring or executing mappings
#[derive(Error, Debug)]
pub enum Error {
    #[error("No mapping configured for {key}")]
    MappingNotConfigured { key: TypePairKey },

    #[error("Type mismatch on field '{field}': expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transform error on field '{field}': {message}")]
    Transform { field: String, message: String },

    #[error(transparent)]
    Value(#[from] shapemap_value::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
