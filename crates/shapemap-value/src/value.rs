//! Runtime value categories

use crate::{Error, Result, ShapeId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dynamic value produced by field transforms
pub use serde_json::Value;

/// Keyed record a destination instance is assembled in
pub type Record = serde_json::Map<String, Value>;

/// Runtime category of a [`Value`], used for post-transform assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeTag {
    /// Absent value
    Null,

    /// `true` or `false`
    Boolean,

    /// Integer or floating point number
    Number,

    /// Text
    String,

    /// Ordered sequence
    Array,

    /// Keyed structure
    Object,
}

/// Alias matching the conventional `Types::NUMBER` style of configuration code
pub type Types = TypeTag;

impl TypeTag {
    /// Runtime category of a value
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
        }
    }

    /// Check whether a value belongs to this category
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        Self::of(value) == self
    }

    /// Upper-case name of the category
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Null => "NULL",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Number => "NUMBER",
            TypeTag::String => "STRING",
            TypeTag::Array => "ARRAY",
            TypeTag::Object => "OBJECT",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize a structured instance into a record.
///
/// # Errors
///
/// Returns an error if serialization fails or the instance does not
/// serialize to a keyed structure.
pub fn to_record<T: Serialize + ?Sized>(shape: &ShapeId, instance: &T) -> Result<Record> {
    match serde_json::to_value(instance) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(Error::NotARecord {
            shape: shape.clone(),
            found: TypeTag::of(&other),
        }),
        Err(e) => Err(Error::serialize(shape.clone(), e.to_string())),
    }
}

/// Build a structured instance from a record.
///
/// # Errors
///
/// Returns an error if the record's fields do not fit the target type.
pub fn from_record<T: DeserializeOwned>(shape: &ShapeId, record: Record) -> Result<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| Error::deserialize(shape.clone(), e.to_string()))
}
