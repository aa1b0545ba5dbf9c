//! Shape identities and the composite keys built from them

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Stable name of a source or destination shape.
///
/// Two identities are equal when their names are equal; nothing about the
/// Rust type or its instances takes part in the comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(Cow<'static, str>);

impl ShapeId {
    /// Create an identity from a name
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Identity derived from the Rust type name of `T`
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// Get the name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ShapeId {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for ShapeId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// A data-holding structure that can take part in a mapping.
///
/// The default identity is the type name. Override [`Shape::shape_id`] to
/// give the shape a name that stays stable across crates and refactors.
pub trait Shape: 'static {
    /// Identity used to key mappings involving this shape
    #[must_use]
    fn shape_id() -> ShapeId {
        ShapeId::of::<Self>()
    }
}

/// Composite key of a (source, destination) shape pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypePairKey {
    /// Shape the mapping reads from
    pub source: ShapeId,

    /// Shape the mapping produces
    pub destination: ShapeId,
}

impl TypePairKey {
    /// Create a key from two identities
    pub fn new(source: impl Into<ShapeId>, destination: impl Into<ShapeId>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Key for the pair of Rust shapes `S` and `D`
    #[must_use]
    pub fn of<S: Shape, D: Shape>() -> Self {
        Self::new(S::shape_id(), D::shape_id())
    }
}

impl fmt::Display for TypePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Plain;
    impl Shape for Plain {}

    struct Named;
    impl Shape for Named {
        fn shape_id() -> ShapeId {
            ShapeId::from("named")
        }
    }

    #[test]
    fn test_default_identity_is_type_name() {
        assert!(Plain::shape_id().as_str().ends_with("Plain"));
        assert_eq!(Named::shape_id(), ShapeId::new("named"));
    }

    #[test]
    fn test_borrowed_and_owned_names_compare_equal() {
        assert_eq!(ShapeId::from("animal"), ShapeId::from("animal".to_string()));
    }

    #[test]
    fn test_pair_key_is_structural() {
        let mut plans = HashMap::new();
        plans.insert(TypePairKey::new("dto", "animal"), 1);

        let lookup = TypePairKey::new(String::from("dto"), String::from("animal"));
        assert_eq!(plans.get(&lookup), Some(&1));
        assert!(!plans.contains_key(&TypePairKey::new("animal", "dto")));
    }

    #[test]
    fn test_pair_key_display() {
        let key = TypePairKey::of::<Named, Named>();
        assert_eq!(key.to_string(), "named -> named");
    }
}
