//! Mapping profiles
//!
//! A profile groups related `create_map` calls so they can be applied to a
//! mapper in one step and reused across mappers.

use crate::registry::TypeMapper;

/// A reusable unit of mapping configuration
pub trait MappingProfile {
    /// Name used in log output
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Register this profile's mappings
    ///
    /// # Errors
    ///
    /// Returns the first configuration error encountered.
    fn configure(&self, mapper: &mut TypeMapper) -> crate::Result<()>;
}

impl<F> MappingProfile for F
where
    F: Fn(&mut TypeMapper) -> crate::Result<()>,
{
    fn configure(&self, mapper: &mut TypeMapper) -> crate::Result<()> {
        self(mapper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use shapemap_value::Shape;

    struct Celsius {
        degrees: f64,
    }
    impl Shape for Celsius {}

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Fahrenheit {
        degrees: f64,
    }
    impl Shape for Fahrenheit {}

    struct TemperatureProfile;

    impl MappingProfile for TemperatureProfile {
        fn name(&self) -> &str {
            "temperature"
        }

        fn configure(&self, mapper: &mut TypeMapper) -> crate::Result<()> {
            mapper
                .create_map::<Celsius, Fahrenheit>()?
                .for_member("degrees", |c| c.degrees * 9.0 / 5.0 + 32.0)?;
            Ok(())
        }
    }

    #[test]
    fn test_from_profile() {
        let mapper = TypeMapper::from_profile(&TemperatureProfile).unwrap();
        assert!(mapper.contains::<Celsius, Fahrenheit>());

        let f: Fahrenheit = mapper.map(&Celsius { degrees: 100.0 }).unwrap();
        assert!((f.degrees - 212.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_closure_profile() {
        let profile = |mapper: &mut TypeMapper| -> crate::Result<()> {
            mapper.create_record_map::<Celsius, _, _>("reading", ["degrees"])?;
            Ok(())
        };

        let mut mapper = TypeMapper::new();
        mapper.add_profile(&profile).unwrap();
        assert_eq!(mapper.len(), 1);
    }

    #[test]
    fn test_profile_error_propagates() {
        let profile = |mapper: &mut TypeMapper| -> crate::Result<()> {
            mapper
                .create_map::<Celsius, Fahrenheit>()?
                .for_member("kelvin", |c| c.degrees + 273.15)?;
            Ok(())
        };

        let err = TypeMapper::from_profile(&profile).unwrap_err();
        assert!(matches!(err, crate::Error::Configuration(_)));
    }
}
