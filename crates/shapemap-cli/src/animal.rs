//! Animal shapes and the profile that maps between them

use serde::{Deserialize, Serialize};
use shapemap_mapping::{MappingProfile, Shape, ShapeId, TypeMapper, Types, Value};

/// Incoming animal data as entered by a user
#[derive(Debug, Clone)]
pub struct AnimalDto {
    pub firstname: String,
    pub lastname: String,
    pub age: Value,
}

impl AnimalDto {
    /// Build from command-line text. Ages written as JSON numbers become
    /// numbers; anything else stays text.
    pub fn from_args(firstname: String, lastname: String, age: &str) -> Self {
        let age = serde_json::from_str::<serde_json::Number>(age)
            .map_or_else(|_| Value::String(age.to_string()), Value::Number);
        Self {
            firstname,
            lastname,
            age,
        }
    }
}

impl Shape for AnimalDto {
    fn shape_id() -> ShapeId {
        ShapeId::from("AnimalDto")
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Animal {
    pub name: String,
    pub age: u32,
}

impl Shape for Animal {
    fn shape_id() -> ShapeId {
        ShapeId::from("Animal")
    }
}

pub struct AnimalProfile;

impl MappingProfile for AnimalProfile {
    fn name(&self) -> &str {
        "animals"
    }

    fn configure(&self, mapper: &mut TypeMapper) -> shapemap_mapping::Result<()> {
        mapper
            .create_map::<AnimalDto, Animal>()?
            .for_member("name", |p| format!("{} {}", p.firstname, p.lastname))?
            .for_member("age", |p| p.age.clone())?
            .is(Types::Number);
        Ok(())
    }
}
