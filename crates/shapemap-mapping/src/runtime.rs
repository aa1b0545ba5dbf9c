//! Mapping runtime
//!
//! Executes a registered plan against a source instance. Rules run in plan
//! order and the first failure stops execution; the partly filled record is
//! discarded and never returned.

use serde::de::DeserializeOwned;
use shapemap_value::{Record, Shape, ShapeId, TypePairKey, TypeTag, from_record};
use std::any::Any;
use tracing::trace;

use crate::plan::FieldPlan;
use crate::registry::TypeMapper;

impl TypeMapper {
    /// Map a source instance to a new destination instance.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::MappingNotConfigured`] if no plan exists for the pair
    /// - [`crate::Error::TypeMismatch`] if a value fails its type assertion
    /// - [`crate::Error::Transform`] if a transform fails
    /// - [`crate::Error::Value`] if the record cannot be built into `D`
    pub fn map<S, D>(&self, source: &S) -> crate::Result<D>
    where
        S: Shape,
        D: Shape + DeserializeOwned,
    {
        let destination = D::shape_id();
        let record = self.map_record(source, &destination)?;
        Ok(from_record(&destination, record)?)
    }

    /// Map a source instance to the record of a destination shape.
    ///
    /// # Errors
    ///
    /// Same as [`TypeMapper::map`], except that no concrete type is built.
    pub fn map_record<S: Shape>(&self, source: &S, destination: &ShapeId) -> crate::Result<Record> {
        let key = TypePairKey::new(S::shape_id(), destination.clone());
        let plan = self
            .resolve(&key)
            .ok_or(crate::Error::MappingNotConfigured { key })?;

        if !plan.accepts_source::<S>() {
            return Err(crate::Error::configuration(format!(
                "Mapping {} was configured for source type {}, not {}",
                plan.key(),
                plan.source_type_name(),
                std::any::type_name::<S>()
            )));
        }

        execute(plan, source)
    }

    /// Map every source in order. Either all sources map or none are returned.
    ///
    /// # Errors
    ///
    /// Returns the error of the first source that fails to map.
    pub fn map_all<S, D>(&self, sources: &[S]) -> crate::Result<Vec<D>>
    where
        S: Shape,
        D: Shape + DeserializeOwned,
    {
        sources.iter().map(|source| self.map(source)).collect()
    }
}

fn execute(plan: &FieldPlan, source: &dyn Any) -> crate::Result<Record> {
    trace!("Executing mapping {} ({} rules)", plan.key(), plan.len());
    let mut record = plan.instantiate()?;

    for rule in plan.rules() {
        let field = &rule.destination_field;
        let value = (rule.transform)(source).map_err(|message| crate::Error::Transform {
            field: field.clone(),
            message,
        })?;

        if let Some(expected) = rule.expected_type {
            let actual = TypeTag::of(&value);
            if actual != expected {
                return Err(crate::Error::TypeMismatch {
                    field: field.clone(),
                    expected,
                    actual,
                });
            }
        }

        record.insert(field.clone(), value);
    }

    Ok(record)
}
