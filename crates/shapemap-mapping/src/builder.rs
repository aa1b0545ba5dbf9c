//! Fluent mapping builder
//!
//! [`MapBuilder`] adds rules to the plan it was created for. Every rule it
//! adds is handed back as a [`MemberBuilder`], which is the only place a type
//! assertion can be attached. The assertion therefore always lands on the
//! rule that was just added, and asserting a type before any member exists
//! does not compile.
#![allow(clippy::return_self_not_must_use)] // Member builders may be dropped once configured.

use serde::Serialize;
use shapemap_value::{Shape, TypePairKey, TypeTag, Value};
use std::any::Any;
use std::convert::Infallible;
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

use crate::config::MapperConfig;
use crate::plan::{FieldPlan, FieldRule, TransformFn};

/// Per-member options for the explicit form of `for_member`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberOptions {
    /// Runtime category the transformed value must have
    pub expected_type: Option<TypeTag>,
}

impl MemberOptions {
    /// Options asserting the given type
    #[must_use]
    pub fn expecting(expected_type: TypeTag) -> Self {
        Self {
            expected_type: Some(expected_type),
        }
    }
}

/// Builder bound to the plan of one (source, destination) pair
pub struct MapBuilder<'a, S> {
    plan: &'a mut FieldPlan,
    config: MapperConfig,
    _source: PhantomData<fn(&S)>,
}

impl<'a, S: Shape> MapBuilder<'a, S> {
    pub(crate) fn new(plan: &'a mut FieldPlan, config: MapperConfig) -> Self {
        Self {
            plan,
            config,
            _source: PhantomData,
        }
    }

    /// Map a destination field from the source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the destination has no such field
    /// or the field is already mapped under [`crate::DuplicatePolicy::Reject`].
    pub fn for_member<T, F>(
        self,
        field: impl Into<String>,
        transform: F,
    ) -> crate::Result<MemberBuilder<'a, S>>
    where
        T: Serialize + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        self.for_member_with(field, MemberOptions::default(), transform)
    }

    /// Map a destination field with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`MapBuilder::for_member`].
    pub fn for_member_with<T, F>(
        self,
        field: impl Into<String>,
        options: MemberOptions,
        transform: F,
    ) -> crate::Result<MemberBuilder<'a, S>>
    where
        T: Serialize + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        self.add_rule(field.into(), options, move |source: &S| {
            Ok::<T, Infallible>(transform(source))
        })
    }

    /// Map a destination field with a transform that can fail.
    ///
    /// A failing transform surfaces as [`crate::Error::Transform`] when the
    /// mapping runs.
    ///
    /// # Errors
    ///
    /// Same as [`MapBuilder::for_member`].
    pub fn try_for_member<T, E, F>(
        self,
        field: impl Into<String>,
        transform: F,
    ) -> crate::Result<MemberBuilder<'a, S>>
    where
        T: Serialize + 'static,
        E: Display,
        F: Fn(&S) -> Result<T, E> + Send + Sync + 'static,
    {
        self.add_rule(field.into(), MemberOptions::default(), transform)
    }

    /// Type pair this builder configures
    #[must_use]
    pub fn key(&self) -> &TypePairKey {
        self.plan.key()
    }

    /// The plan as configured so far
    #[must_use]
    pub fn plan(&self) -> &FieldPlan {
        self.plan
    }

    fn add_rule<T, E, F>(
        self,
        field: String,
        options: MemberOptions,
        transform: F,
    ) -> crate::Result<MemberBuilder<'a, S>>
    where
        T: Serialize + 'static,
        E: Display,
        F: Fn(&S) -> Result<T, E> + Send + Sync + 'static,
    {
        self.check_member(&field)?;

        trace!("Adding member '{}' to {}", field, self.plan.key());
        let rule = FieldRule::new(field, erase(transform));
        let index = self
            .plan
            .insert_rule(rule, self.config.on_duplicate_member)?;
        if let Some(expected) = options.expected_type {
            self.plan.set_expected_type(index, expected);
        }

        Ok(MemberBuilder {
            builder: self,
            index,
        })
    }

    fn check_member(&self, field: &str) -> crate::Result<()> {
        if field.is_empty() {
            return Err(crate::Error::configuration(format!(
                "Empty member name in mapping {}",
                self.plan.key()
            )));
        }

        if self.config.validate_members && !self.plan.has_destination_field(field) {
            return Err(crate::Error::configuration(format!(
                "Destination '{}' has no field '{}', known fields: {:?}",
                self.plan.key().destination,
                field,
                self.plan.destination_fields()
            )));
        }

        Ok(())
    }
}

/// Builder for the member that was just added
pub struct MemberBuilder<'a, S> {
    builder: MapBuilder<'a, S>,
    index: usize,
}

impl<'a, S: Shape> MemberBuilder<'a, S> {
    /// Require the member's value to have the given runtime category
    pub fn is(self, expected: TypeTag) -> Self {
        self.builder.plan.set_expected_type(self.index, expected);
        self
    }

    /// Destination field this member maps
    #[must_use]
    pub fn field(&self) -> &str {
        self.builder.plan.field_at(self.index).unwrap_or_default()
    }

    /// Map the next destination field.
    ///
    /// # Errors
    ///
    /// Same as [`MapBuilder::for_member`].
    pub fn for_member<T, F>(
        self,
        field: impl Into<String>,
        transform: F,
    ) -> crate::Result<MemberBuilder<'a, S>>
    where
        T: Serialize + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        self.builder.for_member(field, transform)
    }

    /// Map the next destination field with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`MapBuilder::for_member`].
    pub fn for_member_with<T, F>(
        self,
        field: impl Into<String>,
        options: MemberOptions,
        transform: F,
    ) -> crate::Result<MemberBuilder<'a, S>>
    where
        T: Serialize + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        self.builder.for_member_with(field, options, transform)
    }

    /// Map the next destination field with a transform that can fail.
    ///
    /// # Errors
    ///
    /// Same as [`MapBuilder::for_member`].
    pub fn try_for_member<T, E, F>(
        self,
        field: impl Into<String>,
        transform: F,
    ) -> crate::Result<MemberBuilder<'a, S>>
    where
        T: Serialize + 'static,
        E: Display,
        F: Fn(&S) -> Result<T, E> + Send + Sync + 'static,
    {
        self.builder.try_for_member(field, transform)
    }

    /// Return to the plan-level builder
    pub fn done(self) -> MapBuilder<'a, S> {
        self.builder
    }
}

fn erase<S, T, E, F>(transform: F) -> TransformFn
where
    S: Shape,
    T: Serialize + 'static,
    E: Display,
    F: Fn(&S) -> Result<T, E> + Send + Sync + 'static,
{
    Arc::new(move |source: &dyn Any| -> Result<Value, String> {
        let source = source
            .downcast_ref::<S>()
            .ok_or_else(|| format!("source is not a {}", std::any::type_name::<S>()))?;
        let value = transform(source).map_err(|e| e.to_string())?;
        if let Some(number) = non_finite(&value) {
            return Err(format!("value {number} is not a finite number"));
        }
        serde_json::to_value(value).map_err(|e| format!("cannot convert value: {e}"))
    })
}

// JSON numbers are finite; serde_json would otherwise store NaN and infinities as null.
fn non_finite(value: &dyn Any) -> Option<f64> {
    let number = value
        .downcast_ref::<f64>()
        .copied()
        .or_else(|| value.downcast_ref::<f32>().map(|n| f64::from(*n)))?;
    (!number.is_finite()).then_some(number)
}
