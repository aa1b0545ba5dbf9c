//! Field transformation plans
//!
//! A plan is the ordered list of per-field rules for one (source,
//! destination) pair, together with the template the destination record is
//! started from.

use shapemap_value::{Record, TypePairKey, TypeTag, Value};
use std::any::{Any, TypeId};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::DuplicatePolicy;

/// Type-erased field transform. Receives the source instance and returns the
/// value for one destination field, or a failure message.
pub type TransformFn = Arc<dyn Fn(&dyn Any) -> Result<Value, String> + Send + Sync>;

/// Produces a fresh destination record for each execution
pub type TemplateFn = Arc<dyn Fn() -> shapemap_value::Result<Record> + Send + Sync>;

/// One destination field and how to compute it
#[derive(Clone)]
pub struct FieldRule {
    /// Destination field the value is assigned to
    pub destination_field: String,

    /// Computes the value from the source instance
    pub transform: TransformFn,

    /// Runtime category the value must have, if any
    pub expected_type: Option<TypeTag>,
}

impl FieldRule {
    /// Create a rule with no type assertion
    pub fn new(destination_field: impl Into<String>, transform: TransformFn) -> Self {
        Self {
            destination_field: destination_field.into(),
            transform,
            expected_type: None,
        }
    }
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("destination_field", &self.destination_field)
            .field("expected_type", &self.expected_type)
            .finish_non_exhaustive()
    }
}

/// Ordered field rules scoped to one type pair
#[derive(Clone)]
pub struct FieldPlan {
    key: TypePairKey,
    source_type: TypeId,
    source_type_name: &'static str,
    template: TemplateFn,
    destination_fields: BTreeSet<String>,
    rules: Vec<FieldRule>,
}

impl FieldPlan {
    /// Create an empty plan reading from the Rust type `S`.
    ///
    /// The template is run once here to learn the destination's field set.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot produce a record.
    pub fn new<S: Any>(key: TypePairKey, template: TemplateFn) -> crate::Result<Self> {
        let destination_fields = template()?.keys().cloned().collect();
        Ok(Self {
            key,
            source_type: TypeId::of::<S>(),
            source_type_name: std::any::type_name::<S>(),
            template,
            destination_fields,
            rules: Vec::new(),
        })
    }

    /// Type pair this plan belongs to
    #[must_use]
    pub fn key(&self) -> &TypePairKey {
        &self.key
    }

    /// Rules in plan order
    #[must_use]
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the plan has no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fields the destination shape is known to have
    #[must_use]
    pub fn destination_fields(&self) -> &BTreeSet<String> {
        &self.destination_fields
    }

    /// Check if the destination shape has the given field
    #[must_use]
    pub fn has_destination_field(&self, field: &str) -> bool {
        self.destination_fields.contains(field)
    }

    /// Check whether this plan was built for source type `S`
    #[must_use]
    pub fn accepts_source<S: Any>(&self) -> bool {
        self.source_type == TypeId::of::<S>()
    }

    /// Rust type name of the source this plan reads from
    #[must_use]
    pub fn source_type_name(&self) -> &'static str {
        self.source_type_name
    }

    /// Position of the rule targeting `field`
    #[must_use]
    pub fn position(&self, field: &str) -> Option<usize> {
        self.rules
            .iter()
            .position(|rule| rule.destination_field == field)
    }

    /// Add a rule, returning its index.
    ///
    /// With [`DuplicatePolicy::Replace`] a rule for a field already in the
    /// plan takes over the earlier rule's position.
    ///
    /// # Errors
    ///
    /// Returns an error when the field already has a rule and the policy is
    /// [`DuplicatePolicy::Reject`].
    pub fn insert_rule(&mut self, rule: FieldRule, policy: DuplicatePolicy) -> crate::Result<usize> {
        match (self.position(&rule.destination_field), policy) {
            (None, _) => {
                self.rules.push(rule);
                Ok(self.rules.len() - 1)
            }
            (Some(index), DuplicatePolicy::Replace) => {
                self.rules[index] = rule;
                Ok(index)
            }
            (Some(_), DuplicatePolicy::Reject) => Err(crate::Error::configuration(format!(
                "Field '{}' is already mapped for {}",
                rule.destination_field, self.key
            ))),
        }
    }

    /// Set the type assertion of the rule at `index`
    pub(crate) fn set_expected_type(&mut self, index: usize, expected: TypeTag) {
        if let Some(rule) = self.rules.get_mut(index) {
            rule.expected_type = Some(expected);
        }
    }

    /// Destination field name of the rule at `index`
    pub(crate) fn field_at(&self, index: usize) -> Option<&str> {
        self.rules
            .get(index)
            .map(|rule| rule.destination_field.as_str())
    }

    /// Start a new destination record from the template
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot produce a record.
    pub fn instantiate(&self) -> crate::Result<Record> {
        Ok((self.template)()?)
    }
}

impl std::fmt::Debug for FieldPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldPlan")
            .field("key", &self.key)
            .field("source_type", &self.source_type_name)
            .field("destination_fields", &self.destination_fields)
            .field("rules", &self.rules)
            .finish()
    }
}
