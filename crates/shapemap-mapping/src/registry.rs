//! Type mapping registry
//!
//! Holds one [`FieldPlan`] per (source, destination) pair. Configuration
//! needs `&mut TypeMapper`, execution only `&TypeMapper`, so a configured
//! mapper can be shared read-only (for example behind an `Arc`).

use serde::Serialize;
use shapemap_value::{Record, Shape, ShapeId, TypePairKey, Value, to_record};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::debug;

use crate::builder::MapBuilder;
use crate::config::{DuplicatePolicy, MapperConfig};
use crate::plan::{FieldPlan, TemplateFn};
use crate::profile::MappingProfile;

/// Registry of mapping plans keyed by type pair
#[derive(Debug, Default, Clone)]
pub struct TypeMapper {
    config: MapperConfig,
    plans: HashMap<TypePairKey, FieldPlan>,
}

impl TypeMapper {
    /// Create an empty mapper with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MapperConfig::default())
    }

    /// Create an empty mapper with a specific configuration
    #[must_use]
    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            plans: HashMap::new(),
        }
    }

    /// Create a mapper configured by a profile
    ///
    /// # Errors
    ///
    /// Returns the first configuration error raised by the profile.
    pub fn from_profile<P: MappingProfile + ?Sized>(profile: &P) -> crate::Result<Self> {
        let mut mapper = Self::new();
        mapper.add_profile(profile)?;
        Ok(mapper)
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Apply a profile's mappings to this mapper
    ///
    /// # Errors
    ///
    /// Returns the first configuration error raised by the profile.
    pub fn add_profile<P: MappingProfile + ?Sized>(
        &mut self,
        profile: &P,
    ) -> crate::Result<&mut Self> {
        debug!("Applying mapping profile '{}'", profile.name());
        profile.configure(self)?;
        Ok(self)
    }

    /// Register a mapping from `S` to `D`, starting destinations from
    /// `D::default()`.
    ///
    /// An existing mapping for the same pair is replaced, or rejected when
    /// [`MapperConfig::on_duplicate_map`] is [`DuplicatePolicy::Reject`].
    /// A replaced plan is discarded as soon as this returns: if configuring
    /// the new plan fails part-way, the pair keeps only the rules added
    /// before the failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair is rejected as a duplicate or `D` does not
    /// serialize to a record.
    pub fn create_map<S, D>(&mut self) -> crate::Result<MapBuilder<'_, S>>
    where
        S: Shape,
        D: Shape + Default + Serialize,
    {
        self.create_map_with::<S, D, _>(D::default)
    }

    /// Register a mapping from `S` to `D` whose destinations start from
    /// `factory()`, for shapes without a usable `Default`.
    ///
    /// # Errors
    ///
    /// Same as [`TypeMapper::create_map`].
    pub fn create_map_with<S, D, F>(&mut self, factory: F) -> crate::Result<MapBuilder<'_, S>>
    where
        S: Shape,
        D: Shape + Serialize,
        F: Fn() -> D + Send + Sync + 'static,
    {
        let destination = D::shape_id();
        let shape = destination.clone();
        let template: TemplateFn = Arc::new(move || -> shapemap_value::Result<Record> {
            to_record(&shape, &factory())
        });
        self.register::<S>(destination, template)
    }

    /// Register a mapping from `S` to a named record shape with the given
    /// fields. Results of this mapping are plain records.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair is rejected as a duplicate.
    pub fn create_record_map<S, I, N>(
        &mut self,
        destination: impl Into<ShapeId>,
        fields: I,
    ) -> crate::Result<MapBuilder<'_, S>>
    where
        S: Shape,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let blank: Record = fields
            .into_iter()
            .map(|field| (field.into(), Value::Null))
            .collect();
        let template: TemplateFn =
            Arc::new(move || -> shapemap_value::Result<Record> { Ok(blank.clone()) });
        self.register::<S>(destination.into(), template)
    }

    fn register<S: Shape>(
        &mut self,
        destination: ShapeId,
        template: TemplateFn,
    ) -> crate::Result<MapBuilder<'_, S>> {
        let key = TypePairKey::new(S::shape_id(), destination);
        let plan = FieldPlan::new::<S>(key.clone(), template)?;

        let slot = match self.plans.entry(key) {
            Entry::Occupied(mut entry) => {
                if self.config.on_duplicate_map == DuplicatePolicy::Reject {
                    return Err(crate::Error::configuration(format!(
                        "Mapping {} is already registered",
                        entry.key()
                    )));
                }
                debug!("Replacing mapping {}", entry.key());
                entry.insert(plan);
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                debug!("Registered mapping {}", entry.key());
                entry.insert(plan)
            }
        };

        Ok(MapBuilder::new(slot, self.config))
    }

    /// Look up the plan for a type pair
    #[must_use]
    pub fn resolve(&self, key: &TypePairKey) -> Option<&FieldPlan> {
        self.plans.get(key)
    }

    /// Check if a mapping from `S` to `D` is registered
    #[must_use]
    pub fn contains<S: Shape, D: Shape>(&self) -> bool {
        self.contains_key(&TypePairKey::of::<S, D>())
    }

    /// Check if a mapping is registered for the key
    #[must_use]
    pub fn contains_key(&self, key: &TypePairKey) -> bool {
        self.plans.contains_key(key)
    }

    /// Registered type pairs in sorted order
    #[must_use]
    pub fn registered_pairs(&self) -> Vec<&TypePairKey> {
        let mut keys: Vec<_> = self.plans.keys().collect();
        keys.sort();
        keys
    }

    /// Number of registered mappings
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Check if no mappings are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
