//! Integration test: profiles, configuration files, and shared execution

use serde::{Deserialize, Serialize};
use shapemap_mapping::{
    DuplicatePolicy, Error, MapperConfig, MappingProfile, MemberOptions, Shape, ShapeId,
    TypeMapper, Types,
};
use std::io::Write;
use std::sync::Arc;
use std::thread;

struct CustomerRow {
    id: u64,
    email: String,
    tags: Vec<String>,
    active: bool,
}

impl Shape for CustomerRow {}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Customer {
    id: u64,
    contact: Contact,
    tags: Vec<String>,
    active: bool,
}

impl Shape for Customer {}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Contact {
    email: String,
}

/// Has no `Default`; destinations come from a factory
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Badge {
    label: String,
    issued_by: String,
}

impl Shape for Badge {}

struct CustomerProfile;

impl MappingProfile for CustomerProfile {
    fn name(&self) -> &str {
        "customers"
    }

    fn configure(&self, mapper: &mut TypeMapper) -> shapemap_mapping::Result<()> {
        mapper
            .create_map::<CustomerRow, Customer>()?
            .for_member("id", |row| row.id)?
            .is(Types::Number)
            .for_member("contact", |row| Contact {
                email: row.email.to_lowercase(),
            })?
            .is(Types::Object)
            .for_member_with("tags", MemberOptions::expecting(Types::Array), |row| {
                row.tags.clone()
            })?
            .for_member("active", |row| row.active)?
            .is(Types::Boolean);

        mapper
            .create_map_with::<CustomerRow, Badge, _>(|| Badge {
                label: String::new(),
                issued_by: "shapemap".to_string(),
            })?
            .for_member("label", |row| format!("#{}", row.id))?;

        mapper
            .create_record_map::<CustomerRow, _, _>("customer_summary", ["id", "tag_count"])?
            .for_member("id", |row| row.id)?
            .for_member("tag_count", |row| row.tags.len())?;
        Ok(())
    }
}

fn row() -> CustomerRow {
    CustomerRow {
        id: 42,
        email: "Ada@Example.COM".to_string(),
        tags: vec!["vip".to_string(), "beta".to_string()],
        active: true,
    }
}

#[test]
fn test_profile_configures_all_pairs() -> anyhow::Result<()> {
    let mapper = TypeMapper::from_profile(&CustomerProfile)?;
    assert_eq!(mapper.len(), 3);

    let customer: Customer = mapper.map(&row())?;
    assert_eq!(
        customer,
        Customer {
            id: 42,
            contact: Contact {
                email: "ada@example.com".to_string(),
            },
            tags: vec!["vip".to_string(), "beta".to_string()],
            active: true,
        }
    );
    Ok(())
}

#[test]
fn test_factory_supplies_unmapped_fields() -> anyhow::Result<()> {
    let mapper = TypeMapper::from_profile(&CustomerProfile)?;

    let badge: Badge = mapper.map(&row())?;
    assert_eq!(
        badge,
        Badge {
            label: "#42".to_string(),
            issued_by: "shapemap".to_string(),
        }
    );
    Ok(())
}

#[test]
fn test_record_destination() -> anyhow::Result<()> {
    let mapper = TypeMapper::from_profile(&CustomerProfile)?;

    let record = mapper.map_record(&row(), &ShapeId::from("customer_summary"))?;
    assert_eq!(record.len(), 2);
    assert_eq!(record["id"], serde_json::json!(42));
    assert_eq!(record["tag_count"], serde_json::json!(2));
    Ok(())
}

#[test]
fn test_strict_config_from_file_rejects_reapplied_profile() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "on_duplicate_map: reject")?;
    let config = MapperConfig::from_file(file.path())?;
    assert_eq!(config.on_duplicate_map, DuplicatePolicy::Reject);

    let mut mapper = TypeMapper::with_config(config);
    mapper.add_profile(&CustomerProfile)?;
    let err = mapper.add_profile(&CustomerProfile).unwrap_err();

    assert!(matches!(err, Error::Configuration(_)));
    assert!(err.to_string().contains("already registered"));
    Ok(())
}

#[test]
fn test_replace_config_allows_reapplied_profile() -> anyhow::Result<()> {
    let mut mapper = TypeMapper::new();
    mapper.add_profile(&CustomerProfile)?;
    mapper.add_profile(&CustomerProfile)?;
    assert_eq!(mapper.len(), 3);
    Ok(())
}

#[test]
fn test_configured_mapper_shared_across_threads() -> anyhow::Result<()> {
    let mapper = Arc::new(TypeMapper::from_profile(&CustomerProfile)?);

    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let mapper = Arc::clone(&mapper);
            thread::spawn(move || {
                let source = CustomerRow { id: i, ..row() };
                mapper.map::<_, Customer>(&source).map(|c| c.id)
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let id = handle
            .join()
            .map_err(|_| anyhow::anyhow!("mapping thread panicked"))??;
        ids.push(id);
    }
    assert_eq!(ids, vec![0, 1, 2, 3]);
    Ok(())
}
