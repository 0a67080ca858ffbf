//! Field-mapping tables for FortiOS resources
//!
//! This crate owns the declarative description of every supported resource
//! and turns it into the schema IR (`ResourceDefinition`).
//!
//! ## Table Format
//!
//! Each resource is one YAML document under `resources/`:
//! - `name`, `type_name`, `api_path`, `kind` (`table` or `singleton`)
//! - `mkey` for tables, naming the primary key attribute
//! - `attributes`, each with a `type` (`string`, `integer`, `list`, `block`),
//!   flags (`required`, `computed`, `force_new`, `sensitive`), an optional
//!   constraint (`max_length`, `length`, `range`) and nested `attributes`
//!
//! REST keys are derived by hyphenating the Terraform key; `api_name`
//! overrides irregular ones (`802.1-tlvs`, `secondary-IP`).
//!
//! ## Lifecycle Mapping
//!
//! Lifecycle steps map to client calls per resource kind:
//! - Table: Create → Create, Read → Read, Update → Update, Delete → Delete
//! - Singleton: Create → Update
//! - Adopted objects (physical interfaces): Create → Update, Delete → nothing

mod catalog;
mod converter;
mod operation_mapper;
mod parser;
mod type_mapper;
mod types;

pub use catalog::{Catalog, TYPE_PREFIX};
pub use operation_mapper::{CrudOperation, MkeySource, OperationMapper, OperationMapping};
pub use parser::CatalogParser;
pub use type_mapper::TypeMapper;
pub use types::{AdoptDoc, AttributeDoc, TableDoc};

use fortios_provider_common::{ResourceDefinition, Result};

/// Parse a single resource table from YAML
///
/// # Arguments
/// * `yaml` - Table document
///
/// # Returns
/// * `ResourceDefinition` - Intermediate representation of the resource
pub fn parse_table(yaml: &str) -> Result<ResourceDefinition> {
    CatalogParser::from_yaml(yaml)?.parse()
}
