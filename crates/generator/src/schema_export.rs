//! Terraform-style provider schema export
//!
//! Produces the document `terraform providers schema -json` would print for
//! the provider: one block per resource, scalar attributes under
//! `attributes`, lists and blocks under `block_types`.

use fortios_provider_common::{AttributeDefinition, AttributeType, ResourceDefinition};
use fortios_provider_schema::Catalog;
use serde::Serialize;
use std::collections::BTreeMap;

/// Registry address the schema is published under
pub const PROVIDER_SOURCE: &str = "registry.terraform.io/fortinetdev/fortios";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderSchema {
    pub format_version: String,
    pub provider_schemas: BTreeMap<String, ProviderEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderEntry {
    pub provider: SchemaVersioned,
    pub resource_schemas: BTreeMap<String, SchemaVersioned>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SchemaVersioned {
    pub version: u32,
    pub block: SchemaBlock,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SchemaBlock {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, SchemaAttribute>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub block_types: BTreeMap<String, NestedBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SchemaAttribute {
    #[serde(rename = "type")]
    pub attr_type: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub computed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NestedBlock {
    pub nesting_mode: String,
    pub block: SchemaBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,
}

/// Builds the provider schema from a catalog
pub struct SchemaExporter<'a> {
    catalog: &'a Catalog,
}

impl<'a> SchemaExporter<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn export(&self) -> ProviderSchema {
        let resource_schemas = self
            .catalog
            .iter()
            .map(|def| {
                (
                    def.terraform_type(),
                    SchemaVersioned {
                        version: 0,
                        block: resource_block(def),
                    },
                )
            })
            .collect();

        let mut provider_schemas = BTreeMap::new();
        provider_schemas.insert(
            PROVIDER_SOURCE.to_string(),
            ProviderEntry {
                provider: SchemaVersioned {
                    version: 0,
                    block: provider_block(),
                },
                resource_schemas,
            },
        );

        ProviderSchema {
            format_version: "1.0".to_string(),
            provider_schemas,
        }
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.export())
    }
}

fn resource_block(def: &ResourceDefinition) -> SchemaBlock {
    let mut block = attributes_block(&def.attributes);
    block.attributes.insert(
        "id".to_string(),
        SchemaAttribute {
            attr_type: "string".to_string(),
            required: false,
            optional: true,
            computed: true,
            sensitive: false,
        },
    );
    if !def.description.is_empty() {
        block.description = Some(def.description.clone());
    }
    block
}

fn attributes_block(attributes: &[AttributeDefinition]) -> SchemaBlock {
    let mut block = SchemaBlock::default();
    for attr in attributes {
        let (nesting_mode, max_items) = match attr.attr_type {
            AttributeType::String | AttributeType::Integer => {
                block.attributes.insert(attr.name.clone(), scalar(attr));
                continue;
            },
            AttributeType::List => ("list", None),
            AttributeType::Block => ("list", Some(1)),
        };
        block.block_types.insert(
            attr.name.clone(),
            NestedBlock {
                nesting_mode: nesting_mode.to_string(),
                block: attributes_block(&attr.attributes),
                min_items: attr.required.then_some(1),
                max_items,
            },
        );
    }
    block
}

fn scalar(attr: &AttributeDefinition) -> SchemaAttribute {
    SchemaAttribute {
        attr_type: match attr.attr_type {
            AttributeType::Integer => "number",
            _ => "string",
        }
        .to_string(),
        required: attr.required,
        optional: !attr.required,
        computed: attr.computed,
        sensitive: attr.sensitive,
    }
}

fn provider_block() -> SchemaBlock {
    let mut block = SchemaBlock::default();
    for (name, attr_type, sensitive) in [
        ("hostname", "string", false),
        ("token", "string", true),
        ("insecure", "bool", false),
        ("cabundlefile", "string", false),
        ("vdom", "string", false),
    ] {
        block.attributes.insert(
            name.to_string(),
            SchemaAttribute {
                attr_type: attr_type.to_string(),
                required: false,
                optional: true,
                computed: false,
                sensitive,
            },
        );
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(schema: &ProviderSchema, name: &str) -> SchemaBlock {
        schema.provider_schemas[PROVIDER_SOURCE].resource_schemas[name]
            .block
            .clone()
    }

    #[test]
    fn test_scalar_attributes() {
        let schema = SchemaExporter::new(Catalog::builtin()).export();
        let block = resource(&schema, "fortios_webproxy_debugurl");

        let name = &block.attributes["name"];
        assert_eq!(name.attr_type, "string");
        assert!(name.required && !name.optional);
        assert!(block.attributes["status"].computed);
        assert!(block.attributes.contains_key("id"));
    }

    #[test]
    fn test_nested_block_types() {
        let schema = SchemaExporter::new(Catalog::builtin()).export();
        let block = resource(&schema, "fortios_system_interface");

        let ipv6 = &block.block_types["ipv6"];
        assert_eq!(ipv6.nesting_mode, "list");
        assert_eq!(ipv6.max_items, Some(1));
        let vrrp6 = &ipv6.block.block_types["vrrp6"];
        assert_eq!(vrrp6.max_items, None);
        assert_eq!(vrrp6.block.attributes["vrid"].attr_type, "number");
        assert!(block.attributes["password"].sensitive);
    }

    #[test]
    fn test_required_list_has_min_items() {
        let schema = SchemaExporter::new(Catalog::builtin()).export();
        let block = resource(&schema, "fortios_system_virtualwirepair");
        assert_eq!(block.block_types["member"].min_items, Some(1));
    }

    #[test]
    fn test_json_shape() {
        let json = SchemaExporter::new(Catalog::builtin()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["format_version"], "1.0");
        assert_eq!(
            value["provider_schemas"][PROVIDER_SOURCE]["provider"]["block"]["attributes"]["token"]
                ["sensitive"],
            true
        );
        assert!(value["provider_schemas"][PROVIDER_SOURCE]["resource_schemas"]
            ["fortios_dlp_settings"]["block"]["attributes"]["size"]
            .is_object());
    }
}
