//! Documentation and schema generation for the FortiOS provider
//!
//! This crate renders artifacts from the resource catalog:
//! - Markdown documentation (`index.md` plus one page per resource)
//! - Terraform-style provider schema JSON

mod schema_export;
mod templates;

pub use schema_export::{ProviderSchema, SchemaExporter, PROVIDER_SOURCE};

use fortios_provider_common::{
    AttributeDefinition, AttributeType, Constraint, ProviderError, ResourceDefinition,
    ResourceKind, Result,
};
use fortios_provider_schema::Catalog;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::Tera;

/// Resource summary exposed to templates
#[derive(Debug, Clone, Serialize)]
struct DocResource {
    name: String,
    tf_type: String,
    type_name: String,
    description: String,
    api_path: String,
    kind: &'static str,
    mkey: Option<String>,
}

impl DocResource {
    fn new(def: &ResourceDefinition) -> Self {
        Self {
            name: def.name.clone(),
            tf_type: def.terraform_type(),
            type_name: def.type_name.clone(),
            description: def.description.clone(),
            api_path: def.api_path.clone(),
            kind: match def.kind {
                ResourceKind::Table => "table",
                ResourceKind::Singleton => "singleton",
            },
            mkey: def.mkey.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct DocAttribute {
    name: String,
    api_key: String,
    attr_type: String,
    required: bool,
    force_new: bool,
    sensitive: bool,
    constraint: Option<String>,
    description: Option<String>,
    nested: bool,
}

/// One "Argument Reference" section: the top level or a nested block
#[derive(Debug, Clone, Serialize)]
struct DocSection {
    path: String,
    attributes: Vec<DocAttribute>,
}

/// Markdown documentation generator
pub struct DocsGenerator<'a> {
    catalog: &'a Catalog,
    tera: Tera,
}

impl<'a> DocsGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { catalog, tera })
    }

    /// Write `index.md` and `resources/<name>.md` under `output_dir`
    pub fn generate_to_directory(&self, output_dir: &Path) -> Result<()> {
        let resources_dir = output_dir.join("resources");
        fs::create_dir_all(&resources_dir).map_err(|e| {
            ProviderError::Generation(format!("Failed to create output directory: {}", e))
        })?;

        let index = self.render_index()?;
        fs::write(output_dir.join("index.md"), index)
            .map_err(|e| ProviderError::Generation(format!("Failed to write index.md: {}", e)))?;

        for def in self.catalog.iter() {
            let rendered = self.render_resource(def)?;
            let output_path = resources_dir.join(format!("{}.md", def.name));
            fs::write(output_path, rendered).map_err(|e| {
                ProviderError::Generation(format!("Failed to write {}.md: {}", def.name, e))
            })?;
        }

        Ok(())
    }

    /// Render the provider index page
    pub fn render_index(&self) -> Result<String> {
        let resources: Vec<DocResource> = self.catalog.iter().map(DocResource::new).collect();

        let mut context = tera::Context::new();
        context.insert("resources", &resources);
        context.insert("total_resources", &resources.len());

        self.tera
            .render("index.md", &context)
            .map_err(|e| ProviderError::Generation(format!("Template error: {:?}", e)))
    }

    /// Render the documentation page of one resource
    pub fn render_resource(&self, def: &ResourceDefinition) -> Result<String> {
        let mut sections = Vec::new();
        collect_sections(&def.attributes, String::new(), &mut sections);

        let (id_format, import_id) = match &def.mkey {
            Some(mkey) => (Some(format!("{{{{{}}}}}", mkey)), format!("{{{{{}}}}}", mkey)),
            None => (None, def.type_name.clone()),
        };

        let mut context = tera::Context::new();
        context.insert("resource", &DocResource::new(def));
        context.insert("sections", &sections);
        context.insert("example", &example_lines(def));
        context.insert("id_format", &id_format);
        context.insert("import_id", &import_id);

        self.tera
            .render("resource.md", &context)
            .map_err(|e| ProviderError::Generation(format!("Template error: {}", e)))
    }
}

/// Flatten the attribute tree into sections, parents before children
fn collect_sections(attributes: &[AttributeDefinition], path: String, out: &mut Vec<DocSection>) {
    out.push(DocSection {
        path: path.clone(),
        attributes: attributes
            .iter()
            .map(|a| DocAttribute {
                name: a.name.clone(),
                api_key: a.api_key(),
                attr_type: a.attr_type.to_string(),
                required: a.required,
                force_new: a.force_new,
                sensitive: a.sensitive,
                constraint: a.constraint.map(|c| c.to_string()),
                description: a.description.clone(),
                nested: a.attr_type.is_nested(),
            })
            .collect(),
    });

    for attr in attributes.iter().filter(|a| a.attr_type.is_nested()) {
        let child_path = if path.is_empty() {
            attr.name.clone()
        } else {
            format!("{}.{}", path, attr.name)
        };
        collect_sections(&attr.attributes, child_path, out);
    }
}

/// HCL lines of the example: the mkey and every required argument
fn example_lines(def: &ResourceDefinition) -> Vec<String> {
    let mut lines = Vec::new();
    for attr in &def.attributes {
        let is_mkey = def.mkey.as_deref() == Some(attr.name.as_str());
        if !attr.required && !is_mkey {
            continue;
        }
        match attr.attr_type {
            AttributeType::List | AttributeType::Block => {
                lines.push(format!("{} {{", attr.name));
                if let Some(child) = attr.attributes.iter().find(|c| !c.attr_type.is_nested()) {
                    lines.push(format!("  {} = {}", child.name, sample_value(child)));
                }
                lines.push("}".to_string());
            },
            _ => lines.push(format!("{} = {}", attr.name, sample_value(attr))),
        }
    }
    lines
}

fn sample_value(attr: &AttributeDefinition) -> String {
    match (attr.attr_type, attr.constraint) {
        (AttributeType::Integer, Some(Constraint::Range { min, .. })) => min.max(1).to_string(),
        (AttributeType::Integer, _) => "1".to_string(),
        _ => format!("\"{}\"", attr.name.replace('_', "")),
    }
}

/// Generate documentation for the built-in catalog (convenience function)
pub fn generate_docs(output_path: &str) -> Result<()> {
    let generator = DocsGenerator::new(Catalog::builtin())?;
    generator.generate_to_directory(Path::new(output_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_creation() {
        let result = DocsGenerator::new(Catalog::builtin());
        assert!(result.is_ok());
    }

    #[test]
    fn test_sections_follow_nesting() {
        let interface = Catalog::builtin().get("system_interface").unwrap();
        let mut sections = Vec::new();
        collect_sections(&interface.attributes, String::new(), &mut sections);

        let paths: Vec<&str> = sections.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths[0], "");
        assert!(paths.contains(&"ipv6"));
        assert!(paths.contains(&"ipv6.vrrp6"));
        let ipv6 = paths.iter().position(|p| *p == "ipv6").unwrap();
        let vrrp6 = paths.iter().position(|p| *p == "ipv6.vrrp6").unwrap();
        assert!(ipv6 < vrrp6);
    }

    #[test]
    fn test_example_lines() {
        let vwp = Catalog::builtin().get("system_virtualwirepair").unwrap();
        assert_eq!(
            example_lines(vwp),
            vec![
                "name = \"name\"".to_string(),
                "member {".to_string(),
                "  interface_name = \"interfacename\"".to_string(),
                "}".to_string(),
            ]
        );
    }
}
