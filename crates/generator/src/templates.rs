//! Template loading and management

use fortios_provider_common::{ProviderError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("tf_type", tf_type_filter);
    tera.register_filter("capitalize", capitalize_filter);

    tera.add_raw_template("index.md", include_str!("../templates/index.md.tera"))
        .map_err(|e| {
            ProviderError::Generation(format!("Failed to load index.md template: {}", e))
        })?;

    tera.add_raw_template("resource.md", include_str!("../templates/resource.md.tera"))
        .map_err(|e| {
            ProviderError::Generation(format!("Failed to load resource.md template: {}", e))
        })?;

    Ok(tera)
}

/// Filter to convert an attribute type to its Terraform documentation name
fn tf_type_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let attr_type = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("tf_type filter expects a string"))?;

    let tf_type = match attr_type {
        "string" => "String",
        "integer" => "Number",
        "list" => "List of blocks",
        "block" => "Block (at most one)",
        other => return Err(tera::Error::msg(format!("unknown attribute type '{}'", other))),
    };

    Ok(Value::String(tf_type.to_string()))
}

/// Filter to capitalize first letter
fn capitalize_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("capitalize filter expects a string"))?;

    let mut chars = s.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    Ok(Value::String(capitalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        let tera = load_templates().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        assert!(names.contains(&"index.md"));
        assert!(names.contains(&"resource.md"));
    }

    #[test]
    fn test_tf_type_filter() {
        let args = HashMap::new();
        let out = tf_type_filter(&Value::String("integer".into()), &args).unwrap();
        assert_eq!(out, Value::String("Number".into()));
        assert!(tf_type_filter(&Value::String("float".into()), &args).is_err());
        assert!(tf_type_filter(&Value::Bool(true), &args).is_err());
    }

    #[test]
    fn test_capitalize_filter() {
        let args = HashMap::new();
        let out = capitalize_filter(&Value::String("singleton".into()), &args).unwrap();
        assert_eq!(out, Value::String("Singleton".into()));
        let out = capitalize_filter(&Value::String(String::new()), &args).unwrap();
        assert_eq!(out, Value::String(String::new()));
    }
}
