//! Configuration checks run before a payload is built

use crate::expand::join;
use crate::resource_data::type_label;
use fortios_provider_common::{
    AttributeDefinition, AttributeType, ProviderError, ResourceDefinition, Result,
};
use serde_json::{Map, Value};

/// Check a Terraform configuration against the resource schema
///
/// Every violation is reported, each prefixed with the dotted attribute path.
pub fn validate(def: &ResourceDefinition, attributes: &Map<String, Value>) -> Result<()> {
    let mut violations = Vec::new();
    check_record(&def.attributes, attributes, "", &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::Validation(violations))
    }
}

fn check_record(
    schema: &[AttributeDefinition],
    record: &Map<String, Value>,
    prefix: &str,
    violations: &mut Vec<String>,
) {
    for key in record.keys() {
        if !schema.iter().any(|a| &a.name == key) {
            violations.push(format!("{}: unsupported attribute", join(prefix, key)));
        }
    }

    for attr in schema {
        let path = join(prefix, &attr.name);
        match record.get(&attr.name) {
            None | Some(Value::Null) => {
                if attr.required {
                    violations.push(format!("{}: required attribute is not set", path));
                }
            },
            Some(value) => check_value(attr, value, &path, violations),
        }
    }
}

fn check_value(attr: &AttributeDefinition, value: &Value, path: &str, violations: &mut Vec<String>) {
    let shape_ok = match attr.attr_type {
        AttributeType::String => value.is_string(),
        AttributeType::Integer => value.is_i64() || value.is_u64(),
        AttributeType::List | AttributeType::Block => value.is_array(),
    };
    if !shape_ok {
        violations.push(format!(
            "{}: expected {}, got {}",
            path,
            attr.attr_type,
            type_label(value)
        ));
        return;
    }

    if let Some(constraint) = &attr.constraint {
        if let Err(msg) = constraint.check(value) {
            violations.push(format!("{}: {}", path, msg));
        }
    }

    if let Value::Array(items) = value {
        if attr.attr_type == AttributeType::Block && items.len() > 1 {
            violations.push(format!(
                "{}: attribute supports 1 item maximum, but config has {} declared",
                path,
                items.len()
            ));
        }
        if attr.required && items.is_empty() {
            violations.push(format!("{}: required attribute is not set", path));
        }
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}.{}", path, i);
            match item {
                Value::Object(record) => {
                    check_record(&attr.attributes, record, &item_path, violations)
                },
                other => violations.push(format!(
                    "{}: expected a record, got {}",
                    item_path,
                    type_label(other)
                )),
            }
        }
    }
}
