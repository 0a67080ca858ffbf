//! Terraform state → REST payload

use crate::resource_data::{is_set, type_label, ResourceData};
use fortios_provider_common::{AttributeDefinition, AttributeType, ResourceDefinition};
use serde_json::{Map, Value};

/// Build the REST payload for a resource from its Terraform state
///
/// Unset attributes (`GetOk` semantics) are left out of the payload. Only a
/// state whose lists or blocks are not lists of records can fail.
///
/// # Examples
/// ```
/// use fortios_provider_runtime::{expand_object, ResourceData};
/// use fortios_provider_schema::Catalog;
/// use serde_json::json;
///
/// let peer = Catalog::builtin().get("wanopt_peer").unwrap();
/// let data = ResourceData::from_value(json!({"peer_host_id": "branch1", "ip": ""})).unwrap();
/// let payload = expand_object(peer, &data).unwrap();
/// assert_eq!(serde_json::Value::Object(payload), json!({"peer-host-id": "branch1"}));
/// ```
pub fn expand_object(
    def: &ResourceDefinition,
    data: &ResourceData,
) -> Result<Map<String, Value>, String> {
    expand_record(&def.attributes, data.attributes(), "")
}

fn expand_record(
    attributes: &[AttributeDefinition],
    record: &Map<String, Value>,
    prefix: &str,
) -> Result<Map<String, Value>, String> {
    let mut obj = Map::new();
    for attr in attributes {
        let Some(value) = record.get(&attr.name).filter(|v| is_set(v)) else {
            continue;
        };
        let path = join(prefix, &attr.name);
        if let Some(expanded) = expand_value(attr, value, &path)? {
            obj.insert(attr.api_key(), expanded);
        }
    }
    Ok(obj)
}

fn expand_value(
    attr: &AttributeDefinition,
    value: &Value,
    path: &str,
) -> Result<Option<Value>, String> {
    match attr.attr_type {
        AttributeType::String | AttributeType::Integer => Ok(Some(value.clone())),
        AttributeType::List => {
            let items = as_records(value, path)?;
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let record = as_record(item, &format!("{}.{}", path, i))?;
                out.push(Value::Object(expand_record(
                    &attr.attributes,
                    record,
                    &format!("{}.{}", path, i),
                )?));
            }
            Ok(Some(Value::Array(out)))
        },
        AttributeType::Block => {
            let items = as_records(value, path)?;
            match items.first() {
                None | Some(Value::Null) => Ok(None),
                Some(first) => {
                    let record = as_record(first, &format!("{}.0", path))?;
                    let inner = expand_record(&attr.attributes, record, &format!("{}.0", path))?;
                    Ok(Some(Value::Object(inner)))
                },
            }
        },
    }
}

fn as_records<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("{}: expected a list, got {}", path, type_label(value)))
}

fn as_record<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, String> {
    value
        .as_object()
        .ok_or_else(|| format!("{}: expected a record, got {}", path, type_label(value)))
}

pub(crate) fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
