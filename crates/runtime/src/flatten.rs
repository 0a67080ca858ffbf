//! REST response → Terraform state
//!
//! Refreshing walks the resource definition, reads each REST key from the
//! response and stores the Terraform representation. Missing scalars become
//! zero values, nested records keep only the keys the device returned.
//!
//! A value of the wrong shape is tolerated when the raw response value is a
//! string, number or list: the attribute keeps its previous state and a
//! warning is logged. Any other mismatch fails the refresh.

use crate::expand::join;
use crate::resource_data::{type_label, ResourceData};
use fortios_provider_common::{
    AttributeDefinition, AttributeType, Normalization, ResourceDefinition,
};
use serde_json::{Map, Value};
use std::net::Ipv4Addr;

/// Copy a REST response into the resource state
///
/// Top-level lists and blocks are only refreshed when the state already
/// holds them or when the resource is being imported.
pub fn refresh_object(
    def: &ResourceDefinition,
    data: &mut ResourceData,
    response: &Map<String, Value>,
) -> Result<(), String> {
    for attr in &def.attributes {
        if attr.attr_type.is_nested() && !data.importing() && data.get_ok(&attr.name).is_none() {
            continue;
        }

        let raw = response.get(&attr.api_key());
        match flatten_value(attr, raw, &attr.name, data) {
            Ok(value) => data.set(&attr.name, value),
            Err(cause) if raw.is_some_and(tolerated) => {
                tracing::warn!(
                    "{}: ignoring unexpected value for {}: {}",
                    def.type_name,
                    attr.name,
                    cause
                );
            },
            Err(cause) => return Err(format!("Error reading {}: {}", attr.name, cause)),
        }
    }
    Ok(())
}

/// Response shapes skipped instead of failing the refresh
fn tolerated(raw: &Value) -> bool {
    matches!(raw, Value::String(_) | Value::Number(_) | Value::Array(_))
}

fn flatten_value(
    attr: &AttributeDefinition,
    raw: Option<&Value>,
    path: &str,
    prior: &ResourceData,
) -> Result<Value, String> {
    let value = match raw {
        None | Some(Value::Null) => return Ok(attr.attr_type.zero_value()),
        Some(v) => v,
    };

    match attr.attr_type {
        AttributeType::String => {
            let s = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => return Err(format!("expected a string, got {}", type_label(other))),
            };
            Ok(Value::String(match attr.normalize {
                Some(Normalization::IpMaskCidr) => match prior.get(path).and_then(Value::as_str) {
                    Some(previous) => keep_cidr(previous, &s),
                    None => s,
                },
                None => s,
            }))
        },
        AttributeType::Integer => coerce_integer(value),
        AttributeType::List => {
            let items = value
                .as_array()
                .ok_or_else(|| format!("expected a list, got {}", type_label(value)))?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| flatten_record(attr, item, &format!("{}.{}", path, i), prior))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        },
        AttributeType::Block => match value {
            Value::Object(_) => Ok(Value::Array(vec![flatten_record(
                attr,
                value,
                &format!("{}.0", path),
                prior,
            )?])),
            other => Err(format!("expected an object, got {}", type_label(other))),
        },
    }
}

/// Flatten one nested record, keeping only the keys present in the response
fn flatten_record(
    attr: &AttributeDefinition,
    item: &Value,
    path: &str,
    prior: &ResourceData,
) -> Result<Value, String> {
    let record = item
        .as_object()
        .ok_or_else(|| format!("expected a record, got {}", type_label(item)))?;

    let mut out = Map::new();
    for child in &attr.attributes {
        if let Some(raw) = record.get(&child.api_key()) {
            let child_path = join(path, &child.name);
            out.insert(
                child.name.clone(),
                flatten_value(child, Some(raw), &child_path, prior)?,
            );
        }
    }
    Ok(Value::Object(out))
}

/// Integers may come back as numeric strings
fn coerce_integer(value: &Value) -> Result<Value, String> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(Value::from(f as i64)),
            _ => Err(format!("expected an integer, got {}", n)),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                Ok(Value::from(i))
            } else if let Ok(u) = trimmed.parse::<u64>() {
                Ok(Value::from(u))
            } else {
                Err(format!("cannot parse '{}' as an integer", s))
            }
        },
        other => Err(format!("expected an integer, got {}", type_label(other))),
    }
}

/// Keep a CIDR value from state when the device reports the same address as `ip mask`
fn keep_cidr(previous: &str, reported: &str) -> String {
    if previous != reported && previous.contains('/') && reported.contains(' ') {
        if let Some(cidr) = ip_mask_to_cidr(reported) {
            if cidr == previous {
                return previous.to_string();
            }
        }
    }
    reported.to_string()
}

/// Convert `a.b.c.d m.m.m.m` to `a.b.c.d/len`
pub fn ip_mask_to_cidr(value: &str) -> Option<String> {
    let mut parts = value.split_whitespace();
    let ip: Ipv4Addr = parts.next()?.parse().ok()?;
    let mask: Ipv4Addr = parts.next()?.parse().ok()?;

    let bits = u32::from(mask);
    let len = bits.leading_ones();
    if bits.checked_shl(len).unwrap_or(0) != 0 {
        return None;
    }
    Some(format!("{}/{}", ip, len))
}
