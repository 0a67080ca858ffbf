//! Terraform-side resource state
//!
//! Holds the resource identifier and the attribute map keyed by underscored
//! Terraform names. Lookups follow the Terraform SDK: `get` returns whatever
//! is stored, `get_ok` treats zero values as unset.

use fortios_provider_common::{ProviderError, Result};
use serde_json::{Map, Value};

/// Whether a value counts as set (`GetOk` semantics)
///
/// `null`, `""`, `0`, `false` and empty collections are unset.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// State of one resource instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    attributes: Map<String, Value>,
    importing: bool,
}

impl ResourceData {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            id: String::new(),
            attributes,
            importing: false,
        }
    }

    /// Build state from a JSON document, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(attributes) => Ok(Self::new(attributes)),
            other => Err(ProviderError::Parse(format!(
                "resource state must be a JSON object, got {}",
                type_label(&other)
            ))),
        }
    }

    /// Empty state carrying only an identifier, as after `terraform import`
    pub fn for_import(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
            importing: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the resource as gone
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    pub fn importing(&self) -> bool {
        self.importing
    }

    pub fn set_importing(&mut self, importing: bool) {
        self.importing = importing;
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    /// Resolve a dotted path such as `member.0.interface_name`
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.attributes.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Like `get`, but zero values count as absent
    pub fn get_ok(&self, path: &str) -> Option<&Value> {
        self.get(path).filter(|v| is_set(v))
    }

    /// String value at `path`, if set
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_ok(path).and_then(Value::as_str)
    }

    /// Store a top-level attribute
    pub fn set(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }
}

/// Short name of a JSON value's shape, for error messages
pub(crate) fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ResourceData {
        ResourceData::from_value(json!({
            "name": "vwp1",
            "wildcard_vlan": "",
            "count": 0,
            "member": [
                {"interface_name": "port1"},
                {"interface_name": "port2"}
            ],
            "ipv6": [{"ip6_mode": "static", "vrrp6": []}]
        }))
        .unwrap()
    }

    #[test]
    fn test_get_dotted_paths() {
        let data = sample();
        assert_eq!(data.get("name"), Some(&json!("vwp1")));
        assert_eq!(data.get("member.1.interface_name"), Some(&json!("port2")));
        assert_eq!(data.get("ipv6.0.ip6_mode"), Some(&json!("static")));
        assert!(data.get("member.5.interface_name").is_none());
        assert!(data.get("member.x").is_none());
        assert!(data.get("name.inner").is_none());
    }

    #[test]
    fn test_get_ok_treats_zero_values_as_unset() {
        let data = sample();
        assert!(data.get("wildcard_vlan").is_some());
        assert!(data.get_ok("wildcard_vlan").is_none());
        assert!(data.get_ok("count").is_none());
        assert!(data.get_ok("ipv6.0.vrrp6").is_none());
        assert!(data.get_ok("member").is_some());
        assert_eq!(data.get_str("name"), Some("vwp1"));
    }

    #[test]
    fn test_identifier_lifecycle() {
        let mut data = sample();
        assert!(data.is_new());
        data.set_id("vwp1");
        assert_eq!(data.id(), "vwp1");
        data.clear_id();
        assert!(data.is_new());

        let imported = ResourceData::for_import("port1");
        assert!(imported.importing());
        assert_eq!(imported.id(), "port1");
    }

    #[test]
    fn test_state_must_be_object() {
        assert!(ResourceData::from_value(json!([1, 2])).is_err());
    }
}
