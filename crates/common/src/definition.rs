//! Schema intermediate representation
//!
//! A [`ResourceDefinition`] is the single declarative table from which
//! expansion, flattening, validation and documentation are all driven.

use crate::naming::to_api_key;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Attribute value shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Integer,
    /// Repeated table of child records
    List,
    /// Single nested record: a REST object, a one-element list in Terraform
    Block,
}

impl AttributeType {
    /// Whether the attribute carries child records
    pub fn is_nested(&self) -> bool {
        matches!(self, AttributeType::List | AttributeType::Block)
    }

    /// Value Terraform stores when the attribute is unset
    pub fn zero_value(&self) -> Value {
        match self {
            AttributeType::String => Value::String(String::new()),
            AttributeType::Integer => Value::from(0),
            AttributeType::List | AttributeType::Block => Value::Array(Vec::new()),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Integer => write!(f, "integer"),
            AttributeType::List => write!(f, "list"),
            AttributeType::Block => write!(f, "block"),
        }
    }
}

/// Value constraint enforced before a payload is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Inclusive string length bounds
    Length { min: usize, max: usize },
    /// Inclusive integer bounds
    Range { min: i64, max: i64 },
}

impl Constraint {
    /// Check a value, returning a description of the violation
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        match (self, value) {
            (Constraint::Length { min, max }, Value::String(s)) => {
                let len = s.len();
                if len < *min || len > *max {
                    return Err(format!(
                        "expected length to be in the range ({} - {}), got {}",
                        min, max, len
                    ));
                }
                Ok(())
            },
            (Constraint::Range { min, max }, Value::Number(n)) => match n.as_i64() {
                Some(i) if i >= *min && i <= *max => Ok(()),
                Some(i) => Err(format!(
                    "expected to be in the range ({} - {}), got {}",
                    min, max, i
                )),
                None => Err(format!("expected an integer, got {}", n)),
            },
            (Constraint::Length { .. }, other) => Err(format!("expected a string, got {}", other)),
            (Constraint::Range { .. }, other) => Err(format!("expected an integer, got {}", other)),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Length { min, max } => write!(f, "length {}..={}", min, max),
            Constraint::Range { min, max } => write!(f, "range {}..={}", min, max),
        }
    }
}

/// Read-side value normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Keep `a.b.c.d/len` when the device answers with `a.b.c.d m.m.m.m`
    IpMaskCidr,
}

/// One field of a resource or nested record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Underscored Terraform key
    pub name: String,
    /// REST key when it does not follow the hyphenation rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_name: Option<String>,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub force_new: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize: Option<Normalization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Child attributes of a list or block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeDefinition>,
}

impl AttributeDefinition {
    /// Create a plain optional attribute
    pub fn new(name: &str, attr_type: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            api_name: None,
            attr_type,
            required: false,
            computed: false,
            force_new: false,
            sensitive: false,
            constraint: None,
            normalize: None,
            description: None,
            attributes: Vec::new(),
        }
    }

    /// Key used in the REST payload
    pub fn api_key(&self) -> String {
        self.api_name
            .clone()
            .unwrap_or_else(|| to_api_key(&self.name))
    }

    pub fn optional(&self) -> bool {
        !self.required
    }

    /// Look up a direct child by Terraform key
    pub fn child(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Nesting depth counting this attribute as level one
    pub fn depth(&self) -> usize {
        1 + self.attributes.iter().map(|a| a.depth()).max().unwrap_or(0)
    }
}

/// How the remote object is addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Table of objects keyed by an mkey
    Table,
    /// One object per VDOM, no mkey
    Singleton,
}

/// Objects that already exist on the device and are adopted rather than created
///
/// When the configured `attribute` equals `equals`, create becomes an update
/// keyed by the payload's mkey and delete leaves the object in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptRule {
    pub attribute: String,
    pub equals: String,
}

/// A complete FortiOS configuration resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Resource name without provider prefix (e.g., "system_interface")
    pub name: String,
    /// Type name, also the fallback identifier (e.g., "SystemInterface")
    pub type_name: String,
    #[serde(default)]
    pub description: String,
    /// CMDB path (e.g., "system/interface")
    pub api_path: String,
    pub kind: ResourceKind,
    /// Terraform key of the primary key attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt_existing: Option<AdoptRule>,
    pub attributes: Vec<AttributeDefinition>,
}

impl ResourceDefinition {
    /// Terraform resource type (e.g., "fortios_system_interface")
    pub fn terraform_type(&self) -> String {
        format!("fortios_{}", self.name)
    }

    /// Resolve a dotted attribute path such as `ipv6.vrrp6.status`
    pub fn attribute(&self, path: &str) -> Option<&AttributeDefinition> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.attributes.iter().find(|a| a.name == first)?;
        for part in parts {
            current = current.child(part)?;
        }
        Some(current)
    }

    pub fn mkey_attribute(&self) -> Option<&AttributeDefinition> {
        self.mkey.as_deref().and_then(|m| self.attribute(m))
    }

    /// Maximum nesting depth, counting the resource itself as level one
    pub fn depth(&self) -> usize {
        1 + self.attributes.iter().map(|a| a.depth()).max().unwrap_or(0)
    }

    /// Number of attributes at every level
    pub fn attribute_count(&self) -> usize {
        fn count(attrs: &[AttributeDefinition]) -> usize {
            attrs.iter().map(|a| 1 + count(&a.attributes)).sum()
        }
        count(&self.attributes)
    }
}
