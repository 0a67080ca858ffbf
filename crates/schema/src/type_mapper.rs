//! Type mapping from table type names to the schema IR
//!
//! Maps the YAML `type:` strings to our `AttributeType` IR.

use fortios_provider_common::{AttributeType, Normalization};

/// Maps table type names to AttributeType
pub struct TypeMapper;

impl TypeMapper {
    /// Map a table type name to AttributeType
    ///
    /// # Examples
    /// ```
    /// use fortios_provider_schema::TypeMapper;
    /// use fortios_provider_common::AttributeType;
    ///
    /// assert_eq!(TypeMapper::map_type("string"), Some(AttributeType::String));
    /// assert_eq!(TypeMapper::map_type("int"), Some(AttributeType::Integer));
    /// assert_eq!(TypeMapper::map_type("block"), Some(AttributeType::Block));
    /// assert_eq!(TypeMapper::map_type("float"), None);
    /// ```
    pub fn map_type(type_name: &str) -> Option<AttributeType> {
        match type_name.trim().to_lowercase().as_str() {
            "string" | "str" => Some(AttributeType::String),
            "integer" | "int" => Some(AttributeType::Integer),
            "list" | "table" => Some(AttributeType::List),
            "block" | "complex" => Some(AttributeType::Block),
            _ => None,
        }
    }

    /// Map a normalization rule name
    pub fn map_normalization(rule: &str) -> Option<Normalization> {
        match rule.trim() {
            "ip_mask_cidr" => Some(Normalization::IpMaskCidr),
            _ => None,
        }
    }

    /// Check if a field name suggests it's sensitive
    pub fn is_sensitive(field_name: &str) -> bool {
        let lower = field_name.to_lowercase();
        lower.contains("password")
            || lower.contains("passwd")
            || lower.contains("secret")
            || lower.ends_with("psk")
            || lower.contains("token")
    }
}
