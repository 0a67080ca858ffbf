//! Converts raw YAML tables to the ResourceDefinition IR

use super::type_mapper::TypeMapper;
use super::types::{AttributeDoc, TableDoc};
use fortios_provider_common::{
    AdoptRule, AttributeDefinition, AttributeType, Constraint, ProviderError, ResourceDefinition,
    ResourceKind, Result,
};
use std::collections::HashSet;

/// Convert a table document to a ResourceDefinition
pub fn convert_table_to_definition(doc: &TableDoc) -> Result<ResourceDefinition> {
    let kind = match doc.kind.as_str() {
        "table" => ResourceKind::Table,
        "singleton" => ResourceKind::Singleton,
        other => {
            return Err(parse_error(
                &doc.name,
                format!("unknown resource kind '{}'", other),
            ))
        },
    };

    if doc.api_path.is_empty() || doc.api_path.starts_with('/') {
        return Err(parse_error(
            &doc.name,
            format!("api_path '{}' must be a relative CMDB path", doc.api_path),
        ));
    }

    let attributes = convert_attributes(&doc.name, "", &doc.attributes)?;

    let definition = ResourceDefinition {
        name: doc.name.clone(),
        type_name: doc.type_name.clone(),
        description: doc.description.clone().unwrap_or_default(),
        api_path: doc.api_path.clone(),
        kind,
        mkey: doc.mkey.clone(),
        adopt_existing: doc.adopt_existing.as_ref().map(|a| AdoptRule {
            attribute: a.attribute.clone(),
            equals: a.equals.clone(),
        }),
        attributes,
    };

    check_mkey(&definition)?;
    check_adopt_rule(&definition)?;

    Ok(definition)
}

/// Convert one level of attributes, enforcing unique keys in both directions
fn convert_attributes(
    resource: &str,
    prefix: &str,
    docs: &[AttributeDoc],
) -> Result<Vec<AttributeDefinition>> {
    let mut tf_keys = HashSet::new();
    let mut api_keys = HashSet::new();
    let mut attributes = Vec::with_capacity(docs.len());

    for doc in docs {
        let attr = convert_attribute(resource, prefix, doc)?;
        let path = join_path(prefix, &attr.name);

        if !tf_keys.insert(attr.name.clone()) {
            return Err(parse_error(resource, format!("duplicate attribute '{}'", path)));
        }
        if !api_keys.insert(attr.api_key()) {
            return Err(parse_error(
                resource,
                format!("REST key '{}' of '{}' is not unique", attr.api_key(), path),
            ));
        }

        attributes.push(attr);
    }

    Ok(attributes)
}

fn convert_attribute(resource: &str, prefix: &str, doc: &AttributeDoc) -> Result<AttributeDefinition> {
    let path = join_path(prefix, &doc.name);

    if doc.name.is_empty() || doc.name.contains('.') || doc.name.contains('-') {
        return Err(parse_error(
            resource,
            format!("invalid attribute name '{}'", path),
        ));
    }

    let attr_type = TypeMapper::map_type(&doc.type_name).ok_or_else(|| {
        parse_error(
            resource,
            format!("unknown type '{}' for '{}'", doc.type_name, path),
        )
    })?;

    let constraint = convert_constraint(resource, &path, attr_type, doc)?;

    let normalize = match doc.normalize.as_deref() {
        None => None,
        Some(rule) => {
            let normalization = TypeMapper::map_normalization(rule).ok_or_else(|| {
                parse_error(
                    resource,
                    format!("unknown normalization '{}' for '{}'", rule, path),
                )
            })?;
            if attr_type != AttributeType::String {
                return Err(parse_error(
                    resource,
                    format!("normalization on non-string attribute '{}'", path),
                ));
            }
            Some(normalization)
        },
    };

    let children = if attr_type.is_nested() {
        if doc.attributes.is_empty() {
            return Err(parse_error(
                resource,
                format!("{} attribute '{}' has no child attributes", attr_type, path),
            ));
        }
        convert_attributes(resource, &path, &doc.attributes)?
    } else {
        if !doc.attributes.is_empty() {
            return Err(parse_error(
                resource,
                format!("scalar attribute '{}' cannot have child attributes", path),
            ));
        }
        Vec::new()
    };

    Ok(AttributeDefinition {
        name: doc.name.clone(),
        api_name: doc.api_name.clone(),
        attr_type,
        required: doc.required,
        computed: doc.computed,
        force_new: doc.force_new,
        sensitive: doc
            .sensitive
            .unwrap_or_else(|| TypeMapper::is_sensitive(&doc.name)),
        constraint,
        normalize,
        description: doc.description.clone(),
        attributes: children,
    })
}

fn convert_constraint(
    resource: &str,
    path: &str,
    attr_type: AttributeType,
    doc: &AttributeDoc,
) -> Result<Option<Constraint>> {
    let length = match (doc.max_length, doc.length) {
        (Some(_), Some(_)) => {
            return Err(parse_error(
                resource,
                format!("'{}' sets both max_length and length", path),
            ))
        },
        (Some(max), None) => Some((0, max)),
        (None, Some([min, max])) => Some((min, max)),
        (None, None) => None,
    };

    match (length, doc.range) {
        (Some(_), Some(_)) => Err(parse_error(
            resource,
            format!("'{}' sets both a length and a range", path),
        )),
        (Some((min, max)), None) => {
            if attr_type != AttributeType::String {
                return Err(parse_error(
                    resource,
                    format!("length constraint on {} attribute '{}'", attr_type, path),
                ));
            }
            if min > max {
                return Err(parse_error(
                    resource,
                    format!("inverted length bounds on '{}'", path),
                ));
            }
            Ok(Some(Constraint::Length { min, max }))
        },
        (None, Some([min, max])) => {
            if attr_type != AttributeType::Integer {
                return Err(parse_error(
                    resource,
                    format!("range constraint on {} attribute '{}'", attr_type, path),
                ));
            }
            if min > max {
                return Err(parse_error(
                    resource,
                    format!("inverted range bounds on '{}'", path),
                ));
            }
            Ok(Some(Constraint::Range { min, max }))
        },
        (None, None) => Ok(None),
    }
}

fn check_mkey(def: &ResourceDefinition) -> Result<()> {
    match (def.kind, def.mkey.as_deref()) {
        (ResourceKind::Singleton, Some(_)) => Err(parse_error(
            &def.name,
            "singleton resources cannot declare an mkey".to_string(),
        )),
        (ResourceKind::Table, None) => Err(parse_error(
            &def.name,
            "table resources must declare an mkey".to_string(),
        )),
        (ResourceKind::Table, Some(mkey)) => match def.attributes.iter().find(|a| a.name == mkey) {
            Some(attr) if !attr.attr_type.is_nested() => Ok(()),
            Some(_) => Err(parse_error(
                &def.name,
                format!("mkey '{}' must be a scalar attribute", mkey),
            )),
            None => Err(parse_error(
                &def.name,
                format!("mkey '{}' is not a top-level attribute", mkey),
            )),
        },
        (ResourceKind::Singleton, None) => Ok(()),
    }
}

fn check_adopt_rule(def: &ResourceDefinition) -> Result<()> {
    let Some(rule) = &def.adopt_existing else {
        return Ok(());
    };

    if def.kind != ResourceKind::Table {
        return Err(parse_error(
            &def.name,
            "adopt_existing requires a table resource".to_string(),
        ));
    }

    match def.attributes.iter().find(|a| a.name == rule.attribute) {
        Some(attr) if attr.attr_type == AttributeType::String => Ok(()),
        _ => Err(parse_error(
            &def.name,
            format!(
                "adopt_existing attribute '{}' must be a top-level string",
                rule.attribute
            ),
        )),
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn parse_error(resource: &str, message: String) -> ProviderError {
    ProviderError::Parse(format!("{}: {}", resource, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> TableDoc {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_convert_nested_table() {
        let def = convert_table_to_definition(&doc(
            r#"
name: system_virtualwirepair
type_name: SystemVirtualWirePair
api_path: system/virtual-wire-pair
kind: table
mkey: name
attributes:
  - name: name
    type: string
    required: true
    force_new: true
    max_length: 11
  - name: member
    type: list
    required: true
    attributes:
      - name: interface_name
        type: string
        computed: true
        max_length: 64
"#,
        ))
        .unwrap();

        assert_eq!(def.kind, ResourceKind::Table);
        assert_eq!(def.attributes.len(), 2);
        let member = def.attribute("member.interface_name").unwrap();
        assert_eq!(member.api_key(), "interface-name");
        assert_eq!(member.constraint, Some(Constraint::Length { min: 0, max: 64 }));
        assert!(def.attribute("name").unwrap().force_new);
    }

    #[test]
    fn test_rejects_duplicate_rest_keys() {
        let result = convert_table_to_definition(&doc(
            r#"
name: broken
type_name: Broken
api_path: broken/table
kind: singleton
attributes:
  - name: secondary_ip
    type: string
  - name: other
    api_name: secondary-ip
    type: string
"#,
        ));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("not unique"), "{}", err);
    }

    #[test]
    fn test_rejects_constraint_on_wrong_type() {
        let result = convert_table_to_definition(&doc(
            r#"
name: broken
type_name: Broken
api_path: broken/table
kind: singleton
attributes:
  - name: size
    type: integer
    max_length: 10
"#,
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = convert_table_to_definition(&doc(
            r#"
name: broken
type_name: Broken
api_path: broken/table
kind: singleton
attributes:
  - name: size
    type: integer
    range: [10, 1]
"#,
        ));
        assert!(result.unwrap_err().to_string().contains("inverted"));
    }

    #[test]
    fn test_mkey_rules() {
        let missing = convert_table_to_definition(&doc(
            r#"
name: broken
type_name: Broken
api_path: broken/table
kind: table
attributes:
  - name: name
    type: string
"#,
        ));
        assert!(missing.is_err());

        let singleton_with_mkey = convert_table_to_definition(&doc(
            r#"
name: broken
type_name: Broken
api_path: broken/table
kind: singleton
mkey: name
attributes:
  - name: name
    type: string
"#,
        ));
        assert!(singleton_with_mkey.is_err());
    }

    #[test]
    fn test_list_requires_children() {
        let result = convert_table_to_definition(&doc(
            r#"
name: broken
type_name: Broken
api_path: broken/table
kind: singleton
attributes:
  - name: member
    type: list
"#,
        ));
        assert!(result.unwrap_err().to_string().contains("no child attributes"));
    }

    #[test]
    fn test_sensitive_guess_and_override() {
        let def = convert_table_to_definition(&doc(
            r#"
name: sample
type_name: Sample
api_path: sample/table
kind: singleton
attributes:
  - name: password
    type: string
  - name: token_bucket
    type: integer
    sensitive: false
"#,
        ))
        .unwrap();
        assert!(def.attribute("password").unwrap().sensitive);
        assert!(!def.attribute("token_bucket").unwrap().sensitive);
    }
}
