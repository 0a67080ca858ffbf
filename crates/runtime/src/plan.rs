//! Change detection between prior state and new configuration

use crate::resource_data::is_set;
use fortios_provider_common::ResourceDefinition;
use serde_json::{Map, Value};

/// Result of comparing prior state with a new configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Top-level attributes whose value changes
    pub changed: Vec<String>,
    /// Changed attributes that force the resource to be replaced
    pub replace: Vec<String>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn requires_replace(&self) -> bool {
        !self.replace.is_empty()
    }
}

/// Diff a configuration against prior state
///
/// A computed attribute left out of the configuration keeps the value the
/// device reported and is not a change.
pub fn plan(
    def: &ResourceDefinition,
    prior: &Map<String, Value>,
    config: &Map<String, Value>,
) -> Plan {
    let mut result = Plan::default();
    for attr in &def.attributes {
        let old = prior.get(&attr.name).filter(|v| is_set(v));
        let new = config.get(&attr.name).filter(|v| is_set(v));

        let changed = match (old, new) {
            (_, None) if attr.computed => false,
            (Some(a), Some(b)) => a != b,
            (None, None) => false,
            _ => true,
        };

        if changed {
            result.changed.push(attr.name.clone());
            if attr.force_new {
                result.replace.push(attr.name.clone());
            }
        }
    }
    result
}
