//! Resource catalog - the embedded field-mapping tables
//!
//! Every supported resource is described by a YAML table compiled into the
//! binary. The catalog parses them once and serves lookups by name.

use super::parser::CatalogParser;
use fortios_provider_common::{ProviderError, ResourceDefinition, Result};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Embedded resource tables (compiled into the binary)
const RESOURCE_FILES: &[(&str, &str)] = &[
    ("dlp_settings", include_str!("../resources/dlp_settings.yaml")),
    (
        "firewall_address6",
        include_str!("../resources/firewall_address6.yaml"),
    ),
    (
        "log_fortianalyzer2_filter",
        include_str!("../resources/log_fortianalyzer2_filter.yaml"),
    ),
    (
        "log_fortianalyzer3_overridefilter",
        include_str!("../resources/log_fortianalyzer3_overridefilter.yaml"),
    ),
    (
        "switchcontroller_lldpprofile",
        include_str!("../resources/switchcontroller_lldpprofile.yaml"),
    ),
    (
        "system_automationdestination",
        include_str!("../resources/system_automationdestination.yaml"),
    ),
    (
        "system_interface",
        include_str!("../resources/system_interface.yaml"),
    ),
    (
        "system_virtualwirepair",
        include_str!("../resources/system_virtualwirepair.yaml"),
    ),
    ("wanopt_peer", include_str!("../resources/wanopt_peer.yaml")),
    (
        "webproxy_debugurl",
        include_str!("../resources/webproxy_debugurl.yaml"),
    ),
];

/// Terraform resource type prefix
pub const TYPE_PREFIX: &str = "fortios_";

/// Collection of resource definitions keyed by resource name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: BTreeMap<String, ResourceDefinition>,
}

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// Build a catalog from already parsed definitions
    pub fn from_definitions(definitions: Vec<ResourceDefinition>) -> Result<Self> {
        let mut resources = BTreeMap::new();
        for def in definitions {
            if resources.contains_key(&def.name) {
                return Err(ProviderError::Parse(format!(
                    "duplicate resource '{}'",
                    def.name
                )));
            }
            resources.insert(def.name.clone(), def);
        }
        Ok(Self { resources })
    }

    /// Parse every embedded table
    pub fn load_builtin() -> Result<Self> {
        let definitions = RESOURCE_FILES
            .iter()
            .map(|(file, content)| {
                CatalogParser::from_yaml(content)
                    .and_then(|p| p.parse())
                    .map_err(|e| ProviderError::Parse(format!("{}.yaml: {}", file, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_definitions(definitions)
    }

    /// Get the embedded catalog (parsed on first access)
    pub fn builtin() -> &'static Catalog {
        BUILTIN.get_or_init(|| {
            Self::load_builtin()
                .unwrap_or_else(|e| panic!("Failed to load embedded resource tables: {}", e))
        })
    }

    /// Look up a resource by name, with or without the `fortios_` prefix
    pub fn get(&self, name: &str) -> Option<&ResourceDefinition> {
        let key = name.strip_prefix(TYPE_PREFIX).unwrap_or(name);
        self.resources.get(key)
    }

    /// Look up a resource or fail with `UnknownResource`
    pub fn require(&self, name: &str) -> Result<&ResourceDefinition> {
        self.get(name)
            .ok_or_else(|| ProviderError::UnknownResource(name.to_string()))
    }

    /// Resource definitions in name order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.resources.values()
    }

    /// Resource names in order (for autocomplete and listings)
    pub fn names(&self) -> Vec<&str> {
        self.resources.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
