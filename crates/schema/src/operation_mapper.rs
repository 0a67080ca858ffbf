//! Lifecycle to client call mapping
//!
//! Maps a Terraform lifecycle step to the REST client call actually issued
//! for a resource. Most resources map one to one; singletons and adopted
//! objects do not.

use fortios_provider_common::{ResourceDefinition, ResourceKind};

/// CRUD operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOperation {
    Create,
    Read,
    Update,
    Delete,
}

/// Where the mkey of a client call comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MkeySource {
    /// No mkey (plain create)
    None,
    /// The current resource identifier
    Identifier,
    /// The mkey attribute of the expanded payload
    Payload,
}

/// Client call issued for a lifecycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationMapping {
    pub operation: CrudOperation,
    pub mkey: MkeySource,
}

impl OperationMapping {
    fn new(operation: CrudOperation, mkey: MkeySource) -> Self {
        Self { operation, mkey }
    }
}

/// Decides which client call serves each lifecycle step
pub struct OperationMapper;

impl OperationMapper {
    /// Map a lifecycle step to a client call; `None` means no call is made
    ///
    /// # Examples
    /// ```
    /// use fortios_provider_schema::{Catalog, CrudOperation, MkeySource, OperationMapper};
    ///
    /// let settings = Catalog::builtin().get("dlp_settings").unwrap();
    /// let call = OperationMapper::map(settings, CrudOperation::Create, false).unwrap();
    /// assert_eq!(call.operation, CrudOperation::Update);
    /// assert_eq!(call.mkey, MkeySource::Identifier);
    /// ```
    pub fn map(
        def: &ResourceDefinition,
        step: CrudOperation,
        adopting: bool,
    ) -> Option<OperationMapping> {
        match step {
            CrudOperation::Create => Some(match def.kind {
                ResourceKind::Singleton => {
                    OperationMapping::new(CrudOperation::Update, MkeySource::Identifier)
                },
                ResourceKind::Table if adopting => {
                    OperationMapping::new(CrudOperation::Update, MkeySource::Payload)
                },
                ResourceKind::Table => OperationMapping::new(CrudOperation::Create, MkeySource::None),
            }),
            CrudOperation::Read => Some(OperationMapping::new(
                CrudOperation::Read,
                MkeySource::Identifier,
            )),
            CrudOperation::Update => Some(OperationMapping::new(
                CrudOperation::Update,
                MkeySource::Identifier,
            )),
            CrudOperation::Delete if adopting => None,
            CrudOperation::Delete => Some(OperationMapping::new(
                CrudOperation::Delete,
                MkeySource::Identifier,
            )),
        }
    }

    /// Whether the configured value of the adopt attribute selects adoption
    pub fn adopts(def: &ResourceDefinition, configured: Option<&str>) -> bool {
        match (&def.adopt_existing, configured) {
            (Some(rule), Some(value)) => rule.equals == value,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    #[test]
    fn test_table_maps_one_to_one() {
        let peer = Catalog::builtin().get("wanopt_peer").unwrap();
        for (step, mkey) in [
            (CrudOperation::Create, MkeySource::None),
            (CrudOperation::Read, MkeySource::Identifier),
            (CrudOperation::Update, MkeySource::Identifier),
            (CrudOperation::Delete, MkeySource::Identifier),
        ] {
            let call = OperationMapper::map(peer, step, false).unwrap();
            assert_eq!(call.operation, step);
            assert_eq!(call.mkey, mkey);
        }
    }

    #[test]
    fn test_singleton_create_is_update() {
        let filter = Catalog::builtin().get("logfortianalyzer2_filter").unwrap();
        let call = OperationMapper::map(filter, CrudOperation::Create, false).unwrap();
        assert_eq!(call.operation, CrudOperation::Update);

        let call = OperationMapper::map(filter, CrudOperation::Delete, false).unwrap();
        assert_eq!(call.operation, CrudOperation::Delete);
    }

    #[test]
    fn test_adopted_interface() {
        let interface = Catalog::builtin().get("system_interface").unwrap();
        assert!(OperationMapper::adopts(interface, Some("physical")));
        assert!(!OperationMapper::adopts(interface, Some("vlan")));
        assert!(!OperationMapper::adopts(interface, None));

        let call = OperationMapper::map(interface, CrudOperation::Create, true).unwrap();
        assert_eq!(call.operation, CrudOperation::Update);
        assert_eq!(call.mkey, MkeySource::Payload);
        assert!(OperationMapper::map(interface, CrudOperation::Delete, true).is_none());
    }

    #[test]
    fn test_adoption_needs_rule() {
        let peer = Catalog::builtin().get("wanopt_peer").unwrap();
        assert!(!OperationMapper::adopts(peer, Some("physical")));
    }
}
