//! Field mapping and CRUD handlers for FortiOS resources
//!
//! The runtime is driven entirely by the schema IR: the same generic code
//! expands Terraform state into REST payloads, flattens REST responses back
//! into state and routes lifecycle calls to a [`FortiClient`].
//!
//! ```
//! use fortios_provider_runtime::{MemoryClient, Provider, ProviderConfig, ResourceData};
//! use fortios_provider_schema::Catalog;
//! use serde_json::json;
//!
//! let catalog = Catalog::builtin();
//! let mut provider = Provider::new(MemoryClient::from_catalog(catalog), ProviderConfig::default());
//!
//! let peer = catalog.get("fortios_wanopt_peer").unwrap();
//! let mut data = ResourceData::from_value(json!({"peer_host_id": "hq", "ip": "10.0.0.1"})).unwrap();
//! provider.create(peer, &mut data).unwrap();
//! assert_eq!(data.id(), "hq");
//!
//! provider.delete(peer, &mut data).unwrap();
//! provider.read(peer, &mut data).unwrap();
//! assert!(data.is_new());
//! ```

mod client;
mod config;
mod expand;
mod flatten;
mod memory;
mod plan;
mod provider;
mod resource_data;
mod validate;

pub use client::{ApiPath, FortiClient, Payload};
pub use config::{
    ConfigError, ProviderConfig, ENV_CABUNDLE, ENV_HOSTNAME, ENV_INSECURE, ENV_TOKEN, ENV_VDOM,
};
pub use expand::expand_object;
pub use flatten::{ip_mask_to_cidr, refresh_object};
pub use memory::MemoryClient;
pub use plan::{plan, Plan};
pub use provider::Provider;
pub use resource_data::{is_set, ResourceData};
pub use validate::validate;
