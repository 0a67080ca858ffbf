//! In-process FortiOS configuration store
//!
//! Behaves like the CMDB for the resources of a catalog: tables are keyed by
//! their mkey field, singletons hold one object per VDOM. Objects that the
//! device ships with, such as physical ports, can be seeded up front.

use crate::client::{ApiPath, FortiClient, Payload};
use fortios_provider_common::{ClientError, ResourceKind};
use fortios_provider_schema::Catalog;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

const DEFAULT_VDOM: &str = "root";

#[derive(Debug, Clone)]
struct Endpoint {
    kind: ResourceKind,
    /// REST key of the mkey field
    mkey: Option<String>,
}

type ObjectKey = (String, String, String);

/// Client that keeps objects in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    endpoints: HashMap<String, Endpoint>,
    objects: BTreeMap<ObjectKey, Payload>,
    retries: u32,
}

impl MemoryClient {
    /// Serve every resource of a catalog
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let endpoints = catalog
            .iter()
            .map(|def| {
                let mkey = def.mkey_attribute().map(|a| a.api_key());
                (
                    def.api_path.clone(),
                    Endpoint {
                        kind: def.kind,
                        mkey,
                    },
                )
            })
            .collect();

        Self {
            endpoints,
            objects: BTreeMap::new(),
            retries: 0,
        }
    }

    /// Store an object as if it had always existed on the device
    pub fn seed(&mut self, path: &ApiPath, object: Payload) -> Result<(), ClientError> {
        let endpoint = self.endpoint(path)?;
        let mkey = match endpoint.kind {
            ResourceKind::Singleton => String::new(),
            ResourceKind::Table => {
                mkey_of(endpoint, &object).ok_or_else(|| bad_request("mkey is required"))?
            },
        };
        self.objects.insert(key(path, &mkey), object);
        Ok(())
    }

    /// Number of stored objects across all paths
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn endpoint(&self, path: &ApiPath) -> Result<&Endpoint, ClientError> {
        self.endpoints.get(&path.path).ok_or_else(|| ClientError::Http {
            status: 404,
            message: format!("unknown path {}", path.path),
        })
    }

    /// Storage key of an object: singletons ignore the mkey
    fn object_key(&self, path: &ApiPath, mkey: &str) -> Result<ObjectKey, ClientError> {
        Ok(match self.endpoint(path)?.kind {
            ResourceKind::Singleton => key(path, ""),
            ResourceKind::Table => key(path, mkey),
        })
    }
}

impl FortiClient for MemoryClient {
    fn create(&mut self, path: &ApiPath, payload: &Payload) -> Result<Payload, ClientError> {
        tracing::debug!("POST {}", path.url(None));
        let endpoint = self.endpoint(path)?;

        let mkey = match endpoint.kind {
            ResourceKind::Singleton => {
                return Err(ClientError::Http {
                    status: 405,
                    message: format!("{} does not support create", path.path),
                })
            },
            ResourceKind::Table => {
                mkey_of(endpoint, payload).ok_or_else(|| bad_request("mkey is required"))?
            },
        };

        let object_key = key(path, &mkey);
        if self.objects.contains_key(&object_key) {
            return Err(already_exists(&mkey));
        }
        self.objects.insert(object_key, payload.clone());

        Ok(mkey_response(&mkey))
    }

    fn read(&mut self, path: &ApiPath, mkey: &str) -> Result<Option<Payload>, ClientError> {
        tracing::debug!("GET {}", path.url(Some(mkey)));
        let object_key = self.object_key(path, mkey)?;
        Ok(self.objects.get(&object_key).cloned())
    }

    fn update(
        &mut self,
        path: &ApiPath,
        mkey: &str,
        payload: &Payload,
    ) -> Result<Payload, ClientError> {
        tracing::debug!("PUT {}", path.url(Some(mkey)));
        let endpoint = self.endpoint(path)?.clone();
        let object_key = self.object_key(path, mkey)?;

        match endpoint.kind {
            ResourceKind::Singleton => {
                let object = self.objects.entry(object_key).or_default();
                merge(object, payload);
                Ok(Payload::new())
            },
            ResourceKind::Table => {
                let mut object = self
                    .objects
                    .get(&object_key)
                    .cloned()
                    .ok_or_else(|| not_found(mkey))?;
                merge(&mut object, payload);
                let new_mkey = mkey_of(&endpoint, &object).unwrap_or_else(|| mkey.to_string());
                let new_key = key(path, &new_mkey);
                if new_key != object_key && self.objects.contains_key(&new_key) {
                    return Err(already_exists(&new_mkey));
                }
                self.objects.remove(&object_key);
                self.objects.insert(new_key, object);
                Ok(mkey_response(&new_mkey))
            },
        }
    }

    fn delete(&mut self, path: &ApiPath, mkey: &str) -> Result<(), ClientError> {
        tracing::debug!("DELETE {}", path.url(Some(mkey)));
        let kind = self.endpoint(path)?.kind;
        let object_key = self.object_key(path, mkey)?;

        match (self.objects.remove(&object_key), kind) {
            (Some(_), _) | (None, ResourceKind::Singleton) => Ok(()),
            (None, ResourceKind::Table) => Err(not_found(mkey)),
        }
    }

    fn set_retries(&mut self, retries: u32) {
        self.retries = retries;
    }

    fn retries(&self) -> u32 {
        self.retries
    }
}

fn key(path: &ApiPath, mkey: &str) -> ObjectKey {
    (
        path.vdom.clone().unwrap_or_else(|| DEFAULT_VDOM.to_string()),
        path.path.clone(),
        mkey.to_string(),
    )
}

fn mkey_of(endpoint: &Endpoint, object: &Payload) -> Option<String> {
    let field = endpoint.mkey.as_deref()?;
    match object.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn mkey_response(mkey: &str) -> Payload {
    let mut response = Payload::new();
    response.insert("mkey".to_string(), Value::String(mkey.to_string()));
    response
}

fn merge(object: &mut Payload, payload: &Payload) {
    for (k, v) in payload {
        object.insert(k.clone(), v.clone());
    }
}

fn already_exists(mkey: &str) -> ClientError {
    ClientError::Http {
        status: 500,
        message: format!("entry '{}' already exists", mkey),
    }
}

fn not_found(mkey: &str) -> ClientError {
    ClientError::Http {
        status: 404,
        message: format!("entry '{}' not found", mkey),
    }
}

fn bad_request(message: &str) -> ClientError {
    ClientError::Http {
        status: 400,
        message: message.to_string(),
    }
}
