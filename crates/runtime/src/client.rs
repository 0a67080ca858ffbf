//! REST client contract
//!
//! The provider never talks HTTP itself. Each call names a CMDB path such as
//! `system/interface` and exchanges JSON objects keyed by hyphenated REST
//! field names.

use fortios_provider_common::ClientError;
use serde_json::{Map, Value};
use std::fmt;

/// JSON object exchanged with the device
pub type Payload = Map<String, Value>;

/// CMDB endpoint of a resource, optionally scoped to a VDOM
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath {
    pub path: String,
    pub vdom: Option<String>,
}

impl ApiPath {
    pub fn new(path: impl Into<String>, vdom: Option<String>) -> Self {
        Self {
            path: path.into(),
            vdom,
        }
    }

    /// URL path relative to the device, as the REST API addresses it
    pub fn url(&self, mkey: Option<&str>) -> String {
        let mut url = format!("/api/v2/cmdb/{}", self.path);
        if let Some(mkey) = mkey.filter(|m| !m.is_empty()) {
            url.push('/');
            url.push_str(mkey);
        }
        if let Some(vdom) = &self.vdom {
            url.push_str("?vdom=");
            url.push_str(vdom);
        }
        url
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.vdom {
            Some(vdom) => write!(f, "{} (vdom {})", self.path, vdom),
            None => write!(f, "{}", self.path),
        }
    }
}

/// Operations a FortiOS REST client offers
///
/// `create` and `update` may return an `mkey` in their response. `read`
/// returns `None` when the object does not exist.
pub trait FortiClient {
    fn create(&mut self, path: &ApiPath, payload: &Payload) -> Result<Payload, ClientError>;

    fn read(&mut self, path: &ApiPath, mkey: &str) -> Result<Option<Payload>, ClientError>;

    fn update(
        &mut self,
        path: &ApiPath,
        mkey: &str,
        payload: &Payload,
    ) -> Result<Payload, ClientError>;

    fn delete(&mut self, path: &ApiPath, mkey: &str) -> Result<(), ClientError>;

    fn set_retries(&mut self, retries: u32);

    fn retries(&self) -> u32;
}
