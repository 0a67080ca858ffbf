//! CRUD handlers
//!
//! Every handler follows the same shape: set the client retry count, expand
//! the state into a payload, issue the client call chosen by the operation
//! mapper, record the identifier and read the object back into state.

use crate::client::{ApiPath, FortiClient, Payload};
use crate::config::ProviderConfig;
use crate::expand::expand_object;
use crate::flatten::refresh_object;
use crate::resource_data::ResourceData;
use fortios_provider_common::{ClientError, ProviderError, ResourceDefinition, Result, Verb};
use fortios_provider_schema::{CrudOperation, MkeySource, OperationMapper, OperationMapping};
use serde_json::Value;

/// Resource lifecycle handlers over a REST client
#[derive(Debug)]
pub struct Provider<C: FortiClient> {
    client: C,
    config: ProviderConfig,
}

impl<C: FortiClient> Provider<C> {
    pub fn new(client: C, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Endpoint of a resource in the configured VDOM
    pub fn api_path(&self, def: &ResourceDefinition) -> ApiPath {
        ApiPath::new(def.api_path.clone(), self.config.vdom.clone())
    }

    /// Create the object, or adopt it when it already exists on the device
    pub fn create(&mut self, def: &ResourceDefinition, data: &mut ResourceData) -> Result<()> {
        self.prepare();
        let verb = Verb::Creating;

        let payload = expand_object(def, data).map_err(|message| expand_error(verb, def, message))?;
        let path = self.api_path(def);
        let adopting = adopting(def, data);

        let mapping = OperationMapper::map(def, CrudOperation::Create, adopting)
            .unwrap_or(OperationMapping {
                operation: CrudOperation::Create,
                mkey: MkeySource::None,
            });

        let response = match mapping.operation {
            CrudOperation::Update => {
                let mkey = resolve_mkey(def, mapping.mkey, data, &payload, verb)?;
                tracing::debug!("{}: updating existing object {}", def.type_name, mkey);
                self.client.update(&path, &mkey, &payload)
            },
            _ => self.client.create(&path, &payload),
        }
        .map_err(|source| client_error(verb, def, source))?;

        set_identifier(def, data, &response);
        self.read(def, data)
    }

    /// Refresh state from the device, clearing the identifier when the object is gone
    pub fn read(&mut self, def: &ResourceDefinition, data: &mut ResourceData) -> Result<()> {
        self.prepare();
        let path = self.api_path(def);

        let response = self
            .client
            .read(&path, data.id())
            .map_err(|source| client_error(Verb::Reading, def, source))?;

        let Some(object) = response else {
            tracing::warn!("resource ({}) not found, removing from state", data.id());
            data.clear_id();
            return Ok(());
        };

        refresh_object(def, data, &object).map_err(|message| ProviderError::Refresh {
            resource: def.type_name.clone(),
            message,
        })
    }

    pub fn update(&mut self, def: &ResourceDefinition, data: &mut ResourceData) -> Result<()> {
        self.prepare();
        let verb = Verb::Updating;

        let payload = expand_object(def, data).map_err(|message| expand_error(verb, def, message))?;
        let path = self.api_path(def);
        let mkey = data.id().to_string();

        let response = self
            .client
            .update(&path, &mkey, &payload)
            .map_err(|source| client_error(verb, def, source))?;

        tracing::debug!("{}: retries {}", def.type_name, self.client.retries());
        set_identifier(def, data, &response);
        self.read(def, data)
    }

    /// Delete the object; adopted objects are only dropped from state
    pub fn delete(&mut self, def: &ResourceDefinition, data: &mut ResourceData) -> Result<()> {
        self.prepare();

        match OperationMapper::map(def, CrudOperation::Delete, adopting(def, data)) {
            Some(_) => {
                let path = self.api_path(def);
                self.client
                    .delete(&path, data.id())
                    .map_err(|source| client_error(Verb::Deleting, def, source))?;
            },
            None => tracing::debug!("{}: leaving {} in place", def.type_name, data.id()),
        }

        data.clear_id();
        Ok(())
    }

    /// Import an existing object by identifier
    ///
    /// The returned state has an empty identifier when the object does not exist.
    pub fn import(&mut self, def: &ResourceDefinition, id: &str) -> Result<ResourceData> {
        let mut data = ResourceData::for_import(id);
        self.read(def, &mut data)?;
        data.set_importing(false);
        Ok(data)
    }

    fn prepare(&mut self) {
        self.client.set_retries(self.config.retries);
        tracing::debug!("client retries set to {}", self.config.retries);
    }
}

fn adopting(def: &ResourceDefinition, data: &ResourceData) -> bool {
    let configured = def
        .adopt_existing
        .as_ref()
        .and_then(|rule| data.get_str(&rule.attribute));
    OperationMapper::adopts(def, configured)
}

fn resolve_mkey(
    def: &ResourceDefinition,
    source: MkeySource,
    data: &ResourceData,
    payload: &Payload,
    verb: Verb,
) -> Result<String> {
    match source {
        MkeySource::None => Ok(String::new()),
        MkeySource::Identifier => Ok(data.id().to_string()),
        MkeySource::Payload => {
            let field = def
                .mkey_attribute()
                .map(|a| a.api_key())
                .unwrap_or_default();
            payload
                .get(&field)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| expand_error(verb, def, format!("{} is not set", field)))
        },
    }
}

/// Use the response mkey, falling back to the type name
fn set_identifier(def: &ResourceDefinition, data: &mut ResourceData, response: &Payload) {
    match response.get("mkey") {
        Some(Value::String(mkey)) if !mkey.is_empty() => data.set_id(mkey.clone()),
        Some(Value::Number(mkey)) => data.set_id(mkey.to_string()),
        _ => data.set_id(def.type_name.clone()),
    }
}

fn expand_error(verb: Verb, def: &ResourceDefinition, message: String) -> ProviderError {
    ProviderError::Expand {
        verb,
        resource: def.type_name.clone(),
        message,
    }
}

fn client_error(verb: Verb, def: &ResourceDefinition, source: ClientError) -> ProviderError {
    ProviderError::Client {
        verb,
        resource: def.type_name.clone(),
        source,
    }
}
