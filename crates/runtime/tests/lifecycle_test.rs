//! Lifecycle tests for the CRUD handlers

use fortios_provider_common::{ClientError, ResourceDefinition};
use fortios_provider_runtime::{
    ApiPath, FortiClient, MemoryClient, Payload, Provider, ProviderConfig, ResourceData,
};
use fortios_provider_schema::Catalog;
use mockall::mock;
use mockall::predicate::*;
use serde_json::{json, Value};

mock! {
    pub Client {}

    impl FortiClient for Client {
        fn create(&mut self, path: &ApiPath, payload: &Payload) -> Result<Payload, ClientError>;
        fn read(&mut self, path: &ApiPath, mkey: &str) -> Result<Option<Payload>, ClientError>;
        fn update(&mut self, path: &ApiPath, mkey: &str, payload: &Payload) -> Result<Payload, ClientError>;
        fn delete(&mut self, path: &ApiPath, mkey: &str) -> Result<(), ClientError>;
        fn set_retries(&mut self, retries: u32);
        fn retries(&self) -> u32;
    }
}

fn def(name: &str) -> &'static ResourceDefinition {
    Catalog::builtin().get(name).unwrap()
}

fn payload(value: Value) -> Payload {
    value.as_object().unwrap().clone()
}

fn state(value: Value) -> ResourceData {
    ResourceData::from_value(value).unwrap()
}

fn mock_client() -> MockClient {
    let mut client = MockClient::new();
    client.expect_set_retries().with(eq(1)).return_const(());
    client.expect_retries().return_const(1u32);
    client
}

#[test]
fn test_create_failure_is_wrapped() {
    let mut client = mock_client();
    client.expect_create().times(1).returning(|_, _| {
        Err(ClientError::Http {
            status: 500,
            message: "internal error".to_string(),
        })
    });

    let mut provider = Provider::new(client, ProviderConfig::default());
    let mut data = state(json!({"peer_host_id": "b1"}));
    let err = provider.create(def("wanopt_peer"), &mut data).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error creating WanoptPeer resource: HTTP 500: internal error"
    );
    assert!(data.is_new());
}

#[test]
fn test_create_without_mkey_falls_back_to_type_name() {
    let mut client = mock_client();
    client
        .expect_create()
        .withf(|path, body| path.path == "wanopt/peer" && body.get("ip") == Some(&json!("10.0.0.1")))
        .times(1)
        .returning(|_, _| Ok(Payload::new()));
    client
        .expect_read()
        .withf(|_, mkey| mkey == "WanoptPeer")
        .times(1)
        .returning(|_, _| Ok(Some(payload(json!({"peer-host-id": "", "ip": "10.0.0.1"})))));

    let mut provider = Provider::new(client, ProviderConfig::default());
    let mut data = state(json!({"ip": "10.0.0.1"}));
    provider.create(def("wanopt_peer"), &mut data).unwrap();

    assert_eq!(data.id(), "WanoptPeer");
    assert_eq!(data.get("ip"), Some(&json!("10.0.0.1")));
}

#[test]
fn test_read_of_missing_object_clears_identifier() {
    let mut client = mock_client();
    client.expect_read().times(1).returning(|_, _| Ok(None));

    let mut provider = Provider::new(client, ProviderConfig::default());
    let mut data = state(json!({"peer_host_id": "gone"}));
    data.set_id("gone");
    provider.read(def("wanopt_peer"), &mut data).unwrap();

    assert!(data.is_new());
}

#[test]
fn test_read_failures() {
    let mut client = mock_client();
    client
        .expect_read()
        .times(1)
        .returning(|_, _| Err(ClientError::Transport("connection refused".to_string())));
    let mut provider = Provider::new(client, ProviderConfig::default());
    let mut data = ResourceData::for_import("b1");
    let err = provider.read(def("wanopt_peer"), &mut data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error reading WanoptPeer resource: connection refused"
    );

    let mut client = mock_client();
    client
        .expect_read()
        .times(1)
        .returning(|_, _| Ok(Some(payload(json!({"ip": true})))));
    let mut provider = Provider::new(client, ProviderConfig::default());
    let err = provider.read(def("wanopt_peer"), &mut data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error reading WanoptPeer resource from API: Error reading ip: expected a string, got bool"
    );
}

#[test]
fn test_update_uses_identifier_and_refreshes() {
    let mut client = mock_client();
    client
        .expect_update()
        .withf(|_, mkey, _| mkey == "vwp1")
        .times(1)
        .returning(|_, _, _| Ok(payload(json!({"mkey": "vwp1"}))));
    client.expect_read().times(1).returning(|_, _| {
        Ok(Some(payload(json!({
            "name": "vwp1",
            "member": [{"interface-name": "port2"}],
            "wildcard-vlan": "disable",
            "vlan-filter": "10-20"
        }))))
    });

    let mut provider = Provider::new(client, ProviderConfig::default());
    let mut data = state(json!({"name": "vwp1", "member": [{"interface_name": "port2"}]}));
    data.set_id("vwp1");
    provider.update(def("system_virtualwirepair"), &mut data).unwrap();

    assert_eq!(data.id(), "vwp1");
    assert_eq!(data.get("vlan_filter"), Some(&json!("10-20")));
    assert_eq!(data.get("member.0.interface_name"), Some(&json!("port2")));
}

#[test]
fn test_malformed_state_is_an_expand_error() {
    let client = mock_client();
    let mut provider = Provider::new(client, ProviderConfig::default());
    let mut data = state(json!({"name": "vwp1", "member": "port1"}));
    data.set_id("vwp1");

    let err = provider
        .update(def("system_virtualwirepair"), &mut data)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error updating SystemVirtualWirePair resource while getting object: member: expected a list, got string"
    );
}

#[test]
fn test_adopting_without_name_fails() {
    let client = mock_client();
    let mut provider = Provider::new(client, ProviderConfig::default());
    let mut data = state(json!({"type": "physical", "vdom": "root"}));

    let err = provider.create(def("system_interface"), &mut data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error creating SystemInterface resource while getting object: name is not set"
    );
}

#[test]
fn test_adopted_interface_is_updated_not_created() {
    let mut client = mock_client();
    client.expect_create().never();
    client
        .expect_update()
        .withf(|_, mkey, _| mkey == "port2")
        .times(1)
        .returning(|_, _, _| Ok(payload(json!({"mkey": "port2"}))));
    client
        .expect_read()
        .returning(|_, _| Ok(Some(payload(json!({"name": "port2", "type": "physical"})))));
    client.expect_delete().never();

    let mut provider = Provider::new(client, ProviderConfig::default());
    let interface = def("system_interface");
    let mut data = state(json!({"name": "port2", "type": "physical", "vdom": "root"}));
    provider.create(interface, &mut data).unwrap();
    assert_eq!(data.id(), "port2");

    provider.delete(interface, &mut data).unwrap();
    assert!(data.is_new());
}

#[test]
fn test_delete_failure_keeps_identifier() {
    let mut client = mock_client();
    client.expect_delete().times(1).returning(|_, _| {
        Err(ClientError::Http {
            status: 424,
            message: "entry is used".to_string(),
        })
    });

    let mut provider = Provider::new(client, ProviderConfig::default());
    let mut data = state(json!({"name": "dbg", "url_pattern": "/x"}));
    data.set_id("dbg");
    let err = provider.delete(def("webproxy_debugurl"), &mut data).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error deleting WebProxyDebugUrl resource: HTTP 424: entry is used"
    );
    assert_eq!(data.id(), "dbg");
}

#[test]
fn test_singleton_create_is_update() {
    let mut client = mock_client();
    client.expect_create().never();
    client
        .expect_update()
        .withf(|path, mkey, body| {
            path.path == "log.fortianalyzer2/filter" && mkey.is_empty() && !body.is_empty()
        })
        .times(1)
        .returning(|_, _, _| Ok(Payload::new()));
    client
        .expect_read()
        .withf(|_, mkey| mkey == "LogFortianalyzer2Filter")
        .returning(|_, _| Ok(Some(payload(json!({"severity": "information"})))));

    let mut provider = Provider::new(client, ProviderConfig::default());
    let filter = def("logfortianalyzer2_filter");
    let mut data = state(json!({"severity": "information"}));
    provider.create(filter, &mut data).unwrap();

    assert_eq!(data.id(), filter.type_name);
}

#[test]
fn test_retries_set_before_every_call() {
    let mut client = MockClient::new();
    client.expect_set_retries().with(eq(3)).times(2).return_const(());
    client.expect_retries().return_const(3u32);
    client.expect_delete().times(1).returning(|_, _| Ok(()));
    client.expect_read().times(1).returning(|_, _| Ok(None));

    let config = ProviderConfig {
        retries: 3,
        ..ProviderConfig::default()
    };
    let mut provider = Provider::new(client, config);
    let peer = def("wanopt_peer");
    let mut data = ResourceData::for_import("b1");
    provider.delete(peer, &mut data).unwrap();
    provider.read(peer, &mut data).unwrap();
}

#[test]
fn test_deleted_object_reads_as_absent() {
    let catalog = Catalog::builtin();
    let mut provider = Provider::new(MemoryClient::from_catalog(catalog), ProviderConfig::default());

    for name in catalog.names() {
        let def = catalog.get(name).unwrap();
        let mut config = serde_json::Map::new();
        if let Some(mkey) = def.mkey_attribute() {
            config.insert(mkey.name.clone(), json!("obj1"));
        }
        for attr in def.attributes.iter().filter(|a| a.required) {
            if attr.attr_type.is_nested() {
                config.insert(attr.name.clone(), json!([{}]));
            } else {
                config.entry(attr.name.clone()).or_insert(json!("x"));
            }
        }

        let mut data = ResourceData::new(config);
        provider.create(def, &mut data).unwrap();
        let id = data.id().to_string();
        assert!(!id.is_empty(), "{}", name);

        provider.delete(def, &mut data).unwrap();
        assert!(data.is_new());

        let mut again = ResourceData::for_import(id);
        provider.read(def, &mut again).unwrap();
        assert!(again.is_new(), "{} still present after delete", name);
    }
}
