use serde_json::json;

use crate::config::error::ConfigError;
use crate::config::repository::ConfigRepository;

#[test]
fn test_get_dotted_paths() {
    let repo = ConfigRepository::new(json!({
        "network": { "name": "testnet", "pubKeyHash": 23 },
        "peers": { "list": [ { "ip": "127.0.0.1", "port": 4002 } ] }
    }));

    assert_eq!(repo.get("network.name"), Some(json!("testnet")));
    assert_eq!(repo.get_as::<u8>("network.pubKeyHash"), Some(23));
    assert_eq!(repo.get_as::<String>("peers.list.0.ip"), Some("127.0.0.1".to_string()));
    assert_eq!(repo.get("").map(|v| v.is_object()), Some(true));
}

#[test]
fn test_unknown_keys_read_as_none() {
    let repo = ConfigRepository::new(json!({ "network": { "name": "testnet" } }));

    assert_eq!(repo.get("network.nethash"), None);
    assert_eq!(repo.get("network.name.length"), None);
    assert_eq!(repo.get_as::<u32>("network.name"), None);
    assert!(!repo.has("missing"));
    assert_eq!(repo.get_or("missing", 5u32), 5);
}

#[test]
fn test_set_creates_intermediate_objects() -> Result<(), ConfigError> {
    let repo = ConfigRepository::default();
    repo.set("api.server.port", 4003)?;
    repo.set("api.enabled", true)?;

    assert_eq!(repo.all(), json!({ "api": { "server": { "port": 4003 }, "enabled": true } }));
    Ok(())
}

#[test]
fn test_set_last_writer_wins_and_replaces_scalars() -> Result<(), ConfigError> {
    let repo = ConfigRepository::new(json!({ "api": "disabled" }));
    repo.set("api.port", 4003)?;
    repo.set("api.port", 4004)?;

    assert_eq!(repo.get("api"), Some(json!({ "port": 4004 })));
    Ok(())
}

#[test]
fn test_non_object_root_is_replaced() {
    let repo = ConfigRepository::new(json!([1, 2, 3]));
    assert_eq!(repo.all(), json!({}));
}

#[test]
fn test_unset_removes_value() {
    let repo = ConfigRepository::new(json!({ "a": { "b": 1, "c": 2 } }));

    assert_eq!(repo.unset("a.b"), Some(json!(1)));
    assert_eq!(repo.unset("a.b"), None);
    assert_eq!(repo.unset("x.y"), None);
    assert_eq!(repo.all(), json!({ "a": { "c": 2 } }));
}

#[test]
fn test_merge_is_deep() {
    let repo = ConfigRepository::new(json!({
        "peers": { "minimumVersions": [">=2.0.0"], "list": [] }
    }));
    repo.merge("peers", json!({ "list": [ { "ip": "10.0.0.1" } ], "maxPeers": 10 }));

    assert_eq!(repo.get("peers.minimumVersions"), Some(json!([">=2.0.0"])));
    assert_eq!(repo.get_as::<u32>("peers.maxPeers"), Some(10));
    assert_eq!(repo.get_as::<String>("peers.list.0.ip"), Some("10.0.0.1".to_string()));
}

#[test]
fn test_clones_share_tree() -> Result<(), ConfigError> {
    let repo = ConfigRepository::default();
    let handle = repo.clone();
    handle.set("env", "production")?;

    assert_eq!(repo.get_as::<String>("env"), Some("production".to_string()));
    Ok(())
}
