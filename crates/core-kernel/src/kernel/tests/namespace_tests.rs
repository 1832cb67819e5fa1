use crate::kernel::error::Error;
use crate::kernel::namespace::Namespace;

#[test]
fn test_namespace_derivation() {
    let namespace = Namespace::derive("ark", "mainnet").unwrap();
    assert_eq!(namespace.name(), "ark-mainnet");
    assert_eq!(namespace.dir_prefix(), "ark/mainnet");
    assert_eq!(namespace.to_string(), "ark-mainnet");
    assert_eq!(namespace.token(), "ark");
    assert_eq!(namespace.network(), "mainnet");
}

#[test]
fn test_namespace_keeps_parts_verbatim() {
    let namespace = Namespace::derive("my-token", "dev net").unwrap();
    assert_eq!(namespace.name(), "my-token-dev net");
    assert_eq!(namespace.dir_prefix(), "my-token/dev net");
}

#[test]
fn test_namespace_requires_token_and_network() {
    for (token, network) in [("", "mainnet"), ("ark", ""), ("", "")] {
        match Namespace::derive(token, network) {
            Err(Error::FailedNetworkDetection { .. }) => {}
            other => panic!("Expected FailedNetworkDetection for ({token:?}, {network:?}), got {other:?}"),
        }
    }
}
