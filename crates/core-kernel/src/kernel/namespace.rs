use std::fmt;

use crate::kernel::error::{Error, Result};

/// Deployment identity derived from the token and the network name.
///
/// `name()` is `token-network` and scopes per-deployment state;
/// `dir_prefix()` is `token/network`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    token: String,
    network: String,
}

impl Namespace {
    /// Derive the namespace. Both parts must be non-empty.
    pub fn derive(token: &str, network: &str) -> Result<Self> {
        if token.is_empty() || network.is_empty() {
            return Err(Error::FailedNetworkDetection {
                reason: format!(
                    "token and network must both be set (token: '{}', network: '{}')",
                    token, network
                ),
            });
        }
        Ok(Self {
            token: token.to_string(),
            network: network.to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn name(&self) -> String {
        format!("{}-{}", self.token, self.network)
    }

    pub fn dir_prefix(&self) -> String {
        format!("{}/{}", self.token, self.network)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.token, self.network)
    }
}
