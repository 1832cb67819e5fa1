/// Application name, used as the default log target
pub const APP_NAME: &str = "core";

/// Suffix appended to the token when computing default directories (`<token>-core`)
pub const PATH_SUFFIX: &str = "core";

/// Config loader used when the initial configuration does not name one
pub const DEFAULT_CONFIG_LOADER: &str = "local";

/// Logger driver constructed during bootstrap
pub const DEFAULT_LOGGER_DRIVER: &str = "log";

/// File name of the maintenance flag inside the temp directory
pub const MAINTENANCE_FLAG: &str = "maintenance";

/// Environment file read from the config directory
pub const ENV_FILE: &str = ".env";

/// Environment variables written during bootstrap
pub mod env {
    pub const CORE_ENV: &str = "CORE_ENV";
    pub const NODE_ENV: &str = "NODE_ENV";
    pub const CORE_TOKEN: &str = "CORE_TOKEN";
    pub const CORE_NETWORK_NAME: &str = "CORE_NETWORK_NAME";
    pub const CORE_VERSION: &str = "CORE_VERSION";
    /// Prefix of the per-kind path overrides (`CORE_PATH_DATA`, ...)
    pub const CORE_PATH_PREFIX: &str = "CORE_PATH_";
}

/// Well-known binding keys
pub mod keys {
    pub const LOG: &str = "log";
    pub const EVENT_DISPATCHER: &str = "event-dispatcher";
    pub const BLOCKCHAIN: &str = "blockchain";
    pub const P2P: &str = "p2p";
    pub const TRANSACTION_POOL: &str = "transactionPool";
    pub const CONFIG: &str = "config";
    pub const CONFIG_LOADER: &str = "config.loader";

    pub const APP_ENV: &str = "app.env";
    pub const APP_TOKEN: &str = "app.token";
    pub const APP_NETWORK: &str = "app.network";
    pub const APP_VERSION: &str = "app.version";
    pub const APP_NAMESPACE: &str = "app.namespace";
    pub const APP_DIR_PREFIX: &str = "app.dir_prefix";

    pub const LOGGER_FACTORY: &str = "factory.logger";
    pub const CACHE_FACTORY: &str = "factory.cache";
    pub const QUEUE_FACTORY: &str = "factory.queue";

    /// Prefix of the resolved path bindings (`path.data`, ...)
    pub const PATH_PREFIX: &str = "path.";
}
