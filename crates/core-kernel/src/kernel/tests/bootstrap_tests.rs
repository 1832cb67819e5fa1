use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::{ConfigError, ConfigLoader, ConfigRepository};
use crate::event::{EventKind, EventResult, SharedEventDispatcher, sync_event_handler};
use crate::kernel::bootstrap::{Application, KernelState};
use crate::kernel::constants::keys;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::kernel::paths::PathKind;
use crate::services::{CacheFactory, LoggerFactory, QueueFactory};
use crate::test_support::{RecordingProvider, TestPaths, journal, test_config};

#[tokio::test]
async fn test_bootstrap_binds_identity_and_paths() {
    let paths = TestPaths::new();
    let mut app = paths.application();
    assert_eq!(app.state(), KernelState::Uninitialized);

    app.bootstrap(test_config()).await.unwrap();

    assert_eq!(app.state(), KernelState::Booted);
    assert!(app.is_bootstrapped());
    assert!(app.is_booted());

    assert_eq!(app.env().unwrap(), "test");
    assert_eq!(app.token().unwrap(), "ark");
    assert_eq!(app.network().unwrap(), "unitnet");
    assert_eq!(app.version().unwrap(), "3.0.0");
    assert_eq!(app.namespace().unwrap(), "ark-unitnet");
    assert_eq!(app.dir_prefix().unwrap(), "ark/unitnet");

    for kind in PathKind::ALL {
        assert_eq!(app.path(kind).unwrap(), paths.dir(kind));
        let bound: PathBuf = app.resolve(&kind.binding_key()).unwrap();
        assert_eq!(bound, paths.dir(kind));
    }

    assert!(app.resolve::<LoggerFactory>(keys::LOGGER_FACTORY).unwrap().has("log"));
    assert!(app.resolve::<CacheFactory>(keys::CACHE_FACTORY).is_ok());
    assert!(app.resolve::<QueueFactory>(keys::QUEUE_FACTORY).is_ok());
    assert!(app.log().is_ok());
    assert!(app.events().is_ok());
    assert_eq!(
        app.config().unwrap().get_as::<String>("network"),
        Some("unitnet".to_string())
    );
}

#[tokio::test]
async fn test_bootstrap_mirrors_identity_into_environment() {
    let paths = TestPaths::new();
    let mut app = paths.application();
    app.bootstrap(test_config()).await.unwrap();

    let environment = app.environment();
    assert_eq!(environment.get("CORE_ENV").as_deref(), Some("test"));
    assert_eq!(environment.get("NODE_ENV").as_deref(), Some("test"));
    assert_eq!(environment.get("CORE_TOKEN").as_deref(), Some("ark"));
    assert_eq!(environment.get("CORE_NETWORK_NAME").as_deref(), Some("unitnet"));
    assert_eq!(environment.get("CORE_VERSION").as_deref(), Some("3.0.0"));
    assert_eq!(
        environment.get("CORE_PATH_DATA"),
        Some(paths.dir(PathKind::Data).to_string_lossy().to_string())
    );
}

#[tokio::test]
async fn test_second_bootstrap_is_rejected() {
    let paths = TestPaths::new();
    let mut app = paths.application();
    app.bootstrap(test_config()).await.unwrap();

    match app.bootstrap(test_config()).await {
        Err(Error::KernelLifecycleError { phase, .. }) => {
            assert_eq!(phase, KernelLifecyclePhase::Bootstrap)
        }
        other => panic!("Expected KernelLifecycleError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_network_aborts_before_providers() {
    let paths = TestPaths::new();
    let journal = journal();
    let mut app = paths.application();
    app.provider(RecordingProvider::new("database", &journal).shared());

    let mut config = test_config();
    config.network = String::new();
    let err = app.bootstrap(config).await.unwrap_err();

    assert!(matches!(err, Error::FailedNetworkDetection { .. }));
    assert!(journal.lock().is_empty(), "No provider hook may run");
    assert!(!app.is_bootstrapped());
    assert!(!app.environment().contains("CORE_NETWORK_NAME"));
}

#[tokio::test]
async fn test_missing_override_directory_aborts_bootstrap() {
    let paths = TestPaths::new();
    let environment = paths.environment();
    let missing = paths.root().join("gone");
    environment.set("CORE_PATH_LOG", &missing.to_string_lossy());
    let mut app = Application::with_environment(environment);

    match app.bootstrap(test_config()).await {
        Err(Error::DirectoryNotFound { path }) => assert_eq!(path, missing),
        other => panic!("Expected DirectoryNotFound, got {other:?}"),
    }
    assert!(!app.is_booted());
}

#[tokio::test]
async fn test_unknown_config_loader_fails() {
    let paths = TestPaths::new();
    let mut app = paths.application();

    let err = app
        .bootstrap(test_config().with_config_loader("network"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::UnknownLoader { ref name }) if name == "network"
    ));
}

#[tokio::test]
async fn test_local_loader_reads_config_directory() {
    let paths = TestPaths::new();
    std::fs::write(
        paths.dir(PathKind::Config).join("peers.json"),
        r#"{"list": [{"ip": "127.0.0.1", "port": 4000}]}"#,
    )
    .unwrap();
    let mut app = paths.application();
    app.bootstrap(test_config()).await.unwrap();

    let config = app.config().unwrap();
    assert_eq!(config.get_as::<String>("peers.list.0.ip"), Some("127.0.0.1".to_string()));
    assert_eq!(config.get_as::<u16>("peers.list.0.port"), Some(4000));
}

#[tokio::test]
async fn test_unparsable_config_file_aborts_bootstrap() {
    let paths = TestPaths::new();
    std::fs::write(paths.dir(PathKind::Config).join("app.json"), "{ not json").unwrap();
    let mut app = paths.application();

    let err = app.bootstrap(test_config()).await.unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Deserialization { .. })));
}

#[tokio::test]
async fn test_env_file_sets_only_missing_variables() {
    let paths = TestPaths::new();
    std::fs::write(
        paths.dir(PathKind::Config).join(".env"),
        "# node settings\nCORE_DB_HOST=localhost\nexport CORE_DB_PORT=\"5432\"\nCORE_TOKEN=other\n",
    )
    .unwrap();
    let mut app = paths.application();
    app.bootstrap(test_config()).await.unwrap();

    let environment = app.environment();
    assert_eq!(environment.get("CORE_DB_HOST").as_deref(), Some("localhost"));
    assert_eq!(environment.get("CORE_DB_PORT").as_deref(), Some("5432"));
    assert_eq!(environment.get("CORE_TOKEN").as_deref(), Some("ark"));
}

#[tokio::test]
async fn test_configured_network_must_match() {
    let paths = TestPaths::new();
    std::fs::write(
        paths.dir(PathKind::Config).join("network.json"),
        r#"{"name": "devnet"}"#,
    )
    .unwrap();
    let journal = journal();
    let mut app = paths.application();
    app.provider(RecordingProvider::new("database", &journal).shared());

    let err = app.bootstrap(test_config()).await.unwrap_err();
    assert!(matches!(err, Error::FailedNetworkDetection { .. }));
    assert!(journal.lock().is_empty());
}

#[tokio::test]
async fn test_inherited_network_must_match() {
    let paths = TestPaths::new();
    let environment = paths.environment();
    environment.set("CORE_NETWORK_NAME", "mainnet");
    let journal = journal();
    let mut app = Application::with_environment(environment);
    app.provider(RecordingProvider::new("database", &journal).shared());

    match app.bootstrap(test_config()).await {
        Err(Error::FailedNetworkDetection { reason }) => assert!(reason.contains("mainnet")),
        other => panic!("Expected FailedNetworkDetection, got {other:?}"),
    }
    assert!(journal.lock().is_empty());
    assert_eq!(app.inherited_network(), Some("mainnet"));
}

#[tokio::test]
async fn test_inherited_network_that_agrees_is_accepted() {
    let paths = TestPaths::new();
    let environment = paths.environment();
    environment.set("CORE_NETWORK_NAME", "unitnet");
    let mut app = Application::with_environment(environment);

    app.bootstrap(test_config()).await.unwrap();
    assert_eq!(app.inherited_network(), Some("unitnet"));
    assert_eq!(app.network().unwrap(), "unitnet");
}

#[tokio::test]
async fn test_accessors_fail_before_bootstrap() {
    let app = Application::with_environment(crate::kernel::environment::Environment::isolated(
        Vec::<(String, String)>::new(),
    ));

    assert!(app.log().err().unwrap().is_binding_not_found());
    assert!(app.events().unwrap_err().is_binding_not_found());
    assert!(app.blockchain::<Arc<String>>().unwrap_err().is_binding_not_found());
    assert!(app.p2p::<Arc<String>>().unwrap_err().is_binding_not_found());
    assert!(app.transaction_pool::<Arc<String>>().unwrap_err().is_binding_not_found());
    assert!(app.data_path().unwrap_err().is_binding_not_found());
}

#[tokio::test]
async fn test_external_services_resolve_by_key() {
    let paths = TestPaths::new();
    let mut app = paths.application();
    app.bootstrap(test_config()).await.unwrap();

    app.bind(keys::BLOCKCHAIN, Arc::new("chain".to_string()));
    assert_eq!(app.blockchain::<Arc<String>>().unwrap().as_str(), "chain");
    assert!(matches!(
        app.p2p::<Arc<String>>(),
        Err(Error::BindingNotFound { ref key }) if key == "p2p"
    ));
}

#[tokio::test]
async fn test_pipeline_events_in_step_order() {
    let paths = TestPaths::new();
    let journal = journal();
    let mut app = paths.application();
    app.provider(RecordingProvider::new("database", &journal).shared());

    let dispatcher = SharedEventDispatcher::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    dispatcher
        .listen_any(sync_event_handler(move |event| {
            seen_clone.lock().push(event.name());
            Ok(EventResult::Continue)
        }))
        .await;
    app.bind(keys::EVENT_DISPATCHER, dispatcher);

    app.bootstrap(test_config()).await.unwrap();

    let expected = vec![
        "bootstrapping: LoadEnvironmentVariables",
        "bootstrapped: LoadEnvironmentVariables",
        "bootstrapping: LoadConfiguration",
        "bootstrapped: LoadConfiguration",
        "bootstrapping: ValidateNetwork",
        "bootstrapped: ValidateNetwork",
        "bootstrapping: RegisterServiceProviders",
        "provider.registered",
        "bootstrapped: RegisterServiceProviders",
        "bootstrapping: BootServiceProviders",
        "provider.booted",
        "bootstrapped: BootServiceProviders",
    ];
    assert_eq!(*seen.lock(), expected);
}

#[tokio::test]
async fn test_failing_listener_aborts_before_step_runs() {
    let paths = TestPaths::new();
    let journal = journal();
    let mut app = paths.application();
    app.provider(RecordingProvider::new("database", &journal).shared());

    let dispatcher = SharedEventDispatcher::new();
    dispatcher
        .listen(
            EventKind::Bootstrapping,
            sync_event_handler(|event| {
                if event.bootstrapper() == Some("RegisterServiceProviders") {
                    return Err(Error::Other("not today".to_string()));
                }
                Ok(EventResult::Continue)
            }),
        )
        .await;
    app.bind(keys::EVENT_DISPATCHER, dispatcher);

    let err = app.bootstrap(test_config()).await.unwrap_err();
    assert!(matches!(err, Error::EventSystem(_)));
    assert!(journal.lock().is_empty(), "RegisterServiceProviders must not run");
    assert!(!app.is_booted());
}

struct StaticLoader;

#[async_trait]
impl ConfigLoader for StaticLoader {
    fn name(&self) -> &str {
        "static"
    }

    async fn load(&self, _app: &Application, repository: &ConfigRepository) -> Result<()> {
        repository.set("api.port", 4003)?;
        Ok(())
    }
}

#[tokio::test]
async fn test_custom_config_loader() {
    let paths = TestPaths::new();
    let mut app = paths.application();
    app.config_factory_mut()
        .extend("static", || Arc::new(StaticLoader));

    app.bootstrap(test_config().with_config_loader("static"))
        .await
        .unwrap();
    assert_eq!(app.config().unwrap().get_as::<u16>("api.port"), Some(4003));
}
