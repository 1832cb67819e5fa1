use std::sync::Arc;

use crate::bootstrappers::{BootstrapPipeline, Bootstrapper, KERNEL_BOOTSTRAPPERS, KernelBootstrapper};
use crate::event::{EventResult, SharedEventDispatcher, sync_event_handler};
use crate::kernel::constants::keys;
use crate::kernel::error::Error;
use crate::test_support::TestPaths;

#[test]
fn test_kernel_bootstrapper_order() {
    let ordinals: Vec<u8> = KERNEL_BOOTSTRAPPERS.iter().map(|step| step.ordinal()).collect();
    assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
    assert_eq!(
        BootstrapPipeline::kernel().names(),
        vec![
            "LoadEnvironmentVariables",
            "LoadConfiguration",
            "ValidateNetwork",
            "RegisterServiceProviders",
            "BootServiceProviders",
        ]
    );
    assert_eq!(KernelBootstrapper::ValidateNetwork.to_string(), "3. ValidateNetwork");
}

#[test]
fn test_instantiated_names_match_enum() {
    for step in KERNEL_BOOTSTRAPPERS {
        assert_eq!(step.instantiate().name(), step.name());
    }
}

#[test]
fn test_only_provider_steps_repeat() {
    let repeated: Vec<&'static str> = KERNEL_BOOTSTRAPPERS
        .iter()
        .map(|step| step.instantiate())
        .filter(|step| !step.runs_once())
        .map(|step| step.name())
        .collect();
    assert_eq!(repeated, vec!["RegisterServiceProviders", "BootServiceProviders"]);
}

#[tokio::test]
async fn test_empty_pipeline_still_needs_dispatcher() {
    let paths = TestPaths::new();
    let app = paths.application();
    let pipeline = BootstrapPipeline::with_bootstrappers(Vec::new());
    assert!(pipeline.is_empty());

    let err = pipeline.run(&app).await.unwrap_err();
    assert!(err.is_binding_not_found());

    app.bind(keys::EVENT_DISPATCHER, SharedEventDispatcher::new());
    pipeline.run(&app).await.unwrap();
}

#[tokio::test]
async fn test_listener_error_surfaces_from_run() {
    let paths = TestPaths::new();
    let app = paths.application();
    let dispatcher = SharedEventDispatcher::new();
    dispatcher
        .listen_any(sync_event_handler(|_event| Err(Error::Other("halt".to_string()))))
        .await;
    app.bind(keys::EVENT_DISPATCHER, dispatcher);

    let steps: Vec<Arc<dyn Bootstrapper>> = vec![KernelBootstrapper::BootServiceProviders.instantiate()];
    let pipeline = BootstrapPipeline::with_bootstrappers(steps);
    assert_eq!(pipeline.len(), 1);

    let err = pipeline.run(&app).await.unwrap_err();
    assert!(matches!(err, Error::EventSystem(_)));
}

#[tokio::test]
async fn test_rerun_skips_one_time_steps() {
    let paths = TestPaths::new();
    let app = paths.application();
    let dispatcher = SharedEventDispatcher::new();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    dispatcher
        .listen(
            crate::event::EventKind::Bootstrapping,
            sync_event_handler(move |event| {
                seen_clone.lock().extend(event.bootstrapper());
                Ok(EventResult::Continue)
            }),
        )
        .await;
    app.bind(keys::EVENT_DISPATCHER, dispatcher);

    // No providers are declared, so the provider steps succeed on a bare application
    BootstrapPipeline::kernel().rerun(&app).await.unwrap();
    assert_eq!(
        *seen.lock(),
        vec!["RegisterServiceProviders", "BootServiceProviders"]
    );
}
