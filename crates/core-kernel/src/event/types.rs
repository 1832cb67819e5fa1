use std::fmt;

use crate::provider_system::ProviderState;

/// Events published by the kernel during its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelEvent {
    /// A bootstrapper is about to run
    Bootstrapping { bootstrapper: &'static str },
    /// A bootstrapper finished
    Bootstrapped { bootstrapper: &'static str },
    /// Maintenance mode was switched on or off
    Maintenance { enabled: bool },
    /// A service provider changed state
    ProviderStateChanged { provider: String, state: ProviderState },
}

/// Listener routing key, one per [`KernelEvent`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Bootstrapping,
    Bootstrapped,
    Maintenance,
    ProviderStateChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Bootstrapping,
        EventKind::Bootstrapped,
        EventKind::Maintenance,
        EventKind::ProviderStateChanged,
    ];
}

impl KernelEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            KernelEvent::Bootstrapping { .. } => EventKind::Bootstrapping,
            KernelEvent::Bootstrapped { .. } => EventKind::Bootstrapped,
            KernelEvent::Maintenance { .. } => EventKind::Maintenance,
            KernelEvent::ProviderStateChanged { .. } => EventKind::ProviderStateChanged,
        }
    }

    /// String form of the event, as written to logs
    pub fn name(&self) -> String {
        match self {
            KernelEvent::Bootstrapping { bootstrapper } => format!("bootstrapping: {}", bootstrapper),
            KernelEvent::Bootstrapped { bootstrapper } => format!("bootstrapped: {}", bootstrapper),
            KernelEvent::Maintenance { .. } => "kernel.maintenance".to_string(),
            KernelEvent::ProviderStateChanged { state, .. } => format!("provider.{}", state),
        }
    }

    /// The bootstrapper a pipeline event refers to
    pub fn bootstrapper(&self) -> Option<&'static str> {
        match self {
            KernelEvent::Bootstrapping { bootstrapper } | KernelEvent::Bootstrapped { bootstrapper } => {
                Some(*bootstrapper)
            }
            _ => None,
        }
    }
}

impl fmt::Display for KernelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
