use crate::event::LifecycleEvent;
use tessera_types::Address;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HookError {
    /// The module identity does not encode its declared permissions. Permanent:
    /// the module must be rebuilt under a different identity.
    #[error("hook address {identity} is not valid (mismatch at {})", display_event(.event))]
    HookAddressNotValid {
        identity: Address,
        event: Option<LifecycleEvent>,
    },

    #[error("hook {module} failed during {event}: {reason}")]
    HookCallFailed {
        module: Address,
        event: LifecycleEvent,
        reason: String,
    },

    #[error("hook {module} returned an invalid response to {event} (tagged {tag})")]
    InvalidHookResponse {
        module: Address,
        event: LifecycleEvent,
        tag: LifecycleEvent,
    },

    #[error("hook dispatch nested deeper than {max_depth}")]
    HookDepthExceeded { max_depth: usize },

    #[error("module {0} is already registered")]
    ModuleAlreadyRegistered(Address),

    #[error("module {0} is not registered")]
    UnknownModule(Address),
}

fn display_event(event: &Option<LifecycleEvent>) -> String {
    match event {
        Some(e) => e.to_string(),
        None => "no capability bits set".to_string(),
    }
}

/// Failure reported by a module from inside one of its callbacks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct HookFault {
    pub reason: String,
}

impl HookFault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn unimplemented(event: LifecycleEvent) -> Self {
        Self::new(format!("{event} is not implemented"))
    }
}
