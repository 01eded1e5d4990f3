//! The module trait and its verified, dispatchable wrapper.

use crate::capability::CapabilitySet;
use crate::context::CallContext;
use crate::error::{HookError, HookFault};
use crate::event::LifecycleEvent;
use crate::permissions::{validate_capabilities, PermissionDescriptor};
use crate::request::{HookRequest, HookResponse};
use tessera_types::Address;

/// A governance module that can intercept proposal lifecycle events.
///
/// `V` is the read-only view handed to callbacks through [`CallContext::view`].
/// Only the callbacks for events in the module's verified capability set are ever
/// invoked; the defaults fail so that a module declaring a capability it does not
/// handle surfaces as [`HookError::HookCallFailed`] instead of silently passing.
pub trait GovernanceHook<V: ?Sized = ()> {
    /// The module's identity; its low 16 bits encode the implemented events.
    fn identity(&self) -> Address;

    /// The events the author declares this module implements.
    fn permissions(&self) -> PermissionDescriptor;

    /// Handle a state-mutating event.
    fn on_call(
        &mut self,
        ctx: &CallContext<'_, V>,
        request: &HookRequest,
    ) -> Result<HookResponse, HookFault> {
        let _ = ctx;
        Err(HookFault::unimplemented(request.event()))
    }

    /// Handle a read-only event (quorum calculation, vote-succeeded).
    fn on_view(
        &self,
        ctx: &CallContext<'_, V>,
        request: &HookRequest,
    ) -> Result<HookResponse, HookFault> {
        let _ = ctx;
        Err(HookFault::unimplemented(request.event()))
    }
}

/// A module whose identity has been checked against its declared permissions.
///
/// The only way to build one is [`RegisteredModule::new`], which runs the check
/// once and caches the verified capability set for the module's lifetime.
pub struct RegisteredModule<V: ?Sized = ()> {
    hook: Box<dyn GovernanceHook<V>>,
    identity: Address,
    capabilities: CapabilitySet,
}

impl<V: ?Sized> RegisteredModule<V> {
    pub fn new(hook: Box<dyn GovernanceHook<V>>) -> Result<Self, HookError> {
        let identity = hook.identity();
        let capabilities = validate_capabilities(&identity, &hook.permissions())?;
        tracing::debug!(
            module = %identity,
            capabilities = ?capabilities,
            "module capabilities verified"
        );
        Ok(Self {
            hook,
            identity,
            capabilities,
        })
    }

    pub fn identity(&self) -> &Address {
        &self.identity
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    pub fn implements(&self, event: LifecycleEvent) -> bool {
        self.capabilities.implements(event)
    }

    /// Dispatch `request` to this module.
    ///
    /// Returns the event's neutral response without calling the module when the
    /// module would re-enter itself or does not implement the event. Otherwise the
    /// callback runs in a child context; a callback error becomes
    /// [`HookError::HookCallFailed`] and a response with the wrong tag or shape
    /// becomes [`HookError::InvalidHookResponse`].
    pub fn dispatch(
        &mut self,
        ctx: &CallContext<'_, V>,
        request: &HookRequest,
    ) -> Result<HookResponse, HookError> {
        let event = request.event();

        if ctx.would_reenter(&self.identity) {
            tracing::trace!(module = %self.identity, %event, "skipping re-entrant hook call");
            return Ok(HookResponse::neutral(event));
        }
        if !self.capabilities.implements(event) {
            return Ok(HookResponse::neutral(event));
        }

        let inner = ctx.enter(self.identity)?;
        let result = if event.is_view() {
            self.hook.on_view(&inner, request)
        } else {
            self.hook.on_call(&inner, request)
        };

        let response = result.map_err(|fault| {
            tracing::warn!(module = %self.identity, %event, reason = %fault, "hook call failed");
            HookError::HookCallFailed {
                module: self.identity,
                event,
                reason: fault.reason,
            }
        })?;

        if response.tag() != event || !response.fits(event) {
            tracing::warn!(
                module = %self.identity,
                %event,
                tag = %response.tag(),
                "hook returned mismatched response"
            );
            return Err(HookError::InvalidHookResponse {
                module: self.identity,
                event,
                tag: response.tag(),
            });
        }

        tracing::trace!(module = %self.identity, %event, "hook call completed");
        Ok(response)
    }
}

impl<V: ?Sized> std::fmt::Debug for RegisteredModule<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredModule")
            .field("identity", &self.identity)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
