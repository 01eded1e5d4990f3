//! Fan-out of lifecycle events to every registered module.

use crate::capability::CapabilitySet;
use crate::context::CallContext;
use crate::error::HookError;
use crate::module::{GovernanceHook, RegisteredModule};
use crate::request::{HookRequest, HookResponse};
use tessera_types::Address;

/// Ordered collection of verified modules.
///
/// Modules are consulted in registration order. For events that allow an
/// override (quorum, vote weight, vote-succeeded, proposal id) the last module
/// to return `Some` wins; the first error aborts the whole fan-out.
pub struct Dispatcher<V: ?Sized = ()> {
    modules: Vec<RegisteredModule<V>>,
}

impl<V: ?Sized> Dispatcher<V> {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Verify and register a module, returning its capability set.
    pub fn register(
        &mut self,
        hook: Box<dyn GovernanceHook<V>>,
    ) -> Result<CapabilitySet, HookError> {
        let module = RegisteredModule::new(hook)?;
        self.register_module(module)
    }

    /// Register an already-verified module.
    pub fn register_module(
        &mut self,
        module: RegisteredModule<V>,
    ) -> Result<CapabilitySet, HookError> {
        if self.position(module.identity()).is_some() {
            return Err(HookError::ModuleAlreadyRegistered(*module.identity()));
        }
        let caps = module.capabilities();
        tracing::info!(module = %module.identity(), capabilities = ?caps, "module registered");
        self.modules.push(module);
        Ok(caps)
    }

    pub fn unregister(&mut self, identity: &Address) -> Option<RegisteredModule<V>> {
        let idx = self.position(identity)?;
        tracing::info!(module = %identity, "module unregistered");
        Some(self.modules.remove(idx))
    }

    pub fn capabilities_of(&self, identity: &Address) -> Option<CapabilitySet> {
        self.position(identity)
            .map(|idx| self.modules[idx].capabilities())
    }

    pub fn modules(&self) -> impl Iterator<Item = &RegisteredModule<V>> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Dispatch to one registered module.
    pub fn dispatch_to(
        &mut self,
        identity: &Address,
        ctx: &CallContext<'_, V>,
        request: &HookRequest,
    ) -> Result<HookResponse, HookError> {
        let idx = self
            .position(identity)
            .ok_or(HookError::UnknownModule(*identity))?;
        self.modules[idx].dispatch(ctx, request)
    }

    /// Dispatch to every registered module and fold the responses.
    pub fn dispatch_all(
        &mut self,
        ctx: &CallContext<'_, V>,
        request: &HookRequest,
    ) -> Result<HookResponse, HookError> {
        let event = request.event();
        let mut folded = HookResponse::neutral(event);
        for module in &mut self.modules {
            let response = module.dispatch(ctx, request)?;
            folded = folded.merge(response);
        }
        Ok(folded)
    }

    fn position(&self, identity: &Address) -> Option<usize> {
        self.modules.iter().position(|m| m.identity() == identity)
    }
}

impl<V: ?Sized> Default for Dispatcher<V> {
    fn default() -> Self {
        Self::new()
    }
}
