//! Nullable governance module: scripted responses and a call log.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tessera_hooks::{
    CallContext, CapabilitySet, GovernanceHook, HookFault, HookRequest, HookResponse,
    LifecycleEvent, PermissionDescriptor,
};
use tessera_types::Address;

/// Shared record of every request a [`NullHook`] received.
///
/// Cloning shares the log, so a test can keep a handle after the hook has been
/// boxed and moved into a dispatcher.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<HookRequest>>>);

impl CallLog {
    pub fn requests(&self) -> Vec<HookRequest> {
        self.0.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.0.lock().unwrap().iter().map(|r| r.event()).collect()
    }

    pub fn count(&self, event: LifecycleEvent) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event() == event)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }

    fn push(&self, request: &HookRequest) {
        self.0.lock().unwrap().push(request.clone());
    }
}

/// A governance module for tests.
///
/// By default it acknowledges every event it is called with and overrides
/// nothing. Responses and failures can be scripted per event.
pub struct NullHook {
    identity: Address,
    permissions: PermissionDescriptor,
    responses: HashMap<LifecycleEvent, HookResponse>,
    failures: HashMap<LifecycleEvent, String>,
    log: CallLog,
}

impl NullHook {
    /// A module implementing `caps`, with an identity whose low bits encode them.
    ///
    /// `seed` keeps identities of different test modules apart.
    pub fn new(seed: u64, caps: CapabilitySet) -> Self {
        let identity = Address::from_low_u64(seed << 16).with_low_u16(caps.bits());
        Self::with_identity(identity, PermissionDescriptor::from(caps))
    }

    /// A module with an explicit identity and declaration, which need not agree.
    pub fn with_identity(identity: Address, permissions: PermissionDescriptor) -> Self {
        Self {
            identity,
            permissions,
            responses: HashMap::new(),
            failures: HashMap::new(),
            log: CallLog::default(),
        }
    }

    /// Answer the response's own tag with `response`.
    pub fn respond(self, response: HookResponse) -> Self {
        let event = response.tag();
        self.respond_to(event, response)
    }

    /// Answer `event` with `response`, even if the response is tagged otherwise.
    pub fn respond_to(mut self, event: LifecycleEvent, response: HookResponse) -> Self {
        self.responses.insert(event, response);
        self
    }

    /// Fail every `event` callback with `reason`.
    pub fn fail_on(mut self, event: LifecycleEvent, reason: impl Into<String>) -> Self {
        self.failures.insert(event, reason.into());
        self
    }

    pub fn identity(&self) -> Address {
        self.identity
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn answer(&self, request: &HookRequest) -> Result<HookResponse, HookFault> {
        self.log.push(request);
        let event = request.event();
        if let Some(reason) = self.failures.get(&event) {
            return Err(HookFault::new(reason.clone()));
        }
        Ok(self
            .responses
            .get(&event)
            .cloned()
            .unwrap_or_else(|| HookResponse::ack(request)))
    }
}

impl<V: ?Sized> GovernanceHook<V> for NullHook {
    fn identity(&self) -> Address {
        self.identity
    }

    fn permissions(&self) -> PermissionDescriptor {
        self.permissions
    }

    fn on_call(
        &mut self,
        _ctx: &CallContext<'_, V>,
        request: &HookRequest,
    ) -> Result<HookResponse, HookFault> {
        self.answer(request)
    }

    fn on_view(
        &self,
        _ctx: &CallContext<'_, V>,
        request: &HookRequest,
    ) -> Result<HookResponse, HookFault> {
        self.answer(request)
    }
}
