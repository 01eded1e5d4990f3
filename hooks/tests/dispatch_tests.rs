use tessera_hooks::{
    CallContext, CapabilitySet, Dispatcher, GovernanceHook, HookError, HookFault, HookRequest,
    HookResponse, LifecycleEvent, PermissionDescriptor, RegisteredModule,
};
use tessera_nullables::NullHook;
use tessera_types::{Address, ProposalId};

fn sender() -> Address {
    Address::from_low_u64(0xcafe_0000)
}

fn quorum_request() -> HookRequest {
    HookRequest::BeforeQuorumCalculation {
        sender: sender(),
        proposal: ProposalId::new([7u8; 32]),
    }
}

#[test]
fn before_quorum_without_capability_returns_default_and_never_calls() {
    let hook = NullHook::new(1, CapabilitySet::AFTER_PROPOSE).respond(HookResponse::Quorum {
        tag: LifecycleEvent::BeforeQuorumCalculation,
        quorum: Some(1),
    });
    let log = hook.log();
    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(hook)).unwrap();

    let ctx = CallContext::new(sender(), &());
    let resp = dispatcher.dispatch_all(&ctx, &quorum_request()).unwrap();

    assert_eq!(resp.quorum_override(), None);
    assert!(log.is_empty());
}

#[test]
fn after_propose_and_before_vote_identity_with_partial_descriptor_fails() {
    let identity = Address::from_low_u64(0x77 << 16)
        .with_low_u16((CapabilitySet::AFTER_PROPOSE | CapabilitySet::BEFORE_VOTE).bits());
    let declared = PermissionDescriptor::default().with(LifecycleEvent::AfterPropose);
    let hook = NullHook::with_identity(identity, declared);

    let mut dispatcher: Dispatcher = Dispatcher::new();
    let err = dispatcher.register(Box::new(hook)).unwrap_err();
    assert_eq!(
        err,
        HookError::HookAddressNotValid {
            identity,
            event: Some(LifecycleEvent::BeforeVote),
        }
    );
    assert!(dispatcher.is_empty());
}

#[test]
fn implemented_view_event_uses_override() {
    let hook = NullHook::new(2, CapabilitySet::BEFORE_QUORUM_CALCULATION).respond(
        HookResponse::Quorum {
            tag: LifecycleEvent::BeforeQuorumCalculation,
            quorum: Some(1234),
        },
    );
    let log = hook.log();
    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(hook)).unwrap();

    let ctx = CallContext::new(sender(), &());
    let resp = dispatcher.dispatch_all(&ctx, &quorum_request()).unwrap();
    assert_eq!(resp.quorum_override(), Some(1234));
    assert_eq!(log.events(), vec![LifecycleEvent::BeforeQuorumCalculation]);
}

#[test]
fn mismatched_tag_is_rejected() {
    let hook = NullHook::new(3, CapabilitySet::BEFORE_QUORUM_CALCULATION).respond_to(
        LifecycleEvent::BeforeQuorumCalculation,
        HookResponse::Ack(LifecycleEvent::AfterExecute),
    );
    let identity = hook.identity();
    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(hook)).unwrap();

    let ctx = CallContext::new(sender(), &());
    let err = dispatcher.dispatch_all(&ctx, &quorum_request()).unwrap_err();
    assert_eq!(
        err,
        HookError::InvalidHookResponse {
            module: identity,
            event: LifecycleEvent::BeforeQuorumCalculation,
            tag: LifecycleEvent::AfterExecute,
        }
    );
}

#[test]
fn correct_tag_wrong_shape_is_rejected() {
    let hook = NullHook::new(4, CapabilitySet::BEFORE_QUORUM_CALCULATION).respond_to(
        LifecycleEvent::BeforeQuorumCalculation,
        HookResponse::Ack(LifecycleEvent::BeforeQuorumCalculation),
    );
    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(hook)).unwrap();

    let ctx = CallContext::new(sender(), &());
    let err = dispatcher.dispatch_all(&ctx, &quorum_request()).unwrap_err();
    assert!(matches!(err, HookError::InvalidHookResponse { .. }));
}

#[test]
fn module_failure_is_not_retried() {
    let hook = NullHook::new(5, CapabilitySet::BEFORE_QUORUM_CALCULATION)
        .fail_on(LifecycleEvent::BeforeQuorumCalculation, "boom");
    let log = hook.log();
    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(hook)).unwrap();

    let ctx = CallContext::new(sender(), &());
    let err = dispatcher.dispatch_all(&ctx, &quorum_request()).unwrap_err();
    assert!(matches!(err, HookError::HookCallFailed { ref reason, .. } if reason == "boom"));
    assert_eq!(log.count(LifecycleEvent::BeforeQuorumCalculation), 1);
}

#[test]
fn module_calling_as_sender_is_skipped() {
    let hook = NullHook::new(6, CapabilitySet::BEFORE_QUORUM_CALCULATION)
        .fail_on(LifecycleEvent::BeforeQuorumCalculation, "should not run");
    let identity = hook.identity();
    let log = hook.log();
    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(hook)).unwrap();

    let ctx = CallContext::new(identity, &());
    let request = HookRequest::BeforeQuorumCalculation {
        sender: identity,
        proposal: ProposalId::ZERO,
    };
    let resp = dispatcher.dispatch_all(&ctx, &request).unwrap();
    assert_eq!(resp, HookResponse::neutral(LifecycleEvent::BeforeQuorumCalculation));
    assert!(log.is_empty());
}

/// A module that forwards every request to its own sub-modules.
struct Composite {
    identity: Address,
    inner: Dispatcher,
}

impl Composite {
    fn new(seed: u64) -> Self {
        Self {
            identity: Address::from_low_u64(seed << 16)
                .with_low_u16(CapabilitySet::AFTER_PROPOSE.bits()),
            inner: Dispatcher::new(),
        }
    }
}

impl GovernanceHook for Composite {
    fn identity(&self) -> Address {
        self.identity
    }

    fn permissions(&self) -> PermissionDescriptor {
        PermissionDescriptor::default().with(LifecycleEvent::AfterPropose)
    }

    fn on_call(
        &mut self,
        ctx: &CallContext<'_>,
        request: &HookRequest,
    ) -> Result<HookResponse, HookFault> {
        self.inner
            .dispatch_all(ctx, request)
            .map_err(|e| HookFault::new(e.to_string()))
    }
}

fn after_propose() -> HookRequest {
    HookRequest::AfterPropose {
        sender: sender(),
        proposal: ProposalId::ZERO,
        calls: Default::default(),
        description: "nested".into(),
    }
}

#[test]
fn cross_module_cycle_is_skipped() {
    let mut outer = Composite::new(10);
    // A second instance under the same identity: reaching it again is a cycle.
    let twin = NullHook::new(10, CapabilitySet::AFTER_PROPOSE);
    let twin_log = twin.log();
    let leaf = NullHook::new(11, CapabilitySet::AFTER_PROPOSE);
    let leaf_log = leaf.log();
    outer.inner.register(Box::new(twin)).unwrap();
    outer.inner.register(Box::new(leaf)).unwrap();

    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(outer)).unwrap();
    let ctx = CallContext::new(sender(), &());
    dispatcher.dispatch_all(&ctx, &after_propose()).unwrap();

    assert!(twin_log.is_empty());
    assert_eq!(leaf_log.count(LifecycleEvent::AfterPropose), 1);
}

#[test]
fn nesting_past_max_depth_fails() {
    let mut level2 = Composite::new(22);
    level2
        .inner
        .register(Box::new(NullHook::new(23, CapabilitySet::AFTER_PROPOSE)))
        .unwrap();
    let mut level1 = Composite::new(21);
    level1.inner.register(Box::new(level2)).unwrap();

    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(level1)).unwrap();

    let shallow = CallContext::new(sender(), &()).with_max_depth(2);
    let err = dispatcher.dispatch_all(&shallow, &after_propose()).unwrap_err();
    assert!(matches!(err, HookError::HookCallFailed { .. }));

    let deep = CallContext::new(sender(), &()).with_max_depth(3);
    assert!(dispatcher.dispatch_all(&deep, &after_propose()).is_ok());
}

#[test]
fn registered_module_caches_capabilities() {
    let hook = NullHook::new(30, CapabilitySet::BEFORE_VOTE | CapabilitySet::AFTER_VOTE);
    let module = RegisteredModule::<()>::new(Box::new(hook)).unwrap();
    assert!(module.implements(LifecycleEvent::BeforeVote));
    assert!(module.implements(LifecycleEvent::AfterVote));
    assert!(!module.implements(LifecycleEvent::BeforePropose));
}
