//! The rule store: proposal types and the scopes bound to them.
//!
//! Scopes live in an arena keyed by [`ScopeId`]. Two indexes point into it:
//! every scope of a proposal type (in creation order), and the ordered list of
//! scopes under one `(proposal type, scope key)` pair. Public indices used by
//! [`RuleStore::disable_scope`] and [`RuleStore::delete_scope`] are positions
//! in the latter list.

use crate::config::RulesConfig;
use crate::error::RuleError;
use crate::events::{EventBus, RuleEvent};
use crate::proposal_type::ProposalType;
use crate::scope::{Scope, ScopeDefinition};
use crate::validator;
use std::collections::{BTreeMap, HashMap};
use tessera_types::{Address, ProposalTypeId, ScopeKey, Selector};

/// Arena handle of a stored scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct RuleStore {
    admin: Address,
    timelock: Address,
    config: RulesConfig,
    proposal_types: BTreeMap<ProposalTypeId, ProposalType>,
    scopes: HashMap<ScopeId, Scope>,
    by_type: HashMap<ProposalTypeId, Vec<ScopeId>>,
    by_key: HashMap<(ProposalTypeId, ScopeKey), Vec<ScopeId>>,
    next_scope_id: u64,
    events: EventBus,
}

impl RuleStore {
    pub fn new(admin: Address, timelock: Address, config: RulesConfig) -> Result<Self, RuleError> {
        if admin.is_zero() {
            return Err(RuleError::InvalidAdmin);
        }
        Ok(Self {
            admin,
            timelock,
            config,
            proposal_types: BTreeMap::new(),
            scopes: HashMap::new(),
            by_type: HashMap::new(),
            by_key: HashMap::new(),
            next_scope_id: 0,
            events: EventBus::new(),
        })
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn timelock(&self) -> Address {
        self.timelock
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&RuleEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    fn ensure_admin(&self, caller: &Address) -> Result<(), RuleError> {
        if *caller != self.admin {
            return Err(RuleError::NotAdmin(*caller));
        }
        Ok(())
    }

    fn ensure_admin_or_timelock(&self, caller: &Address) -> Result<(), RuleError> {
        if *caller != self.admin && (self.timelock.is_zero() || *caller != self.timelock) {
            return Err(RuleError::NotAdminOrTimelock(*caller));
        }
        Ok(())
    }

    // ── Proposal types ──────────────────────────────────────────────────

    /// Create or overwrite a proposal type.
    pub fn set_proposal_type(
        &mut self,
        caller: &Address,
        proposal_type: ProposalType,
    ) -> Result<(), RuleError> {
        self.ensure_admin_or_timelock(caller)?;
        proposal_type.validate()?;

        tracing::info!(
            proposal_type = proposal_type.id,
            quorum = proposal_type.quorum,
            approval_threshold = proposal_type.approval_threshold,
            name = %proposal_type.name,
            "proposal type set"
        );
        self.events.emit(&RuleEvent::ProposalTypeSet(proposal_type.clone()));
        self.proposal_types.insert(proposal_type.id, proposal_type);
        Ok(())
    }

    pub fn proposal_type(&self, id: ProposalTypeId) -> Result<&ProposalType, RuleError> {
        self.proposal_types
            .get(&id)
            .ok_or(RuleError::InvalidProposalType(id))
    }

    pub fn proposal_type_exists(&self, id: ProposalTypeId) -> bool {
        self.proposal_types.contains_key(&id)
    }

    /// All proposal types in id order.
    pub fn proposal_types(&self) -> impl Iterator<Item = &ProposalType> {
        self.proposal_types.values()
    }

    // ── Scope mutation ──────────────────────────────────────────────────

    /// Append `scope` under its `(proposal type, key)` pair and return its index there.
    ///
    /// Identical scopes are not de-duplicated; each call adds a new entry.
    pub fn add_scope(&mut self, caller: &Address, scope: Scope) -> Result<usize, RuleError> {
        self.ensure_admin_or_timelock(caller)?;
        self.proposal_type(scope.proposal_type_id)?;
        scope.validate()?;

        let id = ScopeId(self.next_scope_id);
        self.next_scope_id += 1;

        let type_id = scope.proposal_type_id;
        let key = scope.key;
        let selector = scope.selector;
        let description = scope.description.clone();

        let slot = self.by_key.entry((type_id, key)).or_default();
        slot.push(id);
        let index = slot.len() - 1;
        self.by_type.entry(type_id).or_default().push(id);
        self.scopes.insert(id, scope);

        tracing::info!(
            proposal_type = type_id,
            key = %key,
            index,
            params = self.scopes.get(&id).map(Scope::len).unwrap_or_default(),
            "scope created"
        );
        self.events.emit(&RuleEvent::ScopeCreated {
            proposal_type_id: type_id,
            key,
            selector,
            index,
            description,
        });
        Ok(index)
    }

    /// Decode a wire-form definition and add it.
    pub fn set_scope_for_proposal_type(
        &mut self,
        caller: &Address,
        definition: ScopeDefinition,
    ) -> Result<usize, RuleError> {
        self.ensure_admin_or_timelock(caller)?;
        let scope = Scope::try_from(definition)?;
        self.add_scope(caller, scope)
    }

    fn scope_id_at(
        &self,
        type_id: ProposalTypeId,
        key: &ScopeKey,
        index: usize,
    ) -> Result<ScopeId, RuleError> {
        let ids = self.by_key.get(&(type_id, *key));
        let len = ids.map(Vec::len).unwrap_or(0);
        ids.and_then(|ids| ids.get(index).copied())
            .ok_or(RuleError::InvalidScopeIndex { index, len })
    }

    /// Mark a scope inactive. Disabling an already disabled scope is a no-op.
    pub fn disable_scope(
        &mut self,
        caller: &Address,
        type_id: ProposalTypeId,
        key: &ScopeKey,
        index: usize,
    ) -> Result<(), RuleError> {
        self.ensure_admin(caller)?;
        let id = self.scope_id_at(type_id, key, index)?;
        let scope = self
            .scopes
            .get_mut(&id)
            .ok_or(RuleError::InvalidScopeIndex { index, len: 0 })?;
        if scope.disabled {
            return Ok(());
        }
        scope.disabled = true;

        tracing::info!(proposal_type = type_id, key = %key, index, "scope disabled");
        self.events.emit(&RuleEvent::ScopeDisabled {
            proposal_type_id: type_id,
            key: *key,
            index,
        });
        Ok(())
    }

    /// Remove a scope. Later scopes under the same key shift down one index.
    pub fn delete_scope(
        &mut self,
        caller: &Address,
        type_id: ProposalTypeId,
        key: &ScopeKey,
        index: usize,
    ) -> Result<(), RuleError> {
        self.ensure_admin(caller)?;
        let id = self.scope_id_at(type_id, key, index)?;

        if let Some(ids) = self.by_key.get_mut(&(type_id, *key)) {
            ids.remove(index);
            if ids.is_empty() {
                self.by_key.remove(&(type_id, *key));
            }
        }
        if let Some(ids) = self.by_type.get_mut(&type_id) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_type.remove(&type_id);
            }
        }
        self.scopes.remove(&id);

        tracing::info!(proposal_type = type_id, key = %key, index, "scope deleted");
        self.events.emit(&RuleEvent::ScopeDeleted {
            proposal_type_id: type_id,
            key: *key,
            index,
        });
        Ok(())
    }

    pub fn set_admin(&mut self, caller: &Address, new_admin: Address) -> Result<(), RuleError> {
        self.ensure_admin(caller)?;
        if new_admin.is_zero() {
            return Err(RuleError::InvalidAdmin);
        }
        let old = std::mem::replace(&mut self.admin, new_admin);
        tracing::info!(old = %old, new = %new_admin, "rule store admin changed");
        self.events.emit(&RuleEvent::AdminChanged {
            old,
            new: new_admin,
        });
        Ok(())
    }

    // ── Scope reads ─────────────────────────────────────────────────────

    /// Every scope under `(type_id, key)`, disabled ones included, in index order.
    pub fn scopes(&self, type_id: ProposalTypeId, key: &ScopeKey) -> Vec<&Scope> {
        self.by_key
            .get(&(type_id, *key))
            .into_iter()
            .flatten()
            .filter_map(|id| self.scopes.get(id))
            .collect()
    }

    /// The scopes under `(type_id, key)` that are not disabled, in index order.
    pub fn active_scopes(&self, type_id: ProposalTypeId, key: &ScopeKey) -> Vec<&Scope> {
        self.scopes(type_id, key)
            .into_iter()
            .filter(|s| s.is_active())
            .collect()
    }

    /// Every scope of a proposal type, in creation order.
    pub fn scopes_for_type(&self, type_id: ProposalTypeId) -> Vec<&Scope> {
        self.by_type
            .get(&type_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.scopes.get(id))
            .collect()
    }

    /// Whether any active scope exists under `(type_id, key)`.
    pub fn scope_exists(&self, type_id: ProposalTypeId, key: &ScopeKey) -> bool {
        !self.active_scopes(type_id, key).is_empty()
    }

    fn first_stored(&self, type_id: ProposalTypeId, key: &ScopeKey) -> Result<&Scope, RuleError> {
        self.by_key
            .get(&(type_id, *key))
            .and_then(|ids| ids.first())
            .and_then(|id| self.scopes.get(id))
            .ok_or(RuleError::InvalidScope)
    }

    /// Selector of the first scope stored under `(type_id, key)`, disabled or not.
    pub fn get_selector(
        &self,
        type_id: ProposalTypeId,
        key: &ScopeKey,
    ) -> Result<Selector, RuleError> {
        Ok(self.first_stored(type_id, key)?.selector)
    }

    /// Reference parameters of the first scope stored under `(type_id, key)`.
    ///
    /// A disabled scope still exists and is still readable here.
    pub fn get_limit(
        &self,
        type_id: ProposalTypeId,
        key: &ScopeKey,
    ) -> Result<&[Vec<u8>], RuleError> {
        Ok(&self.first_stored(type_id, key)?.parameters)
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    // ── Validation ──────────────────────────────────────────────────────

    pub fn validate_proposed_tx(
        &self,
        call: &[u8],
        type_id: ProposalTypeId,
        key: &ScopeKey,
    ) -> Result<(), RuleError> {
        validator::validate_proposed_tx(self, call, type_id, key)
    }

    pub fn validate_proposal_data(
        &self,
        targets: &[Address],
        calldatas: &[Vec<u8>],
        type_id: ProposalTypeId,
    ) -> Result<(), RuleError> {
        validator::validate_proposal_data(self, targets, calldatas, type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::ParamType;
    use crate::comparator::Comparator;
    use std::sync::{Arc, Mutex};
    use tessera_types::{Word, DIVISOR};

    fn admin() -> Address {
        Address::from_low_u64(0xad)
    }

    fn timelock() -> Address {
        Address::from_low_u64(0x71)
    }

    fn stranger() -> Address {
        Address::from_low_u64(0x5e)
    }

    fn key() -> ScopeKey {
        ScopeKey::pack(&Address::from_low_u64(0xfeed), Selector::from(0xabcd1234))
    }

    fn store() -> RuleStore {
        let mut store = RuleStore::new(admin(), timelock(), RulesConfig::default()).unwrap();
        store
            .set_proposal_type(&admin(), ProposalType::new(1, 3000, 5000, "treasury"))
            .unwrap();
        store
    }

    fn gt(v: u64) -> Scope {
        Scope::new(1, key(), format!("> {v}")).with_param(
            ParamType::Uint256,
            Comparator::GreaterThan,
            Word::from(v).as_bytes().to_vec(),
        )
    }

    #[test]
    fn zero_admin_rejected() {
        assert_eq!(
            RuleStore::new(Address::ZERO, timelock(), RulesConfig::default()).unwrap_err(),
            RuleError::InvalidAdmin
        );
    }

    #[test]
    fn proposal_type_bounds() {
        let mut store = store();
        assert!(store
            .set_proposal_type(&admin(), ProposalType::new(0, 3000, 5000, "default"))
            .is_ok());
        assert_eq!(
            store.set_proposal_type(&admin(), ProposalType::new(0, 10_001, 5000, "x")),
            Err(RuleError::InvalidQuorum(10_001))
        );
        assert_eq!(
            store.set_proposal_type(&admin(), ProposalType::new(0, 0, DIVISOR + 1, "x")),
            Err(RuleError::InvalidApprovalThreshold(DIVISOR + 1))
        );
        // failed overwrite left the stored record intact
        assert_eq!(store.proposal_type(0).unwrap().quorum, 3000);
    }

    #[test]
    fn timelock_may_configure_but_not_administer() {
        let mut store = store();
        assert!(store
            .set_proposal_type(&timelock(), ProposalType::new(2, 100, 100, "tl"))
            .is_ok());
        assert!(store.add_scope(&timelock(), gt(10)).is_ok());
        assert_eq!(
            store.disable_scope(&timelock(), 1, &key(), 0),
            Err(RuleError::NotAdmin(timelock()))
        );
        assert_eq!(
            store.set_proposal_type(&stranger(), ProposalType::new(3, 1, 1, "s")),
            Err(RuleError::NotAdminOrTimelock(stranger()))
        );
    }

    #[test]
    fn zero_timelock_grants_nothing() {
        let mut store = RuleStore::new(admin(), Address::ZERO, RulesConfig::default()).unwrap();
        assert_eq!(
            store.set_proposal_type(&Address::ZERO, ProposalType::new(1, 1, 1, "z")),
            Err(RuleError::NotAdminOrTimelock(Address::ZERO))
        );
    }

    #[test]
    fn add_scope_requires_existing_type() {
        let mut store = store();
        let scope = Scope::new(9, key(), "orphan");
        assert_eq!(
            store.add_scope(&admin(), scope),
            Err(RuleError::InvalidProposalType(9))
        );
        assert_eq!(store.scope_count(), 0);
    }

    #[test]
    fn scopes_append_without_dedup() {
        let mut store = store();
        assert_eq!(store.add_scope(&admin(), gt(10)).unwrap(), 0);
        assert_eq!(store.add_scope(&admin(), gt(10)).unwrap(), 1);
        assert_eq!(store.scopes(1, &key()).len(), 2);
        assert_eq!(store.scopes_for_type(1).len(), 2);
        assert_eq!(store.get_selector(1, &key()).unwrap(), Selector::from(0xabcd1234));
    }

    #[test]
    fn disable_is_idempotent_and_emits_once() {
        let mut store = store();
        store.add_scope(&admin(), gt(10)).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.clone())));

        store.disable_scope(&admin(), 1, &key(), 0).unwrap();
        store.disable_scope(&admin(), 1, &key(), 0).unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(!store.scope_exists(1, &key()));
        assert_eq!(store.scopes(1, &key()).len(), 1);
    }

    #[test]
    fn disabled_scope_is_still_readable() {
        let mut store = store();
        store.add_scope(&admin(), gt(10)).unwrap();
        store.disable_scope(&admin(), 1, &key(), 0).unwrap();

        assert!(store.active_scopes(1, &key()).is_empty());
        assert_eq!(store.get_selector(1, &key()), Ok(Selector::from(0xabcd1234)));
        assert_eq!(
            store.get_limit(1, &key()).unwrap(),
            &[Word::from(10u64).as_bytes().to_vec()][..]
        );
    }

    #[test]
    fn reads_fail_only_when_nothing_is_stored() {
        let mut store = store();
        assert_eq!(store.get_selector(1, &key()), Err(RuleError::InvalidScope));
        assert_eq!(store.get_limit(1, &key()), Err(RuleError::InvalidScope));

        store.add_scope(&admin(), gt(10)).unwrap();
        store.delete_scope(&admin(), 1, &key(), 0).unwrap();
        assert_eq!(store.get_selector(1, &key()), Err(RuleError::InvalidScope));
    }

    #[test]
    fn out_of_range_index() {
        let mut store = store();
        store.add_scope(&admin(), gt(10)).unwrap();
        assert_eq!(
            store.disable_scope(&admin(), 1, &key(), 1),
            Err(RuleError::InvalidScopeIndex { index: 1, len: 1 })
        );
        assert_eq!(
            store.delete_scope(&admin(), 2, &key(), 0),
            Err(RuleError::InvalidScopeIndex { index: 0, len: 0 })
        );
    }

    #[test]
    fn delete_preserves_order() {
        let mut store = store();
        for v in [1, 2, 3] {
            store.add_scope(&admin(), gt(v)).unwrap();
        }
        store.delete_scope(&admin(), 1, &key(), 0).unwrap();

        let remaining: Vec<_> = store
            .scopes(1, &key())
            .iter()
            .map(|s| s.description.clone())
            .collect();
        assert_eq!(remaining, vec!["> 2", "> 3"]);
        assert_eq!(
            store.get_limit(1, &key()).unwrap()[0],
            Word::from(2u64).as_bytes().to_vec()
        );
        assert_eq!(store.scopes_for_type(1).len(), 2);

        store.delete_scope(&admin(), 1, &key(), 1).unwrap();
        store.delete_scope(&admin(), 1, &key(), 0).unwrap();
        assert_eq!(store.scope_count(), 0);
        assert!(store.scopes_for_type(1).is_empty());
    }

    #[test]
    fn wire_definition_is_added() {
        let mut store = store();
        let def = ScopeDefinition::from(&gt(10));
        assert_eq!(store.set_scope_for_proposal_type(&admin(), def).unwrap(), 0);
        assert!(store.scope_exists(1, &key()));
    }

    #[test]
    fn events_carry_full_records() {
        let mut store = RuleStore::new(admin(), timelock(), RulesConfig::default()).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.clone())));

        let pt = ProposalType::new(1, 3000, 5000, "treasury").with_description("spend");
        store.set_proposal_type(&admin(), pt.clone()).unwrap();
        store.add_scope(&admin(), gt(10)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], RuleEvent::ProposalTypeSet(pt));
        assert!(matches!(
            seen[1],
            RuleEvent::ScopeCreated { proposal_type_id: 1, index: 0, .. }
        ));
    }

    #[test]
    fn admin_handover() {
        let mut store = store();
        assert_eq!(
            store.set_admin(&admin(), Address::ZERO),
            Err(RuleError::InvalidAdmin)
        );
        store.set_admin(&admin(), stranger()).unwrap();
        assert_eq!(store.admin(), stranger());
        assert_eq!(
            store.set_admin(&admin(), admin()),
            Err(RuleError::NotAdmin(admin()))
        );
    }
}
