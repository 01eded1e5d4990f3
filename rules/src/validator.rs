//! Validation of proposed calls against the scopes of their proposal type.

use crate::abi::{argument, extract};
use crate::comparator::evaluate;
use crate::config::ScopePolicy;
use crate::error::RuleError;
use crate::registry::RuleStore;
use crate::scope::Scope;
use tessera_types::{Address, ProposalTypeId, ScopeKey, Selector};

/// Check one call against one scope: selector first, then each constrained
/// argument in order. The first failing check is returned.
pub fn check_scope(call: &[u8], scope: &Scope) -> Result<(), RuleError> {
    let selector = Selector::of_call(call)
        .ok_or_else(|| RuleError::InvalidCalldata(format!("call is {} bytes", call.len())))?;
    if selector != scope.selector {
        return Err(RuleError::Invalid4ByteSelector {
            expected: scope.selector,
            actual: selector,
        });
    }
    for (j, (ty, comparator)) in scope.types.iter().zip(&scope.comparators).enumerate() {
        let actual = extract(argument(call, j)?, *ty)?;
        let reference = scope.reference(j)?;
        evaluate(&actual, &reference, *comparator)?;
    }
    Ok(())
}

/// Validate `call` against every active scope under `(type_id, key)`.
pub fn validate_proposed_tx(
    store: &RuleStore,
    call: &[u8],
    type_id: ProposalTypeId,
    key: &ScopeKey,
) -> Result<(), RuleError> {
    let active = store.active_scopes(type_id, key);
    if active.is_empty() {
        return Err(RuleError::InvalidScope);
    }
    for scope in active {
        check_scope(call, scope)?;
    }
    Ok(())
}

/// Validate every `(target, call)` pair of a proposal.
///
/// Pairs with active scopes must satisfy all of them. Pairs without are
/// settled by the store's [`ScopePolicy`].
pub fn validate_proposal_data(
    store: &RuleStore,
    targets: &[Address],
    calldatas: &[Vec<u8>],
    type_id: ProposalTypeId,
) -> Result<(), RuleError> {
    if targets.is_empty() || targets.len() != calldatas.len() {
        return Err(RuleError::InvalidCalldatasLength {
            targets: targets.len(),
            calldatas: calldatas.len(),
        });
    }
    store.proposal_type(type_id)?;

    for (i, (target, call)) in targets.iter().zip(calldatas).enumerate() {
        let selector = Selector::of_call(call).ok_or_else(|| {
            RuleError::InvalidCalldata(format!("call {i} is {} bytes", call.len()))
        })?;
        let key = ScopeKey::pack(target, selector);

        if store.scope_exists(type_id, &key) {
            validate_proposed_tx(store, call, type_id, &key)?;
            continue;
        }
        match store.config().scope_policy {
            ScopePolicy::Permissive => {
                tracing::debug!(
                    proposal_type = type_id,
                    %target,
                    %selector,
                    "unscoped call allowed"
                );
            }
            ScopePolicy::Strict => {
                return Err(RuleError::InvalidProposedTxForType {
                    target: *target,
                    selector,
                });
            }
        }
    }
    Ok(())
}
