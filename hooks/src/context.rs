//! Per-operation dispatch context: who called, which modules are mid-dispatch.

use crate::error::HookError;
use tessera_types::Address;

/// Default bound on nested dispatch (a module dispatching to sub-modules, and so on).
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Context threaded through one lifecycle operation.
///
/// `caller` is the account that invoked the governor; `active` is the chain of
/// modules currently inside a callback, outermost first. A module is never
/// dispatched to while it is the caller or already on that chain, which rules out
/// both direct self re-entry and longer module cycles. `view` is a read-only
/// handle modules may query (the governor passes its rule store).
pub struct CallContext<'a, V: ?Sized = ()> {
    caller: Address,
    view: &'a V,
    active: Vec<Address>,
    max_depth: usize,
}

impl<'a, V: ?Sized> CallContext<'a, V> {
    pub fn new(caller: Address, view: &'a V) -> Self {
        Self {
            caller,
            view,
            active: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn caller(&self) -> &Address {
        &self.caller
    }

    pub fn view(&self) -> &'a V {
        self.view
    }

    pub fn depth(&self) -> usize {
        self.active.len()
    }

    pub fn active(&self) -> &[Address] {
        &self.active
    }

    /// Whether dispatching to `module` would re-enter it.
    pub fn would_reenter(&self, module: &Address) -> bool {
        &self.caller == module || self.active.contains(module)
    }

    /// The context a module sees while its callback runs.
    pub fn enter(&self, module: Address) -> Result<Self, HookError> {
        if self.active.len() >= self.max_depth {
            return Err(HookError::HookDepthExceeded {
                max_depth: self.max_depth,
            });
        }
        let mut active = self.active.clone();
        active.push(module);
        Ok(Self {
            caller: self.caller,
            view: self.view,
            active,
            max_depth: self.max_depth,
        })
    }
}
