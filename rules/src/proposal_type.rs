use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use tessera_types::{Address, ProposalTypeId, DIVISOR};

/// A proposal category: quorum and approval fractions (in basis points of
/// [`DIVISOR`]) plus an optional module bound to the category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalType {
    pub id: ProposalTypeId,
    pub quorum: u16,
    pub approval_threshold: u16,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Module the category is associated with. Informational: validation and
    /// dispatch never consult it, and hooks still run for every registered module.
    #[serde(default)]
    pub module: Option<Address>,
}

impl ProposalType {
    pub fn new(
        id: ProposalTypeId,
        quorum: u16,
        approval_threshold: u16,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            quorum,
            approval_threshold,
            name: name.into(),
            description: String::new(),
            module: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_module(mut self, module: Address) -> Self {
        self.module = Some(module);
        self
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        if self.quorum > DIVISOR {
            return Err(RuleError::InvalidQuorum(self.quorum));
        }
        if self.approval_threshold > DIVISOR {
            return Err(RuleError::InvalidApprovalThreshold(self.approval_threshold));
        }
        Ok(())
    }
}
