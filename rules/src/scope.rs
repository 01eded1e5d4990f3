//! Scope records and their JSON definition form.

use crate::abi::{extract, ParamType};
use crate::comparator::Comparator;
use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use tessera_types::{ProposalTypeId, ScopeKey, Selector, Word};

/// A validation rule bound to a proposal type and a `(target, selector)` key.
///
/// Parameter `j` of a matching call is extracted as `types[j]` and compared
/// against `parameters[j]` (extracted under the same type) with
/// `comparators[j]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    pub key: ScopeKey,
    pub selector: Selector,
    pub parameters: Vec<Vec<u8>>,
    pub comparators: Vec<Comparator>,
    pub types: Vec<ParamType>,
    pub proposal_type_id: ProposalTypeId,
    pub description: String,
    pub disabled: bool,
}

impl Scope {
    /// A scope with no parameter constraints; only the selector is checked.
    pub fn new(
        proposal_type_id: ProposalTypeId,
        key: ScopeKey,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key,
            selector: key.selector(),
            parameters: Vec::new(),
            comparators: Vec::new(),
            types: Vec::new(),
            proposal_type_id,
            description: description.into(),
            disabled: false,
        }
    }

    /// Append a constraint on the next argument.
    pub fn with_param(
        mut self,
        ty: ParamType,
        comparator: Comparator,
        reference: impl Into<Vec<u8>>,
    ) -> Self {
        self.types.push(ty);
        self.comparators.push(comparator);
        self.parameters.push(reference.into());
        self
    }

    pub fn is_active(&self) -> bool {
        !self.disabled
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Structural checks run before a scope is stored.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.key.selector() != self.selector {
            return Err(RuleError::InvalidScopeDefinition(format!(
                "key selector {} does not match scope selector {}",
                self.key.selector(),
                self.selector
            )));
        }
        let n = self.types.len();
        if self.parameters.len() != n || self.comparators.len() != n {
            return Err(RuleError::InvalidScopeDefinition(format!(
                "{} parameters, {} comparators, {} types",
                self.parameters.len(),
                self.comparators.len(),
                n
            )));
        }
        for j in 0..n {
            self.reference(j).map_err(|e| {
                RuleError::InvalidScopeDefinition(format!("parameter {j}: {e}"))
            })?;
        }
        Ok(())
    }

    /// Reference value `j` widened to a word under `types[j]`.
    pub fn reference(&self, j: usize) -> Result<Word, RuleError> {
        match (self.parameters.get(j), self.types.get(j)) {
            (Some(param), Some(ty)) => extract(param, *ty),
            _ => Err(RuleError::InvalidScopeIndex {
                index: j,
                len: self.types.len(),
            }),
        }
    }
}

/// JSON wire form of a scope: byte fields as `0x` hex, enums as numeric tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDefinition {
    pub key: ScopeKey,
    pub selector: Selector,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub comparators: Vec<u8>,
    #[serde(default)]
    pub types: Vec<u8>,
    pub proposal_type_id: ProposalTypeId,
    #[serde(default)]
    pub description: String,
}

impl ScopeDefinition {
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        serde_json::from_str(json).map_err(|e| RuleError::Decode(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, RuleError> {
        serde_json::to_string_pretty(self).map_err(|e| RuleError::Decode(e.to_string()))
    }
}

impl TryFrom<ScopeDefinition> for Scope {
    type Error = RuleError;

    fn try_from(def: ScopeDefinition) -> Result<Self, Self::Error> {
        let parameters = def
            .parameters
            .iter()
            .map(|p| {
                let digits = p.strip_prefix("0x").unwrap_or(p);
                hex::decode(digits).map_err(|e| RuleError::Decode(format!("parameter {p}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let comparators = def
            .comparators
            .into_iter()
            .map(Comparator::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let types = def
            .types
            .into_iter()
            .map(ParamType::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let scope = Scope {
            key: def.key,
            selector: def.selector,
            parameters,
            comparators,
            types,
            proposal_type_id: def.proposal_type_id,
            description: def.description,
            disabled: false,
        };
        scope.validate()?;
        Ok(scope)
    }
}

impl From<&Scope> for ScopeDefinition {
    fn from(scope: &Scope) -> Self {
        Self {
            key: scope.key,
            selector: scope.selector,
            parameters: scope
                .parameters
                .iter()
                .map(|p| format!("0x{}", hex::encode(p)))
                .collect(),
            comparators: scope.comparators.iter().map(|c| u8::from(*c)).collect(),
            types: scope.types.iter().map(|t| u8::from(*t)).collect(),
            proposal_type_id: scope.proposal_type_id,
            description: scope.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_types::Address;

    fn key() -> ScopeKey {
        ScopeKey::pack(&Address::from_low_u64(0xfeed), Selector::from(0xabcd1234))
    }

    fn ten() -> Vec<u8> {
        Word::from(10u64).as_bytes().to_vec()
    }

    #[test]
    fn builder_produces_valid_scope() {
        let scope = Scope::new(1, key(), "transfer cap")
            .with_param(ParamType::Uint256, Comparator::GreaterThan, ten());
        assert!(scope.validate().is_ok());
        assert_eq!(scope.selector, Selector::from(0xabcd1234));
        assert_eq!(scope.reference(0).unwrap(), Word::from(10u64));
        assert!(scope.reference(1).is_err());
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let mut scope = Scope::new(1, key(), "");
        scope.types.push(ParamType::Uint8);
        assert!(matches!(
            scope.validate(),
            Err(RuleError::InvalidScopeDefinition(_))
        ));
    }

    #[test]
    fn selector_must_match_key() {
        let mut scope = Scope::new(1, key(), "");
        scope.selector = Selector::from(0x11111111);
        assert!(matches!(
            scope.validate(),
            Err(RuleError::InvalidScopeDefinition(_))
        ));
    }

    #[test]
    fn short_reference_rejected() {
        let scope =
            Scope::new(1, key(), "").with_param(ParamType::Uint64, Comparator::Equal, vec![0u8; 3]);
        assert!(matches!(
            scope.validate(),
            Err(RuleError::InvalidScopeDefinition(_))
        ));
    }

    #[test]
    fn definition_from_json() {
        let json = format!(
            r#"{{
                "key": "{}",
                "selector": "0xabcd1234",
                "parameters": ["0x0a"],
                "comparators": [3],
                "types": [1],
                "proposal_type_id": 1,
                "description": "small"
            }}"#,
            key()
        );
        let scope = Scope::try_from(ScopeDefinition::from_json(&json).unwrap()).unwrap();
        assert_eq!(scope.comparators, vec![Comparator::GreaterThan]);
        assert_eq!(scope.types, vec![ParamType::Uint8]);
        assert_eq!(scope.reference(0).unwrap(), Word::from(10u64));
        assert!(!scope.disabled);
    }

    #[test]
    fn definition_rejects_zero_tags() {
        let mut def = ScopeDefinition::from(
            &Scope::new(1, key(), "").with_param(ParamType::Uint8, Comparator::Equal, vec![1u8]),
        );
        def.comparators = vec![0];
        assert_eq!(
            Scope::try_from(def.clone()),
            Err(RuleError::InvalidWireTag {
                kind: "comparator",
                tag: 0
            })
        );
        def.comparators = vec![1];
        def.types = vec![0];
        assert!(matches!(
            Scope::try_from(def),
            Err(RuleError::InvalidWireTag { kind: "type", .. })
        ));
    }

    #[test]
    fn definition_rejects_bad_hex() {
        let mut def = ScopeDefinition::from(&Scope::new(1, key(), ""));
        def.parameters = vec!["0xzz".into()];
        def.comparators = vec![1];
        def.types = vec![1];
        assert!(matches!(Scope::try_from(def), Err(RuleError::Decode(_))));
        assert!(matches!(
            ScopeDefinition::from_json("{not json"),
            Err(RuleError::Decode(_))
        ));
    }
}
