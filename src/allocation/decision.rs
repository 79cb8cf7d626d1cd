//! Allocation decisions.

use std::fmt;

use serde_json::{json, Value};

use crate::xcontent::{object, ToXContent};

/// Outcome of an allocation check.
///
/// Ordered from most to least permissive, so `max` picks the outcome that
/// wins when several checks are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecisionType {
    Yes,
    Throttle,
    No,
}

impl DecisionType {
    pub fn name(self) -> &'static str {
        match self {
            DecisionType::Yes => "YES",
            DecisionType::Throttle => "THROTTLE",
            DecisionType::No => "NO",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// A single check, optionally labelled with the decider that made it.
    Single {
        kind: DecisionType,
        label: Option<String>,
        explanation: Option<String>,
    },
    /// Several checks; the combined outcome is the least permissive one.
    Multi(Vec<Decision>),
}

impl Decision {
    pub const YES: Decision = Decision::Single {
        kind: DecisionType::Yes,
        label: None,
        explanation: None,
    };
    pub const THROTTLE: Decision = Decision::Single {
        kind: DecisionType::Throttle,
        label: None,
        explanation: None,
    };
    pub const NO: Decision = Decision::Single {
        kind: DecisionType::No,
        label: None,
        explanation: None,
    };

    pub fn single(
        kind: DecisionType,
        label: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Decision::Single {
            kind,
            label: Some(label.into()),
            explanation: Some(explanation.into()),
        }
    }

    pub fn multi(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Decision::Multi(decisions.into_iter().collect())
    }

    /// Combined outcome. An empty multi decision is a YES.
    pub fn kind(&self) -> DecisionType {
        match self {
            Decision::Single { kind, .. } => *kind,
            Decision::Multi(decisions) => decisions
                .iter()
                .map(Decision::kind)
                .max()
                .unwrap_or(DecisionType::Yes),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Decision::Single { label, .. } => label.as_deref(),
            Decision::Multi(_) => None,
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        match self {
            Decision::Single { explanation, .. } => explanation.as_deref(),
            Decision::Multi(_) => None,
        }
    }

    /// One rendered entry per single decision, in order.
    pub fn entries(&self) -> Vec<Value> {
        match self {
            Decision::Single { .. } => vec![self.to_xcontent()],
            Decision::Multi(decisions) => decisions.iter().flat_map(Decision::entries).collect(),
        }
    }
}

impl ToXContent for Decision {
    /// A single decision renders as one object; a multi decision as the
    /// array of its entries.
    fn to_xcontent(&self) -> Value {
        match self {
            Decision::Single {
                kind,
                label,
                explanation,
            } => object([
                ("decider", json!(label)),
                ("decision", json!(kind.name())),
                ("explanation", json!(explanation.as_deref().unwrap_or("none"))),
            ]),
            Decision::Multi(_) => Value::Array(self.entries()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_yes_renders_null_decider_and_none_explanation() {
        assert_eq!(
            Decision::YES.to_xcontent().to_string(),
            r#"{"decider":null,"decision":"YES","explanation":"none"}"#
        );
    }

    #[test]
    fn test_multi_takes_least_permissive_outcome() {
        let decision = Decision::multi([
            Decision::YES,
            Decision::single(DecisionType::Throttle, "throttling", "too many recoveries"),
        ]);
        assert_eq!(decision.kind(), DecisionType::Throttle);

        let decision = Decision::multi([decision, Decision::NO]);
        assert_eq!(decision.kind(), DecisionType::No);
        assert_eq!(decision.entries().len(), 3);
        assert_eq!(Decision::multi([]).kind(), DecisionType::Yes);
    }

    #[test]
    fn test_labelled_decision() {
        let decision = Decision::single(DecisionType::No, "same_shard", "copy already on node");
        assert_eq!(decision.label(), Some("same_shard"));
        let doc = decision.to_xcontent();
        assert_eq!(doc["decision"], "NO");
        assert_eq!(doc["explanation"], "copy already on node");
    }
}
