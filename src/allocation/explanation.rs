//! Explanations returned by `?explain` reroutes.

use serde_json::{json, Value};

use crate::allocation::command::AllocationCommand;
use crate::allocation::decision::Decision;
use crate::xcontent::{object, ToXContent};

/// A command paired with the decision it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RerouteExplanation {
    command: AllocationCommand,
    decision: Decision,
}

impl RerouteExplanation {
    pub fn new(command: AllocationCommand, decision: Decision) -> Self {
        Self { command, decision }
    }

    pub fn command(&self) -> &AllocationCommand {
        &self.command
    }

    pub fn decision(&self) -> &Decision {
        &self.decision
    }
}

impl ToXContent for RerouteExplanation {
    fn to_xcontent(&self) -> Value {
        object([
            ("command", json!(self.command.name())),
            ("parameters", self.command.parameters()),
            ("decisions", Value::Array(self.decision.entries())),
        ])
    }
}

/// Ordered explanations for every command of a reroute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingExplanations {
    explanations: Vec<RerouteExplanation>,
}

impl RoutingExplanations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, explanation: RerouteExplanation) -> Self {
        self.explanations.push(explanation);
        self
    }

    pub fn push(&mut self, explanation: RerouteExplanation) {
        self.explanations.push(explanation);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RerouteExplanation> {
        self.explanations.iter()
    }

    pub fn len(&self) -> usize {
        self.explanations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explanations.is_empty()
    }
}

impl ToXContent for RoutingExplanations {
    fn to_xcontent(&self) -> Value {
        self.explanations.to_xcontent()
    }
}
