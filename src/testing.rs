//! Minimal concrete action used across unit tests.

use std::sync::Arc;

use crate::action::{Action, ActionRef, InputState};
use crate::artifact::Artifact;
use crate::key::{ActionKey, KeyBuilder, KeyDescription};

const LOGIC_VERSION: &str = "test-v1";

pub struct TestAction {
    name: String,
    inputs: Vec<Artifact>,
    outputs: Vec<Artifact>,
    state: InputState,
}

impl TestAction {
    pub fn new(name: &str, inputs: Vec<Artifact>, outputs: Vec<Artifact>) -> Self {
        Self {
            name: name.to_owned(),
            inputs,
            outputs,
            state: InputState::fixed(),
        }
    }

    /// An action that performs no work; twins of it are always shareable.
    pub fn no_effect(outputs: Vec<Artifact>) -> ActionRef {
        Arc::new(Self::new("no-effect", Vec::new(), outputs))
    }

    pub fn discovering(name: &str, inputs: Vec<Artifact>, outputs: Vec<Artifact>) -> Self {
        Self {
            name: name.to_owned(),
            inputs,
            outputs,
            state: InputState::discovering(),
        }
    }

    /// Stands in for the executor recording discovered inputs.
    pub fn mark_inputs_known(&self) {
        self.state.mark_known();
    }
}

impl Action for TestAction {
    fn inputs(&self) -> &[Artifact] {
        &self.inputs
    }

    fn outputs(&self) -> &[Artifact] {
        &self.outputs
    }

    fn key(&self) -> ActionKey {
        KeyBuilder::new("TestAction", LOGIC_VERSION)
            .field("name", &self.name)
            .finish()
    }

    fn describe_key(&self) -> Option<String> {
        Some(
            KeyDescription::new(format!("Test action {}", self.name))
                .field("Name", &self.name)
                .render(),
        )
    }

    fn progress_message(&self) -> Option<String> {
        Some(format!("Testing {}", self.name))
    }

    fn inputs_known(&self) -> bool {
        self.state.inputs_known()
    }

    fn discovers_inputs(&self) -> bool {
        self.state.discovers_inputs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_state_machine_through_the_trait() {
        let out = Artifact::derived("obj/foo.o");
        let plain = TestAction::new("plain", vec![], vec![out.clone()]);
        assert!(!plain.discovers_inputs());
        assert!(plain.inputs_known());

        let scanning = TestAction::discovering("scan", vec![], vec![out]);
        assert!(scanning.discovers_inputs());
        assert!(!scanning.inputs_known());

        scanning.mark_inputs_known();
        assert!(scanning.inputs_known());
    }
}
