//! The concurrent output-artifact → generating-action map.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::action::{ActionRef, shareable};
use crate::artifact::Artifact;
use crate::error::ActionConflict;

/// Concurrent mapping from every output artifact to the action currently
/// responsible for generating it.
///
/// The graph is the single synchronization point for the parallel analysis
/// phase: workers register the actions of freshly analyzed targets and
/// unregister them again when a target is invalidated, possibly racing with
/// replacements for overlapping outputs. It upholds three invariants:
///
/// * at any instant, each artifact maps to at most one action;
/// * two non-shareable actions are never simultaneously registered for the
///   same artifact — one registration fails with an [`ActionConflict`]
///   before the illegal state can be observed;
/// * a [`register_action`](Self::register_action) call commits either all
///   of an action's outputs or none of them.
///
/// Operations are linearizable per artifact. The map is sharded, no lock
/// spans unrelated artifacts, and every critical section is bounded by a
/// single entry probe, so the graph stays responsive under tens of
/// thousands of interleaved calls.
///
/// A graph is an explicitly constructed value scoped to one build
/// invocation, never process-wide state; independent invocations (and
/// tests) each get their own.
#[derive(Default)]
pub struct ActionGraph {
    map: DashMap<Artifact, ActionRef>,
}

impl ActionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action as the generator of all of its declared outputs.
    ///
    /// Each output must be either unmapped, or already mapped to the same
    /// or a [`shareable`] action, in which case the existing entry is kept
    /// and the call is an idempotent no-op for that output. If any output
    /// is owned by a different action the whole call fails: outputs claimed
    /// earlier in the same call are rolled back, the graph is left exactly
    /// as it was, and the returned conflict carries both actions along with
    /// the first contested artifact.
    ///
    /// Two concurrent calls racing for the same free artifact are safe:
    /// exactly one claims it, and the other either shares the entry or
    /// observes a conflict.
    pub fn register_action(&self, action: &ActionRef) -> Result<(), ActionConflict> {
        debug_assert!(!action.outputs().is_empty(), "action declares no outputs");

        let mut claimed: Vec<&Artifact> = Vec::new();

        for output in action.outputs() {
            let existing = match self.map.entry(output.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(action));
                    claimed.push(output);
                    continue;
                }
                Entry::Occupied(slot) => {
                    let current = slot.get();
                    if Arc::ptr_eq(current, action) || shareable(current.as_ref(), action.as_ref()) {
                        continue;
                    }
                    Arc::clone(current)
                }
            };

            // The entry guard is gone by this point; rolling back while
            // still holding it could deadlock on a shared shard.
            self.release(action, &claimed);
            tracing::debug!(artifact = %output, "action conflict detected");

            return Err(ActionConflict::new(existing, Arc::clone(action), output.clone()));
        }

        Ok(())
    }

    /// Removes the action's entries for every output it still owns.
    ///
    /// Outputs that are unmapped, or that a concurrent registration has
    /// already handed to another action, are left untouched; a stale
    /// unregister is not an error. Removal requires the exact registered
    /// instance — a shareable twin registered by a still-live target keeps
    /// its entry.
    pub fn unregister_action(&self, action: &ActionRef) {
        self.release(action, &action.outputs().iter().collect::<Vec<_>>());
    }

    /// Current generator of an artifact, if any.
    pub fn generating_action(&self, artifact: &Artifact) -> Option<ActionRef> {
        self.map.get(artifact).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of artifacts currently mapped to a generating action.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes each listed artifact only if this exact instance owns it.
    fn release(&self, action: &ActionRef, artifacts: &[&Artifact]) {
        for &artifact in artifacts {
            self.map
                .remove_if(artifact, |_, current| Arc::ptr_eq(current, action));
        }
    }
}
