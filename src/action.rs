//! The action identity contract consumed by the graph and the executor.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::artifact::Artifact;
use crate::key::ActionKey;

/// Shared handle to an action. The graph never owns actions; it only holds
/// these references, and actions stay alive for as long as any target or
/// graph entry refers to them.
pub type ActionRef = Arc<dyn Action>;

/// A unit of work with declared input and output artifacts.
///
/// Concrete action kinds (compile, link, archive, ...) are supplied by the
/// analysis layer; the graph treats every action as an opaque capability
/// bundle and never branches on the concrete kind. All methods here are
/// side-effect-free queries over already-validated action data and must not
/// fail.
pub trait Action: Send + Sync {
    /// The declared input artifacts, in a stable order. While
    /// [`inputs_known`](Self::inputs_known) is false this list may be
    /// incomplete, but whatever is listed must still be built first.
    fn inputs(&self) -> &[Artifact];

    /// The declared output artifacts. Never empty, and only derived
    /// artifacts may appear here.
    fn outputs(&self) -> &[Artifact];

    /// A value encoding all of the significant behaviour of this action,
    /// excluding the names and contents of its input artifacts. See
    /// [`ActionKey`] for the contract.
    fn key(&self) -> ActionKey;

    /// Human-readable description of what fed into [`key`](Self::key), in
    /// the [`KeyDescription`](crate::KeyDescription) format. Diagnostics
    /// only; `None` means no extra information is available.
    fn describe_key(&self) -> Option<String> {
        None
    }

    /// Display text shown while the action runs. No effect on correctness
    /// or caching.
    fn progress_message(&self) -> Option<String> {
        None
    }

    /// True iff the declared input set is known to be complete.
    ///
    /// Any builder must unconditionally execute an action for which this
    /// returns false, regardless of what its dependency analysis concludes.
    fn inputs_known(&self) -> bool {
        true
    }

    /// True iff [`inputs_known`](Self::inputs_known) may ever return false.
    fn discovers_inputs(&self) -> bool {
        false
    }
}

/// Whether two separately constructed actions may be treated as the same
/// shared action.
///
/// Many targets legitimately point at identical work. Two actions are
/// shareable when their keys, input lists and output lists all match, and
/// neither discovers inputs; an action whose true input set is not yet known
/// cannot prove it performs the same work as anything else.
pub fn shareable(a: &dyn Action, b: &dyn Action) -> bool {
    if a.discovers_inputs() || b.discovers_inputs() {
        return false;
    }

    a.key() == b.key() && a.inputs() == b.inputs() && a.outputs() == b.outputs()
}

/// The input-discovery state of one action instance.
///
/// An ordinary action is permanently in the known state. An action that
/// discovers inputs (for example a C compile, whose headers are reported by
/// the compiler) starts out unknown; after its first execution the executor
/// records the discovered set and calls [`mark_known`](Self::mark_known).
/// The transition is one-way per instance.
#[derive(Debug)]
pub struct InputState {
    discovers: bool,
    known: AtomicBool,
}

impl InputState {
    /// State for an action whose declared inputs are always complete.
    pub fn fixed() -> Self {
        Self {
            discovers: false,
            known: AtomicBool::new(true),
        }
    }

    /// State for an action whose true inputs are learned at execution time.
    pub fn discovering() -> Self {
        Self {
            discovers: true,
            known: AtomicBool::new(false),
        }
    }

    pub fn discovers_inputs(&self) -> bool {
        self.discovers
    }

    pub fn inputs_known(&self) -> bool {
        self.known.load(Ordering::Acquire)
    }

    /// Records that the executor has discovered the complete input set.
    pub fn mark_known(&self) {
        self.known.store(true, Ordering::Release);
    }
}
