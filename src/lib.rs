#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod action;
mod artifact;
mod error;
mod graph;
mod key;
mod queue;
#[cfg(test)]
mod testing;

pub use crate::action::{Action, ActionRef, InputState, shareable};
pub use crate::artifact::{Artifact, ArtifactRoot};
pub use crate::error::{ActionConflict, DriverError};
pub use crate::graph::ActionGraph;
pub use crate::key::{ActionKey, KeyBuilder, KeyDescription};
pub use crate::queue::{JobResult, WorkQueue};

/// Installs a global `tracing` subscriber honoring the `RUST_LOG` filter.
///
/// Convenience for binaries embedding the crate; libraries should leave
/// subscriber setup to the host application.
#[cfg(feature = "logging")]
pub fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
