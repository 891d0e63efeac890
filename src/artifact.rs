use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

/// The kind of root an [`Artifact`] lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactRoot {
    /// A checked-in file; never produced by an action.
    Source,
    /// A file placed under the output tree by some action.
    Derived,
}

/// Identity of a single producible file: its logical path plus the kind of
/// root it belongs to.
///
/// Artifacts are immutable once created and compare by identity, so two
/// artifacts with the same path and root are the same artifact. They are
/// created by the analysis layer and live for the duration of one build
/// invocation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    path: Utf8PathBuf,
    root: ArtifactRoot,
}

impl Artifact {
    /// Creates an artifact rooted in the source tree.
    pub fn source(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: ArtifactRoot::Source,
        }
    }

    /// Creates an artifact rooted in the output tree.
    pub fn derived(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: ArtifactRoot::Derived,
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn root(&self) -> ArtifactRoot {
        self.root
    }

    /// True for source artifacts, which no action may declare as an output.
    pub fn is_source(&self) -> bool {
        self.root == ArtifactRoot::Source
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.root {
            ArtifactRoot::Source => "source",
            ArtifactRoot::Derived => "derived",
        };
        write!(f, "Artifact({kind}:{})", self.path)
    }
}
