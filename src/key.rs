//! Cache-key values and the `--explain` style key descriptions.
//!
//! An [`ActionKey`] encodes all of the significant behaviour of an action
//! that might affect its outputs, excluding the names and contents of the
//! declared input artifacts, which the cache layer compares separately by
//! content identity. If the work an action would perform changes, its key
//! must change.
//!
//! Keys are produced with a [`KeyBuilder`], which folds a *logic version*
//! stamp into the hash. Bumping that stamp whenever the implementation of an
//! action kind changes invalidates every prior cache entry for that kind.

use std::borrow::Cow;
use std::fmt;

/// A 32 byte digest over everything that feeds into an action's behaviour.
///
/// Two actions with equal keys perform the same work, provided their input
/// files also match by name and content. The key is an opaque value; its
/// only operations are comparison and display.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey([u8; 32]);

impl ActionKey {
    pub fn to_hex(self) -> String {
        use fmt::Write;

        let mut acc = String::with_capacity(64);
        for byte in self.0 {
            write!(acc, "{byte:02x}").expect("writing to a String cannot fail");
        }

        acc
    }
}

impl fmt::Debug for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionKey({})", self.to_hex())
    }
}

/// Incrementally hashes the fields that determine an action's behaviour.
///
/// Every field is framed with its length before hashing, so neighbouring
/// fields cannot run into each other and produce accidental collisions.
pub struct KeyBuilder {
    hasher: blake3::Hasher,
}

impl KeyBuilder {
    /// Starts a key for one kind of action.
    ///
    /// `mnemonic` names the action kind (for example `Compile`), and
    /// `logic_version` is the stamp that changes whenever the code
    /// implementing that kind changes behaviour.
    pub fn new(mnemonic: &str, logic_version: &str) -> Self {
        let mut builder = Self {
            hasher: blake3::Hasher::new(),
        };
        builder.push(mnemonic.as_bytes());
        builder.push(logic_version.as_bytes());
        builder
    }

    /// Folds a named field into the key.
    pub fn field(mut self, name: &str, value: impl AsRef<[u8]>) -> Self {
        self.push(name.as_bytes());
        self.push(value.as_ref());
        self
    }

    pub fn finish(self) -> ActionKey {
        ActionKey(self.hasher.finalize().into())
    }

    fn push(&mut self, bytes: &[u8]) {
        self.hasher.update(&(bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
    }
}

/// Human-readable explanation of what fed into an action's key.
///
/// Renders the diagnostic text format consumed by `--explain` and staleness
/// reporting: the first line is a free-form summary, and every following
/// line is a two-space indented `Field: value` pair. Values containing
/// newlines or shell-meaningful characters are escaped on the way in.
///
/// ```
/// use tsumiki::KeyDescription;
///
/// let text = KeyDescription::new("Compiling foo.c")
///     .field("Command", "/usr/bin/gcc")
///     .field("Argument", "-c")
///     .render();
///
/// assert_eq!(text, "Compiling foo.c\n  Command: /usr/bin/gcc\n  Argument: '-c'");
/// ```
pub struct KeyDescription {
    summary: String,
    fields: Vec<(String, String)>,
}

impl KeyDescription {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            fields: Vec::new(),
        }
    }

    /// Appends one `Field: value` line, escaping the value if needed.
    pub fn field(mut self, name: impl Into<String>, value: &str) -> Self {
        self.fields
            .push((name.into(), shell_escape(value).into_owned()));
        self
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KeyDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        for (name, value) in &self.fields {
            write!(f, "\n  {name}: {value}")?;
        }
        Ok(())
    }
}

/// Quotes a value so it survives verbatim inside diagnostic text that may
/// end up pasted into a shell.
///
/// Values made only of unproblematic characters pass through unchanged;
/// everything else is wrapped in single quotes, with embedded single quotes
/// rendered as `'\''`.
pub(crate) fn shell_escape(value: &str) -> Cow<'_, str> {
    fn safe(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '=' | '.' | '/' | ':' | '@' | '%' | ',')
    }

    if !value.is_empty() && value.chars().all(safe) {
        return Cow::Borrowed(value);
    }

    let mut acc = String::with_capacity(value.len() + 2);
    acc.push('\'');
    for c in value.chars() {
        match c {
            '\'' => acc.push_str("'\\''"),
            c => acc.push(c),
        }
    }
    acc.push('\'');

    Cow::Owned(acc)
}
