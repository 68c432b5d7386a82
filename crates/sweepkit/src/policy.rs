//! Reclaimable-file policy.
//!
//! A single ordered pattern table decides which files count toward cleanup.
//! Each pattern is tested two ways against the lowercased file name:
//! equality with the extension (including the leading dot), and plain
//! substring containment. `thumbs.db` therefore matches `Thumbs.DB`, and
//! `.log` matches both `app.log` and `app.log.1`.
//!
//! Only the scanner consults the policy; cleanup trusts what the scan
//! recorded.

use std::borrow::Cow;
use std::path::Path;

/// Patterns matched by the default policy, in evaluation order.
pub const DEFAULT_PATTERNS: &[&str] = &[
    ".tmp",
    ".log",
    ".cache",
    ".old",
    ".bak",
    ".dmp",
    "thumbs.db",
    ".chk",
];

/// An ordered set of extension/substring patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    patterns: Vec<Cow<'static, str>>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.iter().map(|p| Cow::Borrowed(*p)).collect(),
        }
    }
}

impl Policy {
    /// Build a policy from custom patterns. Patterns are lowercased.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .map(Cow::Owned)
                .collect(),
        }
    }

    /// The patterns in evaluation order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(AsRef::as_ref)
    }

    /// Does a file name match the policy?
    pub fn matches(&self, file_name: &str) -> bool {
        self.matching_pattern(file_name).is_some()
    }

    /// The first pattern that matches a file name, if any.
    pub fn matching_pattern(&self, file_name: &str) -> Option<&str> {
        let name = file_name.to_lowercase();
        let ext = extension_of(&name);
        self.patterns()
            .find(|p| ext.as_deref() == Some(*p) || name.contains(*p))
    }

    /// Match on a path's final component. Paths without a UTF-8 file name
    /// are compared lossily.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|n| self.matches(&n.to_string_lossy()))
    }
}

/// Lowercased extension with its leading dot, `None` for dotfiles and names
/// without an extension.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
}
