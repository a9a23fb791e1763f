//! Command reference grammar: `namespace/name@versionSpec`.
//!
//! Pure parsing only. Ranges and tags are never expanded here; the
//! Screwdriver API resolves them to a concrete version.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::CmdError;

/// `namespace/name@versionSpec`. Namespace and name are word characters and
/// hyphens; the version part is checked separately against the sub-grammars.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^([\w-]+)/([\w-]+)@([^/@\s]+)$").expect("valid regex")
});

/// `namespace/name` without a version, as taken by `promote` and `removeTag`.
static COMMAND_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^([\w-]+)/([\w-]+)$").expect("valid regex")
});

/// Caret ranges and explicit pinning: `^1.2.3`, `1.2.3`.
static CARET_OR_PINNED_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(\^)?\d(\.\d){2}$").expect("valid regex")
});

/// Tilde ranges: `~1.2.3`, `~1.2`, `~1`.
static TILDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^~\d(\.\d)?(\.\d)?$").expect("valid regex")
});

/// X-ranges: `1.2.*`, `1.x`, `1`, `*`.
static X_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(?:(\d+)\.)?(?:(\d+)\.)?([\*x]|\d+)$").expect("valid regex")
});

/// Tags: `latest`, `stable`, `feature-abc`. Must start with a lowercase letter.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z][\w.-]+$").expect("valid regex")
});

/// Which sub-grammar a version spec matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSpecKind {
    Exact,
    Caret,
    Tilde,
    XRange,
    Tag,
}

impl VersionSpecKind {
    /// Classify a version spec, or `None` when it matches no sub-grammar.
    #[must_use]
    pub fn classify(version: &str) -> Option<Self> {
        if CARET_OR_PINNED_RE.is_match(version) {
            if version.starts_with('^') {
                return Some(Self::Caret);
            }
            return Some(Self::Exact);
        }
        if TILDE_RE.is_match(version) {
            return Some(Self::Tilde);
        }
        if X_RANGE_RE.is_match(version) {
            return Some(Self::XRange);
        }
        if TAG_RE.is_match(version) {
            return Some(Self::Tag);
        }
        None
    }
}

/// Returns `true` if `tag` is a valid tag name.
#[must_use]
pub fn is_valid_tag(tag: &str) -> bool {
    TAG_RE.is_match(tag)
}

/// A parsed `namespace/name@versionSpec` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReference {
    pub namespace: String,
    pub name: String,
    pub version_spec: String,
}

impl CommandReference {
    /// Parse a single token.
    ///
    /// # Errors
    ///
    /// `MalformedReference` if the token is not `namespace/name@something`,
    /// `InvalidVersionSpec` if the version part matches none of the exact,
    /// caret, tilde, x-range or tag grammars.
    pub fn parse(token: &str) -> Result<Self, CmdError> {
        let caps = REFERENCE_RE
            .captures(token)
            .ok_or_else(|| CmdError::MalformedReference(token.to_string()))?;
        let version = &caps[3];
        if VersionSpecKind::classify(version).is_none() {
            return Err(CmdError::InvalidVersionSpec {
                reference: token.to_string(),
                version: version.to_string(),
            });
        }
        Ok(Self {
            namespace: caps[1].to_string(),
            name: caps[2].to_string(),
            version_spec: version.to_string(),
        })
    }

    /// Build a reference pointing at `tag` of `namespace/name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTagName` if `tag` does not satisfy the tag grammar.
    pub fn tagged(namespace: &str, name: &str, tag: &str) -> Result<Self, CmdError> {
        if !is_valid_tag(tag) {
            return Err(CmdError::InvalidTagName(tag.to_string()));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            version_spec: tag.to_string(),
        })
    }

    /// `namespace/name`, without the version spec.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl fmt::Display for CommandReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.namespace, self.name, self.version_spec)
    }
}

impl FromStr for CommandReference {
    type Err = CmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Return the first argument that parses as a command reference, with its index.
///
/// First match wins: an argument meant for the executed command that happens
/// to look like a reference is taken as the reference if it comes first.
///
/// # Errors
///
/// Returns `NoReferenceFound` if no argument parses.
pub fn scan_args<S: AsRef<str>>(args: &[S]) -> Result<(CommandReference, usize), CmdError> {
    args.iter()
        .enumerate()
        .find_map(|(i, arg)| CommandReference::parse(arg.as_ref()).ok().map(|r| (r, i)))
        .ok_or(CmdError::NoReferenceFound)
}

/// Split `namespace/name` into its two halves.
///
/// # Errors
///
/// Returns `InvalidCommandName` unless the input is exactly two word/hyphen
/// segments separated by one `/`.
pub fn parse_command_name(input: &str) -> Result<(String, String), CmdError> {
    let caps = COMMAND_NAME_RE
        .captures(input)
        .ok_or_else(|| CmdError::InvalidCommandName(input.to_string()))?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}
