//! Version requirement parsing and checking.
//!
//! A library dependency names the versions it accepts as either `latest`
//! (or an empty string) or a comma-separated list of specifiers that must
//! all match:
//!
//! - `1.2.0` or `==1.2.0` for an exact release
//! - `>=1.0`, `<2.0` and friends for ranges
//! - `>=1.0,<2.0` for compound ranges
//!
//! Versions are relaxed semver: `1` and `1.2` normalize to `1.0.0` and `1.2.0`.
//!
//! # Examples
//!
//! ```
//! use libman_index::version::{VersionRequirement, normalize_version};
//!
//! let req = VersionRequirement::parse(">=1.0,<2.0").unwrap();
//! assert!(req.matches(&normalize_version("1.4").unwrap()));
//! assert!(!req.matches(&normalize_version("2.0.0").unwrap()));
//!
//! assert!(VersionRequirement::parse(" Latest ").unwrap().is_latest());
//! ```

use semver::Version;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Gte,
    Gt,
    Lte,
    Lt,
    Eq,
    Ne,
}

impl CompareOp {
    fn symbol(self) -> &'static str {
        match self {
            CompareOp::Gte => ">=",
            CompareOp::Gt => ">",
            CompareOp::Lte => "<=",
            CompareOp::Lt => "<",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }
}

/// A single version specifier: an operator paired with a version.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Specifier {
    op: CompareOp,
    version: Version,
}

impl Specifier {
    fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            CompareOp::Gte => candidate >= &self.version,
            CompareOp::Gt => candidate > &self.version,
            CompareOp::Lte => candidate <= &self.version,
            CompareOp::Lt => candidate < &self.version,
            CompareOp::Eq => candidate == &self.version,
            CompareOp::Ne => candidate != &self.version,
        }
    }
}

/// A parsed version constraint that can be checked against concrete versions.
///
/// Two constraints are equal when their specifiers are, regardless of how
/// the original strings were spaced.
#[derive(Debug, Clone)]
pub struct VersionConstraint {
    specifiers: Vec<Specifier>,
    /// The original constraint string for display.
    raw: String,
}

impl VersionConstraint {
    /// Parse a constraint string such as `>=1.0,<2.0` or `1.2.3`.
    pub fn parse(constraint: &str) -> Result<Self> {
        let raw = constraint.trim().to_string();
        let mut specifiers = Vec::new();

        for part in raw.split(',').map(str::trim) {
            if part.is_empty() {
                continue;
            }
            specifiers.push(parse_specifier(part)?);
        }

        if specifiers.is_empty() {
            return Err(Error::VersionConstraintParse {
                constraint: raw,
                reason: "empty constraint".to_string(),
            });
        }

        Ok(Self { specifiers, raw })
    }

    /// Constraint matching exactly one version.
    pub fn exact(version: &Version) -> Self {
        Self {
            specifiers: vec![Specifier {
                op: CompareOp::Eq,
                version: version.clone(),
            }],
            raw: version.to_string(),
        }
    }

    /// Check if a version satisfies every specifier.
    pub fn satisfies(&self, version: &Version) -> bool {
        self.specifiers.iter().all(|spec| spec.matches(version))
    }

    /// The pinned version when this constraint is a single `==`.
    pub fn pinned(&self) -> Option<&Version> {
        match self.specifiers.as_slice() {
            [Specifier {
                op: CompareOp::Eq,
                version,
            }] => Some(version),
            _ => None,
        }
    }

    /// Return the original constraint string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Canonical spelling, e.g. `>=1.0.0,<2.0.0`.
    pub fn canonical(&self) -> String {
        self.specifiers
            .iter()
            .map(|s| format!("{}{}", s.op.symbol(), s.version))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl PartialEq for VersionConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.specifiers == other.specifiers
    }
}

impl Eq for VersionConstraint {}

impl std::fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// What a request or a dependency declaration accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionRequirement {
    /// Unconstrained: the newest release wins.
    #[default]
    Latest,
    /// Only releases satisfying the constraint.
    Constraint(VersionConstraint),
}

impl VersionRequirement {
    /// Parse a requirement. Empty input and `latest` (any case) mean [`Latest`](Self::Latest).
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        VersionConstraint::parse(trimmed).map(Self::Constraint)
    }

    /// Requirement pinned to exactly `version`.
    pub fn exact(version: &Version) -> Self {
        Self::Constraint(VersionConstraint::exact(version))
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }

    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Latest => true,
            Self::Constraint(c) => c.satisfies(version),
        }
    }
}

impl std::fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Constraint(c) => write!(f, "{c}"),
        }
    }
}

/// Parse a single specifier like `>=1.2` or `<2.0.0`.
fn parse_specifier(s: &str) -> Result<Specifier> {
    let (op, version_str) = if let Some(rest) = s.strip_prefix(">=") {
        (CompareOp::Gte, rest)
    } else if let Some(rest) = s.strip_prefix("<=") {
        (CompareOp::Lte, rest)
    } else if let Some(rest) = s.strip_prefix("!=") {
        (CompareOp::Ne, rest)
    } else if let Some(rest) = s.strip_prefix("==") {
        (CompareOp::Eq, rest)
    } else if let Some(rest) = s.strip_prefix('=') {
        (CompareOp::Eq, rest)
    } else if let Some(rest) = s.strip_prefix('>') {
        (CompareOp::Gt, rest)
    } else if let Some(rest) = s.strip_prefix('<') {
        (CompareOp::Lt, rest)
    } else {
        // Bare version implies ==
        (CompareOp::Eq, s)
    };

    let version = normalize_version(version_str).map_err(|e| Error::VersionConstraintParse {
        constraint: s.to_string(),
        reason: e.to_string(),
    })?;

    Ok(Specifier { op, version })
}

/// Normalize a relaxed version string to semver.
///
/// - `"2"` -> `2.0.0`
/// - `"1.2"` -> `1.2.0`
/// - `"1.2.3-beta"` -> `1.2.3-beta`
pub fn normalize_version(s: &str) -> Result<Version> {
    let s = s.trim();

    if let Ok(v) = Version::parse(s) {
        return Ok(v);
    }

    // Pad the numeric core, keeping any pre-release/build suffix
    let split_at = s.find(['-', '+']).unwrap_or(s.len());
    let (core, suffix) = s.split_at(split_at);
    let dots = core.matches('.').count();
    let padded = match dots {
        0 => format!("{core}.0.0{suffix}"),
        1 => format!("{core}.0{suffix}"),
        _ => s.to_string(),
    };

    Version::parse(&padded).map_err(|e| Error::InvalidVersion {
        version: s.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(s: &str) -> Version {
        normalize_version(s).unwrap()
    }

    // --- normalize_version ---

    #[rstest]
    #[case("1.2.3", "1.2.3")]
    #[case("1.2", "1.2.0")]
    #[case("2", "2.0.0")]
    #[case("  1.0.0  ", "1.0.0")]
    #[case("1.2-beta", "1.2.0-beta")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(v(input).to_string(), expected);
    }

    #[test]
    fn test_normalize_garbage_rejected() {
        assert!(normalize_version("abc").is_err());
        assert!(normalize_version("").is_err());
    }

    // --- VersionConstraint ---

    #[test]
    fn test_parse_compound() {
        let c = VersionConstraint::parse(">=1.0,<2.0").unwrap();
        assert_eq!(c.specifiers.len(), 2);
        assert!(c.satisfies(&v("1.5.0")));
        assert!(!c.satisfies(&v("2.0.0")));
        assert!(!c.satisfies(&v("0.9.9")));
    }

    #[test]
    fn test_bare_version_is_exact() {
        let c = VersionConstraint::parse("1.2").unwrap();
        assert_eq!(c.pinned(), Some(&v("1.2.0")));
        assert!(c.satisfies(&v("1.2.0")));
        assert!(!c.satisfies(&v("1.2.1")));
    }

    #[test]
    fn test_not_equal() {
        let c = VersionConstraint::parse("!=1.1.0").unwrap();
        assert!(c.satisfies(&v("1.2.0")));
        assert!(!c.satisfies(&v("1.1")));
        assert_eq!(c.pinned(), None);
    }

    #[test]
    fn test_equality_ignores_spelling() {
        let a = VersionConstraint::parse(">= 1.0 , < 2").unwrap();
        let b = VersionConstraint::parse(">=1.0.0,<2.0.0").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.canonical(), ">=1.0.0,<2.0.0");
    }

    #[test]
    fn test_parse_garbage_rejected() {
        assert!(VersionConstraint::parse(">=abc").is_err());
        assert!(VersionConstraint::parse(",").is_err());
    }

    // --- VersionRequirement ---

    #[rstest]
    #[case("")]
    #[case("latest")]
    #[case("LATEST")]
    #[case("  latest ")]
    fn test_latest_spellings(#[case] input: &str) {
        assert_eq!(
            VersionRequirement::parse(input).unwrap(),
            VersionRequirement::Latest
        );
    }

    #[test]
    fn test_requirement_display() {
        assert_eq!(VersionRequirement::Latest.to_string(), "latest");
        assert_eq!(
            VersionRequirement::parse(">=1.0").unwrap().to_string(),
            ">=1.0"
        );
        assert_eq!(VersionRequirement::exact(&v("2.0")).to_string(), "2.0.0");
    }

    #[test]
    fn test_latest_matches_anything() {
        assert!(VersionRequirement::Latest.matches(&v("0.0.1")));
    }
}
