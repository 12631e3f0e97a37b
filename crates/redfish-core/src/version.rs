//! Firmware version parsing and version-gated schema selection
//!
//! Management controllers change the shape of some resources between
//! firmware releases. A [`SchemaRules`] set maps ordered version ranges to a
//! layout tag; [`select_schema`] parses a firmware version string and returns
//! the tag of the first rule whose constraint the version satisfies.
//!
//! Versions are dotted numeric strings of any length (`3.21.26.22`).
//! Components compare numerically, and missing trailing components count as
//! zero, so `3.0` and `3.0.0.0` are equal.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{VersionError, VersionResult};

/// A dotted numeric firmware version
#[derive(Debug, Clone)]
pub struct FirmwareVersion {
    components: Vec<u64>,
}

impl FirmwareVersion {
    /// Build a version from its numeric components
    pub fn from_components(components: &[u64]) -> Self {
        Self {
            components: components.to_vec(),
        }
    }

    /// Numeric components, most significant first
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for FirmwareVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        if body.is_empty() {
            return Err(VersionError::Parse(s.to_string()));
        }

        let components = body
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionError::Parse(s.to_string()));
                }
                part.parse::<u64>()
                    .map_err(|_| VersionError::Parse(s.to_string()))
            })
            .collect::<VersionResult<Vec<_>>>()?;

        Ok(Self { components })
    }
}

impl Ord for FirmwareVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for FirmwareVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FirmwareVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FirmwareVersion {}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Comparison operator of a [`VersionConstraint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// A single-sided version range such as `<= 3.15.17.15`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    pub op: Comparator,
    pub version: FirmwareVersion,
}

impl VersionConstraint {
    pub fn new(op: Comparator, version: FirmwareVersion) -> Self {
        Self { op, version }
    }

    /// Check whether `version` satisfies this constraint
    pub fn matches(&self, version: &FirmwareVersion) -> bool {
        let ord = version.cmp(&self.version);
        match self.op {
            Comparator::Eq => ord == Ordering::Equal,
            Comparator::Lt => ord == Ordering::Less,
            Comparator::Le => ord != Ordering::Greater,
            Comparator::Gt => ord == Ordering::Greater,
            Comparator::Ge => ord != Ordering::Less,
        }
    }
}

impl FromStr for VersionConstraint {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Two-character operators must be tried before their prefixes
        let (op, rest) = [
            (">=", Comparator::Ge),
            ("<=", Comparator::Le),
            (">", Comparator::Gt),
            ("<", Comparator::Lt),
            ("=", Comparator::Eq),
        ]
        .iter()
        .find_map(|(symbol, op)| trimmed.strip_prefix(symbol).map(|rest| (*op, rest)))
        .unwrap_or((Comparator::Eq, trimmed));

        let version = rest
            .trim()
            .parse()
            .map_err(|_| VersionError::InvalidConstraint(s.to_string()))?;

        Ok(Self { op, version })
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op.symbol(), self.version)
    }
}

/// A version range paired with the layout tag it selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRule<T> {
    pub constraint: VersionConstraint,
    pub tag: T,
}

/// Ordered list of schema rules; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRules<T> {
    rules: Vec<SchemaRule<T>>,
}

impl<T> Default for SchemaRules<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> SchemaRules<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule built from an already parsed constraint
    pub fn with_rule(mut self, constraint: VersionConstraint, tag: T) -> Self {
        self.rules.push(SchemaRule { constraint, tag });
        self
    }

    /// Append a rule parsed from a constraint string like `"> 3.21.26.22"`
    pub fn rule(self, constraint: &str, tag: T) -> VersionResult<Self> {
        let constraint = constraint.parse()?;
        Ok(self.with_rule(constraint, tag))
    }

    /// Return the tag of the first rule `version` satisfies
    pub fn select(&self, version: &FirmwareVersion) -> Option<&T> {
        self.rules
            .iter()
            .find(|rule| rule.constraint.matches(version))
            .map(|rule| &rule.tag)
    }

    pub fn rules(&self) -> &[SchemaRule<T>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parse `version` and pick the layout tag of the first matching rule
///
/// Fails with [`VersionError::Parse`] when the string is not a dotted numeric
/// version and with [`VersionError::Unsupported`] when no rule matches.
pub fn select_schema<T: Clone + fmt::Debug>(
    version: &str,
    rules: &SchemaRules<T>,
) -> VersionResult<T> {
    let parsed: FirmwareVersion = version.parse()?;
    let tag = rules
        .select(&parsed)
        .cloned()
        .ok_or_else(|| VersionError::Unsupported(parsed.to_string()))?;
    debug!(%parsed, ?tag, "Selected schema layout");
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Layout {
        Old,
        New,
    }

    fn rules() -> SchemaRules<Layout> {
        SchemaRules::new()
            .rule("<= 3.15.17.15", Layout::Old)
            .and_then(|r| r.rule("<= 3.21.26.22", Layout::New))
            .and_then(|r| r.rule("> 3.21.26.22", Layout::New))
            .unwrap()
    }

    #[test]
    fn test_parse_four_component_version() {
        let v: FirmwareVersion = "3.21.26.22".parse().unwrap();
        assert_eq!(v.components(), &[3, 21, 26, 22]);
        assert_eq!(v.to_string(), "3.21.26.22");
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("3..1")]
    #[case("3.1-beta")]
    #[case("3.1.")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            input.parse::<FirmwareVersion>(),
            Err(VersionError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_components_compare_as_zero() {
        let a: FirmwareVersion = "3.0".parse().unwrap();
        let b: FirmwareVersion = "3.0.0.0".parse().unwrap();
        assert_eq!(a, b);
        assert!("3.10".parse::<FirmwareVersion>().unwrap() > "3.9.99".parse().unwrap());
    }

    #[rstest]
    #[case("<= 3.15.17.15", Comparator::Le)]
    #[case(">=1.2", Comparator::Ge)]
    #[case("> 3.21.26.22", Comparator::Gt)]
    #[case("< 2", Comparator::Lt)]
    #[case("= 2.1", Comparator::Eq)]
    #[case("2.1", Comparator::Eq)]
    fn test_constraint_parsing(#[case] input: &str, #[case] op: Comparator) {
        let c: VersionConstraint = input.parse().unwrap();
        assert_eq!(c.op, op);
    }

    #[test]
    fn test_constraint_rejects_garbage() {
        assert!(matches!(
            "<= x.y".parse::<VersionConstraint>(),
            Err(VersionError::InvalidConstraint(_))
        ));
    }

    #[test]
    fn test_select_old_layout() {
        assert_eq!(select_schema("3.15.17.15", &rules()).unwrap(), Layout::Old);
        assert_eq!(select_schema("2.70.70.70", &rules()).unwrap(), Layout::Old);
    }

    #[test]
    fn test_select_new_layout() {
        assert_eq!(select_schema("3.21.26.23", &rules()).unwrap(), Layout::New);
        assert_eq!(select_schema("4.40.0.0", &rules()).unwrap(), Layout::New);
    }

    #[test]
    fn test_boundary_takes_first_listed_rule() {
        // 3.21.26.22 satisfies only the second rule; the first listed match wins
        assert_eq!(select_schema("3.21.26.22", &rules()).unwrap(), Layout::New);

        let overlapping = SchemaRules::new()
            .rule("<= 4.0", Layout::New)
            .and_then(|r| r.rule("<= 3.21.26.22", Layout::Old))
            .unwrap();
        assert_eq!(select_schema("3.0", &overlapping).unwrap(), Layout::New);
    }

    #[test]
    fn test_no_matching_rule_is_an_error() {
        let partial = SchemaRules::new().rule("<= 1.0", Layout::Old).unwrap();
        assert_eq!(
            select_schema("2.0", &partial),
            Err(VersionError::Unsupported("2.0".to_string()))
        );
    }

    #[test]
    fn test_malformed_version_is_a_parse_error() {
        assert!(matches!(
            select_schema("latest", &rules()),
            Err(VersionError::Parse(_))
        ));
    }
}
