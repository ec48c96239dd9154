//! Typed values for control and changelog fields, and the parsers that produce them.
use crate::error::{PriorityError, RelationshipError, UrgencyError};
use std::str::FromStr;

/// Input to a parser that accepts either a textual token or an enum ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumValue<'a> {
    /// A token such as `>=` or `extra`
    Text(&'a str),
    /// The ordinal of an enum value
    Ordinal(i64),
}

impl<'a> From<&'a str> for EnumValue<'a> {
    fn from(s: &'a str) -> Self {
        EnumValue::Text(s)
    }
}

impl<'a> From<&'a String> for EnumValue<'a> {
    fn from(s: &'a String) -> Self {
        EnumValue::Text(s.as_str())
    }
}

impl From<i64> for EnumValue<'_> {
    fn from(v: i64) -> Self {
        EnumValue::Ordinal(v)
    }
}

impl From<i32> for EnumValue<'_> {
    fn from(v: i32) -> Self {
        EnumValue::Ordinal(v as i64)
    }
}

/// Priority of a package
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    /// Required
    Required,

    /// Important
    Important,

    /// Standard
    Standard,

    /// Optional
    Optional,

    /// Extra
    Extra,
}

impl Priority {
    /// All priorities, in ordinal order.
    pub const ALL: [Priority; 5] = [
        Priority::Required,
        Priority::Important,
        Priority::Standard,
        Priority::Optional,
        Priority::Extra,
    ];

    /// The ordinal of this priority.
    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Look up a priority by ordinal.
    pub fn from_ordinal(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Priority::Required => "required",
            Priority::Important => "important",
            Priority::Standard => "standard",
            Priority::Optional => "optional",
            Priority::Extra => "extra",
        })
    }
}

impl FromStr for Priority {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "required" => Ok(Priority::Required),
            "important" => Ok(Priority::Important),
            "standard" => Ok(Priority::Standard),
            "optional" => Ok(Priority::Optional),
            "extra" => Ok(Priority::Extra),
            _ => Err(PriorityError::Unknown(s.to_string())),
        }
    }
}

/// Parse a priority from its name (in any case) or its ordinal.
///
/// A numeric string such as `"4"` is treated as an ordinal, since that is how
/// a priority stored as a number ends up in a control file.
pub fn parse_priority<'a>(value: impl Into<EnumValue<'a>>) -> Result<Priority, PriorityError> {
    match value.into() {
        EnumValue::Text(s) => match s.trim().parse::<i64>() {
            Ok(n) => Priority::from_ordinal(n).ok_or(PriorityError::OutOfRange(n)),
            Err(_) => s.parse(),
        },
        EnumValue::Ordinal(n) => Priority::from_ordinal(n).ok_or(PriorityError::OutOfRange(n)),
    }
}

/// Urgency of a particular package version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Urgency {
    /// Low
    #[default]
    Low,
    /// Medium
    Medium,
    /// High
    High,
    /// Emergency
    Emergency,
    /// Critical
    Critical,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Urgency::Low => f.write_str("low"),
            Urgency::Medium => f.write_str("medium"),
            Urgency::High => f.write_str("high"),
            Urgency::Emergency => f.write_str("emergency"),
            Urgency::Critical => f.write_str("critical"),
        }
    }
}

impl FromStr for Urgency {
    type Err = UrgencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(Urgency::Low),
            "MEDIUM" => Ok(Urgency::Medium),
            "HIGH" => Ok(Urgency::High),
            "EMERGENCY" => Ok(Urgency::Emergency),
            "CRITICAL" => Ok(Urgency::Critical),
            other => Err(UrgencyError(other.to_string())),
        }
    }
}

/// Parse the value of the `urgency` keyword of a changelog header.
///
/// The value is a level, optionally followed by a commentary in parentheses:
///
/// ```
/// use debian_package::fields::{parse_urgency, Urgency};
///
/// assert_eq!(parse_urgency("medium").unwrap(), (Urgency::Medium, None));
/// assert_eq!(
///     parse_urgency("high (EMERGENCY if exposed)").unwrap(),
///     (Urgency::High, Some("EMERGENCY if exposed".to_string()))
/// );
/// ```
///
/// Only the first ` (` separates the level from the commentary and only one
/// trailing `)` is removed, so parentheses nested in the commentary survive.
/// `level ()` yields an empty commentary, which is distinct from none at all.
pub fn parse_urgency(s: &str) -> Result<(Urgency, Option<String>), UrgencyError> {
    let s = s.trim();
    let (level, commentary) = match s.split_once(" (") {
        Some((level, rest)) => (level, Some(rest.strip_suffix(')').unwrap_or(rest))),
        None => (s, None),
    };
    let urgency = level.parse()?;
    Ok((urgency, commentary.map(|c| c.to_string())))
}

/// Version relationship in a package relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relationship {
    /// `<<`
    StrictlyEarlier,
    /// `<=`
    EarlierOrEqual,
    /// `=`
    Equal,
    /// `>=`
    LaterOrEqual,
    /// `>>`
    StrictlyLater,
}

/// Accepted spellings of each relationship, indexed by ordinal. The first one
/// is canonical.
const RELATIONSHIP_STRINGS: &[(Relationship, &[&str])] = &[
    (
        Relationship::StrictlyEarlier,
        &[
            "<<",
            "<",
            "strictly earlier",
            "strictly_earlier",
            "less than",
            "less_than",
            "lt",
        ],
    ),
    (
        Relationship::EarlierOrEqual,
        &[
            "<=",
            "less or equal",
            "less_or_equal",
            "leq",
            "earlier or equal",
            "earlier_or_equal",
            "less than or equal to",
            "less_than_or_equal_to",
        ],
    ),
    (
        Relationship::Equal,
        &["=", "==", "===", "equal", "eq", "equal to", "equals"],
    ),
    (
        Relationship::LaterOrEqual,
        &[
            ">=",
            "greater or equal",
            "greater_or_equal",
            "geq",
            "later or equal",
            "later_or_equal",
            "greater than or equal to",
            "greater_than_or_equal_to",
        ],
    ),
    (
        Relationship::StrictlyLater,
        &[
            ">>",
            ">",
            "greater than",
            "greater_than",
            "gt",
            "strictly later",
            "strictly_later",
        ],
    ),
];

impl Relationship {
    /// All relationships, in ordinal order.
    pub const ALL: [Relationship; 5] = [
        Relationship::StrictlyEarlier,
        Relationship::EarlierOrEqual,
        Relationship::Equal,
        Relationship::LaterOrEqual,
        Relationship::StrictlyLater,
    ];

    /// The ordinal of this relationship.
    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Look up a relationship by ordinal.
    pub fn from_ordinal(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Every spelling accepted for this relationship, canonical first.
    pub fn synonyms(self) -> &'static [&'static str] {
        RELATIONSHIP_STRINGS[self as usize].1
    }

    /// The canonical operator, as written in control files.
    pub fn canonical(self) -> &'static str {
        self.synonyms()[0]
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.canonical())
    }
}

impl FromStr for Relationship {
    type Err = RelationshipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        RELATIONSHIP_STRINGS
            .iter()
            .find(|(_, strings)| strings.contains(&needle.as_str()))
            .map(|(r, _)| *r)
            .ok_or_else(|| RelationshipError::Unknown(s.to_string()))
    }
}

/// Parse a relationship from any of its spellings or from its ordinal.
///
/// ```
/// use debian_package::fields::{parse_relationship, Relationship};
///
/// assert_eq!(parse_relationship(">=").unwrap(), Relationship::LaterOrEqual);
/// assert_eq!(parse_relationship("Less Than").unwrap(), Relationship::StrictlyEarlier);
/// assert_eq!(parse_relationship(2i64).unwrap(), Relationship::Equal);
/// assert!(parse_relationship(-1i64).is_err());
/// ```
pub fn parse_relationship<'a>(
    value: impl Into<EnumValue<'a>>,
) -> Result<Relationship, RelationshipError> {
    match value.into() {
        EnumValue::Text(s) => s.parse(),
        EnumValue::Ordinal(n) => {
            Relationship::from_ordinal(n).ok_or(RelationshipError::OutOfRange(n))
        }
    }
}

/// Version of Debian Policy a source package complies with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardsVersion {
    /// Major version
    pub major_version: u32,

    /// Minor version
    pub minor_version: u32,

    /// Major patch level
    pub major_patch: Option<u32>,

    /// Minor patch level
    pub minor_patch: Option<u32>,
}

impl std::fmt::Display for StandardsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}", self.major_version, self.minor_version)?;
        if let Some(major_patch) = self.major_patch {
            write!(f, ".{}", major_patch)?;
            if let Some(minor_patch) = self.minor_patch {
                write!(f, ".{}", minor_patch)?;
            }
        }
        Ok(())
    }
}

impl FromStr for StandardsVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Invalid Standards-Version {:?}: {}", s, e))?;
        match parts.as_slice() {
            [major, minor, rest @ ..] if rest.len() <= 2 => Ok(Self {
                major_version: *major,
                minor_version: *minor,
                major_patch: rest.first().copied(),
                minor_patch: rest.get(1).copied(),
            }),
            _ => Err(format!(
                "Invalid Standards-Version {:?}: expected 2 to 4 components",
                s
            )),
        }
    }
}
