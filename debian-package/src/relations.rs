//! Package relations, as used in `Depends`, `Build-Depends` and friends.
//!
//! ```
//! use debian_package::fields::Relationship;
//! use debian_package::relations::{parse_relations, Relation};
//!
//! let relations = parse_relations("debhelper (>= 9), python3").unwrap();
//! assert_eq!(relations[0].name, "debhelper");
//! assert_eq!(relations[0].relationship, Some(Relationship::LaterOrEqual));
//! assert_eq!(relations[0].version.as_deref(), Some("9"));
//! assert_eq!(relations[1], Relation::new("python3", None));
//! ```
use crate::error::RelationError;
use crate::fields::{parse_relationship, Relationship};
use regex::Regex;
use std::sync::LazyLock;

static RELATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?P<name>[^\s()]+)\s*             # Package name
        (?:\((?P<constraint>[^()]*)\))?   # Optional (relationship version)
        $",
    )
    .unwrap()
});

/// A relation to another package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relation {
    /// Name of the related package
    pub name: String,

    /// Version the relationship applies to
    pub version: Option<String>,

    /// How the version of the related package compares to `version`
    pub relationship: Option<Relationship>,
}

impl Relation {
    /// Create a new relation
    pub fn new(name: &str, version_constraint: Option<(Relationship, &str)>) -> Self {
        match version_constraint {
            Some((relationship, version)) => Self {
                name: name.to_string(),
                version: Some(version.to_string()),
                relationship: Some(relationship),
            },
            None => Self {
                name: name.to_string(),
                version: None,
                relationship: None,
            },
        }
    }

    /// The canonical operator of this relation, if it has one.
    pub fn relationship_string(&self) -> Option<&'static str> {
        self.relationship.map(Relationship::canonical)
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.name)?;
        match (&self.relationship, &self.version) {
            (Some(relationship), Some(version)) => write!(f, " ({} {})", relationship, version),
            (None, Some(version)) => write!(f, " ({})", version),
            _ => Ok(()),
        }
    }
}

impl std::str::FromStr for Relation {
    type Err = RelationError;

    /// Parse `name` or `name (relationship version)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segment = s.trim();
        let caps = RELATION_RE
            .captures(segment)
            .ok_or_else(|| RelationError::Malformed(segment.to_string()))?;
        let mut relation = Relation::new(&caps["name"], None);
        if let Some(constraint) = caps.name("constraint") {
            let tokens = constraint.as_str().split_whitespace().collect::<Vec<_>>();
            let [relationship, version] = tokens.as_slice() else {
                return Err(RelationError::Malformed(segment.to_string()));
            };
            relation.relationship = Some(parse_relationship(*relationship)?);
            relation.version = Some(version.to_string());
        }
        Ok(relation)
    }
}

/// Parse a comma-separated list of relations.
///
/// Empty segments, such as the one left by a trailing comma, are skipped.
pub fn parse_relations(s: &str) -> Result<Vec<Relation>, RelationError> {
    s.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::parse)
        .collect()
}

/// Format relations as a comma-separated list.
pub fn format_relations(relations: &[Relation]) -> String {
    relations
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
