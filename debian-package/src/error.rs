//! Error types for the value parsers and the changelog and control file parsers.
//!
//! Every error carries the offending token or raw line, so that whoever maintains
//! the file can locate and fix it.

/// An urgency level in a changelog header was not recognized.
///
/// Carries the upper-cased level token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrgencyError(pub String);

impl std::fmt::Display for UrgencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid package urgency: {}", self.0)
    }
}

impl std::error::Error for UrgencyError {}

/// A keyword other than `urgency` was found in a changelog header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordError(pub String);

impl std::fmt::Display for KeywordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid changelog keyword: \"{}\". Valid keywords are: urgency",
            self.0
        )
    }
}

impl std::error::Error for KeywordError {}

/// A relationship operator could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipError {
    /// The token is not in the synonym table.
    Unknown(String),
    /// The ordinal is not one of the defined relationship values.
    OutOfRange(i64),
}

impl std::fmt::Display for RelationshipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(token) => write!(
                f,
                "Relationship must be one of the defined relationship values from the Debian Policy Manual, got {:?}",
                token
            ),
            Self::OutOfRange(value) => write!(
                f,
                "Relationship ordinal {} is out of range, expected 0-4",
                value
            ),
        }
    }
}

impl std::error::Error for RelationshipError {}

/// A priority could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorityError {
    /// The token does not name a priority.
    Unknown(String),
    /// The ordinal is not one of the defined priority values.
    OutOfRange(i64),
}

impl std::fmt::Display for PriorityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(token) => write!(f, "Invalid priority: {}", token),
            Self::OutOfRange(value) => {
                write!(f, "Priority ordinal {} is out of range, expected 0-4", value)
            }
        }
    }
}

impl std::error::Error for PriorityError {}

/// A person field lacks the `<email>` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonError(pub String);

impl std::fmt::Display for PersonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Expected \"Name <email>\", got {:?}", self.0)
    }
}

impl std::error::Error for PersonError {}

/// A single relation (`name (op version)`) could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// The segment is not of the form `name` or `name (op version)`.
    Malformed(String),
    /// The operator inside the parentheses is unknown.
    Relationship(RelationshipError),
}

impl From<RelationshipError> for RelationError {
    fn from(e: RelationshipError) -> Self {
        Self::Relationship(e)
    }
}

impl std::fmt::Display for RelationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(segment) => write!(f, "Malformed relation: {:?}", segment),
            Self::Relationship(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for RelationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Relationship(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors raised while parsing a control file.
#[derive(Debug)]
pub enum ControlError {
    /// Reading from the stream failed.
    Io(std::io::Error),
    /// A line has no `:` separator and is not a continuation line.
    MalformedLine(String),
    /// The paragraph is not valid deb822 for another reason.
    Syntax(deb822_fast::Error),
    /// The `Priority` field is invalid.
    Priority(PriorityError),
    /// A `Maintainer` or `Uploaders` entry is invalid.
    Person(PersonError),
    /// A relation field contains an invalid entry.
    Relation(RelationError),
    /// The `Standards-Version` field is not a dotted list of two to four integers.
    InvalidStandardsVersion(String),
    /// A yes/no field has another value.
    InvalidBoolean {
        /// Field name
        field: String,
        /// Offending value
        value: String,
    },
}

impl From<std::io::Error> for ControlError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PriorityError> for ControlError {
    fn from(e: PriorityError) -> Self {
        Self::Priority(e)
    }
}

impl From<PersonError> for ControlError {
    fn from(e: PersonError) -> Self {
        Self::Person(e)
    }
}

impl From<RelationError> for ControlError {
    fn from(e: RelationError) -> Self {
        Self::Relation(e)
    }
}

impl std::fmt::Display for ControlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::MalformedLine(line) => write!(f, "Malformed control line: {:?}", line),
            Self::Syntax(e) => write!(f, "Invalid control paragraph: {}", e),
            Self::Priority(e) => e.fmt(f),
            Self::Person(e) => e.fmt(f),
            Self::Relation(e) => e.fmt(f),
            Self::InvalidStandardsVersion(value) => {
                write!(f, "Invalid Standards-Version: {:?}", value)
            }
            Self::InvalidBoolean { field, value } => {
                write!(f, "Invalid value for {}: {:?}, expected yes or no", field, value)
            }
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Syntax(e) => Some(e),
            Self::Priority(e) => Some(e),
            Self::Person(e) => Some(e),
            Self::Relation(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors raised while reading or rendering a changelog.
#[derive(Debug)]
pub enum ChangelogError {
    /// Reading from the stream failed.
    Io(std::io::Error),
    /// The urgency level is unknown.
    Urgency(UrgencyError),
    /// A keyword other than `urgency` was used.
    Keyword(KeywordError),
    /// The header line lacks the name, the version or the `;` separator.
    MalformedHeader(String),
    /// The ` -- ` trailer line lacks the maintainer or the date.
    MalformedTrailer(String),
    /// The maintainer in the trailer line is invalid.
    Person(PersonError),
    /// The date in the trailer line is not a valid RFC 2822 date.
    InvalidDate {
        /// The trailer line
        line: String,
        /// The underlying parse error
        error: chrono::ParseError,
    },
    /// A timestamp or timezone cannot be rendered as a date.
    InvalidTimestamp {
        /// Version of the offending entry
        version: String,
        /// Seconds since the epoch
        timestamp: i64,
        /// Offset from UTC, in minutes
        timezone: i32,
    },
    /// The stream ended before the ` -- ` trailer of an entry.
    UnexpectedEof {
        /// Package name from the entry header
        name: String,
        /// Version from the entry header
        version: String,
    },
}

impl From<std::io::Error> for ChangelogError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<UrgencyError> for ChangelogError {
    fn from(e: UrgencyError) -> Self {
        Self::Urgency(e)
    }
}

impl From<KeywordError> for ChangelogError {
    fn from(e: KeywordError) -> Self {
        Self::Keyword(e)
    }
}

impl From<PersonError> for ChangelogError {
    fn from(e: PersonError) -> Self {
        Self::Person(e)
    }
}

impl std::fmt::Display for ChangelogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Urgency(e) => e.fmt(f),
            Self::Keyword(e) => e.fmt(f),
            Self::MalformedHeader(line) => write!(f, "Malformed changelog header: {:?}", line),
            Self::MalformedTrailer(line) => {
                write!(f, "Malformed changelog trailer: {:?}", line)
            }
            Self::Person(e) => e.fmt(f),
            Self::InvalidDate { line, error } => {
                write!(f, "Invalid date in changelog trailer {:?}: {}", line, error)
            }
            Self::InvalidTimestamp {
                version,
                timestamp,
                timezone,
            } => write!(
                f,
                "Cannot render date for changelog entry {}: timestamp {} with offset {} minutes",
                version, timestamp, timezone
            ),
            Self::UnexpectedEof { name, version } => write!(
                f,
                "Unexpected end-of-file in changelog entry {} ({})",
                name, version
            ),
        }
    }
}

impl std::error::Error for ChangelogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Urgency(e) => Some(e),
            Self::Keyword(e) => Some(e),
            Self::Person(e) => Some(e),
            Self::InvalidDate { error, .. } => Some(error),
            _ => None,
        }
    }
}
