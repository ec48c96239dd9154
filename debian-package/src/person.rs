//! People named in control files and changelogs.
use crate::error::PersonError;

/// A maintainer, uploader or changelog author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}

impl Person {
    /// Create a new person
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

impl std::str::FromStr for Person {
    type Err = PersonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_person(s)
    }
}

/// Parse a `Display Name <email@domain>` string.
///
/// Everything before the first `<` (trimmed) is the name and everything
/// between it and the following `>` is the email. The email is not validated.
///
/// ```
/// use debian_package::person::parse_person;
///
/// let person = parse_person("Santiago Vila <sanvila@debian.org>").unwrap();
/// assert_eq!(person.name, "Santiago Vila");
/// assert_eq!(person.email, "sanvila@debian.org");
/// ```
pub fn parse_person(s: &str) -> Result<Person, PersonError> {
    let start = s.find('<').ok_or_else(|| PersonError(s.to_string()))?;
    let end = s[start..]
        .find('>')
        .map(|i| start + i)
        .ok_or_else(|| PersonError(s.to_string()))?;
    Ok(Person {
        name: s[..start].trim().to_string(),
        email: s[start + 1..end].to_string(),
    })
}

/// Parse a comma-separated list of people, as found in `Uploaders`.
///
/// Empty segments (such as the one after a trailing comma) are skipped.
pub fn parse_people(s: &str) -> Result<Vec<Person>, PersonError> {
    s.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_person)
        .collect()
}
