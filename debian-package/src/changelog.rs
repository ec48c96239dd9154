//! Reading and writing `debian/changelog` files.
//!
//! A changelog consists of entries of the form:
//!
//! ```text
//! package (version) distribution(s); urgency=urgency
//!     [optional blank line(s), stripped]
//!   * change details
//!     more change details
//!     [blank line(s), kept as empty entries]
//!   * even more change details
//!     [optional blank line(s), stripped]
//!  -- maintainer name <email address>[two spaces]date
//! ```
//!
//! where the `p` of `package` is in column 0. The newest entry comes first.
//!
//! # Example
//!
//! ```
//! use debian_package::changelog::{export, import_changelog};
//! use debian_package::SourcePackage;
//!
//! let text = "hello (2.10-1) unstable; urgency=medium\n\
//!             \n  \
//!             * New upstream release.\n\
//!             \n \
//!             -- Santiago Vila <sanvila@debian.org>  Thu, 01 Jan 1970 00:01:40 +0000\n";
//!
//! let mut package = SourcePackage::with_name("hello");
//! import_changelog(std::io::Cursor::new(text), &mut package).unwrap();
//! assert_eq!(package.changelog()[0].version, "2.10-1");
//!
//! let mut output = Vec::new();
//! export(&package, &mut output).unwrap();
//! assert_eq!(String::from_utf8(output).unwrap(), text);
//! ```
use crate::error::{ChangelogError, KeywordError};
use crate::fields::{parse_urgency, Urgency};
use crate::person::{parse_person, Person};
use crate::SourcePackage;
use chrono::{DateTime, FixedOffset};
use std::io::{BufRead, Write};

/// Date format of the trailer line, as produced by `date -R`.
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// One entry of a changelog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Change {
    /// Package name; the owning package's name is used when unset
    pub name: Option<String>,

    /// Version of the package this entry describes
    pub version: String,

    /// Target distributions, in the order listed
    pub distributions: Vec<String>,

    /// Urgency of the upload
    pub urgency: Urgency,

    /// Free-text justification of the urgency
    pub urgency_commentary: Option<String>,

    /// Body lines, without the two leading columns. Empty strings are blank lines.
    pub entries: Vec<String>,

    /// Author of the entry
    pub maintainer: Person,

    /// Seconds since the epoch, UTC
    pub timestamp: i64,

    /// Offset from UTC, in minutes
    pub timezone: i32,
}

impl Change {
    /// The version, parsed as a Debian version.
    pub fn parsed_version(&self) -> Option<debversion::Version> {
        self.version.parse().ok()
    }

    /// The date of the entry, in its own timezone.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.timezone.checked_mul(60)?)?;
        Some(DateTime::from_timestamp(self.timestamp, 0)?.with_timezone(&offset))
    }

    /// Set the timestamp and timezone from a date.
    pub fn set_date(&mut self, date: DateTime<FixedOffset>) {
        self.timestamp = date.timestamp();
        self.timezone = date.offset().local_minus_utc() / 60;
    }

    fn urgency_string(&self) -> String {
        let mut urgency = self.urgency.to_string();
        match self.urgency_commentary.as_deref() {
            // Commentary that already carries its parentheses is emitted as-is.
            Some(c) if is_single_group(c) => {
                urgency.push(' ');
                urgency.push_str(c);
            }
            Some(c) => {
                urgency.push_str(" (");
                urgency.push_str(c);
                urgency.push(')');
            }
            None => {}
        }
        urgency
    }
}

/// Whether `s` is exactly one parenthesized group, such as `(a (b) c)`.
fn is_single_group(s: &str) -> bool {
    if !s.starts_with('(') {
        return false;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1 == s.len();
                }
            }
            _ => {}
        }
    }
    false
}

/// Format a timestamp and a timezone offset (in minutes) the way a changelog
/// trailer line expects.
///
/// ```
/// use debian_package::changelog::format_time;
///
/// assert_eq!(format_time(10, -300).unwrap(), "Wed, 31 Dec 1969 19:00:10 -0500");
/// ```
pub fn format_time(timestamp: i64, timezone: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(timezone.checked_mul(60)?)?;
    let date = DateTime::from_timestamp(timestamp, 0)?.with_timezone(&offset);
    Some(date.format(DATE_FORMAT).to_string())
}

/// Read one line, without its line terminator.
fn read_line<R: BufRead>(reader: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

/// Read lines until one has non-whitespace content.
fn next_nonempty_line<R: BufRead>(reader: &mut R) -> std::io::Result<Option<String>> {
    while let Some(line) = read_line(reader)? {
        if !line.trim().is_empty() {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

/// Split on `sep`, except inside parentheses.
fn split_outside_parens(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn parse_header(line: &str) -> Result<Change, ChangelogError> {
    let malformed = || ChangelogError::MalformedHeader(line.to_string());
    let (head, keywords) = line.split_once(';').ok_or_else(malformed)?;

    let mut words = head.split_whitespace();
    let name = words.next().ok_or_else(malformed)?;
    let version = words.next().ok_or_else(malformed)?;

    let mut change = Change {
        name: Some(name.to_string()),
        version: version.trim_matches(|c| c == '(' || c == ')').to_string(),
        distributions: words.map(|w| w.trim_end_matches(';').to_string()).collect(),
        ..Default::default()
    };

    for keyword_value in split_outside_parens(keywords, ',') {
        let keyword_value = keyword_value.trim();
        if keyword_value.is_empty() {
            continue;
        }
        let (key, value) = keyword_value
            .split_once('=')
            .unwrap_or((keyword_value, ""));
        match key.trim() {
            "urgency" => {
                let (urgency, commentary) = parse_urgency(value)?;
                change.urgency = urgency;
                change.urgency_commentary = commentary;
            }
            other => return Err(KeywordError(other.to_string()).into()),
        }
    }
    Ok(change)
}

fn parse_trailer(line: &str, change: &mut Change) -> Result<(), ChangelogError> {
    let malformed = || ChangelogError::MalformedTrailer(line.to_string());
    let rest = &line[" --".len()..];
    let email_end = rest.find('>').ok_or_else(malformed)?;
    change.maintainer = parse_person(rest[..=email_end].trim())?;

    let date = rest[email_end + 1..].trim();
    if date.is_empty() {
        return Err(malformed());
    }
    let date = DateTime::parse_from_rfc2822(date).map_err(|error| ChangelogError::InvalidDate {
        line: line.to_string(),
        error,
    })?;
    change.set_date(date);
    Ok(())
}

/// Drop the two leading columns of a body line.
fn strip_indent(line: &str) -> &str {
    if line.trim().is_empty() {
        return "";
    }
    match line.char_indices().nth(2) {
        Some((i, _)) => &line[i..],
        None => "",
    }
}

fn parse_change<R: BufRead>(reader: &mut R, header: &str) -> Result<Change, ChangelogError> {
    let mut change = parse_header(header)?;
    let eof = |change: &Change| ChangelogError::UnexpectedEof {
        name: change.name.clone().unwrap_or_default(),
        version: change.version.clone(),
    };

    let mut line = next_nonempty_line(reader)?.ok_or_else(|| eof(&change))?;
    while !line.starts_with(" --") {
        change.entries.push(strip_indent(&line).to_string());
        line = read_line(reader)?.ok_or_else(|| eof(&change))?;
    }
    while change.entries.last().is_some_and(|e| e.is_empty()) {
        change.entries.pop();
    }

    parse_trailer(&line, &mut change)?;
    log::debug!(
        "Parsed changelog entry {} ({}) with {} lines",
        change.name.as_deref().unwrap_or_default(),
        change.version,
        change.entries.len()
    );
    Ok(change)
}

/// Read every entry of a changelog into `package`.
///
/// The entries are appended to the package's changelog in the reverse of their
/// order in the file, so the newest entry of the file ends up last. Reading stops
/// successfully at the end of the stream; on error the package may hold a partial
/// changelog and should be discarded.
pub fn import_changelog<R: BufRead>(
    mut reader: R,
    package: &mut SourcePackage,
) -> Result<(), ChangelogError> {
    let mut changes = Vec::new();
    while let Some(header) = next_nonempty_line(&mut reader)? {
        changes.push(parse_change(&mut reader, &header)?);
    }
    log::debug!("Read {} changelog entries", changes.len());
    package.changelog_mut().extend(changes.into_iter().rev());
    Ok(())
}

fn render_change(change: &Change, default_name: &str, date: String) -> Vec<String> {
    let mut lines = Vec::with_capacity(change.entries.len() + 5);
    lines.push(format!(
        "{} ({}) {}; urgency={}",
        change.name.as_deref().unwrap_or(default_name),
        change.version,
        change.distributions.join(" "),
        change.urgency_string()
    ));
    lines.push(String::new());
    lines.extend(change.entries.iter().map(|entry| {
        if entry.is_empty() {
            String::new()
        } else {
            format!("  {}", entry)
        }
    }));
    lines.push(String::new());
    lines.push(format!(" -- {}  {}", change.maintainer, date));
    lines.push(String::new());
    lines
}

/// Render the changelog of `package` as lines of text, newest entry first.
///
/// The stored changelog is walked back to front, which restores the order of
/// the file it was imported from. Every entry ends with a blank line.
///
/// Fails up front if an entry has a timestamp or timezone that cannot be
/// represented as a date; after that, iteration cannot fail.
pub fn generate(
    package: &SourcePackage,
) -> Result<impl Iterator<Item = String> + '_, ChangelogError> {
    let dates = package
        .changelog()
        .iter()
        .map(|change| {
            format_time(change.timestamp, change.timezone).ok_or_else(|| {
                ChangelogError::InvalidTimestamp {
                    version: change.version.clone(),
                    timestamp: change.timestamp,
                    timezone: change.timezone,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let default_name = package.name().unwrap_or_default();
    Ok(package
        .changelog()
        .iter()
        .zip(dates)
        .rev()
        .flat_map(move |(change, date)| render_change(change, default_name, date)))
}

/// Write the changelog of `package` to `output`.
///
/// Lines are separated by newlines, and the blank line closing the last entry
/// is not followed by one, so the output ends right after the last trailer line
/// and its newline.
pub fn export<W: Write>(package: &SourcePackage, mut output: W) -> Result<(), ChangelogError> {
    for (i, line) in generate(package)?.enumerate() {
        if i > 0 {
            output.write_all(b"\n")?;
        }
        output.write_all(line.as_bytes())?;
    }
    output.flush()?;
    Ok(())
}

impl SourcePackage {
    /// Import a changelog, extending the current one. See [`import_changelog`].
    pub fn import_changelog<R: BufRead>(&mut self, reader: R) -> Result<(), ChangelogError> {
        import_changelog(reader, self)
    }

    /// Render the changelog as lines. See [`generate`].
    pub fn generate_changelog(
        &self,
    ) -> Result<impl Iterator<Item = String> + '_, ChangelogError> {
        generate(self)
    }

    /// Write the changelog to `output`. See [`export`].
    pub fn export_changelog<W: Write>(&self, output: W) -> Result<(), ChangelogError> {
        export(self, output)
    }
}
