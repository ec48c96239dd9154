//! Reading and writing `debian/control` files.
//!
//! A control file is a sequence of paragraphs of `Key: value` fields separated by
//! blank lines. The first paragraph describes the source package, the following
//! ones the binary packages built from it.
//!
//! # Example
//! ```
//! use debian_package::control::parse_control;
//! use debian_package::fields::{Priority, Relationship};
//!
//! let input = r#"Source: hello-debhelper
//! Section: oldlibs
//! Priority: extra
//! Maintainer: Santiago Vila <sanvila@debian.org>
//! Build-Depends: debhelper (>= 9)
//! Standards-Version: 3.9.5.1
//!
//! Package: hello-debhelper
//! Architecture: all
//! Depends: hello
//! Description: example package based on GNU hello
//!  This is a transitional package.
//! "#;
//!
//! let source = parse_control(input.as_bytes()).unwrap();
//! assert_eq!(source.name(), Some("hello-debhelper"));
//! assert_eq!(source.priority(), Some(Priority::Extra));
//! assert_eq!(source.build_depends()[0].relationship, Some(Relationship::LaterOrEqual));
//! assert_eq!(source.binary_packages()[0].depends()[0].name, "hello");
//! ```
use crate::error::ControlError;
use crate::fields::{parse_priority, StandardsVersion};
use crate::package::{AdditionalField, BinaryPackage, SourcePackage, Vcs};
use crate::person::{parse_people, parse_person};
use crate::relations::{format_relations, parse_relations, Relation};
use deb822_fast::{Paragraph, ParagraphReader};
use std::io::{BufRead, Read, Write};

/// Copies everything consumed from the inner reader, so a syntax error can be
/// traced back to the offending line.
struct Recording<R> {
    inner: R,
    consumed: Vec<u8>,
}

impl<R: BufRead> Read for Recording<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = {
            let available = self.fill_buf()?;
            let n = available.len().min(buf.len());
            buf[..n].copy_from_slice(&available[..n]);
            n
        };
        self.consume(n);
        Ok(n)
    }
}

impl<R: BufRead> BufRead for Recording<R> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        if amt > 0 {
            if let Ok(buf) = self.inner.fill_buf() {
                self.consumed.extend_from_slice(&buf[..amt.min(buf.len())]);
            }
        }
        self.inner.consume(amt);
    }
}

/// Find the line of a paragraph that is neither a field, a continuation of
/// one, a comment nor blank.
fn find_malformed_line(text: &str) -> Option<&str> {
    let mut seen_field = false;
    for line in text.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if !seen_field {
                return Some(line);
            }
        } else if line.starts_with(':') || !line.contains(':') {
            return Some(line);
        } else {
            seen_field = true;
        }
    }
    None
}

/// Read the next paragraph, skipping blank lines and comments before it.
///
/// The whitespace-only line ending the paragraph is consumed; the stream is
/// left at the start of the next paragraph.
fn read_paragraph<R: BufRead>(reader: &mut R) -> Result<Option<Paragraph>, ControlError> {
    let mut recording = Recording {
        inner: reader,
        consumed: Vec::new(),
    };
    let next = ParagraphReader::new(&mut recording).next();
    match next {
        None => Ok(None),
        Some(Ok(paragraph)) => Ok(Some(paragraph)),
        Some(Err(deb822_fast::Error::Io(e))) => Err(ControlError::Io(e)),
        Some(Err(e)) => {
            let text = String::from_utf8_lossy(&recording.consumed);
            Err(match find_malformed_line(&text) {
                Some(line) => ControlError::MalformedLine(line.to_string()),
                None => ControlError::Syntax(e),
            })
        }
    }
}

fn parse_yesno(field: &str, value: &str) -> Result<bool, ControlError> {
    match value {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(ControlError::InvalidBoolean {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

fn set_source_field(
    package: &mut SourcePackage,
    key: &str,
    value: &str,
) -> Result<(), ControlError> {
    log::trace!("Source field {}: {:?}", key, value);
    match key {
        "Source" => package.set_name(value),
        "Section" => package.set_section(value),
        "Homepage" => package.set_homepage(value),
        "Vcs-Browser" => package.set_vcs_browser(value),
        "Priority" => package.set_priority(parse_priority(value)?),
        "Maintainer" => package.set_maintainer(parse_person(value)?),
        "Uploaders" => package.uploaders_mut().extend(parse_people(value)?),
        "Standards-Version" => package.set_standards_version(
            value
                .parse::<StandardsVersion>()
                .map_err(|_| ControlError::InvalidStandardsVersion(value.to_string()))?,
        ),
        "Build-Depends" => package.build_depends_mut().extend(parse_relations(value)?),
        "Build-Depends-Indep" => package
            .build_depends_indep_mut()
            .extend(parse_relations(value)?),
        "Build-Conflicts" => package
            .build_conflicts_mut()
            .extend(parse_relations(value)?),
        "Build-Conflicts-Indep" => package
            .build_conflicts_indep_mut()
            .extend(parse_relations(value)?),
        _ => {
            if let Some(kind) = key.strip_prefix("Vcs-") {
                package.vcs_mut().push(Vcs {
                    kind: kind.to_string(),
                    value: value.to_string(),
                });
            } else {
                package
                    .additional_fields_mut()
                    .push(AdditionalField::new(key, value));
            }
        }
    }
    Ok(())
}

fn set_binary_field(
    package: &mut BinaryPackage,
    key: &str,
    value: &str,
) -> Result<(), ControlError> {
    log::trace!("Binary field {}: {:?}", key, value);
    match key {
        "Package" => package.set_name(value),
        "Architecture" => package.set_architecture(value),
        "Section" => package.set_section(value),
        "Homepage" => package.set_homepage(value),
        "Version" => package.set_version(value),
        "Provides" => package.set_provides(value),
        "Description" => package.set_description(value),
        "Package-Type" => package.set_package_type(value),
        "Priority" => package.set_priority(parse_priority(value)?),
        "Essential" => package.set_essential(parse_yesno(key, value)?),
        "Maintainer" => package.set_maintainer(parse_person(value)?),
        "Depends" => package.depends_mut().extend(parse_relations(value)?),
        "Recommends" => package.recommends_mut().extend(parse_relations(value)?),
        "Suggests" => package.suggests_mut().extend(parse_relations(value)?),
        "Enhances" => package.enhances_mut().extend(parse_relations(value)?),
        "Pre-Depends" => package.pre_depends_mut().extend(parse_relations(value)?),
        "Conflicts" => package.conflicts_mut().extend(parse_relations(value)?),
        "Breaks" => package.breaks_mut().extend(parse_relations(value)?),
        "Replaces" => package.replaces_mut().extend(parse_relations(value)?),
        _ => package
            .additional_fields_mut()
            .push(AdditionalField::new(key, value)),
    }
    Ok(())
}

/// Read one source paragraph into `package`.
///
/// Blank lines and comments before the paragraph are skipped. Reading stops at
/// the end of the stream or after the whitespace-only line ending the
/// paragraph, which is consumed. Unknown fields are kept in the package's
/// additional fields, in order. On error the package may be partially
/// populated and should be discarded.
pub fn parse_control_paragraph<R: BufRead>(
    mut reader: R,
    package: &mut SourcePackage,
) -> Result<(), ControlError> {
    if let Some(paragraph) = read_paragraph(&mut reader)? {
        for (key, value) in paragraph.iter() {
            set_source_field(package, key, value.trim())?;
        }
    }
    Ok(())
}

/// Read one binary paragraph into `package`.
///
/// Same rules as [`parse_control_paragraph`], with the binary package fields.
pub fn parse_binary_paragraph<R: BufRead>(
    mut reader: R,
    package: &mut BinaryPackage,
) -> Result<(), ControlError> {
    if let Some(paragraph) = read_paragraph(&mut reader)? {
        for (key, value) in paragraph.iter() {
            set_binary_field(package, key, value.trim())?;
        }
    }
    Ok(())
}

/// Read a whole control file: the source paragraph, then every binary paragraph.
pub fn parse_control<R: BufRead>(mut reader: R) -> Result<SourcePackage, ControlError> {
    let mut source = SourcePackage::new();
    parse_control_paragraph(&mut reader, &mut source)?;
    while let Some(paragraph) = read_paragraph(&mut reader)? {
        let mut binary = BinaryPackage::new();
        for (key, value) in paragraph.iter() {
            set_binary_field(&mut binary, key, value.trim())?;
        }
        log::debug!(
            "Parsed binary package {}",
            binary.name().unwrap_or("<unnamed>")
        );
        source.binary_packages_mut().push(binary);
    }
    log::debug!(
        "Parsed control file for {} with {} binary packages",
        source.name().unwrap_or("<unnamed>"),
        source.binary_packages().len()
    );
    Ok(source)
}

fn insert_relations(paragraph: &mut Paragraph, name: &str, relations: &[Relation]) {
    if !relations.is_empty() {
        paragraph.insert(name, &format_relations(relations));
    }
}

fn source_paragraph(package: &SourcePackage) -> Paragraph {
    let mut paragraph = Paragraph { fields: Vec::new() };
    if let Some(name) = package.name() {
        paragraph.insert("Source", name);
    }
    if let Some(section) = package.section() {
        paragraph.insert("Section", section);
    }
    if let Some(priority) = package.priority() {
        paragraph.insert("Priority", &priority.to_string());
    }
    if let Some(maintainer) = package.maintainer() {
        paragraph.insert("Maintainer", &maintainer.to_string());
    }
    if !package.uploaders().is_empty() {
        let uploaders = package
            .uploaders()
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        paragraph.insert("Uploaders", &uploaders);
    }
    insert_relations(&mut paragraph, "Build-Depends", package.build_depends());
    insert_relations(
        &mut paragraph,
        "Build-Depends-Indep",
        package.build_depends_indep(),
    );
    insert_relations(&mut paragraph, "Build-Conflicts", package.build_conflicts());
    insert_relations(
        &mut paragraph,
        "Build-Conflicts-Indep",
        package.build_conflicts_indep(),
    );
    if let Some(standards_version) = package.standards_version() {
        paragraph.insert("Standards-Version", &standards_version.to_string());
    }
    if let Some(vcs_browser) = package.vcs_browser() {
        paragraph.insert("Vcs-Browser", vcs_browser);
    }
    for vcs in package.vcs() {
        paragraph.insert(&vcs.field_name(), &vcs.value);
    }
    if let Some(homepage) = package.homepage() {
        paragraph.insert("Homepage", homepage);
    }
    for field in package.additional_fields() {
        paragraph.insert(&field.key, &field.value);
    }
    paragraph
}

fn binary_paragraph(package: &BinaryPackage) -> Paragraph {
    let mut paragraph = Paragraph { fields: Vec::new() };
    let leading = [
        ("Package", package.name()),
        ("Architecture", package.architecture()),
        ("Section", package.section()),
    ];
    for (name, value) in leading {
        if let Some(value) = value {
            paragraph.insert(name, value);
        }
    }
    if let Some(priority) = package.priority() {
        paragraph.insert("Priority", &priority.to_string());
    }
    if let Some(essential) = package.essential() {
        paragraph.insert("Essential", if essential { "yes" } else { "no" });
    }
    if let Some(maintainer) = package.maintainer() {
        paragraph.insert("Maintainer", &maintainer.to_string());
    }
    if let Some(version) = package.version() {
        paragraph.insert("Version", version);
    }
    insert_relations(&mut paragraph, "Pre-Depends", package.pre_depends());
    insert_relations(&mut paragraph, "Depends", package.depends());
    insert_relations(&mut paragraph, "Recommends", package.recommends());
    insert_relations(&mut paragraph, "Suggests", package.suggests());
    insert_relations(&mut paragraph, "Enhances", package.enhances());
    insert_relations(&mut paragraph, "Conflicts", package.conflicts());
    insert_relations(&mut paragraph, "Breaks", package.breaks());
    insert_relations(&mut paragraph, "Replaces", package.replaces());
    let trailing = [
        ("Provides", package.provides()),
        ("Homepage", package.homepage()),
        ("Package-Type", package.package_type()),
    ];
    for (name, value) in trailing {
        if let Some(value) = value {
            paragraph.insert(name, value);
        }
    }
    for field in package.additional_fields() {
        paragraph.insert(&field.key, &field.value);
    }
    if let Some(description) = package.description() {
        paragraph.insert("Description", description);
    }
    paragraph
}

/// Render `package` as deb822 paragraphs: the source paragraph, then one
/// paragraph per binary package.
pub fn generate_control(package: &SourcePackage) -> Vec<Paragraph> {
    std::iter::once(source_paragraph(package))
        .chain(package.binary_packages().iter().map(binary_paragraph))
        .collect()
}

/// Write `package` and its binary packages as a control file.
///
/// Paragraphs are separated by an empty line and every line ends with a newline.
pub fn export_control<W: Write>(package: &SourcePackage, mut output: W) -> Result<(), ControlError> {
    for (i, paragraph) in generate_control(package).iter().enumerate() {
        if i > 0 {
            writeln!(output)?;
        }
        write!(output, "{}", paragraph)?;
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PriorityError, RelationError};
    use crate::fields::{Priority, Relationship};
    use crate::person::Person;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<SourcePackage, ControlError> {
        let mut package = SourcePackage::new();
        parse_control_paragraph(Cursor::new(text), &mut package)?;
        Ok(package)
    }

    #[test]
    fn test_parse_source_paragraph() {
        let package = parse(
            "Source: hello-debhelper\n\
             Section: oldlibs\n\
             Priority: extra\n\
             Maintainer: Santiago Vila <sanvila@debian.org>\n\
             Standards-Version: 3.9.5.1\n\
             Build-Depends: debhelper (>= 9)\n",
        )
        .unwrap();
        assert_eq!(package.name(), Some("hello-debhelper"));
        assert_eq!(package.section(), Some("oldlibs"));
        assert_eq!(package.priority(), Some(Priority::Extra));
        assert_eq!(package.priority().unwrap().ordinal(), 4);
        assert_eq!(
            package.maintainer(),
            Some(&Person::new("Santiago Vila", "sanvila@debian.org"))
        );
        let standards_version = package.standards_version().unwrap();
        assert_eq!(standards_version.major_version, 3);
        assert_eq!(standards_version.minor_version, 9);
        assert_eq!(standards_version.major_patch, Some(5));
        assert_eq!(standards_version.minor_patch, Some(1));
        assert_eq!(
            package.build_depends(),
            &[Relation::new(
                "debhelper",
                Some((Relationship::LaterOrEqual, "9"))
            )]
        );
    }

    #[test]
    fn test_paragraph_ends_at_blank_line() {
        let mut reader = Cursor::new("Source: foo\n  \t\nPackage: foo\n");
        let mut package = SourcePackage::new();
        parse_control_paragraph(&mut reader, &mut package).unwrap();
        assert_eq!(package.name(), Some("foo"));
        assert!(package.additional_fields().is_empty());

        let mut binary = BinaryPackage::new();
        parse_binary_paragraph(&mut reader, &mut binary).unwrap();
        assert_eq!(binary.name(), Some("foo"));
    }

    #[test]
    fn test_malformed_line() {
        match parse("Source: foo\nno separator here\n") {
            Err(ControlError::MalformedLine(line)) => assert_eq!(line, "no separator here"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_continuation_without_field() {
        assert!(matches!(
            parse(" orphan continuation\n"),
            Err(ControlError::MalformedLine(_))
        ));
    }

    #[test]
    fn test_leading_blank_lines_and_comments() {
        let mut reader = Cursor::new("\n# generated\n\nSource: foo\n\n# binaries\nPackage: foo-bin\n");
        let mut package = SourcePackage::new();
        parse_control_paragraph(&mut reader, &mut package).unwrap();
        assert_eq!(package.name(), Some("foo"));

        let mut binary = BinaryPackage::new();
        parse_binary_paragraph(&mut reader, &mut binary).unwrap();
        assert_eq!(binary.name(), Some("foo-bin"));

        let mut empty = BinaryPackage::new();
        parse_binary_paragraph(&mut reader, &mut empty).unwrap();
        assert_eq!(empty, BinaryPackage::new());
    }

    #[test]
    fn test_find_malformed_line() {
        assert_eq!(
            find_malformed_line("Source: foo\n continued\n# note\nbogus line\n"),
            Some("bogus line")
        );
        assert_eq!(find_malformed_line(" stray\nSource: foo\n"), Some(" stray"));
        assert_eq!(find_malformed_line("Source: foo\n: value\n"), Some(": value"));
        assert_eq!(find_malformed_line("Source: foo\n continued\n"), None);
    }

    #[test]
    fn test_recording_reader() {
        let mut recording = Recording {
            inner: Cursor::new("Source: foo\n\nPackage: bar\n"),
            consumed: Vec::new(),
        };
        let mut line = String::new();
        recording.read_line(&mut line).unwrap();
        assert_eq!(line, "Source: foo\n");
        assert_eq!(recording.consumed, b"Source: foo\n");

        let mut rest = String::new();
        recording.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "\nPackage: bar\n");
        assert_eq!(recording.consumed, b"Source: foo\n\nPackage: bar\n");
    }

    #[test]
    fn test_invalid_priority() {
        assert!(matches!(
            parse("Priority: 999\n"),
            Err(ControlError::Priority(PriorityError::OutOfRange(999)))
        ));
        assert!(matches!(
            parse("Priority: whenever\n"),
            Err(ControlError::Priority(PriorityError::Unknown(_)))
        ));
    }

    #[test]
    fn test_invalid_relation() {
        assert!(matches!(
            parse("Build-Depends: debhelper (>=9 or so)\n"),
            Err(ControlError::Relation(RelationError::Malformed(_)))
        ));
    }

    #[test]
    fn test_invalid_standards_version() {
        assert!(matches!(
            parse("Standards-Version: 4\n"),
            Err(ControlError::InvalidStandardsVersion(_))
        ));
    }

    #[test]
    fn test_folded_uploaders() {
        let package = parse(
            "Source: foo\n\
             Uploaders: Jane Doe <jane@example.org>,\n \
             John Roe <john@example.org>\n",
        )
        .unwrap();
        assert_eq!(
            package.uploaders(),
            &[
                Person::new("Jane Doe", "jane@example.org"),
                Person::new("John Roe", "john@example.org"),
            ]
        );
    }

    #[test]
    fn test_vcs_and_additional_fields() {
        let package = parse(
            "Source: foo\n\
             Vcs-Browser: https://salsa.debian.org/foo\n\
             Vcs-Git: https://salsa.debian.org/foo.git\n\
             Rules-Requires-Root: no\n\
             # a comment\n\
             Testsuite: autopkgtest\n",
        )
        .unwrap();
        assert_eq!(package.vcs_browser(), Some("https://salsa.debian.org/foo"));
        assert_eq!(package.vcs().len(), 1);
        assert_eq!(package.vcs()[0].kind, "Git");
        assert_eq!(
            package.additional_fields(),
            &[
                AdditionalField::new("Rules-Requires-Root", "no"),
                AdditionalField::new("Testsuite", "autopkgtest"),
            ]
        );
    }

    #[test]
    fn test_parse_binary_paragraph() {
        let mut package = BinaryPackage::new();
        parse_binary_paragraph(
            Cursor::new(
                "Package: hello\n\
                 Architecture: any\n\
                 Essential: no\n\
                 Depends: libc6 (>= 2.34), foo\n\
                 Breaks: hello-debhelper (<< 2.9)\n\
                 Multi-Arch: foreign\n\
                 Description: example package based on GNU hello\n \
                 The GNU hello program produces a familiar, friendly greeting.\n \
                 .\n \
                 It is a demo.\n",
            ),
            &mut package,
        )
        .unwrap();
        assert_eq!(package.name(), Some("hello"));
        assert_eq!(package.architecture(), Some("any"));
        assert_eq!(package.essential(), Some(false));
        assert_eq!(package.depends().len(), 2);
        assert_eq!(
            package.breaks()[0].relationship,
            Some(Relationship::StrictlyEarlier)
        );
        assert_eq!(
            package.description(),
            Some(
                "example package based on GNU hello\n\
                 The GNU hello program produces a familiar, friendly greeting.\n\
                 .\n\
                 It is a demo."
            )
        );
        assert_eq!(
            package.additional_fields(),
            &[AdditionalField::new("Multi-Arch", "foreign")]
        );
    }

    #[test]
    fn test_invalid_essential() {
        let mut package = BinaryPackage::new();
        let err = parse_binary_paragraph(Cursor::new("Essential: maybe\n"), &mut package)
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidBoolean { .. }));
    }

    #[test]
    fn test_roundtrip_control() {
        let input = "Source: foo\n\
                     Section: devel\n\
                     Priority: optional\n\
                     Maintainer: Jane Doe <jane@example.org>\n\
                     Uploaders: John Roe <john@example.org>, Max Mustermann <max@example.org>\n\
                     Build-Depends: debhelper (>= 9), python3\n\
                     Standards-Version: 4.6.2\n\
                     Vcs-Git: https://salsa.debian.org/foo.git\n\
                     Homepage: https://example.org/foo\n\
                     Rules-Requires-Root: no\n\
                     \n\
                     Package: foo\n\
                     Architecture: all\n\
                     Depends: python3 (>= 3.9)\n\
                     Description: foo tool\n \
                     Longer description.\n";
        let package = parse_control(Cursor::new(input)).unwrap();
        let mut output = Vec::new();
        export_control(&package, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), input);
    }

    #[test]
    fn test_generate_control_paragraphs() {
        let mut package = SourcePackage::with_name("hello");
        let mut binary = BinaryPackage::with_name("hello");
        binary.set_architecture("any");
        binary.set_description("greeting program\nIt says hello.");
        package.binary_packages_mut().push(binary);

        let paragraphs = generate_control(&package);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].get("Source"), Some("hello"));
        assert_eq!(
            paragraphs[1].to_string(),
            "Package: hello\nArchitecture: any\nDescription: greeting program\n It says hello.\n"
        );
    }
}
