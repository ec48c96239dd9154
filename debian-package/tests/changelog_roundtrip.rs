use debian_package::changelog::{export, generate, import_changelog};
use debian_package::fields::Urgency;
use debian_package::{Change, Person, SourcePackage};
use indoc::indoc;
use std::io::Cursor;

const CHANGELOG: &str = indoc! {"
    package (0.0.3) stable; urgency=critical

      *A line here that doesn't have a space after the asterisk.
      A line with no asterisk at all, not carrying on from a previous one.
      [ One person ]
      * I don't like empty lines at all
      [ Other person ]
      * This is really really super important. So important that I'm going to write
        an entire paragraph telling you why, including:
       - A random bullet point
       - Actually make that two. Maybe more in just a bit. I'm not really sure. But
         first I want to interject with this second line
       - Yeah, let's have a third bullet point.
      * Oh, I like new lines so I'm going to put in a few with some whitespace.
        They should be parsed out anyway. But the lack of a line before this and
        the next package entry is intentional.

     -- Someone brand new <brand_new@example.com>  Thu, 01 Jan 1970 14:46:40 +1200

    package (0.0.2) stable testing unstable contrib; urgency=low (HIGH if you were affected by some arbitrary bug or something)

      * I don't like that optional blank line, so I'm not doing it.
      * I do like multiple entries, though. Especially when one of the entries
        ends up going onto the next line.
      * Even moreso if it's followed by another entry.

      * That space was intentional. Not putting one below here, though.

     -- Third maintainer person <someone@example.com>  Thu, 01 Jan 1970 02:16:40 +0200

    package (0.0.1-0ubuntu1~ubuntu70.04~ppa1) stable testing; urgency=medium

      * New upstream release. Also, trying out fancy version numbers and making this
        package available in testing. Multiline changelog entry.

     -- Some Other Maintainer <other_guy@example.org>  Thu, 01 Jan 1970 00:01:40 +0000

    some-package (0.0.0) stable; urgency=low

      * Initial release.

     -- Some Maintainer <maintainer@example.org>  Wed, 31 Dec 1969 19:00:10 -0500
"};

/// The same changelog, with the sloppy spacing that real changelogs pick up.
const MESSY_CHANGELOG: &str = "package (0.0.3) stable; urgency=critical
  *A line here that doesn't have a space after the asterisk.
  A line with no asterisk at all, not carrying on from a previous one.
  [ One person ]
  * I don't like empty lines at all
  [ Other person ]
  * This is really really super important. So important that I'm going to write
    an entire paragraph telling you why, including:
   - A random bullet point
   - Actually make that two. Maybe more in just a bit. I'm not really sure. But
     first I want to interject with this second line
   - Yeah, let's have a third bullet point.
  * Oh, I like new lines so I'm going to put in a few with some whitespace.
    They should be parsed out anyway. But the lack of a line before this and
    the next package entry is intentional.
\x20\x20\x20\x20

 -- Someone brand new <brand_new@example.com>  Thu, 01 Jan 1970 14:46:40 +1200
package (0.0.2) stable testing unstable contrib; urgency=low (HIGH if you were affected by some arbitrary bug or something)
  * I don't like that optional blank line, so I'm not doing it.
  * I do like multiple entries, though. Especially when one of the entries
    ends up going onto the next line.
  * Even moreso if it's followed by another entry.

  * That space was intentional. Not putting one below here, though.
 -- Third maintainer person <someone@example.com>  Thu, 01 Jan 1970 02:16:40 +0200


package (0.0.1-0ubuntu1~ubuntu70.04~ppa1) stable testing; urgency=medium


  * New upstream release. Also, trying out fancy version numbers and making this
    package available in testing. Multiline changelog entry.

 -- Some Other Maintainer <other_guy@example.org>  Thu, 01 Jan 1970 00:01:40 +0000

some-package (0.0.0) stable; urgency=low

  * Initial release.

 -- Some Maintainer <maintainer@example.org>  Wed, 31 Dec 1969 19:00:10 -0500
";

fn entries(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// The changelog above, in stored order: oldest entry first.
fn source_package() -> SourcePackage {
    let mut package = SourcePackage::with_name("package");
    let changelog = package.changelog_mut();
    changelog.push(Change {
        name: Some("some-package".to_string()),
        version: "0.0.0".to_string(),
        distributions: entries(&["stable"]),
        urgency: Urgency::Low,
        urgency_commentary: None,
        entries: entries(&["* Initial release."]),
        maintainer: Person::new("Some Maintainer", "maintainer@example.org"),
        timestamp: 10,
        timezone: -300,
    });
    changelog.push(Change {
        name: Some("package".to_string()),
        version: "0.0.1-0ubuntu1~ubuntu70.04~ppa1".to_string(),
        distributions: entries(&["stable", "testing"]),
        urgency: Urgency::Medium,
        urgency_commentary: None,
        entries: entries(&[
            "* New upstream release. Also, trying out fancy version numbers and making this",
            "  package available in testing. Multiline changelog entry.",
        ]),
        maintainer: Person::new("Some Other Maintainer", "other_guy@example.org"),
        timestamp: 100,
        timezone: 0,
    });
    changelog.push(Change {
        name: Some("package".to_string()),
        version: "0.0.2".to_string(),
        distributions: entries(&["stable", "testing", "unstable", "contrib"]),
        urgency: Urgency::Low,
        urgency_commentary: Some(
            "(HIGH if you were affected by some arbitrary bug or something)".to_string(),
        ),
        entries: entries(&[
            "* I don't like that optional blank line, so I'm not doing it.",
            "* I do like multiple entries, though. Especially when one of the entries",
            "  ends up going onto the next line.",
            "* Even moreso if it's followed by another entry.",
            "",
            "* That space was intentional. Not putting one below here, though.",
        ]),
        maintainer: Person::new("Third maintainer person", "someone@example.com"),
        timestamp: 1000,
        timezone: 120,
    });
    changelog.push(Change {
        name: Some("package".to_string()),
        version: "0.0.3".to_string(),
        distributions: entries(&["stable"]),
        urgency: Urgency::Critical,
        urgency_commentary: None,
        entries: entries(&[
            "*A line here that doesn't have a space after the asterisk.",
            "A line with no asterisk at all, not carrying on from a previous one.",
            "[ One person ]",
            "* I don't like empty lines at all",
            "[ Other person ]",
            "* This is really really super important. So important that I'm going to write",
            "  an entire paragraph telling you why, including:",
            " - A random bullet point",
            " - Actually make that two. Maybe more in just a bit. I'm not really sure. But",
            "   first I want to interject with this second line",
            " - Yeah, let's have a third bullet point.",
            "* Oh, I like new lines so I'm going to put in a few with some whitespace.",
            "  They should be parsed out anyway. But the lack of a line before this and",
            "  the next package entry is intentional.",
        ]),
        maintainer: Person::new("Someone brand new", "brand_new@example.com"),
        timestamp: 10000,
        timezone: 720,
    });
    package
}

fn export_to_string(package: &SourcePackage) -> String {
    let mut output = Vec::new();
    export(package, &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

fn import(text: &str) -> SourcePackage {
    let mut package = SourcePackage::with_name("package");
    import_changelog(Cursor::new(text), &mut package).unwrap();
    package
}

#[test]
fn test_generate() {
    let package = source_package();
    let lines = generate(&package).unwrap().collect::<Vec<_>>();
    let mut expected = CHANGELOG.lines().collect::<Vec<_>>();
    expected.push("");
    assert_eq!(lines, expected);
}

#[test]
fn test_export() {
    assert_eq!(export_to_string(&source_package()), CHANGELOG);
}

#[test]
fn test_import_clean() {
    let package = import(CHANGELOG);
    let versions = package
        .changelog()
        .iter()
        .rev()
        .map(|c| c.version.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        versions,
        vec!["0.0.3", "0.0.2", "0.0.1-0ubuntu1~ubuntu70.04~ppa1", "0.0.0"]
    );

    let expected = source_package();
    for (parsed, expected) in package.changelog().iter().zip(expected.changelog()) {
        assert_eq!(parsed.name, expected.name);
        assert_eq!(parsed.distributions, expected.distributions);
        assert_eq!(parsed.urgency, expected.urgency);
        assert_eq!(parsed.entries, expected.entries);
        assert_eq!(parsed.maintainer, expected.maintainer);
        assert_eq!(parsed.timestamp, expected.timestamp);
        assert_eq!(parsed.timezone, expected.timezone);
    }
}

#[test]
fn test_import_messy() {
    let messy = import(MESSY_CHANGELOG);
    let clean = import(CHANGELOG);
    assert_eq!(messy.changelog(), clean.changelog());
    assert_eq!(export_to_string(&messy), CHANGELOG);
}

#[test]
fn test_commentary_survives_roundtrip() {
    let package = import(CHANGELOG);
    let change = &package.changelog()[2];
    assert_eq!(change.version, "0.0.2");
    assert_eq!(
        change.urgency_commentary.as_deref(),
        Some("HIGH if you were affected by some arbitrary bug or something")
    );
    assert_eq!(export_to_string(&package), CHANGELOG);
}

#[test]
fn test_parenthesized_commentary_survives_roundtrip() {
    let text = indoc! {"
        package (1.0) unstable; urgency=low ((a) b (c))

          * Fix.

         -- Jane Doe <jane@example.org>  Thu, 01 Jan 1970 00:00:00 +0000
    "};
    let once = import(text);
    assert_eq!(
        once.changelog()[0].urgency_commentary.as_deref(),
        Some("(a) b (c)")
    );

    let exported = export_to_string(&once);
    assert_eq!(exported, text);
    assert_eq!(import(&exported), once);
}

#[test]
fn test_reimport_is_stable() {
    let once = import(CHANGELOG);
    let twice = import(&export_to_string(&once));
    assert_eq!(once, twice);
}

#[test]
fn test_package_methods() {
    let mut package = SourcePackage::with_name("package");
    package.import_changelog(CHANGELOG.as_bytes()).unwrap();
    assert_eq!(package.changelog().len(), 4);

    let mut output = Vec::new();
    package.export_changelog(&mut output).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), CHANGELOG);
    assert_eq!(
        package.generate_changelog().unwrap().next().as_deref(),
        Some("package (0.0.3) stable; urgency=critical")
    );
}

#[test]
fn test_dates() {
    let package = source_package();
    let dates = package
        .changelog()
        .iter()
        .map(|c| c.date().unwrap().to_rfc2822())
        .collect::<Vec<_>>();
    assert_eq!(
        dates,
        vec![
            "Wed, 31 Dec 1969 19:00:10 -0500",
            "Thu, 01 Jan 1970 00:01:40 +0000",
            "Thu, 01 Jan 1970 02:16:40 +0200",
            "Thu, 01 Jan 1970 14:46:40 +1200",
        ]
    );
    assert!(package.changelog()[2].parsed_version().is_some());
}
