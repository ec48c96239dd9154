use debian_package::SourcePackage;
use std::io::BufReader;

fn main() {
    // Read a changelog from the given path, or from stdin
    let path = std::env::args().nth(1);
    let mut package = SourcePackage::new();

    let result = match path.as_deref() {
        Some(path) => {
            let file = std::fs::File::open(path).unwrap_or_else(|e| {
                eprintln!("Unable to open {}: {}", path, e);
                std::process::exit(1);
            });
            package.import_changelog(BufReader::new(file))
        }
        None => package.import_changelog(std::io::stdin().lock()),
    };
    if let Err(e) = result {
        eprintln!("Unable to parse changelog: {}", e);
        std::process::exit(1);
    }

    eprintln!("Read {} entries", package.changelog().len());
    for change in package.changelog().iter().rev() {
        eprintln!(
            "  {} {} ({}, {} lines)",
            change.name.as_deref().unwrap_or("?"),
            change.version,
            change.urgency,
            change.entries.len()
        );
    }

    // Write it back out in normalized form
    if let Err(e) = package.export_changelog(std::io::stdout().lock()) {
        eprintln!("Unable to write changelog: {}", e);
        std::process::exit(1);
    }
}
